//! Configuration module

mod archive;

pub use archive::ArchiveConfig;
