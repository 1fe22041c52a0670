//! CLI entry point for chronicle

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chronicle")]
#[command(version)]
#[command(about = "A content archive tool for front-matter article collections", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new archive
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new record
    New {
        /// Title of the new record
        title: String,

        /// Path for the new record, relative to the records directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Validate the record set
    #[command(alias = "c")]
    Check,

    /// List archive content
    List {
        /// Type of content to list (record, tag)
        #[arg(default_value = "record")]
        r#type: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "chronicle=debug,info"
    } else {
        "chronicle=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing archive in {:?}", target_dir);
            chronicle::commands::init::init_archive(&target_dir)?;
            println!("Initialized empty archive in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let archive = chronicle::Chronicle::new(&base_dir)?;
            tracing::info!("Creating new record with title: {}", title);
            chronicle::commands::new::create_record(&archive, &title, path.as_deref())?;
        }

        Commands::Check => {
            let archive = chronicle::Chronicle::new(&base_dir)?;
            chronicle::commands::check::run(&archive)?;
        }

        Commands::List { r#type, format } => {
            let archive = chronicle::Chronicle::new(&base_dir)?;
            chronicle::commands::list::run(&archive, &r#type, &format)?;
        }

        Commands::Version => {
            println!("chronicle version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
