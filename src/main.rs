//! CLI entry point for perfecxion-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use perfecxion_rs::commands::consent::ConsentAction;

#[derive(Parser)]
#[command(name = "perfecxion-rs")]
#[command(author = "perfecXion Security Team")]
#[command(version = "0.1.0")]
#[command(about = "Content index, search, feeds and API for the perfecXion knowledge hub", long_about = None)]
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
    /// Initialize a new content site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new content document
    New {
        /// Content type (blog, whitepaper, learning)
        r#type: String,

        /// Title of the new document
        title: String,
    },

    /// Generate the RSS feed, sitemap and search index
    #[command(alias = "g")]
    Generate,

    /// Start the API server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site content
    List {
        /// What to list (blog, whitepaper, learning, all, tags, categories, stats)
        #[arg(default_value = "all")]
        r#type: String,
    },

    /// Search the content index
    Search {
        query: String,

        /// Only this content type
        #[arg(short, long)]
        r#type: Option<String>,

        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Suggest completions for a partial query
    Suggest { query: String },

    /// Show the items most related to one item
    Related {
        r#type: String,
        slug: String,

        /// Number of items to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Validate every document and report failures and duplicate slugs
    Check,

    /// Clean the public folder
    Clean,

    /// Inspect or change stored cookie consent
    Consent {
        #[command(subcommand)]
        action: Option<ConsentCommand>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum ConsentCommand {
    /// Show the stored preferences
    Show,
    /// Allow every cookie category
    AcceptAll,
    /// Allow only necessary cookies
    RejectAll,
    /// Set categories, e.g. `analytics=true marketing=false`
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Forget stored consent
    Reset,
}

impl From<ConsentCommand> for ConsentAction {
    fn from(command: ConsentCommand) -> Self {
        match command {
            ConsentCommand::Show => ConsentAction::Show,
            ConsentCommand::AcceptAll => ConsentAction::AcceptAll,
            ConsentCommand::RejectAll => ConsentAction::RejectAll,
            ConsentCommand::Set { assignments } => ConsentAction::Set(assignments),
            ConsentCommand::Reset => ConsentAction::Reset,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "perfecxion_rs=debug,info"
    } else {
        "perfecxion_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            perfecxion_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { r#type, title } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", r#type, title);
            perfecxion_rs::commands::new::run(&site, &r#type, &title)?;
        }

        Commands::Generate => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            tracing::info!("Generating exports...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            perfecxion_rs::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            perfecxion_rs::commands::list::run(&site, &r#type)?;
        }

        Commands::Search {
            query,
            r#type,
            category,
            limit,
        } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            perfecxion_rs::commands::search::run(
                &site,
                &query,
                r#type.as_deref(),
                category.as_deref(),
                limit,
            )?;
        }

        Commands::Suggest { query } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            perfecxion_rs::commands::search::suggest(&site, &query)?;
        }

        Commands::Related {
            r#type,
            slug,
            limit,
        } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            perfecxion_rs::commands::related::run(&site, &r#type, &slug, limit)?;
        }

        Commands::Check => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            perfecxion_rs::commands::check::run(&site)?;
        }

        Commands::Clean => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Consent { action } => {
            let site = perfecxion_rs::Site::new(&base_dir)?;
            let action = action.map(ConsentAction::from).unwrap_or(ConsentAction::Show);
            perfecxion_rs::commands::consent::run(&site, &action)?;
        }

        Commands::Version => {
            println!("perfecxion-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
