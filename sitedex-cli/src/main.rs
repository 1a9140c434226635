//! # sitedex CLI
//!
//! Command-line interface for the sitedex content pipeline.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitedex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "sitedex.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the hosted search index from site content
    Index {
        /// Aggregate and print the documents without publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Regenerate the content-date map from git history
    Dates,

    /// Serve the search and content-index APIs
    Serve {
        /// Server port (overrides the configured port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Search site content from the terminal
    Search {
        /// Search query
        query: String,

        /// Filter by content type (all, blog, whitepaper, page, tag)
        #[arg(long, default_value = "all")]
        filter: String,

        /// Maximum results to return
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Skip this many results
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Return JSON for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Render whitepaper PDFs from the built site
    Pdf {
        /// Whitepaper slug (omit with --all)
        slug: Option<String>,

        /// Render every whitepaper
        #[arg(long)]
        all: bool,

        /// Output directory for the generated files
        #[arg(long, default_value = "pdfs")]
        output: PathBuf,
    },

    /// Print the sitemap XML for the current content
    Sitemap,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Index { dry_run } => commands::index_content(&cli.config, dry_run).await,
        Commands::Dates => commands::generate_dates(&cli.config),
        Commands::Serve { port } => commands::serve_api(&cli.config, port).await,
        Commands::Search {
            query,
            filter,
            limit,
            offset,
            json,
        } => {
            let opts = commands::SearchOptions {
                filter,
                limit,
                offset,
                json,
            };
            commands::search_content(&cli.config, &query, opts).await
        }
        Commands::Pdf { slug, all, output } => {
            commands::render_pdfs(&cli.config, slug.as_deref(), all, &output).await
        }
        Commands::Sitemap => commands::print_sitemap(&cli.config).await,
    }
}
