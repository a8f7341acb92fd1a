//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::{cms::ContentQuery, config::AppConfig, App};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version = "0.1.0")]
#[command(about = "Portfolio/blog content service backed by the microCMS headless API", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to ./config.yml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Check configuration and CMS connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = cli
        .config
        .or_else(|| Some(PathBuf::from("config.yml")).filter(|p| p.exists()));
    let mut config = AppConfig::from_file_and_env(config_path.as_deref())?;

    match cli.command {
        Commands::Serve { port, ip } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(ip) = ip {
                config.server.ip = ip;
            }

            let app = App::new(config);
            folio_rs::server::start(app).await?;
        }

        Commands::Check => {
            let configured = config.cms.is_configured();
            println!(
                "CMS credentials: {}",
                if configured { "configured" } else { "missing (degraded mode)" }
            );

            let app = App::new(config);
            let posts = app
                .blog
                .posts(&ContentQuery::new().limit(1).filters(
                    folio_rs::cms::Filter::published(),
                ))
                .await;
            println!("Published blog posts: {}", posts.total_count);

            let works = app.works.all().await;
            println!("Published works: {}", works.len());
        }
    }

    Ok(())
}
