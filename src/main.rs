use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentrifocus::config::Config;
use sentrifocus::llm::{self, LlmProvider};
use sentrifocus::transport;
use sentrifocus::verdict::{ClassificationRequest, ClassifierOptions, VerdictService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sentrifocus")]
#[command(author, version, about = "SentriFocus - LLM focus guard backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Model to classify with
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Classify a single page and print the verdict as JSON
    Check {
        /// What the user is trying to do
        #[arg(short, long)]
        goal: String,

        /// Page or video title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Page URL
        #[arg(short, long)]
        url: String,

        /// Fallback descriptor when the title is empty
        #[arg(long)]
        context_label: Option<String>,

        /// Model to classify with
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before the subscriber so RUST_LOG set there takes effect
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    let filter = if cli.verbose {
        "sentrifocus=debug,tower_http=debug"
    } else {
        "sentrifocus=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => return Err(e).context("Failed to load .env file"),
    }

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        None => {
            let service = build_service(&config)?;
            let addr = config.bind_addr()?;
            transport::http::run_http_server(addr, service).await?;
        }
        Some(Commands::Serve { port, host, model }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(model) = model {
                config.llm.model = model;
            }
            let service = build_service(&config)?;
            let addr = config.bind_addr()?;
            transport::http::run_http_server(addr, service).await?;
        }
        Some(Commands::Check {
            goal,
            title,
            url,
            context_label,
            model,
        }) => {
            if let Some(model) = model {
                config.llm.model = model;
            }
            let service = build_service(&config)?;
            let mut request = ClassificationRequest::new(goal, title, url);
            request.context_label = context_label;

            let verdict = service.verify(&request).await;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
    }

    Ok(())
}

/// Construct the single shared classifier; a missing API key is fatal here
fn build_service(config: &Config) -> Result<VerdictService> {
    let api_key = config.llm.api_key()?;
    let provider: Arc<dyn LlmProvider> = Arc::from(llm::create_provider(&config.llm, api_key)?);

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        "Classifier ready"
    );

    Ok(VerdictService::new(provider).with_options(ClassifierOptions {
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
    }))
}
