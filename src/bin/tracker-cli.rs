use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use caption_tracker::config::{default_config, load_config, LogFormat, ObservabilityConfig};
use caption_tracker::discovery::transport::{endpoint, http_client};
use caption_tracker::observability::logging;
use caption_tracker::orchestrator::{CaptionStyle, StyleSelection};
use caption_tracker::{CaptionOrchestrator, DiscoveryClient};

#[derive(Parser)]
#[command(name = "tracker-cli")]
#[command(about = "Query the caption backend tracker and generate captions", long_about = None)]
struct Cli {
    /// Registry base URL. Overrides config and `TRACKER_URL`.
    #[arg(short, long)]
    tracker: Option<String>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log discovery and generation steps to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Registry status and current model
    Status,
    /// Current backend descriptor
    Url,
    /// Current backend and recent history
    History,
    /// Registry liveness
    Health,
    /// Publish a backend address
    Publish {
        url: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// Look up and probe the current backend
    Find,
    /// Generate captions for an image file
    Generate {
        image: PathBuf,
        /// `all` or a comma-separated list of styles
        #[arg(long, default_value = "all")]
        style: String,
        #[arg(long)]
        short: Option<u32>,
        #[arg(long)]
        technical: Option<u32>,
        #[arg(long = "human-friendly")]
        human_friendly: Option<u32>,
        /// Use this backend directly instead of asking the registry
        #[arg(long)]
        backend: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    if let Some(tracker) = &cli.tracker {
        config.discovery.tracker_url = tracker.trim_end_matches('/').to_string();
    }

    if cli.verbose {
        logging::init_logging(&ObservabilityConfig {
            log_level: "debug".to_string(),
            log_format: LogFormat::Pretty,
            ..config.observability.clone()
        });
    }

    let tracker = Registry {
        http: http_client(config.discovery.use_system_proxy)?,
        base: config.discovery.tracker_url.clone(),
        timeout: Duration::from_secs(config.discovery.lookup_timeout_secs),
    };

    match cli.command {
        Commands::Status => tracker.get("/status").await?,
        Commands::Url => tracker.get("/url").await?,
        Commands::History => tracker.get("/history").await?,
        Commands::Health => tracker.get("/health").await?,
        Commands::Publish { url, model } => {
            let mut body = json!({ "url": url });
            if let Some(model) = model {
                body["model"] = Value::String(model);
            }
            let res = tracker
                .http
                .post(endpoint(&tracker.base, "/url"))
                .timeout(tracker.timeout)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Find => {
            let mut discovery = DiscoveryClient::new(config.discovery.clone())?;
            discovery.find_backend().await;
            println!("{}", serde_json::to_string_pretty(&discovery.report())?);
        }
        Commands::Generate {
            image,
            style,
            short,
            technical,
            human_friendly,
            backend,
        } => {
            let bytes = std::fs::read(&image)?;
            let styles: StyleSelection = style.parse()?;

            let orchestrator = CaptionOrchestrator::new(config.generation.clone())?;
            let overrides = [
                (CaptionStyle::Short, short),
                (CaptionStyle::Technical, technical),
                (CaptionStyle::HumanFriendly, human_friendly),
            ]
            .into_iter()
            .filter_map(|(style, limit)| limit.map(|l| (style, l)));
            let limits = orchestrator.word_limits(overrides)?;

            let mut discovery = DiscoveryClient::new(config.discovery.clone())?;
            match backend {
                Some(url) => discovery.use_manual_url(&url)?,
                None => {
                    let state = discovery.find_backend().await;
                    if !state.is_usable() {
                        println!("{}", serde_json::to_string_pretty(&discovery.report())?);
                        std::process::exit(1);
                    }
                }
            }

            let result = orchestrator
                .generate_with(&discovery, &bytes, &styles, &limits)
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Raw registry access for the passthrough subcommands.
struct Registry {
    http: reqwest::Client,
    base: String,
    timeout: Duration,
}

impl Registry {
    async fn get(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let res = self
            .http
            .get(endpoint(&self.base, path))
            .timeout(self.timeout)
            .send()
            .await?;
        print_response(res).await
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    if !status.is_success() {
        eprintln!("Error: tracker returned status {}", status);
        std::process::exit(1);
    }
    Ok(())
}
