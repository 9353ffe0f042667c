//! Application entry point — intent responder.
//!
//! # Startup sequence
//!
//! 1. Parse the command line and initialise logging.
//! 2. Load [`AppConfig`] (defaults on first run), overlay `FB_PAGE_ID` /
//!    `FB_PAGE_TOKEN`, validate.
//! 3. Create a current-thread [`tokio`] runtime.
//! 4. Dispatch on the subcommand:
//!    * `comments` / `search` load the artifacts, connect to the served
//!      model and run one pass over the item source.
//!    * `dump` fetches keyword-search posts and writes them to JSON.
//!    * `classify` runs the pipeline on a single text without the platform.
//!
//! Any startup failure ends the process with a non-zero status.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};

use intent_responder::{
    artifacts::Artifacts,
    classifier::ServingClassifier,
    config::{AppConfig, AppPaths},
    dedup::{FileSeenRegistry, InMemorySeenRegistry, SeenRegistry},
    pipeline::{Orchestrator, RunSummary},
    platform::{
        dump_items, DeliveryOutcome, GraphClient, ItemSource, KeywordSearchSource,
        PageCommentsSource, ReplySink,
    },
    reply::ReplyDecision,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "intent-responder")]
#[command(about = "Classify social-media posts and auto-reply to seekers")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(short, long, env = "INTENT_RESPONDER_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `intent_responder=debug`
    #[arg(long, default_value = "info", env = "INTENT_RESPONDER_LOG")]
    log_level: String,

    /// Persist seen ids to the data directory when `dedup.persist_path` is unset
    #[arg(long)]
    persist_seen: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reply to comments on the page's recent posts
    Comments,
    /// Reply to public posts matching the configured search phrases
    Search,
    /// Write keyword-search results to JSON without classifying
    Dump {
        /// Output file; repeat for several (defaults to `dump.output_paths`)
        #[arg(short, long)]
        output: Vec<PathBuf>,
    },
    /// Run the pipeline on one text and print every stage
    Classify {
        text: String,
    },
}

// ---------------------------------------------------------------------------
// OfflineSink — ReplySink for modes that never deliver
// ---------------------------------------------------------------------------

struct OfflineSink;

#[async_trait]
impl ReplySink for OfflineSink {
    async fn post_reply(&self, item_id: &str, _message: &str) -> DeliveryOutcome {
        log::debug!("offline: not delivering reply to {item_id}");
        DeliveryOutcome {
            delivered: false,
            detail: "offline".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Startup helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&PathBuf>, persist_seen: bool) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };
    config.apply_env_overrides();
    if persist_seen && config.dedup.persist_path.is_none() {
        config.dedup.persist_path = Some(AppPaths::new().seen_file);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn seen_registry(config: &AppConfig) -> Result<Box<dyn SeenRegistry>> {
    match &config.dedup.persist_path {
        Some(path) => {
            let registry = FileSeenRegistry::load_from(path.clone())
                .context("failed to load seen registry")?;
            Ok(Box::new(registry))
        }
        None => Ok(Box::new(InMemorySeenRegistry::new())),
    }
}

fn graph_client(config: &AppConfig) -> Result<Arc<GraphClient>> {
    let token = config.require_page_token()?;
    Ok(Arc::new(GraphClient::from_config(&config.platform, token)))
}

async fn orchestrator(config: &AppConfig, sink: Arc<dyn ReplySink>) -> Result<Orchestrator> {
    let artifacts = Artifacts::load(&config.artifacts).context("failed to load model artifacts")?;
    let seen = seen_registry(config)?;
    let model = ServingClassifier::connect(&config.classifier)
        .await
        .with_context(|| format!("model server unavailable at {}", config.classifier.base_url))?;

    Ok(Orchestrator::build(
        artifacts,
        config,
        Arc::new(model),
        seen,
        sink,
    ))
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

async fn run_mode(
    config: &AppConfig,
    source: &dyn ItemSource,
    sink: Arc<GraphClient>,
) -> Result<RunSummary> {
    let mut orchestrator = orchestrator(config, sink).await?;
    Ok(orchestrator.run_source(source).await)
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Comments => {
            let page_id = config.require_page_id()?.to_string();
            let client = graph_client(&config)?;
            let source = PageCommentsSource::new(Arc::clone(&client), page_id);
            let summary = run_mode(&config, &source, client).await?;
            log::info!("comment listener finished: {summary}");
        }

        Command::Search => {
            let client = graph_client(&config)?;
            let keywords = config.platform.search_keywords.clone();
            let source = KeywordSearchSource::new(Arc::clone(&client), keywords);
            let summary = run_mode(&config, &source, client).await?;
            log::info!("keyword search finished: {summary}");
        }

        Command::Dump { output } => {
            let client = graph_client(&config)?;
            let source = KeywordSearchSource::new(client, config.dump.keywords.clone());
            let items = source.fetch_items().await.context("failed to fetch posts")?;

            let paths = if output.is_empty() {
                config.dump.output_paths.clone()
            } else {
                output
            };
            dump_items(&items, &paths)?;
            log::info!("dumped {} posts to {} file(s)", items.len(), paths.len());
        }

        Command::Classify { text } => {
            let orchestrator = orchestrator(&config, Arc::new(OfflineSink)).await?;
            let analysis = orchestrator.analyze(&text).await;

            println!("tokens:   {:?}", analysis.tokens.as_slice());
            println!("province: {} ({})", analysis.province_name, analysis.province);
            println!("intent:   {}", analysis.outcome);
            match &analysis.decision {
                ReplyDecision::Reply { message } => println!("reply:    {message}"),
                ReplyDecision::NoReply { reason } => println!("reply:    none ({reason})"),
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();
    log::info!("intent responder starting up");

    // 2. Configuration
    let config = load_config(cli.config.as_ref(), cli.persist_seen)?;

    // 3. Tokio runtime (items are processed strictly one at a time)
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let result = rt.block_on(run(cli, config));
    if let Err(e) = &result {
        log::error!("{e:#}");
    }
    result
}
