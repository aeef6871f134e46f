use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use ragkit_core::config::{expand_path, Config, Settings};
use ragkit_core::documents::load_documents;
use ragkit_core::VectorStore;
use ragkit_embed::get_default_provider;
use ragkit_pipeline::{IngestOptions, RagPipeline, RetrieveOptions};
use ragkit_vector::LanceVectorStore;

mod args;
mod chat;
mod completion;

use args::{parse_args, Command, QueryOverrides, USAGE};
use completion::{ChatClient, ChatSettings};

const DEFAULT_DOCS_DIR: &str = "data/docs";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&argv) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::load().context("loading configuration")?;
    let settings = config.settings().context("invalid configuration")?;
    match command {
        Command::Ingest { path, reset } => {
            let pipeline = build_pipeline(&settings).await?;
            let mut opts = IngestOptions::from_settings(&settings);
            if let Some(reset) = reset {
                opts.reset = reset;
            }
            let path = path.unwrap_or_else(|| docs_dir(&config));
            ingest(&pipeline, &path, &opts).await?;
        }
        Command::Query { text, overrides } => {
            let pipeline = build_pipeline(&settings).await?;
            let opts = retrieve_options(&settings, overrides);
            println!("🔍 Query: {text}");
            let hits = pipeline.retrieve(&text, &opts).await?;
            if hits.is_empty() {
                println!("No chunk within distance {} ({})", opts.params.threshold, opts.params.metric);
            }
            for (i, hit) in hits.iter().enumerate() {
                println!("\n  {}. {hit}", i + 1);
            }
        }
        Command::Chat { path } => {
            let pipeline = build_pipeline(&settings).await?;
            if let Some(path) = path {
                ingest(&pipeline, &path, &IngestOptions::from_settings(&settings)).await?;
            }
            let chat: ChatSettings = config.get_or_default("chat")?;
            let client = ChatClient::from_settings(&chat)?;
            let opts = retrieve_options(&settings, QueryOverrides::default());
            chat::run_console_chat(&pipeline, &opts, client.as_ref()).await?;
        }
        Command::Clear => {
            let store = open_store(&settings).await?;
            store.clear().await?;
            println!("🧹 Cleared table '{}'", store.table_name());
        }
        Command::Status => {
            let store = open_store(&settings).await?;
            println!("Store:      {}", settings.store.path().display());
            println!("Table:      {}", store.table_name());
            println!("Dimensions: {}", store.dimensions());
            println!("Records:    {}", store.count().await?);
            let retrieval = &settings.retrieval;
            println!(
                "Metric:     {} (top_k={}, threshold={})",
                retrieval.metric, retrieval.top_k, retrieval.min_score_threshold
            );
        }
        Command::Help => {}
    }
    Ok(())
}

fn docs_dir(config: &Config) -> PathBuf {
    let dir: String = config.get("data.docs_dir").unwrap_or_else(|_| DEFAULT_DOCS_DIR.to_string());
    expand_path(dir)
}

fn retrieve_options(settings: &Settings, overrides: QueryOverrides) -> RetrieveOptions {
    let mut opts = RetrieveOptions::from_settings(settings);
    if let Some(top_k) = overrides.top_k {
        opts.params.top_k = top_k;
    }
    if let Some(threshold) = overrides.threshold {
        opts.params.threshold = threshold;
    }
    if let Some(metric) = overrides.metric {
        opts.params.metric = metric;
    }
    opts
}

async fn open_store(settings: &Settings) -> Result<LanceVectorStore> {
    let path = settings.store.path();
    std::fs::create_dir_all(&path).with_context(|| format!("creating {}", path.display()))?;
    LanceVectorStore::open(&path, &settings.store.table, settings.embedding.dimensions)
        .await
        .with_context(|| format!("opening vector store at {}", path.display()))
}

async fn build_pipeline(settings: &Settings) -> Result<RagPipeline<LanceVectorStore>> {
    let provider = get_default_provider(&settings.embedding)?;
    let store = open_store(settings).await?;
    Ok(RagPipeline::new(provider, store))
}

async fn ingest(pipeline: &RagPipeline<LanceVectorStore>, path: &Path, opts: &IngestOptions) -> Result<()> {
    println!("📂 Ingesting from {}", path.display());
    let docs = load_documents(path).with_context(|| format!("reading {}", path.display()))?;
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("embedding {} documents", docs.len()));
    let report = match pipeline.ingest_documents(&docs, opts).await {
        Ok(report) => report,
        Err(e) => {
            pb.abandon_with_message("❌ ingestion failed");
            return Err(e.into());
        }
    };
    pb.finish_with_message(format!(
        "✅ Ingest complete ({} chunks from {} documents{})",
        report.stored,
        report.documents,
        if report.replaced { ", table replaced" } else { "" }
    ));
    Ok(())
}
