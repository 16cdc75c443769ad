use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tweetsmith::domain::{CONTENT_KEY, TWEET_KEY, fields};
use tweetsmith::fetch::{self, ContentFetcher, HttpContentFetcher, UrlKind};
use tweetsmith::llm::{AnthropicClient, AnthropicConfig, LlmClient};
use tweetsmith::pipeline::{PipelineBuilder, PipelineMode, PipelineOutput};
use tweetsmith::review::{ReviewDecision, ReviewSession};
use tweetsmith::store::{ExampleStore, LangSmithStore, LocalExampleStore};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::{Config, StoreBackend};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tweetsmith")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tweetsmith.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_client(config: &Config) -> Result<Arc<dyn LlmClient>> {
    let llm = &config.llm;
    let client = AnthropicClient::from_env(
        &llm.api_key_env,
        AnthropicConfig {
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            timeout: Duration::from_millis(llm.timeout_ms),
            base_url: llm.base_url.clone(),
        },
    )
    .context("Failed to create model client")?;
    Ok(Arc::new(client))
}

fn build_fetcher(config: &Config) -> Result<Arc<dyn ContentFetcher>> {
    let mut fetch_config = fetch::FetchConfig {
        timeout: Duration::from_millis(config.fetch.timeout_ms),
        max_content_chars: config.fetch.max_content_chars,
        ..Default::default()
    };
    if let Some(user_agent) = &config.fetch.user_agent {
        fetch_config.user_agent = user_agent.clone();
    }
    let fetcher = HttpContentFetcher::new(fetch_config).context("Failed to create content fetcher")?;
    Ok(Arc::new(fetcher))
}

fn build_store(config: &Config) -> Result<Arc<dyn ExampleStore>> {
    let store = &config.store;
    match store.backend {
        StoreBackend::Local => {
            let local = LocalExampleStore::new(&store.local_dir)
                .context(format!("Failed to open example store at {}", store.local_dir.display()))?;
            Ok(Arc::new(local))
        }
        StoreBackend::Langsmith => {
            let remote = LangSmithStore::from_env(
                &store.api_key_env,
                store.api_url.clone(),
                Duration::from_millis(store.timeout_ms),
            )
            .context("Failed to create LangSmith client")?;
            Ok(Arc::new(remote))
        }
    }
}

fn print_output(output: &PipelineOutput, verbose: bool) {
    if verbose {
        if let Some(facts) = &output.facts {
            println!("{}", "Facts:".cyan());
            for fact in facts {
                println!("  - {}", fact);
            }
        }
    }
    println!("\n{}\n", output.tweet.bold());
    let outcome = if output.outcome.is_style_matched() {
        output.outcome.to_string().green()
    } else {
        output.outcome.to_string().yellow()
    };
    println!("{} {} after {} attempt(s)", "Outcome:".cyan(), outcome, output.attempts);
}

async fn handle_generate_command(
    url: &str,
    mode: Option<PipelineMode>,
    max_attempts: Option<u32>,
    no_examples: bool,
    review: bool,
    verbose: bool,
    config: &Config,
) -> Result<()> {
    let pipeline_config = &config.pipeline;
    let mode = mode.unwrap_or(pipeline_config.mode);
    info!("Generating tweet for {} ({})", url, mode);

    let store = build_store(config)?;
    let mut builder = PipelineBuilder::new(build_client(config)?, build_fetcher(config)?)
        .mode(mode)
        .persona(config.persona.clone())
        .max_attempts(max_attempts.unwrap_or(pipeline_config.max_attempts))
        .max_words(pipeline_config.max_words)
        .call_timeout(Duration::from_millis(config.llm.timeout_ms));
    if pipeline_config.retrieve_examples && !no_examples {
        builder = builder.examples(store.clone(), config.store.dataset_id.clone(), pipeline_config.example_limit);
    }
    let pipeline = builder.build().context("Failed to build pipeline")?;

    println!("{} {}", "Generating:".green(), url);
    let output = pipeline.run(url).await.context("Pipeline failed")?;
    print_output(&output, verbose);

    if review {
        let stdin = io::stdin();
        let mut session = ReviewSession::new(stdin.lock(), io::stdout());
        let (decision, _) = session
            .review(store.as_ref(), &config.store.dataset_id, &output.content, &output.tweet)
            .await
            .context("Review failed")?;
        if let ReviewDecision::Skipped = decision {
            println!("{}", "Nothing recorded".yellow());
        }
    }
    Ok(())
}

async fn handle_fetch_command(url: &str, config: &Config) -> Result<()> {
    info!("Fetching {}", url);
    let content = build_fetcher(config)?.fetch(url).await.context("Fetch failed")?;
    let kind = UrlKind::classify(&content.source_url);

    println!("{} {}", "Kind:".cyan(), kind);
    if content.is_empty() {
        println!("{}", "No content found".yellow());
    } else {
        println!("{} {} chars\n", "Content:".cyan(), content.text.chars().count());
        println!("{}", content.text);
    }
    Ok(())
}

async fn handle_feedback_command(content: &str, tweet: &str, config: &Config) -> Result<()> {
    let content = match content.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read content from {}", path))?,
        None => content.to_string(),
    };

    let example = build_store(config)?
        .record_example(
            &config.store.dataset_id,
            fields([(CONTENT_KEY, content.as_str())]),
            fields([(TWEET_KEY, tweet)]),
        )
        .await
        .context("Failed to record example")?;

    info!("Recorded example {}", example.id);
    println!("{} {}", "Recorded:".green(), example.id);
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Generate {
            url,
            mode,
            max_attempts,
            no_examples,
            review,
        } => {
            handle_generate_command(url, *mode, *max_attempts, *no_examples, *review, cli.is_verbose(), config).await
        }
        Commands::Fetch { url } => handle_fetch_command(url, config).await,
        Commands::Feedback { content, tweet } => handle_feedback_command(content, tweet, config).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
