//! CLI binary for webgist.
//!
//! Answers go to stdout; logs and the progress spinner go to stderr, so
//! `--json` output can be piped.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use webgist::{Answer, OpenAiCompatSummarizer, WebgistConfig};
use webgist_acquire::{AcquiredContent, Acquirer};

/// webgist: answer a question or summarise a page from live web content.
#[derive(Parser)]
#[command(name = "webgist", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Only acquire content; do not call the language model.
    #[arg(long)]
    no_llm: bool,

    /// A URL, or words forming a search query.
    #[arg(required = true, num_args = 1..)]
    input: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("webgist=info,webgist_acquire=info")),
        )
        .init();

    let cli = Cli::parse();
    let input = cli.input.join(" ");

    let config = WebgistConfig::load(cli.config.as_deref())?;
    let acquirer = Acquirer::new(&config.acquire)?;

    if cli.no_llm {
        let spinner = spinner("Acquiring content");
        let contents = acquirer.acquire(&input).await;
        spinner.finish_and_clear();
        return print_contents(&contents, cli.json);
    }

    let summarizer = OpenAiCompatSummarizer::new(&config.llm, config.llm.resolve_api_key())?;
    let spinner = spinner("Reading the web");
    let result = webgist::answer(
        &input,
        &acquirer,
        &summarizer,
        &config.usefulness,
        config.llm.max_context_tokens,
    )
    .await;
    spinner.finish_and_clear();

    print_answer(&result?, cli.json)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_contents(contents: &[AcquiredContent], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(contents)?);
        return Ok(());
    }
    if contents.is_empty() {
        println!("No content could be acquired.");
        return Ok(());
    }
    for (i, content) in contents.iter().enumerate() {
        println!("[{}] {}", i + 1, content.title);
        println!("    {}", content.url);
        println!("    {} characters", content.content.chars().count());
    }
    Ok(())
}

fn print_answer(answer: &Answer, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(answer)?);
        return Ok(());
    }

    println!("{}", answer.summary);
    if !answer.key_points.is_empty() {
        println!();
        for point in &answer.key_points {
            println!("  • {point}");
        }
    }
    println!();
    if answer.grounded {
        println!("Sources:");
        for (i, source) in answer.sources.iter().enumerate() {
            println!("  [{}] {} ({})", i + 1, source.title, source.url);
        }
    } else {
        println!("(No web sources were usable; answered from model knowledge.)");
    }
    Ok(())
}
