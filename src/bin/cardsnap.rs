//! CLI binary for cardsnap.
//!
//! A thin shim over the library crate: `prepare` runs the sanitize +
//! image-inlining pipeline on an HTML fragment, `format` and `summarize`
//! drive the text-generation features. Rasterization needs a snapshot
//! renderer backend and stays host-side; the CLI produces the prepared,
//! self-contained markup a renderer consumes.

use anyhow::{Context, Result};
use cardsnap::{
    sanitize, smart_format, summarize, FetchInliner, GlmClient, HttpImageFetcher,
    preprocess_images,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardsnap", version, about = "Prepare and polish card content for image export")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sanitize an HTML fragment and inline every external image.
    Prepare {
        /// Input HTML file, or `-` for stdin.
        input: String,

        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bound on the direct fetch attempt, in seconds.
        #[arg(long, default_value_t = 5)]
        direct_timeout_secs: u64,

        /// Bound on each proxy fetch attempt, in seconds.
        #[arg(long, default_value_t = 8)]
        proxy_timeout_secs: u64,

        /// Only sanitize; leave image sources untouched.
        #[arg(long)]
        skip_inline: bool,
    },

    /// Reformat content into card-friendly HTML via the text-generation API.
    Format {
        /// Input HTML file, or `-` for stdin.
        input: String,

        /// API key for the text-generation service.
        #[arg(long, env = "GLM_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Distil content into a short shareable summary.
    Summarize {
        /// Input HTML file, or `-` for stdin.
        input: String,

        /// API key for the text-generation service.
        #[arg(long, env = "GLM_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Prepare {
            input,
            output,
            direct_timeout_secs,
            proxy_timeout_secs,
            skip_inline,
        } => {
            let html = read_input(&input)?;
            let cleaned = sanitize(&html);

            let (prepared, failed) = if skip_inline {
                (cleaned, 0)
            } else {
                let inliner = FetchInliner::with_timeouts(
                    Arc::new(HttpImageFetcher::new()),
                    Duration::from_secs(direct_timeout_secs),
                    Duration::from_secs(proxy_timeout_secs),
                );

                let bar = image_progress_bar();
                let on_progress = |current: usize, total: usize| {
                    bar.set_length(total as u64);
                    bar.set_position(current as u64);
                    bar.set_message(format!("image {current}/{total}"));
                };
                let result = preprocess_images(&cleaned, &inliner, Some(&on_progress)).await;
                bar.finish_and_clear();
                (result.html, result.failed_images)
            };

            write_output(output.as_deref(), &prepared)?;
            if failed > 0 {
                eprintln!("warning: {failed} image(s) replaced with the placeholder graphic");
            }
        }

        Command::Format {
            input,
            api_key,
            output,
        } => {
            let html = read_input(&input)?;
            let client = GlmClient::new(api_key);
            let formatted = smart_format(&client, &html)
                .await
                .context("smart formatting failed")?;
            write_output(output.as_deref(), &formatted)?;
        }

        Command::Summarize {
            input,
            api_key,
            output,
        } => {
            let html = read_input(&input)?;
            let client = GlmClient::new(api_key);
            let summary = summarize(&client, &html)
                .await
                .context("summary generation failed")?;
            write_output(output.as_deref(), &summary)?;
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read '{input}'"))
    }
}

fn write_output(output: Option<&std::path::Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

fn image_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.green/238}] {pos}/{len}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar
}
