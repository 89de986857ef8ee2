//! Command-line entrypoint.
//!
//! Runs the same pipeline as the HTTP server for a single document and prints the summary to
//! stdout. Logs go to stderr so the output can be piped.
use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use patsum::{config, document, logging};

#[derive(Parser)]
#[command(
    name = "patsum-cli",
    about = "Fetch and summarize US patents and publications"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a document by number and print its technical summary.
    Summarize {
        document_number: String,
        /// Instruction prepended to the analyst prompt.
        #[arg(long, short, default_value = "")]
        instruction: String,
    },
    /// Summarize description text read from a local file.
    SummarizeFile {
        path: PathBuf,
        /// Instruction prepended to the analyst prompt.
        #[arg(long, short, default_value = "")]
        instruction: String,
    },
    /// Show how a document number is normalized and classified.
    Resolve { document_number: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(logging::LogSink::Console);

    match cli.command {
        Command::Resolve { document_number } => {
            let identifier = document::resolve(&document_number);
            println!("{}\t{}", identifier.normalized(), identifier.kind());
        }
        Command::Summarize {
            document_number,
            instruction,
        } => {
            let config = config::init_config().context("failed to load configuration")?;
            let pipeline = patsum::build_pipeline(config)?;
            let summary = pipeline
                .fetch_and_summarize(&document_number, &instruction)
                .await?;
            println!("{summary}");
        }
        Command::SummarizeFile { path, instruction } => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config = config::init_config().context("failed to load configuration")?;
            let pipeline = patsum::build_pipeline(config)?;
            let summary = pipeline.summarize_text(&text, &instruction).await?;
            println!("{summary}");
        }
    }

    Ok(())
}
