use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "audits-eval",
    version,
    about = "Score French business-law answers with an LLM evaluator"
)]
pub struct CliArgs {
    /// Evaluator provider (azure, openai, mistral, claude, gemini, local)
    #[arg(long, short = 'p', global = true)]
    pub provider: Option<String>,
    /// Evaluator model
    #[arg(long, short = 'm', global = true)]
    pub model: Option<String>,
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a single answer
    Evaluate {
        #[arg(long, short = 'q')]
        question: String,
        #[arg(long, short = 'r')]
        response: String,
        /// JSON file holding the five reference fields
        #[arg(long, short = 'g')]
        ground_truth: Option<PathBuf>,
    },
    /// Evaluate a JSON-lines file of cases
    Batch {
        #[arg(long, short = 'i')]
        input: PathBuf,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Ask the model under evaluation for an answer
    Generate {
        #[arg(long, short = 'q')]
        question: String,
    },
}
