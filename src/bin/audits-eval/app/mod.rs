mod commands;

use clap::Parser;

use crate::args::{CliArgs, Command};
use crate::config::load_config;
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = load_config(args.config.clone())?;

    let mut logging = config.logging.clone();
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }
    let _logger = init_logging(&logging)?;

    match &args.command {
        Command::Evaluate {
            question,
            response,
            ground_truth,
        } => {
            commands::evaluate(&args, &config, question, response, ground_truth.as_deref()).await
        }
        Command::Batch {
            input,
            output,
            concurrency,
        } => {
            let concurrency = concurrency.unwrap_or(config.batch.concurrency);
            commands::batch(&args, &config, input, output.as_deref(), concurrency).await
        }
        Command::Generate { question } => commands::generate(&config, question).await,
    }
}
