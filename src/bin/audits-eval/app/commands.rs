use std::fs;
use std::path::Path;

use anyhow::Context;
use audits_affaires_eval::{
    config::{MODEL_VAR, PROVIDER_VAR},
    generation::{CandidateClient, GenerationConfig},
    EvaluationRequest, Evaluator, GroundTruth, ProviderConfig,
};

use crate::args::CliArgs;
use crate::config::FileConfig;

/// Resolves the evaluator from the environment, with `--provider` and
/// `--model` standing in for their variables.
fn provider_config(args: &CliArgs) -> anyhow::Result<ProviderConfig> {
    let config = ProviderConfig::from_lookup(|key| match key {
        PROVIDER_VAR if args.provider.is_some() => args.provider.clone(),
        MODEL_VAR if args.model.is_some() => args.model.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

fn evaluator(args: &CliArgs, config: &FileConfig) -> anyhow::Result<(Evaluator, ProviderConfig)> {
    let provider = provider_config(args)?;
    let evaluator = Evaluator::from_config(&provider, &config.retry)?;
    Ok((evaluator, provider))
}

pub async fn evaluate(
    args: &CliArgs,
    config: &FileConfig,
    question: &str,
    response: &str,
    ground_truth: Option<&Path>,
) -> anyhow::Result<()> {
    let ground_truth = match ground_truth {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading ground truth {}", path.display()))?;
            serde_json::from_str::<GroundTruth>(&raw)
                .with_context(|| format!("parsing ground truth {}", path.display()))?
        }
        None => GroundTruth::default(),
    };

    let (evaluator, _) = evaluator(args, config)?;
    let request = EvaluationRequest::new(question, response, ground_truth);
    let result = evaluator.evaluate(&request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn read_cases(input: &Path) -> anyhow::Result<Vec<EvaluationRequest>> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("reading cases from {}", input.display()))?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: invalid case", input.display(), idx + 1))
        })
        .collect()
}

pub async fn batch(
    args: &CliArgs,
    config: &FileConfig,
    input: &Path,
    output: Option<&Path>,
    concurrency: usize,
) -> anyhow::Result<()> {
    let cases = read_cases(input)?;
    log::info!("Loaded {} cases from {}", cases.len(), input.display());

    let (evaluator, provider) = evaluator(args, config)?;
    let report = evaluator
        .run_batch(&cases, concurrency, provider.model())
        .await;
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Candidate settings come from the environment, then the `[generation]`
/// section.
fn generation_config(config: &FileConfig) -> anyhow::Result<GenerationConfig> {
    let file = &config.generation;
    let mut generation = GenerationConfig::from_lookup(|key| {
        std::env::var(key).ok().or_else(|| match key {
            "MODEL_ENDPOINT" => file.endpoint.clone(),
            "MODEL_NAME" => file.model.clone(),
            "GENERATION_MODE" => file.mode.clone(),
            _ => None,
        })
    })?;
    if let Some(max_tokens) = file.max_tokens {
        generation.max_tokens = max_tokens;
    }
    generation.retry = config.retry.clone();
    Ok(generation)
}

pub async fn generate(config: &FileConfig, question: &str) -> anyhow::Result<()> {
    let client = CandidateClient::new(generation_config(config)?)?;
    let answer = client.generate(question).await?;
    println!("{answer}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_jsonl_cases_skipping_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let first = serde_json::json!({
            "question": "q1",
            "model_response": "r1",
            "ground_truth": {"delai_legal": "1 mois"}
        });
        writeln!(file, "{first}\n").unwrap();
        writeln!(file, r#"{{"question": "q2", "model_response": "r2"}}"#).unwrap();

        let cases = read_cases(file.path()).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].ground_truth.delai_legal, "1 mois");
        assert_eq!(cases[1].ground_truth, GroundTruth::default());
    }

    #[test]
    fn bad_line_reports_its_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"question": "q1", "model_response": "r1"}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let err = read_cases(file.path()).unwrap_err();
        assert!(format!("{err}").ends_with(":2: invalid case"));
    }
}
