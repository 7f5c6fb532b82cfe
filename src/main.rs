use ingredient_copilot::{AnalysisError, ErrorPayload, IngredientAnalyzer};
use log::{debug, error};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: ingredient-copilot [--image PATH] [INGREDIENT TEXT...]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let mut image_path = None;
    let mut words = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--image" | "-i" => match args.next() {
                Some(path) => image_path = Some(path),
                None => {
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                }
            },
            "--help" | "-h" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ => words.push(arg),
        }
    }

    let mut builder = IngredientAnalyzer::builder();
    if !words.is_empty() {
        builder = builder.text(words.join(" "));
    }
    if let Some(path) = image_path {
        builder = builder.image_path(path);
    }

    match builder.build().await {
        Ok(outcome) => {
            if let ingredient_copilot::AnalysisOutcome::Fallback { reason, .. } = &outcome {
                debug!("Returning fallback analysis: {}", reason);
            }
            match serde_json::to_string_pretty(outcome.result()) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Failed to serialize analysis: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            if !matches!(e, AnalysisError::InputRejected(_)) {
                error!("Analysis error: {}", e);
            }
            let payload = ErrorPayload {
                error: e.to_string(),
            };
            println!(
                "{}",
                serde_json::to_string(&payload).unwrap_or_else(|_| format!("{{\"error\":\"{e}\"}}"))
            );
            ExitCode::FAILURE
        }
    }
}
