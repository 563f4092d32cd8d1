//! Offline triage of stored vision-model output.
//!
//! ```text
//! sat_triage_cli evaluate response.txt
//! cat response.txt | sat_triage_cli evaluate --log-line scene.png
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sat_triage::{TriageConfig, TriageEngine};

#[derive(Parser)]
#[command(name = "sat_triage_cli", about = "Re-triage stored vision-model responses")]
struct Cli {
    /// YAML file overriding urgency and policy thresholds
    #[arg(long, global = true, env = "TRIAGE_RULES_PATH")]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate raw model text and print the decision
    Evaluate {
        /// File holding the raw model text; stdin when omitted
        input: Option<PathBuf>,

        /// Print the flattened result-log line for this file name instead of JSON
        #[arg(long, value_name = "FILENAME")]
        log_line: Option<String>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.rules {
        Some(path) => TriageConfig::from_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => TriageConfig::default(),
    };
    let engine = TriageEngine::new(config);

    match cli.command {
        Command::Evaluate { input, log_line } => {
            let raw = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };

            let decision = match engine.evaluate(&raw) {
                Ok(decision) => decision,
                Err(e) => {
                    eprintln!("error: {}", e);
                    return Ok(ExitCode::from(2));
                }
            };

            match log_line {
                Some(filename) => println!("{}", decision.log_line(&filename)),
                None => println!("{}", serde_json::to_string_pretty(&decision)?),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
