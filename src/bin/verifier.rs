//! Message Template Verifier CLI
//!
//! Compares the current message template with the baseline ("master")
//! template and fails when the change is not acceptable in the chosen mode.
//!
//! Usage:
//!   template-verifier                       # both templates from configuration
//!   template-verifier CURRENT               # CURRENT against the configured baseline
//!   template-verifier BASELINE CURRENT      # two local files
//!
//! Exit status is 0 on PASS, 1 on FAIL and 2 when the check could not run.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use template_compat::{Checksum, CompatError, JsonSchemaDiffer, Mode, Report, ReportFormat, VerifierConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "template-verifier")]
#[command(about = "Check a message template change against the baseline template")]
struct Cli {
    /// [BASELINE] [CURRENT] template files
    #[arg(value_name = "FILE", num_args = 0..=2)]
    files: Vec<PathBuf>,

    /// Strictness mode (development or production)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format (text or json)
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = VerifierConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let (baseline_path, candidate_path) = resolve_inputs(&cli.files, &config)?;

    let format = cli.format.unwrap_or(config.report.format);

    let baseline_text = read_template(&baseline_path)?;
    let candidate_text = read_template(&candidate_path)?;

    // stdout carries nothing but the report itself in JSON mode
    let inputs = [
        input_line("base", &baseline_path, &baseline_text),
        input_line("current", &candidate_path, &candidate_text),
    ];
    for line in inputs {
        match format {
            ReportFormat::Text => println!("{}", line),
            ReportFormat::Json => eprintln!("{}", line),
        }
    }

    let baseline = JsonSchemaDiffer::parse(&baseline_text, "baseline")?;
    let candidate = JsonSchemaDiffer::parse(&candidate_text, "candidate")?;

    let mode = cli.mode.unwrap_or(config.verifier.mode);
    tracing::info!(%mode, "verifying template");

    let evaluation = config
        .policy()
        .evaluate(&JsonSchemaDiffer::new(), &baseline, &candidate, mode)?;

    let report = Report::new(&evaluation, &baseline_text, &candidate_text);
    let rendered = report.render(format, config.report.pretty)?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            println!("{}", report.header());
            println!("Report written to {}", path.display());
        }
        None => {
            print!("{}", rendered);
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(evaluation.accepted)
}

/// Pick baseline and candidate paths from the arguments, falling back to configuration
fn resolve_inputs(files: &[PathBuf], config: &VerifierConfig) -> Result<(PathBuf, PathBuf), CompatError> {
    let configured_baseline = || {
        config
            .verifier
            .baseline
            .clone()
            .ok_or(CompatError::MissingInput("baseline"))
    };

    match files {
        [baseline, candidate] => Ok((baseline.clone(), candidate.clone())),
        [candidate] => Ok((configured_baseline()?, candidate.clone())),
        _ => Ok((configured_baseline()?, config.verifier.candidate.clone())),
    }
}

fn input_line(label: &str, path: &Path, text: &str) -> String {
    format!("{}: {} ({})", label, path.display(), Checksum::of_text(text).short())
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}
