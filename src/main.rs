//! Visibility Guard - Main Entry Point

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{bail, Context, Result};

use visibility_guard::api::{batch, cli};
use visibility_guard::constants::{self, APP_NAME, APP_VERSION, DEFAULT_LOG_FILTER};
use visibility_guard::logic::config::AppConfig;
use visibility_guard::logic::model::{load_model, load_schema, resolve_artifact_path};
use visibility_guard::logic::pipeline::Predictor;

const USAGE: &str = "\
Usage: visibility-guard [--batch <file|->]

  (no arguments)   interactive prompt
  --batch <file>   read JSON-lines observations from <file> (or - for stdin)
  -h, --help       show this help
  -V, --version    show version";

enum Mode {
    Interactive,
    Batch(String),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Mode>> {
    let mut mode = Mode::Interactive;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("visibility-guard {}", APP_VERSION);
                return Ok(None);
            }
            "--batch" => {
                let path = args.next().context("--batch requires a file path")?;
                mode = Mode::Batch(path);
            }
            other => bail!("unknown argument '{}'\n\n{}", other, USAGE),
        }
    }

    Ok(Some(mode))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    let Some(mode) = parse_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = AppConfig::from_env()?;
    log::info!("   Unseen categories: {:?}", config.unseen_policy);

    let schema_path = resolve_artifact_path(&config.schema_path);
    let schema = load_schema(&schema_path, config.schema_sha256.as_deref())
        .with_context(|| format!("cannot start without the training schema (set {})", constants::ENV_SCHEMA_PATH))?;

    let model_path = resolve_artifact_path(&config.model_path);
    let model = load_model(&model_path, config.model_sha256.as_deref(), &schema)
        .with_context(|| format!("cannot start without the model (set {})", constants::ENV_MODEL_PATH))?;
    log::debug!("Model metadata: {:?}", model.metadata);

    let predictor = Predictor::new(schema, model.oracle, config.unseen_policy)?;

    match mode {
        Mode::Interactive => {
            let summary = cli::run_interactive(&predictor, io::stdin().lock(), io::stdout().lock())
                .context("interactive session failed")?;
            log::info!(
                "Session ended: {} predictions, {} failures",
                summary.predictions,
                summary.failures
            );
        }
        Mode::Batch(path) if path == "-" => {
            batch::run_batch(&predictor, io::stdin().lock(), io::stdout().lock())?;
        }
        Mode::Batch(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open batch input {}", path))?;
            batch::run_batch(&predictor, BufReader::new(file), io::stdout().lock())?;
        }
    }

    match serde_json::to_string(&predictor.status()) {
        Ok(status) => log::info!("Engine status: {}", status),
        Err(e) => log::warn!("Failed to serialize engine status: {}", e),
    }

    Ok(())
}
