//! JSON-lines batch driver
//!
//! One `RawObservation` per input line, one result object per output line.
//! A bad line yields an error record; the rest of the batch still runs.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::logic::features::{CategoricalField, RawObservation};
use crate::logic::pipeline::Predictor;
use crate::logic::safety::SafetyLabel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BatchRecord {
    Prediction {
        line: usize,
        visibility: f64,
        label: SafetyLabel,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        unseen: Vec<CategoricalField>,
    },
    Failure {
        line: usize,
        error: String,
    },
}

pub fn run_batch<R: BufRead, W: Write>(
    predictor: &Predictor,
    input: R,
    mut output: W,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read input line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match predict_line(predictor, &line) {
            Ok((visibility, label, unseen)) => {
                summary.processed += 1;
                BatchRecord::Prediction { line: line_no, visibility, label, unseen }
            }
            Err(error) => {
                summary.failed += 1;
                log::warn!("Line {}: {}", line_no, error);
                BatchRecord::Failure { line: line_no, error }
            }
        };

        serde_json::to_writer(&mut output, &record).context("failed to write batch record")?;
        writeln!(output).context("failed to write batch record")?;
    }

    output.flush().context("failed to flush batch output")?;
    log::info!(
        "Batch complete: {} predicted, {} failed",
        summary.processed,
        summary.failed
    );

    Ok(summary)
}

fn predict_line(
    predictor: &Predictor,
    line: &str,
) -> std::result::Result<(f64, SafetyLabel, Vec<CategoricalField>), String> {
    let observation: RawObservation = serde_json::from_str(line)
        .map_err(|e| format!("invalid observation: {}", e))?;

    let prediction = predictor
        .predict(&observation.trimmed())
        .map_err(|e| e.to_string())?;

    Ok((prediction.visibility, prediction.label, prediction.unseen))
}
