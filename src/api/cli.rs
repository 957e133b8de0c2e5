//! Interactive driver
//!
//! Prompts for the four conditions, prints the prediction, asks whether to
//! continue. Anything other than `y` (or end of input) ends the session.

use std::io::{self, BufRead, Write};

use crate::constants::APP_NAME;
use crate::logic::features::RawObservation;
use crate::logic::pipeline::Predictor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub predictions: usize,
    pub failures: usize,
}

const PROMPTS: [&str; 4] = [
    "Time of Day (Morning/Evening/Night): ",
    "Area (Urban/Rural): ",
    "Weather (Clear/Rain/Fog/etc): ",
    "Road Type (Highway/City/Rural): ",
];

pub fn run_interactive<R: BufRead, W: Write>(
    predictor: &Predictor,
    mut input: R,
    mut output: W,
) -> io::Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    writeln!(output, "\n🚗 {}", APP_NAME)?;
    writeln!(output, "----------------------------------")?;

    loop {
        writeln!(output, "\nEnter driving conditions:")?;

        let mut answers = Vec::with_capacity(PROMPTS.len());
        for label in PROMPTS {
            match prompt(&mut input, &mut output, label)? {
                Some(answer) => answers.push(answer),
                None => return farewell(&mut output, summary),
            }
        }

        let observation = RawObservation::new(
            answers[0].as_str(),
            answers[1].as_str(),
            answers[2].as_str(),
            answers[3].as_str(),
        );

        match predictor.predict(&observation) {
            Ok(prediction) => {
                summary.predictions += 1;
                writeln!(output, "\n📊 Prediction Result")?;
                writeln!(output, "-------------------")?;
                writeln!(output, "Predicted Visibility Level: {:.2}", prediction.visibility)?;
                writeln!(output, "Driving Decision: {}", prediction.label.recommendation())?;
                for field in &prediction.unseen {
                    writeln!(
                        output,
                        "Note: '{}' is not a known {} value, treated as the baseline",
                        observation.value(*field),
                        field
                    )?;
                }
            }
            Err(e) => {
                summary.failures += 1;
                log::error!("Prediction failed: {}", e);
                writeln!(output, "\n❌ Prediction failed: {}", e)?;
            }
        }

        let choice = prompt(&mut input, &mut output, "\nDo you want to continue? (y/n): ")?;
        match choice {
            Some(c) if c.to_lowercase() == "y" => continue,
            _ => return farewell(&mut output, summary),
        }
    }
}

/// Write `label`, read one trimmed line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn farewell<W: Write>(output: &mut W, summary: SessionSummary) -> io::Result<SessionSummary> {
    writeln!(output, "\n✅ Exiting {}.", APP_NAME)?;
    writeln!(output, "Stay Safe! 🚦")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{TrainingSchema, UnseenCategoryPolicy};
    use crate::logic::model::FnOracle;
    use std::io::Cursor;

    fn predictor() -> Predictor {
        let schema = TrainingSchema::from_columns([
            "Time of Day_Night",
            "Weather Conditions_Fog",
            "Road Type_Highway",
        ])
        .unwrap();
        // Night and fog both cut visibility
        let oracle = FnOracle::new("stub", 3, |x| 85.0 - 20.0 * x[0] - 40.0 * x[1]);
        Predictor::new(schema, Box::new(oracle), UnseenCategoryPolicy::Baseline).unwrap()
    }

    fn run(script: &str) -> (SessionSummary, String) {
        let mut out = Vec::new();
        let summary = run_interactive(&predictor(), Cursor::new(script.as_bytes()), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_round_then_exit() {
        let (summary, out) = run("Morning\nUrban\nClear\nHighway\nn\n");

        assert_eq!(summary, SessionSummary { predictions: 1, failures: 0 });
        assert!(out.contains("Predicted Visibility Level: 85.00"));
        assert!(out.contains("SAFE to drive"));
        assert!(out.contains("Stay Safe!"));
    }

    #[test]
    fn test_continue_with_uppercase_y() {
        let (summary, out) = run("Night\nUrban\nFog\nCity\n Y \nMorning\nRural\nClear\nHighway\nno\n");

        assert_eq!(summary.predictions, 2);
        assert!(out.contains("Predicted Visibility Level: 25.00"));
        assert!(out.contains("DANGEROUS"));
    }

    #[test]
    fn test_input_is_trimmed() {
        let (_, out) = run("  Night  \nUrban\n Fog\nHighway\nn\n");
        assert!(out.contains("Predicted Visibility Level: 25.00"));
    }

    #[test]
    fn test_end_of_input_mid_prompt_exits_cleanly() {
        let (summary, out) = run("Night\nUrban\n");

        assert_eq!(summary.predictions, 0);
        assert!(out.contains("Exiting"));
    }

    #[test]
    fn test_unseen_value_is_reported() {
        let (_, out) = run("Dusk\nUrban\nClear\nHighway\nn\n");
        assert!(out.contains("'Dusk' is not a known Time of Day value"));
    }
}
