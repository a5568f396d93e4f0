//! Training file parsing
//!
//! One document per line, in either form:
//!
//! ```text
//! spam,ads<TAB>buy cheap pills now
//! {"text": "let's have lunch", "labels": ["ham"]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use serde::Deserialize;

use crate::error::{Result, WordBayesError};

/// A labeled document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub labels: Vec<String>,
}

/// Parse training data, failing on the first malformed line.
pub fn parse_training_data(content: &str) -> Result<Vec<TrainingExample>> {
    let mut examples = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let example = if line.trim_start().starts_with('{') {
            parse_json_line(line, line_no)?
        } else {
            parse_tsv_line(line, line_no)?
        };

        if example.labels.is_empty() {
            return Err(WordBayesError::InvalidTrainingLine {
                line: line_no,
                message: "no labels".to_string(),
            });
        }
        examples.push(example);
    }

    Ok(examples)
}

fn parse_json_line(line: &str, line_no: usize) -> Result<TrainingExample> {
    let mut example: TrainingExample =
        serde_json::from_str(line).map_err(|e| WordBayesError::InvalidTrainingLine {
            line: line_no,
            message: e.to_string(),
        })?;
    example.labels = clean_labels(example.labels.iter().map(String::as_str));
    Ok(example)
}

fn parse_tsv_line(line: &str, line_no: usize) -> Result<TrainingExample> {
    let (labels, text) = line
        .split_once('\t')
        .ok_or_else(|| WordBayesError::InvalidTrainingLine {
            line: line_no,
            message: "expected `labels<TAB>text`".to_string(),
        })?;

    Ok(TrainingExample {
        text: text.to_string(),
        labels: clean_labels(labels.split(',')),
    })
}

fn clean_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
