//! # Prediction vector
//!
//! A [`Prediction`] is the raw per-label score vector produced by the
//! classifier. Records persist it as text in a bracketed, comma separated
//! form (`[0.01, 0.9, ...]`) so it stays readable in the database and can be
//! round-tripped through a hidden form field between `/predict` and
//! `/record/new`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VisionError};
use crate::labels::AnomalyLabel;

/// Per-label scores in model output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    scores: Vec<f32>,
}

impl Prediction {
    pub fn new(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Serialize to the format stored in `records.prediction`.
    pub fn to_record_string(&self) -> String {
        let items: Vec<String> = self.scores.iter().map(|s| s.to_string()).collect();
        format!("[{}]", items.join(", "))
    }

    /// Parse the format produced by [`Prediction::to_record_string`].
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| VisionError::Prediction(format!("missing brackets in {trimmed:?}")))?;

        if inner.trim().is_empty() {
            return Err(VisionError::Prediction("no scores".to_string()));
        }

        let scores = inner
            .split(',')
            .map(|item| {
                let item = item.trim();
                match item.parse::<f32>() {
                    Ok(score) if score.is_finite() => Ok(score),
                    _ => Err(VisionError::Prediction(format!("not a finite number: {item:?}"))),
                }
            })
            .collect::<Result<Vec<f32>>>()?;

        Ok(Self { scores })
    }

    /// Pair each label with its score. Scores past the last label are dropped.
    pub fn labelled(&self) -> Vec<(AnomalyLabel, f32)> {
        self.scores
            .iter()
            .enumerate()
            .map_while(|(i, &score)| AnomalyLabel::from_index(i).map(|label| (label, score)))
            .collect()
    }

    /// Highest scoring label.
    pub fn top(&self) -> Option<(AnomalyLabel, f32)> {
        self.labelled()
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_record_string())
    }
}
