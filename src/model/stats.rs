use serde::Serialize;

use crate::model::thresholds::SubjectThreshold;

/// Count, mean and cutoff rates of one group of scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectStats {
    pub count: usize,
    pub average: f64,
    pub excellence_rate: f64,
    pub pass_rate: f64,
}

/// Fixed-shape running tally for one (group, subject).
///
/// Cutoffs are captured at construction so every score is classified against the same
/// thresholds; `low` is only consulted when set.
#[derive(Debug, Clone)]
pub struct RateAccumulator {
    excellent: f64,
    pass: f64,
    low: Option<f64>,
    count: usize,
    sum: f64,
    n_excellent: usize,
    n_pass: usize,
    n_low: usize,
}

impl RateAccumulator {
    pub fn new(threshold: &SubjectThreshold) -> Self {
        Self {
            excellent: threshold.excellent,
            pass: threshold.pass,
            low: None,
            count: 0,
            sum: 0.0,
            n_excellent: 0,
            n_pass: 0,
            n_low: 0,
        }
    }

    pub fn with_low_cutoff(mut self, low: f64) -> Self {
        self.low = Some(low);
        self
    }

    pub fn push(&mut self, score: f64) {
        self.count += 1;
        self.sum += score;
        if score >= self.excellent {
            self.n_excellent += 1;
        }
        if score >= self.pass {
            self.n_pass += 1;
        }
        if let Some(low) = self.low {
            if score < low {
                self.n_low += 1;
            }
        }
    }

    /// `None` when nothing was pushed.
    pub fn finish(&self) -> Option<SubjectStats> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(SubjectStats {
            count: self.count,
            average: self.sum / n,
            excellence_rate: self.n_excellent as f64 / n,
            pass_rate: self.n_pass as f64 / n,
        })
    }

    pub fn low_rate(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.n_low as f64 / self.count as f64)
    }
}

pub fn ratio_or_zero(value: f64, max: f64) -> f64 {
    if max == 0.0 { 0.0 } else { value / max }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/stats.rs"]
mod tests;
