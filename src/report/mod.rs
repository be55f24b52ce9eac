pub mod json;
pub mod text;

use crate::model::metrics::{RankedRow, SubjectMetric, TeacherMetric, TotalMetric};
use crate::pipeline::AggregateError;
use crate::pipeline::stage4_validate::Validation;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// One indicator seen in both periods.
#[derive(Debug, Clone, Copy)]
pub struct Pair<T> {
    pub before: T,
    pub after: T,
}

impl<T> Pair<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonContext {
    pub school: String,
    pub teacher: String,
    pub subject: String,
    pub school_total: Pair<TotalMetric>,
    pub school_subject: Pair<SubjectMetric>,
    pub teacher_metric: Pair<TeacherMetric>,
    pub teacher_rank: Pair<RankedRow>,
    /// Per period, whether the teacher's average / excellence / pass value is shared by another row.
    pub rank_ties: Pair<[bool; 3]>,
    pub validations: Vec<Validation>,
}

pub fn format_f64_2(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_signed_2(v: f64) -> String {
    format!("{:+.2}", v)
}

pub fn format_pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn format_pp_delta(before: f64, after: f64) -> String {
    format!("{:+.1}pp", (after - before) * 100.0)
}

pub fn format_rank_delta(before: usize, after: usize) -> String {
    format!("{:+}", after as i64 - before as i64)
}

pub fn pass_fraction(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    }
}

pub fn pass_label(ok: bool) -> &'static str {
    if ok { "PASS" } else { "FAIL" }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
