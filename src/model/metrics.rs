use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::stats::SubjectStats;
use crate::model::thresholds::{SCORE_BASE, SCORE_W_EXC, SCORE_W_LOW, SCORE_W_PASS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectMetric {
    #[serde(flatten)]
    pub stats: SubjectStats,
    pub rank_avg: usize,
    pub rank_exc: usize,
    pub rank_pass: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalMetric {
    #[serde(flatten)]
    pub stats: SubjectStats,
    pub composite_index: f64,
    pub composite_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolMetrics {
    pub subjects: BTreeMap<String, SubjectMetric>,
    pub total: TotalMetric,
}

pub type SchoolTable = BTreeMap<String, SchoolMetrics>;

#[derive(Debug, Clone, PartialEq)]
pub struct GradeBaseline {
    pub average: f64,
    pub excellent: f64,
    pub pass: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherMetric {
    pub classes: String,
    pub student_count: usize,
    pub average: f64,
    pub excellence_rate: f64,
    pub pass_rate: f64,
    pub low_rate: f64,
    pub contribution: f64,
    pub final_score: f64,
}

pub type TeacherTable = BTreeMap<String, BTreeMap<String, TeacherMetric>>;

pub fn final_score(contribution: f64, excellence_rate: f64, pass_rate: f64, low_rate: f64) -> f64 {
    SCORE_BASE + contribution + excellence_rate * SCORE_W_EXC + pass_rate * SCORE_W_PASS
        - low_rate * SCORE_W_LOW
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Teacher,
    School,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub name: String,
    pub kind: RowKind,
    pub average: f64,
    pub excellence_rate: f64,
    pub pass_rate: f64,
    pub rank_avg: usize,
    pub rank_exc: usize,
    pub rank_pass: usize,
}
