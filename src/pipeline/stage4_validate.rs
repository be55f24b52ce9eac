use serde::Serialize;
use tracing::warn;

use crate::model::metrics::{TeacherMetric, TotalMetric, final_score};
use crate::pipeline::{AggregateError, PeriodOutcome};

const FINAL_SCORE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub name: &'static str,
    pub ok: bool,
}

#[derive(Debug, Clone)]
pub struct Stage4Inputs<'a> {
    pub before: &'a PeriodOutcome,
    pub after: &'a PeriodOutcome,
    pub school: &'a str,
    pub teacher: &'a str,
    pub subject: &'a str,
    pub expected_students: usize,
}

pub fn teacher_metric<'a>(
    outcome: &'a PeriodOutcome,
    teacher: &str,
    subject: &str,
) -> Result<&'a TeacherMetric, AggregateError> {
    outcome
        .teachers
        .get(teacher)
        .and_then(|m| m.get(subject))
        .ok_or_else(|| AggregateError::UnknownTarget {
            kind: "teacher",
            name: format!("{teacher} / {subject}"),
        })
}

pub fn school_total<'a>(
    outcome: &'a PeriodOutcome,
    school: &str,
) -> Result<&'a TotalMetric, AggregateError> {
    outcome
        .schools
        .get(school)
        .map(|m| &m.total)
        .ok_or_else(|| AggregateError::UnknownTarget {
            kind: "school",
            name: school.to_string(),
        })
}

pub fn run_stage4(inputs: &Stage4Inputs<'_>) -> Result<Vec<Validation>, AggregateError> {
    let tb = teacher_metric(inputs.before, inputs.teacher, inputs.subject)?;
    let ta = teacher_metric(inputs.after, inputs.teacher, inputs.subject)?;
    let sb = school_total(inputs.before, inputs.school)?;
    let sa = school_total(inputs.after, inputs.school)?;

    let out = vec![
        Validation {
            name: "rate bounds",
            ok: rates_in_unit_range(tb) && rates_in_unit_range(ta),
        },
        Validation {
            name: "final score recomputation",
            ok: final_score_matches(tb) && final_score_matches(ta),
        },
        Validation {
            name: "student count consistency",
            ok: tb.student_count == ta.student_count
                && ta.student_count == inputs.expected_students,
        },
        Validation {
            name: "total average improved",
            ok: sa.stats.average > sb.stats.average,
        },
    ];

    for v in out.iter().filter(|v| !v.ok) {
        warn!(check = v.name, "validation failed");
    }

    Ok(out)
}

pub fn rates_in_unit_range(m: &TeacherMetric) -> bool {
    [m.excellence_rate, m.pass_rate, m.low_rate]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
}

pub fn final_score_matches(m: &TeacherMetric) -> bool {
    let recomputed = final_score(m.contribution, m.excellence_rate, m.pass_rate, m.low_rate);
    (m.final_score - recomputed).abs() < FINAL_SCORE_TOLERANCE
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_validate.rs"]
mod tests;
