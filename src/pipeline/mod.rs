use crate::input::RecordStore;
use crate::model::metrics::{RankedRow, SchoolTable, TeacherTable};
use crate::model::record::Period;
use crate::model::thresholds::ExamConfig;

pub mod stage1_school;
pub mod stage2_teacher;
pub mod stage3_rank;
pub mod stage4_validate;
pub mod stage5_report;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("empty population: {scope}")]
    EmptyPopulation { scope: String },
    #[error("no students for class {class} in subject {subject}")]
    MissingAssignment { class: String, subject: String },
    #[error("class {class} / {subject} is assigned to both {first} and {second}")]
    ConflictingAssignment {
        class: String,
        subject: String,
        first: String,
        second: String,
    },
    #[error("record {record} has no score for subject {subject}")]
    MissingSubjectScore { record: String, subject: String },
    #[error("unknown subject: {subject}")]
    UnknownSubject { subject: String },
    #[error("unknown {kind}: {name}")]
    UnknownTarget { kind: &'static str, name: String },
}

impl AggregateError {
    pub fn empty(scope: impl Into<String>) -> Self {
        AggregateError::EmptyPopulation {
            scope: scope.into(),
        }
    }
}

/// Everything computed for one exam period.
#[derive(Debug, Clone)]
pub struct PeriodOutcome {
    pub period: Period,
    pub schools: SchoolTable,
    pub teachers: TeacherTable,
    pub ranking: Vec<RankedRow>,
}

/// Runs the school, teacher and cross-population stages over one period, in that order.
pub fn run_period(
    store: &RecordStore,
    config: &ExamConfig,
    target_school: &str,
    subject: &str,
) -> Result<PeriodOutcome, AggregateError> {
    let schools = stage1_school::aggregate_school_metrics(store.records(), config)?;
    let teachers = stage2_teacher::analyze_teachers(
        store.records(),
        target_school,
        &config.teacher_assignments,
        config,
    )?;
    let ranking = stage3_rank::rank_across_population(&teachers, &schools, subject, target_school)?;

    tracing::debug!(
        period = store.period().label(),
        schools = schools.len(),
        teachers = teachers.len(),
        ranked_rows = ranking.len(),
        "period aggregated"
    );

    Ok(PeriodOutcome {
        period: store.period(),
        schools,
        teachers,
        ranking,
    })
}
