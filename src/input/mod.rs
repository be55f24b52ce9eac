use std::collections::BTreeSet;

use tracing::info;

pub mod lookup;
pub mod synth;

use crate::model::record::{Period, ScoreRecord};
use synth::make_exam_data;

/// Score records of one exam period, in generation order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    period: Period,
    records: Vec<ScoreRecord>,
}

impl RecordStore {
    pub fn new(period: Period, records: Vec<ScoreRecord>) -> Self {
        Self { period, records }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schools(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.school.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct CohortBundle {
    pub midterm: RecordStore,
    pub final_exam: RecordStore,
}

pub fn load_synthetic_cohort() -> CohortBundle {
    let midterm = RecordStore::new(Period::Midterm, make_exam_data(Period::Midterm));
    let final_exam = RecordStore::new(Period::Final, make_exam_data(Period::Final));

    info!(
        midterm = midterm.len(),
        final_exam = final_exam.len(),
        schools = midterm.schools().len(),
        "generated synthetic cohort"
    );

    CohortBundle {
        midterm,
        final_exam,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
