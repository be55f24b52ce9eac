use serde::Serialize;

pub const INDEX_WEIGHT_AVG: f64 = 60.0;
pub const INDEX_WEIGHT_EXC: f64 = 70.0;
pub const INDEX_WEIGHT_PASS: f64 = 70.0;

pub const LOW_CUTOFF_RATIO: f64 = 0.6;

pub const SCORE_BASE: f64 = 30.0;
pub const SCORE_W_EXC: f64 = 30.0;
pub const SCORE_W_PASS: f64 = 30.0;
pub const SCORE_W_LOW: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectThreshold {
    pub subject: String,
    pub excellent: f64,
    pub pass: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherAssignment {
    pub class: String,
    pub subject: String,
    pub teacher: String,
}

/// Cutoffs and teaching assignments for one comparison run.
///
/// Subject order in `subject_thresholds` is the order subjects are tracked and rendered.
#[derive(Debug, Clone)]
pub struct ExamConfig {
    pub subject_thresholds: Vec<SubjectThreshold>,
    pub teacher_assignments: Vec<TeacherAssignment>,
}

impl ExamConfig {
    pub fn default_v1() -> Self {
        let subject_thresholds = ["chinese", "math", "english"]
            .into_iter()
            .map(|subject| SubjectThreshold {
                subject: subject.to_string(),
                excellent: 90.0,
                pass: 72.0,
            })
            .collect();

        let teacher_assignments = [
            ("701", "math", "Zhang"),
            ("702", "math", "Li"),
            ("701", "chinese", "Wang"),
            ("702", "chinese", "Zhao"),
            ("701", "english", "Chen"),
            ("702", "english", "Liu"),
        ]
        .into_iter()
        .map(|(class, subject, teacher)| TeacherAssignment {
            class: class.to_string(),
            subject: subject.to_string(),
            teacher: teacher.to_string(),
        })
        .collect();

        Self {
            subject_thresholds,
            teacher_assignments,
        }
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subject_thresholds.iter().map(|t| t.subject.as_str())
    }

    pub fn threshold(&self, subject: &str) -> Option<&SubjectThreshold> {
        self.subject_thresholds.iter().find(|t| t.subject == subject)
    }

    /// Cutoffs for the summed "total" pseudo-subject.
    pub fn total_threshold(&self) -> SubjectThreshold {
        let mut excellent = 0.0;
        let mut pass = 0.0;
        for t in &self.subject_thresholds {
            excellent += t.excellent;
            pass += t.pass;
        }
        SubjectThreshold {
            subject: TOTAL_SUBJECT.to_string(),
            excellent,
            pass,
        }
    }
}

pub const TOTAL_SUBJECT: &str = "total";

#[cfg(test)]
#[path = "../../tests/src_inline/model/thresholds.rs"]
mod tests;
