use std::collections::BTreeMap;

use crate::model::record::{Period, ScoreRecord};

pub const TARGET_SCHOOL: &str = "Shiyan";

pub const SUBJECTS: [&str; 3] = ["chinese", "math", "english"];
pub const CLASSES: [&str; 2] = ["701", "702"];
pub const STUDENTS_PER_CLASS: usize = 20;

const SCORE_MIN: f64 = 35.0;
const SCORE_MAX: f64 = 100.0;

struct SchoolDef {
    name: &'static str,
    prefix: &'static str,
    base: [f64; 3],
}

const SCHOOLS: [SchoolDef; 3] = [
    SchoolDef {
        name: TARGET_SCHOOL,
        prefix: "SY",
        base: [81.0, 78.0, 79.0],
    },
    SchoolDef {
        name: "Chengguan",
        prefix: "CG",
        base: [83.0, 81.0, 82.0],
    },
    SchoolDef {
        name: "Guangyi",
        prefix: "GY",
        base: [79.0, 76.0, 77.0],
    },
];

fn period_shift(period: Period) -> [f64; 3] {
    match period {
        Period::Midterm => [0.0, 0.0, 0.0],
        Period::Final => [1.8, 4.2, 2.6],
    }
}

// Only the target school carries class effects; 701 is the strong math class.
fn class_shift(period: Period, class_idx: usize) -> [f64; 3] {
    match (period, class_idx) {
        (Period::Midterm, 0) => [0.8, 2.0, 1.2],
        (Period::Midterm, _) => [-0.2, -0.5, -0.1],
        (Period::Final, 0) => [1.5, 6.5, 2.4],
        (Period::Final, _) => [0.2, 0.8, 0.5],
    }
}

fn noise(student: usize, class_idx: usize) -> f64 {
    ((student * 7 + class_idx * 11) % 13) as f64 - 6.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Deterministic cohort: every school × class × student × subject for one period.
pub fn make_exam_data(period: Period) -> Vec<ScoreRecord> {
    let mut out = Vec::with_capacity(SCHOOLS.len() * CLASSES.len() * STUDENTS_PER_CLASS);
    let exam = period_shift(period);

    for school in &SCHOOLS {
        for (class_idx, class) in CLASSES.iter().enumerate() {
            let shift = class_shift(period, class_idx);
            for student in 1..=STUDENTS_PER_CLASS {
                let mut scores = BTreeMap::new();
                for (s, subject) in SUBJECTS.iter().enumerate() {
                    let mut value = school.base[s] + noise(student, class_idx);
                    if school.name == TARGET_SCHOOL {
                        value += shift[s];
                    }
                    value += exam[s];
                    let value = round1(value).clamp(SCORE_MIN, SCORE_MAX);
                    scores.insert(subject.to_string(), value);
                }
                out.push(ScoreRecord {
                    id: format!("{}{}{:02}", school.prefix, class, student),
                    school: school.name.to_string(),
                    class: class.to_string(),
                    scores,
                });
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/synth.rs"]
mod tests;
