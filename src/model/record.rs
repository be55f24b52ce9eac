use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: String,
    pub school: String,
    pub class: String,
    pub scores: BTreeMap<String, f64>,
}

impl ScoreRecord {
    pub fn score(&self, subject: &str) -> Option<f64> {
        self.scores.get(subject).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Midterm,
    Final,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Midterm => "midterm",
            Period::Final => "final",
        }
    }
}
