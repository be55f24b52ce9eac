use serde::Serialize;

use crate::input::lookup::ScenarioResult;
use crate::model::metrics::{RankedRow, SchoolTable, TeacherTable};
use crate::pipeline::PeriodOutcome;
use crate::pipeline::stage4_validate::Validation;
use crate::report::{format_pct, pass_fraction};

#[derive(Debug, Serialize)]
pub struct ComparisonDump<'a> {
    pub tool: &'a str,
    pub school: &'a str,
    pub teacher: &'a str,
    pub subject: &'a str,
    pub midterm_school: &'a SchoolTable,
    pub final_school: &'a SchoolTable,
    pub midterm_teacher: &'a TeacherTable,
    pub final_teacher: &'a TeacherTable,
    pub midterm_ranking: &'a [RankedRow],
    pub final_ranking: &'a [RankedRow],
    pub validations: &'a [Validation],
}

impl<'a> ComparisonDump<'a> {
    pub fn new(
        before: &'a PeriodOutcome,
        after: &'a PeriodOutcome,
        school: &'a str,
        teacher: &'a str,
        subject: &'a str,
        validations: &'a [Validation],
    ) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            school,
            teacher,
            subject,
            midterm_school: &before.schools,
            final_school: &after.schools,
            midterm_teacher: &before.teachers,
            final_teacher: &after.teachers,
            midterm_ranking: &before.ranking,
            final_ranking: &after.ranking,
            validations,
        }
    }
}

pub fn render_comparison_json(dump: &ComparisonDump<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dump)
}

#[derive(Debug, Serialize)]
pub struct LookupSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: String,
}

#[derive(Debug, Serialize)]
pub struct LookupDump<'a> {
    pub summary: LookupSummary,
    pub cases: &'a [ScenarioResult],
}

pub fn render_lookup_json(results: &[ScenarioResult]) -> Result<String, serde_json::Error> {
    let passed = results.iter().filter(|r| r.pass).count();
    let dump = LookupDump {
        summary: LookupSummary {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            pass_rate: format_pct(pass_fraction(passed, results.len())),
        },
        cases: results,
    };
    serde_json::to_string_pretty(&dump)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
