use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::input::lookup::ScenarioResult;
use crate::model::metrics::{RankedRow, RowKind};
use crate::pipeline::stage4_validate::{Validation, school_total, teacher_metric};
use crate::pipeline::{AggregateError, PeriodOutcome};
use crate::report::json::{ComparisonDump, render_comparison_json, render_lookup_json};
use crate::report::text::{render_comparison_markdown, render_lookup_markdown};
use crate::report::{ComparisonContext, Pair, ReportError};

pub const COMPARISON_REPORT: &str = "comparison_report.md";
pub const COMPARISON_DETAILS: &str = "comparison_details.json";
pub const LOOKUP_REPORT: &str = "lookup_report.md";
pub const LOOKUP_DETAILS: &str = "lookup_details.json";

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub before: &'a PeriodOutcome,
    pub after: &'a PeriodOutcome,
    pub school: &'a str,
    pub teacher: &'a str,
    pub subject: &'a str,
    pub validations: &'a [Validation],
}

pub fn write_reports(input: &Stage5Input<'_>, out_dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(out_dir)?;

    let ctx = build_report_context(input)?;
    let report_path = out_dir.join(COMPARISON_REPORT);
    write_text(&report_path, &render_comparison_markdown(&ctx))?;

    let dump = ComparisonDump::new(
        input.before,
        input.after,
        input.school,
        input.teacher,
        input.subject,
        input.validations,
    );
    let details_path = out_dir.join(COMPARISON_DETAILS);
    write_text(&details_path, &render_comparison_json(&dump)?)?;

    Ok(vec![report_path, details_path])
}

pub fn write_lookup_reports(
    results: &[ScenarioResult],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(out_dir)?;

    let report_path = out_dir.join(LOOKUP_REPORT);
    write_text(&report_path, &render_lookup_markdown(results))?;

    let details_path = out_dir.join(LOOKUP_DETAILS);
    write_text(&details_path, &render_lookup_json(results)?)?;

    Ok(vec![report_path, details_path])
}

pub fn build_report_context(input: &Stage5Input<'_>) -> Result<ComparisonContext, AggregateError> {
    let subject_metric = |outcome: &PeriodOutcome| {
        outcome
            .schools
            .get(input.school)
            .and_then(|m| m.subjects.get(input.subject))
            .cloned()
            .ok_or_else(|| AggregateError::UnknownSubject {
                subject: input.subject.to_string(),
            })
    };
    let teacher_row = |outcome: &PeriodOutcome| {
        outcome
            .ranking
            .iter()
            .find(|r| r.kind == RowKind::Teacher && r.name == input.teacher)
            .cloned()
            .ok_or_else(|| AggregateError::UnknownTarget {
                kind: "ranked teacher",
                name: input.teacher.to_string(),
            })
    };

    let before_row = teacher_row(input.before)?;
    let after_row = teacher_row(input.after)?;
    let rank_ties = Pair::new(
        tied_ranks(&input.before.ranking, &before_row),
        tied_ranks(&input.after.ranking, &after_row),
    );

    Ok(ComparisonContext {
        school: input.school.to_string(),
        teacher: input.teacher.to_string(),
        subject: input.subject.to_string(),
        school_total: Pair::new(
            school_total(input.before, input.school)?.clone(),
            school_total(input.after, input.school)?.clone(),
        ),
        school_subject: Pair::new(subject_metric(input.before)?, subject_metric(input.after)?),
        teacher_metric: Pair::new(
            teacher_metric(input.before, input.teacher, input.subject)?.clone(),
            teacher_metric(input.after, input.teacher, input.subject)?.clone(),
        ),
        teacher_rank: Pair::new(before_row, after_row),
        rank_ties,
        validations: input.validations.to_vec(),
    })
}

/// Flags, in average / excellence / pass order, whether another row holds exactly `row`'s value.
pub fn tied_ranks(ranking: &[RankedRow], row: &RankedRow) -> [bool; 3] {
    let shares = |value: fn(&RankedRow) -> f64| {
        ranking.iter().filter(|r| value(r) == value(row)).count() > 1
    };
    [
        shares(|r| r.average),
        shares(|r| r.excellence_rate),
        shares(|r| r.pass_rate),
    ]
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
