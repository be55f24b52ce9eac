use crate::model::metrics::{RankedRow, RowKind, SchoolTable, TeacherTable};
use crate::model::rank::rank_descending;
use crate::pipeline::AggregateError;

/// Teachers of `subject` ranked together with every school except `exclude_school`.
///
/// The excluded school is represented by its own teachers, so its aggregate row is left out.
/// Ranks are assigned by row position, not by name, so a teacher sharing a school's name still
/// gets its own ranks.
pub fn rank_across_population(
    teachers: &TeacherTable,
    schools: &SchoolTable,
    subject: &str,
    exclude_school: &str,
) -> Result<Vec<RankedRow>, AggregateError> {
    let mut rows = Vec::new();

    for (teacher, by_subject) in teachers {
        if let Some(m) = by_subject.get(subject) {
            rows.push(RankedRow {
                name: teacher.clone(),
                kind: RowKind::Teacher,
                average: m.average,
                excellence_rate: m.excellence_rate,
                pass_rate: m.pass_rate,
                rank_avg: 0,
                rank_exc: 0,
                rank_pass: 0,
            });
        }
    }

    for (school, metrics) in schools {
        if school == exclude_school {
            continue;
        }
        let m = metrics
            .subjects
            .get(subject)
            .ok_or_else(|| AggregateError::UnknownSubject {
                subject: subject.to_string(),
            })?;
        rows.push(RankedRow {
            name: school.clone(),
            kind: RowKind::School,
            average: m.stats.average,
            excellence_rate: m.stats.excellence_rate,
            pass_rate: m.stats.pass_rate,
            rank_avg: 0,
            rank_exc: 0,
            rank_pass: 0,
        });
    }

    let by_avg = rank_descending(&rows, |r| r.average, |r| r.name.as_str());
    let by_exc = rank_descending(&rows, |r| r.excellence_rate, |r| r.name.as_str());
    let by_pass = rank_descending(&rows, |r| r.pass_rate, |r| r.name.as_str());

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank_avg = by_avg[i];
        row.rank_exc = by_exc[i];
        row.rank_pass = by_pass[i];
    }

    Ok(rows)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_rank.rs"]
mod tests;
