use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::model::metrics::{GradeBaseline, TeacherMetric, TeacherTable, final_score};
use crate::model::record::ScoreRecord;
use crate::model::stats::RateAccumulator;
use crate::model::thresholds::{ExamConfig, LOW_CUTOFF_RATIO, TeacherAssignment};
use crate::pipeline::AggregateError;

struct TeacherAccumulator<'a> {
    classes: BTreeSet<&'a str>,
    rates: RateAccumulator,
}

/// Per-subject baseline over every student of `school`.
pub fn grade_baselines(
    students: &[&ScoreRecord],
    school: &str,
    config: &ExamConfig,
) -> Result<BTreeMap<String, GradeBaseline>, AggregateError> {
    if students.is_empty() {
        return Err(AggregateError::empty(format!("school {school}")));
    }

    let mut out = BTreeMap::new();
    for threshold in &config.subject_thresholds {
        let mut acc = RateAccumulator::new(threshold);
        for s in students {
            let score = s
                .score(&threshold.subject)
                .ok_or_else(|| AggregateError::MissingSubjectScore {
                    record: s.id.clone(),
                    subject: threshold.subject.clone(),
                })?;
            acc.push(score);
        }
        let stats = acc
            .finish()
            .ok_or_else(|| AggregateError::empty(format!("school {school}")))?;
        out.insert(
            threshold.subject.clone(),
            GradeBaseline {
                average: stats.average,
                excellent: threshold.excellent,
                pass: threshold.pass,
                low: threshold.pass * LOW_CUTOFF_RATIO,
            },
        );
    }
    Ok(out)
}

/// Teacher metrics for `target_school`, scored against that school's grade baseline.
pub fn analyze_teachers(
    records: &[ScoreRecord],
    target_school: &str,
    assignments: &[TeacherAssignment],
    config: &ExamConfig,
) -> Result<TeacherTable, AggregateError> {
    let students = records
        .iter()
        .filter(|r| r.school == target_school)
        .collect::<Vec<_>>();
    let baselines = grade_baselines(&students, target_school, config)?;

    // Each (class, subject) belongs to one teacher; a repeated row adds no students.
    let mut owners: BTreeMap<(&str, &str), &str> = BTreeMap::new();
    let mut groups: BTreeMap<(&str, &str), TeacherAccumulator<'_>> = BTreeMap::new();
    for a in assignments {
        match owners.get(&(a.class.as_str(), a.subject.as_str())) {
            Some(&owner) if owner == a.teacher => continue,
            Some(&owner) => {
                return Err(AggregateError::ConflictingAssignment {
                    class: a.class.clone(),
                    subject: a.subject.clone(),
                    first: owner.to_string(),
                    second: a.teacher.clone(),
                });
            }
            None => {
                owners.insert((a.class.as_str(), a.subject.as_str()), a.teacher.as_str());
            }
        }

        let baseline = baselines
            .get(&a.subject)
            .ok_or_else(|| AggregateError::UnknownSubject {
                subject: a.subject.clone(),
            })?;
        let threshold = config
            .threshold(&a.subject)
            .ok_or_else(|| AggregateError::UnknownSubject {
                subject: a.subject.clone(),
            })?;

        let acc = groups
            .entry((a.teacher.as_str(), a.subject.as_str()))
            .or_insert_with(|| TeacherAccumulator {
                classes: BTreeSet::new(),
                rates: RateAccumulator::new(threshold).with_low_cutoff(baseline.low),
            });
        acc.classes.insert(a.class.as_str());

        let mut matched = 0usize;
        for s in students.iter().filter(|s| s.class == a.class) {
            if let Some(score) = s.score(&a.subject) {
                acc.rates.push(score);
                matched += 1;
            }
        }
        if matched == 0 {
            return Err(AggregateError::MissingAssignment {
                class: a.class.clone(),
                subject: a.subject.clone(),
            });
        }
    }
    debug!(
        school = target_school,
        students = students.len(),
        groups = groups.len(),
        "teacher accumulators filled"
    );

    let mut out = TeacherTable::new();
    for ((teacher, subject), acc) in groups {
        let scope = || AggregateError::empty(format!("teacher {teacher} / {subject}"));
        let stats = acc.rates.finish().ok_or_else(scope)?;
        let low_rate = acc.rates.low_rate().ok_or_else(scope)?;
        let contribution = stats.average - baselines[subject].average;

        let metric = TeacherMetric {
            classes: acc.classes.into_iter().collect::<Vec<_>>().join(","),
            student_count: stats.count,
            average: stats.average,
            excellence_rate: stats.excellence_rate,
            pass_rate: stats.pass_rate,
            low_rate,
            contribution,
            final_score: final_score(
                contribution,
                stats.excellence_rate,
                stats.pass_rate,
                low_rate,
            ),
        };
        out.entry(teacher.to_string())
            .or_default()
            .insert(subject.to_string(), metric);
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_teacher.rs"]
mod tests;
