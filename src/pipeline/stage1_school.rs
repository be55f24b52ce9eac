use std::collections::BTreeMap;

use tracing::debug;

use crate::model::metrics::{SchoolMetrics, SchoolTable, SubjectMetric, TotalMetric};
use crate::model::rank::rank_descending;
use crate::model::record::ScoreRecord;
use crate::model::stats::{RateAccumulator, SubjectStats, ratio_or_zero};
use crate::model::thresholds::{ExamConfig, INDEX_WEIGHT_AVG, INDEX_WEIGHT_EXC, INDEX_WEIGHT_PASS};
use crate::pipeline::AggregateError;

struct SchoolAccumulator {
    subjects: Vec<RateAccumulator>,
    total: RateAccumulator,
}

impl SchoolAccumulator {
    fn new(config: &ExamConfig) -> Self {
        Self {
            subjects: config
                .subject_thresholds
                .iter()
                .map(RateAccumulator::new)
                .collect(),
            total: RateAccumulator::new(&config.total_threshold()),
        }
    }
}

struct SchoolStats {
    subjects: Vec<SubjectStats>,
    total: SubjectStats,
}

/// Per-school subject and total metrics, composite index, and school ranks.
pub fn aggregate_school_metrics(
    records: &[ScoreRecord],
    config: &ExamConfig,
) -> Result<SchoolTable, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::empty("score records"));
    }

    let mut groups: BTreeMap<&str, SchoolAccumulator> = BTreeMap::new();
    for record in records {
        let acc = groups
            .entry(record.school.as_str())
            .or_insert_with(|| SchoolAccumulator::new(config));
        let mut total = 0.0;
        for (idx, subject) in config.subjects().enumerate() {
            let score = record
                .score(subject)
                .ok_or_else(|| AggregateError::MissingSubjectScore {
                    record: record.id.clone(),
                    subject: subject.to_string(),
                })?;
            acc.subjects[idx].push(score);
            total += score;
        }
        acc.total.push(total);
    }

    let mut names = Vec::with_capacity(groups.len());
    let mut stats = Vec::with_capacity(groups.len());
    for (school, acc) in &groups {
        let mut subjects = Vec::with_capacity(acc.subjects.len());
        for a in &acc.subjects {
            subjects.push(a.finish().ok_or_else(|| AggregateError::empty(*school))?);
        }
        let total = acc
            .total
            .finish()
            .ok_or_else(|| AggregateError::empty(*school))?;
        names.push(school.to_string());
        stats.push(SchoolStats { subjects, total });
    }
    debug!(schools = names.len(), "school accumulators finished");

    let indices = composite_indices(&stats);

    let rows = names
        .iter()
        .zip(indices.iter())
        .map(|(name, index)| (name.as_str(), *index))
        .collect::<Vec<_>>();
    let composite_ranks = rank_descending(&rows, |r| r.1, |r| r.0);

    let n_subjects = config.subject_thresholds.len();
    let mut subject_ranks = Vec::with_capacity(n_subjects);
    for s in 0..n_subjects {
        let rows = names
            .iter()
            .zip(stats.iter())
            .map(|(name, st)| (name.as_str(), st.subjects[s]))
            .collect::<Vec<_>>();
        subject_ranks.push((
            rank_descending(&rows, |r| r.1.average, |r| r.0),
            rank_descending(&rows, |r| r.1.excellence_rate, |r| r.0),
            rank_descending(&rows, |r| r.1.pass_rate, |r| r.0),
        ));
    }

    let mut out = SchoolTable::new();
    for (i, (name, st)) in names.into_iter().zip(stats).enumerate() {
        let mut subjects = BTreeMap::new();
        for (s, subject) in config.subjects().enumerate() {
            let (by_avg, by_exc, by_pass) = &subject_ranks[s];
            subjects.insert(
                subject.to_string(),
                SubjectMetric {
                    stats: st.subjects[s],
                    rank_avg: by_avg[i],
                    rank_exc: by_exc[i],
                    rank_pass: by_pass[i],
                },
            );
        }
        out.insert(
            name,
            SchoolMetrics {
                subjects,
                total: TotalMetric {
                    stats: st.total,
                    composite_index: indices[i],
                    composite_rank: composite_ranks[i],
                },
            },
        );
    }

    Ok(out)
}

fn composite_indices(stats: &[SchoolStats]) -> Vec<f64> {
    let mut max_avg = 0.0f64;
    let mut max_exc = 0.0f64;
    let mut max_pass = 0.0f64;
    for st in stats {
        max_avg = max_avg.max(st.total.average);
        max_exc = max_exc.max(st.total.excellence_rate);
        max_pass = max_pass.max(st.total.pass_rate);
    }

    stats
        .iter()
        .map(|st| composite_index(&st.total, max_avg, max_exc, max_pass))
        .collect()
}

/// "Two rates, one score": 60/70/70 points for average, excellence and pass relative to the best school.
pub fn composite_index(total: &SubjectStats, max_avg: f64, max_exc: f64, max_pass: f64) -> f64 {
    ratio_or_zero(total.average, max_avg) * INDEX_WEIGHT_AVG
        + ratio_or_zero(total.excellence_rate, max_exc) * INDEX_WEIGHT_EXC
        + ratio_or_zero(total.pass_rate, max_pass) * INDEX_WEIGHT_PASS
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_school.rs"]
mod tests;
