use super::*;
use crate::input::synth::make_exam_data;
use crate::model::record::Period;

fn record(id: &str, school: &str, class: &str, scores: [f64; 3]) -> ScoreRecord {
    let mut map = BTreeMap::new();
    for (subject, v) in ["chinese", "math", "english"].into_iter().zip(scores) {
        map.insert(subject.to_string(), v);
    }
    ScoreRecord {
        id: id.to_string(),
        school: school.to_string(),
        class: class.to_string(),
        scores: map,
    }
}

// 3 schools × 2 classes × 20 students; "A" sits uniformly `lift` above "B".
fn three_school_population(lift: f64) -> Vec<ScoreRecord> {
    let mut out = Vec::new();
    for (school, offset) in [("A", lift), ("B", 0.0), ("C", -3.0)] {
        for class in ["701", "702"] {
            for i in 0..20 {
                let base = 70.0 + (i % 7) as f64 * 3.0;
                out.push(record(
                    &format!("{school}{class}{i:02}"),
                    school,
                    class,
                    [base + offset, base + 1.0 + offset, base - 1.0 + offset],
                ));
            }
        }
    }
    out
}

#[test]
fn test_rates_in_unit_range() {
    let config = ExamConfig::default_v1();
    for period in [Period::Midterm, Period::Final] {
        let table = aggregate_school_metrics(&make_exam_data(period), &config).unwrap();
        for metrics in table.values() {
            for m in metrics.subjects.values() {
                assert!((0.0..=1.0).contains(&m.stats.excellence_rate));
                assert!((0.0..=1.0).contains(&m.stats.pass_rate));
            }
            assert!((0.0..=1.0).contains(&metrics.total.stats.excellence_rate));
            assert!((0.0..=1.0).contains(&metrics.total.stats.pass_rate));
            assert!((0.0..=200.0).contains(&metrics.total.composite_index));
        }
    }
}

#[test]
fn test_total_ranks_are_permutation() {
    let config = ExamConfig::default_v1();
    let table = aggregate_school_metrics(&make_exam_data(Period::Final), &config).unwrap();
    let mut ranks = table
        .values()
        .map(|m| m.total.composite_rank)
        .collect::<Vec<_>>();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);

    for subject in config.subjects() {
        let picks: [fn(&SubjectMetric) -> usize; 3] =
            [|m| m.rank_avg, |m| m.rank_exc, |m| m.rank_pass];
        for pick in picks {
            let mut ranks = table
                .values()
                .map(|m| pick(&m.subjects[subject]))
                .collect::<Vec<_>>();
            ranks.sort_unstable();
            assert_eq!(ranks, vec![1, 2, 3]);
        }
    }
}

#[test]
fn test_demo_final_standings() {
    let config = ExamConfig::default_v1();
    let table = aggregate_school_metrics(&make_exam_data(Period::Final), &config).unwrap();
    let cg = &table["Chengguan"].total;
    assert_eq!(cg.composite_rank, 1);
    assert!((cg.composite_index - 200.0).abs() < 1e-9);
    assert_eq!(table["Shiyan"].total.composite_rank, 2);
    assert_eq!(table["Guangyi"].total.composite_rank, 3);
    assert_eq!(table["Shiyan"].subjects["math"].rank_avg, 1);
    assert_eq!(table["Shiyan"].total.stats.count, 40);
}

#[test]
fn test_idempotent_bits() {
    let config = ExamConfig::default_v1();
    let data = make_exam_data(Period::Midterm);
    let a = aggregate_school_metrics(&data, &config).unwrap();
    let b = aggregate_school_metrics(&data, &config).unwrap();
    assert_eq!(a, b);
    for (school, m) in &a {
        let other = &b[school];
        assert_eq!(
            m.total.composite_index.to_bits(),
            other.total.composite_index.to_bits()
        );
        assert_eq!(
            m.total.stats.average.to_bits(),
            other.total.stats.average.to_bits()
        );
    }
}

#[test]
fn test_uniform_lift_ranks_higher() {
    let config = ExamConfig::default_v1();
    let table = aggregate_school_metrics(&three_school_population(5.0), &config).unwrap();
    let a = &table["A"].total;
    let b = &table["B"].total;
    assert!(a.composite_rank <= b.composite_rank);
    assert!(a.composite_index >= b.composite_index);
    assert!(a.stats.average > b.stats.average);
}

#[test]
fn test_monotonic_subject_average() {
    let config = ExamConfig::default_v1();
    let base = three_school_population(0.0);
    let before = aggregate_school_metrics(&base, &config).unwrap();

    let lifted = base
        .into_iter()
        .map(|mut r| {
            if r.school == "C" {
                if let Some(v) = r.scores.get_mut("math") {
                    *v += 2.5;
                }
            }
            r
        })
        .collect::<Vec<_>>();
    let after = aggregate_school_metrics(&lifted, &config).unwrap();

    let b = &before["C"].subjects["math"];
    let a = &after["C"].subjects["math"];
    assert!(a.stats.average > b.stats.average);
    assert!(a.rank_avg <= b.rank_avg);
}

#[test]
fn test_zero_max_excellence_gives_zero_term() {
    let config = ExamConfig::default_v1();
    let records = vec![
        record("a1", "A", "701", [80.0, 80.0, 80.0]),
        record("b1", "B", "701", [60.0, 60.0, 60.0]),
    ];
    let table = aggregate_school_metrics(&records, &config).unwrap();
    let a = &table["A"].total;
    let b = &table["B"].total;
    assert_eq!(a.stats.excellence_rate, 0.0);
    // A: avg 240/240 -> 60, exc 0, pass 1/1 -> 70.
    assert!((a.composite_index - 130.0).abs() < 1e-9);
    // B: avg 180/240 -> 45, exc 0, pass 0.
    assert!((b.composite_index - 45.0).abs() < 1e-9);
    assert_eq!(a.composite_rank, 1);
}

#[test]
fn test_all_zero_maxima_do_not_divide() {
    let config = ExamConfig::default_v1();
    let records = vec![record("a1", "A", "701", [0.0, 0.0, 0.0])];
    let table = aggregate_school_metrics(&records, &config).unwrap();
    assert_eq!(table["A"].total.composite_index, 0.0);
    assert!(!table["A"].total.composite_index.is_nan());
}

#[test]
fn test_exact_ties_rank_by_school_name() {
    let config = ExamConfig::default_v1();
    let records = vec![
        record("z1", "Zeta", "701", [80.0, 80.0, 80.0]),
        record("a1", "Alpha", "701", [80.0, 80.0, 80.0]),
    ];
    let table = aggregate_school_metrics(&records, &config).unwrap();
    assert_eq!(table["Alpha"].total.composite_rank, 1);
    assert_eq!(table["Zeta"].total.composite_rank, 2);
    assert_eq!(table["Alpha"].subjects["math"].rank_avg, 1);
}

#[test]
fn test_empty_population() {
    let config = ExamConfig::default_v1();
    let err = aggregate_school_metrics(&[], &config).unwrap_err();
    assert!(matches!(err, AggregateError::EmptyPopulation { .. }));
}

#[test]
fn test_missing_subject_score() {
    let config = ExamConfig::default_v1();
    let mut r = record("x1", "A", "701", [80.0, 80.0, 80.0]);
    r.scores.remove("english");
    let err = aggregate_school_metrics(&[r], &config).unwrap_err();
    match err {
        AggregateError::MissingSubjectScore { record, subject } => {
            assert_eq!(record, "x1");
            assert_eq!(subject, "english");
        }
        other => panic!("unexpected error: {other}"),
    }
}
