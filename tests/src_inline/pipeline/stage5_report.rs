use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::input::load_synthetic_cohort;
use crate::input::lookup::run_builtin_scenarios;
use crate::input::synth::{STUDENTS_PER_CLASS, TARGET_SCHOOL};
use crate::model::thresholds::ExamConfig;
use crate::pipeline::run_period;
use crate::pipeline::stage4_validate::{Stage4Inputs, run_stage4};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_dir(tag: &str) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "exam_compare_stage5_{}_{}_{}",
        tag,
        std::process::id(),
        n
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn demo_outcomes() -> (PeriodOutcome, PeriodOutcome) {
    let config = ExamConfig::default_v1();
    let cohort = load_synthetic_cohort();
    let before = run_period(&cohort.midterm, &config, TARGET_SCHOOL, "math").unwrap();
    let after = run_period(&cohort.final_exam, &config, TARGET_SCHOOL, "math").unwrap();
    (before, after)
}

fn demo_validations(before: &PeriodOutcome, after: &PeriodOutcome) -> Vec<Validation> {
    run_stage4(&Stage4Inputs {
        before,
        after,
        school: TARGET_SCHOOL,
        teacher: "Zhang",
        subject: "math",
        expected_students: STUDENTS_PER_CLASS,
    })
    .unwrap()
}

#[test]
fn test_write_reports_creates_both_files() {
    let (before, after) = demo_outcomes();
    let validations = demo_validations(&before, &after);
    let dir = temp_dir("compare");
    let paths = write_reports(
        &Stage5Input {
            before: &before,
            after: &after,
            school: TARGET_SCHOOL,
            teacher: "Zhang",
            subject: "math",
            validations: &validations,
        },
        &dir,
    )
    .unwrap();

    assert_eq!(paths, vec![dir.join(COMPARISON_REPORT), dir.join(COMPARISON_DETAILS)]);
    let md = fs::read_to_string(&paths[0]).unwrap();
    assert!(md.starts_with("# Two-Period Comparison Report"));
    assert!(md.ends_with('\n'));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths[1]).unwrap()).unwrap();
    assert_eq!(json["school"], "Shiyan");
    assert_eq!(json["validations"].as_array().unwrap().len(), 4);
    assert_eq!(json["final_teacher"]["Zhang"]["math"]["student_count"], 20);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_report_context_picks_target_rows() {
    let (before, after) = demo_outcomes();
    let validations = demo_validations(&before, &after);
    let ctx = build_report_context(&Stage5Input {
        before: &before,
        after: &after,
        school: TARGET_SCHOOL,
        teacher: "Zhang",
        subject: "math",
        validations: &validations,
    })
    .unwrap();

    assert_eq!(ctx.teacher_rank.before.name, "Zhang");
    assert_eq!(ctx.teacher_rank.after.rank_avg, 1);
    assert_eq!(ctx.teacher_rank.after.rank_exc, 1);
    assert_eq!(ctx.school_total.before.composite_rank, 2);
    assert!(ctx.school_total.after.stats.average > ctx.school_total.before.stats.average);
    assert_eq!(ctx.validations.len(), 4);
}

#[test]
fn test_report_context_unknown_teacher() {
    let (before, after) = demo_outcomes();
    let err = build_report_context(&Stage5Input {
        before: &before,
        after: &after,
        school: TARGET_SCHOOL,
        teacher: "Nobody",
        subject: "math",
        validations: &[],
    })
    .unwrap_err();
    assert!(matches!(err, AggregateError::UnknownTarget { .. }));
}

#[test]
fn test_write_lookup_reports() {
    let results = run_builtin_scenarios();
    let dir = temp_dir("lookup");
    let paths = write_lookup_reports(&results, &dir).unwrap();
    assert_eq!(paths.len(), 2);

    let md = fs::read_to_string(dir.join(LOOKUP_REPORT)).unwrap();
    assert!(md.contains("- Pass rate: 100.0%"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(LOOKUP_DETAILS)).unwrap()).unwrap();
    assert_eq!(json["summary"]["total"], results.len());
    assert_eq!(json["summary"]["failed"], 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_tied_ranks_flags_shared_values() {
    let (_, after) = demo_outcomes();
    let zhang = after
        .ranking
        .iter()
        .find(|r| r.name == "Zhang")
        .unwrap();
    // Every final row passes everyone; averages are distinct.
    assert_eq!(tied_ranks(&after.ranking, zhang), [false, false, true]);
    assert_eq!(zhang.rank_pass, 4);
}
