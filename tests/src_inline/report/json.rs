use super::*;
use crate::input::load_synthetic_cohort;
use crate::input::lookup::run_builtin_scenarios;
use crate::input::synth::TARGET_SCHOOL;
use crate::model::thresholds::ExamConfig;
use crate::pipeline::run_period;

#[test]
fn test_comparison_json_layout() {
    let config = ExamConfig::default_v1();
    let cohort = load_synthetic_cohort();
    let before = run_period(&cohort.midterm, &config, TARGET_SCHOOL, "math").unwrap();
    let after = run_period(&cohort.final_exam, &config, TARGET_SCHOOL, "math").unwrap();
    let validations = vec![Validation {
        name: "rate bounds",
        ok: true,
    }];

    let dump = ComparisonDump::new(&before, &after, TARGET_SCHOOL, "Zhang", "math", &validations);
    let text = render_comparison_json(&dump).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(v["tool"], env!("CARGO_PKG_NAME"));
    assert_eq!(v["teacher"], "Zhang");
    // Subject stats are flattened next to the ranks.
    let math = &v["final_school"]["Shiyan"]["subjects"]["math"];
    assert!(math["average"].is_number());
    assert!(math["rank_avg"].is_u64());
    assert!(v["final_school"]["Chengguan"]["total"]["composite_index"].is_number());
    assert_eq!(v["midterm_teacher"]["Zhang"]["math"]["classes"], "701");

    let ranking = v["final_ranking"].as_array().unwrap();
    assert_eq!(ranking.len(), 4);
    assert_eq!(ranking[0]["kind"], "teacher");
    assert!(ranking.iter().all(|r| r["name"] != "Shiyan"));
    assert_eq!(v["validations"][0]["name"], "rate bounds");
}

#[test]
fn test_lookup_json_summary() {
    let results = run_builtin_scenarios();
    let v: serde_json::Value = serde_json::from_str(&render_lookup_json(&results).unwrap()).unwrap();
    assert_eq!(v["summary"]["passed"], results.len());
    assert_eq!(v["summary"]["pass_rate"], "100.0%");
    let cases = v["cases"].as_array().unwrap();
    assert_eq!(cases.len(), results.len());
    assert!(cases.iter().all(|c| c["pass"] == true));
    assert!(cases[0]["actual"]["strategy"].is_string());
}
