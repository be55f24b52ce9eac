use crate::input::lookup::ScenarioResult;
use crate::report::{
    ComparisonContext, format_f64_2, format_pct, format_pp_delta, format_rank_delta,
    format_signed_2, pass_fraction, pass_label,
};

pub fn render_comparison_markdown(ctx: &ComparisonContext) -> String {
    let mut out = String::new();

    out.push_str("# Two-Period Comparison Report (midterm vs final)\n\n");
    out.push_str(&format!("- Target school: {}\n", ctx.school));
    out.push_str(&format!(
        "- Target teacher: {} ({})\n",
        ctx.teacher, ctx.subject
    ));
    out.push_str("- Scope: inter-school exam analysis + class teaching management\n\n");

    out.push_str(&format!("## 1. Inter-school analysis ({})\n\n", ctx.school));
    out.push_str("### 1) Total score\n\n");
    push_table_header(&mut out);
    let t = &ctx.school_total;
    push_row(
        &mut out,
        "Average",
        &format_f64_2(t.before.stats.average),
        &format_f64_2(t.after.stats.average),
        &format_signed_2(t.after.stats.average - t.before.stats.average),
    );
    push_rate_row(
        &mut out,
        "Excellence rate",
        t.before.stats.excellence_rate,
        t.after.stats.excellence_rate,
    );
    push_rate_row(
        &mut out,
        "Pass rate",
        t.before.stats.pass_rate,
        t.after.stats.pass_rate,
    );
    push_row(
        &mut out,
        "Two-rates-one-score index",
        &format_f64_2(t.before.composite_index),
        &format_f64_2(t.after.composite_index),
        &format_signed_2(t.after.composite_index - t.before.composite_index),
    );
    push_row(
        &mut out,
        "Inter-school rank",
        &t.before.composite_rank.to_string(),
        &t.after.composite_rank.to_string(),
        &format_rank_delta(t.before.composite_rank, t.after.composite_rank),
    );
    out.push('\n');

    out.push_str(&format!("### 2) Subject: {}\n\n", ctx.subject));
    push_table_header(&mut out);
    let s = &ctx.school_subject;
    push_row(
        &mut out,
        "Average",
        &format_f64_2(s.before.stats.average),
        &format_f64_2(s.after.stats.average),
        &format_signed_2(s.after.stats.average - s.before.stats.average),
    );
    push_rate_row(
        &mut out,
        "Excellence rate",
        s.before.stats.excellence_rate,
        s.after.stats.excellence_rate,
    );
    push_rate_row(
        &mut out,
        "Pass rate",
        s.before.stats.pass_rate,
        s.after.stats.pass_rate,
    );
    push_row(
        &mut out,
        "Rank by average",
        &s.before.rank_avg.to_string(),
        &s.after.rank_avg.to_string(),
        &format_rank_delta(s.before.rank_avg, s.after.rank_avg),
    );
    out.push('\n');

    out.push_str(&format!(
        "## 2. Class teaching management ({} / {} / {})\n\n",
        ctx.school, ctx.teacher, ctx.subject
    ));
    out.push_str("### 1) Teacher indicators\n\n");
    push_table_header(&mut out);
    let m = &ctx.teacher_metric;
    let same_classes = if m.before.classes == m.after.classes {
        "unchanged"
    } else {
        "changed"
    };
    push_row(
        &mut out,
        "Classes",
        &m.before.classes,
        &m.after.classes,
        same_classes,
    );
    push_row(
        &mut out,
        "Students",
        &m.before.student_count.to_string(),
        &m.after.student_count.to_string(),
        &format_rank_delta(m.before.student_count, m.after.student_count),
    );
    push_row(
        &mut out,
        "Average",
        &format_f64_2(m.before.average),
        &format_f64_2(m.after.average),
        &format_signed_2(m.after.average - m.before.average),
    );
    push_row(
        &mut out,
        "Contribution",
        &format_signed_2(m.before.contribution),
        &format_signed_2(m.after.contribution),
        &format_signed_2(m.after.contribution - m.before.contribution),
    );
    push_rate_row(
        &mut out,
        "Excellence rate",
        m.before.excellence_rate,
        m.after.excellence_rate,
    );
    push_rate_row(&mut out, "Pass rate", m.before.pass_rate, m.after.pass_rate);
    push_rate_row(&mut out, "Low rate", m.before.low_rate, m.after.low_rate);
    push_row(
        &mut out,
        "Performance score",
        &format_f64_2(m.before.final_score),
        &format_f64_2(m.after.final_score),
        &format_signed_2(m.after.final_score - m.before.final_score),
    );
    out.push('\n');

    out.push_str(&format!(
        "### 2) Township ranking ({}, teachers vs other schools)\n\n",
        ctx.subject
    ));
    push_table_header(&mut out);
    let r = &ctx.teacher_rank;
    for (label, before, after) in [
        ("Rank by average", r.before.rank_avg, r.after.rank_avg),
        ("Rank by excellence rate", r.before.rank_exc, r.after.rank_exc),
        ("Rank by pass rate", r.before.rank_pass, r.after.rank_pass),
    ] {
        push_row(
            &mut out,
            label,
            &before.to_string(),
            &after.to_string(),
            &format_rank_delta(before, after),
        );
    }
    let ties = tie_notes(ctx);
    if !ties.is_empty() {
        out.push_str(&format!(
            "\nExact ties are ordered by name: {}.\n",
            ties.join("; ")
        ));
    }
    out.push('\n');

    out.push_str("## 3. Validation\n\n");
    out.push_str("| Check | Result |\n");
    out.push_str("|---|---|\n");
    for v in &ctx.validations {
        out.push_str(&format!("| {} | {} |\n", v.name, pass_label(v.ok)));
    }
    out.push('\n');

    out.push_str("## 4. Conclusion\n\n");
    out.push_str(&format!("- {}\n", school_statement(ctx)));
    out.push_str(&format!("- {}\n", teacher_statement(ctx)));
    out.push_str(&format!(
        "- {}\n",
        validation_statement(ctx.validations.iter().all(|v| v.ok))
    ));

    out
}

pub fn render_lookup_markdown(results: &[ScenarioResult]) -> String {
    let passed = results.iter().filter(|r| r.pass).count();
    let mut out = String::new();

    out.push_str("# Student Cloud Comparison Lookup Report\n\n");
    out.push_str("## 1. Summary\n\n");
    out.push_str(&format!("- Cases: {}\n", results.len()));
    out.push_str(&format!("- Passed: {}\n", passed));
    out.push_str(&format!("- Failed: {}\n", results.len() - passed));
    out.push_str(&format!(
        "- Pass rate: {}\n\n",
        format_pct(pass_fraction(passed, results.len()))
    ));

    out.push_str("## 2. Cases\n\n");
    out.push_str("| Scenario | Result | Strategy | Match |\n");
    out.push_str("|---|---|---|---|\n");
    for r in results {
        let hit = match (&r.actual.picked_name, &r.actual.picked_class) {
            (Some(name), Some(class)) => format!("{} / {}", name, class),
            _ => "none".to_string(),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            r.scenario,
            pass_label(r.pass),
            r.actual.strategy.label(),
            hit
        ));
    }

    out
}

fn push_table_header(out: &mut String) {
    out.push_str("| Indicator | Midterm | Final | Change |\n");
    out.push_str("|---|---:|---:|---:|\n");
}

fn push_row(out: &mut String, label: &str, before: &str, after: &str, change: &str) {
    out.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        label, before, after, change
    ));
}

fn push_rate_row(out: &mut String, label: &str, before: f64, after: f64) {
    push_row(
        out,
        label,
        &format_pct(before),
        &format_pct(after),
        &format_pp_delta(before, after),
    );
}

fn tie_notes(ctx: &ComparisonContext) -> Vec<String> {
    let mut notes = Vec::new();
    for (i, label) in ["average", "excellence rate", "pass rate"].iter().enumerate() {
        let periods = match (ctx.rank_ties.before[i], ctx.rank_ties.after[i]) {
            (true, true) => "midterm, final",
            (true, false) => "midterm",
            (false, true) => "final",
            (false, false) => continue,
        };
        notes.push(format!("{} ({})", label, periods));
    }
    notes
}

fn school_statement(ctx: &ComparisonContext) -> String {
    let total = ctx.school_total.after.stats.average - ctx.school_total.before.stats.average;
    let subject = ctx.school_subject.after.stats.average - ctx.school_subject.before.stats.average;
    let trend = if total > 0.0 && subject > 0.0 {
        "improved in both the total score and"
    } else if total > 0.0 {
        "improved in the total score but not in"
    } else if subject > 0.0 {
        "did not improve in the total score but improved in"
    } else {
        "improved in neither the total score nor"
    };
    format!(
        "From midterm to final, {} {} {}.",
        ctx.school, trend, ctx.subject
    )
}

fn teacher_statement(ctx: &ComparisonContext) -> String {
    let m = &ctx.teacher_metric;
    let mut rising = Vec::new();
    if m.after.average > m.before.average {
        rising.push("average");
    }
    if m.after.contribution > m.before.contribution {
        rising.push("contribution");
    }
    if m.after.excellence_rate > m.before.excellence_rate {
        rising.push("excellence rate");
    }
    if m.after.pass_rate > m.before.pass_rate {
        rising.push("pass rate");
    }
    if m.after.final_score > m.before.final_score {
        rising.push("performance score");
    }
    if rising.is_empty() {
        format!(
            "{} ({}) shows no rising indicator.",
            ctx.teacher, ctx.subject
        )
    } else {
        format!(
            "{} ({}) rose in: {}.",
            ctx.teacher,
            ctx.subject,
            rising.join(", ")
        )
    }
}

fn validation_statement(all_ok: bool) -> &'static str {
    if all_ok {
        "All checks passed; the metrics are consistent with their formulas."
    } else {
        "Some checks failed; review the validation table before using these figures."
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
