mod input;
mod model;
mod pipeline;
mod report;
mod tracing;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::input::load_synthetic_cohort;
use crate::input::lookup::run_builtin_scenarios;
use crate::input::synth::{STUDENTS_PER_CLASS, TARGET_SCHOOL};
use crate::model::thresholds::ExamConfig;
use crate::pipeline::run_period;
use crate::pipeline::stage4_validate::{Stage4Inputs, run_stage4};
use crate::pipeline::stage5_report::{Stage5Input, write_lookup_reports, write_reports};

#[derive(Debug, Parser)]
#[command(name = "exam-compare", version)]
#[command(about = "Two-period school, class and teacher exam comparison", long_about = None)]
struct Cli {
    /// Log filter, e.g. "debug"; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare midterm and final results for one school, teacher and subject
    Compare {
        /// Output directory for the report and JSON details
        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, default_value = TARGET_SCHOOL)]
        school: String,

        #[arg(long, default_value = "Zhang")]
        teacher: String,

        #[arg(long, default_value = "math")]
        subject: String,
    },
    /// Run the student lookup scenarios used by the cloud comparison view
    Lookup {
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    crate::tracing::init_tracing(cli.log_level.as_deref());

    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            ::tracing::error!("{err}");
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` when the run completed but a check did not pass.
fn run(command: Commands) -> Result<bool, String> {
    match command {
        Commands::Compare {
            out,
            school,
            teacher,
            subject,
        } => run_compare(&out, &school, &teacher, &subject),
        Commands::Lookup { out } => run_lookup(&out),
    }
}

fn run_compare(out: &Path, school: &str, teacher: &str, subject: &str) -> Result<bool, String> {
    let config = ExamConfig::default_v1();
    if config.threshold(subject).is_none() {
        return Err(format!("unknown subject: {subject}"));
    }

    let cohort = load_synthetic_cohort();
    let before =
        run_period(&cohort.midterm, &config, school, subject).map_err(|e| e.to_string())?;
    let after =
        run_period(&cohort.final_exam, &config, school, subject).map_err(|e| e.to_string())?;

    let classes_taught = config
        .teacher_assignments
        .iter()
        .filter(|a| a.teacher == teacher && a.subject == subject)
        .count();
    let validations = run_stage4(&Stage4Inputs {
        before: &before,
        after: &after,
        school,
        teacher,
        subject,
        expected_students: classes_taught * STUDENTS_PER_CLASS,
    })
    .map_err(|e| e.to_string())?;

    write_reports(
        &Stage5Input {
            before: &before,
            after: &after,
            school,
            teacher,
            subject,
            validations: &validations,
        },
        out,
    )
    .map_err(|e| e.to_string())?;

    let passed = validations.iter().filter(|v| v.ok).count();
    ::tracing::info!(passed, total = validations.len(), "comparison finished");
    Ok(passed == validations.len())
}

fn run_lookup(out: &Path) -> Result<bool, String> {
    let results = run_builtin_scenarios();
    write_lookup_reports(&results, out).map_err(|e| e.to_string())?;

    let passed = results.iter().filter(|r| r.pass).count();
    ::tracing::info!(passed, total = results.len(), "lookup scenarios finished");
    Ok(passed == results.len())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
