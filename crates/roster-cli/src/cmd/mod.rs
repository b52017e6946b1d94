pub mod assign;
pub mod calendar;
pub mod config;
pub mod generate;
pub mod import;
pub mod init;
pub mod manning;
pub mod run;

use anyhow::Context;
use roster_core::assigner::{AssignmentAbort, AssignmentOutcome, AssignmentReport};
use roster_core::config::Config;
use roster_core::generator::{GenerationOutcome, GenerationReport};
use roster_core::store::RedbStore;
use std::path::Path;

/// Load the config under `root` and open the database it names.
pub fn open(root: &Path) -> anyhow::Result<(Config, RedbStore)> {
    let config = Config::load(root).context("failed to load config")?;
    let db = config.database_path(root);
    let store = RedbStore::open(&db)
        .with_context(|| format!("failed to open database {}", db.display()))?;
    Ok((config, store))
}

fn employee_cell(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn generation_rows(report: &GenerationReport) -> Vec<Vec<String>> {
    report
        .employees
        .iter()
        .map(|e| {
            let (status, written, detail) = match &e.outcome {
                GenerationOutcome::Written {
                    days,
                    existing,
                    skipped,
                } => (
                    "written",
                    days.to_string(),
                    format!("{existing} existing, {skipped} unresolved"),
                ),
                GenerationOutcome::Missing { reason } => ("missing", "0".into(), reason.to_string()),
                GenerationOutcome::Failed { error } => ("failed", "0".into(), error.clone()),
                GenerationOutcome::InvalidInput => ("invalid", "0".into(), String::new()),
            };
            vec![employee_cell(e.employee_id), status.to_string(), written, detail]
        })
        .collect()
}

pub fn abort_reason(abort: AssignmentAbort) -> &'static str {
    match abort {
        AssignmentAbort::NoUnionEmployees => "no union employees",
        AssignmentAbort::NoActiveSchedule => "no active annual schedule",
        AssignmentAbort::WindowOutsideSchedule => "window outside the annual schedule",
    }
}

pub fn assignment_rows(group_id: u64, report: &AssignmentReport) -> Vec<Vec<String>> {
    if let Some(error) = &report.error {
        return vec![vec![
            group_id.to_string(),
            "-".into(),
            "failed".into(),
            "0".into(),
            error.clone(),
        ]];
    }
    if let Some(abort) = report.aborted {
        return vec![vec![
            group_id.to_string(),
            "-".into(),
            "aborted".into(),
            "0".into(),
            abort_reason(abort).into(),
        ]];
    }
    report
        .employees
        .iter()
        .map(|e| {
            let (status, detail) = match &e.outcome {
                AssignmentOutcome::Assigned { remaining, .. } => {
                    let dates: Vec<String> = e
                        .outcome
                        .converted_dates()
                        .iter()
                        .map(|d| d.to_string())
                        .collect();
                    let mut detail = dates.join(" ");
                    if *remaining > 0 {
                        detail.push_str(&format!(" ({remaining} left)"));
                    }
                    ("assigned", detail.trim_start().to_string())
                }
                AssignmentOutcome::QuotaExhausted => ("exhausted", String::new()),
                AssignmentOutcome::Missing { reason } => ("missing", reason.to_string()),
                AssignmentOutcome::Failed { error } => ("failed", error.clone()),
                AssignmentOutcome::InvalidInput => ("invalid", String::new()),
            };
            vec![
                group_id.to_string(),
                employee_cell(e.employee_id),
                status.to_string(),
                e.outcome.converted().to_string(),
                detail,
            ]
        })
        .collect()
}
