use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use roster_core::engine::Engine;
use std::path::Path;

pub fn run(
    root: &Path,
    start: NaiveDate,
    end: NaiveDate,
    employees: &[u64],
    json: bool,
) -> anyhow::Result<()> {
    let (config, store) = super::open(root)?;
    let engine = Engine::new(&store, &config);
    let report = if employees.is_empty() {
        engine.generate_all_union(start, end)
    } else {
        engine.generate(employees, start, end)
    }
    .context("calendar generation failed")?;

    if json {
        return print_json(&report);
    }

    print_table(
        &["EMPLOYEE", "STATUS", "DAYS", "DETAIL"],
        super::generation_rows(&report),
    );
    println!(
        "\n{} days written, {} missing configuration, {} failed",
        report.days_written(),
        report.missing(),
        report.failed()
    );
    Ok(())
}
