use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use roster_core::engine::Engine;
use std::path::Path;

pub fn run(root: &Path, start: NaiveDate, end: NaiveDate, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open(root)?;
    let report = Engine::new(&store, &config)
        .run_full(start, end)
        .context("full run failed")?;

    if json {
        return print_json(&report);
    }

    println!("Seniority refreshed for {} employees", report.seniority_updated);
    match (report.assignment_start, report.assignment_end) {
        (Some(from), Some(to)) => println!("Assignment window: {from} .. {to}"),
        _ => println!("Assignment window: none"),
    }

    for area in &report.areas {
        println!("\nArea {}", area.area_id);
        print_table(
            &["EMPLOYEE", "STATUS", "DAYS", "DETAIL"],
            super::generation_rows(&area.generation),
        );
        if !area.groups.is_empty() {
            println!();
            let rows = area
                .groups
                .iter()
                .flat_map(|g| super::assignment_rows(g.group_id, &g.report))
                .collect();
            print_table(&["GROUP", "EMPLOYEE", "STATUS", "DAYS", "DETAIL"], rows);
        }
    }

    println!(
        "\n{} days written, {} vacation days assigned",
        report.days_written(),
        report.days_converted()
    );
    Ok(())
}
