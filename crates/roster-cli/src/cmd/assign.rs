use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use roster_core::engine::{Engine, GroupAssignment};
use roster_core::store::Store;
use roster_core::RosterError;
use std::path::Path;

pub fn run(
    root: &Path,
    start: NaiveDate,
    end: NaiveDate,
    group: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let (config, store) = super::open(root)?;
    let engine = Engine::new(&store, &config);

    let groups = match group {
        Some(group_id) => {
            if store.group(group_id)?.is_none() {
                return Err(RosterError::GroupNotFound(group_id).into());
            }
            let report = engine
                .assign_group(group_id, start, end)
                .with_context(|| format!("vacation assignment failed for group {group_id}"))?;
            vec![GroupAssignment { group_id, report }]
        }
        None => engine
            .assign_all(start, end)
            .context("vacation assignment failed")?,
    };

    if json {
        return print_json(&groups);
    }

    let rows = groups
        .iter()
        .flat_map(|g| super::assignment_rows(g.group_id, &g.report))
        .collect();
    print_table(&["GROUP", "EMPLOYEE", "STATUS", "DAYS", "DETAIL"], rows);
    let converted: u32 = groups.iter().map(|g| g.report.converted()).sum();
    println!("\n{converted} vacation days assigned");
    Ok(())
}
