use crate::output::{print_json, print_table};
use anyhow::Context;
use roster_core::store::{Dataset, Store};
use std::path::Path;

pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let dataset =
        Dataset::load(file).with_context(|| format!("failed to read dataset {}", file.display()))?;
    let (_, store) = super::open(root)?;
    store.import(&dataset).context("failed to import dataset")?;

    let counts = [
        ("areas", dataset.areas.len()),
        ("groups", dataset.groups.len()),
        ("employees", dataset.employees.len()),
        ("seniority_policies", dataset.seniority_policies.len()),
        ("rules", dataset.rules.len()),
        ("weekly_roles", dataset.weekly_roles.len()),
        ("shift_slots", dataset.shift_slots.len()),
        ("initial_roles", dataset.initial_roles.len()),
        ("holidays", dataset.holidays.len()),
        ("leaves", dataset.leaves.len()),
        ("vacations", dataset.vacations.len()),
        ("schedules", dataset.schedules.len()),
        ("manning_exceptions", dataset.manning_exceptions.len()),
        ("ceiling_exceptions", dataset.ceiling_exceptions.len()),
    ];

    if json {
        let value: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(name, n)| (name.to_string(), serde_json::Value::from(*n)))
            .collect();
        print_json(&value)?;
        return Ok(());
    }

    let rows = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(name, n)| vec![name.to_string(), n.to_string()])
        .collect();
    print_table(&["RECORD", "IMPORTED"], rows);
    Ok(())
}
