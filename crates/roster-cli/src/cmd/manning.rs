use crate::output::print_json;
use anyhow::Context;
use chrono::NaiveDate;
use roster_core::engine::Engine;
use std::path::Path;

pub fn run(root: &Path, group_id: u64, date: NaiveDate, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open(root)?;
    let status = Engine::new(&store, &config)
        .validator()
        .status(group_id, date)
        .with_context(|| format!("failed to compute absence status of group {group_id}"))?;

    if json {
        return print_json(&status);
    }

    println!("Group {} on {}", status.group_id, status.date);
    println!("  required manning:  {}", status.required);
    println!("  employees:         {}", status.employee_count);
    println!("  working:           {}", status.labor_count);
    println!("  absent:            {}", status.current_absences);
    println!("  deficit if +1:     {:.2}%", status.deficit_percent);
    println!("  ceiling:           {:.2}%", status.ceiling);
    match status.min_size_for_ceiling {
        Some(n) if status.small_group => println!("  small group:       yes (below {n})"),
        Some(n) => println!("  small group:       no (min {n})"),
        None => println!("  small group:       ceiling allows no absence"),
    }
    println!(
        "  can add absence:   {}",
        if status.can_add_absence { "yes" } else { "no" }
    );
    Ok(())
}
