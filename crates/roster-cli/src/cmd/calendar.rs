use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use roster_core::store::Store;
use roster_core::types::Classification;
use roster_core::RosterError;
use std::path::Path;

pub fn run(
    root: &Path,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
    only: Option<Classification>,
    json: bool,
) -> anyhow::Result<()> {
    if start > end {
        return Err(RosterError::InvalidWindow { start, end }.into());
    }
    let (_, store) = super::open(root)?;
    let employee = store
        .employee(employee_id)?
        .ok_or(RosterError::EmployeeNotFound(employee_id))?;
    let mut days = store
        .calendar_days_for_employee(employee_id, start, end)
        .with_context(|| format!("failed to read calendar of employee {employee_id}"))?;
    if let Some(kind) = only {
        days.retain(|d| d.classification() == kind);
    }

    if json {
        return print_json(&days);
    }

    println!("{} (payroll {})", employee.name, employee.payroll);
    if days.is_empty() {
        println!("No calendar rows between {start} and {end}.");
        return Ok(());
    }
    let rows = days
        .iter()
        .map(|d| {
            vec![
                d.date.to_string(),
                d.weekday.to_string(),
                d.short_code().to_string(),
                d.classification().to_string(),
            ]
        })
        .collect();
    print_table(&["DATE", "DAY", "CODE", "CLASSIFICATION"], rows);

    let codes: Vec<&str> = days.iter().map(|d| d.short_code()).collect();
    println!("\n{}", codes.join(" "));
    Ok(())
}
