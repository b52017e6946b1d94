//! Seniority computation and vacation-policy linkage.

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::model::{Employee, SeniorityPolicy};
use crate::store::Store;

const DAYS_PER_YEAR: f64 = 365.25;

/// Completed years for a span of days.
pub fn years_for(days: i64) -> u32 {
    if days <= 0 {
        return 0;
    }
    (days as f64 / DAYS_PER_YEAR).floor() as u32
}

/// The policy covering `years`. Several matches go to the lowest id.
pub fn find_policy(policies: &[SeniorityPolicy], years: u32) -> Option<&SeniorityPolicy> {
    policies
        .iter()
        .filter(|p| p.matches(years))
        .min_by_key(|p| p.id)
}

/// Recompute seniority as of `as_of` and relink the vacation policy.
///
/// Employees without a hire date get seniority 0 and no policy. Returns
/// whether any of the three fields changed.
pub fn refresh(employee: &mut Employee, policies: &[SeniorityPolicy], as_of: NaiveDate) -> bool {
    let (days, years, policy_id) = match employee.hire_date {
        Some(hired) => {
            let days = (as_of - hired).num_days().max(0);
            let years = years_for(days);
            (days, years, find_policy(policies, years).map(|p| p.id))
        }
        None => (0, 0, None),
    };

    let changed = employee.seniority_days != Some(days)
        || employee.seniority_years != Some(years)
        || employee.policy_id != policy_id;
    employee.seniority_days = Some(days);
    employee.seniority_years = Some(years);
    employee.policy_id = policy_id;
    changed
}

/// Recompute every union member and persist the ones that changed.
/// Returns how many were updated. A failed save is logged and skipped.
pub fn refresh_all(store: &dyn Store, as_of: NaiveDate) -> Result<usize> {
    let policies = store.seniority_policies()?;
    let mut updated = 0;
    for mut employee in store.employees()? {
        if !employee.is_union_member() {
            continue;
        }
        if refresh(&mut employee, &policies, as_of) {
            if employee.policy_id.is_none() {
                warn!(
                    employee_id = employee.id,
                    payroll = employee.payroll,
                    years = employee.seniority_years,
                    "no seniority vacation policy"
                );
            }
            match store.save_employee(&employee) {
                Ok(()) => updated += 1,
                Err(e) => error!(
                    employee_id = employee.id,
                    payroll = employee.payroll,
                    error = %e,
                    "failed to save seniority"
                ),
            }
        }
    }
    debug!(updated, %as_of, "seniority refreshed");
    Ok(updated)
}
