//! Selecting and ordering the union employees a run works on.

use std::cmp::{Ordering, Reverse};

use tracing::error;

use crate::error::Result;
use crate::model::Employee;
use crate::store::Store;
use crate::types::{AreaId, GroupId};

/// Processing order for quota assignment: most senior first by days,
/// unknown seniority last, then lowest payroll.
pub fn assignment_order(a: &Employee, b: &Employee) -> Ordering {
    match (a.seniority_days, b.seniority_days) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.payroll.cmp(&b.payroll))
}

pub fn union_employees_in_area(store: &dyn Store, area_id: AreaId) -> Result<Vec<Employee>> {
    let mut employees: Vec<Employee> = store
        .employees()?
        .into_iter()
        .filter(|e| e.active && e.is_union_member() && e.area_id == Some(area_id))
        .collect();
    employees.sort_by_key(|e| (Reverse(e.seniority_years.unwrap_or(0)), e.payroll));
    Ok(employees)
}

/// Union members of `group_id` whose linked policy leaves them an automatic
/// quota, in [`assignment_order`].
///
/// An employee whose policy cannot be read is kept, so the assigner records
/// the failure against that employee instead of losing the whole group.
pub fn union_employees_with_quota(store: &dyn Store, group_id: GroupId) -> Result<Vec<Employee>> {
    let mut employees = Vec::new();
    for e in store.employees()? {
        if !(e.active && e.is_union_member() && e.group_id == Some(group_id)) {
            continue;
        }
        let Some(policy_id) = e.policy_id else {
            continue;
        };
        let has_quota = match store.seniority_policy(policy_id) {
            Ok(policy) => policy.is_some_and(|p| p.auto_assignable_days > 0),
            Err(err) => {
                error!(
                    employee_id = e.id,
                    payroll = e.payroll,
                    policy_id,
                    error = %err,
                    "failed to read seniority policy"
                );
                true
            }
        };
        if has_quota {
            employees.push(e);
        }
    }
    employees.sort_by(assignment_order);
    Ok(employees)
}
