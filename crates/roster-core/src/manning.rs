//! Group absence ceiling checks.
//!
//! For a group and a date, the validator answers whether one more person
//! can be absent. Two regimes exist, chosen by group size:
//!
//! - **Percentage**: `deficit = max(0, required - (labor - 1)) / required * 100`
//!   must stay at or below the ceiling.
//! - **Small group**: when the group has fewer members than
//!   `ceil(100 / ceiling)`, a single absence already exceeds any
//!   percentage, so one simultaneous absence is tolerated and no more.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::store::Store;
use crate::types::GroupId;

pub trait AbsenceValidator {
    fn can_add_absence(&self, group_id: GroupId, date: NaiveDate) -> Result<bool>;
}

/// Everything the verdict was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceStatus {
    pub group_id: GroupId,
    pub date: NaiveDate,
    pub required: u32,
    pub employee_count: u32,
    pub labor_count: u32,
    pub current_absences: u32,
    /// Missing share of `required` if one more person were absent.
    pub deficit_percent: f64,
    pub ceiling: f64,
    pub small_group: bool,
    pub min_size_for_ceiling: Option<u32>,
    pub can_add_absence: bool,
}

pub struct ManningValidator<'s> {
    store: &'s dyn Store,
    default_ceiling: f64,
}

impl<'s> ManningValidator<'s> {
    pub fn new(store: &'s dyn Store, default_ceiling: f64) -> Self {
        Self {
            store,
            default_ceiling,
        }
    }

    pub fn status(&self, group_id: GroupId, date: NaiveDate) -> Result<AbsenceStatus> {
        let group = self
            .store
            .group(group_id)?
            .ok_or(RosterError::GroupNotFound(group_id))?;
        let days = self.store.calendar_days_for_group(group_id, date)?;

        let employee_count = days.len() as u32;
        let labor_count = days.iter().filter(|d| d.is_labor()).count() as u32;
        let current_absences = days
            .iter()
            .filter(|d| d.classification().is_absence())
            .count() as u32;

        let required = match self.store.manning_override(group_id, date)? {
            Some(r) => r,
            None => group.manning,
        };
        let required = if required == 0 { employee_count } else { required };

        let ceiling = self
            .store
            .ceiling_override(group_id, date)?
            .unwrap_or(self.default_ceiling);

        let deficit = deficit_percent(required, labor_count);
        let min_size = min_size_for_ceiling(ceiling);
        let small_group = min_size.is_some_and(|m| employee_count < m);

        let can_add_absence = if min_size.is_none() || required == 0 {
            false
        } else if small_group {
            employee_count == 1 || current_absences == 0
        } else {
            deficit <= ceiling
        };

        Ok(AbsenceStatus {
            group_id,
            date,
            required,
            employee_count,
            labor_count,
            current_absences,
            deficit_percent: deficit,
            ceiling,
            small_group,
            min_size_for_ceiling: min_size,
            can_add_absence,
        })
    }
}

impl AbsenceValidator for ManningValidator<'_> {
    fn can_add_absence(&self, group_id: GroupId, date: NaiveDate) -> Result<bool> {
        Ok(self.status(group_id, date)?.can_add_absence)
    }
}

/// Smallest group for which one person is within `ceiling` percent.
/// `None` for a non-positive (or NaN) ceiling, which tolerates nothing.
pub fn min_size_for_ceiling(ceiling: f64) -> Option<u32> {
    if ceiling.is_nan() || ceiling <= 0.0 {
        return None;
    }
    let size = (100.0 / ceiling).ceil();
    Some(if size >= u32::MAX as f64 {
        u32::MAX
    } else {
        size as u32
    })
}

pub fn deficit_percent(required: u32, labor_count: u32) -> f64 {
    if required == 0 {
        return 0.0;
    }
    let present = labor_count as i64 - 1;
    let missing = (required as i64 - present).max(0);
    missing as f64 / required as f64 * 100.0
}
