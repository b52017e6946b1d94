//! Calendar generation for one employee or a batch.
//!
//! Generation first checks that everything needed to place the employee in
//! a rotation exists. A missing piece yields [`GenerationOutcome::Missing`]
//! and no rows. Otherwise every date of the window is resolved and all new
//! rows are written in one `write_calendar` call together with the
//! refreshed policy linkage.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::day_type::{pick_holiday, DayCandidates, DayContext, DayTypeResolver, PriorityResolver};
use crate::error::{Result, RosterError};
use crate::model::{Employee, ShiftSlot};
use crate::rotation::{Anchor, CyclicRotation, RotationResolver};
use crate::seniority;
use crate::store::Store;
use crate::types::{EmployeeId, HolidayCategory, MissingConfig, RuleId};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// `days` rows were inserted; `existing` dates already had a row and
    /// were left alone; `skipped` dates resolved to nothing.
    Written {
        days: usize,
        existing: usize,
        skipped: usize,
    },
    Missing {
        reason: MissingConfig,
    },
    Failed {
        error: String,
    },
    /// No employee record was supplied for this batch position.
    InvalidInput,
}

impl GenerationOutcome {
    pub fn days_written(&self) -> usize {
        match self {
            GenerationOutcome::Written { days, .. } => *days,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeGeneration {
    /// Index in the batch input.
    pub position: usize,
    pub employee_id: Option<EmployeeId>,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub employees: Vec<EmployeeGeneration>,
}

impl GenerationReport {
    pub fn days_written(&self) -> usize {
        self.employees.iter().map(|e| e.outcome.days_written()).sum()
    }

    pub fn missing(&self) -> usize {
        self.employees
            .iter()
            .filter(|e| matches!(e.outcome, GenerationOutcome::Missing { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.employees
            .iter()
            .filter(|e| {
                matches!(
                    e.outcome,
                    GenerationOutcome::Failed { .. } | GenerationOutcome::InvalidInput
                )
            })
            .count()
    }
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Everything needed to walk one employee's window.
#[derive(Debug, Clone)]
pub struct EmployeeSetup {
    /// The employee with seniority recomputed as of the window start.
    pub employee: Employee,
    pub linkage_changed: bool,
    pub rule_id: RuleId,
    pub cycle: Vec<ShiftSlot>,
    pub anchor: Anchor,
}

#[derive(Debug, Clone)]
pub enum Readiness {
    Ready(Box<EmployeeSetup>),
    Missing(MissingConfig),
}

// ---------------------------------------------------------------------------
// CalendarGenerator
// ---------------------------------------------------------------------------

pub struct CalendarGenerator<'a> {
    store: &'a dyn Store,
    rotation: Box<dyn RotationResolver + 'a>,
    day_types: Box<dyn DayTypeResolver + 'a>,
}

impl<'a> CalendarGenerator<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            rotation: Box::new(CyclicRotation),
            day_types: Box::new(PriorityResolver),
        }
    }

    pub fn with_rotation(mut self, rotation: impl RotationResolver + 'a) -> Self {
        self.rotation = Box::new(rotation);
        self
    }

    pub fn with_day_types(mut self, day_types: impl DayTypeResolver + 'a) -> Self {
        self.day_types = Box::new(day_types);
        self
    }

    /// Resolve the employee's rotation anchor and vacation policy as of
    /// `start`. Checks run in a fixed order and the first gap wins.
    pub fn prepare(&self, employee: &Employee, start: NaiveDate) -> Result<Readiness> {
        use Readiness::Missing;

        if !employee.is_union_member() {
            return Ok(Missing(MissingConfig::NotUnionMember));
        }
        if employee.group_id.is_none() {
            return Ok(Missing(MissingConfig::NoGroup));
        }

        let Some(initial) = self
            .store
            .initial_role_assignments(employee.payroll)?
            .into_iter()
            .filter(|a| a.effective <= start)
            .max_by_key(|a| (a.effective, a.id))
        else {
            return Ok(Missing(MissingConfig::NoInitialRole));
        };

        let Some(role) = self.store.weekly_role_by_name(&initial.weekly_role)? else {
            return Ok(Missing(MissingConfig::WeeklyRoleNotFound));
        };
        let Some(rule) = self.store.rule(role.rule_id)? else {
            return Ok(Missing(MissingConfig::RuleNotFound));
        };

        let cycle = self.store.shift_slots(rule.id)?;
        let weekday = initial.effective.weekday();
        let Some(anchor_slot) = cycle
            .iter()
            .find(|s| s.weekly_role_id == role.id && s.weekday == weekday)
        else {
            return Ok(Missing(MissingConfig::AnchorShiftNotFound));
        };
        let anchor = Anchor {
            date: initial.effective,
            index: anchor_slot.index,
        };

        let mut refreshed = employee.clone();
        let policies = self.store.seniority_policies()?;
        let linkage_changed = seniority::refresh(&mut refreshed, &policies, start);
        if refreshed.policy_id.is_none() {
            return Ok(Missing(MissingConfig::NoSeniorityPolicy));
        }

        Ok(Readiness::Ready(Box::new(EmployeeSetup {
            employee: refreshed,
            linkage_changed,
            rule_id: rule.id,
            cycle,
            anchor,
        })))
    }

    /// Generate `[start, end]` for one employee.
    pub fn generate(
        &self,
        employee: &Employee,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GenerationOutcome> {
        if start > end {
            return Err(RosterError::InvalidWindow { start, end });
        }
        // Work from the persisted record so counters are never rolled back.
        let current = self
            .store
            .employee(employee.id)?
            .unwrap_or_else(|| employee.clone());

        let setup = match self.prepare(&current, start)? {
            Readiness::Ready(setup) => setup,
            Readiness::Missing(reason) => {
                warn!(
                    employee_id = current.id,
                    payroll = current.payroll,
                    %reason,
                    "calendar generation skipped"
                );
                return Ok(GenerationOutcome::Missing { reason });
            }
        };
        let employee = &setup.employee;

        let holidays = self.store.holidays_between(start, end)?;
        let leaves = self.store.leaves_for(employee.payroll, start, end)?;
        let vacations = self.store.vacations_for(employee.payroll, start, end)?;
        let schedule_id = self.store.active_schedule()?.map(|s| s.id);
        let existing_dates: HashSet<NaiveDate> = self
            .store
            .calendar_days_for_employee(employee.id, start, end)?
            .into_iter()
            .map(|d| d.date)
            .collect();

        let ctx = DayContext {
            employee,
            schedule_id,
        };
        let mut drafts = Vec::new();
        let mut existing = 0;
        let mut skipped = 0;

        for date in start.iter_days().take_while(|d| *d <= end) {
            if existing_dates.contains(&date) {
                existing += 1;
                continue;
            }
            let candidates = DayCandidates {
                statutory: pick_holiday(&holidays, date, HolidayCategory::Statutory),
                continental: pick_holiday(&holidays, date, HolidayCategory::Continental),
                leave: leaves
                    .iter()
                    .filter(|l| l.date == date)
                    .min_by_key(|l| l.id),
                vacation: vacations
                    .iter()
                    .filter(|v| v.date == date)
                    .min_by_key(|v| v.id),
                slot: self.rotation.resolve(&setup.cycle, setup.anchor, date),
            };
            match self.day_types.resolve(date, ctx, candidates) {
                Some(day) => drafts.push(day),
                None => {
                    debug!(
                        employee_id = employee.id,
                        %date,
                        rule_id = setup.rule_id,
                        "no shift resolved for date"
                    );
                    skipped += 1;
                }
            }
        }

        let linkage = setup.linkage_changed.then_some(employee);
        let days = self.store.write_calendar(linkage, &drafts)?;
        info!(
            employee_id = employee.id,
            payroll = employee.payroll,
            days,
            existing,
            skipped,
            "calendar generated"
        );
        Ok(GenerationOutcome::Written {
            days,
            existing,
            skipped,
        })
    }

    /// Generate for each input position independently. A failure for one
    /// employee is recorded in the report and the batch moves on.
    pub fn generate_batch(
        &self,
        employees: &[Option<Employee>],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GenerationReport> {
        if start > end {
            return Err(RosterError::InvalidWindow { start, end });
        }
        let mut report = GenerationReport {
            start: Some(start),
            end: Some(end),
            employees: Vec::with_capacity(employees.len()),
        };

        for (position, employee) in employees.iter().enumerate() {
            let Some(employee) = employee else {
                warn!(position, "null employee in batch");
                report.employees.push(EmployeeGeneration {
                    position,
                    employee_id: None,
                    outcome: GenerationOutcome::InvalidInput,
                });
                continue;
            };
            let outcome = match self.generate(employee, start, end) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        employee_id = employee.id,
                        payroll = employee.payroll,
                        error = %e,
                        "calendar generation failed"
                    );
                    GenerationOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.employees.push(EmployeeGeneration {
                position,
                employee_id: Some(employee.id),
                outcome,
            });
        }
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
