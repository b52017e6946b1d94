//! Automatic vacation assignment up to each employee's quota.
//!
//! Employees are processed most senior first. For each one the window is
//! walked chronologically and labor days are converted to auto-assigned
//! vacation while the group can absorb another absence, until the quota
//! (`policy.auto_assignable_days - assigned_vacation_days`, read from the
//! store on every run) is used up.
//!
//! Nothing here aborts the batch once it has started: date-level and
//! employee-level failures end up in the [`AssignmentReport`].

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::error::{Result, RosterError};
use crate::manning::AbsenceValidator;
use crate::model::{CalendarDay, Employee};
use crate::roster::assignment_order;
use crate::store::Store;
use crate::types::{Classification, EmployeeId, GroupId, MissingConfig, ScheduleId};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DateStatus {
    Converted,
    NotLabor { classification: Classification },
    NoCalendarDay,
    OverThreshold,
    Weekend,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateOutcome {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub status: DateStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Assigned {
        converted: u32,
        remaining: u32,
        dates: Vec<DateOutcome>,
    },
    /// Nothing left to assign when the run started.
    QuotaExhausted,
    Missing {
        reason: MissingConfig,
    },
    Failed {
        error: String,
    },
    InvalidInput,
}

impl AssignmentOutcome {
    pub fn converted(&self) -> u32 {
        match self {
            AssignmentOutcome::Assigned { converted, .. } => *converted,
            _ => 0,
        }
    }

    /// Dates converted by this run, in order.
    pub fn converted_dates(&self) -> Vec<NaiveDate> {
        match self {
            AssignmentOutcome::Assigned { dates, .. } => dates
                .iter()
                .filter(|d| d.status == DateStatus::Converted)
                .map(|d| d.date)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAssignment {
    pub position: usize,
    pub employee_id: Option<EmployeeId>,
    #[serde(flatten)]
    pub outcome: AssignmentOutcome,
}

/// Why a run stopped before looking at any employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentAbort {
    NoUnionEmployees,
    NoActiveSchedule,
    WindowOutsideSchedule,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentReport {
    /// Effective window after clamping to the annual schedule.
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub schedule_id: Option<ScheduleId>,
    pub aborted: Option<AssignmentAbort>,
    /// Set when the group could not be processed at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// One entry per input position, in input order.
    pub employees: Vec<EmployeeAssignment>,
}

impl AssignmentReport {
    pub fn aborted(reason: AssignmentAbort) -> Self {
        Self {
            aborted: Some(reason),
            ..Self::default()
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn converted(&self) -> u32 {
        self.employees.iter().map(|e| e.outcome.converted()).sum()
    }

    pub fn for_employee(&self, employee_id: EmployeeId) -> Option<&AssignmentOutcome> {
        self.employees
            .iter()
            .find(|e| e.employee_id == Some(employee_id))
            .map(|e| &e.outcome)
    }
}

// ---------------------------------------------------------------------------
// VacationQuotaAssigner
// ---------------------------------------------------------------------------

pub struct VacationQuotaAssigner<'a> {
    store: &'a dyn Store,
    validator: &'a dyn AbsenceValidator,
    skip_weekends: bool,
}

impl<'a> VacationQuotaAssigner<'a> {
    pub fn new(store: &'a dyn Store, validator: &'a dyn AbsenceValidator) -> Self {
        Self {
            store,
            validator,
            skip_weekends: false,
        }
    }

    pub fn skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    pub fn assign(
        &self,
        employees: &[Option<Employee>],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AssignmentReport> {
        if start > end {
            return Err(RosterError::InvalidWindow { start, end });
        }
        if employees.is_empty() {
            warn!(%start, %end, "no union employees");
            return Ok(AssignmentReport::aborted(AssignmentAbort::NoUnionEmployees));
        }
        let Some(schedule) = self.store.active_schedule()? else {
            warn!(%start, %end, "no active annual schedule");
            return Ok(AssignmentReport::aborted(AssignmentAbort::NoActiveSchedule));
        };

        let from = start.max(schedule.start);
        let to = end.min(schedule.end);
        if from > to {
            warn!(
                %start,
                %end,
                schedule_id = schedule.id,
                "assignment window outside annual schedule"
            );
            let mut report = AssignmentReport::aborted(AssignmentAbort::WindowOutsideSchedule);
            report.schedule_id = Some(schedule.id);
            return Ok(report);
        }

        let mut order: Vec<usize> = (0..employees.len()).collect();
        order.sort_by(|&a, &b| match (&employees[a], &employees[b]) {
            (Some(x), Some(y)) => assignment_order(x, y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(&b),
        });

        let mut results: Vec<Option<EmployeeAssignment>> = vec![None; employees.len()];
        for position in order {
            let entry = match &employees[position] {
                None => {
                    warn!(position, "null employee in batch");
                    EmployeeAssignment {
                        position,
                        employee_id: None,
                        outcome: AssignmentOutcome::InvalidInput,
                    }
                }
                Some(employee) => {
                    let outcome = match self.assign_one(employee.id, from, to) {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!(
                                employee_id = employee.id,
                                payroll = employee.payroll,
                                error = %e,
                                "vacation assignment failed"
                            );
                            AssignmentOutcome::Failed {
                                error: e.to_string(),
                            }
                        }
                    };
                    EmployeeAssignment {
                        position,
                        employee_id: Some(employee.id),
                        outcome,
                    }
                }
            };
            results[position] = Some(entry);
        }

        Ok(AssignmentReport {
            start: Some(from),
            end: Some(to),
            schedule_id: Some(schedule.id),
            aborted: None,
            error: None,
            employees: results.into_iter().flatten().collect(),
        })
    }

    fn assign_one(
        &self,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AssignmentOutcome> {
        let employee = self
            .store
            .employee(employee_id)?
            .ok_or(RosterError::EmployeeNotFound(employee_id))?;

        if !employee.is_union_member() {
            return Ok(self.missing(&employee, MissingConfig::NotUnionMember));
        }
        let Some(group_id) = employee.group_id else {
            return Ok(self.missing(&employee, MissingConfig::NoGroup));
        };
        let policy = match employee.policy_id {
            Some(id) => self.store.seniority_policy(id)?,
            None => None,
        };
        let Some(policy) = policy else {
            return Ok(self.missing(&employee, MissingConfig::NoSeniorityPolicy));
        };

        let mut remaining = policy
            .auto_assignable_days
            .saturating_sub(employee.assigned_vacation_days);
        if remaining == 0 {
            info!(
                employee_id,
                payroll = employee.payroll,
                assigned = employee.assigned_vacation_days,
                "quota exhausted"
            );
            return Ok(AssignmentOutcome::QuotaExhausted);
        }

        let days: BTreeMap<NaiveDate, _> = self
            .store
            .calendar_days_for_employee(employee_id, start, end)?
            .into_iter()
            .map(|d| (d.date, d))
            .collect();

        let mut converted = 0;
        let mut dates = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            if remaining == 0 {
                break;
            }
            let status = self.visit(&employee, group_id, date, days.get(&date));
            if status == DateStatus::Converted {
                converted += 1;
                remaining -= 1;
            }
            dates.push(DateOutcome { date, status });
        }

        info!(
            employee_id,
            payroll = employee.payroll,
            converted,
            remaining,
            "vacation assignment finished"
        );
        Ok(AssignmentOutcome::Assigned {
            converted,
            remaining,
            dates,
        })
    }

    fn visit(
        &self,
        employee: &Employee,
        group_id: GroupId,
        date: NaiveDate,
        day: Option<&CalendarDay>,
    ) -> DateStatus {
        let employee_id = employee.id;
        if self.skip_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return DateStatus::Weekend;
        }
        let Some(day) = day else {
            warn!(employee_id, %date, "no calendar day for date");
            return DateStatus::NoCalendarDay;
        };
        if !day.is_labor() {
            let classification = day.classification();
            info!(employee_id, %date, %classification, "not a labor day");
            return DateStatus::NotLabor { classification };
        }

        match self.validator.can_add_absence(group_id, date) {
            Ok(true) => {}
            Ok(false) => {
                warn!(employee_id, group_id, %date, "absence percentage out of range");
                return DateStatus::OverThreshold;
            }
            Err(e) => {
                error!(employee_id, group_id, %date, error = %e, "absence check failed");
                return DateStatus::Failed {
                    error: e.to_string(),
                };
            }
        }

        match self.store.record_auto_vacation(employee_id, date) {
            Ok(vacation) => {
                info!(
                    employee_id,
                    %date,
                    vacation_id = vacation.id,
                    "vacation day assigned"
                );
                DateStatus::Converted
            }
            Err(e) => {
                error!(employee_id, %date, error = %e, "vacation day conversion failed");
                DateStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn missing(&self, employee: &Employee, reason: MissingConfig) -> AssignmentOutcome {
        warn!(
            employee_id = employee.id,
            payroll = employee.payroll,
            %reason,
            "vacation assignment skipped"
        );
        AssignmentOutcome::Missing { reason }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
