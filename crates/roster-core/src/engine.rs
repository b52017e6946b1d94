//! Entry points that wire the store, configuration and components together.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::assigner::{AssignmentAbort, AssignmentReport, VacationQuotaAssigner};
use crate::config::Config;
use crate::error::{Result, RosterError};
use crate::generator::{CalendarGenerator, GenerationReport};
use crate::manning::ManningValidator;
use crate::model::{AnnualSchedule, Employee};
use crate::roster;
use crate::seniority;
use crate::store::Store;
use crate::types::{AreaId, EmployeeId, GroupId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group_id: GroupId,
    #[serde(flatten)]
    pub report: AssignmentReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRun {
    pub area_id: AreaId,
    pub generation: GenerationReport,
    pub groups: Vec<GroupAssignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seniority_updated: usize,
    pub assignment_start: Option<NaiveDate>,
    pub assignment_end: Option<NaiveDate>,
    pub areas: Vec<AreaRun>,
}

impl RunReport {
    pub fn days_written(&self) -> usize {
        self.areas.iter().map(|a| a.generation.days_written()).sum()
    }

    pub fn days_converted(&self) -> u32 {
        self.areas
            .iter()
            .flat_map(|a| a.groups.iter())
            .map(|g| g.report.converted())
            .sum()
    }
}

pub struct Engine<'a> {
    store: &'a dyn Store,
    config: &'a Config,
}

impl<'a> Engine<'a> {
    pub fn new(store: &'a dyn Store, config: &'a Config) -> Self {
        Self { store, config }
    }

    pub fn validator(&self) -> ManningValidator<'a> {
        ManningValidator::new(self.store, self.config.manning.max_absence_percent)
    }

    /// `[schedule.start + lead_days, schedule.end - tail_days]`, or `None`
    /// when the offsets leave nothing.
    pub fn assignment_window(&self, schedule: &AnnualSchedule) -> Option<(NaiveDate, NaiveDate)> {
        let lead = u64::try_from(self.config.assignment.lead_days).ok()?;
        let tail = u64::try_from(self.config.assignment.tail_days).ok()?;
        let start = schedule.start.checked_add_days(Days::new(lead))?;
        let end = schedule.end.checked_sub_days(Days::new(tail))?;
        (start <= end).then_some((start, end))
    }

    /// Generate for the given ids. Unknown ids are reported as invalid input.
    pub fn generate(
        &self,
        ids: &[EmployeeId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GenerationReport> {
        let mut employees = Vec::with_capacity(ids.len());
        for id in ids {
            let employee = self.store.employee(*id)?;
            if employee.is_none() {
                warn!(employee_id = id, "employee not found");
            }
            employees.push(employee);
        }
        CalendarGenerator::new(self.store).generate_batch(&employees, start, end)
    }

    pub fn generate_all_union(&self, start: NaiveDate, end: NaiveDate) -> Result<GenerationReport> {
        let employees: Vec<Option<Employee>> = self
            .store
            .employees()?
            .into_iter()
            .filter(|e| e.active && e.is_union_member())
            .map(Some)
            .collect();
        CalendarGenerator::new(self.store).generate_batch(&employees, start, end)
    }

    pub fn assign_group(
        &self,
        group_id: GroupId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AssignmentReport> {
        let employees: Vec<Option<Employee>> = roster::union_employees_with_quota(self.store, group_id)?
            .into_iter()
            .map(Some)
            .collect();
        info!(group_id, employees = employees.len(), "assigning vacations");
        let validator = self.validator();
        VacationQuotaAssigner::new(self.store, &validator)
            .skip_weekends(self.config.assignment.skip_weekends)
            .assign(&employees, start, end)
    }

    /// [`Engine::assign_group`] with its error folded into the report.
    fn assign_group_or_fail(
        &self,
        group_id: GroupId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AssignmentReport {
        self.assign_group(group_id, start, end)
            .unwrap_or_else(|e| {
                error!(group_id, error = %e, "group vacation assignment failed");
                AssignmentReport::failed(e)
            })
    }

    /// Every group, ordered by area then id. A group that fails is recorded
    /// and the rest still run.
    pub fn assign_all(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<GroupAssignment>> {
        if start > end {
            return Err(RosterError::InvalidWindow { start, end });
        }
        let mut groups = self.store.groups()?;
        groups.sort_by_key(|g| (g.area_id, g.id));
        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            let report = self.assign_group_or_fail(group.id, start, end);
            out.push(GroupAssignment {
                group_id: group.id,
                report,
            });
        }
        Ok(out)
    }

    /// Seniority refresh, then per area: calendars for its union members,
    /// then vacation assignment per group over the schedule-derived window.
    pub fn run_full(&self, start: NaiveDate, end: NaiveDate) -> Result<RunReport> {
        if start > end {
            return Err(RosterError::InvalidWindow { start, end });
        }
        let seniority_updated = seniority::refresh_all(self.store, start)?;
        let window = match self.store.active_schedule()? {
            Some(schedule) => {
                let window = self.assignment_window(&schedule);
                if window.is_none() {
                    warn!(schedule_id = schedule.id, "assignment window is empty");
                }
                Some(window)
            }
            None => None,
        };

        let mut areas = self.store.areas()?;
        areas.sort_by_key(|a| a.id);
        let mut groups = self.store.groups()?;
        groups.sort_by_key(|g| g.id);

        let mut report = RunReport {
            seniority_updated,
            assignment_start: window.flatten().map(|w| w.0),
            assignment_end: window.flatten().map(|w| w.1),
            areas: Vec::with_capacity(areas.len()),
        };

        for area in areas {
            let employees: Vec<Option<Employee>> = roster::union_employees_in_area(self.store, area.id)?
                .into_iter()
                .map(Some)
                .collect();
            info!(area_id = area.id, employees = employees.len(), "generating area calendars");
            let generation = CalendarGenerator::new(self.store).generate_batch(&employees, start, end)?;

            let mut group_reports = Vec::new();
            for group in groups.iter().filter(|g| g.area_id == area.id) {
                let report = match window {
                    // No active schedule: the assigner reports it.
                    None => self.assign_group_or_fail(group.id, start, end),
                    Some(None) => AssignmentReport::aborted(AssignmentAbort::WindowOutsideSchedule),
                    Some(Some((from, to))) => self.assign_group_or_fail(group.id, from, to),
                };
                group_reports.push(GroupAssignment {
                    group_id: group.id,
                    report,
                });
            }

            report.areas.push(AreaRun {
                area_id: area.id,
                generation,
                groups: group_reports,
            });
        }

        info!(
            days_written = report.days_written(),
            days_converted = report.days_converted(),
            "full run finished"
        );
        Ok(report)
    }
}
