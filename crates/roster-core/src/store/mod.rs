//! Persistence seam for the engine.
//!
//! The engine never navigates object graphs: every lookup is an explicit
//! query keyed by id, payroll, group or date, returning plain records.
//! Writes that must land together are single calls (`write_calendar`,
//! `record_auto_vacation`) so each store can run them in one unit of work.

pub mod memory;
pub mod redb_store;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::model::{
    AnnualSchedule, Area, CalendarDay, CeilingException, DayKind, Employee, Group, Holiday,
    InitialRoleAssignment, Leave, ManningException, Rule, SeniorityPolicy, ShiftSlot, Vacation,
    WeeklyRole,
};
use crate::types::{
    EmployeeId, GroupId, Payroll, PolicyId, RuleId, Shift, VacationId, VacationKind,
};

pub use self::memory::MemoryStore;
pub use self::redb_store::RedbStore;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub trait Store {
    // --- organisation ---

    fn areas(&self) -> Result<Vec<Area>>;
    fn groups(&self) -> Result<Vec<Group>>;
    fn employees(&self) -> Result<Vec<Employee>>;
    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>>;
    fn save_employee(&self, employee: &Employee) -> Result<()>;

    fn group(&self, id: GroupId) -> Result<Option<Group>> {
        Ok(self.groups()?.into_iter().find(|g| g.id == id))
    }

    // --- reference data ---

    fn seniority_policies(&self) -> Result<Vec<SeniorityPolicy>>;
    fn weekly_roles(&self) -> Result<Vec<WeeklyRole>>;
    fn rule(&self, id: RuleId) -> Result<Option<Rule>>;
    /// Slots of one rule, ordered by cycle index.
    fn shift_slots(&self, rule_id: RuleId) -> Result<Vec<ShiftSlot>>;
    fn initial_role_assignments(&self, payroll: Payroll) -> Result<Vec<InitialRoleAssignment>>;
    /// Holidays overlapping `[start, end]`.
    fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>>;
    fn leaves_for(&self, payroll: Payroll, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Leave>>;
    fn vacations_for(
        &self,
        payroll: Payroll,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vacation>>;
    fn annual_schedules(&self) -> Result<Vec<AnnualSchedule>>;
    fn manning_exceptions(&self, group_id: GroupId) -> Result<Vec<ManningException>>;
    fn ceiling_exceptions(&self, group_id: GroupId) -> Result<Vec<CeilingException>>;

    fn seniority_policy(&self, id: PolicyId) -> Result<Option<SeniorityPolicy>> {
        Ok(self.seniority_policies()?.into_iter().find(|p| p.id == id))
    }

    fn weekly_role_by_name(&self, name: &str) -> Result<Option<WeeklyRole>> {
        Ok(self
            .weekly_roles()?
            .into_iter()
            .filter(|r| r.name == name)
            .min_by_key(|r| r.id))
    }

    /// The pending or in-progress schedule; the lowest id wins if several are.
    fn active_schedule(&self) -> Result<Option<AnnualSchedule>> {
        Ok(self
            .annual_schedules()?
            .into_iter()
            .filter(|s| s.status.is_active())
            .min_by_key(|s| s.id))
    }

    fn manning_override(&self, group_id: GroupId, date: NaiveDate) -> Result<Option<u32>> {
        Ok(self
            .manning_exceptions(group_id)?
            .into_iter()
            .filter(|e| e.applies_to(group_id, date))
            .min_by_key(|e| e.id)
            .map(|e| e.required))
    }

    fn ceiling_override(&self, group_id: GroupId, date: NaiveDate) -> Result<Option<f64>> {
        Ok(self
            .ceiling_exceptions(group_id)?
            .into_iter()
            .filter(|e| e.date == date)
            .min_by_key(|e| e.id)
            .map(|e| e.max_percent))
    }

    // --- calendar ---

    fn calendar_day(&self, employee_id: EmployeeId, date: NaiveDate)
        -> Result<Option<CalendarDay>>;
    /// Days of one employee inside `[start, end]`, in date order.
    fn calendar_days_for_employee(
        &self,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>>;
    fn calendar_days_for_group(&self, group_id: GroupId, date: NaiveDate)
        -> Result<Vec<CalendarDay>>;

    /// Insert new day rows and, when given, the updated employee, in one
    /// unit of work. Rows for dates that already exist are left untouched.
    /// Returns how many rows were inserted.
    fn write_calendar(&self, employee: Option<&Employee>, days: &[CalendarDay]) -> Result<usize>;

    /// Turn one labor day into an auto-assigned vacation day: creates the
    /// vacation record, rewrites the day and bumps the employee's assigned
    /// count, all in one unit of work.
    fn record_auto_vacation(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Vacation>;

    // --- bulk load ---

    fn import(&self, dataset: &Dataset) -> Result<()>;
}

/// Rewrite a labor day in place as an auto-assigned vacation and return the
/// vacation record that now backs it.
pub(crate) fn convert_to_auto_vacation(
    day: &mut CalendarDay,
    vacation_id: VacationId,
) -> Result<Vacation> {
    if !day.is_labor() {
        return Err(RosterError::NotLaborDay {
            employee_id: day.employee_id,
            date: day.date,
        });
    }
    let vacation = Vacation {
        id: vacation_id,
        payroll: day.payroll,
        date: day.date,
        kind: VacationKind::AutoAssigned,
        covered_shift: Some(day.shift),
    };
    day.kind = DayKind::AutoVacation {
        vacation_id: vacation.id,
    };
    day.shift = Shift::Rest;
    Ok(vacation)
}

pub(crate) fn holiday_overlaps(h: &Holiday, start: NaiveDate, end: NaiveDate) -> bool {
    h.start <= end && start <= h.end
}

/// Order-preserving encoding of a date for big-endian byte keys.
pub(crate) fn date_key(date: NaiveDate) -> [u8; 4] {
    ((date.num_days_from_ce() as u32) ^ 0x8000_0000).to_be_bytes()
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Reference data as it is kept in YAML files and imported into a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub seniority_policies: Vec<SeniorityPolicy>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub weekly_roles: Vec<WeeklyRole>,
    #[serde(default)]
    pub shift_slots: Vec<ShiftSlot>,
    #[serde(default)]
    pub initial_roles: Vec<InitialRoleAssignment>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    #[serde(default)]
    pub vacations: Vec<Vacation>,
    #[serde(default)]
    pub schedules: Vec<AnnualSchedule>,
    #[serde(default)]
    pub manning_exceptions: Vec<ManningException>,
    #[serde(default)]
    pub ceiling_exceptions: Vec<CeilingException>,
}

impl Dataset {
    pub fn from_yaml(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
