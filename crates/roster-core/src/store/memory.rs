//! In-process store backed by ordered maps behind a mutex.
//!
//! Used by tests and by callers that load a [`Dataset`] and only need the
//! results in memory.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use super::{convert_to_auto_vacation, holiday_overlaps, Dataset, Store};
use crate::error::{store_err, Result, RosterError};
use crate::model::{
    AnnualSchedule, Area, CalendarDay, CeilingException, Employee, Group, Holiday,
    InitialRoleAssignment, Leave, ManningException, Rule, SeniorityPolicy, ShiftSlot, Vacation,
    WeeklyRole,
};
use crate::types::{EmployeeId, GroupId, Payroll, RuleId};

#[derive(Default)]
struct Inner {
    areas: BTreeMap<u64, Area>,
    groups: BTreeMap<u64, Group>,
    employees: BTreeMap<u64, Employee>,
    policies: BTreeMap<u64, SeniorityPolicy>,
    rules: BTreeMap<u64, Rule>,
    weekly_roles: BTreeMap<u64, WeeklyRole>,
    slots: BTreeMap<u64, ShiftSlot>,
    initial_roles: BTreeMap<u64, InitialRoleAssignment>,
    holidays: BTreeMap<u64, Holiday>,
    leaves: BTreeMap<u64, Leave>,
    vacations: BTreeMap<u64, Vacation>,
    schedules: BTreeMap<u64, AnnualSchedule>,
    manning_exceptions: BTreeMap<u64, ManningException>,
    ceiling_exceptions: BTreeMap<u64, CeilingException>,
    days: BTreeMap<(EmployeeId, NaiveDate), CalendarDay>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let store = Self::new();
        store.import(dataset)?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(store_err)
    }
}

fn fill<T: Clone>(map: &mut BTreeMap<u64, T>, items: &[T], id: impl Fn(&T) -> u64) {
    for item in items {
        map.insert(id(item), item.clone());
    }
}

impl Store for MemoryStore {
    fn areas(&self) -> Result<Vec<Area>> {
        Ok(self.lock()?.areas.values().cloned().collect())
    }

    fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.lock()?.groups.values().cloned().collect())
    }

    fn group(&self, id: GroupId) -> Result<Option<Group>> {
        Ok(self.lock()?.groups.get(&id).cloned())
    }

    fn employees(&self) -> Result<Vec<Employee>> {
        Ok(self.lock()?.employees.values().cloned().collect())
    }

    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        Ok(self.lock()?.employees.get(&id).cloned())
    }

    fn save_employee(&self, employee: &Employee) -> Result<()> {
        self.lock()?
            .employees
            .insert(employee.id, employee.clone());
        Ok(())
    }

    fn seniority_policies(&self) -> Result<Vec<SeniorityPolicy>> {
        Ok(self.lock()?.policies.values().cloned().collect())
    }

    fn weekly_roles(&self) -> Result<Vec<WeeklyRole>> {
        Ok(self.lock()?.weekly_roles.values().cloned().collect())
    }

    fn rule(&self, id: RuleId) -> Result<Option<Rule>> {
        Ok(self.lock()?.rules.get(&id).cloned())
    }

    fn shift_slots(&self, rule_id: RuleId) -> Result<Vec<ShiftSlot>> {
        let mut slots: Vec<ShiftSlot> = self
            .lock()?
            .slots
            .values()
            .filter(|s| s.rule_id == rule_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.index, s.id));
        Ok(slots)
    }

    fn initial_role_assignments(&self, payroll: Payroll) -> Result<Vec<InitialRoleAssignment>> {
        Ok(self
            .lock()?
            .initial_roles
            .values()
            .filter(|a| a.payroll == payroll)
            .cloned()
            .collect())
    }

    fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        Ok(self
            .lock()?
            .holidays
            .values()
            .filter(|h| holiday_overlaps(h, start, end))
            .cloned()
            .collect())
    }

    fn leaves_for(&self, payroll: Payroll, start: NaiveDate, end: NaiveDate) -> Result<Vec<Leave>> {
        Ok(self
            .lock()?
            .leaves
            .values()
            .filter(|l| l.payroll == payroll && l.date >= start && l.date <= end)
            .cloned()
            .collect())
    }

    fn vacations_for(
        &self,
        payroll: Payroll,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vacation>> {
        Ok(self
            .lock()?
            .vacations
            .values()
            .filter(|v| v.payroll == payroll && v.date >= start && v.date <= end)
            .cloned()
            .collect())
    }

    fn annual_schedules(&self) -> Result<Vec<AnnualSchedule>> {
        Ok(self.lock()?.schedules.values().cloned().collect())
    }

    fn manning_exceptions(&self, group_id: GroupId) -> Result<Vec<ManningException>> {
        Ok(self
            .lock()?
            .manning_exceptions
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect())
    }

    fn ceiling_exceptions(&self, group_id: GroupId) -> Result<Vec<CeilingException>> {
        Ok(self
            .lock()?
            .ceiling_exceptions
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect())
    }

    fn calendar_day(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Option<CalendarDay>> {
        Ok(self.lock()?.days.get(&(employee_id, date)).cloned())
    }

    fn calendar_days_for_employee(
        &self,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .lock()?
            .days
            .range((employee_id, start)..=(employee_id, end))
            .map(|(_, d)| d.clone())
            .collect())
    }

    fn calendar_days_for_group(&self, group_id: GroupId, date: NaiveDate) -> Result<Vec<CalendarDay>> {
        Ok(self
            .lock()?
            .days
            .values()
            .filter(|d| d.group_id == Some(group_id) && d.date == date)
            .cloned()
            .collect())
    }

    fn write_calendar(&self, employee: Option<&Employee>, days: &[CalendarDay]) -> Result<usize> {
        let mut inner = self.lock()?;
        let mut written = 0;
        for day in days {
            let key = (day.employee_id, day.date);
            if inner.days.contains_key(&key) {
                continue;
            }
            inner.days.insert(key, day.clone());
            written += 1;
        }
        if let Some(e) = employee {
            inner.employees.insert(e.id, e.clone());
        }
        Ok(written)
    }

    fn record_auto_vacation(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Vacation> {
        let mut inner = self.lock()?;
        let mut employee = inner
            .employees
            .get(&employee_id)
            .cloned()
            .ok_or(RosterError::EmployeeNotFound(employee_id))?;
        let mut day = inner
            .days
            .get(&(employee_id, date))
            .cloned()
            .ok_or(RosterError::CalendarDayNotFound { employee_id, date })?;

        let next_id = inner.vacations.keys().next_back().map_or(1, |id| id + 1);
        let vacation = convert_to_auto_vacation(&mut day, next_id)?;
        employee.assigned_vacation_days += 1;

        inner.vacations.insert(vacation.id, vacation.clone());
        inner.days.insert((employee_id, date), day);
        inner.employees.insert(employee_id, employee);
        Ok(vacation)
    }

    fn import(&self, dataset: &Dataset) -> Result<()> {
        let mut inner = self.lock()?;
        fill(&mut inner.areas, &dataset.areas, |a| a.id);
        fill(&mut inner.groups, &dataset.groups, |g| g.id);
        fill(&mut inner.employees, &dataset.employees, |e| e.id);
        fill(&mut inner.policies, &dataset.seniority_policies, |p| p.id);
        fill(&mut inner.rules, &dataset.rules, |r| r.id);
        fill(&mut inner.weekly_roles, &dataset.weekly_roles, |r| r.id);
        fill(&mut inner.slots, &dataset.shift_slots, |s| s.id);
        fill(&mut inner.initial_roles, &dataset.initial_roles, |a| a.id);
        fill(&mut inner.holidays, &dataset.holidays, |h| h.id);
        fill(&mut inner.leaves, &dataset.leaves, |l| l.id);
        fill(&mut inner.vacations, &dataset.vacations, |v| v.id);
        fill(&mut inner.schedules, &dataset.schedules, |s| s.id);
        fill(&mut inner.manning_exceptions, &dataset.manning_exceptions, |e| e.id);
        fill(&mut inner.ceiling_exceptions, &dataset.ceiling_exceptions, |e| e.id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
