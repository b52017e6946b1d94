//! Builders shared by unit tests.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{store_err, Result};
use crate::model::{
    AnnualSchedule, Area, CalendarDay, CeilingException, DayKind, Employee, Group, Holiday,
    InitialRoleAssignment, Leave, ManningException, Rule, SeniorityPolicy, ShiftSlot, Vacation,
    WeeklyRole,
};
use crate::store::{Dataset, MemoryStore, Store};
use crate::types::{
    AreaId, EmployeeId, GroupId, LeaveType, Payroll, PolicyId, Role, RuleId, ScheduleStatus,
    Shift, SlotActivity, WeeklyRoleId,
};

pub const AREA: AreaId = 1;
pub const GROUP: GroupId = 10;
pub const RULE: RuleId = 1;
pub const WEEKLY_ROLE: WeeklyRoleId = 1;
pub const ROLE_NAME: &str = "R1";
pub const POLICY: PolicyId = 1;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn union_employee(id: EmployeeId, payroll: Payroll) -> Employee {
    let mut e = Employee::new(id, payroll, format!("Employee {id}"));
    e.hire_date = Some(date(2015, 1, 5));
    e.group_id = Some(GROUP);
    e.area_id = Some(AREA);
    e.roles = vec![Role::Unionized];
    e.policy_id = Some(POLICY);
    e
}

pub fn policy(id: PolicyId, from: u32, to: Option<u32>, auto: u32) -> SeniorityPolicy {
    SeniorityPolicy {
        id,
        years_from: from,
        years_to: to,
        total_days: 12 + auto,
        company_assigned_days: 12,
        auto_assignable_days: auto,
        employee_selectable_days: 0,
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One area, one group, a 7-slot weekly rule starting on Monday, a policy
/// granting 3 automatic days to everyone and an in-progress 2025 schedule.
/// With `all_labor` every slot is a morning labor day; otherwise Saturday
/// and Sunday are weekly rest.
pub fn reference_data(all_labor: bool) -> Dataset {
    let shift_slots = WEEK
        .iter()
        .enumerate()
        .map(|(i, weekday)| {
            let rest = !all_labor && matches!(weekday, Weekday::Sat | Weekday::Sun);
            ShiftSlot {
                id: 100 + i as u64,
                rule_id: RULE,
                weekly_role_id: WEEKLY_ROLE,
                index: i as u32,
                weekday: *weekday,
                shift: if rest { Shift::Rest } else { Shift::Morning },
                activity: if rest {
                    SlotActivity::WeeklyRest
                } else {
                    SlotActivity::Labor
                },
            }
        })
        .collect();

    Dataset {
        areas: vec![Area {
            id: AREA,
            name: "Assembly".into(),
        }],
        groups: vec![Group {
            id: GROUP,
            area_id: AREA,
            name: "A".into(),
            manning: 1,
        }],
        seniority_policies: vec![policy(POLICY, 0, Some(60), 3)],
        rules: vec![Rule {
            id: RULE,
            name: "Weekly".into(),
            description: None,
        }],
        weekly_roles: vec![WeeklyRole {
            id: WEEKLY_ROLE,
            rule_id: RULE,
            name: ROLE_NAME.into(),
        }],
        shift_slots,
        schedules: vec![AnnualSchedule {
            id: 1,
            year: 2025,
            start: date(2025, 1, 1),
            end: date(2025, 12, 31),
            status: ScheduleStatus::InProgress,
        }],
        ..Dataset::default()
    }
}

/// Add `employee` with an initial role effective on Monday 2025-01-06.
pub fn add_employee(ds: &mut Dataset, employee: Employee) {
    ds.initial_roles.push(InitialRoleAssignment {
        id: ds.initial_roles.len() as u64 + 1,
        payroll: employee.payroll,
        weekly_role: ROLE_NAME.into(),
        effective: date(2025, 1, 6),
    });
    ds.employees.push(employee);
}

/// A group of `members` with rows on `date` only: the first `labor` work,
/// the next `on_leave` are on leave, the rest are on weekly rest. The
/// group's manning equals `members`.
pub fn group_on_date(members: u32, labor: u32, on_leave: u32, date: NaiveDate) -> MemoryStore {
    let ds = Dataset {
        groups: vec![Group {
            id: GROUP,
            area_id: AREA,
            name: "A".into(),
            manning: members,
        }],
        employees: (1..=members as u64)
            .map(|id| union_employee(id, 1000 + id as u32))
            .collect(),
        ..Dataset::default()
    };
    let store = MemoryStore::from_dataset(&ds).unwrap();

    let days: Vec<CalendarDay> = (1..=members)
        .map(|n| {
            let kind = if n <= labor {
                DayKind::Labor { slot_id: 100 }
            } else if n <= labor + on_leave {
                DayKind::Leave {
                    leave_id: n as u64,
                    leave_type: LeaveType::SickLeave,
                }
            } else {
                DayKind::WeeklyRest { slot_id: 105 }
            };
            CalendarDay {
                employee_id: n as u64,
                payroll: 1000 + n,
                group_id: Some(GROUP),
                area_id: Some(AREA),
                date,
                weekday: date.weekday(),
                shift: if n <= labor { Shift::Morning } else { Shift::Rest },
                kind,
                schedule_id: Some(1),
            }
        })
        .collect();
    store.write_calendar(None, &days).unwrap();
    store
}

// ---------------------------------------------------------------------------
// FailingStore
// ---------------------------------------------------------------------------

/// Delegates to a [`MemoryStore`] but fails selected reads and writes.
pub struct FailingStore {
    inner: MemoryStore,
    calendar_failures: HashSet<EmployeeId>,
    conversion_failures: HashSet<(EmployeeId, NaiveDate)>,
    policy_failures: HashSet<PolicyId>,
    save_failures: HashSet<EmployeeId>,
    schedules_fail: bool,
}

impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calendar_failures: HashSet::new(),
            conversion_failures: HashSet::new(),
            policy_failures: HashSet::new(),
            save_failures: HashSet::new(),
            schedules_fail: false,
        }
    }

    pub fn fail_calendar_for(mut self, employee_id: EmployeeId) -> Self {
        self.calendar_failures.insert(employee_id);
        self
    }

    pub fn fail_conversion(mut self, employee_id: EmployeeId, date: NaiveDate) -> Self {
        self.conversion_failures.insert((employee_id, date));
        self
    }

    pub fn fail_policy(mut self, policy_id: PolicyId) -> Self {
        self.policy_failures.insert(policy_id);
        self
    }

    pub fn fail_save_for(mut self, employee_id: EmployeeId) -> Self {
        self.save_failures.insert(employee_id);
        self
    }

    pub fn fail_schedules(mut self) -> Self {
        self.schedules_fail = true;
        self
    }
}

impl Store for FailingStore {
    fn areas(&self) -> Result<Vec<Area>> {
        self.inner.areas()
    }
    fn groups(&self) -> Result<Vec<Group>> {
        self.inner.groups()
    }
    fn employees(&self) -> Result<Vec<Employee>> {
        self.inner.employees()
    }
    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        self.inner.employee(id)
    }
    fn save_employee(&self, employee: &Employee) -> Result<()> {
        if self.save_failures.contains(&employee.id) {
            return Err(store_err(format!(
                "write conflict on employee {}",
                employee.id
            )));
        }
        self.inner.save_employee(employee)
    }
    fn seniority_policies(&self) -> Result<Vec<SeniorityPolicy>> {
        self.inner.seniority_policies()
    }
    fn seniority_policy(&self, id: PolicyId) -> Result<Option<SeniorityPolicy>> {
        if self.policy_failures.contains(&id) {
            return Err(store_err(format!("read failure on policy {id}")));
        }
        self.inner.seniority_policy(id)
    }
    fn weekly_roles(&self) -> Result<Vec<WeeklyRole>> {
        self.inner.weekly_roles()
    }
    fn rule(&self, id: RuleId) -> Result<Option<Rule>> {
        self.inner.rule(id)
    }
    fn shift_slots(&self, rule_id: RuleId) -> Result<Vec<ShiftSlot>> {
        self.inner.shift_slots(rule_id)
    }
    fn initial_role_assignments(&self, payroll: Payroll) -> Result<Vec<InitialRoleAssignment>> {
        self.inner.initial_role_assignments(payroll)
    }
    fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        self.inner.holidays_between(start, end)
    }
    fn leaves_for(&self, payroll: Payroll, start: NaiveDate, end: NaiveDate) -> Result<Vec<Leave>> {
        self.inner.leaves_for(payroll, start, end)
    }
    fn vacations_for(
        &self,
        payroll: Payroll,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vacation>> {
        self.inner.vacations_for(payroll, start, end)
    }
    fn annual_schedules(&self) -> Result<Vec<AnnualSchedule>> {
        if self.schedules_fail {
            return Err(store_err("schedule table unavailable"));
        }
        self.inner.annual_schedules()
    }
    fn manning_exceptions(&self, group_id: GroupId) -> Result<Vec<ManningException>> {
        self.inner.manning_exceptions(group_id)
    }
    fn ceiling_exceptions(&self, group_id: GroupId) -> Result<Vec<CeilingException>> {
        self.inner.ceiling_exceptions(group_id)
    }
    fn calendar_day(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Option<CalendarDay>> {
        self.inner.calendar_day(employee_id, date)
    }
    fn calendar_days_for_employee(
        &self,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>> {
        self.inner.calendar_days_for_employee(employee_id, start, end)
    }
    fn calendar_days_for_group(&self, group_id: GroupId, date: NaiveDate) -> Result<Vec<CalendarDay>> {
        self.inner.calendar_days_for_group(group_id, date)
    }

    fn write_calendar(&self, employee: Option<&Employee>, days: &[CalendarDay]) -> Result<usize> {
        if let Some(day) = days
            .iter()
            .find(|d| self.calendar_failures.contains(&d.employee_id))
        {
            return Err(store_err(format!(
                "disk full writing calendar of employee {}",
                day.employee_id
            )));
        }
        self.inner.write_calendar(employee, days)
    }

    fn record_auto_vacation(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Vacation> {
        if self.conversion_failures.contains(&(employee_id, date)) {
            return Err(store_err(format!("lock timeout on {date}")));
        }
        self.inner.record_auto_vacation(employee_id, date)
    }

    fn import(&self, dataset: &Dataset) -> Result<()> {
        self.inner.import(dataset)
    }
}
