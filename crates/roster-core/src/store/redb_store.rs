//! Durable store on top of redb.
//!
//! # Table design
//!
//! Reference data lives in one table per entity, keyed by the record id
//! (`u64`) with a JSON-encoded value.
//!
//! Calendar days use two byte-keyed tables:
//! ```text
//! DAYS           [ employee_id: u64 BE | date: u32 BE ]                  -> JSON CalendarDay
//! DAYS_BY_GROUP  [ group_id: u64 BE | date: u32 BE | employee_id: u64 BE ] -> (empty)
//! ```
//!
//! Big-endian ids in the high bytes make byte order equal to
//! (employee, date) order, so one range scan returns an employee's days
//! chronologically and one prefix scan returns a group's roster for a date.
//! Every trait write runs in a single write transaction.

use std::path::Path;

use chrono::NaiveDate;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{convert_to_auto_vacation, date_key, holiday_overlaps, Dataset, Store};
use crate::error::{store_err, Result, RosterError};
use crate::model::{
    AnnualSchedule, Area, CalendarDay, CeilingException, Employee, Group, Holiday,
    InitialRoleAssignment, Leave, ManningException, Rule, SeniorityPolicy, ShiftSlot, Vacation,
    WeeklyRole,
};
use crate::types::{EmployeeId, GroupId, Payroll, RuleId};

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

type EntityTable = TableDefinition<'static, u64, &'static [u8]>;

const AREAS: EntityTable = TableDefinition::new("areas");
const GROUPS: EntityTable = TableDefinition::new("groups");
const EMPLOYEES: EntityTable = TableDefinition::new("employees");
const POLICIES: EntityTable = TableDefinition::new("seniority_policies");
const RULES: EntityTable = TableDefinition::new("rules");
const WEEKLY_ROLES: EntityTable = TableDefinition::new("weekly_roles");
const SLOTS: EntityTable = TableDefinition::new("shift_slots");
const INITIAL_ROLES: EntityTable = TableDefinition::new("initial_roles");
const HOLIDAYS: EntityTable = TableDefinition::new("holidays");
const LEAVES: EntityTable = TableDefinition::new("leaves");
const VACATIONS: EntityTable = TableDefinition::new("vacations");
const SCHEDULES: EntityTable = TableDefinition::new("schedules");
const MANNING_EXCEPTIONS: EntityTable = TableDefinition::new("manning_exceptions");
const CEILING_EXCEPTIONS: EntityTable = TableDefinition::new("ceiling_exceptions");

const ENTITY_TABLES: [EntityTable; 14] = [
    AREAS,
    GROUPS,
    EMPLOYEES,
    POLICIES,
    RULES,
    WEEKLY_ROLES,
    SLOTS,
    INITIAL_ROLES,
    HOLIDAYS,
    LEAVES,
    VACATIONS,
    SCHEDULES,
    MANNING_EXCEPTIONS,
    CEILING_EXCEPTIONS,
];

/// Key: 12 bytes (employee_id BE ++ date key). Value: JSON CalendarDay.
const DAYS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("calendar_days");

/// Key: 20 bytes (group_id BE ++ date key ++ employee_id BE). Value: empty.
const DAYS_BY_GROUP: TableDefinition<&[u8], &[u8]> = TableDefinition::new("calendar_days_by_group");

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn day_key(employee_id: EmployeeId, date: NaiveDate) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&employee_id.to_be_bytes());
    key[8..].copy_from_slice(&date_key(date));
    key
}

fn group_key(group_id: GroupId, date: NaiveDate, employee_id: EmployeeId) -> [u8; 20] {
    let mut key = [0u8; 20];
    key[..8].copy_from_slice(&group_id.to_be_bytes());
    key[8..12].copy_from_slice(&date_key(date));
    key[12..].copy_from_slice(&employee_id.to_be_bytes());
    key
}

fn employee_from_group_key(key: &[u8]) -> Option<EmployeeId> {
    let bytes: [u8; 8] = key.get(12..20)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

fn put<T: Serialize>(wt: &WriteTransaction, def: EntityTable, id: u64, item: &T) -> Result<()> {
    let value = serde_json::to_vec(item)?;
    let mut table = wt.open_table(def).map_err(store_err)?;
    table.insert(id, value.as_slice()).map_err(store_err)?;
    Ok(())
}

fn put_all<T: Serialize>(
    wt: &WriteTransaction,
    def: EntityTable,
    items: &[T],
    id: impl Fn(&T) -> u64,
) -> Result<()> {
    let mut table = wt.open_table(def).map_err(store_err)?;
    for item in items {
        let value = serde_json::to_vec(item)?;
        table.insert(id(item), value.as_slice()).map_err(store_err)?;
    }
    Ok(())
}

fn load_in<T: DeserializeOwned>(wt: &WriteTransaction, def: EntityTable, id: u64) -> Result<Option<T>> {
    let table = wt.open_table(def).map_err(store_err)?;
    let found = table.get(id).map_err(store_err)?;
    match found {
        Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
        None => Ok(None),
    }
}

/// Insert one day row and its group index entry unless the date already
/// has a row. Returns whether a row was written.
fn insert_day(wt: &WriteTransaction, day: &CalendarDay) -> Result<bool> {
    let key = day_key(day.employee_id, day.date);
    let mut days = wt.open_table(DAYS).map_err(store_err)?;
    if days.get(key.as_slice()).map_err(store_err)?.is_some() {
        return Ok(false);
    }
    let value = serde_json::to_vec(day)?;
    days.insert(key.as_slice(), value.as_slice())
        .map_err(store_err)?;
    if let Some(group_id) = day.group_id {
        let mut index = wt.open_table(DAYS_BY_GROUP).map_err(store_err)?;
        let gkey = group_key(group_id, day.date, day.employee_id);
        let empty: &[u8] = &[];
        index.insert(gkey.as_slice(), empty).map_err(store_err)?;
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database at `path`, creating every table so that
    /// reads never hit a missing one.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                crate::io::ensure_dir(parent)?;
            }
        }
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        for def in ENTITY_TABLES {
            wt.open_table(def).map_err(store_err)?;
        }
        wt.open_table(DAYS).map_err(store_err)?;
        wt.open_table(DAYS_BY_GROUP).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    fn get<T: DeserializeOwned>(&self, def: EntityTable, id: u64) -> Result<Option<T>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(def).map_err(store_err)?;
        let found = table.get(id).map_err(store_err)?;
        match found {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(
        &self,
        def: EntityTable,
        keep: impl Fn(&T) -> bool,
    ) -> Result<Vec<T>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(def).map_err(store_err)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            let item: T = serde_json::from_slice(v.value())?;
            if keep(&item) {
                result.push(item);
            }
        }
        Ok(result)
    }

    fn write<R>(&self, f: impl FnOnce(&WriteTransaction) -> Result<R>) -> Result<R> {
        let wt = self.db.begin_write().map_err(store_err)?;
        // An error drops `wt` uncommitted, which aborts the transaction.
        let out = f(&wt)?;
        wt.commit().map_err(store_err)?;
        Ok(out)
    }

    /// Number of calendar rows stored, across all employees.
    pub fn calendar_len(&self) -> Result<u64> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(DAYS).map_err(store_err)?;
        table.len().map_err(store_err)
    }
}

impl Store for RedbStore {
    fn areas(&self) -> Result<Vec<Area>> {
        self.scan(AREAS, |_| true)
    }

    fn groups(&self) -> Result<Vec<Group>> {
        self.scan(GROUPS, |_| true)
    }

    fn group(&self, id: GroupId) -> Result<Option<Group>> {
        self.get(GROUPS, id)
    }

    fn employees(&self) -> Result<Vec<Employee>> {
        self.scan(EMPLOYEES, |_| true)
    }

    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        self.get(EMPLOYEES, id)
    }

    fn save_employee(&self, employee: &Employee) -> Result<()> {
        self.write(|wt| put(wt, EMPLOYEES, employee.id, employee))
    }

    fn seniority_policies(&self) -> Result<Vec<SeniorityPolicy>> {
        self.scan(POLICIES, |_| true)
    }

    fn seniority_policy(&self, id: u64) -> Result<Option<SeniorityPolicy>> {
        self.get(POLICIES, id)
    }

    fn weekly_roles(&self) -> Result<Vec<WeeklyRole>> {
        self.scan(WEEKLY_ROLES, |_| true)
    }

    fn rule(&self, id: RuleId) -> Result<Option<Rule>> {
        self.get(RULES, id)
    }

    fn shift_slots(&self, rule_id: RuleId) -> Result<Vec<ShiftSlot>> {
        let mut slots: Vec<ShiftSlot> = self.scan(SLOTS, |s: &ShiftSlot| s.rule_id == rule_id)?;
        slots.sort_by_key(|s| (s.index, s.id));
        Ok(slots)
    }

    fn initial_role_assignments(&self, payroll: Payroll) -> Result<Vec<InitialRoleAssignment>> {
        self.scan(INITIAL_ROLES, |a: &InitialRoleAssignment| {
            a.payroll == payroll
        })
    }

    fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        self.scan(HOLIDAYS, |h: &Holiday| holiday_overlaps(h, start, end))
    }

    fn leaves_for(&self, payroll: Payroll, start: NaiveDate, end: NaiveDate) -> Result<Vec<Leave>> {
        self.scan(LEAVES, |l: &Leave| {
            l.payroll == payroll && l.date >= start && l.date <= end
        })
    }

    fn vacations_for(
        &self,
        payroll: Payroll,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vacation>> {
        self.scan(VACATIONS, |v: &Vacation| {
            v.payroll == payroll && v.date >= start && v.date <= end
        })
    }

    fn annual_schedules(&self) -> Result<Vec<AnnualSchedule>> {
        self.scan(SCHEDULES, |_| true)
    }

    fn manning_exceptions(&self, group_id: GroupId) -> Result<Vec<ManningException>> {
        self.scan(MANNING_EXCEPTIONS, |e: &ManningException| {
            e.group_id == group_id
        })
    }

    fn ceiling_exceptions(&self, group_id: GroupId) -> Result<Vec<CeilingException>> {
        self.scan(CEILING_EXCEPTIONS, |e: &CeilingException| {
            e.group_id == group_id
        })
    }

    fn calendar_day(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Option<CalendarDay>> {
        let key = day_key(employee_id, date);
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(DAYS).map_err(store_err)?;
        let found = table.get(key.as_slice()).map_err(store_err)?;
        match found {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
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
        let lower = day_key(employee_id, start);
        let upper = day_key(employee_id, end);
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(DAYS).map_err(store_err)?;

        let mut result = Vec::new();
        for entry in table
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(store_err)?
        {
            let (_, v) = entry.map_err(store_err)?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    fn calendar_days_for_group(&self, group_id: GroupId, date: NaiveDate) -> Result<Vec<CalendarDay>> {
        let lower = group_key(group_id, date, 0);
        let upper = group_key(group_id, date, u64::MAX);
        let rt = self.db.begin_read().map_err(store_err)?;
        let index = rt.open_table(DAYS_BY_GROUP).map_err(store_err)?;
        let days = rt.open_table(DAYS).map_err(store_err)?;

        let mut result = Vec::new();
        for entry in index
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(store_err)?
        {
            let (k, _) = entry.map_err(store_err)?;
            let Some(employee_id) = employee_from_group_key(k.value()) else {
                continue;
            };
            let key = day_key(employee_id, date);
            if let Some(v) = days.get(key.as_slice()).map_err(store_err)? {
                result.push(serde_json::from_slice(v.value())?);
            }
        }
        Ok(result)
    }

    fn write_calendar(&self, employee: Option<&Employee>, days: &[CalendarDay]) -> Result<usize> {
        self.write(|wt| {
            let mut written = 0;
            for day in days {
                if insert_day(wt, day)? {
                    written += 1;
                }
            }
            if let Some(e) = employee {
                put(wt, EMPLOYEES, e.id, e)?;
            }
            Ok(written)
        })
    }

    fn record_auto_vacation(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<Vacation> {
        self.write(|wt| {
            let mut employee: Employee = load_in(wt, EMPLOYEES, employee_id)?
                .ok_or(RosterError::EmployeeNotFound(employee_id))?;

            let key = day_key(employee_id, date);
            let mut day: CalendarDay = {
                let days = wt.open_table(DAYS).map_err(store_err)?;
                let found = days.get(key.as_slice()).map_err(store_err)?;
                let Some(v) = found else {
                    return Err(RosterError::CalendarDayNotFound { employee_id, date });
                };
                let day = serde_json::from_slice(v.value())?;
                day
            };

            let next_id = {
                let vacations = wt.open_table(VACATIONS).map_err(store_err)?;
                let last = vacations.last().map_err(store_err)?;
                last.map_or(1, |(k, _)| k.value() + 1)
            };
            let vacation = convert_to_auto_vacation(&mut day, next_id)?;
            employee.assigned_vacation_days += 1;

            put(wt, VACATIONS, vacation.id, &vacation)?;
            put(wt, EMPLOYEES, employee.id, &employee)?;
            let value = serde_json::to_vec(&day)?;
            let mut days = wt.open_table(DAYS).map_err(store_err)?;
            days.insert(key.as_slice(), value.as_slice())
                .map_err(store_err)?;
            Ok(vacation)
        })
    }

    fn import(&self, dataset: &Dataset) -> Result<()> {
        self.write(|wt| {
            put_all(wt, AREAS, &dataset.areas, |a| a.id)?;
            put_all(wt, GROUPS, &dataset.groups, |g| g.id)?;
            put_all(wt, EMPLOYEES, &dataset.employees, |e| e.id)?;
            put_all(wt, POLICIES, &dataset.seniority_policies, |p| p.id)?;
            put_all(wt, RULES, &dataset.rules, |r| r.id)?;
            put_all(wt, WEEKLY_ROLES, &dataset.weekly_roles, |r| r.id)?;
            put_all(wt, SLOTS, &dataset.shift_slots, |s| s.id)?;
            put_all(wt, INITIAL_ROLES, &dataset.initial_roles, |a| a.id)?;
            put_all(wt, HOLIDAYS, &dataset.holidays, |h| h.id)?;
            put_all(wt, LEAVES, &dataset.leaves, |l| l.id)?;
            put_all(wt, VACATIONS, &dataset.vacations, |v| v.id)?;
            put_all(wt, SCHEDULES, &dataset.schedules, |s| s.id)?;
            put_all(wt, MANNING_EXCEPTIONS, &dataset.manning_exceptions, |e| e.id)?;
            put_all(wt, CEILING_EXCEPTIONS, &dataset.ceiling_exceptions, |e| e.id)?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
