//! Plain data records the engine reads and writes.
//!
//! Records reference each other by id only. Navigation happens through
//! the query functions on [`crate::store::Store`].

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::{
    AreaId, Classification, EmployeeId, GroupId, HolidayCategory, HolidayId, LeaveId, LeaveType,
    Payroll, PolicyId, Role, RuleId, ScheduleId, ScheduleStatus, Shift, SlotActivity, SlotId,
    VacationId, VacationKind, WeeklyRoleId,
};

// ---------------------------------------------------------------------------
// Organisation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub area_id: AreaId,
    pub name: String,
    /// Target staffing level; the denominator of absence percentages.
    pub manning: u32,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub payroll: Payroll,
    pub name: String,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub seniority_days: Option<i64>,
    #[serde(default)]
    pub seniority_years: Option<u32>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub policy_id: Option<PolicyId>,
    /// Vacation days the engine has already assigned automatically.
    #[serde(default)]
    pub assigned_vacation_days: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Employee {
    pub fn new(id: EmployeeId, payroll: Payroll, name: impl Into<String>) -> Self {
        Self {
            id,
            payroll,
            name: name.into(),
            hire_date: None,
            seniority_days: None,
            seniority_years: None,
            group_id: None,
            area_id: None,
            roles: Vec::new(),
            policy_id: None,
            assigned_vacation_days: 0,
            active: true,
        }
    }

    pub fn is_union_member(&self) -> bool {
        self.roles.contains(&Role::Unionized)
    }
}

// ---------------------------------------------------------------------------
// Seniority policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeniorityPolicy {
    pub id: PolicyId,
    pub years_from: u32,
    /// Inclusive. `None` means the policy applies to exactly `years_from`.
    #[serde(default)]
    pub years_to: Option<u32>,
    pub total_days: u32,
    #[serde(default)]
    pub company_assigned_days: u32,
    /// Sub-quota the engine may assign without employee selection.
    pub auto_assignable_days: u32,
    #[serde(default)]
    pub employee_selectable_days: u32,
}

impl SeniorityPolicy {
    pub fn matches(&self, years: u32) -> bool {
        match self.years_to {
            Some(to) => years >= self.years_from && years <= to,
            None => years == self.years_from,
        }
    }
}

// ---------------------------------------------------------------------------
// Rotation reference data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One position in a rule's repeating cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub id: SlotId,
    pub rule_id: RuleId,
    pub weekly_role_id: WeeklyRoleId,
    /// Position in the cycle, unique within the rule.
    pub index: u32,
    pub weekday: Weekday,
    pub shift: Shift,
    pub activity: SlotActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRole {
    pub id: WeeklyRoleId,
    pub rule_id: RuleId,
    pub name: String,
}

/// Seeds an employee's position in the rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialRoleAssignment {
    pub id: u64,
    pub payroll: Payroll,
    pub weekly_role: String,
    pub effective: NaiveDate,
}

// ---------------------------------------------------------------------------
// Calendar sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: HolidayId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub category: HolidayCategory,
    #[serde(default)]
    pub detail: String,
}

impl Holiday {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leave {
    pub id: LeaveId,
    pub payroll: Payroll,
    pub date: NaiveDate,
    pub leave_type: LeaveType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacation {
    pub id: VacationId,
    pub payroll: Payroll,
    pub date: NaiveDate,
    pub kind: VacationKind,
    /// Shift the employee would have worked, for auto-assigned days.
    #[serde(default)]
    pub covered_shift: Option<Shift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSchedule {
    pub id: ScheduleId,
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: ScheduleStatus,
}

impl AnnualSchedule {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Manning overrides
// ---------------------------------------------------------------------------

/// Replaces a group's manning for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManningException {
    pub id: u64,
    pub group_id: GroupId,
    pub year: i32,
    pub month: u32,
    pub required: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ManningException {
    pub fn applies_to(&self, group_id: GroupId, date: NaiveDate) -> bool {
        self.active
            && self.group_id == group_id
            && self.year == date.year()
            && self.month == date.month()
    }
}

/// Replaces the global absence ceiling for one group on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingException {
    pub id: u64,
    pub group_id: GroupId,
    pub date: NaiveDate,
    pub max_percent: f64,
}

// ---------------------------------------------------------------------------
// CalendarDay
// ---------------------------------------------------------------------------

/// Resolved classification together with the record that produced it.
///
/// Each variant carries exactly one source reference, so a day can never
/// point at a holiday and a shift slot at the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DayKind {
    StatutoryHoliday { holiday_id: HolidayId, detail: String },
    ContinentalHoliday { holiday_id: HolidayId, detail: String },
    Leave { leave_id: LeaveId, leave_type: LeaveType },
    Vacation { vacation_id: VacationId },
    AutoVacation { vacation_id: VacationId },
    Labor { slot_id: SlotId },
    WeeklyRest { slot_id: SlotId },
}

impl DayKind {
    pub fn classification(&self) -> Classification {
        match self {
            DayKind::StatutoryHoliday { .. } => Classification::StatutoryHoliday,
            DayKind::ContinentalHoliday { .. } => Classification::ContinentalHoliday,
            DayKind::Leave { .. } => Classification::Leave,
            DayKind::Vacation { .. } => Classification::Vacation,
            DayKind::AutoVacation { .. } => Classification::AutoVacation,
            DayKind::Labor { .. } => Classification::Labor,
            DayKind::WeeklyRest { .. } => Classification::WeeklyRest,
        }
    }

    pub fn holiday_id(&self) -> Option<HolidayId> {
        match self {
            DayKind::StatutoryHoliday { holiday_id, .. }
            | DayKind::ContinentalHoliday { holiday_id, .. } => Some(*holiday_id),
            _ => None,
        }
    }

    pub fn leave_id(&self) -> Option<LeaveId> {
        match self {
            DayKind::Leave { leave_id, .. } => Some(*leave_id),
            _ => None,
        }
    }

    pub fn vacation_id(&self) -> Option<VacationId> {
        match self {
            DayKind::Vacation { vacation_id } | DayKind::AutoVacation { vacation_id } => {
                Some(*vacation_id)
            }
            _ => None,
        }
    }

    pub fn slot_id(&self) -> Option<SlotId> {
        match self {
            DayKind::Labor { slot_id } | DayKind::WeeklyRest { slot_id } => Some(*slot_id),
            _ => None,
        }
    }

    pub fn short_code(&self, shift: Shift) -> &'static str {
        match self {
            DayKind::StatutoryHoliday { .. } => "F",
            DayKind::ContinentalHoliday { .. } => "C",
            DayKind::Leave { leave_type, .. } => leave_type.grid_code(),
            DayKind::Vacation { .. } => "V",
            DayKind::AutoVacation { .. } => "VA",
            DayKind::Labor { .. } => shift.short_code(),
            DayKind::WeeklyRest { .. } => "D",
        }
    }
}

/// One employee's resolved status for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub employee_id: EmployeeId,
    pub payroll: Payroll,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub shift: Shift,
    pub kind: DayKind,
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
}

impl CalendarDay {
    pub fn classification(&self) -> Classification {
        self.kind.classification()
    }

    pub fn is_labor(&self) -> bool {
        matches!(self.kind, DayKind::Labor { .. })
    }

    pub fn short_code(&self) -> &'static str {
        self.kind.short_code(self.shift)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn open_ended_policy_matches_only_its_lower_bound() {
        let policy = SeniorityPolicy {
            id: 1,
            years_from: 4,
            years_to: None,
            total_days: 18,
            company_assigned_days: 12,
            auto_assignable_days: 3,
            employee_selectable_days: 3,
        };
        assert!(policy.matches(4));
        assert!(!policy.matches(3));
        assert!(!policy.matches(5));
    }

    #[test]
    fn bounded_policy_is_inclusive() {
        let policy = SeniorityPolicy {
            id: 2,
            years_from: 6,
            years_to: Some(10),
            total_days: 22,
            company_assigned_days: 12,
            auto_assignable_days: 4,
            employee_selectable_days: 6,
        };
        assert!(policy.matches(6));
        assert!(policy.matches(10));
        assert!(!policy.matches(11));
    }

    #[test]
    fn holiday_range_is_inclusive() {
        let h = Holiday {
            id: 1,
            start: date(2025, 12, 24),
            end: date(2025, 12, 25),
            category: HolidayCategory::Statutory,
            detail: "Christmas".into(),
        };
        assert!(h.covers(date(2025, 12, 24)));
        assert!(h.covers(date(2025, 12, 25)));
        assert!(!h.covers(date(2025, 12, 26)));
    }

    #[test]
    fn manning_exception_requires_active_month_match() {
        let mut ex = ManningException {
            id: 1,
            group_id: 7,
            year: 2025,
            month: 3,
            required: 10,
            active: true,
            reason: None,
        };
        assert!(ex.applies_to(7, date(2025, 3, 31)));
        assert!(!ex.applies_to(7, date(2025, 4, 1)));
        assert!(!ex.applies_to(8, date(2025, 3, 1)));
        ex.active = false;
        assert!(!ex.applies_to(7, date(2025, 3, 1)));
    }

    #[test]
    fn day_kind_exposes_a_single_source() {
        let kind = DayKind::StatutoryHoliday {
            holiday_id: 3,
            detail: "New Year".into(),
        };
        assert_eq!(kind.holiday_id(), Some(3));
        assert_eq!(kind.slot_id(), None);
        assert_eq!(kind.leave_id(), None);
        assert_eq!(kind.vacation_id(), None);
    }

    #[test]
    fn day_kind_json_is_tagged() {
        let kind = DayKind::Labor { slot_id: 9 };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#"{"type":"labor","slot_id":9}"#);
    }

    #[test]
    fn employee_yaml_defaults() {
        let yaml = "id: 1\npayroll: 1001\nname: Ana\n";
        let e: Employee = serde_yaml::from_str(yaml).unwrap();
        assert!(e.active);
        assert!(e.roles.is_empty());
        assert_eq!(e.assigned_vacation_days, 0);
        assert!(!e.is_union_member());
    }
}
