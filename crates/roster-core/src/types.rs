use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RosterError;

pub type AreaId = u64;
pub type GroupId = u64;
pub type EmployeeId = u64;
pub type PolicyId = u64;
pub type RuleId = u64;
pub type SlotId = u64;
pub type WeeklyRoleId = u64;
pub type HolidayId = u64;
pub type LeaveId = u64;
pub type VacationId = u64;
pub type ScheduleId = u64;
pub type Payroll = u32;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The category a calendar day resolves to. Exactly one per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Labor,
    WeeklyRest,
    StatutoryHoliday,
    ContinentalHoliday,
    Leave,
    Vacation,
    AutoVacation,
}

impl Classification {
    pub fn all() -> &'static [Classification] {
        &[
            Classification::Labor,
            Classification::WeeklyRest,
            Classification::StatutoryHoliday,
            Classification::ContinentalHoliday,
            Classification::Leave,
            Classification::Vacation,
            Classification::AutoVacation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Labor => "labor",
            Classification::WeeklyRest => "weekly_rest",
            Classification::StatutoryHoliday => "statutory_holiday",
            Classification::ContinentalHoliday => "continental_holiday",
            Classification::Leave => "leave",
            Classification::Vacation => "vacation",
            Classification::AutoVacation => "auto_vacation",
        }
    }

    /// Days that take the employee out of the group's headcount
    /// for absence checks. Weekly rest and holidays are scheduled time off.
    pub fn is_absence(self) -> bool {
        matches!(
            self,
            Classification::Leave | Classification::Vacation | Classification::AutoVacation
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Classification {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RosterError::InvalidClassification(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Shift
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Morning,
    Evening,
    Night,
    Rest,
}

impl Shift {
    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Evening => "evening",
            Shift::Night => "night",
            Shift::Rest => "rest",
        }
    }

    pub fn short_code(self) -> &'static str {
        match self {
            Shift::Morning => "M",
            Shift::Evening => "E",
            Shift::Night => "N",
            Shift::Rest => "D",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Shift {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Shift::Morning),
            "evening" => Ok(Shift::Evening),
            "night" => Ok(Shift::Night),
            "rest" => Ok(Shift::Rest),
            _ => Err(RosterError::InvalidShift(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SlotActivity
// ---------------------------------------------------------------------------

/// Default activity a rotation slot carries before any override applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotActivity {
    Labor,
    WeeklyRest,
}

impl From<SlotActivity> for Classification {
    fn from(a: SlotActivity) -> Self {
        match a {
            SlotActivity::Labor => Classification::Labor,
            SlotActivity::WeeklyRest => Classification::WeeklyRest,
        }
    }
}

// ---------------------------------------------------------------------------
// HolidayCategory
// ---------------------------------------------------------------------------

/// Statutory holidays outrank continental (company-wide) ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayCategory {
    Statutory,
    Continental,
}

// ---------------------------------------------------------------------------
// LeaveType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    PaidLeave,
    BereavementLeave,
    UnpaidLeave,
    SickLeave,
    WorkAccident,
    Maternity,
    ProbableWorkRisk,
    Suspension,
    PaternityLeave,
}

impl LeaveType {
    pub fn short_code(self) -> &'static str {
        match self {
            LeaveType::PaidLeave => "P",
            LeaveType::BereavementLeave => "PD",
            LeaveType::UnpaidLeave => "G",
            LeaveType::SickLeave => "E",
            LeaveType::WorkAccident => "A",
            LeaveType::Maternity => "M",
            LeaveType::ProbableWorkRisk => "R",
            LeaveType::Suspension => "S",
            LeaveType::PaternityLeave => "PP",
        }
    }

    /// Code for the calendar grid: the short code with a `*`, so `M`
    /// (maternity) and `E` (sick leave) never read as labor shifts.
    pub fn grid_code(self) -> &'static str {
        match self {
            LeaveType::PaidLeave => "P*",
            LeaveType::BereavementLeave => "PD*",
            LeaveType::UnpaidLeave => "G*",
            LeaveType::SickLeave => "E*",
            LeaveType::WorkAccident => "A*",
            LeaveType::Maternity => "M*",
            LeaveType::ProbableWorkRisk => "R*",
            LeaveType::Suspension => "S*",
            LeaveType::PaternityLeave => "PP*",
        }
    }
}

// ---------------------------------------------------------------------------
// VacationKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationKind {
    EmployeeSelected,
    CarriedOver,
    AutoAssigned,
}

// ---------------------------------------------------------------------------
// ScheduleStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Pending,
    InProgress,
    Finished,
    Cancelled,
}

impl ScheduleStatus {
    pub fn is_active(self) -> bool {
        matches!(self, ScheduleStatus::Pending | ScheduleStatus::InProgress)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Unionized,
    Supervisor,
    AreaManager,
    Admin,
}

// ---------------------------------------------------------------------------
// MissingConfig
// ---------------------------------------------------------------------------

/// Why an employee (or a whole run) was left untouched.
///
/// Every abort path of the generator and the assigner maps to exactly one
/// of these, so callers can enumerate them instead of inspecting logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingConfig {
    NotUnionMember,
    NoGroup,
    NoInitialRole,
    WeeklyRoleNotFound,
    RuleNotFound,
    AnchorShiftNotFound,
    NoSeniorityPolicy,
    NoActiveSchedule,
}

impl MissingConfig {
    pub fn as_str(self) -> &'static str {
        match self {
            MissingConfig::NotUnionMember => "not a union member",
            MissingConfig::NoGroup => "no group",
            MissingConfig::NoInitialRole => "no initial role assignment",
            MissingConfig::WeeklyRoleNotFound => "weekly role not found",
            MissingConfig::RuleNotFound => "owning rule not found",
            MissingConfig::AnchorShiftNotFound => "anchor shift not found",
            MissingConfig::NoSeniorityPolicy => "no seniority vacation policy",
            MissingConfig::NoActiveSchedule => "no active annual schedule",
        }
    }
}

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
