//! Picks the single classification of a calendar day.
//!
//! Precedence, highest first: statutory holiday, continental holiday,
//! leave, pre-existing vacation, rotation slot. Lower candidates never leak
//! into the produced day.

use chrono::{Datelike, NaiveDate};

use crate::model::{CalendarDay, DayKind, Employee, Holiday, Leave, ShiftSlot, Vacation};
use crate::types::{HolidayCategory, ScheduleId, Shift, SlotActivity};

/// Facts that may apply to one employee on one date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayCandidates<'a> {
    pub statutory: Option<&'a Holiday>,
    pub continental: Option<&'a Holiday>,
    pub leave: Option<&'a Leave>,
    pub vacation: Option<&'a Vacation>,
    pub slot: Option<&'a ShiftSlot>,
}

/// Who the day belongs to and which schedule it was generated under.
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub employee: &'a Employee,
    pub schedule_id: Option<ScheduleId>,
}

pub trait DayTypeResolver {
    /// `None` only when nothing outranks the rotation and no slot resolved.
    fn resolve(
        &self,
        date: NaiveDate,
        ctx: DayContext<'_>,
        candidates: DayCandidates<'_>,
    ) -> Option<CalendarDay>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityResolver;

impl DayTypeResolver for PriorityResolver {
    fn resolve(
        &self,
        date: NaiveDate,
        ctx: DayContext<'_>,
        candidates: DayCandidates<'_>,
    ) -> Option<CalendarDay> {
        let (kind, shift) = if let Some(h) = candidates.statutory {
            (
                DayKind::StatutoryHoliday {
                    holiday_id: h.id,
                    detail: h.detail.clone(),
                },
                Shift::Rest,
            )
        } else if let Some(h) = candidates.continental {
            (
                DayKind::ContinentalHoliday {
                    holiday_id: h.id,
                    detail: h.detail.clone(),
                },
                Shift::Rest,
            )
        } else if let Some(l) = candidates.leave {
            (
                DayKind::Leave {
                    leave_id: l.id,
                    leave_type: l.leave_type,
                },
                Shift::Rest,
            )
        } else if let Some(v) = candidates.vacation {
            (DayKind::Vacation { vacation_id: v.id }, Shift::Rest)
        } else {
            let slot = candidates.slot?;
            let kind = match slot.activity {
                SlotActivity::Labor => DayKind::Labor { slot_id: slot.id },
                SlotActivity::WeeklyRest => DayKind::WeeklyRest { slot_id: slot.id },
            };
            (kind, slot.shift)
        };

        Some(CalendarDay {
            employee_id: ctx.employee.id,
            payroll: ctx.employee.payroll,
            group_id: ctx.employee.group_id,
            area_id: ctx.employee.area_id,
            date,
            weekday: date.weekday(),
            shift,
            kind,
            schedule_id: ctx.schedule_id,
        })
    }
}

/// The holiday of `category` covering `date`. Ties go to the lowest id.
pub fn pick_holiday(
    holidays: &[Holiday],
    date: NaiveDate,
    category: HolidayCategory,
) -> Option<&Holiday> {
    holidays
        .iter()
        .filter(|h| h.category == category && h.covers(date))
        .min_by_key(|h| h.id)
}
