//! Cyclic shift rotation.
//!
//! A rule's slots form a ring of `len` positions. Once an employee is
//! anchored at `(date, index)`, the slot for any other date is
//! `(index + days_between) mod len`, with negative offsets folded back into
//! `0..len`.

use chrono::NaiveDate;

use crate::model::ShiftSlot;

/// A known position in the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub date: NaiveDate,
    pub index: u32,
}

pub trait RotationResolver {
    /// The slot of `cycle` that applies on `target`, or `None` when the
    /// cycle is empty or has no slot at the computed index.
    fn resolve<'a>(
        &self,
        cycle: &'a [ShiftSlot],
        anchor: Anchor,
        target: NaiveDate,
    ) -> Option<&'a ShiftSlot>;
}

/// Plain modular rotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclicRotation;

impl RotationResolver for CyclicRotation {
    fn resolve<'a>(
        &self,
        cycle: &'a [ShiftSlot],
        anchor: Anchor,
        target: NaiveDate,
    ) -> Option<&'a ShiftSlot> {
        let offset = (target - anchor.date).num_days();
        let index = cycle_index(anchor.index, offset, cycle.len())?;
        cycle.iter().find(|s| s.index == index)
    }
}

/// `(anchor_index + offset_days) mod len`, normalised to `0..len`.
pub fn cycle_index(anchor_index: u32, offset_days: i64, len: usize) -> Option<u32> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    let index = (anchor_index as i64 + offset_days).rem_euclid(len);
    u32::try_from(index).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Shift, SlotActivity};
    use chrono::{Days, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycle(len: u32) -> Vec<ShiftSlot> {
        (0..len)
            .map(|i| ShiftSlot {
                id: 100 + i as u64,
                rule_id: 1,
                weekly_role_id: 1,
                index: i,
                weekday: Weekday::Mon,
                shift: if i % 7 >= 5 { Shift::Rest } else { Shift::Morning },
                activity: if i % 7 >= 5 {
                    SlotActivity::WeeklyRest
                } else {
                    SlotActivity::Labor
                },
            })
            .collect()
    }

    #[test]
    fn anchor_date_resolves_to_anchor_slot() {
        let slots = cycle(21);
        let anchor = Anchor {
            date: date(2025, 1, 6),
            index: 4,
        };
        let slot = CyclicRotation.resolve(&slots, anchor, anchor.date).unwrap();
        assert_eq!(slot.index, 4);
    }

    #[test]
    fn forward_offsets_wrap_around() {
        let slots = cycle(21);
        let anchor = Anchor {
            date: date(2025, 1, 6),
            index: 19,
        };
        let target = anchor.date.checked_add_days(Days::new(3)).unwrap();
        assert_eq!(CyclicRotation.resolve(&slots, anchor, target).unwrap().index, 1);
    }

    #[test]
    fn negative_offsets_are_normalised() {
        assert_eq!(cycle_index(0, -1, 7), Some(6));
        assert_eq!(cycle_index(2, -9, 7), Some(0));
        assert_eq!(cycle_index(3, -700, 7), Some(3));

        let slots = cycle(7);
        let anchor = Anchor {
            date: date(2025, 3, 10),
            index: 0,
        };
        let slot = CyclicRotation
            .resolve(&slots, anchor, date(2025, 3, 9))
            .unwrap();
        assert_eq!(slot.index, 6);
    }

    #[test]
    fn empty_cycle_never_resolves() {
        let anchor = Anchor {
            date: date(2025, 1, 1),
            index: 0,
        };
        assert!(CyclicRotation.resolve(&[], anchor, date(2025, 5, 5)).is_none());
        assert_eq!(cycle_index(0, 10, 0), None);
    }

    #[test]
    fn gap_in_indices_is_not_found() {
        let mut slots = cycle(7);
        slots.retain(|s| s.index != 3);
        let anchor = Anchor {
            date: date(2025, 1, 1),
            index: 0,
        };
        // Six slots remain, so index 3 is still reachable and missing.
        assert!(CyclicRotation
            .resolve(&slots, anchor, date(2025, 1, 4))
            .is_none());
    }

    #[test]
    fn every_offset_matches_the_modulus() {
        let slots = cycle(14);
        let anchor = Anchor {
            date: date(2024, 2, 27),
            index: 9,
        };
        for k in 0..400u64 {
            let target = anchor.date.checked_add_days(Days::new(k)).unwrap();
            let slot = CyclicRotation.resolve(&slots, anchor, target).unwrap();
            assert_eq!(slot.index as u64, (9 + k) % 14, "offset {k}");
        }
    }
}
