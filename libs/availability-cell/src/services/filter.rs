use tracing::debug;

use crate::models::{Slot, SlotBoard, TimeFilter};

/// At most this many slots survive filtering.
pub const DISPLAY_CAP: usize = 30;
/// Per-column cap for the two-column board split.
pub const COLUMN_CAP: usize = 15;

/// Applies the doctor filter, then the hour predicate, then a stable
/// chronological sort, then the display cap. Slots whose start time does
/// not parse are dropped so a malformed backend record never breaks the
/// whole board.
pub fn filter_slots(
    slots: Vec<Slot>,
    doctor_id: Option<&str>,
    time_filter: TimeFilter,
) -> Vec<Slot> {
    let mut kept: Vec<Slot> = slots
        .into_iter()
        .filter(|slot| doctor_id.map_or(true, |d| slot.doctor_id == d))
        .filter(|slot| match slot.start_hour() {
            Some(hour) => time_filter.accepts(hour),
            None => {
                debug!(
                    "Dropping slot with unparseable start time '{}' on {}",
                    slot.start_time, slot.date
                );
                false
            }
        })
        .collect();

    // Vec::sort_by_key is stable, so equal (date, time) keeps fetch order.
    kept.sort_by_key(|slot| (slot.date, slot.start_time_of_day()));
    kept.truncate(DISPLAY_CAP);
    kept
}

/// Splits a slot list into two display columns of ceil(n/2) and
/// floor(n/2) entries, at most 15 each. Enforces the display cap itself,
/// so an uncapped input still yields a bounded board.
pub fn build_board(mut slots: Vec<Slot>) -> SlotBoard {
    slots.truncate(DISPLAY_CAP);
    let total = slots.len();
    let mut left = slots;
    let right = left.split_off(((total + 1) / 2).min(COLUMN_CAP));

    SlotBoard { left, right, total }
}
