//! Automatic lunch insertion.
//!
//! Each generated day gets a lunch block in the 11:00-13:00 window unless
//! one already exists or the day is booked solid through lunch. A
//! registered lunch `Meal` is reused as the block's reference when the
//! project has one; otherwise a generic placeholder is synthesized.

use chrono::NaiveDate;

use crate::types::{ItemKind, Meal, MealType, ScheduleItem};

const LUNCH_START_MIN: u32 = 11 * 60;
const LUNCH_END_MIN: u32 = 13 * 60;
const LUNCH_DURATION_MIN: u32 = 60;

pub const DEFAULT_LUNCH_NAME: &str = "Lunch";

/// Insert a lunch block into one day's items if the day lacks one.
///
/// Items must belong to a single day. The list is re-sorted by start time
/// afterwards; `order` values are left for the caller to renumber.
/// Running this twice never produces a second lunch.
pub fn insert_auto_meal(
    items: &mut Vec<ScheduleItem>,
    day: u32,
    date: Option<NaiveDate>,
    registered_meals: &[Meal],
    default_name: &str,
) {
    let has_lunch = items.iter().any(|item| {
        item.kind.is_meal()
            && item.start_min >= LUNCH_START_MIN
            && item.start_min < LUNCH_END_MIN
    });
    if has_lunch {
        return;
    }

    items.sort_by_key(|item| item.start_min);

    let Some(start) = lunch_slot(items) else {
        return;
    };

    let lunch_ref = registered_meals
        .iter()
        .find(|meal| meal.meal_type == MealType::Lunch);

    items.push(ScheduleItem {
        day,
        date,
        start_min: start,
        end_min: start + LUNCH_DURATION_MIN,
        kind: ItemKind::AutoMeal,
        ref_id: lunch_ref.map(|meal| meal.id),
        name: lunch_ref
            .map(|meal| meal.name.clone())
            .unwrap_or_else(|| default_name.to_string()),
        address: lunch_ref.and_then(|meal| meal.address.clone()),
        order: 0,
    });
    items.sort_by_key(|item| item.start_min);
}

/// Find a start time for the lunch block, scanning gaps between sorted
/// items. A usable gap opens at or before 11:00 and stays free until
/// 13:00; the block then starts at the later of (gap start, 11:00). After
/// the last item the day is idle, so lunch also fits there as long as the
/// day's work ends before the window closes.
fn lunch_slot(sorted_items: &[ScheduleItem]) -> Option<u32> {
    let mut prev_end = 0u32;
    for item in sorted_items {
        if prev_end <= LUNCH_START_MIN && item.start_min >= LUNCH_END_MIN {
            return Some(prev_end.max(LUNCH_START_MIN));
        }
        prev_end = prev_end.max(item.end_min);
    }

    if prev_end < LUNCH_END_MIN {
        return Some(prev_end.max(LUNCH_START_MIN));
    }

    None
}
