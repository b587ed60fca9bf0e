use crate::domain::models::availability::{AvailabilityOverride, OverrideType, TemplateSlot};
use crate::domain::models::booking::{ConflictDetail, ConflictType};
use super::window_algebra::{self, TimeWindow};

/// Computes the policy-eligible windows for one trainer and one date from
/// the weekly template rows for that day-of-week plus the date's overrides.
///
/// Precedence: a full-day BLOCKED override empties the day; MODIFIED
/// overrides (if any) replace the template outright; every partial BLOCKED
/// override is then subtracted. Already-scheduled bookings are deliberately
/// not subtracted here; write-time conflicts are the resolver's job.
pub fn day_windows(template: &[TemplateSlot], overrides: &[AvailabilityOverride]) -> Vec<TimeWindow> {
    if overrides.iter().any(|o| o.is_full_day_block()) {
        return Vec::new();
    }

    let modified: Vec<&AvailabilityOverride> = overrides
        .iter()
        .filter(|o| o.override_type == OverrideType::Modified)
        .collect();

    let mut windows: Vec<TimeWindow> = if modified.is_empty() {
        template
            .iter()
            .filter(|t| t.is_active)
            .map(|t| TimeWindow::new(t.start_time.clone(), t.end_time.clone()))
            .collect()
    } else {
        modified
            .iter()
            .map(|o| {
                TimeWindow::new(
                    o.start_time.clone().unwrap_or_default(),
                    o.end_time.clone().unwrap_or_default(),
                )
            })
            .collect()
    };

    for block in overrides
        .iter()
        .filter(|o| o.override_type == OverrideType::Blocked && o.start_time.is_some())
    {
        windows = window_algebra::subtract_window(
            &windows,
            block.start_time.as_deref().unwrap_or_default(),
            block.end_time.as_deref().unwrap_or_default(),
        );
    }

    windows
}

/// Steps 1 and 2 of conflict resolution: BLOCKED overrides first, then
/// containment in a MODIFIED window (when any exist for the date) or in an
/// active template window. `template` must already be filtered to the
/// request's day-of-week.
pub fn availability_conflict(
    template: &[TemplateSlot],
    overrides: &[AvailabilityOverride],
    start_time: &str,
    end_time: &str,
) -> Option<ConflictDetail> {
    let blocked = overrides.iter().find(|o| {
        o.override_type == OverrideType::Blocked
            && match (&o.start_time, &o.end_time) {
                (Some(s), Some(e)) => window_algebra::is_overlapping(start_time, end_time, s, e),
                _ => true, // full-day block
            }
    });
    if let Some(block) = blocked {
        let mut detail = ConflictDetail::new(
            ConflictType::BlockedOverride,
            "Trainer is blocked on this date",
        );
        detail.conflicting_start = block.start_time.clone();
        detail.conflicting_end = block.end_time.clone();
        return Some(detail);
    }

    let modified: Vec<TimeWindow> = overrides
        .iter()
        .filter(|o| o.override_type == OverrideType::Modified)
        .map(|o| {
            TimeWindow::new(
                o.start_time.clone().unwrap_or_default(),
                o.end_time.clone().unwrap_or_default(),
            )
        })
        .collect();

    // Modified overrides replace the template for the date entirely.
    let fits = if modified.is_empty() {
        template
            .iter()
            .filter(|t| t.is_active)
            .any(|t| t.start_time.as_str() <= start_time && t.end_time.as_str() >= end_time)
    } else {
        modified.iter().any(|w| window_algebra::contains(w, start_time, end_time))
    };

    if fits {
        None
    } else {
        Some(ConflictDetail::new(
            ConflictType::OutsideAvailability,
            "Requested time is outside the trainer's availability",
        ))
    }
}
