use serde::{Deserialize, Serialize};

/// A half-open availability window `[start_time, end_time)` over "HH:MM"
/// strings. The end instant is excluded, so adjacent windows touch without
/// overlapping. "HH:MM" in 24-hour form compares correctly as a plain
/// string, which is all the algebra below relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: String,
    pub end_time: String,
}

impl TimeWindow {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

pub fn is_overlapping(s1: &str, e1: &str, s2: &str, e2: &str) -> bool {
    s1 < e2 && s2 < e1
}

/// Whether `[start, end)` fits entirely inside the window.
pub fn contains(window: &TimeWindow, start: &str, end: &str) -> bool {
    window.start_time.as_str() <= start && window.end_time.as_str() >= end
}

/// Removes `[block_start, block_end)` from every window. Each input window
/// yields 0, 1 or 2 output windows: untouched, dropped, split, head chopped
/// or tail chopped. Disjoint inputs stay disjoint and every output satisfies
/// start < end.
pub fn subtract_window(windows: &[TimeWindow], block_start: &str, block_end: &str) -> Vec<TimeWindow> {
    let mut result = Vec::new();

    for window in windows {
        let w_start = window.start_time.as_str();
        let w_end = window.end_time.as_str();

        // No overlap
        if block_end <= w_start || block_start >= w_end {
            result.push(window.clone());
            continue;
        }

        // Block covers entire window
        if block_start <= w_start && block_end >= w_end {
            continue;
        }

        // Block splits window
        if block_start > w_start && block_end < w_end {
            result.push(TimeWindow::new(w_start, block_start));
            result.push(TimeWindow::new(block_end, w_end));
            continue;
        }

        // Block chops start
        if block_start <= w_start && block_end < w_end {
            result.push(TimeWindow::new(block_end, w_end));
            continue;
        }

        // Block chops end
        if block_start > w_start && block_end >= w_end {
            result.push(TimeWindow::new(w_start, block_start));
            continue;
        }
    }

    result
}

/// "HH:MM" to minutes since midnight. Accepts "24:00" as an exclusive end.
pub fn minutes_of(time: &str) -> Option<i32> {
    let (h, m) = time.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if !(0..=59).contains(&m) {
        return None;
    }
    match h {
        0..=23 => Some(h * 60 + m),
        24 if m == 0 => Some(1440),
        _ => None,
    }
}

pub fn hhmm(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
