//! Weekly time model: weekdays, shifts, and minute-of-day helpers.
//!
//! # Time Model
//! All times of day are minutes since midnight (`i32`); durations are in
//! minutes. A week is the planning horizon, so a moment is fully located
//! by a ([`Weekday`], start minute) pair.
//!
//! # Shifts
//! A start minute classifies into morning (< 12:00), midday
//! (12:00-15:59) or evening (>= 16:00). Morning and evening are
//! opposites; midday conflicts with neither.

use serde::{Deserialize, Serialize};

/// Minutes in one hour.
pub const HOUR_MIN: i32 = 60;

/// Day of week within the planning horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days in calendar order. Iteration order is stable and
    /// drives deterministic construction.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Monday through Friday.
    pub const WEEKDAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Zero-based index within [`Weekday::ALL`].
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether this is Saturday or Sunday.
    #[inline]
    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// Coarse part of day derived from a start minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Morning,
    Midday,
    Evening,
}

impl Shift {
    /// Classifies a start minute.
    pub fn of(start_min: i32) -> Self {
        if start_min < 12 * HOUR_MIN {
            Shift::Morning
        } else if start_min < 16 * HOUR_MIN {
            Shift::Midday
        } else {
            Shift::Evening
        }
    }

    /// The shift that conflicts with this one, if any.
    ///
    /// Morning and evening oppose each other; midday opposes nothing.
    pub fn opposite(&self) -> Option<Shift> {
        match self {
            Shift::Morning => Some(Shift::Evening),
            Shift::Evening => Some(Shift::Morning),
            Shift::Midday => None,
        }
    }
}

/// Builds a minute-of-day from hours and minutes.
#[inline]
pub fn minute(hour: i32, min: i32) -> i32 {
    hour * HOUR_MIN + min
}

/// Formats a minute-of-day as `HH:MM`.
pub fn fmt_minute(min: i32) -> String {
    format!("{:02}:{:02}", min / HOUR_MIN, min % HOUR_MIN)
}

/// Whether `start_min` falls inside any half-open `[start, end)` window.
pub fn in_any_window(start_min: i32, windows: &[(i32, i32)]) -> bool {
    windows
        .iter()
        .any(|&(start, end)| start_min >= start && start_min < end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_order() {
        assert_eq!(Weekday::ALL[0], Weekday::Monday);
        assert_eq!(Weekday::ALL[6], Weekday::Sunday);
        assert_eq!(Weekday::Wednesday.index(), 2);
        assert!(Weekday::Monday < Weekday::Sunday);
    }

    #[test]
    fn test_weekend() {
        assert!(Weekday::Saturday.is_weekend());
        assert!(Weekday::Sunday.is_weekend());
        assert!(!Weekday::Friday.is_weekend());
    }

    #[test]
    fn test_shift_classification() {
        assert_eq!(Shift::of(minute(6, 0)), Shift::Morning);
        assert_eq!(Shift::of(minute(11, 59)), Shift::Morning);
        assert_eq!(Shift::of(minute(12, 0)), Shift::Midday);
        assert_eq!(Shift::of(minute(15, 59)), Shift::Midday);
        assert_eq!(Shift::of(minute(16, 0)), Shift::Evening);
        assert_eq!(Shift::of(minute(19, 30)), Shift::Evening);
    }

    #[test]
    fn test_shift_opposite() {
        assert_eq!(Shift::Morning.opposite(), Some(Shift::Evening));
        assert_eq!(Shift::Evening.opposite(), Some(Shift::Morning));
        assert_eq!(Shift::Midday.opposite(), None);
    }

    #[test]
    fn test_minute_helpers() {
        assert_eq!(minute(6, 30), 390);
        assert_eq!(fmt_minute(390), "06:30");
        assert_eq!(fmt_minute(0), "00:00");
        assert_eq!(fmt_minute(minute(19, 5)), "19:05");
    }

    #[test]
    fn test_in_any_window() {
        let windows = [(minute(6, 0), minute(9, 0)), (minute(17, 0), minute(20, 0))];
        assert!(in_any_window(minute(6, 0), &windows));
        assert!(in_any_window(minute(8, 59), &windows));
        assert!(!in_any_window(minute(9, 0), &windows)); // exclusive end
        assert!(!in_any_window(minute(12, 0), &windows));
        assert!(in_any_window(minute(18, 0), &windows));
    }
}
