//! Week resolution
//!
//! Weeks start on Monday. The week key uses the ISO-8601 week-numbering year,
//! so the days of a week that straddles 31 December all share one key.

use crate::record::{WeekId, WfhDay};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Stable `YYYY-WW` key for the week containing `now`
pub fn current_week_id(now: NaiveDate) -> WeekId {
    let iso = now.iso_week();
    WeekId::new(format!("{:04}-{:02}", iso.year(), iso.week()))
}

/// Monday of the week containing `now`
pub fn week_start(now: NaiveDate) -> NaiveDate {
    let back = u64::from(now.weekday().num_days_from_monday());
    now - Days::new(back)
}

/// Calendar date of `day` in the week beginning on `week_start`
pub fn resolve_wfh_date(week_start: NaiveDate, day: WfhDay) -> NaiveDate {
    week_start + Days::new(day.offset_from_monday())
}

/// Current week summary for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekInfo {
    pub week_id: WeekId,
    pub week_starting: NaiveDate,
    pub thursday: NaiveDate,
    pub friday: NaiveDate,
}

impl WeekInfo {
    pub fn for_date(now: NaiveDate) -> Self {
        let monday = week_start(now);
        Self {
            week_id: current_week_id(now),
            week_starting: monday,
            thursday: resolve_wfh_date(monday, WfhDay::Thursday),
            friday: resolve_wfh_date(monday, WfhDay::Friday),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-03-11 is a Tuesday
        assert_eq!(week_start(date(2025, 3, 11)), date(2025, 3, 10));
        assert_eq!(week_start(date(2025, 3, 10)), date(2025, 3, 10));
        assert_eq!(week_start(date(2025, 3, 16)), date(2025, 3, 10));
    }

    #[test]
    fn test_week_id_stable_within_week() {
        let monday = date(2025, 3, 10);
        let expected = current_week_id(monday);
        for offset in 0..7 {
            assert_eq!(current_week_id(monday + Days::new(offset)), expected);
        }
        assert_eq!(expected.as_str(), "2025-11");
    }

    #[test]
    fn test_week_id_changes_on_monday() {
        assert_ne!(
            current_week_id(date(2025, 3, 16)),
            current_week_id(date(2025, 3, 17))
        );
    }

    #[test]
    fn test_week_id_across_year_end() {
        // Monday 2025-12-29 through Sunday 2026-01-04 is ISO week 2026-01
        let dec = current_week_id(date(2025, 12, 31));
        let jan = current_week_id(date(2026, 1, 2));
        assert_eq!(dec, jan);
        assert_eq!(dec.as_str(), "2026-01");
        assert_eq!(week_start(date(2026, 1, 2)), date(2025, 12, 29));
    }

    #[test]
    fn test_week_id_zero_padded() {
        assert_eq!(current_week_id(date(2025, 1, 8)).as_str(), "2025-02");
    }

    #[test]
    fn test_resolve_wfh_date_offsets() {
        let monday = date(2025, 3, 10);
        assert_eq!(resolve_wfh_date(monday, WfhDay::Thursday), date(2025, 3, 13));
        assert_eq!(resolve_wfh_date(monday, WfhDay::Friday), date(2025, 3, 14));
    }

    #[test]
    fn test_resolve_wfh_date_crosses_month() {
        let monday = date(2025, 3, 31);
        assert_eq!(resolve_wfh_date(monday, WfhDay::Friday), date(2025, 4, 4));
    }

    #[test]
    fn test_week_info_for_sunday() {
        let info = WeekInfo::for_date(date(2025, 3, 16));
        assert_eq!(info.week_starting, date(2025, 3, 10));
        assert_eq!(info.thursday, date(2025, 3, 13));
        assert_eq!(info.friday, date(2025, 3, 14));
    }
}
