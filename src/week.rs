// Canonical week buckets: every week starts on Saturday 00:00:00.000 and ends on
// the following Friday 23:59:59.999, in the reporting timezone.
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::Serialize;

/// Day every week bucket starts on
pub const ANCHOR_WEEKDAY: Weekday = Weekday::Sat;

/// Normalize any calendar date to the start of its week.
///
/// A date already on the anchor weekday maps to itself.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let day = date.weekday().num_days_from_sunday();
    let anchor = ANCHOR_WEEKDAY.num_days_from_sunday();
    let days_back = (day + 7 - anchor) % 7;
    date - Duration::days(i64::from(days_back))
}

/// Last instant of the week that starts on `week_start`.
pub fn week_end(week_start: NaiveDate) -> NaiveDateTime {
    (week_start + Duration::days(7)).and_time(NaiveTime::MIN) - Duration::milliseconds(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBounds {
    pub week_start: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekBounds {
    pub fn containing(date: NaiveDate) -> Self {
        let week_start = week_start(date);
        Self {
            week_start,
            start: week_start.and_time(NaiveTime::MIN),
            end: week_end(week_start),
        }
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.week_start - Duration::days(7))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.week_start + Duration::days(7))
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.and_utc()
    }

    /// Last microsecond before the next week starts. Timestamps are stored with
    /// microsecond precision, so `[start, last_instant]` leaves no gap between weeks.
    pub fn last_instant_utc(&self) -> DateTime<Utc> {
        self.next().start_utc() - Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn saturday_normalizes_to_itself() {
        let saturday = date(2024, 11, 30);
        assert_eq!(saturday.weekday(), Weekday::Sat);
        assert_eq!(week_start(saturday), saturday);
    }

    #[test]
    fn thursday_rolls_back_to_previous_saturday() {
        assert_eq!(week_start(date(2024, 12, 5)), date(2024, 11, 30));
    }

    #[test]
    fn friday_is_last_day_of_the_week() {
        assert_eq!(week_start(date(2024, 12, 6)), date(2024, 11, 30));
        assert_eq!(week_start(date(2024, 12, 7)), date(2024, 12, 7));
    }

    #[test]
    fn week_end_is_friday_one_millisecond_before_midnight() {
        let end = week_end(date(2024, 11, 30));
        assert_eq!(end.date(), date(2024, 12, 6));
        assert_eq!(end.time(), NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
        assert_eq!(end.weekday(), Weekday::Fri);
    }

    #[test]
    fn every_day_lands_in_a_week_starting_on_the_anchor() {
        let mut day = date(2023, 12, 20);
        while day < date(2025, 3, 1) {
            let start = week_start(day);
            assert_eq!(start.weekday(), ANCHOR_WEEKDAY, "{day}");
            assert!(start <= day);
            assert!(day < start + Duration::days(7));
            assert_eq!(week_start(start), start);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn bounds_span_saturday_midnight_to_friday_end() {
        let bounds = WeekBounds::containing(date(2024, 12, 3));
        assert_eq!(bounds.week_start, date(2024, 11, 30));
        assert_eq!(bounds.start, date(2024, 11, 30).and_time(NaiveTime::MIN));
        assert_eq!(bounds.end, week_end(date(2024, 11, 30)));
    }

    #[test]
    fn adjacent_weeks_do_not_overlap() {
        let bounds = WeekBounds::containing(date(2024, 11, 30));
        let next = bounds.next();
        assert_eq!(next.week_start, date(2024, 12, 7));
        assert_eq!(next.start - bounds.end, Duration::milliseconds(1));
        assert_eq!(next.previous(), bounds);
    }

    #[test]
    fn last_instant_covers_sub_millisecond_tail() {
        let bounds = WeekBounds::containing(date(2024, 11, 30));
        assert!(bounds.last_instant_utc() > bounds.end.and_utc());
        assert_eq!(bounds.next().start_utc() - bounds.last_instant_utc(), Duration::microseconds(1));
    }
}
