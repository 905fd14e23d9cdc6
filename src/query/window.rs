//! Calendar windows evaluated against "now".

use super::QueryContext;
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};

/// A span of time relative to the query's `now`, or fixed.
///
/// Relative windows are evaluated in the time zone offset carried by the
/// [`QueryContext`], so "today" means the caller's local day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateWindow {
    /// Same local calendar day as now.
    Today,
    /// Same ISO week as now.
    ThisWeek,
    /// Same local calendar month as now.
    ThisMonth,
    /// Same local calendar year as now.
    ThisYear,
    /// Now or later.
    Upcoming,
    /// Strictly before now.
    Past,
    /// Within the `n` days leading up to now.
    LastDays(u32),
    /// Within the `n` days following now.
    NextDays(u32),
    /// A specific local calendar month.
    Month { year: i32, month: u32 },
    /// A specific local calendar year.
    Year(i32),
    /// Inclusive fixed bounds.
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl DateWindow {
    /// Whether an instant falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>, ctx: &QueryContext) -> bool {
        let now = ctx.now();
        match self {
            DateWindow::Upcoming => instant >= now,
            DateWindow::Past => instant < now,
            // A bound past chrono's range leaves that side open.
            DateWindow::LastDays(n) => {
                instant <= now
                    && now
                        .checked_sub_signed(Duration::days(i64::from(*n)))
                        .map_or(true, |start| instant >= start)
            }
            DateWindow::NextDays(n) => {
                instant >= now
                    && now
                        .checked_add_signed(Duration::days(i64::from(*n)))
                        .map_or(true, |end| instant <= end)
            }
            DateWindow::Between { start, end } => instant >= *start && instant <= *end,
            _ => self.contains_date(ctx.local_date(instant), ctx),
        }
    }

    /// Whether a calendar date falls inside the window.
    ///
    /// Instant-based windows compare against the local date of their bounds.
    pub fn contains_date(&self, date: NaiveDate, ctx: &QueryContext) -> bool {
        let today = ctx.today();
        match self {
            DateWindow::Today => date == today,
            DateWindow::ThisWeek => date.iso_week() == today.iso_week(),
            DateWindow::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            DateWindow::ThisYear => date.year() == today.year(),
            DateWindow::Upcoming => date >= today,
            DateWindow::Past => date < today,
            DateWindow::LastDays(n) => {
                date <= today
                    && today
                        .checked_sub_days(Days::new(u64::from(*n)))
                        .map_or(true, |start| date >= start)
            }
            DateWindow::NextDays(n) => {
                date >= today
                    && today
                        .checked_add_days(Days::new(u64::from(*n)))
                        .map_or(true, |end| date <= end)
            }
            DateWindow::Month { year, month } => date.year() == *year && date.month() == *month,
            DateWindow::Year(year) => date.year() == *year,
            DateWindow::Between { start, end } => {
                date >= ctx.local_date(*start) && date <= ctx.local_date(*end)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> QueryContext {
        // Wednesday
        QueryContext::at_utc(Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_windows() {
        let ctx = ctx();
        assert!(DateWindow::Today.contains_date(day(2024, 5, 15), &ctx));
        assert!(!DateWindow::Today.contains_date(day(2024, 5, 14), &ctx));

        assert!(DateWindow::ThisWeek.contains_date(day(2024, 5, 13), &ctx));
        assert!(!DateWindow::ThisWeek.contains_date(day(2024, 5, 20), &ctx));

        assert!(DateWindow::ThisMonth.contains_date(day(2024, 5, 1), &ctx));
        assert!(!DateWindow::ThisMonth.contains_date(day(2023, 5, 15), &ctx));

        assert!(DateWindow::ThisYear.contains_date(day(2024, 12, 31), &ctx));
        assert!(DateWindow::Month { year: 2024, month: 5 }.contains_date(day(2024, 5, 31), &ctx));
        assert!(DateWindow::Year(2023).contains_date(day(2023, 1, 1), &ctx));
    }

    #[test]
    fn test_upcoming_and_past_partition_instants() {
        let ctx = ctx();
        let now = ctx.now();
        for offset in [-3600, 0, 3600] {
            let instant = now + Duration::seconds(offset);
            assert_ne!(
                DateWindow::Upcoming.contains(instant, &ctx),
                DateWindow::Past.contains(instant, &ctx)
            );
        }
    }

    #[test]
    fn test_relative_day_windows() {
        let ctx = ctx();
        let now = ctx.now();
        assert!(DateWindow::LastDays(7).contains(now - Duration::days(6), &ctx));
        assert!(!DateWindow::LastDays(7).contains(now - Duration::days(8), &ctx));
        assert!(!DateWindow::LastDays(7).contains(now + Duration::hours(1), &ctx));
        assert!(DateWindow::NextDays(3).contains(now + Duration::days(2), &ctx));
        assert!(DateWindow::NextDays(3).contains_date(day(2024, 5, 18), &ctx));
        assert!(!DateWindow::NextDays(3).contains_date(day(2024, 5, 19), &ctx));
    }

    #[test]
    fn test_huge_day_counts_are_open_ended() {
        let ctx = ctx();
        let now = ctx.now();
        let far_past = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        let far_future = Utc.with_ymd_and_hms(9999, 12, 31, 0, 0, 0).unwrap();

        assert!(DateWindow::LastDays(u32::MAX).contains(now, &ctx));
        assert!(DateWindow::LastDays(u32::MAX).contains(far_past, &ctx));
        assert!(!DateWindow::LastDays(u32::MAX).contains(now + Duration::seconds(1), &ctx));
        assert!(DateWindow::LastDays(u32::MAX).contains_date(ctx.today(), &ctx));
        assert!(DateWindow::LastDays(u32::MAX).contains_date(day(1, 1, 1), &ctx));

        assert!(DateWindow::NextDays(u32::MAX).contains(now, &ctx));
        assert!(DateWindow::NextDays(u32::MAX).contains(far_future, &ctx));
        assert!(!DateWindow::NextDays(u32::MAX).contains(now - Duration::seconds(1), &ctx));
        assert!(DateWindow::NextDays(u32::MAX).contains_date(ctx.today(), &ctx));
        assert!(!DateWindow::NextDays(u32::MAX).contains_date(day(2024, 5, 14), &ctx));
    }

    #[test]
    fn test_window_uses_context_offset() {
        // 23:30 UTC on the 31st is already June 1st at UTC+2.
        let instant = Utc.with_ymd_and_hms(2024, 5, 31, 23, 30, 0).unwrap();
        let utc = QueryContext::at_utc(Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap());
        let plus_two = QueryContext::at(
            chrono::FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
                .unwrap(),
        );

        assert!(DateWindow::ThisMonth.contains(instant, &utc));
        assert!(DateWindow::ThisMonth.contains(instant, &plus_two));
    }

    #[test]
    fn test_between_is_inclusive() {
        let ctx = ctx();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let window = DateWindow::Between { start, end };
        assert!(window.contains(start, &ctx));
        assert!(window.contains(end, &ctx));
        assert!(!window.contains(end + Duration::seconds(1), &ctx));
        assert!(window.contains_date(day(2024, 1, 31), &ctx));
    }
}
