use chrono::{Duration, NaiveDate};

pub struct MatchCalendar;

impl MatchCalendar {
    /// `count` dates starting at `start`, `interval_days` apart.
    pub fn every(start: NaiveDate, interval_days: i64, count: usize) -> Vec<NaiveDate> {
        (0..count as i64)
            .filter_map(|i| start.checked_add_signed(Duration::days(i * interval_days)))
            .collect()
    }

    pub fn weekly(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
        Self::every(start, 7, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_dates_are_seven_days_apart() {
        let start = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let dates = MatchCalendar::weekly(start, 3);

        assert_eq!(dates.len(), 3);
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2025, 8, 23).unwrap());
    }
}
