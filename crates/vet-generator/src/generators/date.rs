//! Calendar date generators.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window. The bounds are swapped if given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// January 1st of `today`'s year up to and including `today`.
    pub fn this_year(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self::new(start, today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Generate a random date inside the window.
pub fn generate_date<R: Rng>(rng: &mut R, window: &DateWindow) -> NaiveDate {
    let offset = rng.random_range(0..window.len_days());
    window
        .start
        .checked_add_signed(chrono::Duration::days(offset))
        .unwrap_or(window.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_this_year() {
        let window = DateWindow::this_year(date(2026, 10, 16));
        assert_eq!(window.start, date(2026, 1, 1));
        assert_eq!(window.end, date(2026, 10, 16));
    }

    #[test]
    fn test_this_year_on_new_years_day() {
        let window = DateWindow::this_year(date(2026, 1, 1));
        assert_eq!(window.len_days(), 1);

        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_date(&mut rng, &window), date(2026, 1, 1));
    }

    #[test]
    fn test_generated_dates_stay_in_window() {
        let window = DateWindow::new(date(2026, 3, 1), date(2026, 3, 31));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            assert!(window.contains(generate_date(&mut rng, &window)));
        }
    }

    #[test]
    fn test_reversed_bounds() {
        let window = DateWindow::new(date(2026, 5, 1), date(2026, 4, 1));
        assert_eq!(window.start, date(2026, 4, 1));
        assert_eq!(window.end, date(2026, 5, 1));
    }
}
