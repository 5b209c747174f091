use chrono::{Days, NaiveDate};

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// A range containing a single day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Widen the range by `days` on both sides.
    pub fn padded(&self, days: u64) -> Self {
        Self {
            start: self.start.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN),
            end: self.end.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Every date in the range, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(DateRange::new(d("2024-03-02"), d("2024-03-01")).is_none());
        assert!(DateRange::new(d("2024-03-01"), d("2024-03-01")).is_some());
    }

    #[test]
    fn test_days_inclusive() {
        let range = DateRange::new(d("2024-02-28"), d("2024-03-01")).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days, vec![d("2024-02-28"), d("2024-02-29"), d("2024-03-01")]);
    }

    #[test]
    fn test_padded() {
        let range = DateRange::single(d("2024-03-01")).padded(2);
        assert_eq!(range.start, d("2024-02-28"));
        assert_eq!(range.end, d("2024-03-03"));
        assert_eq!(range.days().count(), 5);
    }
}
