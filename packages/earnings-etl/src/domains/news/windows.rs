//! Pre-earnings lookback windows.
//!
//! News is collected in three tiers before each earnings date. Each tier is
//! an inclusive span of days counted back from the event and carries its own
//! article cap, so nearer news can be weighted differently from older news.

use chrono::{Days, NaiveDate};

/// One lookback tier: days `nearest..=farthest` before the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTier {
    pub label: String,
    pub nearest: u32,
    pub farthest: u32,
    pub max_articles: usize,
}

impl WindowTier {
    pub fn new(nearest: u32, farthest: u32, max_articles: usize) -> Self {
        Self {
            label: Self::label_for(nearest, farthest),
            nearest,
            farthest,
            max_articles,
        }
    }

    /// Tiers are labelled by the day boundaries they cover, e.g. "2-4 days".
    /// The closest tier starts at day 0 so "the day before" reads "0-1 days".
    fn label_for(nearest: u32, farthest: u32) -> String {
        let low = if nearest == 1 { 0 } else { nearest };
        format!("{}-{} days", low, farthest)
    }
}

/// The default tiers: the day before, days 2-4 and days 5-7.
pub fn default_tiers(caps: [usize; 3]) -> [WindowTier; 3] {
    [
        WindowTier::new(1, 1, caps[0]),
        WindowTier::new(2, 4, caps[1]),
        WindowTier::new(5, 7, caps[2]),
    ]
}

/// A concrete date span to fetch news for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsWindow {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period: String,
    pub max_articles: usize,
}

impl NewsWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Derives the lookback windows for an earnings event.
#[derive(Debug, Clone)]
pub struct WindowPlanner {
    tiers: Vec<WindowTier>,
}

impl WindowPlanner {
    /// Tiers are sorted farthest-first so planned windows come out
    /// oldest-to-newest. They are expected to have passed
    /// [`validate_tiers`](crate::config::validate_tiers).
    pub fn new(tiers: [WindowTier; 3]) -> Self {
        let mut tiers = tiers.to_vec();
        tiers.sort_by(|a, b| b.farthest.cmp(&a.farthest));
        Self { tiers }
    }

    /// Exactly one window per tier, oldest first.
    pub fn plan(&self, symbol: &str, earnings_date: NaiveDate) -> Vec<NewsWindow> {
        self.tiers
            .iter()
            .map(|tier| NewsWindow {
                symbol: symbol.to_string(),
                start: days_before(earnings_date, tier.farthest),
                end: days_before(earnings_date, tier.nearest),
                period: tier.label.clone(),
                max_articles: tier.max_articles,
            })
            .collect()
    }
}

fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}
