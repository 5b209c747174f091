use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use dotenvy::dotenv;
use thiserror::Error;

use crate::common::DateRange;
use crate::domains::news::windows::{default_tiers, WindowTier};

/// Configuration errors name the variable at fault.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub finnhub_api_key: Option<String>,
    /// Unset only when both `START_DATE` and `END_DATE` are absent
    pub date_range: Option<DateRange>,
    pub padding_days: u64,
    pub window_tiers: [WindowTier; 3],
    pub news_source_filter: String,
    pub scraping_delay: Duration,
    pub poll_interval: Duration,
    pub staging_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load and validate configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let date_range = match (get("START_DATE"), get("END_DATE")) {
            (None, None) => None,
            _ => {
                let start = parse_date(&get, "START_DATE")?;
                let end = parse_date(&get, "END_DATE")?;
                Some(DateRange::new(start, end).ok_or_else(|| {
                    ConfigError::invalid(
                        "START_DATE",
                        format!("start date {} is after end date {}", start, end),
                    )
                })?)
            }
        };

        let caps = [
            parse_cap(&get, "MAX_NEWS_0_1_DAYS")?,
            parse_cap(&get, "MAX_NEWS_2_4_DAYS")?,
            parse_cap(&get, "MAX_NEWS_5_7_DAYS")?,
        ];
        let window_tiers = match get("NEWS_WINDOW_OFFSETS") {
            Some(spec) => parse_window_offsets(&spec, caps)?,
            None => default_tiers(caps),
        };
        validate_tiers(&window_tiers)?;

        let scraping_delay = parse_number::<u64, _>(&get, "SCRAPING_DELAY", 1)?;
        if scraping_delay == 0 {
            return Err(ConfigError::invalid(
                "SCRAPING_DELAY",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://earnings.db?mode=rwc".to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-5-mini".to_string()),
            finnhub_api_key: get("FINNHUB_API_KEY"),
            date_range,
            padding_days: parse_number(&get, "DATA_FETCH_PADDING_DAYS", 0)?,
            window_tiers,
            news_source_filter: get("NEWS_SOURCE_FILTER").unwrap_or_else(|| "Yahoo".to_string()),
            scraping_delay: Duration::from_secs(scraping_delay),
            poll_interval: Duration::from_secs(parse_number(&get, "BATCH_POLL_INTERVAL", 300)?),
            staging_dir: get("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("batch_files")),
        })
    }

    /// The provider key, required for scoring and cleanup.
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))
    }

    /// The news source key, required for collection.
    pub fn require_finnhub_key(&self) -> Result<&str, ConfigError> {
        self.finnhub_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("FINNHUB_API_KEY"))
    }

    /// The collection range, required for collection and scoring.
    pub fn require_date_range(&self) -> Result<DateRange, ConfigError> {
        self.date_range.ok_or(ConfigError::Missing("START_DATE"))
    }

    /// Dates whose articles are scored: the collection range widened by the
    /// padding on both sides.
    pub fn scoring_range(&self) -> Result<DateRange, ConfigError> {
        Ok(self.require_date_range()?.padded(self.padding_days))
    }
}

/// Default tracing filter derived from `LOG_LEVEL`, used when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    let _ = dotenv();
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    format!("{},sqlx=warn,hyper=warn,reqwest=warn", log_directive(&level))
}

fn log_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Rejects tier sets that are empty, inverted, start on the event day or overlap.
pub fn validate_tiers(tiers: &[WindowTier]) -> Result<(), ConfigError> {
    let var = "NEWS_WINDOW_OFFSETS";
    if tiers.len() != 3 {
        return Err(ConfigError::invalid(var, "exactly three tiers are required"));
    }

    for tier in tiers {
        if tier.nearest == 0 {
            return Err(ConfigError::invalid(
                var,
                format!("{}: windows must end before the earnings date", tier.label),
            ));
        }
        if tier.nearest > tier.farthest {
            return Err(ConfigError::invalid(
                var,
                format!("{}: nearest day is after farthest day", tier.label),
            ));
        }
        if tier.max_articles == 0 {
            return Err(ConfigError::invalid(
                "MAX_NEWS_*",
                format!("{}: article cap must be greater than zero", tier.label),
            ));
        }
    }

    let mut sorted: Vec<&WindowTier> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.nearest);
    for pair in sorted.windows(2) {
        if pair[1].nearest <= pair[0].farthest {
            return Err(ConfigError::invalid(
                var,
                format!("{} overlaps {}", pair[0].label, pair[1].label),
            ));
        }
    }

    Ok(())
}

/// Parses `"1-1,2-4,5-7"`, pairing tiers with caps nearest-first.
fn parse_window_offsets(spec: &str, caps: [usize; 3]) -> Result<[WindowTier; 3], ConfigError> {
    let var = "NEWS_WINDOW_OFFSETS";
    let mut bounds = spec
        .split(',')
        .map(|part| {
            let (nearest, farthest) = part
                .trim()
                .split_once('-')
                .ok_or_else(|| ConfigError::invalid(var, format!("expected N-M, got {:?}", part)))?;
            let nearest: u32 = nearest
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(var, format!("bad day number in {:?}", part)))?;
            let farthest: u32 = farthest
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(var, format!("bad day number in {:?}", part)))?;
            Ok((nearest, farthest))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    if bounds.len() != 3 {
        return Err(ConfigError::invalid(var, "exactly three tiers are required"));
    }
    bounds.sort_by_key(|(nearest, _)| *nearest);

    Ok([
        WindowTier::new(bounds[0].0, bounds[0].1, caps[0]),
        WindowTier::new(bounds[1].0, bounds[1].1, caps[1]),
        WindowTier::new(bounds[2].0, bounds[2].1, caps[2]),
    ])
}

fn parse_date<F>(get: &F, var: &'static str) -> Result<NaiveDate, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get(var).ok_or(ConfigError::Missing(var))?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ConfigError::invalid(var, format!("{:?} is not YYYY-MM-DD: {}", raw, e)))
}

fn parse_cap<F>(get: &F, var: &'static str) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cap = parse_number::<usize, _>(get, var, 5)?;
    if cap == 0 {
        return Err(ConfigError::invalid(var, "must be greater than zero"));
    }
    Ok(cap)
}

fn parse_number<T, F>(get: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(var, format!("{:?}: {}", raw, e))),
        None => Ok(default),
    }
}
