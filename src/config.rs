use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use chrono::{Duration, FixedOffset, NaiveDate, Offset, Utc};
use dotenvy::dotenv;

use crate::model::DayCounting;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,
    /// JSON file with employees, leave types, roles, policies and balances.
    pub seed_file: Option<String>,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub workflow: WorkflowSettings,
}

/// The part of the configuration the leave workflow itself reads.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    pub day_counting: DayCounting,
    /// Offset used for "today" and for working-hour policy rules.
    pub utc_offset: FixedOffset,
    /// Age after which pending approvals are reminded.
    pub reminder_after: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            day_counting: DayCounting::Calendar,
            utc_offset: Utc.fix(),
            reminder_after: Duration::hours(24),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let holidays = match env::var("LEAVE_HOLIDAYS") {
            Ok(raw) => parse_holidays(&raw)?,
            Err(_) => BTreeSet::new(),
        };
        let day_counting = match optional("LEAVE_DAY_COUNTING").as_deref() {
            None | Some("calendar") => DayCounting::Calendar,
            Some("working_days") => DayCounting::WorkingDays { holidays },
            Some(other) => bail!("LEAVE_DAY_COUNTING must be calendar or working_days, got {other}"),
        };
        let offset_minutes: i32 = parsed_or("LEAVE_UTC_OFFSET_MINUTES", 0)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| anyhow!("LEAVE_UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: optional("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: optional("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            seed_file: optional("SEED_FILE"),
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,
            workflow: WorkflowSettings {
                day_counting,
                utc_offset,
                reminder_after: reminder_window(parsed_or("REMINDER_AFTER_HOURS", 24)?)?,
            },
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid number: {raw}")),
        None => Ok(default),
    }
}

fn reminder_window(hours: i64) -> anyhow::Result<Duration> {
    if hours < 0 {
        bail!("REMINDER_AFTER_HOURS cannot be negative, got {hours}");
    }
    Duration::try_hours(hours).ok_or_else(|| anyhow!("REMINDER_AFTER_HOURS out of range: {hours}"))
}

pub(crate) fn parse_holidays(raw: &str) -> anyhow::Result<BTreeSet<NaiveDate>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid holiday date {s}"))
        })
        .collect()
}
