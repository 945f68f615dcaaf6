//! Configuration resolution for tutortrack-ri
//!
//! Program settings resolve through three tiers with Database → ENV →
//! TOML priority. Both settings are optional: the inference cascade
//! degrades gracefully without them, so resolution reports what it
//! found rather than failing.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::types::MAX_PROGRAM_WEEK;

/// Program-level settings consulted when a resolve request omits them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramSettings {
    /// First day of program week 1
    pub program_start: Option<NaiveDate>,
    /// Default week for this program type
    pub default_week: Option<u8>,
}

/// Load all program settings for a resolution pass
pub async fn load_program_settings(pool: &SqlitePool) -> Result<ProgramSettings> {
    Ok(ProgramSettings {
        program_start: resolve_program_start(pool).await?,
        default_week: resolve_default_week(pool).await?,
    })
}

/// Resolve the program start date from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_program_start(pool: &SqlitePool) -> Result<Option<NaiveDate>> {
    let raw = resolve_setting(
        pool,
        "program_start",
        "TUTORTRACK_PROGRAM_START",
        "program start date",
    )
    .await?;

    match raw {
        Some(value) => match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(
                    value = %value,
                    error = %e,
                    "Ignoring unparseable program start date (expected YYYY-MM-DD)"
                );
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Resolve the program default week from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_default_week(pool: &SqlitePool) -> Result<Option<u8>> {
    let raw = resolve_setting(
        pool,
        "default_week",
        "TUTORTRACK_DEFAULT_WEEK",
        "default week",
    )
    .await?;

    match raw {
        Some(value) => match value.trim().parse::<u8>() {
            Ok(week) if (1..=MAX_PROGRAM_WEEK).contains(&week) => Ok(Some(week)),
            Ok(week) => {
                warn!(week, "Ignoring out-of-range default week");
                Ok(None)
            }
            Err(e) => {
                warn!(value = %value, error = %e, "Ignoring unparseable default week");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Three-tier lookup shared by every setting
///
/// The settings table is authoritative, then the environment, then the
/// user TOML file (same key name as the settings table). Warns when a
/// setting is present in more than one source.
async fn resolve_setting(
    pool: &SqlitePool,
    key: &str,
    env_var: &str,
    label: &str,
) -> Result<Option<String>> {
    let db_value = crate::db::settings::get_setting(pool, key)
        .await?
        .filter(|v| !v.trim().is_empty());
    let env_value = std::env::var(env_var).ok().filter(|v| !v.trim().is_empty());
    let toml_value =
        tutortrack_common::config::read_config_key(key).filter(|v| !v.trim().is_empty());

    let mut sources = Vec::new();
    if db_value.is_some() {
        sources.push("database");
    }
    if env_value.is_some() {
        sources.push("environment");
    }
    if toml_value.is_some() {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "{} found in multiple sources: {}. Using {} (highest priority).",
            label,
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(value) = db_value {
        info!("{} loaded from database", label);
        return Ok(Some(value));
    }
    if let Some(value) = env_value {
        info!("{} loaded from environment variable", label);
        return Ok(Some(value));
    }
    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Ok(Some(value));
    }

    Ok(None)
}
