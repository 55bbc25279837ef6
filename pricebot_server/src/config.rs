use std::{env, path::PathBuf};

use chrono::Duration;
use log::*;
use pricebot_common::helpers::parse_boolean_flag;
use pricebot_engine::TrackerConfig;

const DEFAULT_CATALOG_DIR: &str = "./data/catalog";
const DEFAULT_PRICE_SHEET: &str = "./data/prices.json";
const DEFAULT_REGION: &str = "The Forge";

#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Directory holding `items.json`, `regions.json` and `systems.json`.
    pub catalog_dir: PathBuf,
    /// The JSON price sheet that backs market data lookups.
    pub price_sheet: PathBuf,
    pub catalog_refresh_interval: Duration,
    /// Time between tracking ticks.
    pub tracking_interval: Duration,
    /// Default and maximum tracking durations.
    pub tracking: TrackerConfig,
    /// The region used for price checks and tracking requests that do not name one.
    pub default_region: String,
    pub fuzzy_matching: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from(DEFAULT_CATALOG_DIR),
            price_sheet: PathBuf::from(DEFAULT_PRICE_SHEET),
            catalog_refresh_interval: default_catalog_refresh_interval(),
            tracking_interval: default_tracking_interval(),
            tracking: TrackerConfig::default(),
            default_region: DEFAULT_REGION.to_string(),
            fuzzy_matching: true,
        }
    }
}

fn default_catalog_refresh_interval() -> Duration {
    Duration::hours(1)
}

fn default_tracking_interval() -> Duration {
    Duration::seconds(60)
}

impl BotConfig {
    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let catalog_dir = env::var("PRICEBOT_CATALOG_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ PRICEBOT_CATALOG_DIR is not set. Loading the catalog from {DEFAULT_CATALOG_DIR}.");
            defaults.catalog_dir.clone()
        });
        let price_sheet = env::var("PRICEBOT_PRICE_SHEET").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ PRICEBOT_PRICE_SHEET is not set. Reading prices from {DEFAULT_PRICE_SHEET}.");
            defaults.price_sheet.clone()
        });
        let catalog_refresh_interval = duration_from_env(
            "PRICEBOT_CATALOG_REFRESH_INTERVAL",
            Duration::try_seconds,
            "s",
            defaults.catalog_refresh_interval,
        );
        let tracking_interval =
            duration_from_env("PRICEBOT_TRACKING_INTERVAL", Duration::try_seconds, "s", defaults.tracking_interval);
        let default_duration = duration_from_env(
            "PRICEBOT_TRACKING_DURATION",
            Duration::try_minutes,
            "min",
            defaults.tracking.default_duration,
        );
        let max_duration = duration_from_env(
            "PRICEBOT_MAX_TRACKING_DURATION",
            Duration::try_hours,
            "hrs",
            defaults.tracking.max_duration,
        );
        let tracking = if default_duration > max_duration {
            warn!(
                "🪛️ The default tracking duration ({} min) is longer than the maximum ({} min). Using the maximum for \
                 both.",
                default_duration.num_minutes(),
                max_duration.num_minutes()
            );
            TrackerConfig { default_duration: max_duration, max_duration }
        } else {
            TrackerConfig { default_duration, max_duration }
        };
        let default_region = env::var("PRICEBOT_DEFAULT_REGION")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| {
                info!("🪛️ PRICEBOT_DEFAULT_REGION is not set. Using {DEFAULT_REGION}.");
                defaults.default_region.clone()
            });
        let fuzzy_matching = parse_boolean_flag(env::var("PRICEBOT_FUZZY_MATCHING").ok(), true);
        if !fuzzy_matching {
            info!("🪛️ Fuzzy matching is disabled. Misspelled names will not be guessed.");
        }
        Self {
            catalog_dir,
            price_sheet,
            catalog_refresh_interval,
            tracking_interval,
            tracking,
            default_region,
            fuzzy_matching,
        }
    }
}

/// Read a positive whole number of `unit`s from `var`, falling back to `default` if it is missing, invalid or longer
/// than a year.
fn duration_from_env(var: &str, unit: fn(i64) -> Option<Duration>, unit_name: &str, default: Duration) -> Duration {
    let fallback = describe(default, unit, unit_name);
    env::var(var)
        .map_err(|_| {
            info!("🪛️ {var} is not set. Using the default value of {fallback}.");
        })
        .and_then(|s| s.trim().parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for {var}. {e}")))
        .and_then(|v| {
            if v <= 0 {
                warn!("🪛️ {var} must be greater than zero. Using the default value of {fallback}.");
                return Err(());
            }
            match unit(v) {
                Some(d) if d <= longest_configurable_duration() => Ok(d),
                _ => {
                    warn!("🪛️ {v} {unit_name} is too long for {var}. Using the default value of {fallback}.");
                    Err(())
                },
            }
        })
        .unwrap_or(default)
}

fn longest_configurable_duration() -> Duration {
    Duration::days(365)
}

fn describe(duration: Duration, unit: fn(i64) -> Option<Duration>, unit_name: &str) -> String {
    let per_unit = unit(1).map(|d| d.num_seconds()).unwrap_or(1).max(1);
    format!("{} {unit_name}", duration.num_seconds() / per_unit)
}
