use std::path::PathBuf;
use std::time::Duration;

use crate::espn::ESPN_API_BASE;

const DEFAULT_REFRESH_SECS: u64 = 300;
const MIN_REFRESH_SECS: u64 = 30;
const DEFAULT_CACHE_HOURS: u64 = 24;
const DEFAULT_LOG_FILE: &str = "chicago_sports.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub espn_base_url: String,
    /// Overrides the per-user cache directory.
    pub cache_dir: Option<PathBuf>,
    pub cache_duration: Duration,
    pub refresh_interval: Duration,
    pub offline: bool,
    pub log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let refresh_secs = non_empty("CHISPORTS_REFRESH_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_REFRESH_SECS)
            .max(MIN_REFRESH_SECS);
        let cache_hours = non_empty("CHISPORTS_CACHE_HOURS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_CACHE_HOURS)
            .max(1);
        let offline = non_empty("CHISPORTS_OFFLINE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            espn_base_url: non_empty("CHISPORTS_ESPN_BASE")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| ESPN_API_BASE.to_string()),
            cache_dir: non_empty("CHISPORTS_CACHE_DIR").map(PathBuf::from),
            cache_duration: Duration::from_secs(cache_hours.saturating_mul(60 * 60)),
            refresh_interval: Duration::from_secs(refresh_secs),
            offline,
            log_path: non_empty("CHISPORTS_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = Config::default();
        assert_eq!(cfg.espn_base_url, ESPN_API_BASE);
        assert_eq!(cfg.cache_duration, Duration::from_secs(24 * 3600));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(300));
        assert!(!cfg.offline);
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn reads_and_bounds_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("CHISPORTS_REFRESH_SECS", "5"),
            ("CHISPORTS_CACHE_HOURS", "12"),
            ("CHISPORTS_OFFLINE", "Yes"),
            ("CHISPORTS_CACHE_DIR", "/tmp/cs"),
            ("CHISPORTS_ESPN_BASE", " "),
        ]));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(30));
        assert_eq!(cfg.cache_duration, Duration::from_secs(12 * 3600));
        assert!(cfg.offline);
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/tmp/cs")));
        assert_eq!(cfg.espn_base_url, ESPN_API_BASE);
    }

    #[test]
    fn huge_cache_hours_saturate() {
        let cfg = Config::from_lookup(lookup(&[("CHISPORTS_CACHE_HOURS", "18446744073709551615")]));
        assert_eq!(cfg.cache_duration, Duration::from_secs(u64::MAX));
    }
}
