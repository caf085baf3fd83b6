use log::Level;
use web_sys::window;

const STORAGE_PREFIX: &str = "expense_tracker_";

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Prefix for every API path, e.g. "/api" or "http://localhost:5000/api".
    pub api_base: String,

    pub log_level: Level,

    /// Quiet period before a description edit triggers a prediction.
    pub debounce_ms: u32,

    /// How long a toast stays fully visible.
    pub toast_duration_ms: u32,

    /// Length of the toast fade-out transition.
    pub toast_fade_ms: u32,

    /// Delay between inserting a toast and starting its enter transition.
    pub toast_enter_delay_ms: u32,

    /// Minimum trimmed description length (in characters) worth predicting.
    pub min_prediction_chars: usize,

    /// Confidence strictly above this is shown as "high".
    pub high_confidence: f64,

    /// Number of most recent months shown in the trend chart.
    pub monthly_window: usize,

    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            log_level: Level::Info,
            debounce_ms: 500,
            toast_duration_ms: 3000,
            toast_fade_ms: 300,
            toast_enter_delay_ms: 100,
            min_prediction_chars: 3,
            high_confidence: 0.8,
            monthly_window: 6,
            currency_symbol: "$".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then localhost detection, then localStorage overrides.
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            if hostname == "localhost" || hostname == "127.0.0.1" {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            settings.apply_overrides(|key| {
                storage
                    .get_item(&format!("{}{}", STORAGE_PREFIX, key))
                    .ok()
                    .flatten()
            });
        }

        settings
    }

    /// Applies string overrides looked up by key (without the storage prefix).
    /// Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("api_base") {
            let api_base = api_base.trim().trim_end_matches('/');
            if !api_base.is_empty() {
                self.api_base = api_base.to_string();
            }
        }

        if let Some(level) = lookup("log_level") {
            if let Some(level) = parse_level(&level) {
                self.log_level = level;
            }
        }

        if let Some(ms) = lookup("debounce_ms").and_then(|v| v.trim().parse::<u32>().ok()) {
            self.debounce_ms = ms;
        }

        if let Some(ms) = lookup("toast_duration_ms").and_then(|v| v.trim().parse::<u32>().ok()) {
            self.toast_duration_ms = ms;
        }

        if let Some(symbol) = lookup("currency_symbol") {
            if !symbol.trim().is_empty() {
                self.currency_symbol = symbol.trim().to_string();
            }
        }
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut settings = Settings::default();
        settings.apply_overrides(|key| map.get(key).cloned());
        settings
    }

    #[test]
    fn defaults_match_dashboard_behaviour() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "/api");
        assert_eq!(settings.debounce_ms, 500);
        assert_eq!(settings.toast_duration_ms, 3000);
        assert_eq!(settings.min_prediction_chars, 3);
        assert_eq!(settings.monthly_window, 6);
    }

    #[test]
    fn overrides_are_applied_and_trailing_slash_dropped() {
        let settings = overrides(&[
            ("api_base", "http://localhost:5000/api/"),
            ("log_level", "TRACE"),
            ("debounce_ms", "250"),
            ("currency_symbol", "€"),
        ]);
        assert_eq!(settings.api_base, "http://localhost:5000/api");
        assert_eq!(settings.log_level, Level::Trace);
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.currency_symbol, "€");
    }

    #[test]
    fn garbage_overrides_keep_defaults() {
        let settings = overrides(&[
            ("api_base", "   "),
            ("log_level", "loud"),
            ("debounce_ms", "soon"),
            ("toast_duration_ms", "-1"),
        ]);
        assert_eq!(settings, Settings::default());
    }
}
