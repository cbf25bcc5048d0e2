//! `[search]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder replaced by the visible post count in `result_plural`.
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// `[search]` section in postfilter.toml - word search settings.
///
/// # Example
/// ```toml
/// [search]
/// debounce_ms = 300
/// result_singular = "1 Ergebnis gefunden"
/// result_plural = "{count} Ergebnisse gefunden"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before the search runs.
    #[serde(default = "defaults::search::debounce_ms")]
    #[educe(Default = defaults::search::debounce_ms())]
    pub debounce_ms: u64,

    /// Class of the `<span>` wrapped around every match.
    #[serde(default = "defaults::search::highlight_class")]
    #[educe(Default = defaults::search::highlight_class())]
    pub highlight_class: String,

    /// Counter text when exactly one post is shown.
    #[serde(default = "defaults::search::result_singular")]
    #[educe(Default = defaults::search::result_singular())]
    pub result_singular: String,

    /// Counter text otherwise; `{count}` is replaced by the number.
    #[serde(default = "defaults::search::result_plural")]
    #[educe(Default = defaults::search::result_plural())]
    pub result_plural: String,
}

impl SearchConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::super::FilterConfig;
    use std::time::Duration;

    #[test]
    fn test_search_config_defaults() {
        let config: FilterConfig = toml::from_str("").unwrap();

        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.highlight_class, "search-highlight");
        assert_eq!(config.search.result_singular, "1 result found");
        assert_eq!(config.search.result_plural, "{count} results found");
    }

    #[test]
    fn test_search_config_localized_counter() {
        let config = r#"
            [search]
            result_singular = "1 Ergebnis gefunden"
            result_plural = "{count} Ergebnisse gefunden"
        "#;
        let config: FilterConfig = toml::from_str(config).unwrap();

        assert_eq!(config.search.result_singular, "1 Ergebnis gefunden");
        assert_eq!(config.search.result_plural, "{count} Ergebnisse gefunden");
        assert_eq!(config.search.debounce_ms, 300);
    }
}
