//! `[sort]` section configuration.

use super::defaults;
use crate::filter::SortDirection;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[sort]` section in postfilter.toml - title sort control.
///
/// # Example
/// ```toml
/// [sort]
/// enable = true
/// initial = "asc"
/// ascending_label = "↑"
/// descending_label = "↓"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    /// Enable the sort control when the page has a sort button.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Direction of the one-time sort performed at setup.
    #[serde(default = "defaults::sort::initial")]
    #[educe(Default = defaults::sort::initial())]
    pub initial: SortDirection,

    #[serde(default = "defaults::sort::ascending_label")]
    #[educe(Default = defaults::sort::ascending_label())]
    pub ascending_label: String,

    #[serde(default = "defaults::sort::descending_label")]
    #[educe(Default = defaults::sort::descending_label())]
    pub descending_label: String,
}

impl SortConfig {
    /// Direction indicator text for the sort label.
    pub fn label(&self, direction: SortDirection) -> &str {
        match direction {
            SortDirection::Ascending => &self.ascending_label,
            SortDirection::Descending => &self.descending_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FilterConfig;
    use crate::filter::SortDirection;

    #[test]
    fn test_sort_config_defaults() {
        let config: FilterConfig = toml::from_str("").unwrap();

        assert!(config.sort.enable);
        assert_eq!(config.sort.initial, SortDirection::Ascending);
        assert_eq!(config.sort.label(SortDirection::Ascending), "A–Z");
        assert_eq!(config.sort.label(SortDirection::Descending), "Z–A");
    }

    #[test]
    fn test_sort_config_initial_desc() {
        let config = r#"
            [sort]
            initial = "desc"
            enable = false
        "#;
        let config: FilterConfig = toml::from_str(config).unwrap();

        assert!(!config.sort.enable);
        assert_eq!(config.sort.initial, SortDirection::Descending);
    }

    #[test]
    fn test_sort_config_invalid_direction() {
        let config = r#"
            [sort]
            initial = "sideways"
        "#;
        let result: Result<FilterConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
