//! Filter configuration management for `postfilter.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[markup]`  | Classes, attributes and ids of the listing page     |
//! | `[search]`  | Debounce, highlight class, results counter wording  |
//! | `[sort]`    | Sort control toggle, initial direction, labels      |
//!
//! The file is optional: every field has a default matching the stock theme.
//!
//! # Example
//!
//! ```toml
//! [markup]
//! post_class = "post-box"
//! inject_style = false
//!
//! [search]
//! debounce_ms = 250
//! result_plural = "{count} posts"
//!
//! [sort]
//! initial = "desc"
//! ```

pub mod defaults;
mod error;
mod markup;
mod search;
mod sort;

pub use error::ConfigError;
pub use markup::MarkupConfig;
pub use search::{COUNT_PLACEHOLDER, SearchConfig};
pub use sort::SortConfig;

use crate::cli::Cli;
use crate::log;
use anyhow::{Context, Result};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing postfilter.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Path of the file this config was read from, if any
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Listing page markup contract
    #[serde(default)]
    pub markup: MarkupConfig,

    /// Word search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Sort control settings
    #[serde(default)]
    pub sort: SortConfig,
}

impl FilterConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load, override with CLI arguments and validate.
    ///
    /// A missing config file is not an error; defaults are used instead.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.exists() {
            Self::from_path(&cli.config)
                .with_context(|| format!("failed to load `{}`", cli.config.display()))?
        } else {
            log!("config"; "`{}` not found, using defaults", cli.config.display());
            Self::default()
        };

        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(args) = cli.render_args() {
            Self::update_option(&mut self.markup.inject_style, args.style.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.markup.named_fields() {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "[markup.{field}] must not be empty"
                )));
            }
            if value.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "[markup.{field}] must be a single name, got `{value}`"
                )));
            }
        }

        if self.search.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "[search.debounce_ms] must be greater than 0".into(),
            ));
        }

        if self.search.highlight_class.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[search.highlight_class] must not be empty".into(),
            ));
        }

        if !self.search.result_plural.contains(COUNT_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "[search.result_plural] must contain `{COUNT_PLACEHOLDER}`"
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortDirection;
    use std::io::Write;

    #[test]
    fn test_from_str() {
        let config = FilterConfig::from_str(
            r#"
            [markup]
            post_class = "entry"
            [search]
            debounce_ms = 150
            [sort]
            initial = "desc"
        "#,
        )
        .unwrap();

        assert_eq!(config.markup.post_class, "entry");
        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.sort.initial, SortDirection::Descending);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = FilterConfig::from_str("[markup\npost_class = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nresult_plural = \"{{count}} posts\"").unwrap();

        let config = FilterConfig::from_path(file.path()).unwrap();
        assert_eq!(config.search.result_plural, "{count} posts");
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = FilterConfig::from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FilterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_markup_name() {
        let mut config = FilterConfig::default();
        config.markup.post_class = "  ".into();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[markup.post_class]"));
    }

    #[test]
    fn test_validate_markup_name_with_whitespace() {
        let mut config = FilterConfig::default();
        config.markup.tag_button_class = "tag button".into();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[markup.tag_button_class]"));
    }

    #[test]
    fn test_validate_zero_debounce() {
        let mut config = FilterConfig::default();
        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_plural_without_placeholder() {
        let mut config = FilterConfig::default();
        config.search.result_plural = "many results".into();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{count}"));
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let result = FilterConfig::from_str("[unknown_section]\nfield = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_update_with_cli_style_override() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["postfilter", "apply", "a.html", "--style", "false"]).unwrap();
        let mut config = FilterConfig::default();
        config.update_with_cli(&cli);
        assert!(!config.markup.inject_style);

        // no flag keeps the file value
        let cli = Cli::try_parse_from(["postfilter", "apply", "a.html"]).unwrap();
        let mut config = FilterConfig::default();
        config.update_with_cli(&cli);
        assert!(config.markup.inject_style);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["postfilter", "-C", "/not/here.toml", "inspect", "a.html"])
            .unwrap();
        let config = FilterConfig::load(&cli).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.markup.post_class, "post-box");
    }
}
