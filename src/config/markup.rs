//! `[markup]` section configuration.
//!
//! Names of the classes, attributes and ids that make up the listing page
//! contract. The defaults match the stock blog theme.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[markup]` section in postfilter.toml - listing page markup contract.
///
/// # Example
/// ```toml
/// [markup]
/// post_class = "post-box"   # container of one post
/// tags_attr = "data-tags"   # whitespace-separated tag labels
/// title_tag = "h2"
/// description_tag = "p"
/// inject_style = false      # theme already hides filtered posts
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct MarkupConfig {
    /// Class marking a post container.
    #[serde(default = "defaults::markup::post_class")]
    #[educe(Default = defaults::markup::post_class())]
    pub post_class: String,

    /// Post attribute holding whitespace-separated tag labels.
    #[serde(default = "defaults::markup::tags_attr")]
    #[educe(Default = defaults::markup::tags_attr())]
    pub tags_attr: String,

    /// Element holding the post title (first one inside the post wins).
    #[serde(default = "defaults::markup::title_tag")]
    #[educe(Default = defaults::markup::title_tag())]
    pub title_tag: String,

    /// Element holding the post description (first one inside the post wins).
    #[serde(default = "defaults::markup::description_tag")]
    #[educe(Default = defaults::markup::description_tag())]
    pub description_tag: String,

    /// Class of the tag labels rendered inside a post.
    #[serde(default = "defaults::markup::post_tag_class")]
    #[educe(Default = defaults::markup::post_tag_class())]
    pub post_tag_class: String,

    /// Class of the tag filter buttons.
    #[serde(default = "defaults::markup::tag_button_class")]
    #[educe(Default = defaults::markup::tag_button_class())]
    pub tag_button_class: String,

    /// Tag button attribute holding its label.
    #[serde(default = "defaults::markup::tag_attr")]
    #[educe(Default = defaults::markup::tag_attr())]
    pub tag_attr: String,

    #[serde(default = "defaults::markup::search_input_id")]
    #[educe(Default = defaults::markup::search_input_id())]
    pub search_input_id: String,

    #[serde(default = "defaults::markup::search_button_id")]
    #[educe(Default = defaults::markup::search_button_id())]
    pub search_button_id: String,

    #[serde(default = "defaults::markup::clear_search_id")]
    #[educe(Default = defaults::markup::clear_search_id())]
    pub clear_search_id: String,

    #[serde(default = "defaults::markup::results_count_id")]
    #[educe(Default = defaults::markup::results_count_id())]
    pub results_count_id: String,

    #[serde(default = "defaults::markup::sort_button_id")]
    #[educe(Default = defaults::markup::sort_button_id())]
    pub sort_button_id: String,

    /// Element inside (or near) the sort button showing the direction.
    #[serde(default = "defaults::markup::sort_label_id")]
    #[educe(Default = defaults::markup::sort_label_id())]
    pub sort_label_id: String,

    /// Class toggled on tag buttons whose label is active.
    #[serde(default = "defaults::markup::active_class")]
    #[educe(Default = defaults::markup::active_class())]
    pub active_class: String,

    /// Class toggled on post tag labels that match the active tags.
    #[serde(default = "defaults::markup::highlight_class")]
    #[educe(Default = defaults::markup::highlight_class())]
    pub highlight_class: String,

    #[serde(default = "defaults::markup::tag_hidden_class")]
    #[educe(Default = defaults::markup::tag_hidden_class())]
    pub tag_hidden_class: String,

    #[serde(default = "defaults::markup::search_hidden_class")]
    #[educe(Default = defaults::markup::search_hidden_class())]
    pub search_hidden_class: String,

    /// Inject a `<style>` hiding filtered posts before `</head>`.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub inject_style: bool,
}

impl MarkupConfig {
    /// Stylesheet that hides posts carrying either hidden class.
    pub fn hiding_style(&self) -> String {
        format!(
            ".{}, .{} {{ display: none !important; }}",
            self.tag_hidden_class, self.search_hidden_class
        )
    }

    /// Every class/attribute/id name paired with its config key, for validation.
    pub(super) fn named_fields(&self) -> [(&'static str, &str); 17] {
        [
            ("post_class", &self.post_class),
            ("tags_attr", &self.tags_attr),
            ("title_tag", &self.title_tag),
            ("description_tag", &self.description_tag),
            ("post_tag_class", &self.post_tag_class),
            ("tag_button_class", &self.tag_button_class),
            ("tag_attr", &self.tag_attr),
            ("search_input_id", &self.search_input_id),
            ("search_button_id", &self.search_button_id),
            ("clear_search_id", &self.clear_search_id),
            ("results_count_id", &self.results_count_id),
            ("sort_button_id", &self.sort_button_id),
            ("sort_label_id", &self.sort_label_id),
            ("active_class", &self.active_class),
            ("highlight_class", &self.highlight_class),
            ("tag_hidden_class", &self.tag_hidden_class),
            ("search_hidden_class", &self.search_hidden_class),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::super::FilterConfig;

    #[test]
    fn test_markup_config_defaults() {
        let config: FilterConfig = toml::from_str("").unwrap();

        assert_eq!(config.markup.post_class, "post-box");
        assert_eq!(config.markup.tags_attr, "data-tags");
        assert_eq!(config.markup.title_tag, "h2");
        assert_eq!(config.markup.description_tag, "p");
        assert_eq!(config.markup.tag_button_class, "tag-button");
        assert_eq!(config.markup.results_count_id, "results-count");
        assert!(config.markup.inject_style);
    }

    #[test]
    fn test_markup_config_partial_override() {
        let config = r#"
            [markup]
            post_class = "entry"
            title_tag = "h3"
            inject_style = false
        "#;
        let config: FilterConfig = toml::from_str(config).unwrap();

        assert_eq!(config.markup.post_class, "entry");
        assert_eq!(config.markup.title_tag, "h3");
        assert!(!config.markup.inject_style);
        // untouched fields keep defaults
        assert_eq!(config.markup.description_tag, "p");
    }

    #[test]
    fn test_markup_unknown_field_rejection() {
        let config = r#"
            [markup]
            post_selector = ".post-box"
        "#;
        let result: Result<FilterConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_hiding_style() {
        let config = FilterConfig::default();
        assert_eq!(
            config.markup.hiding_style(),
            ".tag-hidden, .search-hidden { display: none !important; }"
        );
    }
}
