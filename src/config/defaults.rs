//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [markup] Section Defaults
// ============================================================================

pub mod markup {
    pub fn post_class() -> String {
        "post-box".into()
    }

    pub fn tags_attr() -> String {
        "data-tags".into()
    }

    pub fn title_tag() -> String {
        "h2".into()
    }

    pub fn description_tag() -> String {
        "p".into()
    }

    pub fn post_tag_class() -> String {
        "post-tag".into()
    }

    pub fn tag_button_class() -> String {
        "tag-button".into()
    }

    pub fn tag_attr() -> String {
        "data-tag".into()
    }

    pub fn search_input_id() -> String {
        "search-input".into()
    }

    pub fn search_button_id() -> String {
        "search-button".into()
    }

    pub fn clear_search_id() -> String {
        "clear-search".into()
    }

    pub fn results_count_id() -> String {
        "results-count".into()
    }

    pub fn sort_button_id() -> String {
        "sort-button".into()
    }

    pub fn sort_label_id() -> String {
        "sort-direction".into()
    }

    pub fn active_class() -> String {
        "active".into()
    }

    pub fn highlight_class() -> String {
        "highlight".into()
    }

    pub fn tag_hidden_class() -> String {
        "tag-hidden".into()
    }

    pub fn search_hidden_class() -> String {
        "search-hidden".into()
    }
}

// ============================================================================
// [search] Section Defaults
// ============================================================================

pub mod search {
    pub fn debounce_ms() -> u64 {
        300
    }

    pub fn highlight_class() -> String {
        "search-highlight".into()
    }

    pub fn result_singular() -> String {
        "1 result found".into()
    }

    pub fn result_plural() -> String {
        "{count} results found".into()
    }
}

// ============================================================================
// [sort] Section Defaults
// ============================================================================

pub mod sort {
    use crate::filter::SortDirection;

    pub fn initial() -> SortDirection {
        SortDirection::Ascending
    }

    pub fn ascending_label() -> String {
        "A–Z".into()
    }

    pub fn descending_label() -> String {
        "Z–A".into()
    }
}
