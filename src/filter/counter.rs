//! Results counter text.

use crate::config::{COUNT_PLACEHOLDER, SearchConfig};
use crate::post::Post;

/// Number of posts currently shown.
pub fn visible_count(posts: &[Post]) -> usize {
    posts.iter().filter(|p| p.is_visible()).count()
}

/// Counter message for `count` shown posts, e.g. "1 result found" or
/// "3 results found".
pub fn counter_message(config: &SearchConfig, count: usize) -> String {
    if count == 1 {
        config.result_singular.clone()
    } else {
        config
            .result_plural
            .replace(COUNT_PLACEHOLDER, &count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_message_default_wording() {
        let config = SearchConfig::default();
        assert_eq!(counter_message(&config, 0), "0 results found");
        assert_eq!(counter_message(&config, 1), "1 result found");
        assert_eq!(counter_message(&config, 12), "12 results found");
    }

    #[test]
    fn test_counter_message_localized() {
        let config = SearchConfig {
            result_singular: "1 Ergebnis gefunden".into(),
            result_plural: "{count} Ergebnisse gefunden".into(),
            ..SearchConfig::default()
        };
        assert_eq!(counter_message(&config, 1), "1 Ergebnis gefunden");
        assert_eq!(counter_message(&config, 2), "2 Ergebnisse gefunden");
    }

    #[test]
    fn test_visible_count() {
        let mut posts = vec![Post::new("a", "", ""), Post::new("b", "", "")];
        assert_eq!(visible_count(&posts), 2);
        posts[1].visibility.hidden_by_search = true;
        assert_eq!(visible_count(&posts), 1);
    }
}
