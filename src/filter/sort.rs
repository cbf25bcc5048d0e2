//! Title sort control.
//!
//! Titles are compared by a transliterated, lowercased key (`deunicode`), so
//! "Écrire" sorts next to "ecrire" instead of after "z". Ties fall back to the
//! plain lowercased title and then keep their previous relative order.

use crate::post::Post;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Sort direction of the post list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Short name (used in logs and reports).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Collation key of a title: transliterated to ASCII and lowercased.
fn collation_key(title: &str) -> (String, String) {
    let lower = title.to_lowercase();
    (deunicode::deunicode(&lower).to_lowercase(), lower)
}

/// Stable sort of all posts by title, regardless of their visibility.
pub fn sort_posts(posts: &mut [Post], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => {
            posts.sort_by_cached_key(|post| collation_key(post.title.text()));
        }
        SortDirection::Descending => {
            posts.sort_by_cached_key(|post| Reverse(collation_key(post.title.text())));
        }
    }
}

/// Sort toggle button state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortControl {
    direction: SortDirection,
}

impl SortControl {
    pub const fn new(initial: SortDirection) -> Self {
        Self { direction: initial }
    }

    #[inline]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// One-time sort at setup, in the initial direction.
    pub fn setup(&self, posts: &mut [Post]) {
        sort_posts(posts, self.direction);
    }

    /// Flip the direction and reorder. Returns the new direction.
    pub fn click(&mut self, posts: &mut [Post]) -> SortDirection {
        self.direction = self.direction.flipped();
        sort_posts(posts, self.direction);
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.text()).collect()
    }

    fn posts(titles: &[&str]) -> Vec<Post> {
        titles.iter().map(|t| Post::new(t, "", "")).collect()
    }

    #[test]
    fn test_direction_flip() {
        assert_eq!(SortDirection::Ascending.flipped(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.flipped(), SortDirection::Ascending);
        assert_eq!(SortDirection::default(), SortDirection::Ascending);
    }

    fn compare(a: &str, b: &str) -> Ordering {
        collation_key(a).0.cmp(&collation_key(b).0)
    }

    #[test]
    fn test_collation_case_insensitive() {
        assert_eq!(compare("apple", "Banana"), Ordering::Less);
        assert_eq!(compare("Zebra", "apple"), Ordering::Greater);
        assert_eq!(collation_key("Rust"), collation_key("rust"));
    }

    #[test]
    fn test_collation_accents_near_base_letter() {
        assert_eq!(compare("Écrire", "Fable"), Ordering::Less);
        assert_eq!(compare("Écrire", "Dune"), Ordering::Greater);
    }

    #[test]
    fn test_scenario_d_setup_then_first_click() {
        let mut list = posts(&["Banana", "Apple"]);
        let mut sort = SortControl::new(SortDirection::Ascending);

        sort.setup(&mut list);
        assert_eq!(titles(&list), ["Apple", "Banana"]);

        assert_eq!(sort.click(&mut list), SortDirection::Descending);
        assert_eq!(titles(&list), ["Banana", "Apple"]);

        assert_eq!(sort.click(&mut list), SortDirection::Ascending);
        assert_eq!(titles(&list), ["Apple", "Banana"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_titles() {
        let mut list = vec![
            Post::new("Same", "first", ""),
            Post::new("Alpha", "", ""),
            Post::new("same", "second", ""),
        ];

        sort_posts(&mut list, SortDirection::Ascending);
        let order: Vec<_> = list.iter().map(|p| p.description.text()).collect();
        assert_eq!(order, ["", "first", "second"]);

        sort_posts(&mut list, SortDirection::Descending);
        let order: Vec<_> = list.iter().map(|p| p.description.text()).collect();
        assert_eq!(order, ["first", "second", ""]);
    }

    #[test]
    fn test_sort_preserves_visibility_flags() {
        let mut list = posts(&["b", "a", "c"]);
        list[0].visibility.hidden_by_tag = true;
        list[2].visibility.hidden_by_search = true;

        sort_posts(&mut list, SortDirection::Ascending);
        assert_eq!(titles(&list), ["a", "b", "c"]);
        assert!(list[0].is_visible());
        assert!(list[1].visibility.hidden_by_tag);
        assert!(list[2].visibility.hidden_by_search);
    }

    #[test]
    fn test_direction_serde_names() {
        #[derive(Deserialize)]
        struct Wrap {
            d: SortDirection,
        }
        let w: Wrap = toml::from_str("d = \"desc\"").unwrap();
        assert_eq!(w.d, SortDirection::Descending);
        let w: Wrap = toml::from_str("d = \"ascending\"").unwrap();
        assert_eq!(w.d, SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.name(), "desc");
    }
}
