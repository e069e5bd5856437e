use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt::Display};

use super::Interests;

/// A label from the activity vocabulary.
///
/// Comparison is exact: no case folding and no whitespace trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Tag {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which side of the preference set a toggle targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Like,
    Dislike,
}

impl From<bool> for Sentiment {
    fn from(want_like: bool) -> Self {
        if want_like {
            Sentiment::Like
        } else {
            Sentiment::Dislike
        }
    }
}

/// One participant's in-progress likes and dislikes.
///
/// Both lists keep selection order and never share a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPreferenceSet {
    liked: Vec<Tag>,
    disliked: Vec<Tag>,
}

impl TagPreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn liked(&self) -> &[Tag] {
        &self.liked
    }

    pub fn disliked(&self) -> &[Tag] {
        &self.disliked
    }

    /// Total number of selections on either side
    pub fn size(&self) -> usize {
        self.liked.len() + self.disliked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn sentiment_of(&self, tag: &str) -> Option<Sentiment> {
        if self.liked.iter().any(|t| t.as_str() == tag) {
            Some(Sentiment::Like)
        } else if self.disliked.iter().any(|t| t.as_str() == tag) {
            Some(Sentiment::Dislike)
        } else {
            None
        }
    }

    /// Un-likes a liked tag, otherwise likes it and drops any dislike
    pub fn toggle_like(&mut self, tag: Tag) {
        Self::toggle_into(&mut self.liked, &mut self.disliked, tag);
    }

    /// Un-dislikes a disliked tag, otherwise dislikes it and drops any like
    pub fn toggle_dislike(&mut self, tag: Tag) {
        Self::toggle_into(&mut self.disliked, &mut self.liked, tag);
    }

    pub fn toggle(&mut self, tag: Tag, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Like => self.toggle_like(tag),
            Sentiment::Dislike => self.toggle_dislike(tag),
        }
    }

    /// Value-style variant of [`toggle`](Self::toggle)
    pub fn toggled(&self, tag: Tag, sentiment: Sentiment) -> Self {
        let mut next = self.clone();
        next.toggle(tag, sentiment);
        next
    }

    fn toggle_into(target: &mut Vec<Tag>, opposite: &mut Vec<Tag>, tag: Tag) {
        if let Some(pos) = target.iter().position(|t| *t == tag) {
            target.remove(pos);
        } else {
            opposite.retain(|t| *t != tag);
            target.push(tag);
        }
        debug_assert!(!target.iter().any(|t| opposite.contains(t)));
    }

    /// Snapshot in the shape the directory service stores
    pub fn to_interests(&self) -> Interests {
        Interests {
            likes: self.liked.clone(),
            dislikes: self.disliked.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_disjoint(set: &TagPreferenceSet) -> bool {
        !set.liked().iter().any(|t| set.disliked().contains(t))
    }

    #[test]
    fn test_like_then_dislike_moves_tag() {
        let mut prefs = TagPreferenceSet::new();
        prefs.toggle_like("Outdoor".into());
        prefs.toggle_dislike("Outdoor".into());

        assert!(prefs.liked().is_empty());
        assert_eq!(prefs.disliked(), &[Tag::from("Outdoor")]);
        assert_eq!(prefs.size(), 1);
    }

    #[test]
    fn test_double_like_restores_membership() {
        let mut prefs = TagPreferenceSet::new();
        prefs.toggle_like("Social".into());
        let before = prefs.clone();

        prefs.toggle_like("Indoor".into());
        prefs.toggle_like("Indoor".into());

        assert_eq!(prefs, before);
    }

    #[test]
    fn test_mutual_exclusion_over_mixed_sequence() {
        let tags = ["Outdoor", "Indoor", "Social", "Creative"];
        let mut prefs = TagPreferenceSet::new();

        for step in 0..64usize {
            let tag = Tag::from(tags[(step * 7 + step / 3) % tags.len()]);
            let sentiment = Sentiment::from(step % 3 != 0);
            prefs.toggle(tag, sentiment);
            assert!(is_disjoint(&prefs), "overlap after step {}", step);
        }
    }

    #[test]
    fn test_selection_order_preserved() {
        let mut prefs = TagPreferenceSet::new();
        prefs.toggle_like("Outdoor".into());
        prefs.toggle_dislike("Indoor".into());
        prefs.toggle_like("Social".into());

        assert_eq!(prefs.liked(), &[Tag::from("Outdoor"), Tag::from("Social")]);
        assert_eq!(prefs.disliked(), &[Tag::from("Indoor")]);
        assert_eq!(prefs.sentiment_of("Indoor"), Some(Sentiment::Dislike));
        assert_eq!(prefs.sentiment_of("Fitness"), None);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let mut prefs = TagPreferenceSet::new();
        prefs.toggle_like("outdoor".into());
        prefs.toggle_dislike("Outdoor".into());
        assert_eq!(prefs.size(), 2);
    }

    #[test]
    fn test_toggled_leaves_original_untouched() {
        let prefs = TagPreferenceSet::new();
        let next = prefs.toggled("Fitness".into(), Sentiment::Like);
        assert!(prefs.is_empty());
        assert_eq!(next.size(), 1);
    }
}
