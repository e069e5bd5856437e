use serde::Serialize;
use std::collections::HashSet;

use super::Tag;

/// Vocabulary every onboarding session starts from
pub const SEED_TAGS: [&str; 14] = [
    "Outdoor",
    "Indoor",
    "Physical",
    "Creative",
    "Social",
    "Relaxing",
    "Educational",
    "Adventure",
    "Cultural",
    "Culinary",
    "Fitness",
    "Entertainment",
    "Spiritual",
    "Tech-related",
];

/// Selectable tags for one session, in first-seen order. Only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagCatalog {
    tags: Vec<Tag>,
    #[serde(skip)]
    index: HashSet<Tag>,
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::seed()
    }
}

impl TagCatalog {
    /// Catalog holding the fixed seed vocabulary
    pub fn seed() -> Self {
        Self::from_tags(SEED_TAGS.iter().map(|t| Tag::from(*t)))
    }

    /// Builds a catalog from arbitrary tags, dropping repeats
    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut catalog = Self {
            tags: Vec::new(),
            index: HashSet::new(),
        };
        catalog.merge_in_place(tags);
        catalog
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains(tag)
    }

    /// Returns a catalog with every unseen tag from `new_tags` appended
    pub fn merge(&self, new_tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut merged = self.clone();
        merged.merge_in_place(new_tags);
        merged
    }

    /// Appends unseen tags, returning how many were added
    pub fn merge_in_place(&mut self, new_tags: impl IntoIterator<Item = Tag>) -> usize {
        let before = self.tags.len();
        for tag in new_tags {
            if self.index.insert(tag.clone()) {
                self.tags.push(tag);
            }
        }
        self.tags.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(labels: &[&str]) -> Vec<Tag> {
        labels.iter().map(|l| Tag::from(*l)).collect()
    }

    fn membership(catalog: &TagCatalog) -> HashSet<Tag> {
        catalog.tags().iter().cloned().collect()
    }

    #[test]
    fn test_seed_has_fourteen_unique_tags() {
        let catalog = TagCatalog::seed();
        assert_eq!(catalog.len(), 14);
        assert_eq!(catalog.tags()[0], Tag::from("Outdoor"));
        assert!(catalog.contains("Tech-related"));
    }

    #[test]
    fn test_merge_appends_only_new_tags_in_order() {
        let catalog = TagCatalog::from_tags(tags(&["Outdoor", "Indoor"]));
        let merged = catalog.merge(tags(&["Hiking", "Indoor", "Yoga", "Hiking"]));

        assert_eq!(merged.tags(), tags(&["Outdoor", "Indoor", "Hiking", "Yoga"]).as_slice());
        // Original value is untouched
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_merge_subset_is_noop() {
        let catalog = TagCatalog::seed();
        assert_eq!(catalog.merge(tags(&["Social", "Fitness"])), catalog);
        assert_eq!(catalog.merge(Vec::new()), catalog);
    }

    #[test]
    fn test_sequential_merges_match_union() {
        let catalog = TagCatalog::seed();
        let a = tags(&["Hiking", "Social", "Board games"]);
        let b = tags(&["Board games", "Kayaking"]);

        let stepwise = catalog.merge(a.clone()).merge(b.clone());
        let union = catalog.merge(a.into_iter().chain(b));
        let reversed = catalog
            .merge(tags(&["Board games", "Kayaking"]))
            .merge(tags(&["Hiking", "Social", "Board games"]));

        assert_eq!(membership(&stepwise), membership(&union));
        assert_eq!(membership(&stepwise), membership(&reversed));
        assert_eq!(stepwise.len(), 17);
    }

    #[test]
    fn test_merge_in_place_reports_added_count() {
        let mut catalog = TagCatalog::seed();
        assert_eq!(catalog.merge_in_place(tags(&["Hiking", "Outdoor"])), 1);
        assert_eq!(catalog.merge_in_place(tags(&["Hiking"])), 0);
    }
}
