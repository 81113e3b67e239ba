//! Classification tags for nodes and edges.
//!
//! Tags drive visibility and highlighting. They are kept separate from the
//! element payload so that operations can add and remove them without
//! touching ontology data, and they round-trip through the wire format as a
//! space-separated `classes` string.

use serde::{Deserialize, Serialize};

/// A single classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Eligible for path/star/visibility operations. Assigned once at load
    /// time, never changed afterwards.
    Unfiltered,

    /// Permanently excluded by a content filter.
    Filtered,

    /// Not shown. Mutually exclusive with `Highlighted`.
    Hidden,

    /// Emphasized by a highlighting operation.
    Highlighted,

    /// Part of the output of a star/path operation.
    Starmode,

    /// The current path source marker.
    Source,
}

impl Tag {
    /// All tags, in wire order.
    pub const ALL: [Tag; 6] = [
        Tag::Unfiltered,
        Tag::Filtered,
        Tag::Hidden,
        Tag::Highlighted,
        Tag::Starmode,
        Tag::Source,
    ];

    /// The wire name of the tag, as used in a `classes` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Unfiltered => "unfiltered",
            Tag::Filtered => "filtered",
            Tag::Hidden => "hidden",
            Tag::Highlighted => "highlighted",
            Tag::Starmode => "starmode",
            Tag::Source => "source",
        }
    }

    /// Parses a wire name. Unknown names yield `None` so that documents with
    /// style-only classes still load.
    pub fn parse(s: &str) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    fn bit(self) -> u8 {
        match self {
            Tag::Unfiltered => 1 << 0,
            Tag::Filtered => 1 << 1,
            Tag::Hidden => 1 << 2,
            Tag::Highlighted => 1 << 3,
            Tag::Starmode => 1 << 4,
            Tag::Source => 1 << 5,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The tag set of one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSet(u8);

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag. Adding a present tag is a no-op.
    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    /// Removes a tag. Removing an absent tag is a no-op.
    pub fn remove(&mut self, tag: Tag) {
        self.0 &= !tag.bit();
    }

    /// Whether the tag is present.
    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Whether no tag is present.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the present tags in wire order.
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        Tag::ALL.iter().copied().filter(|t| self.contains(*t))
    }

    /// Parses a space-separated `classes` string. Unknown classes are
    /// silently dropped.
    pub fn from_classes(classes: &str) -> Self {
        let mut tags = TagSet::new();
        for name in classes.split_whitespace() {
            if let Some(tag) = Tag::parse(name) {
                tags.insert(tag);
            }
        }
        tags
    }

    /// Renders the set as a space-separated `classes` string.
    pub fn to_classes(&self) -> String {
        let names: Vec<&str> = self.iter().map(|t| t.as_str()).collect();
        names.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_contains() {
        let mut tags = TagSet::new();
        assert!(!tags.contains(Tag::Hidden));

        tags.insert(Tag::Hidden);
        tags.insert(Tag::Unfiltered);
        assert!(tags.contains(Tag::Hidden));
        assert!(tags.contains(Tag::Unfiltered));

        tags.remove(Tag::Hidden);
        assert!(!tags.contains(Tag::Hidden));
        assert!(tags.contains(Tag::Unfiltered));
    }

    #[test]
    fn test_classes_round_trip() {
        let mut tags = TagSet::new();
        tags.insert(Tag::Unfiltered);
        tags.insert(Tag::Starmode);

        let classes = tags.to_classes();
        assert_eq!(classes, "unfiltered starmode");
        assert_eq!(TagSet::from_classes(&classes), tags);
    }

    #[test]
    fn test_unknown_classes_ignored() {
        let tags = TagSet::from_classes("unfiltered fancy-style hidden");
        assert!(tags.contains(Tag::Unfiltered));
        assert!(tags.contains(Tag::Hidden));
        assert_eq!(tags.iter().count(), 2);
    }

    #[test]
    fn test_empty_classes() {
        assert!(TagSet::from_classes("").is_empty());
        assert_eq!(TagSet::new().to_classes(), "");
    }
}
