//! Identifier and value types
//!
//! This module defines:
//! - DocumentId: Unique identifier assigned by the store at creation
//! - SourceRef: Opaque reference to a stored original upload
//! - TagSet: Set of user-supplied tags with duplicates collapsed

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a document
///
/// A wrapper around a UUID v4. Ordering is byte-wise, which gives search
/// results a stable final tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new random DocumentId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a DocumentId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a DocumentId from its string form
    ///
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    /// Get the raw bytes of this DocumentId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Reference to a stored original upload
///
/// The reference is a single path component (no separators, no `..`),
/// generated by the blob store to be unique per upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    /// Wrap a stored name, rejecting anything that could escape the upload directory
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        valid.then_some(Self(name))
    }

    /// The stored name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of tags attached to a document
///
/// Serialized as an ordered list; duplicates collapse on construction and
/// on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a comma-separated tag string
    ///
    /// Each piece is trimmed; empty pieces are dropped.
    ///
    /// ```
    /// use docshelf_core::TagSet;
    ///
    /// let tags = TagSet::parse("finance, q3,,finance");
    /// assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["finance", "q3"]);
    /// ```
    pub fn parse(csv: &str) -> Self {
        csv.split(',').collect()
    }

    /// Insert a tag, trimming it; returns false for blanks and duplicates
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.0.insert(tag.to_string())
    }

    /// Whether the set contains a tag
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over tags in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}
