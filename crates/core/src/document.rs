//! Document record
//!
//! A `Document` is created exactly once by the store and never mutated.
//! Its fields are private; the only way to obtain one with a fresh
//! identifier is through the store's write path, and no setters exist.

use crate::error::{Error, Result};
use crate::format::FormatTag;
use crate::limits::Limits;
use crate::types::{DocumentId, SourceRef, TagSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a caller supplies to create a document
///
/// The store adds the identifier and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDraft {
    /// Display title (may be empty)
    pub title: String,
    /// Searchable text (may be empty)
    pub content: String,
    /// User tags
    pub tags: TagSet,
    /// Format of the attached original, or `None`
    pub format: FormatTag,
    /// Stored original, present iff `format != None`
    pub source_ref: Option<SourceRef>,
}

impl DocumentDraft {
    /// Draft for a document without an attached file
    pub fn text_only(title: impl Into<String>, content: impl Into<String>, tags: TagSet) -> Self {
        DocumentDraft {
            title: title.into(),
            content: content.into(),
            tags,
            format: FormatTag::None,
            source_ref: None,
        }
    }

    /// Check the draft against limits and the format/source invariant
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        if self.format.has_source() != self.source_ref.is_some() {
            return Err(Error::invalid_input(format!(
                "format '{}' requires source_ref to be {}",
                self.format,
                if self.format.has_source() { "present" } else { "absent" }
            )));
        }
        limits
            .validate_title(&self.title)
            .and_then(|_| limits.validate_content(&self.content))
            .and_then(|_| limits.validate_tags(&self.tags))
            .map_err(|e| Error::invalid_input(e.to_string()))
    }
}

/// The unit of storage and search
///
/// Persisted with the field names `id`, `title`, `content`, `tags`,
/// `format`, `sourceRef`, `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    title: String,
    content: String,
    tags: TagSet,
    format: FormatTag,
    source_ref: Option<SourceRef>,
    created_at: DateTime<Utc>,
}

impl Document {
    /// Seal a draft into a document
    ///
    /// Called by the store's write path, which owns identifier and
    /// timestamp assignment.
    pub fn from_draft(id: DocumentId, created_at: DateTime<Utc>, draft: DocumentDraft) -> Self {
        Document {
            id,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            format: draft.format,
            source_ref: draft.source_ref,
            created_at,
        }
    }

    /// Unique identifier
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Extracted or user-supplied text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Tags, duplicates collapsed
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Format of the attached original
    pub fn format(&self) -> FormatTag {
        self.format
    }

    /// Stored original, if a file was attached
    pub fn source_ref(&self) -> Option<&SourceRef> {
        self.source_ref.as_ref()
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// First `max_chars` characters of the content
    ///
    /// Cuts on a char boundary; content shorter than the limit is returned whole.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((end, _)) => &self.content[..end],
            None => &self.content,
        }
    }
}
