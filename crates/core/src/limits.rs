//! Size limits for document fields
//!
//! These limits are enforced before a draft reaches the store, so an
//! oversized request fails as `InvalidInput` instead of growing the log.

use crate::types::TagSet;
use thiserror::Error;

/// Size limits for document fields
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum title length in bytes (default: 1KB)
    pub max_title_bytes: usize,

    /// Maximum content length in bytes (default: 64MB)
    pub max_content_bytes: usize,

    /// Maximum number of distinct tags (default: 256)
    pub max_tags: usize,

    /// Maximum length of a single tag in bytes (default: 256)
    pub max_tag_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_title_bytes: 1024,
            max_content_bytes: 64 * 1024 * 1024, // 64MB
            max_tags: 256,
            max_tag_bytes: 256,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_title_bytes: 32,
            max_content_bytes: 1024,
            max_tags: 4,
            max_tag_bytes: 16,
        }
    }

    /// Validate a title
    pub fn validate_title(&self, title: &str) -> Result<(), LimitError> {
        if title.len() > self.max_title_bytes {
            return Err(LimitError::TitleTooLong {
                actual: title.len(),
                max: self.max_title_bytes,
            });
        }
        Ok(())
    }

    /// Validate content
    pub fn validate_content(&self, content: &str) -> Result<(), LimitError> {
        if content.len() > self.max_content_bytes {
            return Err(LimitError::ContentTooLarge {
                actual: content.len(),
                max: self.max_content_bytes,
            });
        }
        Ok(())
    }

    /// Cut `title` to at most `max_title_bytes`, on a char boundary
    pub fn clamp_title(&self, title: String) -> String {
        truncate_to(title, self.max_title_bytes)
    }

    /// Cut `content` to at most `max_content_bytes`, on a char boundary
    pub fn clamp_content(&self, content: String) -> String {
        truncate_to(content, self.max_content_bytes)
    }

    /// Validate a tag set
    pub fn validate_tags(&self, tags: &TagSet) -> Result<(), LimitError> {
        if tags.len() > self.max_tags {
            return Err(LimitError::TooManyTags {
                actual: tags.len(),
                max: self.max_tags,
            });
        }
        if let Some(tag) = tags.iter().find(|t| t.len() > self.max_tag_bytes) {
            return Err(LimitError::TagTooLong {
                actual: tag.len(),
                max: self.max_tag_bytes,
            });
        }
        Ok(())
    }
}

fn truncate_to(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// Limit violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// Title exceeds maximum length
    #[error("title too long: {actual} bytes exceeds maximum {max}")]
    TitleTooLong {
        /// Actual length
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Content exceeds maximum size
    #[error("content too large: {actual} bytes exceeds maximum {max}")]
    ContentTooLarge {
        /// Actual size
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Too many tags
    #[error("too many tags: {actual} exceeds maximum {max}")]
    TooManyTags {
        /// Actual count
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// A tag exceeds maximum length
    #[error("tag too long: {actual} bytes exceeds maximum {max}")]
    TagTooLong {
        /// Actual length
        actual: usize,
        /// Maximum allowed
        max: usize,
    },
}
