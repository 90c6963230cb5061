//! Message catalog
//!
//! Flat key-to-text map loaded from `locales/<lang>.json`. Unknown keys
//! resolve to the key itself so a missing translation is visible on screen
//! instead of rendering as an empty string.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Localized message catalog for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Build from a key/text map
    #[must_use]
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Text for a key, or the key itself when missing
    #[must_use]
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map_or(key, String::as_str)
    }

    /// Whether the catalog defines the key
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Label of the synthetic breadcrumb home entry
    #[must_use]
    pub fn breadcrumb_home(&self) -> &str {
        self.text("breadcrumb_home")
    }

    /// Title of the summary screen, also its breadcrumb label
    #[must_use]
    pub fn summary_title(&self) -> &str {
        self.text("summary_title")
    }

    /// Text prefixed to transport-level validation failures
    #[must_use]
    pub fn ai_connection_error(&self) -> &str {
        self.text("ai_connection_error")
    }

    /// Text for structurally unexpected AI responses
    #[must_use]
    pub fn ai_response_error(&self) -> &str {
        self.text("ai_response_error")
    }

    /// Text for unreadable uploaded files
    #[must_use]
    pub fn file_read_error(&self) -> &str {
        self.text("file_read_error")
    }

    /// Number of messages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
