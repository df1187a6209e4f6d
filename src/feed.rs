use serde::{Deserialize, Serialize};

use crate::error::MatcherError;

/// One searchable source and the feed type that selects its matcher.
///
/// Feeds come from a [`FeedSource`](crate::traits::FeedSource) and are never
/// mutated once a search starts. The JSON field names follow the feed list
/// format (`site`, `link`, `type`); `name` and `uri` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Human-readable name of the feed.
    #[serde(rename = "site", alias = "name")]
    pub name: String,

    /// Location of the feed document.
    #[serde(rename = "link", alias = "uri")]
    pub uri: String,

    /// Feed type, used as the key into the [`Registry`](crate::Registry).
    #[serde(rename = "type")]
    pub feed_type: String,
}

impl Feed {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        feed_type: impl Into<String>,
    ) -> Self {
        Self {
            name:      name.into(),
            uri:       uri.into(),
            feed_type: feed_type.into(),
        }
    }

    /// Check that the feed carries a usable location.
    ///
    /// Empty and whitespace-only URIs are both rejected.
    pub fn validate(&self) -> Result<(), MatcherError> {
        if self.uri.trim().is_empty() {
            return Err(MatcherError::MissingUri(self.name.clone()));
        }
        Ok(())
    }
}

/// One matched fragment produced by a [`Matcher`](crate::traits::Matcher).
///
/// `field` names where the match was found (e.g. `"Title"`), `content` holds
/// the matched text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub field:   String,
    pub content: String,
}

impl SearchResult {
    pub fn new(field: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            field:   field.into(),
            content: content.into(),
        }
    }
}
