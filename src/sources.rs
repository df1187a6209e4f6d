use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FeedsError;
use crate::feed::Feed;
use crate::traits::FeedSource;

/// Reads the feed list from a JSON file.
///
/// The file holds an array of objects:
///
/// ```json
/// [
///   { "site": "npr", "link": "http://www.npr.org/rss/rss.php?id=1001", "type": "rss" }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFeedFile {
    path: PathBuf,
}

impl JsonFeedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for JsonFeedFile {
    fn feeds(&self) -> Result<Vec<Feed>, FeedsError> {
        let text = fs::read_to_string(&self.path).map_err(|source| FeedsError::Io {
            path: self.path.clone(),
            source,
        })?;
        let feeds: Vec<Feed> = serde_json::from_str(&text).map_err(|source| FeedsError::Json {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), feeds = feeds.len(), "loaded feed list");
        Ok(feeds)
    }
}
