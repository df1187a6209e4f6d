use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a whole run before (or instead of) producing results.
#[derive(Error, Debug)]
pub enum SearchError {
    // Config
    #[error("no feed source provided")]
    NoFeedSource,

    #[error("invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    // Feed list
    #[error("failed to retrieve feeds")]
    Feeds(#[from] FeedsError),

    // Runtime
    #[error("failed to spawn search thread")]
    Spawn(#[source] std::io::Error),
}

/// Errors raised while loading the feed list.
#[derive(Error, Debug)]
pub enum FeedsError {
    #[error("could not read feed list {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse feed list {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // Third-party extensibility
    #[error("feed source error: {0}")]
    Source(String),
}

/// Startup misconfiguration of the [`Registry`](crate::Registry).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("matcher for feed type '{feed_type}' is already registered")]
    Duplicate { feed_type: String },
}

/// Failure of one matcher invocation against one feed.
///
/// The worker that receives this logs it and drops the feed's results; it
/// never reaches the caller of [`SearchBuilder::run`](crate::SearchBuilder::run).
#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("no feed location provided for '{0}'")]
    MissingUri(String),

    #[error("request failed")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed feed document: {0}")]
    Decode(String),

    #[error("invalid search pattern")]
    InvalidPattern(#[from] regex::Error),

    #[error("search cancelled")]
    Cancelled,

    // Third-party extensibility
    #[error("{0}")]
    Other(String),
}

impl MatcherError {
    /// Whether the feed might succeed if searched again later.
    ///
    /// Transport failures and server-side statuses are transient; a blank
    /// location or a bad pattern will fail identically every time.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Cancelled => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}
