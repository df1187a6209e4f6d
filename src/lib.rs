//! # feedsearch
//!
//! Concurrent feed search — one matcher per feed type, results fanned in
//! over a single stream.
//!
//! feedsearch owns the dispatch engine, the contracts ([`FeedSource`],
//! [`Matcher`], [`Presenter`]), the [`Registry`] that maps feed types to
//! matchers, and the builder API. A run retrieves the feed list once, searches
//! every feed on a bounded pool of threads, and streams results to the
//! presenter on the calling thread. The stream closes exactly once, after
//! every feed has finished.
//!
//! A feed whose matcher fails is logged and contributes nothing; the rest of
//! the run is unaffected.
//!
//! # Quick Start
//!
//! ```rust
//! use feedsearch::{CancelToken, Feed, Matcher, MatcherError, Registry, SearchResult};
//!
//! struct TitleMatcher;
//!
//! impl Matcher for TitleMatcher {
//!     fn search(
//!         &self,
//!         feed: &Feed,
//!         term: &str,
//!         _cancel: &CancelToken,
//!     ) -> Result<Vec<SearchResult>, MatcherError> {
//!         Ok(vec![SearchResult::new("Title", format!("{term} @ {}", feed.name))])
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register("title", TitleMatcher).unwrap();
//!
//! let results = feedsearch::search()
//!     .feeds(vec![
//!         Feed::new("a", "mem://a", "title"),
//!         Feed::new("b", "mem://b", "title"),
//!         Feed::new("c", "mem://c", "unknown"), // falls back to the no-op matcher
//!     ])
//!     .registry(registry)
//!     .collect_results(true)
//!     .run("president")
//!     .unwrap();
//!
//! assert_eq!(results.emitted, 2);
//! assert_eq!(results.stats.succeeded, 3);
//! ```
//!
//! # Cancellation
//!
//! There is no way to interrupt a matcher that blocks forever without
//! checking its [`CancelToken`]. Such a call keeps its feed unfinished, and
//! the stream stays open until it returns. Bundled matchers bound their own
//! network I/O with a request timeout.

#![forbid(unsafe_code)]

pub mod matchers;

mod barrier;
mod builder;
mod cancel;
mod display;
mod engine;
mod error;
mod feed;
mod registry;
mod results;
mod sources;
mod stream;
mod traits;
mod worker;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::SearchBuilder;
pub use cancel::CancelToken;
pub use display::WriterPresenter;
pub use error::{FeedsError, MatcherError, RegistryError, SearchError};
pub use feed::{Feed, SearchResult};
pub use registry::{Registry, DEFAULT_FEED_TYPE};
pub use results::{Results, RunStats};
pub use sources::JsonFeedFile;
pub use stream::ResultStream;
pub use traits::{FeedSource, Matcher, Presenter};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure and run a search.
///
/// # Example
///
/// ```rust
/// let results = feedsearch::search()
///     .feeds(Vec::<feedsearch::Feed>::new())
///     .run("president")
///     .unwrap();
///
/// assert_eq!(results.emitted, 0);
/// assert_eq!(results.stats.feeds, 0);
/// ```
pub fn search() -> SearchBuilder {
    SearchBuilder::default()
}
