use crate::cancel::CancelToken;
use crate::error::{FeedsError, MatcherError};
use crate::feed::{Feed, SearchResult};
use crate::stream::ResultStream;

/// Produces the list of feeds to search.
///
/// Called exactly once per run, before any worker starts. An `Err` aborts
/// the run: without a feed list there is nothing meaningful to search.
///
/// # Example
///
/// ```rust
/// use feedsearch::{Feed, FeedSource, FeedsError};
///
/// struct Fixed;
///
/// impl FeedSource for Fixed {
///     fn feeds(&self) -> Result<Vec<Feed>, FeedsError> {
///         Ok(vec![Feed::new("npr", "http://www.npr.org/rss/rss.php?id=1001", "rss")])
///     }
/// }
/// ```
pub trait FeedSource: Send + Sync {
    /// Return the feeds in the order they should be dispatched.
    fn feeds(&self) -> Result<Vec<Feed>, FeedsError>;
}

impl FeedSource for Vec<Feed> {
    fn feeds(&self) -> Result<Vec<Feed>, FeedsError> {
        Ok(self.clone())
    }
}

/// A search strategy for one feed type.
///
/// Implementations treat `term` as a pattern to look for in whatever textual
/// fields the feed format exposes. They may block on I/O.
///
/// # Thread Safety
///
/// `Send + Sync` are required — a single matcher is shared by every worker
/// searching a feed of its type, and those workers run concurrently.
///
/// # Cancellation
///
/// Long-running matchers should poll [`CancelToken::is_cancelled`] between
/// steps and return [`MatcherError::Cancelled`]. The engine cannot interrupt
/// a matcher that never returns and never polls; such a call holds back
/// stream closure for as long as it runs.
///
/// # Example
///
/// ```rust
/// use feedsearch::{CancelToken, Feed, Matcher, MatcherError, SearchResult};
///
/// struct NameMatcher;
///
/// impl Matcher for NameMatcher {
///     fn search(
///         &self,
///         feed: &Feed,
///         term: &str,
///         _cancel: &CancelToken,
///     ) -> Result<Vec<SearchResult>, MatcherError> {
///         if feed.name.contains(term) {
///             Ok(vec![SearchResult::new("Name", feed.name.clone())])
///         } else {
///             Ok(Vec::new())
///         }
///     }
/// }
/// ```
pub trait Matcher: Send + Sync {
    /// Search `feed` for `term`.
    ///
    /// An `Err` means this one feed could not be searched. It is logged and
    /// the feed contributes no results; other feeds are unaffected.
    fn search(
        &self,
        feed: &Feed,
        term: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<SearchResult>, MatcherError>;
}

/// Consumes the results stream of a run.
///
/// Runs on the thread that called [`SearchBuilder::run`](crate::SearchBuilder::run),
/// concurrently with the workers. Iterating the stream blocks until the next
/// result arrives and ends once every worker has finished.
pub trait Presenter {
    fn present(&mut self, results: &mut ResultStream);
}

impl<F> Presenter for F
where
    F: FnMut(&mut ResultStream),
{
    fn present(&mut self, results: &mut ResultStream) {
        self(results)
    }
}
