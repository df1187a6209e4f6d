use std::time::Duration;

use crate::feed::SearchResult;

/// The output of a completed run.
///
/// `results` is opt-in — disabled by default, since the presenter normally
/// consumes them. Enable with `.collect_results(true)` on the builder.
#[derive(Debug)]
pub struct Results {
    /// Total number of results that passed through the stream.
    pub emitted: usize,

    /// Every result in the order the stream delivered it.
    /// Only populated if `.collect_results(true)` was set on the builder.
    pub results: Vec<SearchResult>,

    /// Per-feed outcome counts and timing.
    pub stats: RunStats,
}

/// Outcome counts for a completed run.
///
/// `succeeded + failed + cancelled == feeds` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Feeds returned by the feed source.
    pub feeds: usize,

    /// Feeds whose matcher returned and whose results were all forwarded.
    pub succeeded: usize,

    /// Feeds whose matcher returned an error or panicked.
    pub failed: usize,

    /// Feeds dropped by cancellation or the deadline before any result was sent.
    pub cancelled: usize,

    /// Wall-clock time from the end of feed retrieval until the presenter
    /// has drained the closed stream and every thread has been joined.
    pub duration: Duration,
}

impl RunStats {
    /// Whether every feed was searched to completion.
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.feeds
    }
}
