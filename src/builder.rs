use std::time::Duration;

use crate::cancel::CancelToken;
use crate::engine::{run, EngineOptions, PoolConfig};
use crate::error::SearchError;
use crate::registry::Registry;
use crate::results::Results;
use crate::traits::{FeedSource, Presenter};

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a feed search.
///
/// Created via [`feedsearch::search()`](crate::search). Configure with chained
/// builder methods, then call [`run()`](SearchBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let results = feedsearch::search()
///     .feeds(JsonFeedFile::new("data/data.json"))
///     .registry(registry)
///     .presenter(WriterPresenter::stdout())
///     .workers(8)
///     .timeout(Duration::from_secs(30))
///     .run("president")?;
/// ```
pub struct SearchBuilder {
    feeds:           Option<Box<dyn FeedSource>>,
    registry:        Option<Registry>,
    presenter:       Option<Box<dyn Presenter>>,
    workers:         usize,
    buffer:          usize,
    timeout:         Option<Duration>,
    cancel:          CancelToken,
    collect_results: bool,
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self {
            feeds:           None,
            registry:        None,
            presenter:       None,
            workers:         num_cpus(),
            buffer:          0,
            timeout:         None,
            cancel:          CancelToken::new(),
            collect_results: false,
        }
    }
}

impl SearchBuilder {
    // ── Inputs ────────────────────────────────────────────────────────────

    /// Set where the feed list comes from.
    ///
    /// Any type implementing [`FeedSource`] is accepted — a JSON file, an
    /// in-memory `Vec<Feed>`, a database query, etc.
    pub fn feeds(mut self, source: impl FeedSource + 'static) -> Self {
        self.feeds = Some(Box::new(source));
        self
    }

    /// Set the matcher registry.
    ///
    /// Defaults to [`Registry::new()`], which only knows the no-op fallback.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the consumer of the results stream.
    ///
    /// Without one, results are still drained and counted in
    /// [`Results::emitted`].
    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Maximum number of feeds searched at once.
    ///
    /// Defaults to the number of logical CPU cores. Feeds beyond the limit
    /// wait in a queue; the set of results is the same for any limit.
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    /// Number of results the stream holds before workers block.
    ///
    /// `0` (the default) hands each result directly to the presenter.
    pub fn buffer(mut self, n: usize) -> Self {
        self.buffer = n;
        self
    }

    /// Give up on feeds that have not finished `timeout` after the run starts.
    ///
    /// Feeds not yet started are skipped. Matchers that poll their
    /// [`CancelToken`] stop early. A feed whose results have started to flow
    /// is still delivered in full.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use `token` to cancel the run from another thread.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Keep every result in [`Results::results`].
    ///
    /// Disabled by default to avoid holding results the presenter already consumed.
    pub fn collect_results(mut self, yes: bool) -> Self {
        self.collect_results = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Search every feed for `term` and block until the presenter has
    /// consumed the closed stream.
    ///
    /// # Errors
    ///
    /// Returns `Err` for fatal conditions only: no feed source, a zero
    /// worker count, a failed feed retrieval, or no thread could be
    /// started. A feed whose matcher fails is logged and skipped; it shows
    /// up in [`RunStats::failed`](crate::RunStats::failed), never as `Err`.
    pub fn run(self, term: &str) -> Result<Results, SearchError> {
        let feeds = self.feeds.ok_or(SearchError::NoFeedSource)?;

        if self.workers == 0 {
            return Err(SearchError::InvalidWorkerCount(0));
        }

        let cancel = match self.timeout {
            Some(t) => self.cancel.child_with_timeout(t),
            None    => self.cancel,
        };

        let opts = EngineOptions {
            config: PoolConfig {
                workers: self.workers,
                buffer:  self.buffer,
            },
            feeds,
            registry:        self.registry.unwrap_or_default(),
            presenter:       self.presenter,
            cancel,
            collect_results: self.collect_results,
        };

        run(term, opts)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
