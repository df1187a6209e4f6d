use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::barrier::{CompletionBarrier, CompletionGuard};
use crate::cancel::CancelToken;
use crate::error::SearchError;
use crate::feed::Feed;
use crate::registry::Registry;
use crate::results::{Results, RunStats};
use crate::stream::{self, ResultSender};
use crate::traits::{FeedSource, Matcher, Presenter};
use crate::worker::{self, Outcome};

// ---------------------------------------------------------------------------
// PoolConfig
// ---------------------------------------------------------------------------

/// Concurrency parameters passed from the builder to the engine.
///
/// `pub(crate)` — not part of the public API. Callers configure these
/// via the builder methods (`.workers()`, `.buffer()`, `.timeout()`).
pub(crate) struct PoolConfig {
    pub workers: usize,
    pub buffer:  usize,
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to `run()`.
pub(crate) struct EngineOptions {
    pub config:          PoolConfig,
    pub feeds:           Box<dyn FeedSource>,
    pub registry:        Registry,
    pub presenter:       Option<Box<dyn Presenter>>,
    pub cancel:          CancelToken,
    pub collect_results: bool,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One feed waiting for a pool thread.
///
/// Field order matters: the sender handle drops before the completion
/// guard, so by the time the barrier releases no job holds a sender.
struct Job {
    matcher: Arc<dyn Matcher>,
    feed:    Feed,
    results: ResultSender,
    _done:   CompletionGuard,
}

#[derive(Default)]
struct Tally {
    succeeded: AtomicUsize,
    failed:    AtomicUsize,
    cancelled: AtomicUsize,
}

impl Tally {
    fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Forwarded(_) => &self.succeeded,
            Outcome::Failed       => &self.failed,
            Outcome::Cancelled    => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Search every feed for `term`, present the results, and report.
///
/// This is the core engine — all concurrency lives here.
/// Called by `SearchBuilder::run()` after validating inputs.
///
/// Sequence: retrieve feeds, queue one job per feed behind a barrier
/// counted at the feed count, start the supervisor and the worker pool,
/// then let the presenter drain the stream on the calling thread. The
/// supervisor holds the last sender and drops it once the barrier releases,
/// which is what ends the presenter's iteration.
pub(crate) fn run(term: &str, opts: EngineOptions) -> Result<Results, SearchError> {
    let feeds = opts.feeds.feeds().map_err(|e| {
        tracing::error!(error = %e, "could not retrieve feeds");
        SearchError::Feeds(e)
    })?;

    let start = Instant::now();
    let feed_count = feeds.len();
    tracing::info!(term, feeds = feed_count, "starting search");

    let (sender, mut results) = stream::channel(opts.config.buffer, opts.collect_results);
    let barrier = CompletionBarrier::new(feed_count);

    // Dispatching
    let queue: VecDeque<Job> = feeds
        .into_iter()
        .map(|feed| {
            let matcher = opts.registry.lookup(&feed.feed_type);
            tracing::debug!(feed = %feed.name, feed_type = %feed.feed_type, "queued feed");
            Job {
                matcher,
                feed,
                results: sender.clone(),
                _done:   barrier.guard(),
            }
        })
        .collect();
    let queue = Arc::new(Mutex::new(queue));

    // AwaitingCompletion -> Closed
    let supervisor = {
        let barrier = Arc::clone(&barrier);
        thread::Builder::new()
            .name("feedsearch-supervisor".into())
            .spawn(move || {
                barrier.wait();
                drop(sender);
                tracing::debug!("all feeds finished, results stream closed");
            })
            .map_err(SearchError::Spawn)?
    };

    let tally = Arc::new(Tally::default());
    let term: Arc<str> = Arc::from(term);
    let pool_size = opts.config.workers.min(feed_count);
    let mut pool: Vec<JoinHandle<()>> = Vec::with_capacity(pool_size);

    for i in 0..pool_size {
        let jobs   = Arc::clone(&queue);
        let tally  = Arc::clone(&tally);
        let term   = Arc::clone(&term);
        let cancel = opts.cancel.clone();

        let spawned = thread::Builder::new()
            .name(format!("feedsearch-worker-{i}"))
            .spawn(move || {
                while let Some(job) = next_job(&jobs) {
                    let outcome = worker::match_feed(
                        job.matcher.as_ref(),
                        &job.feed,
                        &term,
                        &job.results,
                        &cancel,
                    );
                    tally.record(outcome);
                    drop(job);
                }
            });

        match spawned {
            Ok(handle) => pool.push(handle),
            Err(e) if pool.is_empty() => {
                // Nothing is running yet. Dropping the queued jobs releases
                // the barrier so the supervisor can exit.
                drop(queue);
                return Err(SearchError::Spawn(e));
            }
            Err(e) => {
                tracing::warn!(error = %e, workers = pool.len(), "continuing with a smaller pool");
                break;
            }
        }
    }
    drop(queue);

    // Presenting
    if let Some(mut presenter) = opts.presenter {
        presenter.present(&mut results);
    }
    // A presenter may stop early; workers must still be able to send.
    results.drain();

    for handle in pool {
        if handle.join().is_err() {
            tracing::error!("worker thread panicked outside a matcher");
        }
    }
    if supervisor.join().is_err() {
        tracing::error!("supervisor thread panicked");
    }

    let stats = RunStats {
        feeds:     feed_count,
        succeeded: tally.succeeded.load(Ordering::Relaxed),
        failed:    tally.failed.load(Ordering::Relaxed),
        cancelled: tally.cancelled.load(Ordering::Relaxed),
        duration:  start.elapsed(),
    };
    let emitted = results.received();

    tracing::info!(
        emitted,
        succeeded = stats.succeeded,
        failed = stats.failed,
        cancelled = stats.cancelled,
        elapsed_ms = stats.duration.as_millis() as u64,
        "search finished"
    );

    Ok(Results {
        emitted,
        results: results.take_collected(),
        stats,
    })
}

fn next_job(queue: &Mutex<VecDeque<Job>>) -> Option<Job> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}
