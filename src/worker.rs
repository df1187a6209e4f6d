use std::panic::{self, AssertUnwindSafe};

use crate::cancel::CancelToken;
use crate::error::MatcherError;
use crate::feed::Feed;
use crate::stream::ResultSender;
use crate::traits::Matcher;

/// How one feed's search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every result the matcher returned was forwarded.
    Forwarded(usize),
    /// The matcher failed or panicked; nothing was forwarded.
    Failed,
    /// Cancelled before the matcher ran or before its first result was sent.
    Cancelled,
}

/// Run `matcher` against `feed` and forward its results into the stream.
///
/// Results are sent one at a time, in the order the matcher returned them.
/// Cancellation is checked before the matcher runs and once more before the
/// first send; a feed is either forwarded completely or not at all.
/// A matcher error or panic is logged and the feed contributes nothing; it
/// is never propagated to the engine.
pub(crate) fn match_feed(
    matcher: &dyn Matcher,
    feed: &Feed,
    term: &str,
    results: &ResultSender,
    cancel: &CancelToken,
) -> Outcome {
    if cancel.is_cancelled() {
        tracing::debug!(feed = %feed.name, "skipping feed, search cancelled");
        return Outcome::Cancelled;
    }

    let found = panic::catch_unwind(AssertUnwindSafe(|| matcher.search(feed, term, cancel)));

    let found = match found {
        Ok(Ok(found)) => found,
        Ok(Err(MatcherError::Cancelled)) => {
            tracing::debug!(feed = %feed.name, "matcher observed cancellation");
            return Outcome::Cancelled;
        }
        Ok(Err(e)) => {
            tracing::warn!(
                feed = %feed.name,
                feed_type = %feed.feed_type,
                error = %e,
                transient = e.is_transient(),
                "feed search failed"
            );
            return Outcome::Failed;
        }
        Err(payload) => {
            tracing::error!(
                feed = %feed.name,
                feed_type = %feed.feed_type,
                panic = panic_message(payload.as_ref()),
                "matcher panicked"
            );
            return Outcome::Failed;
        }
    };

    // Once forwarding starts the feed is delivered whole.
    if cancel.is_cancelled() {
        tracing::debug!(feed = %feed.name, "dropping results, search cancelled");
        return Outcome::Cancelled;
    }

    let mut sent = 0;
    for result in found {
        if !results.send(result) {
            break;
        }
        sent += 1;
    }
    Outcome::Forwarded(sent)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
