use std::sync::mpsc::{self, Receiver, SyncSender};

use crate::feed::SearchResult;

/// Create the shared results conduit.
///
/// `capacity` is the number of results that can be queued before a sending
/// worker blocks; `0` makes every send a rendezvous with the consumer.
pub(crate) fn channel(capacity: usize, collect: bool) -> (ResultSender, ResultStream) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    let stream = ResultStream {
        rx,
        received:  0,
        collected: collect.then(Vec::new),
    };
    (ResultSender { tx }, stream)
}

/// Producer half of the results stream.
///
/// The stream closes when the last `ResultSender` is dropped. The engine
/// keeps one handle on the supervisory thread and drops it only after every
/// worker has finished, so no other code path can close the stream.
#[derive(Clone)]
pub(crate) struct ResultSender {
    tx: SyncSender<SearchResult>,
}

impl ResultSender {
    /// Send one result, blocking while the consumer is not ready.
    ///
    /// Returns `false` if the consumer is gone.
    pub fn send(&self, result: SearchResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

/// Consumer half of the results stream.
///
/// Iterating yields results as workers produce them and ends once the
/// stream has been closed.
pub struct ResultStream {
    rx:        Receiver<SearchResult>,
    received:  usize,
    collected: Option<Vec<SearchResult>>,
}

impl ResultStream {
    /// Number of results taken from the stream so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Discard whatever is left until the stream closes.
    pub(crate) fn drain(&mut self) {
        for _ in self.by_ref() {}
    }

    pub(crate) fn take_collected(&mut self) -> Vec<SearchResult> {
        self.collected.take().unwrap_or_default()
    }
}

impl Iterator for ResultStream {
    type Item = SearchResult;

    fn next(&mut self) -> Option<SearchResult> {
        let result = self.rx.recv().ok()?;
        self.received += 1;
        if let Some(collected) = self.collected.as_mut() {
            collected.push(result.clone());
        }
        Some(result)
    }
}
