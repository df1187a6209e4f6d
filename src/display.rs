use std::io::{self, Write};

use crate::stream::ResultStream;
use crate::traits::Presenter;

/// Writes each result as `Field:\nContent\n\n`.
///
/// Write errors end presentation early; the engine drains the remainder so
/// the run still completes.
pub struct WriterPresenter<W: Write> {
    out: W,
}

impl WriterPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for WriterPresenter<W> {
    fn present(&mut self, results: &mut ResultStream) {
        for result in results {
            if let Err(e) = write!(self.out, "{}:\n{}\n\n", result.field, result.content) {
                tracing::warn!(error = %e, "could not write result, discarding the rest");
                return;
            }
        }
        if let Err(e) = self.out.flush() {
            tracing::warn!(error = %e, "could not flush results");
        }
    }
}
