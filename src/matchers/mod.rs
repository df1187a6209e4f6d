//! Bundled matching strategies.
//!
//! Each strategy module exposes `register`, which installs it in a
//! [`Registry`] under its feed type. [`register_all`] installs every one.

pub mod rss;

use crate::cancel::CancelToken;
use crate::error::{MatcherError, RegistryError};
use crate::feed::{Feed, SearchResult};
use crate::registry::Registry;
use crate::traits::Matcher;

pub use rss::RssMatcher;

/// Fallback for feed types with no registered matcher. Never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl Matcher for DefaultMatcher {
    fn search(
        &self,
        _feed: &Feed,
        _term: &str,
        _cancel: &CancelToken,
    ) -> Result<Vec<SearchResult>, MatcherError> {
        Ok(Vec::new())
    }
}

/// Register every bundled matcher.
///
/// # Errors
///
/// [`RegistryError::Duplicate`] if `registry` already holds one of the
/// bundled feed types.
pub fn register_all(registry: &mut Registry) -> Result<(), RegistryError> {
    rss::register(registry)?;
    Ok(())
}
