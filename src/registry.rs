use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::matchers::DefaultMatcher;
use crate::traits::Matcher;

/// Feed type reserved for the fallback matcher.
pub const DEFAULT_FEED_TYPE: &str = "default";

/// Maps feed types to the [`Matcher`] that searches them.
///
/// Built once at startup and handed to the engine by value; the engine only
/// reads it afterwards, so lookups during a search take no lock.
///
/// A fallback matcher is always present under [`DEFAULT_FEED_TYPE`].
/// [`Registry::new`] installs the no-op [`DefaultMatcher`] there.
pub struct Registry {
    matchers: HashMap<String, Arc<dyn Matcher>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry whose only entry is the no-op fallback.
    pub fn new() -> Self {
        Self::with_fallback(DefaultMatcher)
    }

    /// A registry that falls back to `matcher` for unknown feed types.
    pub fn with_fallback(matcher: impl Matcher + 'static) -> Self {
        let mut matchers: HashMap<String, Arc<dyn Matcher>> = HashMap::new();
        matchers.insert(DEFAULT_FEED_TYPE.to_string(), Arc::new(matcher));
        Self { matchers }
    }

    /// Register `matcher` for `feed_type`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] if `feed_type` already has a matcher
    /// (including the reserved `"default"` key). The existing entry is left
    /// untouched. A duplicate is a startup configuration defect; callers are
    /// expected to abort rather than carry on.
    pub fn register(
        &mut self,
        feed_type: impl Into<String>,
        matcher: impl Matcher + 'static,
    ) -> Result<(), RegistryError> {
        self.register_arc(feed_type, Arc::new(matcher))
    }

    /// Like [`register`](Registry::register), for a matcher that is already shared.
    pub fn register_arc(
        &mut self,
        feed_type: impl Into<String>,
        matcher: Arc<dyn Matcher>,
    ) -> Result<(), RegistryError> {
        let feed_type = feed_type.into();
        if self.matchers.contains_key(&feed_type) {
            return Err(RegistryError::Duplicate { feed_type });
        }
        tracing::info!(feed_type = %feed_type, "registered matcher");
        self.matchers.insert(feed_type, matcher);
        Ok(())
    }

    /// The matcher for `feed_type`, or the fallback if none is registered.
    pub fn lookup(&self, feed_type: &str) -> Arc<dyn Matcher> {
        match self.matchers.get(feed_type) {
            Some(m) => Arc::clone(m),
            None    => Arc::clone(&self.matchers[DEFAULT_FEED_TYPE]),
        }
    }

    pub fn contains(&self, feed_type: &str) -> bool {
        self.matchers.contains_key(feed_type)
    }

    /// Number of registered feed types, the fallback included.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Registered feed types in sorted order.
    pub fn feed_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.matchers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_holds_only_the_fallback() {
        let registry = Registry::new();
        assert_eq!(registry.feed_types(), vec![DEFAULT_FEED_TYPE]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn reserved_key_cannot_be_registered_again() {
        let mut registry = Registry::new();
        let err = registry.register(DEFAULT_FEED_TYPE, DefaultMatcher).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                feed_type: DEFAULT_FEED_TYPE.to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }
}
