//! Reflection configuration
//!
//! This module provides the options that change how a
//! [`crate::reflection::ReflectionContext`] resolves methods and projects objects.

/// Configuration for member projection and generic method resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionConfig {
    /// Memoize the public member list per type (recommended: always true)
    /// When disabled, every projection recomputes the member list
    pub cache_members: bool,

    /// Reject generic method lookups that match more than one method
    /// When disabled, the first declared candidate wins and a warning is logged
    pub strict_method_resolution: bool,

    /// Text used for absent (`None`) member values in string projections (default: empty)
    pub null_text: String,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            cache_members: true,
            strict_method_resolution: false,
            null_text: String::new(),
        }
    }
}

impl ReflectionConfig {
    /// Creates a configuration that fails on ambiguous generic method lookups
    ///
    /// Member caching stays enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_method_resolution: true,
            ..Self::default()
        }
    }

    /// Creates a configuration that recomputes member lists on every projection
    ///
    /// Only useful when descriptions are re-registered at run time.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_members: false,
            ..Self::default()
        }
    }

    /// Replace the text rendered for absent values
    #[must_use]
    pub fn with_null_text(mut self, text: impl Into<String>) -> Self {
        self.null_text = text.into();
        self
    }
}
