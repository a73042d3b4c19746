//! Filter builder configuration.

/// What a filter builder does when it is handed no filter keys at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyFilterPolicy {
    /// Return an empty clause so the caller drops the `WHERE` entirely.
    #[default]
    Omit,
    /// Fail with [`SqlError::EmptyFilterSet`](crate::SqlError::EmptyFilterSet).
    Reject,
}

/// Configuration for the filter builders.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Handling of an empty filter set.
    pub empty_filter: EmptyFilterPolicy,
}

impl FilterConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the empty filter policy.
    pub fn empty_filter(mut self, policy: EmptyFilterPolicy) -> Self {
        self.empty_filter = policy;
        self
    }

    /// Shorthand for `empty_filter(EmptyFilterPolicy::Reject)`.
    pub fn reject_empty(self) -> Self {
        self.empty_filter(EmptyFilterPolicy::Reject)
    }
}
