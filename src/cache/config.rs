//! Configuration options for [`crate::MatchCache`].

/// Batch size above which `cancel_orders_for_user` splits its work across
/// scoped threads when `parallel_cancellation` is enabled.
pub(crate) const PARALLEL_CANCEL_CHUNK_THRESHOLD: usize = 256;

/// Tunable behavior for a [`crate::MatchCache`] instance.
///
/// Mirrors the four configuration axes named by the cache's specification:
/// whether matching runs eagerly or lazily, whether key-absence errors are
/// silent or surfaced, whether batch cancellation may fan out across
/// threads, and whether the match-event log is recorded at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    eager_match: bool,
    strict_validation: bool,
    parallel_cancellation: bool,
    enable_match_log: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            eager_match: true,
            strict_validation: false,
            parallel_cancellation: true,
            enable_match_log: false,
        }
    }
}

impl CacheConfig {
    /// Starts from the documented defaults: eager matching, lenient
    /// validation, parallel cancellation enabled, match log disabled.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_eager_match(mut self, eager: bool) -> Self {
        self.eager_match = eager;
        self
    }

    #[must_use]
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    #[must_use]
    pub fn with_parallel_cancellation(mut self, parallel: bool) -> Self {
        self.parallel_cancellation = parallel;
        self
    }

    #[must_use]
    pub fn with_match_log(mut self, enabled: bool) -> Self {
        self.enable_match_log = enabled;
        self
    }

    pub fn eager_match(&self) -> bool {
        self.eager_match
    }

    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }

    pub fn parallel_cancellation(&self) -> bool {
        self.parallel_cancellation
    }

    pub fn match_log_enabled(&self) -> bool {
        self.enable_match_log
    }
}
