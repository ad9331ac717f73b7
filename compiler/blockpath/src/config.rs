use bp_canon::CanonLimits;
use bp_stack::{MAX_CHAIN_LENGTH, MAX_NESTING_DEPTH};

/// Engine settings, fixed for the lifetime of an [`Engine`](crate::Engine).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest nesting the canonicalizer and parser descend into.
    pub max_depth: u32,
    /// Longest block chain the canonicalizer follows at one level.
    pub max_chain_length: usize,
    /// Report an empty program as "not ready" instead of matching it.
    ///
    /// Set this when the workspace is attached lazily and an empty snapshot
    /// usually means "not loaded yet" rather than "learner has not started".
    pub treat_empty_as_not_ready: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: MAX_NESTING_DEPTH,
            max_chain_length: MAX_CHAIN_LENGTH,
            treat_empty_as_not_ready: false,
        }
    }
}

impl EngineConfig {
    pub(crate) fn canon_limits(&self) -> CanonLimits {
        CanonLimits {
            max_depth: self.max_depth,
            max_chain_length: self.max_chain_length,
        }
    }
}
