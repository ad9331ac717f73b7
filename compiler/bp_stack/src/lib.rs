//! Nesting guard for recursive program walks.
//!
//! Every walk over a program tree (canonicalizing a block workspace, parsing
//! nested text constructs, comparing two sequences) descends through
//! [`Depth`]. A walk that would exceed [`MAX_NESTING_DEPTH`] is refused
//! instead of recursing, so a malformed or hostile input degrades to a
//! truncated result rather than a stack overflow.
//!
//! Recursive steps additionally run inside [`ensure_sufficient_stack`], which
//! grows the stack on native targets when the remaining space is low.
//!
//! ```text
//! fn walk(block: &Block, depth: Depth) -> ProgramNode {
//!     let Some(inner) = depth.descend() else { return truncated() };
//!     ensure_sufficient_stack(|| walk(block.child(), inner))
//! }
//! ```

use std::fmt;

/// Deepest nesting level any walk will enter.
///
/// Human-authored level programs rarely nest beyond four or five levels.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// Longest sibling chain a walk will follow at one nesting level.
pub const MAX_CHAIN_LENGTH: usize = 4096;

/// Minimum stack space to keep available (64KB red zone).
const RED_ZONE: usize = 64 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Current nesting level of a recursive walk.
///
/// Starts at [`Depth::ROOT`]; each descent into a nested body goes through
/// [`Depth::descend`], which returns `None` once the limit is reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Depth {
    level: u32,
    limit: u32,
}

impl Depth {
    /// Top level of a program, limited by [`MAX_NESTING_DEPTH`].
    pub const ROOT: Depth = Depth {
        level: 0,
        limit: MAX_NESTING_DEPTH,
    };

    /// Top level of a program with a custom nesting limit.
    ///
    /// The limit is clamped to [`MAX_NESTING_DEPTH`].
    pub fn with_limit(limit: u32) -> Self {
        Depth {
            level: 0,
            limit: limit.min(MAX_NESTING_DEPTH),
        }
    }

    /// One level deeper, or `None` if that would exceed the limit.
    #[must_use]
    pub fn descend(self) -> Option<Depth> {
        if self.level >= self.limit {
            return None;
        }
        Some(Depth {
            level: self.level + 1,
            limit: self.limit,
        })
    }

    /// Nesting level (0 at the top of a program).
    pub fn level(self) -> u32 {
        self.level
    }

    /// Configured maximum level.
    pub fn limit(self) -> u32 {
        self.limit
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::ROOT
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.level, self.limit)
    }
}

/// Ensure sufficient stack space is available before executing `f`.
///
/// - **Native**: uses `stacker::maybe_grow`
/// - **WASM**: calls `f()` directly
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
