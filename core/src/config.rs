//! Knobs for a parse.

use crate::input::Endianness;


/// The recursion depth limit used by [`Config::default`](struct.Config.html).
pub const DEFAULT_MAX_DEPTH: usize = 10_000;


/// Settings for one invocation of
/// [`Grammar::parse_with`](../grammar/struct.Grammar.html#method.parse_with).
///
/// ```
/// use kombi_core::{Config, Endianness};
///
/// let config = Config::new()
///     .with_max_depth(200)
///     .with_endianness(Endianness::LITTLE);
/// assert_eq!(config.max_depth, 200);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Config {
    /// How deeply indirections may nest, i.e. how deeply the grammar may
    /// recurse, before giving up with
    /// [`Error::DepthExceeded`](../error/enum.Error.html#variant.DepthExceeded).
    /// Evaluation does not use the thread's stack for nesting, so this bounds
    /// the memory a parse may use.  `0` means no limit.
    pub max_depth: usize,
    /// The byte and bit order that the top-level parser starts reading with.
    pub endianness: Endianness,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            endianness: Endianness::default(),
        }
    }
}

impl Config {
    /// Same as `Config::default()`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the depth limit.
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the starting endianness.
    #[inline]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub(crate) fn depth_allowed(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits() {
        let c = Config::default();
        assert!(c.depth_allowed(DEFAULT_MAX_DEPTH));
        assert!(!c.depth_allowed(DEFAULT_MAX_DEPTH + 1));
        assert!(Config::new().with_max_depth(0).depth_allowed(usize::MAX));
    }
}
