//! Errors that might be returned by constructing grammars and by parsing.
//!
//! Neither of these is how a parser reports that its input did not match.
//! That is an ordinary, expected outcome and is represented by `Ok(None)` from
//! [`Grammar::parse`](../grammar/struct.Grammar.html#method.parse).  The types
//! here represent misuse of the library, which is always fatal.

use thiserror::Error;

use crate::grammar::Parser;


/// The possible errors that might be returned by the fallible constructors of
/// a [`Grammar`](../grammar/struct.Grammar.html).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum BuildError {
    /// An integer range whose lower bound is above its upper bound
    #[error("inverted integer range: {low} > {high}")]
    InvertedRange {
        /// The given lower bound
        low: i64,
        /// The given upper bound
        high: i64,
    },
    /// Integer leaves read between 1 and 64 bits
    #[error("invalid bit width {0}, must be 1..=64")]
    InvalidBitWidth(usize),
    /// `int_range` was given a parser that is not an integer leaf
    #[error("{0} is not an integer parser")]
    NotAnInteger(Parser),
    /// `bind_indirect` was given a parser that is not an indirection
    #[error("{0} is not an indirection")]
    NotIndirect(Parser),
    /// An indirection may only be bound once
    #[error("indirection {0} is already bound")]
    AlreadyBound(Parser),
    /// A parser handle that was made by a different `Grammar`
    #[error("{0} belongs to a different grammar")]
    ForeignParser(Parser),
}


/// The possible errors that might be returned by parsing.
///
/// These are all caused by how the grammar was constructed, not by the input,
/// but they can only be detected once evaluation reaches the offending node.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
    /// Evaluation reached an indirection that was never bound
    #[error("indirection {0} was reached before being bound")]
    Unbound(Parser),
    /// Evaluation re-entered a parser at the same position while still
    /// evaluating it there, which is what a left-recursive grammar does
    #[error("left recursion through {parser} at bit offset {offset}")]
    LeftRecursion {
        /// The parser that was re-entered
        parser: Parser,
        /// The bit offset at which it was re-entered
        offset: usize,
    },
    /// Indirections nested deeper than the configured
    /// [`max_depth`](../config/struct.Config.html#structfield.max_depth)
    #[error("evaluation depth exceeded the limit of {limit}")]
    DepthExceeded {
        /// The configured limit
        limit: usize,
    },
    /// A parser handle that was made by a different `Grammar`
    #[error("{0} belongs to a different grammar")]
    ForeignParser(Parser),
    /// The length parser of a `length_value` produced something other than an
    /// unsigned integer
    #[error("length parser {0} did not produce an unsigned integer")]
    NotALength(Parser),
}


#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn equality() {
        let mut g = Grammar::<()>::new();
        let p = g.epsilon();

        assert_eq!(Error::Unbound(p), Error::Unbound(p));
        assert_eq!(Error::LeftRecursion{parser: p, offset: 8},
                   Error::LeftRecursion{parser: p, offset: 8});
        assert_ne!(Error::LeftRecursion{parser: p, offset: 8},
                   Error::LeftRecursion{parser: p, offset: 16});
        assert_eq!(BuildError::InvertedRange{low: 2, high: 1},
                   BuildError::InvertedRange{low: 2, high: 1});
        assert_ne!(BuildError::AlreadyBound(p), BuildError::NotIndirect(p));
    }

    #[test]
    fn messages() {
        assert_eq!(BuildError::InvertedRange{low: 9, high: 3}.to_string(),
                   "inverted integer range: 9 > 3");
        assert_eq!(BuildError::InvalidBitWidth(65).to_string(),
                   "invalid bit width 65, must be 1..=64");
        assert_eq!(Error::DepthExceeded{limit: 7}.to_string(),
                   "evaluation depth exceeded the limit of 7");
    }
}
