//! The memoization of intermediate results, which makes evaluation packrat
//! parsing.

use crate::{input::Endianness, value::Value};


/// Implementations provided for ready use.
pub mod premade {
    mod btree_memo;
    pub use btree_memo::BTreeMemo;
}


/// What a memo table is keyed by.  The same parser at the same position can
/// have different results when reading with different endianness.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MemoKey {
    /// The [`index`](../grammar/struct.Parser.html#method.index) of the parser
    pub parser: usize,
    /// The bit offset the parser was evaluated at
    pub pos: usize,
    /// What the parser was evaluated with
    pub endianness: Endianness,
}

/// A successful result of a parser.
#[derive(PartialEq, Eq, Debug)]
pub struct Success<U> {
    /// The produced value.  `None` for parsers that produce no value, such as
    /// `ignore` and the lookaheads.
    pub value: Option<Value<U>>,
    /// The bit offset just after what was consumed
    pub end: usize,
}

// Note: Must implement `Clone` manually instead of using `derive` because
// `derive` would place an additional `U: Clone` bound.
impl<U> Clone for Success<U> {
    #[inline]
    fn clone(&self) -> Self {
        Self { value: self.value.clone(), end: self.end }
    }
}

/// The entries of a memo table.
#[derive(PartialEq, Eq, Debug)]
pub enum Entry<U> {
    /// The parser is being evaluated at this key, further up the stack.
    /// Reaching it again before it finishes is left recursion.
    InProgress,
    /// The finished result, `None` being failure
    Done(Option<Success<U>>),
}

// Note: Must implement `Clone` manually for the same reason as `Success`.
impl<U> Clone for Entry<U> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Entry::InProgress => Entry::InProgress,
            Entry::Done(result) => Entry::Done(result.clone()),
        }
    }
}


/// Storage for the memoized results of one parse.
///
/// A fresh table is made for every parse, with `Default`, and dropped when the
/// parse finishes, so implementations need not support invalidation.
pub trait MemoTable<U> {
    /// The entry at `key`, if there is one.
    fn lookup(&self, key: &MemoKey) -> Option<&Entry<U>>;

    /// Put `entry` at `key`, replacing any entry already there.
    fn store(&mut self, key: MemoKey, entry: Entry<U>);

    /// How many entries there are.
    fn len(&self) -> usize;

    /// Whether there are no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
