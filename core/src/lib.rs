//! The core of a packrat parser-combinator engine for binary and textual
//! formats.
//!
//! Grammars are built by composing small parsing primitives, which match single
//! bytes, byte ranges and sets, exact byte sequences, and integers of any bit
//! width in any endianness, with combinators for sequences, ordered choices,
//! repetitions, lookaheads, exclusions, and value transformations.  The parsers
//! of a grammar live in the arena of a [`Grammar`] and refer to each other by
//! `Copy` [`Parser`] handles.  A grammar can refer to itself, or to parts not
//! yet built, through an [indirection](struct.Grammar.html#method.indirect)
//! that is bound exactly once, so recursive grammars never need cyclic
//! ownership.
//!
//! A parse evaluates one parser of a grammar over an input byte slice, by
//! recursive descent memoized per (parser, position), and produces a tree of
//! [`Value`]s.  Not matching is an ordinary result, `Ok(None)`.  Misuse of a
//! grammar, like reaching an unbound indirection or left recursion, is an
//! [`Error`].
//!
//! This core crate is `no_std` and needs only the `alloc` library.  The memo
//! table is generic, and a `BTreeMap`-backed one is provided.
//!
//! ```
//! use kombi_core::Grammar;
//!
//! // digits separated by commas, then the end of input
//! let mut g = Grammar::<()>::new();
//! let digit = g.ch_range(b'0', b'9');
//! let comma = g.ch(b',');
//! let list = g.sep_by1(digit, comma);
//! let end = g.end();
//! let all = g.left(list, end);
//!
//! let parsed = g.parse(all, b"1,2,3").unwrap().unwrap();
//! assert_eq!(parsed.value.unwrap().to_string(), "(u0x31 u0x32 u0x33)");
//! assert_eq!(g.parse(all, b"1,2,").unwrap(), None);
//! ```
//!
//! [`Grammar`]: grammar/struct.Grammar.html
//! [`Parser`]: grammar/struct.Parser.html
//! [`Value`]: value/enum.Value.html
//! [`Error`]: error/enum.Error.html

#![no_std]

extern crate alloc;


pub mod config;
pub mod error;
mod eval;
pub mod grammar;
pub mod input;
pub mod memo;
pub mod parse;
pub mod value;

pub use config::Config;
pub use error::{BuildError, Error};
pub use grammar::{Grammar, Parser};
pub use input::{BitOrder, ByteOrder, Endianness};
pub use memo::{MemoTable, premade::BTreeMemo};
pub use parse::Parsed;
pub use value::{Kind, Value};
