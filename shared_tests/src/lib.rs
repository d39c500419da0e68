//! Used by the integration tests of both the [core](../kombi_core/index.html)
//! and the [full](../kombi/index.html) crates.  It provides test suites that
//! can be run against any type of
//! [`MemoTable`](../kombi_core/memo/trait.MemoTable.html), and it represents
//! expected results as the unambiguous one-line rendering of value trees, so
//! that expectations stay short and readable.

use std::fmt::Debug;

use kombi_core::*;


pub mod suites;
pub mod utils;


/// What [`unamb`](fn.unamb.html) gives for a success that has no value.
pub const NO_VALUE: &str = "NULL";


/// Parse with a fresh memo table of type `M`, and render the result.  `None`
/// means the input did not match.
pub fn unamb<U, M>(grammar: &Grammar<U>, parser: Parser, input: &[u8])
                   -> Result<Option<String>, Error>
    where U: Debug,
          M: MemoTable<U> + Default,
{
    unamb_with::<U, M>(grammar, parser, input, &Config::default())
}

/// Like [`unamb`](fn.unamb.html) but with the given configuration.
pub fn unamb_with<U, M>(grammar: &Grammar<U>, parser: Parser, input: &[u8],
                        config: &Config)
                        -> Result<Option<String>, Error>
    where U: Debug,
          M: MemoTable<U> + Default,
{
    let parsed = grammar.parse_with::<M>(parser, input, config)?;
    Ok(parsed.map(|p| match p.value {
        Some(value) => value.to_string(),
        None => NO_VALUE.to_owned(),
    }))
}

/// Assert that `parser` matches `input` with the value rendered as `expected`.
#[track_caller]
pub fn check_match<U, M>(grammar: &Grammar<U>, parser: Parser, input: &[u8],
                         expected: &str)
    where U: Debug,
          M: MemoTable<U> + Default,
{
    assert_eq!(unamb::<U, M>(grammar, parser, input),
               Ok(Some(expected.to_owned())),
               "input {:?}", String::from_utf8_lossy(input));
}

/// Assert that `parser` does not match `input`.
#[track_caller]
pub fn check_failed<U, M>(grammar: &Grammar<U>, parser: Parser, input: &[u8])
    where U: Debug,
          M: MemoTable<U> + Default,
{
    assert_eq!(unamb::<U, M>(grammar, parser, input), Ok(None),
               "input {:?}", String::from_utf8_lossy(input));
}
