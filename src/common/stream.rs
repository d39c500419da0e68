//! Parsing inputs that come from a [`Read`] source.
//!
//! Packrat parsing needs random access to the whole input, so the source is
//! read to its end into memory first.
//!
//! [`Read`]: http://doc.rust-lang.org/std/io/trait.Read.html

use std::io::{self, Read};

use log::debug;
use thiserror::Error as ThisError;

use crate::{Config, Error, Grammar, Parsed, Parser};

use super::inmem;


/// The possible errors that might be returned by parsing from a reader.
#[derive(Debug, ThisError)]
pub enum ReadError {
    /// Reading the input failed
    #[error("reading input failed: {0}")]
    Io(#[from] io::Error),
    /// The grammar could not be used, see
    /// [`Error`](../../../kombi_core/error/enum.Error.html)
    #[error(transparent)]
    Parse(#[from] Error),
}


/// Read all of `reader` and run `parser` of `grammar` over it, with the default
/// [`Config`](../../../kombi_core/config/struct.Config.html).
///
/// ```
/// use kombi::{Grammar, common::stream};
///
/// let mut g = Grammar::<()>::new();
/// let word = g.token(b"hello");
/// let parsed = stream::parse_reader(&g, word, &b"hello world"[..]).unwrap();
/// assert_eq!(parsed.unwrap().value.unwrap().to_string(), "<68.65.6c.6c.6f>");
/// ```
#[inline]
pub fn parse_reader<U, R>(grammar: &Grammar<U>, parser: Parser, reader: R)
                          -> Result<Option<Parsed<U>>, ReadError>
    where R: Read,
{
    parse_reader_with(grammar, parser, reader, &Config::default())
}

/// Like [`parse_reader`](fn.parse_reader.html) but with the given
/// configuration.
pub fn parse_reader_with<U, R>(grammar: &Grammar<U>, parser: Parser, mut reader: R,
                               config: &Config)
                               -> Result<Option<Parsed<U>>, ReadError>
    where R: Read,
{
    let mut input = Vec::new();
    let count = reader.read_to_end(&mut input)?;
    debug!("read {} bytes of input", count);
    Ok(inmem::parse_with(grammar, parser, &input, config)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("broken"))
        }
    }

    #[test]
    fn errors() {
        let mut g = Grammar::<()>::new();
        let a = g.ch(b'a');
        assert!(matches!(parse_reader(&g, a, Broken), Err(ReadError::Io(_))));

        let i = g.indirect();
        assert!(matches!(parse_reader(&g, i, &b"a"[..]),
                         Err(ReadError::Parse(Error::Unbound(p))) if p == i));
        assert_eq!(parse_reader(&g, a, &b"b"[..]).unwrap(), None);
    }

    #[test]
    fn message() {
        let e = ReadError::from(io::Error::other("broken"));
        assert_eq!(e.to_string(), "reading input failed: broken");
    }
}
