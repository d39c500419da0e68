//! Parsing inputs that are single in-memory byte slices.

use crate::{Config, Error, Grammar, Parsed, Parser, memo::HashMapMemo};


/// Chosen so that the memo table simply grows in a `HashMap` without limit.
pub type Memo<U = ()> = HashMapMemo<U>;


/// Run `parser` of `grammar` over all of `input`, with the default
/// [`Config`](../../../kombi_core/config/struct.Config.html).
///
/// ```
/// use kombi::{Grammar, common::inmem};
///
/// let mut g = Grammar::<()>::new();
/// let n = g.uint16();
/// let parsed = inmem::parse(&g, n, b"\x00\x2a").unwrap().unwrap();
/// assert_eq!(parsed.value.unwrap().as_uint(), Some(42));
/// ```
#[inline]
pub fn parse<U>(grammar: &Grammar<U>, parser: Parser, input: &[u8])
                -> Result<Option<Parsed<U>>, Error>
{
    parse_with(grammar, parser, input, &Config::default())
}

/// Like [`parse`](fn.parse.html) but with the given configuration.
#[inline]
pub fn parse_with<U>(grammar: &Grammar<U>, parser: Parser, input: &[u8], config: &Config)
                     -> Result<Option<Parsed<U>>, Error>
{
    grammar.parse_with::<Memo<U>>(parser, input, config)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_input() {
        let mut g = Grammar::<()>::new();
        let a = g.ch(b'a');
        let parsed = parse(&g, a, b"ab").unwrap().unwrap();
        assert_eq!(parsed.byte_length(), 1);

        let end = g.end();
        let whole = g.sequence(&[a, end]);
        assert_eq!(parse(&g, whole, b"ab"), Ok(None));
        assert!(parse(&g, whole, b"a").unwrap().is_some());
    }

    #[test]
    fn config_is_used() {
        let mut g = Grammar::<()>::new();
        let p = g.indirect();
        let a = g.ch(b'a');
        let ap = g.sequence(&[a, p]);
        let eps = g.epsilon();
        let alt = g.choice(&[ap, eps]);
        g.bind_indirect(p, alt).unwrap();

        let config = Config::new().with_max_depth(8);
        assert_eq!(parse_with(&g, p, b"aaaaaaaa", &config),
                   Err(Error::DepthExceeded { limit: 8 }));
    }
}
