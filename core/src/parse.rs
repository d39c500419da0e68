//! Running a grammar over an input.

use log::debug;

use crate::{
    config::Config,
    error::Error,
    eval::Evaluator,
    grammar::{Grammar, Parser},
    memo::{MemoTable, premade::BTreeMemo},
    value::Value,
};


/// The result of a successful parse.
#[derive(PartialEq, Eq, Debug)]
pub struct Parsed<U = ()> {
    /// The value tree, or `None` if the top-level parser produces no value
    /// (e.g. `epsilon` or `ignore`)
    pub value: Option<Value<U>>,
    /// How many bits of input were consumed
    pub bit_length: usize,
}

// Note: Must implement `Clone` manually instead of using `derive` because
// `derive` would place an additional `U: Clone` bound.
impl<U> Clone for Parsed<U> {
    fn clone(&self) -> Self {
        Self { value: self.value.clone(), bit_length: self.bit_length }
    }
}

impl<U> Parsed<U> {
    /// How many bytes of input were consumed, counting a partly consumed
    /// final byte.
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.bit_length.div_ceil(8)
    }
}


impl<U> Grammar<U> {
    /// Run `parser` over `input` from its start, with the default
    /// [`Config`](../config/struct.Config.html) and a
    /// [`BTreeMemo`](../memo/premade/struct.BTreeMemo.html).
    ///
    /// Returns `Ok(None)` if the input does not match.  Input left over after
    /// a match does not prevent success; use [`end`](#method.end) to require
    /// consuming everything.  An `Err` means the grammar is unusable, see
    /// [`Error`](../error/enum.Error.html).
    #[inline]
    pub fn parse(&self, parser: Parser, input: &[u8]) -> Result<Option<Parsed<U>>, Error> {
        self.parse_with::<BTreeMemo<U>>(parser, input, &Config::default())
    }

    /// Like [`parse`](#method.parse) but with the given configuration and with
    /// a memo table of type `M`, a fresh one of which is made for this parse
    /// only.
    pub fn parse_with<M>(&self, parser: Parser, input: &[u8], config: &Config)
                         -> Result<Option<Parsed<U>>, Error>
        where M: MemoTable<U> + Default,
    {
        debug!("parsing {} bytes with {}", input.len(), parser);
        let mut evaluator = Evaluator::new(self, input, M::default(), *config);
        let result = evaluator.eval(parser, 0);
        match &result {
            Ok(Some(success)) => debug!("{} matched {} bits, {} memo entries",
                                        parser, success.end, evaluator.memo_len()),
            Ok(None) => debug!("{} did not match, {} memo entries",
                               parser, evaluator.memo_len()),
            Err(e) => debug!("{} aborted: {}", parser, e),
        }
        Ok(result?.map(|success| Parsed { value: success.value, bit_length: success.end }))
    }
}


#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn lengths() {
        let mut g = Grammar::<()>::new();
        let b = g.bits(3, false).unwrap();
        let u = g.uint8();
        let s = g.sequence(&[b, u]);

        let p = g.parse(s, b"\xff\xff").unwrap().unwrap();
        assert_eq!(p.bit_length, 11);
        assert_eq!(p.byte_length(), 2);
        assert_eq!(p.value.unwrap().to_string(), "(u0x7 u0xff)");

        let p = g.parse(u, b"\x01\x02").unwrap().unwrap();
        assert_eq!((p.bit_length, p.byte_length()), (8, 1));
    }

    #[test]
    fn no_value() {
        let mut g = Grammar::<()>::new();
        let e = g.epsilon();
        assert_eq!(g.parse(e, b""), Ok(Some(Parsed { value: None, bit_length: 0 })));
    }

    #[test]
    fn fresh_memo_each_parse() {
        let mut g = Grammar::<()>::new();
        let a = g.ch(b'a');
        assert!(g.parse(a, b"a").unwrap().is_some());
        assert!(g.parse(a, b"b").unwrap().is_none());
        assert!(g.parse(a, b"a").unwrap().is_some());
    }
}
