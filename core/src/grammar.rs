//! The parser node model.  Parsers live in the arena of a `Grammar` and are
//! referred to by `Copy` handles, which lets grammars refer to themselves
//! without building cyclic structures.

use core::{
    fmt::{self, Debug, Display, Formatter},
    sync::atomic::{AtomicUsize, Ordering},
};

use alloc::{boxed::Box, vec::Vec};

use log::debug;

use crate::{
    error::BuildError,
    input::Endianness,
    value::Value,
};


/// The type of `action` functions.  The argument is the value of the inner
/// parser's success, or [`Value::None`](../value/enum.Value.html#variant.None)
/// if it produced no value, and the return becomes the payload of a
/// [`Value::User`](../value/enum.Value.html#variant.User).
pub type ActionFn<U> = dyn Fn(&Value<U>) -> U + Send + Sync;

/// The type of `map` functions.  Like [`ActionFn`](type.ActionFn.html) but the
/// return replaces the inner value entirely.
pub type MapFn<U> = dyn Fn(&Value<U>) -> Value<U> + Send + Sync;

/// The type of `attr_bool` predicates.
pub type PredicateFn<U> = dyn Fn(&Value<U>) -> bool + Send + Sync;


/// A handle to a parser in a [`Grammar`](struct.Grammar.html).
///
/// It is only meaningful to the grammar that made it, and using it with any
/// other grammar is an error.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Parser {
    grammar: usize,
    index: usize,
}

impl Parser {
    /// The position of this parser in its grammar's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

impl Display for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "parser #{} of grammar #{}", self.index, self.grammar)
    }
}


/// A set of bytes, as a bitmap.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct ByteSet([u64; 4]);

impl ByteSet {
    fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = [0; 4];
        for &b in bytes {
            set[usize::from(b >> 6)] |= 1 << (b & 63);
        }
        ByteSet(set)
    }

    pub(crate) fn contains(self, b: u8) -> bool {
        self.0[usize::from(b >> 6)] & (1 << (b & 63)) != 0
    }
}


/// The catalogue of parser kinds.
pub(crate) enum Node<U> {
    Ch(u8),
    Range { low: u8, high: u8 },
    Token(Box<[u8]>),
    Set { set: ByteSet, negated: bool },
    Int { bits: u8, signed: bool },
    IntRange { inner: Parser, low: i64, high: i64 },
    End,
    Nothing,
    Epsilon,
    Sequence(Box<[Parser]>),
    Choice(Box<[Parser]>),
    Many { inner: Parser, sep: Option<Parser>, at_least_one: bool },
    RepeatN { inner: Parser, count: usize },
    Optional(Parser),
    Whitespace(Parser),
    Ignore(Parser),
    And(Parser),
    Not(Parser),
    ButNot(Parser, Parser),
    Difference(Parser, Parser),
    Xor(Parser, Parser),
    Action(Parser, Box<ActionFn<U>>),
    Map(Parser, Box<MapFn<U>>),
    AttrBool(Parser, Box<PredicateFn<U>>),
    Pick { parts: Box<[Parser]>, keep: usize },
    LengthValue { length: Parser, value: Parser },
    Permutation(Box<[Parser]>),
    WithEndianness(Endianness, Parser),
    Indirect(Option<Parser>),
}

impl<U> Debug for Node<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Node::*;

        match self {
            Ch(c) => write!(f, "ch({:#04x})", c),
            Range { low, high } => write!(f, "ch_range({:#04x}, {:#04x})", low, high),
            Token(t) => write!(f, "token({:?})", t),
            Set { negated, .. } => f.write_str(if *negated { "not_in_set" } else { "in_set" }),
            Int { bits, signed } => write!(f, "{}{}", if *signed { "int" } else { "uint" }, bits),
            IntRange { inner, low, high } =>
                write!(f, "int_range(#{}, {}, {})", inner.index, low, high),
            End => f.write_str("end"),
            Nothing => f.write_str("nothing"),
            Epsilon => f.write_str("epsilon"),
            Sequence(ps) => write!(f, "sequence{:?}", Indices(ps)),
            Choice(ps) => write!(f, "choice{:?}", Indices(ps)),
            Many { inner, sep: None, at_least_one } =>
                write!(f, "many{}(#{})", if *at_least_one { "1" } else { "" }, inner.index),
            Many { inner, sep: Some(sep), at_least_one } =>
                write!(f, "sep_by{}(#{}, #{})", if *at_least_one { "1" } else { "" },
                       inner.index, sep.index),
            RepeatN { inner, count } => write!(f, "repeat_n(#{}, {})", inner.index, count),
            Optional(p) => write!(f, "optional(#{})", p.index),
            Whitespace(p) => write!(f, "whitespace(#{})", p.index),
            Ignore(p) => write!(f, "ignore(#{})", p.index),
            And(p) => write!(f, "and(#{})", p.index),
            Not(p) => write!(f, "not(#{})", p.index),
            ButNot(a, b) => write!(f, "butnot(#{}, #{})", a.index, b.index),
            Difference(a, b) => write!(f, "difference(#{}, #{})", a.index, b.index),
            Xor(a, b) => write!(f, "xor(#{}, #{})", a.index, b.index),
            Action(p, _) => write!(f, "action(#{})", p.index),
            Map(p, _) => write!(f, "map(#{})", p.index),
            AttrBool(p, _) => write!(f, "attr_bool(#{})", p.index),
            Pick { parts, keep } => write!(f, "pick{:?}[{}]", Indices(parts), keep),
            LengthValue { length, value } =>
                write!(f, "length_value(#{}, #{})", length.index, value.index),
            Permutation(ps) => write!(f, "permutation{:?}", Indices(ps)),
            WithEndianness(e, p) => write!(f, "with_endianness({:?}, #{})", e, p.index),
            Indirect(None) => f.write_str("indirect(unbound)"),
            Indirect(Some(t)) => write!(f, "indirect(#{})", t.index),
        }
    }
}

struct Indices<'a>(&'a [Parser]);

impl Debug for Indices<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "#{}", p.index)?;
        }
        f.write_str(")")
    }
}


static NEXT_GRAMMAR_ID: AtomicUsize = AtomicUsize::new(0);


/// An arena of parsers that may refer to each other.
///
/// Parsers are made by the constructor methods, which return
/// [`Parser`](struct.Parser.html) handles to be given to further constructors.
/// Once built, a grammar can be used for any number of parses, including
/// concurrently from multiple threads since it is `Sync`.  The only mutation
/// after construction is the one-time
/// [binding](#method.bind_indirect) of indirections, which needs `&mut self`
/// and so cannot race with parsing.
///
/// The `U` type parameter is the type of the values produced by
/// [`action`](#method.action) functions.
///
/// ```
/// use kombi_core::Grammar;
///
/// let mut g = Grammar::<()>::new();
/// let a = g.ch(b'a');
/// let b = g.ch(b'b');
/// let ab = g.sequence(&[a, b]);
/// let parsed = g.parse(ab, b"ab").unwrap().unwrap();
/// assert_eq!(parsed.value.unwrap().to_string(), "(u0x61 u0x62)");
/// ```
pub struct Grammar<U = ()> {
    id: usize,
    pub(crate) nodes: Vec<Node<U>>,
}

impl<U> Debug for Grammar<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
         .field("id", &self.id)
         .field("nodes", &self.nodes)
         .finish()
    }
}

impl<U> Default for Grammar<U> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Grammar<U> {
    /// Make a new empty grammar.
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAMMAR_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    /// How many parsers have been made in this grammar.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no parsers have been made in this grammar.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `parser` was made by this grammar.
    #[inline]
    pub fn owns(&self, parser: Parser) -> bool {
        parser.grammar == self.id && parser.index < self.nodes.len()
    }

    pub(crate) fn node(&self, parser: Parser) -> Option<&Node<U>> {
        if parser.grammar == self.id { self.nodes.get(parser.index) } else { None }
    }

    fn add(&mut self, node: Node<U>) -> Parser {
        self.nodes.push(node);
        Parser { grammar: self.id, index: self.nodes.len() - 1 }
    }

    fn check(&self, parser: Parser) -> Result<&Node<U>, BuildError> {
        self.node(parser).ok_or(BuildError::ForeignParser(parser))
    }

    // Leaves

    /// Match exactly the byte `c`.  Its value is the byte as an 8-bit unsigned
    /// integer.
    pub fn ch(&mut self, c: u8) -> Parser {
        self.add(Node::Ch(c))
    }

    /// Match one byte in the inclusive range `low..=high`.  Its value is the
    /// byte as an 8-bit unsigned integer.
    pub fn ch_range(&mut self, low: u8, high: u8) -> Parser {
        self.add(Node::Range { low, high })
    }

    /// Match exactly the bytes of `token`.  Its value is a byte run.
    pub fn token(&mut self, token: &[u8]) -> Parser {
        self.add(Node::Token(token.into()))
    }

    /// Match one byte that is any of `bytes`.
    pub fn in_set(&mut self, bytes: &[u8]) -> Parser {
        self.add(Node::Set { set: ByteSet::from_bytes(bytes), negated: false })
    }

    /// Match one byte that is none of `bytes`.
    pub fn not_in_set(&mut self, bytes: &[u8]) -> Parser {
        self.add(Node::Set { set: ByteSet::from_bytes(bytes), negated: true })
    }

    /// Read an integer of `width` bits, which must be in `1..=64`.  Signed
    /// integers are two's-complement.
    pub fn bits(&mut self, width: usize, signed: bool) -> Result<Parser, BuildError> {
        if (1 ..= 64).contains(&width) {
            Ok(self.add(Node::Int { bits: width as u8, signed }))
        } else {
            Err(BuildError::InvalidBitWidth(width))
        }
    }

    fn int(&mut self, bits: u8, signed: bool) -> Parser {
        self.add(Node::Int { bits, signed })
    }

    /// Read a signed 8-bit integer.
    pub fn int8(&mut self) -> Parser { self.int(8, true) }
    /// Read a signed 16-bit integer.
    pub fn int16(&mut self) -> Parser { self.int(16, true) }
    /// Read a signed 32-bit integer.
    pub fn int32(&mut self) -> Parser { self.int(32, true) }
    /// Read a signed 64-bit integer.
    pub fn int64(&mut self) -> Parser { self.int(64, true) }
    /// Read an unsigned 8-bit integer.
    pub fn uint8(&mut self) -> Parser { self.int(8, false) }
    /// Read an unsigned 16-bit integer.
    pub fn uint16(&mut self) -> Parser { self.int(16, false) }
    /// Read an unsigned 32-bit integer.
    pub fn uint32(&mut self) -> Parser { self.int(32, false) }
    /// Read an unsigned 64-bit integer.
    pub fn uint64(&mut self) -> Parser { self.int(64, false) }

    /// Like `inner`, which must be an integer leaf, but fail if the integer is
    /// outside `low..=high`.
    pub fn int_range(&mut self, inner: Parser, low: i64, high: i64)
                     -> Result<Parser, BuildError>
    {
        if !matches!(self.check(inner)?, Node::Int { .. }) {
            return Err(BuildError::NotAnInteger(inner));
        }
        if low > high {
            return Err(BuildError::InvertedRange { low, high });
        }
        Ok(self.add(Node::IntRange { inner, low, high }))
    }

    /// Succeed, with no value, only at the end of the input.
    pub fn end(&mut self) -> Parser {
        self.add(Node::End)
    }

    /// Always fail.
    pub fn nothing(&mut self) -> Parser {
        self.add(Node::Nothing)
    }

    /// Always succeed, consuming nothing and with no value.
    pub fn epsilon(&mut self) -> Parser {
        self.add(Node::Epsilon)
    }

    // Combinators

    /// Match all of `parsers` one after another.  Its value is the sequence of
    /// their values, omitting those that have no value.
    pub fn sequence(&mut self, parsers: &[Parser]) -> Parser {
        self.add(Node::Sequence(parsers.into()))
    }

    /// Match the first of `parsers` that matches.
    pub fn choice(&mut self, parsers: &[Parser]) -> Parser {
        self.add(Node::Choice(parsers.into()))
    }

    /// Match `inner` zero or more times.  Never fails.
    pub fn many(&mut self, inner: Parser) -> Parser {
        self.add(Node::Many { inner, sep: None, at_least_one: false })
    }

    /// Match `inner` one or more times.
    pub fn many1(&mut self, inner: Parser) -> Parser {
        self.add(Node::Many { inner, sep: None, at_least_one: true })
    }

    /// Match `inner` exactly `count` times.
    pub fn repeat_n(&mut self, inner: Parser, count: usize) -> Parser {
        self.add(Node::RepeatN { inner, count })
    }

    /// Match `inner` if possible, else succeed with the
    /// [`Value::None`](../value/enum.Value.html#variant.None) sentinel.
    pub fn optional(&mut self, inner: Parser) -> Parser {
        self.add(Node::Optional(inner))
    }

    /// Match zero or more `inner`s separated by `sep`s.  The separators' values
    /// are dropped.
    pub fn sep_by(&mut self, inner: Parser, sep: Parser) -> Parser {
        self.add(Node::Many { inner, sep: Some(sep), at_least_one: false })
    }

    /// Match one or more `inner`s separated by `sep`s.
    pub fn sep_by1(&mut self, inner: Parser, sep: Parser) -> Parser {
        self.add(Node::Many { inner, sep: Some(sep), at_least_one: true })
    }

    /// Skip any ASCII whitespace bytes, as C's `isspace` knows them, then match
    /// `inner`.
    pub fn whitespace(&mut self, inner: Parser) -> Parser {
        self.add(Node::Whitespace(inner))
    }

    /// Match `inner` but produce no value, so that enclosing sequences omit it.
    pub fn ignore(&mut self, inner: Parser) -> Parser {
        self.add(Node::Ignore(inner))
    }

    /// Succeed, consuming nothing and with no value, if `inner` would match.
    pub fn and(&mut self, inner: Parser) -> Parser {
        self.add(Node::And(inner))
    }

    /// Succeed, consuming nothing and with no value, if `inner` would not
    /// match.
    pub fn not(&mut self, inner: Parser) -> Parser {
        self.add(Node::Not(inner))
    }

    /// Match `a`, unless `b` also matches at the same place at least as much
    /// input.
    pub fn butnot(&mut self, a: Parser, b: Parser) -> Parser {
        self.add(Node::ButNot(a, b))
    }

    /// Match `a`, unless `b` also matches at the same place exactly the same
    /// input.
    pub fn difference(&mut self, a: Parser, b: Parser) -> Parser {
        self.add(Node::Difference(a, b))
    }

    /// Match whichever of `a` and `b` matches, failing if both or neither do.
    pub fn xor(&mut self, a: Parser, b: Parser) -> Parser {
        self.add(Node::Xor(a, b))
    }

    /// Match `inner` and give its value to `f`, whose return becomes a
    /// [`Value::User`](../value/enum.Value.html#variant.User).
    pub fn action<F>(&mut self, inner: Parser, f: F) -> Parser
        where F: Fn(&Value<U>) -> U + Send + Sync + 'static,
    {
        self.add(Node::Action(inner, Box::new(f)))
    }

    /// Match `inner` and replace its value with what `f` returns for it.
    pub fn map<F>(&mut self, inner: Parser, f: F) -> Parser
        where F: Fn(&Value<U>) -> Value<U> + Send + Sync + 'static,
    {
        self.add(Node::Map(inner, Box::new(f)))
    }

    /// Match `inner` only if `predicate` accepts its value.
    pub fn attr_bool<F>(&mut self, inner: Parser, predicate: F) -> Parser
        where F: Fn(&Value<U>) -> bool + Send + Sync + 'static,
    {
        self.add(Node::AttrBool(inner, Box::new(predicate)))
    }

    /// Match `p` then `q`, keeping only the value of `p`.
    pub fn left(&mut self, p: Parser, q: Parser) -> Parser {
        self.add(Node::Pick { parts: [p, q].into(), keep: 0 })
    }

    /// Match `p` then `q`, keeping only the value of `q`.
    pub fn right(&mut self, p: Parser, q: Parser) -> Parser {
        self.add(Node::Pick { parts: [p, q].into(), keep: 1 })
    }

    /// Match `p` then `x` then `q`, keeping only the value of `x`.
    pub fn middle(&mut self, p: Parser, x: Parser, q: Parser) -> Parser {
        self.add(Node::Pick { parts: [p, x, q].into(), keep: 1 })
    }

    /// Match `length`, which must produce an unsigned integer, then match
    /// `value` that many times.
    pub fn length_value(&mut self, length: Parser, value: Parser) -> Parser {
        self.add(Node::LengthValue { length, value })
    }

    /// Match all of `parsers` in any order.  The value is their values in the
    /// order given here.  Members that are `optional` may be absent.
    pub fn permutation(&mut self, parsers: &[Parser]) -> Parser {
        self.add(Node::Permutation(parsers.into()))
    }

    /// Match `inner` reading with `endianness`.
    pub fn with_endianness(&mut self, endianness: Endianness, inner: Parser) -> Parser {
        self.add(Node::WithEndianness(endianness, inner))
    }

    /// Make a placeholder to be [bound](#method.bind_indirect) later to the
    /// parser it stands for.
    pub fn indirect(&mut self) -> Parser {
        self.add(Node::Indirect(None))
    }

    /// Bind the placeholder `indirect` to `target`.  This may be done only once
    /// per placeholder.
    ///
    /// ```
    /// use kombi_core::Grammar;
    ///
    /// // P := 'a' P | epsilon
    /// let mut g = Grammar::<()>::new();
    /// let p = g.indirect();
    /// let a = g.ch(b'a');
    /// let ap = g.sequence(&[a, p]);
    /// let eps = g.epsilon();
    /// let alt = g.choice(&[ap, eps]);
    /// g.bind_indirect(p, alt).unwrap();
    /// assert!(g.bind_indirect(p, alt).is_err());
    /// ```
    pub fn bind_indirect(&mut self, indirect: Parser, target: Parser) -> Result<(), BuildError> {
        let _ = self.check(target)?;
        if indirect.grammar != self.id {
            return Err(BuildError::ForeignParser(indirect));
        }
        match self.nodes.get_mut(indirect.index) {
            Some(Node::Indirect(slot)) => {
                if slot.is_some() {
                    return Err(BuildError::AlreadyBound(indirect));
                }
                *slot = Some(target);
                debug!("bound {} to {}", indirect, target);
                Ok(())
            }
            Some(_) => Err(BuildError::NotIndirect(indirect)),
            None => Err(BuildError::ForeignParser(indirect)),
        }
    }
}


#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn handles() {
        let mut g = Grammar::<()>::new();
        assert!(g.is_empty());
        let a = g.ch(b'a');
        let b = g.ch(b'b');
        assert_eq!(g.len(), 2);
        assert_eq!((a.index(), b.index()), (0, 1));
        assert!(g.owns(a));

        let other = Grammar::<()>::new();
        assert!(!other.owns(a));
    }

    #[test]
    fn byte_set() {
        let s = ByteSet::from_bytes(b"\x00?@\xff");
        for b in 0 ..= 255 {
            assert_eq!(s.contains(b), [0, b'?', b'@', 0xff].contains(&b), "{}", b);
        }
    }

    #[test]
    fn construction_errors() {
        let mut g = Grammar::<()>::new();
        let u = g.uint8();
        let c = g.ch(b'c');
        let i = g.indirect();
        assert_eq!(g.bits(0, false), Err(BuildError::InvalidBitWidth(0)));
        assert_eq!(g.bits(65, true), Err(BuildError::InvalidBitWidth(65)));
        assert!(g.bits(64, true).is_ok());
        assert_eq!(g.int_range(u, 10, 3),
                   Err(BuildError::InvertedRange { low: 10, high: 3 }));
        assert_eq!(g.int_range(c, 0, 3), Err(BuildError::NotAnInteger(c)));
        assert_eq!(g.bind_indirect(c, u), Err(BuildError::NotIndirect(c)));
        assert_eq!(g.bind_indirect(i, u), Ok(()));
        assert_eq!(g.bind_indirect(i, c), Err(BuildError::AlreadyBound(i)));

        let mut h = Grammar::<()>::new();
        let j = h.indirect();
        assert_eq!(h.bind_indirect(j, u), Err(BuildError::ForeignParser(u)));
        assert_eq!(g.bind_indirect(j, u), Err(BuildError::ForeignParser(j)));
        assert_eq!(h.int_range(u, 0, 1), Err(BuildError::ForeignParser(u)));
    }

    #[test]
    fn debug_form() {
        let mut g = Grammar::<()>::new();
        let a = g.ch(b'a');
        let s = g.sep_by1(a, a);
        let _ = g.sequence(&[a, s]);
        let rendered = format!("{:?}", g);
        assert!(rendered.contains("ch(0x61)"), "{}", rendered);
        assert!(rendered.contains("sep_by1(#0, #0)"), "{}", rendered);
        assert!(rendered.contains("sequence(#0, #1)"), "{}", rendered);
    }
}
