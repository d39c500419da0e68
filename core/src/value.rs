//! The value trees produced by successful parses.

use core::{
    fmt::{self, Debug, Display, Formatter},
    mem,
};

use alloc::{rc::Rc, vec::Vec};


/// A node of a value tree.
///
/// Trees are immutable and own their children.  The payloads that can be large
/// are reference-counted so that handing out a memoized result, or keeping
/// parts of a tree, does not copy them.
///
/// The `U` type parameter is the type of the values produced by the functions
/// of [`action`](../grammar/struct.Grammar.html#method.action) parsers, and it
/// defaults to `()`.
#[derive(PartialEq, Eq, Debug)]
pub enum Value<U = ()> {
    /// An unsigned integer, with the number of bits it was decoded from
    Uint {
        /// The decoded integer
        value: u64,
        /// How many bits the integer was decoded from
        bits: u8,
    },
    /// A signed integer, with the number of bits it was decoded from
    Sint {
        /// The decoded integer, sign-extended
        value: i64,
        /// How many bits the integer was decoded from
        bits: u8,
    },
    /// A run of raw bytes
    Bytes(Rc<[u8]>),
    /// An ordered sequence of child values
    Seq(Rc<[Value<U>]>),
    /// The sentinel produced by an `optional` whose inner parser did not match
    None,
    /// A value produced by an `action` function
    User(Rc<U>),
}

/// The kinds of [`Value`](enum.Value.html)s, without their payloads.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    /// [`Value::Uint`](enum.Value.html#variant.Uint)
    Uint,
    /// [`Value::Sint`](enum.Value.html#variant.Sint)
    Sint,
    /// [`Value::Bytes`](enum.Value.html#variant.Bytes)
    Bytes,
    /// [`Value::Seq`](enum.Value.html#variant.Seq)
    Seq,
    /// [`Value::None`](enum.Value.html#variant.None)
    None,
    /// [`Value::User`](enum.Value.html#variant.User)
    User,
}

// Note: Must implement `Clone` manually instead of using `derive` because
// `derive` would place an additional `U: Clone` bound, which is not needed
// since the payload is behind an `Rc`.
impl<U> Clone for Value<U> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Value::Uint { value, bits } => Value::Uint { value: *value, bits: *bits },
            Value::Sint { value, bits } => Value::Sint { value: *value, bits: *bits },
            Value::Bytes(bytes) => Value::Bytes(Rc::clone(bytes)),
            Value::Seq(elems) => Value::Seq(Rc::clone(elems)),
            Value::None => Value::None,
            Value::User(user) => Value::User(Rc::clone(user)),
        }
    }
}

/// Drops deep trees with a loop instead of the automatic recursive dropping,
/// which would overflow the stack for values nested as deeply as a grammar may
/// recurse.
///
/// Only the sequences this is the last owner of are taken apart.  A sequence
/// shared with another owner will not be freed by this drop anyway.
impl<U> Drop for Value<U> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_branches(self, &mut pending);
        while let Some(mut value) = pending.pop() {
            take_branches(&mut value, &mut pending);
        }
    }
}

fn take_branches<U>(value: &mut Value<U>, into: &mut Vec<Value<U>>) {
    if let Value::Seq(elems) = value {
        if let Some(elems) = Rc::get_mut(elems) {
            for elem in elems.iter_mut() {
                if let Value::Seq(_) = elem {
                    into.push(mem::replace(elem, Value::None));
                }
            }
        }
    }
}

impl<U> Value<U> {
    /// Make a byte-run value from a copy of the given bytes.
    #[inline]
    pub fn bytes(bytes: &[u8]) -> Self {
        Value::Bytes(Rc::from(bytes))
    }

    /// Make a sequence value from the given elements.
    #[inline]
    pub fn seq<I>(elems: I) -> Self
        where I: IntoIterator<Item = Value<U>>,
    {
        Value::Seq(elems.into_iter().collect())
    }

    /// Which kind of value this is.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Uint { .. } => Kind::Uint,
            Value::Sint { .. } => Kind::Sint,
            Value::Bytes(_) => Kind::Bytes,
            Value::Seq(_) => Kind::Seq,
            Value::None => Kind::None,
            Value::User(_) => Kind::User,
        }
    }

    /// The integer, if this is an unsigned integer.
    #[inline]
    pub fn as_uint(&self) -> Option<u64> {
        if let Value::Uint { value, .. } = self { Some(*value) } else { None }
    }

    /// The integer, if this is a signed integer.
    #[inline]
    pub fn as_sint(&self) -> Option<i64> {
        if let Value::Sint { value, .. } = self { Some(*value) } else { None }
    }

    /// How many bits the integer was decoded from, if this is an integer of
    /// either signedness.
    #[inline]
    pub fn bit_width(&self) -> Option<u8> {
        match self {
            Value::Uint { bits, .. } | Value::Sint { bits, .. } => Some(*bits),
            _ => None,
        }
    }

    /// The bytes, if this is a byte run.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let Value::Bytes(bytes) = self { Some(bytes) } else { None }
    }

    /// The elements, if this is a sequence.
    #[inline]
    pub fn as_seq(&self) -> Option<&[Value<U>]> {
        if let Value::Seq(elems) = self { Some(elems) } else { None }
    }

    /// The element at `index`, if this is a sequence that long.
    #[inline]
    pub fn seq_index(&self, index: usize) -> Option<&Value<U>> {
        self.as_seq().and_then(|elems| elems.get(index))
    }

    /// The payload, if this is a user value.
    #[inline]
    pub fn as_user(&self) -> Option<&U> {
        if let Value::User(user) = self { Some(user) } else { None }
    }

    /// Whether this is the sentinel of an unmatched `optional`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

/// The unambiguous one-line rendering:  unsigned integers as `u0x61`, signed
/// as `s-0x20000`, byte runs as `<61.62>`, sequences as `(u0x61 u0x62)`, the
/// unmatched-optional sentinel as `null`, and user values as `user(..)` around
/// their `Debug` form.
impl<U> Display for Value<U>
    where U: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint { value, .. } => write!(f, "u{:#x}", value),
            Value::Sint { value, .. } => {
                let sign = if *value < 0 { "-" } else { "" };
                write!(f, "s{}{:#x}", sign, value.unsigned_abs())
            }
            Value::Bytes(bytes) => {
                f.write_str("<")?;
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 { f.write_str(".")?; }
                    write!(f, "{:02x}", byte)?;
                }
                f.write_str(">")
            }
            Value::Seq(elems) => {
                f.write_str("(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 { f.write_str(" ")?; }
                    Display::fmt(elem, f)?;
                }
                f.write_str(")")
            }
            Value::None => f.write_str("null"),
            Value::User(user) => write!(f, "user({:?})", user),
        }
    }
}


#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    fn u8v(value: u64) -> Value { Value::Uint { value, bits: 8 } }

    #[test]
    fn rendering() {
        assert_eq!(u8v(0x61).to_string(), "u0x61");
        assert_eq!(Value::<()>::Sint { value: -0x20000, bits: 32 }.to_string(),
                   "s-0x20000");
        assert_eq!(Value::<()>::Sint { value: 5, bits: 8 }.to_string(), "s0x5");
        assert_eq!(Value::<()>::Sint { value: i64::MIN, bits: 64 }.to_string(),
                   "s-0x8000000000000000");
        assert_eq!(Value::<()>::bytes(b"9#\xa2").to_string(), "<39.23.a2>");
        assert_eq!(Value::<()>::bytes(b"").to_string(), "<>");
        assert_eq!(Value::seq(vec![u8v(0x61), Value::None, u8v(0x64)]).to_string(),
                   "(u0x61 null u0x64)");
        assert_eq!(Value::<()>::seq(vec![]).to_string(), "()");
        assert_eq!(Value::User(Rc::new(7_u32)).to_string(), "user(7)");
    }

    #[test]
    fn accessors() {
        let v = Value::seq(vec![u8v(1), Value::bytes(b"ab")]);
        assert_eq!(v.kind(), Kind::Seq);
        assert_eq!(v.as_seq().map(<[_]>::len), Some(2));
        assert_eq!(v.seq_index(0).and_then(Value::as_uint), Some(1));
        assert_eq!(v.seq_index(0).and_then(Value::bit_width), Some(8));
        assert_eq!(v.seq_index(1).and_then(Value::as_bytes), Some(&b"ab"[..]));
        assert_eq!(v.seq_index(2), None);
        assert_eq!(v.as_uint(), None);
        assert!(Value::<()>::None.is_none());
        assert_eq!(Value::User(Rc::new('x')).as_user(), Some(&'x'));
    }

    #[test]
    fn clone_shares_payloads() {
        struct NotClone;
        let v = Value::User(Rc::new(NotClone));
        let w = v.clone();
        match (&v, &w) {
            (Value::User(a), Value::User(b)) => assert!(Rc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn deep_drop() {
        let mut v = u8v(0);
        for _ in 0 .. 100_000 {
            v = Value::seq(vec![u8v(1), v]);
        }
        let shared = v.seq_index(1).cloned();
        drop(v);
        assert_eq!(shared.as_ref().and_then(|s| s.seq_index(0)).and_then(Value::as_uint),
                   Some(1));
        drop(shared);
    }
}
