//! Utilities for constructing grammars and inputs of various shapes.

use std::env;

use kombi_core::*;


/// This allows passing an `input-size=$SIZE` command-line argument to the
/// tests
pub fn get_arg_input_size() -> usize {
    // Big enough that recursing per element would blow the stack
    const DEFAULT: usize = 1 << 20;
    env::args().find_map(
        |arg|
        match *arg.splitn(2, '=').collect::<Vec<_>>() {
            ["input-size", size] => size.parse().ok(),
            _ => None
        }
    ).unwrap_or(DEFAULT)
}

/// `P := 'a' P | epsilon`, which nests one sequence per `a`.
pub fn right_recursive<U>(g: &mut Grammar<U>) -> Parser {
    let p = g.indirect();
    let a = g.ch(b'a');
    let ap = g.sequence(&[a, p]);
    let eps = g.epsilon();
    let alt = g.choice(&[ap, eps]);
    g.bind_indirect(p, alt).unwrap();
    p
}

/// `E := E '+' E | 'd'`, which is left-recursive.
pub fn left_recursive<U>(g: &mut Grammar<U>) -> Parser {
    let e = g.indirect();
    let plus = g.ch(b'+');
    let d = g.ch(b'd');
    let sum = g.sequence(&[e, plus, e]);
    let alt = g.choice(&[sum, d]);
    g.bind_indirect(e, alt).unwrap();
    e
}

/// The rendering of what [`right_recursive`](fn.right_recursive.html) gives
/// for `depth` `a`s.
pub fn right_recursive_expected(depth: usize) -> String {
    let mut s = String::new();
    for i in 0 .. depth {
        if i > 0 { s.push(' '); }
        s.push_str("(u0x61");
    }
    s.push_str(&")".repeat(depth));
    s
}

/// A user value type for exercising `action`s.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Sample {
    /// Digits made into a number
    Number(u64),
    /// Whether the inner parser had a value
    HadValue(bool),
    /// Some bytes
    Word(Vec<u8>),
}

/// Make the digits of a sequence of `u8` values into a decimal number.
pub fn digits_to_number<U>(v: &Value<U>) -> u64 {
    v.as_seq().unwrap_or(&[]).iter()
     .filter_map(Value::as_uint)
     .fold(0, |n, d| n * 10 + (d - u64::from(b'0')))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_rendering() {
        assert_eq!(right_recursive_expected(1), "(u0x61)");
        assert_eq!(right_recursive_expected(3), "(u0x61 (u0x61 (u0x61)))");
    }
}
