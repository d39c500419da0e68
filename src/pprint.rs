//! Multi-line rendering of value trees, for looking at large results.

use std::{fmt::Debug, io::{self, Write}};

use crate::Value;


/// Write `value` to `out` with one node per line.  Leaves are written in the
/// same form as by `Display` for [`Value`], indented by `indent` spaces.  A
/// sequence is written as a line with `[`, its elements indented by a further
/// `delta` spaces, and a line with `]`.
///
/// ```
/// use kombi::{Value, pprint::pprint};
///
/// let v = Value::<()>::seq(vec![Value::Uint { value: 0x61, bits: 8 }, Value::None]);
/// let mut out = Vec::new();
/// pprint(&mut out, &v, 0, 2).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "[\n  u0x61\n  null\n]\n");
/// ```
///
/// [`Value`]: ../../kombi_core/value/enum.Value.html
pub fn pprint<W, U>(out: &mut W, value: &Value<U>, indent: usize, delta: usize)
                    -> io::Result<()>
    where W: Write + ?Sized,
          U: Debug,
{
    match value {
        Value::Seq(elems) => {
            writeln!(out, "{:indent$}[", "", indent = indent)?;
            for elem in elems.iter() {
                pprint(out, elem, indent + delta, delta)?;
            }
            writeln!(out, "{:indent$}]", "", indent = indent)
        }
        leaf => writeln!(out, "{:indent$}{}", "", leaf, indent = indent),
    }
}

/// Like [`pprint`](fn.pprint.html) but into a new `String`.
pub fn pprint_to_string<U>(value: &Value<U>, indent: usize, delta: usize) -> String
    where U: Debug,
{
    let mut out = Vec::new();
    // Writing to a `Vec` cannot fail.
    let _ = pprint(&mut out, value, indent, delta);
    String::from_utf8_lossy(&out).into_owned()
}


#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn u(value: u64) -> Value<&'static str> {
        Value::Uint { value, bits: 8 }
    }

    #[test]
    fn nested() {
        let v = Value::seq(vec![
            u(1),
            Value::seq(vec![Value::bytes(b"ab"), Value::User(Rc::new("x"))]),
            Value::seq(vec![]),
            Value::Sint { value: -2, bits: 16 },
        ]);
        assert_eq!(pprint_to_string(&v, 1, 3), concat!(
            " [\n",
            "    u0x1\n",
            "    [\n",
            "       <61.62>\n",
            "       user(\"x\")\n",
            "    ]\n",
            "    [\n",
            "    ]\n",
            "    s-0x2\n",
            " ]\n"));
    }

    #[test]
    fn leaf() {
        assert_eq!(pprint_to_string(&Value::<()>::None, 4, 2), "    null\n");
    }
}
