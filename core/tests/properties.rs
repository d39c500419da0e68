//! Property-based tests of the primitives and of how repetition and options
//! consume input.

use proptest::prelude::*;

use kombi_core::{Endianness, Grammar, Kind};


proptest! {
    #[test]
    fn ch_matches_only_its_byte(b: u8, c: u8) {
        let mut g = Grammar::<()>::new();
        let p = g.ch(b);
        let parsed = g.parse(p, &[b]).unwrap().unwrap();
        prop_assert_eq!(parsed.value.unwrap().as_uint(), Some(u64::from(b)));
        prop_assert_eq!(parsed.bit_length, 8);
        if c != b {
            prop_assert_eq!(g.parse(p, &[c]).unwrap(), None);
        }
    }

    #[test]
    fn uint32_reads_big_endian(n: u32, short in 0_usize .. 4) {
        let mut g = Grammar::<()>::new();
        let p = g.uint32();
        let bytes = n.to_be_bytes();
        let parsed = g.parse(p, &bytes).unwrap().unwrap();
        prop_assert_eq!(parsed.value.unwrap().as_uint(), Some(u64::from(n)));
        prop_assert_eq!(g.parse(p, &bytes[.. short]).unwrap(), None);
    }

    #[test]
    fn uint32_reads_little_endian(n: u32) {
        let mut g = Grammar::<()>::new();
        let u = g.uint32();
        let p = g.with_endianness(Endianness::LITTLE, u);
        let parsed = g.parse(p, &n.to_le_bytes()).unwrap().unwrap();
        prop_assert_eq!(parsed.value.unwrap().as_uint(), Some(u64::from(n)));
    }

    #[test]
    fn int32_keeps_sign(n: i32) {
        let mut g = Grammar::<()>::new();
        let p = g.int32();
        let value = g.parse(p, &n.to_be_bytes()).unwrap().unwrap().value.unwrap();
        prop_assert_eq!(value.kind(), Kind::Sint);
        prop_assert_eq!(value.as_sint(), Some(i64::from(n)));
        prop_assert_eq!(value.bit_width(), Some(32));
    }

    #[test]
    fn many_never_fails(input: Vec<u8>) {
        let mut g = Grammar::<()>::new();
        let a = g.ch(b'a');
        let m = g.many(a);
        let parsed = g.parse(m, &input).unwrap().unwrap();
        let run = input.iter().take_while(|&&b| b == b'a').count();
        prop_assert_eq!(parsed.bit_length, run * 8);
        prop_assert_eq!(parsed.value.unwrap().as_seq().map(<[_]>::len), Some(run));
    }

    #[test]
    fn optional_of_a_failure_consumes_nothing(input in "[^x].*") {
        let mut g = Grammar::<()>::new();
        let x = g.ch(b'x');
        let o = g.optional(x);
        let parsed = g.parse(o, input.as_bytes()).unwrap().unwrap();
        prop_assert_eq!(parsed.bit_length, 0);
        prop_assert!(parsed.value.unwrap().is_none());
    }

    #[test]
    fn token_matches_its_prefixes_only(token in prop::collection::vec(any::<u8>(), 1 .. 8),
                                      rest: Vec<u8>)
    {
        let mut g = Grammar::<()>::new();
        let p = g.token(&token);
        let mut input = token.clone();
        input.extend(&rest);
        let parsed = g.parse(p, &input).unwrap().unwrap();
        prop_assert_eq!(parsed.byte_length(), token.len());
        let value = parsed.value.unwrap();
        prop_assert_eq!(value.as_bytes(), Some(&token[..]));
        prop_assert_eq!(g.parse(p, &token[.. token.len() - 1]).unwrap(), None);
    }
}

#[test]
fn many_of_empty_input() {
    let mut g = Grammar::<()>::new();
    let a = g.ch(b'a');
    let m = g.many(a);
    let parsed = g.parse(m, b"").unwrap().unwrap();
    assert_eq!(parsed.value.unwrap().to_string(), "()");
    assert_eq!(parsed.bit_length, 0);
}
