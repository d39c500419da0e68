use rstest::rstest;

use kombi::{BitOrder, ByteOrder, Endianness, Grammar};


#[rstest]
#[case::space(b" x")]
#[case::tab(b"\tx")]
#[case::newline(b"\nx")]
#[case::vertical_tab(b"\x0bx")]
#[case::form_feed(b"\x0cx")]
#[case::carriage_return(b"\rx")]
#[case::mixed(b" \t\r\n x")]
#[case::none(b"x")]
fn whitespace_is_skipped(#[case] input: &[u8]) {
    let mut g = Grammar::<()>::new();
    let x = g.ch(b'x');
    let ws_x = g.whitespace(x);
    let parsed = g.parse(ws_x, input).unwrap().unwrap();
    assert_eq!(parsed.byte_length(), input.len());
    assert_eq!(parsed.value.and_then(|v| v.as_uint()), Some(u64::from(b'x')));
}

#[rstest]
#[case::nul(b"\0x")]
#[case::underscore(b"_x")]
#[case::non_breaking(b"\xa0x")]
fn other_bytes_are_not_whitespace(#[case] input: &[u8]) {
    let mut g = Grammar::<()>::new();
    let x = g.ch(b'x');
    let ws_x = g.whitespace(x);
    assert_eq!(g.parse(ws_x, input).unwrap(), None);
}

#[rstest]
#[case(ByteOrder::Big, BitOrder::MsbFirst, 0x0102, 0xc)]
#[case(ByteOrder::Little, BitOrder::LsbFirst, 0x0201, 0x1)]
#[case(ByteOrder::Big, BitOrder::LsbFirst, 0x0102, 0x1)]
#[case(ByteOrder::Little, BitOrder::MsbFirst, 0x0201, 0xc)]
fn endianness(#[case] bytes: ByteOrder, #[case] bits: BitOrder,
              #[case] word: u64, #[case] five: u64)
{
    let e = Endianness::new(bytes, bits);
    let mut g = Grammar::<()>::new();
    let u16 = g.uint16();
    let u5 = g.bits(5, false).unwrap();
    let w = g.with_endianness(e, u16);
    let f = g.with_endianness(e, u5);
    assert_eq!(g.parse(w, b"\x01\x02").unwrap().unwrap().value.unwrap().as_uint(), Some(word));
    assert_eq!(g.parse(f, b"abcd").unwrap().unwrap().value.unwrap().as_uint(), Some(five));
}

#[rstest]
#[case(1, b"\x80", 1)]
#[case(7, b"\xfe", 0x7f)]
#[case(12, b"\xab\xcd", 0xabc)]
#[case(64, b"\xff\xff\xff\xff\xff\xff\xff\xff", u64::MAX)]
fn bit_widths(#[case] width: usize, #[case] input: &[u8], #[case] expected: u64) {
    let mut g = Grammar::<()>::new();
    let p = g.bits(width, false).unwrap();
    let parsed = g.parse(p, input).unwrap().unwrap();
    assert_eq!(parsed.value.unwrap().as_uint(), Some(expected));
    assert_eq!(parsed.bit_length, width);
}
