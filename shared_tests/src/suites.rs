//! Suites of tests applied across multiple crates and memo tables


use super::*;
use super::utils::*;


/// Basic test suite that checks every leaf and combinator with grammars whose
/// values are not user values.
#[allow(clippy::too_many_lines)]
pub fn test_suite0<M>()
    where M: MemoTable<()> + Default,
{
    // The failure arm comes first, else `!` would be parsed as the start of
    // `$expected`, which fails hard instead of trying the next arm.
    macro_rules! test {
        ($g:expr, $p:expr, $input:expr =>!)
            =>
        {check_failed::<(), M>(&$g, $p, $input)};

        ($g:expr, $p:expr, $input:expr => $expected:expr)
            =>
        {check_match::<(), M>(&$g, $p, $input, $expected)};
    }

    // Byte leaves
    {
        let mut g = Grammar::new();
        let token = g.token(b"95\xa2");
        test!(g, token, b"95\xa2" => "<39.35.a2>");
        test!(g, token, b"95\xa2\xa2" => "<39.35.a2>");
        test!(g, token, b"95\xa3" =>!);
        test!(g, token, b"95" =>!);
        test!(g, token, b"" =>!);

        let ch = g.ch(0xa2);
        test!(g, ch, b"\xa2" => "u0xa2");
        test!(g, ch, b"\xa3" =>!);
        test!(g, ch, b"" =>!);

        let range = g.ch_range(b'a', b'c');
        test!(g, range, b"a" => "u0x61");
        test!(g, range, b"b" => "u0x62");
        test!(g, range, b"c" => "u0x63");
        test!(g, range, b"d" =>!);
        test!(g, range, b"`" =>!);

        let set = g.in_set(b"abc");
        test!(g, set, b"b" => "u0x62");
        test!(g, set, b"d" =>!);
        let not_set = g.not_in_set(b"abc");
        test!(g, not_set, b"d" => "u0x64");
        test!(g, not_set, b"a" =>!);
        test!(g, not_set, b"" =>!);
    }

    // Integer leaves
    {
        let mut g = Grammar::new();
        let int64 = g.int64();
        test!(g, int64, b"\xff\xff\xff\xfe\x00\x00\x00\x00" => "s-0x200000000");
        test!(g, int64, b"\xff\xff\xff\xfe\x00\x00\x00" =>!);
        let int32 = g.int32();
        test!(g, int32, b"\xff\xfe\x00\x00" => "s-0x20000");
        test!(g, int32, b"\x00\x02\x00\x00" => "s0x20000");
        test!(g, int32, b"\xff\xfe\x00" =>!);
        let int16 = g.int16();
        test!(g, int16, b"\xfe\x00" => "s-0x200");
        test!(g, int16, b"\xfe" =>!);
        let int8 = g.int8();
        test!(g, int8, b"\x88" => "s-0x78");
        test!(g, int8, b"" =>!);
        let uint64 = g.uint64();
        test!(g, uint64, b"\x00\x00\x00\x02\x00\x00\x00\x00" => "u0x200000000");
        test!(g, uint64, b"\x00\x00\x00\x02\x00\x00\x00" =>!);
        let uint32 = g.uint32();
        test!(g, uint32, b"\x00\x02\x00\x00" => "u0x20000");
        test!(g, uint32, b"\x00\x02\x00" =>!);
        let uint16 = g.uint16();
        test!(g, uint16, b"\x02\x00" => "u0x200");
        test!(g, uint16, b"\x02" =>!);
        let uint8 = g.uint8();
        test!(g, uint8, b"\x78" => "u0x78");
        test!(g, uint8, b"" =>!);

        let range = g.int_range(uint8, 3, 10).unwrap();
        test!(g, range, b"\x03" => "u0x3");
        test!(g, range, b"\x05" => "u0x5");
        test!(g, range, b"\x0a" => "u0xa");
        test!(g, range, b"\x0b" =>!);
        test!(g, range, b"\x02" =>!);
        let srange = g.int_range(int8, -5, 5).unwrap();
        test!(g, srange, b"\xfd" => "s-0x3");
        test!(g, srange, b"\xf0" =>!);
        let wide = g.int_range(uint64, 0, i64::MAX).unwrap();
        test!(g, wide, b"\x7f\xff\xff\xff\xff\xff\xff\xff" => "u0x7fffffffffffffff");
        test!(g, wide, b"\x80\x00\x00\x00\x00\x00\x00\x00" =>!);
    }

    // Bit-level leaves and endianness
    {
        let mut g = Grammar::new();
        let b3 = g.bits(3, false).unwrap();
        let b8 = g.bits(8, false).unwrap();
        let b5 = g.bits(5, false).unwrap();
        let bits = g.sequence(&[b3, b8, b5]);
        test!(g, bits, b"\x6a\x5a" => "(u0x3 u0x52 u0x1a)");
        test!(g, bits, b"\x6a" =>!);
        let little = g.with_endianness(Endianness::LITTLE, bits);
        test!(g, little, b"\x6a\x5a" => "(u0x2 u0x4d u0xb)");

        let s5 = g.bits(5, true).unwrap();
        test!(g, s5, b"\xf8" => "s-0x1");
        test!(g, s5, b"\x78" => "s0xf");

        let uint32 = g.uint32();
        let u5 = g.bits(5, false).unwrap();
        let orders = [
            (Endianness::new(ByteOrder::Big, BitOrder::MsbFirst), "u0x61626364", "u0xc"),
            (Endianness::new(ByteOrder::Little, BitOrder::LsbFirst), "u0x64636261", "u0x1"),
            (Endianness::new(ByteOrder::Big, BitOrder::LsbFirst), "u0x61626364", "u0x1"),
            (Endianness::new(ByteOrder::Little, BitOrder::MsbFirst), "u0x64636261", "u0xc"),
        ];
        test!(g, uint32, b"abcd" => "u0x61626364");
        test!(g, u5, b"abcd" => "u0xc");
        for &(e, word, five) in &orders {
            let w = g.with_endianness(e, uint32);
            test!(g, w, b"abcd" => word);
            let f = g.with_endianness(e, u5);
            test!(g, f, b"abcd" => five);
        }

        // The endianness is restored after leaving `with_endianness`.
        let uint16 = g.uint16();
        let le16 = g.with_endianness(Endianness::LITTLE, uint16);
        let both = g.sequence(&[le16, uint16, le16]);
        test!(g, both, b"\x01\x02\x01\x02\x01\x02" => "(u0x201 u0x102 u0x201)");

        // Byte leaves after an unaligned read
        let a = g.ch(b'a');
        let b4 = g.bits(4, false).unwrap();
        let shifted = g.sequence(&[b4, a, b4]);
        test!(g, shifted, b"\x06\x11" => "(u0x0 u0x61 u0x1)");
    }

    // Assertions and trivial parsers
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let end = g.end();
        let a_end = g.sequence(&[a, end]);
        test!(g, a_end, b"a" => "(u0x61)");
        test!(g, a_end, b"aa" =>!);
        test!(g, end, b"" => NO_VALUE);
        test!(g, end, b"a" =>!);

        let nothing = g.nothing();
        test!(g, nothing, b"a" =>!);
        test!(g, nothing, b"" =>!);

        let eps = g.epsilon();
        let b = g.ch(b'b');
        test!(g, eps, b"" => NO_VALUE);
        test!(g, eps, b"a" => NO_VALUE);
        let s1 = g.sequence(&[a, eps, b]);
        test!(g, s1, b"ab" => "(u0x61 u0x62)");
        let s2 = g.sequence(&[eps, a]);
        test!(g, s2, b"a" => "(u0x61)");
        let s3 = g.sequence(&[a, eps]);
        test!(g, s3, b"a" => "(u0x61)");
        let empty = g.sequence(&[]);
        test!(g, empty, b"xyz" => "()");
    }

    // Whitespace
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let ws_a = g.whitespace(a);
        test!(g, ws_a, b"a" => "u0x61");
        test!(g, ws_a, b" a" => "u0x61");
        test!(g, ws_a, b"  a" => "u0x61");
        test!(g, ws_a, b"\ta" => "u0x61");
        test!(g, ws_a, b"\r\n\x0b\x0ca" => "u0x61");
        test!(g, ws_a, b"_a" =>!);
        test!(g, ws_a, b"  " =>!);

        let end = g.end();
        let ws_end = g.whitespace(end);
        test!(g, ws_end, b"" => NO_VALUE);
        test!(g, ws_end, b"  " => NO_VALUE);
        test!(g, ws_end, b"  x" =>!);

        let b = g.ch(b'b');
        let ws_b = g.whitespace(b);
        let a_ws_b = g.sequence(&[a, ws_b]);
        test!(g, a_ws_b, b"a  b" => "(u0x61 u0x62)");
        test!(g, a_ws_b, b"ab" => "(u0x61 u0x62)");
        test!(g, a_ws_b, b"a  " =>!);
    }

    // Sequence and choice
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let b = g.ch(b'b');
        let c = g.ch(b'c');
        let seq = g.sequence(&[a, b]);
        test!(g, seq, b"ab" => "(u0x61 u0x62)");
        test!(g, seq, b"abc" => "(u0x61 u0x62)");
        test!(g, seq, b"a" =>!);
        test!(g, seq, b"b" =>!);

        let alt = g.choice(&[a, b]);
        test!(g, alt, b"a" => "u0x61");
        test!(g, alt, b"b" => "u0x62");
        test!(g, alt, b"ab" => "u0x61");
        test!(g, alt, b"c" =>!);

        // The first success wins even if a later one would match more.
        let ab = g.token(b"ab");
        let first = g.choice(&[a, ab]);
        let first_c = g.sequence(&[first, c]);
        test!(g, first_c, b"ac" => "(u0x61 u0x63)");
        test!(g, first_c, b"abc" =>!);

        // A sequence that fails part way does not consume what it matched.
        let abc = g.sequence(&[a, b, c]);
        let backtrack = g.choice(&[abc, ab]);
        test!(g, backtrack, b"abd" => "<61.62>");
    }

    // Pieces of sequences
    {
        let mut g = Grammar::new();
        let sp = g.ch(b' ');
        let a = g.ch(b'a');
        let left = g.left(a, sp);
        test!(g, left, b"a " => "u0x61");
        test!(g, left, b"a" =>!);
        test!(g, left, b" " =>!);
        test!(g, left, b"ab" =>!);

        let right = g.right(sp, a);
        test!(g, right, b" a" => "u0x61");
        test!(g, right, b"a" =>!);
        test!(g, right, b" " =>!);
        test!(g, right, b"ba" =>!);

        let middle = g.middle(sp, a, sp);
        test!(g, middle, b" a " => "u0x61");
        test!(g, middle, b"a" =>!);
        test!(g, middle, b" " =>!);
        test!(g, middle, b" a" =>!);
        test!(g, middle, b"a " =>!);
        test!(g, middle, b" b " =>!);
        test!(g, middle, b"ba " =>!);
        test!(g, middle, b" ab" =>!);
    }

    // Exclusions
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let ab = g.token(b"ab");
        let butnot = g.butnot(a, ab);
        test!(g, butnot, b"a" => "u0x61");
        test!(g, butnot, b"ab" =>!);
        test!(g, butnot, b"aa" => "u0x61");

        let digit = g.ch_range(b'0', b'9');
        let six = g.ch(b'6');
        let not_six = g.butnot(digit, six);
        test!(g, not_six, b"5" => "u0x35");
        test!(g, not_six, b"6" =>!);

        let difference = g.difference(ab, a);
        test!(g, difference, b"ab" => "<61.62>");
        test!(g, difference, b"a" =>!);
        let same = g.difference(ab, ab);
        test!(g, same, b"ab" =>!);

        let low = g.ch_range(b'0', b'6');
        let high = g.ch_range(b'5', b'9');
        let xor = g.xor(low, high);
        test!(g, xor, b"0" => "u0x30");
        test!(g, xor, b"9" => "u0x39");
        test!(g, xor, b"5" =>!);
        test!(g, xor, b"a" =>!);
    }

    // Repetition
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let b = g.ch(b'b');
        let ab = g.choice(&[a, b]);

        let many = g.many(ab);
        test!(g, many, b"" => "()");
        test!(g, many, b"a" => "(u0x61)");
        test!(g, many, b"b" => "(u0x62)");
        test!(g, many, b"aabbaba" =>
              "(u0x61 u0x61 u0x62 u0x62 u0x61 u0x62 u0x61)");
        test!(g, many, b"daabbabadef" => "()");

        let many1 = g.many1(ab);
        test!(g, many1, b"" =>!);
        test!(g, many1, b"a" => "(u0x61)");
        test!(g, many1, b"b" => "(u0x62)");
        test!(g, many1, b"aabbaba" =>
              "(u0x61 u0x61 u0x62 u0x62 u0x61 u0x62 u0x61)");
        test!(g, many1, b"daabbabadef" =>!);

        let repeat = g.repeat_n(ab, 2);
        test!(g, repeat, b"adef" =>!);
        test!(g, repeat, b"abdef" => "(u0x61 u0x62)");
        test!(g, repeat, b"dabdef" =>!);
        let zero = g.repeat_n(ab, 0);
        test!(g, zero, b"dabdef" => "()");

        // Zero-width iterations end the loop instead of spinning.
        let eps = g.epsilon();
        let many_eps = g.many(eps);
        test!(g, many_eps, b"abc" => "()");
        let many1_eps = g.many1(eps);
        test!(g, many1_eps, b"abc" =>!);
        let opt_a = g.optional(a);
        let many_opt = g.many(opt_a);
        test!(g, many_opt, b"aab" => "(u0x61 u0x61)");
        let repeat_eps = g.repeat_n(eps, 3);
        test!(g, repeat_eps, b"" => "()");

        // Values of `ignore`d elements are dropped.
        let ign = g.ignore(a);
        let many_ign = g.many(ign);
        test!(g, many_ign, b"aaa" => "()");
    }

    // Optional and ignore
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let b = g.ch(b'b');
        let c = g.ch(b'c');
        let d = g.ch(b'd');
        let bc = g.choice(&[b, c]);
        let opt = g.optional(bc);
        let seq = g.sequence(&[a, opt, d]);
        test!(g, seq, b"abd" => "(u0x61 u0x62 u0x64)");
        test!(g, seq, b"acd" => "(u0x61 u0x63 u0x64)");
        test!(g, seq, b"ad" => "(u0x61 null u0x64)");
        test!(g, seq, b"aed" =>!);
        test!(g, seq, b"ab" =>!);
        test!(g, seq, b"ac" =>!);
        test!(g, opt, b"x" => "null");

        let ign = g.ignore(b);
        let seq = g.sequence(&[a, ign, c]);
        test!(g, seq, b"abc" => "(u0x61 u0x63)");
        test!(g, seq, b"ac" =>!);
        test!(g, ign, b"b" => NO_VALUE);
    }

    // Separated lists
    {
        let mut g = Grammar::new();
        let digit = g.in_set(b"123");
        let comma = g.ch(b',');
        let sep_by = g.sep_by(digit, comma);
        test!(g, sep_by, b"1,2,3" => "(u0x31 u0x32 u0x33)");
        test!(g, sep_by, b"1,3,2" => "(u0x31 u0x33 u0x32)");
        test!(g, sep_by, b"1,3" => "(u0x31 u0x33)");
        test!(g, sep_by, b"3" => "(u0x33)");
        test!(g, sep_by, b"" => "()");
        test!(g, sep_by, b",1" => "()");

        let sep_by1 = g.sep_by1(digit, comma);
        test!(g, sep_by1, b"1,2,3" => "(u0x31 u0x32 u0x33)");
        test!(g, sep_by1, b"1,3,2" => "(u0x31 u0x33 u0x32)");
        test!(g, sep_by1, b"1,3" => "(u0x31 u0x33)");
        test!(g, sep_by1, b"3" => "(u0x33)");
        test!(g, sep_by1, b"" =>!);

        // A trailing separator is left unconsumed.
        let end = g.end();
        let whole = g.left(sep_by1, end);
        test!(g, whole, b"1,2" => "(u0x31 u0x32)");
        test!(g, whole, b"1,2," =>!);
    }

    // Lookahead
    {
        let mut g = Grammar::new();
        let zero = g.ch(b'0');
        let and_zero = g.and(zero);
        let seq = g.sequence(&[and_zero, zero]);
        test!(g, seq, b"0" => "(u0x30)");
        test!(g, seq, b"1" =>!);
        let parsed = g.parse_with::<M>(seq, b"0", &Config::default());
        assert_eq!(parsed.unwrap().map(|p| p.bit_length), Some(8));

        let one = g.ch(b'1');
        let two = g.ch(b'2');
        let and_two = g.and(two);
        let seq = g.sequence(&[one, and_two]);
        test!(g, seq, b"12" => "(u0x31)");
        test!(g, seq, b"13" =>!);

        let a = g.ch(b'a');
        let b = g.ch(b'b');
        let plus = g.token(b"+");
        let plus2 = g.token(b"++");
        let ops = g.choice(&[plus, plus2]);
        let not_1 = g.sequence(&[a, ops, b]);
        test!(g, not_1, b"a+b" => "(u0x61 <2b> u0x62)");
        test!(g, not_1, b"a++b" =>!);

        let plus_ch = g.ch(b'+');
        let not_plus = g.not(plus_ch);
        let lone_plus = g.sequence(&[plus_ch, not_plus]);
        let ops = g.choice(&[lone_plus, plus2]);
        let not_2 = g.sequence(&[a, ops, b]);
        test!(g, not_2, b"a+b" => "(u0x61 (u0x2b) u0x62)");
        test!(g, not_2, b"a++b" => "(u0x61 <2b.2b> u0x62)");
        test!(g, not_plus, b"" => NO_VALUE);
        test!(g, not_plus, b"+" =>!);
    }

    // Value transformations
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let b = g.ch(b'b');
        let ab = g.choice(&[a, b]);
        let many1 = g.many1(ab);
        let pair = g.attr_bool(many1, |v: &Value| {
            match v.as_seq() {
                Some([x, y]) => x == y,
                _ => false,
            }
        });
        test!(g, pair, b"aa" => "(u0x61 u0x61)");
        test!(g, pair, b"bb" => "(u0x62 u0x62)");
        test!(g, pair, b"ab" =>!);
        test!(g, pair, b"aaa" =>!);

        let upper_a = g.ch(b'A');
        let upper_b = g.ch(b'B');
        let either_a = g.choice(&[a, upper_a]);
        let either_b = g.choice(&[b, upper_b]);
        let both = g.sequence(&[either_a, either_b]);
        let upcase = g.map(both, |v: &Value| {
            Value::seq(v.as_seq().unwrap_or(&[]).iter().map(|e| match e.as_uint() {
                Some(c) => Value::Uint { value: c & !0x20, bits: 8 },
                None => e.clone(),
            }))
        });
        test!(g, upcase, b"ab" => "(u0x41 u0x42)");
        test!(g, upcase, b"AB" => "(u0x41 u0x42)");
        test!(g, upcase, b"aB" => "(u0x41 u0x42)");
        test!(g, upcase, b"XX" =>!);

        // A valueless success is given to the function as the sentinel.
        let eps = g.epsilon();
        let seen = g.map(eps, |v: &Value| Value::Uint { value: u64::from(v.is_none()), bits: 1 });
        test!(g, seen, b"" => "u0x1");
        let accept_none = g.attr_bool(eps, Value::is_none);
        test!(g, accept_none, b"" => NO_VALUE);
    }

    // Length-prefixed values
    {
        let mut g = Grammar::new();
        let uint8 = g.uint8();
        let lv = g.length_value(uint8, uint8);
        test!(g, lv, b"\x02ab" => "(u0x61 u0x62)");
        test!(g, lv, b"\x02abc" => "(u0x61 u0x62)");
        test!(g, lv, b"\x03ab" =>!);
        test!(g, lv, b"\x00" => "()");
        test!(g, lv, b"" =>!);

        let b4 = g.bits(4, false).unwrap();
        let nibbles = g.length_value(b4, b4);
        test!(g, nibbles, b"\x21\x20" => "(u0x1 u0x2)");

        let eps = g.epsilon();
        let no_progress = g.length_value(uint8, eps);
        test!(g, no_progress, b"\x00" => "()");
        test!(g, no_progress, b"\xff" =>!);

        let int8 = g.int8();
        let signed = g.length_value(int8, uint8);
        assert_eq!(unamb::<(), M>(&g, signed, b"\x01a"), Err(Error::NotALength(int8)));
    }

    // Permutation
    {
        let mut g = Grammar::new();
        let a = g.ch(b'a');
        let b = g.ch(b'b');
        let c = g.ch(b'c');
        let perm = g.permutation(&[a, b, c]);
        for input in [&b"abc"[..], &b"acb"[..], &b"bac"[..], &b"bca"[..], &b"cab"[..], &b"cba"[..]] {
            test!(g, perm, input => "(u0x61 u0x62 u0x63)");
        }
        test!(g, perm, b"a" =>!);
        test!(g, perm, b"ab" =>!);
        test!(g, perm, b"abb" =>!);

        let opt_c = g.optional(c);
        let perm = g.permutation(&[a, b, opt_c]);
        for input in [&b"abc"[..], &b"acb"[..], &b"bac"[..], &b"bca"[..], &b"cab"[..], &b"cba"[..]] {
            test!(g, perm, input => "(u0x61 u0x62 u0x63)");
        }
        test!(g, perm, b"ab" => "(u0x61 u0x62 null)");
        test!(g, perm, b"ba" => "(u0x61 u0x62 null)");
        test!(g, perm, b"a" =>!);
        test!(g, perm, b"b" =>!);
        test!(g, perm, b"c" =>!);
        test!(g, perm, b"ca" =>!);

        let perm = g.permutation(&[opt_c, a, b]);
        test!(g, perm, b"ab" => "(null u0x61 u0x62)");
        test!(g, perm, b"bac" => "(u0x63 u0x61 u0x62)");
        test!(g, perm, b"cab" => "(u0x63 u0x61 u0x62)");
        test!(g, perm, b"c" =>!);
    }

    // Recursion
    {
        let mut g = Grammar::new();
        let rr = right_recursive(&mut g);
        test!(g, rr, b"a" => "(u0x61)");
        test!(g, rr, b"aa" => "(u0x61 (u0x61))");
        test!(g, rr, b"aaa" => "(u0x61 (u0x61 (u0x61)))");
        test!(g, rr, b"" => NO_VALUE);
        let depth = 100;
        test!(g, rr, &vec![b'a'; depth] => &right_recursive_expected(depth));

        let lr = left_recursive(&mut g);
        assert_eq!(unamb::<(), M>(&g, lr, b"d+d"),
                   Err(Error::LeftRecursion { parser: lr, offset: 0 }));
        assert_eq!(unamb::<(), M>(&g, lr, b"d"),
                   Err(Error::LeftRecursion { parser: lr, offset: 0 }));

        let unbound = g.indirect();
        let a = g.ch(b'a');
        let guarded = g.sequence(&[a, unbound]);
        assert_eq!(unamb::<(), M>(&g, guarded, b"aa"), Err(Error::Unbound(unbound)));
        test!(g, guarded, b"b" =>!);

        let mut other = Grammar::<()>::new();
        let foreign = other.ch(b'a');
        assert_eq!(unamb::<(), M>(&g, foreign, b"a"), Err(Error::ForeignParser(foreign)));
    }
}


/// Test suite that checks `action`s and the user values they produce.
pub fn test_suite1<M>()
    where M: MemoTable<Sample> + Default,
{
    // The failure arm comes first, else `!` would be parsed as the start of
    // `$expected`, which fails hard instead of trying the next arm.
    macro_rules! test {
        ($g:expr, $p:expr, $input:expr =>!)
            =>
        {check_failed::<Sample, M>(&$g, $p, $input)};

        ($g:expr, $p:expr, $input:expr => $expected:expr)
            =>
        {check_match::<Sample, M>(&$g, $p, $input, $expected)};
    }

    let mut g = Grammar::<Sample>::new();
    let digit = g.ch_range(b'0', b'9');
    let digits = g.many1(digit);
    let number = g.action(digits, |v| Sample::Number(digits_to_number(v)));
    test!(g, number, b"0" => "user(Number(0))");
    test!(g, number, b"123" => "user(Number(123))");
    test!(g, number, b"42x" => "user(Number(42))");
    test!(g, number, b"x" =>!);

    let comma = g.ch(b',');
    let ws_comma = g.whitespace(comma);
    let ws_number = g.whitespace(number);
    let numbers = g.sep_by(ws_number, ws_comma);
    test!(g, numbers, b"1, 22 ,333" =>
          "(user(Number(1)) user(Number(22)) user(Number(333)))");

    let small = g.attr_bool(number, |v| matches!(v.as_user(), Some(Sample::Number(n)) if *n < 100));
    test!(g, small, b"99" => "user(Number(99))");
    test!(g, small, b"100" =>!);

    let letter = g.ch_range(b'a', b'z');
    let letters = g.many1(letter);
    let word = g.action(letters, |v| {
        Sample::Word(v.as_seq().unwrap_or(&[]).iter()
                      .filter_map(Value::as_uint)
                      .map(|c| c as u8)
                      .collect())
    });
    let item = g.choice(&[number, word]);
    let ws_item = g.whitespace(item);
    let items = g.sep_by1(ws_item, ws_comma);
    test!(g, items, b"abc, 7" => "(user(Word([97, 98, 99])) user(Number(7)))");

    let eps = g.epsilon();
    let had_value = g.action(eps, |v| Sample::HadValue(!v.is_none()));
    test!(g, had_value, b"" => "user(HadValue(false))");
    let had_value = g.action(digit, |v| Sample::HadValue(!v.is_none()));
    test!(g, had_value, b"5" => "user(HadValue(true))");

    // A user value can be taken apart again.
    let parsed = g.parse_with::<M>(number, b"77", &Config::default()).unwrap().unwrap();
    assert_eq!(parsed.value.as_ref().and_then(Value::as_user), Some(&Sample::Number(77)));
    assert_eq!(parsed.byte_length(), 2);
}
