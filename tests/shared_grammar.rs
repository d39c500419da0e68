//! A built grammar is immutable, so it can be shared by threads that each parse
//! their own inputs.

use std::{sync::Arc, thread};

use kombi::{Grammar, Value, common::inmem};


#[test]
fn parse_from_many_threads() {
    let mut g = Grammar::<()>::new();
    let digit = g.ch_range(b'0', b'9');
    let digits = g.many1(digit);
    let number = g.map(digits, |v| {
        let n = v.as_seq().unwrap_or(&[]).iter()
                 .filter_map(Value::as_uint)
                 .fold(0, |n, d| n * 10 + (d - u64::from(b'0')));
        Value::Uint { value: n, bits: 64 }
    });
    let comma = g.ch(b',');
    let list = g.sep_by(number, comma);
    let end = g.end();
    let all = g.left(list, end);
    let g = Arc::new(g);

    let handles = (0 .. 8_u64).map(|i| {
        let g = Arc::clone(&g);
        thread::spawn(move || {
            let input = (0 ..= i).map(|n| (n * 11).to_string()).collect::<Vec<_>>().join(",");
            let parsed = inmem::parse(&g, all, input.as_bytes()).unwrap().unwrap();
            parsed.value.unwrap().as_seq().unwrap()
                  .iter().filter_map(Value::as_uint).sum::<u64>()
        })
    }).collect::<Vec<_>>();

    for (i, handle) in (0_u64 ..).zip(handles) {
        assert_eq!(handle.join().unwrap(), 11 * i * (i + 1) / 2);
    }
}
