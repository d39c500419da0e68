//! Property-based tests of the entry points of the full crate.

use std::{convert::TryFrom, io::Cursor};

use proptest::{collection::vec, prelude::*};

use kombi::{Grammar, common::{inmem, stream}};


fn bytes_of(value: &kombi::Value) -> Option<Vec<u8>> {
    value.as_seq()?
         .iter()
         .map(|elem| elem.as_uint().and_then(|n| u8::try_from(n).ok()))
         .collect()
}

proptest! {
    #[test]
    fn reader_gives_what_slice_gives(input in vec(any::<u8>(), 0 .. 256)) {
        let mut g = Grammar::<()>::new();
        let byte = g.uint8();
        let p = g.many(byte);
        let from_reader = stream::parse_reader(&g, p, Cursor::new(&input)).unwrap().unwrap();
        let from_slice = inmem::parse(&g, p, &input).unwrap().unwrap();
        prop_assert_eq!(from_reader.bit_length, from_slice.bit_length);
        prop_assert_eq!(&from_reader.value, &from_slice.value);
        prop_assert_eq!(from_reader.value.as_ref().and_then(bytes_of), Some(input));
    }

    #[test]
    fn length_value_reads_its_count(payload in vec(any::<u8>(), 0 .. 64),
                                    extra in vec(any::<u8>(), 0 .. 4))
    {
        let mut g = Grammar::<()>::new();
        let length = g.uint8();
        let element = g.uint8();
        let p = g.length_value(length, element);
        let mut input = vec![payload.len() as u8];
        input.extend(&payload);
        input.extend(&extra);
        let parsed = stream::parse_reader(&g, p, &input[..]).unwrap().unwrap();
        prop_assert_eq!(parsed.byte_length(), 1 + payload.len());
        prop_assert_eq!(parsed.value.as_ref().and_then(bytes_of), Some(payload.clone()));
        if !payload.is_empty() {
            let short = &input[.. payload.len()];
            prop_assert!(stream::parse_reader(&g, p, short).unwrap().is_none());
        }
    }
}
