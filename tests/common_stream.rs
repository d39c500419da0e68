use std::io::{self, Cursor, Read};

use kombi::{Config, Endianness, Error, Grammar, ReadError, common::stream};


/// Gives its bytes a few at a time, like a pipe would.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.0.len().min(buf.len()).min(3);
        buf[.. n].copy_from_slice(&self.0[.. n]);
        self.0 = &self.0[n ..];
        Ok(n)
    }
}

struct Failing;

impl Read for Failing {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "gone"))
    }
}


#[test]
fn whole_input_is_read() {
    let mut g = Grammar::<()>::new();
    let letter = g.ch_range(b'a', b'z');
    let word = g.many1(letter);
    let end = g.end();
    let all = g.left(word, end);

    let parsed = stream::parse_reader(&g, all, Trickle(b"abcdefghij")).unwrap().unwrap();
    assert_eq!(parsed.byte_length(), 10);
    assert_eq!(stream::parse_reader(&g, all, Cursor::new(b"abc1")).unwrap(), None);
}

#[test]
fn configured() {
    let mut g = Grammar::<()>::new();
    let n = g.uint16();
    let config = Config::new().with_endianness(Endianness::LITTLE);
    let parsed = stream::parse_reader_with(&g, n, Cursor::new(vec![1, 2]), &config)
        .unwrap().unwrap();
    assert_eq!(parsed.value.unwrap().as_uint(), Some(0x201));
}

#[test]
fn errors() {
    let mut g = Grammar::<()>::new();
    let a = g.ch(b'a');
    match stream::parse_reader(&g, a, Failing) {
        Err(ReadError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("unexpected {:?}", other),
    }

    let i = g.indirect();
    let err = stream::parse_reader(&g, i, Cursor::new(b"a")).unwrap_err();
    assert!(matches!(err, ReadError::Parse(Error::Unbound(p)) if p == i));
    assert_eq!(err.to_string(), Error::Unbound(i).to_string());
}
