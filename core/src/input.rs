//! Reading integers of any bit width from input bytes, in any byte order and
//! bit order.

/// The order in which the bytes of a multi-byte integer are assembled.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ByteOrder {
    /// The first byte read is the most significant
    Big,
    /// The first byte read is the least significant
    Little,
}

/// The order in which the bits of a single byte are consumed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BitOrder {
    /// The most significant bit of a byte is read first
    MsbFirst,
    /// The least significant bit of a byte is read first
    LsbFirst,
}

/// The combination of a [`ByteOrder`](enum.ByteOrder.html) and a
/// [`BitOrder`](enum.BitOrder.html) that the integer leaves read with.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Endianness {
    /// How the bytes of an integer are assembled
    pub bytes: ByteOrder,
    /// How the bits within each byte are consumed
    pub bits: BitOrder,
}

impl Endianness {
    /// Big-endian bytes, most significant bit first.  The default.
    pub const BIG: Self = Self::new(ByteOrder::Big, BitOrder::MsbFirst);
    /// Little-endian bytes, least significant bit first.
    pub const LITTLE: Self = Self::new(ByteOrder::Little, BitOrder::LsbFirst);

    /// Combine the given orders.
    #[inline]
    pub const fn new(bytes: ByteOrder, bits: BitOrder) -> Self {
        Self { bytes, bits }
    }
}

impl Default for Endianness {
    #[inline]
    fn default() -> Self {
        Self::BIG
    }
}


/// A position, counted in bits, in an immutable input, plus the endianness to
/// read at it with.
///
/// It is `Copy` so that backtracking is simply using an older copy.
#[derive(Copy, Clone, Debug)]
pub struct Cursor<'i> {
    input: &'i [u8],
    pos: usize,
    endianness: Endianness,
}

impl<'i> Cursor<'i> {
    /// Make a new cursor at bit offset `pos` of `input`.
    #[inline]
    pub fn new(input: &'i [u8], pos: usize, endianness: Endianness) -> Self {
        Self { input, pos, endianness }
    }

    /// The current bit offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// How many bits remain after the current offset.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len().saturating_mul(8).saturating_sub(self.pos)
    }

    /// Whether no bits remain.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `count` bits, `count` being at most 64, and advance past them.  The
    /// bits are assembled according to our endianness.  Returns `None`, and
    /// does not advance, if fewer than `count` bits remain.
    pub fn read(&mut self, count: usize) -> Option<u64> {
        if count > 64 || count > self.remaining() {
            return None;
        }
        let mut out: u64 = 0;
        let mut shift = 0;
        let mut left = count;
        while left > 0 {
            let byte = u64::from(self.input[self.pos / 8]);
            let used = self.pos % 8;
            let avail = 8 - used;
            let take = avail.min(left);
            let mask = (1_u64 << take) - 1;
            let seg = match self.endianness.bits {
                BitOrder::MsbFirst => (byte >> (avail - take)) & mask,
                BitOrder::LsbFirst => (byte >> used) & mask,
            };
            match self.endianness.bytes {
                ByteOrder::Big => out = (out << take) | seg,
                ByteOrder::Little => {
                    out |= seg << shift;
                    shift += take;
                }
            }
            self.pos += take;
            left -= take;
        }
        Some(out)
    }

    /// Read `count` bits as a two's-complement integer, sign-extended.
    pub fn read_signed(&mut self, count: usize) -> Option<i64> {
        let raw = self.read(count)?;
        Some(sign_extend(raw, count))
    }

    /// Read one whole byte's worth of bits.
    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        self.read(8).map(|b| b as u8)
    }
}

#[allow(clippy::cast_possible_wrap)]
fn sign_extend(raw: u64, count: usize) -> i64 {
    if count == 0 || count >= 64 {
        return raw as i64;
    }
    let sign = 1_u64 << (count - 1);
    if raw & sign == 0 {
        raw as i64
    } else {
        (raw | !((1_u64 << count) - 1)) as i64
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn reads(input: &[u8], e: Endianness, counts: &[usize]) -> alloc::vec::Vec<u64> {
        let mut cursor = Cursor::new(input, 0, e);
        counts.iter().map(|&n| cursor.read(n).unwrap()).collect()
    }

    #[test]
    fn big_endian_bits() {
        assert_eq!(reads(b"\x6A\x5A", Endianness::BIG, &[3, 8, 5]),
                   [0x3, 0x52, 0x1A]);
    }

    #[test]
    fn little_endian_bits() {
        assert_eq!(reads(b"\x6A\x5A", Endianness::LITTLE, &[3, 8, 5]),
                   [0x2, 0x4D, 0x0B]);
    }

    #[test]
    fn mixed_orders() {
        let bl = Endianness::new(ByteOrder::Big, BitOrder::LsbFirst);
        let lb = Endianness::new(ByteOrder::Little, BitOrder::MsbFirst);
        assert_eq!(reads(b"abcd", bl, &[32]), [0x6162_6364]);
        assert_eq!(reads(b"abcd", lb, &[32]), [0x6463_6261]);
        assert_eq!(reads(b"abcd", bl, &[5]), [0x1]);
        assert_eq!(reads(b"abcd", lb, &[5]), [0xc]);
    }

    #[test]
    fn overrun() {
        let mut cursor = Cursor::new(b"\x01", 0, Endianness::BIG);
        assert_eq!(cursor.read(9), None);
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.read(7), Some(0));
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.read(1), Some(1));
        assert!(cursor.at_end());
        assert_eq!(cursor.read_byte(), None);
    }

    #[test]
    fn remaining_saturates() {
        let input = [0_u8; 4];
        assert_eq!(Cursor::new(&input, 0, Endianness::BIG).remaining(), 32);
        let past = Cursor::new(&input, 40, Endianness::BIG);
        assert_eq!(past.remaining(), 0);
        assert!(past.at_end());
        let mut far = Cursor::new(&input, usize::MAX, Endianness::LITTLE);
        assert_eq!(far.remaining(), 0);
        assert_eq!(far.read(1), None);
        assert_eq!(far.pos(), usize::MAX);
    }

    #[test]
    fn signed() {
        assert_eq!(Cursor::new(b"\x88", 0, Endianness::BIG).read_signed(8),
                   Some(-0x78));
        assert_eq!(Cursor::new(b"\xff\xff\xff\xfe\0\0\0\0", 0, Endianness::BIG)
                       .read_signed(64),
                   Some(-0x2_0000_0000));
        assert_eq!(Cursor::new(b"\xe0", 0, Endianness::BIG).read_signed(3),
                   Some(-1));
        assert_eq!(Cursor::new(b"\x60", 0, Endianness::BIG).read_signed(3),
                   Some(3));
    }
}
