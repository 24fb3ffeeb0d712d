//! Variable width codes packed least significant bit first.
use crate::sink::Output;
use crate::{Code, MAX_CODESIZE, MIN_CODESIZE};

/// Packs codes into bytes.
pub(crate) struct BitWriter {
    /// The current code length.
    code_size: u8,
    /// The buffer bits.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
}

/// Unpacks codes from a byte slice.
pub(crate) struct BitReader<'a> {
    inp: &'a [u8],
    /// The current code length.
    code_size: u8,
    /// The buffer bits, the next code starts at the least significant bit.
    buffer: u64,
    /// The number of valid buffer bits.
    bits: u8,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        BitWriter {
            code_size: MIN_CODESIZE,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Return to the initial code size. Pending bits are kept.
    pub(crate) fn reset(&mut self) {
        self.code_size = MIN_CODESIZE;
    }

    /// Append the low `code_size` bits of `code`.
    pub(crate) fn write_code<O: Output>(&mut self, code: Code, out: &mut O) -> Result<(), O::Error> {
        debug_assert!(u32::from(code) < 1 << self.code_size);
        if self.bits_in_buffer + self.code_size > 64 {
            self.flush_out(out)?;
        }
        self.buffer |= u64::from(code) << self.bits_in_buffer;
        self.bits_in_buffer += self.code_size;
        Ok(())
    }

    /// Pad to a full byte with zero bits and write out everything.
    pub(crate) fn finish<O: Output>(&mut self, out: &mut O) -> Result<(), O::Error> {
        let to_byte = self.bits_in_buffer.wrapping_neg() & 0x7;
        self.bits_in_buffer += to_byte;
        self.flush_out(out)
    }

    /// Flush all full bytes.
    fn flush_out<O: Output>(&mut self, out: &mut O) -> Result<(), O::Error> {
        let count = self.bits_in_buffer / 8;
        match out.claim(usize::from(count))? {
            Some(bytes) => {
                for b in bytes {
                    *b = (self.buffer & 0xff) as u8;
                    self.buffer >>= 8;
                }
            }
            None => {
                for _ in 0..count {
                    self.buffer >>= 8;
                }
            }
        }
        self.bits_in_buffer -= count * 8;
        Ok(())
    }

    pub(crate) fn bump_code_size(&mut self) {
        if self.code_size < MAX_CODESIZE {
            self.code_size += 1;
        }
    }

    /// The largest code representable with the current code size.
    pub(crate) fn max_code(&self) -> Code {
        (1 << self.code_size) - 1
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(inp: &'a [u8]) -> Self {
        BitReader {
            inp,
            code_size: MIN_CODESIZE,
            buffer: 0,
            bits: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.code_size = MIN_CODESIZE;
    }

    /// Read the next code, `None` if the input does not hold enough bits.
    pub(crate) fn next_code(&mut self) -> Option<Code> {
        if self.bits < self.code_size {
            self.refill_bits();
        }

        if self.bits < self.code_size {
            return None;
        }

        let mask = (1u64 << self.code_size) - 1;
        let code = (self.buffer & mask) as Code;
        self.buffer >>= self.code_size;
        self.bits -= self.code_size;
        Some(code)
    }

    fn refill_bits(&mut self) {
        let wish_count = usize::from((64 - self.bits) / 8);
        let mut buffer = [0u8; 8];
        let new_bits = match self.inp.get(..wish_count) {
            Some(bytes) => {
                buffer[..wish_count].copy_from_slice(bytes);
                self.inp = &self.inp[wish_count..];
                wish_count * 8
            }
            None => {
                let new_bits = self.inp.len() * 8;
                buffer[..self.inp.len()].copy_from_slice(self.inp);
                self.inp = &[];
                new_bits
            }
        };
        self.buffer |= u64::from_le_bytes(buffer) << self.bits;
        self.bits += new_bits as u8;
    }

    pub(crate) fn bump_code_size(&mut self) {
        if self.code_size < MAX_CODESIZE {
            self.code_size += 1;
        }
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }
}

#[cfg(test)]
mod tests {
    use super::{BitReader, BitWriter};
    use crate::sink::{Counter, Output, Sink};

    #[test]
    fn codes_straddle_bytes() {
        let codes = [0x1ffu16, 0, 0x155, 0x0aa, 0x100, 1];
        let mut out = [0u8; 8];
        let mut sink = Sink::new(&mut out);
        let mut writer = BitWriter::new();
        for &code in &codes {
            writer.write_code(code, &mut sink).unwrap();
        }
        writer.finish(&mut sink).unwrap();
        // 6 codes of 9 bits make 54 bits, padded to 7 bytes.
        assert_eq!(sink.produced(), 7);

        let mut reader = BitReader::new(&out[..7]);
        for &code in &codes {
            assert_eq!(reader.next_code(), Some(code));
        }
        // Two bits of padding are not a code.
        assert_eq!(reader.next_code(), None);
    }

    #[test]
    fn width_changes_midstream() {
        let mut out = vec![0u8; 64];
        let mut sink = Sink::new(&mut out);
        let mut writer = BitWriter::new();
        let mut expected = vec![];
        for round in 0..4u16 {
            let code = writer.max_code() - round;
            expected.push((writer.code_size(), code));
            writer.write_code(code, &mut sink).unwrap();
            writer.bump_code_size();
        }
        writer.reset();
        writer.write_code(0x101, &mut sink).unwrap();
        expected.push((9, 0x101));
        writer.finish(&mut sink).unwrap();
        let len = sink.produced();
        // 9 + 10 + 11 + 12 + 9 bits.
        assert_eq!(len, 7);

        let mut reader = BitReader::new(&out[..len]);
        for (i, &(size, code)) in expected.iter().enumerate() {
            if i == 4 {
                reader.reset();
            }
            assert_eq!(reader.code_size(), size);
            assert_eq!(reader.next_code(), Some(code));
            reader.bump_code_size();
        }
    }

    #[test]
    fn code_size_is_capped() {
        let mut writer = BitWriter::new();
        for _ in 0..10 {
            writer.bump_code_size();
        }
        assert_eq!(writer.code_size(), crate::MAX_CODESIZE);
        assert_eq!(writer.max_code(), 4095);
    }

    #[test]
    fn many_codes_flush_through_the_buffer() {
        let codes: Vec<u16> = (0..1000u16).map(|i| (i * 37) & 0x1ff).collect();
        let mut counter = Counter::default();
        let mut writer = BitWriter::new();
        for &code in &codes {
            writer.write_code(code, &mut counter).unwrap();
        }
        writer.finish(&mut counter).unwrap();
        assert_eq!(counter.produced(), (1000 * 9 + 7) / 8);

        let mut out = vec![0u8; counter.produced()];
        let mut sink = Sink::new(&mut out);
        let mut writer = BitWriter::new();
        for &code in &codes {
            writer.write_code(code, &mut sink).unwrap();
        }
        writer.finish(&mut sink).unwrap();

        let mut reader = BitReader::new(&out);
        let read: Vec<u16> = core::iter::from_fn(|| reader.next_code()).collect();
        assert_eq!(read, codes);
    }
}
