//! A module for all decoding needs.
use crate::bits::BitReader;
use crate::sink::{Counter, Output, Sink};
use crate::{Code, ControlCode, Error, CODE_LIMIT, FIRST_CODE, RUN_UNIT};

use log::{debug, trace};

/// Decompresses whole code streams.
///
/// Like the encoder, the decoder keeps its table storage between calls but starts every call
/// from a fresh dictionary.
pub struct Decoder {
    table: Table,
}

#[derive(Clone, Copy)]
struct Link {
    prev: Code,
    byte: u8,
}

struct DecodeState<'t, 'i> {
    /// The table of decoded codes.
    table: &'t mut Table,
    /// The code stream.
    reader: BitReader<'i>,
    /// The code read before, whose entry is still to be completed. Absent after a reset.
    last: Option<Code>,
    resets: usize,
}

/// The dictionary, indexed by code.
struct Table {
    inner: Vec<Link>,
    depths: Vec<u16>,
}

impl Decoder {
    /// A decoder with room for a full table.
    pub fn new() -> Self {
        Decoder {
            table: Table::new(),
        }
    }

    /// Decompress `inp` into `out`, returning the number of bytes written.
    pub fn decode_into(&mut self, inp: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        self.decode_to(inp, &mut Sink::new(out))
    }

    /// The exact decompressed size of `inp`.
    ///
    /// This reads the whole code stream, there is no shortcut.
    pub fn decoded_len(&mut self, inp: &[u8]) -> Result<usize, Error> {
        self.decode_to(inp, &mut Counter::default())
    }

    /// Decompress `inp` into a new vector.
    pub fn decode_to_vec(&mut self, inp: &[u8]) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.decode_to(inp, &mut out)?;
        Ok(out)
    }

    fn decode_to<O: Output>(&mut self, inp: &[u8], out: &mut O) -> Result<usize, Error>
    where
        Error: From<O::Error>,
    {
        let start = out.produced();
        let mut state = DecodeState::new(&mut self.table, inp);
        state.decode(out)?;
        let written = out.produced() - start;
        debug!(
            "decompressed {} bytes into {} bytes ({} resets)",
            inp.len(),
            written,
            state.resets,
        );
        Ok(written)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl<'t, 'i> DecodeState<'t, 'i> {
    fn new(table: &'t mut Table, inp: &'i [u8]) -> Self {
        table.clear();
        DecodeState {
            table,
            reader: BitReader::new(inp),
            last: None,
            resets: 0,
        }
    }

    fn decode<O: Output>(&mut self, out: &mut O) -> Result<(), Error>
    where
        Error: From<O::Error>,
    {
        loop {
            let code = self.next_symbol()?;
            match ControlCode::from_code(code) {
                Some(ControlCode::Stop) => return Ok(()),
                Some(ControlCode::Reset) => self.reset_tables(),
                Some(ControlCode::Rle) => self.expand_run(out)?,
                None => self.expand_code(code, out)?,
            }
        }
    }

    fn next_symbol(&mut self) -> Result<Code, Error> {
        self.reader
            .next_code()
            .ok_or(Error::CorruptStream("no end marker before the end of input"))
    }

    fn reset_tables(&mut self) {
        self.table.clear();
        self.reader.reset();
        self.last = None;
        self.resets += 1;
    }

    fn expand_run<O: Output>(&mut self, out: &mut O) -> Result<(), Error>
    where
        Error: From<O::Error>,
    {
        let count = self.next_symbol()?;
        let byte = self.next_symbol()?;
        let byte = u8::try_from(byte).map_err(|_| Error::CorruptStream("run of a byte above 255"))?;
        trace!("run of {} bytes of {:#04x}", usize::from(count) * RUN_UNIT, byte);

        // The encoder defined the entry for the code before the run with the run's byte.
        if let Some(last) = self.last.take() {
            self.table.derive(last, byte);
        }

        out.fill(byte, usize::from(count) * RUN_UNIT)?;
        Ok(())
    }

    fn expand_code<O: Output>(&mut self, code: Code, out: &mut O) -> Result<(), Error>
    where
        Error: From<O::Error>,
    {
        let next_code = self.table.next_code();
        match self.last {
            None if code < next_code => {
                self.table.reconstruct(code, out)?;
            }
            None => return Err(Error::CorruptStream("code not yet in the dictionary")),
            Some(last) => {
                let cha = if code < next_code {
                    self.table.reconstruct(code, out)?
                } else if code == next_code {
                    // The encoder used the entry it defined in its very last step. That is the
                    // previous sequence extended by its own first byte.
                    let cha = self.table.reconstruct(last, out)?;
                    out.push(cha)?;
                    cha
                } else {
                    return Err(Error::CorruptStream("code beyond the next dictionary entry"));
                };
                self.table.derive(last, cha);
            }
        }

        if usize::from(self.table.next_code()) == 1 << self.reader.code_size() {
            self.reader.bump_code_size();
        }

        self.last = Some(code);
        Ok(())
    }
}

impl Table {
    fn new() -> Self {
        Table {
            inner: Vec::with_capacity(CODE_LIMIT),
            depths: Vec::with_capacity(CODE_LIMIT),
        }
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.depths.clear();
        for i in 0..=255u8 {
            self.inner.push(Link::base(i));
            self.depths.push(1);
        }
        // Reset, stop and run codes.
        for _ in 256..FIRST_CODE {
            self.inner.push(Link::base(0));
            self.depths.push(0);
        }
    }

    fn next_code(&self) -> Code {
        self.inner.len() as Code
    }

    fn is_full(&self) -> bool {
        self.inner.len() >= CODE_LIMIT
    }

    /// Define the next code as the sequence of `prev` followed by `byte`.
    ///
    /// A full table stays unchanged until the next reset.
    fn derive(&mut self, prev: Code, byte: u8) {
        if self.is_full() {
            return;
        }
        let depth = self.depths[usize::from(prev)] + 1;
        self.inner.push(Link { prev, byte });
        self.depths.push(depth);
    }

    /// Write the sequence of `code` and return its first byte.
    fn reconstruct<O: Output>(&self, code: Code, out: &mut O) -> Result<u8, O::Error> {
        let depth = self.depths[usize::from(code)];
        Ok(match out.claim(usize::from(depth))? {
            Some(target) => self.reconstruct_direct(code, target),
            None => self.first_byte(code),
        })
    }

    fn reconstruct_direct(&self, code: Code, out: &mut [u8]) -> u8 {
        let mut code_iter = code;
        let mut first = 0;
        for ch in out.iter_mut().rev() {
            let entry = self.inner[usize::from(code_iter)];
            *ch = entry.byte;
            first = entry.byte;
            code_iter = entry.prev;
        }
        first
    }

    fn first_byte(&self, code: Code) -> u8 {
        let mut code_iter = code;
        while self.depths[usize::from(code_iter)] > 1 {
            code_iter = self.inner[usize::from(code_iter)].prev;
        }
        self.inner[usize::from(code_iter)].byte
    }
}

impl Link {
    fn base(byte: u8) -> Self {
        Link { prev: 0, byte }
    }
}
