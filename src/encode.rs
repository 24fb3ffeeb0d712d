//! A module for all encoding needs.
use crate::bits::BitWriter;
use crate::sink::{into_ok, Counter, Output, Sink};
use crate::{Code, ControlCode, Error, CODE_LIMIT, FIRST_CODE, MAX_CODESIZE, RUN_UNIT};

use log::{debug, trace};

/// The dictionary resets when this would be the next code to assign.
const MAX_CODE: usize = CODE_LIMIT - 1;
/// The dictionary resets when this many lookup tables are in use.
const MAX_TABLES: usize = CODE_LIMIT / 8;
/// Runs are detected by comparing words of this many bytes.
const WORD: usize = 8;

/// Compresses whole buffers.
///
/// The encoder keeps its dictionary storage between calls to avoid reallocating it, but every
/// call starts from a fresh dictionary. The output of a call depends only on its input and the
/// run length setting.
pub struct Encoder {
    tree: Tree,
    run_length: bool,
}

struct EncodeState<'t> {
    /// The current encoding symbol tree.
    tree: &'t mut Tree,
    /// The bit buffer for encoding.
    buffer: BitWriter,
    /// If runs of one byte are written as run records.
    run_length: bool,
    /// Dictionary resets performed so far.
    resets: usize,
    /// Run records written so far.
    runs: usize,
}

/// One tree node for each code.
/// To avoid using too much memory a node keeps a single successor inline. Only nodes with at least
/// two successors get a full lookup table, and those tables are a bounded resource.
#[derive(Default)]
struct Tree {
    keys: Vec<Successor>,
    tables: Vec<Table>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Successor {
    Empty,
    Single { byte: u8, code: Code },
    Table(u16),
}

#[derive(Clone, Copy)]
struct Table {
    char_continuation: [Code; 256],
}

/// An upper bound on the compressed size of `len` input bytes.
///
/// Every code takes at most 12 bits and stands for at least one input byte, while a run record
/// of three codes stands for at least 16. The dictionary resets at most once per 512 data codes.
/// One more code for the end marker and one for the final match, then padding.
pub fn max_compressed_len(len: usize) -> usize {
    let codes = len.saturating_add(len / 511).saturating_add(2);
    codes.saturating_mul(usize::from(MAX_CODESIZE)).saturating_add(7) / 8
}

impl Encoder {
    /// An encoder that writes run records if the `rle` feature is enabled.
    pub fn new() -> Self {
        Encoder {
            tree: Tree::default(),
            run_length: cfg!(feature = "rle"),
        }
    }

    /// Choose whether runs of one repeated byte are written as run records.
    ///
    /// Decoding does not depend on this setting.
    pub fn with_run_length(mut self, enabled: bool) -> Self {
        self.run_length = enabled;
        self
    }

    /// Compress `inp` into `out`, returning the number of bytes written.
    ///
    /// Size `out` with [`max_compressed_len`]. A smaller buffer may work, otherwise this fails
    /// with `Error::BufferTooSmall` and the content of `out` is unspecified.
    ///
    /// [`max_compressed_len`]: fn.max_compressed_len.html
    pub fn encode_into(&mut self, inp: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        self.encode_to(inp, &mut Sink::new(out))
    }

    /// The exact compressed size of `inp`, found by compressing without writing.
    pub fn compressed_len(&mut self, inp: &[u8]) -> usize {
        into_ok(self.encode_to(inp, &mut Counter::default()))
    }

    pub fn encode_to_vec(&mut self, inp: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(max_compressed_len(inp.len()));
        into_ok(self.encode_to(inp, &mut out));
        out
    }

    fn encode_to<O: Output>(&mut self, inp: &[u8], out: &mut O) -> Result<usize, O::Error> {
        let start = out.produced();
        let mut state = EncodeState::new(&mut self.tree, self.run_length);
        state.encode(inp, out)?;
        let written = out.produced() - start;
        debug!(
            "compressed {} bytes into {} bytes ({} resets, {} runs)",
            inp.len(),
            written,
            state.resets,
            state.runs,
        );
        Ok(written)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl<'t> EncodeState<'t> {
    fn new(tree: &'t mut Tree, run_length: bool) -> Self {
        tree.reset();
        EncodeState {
            tree,
            buffer: BitWriter::new(),
            run_length,
            resets: 0,
            runs: 0,
        }
    }

    fn encode<O: Output>(&mut self, mut inp: &[u8], out: &mut O) -> Result<(), O::Error> {
        let mut pending = None;

        while let Some(&first) = inp.first() {
            if self.run_length {
                let units = run_units(inp, self.buffer.max_code());
                if units > 0 {
                    self.write_run(units, first, out)?;
                    inp = &inp[usize::from(units) * RUN_UNIT..];
                    continue;
                }
            }

            let mut current = Code::from(first);
            let mut matched = 1;
            let mut new_code = None;
            for &byte in &inp[1..] {
                match self.tree.iterate(current, byte) {
                    Ok(code) => {
                        current = code;
                        matched += 1;
                    }
                    Err(code) => {
                        new_code = Some(code);
                        break;
                    }
                }
            }
            inp = &inp[matched..];

            let new_code = match new_code {
                // All input matched, the code is written after the loop.
                None => {
                    pending = Some(current);
                    break;
                }
                Some(code) => code,
            };

            self.buffer.write_code(current, out)?;
            if new_code > self.buffer.max_code() {
                self.buffer.bump_code_size();
            }

            if usize::from(self.tree.next_code()) == MAX_CODE || self.tree.tables.len() >= MAX_TABLES {
                self.reset(out)?;
            }
        }

        if let Some(code) = pending {
            self.buffer.write_code(code, out)?;
            // The decoder completes one more entry after reading this code and may widen its
            // codes before it reads the stop code.
            if self.tree.next_code() > self.buffer.max_code() {
                self.buffer.bump_code_size();
            }
        }

        self.buffer.write_code(ControlCode::Stop.code(), out)?;
        self.buffer.finish(out)
    }

    fn write_run<O: Output>(&mut self, units: Code, byte: u8, out: &mut O) -> Result<(), O::Error> {
        trace!("run of {} bytes of {:#04x}", usize::from(units) * RUN_UNIT, byte);
        self.buffer.write_code(ControlCode::Rle.code(), out)?;
        self.buffer.write_code(units, out)?;
        self.buffer.write_code(Code::from(byte), out)?;
        self.runs += 1;
        Ok(())
    }

    fn reset<O: Output>(&mut self, out: &mut O) -> Result<(), O::Error> {
        debug!(
            "dictionary reset at code {} with {} tables",
            self.tree.next_code(),
            self.tree.tables.len(),
        );
        // Written with the code size before the reset.
        self.buffer.write_code(ControlCode::Reset.code(), out)?;
        self.tree.reset();
        self.buffer.reset();
        self.resets += 1;
        Ok(())
    }
}

/// The number of whole run units of one repeated byte at the start of `inp`.
fn run_units(inp: &[u8], max_units: Code) -> Code {
    if inp.len() < RUN_UNIT {
        return 0;
    }

    let pattern = u64::from_ne_bytes([inp[0]; WORD]);
    let limit = inp.len().min(usize::from(max_units) * RUN_UNIT);
    let words = inp[..limit]
        .chunks_exact(WORD)
        .take_while(|word| {
            let mut bytes = [0; WORD];
            bytes.copy_from_slice(word);
            u64::from_ne_bytes(bytes) == pattern
        })
        .count();

    (words * WORD / RUN_UNIT) as Code
}

impl Tree {
    /// Forget all sequences but the single bytes.
    fn reset(&mut self) {
        self.tables.clear();
        self.keys.clear();
        // Codes of the control codes are never extended but keep the indices aligned.
        self.keys.resize(usize::from(FIRST_CODE), Successor::Empty);
    }

    /// The code the next new sequence is assigned.
    fn next_code(&self) -> Code {
        self.keys.len() as Code
    }

    fn at_key(&self, code: Code, ch: u8) -> Option<Code> {
        match self.keys[usize::from(code)] {
            Successor::Empty => None,
            Successor::Single { byte, code } => Some(code).filter(|_| byte == ch),
            Successor::Table(idx) => {
                let full = &self.tables[usize::from(idx)];
                let precode = full.char_continuation[usize::from(ch)];
                if usize::from(precode) < CODE_LIMIT {
                    Some(precode)
                } else {
                    None
                }
            }
        }
    }

    /// Iterate to the next char.
    /// Return Ok when it was already in the tree or creates a new entry for it and returns Err.
    fn iterate(&mut self, code: Code, ch: u8) -> Result<Code, Code> {
        if let Some(next) = self.at_key(code, ch) {
            Ok(next)
        } else {
            Err(self.append(code, ch))
        }
    }

    fn append(&mut self, code: Code, ch: u8) -> Code {
        let next = self.next_code();
        let key = &mut self.keys[usize::from(code)];
        match *key {
            Successor::Empty => *key = Successor::Single { byte: ch, code: next },
            Successor::Single { byte, code: sibling } => {
                *key = Successor::Table(self.tables.len() as u16);
                let mut full = Table {
                    char_continuation: [Code::MAX; 256],
                };
                full.char_continuation[usize::from(byte)] = sibling;
                full.char_continuation[usize::from(ch)] = next;
                self.tables.push(full);
            }
            Successor::Table(idx) => {
                self.tables[usize::from(idx)].char_continuation[usize::from(ch)] = next;
            }
        }
        self.keys.push(Successor::Empty);
        next
    }
}
