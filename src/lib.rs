//! # LZW+RLE compression and text encodings
//!
//! This crate provides an LZW `Encoder` and `Decoder` whose code stream additionally carries
//! run-length records for long runs of one repeated byte, together with Base64 and hexadecimal
//! text encodings. Every transform works on whole buffers and follows a "measure or write"
//! contract: with `None` as destination it returns the number of bytes it needs, with a buffer
//! it returns the number of bytes written.
//!
//! The code stream has no header. Codes are packed least significant bit first, start at 9 bits
//! and grow up to 12 bits. Three codes are reserved:
//!
//!  * `RESET == 256`, the dictionary is discarded and the code size reverts to 9 bits.
//!  * `STOP  == 257`, the end of the stream. The last byte is padded with zero bits.
//!  * `RLE   == 258`, followed by a count and a byte: the byte repeated `count * 16` times.
//!
//! Exemplary use:
//!
//! ```
//! use lzwr::Codec;
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let bound = Codec::Lzw.encode(data, None).unwrap();
//! let mut compressed = vec![0; bound];
//! let len = Codec::Lzw.encode(data, Some(&mut compressed)).unwrap();
//! compressed.truncate(len);
//!
//! let restored = lzwr::decompress(&compressed).unwrap();
//! assert_eq!(&restored[..], &data[..]);
//! ```
#![forbid(unsafe_code)]

pub(crate) const MIN_CODESIZE: u8 = 9;
pub(crate) const MAX_CODESIZE: u8 = 12;
/// Number of distinct code values, the dictionary resets before reaching it.
pub const CODE_LIMIT: usize = 1 << MAX_CODESIZE as usize;
/// Number of bytes one unit of an RLE count stands for.
pub const RUN_UNIT: usize = 16;
/// The first code bound to a dictionary sequence longer than one byte.
pub const FIRST_CODE: Code = 259;

/// Alias for a LZW code point
pub type Code = u16;

/// Codes with a protocol meaning instead of a dictionary sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ControlCode {
    /// Discard the dictionary and return to 9 bit codes.
    Reset = 256,
    /// End of the stream.
    Stop = 257,
    /// A run record, a count and a byte follow.
    Rle = 258,
}

impl ControlCode {
    /// The code point on the wire.
    pub const fn code(self) -> Code {
        self as Code
    }

    /// The control code for `code`, `None` for literal bytes and dictionary codes.
    pub fn from_code(code: Code) -> Option<Self> {
        match code {
            256 => Some(ControlCode::Reset),
            257 => Some(ControlCode::Stop),
            258 => Some(ControlCode::Rle),
            _ => None,
        }
    }
}

pub mod base64;
mod bits;
pub mod decode;
pub mod encode;
mod error;
pub mod hex;
mod sink;

pub use crate::error::Error;

/// The wire representations offered by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    /// Dictionary compression with run-length records.
    Lzw,
    /// Standard alphabet Base64 with `=` padding.
    Base64,
    /// Lower case hexadecimal.
    Hex,
    /// Upper case hexadecimal.
    HexUpper,
}

impl Codec {
    /// Encode `inp`, or measure the output when `out` is `None`.
    ///
    /// Measurement is exact for the text encodings. For `Lzw` it returns the upper bound
    /// [`encode::max_compressed_len`], since the compressed size is only known after compressing;
    /// allocate the bound and truncate to the length returned by the writing call.
    pub fn encode(self, inp: &[u8], out: Option<&mut [u8]>) -> Result<usize, Error> {
        match (self, out) {
            (Codec::Lzw, None) => Ok(encode::max_compressed_len(inp.len())),
            (Codec::Lzw, Some(out)) => encode::Encoder::new().encode_into(inp, out),
            (Codec::Base64, None) => Ok(base64::encoded_len(inp.len())),
            (Codec::Base64, Some(out)) => base64::encode_into(inp, out),
            (Codec::Hex, None) | (Codec::HexUpper, None) => Ok(hex::encoded_len(inp.len())),
            (Codec::Hex, Some(out)) => hex::encode_into(inp, out, hex::Case::Lower),
            (Codec::HexUpper, Some(out)) => hex::encode_into(inp, out, hex::Case::Upper),
        }
    }

    /// Decode `inp`, or measure the output when `out` is `None`.
    ///
    /// Measurement is exact for all codecs. For `Lzw` it walks the whole code stream once
    /// without writing.
    pub fn decode(self, inp: &[u8], out: Option<&mut [u8]>) -> Result<usize, Error> {
        match (self, out) {
            (Codec::Lzw, None) => decode::Decoder::new().decoded_len(inp),
            (Codec::Lzw, Some(out)) => decode::Decoder::new().decode_into(inp, out),
            (Codec::Base64, None) => base64::decoded_len(inp),
            (Codec::Base64, Some(out)) => base64::decode_into(inp, out),
            (Codec::Hex, None) | (Codec::HexUpper, None) => hex::decoded_len(inp),
            (Codec::Hex, Some(out)) | (Codec::HexUpper, Some(out)) => hex::decode_into(inp, out),
        }
    }

    /// Encode `inp` into a new vector of exactly the encoded length.
    pub fn encode_to_vec(self, inp: &[u8]) -> Vec<u8> {
        match self {
            Codec::Lzw => compress(inp),
            Codec::Base64 => base64::encode(inp),
            Codec::Hex => hex::encode(inp),
            Codec::HexUpper => hex::encode_upper(inp),
        }
    }

    /// Decode `inp` into a new vector.
    pub fn decode_to_vec(self, inp: &[u8]) -> Result<Vec<u8>, Error> {
        match self {
            Codec::Lzw => decompress(inp),
            Codec::Base64 => base64::decode(inp),
            Codec::Hex | Codec::HexUpper => hex::decode(inp),
        }
    }
}

/// Compress a buffer with the default encoder configuration.
pub fn compress(data: &[u8]) -> Vec<u8> {
    encode::Encoder::new().encode_to_vec(data)
}

/// Decompress a complete code stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, Error> {
    decode::Decoder::new().decode_to_vec(data)
}
