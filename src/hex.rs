//! Hexadecimal text, two characters per byte.
use ::hex::FromHexError;

use crate::Error;

/// The letter case of the digits above 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Case {
    Lower,
    Upper,
}

pub fn encoded_len(len: usize) -> usize {
    len * 2
}

pub fn encode(inp: &[u8]) -> Vec<u8> {
    ::hex::encode(inp).into_bytes()
}

pub fn encode_upper(inp: &[u8]) -> Vec<u8> {
    ::hex::encode_upper(inp).into_bytes()
}

/// Encode into `out`, returning the number of characters written.
pub fn encode_into(inp: &[u8], out: &mut [u8], case: Case) -> Result<usize, Error> {
    let needed = encoded_len(inp.len());
    let available = out.len();
    let target = out
        .get_mut(..needed)
        .ok_or(Error::BufferTooSmall { needed, available })?;
    ::hex::encode_to_slice(inp, target).map_err(|err| hex_error(err, needed, available))?;
    if case == Case::Upper {
        target.make_ascii_uppercase();
    }
    Ok(needed)
}

/// The number of bytes `inp` decodes to.
pub fn decoded_len(inp: &[u8]) -> Result<usize, Error> {
    if inp.len() % 2 != 0 {
        return Err(Error::InvalidArgument("odd number of hex digits"));
    }
    Ok(inp.len() / 2)
}

/// Decode digits of either case.
pub fn decode(inp: &[u8]) -> Result<Vec<u8>, Error> {
    ::hex::decode(inp).map_err(|err| hex_error(err, 0, 0))
}

/// Decode into `out`, returning the number of bytes written.
pub fn decode_into(inp: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    let needed = decoded_len(inp)?;
    let available = out.len();
    let target = out
        .get_mut(..needed)
        .ok_or(Error::BufferTooSmall { needed, available })?;
    ::hex::decode_to_slice(inp, target).map_err(|err| hex_error(err, needed, available))?;
    Ok(needed)
}

fn hex_error(err: FromHexError, needed: usize, available: usize) -> Error {
    match err {
        FromHexError::OddLength => Error::InvalidArgument("odd number of hex digits"),
        FromHexError::InvalidHexCharacter { .. } => Error::InvalidArgument("not a hex digit"),
        FromHexError::InvalidStringLength => Error::BufferTooSmall { needed, available },
    }
}
