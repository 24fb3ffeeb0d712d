//! Base64 with the standard alphabet and `=` padding.
//!
//! Every 3 input bytes become 4 characters, a final partial group is padded to 4 characters.
use ::base64::engine::general_purpose::STANDARD;
use ::base64::{DecodeError, DecodeSliceError, EncodeSliceError, Engine as _};

use crate::Error;

const PAD: u8 = b'=';

/// The number of characters `len` bytes encode to.
pub fn encoded_len(len: usize) -> usize {
    len / 3 * 4 + if len % 3 == 0 { 0 } else { 4 }
}

pub fn encode(inp: &[u8]) -> Vec<u8> {
    STANDARD.encode(inp).into_bytes()
}

/// Encode into `out`, returning the number of characters written.
pub fn encode_into(inp: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    let needed = encoded_len(inp.len());
    let too_small = Error::BufferTooSmall {
        needed,
        available: out.len(),
    };
    if out.len() < needed {
        return Err(too_small);
    }
    STANDARD
        .encode_slice(inp, &mut out[..needed])
        .map_err(|_: EncodeSliceError| too_small)
}

/// The number of bytes `inp` decodes to.
///
/// Only the length and the padding are checked, the characters are validated while decoding.
pub fn decoded_len(inp: &[u8]) -> Result<usize, Error> {
    if inp.len() % 4 != 0 {
        return Err(Error::InvalidArgument("base64 length is not a multiple of 4"));
    }
    let pad = inp.iter().rev().take_while(|&&c| c == PAD).count();
    if pad > 2 {
        return Err(Error::InvalidArgument("too much base64 padding"));
    }
    Ok(inp.len() / 4 * 3 - pad)
}

pub fn decode(inp: &[u8]) -> Result<Vec<u8>, Error> {
    decoded_len(inp)?;
    STANDARD.decode(inp).map_err(invalid)
}

/// Decode into `out`, returning the number of bytes written.
pub fn decode_into(inp: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    let needed = decoded_len(inp)?;
    if out.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    match STANDARD.decode_slice(inp, &mut out[..needed]) {
        Ok(written) => Ok(written),
        Err(DecodeSliceError::DecodeError(err)) => Err(invalid(err)),
        Err(DecodeSliceError::OutputSliceTooSmall) => Err(Error::BufferTooSmall {
            needed,
            available: out.len(),
        }),
    }
}

fn invalid(err: DecodeError) -> Error {
    Error::InvalidArgument(match err {
        DecodeError::InvalidByte(..) => "character outside the base64 alphabet",
        DecodeError::InvalidLength(_) => "base64 length is not a multiple of 4",
        DecodeError::InvalidLastSymbol(..) => "base64 trailing bits are not zero",
        _ => "misplaced base64 padding",
    })
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_into, decoded_len, encode, encode_into, encoded_len};
    use crate::Error;

    #[test]
    fn rfc4648_vectors() {
        let vectors: [(&[u8], &[u8]); 7] = [
            (b"", b""),
            (b"f", b"Zg=="),
            (b"fo", b"Zm8="),
            (b"foo", b"Zm9v"),
            (b"foob", b"Zm9vYg=="),
            (b"fooba", b"Zm9vYmE="),
            (b"foobar", b"Zm9vYmFy"),
        ];
        for &(plain, text) in &vectors {
            assert_eq!(encode(plain), text);
            assert_eq!(encoded_len(plain.len()), text.len());
            assert_eq!(decode(text).unwrap(), plain);
            assert_eq!(decoded_len(text), Ok(plain.len()));
        }
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(decode(b"Zm9"), Err(Error::InvalidArgument(_))));
        assert!(matches!(decode(b"Zm9v!A=="), Err(Error::InvalidArgument(_))));
        assert!(matches!(decode(b"Zg==Zm9v"), Err(Error::InvalidArgument(_))));
        assert!(matches!(decode(b"Z==="), Err(Error::InvalidArgument(_))));
        // "f" with a set bit after its last byte.
        assert!(matches!(decode(b"Zh=="), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn exact_buffer_is_enough() {
        let mut out = [0u8; 8];
        assert_eq!(encode_into(b"foobar", &mut out), Ok(8));
        assert_eq!(&out, b"Zm9vYmFy");
        assert_eq!(
            encode_into(b"foobar", &mut out[..7]),
            Err(Error::BufferTooSmall { needed: 8, available: 7 })
        );

        let mut plain = [0u8; 5];
        assert_eq!(decode_into(b"Zm9vYmE=", &mut plain), Ok(5));
        assert_eq!(&plain, b"fooba");
        assert_eq!(
            decode_into(b"Zm9vYmFy", &mut plain),
            Err(Error::BufferTooSmall { needed: 6, available: 5 })
        );
    }
}
