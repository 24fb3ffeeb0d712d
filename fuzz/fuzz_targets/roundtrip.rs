#![no_main]
use libfuzzer_sys::fuzz_target;
use lzwr::{decode, encode, Codec};

fuzz_target!(|data: &[u8]| {
    for run_length in [false, true] {
        let mut encoder = encode::Encoder::new().with_run_length(run_length);
        let mut buffer = vec![0; encode::max_compressed_len(data.len())];
        let len = encoder.encode_into(data, &mut buffer).unwrap();
        assert_eq!(len, encoder.compressed_len(data));

        let compare = decode::Decoder::new().decode_to_vec(&buffer[..len]);
        assert!(compare.as_deref() == Ok(data), "{:?}", compare.err());
    }

    for codec in [Codec::Base64, Codec::Hex, Codec::HexUpper] {
        let text = codec.encode_to_vec(data);
        assert_eq!(codec.decode_to_vec(&text).as_deref(), Ok(data));
    }
});
