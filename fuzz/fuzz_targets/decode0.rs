#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let mut decoder = lzwr::decode::Decoder::new();
    let measured = decoder.decoded_len(raw_data);
    let decoded = decoder.decode_to_vec(raw_data);
    assert_eq!(measured, decoded.map(|data| data.len()));
});
