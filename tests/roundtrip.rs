use lzwr::{decode, encode};
use proptest::prelude::*;
use std::{env, fs};

#[derive(Clone, Copy, Debug)]
enum Flavor {
    Plain,
    Runs,
}

#[test]
fn roundtrip_all() {
    let file = env::args().next().unwrap();
    let data = fs::read(file).unwrap();

    for &flavor in &[Flavor::Plain, Flavor::Runs] {
        for &mask in &[0xffu8, 0x3f, 0x0f, 0x03] {
            let data: Vec<_> = data.iter().copied().map(|b| b & mask).collect();
            assert_roundtrips(&data, flavor);
        }
    }
}

#[test]
fn roundtrip_small() {
    for data in [&b""[..], b"a", b"ab", b"AAAA", b"TOBEORNOTTOBEORTOBEORNOT"] {
        assert_roundtrips(data, Flavor::Plain);
        assert_roundtrips(data, Flavor::Runs);
    }
}

#[test]
fn roundtrip_long_run() {
    let data = vec![0x41; 10_000];
    let compressed = encode::Encoder::new().with_run_length(true).encode_to_vec(&data);
    // Two run records and the stop code.
    assert_eq!(compressed.len(), 8);
    assert_eq!(lzwr::decompress(&compressed).unwrap(), data);
}

#[test]
fn roundtrip_runs_between_text() {
    let mut data = vec![];
    for round in 0..200u32 {
        data.extend_from_slice(b"header ");
        data.extend(std::iter::repeat(round as u8).take(16 + round as usize % 40));
        data.extend_from_slice(format!("record {} ", round).as_bytes());
    }
    assert_roundtrips(&data, Flavor::Runs);
}

fn assert_roundtrips(data: &[u8], flavor: Flavor) {
    let mut encoder = match flavor {
        Flavor::Plain => encode::Encoder::new().with_run_length(false),
        Flavor::Runs => encode::Encoder::new().with_run_length(true),
    };
    let mut buffer = vec![0; encode::max_compressed_len(data.len())];
    let len = encoder.encode_into(data, &mut buffer).unwrap();
    buffer.truncate(len);

    let mut decoder = decode::Decoder::new();
    let compare = decoder.decode_to_vec(&buffer);
    assert!(compare.is_ok(), "{:?}, {:?}", flavor, compare);
    assert!(data == &*compare.unwrap(), "{:?}", flavor);
}

proptest! {
    #[test]
    fn roundtrip_arbitrary(data in proptest::collection::vec(any::<u8>(), 0..4096), runs in any::<bool>()) {
        let mut encoder = encode::Encoder::new().with_run_length(runs);
        let compressed = encoder.encode_to_vec(&data);
        prop_assert!(compressed.len() <= encode::max_compressed_len(data.len()));
        prop_assert_eq!(decode::Decoder::new().decode_to_vec(&compressed).unwrap(), data);
    }

    #[test]
    fn roundtrip_few_symbols(data in proptest::collection::vec(0u8..3, 0..20_000)) {
        let compressed = lzwr::compress(&data);
        prop_assert_eq!(lzwr::decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn roundtrip_with_runs(parts in proptest::collection::vec((any::<u8>(), 1usize..100), 0..200)) {
        let data: Vec<u8> = parts
            .iter()
            .flat_map(|&(byte, len)| std::iter::repeat(byte).take(len))
            .collect();
        let compressed = lzwr::compress(&data);
        prop_assert_eq!(lzwr::decompress(&compressed).unwrap(), data);
    }
}
