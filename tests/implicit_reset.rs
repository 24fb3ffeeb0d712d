use lzwr::{decode::Decoder, encode::Encoder};

fn pseudo_random(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

#[test]
fn across_dictionary_resets() {
    // Far more distinct sequences than the dictionary holds.
    let data = pseudo_random(1 << 18, 0x9e37_79b9);
    let compressed = Encoder::new().encode_to_vec(&data);
    assert_eq!(Decoder::new().decode_to_vec(&compressed).unwrap(), data);
}

#[test]
fn lookup_tables_run_out() {
    // With four symbols most sequences branch, lookup tables run out long before codes do.
    let data: Vec<u8> = pseudo_random(1 << 18, 7).into_iter().map(|b| b % 4).collect();
    let compressed = Encoder::new().encode_to_vec(&data);
    assert!(compressed.len() < data.len() / 2);
    assert_eq!(Decoder::new().decode_to_vec(&compressed).unwrap(), data);
}

#[test]
fn codes_run_out() {
    // Each sequence has exactly one successor, the dictionary fills without any lookup table.
    let data: Vec<u8> = (0..1u32 << 18).map(|i| i as u8).collect();
    let compressed = Encoder::new().encode_to_vec(&data);
    assert!(compressed.len() < data.len() / 4);
    assert_eq!(Decoder::new().decode_to_vec(&compressed).unwrap(), data);
}

#[test]
fn reused_coders_are_independent() {
    let first = pseudo_random(50_000, 1);
    let second = b"short and unrelated".to_vec();

    let mut encoder = Encoder::new();
    let mut decoder = Decoder::new();
    let _ = encoder.encode_to_vec(&first);
    let fresh = Encoder::new().encode_to_vec(&second);
    let reused = encoder.encode_to_vec(&second);
    assert_eq!(fresh, reused);

    let _ = decoder.decode_to_vec(&Encoder::new().encode_to_vec(&first)).unwrap();
    assert_eq!(decoder.decode_to_vec(&reused).unwrap(), second);
}
