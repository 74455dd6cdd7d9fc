use std::io::prelude::*;

use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use nanorand::Rng;
use pngread_inflate::DeflateDecoder;

fn encode_zlib_flate(bytes: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));

    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn encode_deflate_flate(bytes: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));

    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Mixed content: incompressible noise, runs and repeated phrases so every
/// block type and long matches show up.
fn sample_data(seed: u64, size: usize) -> Vec<u8> {
    let mut rand = nanorand::WyRand::new_seed(seed);
    let mut data = Vec::with_capacity(size);

    while data.len() < size {
        match rand.generate_range(0_u8..4) {
            0 => {
                let len = rand.generate_range(1_usize..300);
                data.extend((0..len).map(|_| rand.generate::<u8>()));
            }
            1 => {
                let len = rand.generate_range(3_usize..1000);
                let byte = rand.generate::<u8>();
                data.extend(std::iter::repeat(byte).take(len));
            }
            2 => data.extend_from_slice(b"the quick brown fox jumps over the lazy dog. "),
            _ => {
                let len = rand.generate_range(1_usize..500);
                data.extend((0..len).map(|_| rand.generate_range(b'a'..=b'f')));
            }
        }
    }
    data.truncate(size);
    data
}

fn assert_same(ours: &[u8], reference: &[u8]) {
    assert_eq!(ours.len(), reference.len());

    for ((pos, a), b) in ours.iter().enumerate().zip(reference.iter()) {
        if a != b {
            panic!("[position: {pos}]: {a} {b} do not match");
        }
    }
}

#[test]
fn test_similarity_zlib() {
    for level in [0, 1, 6, 9] {
        for (seed, size) in [(1, 0), (2, 1), (3, 1000), (4, 70_000), (5, 300_000)] {
            let data = sample_data(seed, size);
            let compressed = encode_zlib_flate(&data, level);

            let decoded = DeflateDecoder::new(&compressed).decode_zlib().unwrap();

            assert_same(&decoded, &data);
        }
    }
}

#[test]
fn test_similarity_raw_deflate() {
    for level in [0, 3, 9] {
        let data = sample_data(level.into(), 100_000);
        let compressed = encode_deflate_flate(&data, level);

        let decoded = DeflateDecoder::new(&compressed).decode_deflate().unwrap();

        assert_same(&decoded, &data);
    }
}

#[test]
fn test_trailing_bytes_after_trailer_are_ignored() {
    let data = sample_data(9, 5000);
    let mut compressed = encode_zlib_flate(&data, 6);

    compressed.extend_from_slice(&[0xAB; 16]);

    let decoded = DeflateDecoder::new(&compressed).decode_zlib().unwrap();

    assert_same(&decoded, &data);
}
