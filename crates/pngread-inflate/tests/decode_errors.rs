use std::io::prelude::*;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pngread_inflate::errors::DecodeErrorStatus;
use pngread_inflate::{DeflateDecoder, DeflateOptions};

fn zlib(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());

    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn text() -> Vec<u8> {
    b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
        .iter()
        .cycle()
        .take(10_000)
        .copied()
        .collect()
}

#[test]
fn stored_block() {
    // BFINAL=1 BTYPE=00, LEN=3, NLEN=!3
    let data = [0x01, 0x03, 0x00, 0xFC, 0xFF, b'a', b'b', b'c'];

    let out = DeflateDecoder::new(&data).decode_deflate().unwrap();

    assert_eq!(out, b"abc");
}

#[test]
fn stored_block_length_mismatch() {
    let data = [0x01, 0x05, 0x00, 0x00, 0x00];

    let err = DeflateDecoder::new(&data).decode_deflate().unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::CorruptData(_)));
}

#[test]
fn reserved_block_type() {
    // BFINAL=1 BTYPE=11
    let err = DeflateDecoder::new(&[0x07]).decode_deflate().unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::CorruptData(_)));
}

#[test]
fn back_reference_before_start() {
    // fixed huffman block whose first symbol is a length-3 match at distance 1
    let err = DeflateDecoder::new(&[0x03, 0x02])
        .decode_deflate()
        .unwrap_err();

    assert!(matches!(
        err.error,
        DecodeErrorStatus::InvalidBackReference {
            distance:  1,
            available: 0
        }
    ));
}

#[test]
fn fixed_block_with_overlapping_match() {
    // "a" then <length 4, distance 1> then end of block, built from the fixed code:
    // 'a' (97) -> 8 bits 0x30 + 97, 258 -> 7 bits 0b0000010, dist 0 -> 5 bits 0
    let data = [0x4B, 0x04, 0x01, 0x00];

    let out = DeflateDecoder::new(&data).decode_deflate().unwrap();

    assert_eq!(out, b"aaaaa");
}

#[test]
fn unsupported_compression_method() {
    let mut data = zlib(b"hello");
    data[0] = 0x79;

    let err = DeflateDecoder::new(&data).decode_zlib().unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::UnsupportedCompression(9)));
}

#[test]
fn bad_fcheck() {
    let mut data = zlib(b"hello");
    data[1] ^= 1;

    assert!(DeflateDecoder::new(&data).decode_zlib().is_err());
}

#[test]
fn too_short_for_header() {
    let err = DeflateDecoder::new(&[0x78]).decode_zlib().unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::InsufficientData));
}

#[test]
fn adler_mismatch() {
    let mut data = zlib(&text());
    let last = data.len() - 1;
    data[last] ^= 0xFF;

    let err = DeflateDecoder::new(&data).decode_zlib().unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::MismatchedAdler(_, _)));
    // the data decoded fine, only the checksum is off
    assert_eq!(err.data, text());

    let options = DeflateOptions::default().set_confirm_checksum(false);
    let out = DeflateDecoder::new_with_options(&data, options)
        .decode_zlib()
        .unwrap();

    assert_eq!(out, text());
}

#[test]
fn truncated_stream() {
    let data = zlib(&text());

    for cut in [2, data.len() / 2, data.len() - 5] {
        let err = DeflateDecoder::new(&data[..cut]).decode_zlib().unwrap_err();

        assert!(
            matches!(err.error, DecodeErrorStatus::InsufficientData),
            "cut at {cut}: {err:?}"
        );
    }
}

#[test]
fn missing_trailer() {
    let data = zlib(&text());

    let err = DeflateDecoder::new(&data[..data.len() - 2])
        .decode_zlib()
        .unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::InsufficientData));
}

#[test]
fn output_limit() {
    let data = zlib(&text());
    let options = DeflateOptions::default().set_limit(1000);

    let err = DeflateDecoder::new_with_options(&data, options)
        .decode_zlib()
        .unwrap_err();

    assert!(matches!(err.error, DecodeErrorStatus::OutputLimitExceeded(1000, _)));
    assert!(err.data.len() <= 1000);
}

/// Packs values LSB-first the way deflate reads them
struct BitWriter {
    out:  Vec<u8>,
    bits: usize
}

impl BitWriter {
    fn new() -> BitWriter {
        BitWriter {
            out:  Vec::new(),
            bits: 0
        }
    }

    fn put(&mut self, value: u32, count: u8) {
        for i in 0..count {
            if self.bits % 8 == 0 {
                self.out.push(0);
            }
            let bit = ((value >> i) & 1) as u8;
            if let Some(last) = self.out.last_mut() {
                *last |= bit << (self.bits % 8);
            }
            self.bits += 1;
        }
    }

    /// Pad with zero bytes so no read runs past the end
    fn finish(mut self) -> Vec<u8> {
        self.out.extend_from_slice(&[0; 8]);
        self.out
    }
}

const PRECODE_ORDER: [usize; 19] = [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Final dynamic block header with all 19 code length code lengths
/// explicit, `precode_lens` indexed by code length symbol
fn dynamic_header(hlit: u32, hdist: u32, precode_lens: [u32; 19]) -> BitWriter {
    let mut writer = BitWriter::new();
    // BFINAL=1, BTYPE=10
    writer.put(1, 1);
    writer.put(2, 2);
    writer.put(hlit, 5);
    writer.put(hdist, 5);
    writer.put(15, 4);

    for symbol in PRECODE_ORDER {
        writer.put(precode_lens[symbol], 3);
    }
    writer
}

/// Code length code where symbols `a < b` both have
/// one bit codes, `a` is 0 and `b` is 1
fn two_symbol_precode(a: usize, b: usize) -> [u32; 19] {
    let mut lens = [0; 19];
    lens[a] = 1;
    lens[b] = 1;
    lens
}

fn dynamic_error(data: &[u8]) -> DecodeErrorStatus {
    DeflateDecoder::new(data).decode_deflate().unwrap_err().error
}

#[test]
fn too_many_literal_length_codes() {
    // HLIT = 30 declares 287 codes
    let data = dynamic_header(30, 0, [0; 19]).finish();

    assert!(matches!(
        dynamic_error(&data),
        DecodeErrorStatus::CorruptData("Too many literal/length codes")
    ));
}

#[test]
fn repeat_without_previous_length() {
    let mut writer = dynamic_header(0, 0, two_symbol_precode(16, 18));
    // symbol 16 as the very first code length
    writer.put(0, 1);
    writer.put(0, 2);

    assert!(matches!(
        dynamic_error(&writer.finish()),
        DecodeErrorStatus::CorruptData("Repeat code with no previous length")
    ));
}

#[test]
fn code_length_repeat_overruns_count() {
    // 257 + 1 codes, two runs of 138 zeros need 276
    let mut writer = dynamic_header(0, 0, two_symbol_precode(1, 18));
    for _ in 0..2 {
        writer.put(1, 1);
        writer.put(127, 7);
    }

    assert!(matches!(
        dynamic_error(&writer.finish()),
        DecodeErrorStatus::CorruptData("Code length repeat overruns the number of codes")
    ));
}

#[test]
fn missing_end_of_block_code() {
    // 258 zero lengths, so symbol 256 has no code
    let mut writer = dynamic_header(0, 0, two_symbol_precode(1, 18));
    writer.put(1, 1);
    writer.put(127, 7);
    writer.put(1, 1);
    writer.put(109, 7);

    assert!(matches!(
        dynamic_error(&writer.finish()),
        DecodeErrorStatus::CorruptData("Missing end-of-block code")
    ));
}
