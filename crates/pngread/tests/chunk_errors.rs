/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Corrupt, truncated and unusual chunk layouts

use pngread::pngread_core::options::DecoderOptions;
use pngread::{
    parse_chunks, parse_chunks_with_options, png_read, PhysicalDimensions, PngChunkType,
    PngDecodeErrors, PngDecoder
};

mod common;

fn small_png() -> Vec<u8> {
    common::rgb_png(3, 2, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18])
}

fn idat_of(pixels: &[u8], stride: usize) -> Vec<u8> {
    common::chunk(b"IDAT", &common::zlib(&common::add_filter_bytes(pixels, stride)))
}

#[test]
fn every_flipped_bit_is_a_crc_mismatch() {
    let file = small_png();

    for (offset, tag, length) in common::chunk_offsets(&file) {
        // payload and crc, skipping the length and the tag
        for position in offset + 8..offset + 12 + length {
            for bit in 0..8 {
                let mut corrupt = file.clone();
                corrupt[position] ^= 1 << bit;

                let err = png_read(&corrupt).unwrap_err();

                assert!(
                    matches!(err, PngDecodeErrors::CrcMismatch { chunk, .. } if chunk.tag() == tag),
                    "byte {position}, bit {bit}: {err:?}"
                );
            }
        }
    }
}

#[test]
fn crc_checks_can_be_disabled() {
    let mut file = small_png();
    let (offset, _, length) = common::chunk_offsets(&file)[1];
    // last crc byte of IDAT
    file[offset + 11 + length] ^= 0xFF;

    assert!(png_read(&file).is_err());

    let options = DecoderOptions::default().png_set_confirm_crc(false);
    let image = PngDecoder::new_with_options(&file, options).decode().unwrap();

    assert_eq!(image[1][2].blue, 18);
}

#[test]
fn missing_iend_is_truncated() {
    let file = small_png();
    let without_iend = &file[..file.len() - 12];

    assert!(matches!(
        png_read(without_iend),
        Err(PngDecodeErrors::TruncatedStream)
    ));
}

#[test]
fn truncated_inside_a_chunk() {
    let file = small_png();
    let (offset, _, length) = common::chunk_offsets(&file)[1];

    for end in [offset + 2, offset + 8 + length / 2, offset + 11 + length] {
        let err = png_read(&file[..end]).unwrap_err();

        assert!(
            matches!(err, PngDecodeErrors::UnexpectedEndOfInput(_)),
            "end {end}: {err:?}"
        );
    }
}

#[test]
fn truncated_compressed_data() {
    let pixels = common::random_pixels(11, 16 * 16 * 3);
    let compressed = common::zlib(&common::add_filter_bytes(&pixels, 16 * 3));

    // chunks are intact, the zlib stream inside them is not
    let file = common::png_file(&[
        common::ihdr(16, 16, 8, 2, 0),
        common::chunk(b"IDAT", &compressed[..compressed.len() / 2]),
        common::iend()
    ]);

    assert!(matches!(
        png_read(&file),
        Err(PngDecodeErrors::UnexpectedEndOfInput(_))
    ));
}

#[test]
fn bad_signature_and_missing_header() {
    let mut file = small_png();
    file[0] = 0x89 ^ 1;

    assert!(matches!(png_read(&file), Err(PngDecodeErrors::InvalidSignature)));
    assert!(matches!(png_read(&[137, 80]), Err(PngDecodeErrors::InvalidSignature)));

    let file = common::png_file(&[
        common::chunk(b"gAMA", &45455_u32.to_be_bytes()),
        common::ihdr(1, 1, 8, 2, 0),
        idat_of(&[0, 0, 0], 3),
        common::iend()
    ]);

    assert!(matches!(png_read(&file), Err(PngDecodeErrors::MissingHeader)));
}

#[test]
fn adler_mismatch() {
    let mut idat = common::zlib(&common::add_filter_bytes(&[1, 2, 3], 3));
    let last = idat.len() - 1;
    idat[last] ^= 0x55;

    let file = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        common::chunk(b"IDAT", &idat),
        common::iend()
    ]);

    assert!(matches!(
        png_read(&file),
        Err(PngDecodeErrors::CorruptDeflateStream(_))
    ));

    let options = DecoderOptions::default().inflate_set_confirm_adler(false);
    let image = PngDecoder::new_with_options(&file, options).decode().unwrap();

    assert_eq!(image.as_bytes(), [1, 2, 3]);
}

#[test]
fn invalid_filter_byte() {
    let raw = [0, 1, 2, 3, 9, 4, 5, 6];
    let file = common::png_file(&[
        common::ihdr(1, 2, 8, 2, 0),
        common::chunk(b"IDAT", &common::zlib(&raw)),
        common::iend()
    ]);

    assert!(matches!(
        png_read(&file),
        Err(PngDecodeErrors::InvalidFilterType { row: 1, filter: 9 })
    ));
}

#[test]
fn too_little_and_too_much_image_data() {
    let short = common::png_file(&[
        common::ihdr(2, 2, 8, 0, 0),
        common::chunk(b"IDAT", &common::zlib(&[0, 1, 2, 0, 3])),
        common::iend()
    ]);

    assert!(matches!(
        png_read(&short),
        Err(PngDecodeErrors::NotEnoughData {
            expected: 6,
            found:    5
        })
    ));

    let long = common::png_file(&[
        common::ihdr(2, 2, 8, 0, 0),
        common::chunk(b"IDAT", &common::zlib(&[0; 100])),
        common::iend()
    ]);

    assert!(png_read(&long).is_err());
}

#[test]
fn dimension_limits() {
    let file = small_png();
    let options = DecoderOptions::default().set_max_height(1);

    let err = PngDecoder::new_with_options(&file, options)
        .decode_headers()
        .unwrap_err();

    assert!(matches!(
        err,
        PngDecodeErrors::TooLargeDimensions {
            dimension: "height",
            limit: 1,
            found: 2
        }
    ));
}

#[test]
fn ancillary_chunks_are_kept_and_parsed() {
    let pixels = [9, 8, 7, 6, 5, 4];
    let phys = [0, 0, 0x0B, 0x13, 0, 0, 0x0B, 0x13, 1];
    let time = [0x07, 0xE7, 5, 17, 13, 45, 0];

    let file = common::png_file(&[
        common::ihdr(2, 1, 8, 2, 0),
        common::chunk(b"gAMA", &45455_u32.to_be_bytes()),
        common::chunk(b"pHYs", &phys),
        common::chunk(b"prVt", b"private data"),
        idat_of(&pixels, 6),
        common::chunk(b"tIME", &time),
        common::chunk(b"tEXt", b"Comment\0made by hand"),
        common::iend(),
        // trailing garbage is ignored
        b"trailing".to_vec()
    ]);

    let mut decoder = PngDecoder::new(&file);
    decoder.decode_headers().unwrap();

    let info = decoder.info().unwrap();

    assert_eq!(info.gamma, Some(45455));
    assert_eq!(
        info.physical_dimensions,
        Some(PhysicalDimensions {
            x:    2835,
            y:    2835,
            unit: 1
        })
    );
    assert_eq!(info.time_info.map(|t| (t.year, t.hour)), Some((2023, 13)));
    assert_eq!(info.text[0].keyword, "Comment");
    assert_eq!(info.text[0].text, "made by hand");

    let chunks: Vec<PngChunkType> = decoder
        .ancillary_chunks()
        .iter()
        .map(|x| x.chunk_type)
        .collect();

    assert_eq!(
        chunks,
        [
            PngChunkType::gAMA,
            PngChunkType::pHYs,
            PngChunkType::Unknown(*b"prVt"),
            PngChunkType::tIME,
            PngChunkType::tEXt
        ]
    );
    assert_eq!(decoder.ancillary_chunks()[2].payload, b"private data");

    assert_eq!(decoder.decode().unwrap().as_bytes(), pixels);
}

#[test]
fn parse_chunks_collects_image_data() {
    let compressed = common::zlib(&[0, 1, 2, 3]);

    let file = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        common::chunk(b"IDAT", &compressed[..3]),
        common::chunk(b"IDAT", &compressed[3..]),
        common::iend()
    ]);

    let parsed = parse_chunks(&file).unwrap();

    assert_eq!(parsed.compressed, compressed);
    assert_eq!((parsed.info.width, parsed.info.height), (1, 1));
    assert!(parsed.ancillary.is_empty());
}

#[test]
fn ordering_rules() {
    let pixels = [1, 2, 3];
    let strict = DecoderOptions::default().set_strict_mode(true);

    // IDAT, tEXt, IDAT
    let compressed = common::zlib(&common::add_filter_bytes(&pixels, 3));
    let split = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        common::chunk(b"IDAT", &compressed[..4]),
        common::chunk(b"tEXt", b"a\0b"),
        common::chunk(b"IDAT", &compressed[4..]),
        common::iend()
    ]);

    assert_eq!(png_read(&split).unwrap().as_bytes(), pixels);
    assert!(parse_chunks_with_options(&split, strict).is_err());

    // unknown critical chunk
    let critical = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        common::chunk(b"ABCD", &[1, 2]),
        idat_of(&pixels, 3),
        common::iend()
    ]);

    assert_eq!(png_read(&critical).unwrap().as_bytes(), pixels);
    assert!(parse_chunks_with_options(&critical, strict).is_err());

    // palette after image data is always an error
    let late_palette = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        idat_of(&pixels, 3),
        common::chunk(b"PLTE", &[0, 0, 0]),
        common::iend()
    ]);

    assert!(parse_chunks(&late_palette).is_err());

    // malformed metadata only fails strict decoders
    let bad_gamma = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        common::chunk(b"gAMA", &[1, 2]),
        idat_of(&pixels, 3),
        common::iend()
    ]);

    assert_eq!(parse_chunks(&bad_gamma).unwrap().info.gamma, None);
    assert!(parse_chunks_with_options(&bad_gamma, strict).is_err());
}

#[test]
fn iend_must_be_empty() {
    let file = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        idat_of(&[1, 2, 3], 3),
        common::chunk(b"IEND", &[0])
    ]);

    assert!(png_read(&file).is_err());
}

#[test]
fn no_image_data() {
    let file = common::png_file(&[common::ihdr(1, 1, 8, 2, 0), common::iend()]);

    assert!(png_read(&file).is_err());
}

#[test]
fn second_header_is_an_error() {
    let file = common::png_file(&[
        common::ihdr(1, 1, 8, 2, 0),
        common::ihdr(1, 1, 8, 2, 0),
        idat_of(&[1, 2, 3], 3),
        common::iend()
    ]);

    assert!(matches!(
        parse_chunks(&file),
        Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"))
    ));
}
