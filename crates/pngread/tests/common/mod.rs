/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers to build png files byte by byte
#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use nanorand::Rng;

pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A length, tag, payload and crc chunk
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(payload);

    let mut out = Vec::with_capacity(payload.len() + 12);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

pub fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut payload = Vec::with_capacity(13);
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&[depth, color, 0, 0, interlace]);

    chunk(b"IHDR", &payload)
}

pub fn iend() -> Vec<u8> {
    chunk(b"IEND", &[])
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Signature followed by `chunks`
pub fn png_file(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();

    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out
}

/// Filter every row with `None`
pub fn add_filter_bytes(pixels: &[u8], stride: usize) -> Vec<u8> {
    pixels
        .chunks_exact(stride)
        .flat_map(|row| std::iter::once(0).chain(row.iter().copied()))
        .collect()
}

/// 8 bit RGB png with one IDAT chunk, rows filtered with `None`
pub fn rgb_png(width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
    let raw = add_filter_bytes(pixels, width as usize * 3);

    png_file(&[ihdr(width, height, 8, 2, 0), chunk(b"IDAT", &zlib(&raw)), iend()])
}

pub fn random_pixels(seed: u64, len: usize) -> Vec<u8> {
    let mut rand = nanorand::WyRand::new_seed(seed);

    (0..len)
        .map(|i| {
            // keep some smooth areas so the predictors have something to work with
            if i % 7 < 3 {
                (i / 7) as u8
            } else {
                rand.generate::<u8>()
            }
        })
        .collect()
}

/// Encode with the `png` crate using a single filter type on every row
pub fn encode_reference(
    width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, filter: png::FilterType,
    pixels: &[u8]
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_filter(filter);
        encoder.set_adaptive_filter(png::AdaptiveFilterType::NonAdaptive);

        if color == png::ColorType::Indexed {
            encoder.set_palette((0..=255_u8).flat_map(|x| [x, x, x]).collect::<Vec<u8>>());
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
        writer.finish().unwrap();
    }
    out
}

/// Start offset, tag and payload length of every chunk in `png`
pub fn chunk_offsets(png: &[u8]) -> Vec<(usize, [u8; 4], usize)> {
    let mut offsets = Vec::new();
    let mut position = SIGNATURE.len();

    while position + 12 <= png.len() {
        let length = u32::from_be_bytes(png[position..position + 4].try_into().unwrap()) as usize;
        let tag: [u8; 4] = png[position + 4..position + 8].try_into().unwrap();

        offsets.push((position, tag, length));
        position += length + 12;
    }
    offsets
}
