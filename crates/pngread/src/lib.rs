/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A png decoder
//!
//! This features a simple PNG reader in Rust which reads valid
//! ISO/IEC 15948:2003 (E) or PNG images and reconstructs
//! non-interlaced 8-bit RGB and 8-bit greyscale images into RGB pixels.
//!
//! Every chunk is walked and CRC checked, so images outside that subset
//! still report their header and ancillary chunks, but `decode` reports
//! them as unsupported instead of producing wrong pixels.
//!
//! # Usage
//! Add the library to `Cargo.toml`
//!
//! ```toml
//! pngread="0.1"
//! ```
//!
//! #### Decode to pixels
//!
//!```no_run
//! use pngread::PngDecoder;
//! let mut decoder = PngDecoder::new(&[0_u8; 0]);
//!
//! let image = decoder.decode().unwrap();
//!
//! let top_left = image[0][0];
//! println!("{} {} {}", top_left.red, top_left.green, top_left.blue);
//! ```
//!
//! #### Decode whatever format the bytes are in
//!
//! [`image_read`] sniffs the format from magic bytes and dispatches to a
//! decoder, formats without one are reported as
//! [`ImageErrors::UnsupportedFormat`].
//!
//!```no_run
//! let image = pngread::image_read(&[]).unwrap();
//!
//! let packed_rgb: &[u8] = image.as_bytes();
//! ```
//!
//! # Extracting metadata
//!
//! Once headers have been decoded, image metadata can be accessed via the [`info()`](PngDecoder::info) method
//! and chunks the decoder does not interpret via [`ancillary_chunks()`](PngDecoder::ancillary_chunks)
//!
//!```no_run
//! use pngread::PngDecoder;
//! let mut decoder = PngDecoder::new(&[0_u8; 0]);
//!
//! decoder.decode_headers().unwrap();
//!
//! let info = decoder.info().unwrap();
//! println!("{}x{}, gamma: {:?}", info.width, info.height, info.gamma);
//!
//! for chunk in decoder.ancillary_chunks() {
//!     println!("{} ({} bytes)", chunk.chunk_type, chunk.payload.len());
//! }
//! ```
//!
//! # Features
//! - `crc`: Confirm chunk CRCs, can still be disabled at runtime via
//!    [`DecoderOptions::png_set_confirm_crc`](pngread_core::options::DecoderOptions::png_set_confirm_crc)
//! - `std`: `std::error::Error` impls and the file reading helpers
//! - `log`: Route decoder logs to the `log` crate
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::upper_case_acronyms)]
extern crate alloc;

pub use pngread_core;

pub use crate::codecs::{guess_format, image_read, png_read, DecoderTrait, ImageErrors, ImageFormat};
#[cfg(feature = "std")]
pub use crate::codecs::{image_read_file, png_read_file};
pub use crate::decoder::{
    parse_chunks, parse_chunks_with_options, ChunkRecord, ParsedPng, PngDecoder, PngInfo
};
pub use crate::enums::{InterlaceMethod, PngChunkType, PngColor};
pub use crate::error::PngDecodeErrors;
pub use crate::filters::unfilter;
pub use crate::headers::{PhysicalDimensions, TextChunk, TimeInfo};
pub use crate::image::{assemble, Image, Pixel};

mod codecs;
mod constants;
#[cfg(feature = "crc")]
mod crc;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod image;
