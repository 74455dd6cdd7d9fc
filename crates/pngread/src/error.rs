/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during png decoding
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::{Debug, Display, Formatter};

use pngread_core::bytestream::ZByteIoError;
use pngread_inflate::errors::{DecodeErrorStatus, InflateDecodeErrors};

use crate::enums::PngChunkType;

/// Errors possible during decoding
pub enum PngDecodeErrors {
    /// The first eight bytes are not the png signature
    InvalidSignature,
    /// The first chunk is not `IHDR`
    MissingHeader,
    /// A valid colour type and depth pairing the decoder
    /// cannot reconstruct
    UnsupportedColorFormat { color: u8, depth: u8 },
    /// Adam7 interlaced images
    UnsupportedInterlace,
    /// A chunk whose stored CRC does not match its contents
    CrcMismatch {
        chunk:    PngChunkType,
        expected: u32,
        found:    u32
    },
    /// The input ended on a chunk boundary before `IEND`
    TruncatedStream,
    /// The input ended inside a chunk or inside the compressed data
    UnexpectedEndOfInput(ZByteIoError),
    /// Compression method other than deflate, in `IHDR` or the zlib header
    UnsupportedCompression(u8),
    CorruptDeflateStream(String),
    InvalidBackReference { distance: usize, available: usize },
    /// A scanline starts with a filter byte above 4
    InvalidFilterType { row: usize, filter: u8 },
    /// Fewer bytes than the image dimensions require
    NotEnoughData { expected: usize, found: usize },
    /// Image dimensions larger than the configured maximum
    TooLargeDimensions {
        dimension: &'static str,
        limit:     usize,
        found:     usize
    },
    GenericStatic(&'static str),
    Generic(String)
}

impl Debug for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::MissingHeader => writeln!(f, "First chunk not IHDR, corrupt PNG"),
            Self::UnsupportedColorFormat { color, depth } => writeln!(
                f,
                "Unsupported colour type {color} with bit depth {depth}, only 8 bit RGB and 8 bit greyscale can be decoded"
            ),
            Self::UnsupportedInterlace => writeln!(f, "Adam7 interlaced images are not supported"),
            Self::CrcMismatch {
                chunk,
                expected,
                found
            } => writeln!(
                f,
                "CRC does not match for chunk {chunk}, expected {expected:#010x} but found {found:#010x}"
            ),
            Self::TruncatedStream => writeln!(f, "Stream ended before the IEND chunk"),
            Self::UnexpectedEndOfInput(err) => writeln!(f, "Unexpected end of input: {err}"),
            Self::UnsupportedCompression(method) => {
                writeln!(f, "Unsupported compression method {method}")
            }
            Self::CorruptDeflateStream(reason) => {
                writeln!(f, "Corrupt compressed image data: {reason}")
            }
            Self::InvalidBackReference {
                distance,
                available
            } => writeln!(
                f,
                "Back reference distance {distance} larger than the {available} bytes decoded so far"
            ),
            Self::InvalidFilterType { row, filter } => {
                writeln!(f, "Unknown filter type {filter} on row {row}")
            }
            Self::NotEnoughData { expected, found } => {
                writeln!(f, "Not enough pixels, expected {expected} but found {found}")
            }
            Self::TooLargeDimensions {
                dimension,
                limit,
                found
            } => writeln!(
                f,
                "Image {dimension} {found}, larger than maximum configured {dimension} {limit}, aborting"
            ),
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::Generic(val) => writeln!(f, "{val}")
        }
    }
}

impl Display for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PngDecodeErrors {}

impl From<&'static str> for PngDecodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<ZByteIoError> for PngDecodeErrors {
    fn from(val: ZByteIoError) -> Self {
        Self::UnexpectedEndOfInput(val)
    }
}

impl From<InflateDecodeErrors> for PngDecodeErrors {
    fn from(val: InflateDecodeErrors) -> Self {
        match val.error {
            DecodeErrorStatus::InsufficientData => Self::UnexpectedEndOfInput(
                ZByteIoError::Generic("Compressed image data ended before the final deflate block")
            ),
            DecodeErrorStatus::UnsupportedCompression(method) => {
                Self::UnsupportedCompression(method)
            }
            DecodeErrorStatus::InvalidBackReference {
                distance,
                available
            } => Self::InvalidBackReference {
                distance,
                available
            },
            DecodeErrorStatus::CorruptData(reason) | DecodeErrorStatus::Generic(reason) => {
                Self::CorruptDeflateStream(reason.to_string())
            }
            DecodeErrorStatus::GenericStr(reason) => Self::CorruptDeflateStream(reason),
            DecodeErrorStatus::MismatchedAdler(expected, found) => Self::CorruptDeflateStream(
                format!("Adler32 mismatch, expected {expected:#010x} but found {found:#010x}")
            ),
            DecodeErrorStatus::OutputLimitExceeded(limit, size) => Self::Generic(format!(
                "Compressed image data inflates to at least {size} bytes, more than the {limit} bytes the image needs"
            ))
        }
    }
}
