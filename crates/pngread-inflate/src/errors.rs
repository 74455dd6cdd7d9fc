/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when decoding deflate/zlib streams
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Debug, Display, Formatter};

/// A struct returned when decompression fails
pub struct InflateDecodeErrors {
    /// reason why decompression fails
    pub error: DecodeErrorStatus,
    /// Data up until that decompression stage
    pub data:  Vec<u8>
}

impl InflateDecodeErrors {
    /// Create a new decode wrapper with data being
    /// how many bytes we actually decoded before hitting an error
    pub fn new(error: DecodeErrorStatus, data: Vec<u8>) -> InflateDecodeErrors {
        InflateDecodeErrors { error, data }
    }
    /// Create a new decode wrapper with an empty vector
    pub fn new_with_error(error: DecodeErrorStatus) -> InflateDecodeErrors {
        InflateDecodeErrors::new(error, Vec::new())
    }
}

impl Debug for InflateDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self.error)
    }
}

impl Display for InflateDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.error)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InflateDecodeErrors {}

pub enum DecodeErrorStatus {
    /// The stream ended before the final block (or the trailer) was complete
    InsufficientData,
    Generic(&'static str),
    GenericStr(String),
    /// The compressed stream violates the deflate format
    CorruptData(&'static str),
    /// The zlib header declares a compression method other than deflate
    UnsupportedCompression(u8),
    /// A match referenced bytes before the start of the output
    InvalidBackReference {
        distance:  usize,
        available: usize
    },
    /// limit, size the output would have had
    OutputLimitExceeded(usize, usize),
    /// expected, found
    MismatchedAdler(u32, u32)
}

impl Debug for DecodeErrorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InsufficientData => writeln!(f, "Insufficient data"),
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::GenericStr(reason) => writeln!(f, "{reason}"),
            Self::CorruptData(reason) => writeln!(f, "Corrupt data: {reason}"),
            Self::UnsupportedCompression(method) => {
                writeln!(f, "Unknown zlib compression method {method}, only deflate(8) is supported")
            }
            Self::InvalidBackReference {
                distance,
                available
            } => writeln!(
                f,
                "Back reference distance {distance} larger than the {available} bytes decoded so far"
            ),
            Self::OutputLimitExceeded(limit, current) => writeln!(
                f,
                "Output limit exceeded, set limit was {limit} and output size is {current}"
            ),
            Self::MismatchedAdler(expected, found) => {
                writeln!(f, "Mismatched Adler, expected {expected} but found {found}")
            }
        }
    }
}
