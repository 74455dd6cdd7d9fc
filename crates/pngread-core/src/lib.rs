/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the pngread crates
//!
//! This crate provides the pieces the decoder crates
//! build on
//!
//! It currently contains
//!
//! - A bounds checked bytestream reader with endian aware reads
//! - Colorspace information reported by decoders
//! - Decoder options shared by the png decoder and the inflate decoder
//! - A logging facade which forwards to the `log` crate when enabled
//!
//! This library is `#[no_std]` unless the `std` feature is enabled.
//!
//! # Features
//!  - `std`: Enables `std::error::Error` implementations
//!
//!  - `log`: Forwards the logging macros in [`log`](crate::log) to the `log` crate,
//!     without it they compile to nothing.
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]

pub mod bytestream;
pub mod colorspace;
pub mod log;
pub mod options;
pub mod serde;
