/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A small, safe deflate decoder.
//!
//! This crate features a deflate/zlib decoder whose bit reader is
//! modelled after Eric Bigger's [libdeflate], with table driven
//! huffman decoding for short codes and a canonical fallback for long ones.
//!
//! It is the decompressor behind the `pngread` png decoder but
//! it is usable on any zlib or raw deflate stream.
//!
//! # Usage
//!
//! Decoding deflate data
//
//! ```no_run
//! use pngread_inflate::DeflateDecoder;
//! let totally_valid_data = [0;23];
//! let mut decoder = DeflateDecoder::new(&totally_valid_data);
//!
//! let decompressed =decoder.decode_deflate();
//! ```
//!
//! Decoding zlib data
//! ```no_run
//! use pngread_inflate::DeflateDecoder;
//! let totally_valid_data = [0;23];
//! let mut decoder = DeflateDecoder::new(&totally_valid_data);
//!
//! let decompressed =decoder.decode_zlib();
//! ```
//!
//! Decoding zlib data without confirming the adler32 checksum
//! ```no_run
//! use pngread_inflate::DeflateDecoder;
//! use pngread_inflate::DeflateOptions;
//! let totally_valid_data=[0;23];
//! let mut options = DeflateOptions::default()
//!                     .set_confirm_checksum(false);
//! let decoder =  DeflateDecoder::new_with_options(&totally_valid_data,options);
//!
//! ```
//!
//! [libdeflate]: https://github.com/ebiggers/libdeflate
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use crate::decoder::{DeflateDecoder, DeflateOptions};

mod bitstream;
mod constants;
mod decoder;
pub mod errors;
mod huffman;
mod utils;
