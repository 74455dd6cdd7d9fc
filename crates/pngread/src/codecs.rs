/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Format detection and dispatch
//!
//! Formats are sniffed from their magic bytes and decoded through
//! [`DecoderTrait`]. Only PNG carries a decoder, other recognised
//! formats are reported as [`ImageErrors::UnsupportedFormat`].
use alloc::boxed::Box;
use core::fmt::{Debug, Display, Formatter};

use pngread_core::colorspace::ColorSpace;
use pngread_core::log::trace;
use pngread_core::options::DecoderOptions;

use crate::constants::PNG_SIGNATURE;
use crate::decoder::PngDecoder;
use crate::error::PngDecodeErrors;
use crate::image::Image;

/// Image formats recognised by [`guess_format`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ImageFormat {
    /// Portable Network Graphics
    PNG,
    /// Joint Photographic Experts Group
    JPEG,
    /// Graphics Interchange Format
    GIF,
    /// Windows Bitmap Files
    BMP,
    /// Quite Okay Image
    QOI,
    /// Portable Any Map, `P1` through `P7`
    PPM,
    /// Farbfeld format
    Farbfeld
}

impl ImageFormat {
    /// Whether images of this format can be decoded to pixels
    pub const fn has_decoder(self) -> bool {
        matches!(self, ImageFormat::PNG)
    }
    /// Create a decoder for this format reading from `data`
    ///
    /// # Errors
    /// [`ImageErrors::UnsupportedFormat`] if the format has no decoder
    pub fn decoder<'a>(self, data: &'a [u8]) -> Result<Box<dyn DecoderTrait + 'a>, ImageErrors> {
        self.decoder_with_options(data, DecoderOptions::default())
    }

    pub fn decoder_with_options<'a>(
        self, data: &'a [u8], options: DecoderOptions
    ) -> Result<Box<dyn DecoderTrait + 'a>, ImageErrors> {
        match self {
            ImageFormat::PNG => Ok(Box::new(PngDecoder::new_with_options(data, options))),
            format => Err(ImageErrors::UnsupportedFormat(format))
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Errors from format dispatch
pub enum ImageErrors {
    /// The png decoder failed
    Png(PngDecodeErrors),
    /// The format was recognised but there is no decoder for it
    UnsupportedFormat(ImageFormat),
    /// No known magic bytes at the start of the input
    UnknownFormat,
    #[cfg(feature = "std")]
    Io(std::io::Error)
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Png(err) => writeln!(f, "Png decoding failed: {err:?}"),
            Self::UnsupportedFormat(format) => {
                writeln!(f, "Found {format} image, but there is no decoder for it")
            }
            Self::UnknownFormat => writeln!(f, "Unknown image format"),
            #[cfg(feature = "std")]
            Self::Io(err) => writeln!(f, "I/O error: {err}")
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ImageErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Png(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None
        }
    }
}

impl From<PngDecodeErrors> for ImageErrors {
    fn from(err: PngDecodeErrors) -> Self {
        Self::Png(err)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ImageErrors {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Capabilities every image decoder provides
pub trait DecoderTrait {
    /// Read image headers without decoding pixels
    fn decode_headers(&mut self) -> Result<(), ImageErrors>;

    /// Decode the whole image
    fn decode(&mut self) -> Result<Image, ImageErrors>;

    /// `(width, height)`, `None` before headers are decoded
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// Colorspace of the source image, `None` before headers are decoded
    fn colorspace(&self) -> Option<ColorSpace>;

    fn format(&self) -> ImageFormat;
}

impl<T: AsRef<[u8]>> DecoderTrait for PngDecoder<T> {
    fn decode_headers(&mut self) -> Result<(), ImageErrors> {
        Ok(PngDecoder::decode_headers(self)?)
    }

    fn decode(&mut self) -> Result<Image, ImageErrors> {
        Ok(PngDecoder::decode(self)?)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        PngDecoder::dimensions(self)
    }

    fn colorspace(&self) -> Option<ColorSpace> {
        PngDecoder::colorspace(self)
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::PNG
    }
}

/// Guess the format of an image based on its magic bytes
///
/// Returns `None` if the format isn't known
pub fn guess_format(bytes: &[u8]) -> Option<ImageFormat> {
    let magic_bytes: [(&[u8], ImageFormat); 13] = [
        (&PNG_SIGNATURE, ImageFormat::PNG),
        // Some jpeg files don't have the third 0xFF byte, so only
        // the start of image marker is checked
        (&[0xff, 0xd8], ImageFormat::JPEG),
        (b"GIF87a", ImageFormat::GIF),
        (b"GIF89a", ImageFormat::GIF),
        (b"qoif", ImageFormat::QOI),
        (b"farbfeld", ImageFormat::Farbfeld),
        (b"P1", ImageFormat::PPM),
        (b"P2", ImageFormat::PPM),
        (b"P3", ImageFormat::PPM),
        (b"P4", ImageFormat::PPM),
        (b"P5", ImageFormat::PPM),
        (b"P6", ImageFormat::PPM),
        (b"P7", ImageFormat::PPM)
    ];

    for (magic, format) in magic_bytes {
        if bytes.starts_with(magic) {
            return Some(format);
        }
    }
    // BM is short enough to appear by chance, also require the
    // size of the file header plus a core header
    if bytes.starts_with(b"BM") && bytes.len() >= 26 {
        return Some(ImageFormat::BMP);
    }
    None
}

/// Decode an image of any recognised format
///
/// # Errors
/// - [`ImageErrors::UnknownFormat`] if the format cannot be guessed
/// - [`ImageErrors::UnsupportedFormat`] if the format has no decoder
/// - Any error from the format's decoder
pub fn image_read(bytes: &[u8]) -> Result<Image, ImageErrors> {
    let format = guess_format(bytes).ok_or(ImageErrors::UnknownFormat)?;

    trace!("Guessed image format {:?}", format);

    format.decoder(bytes)?.decode()
}

/// Decode a png image
///
/// Unlike [`image_read`], errors stay png specific
pub fn png_read(bytes: &[u8]) -> Result<Image, PngDecodeErrors> {
    PngDecoder::new(bytes).decode()
}

/// Read a whole file and decode it as a png
#[cfg(feature = "std")]
pub fn png_read_file<P: AsRef<std::path::Path>>(path: P) -> Result<Image, ImageErrors> {
    let bytes = std::fs::read(path)?;

    Ok(png_read(&bytes)?)
}

/// Read a whole file and decode it as whatever format its bytes are in
#[cfg(feature = "std")]
pub fn image_read_file<P: AsRef<std::path::Path>>(path: P) -> Result<Image, ImageErrors> {
    let bytes = std::fs::read(path)?;

    image_read(&bytes)
}
