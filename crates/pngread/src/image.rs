/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoded pixels
use alloc::vec::Vec;
use core::ops::Index;

use bytemuck::{Pod, Zeroable};

use crate::decoder::PngInfo;
use crate::enums::PngColor;
use crate::error::PngDecodeErrors;

/// An 8 bit RGB pixel
///
/// The layout is three packed bytes, so a pixel
/// slice can be viewed as bytes with `bytemuck`
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
pub struct Pixel {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8
}

impl Pixel {
    pub const fn new(red: u8, green: u8, blue: u8) -> Pixel {
        Pixel { red, green, blue }
    }
    /// A grey pixel, all channels set to `value`
    pub const fn grey(value: u8) -> Pixel {
        Pixel::new(value, value, value)
    }
}

impl From<(u8, u8, u8)> for Pixel {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Pixel::new(red, green, blue)
    }
}

/// A decoded image, rows of `width` pixels top to bottom
///
/// Rows are available via indexing, `image[y][x]` is the
/// pixel at column `x` of row `y`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    width:  usize,
    height: usize,
    pixels: Vec<Pixel>
}

impl Image {
    /// Create an image from pixels in row-major order
    ///
    /// # Errors
    /// If either dimension is zero or `pixels` does not
    /// hold exactly `width * height` pixels
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Image, PngDecodeErrors> {
        if width == 0 || height == 0 {
            return Err(PngDecodeErrors::GenericStatic("Width or height cannot be zero"));
        }
        let expected = width.checked_mul(height).ok_or(PngDecodeErrors::GenericStatic(
            "Image dimensions overflow the address space"
        ))?;

        if pixels.len() != expected {
            return Err(PngDecodeErrors::NotEnoughData {
                expected,
                found: pixels.len()
            });
        }
        Ok(Image {
            width,
            height,
            pixels
        })
    }
    pub const fn width(&self) -> usize {
        self.width
    }
    pub const fn height(&self) -> usize {
        self.height
    }
    /// `(width, height)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    /// Row `y`, or `None` if `y` is past the last row
    pub fn row(&self, y: usize) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        Some(&self.pixels[y * self.width..(y + 1) * self.width])
    }
    /// Iterate over rows top to bottom
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Pixel]> {
        self.pixels.chunks_exact(self.width)
    }
    /// All pixels in row-major order
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }
    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }
    /// Pixels as packed `R, G, B` bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl Index<usize> for Image {
    type Output = [Pixel];

    /// # Panics
    /// If `y` is past the last row
    fn index(&self, y: usize) -> &[Pixel] {
        assert!(y < self.height, "row {y} out of bounds for image with {} rows", self.height);
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

/// Turn unfiltered scanlines into pixels
///
/// 8 bit RGB takes three bytes per pixel, 8 bit greyscale
/// replicates its one byte into every channel.
///
/// # Errors
/// - [`UnsupportedColorFormat`](PngDecodeErrors::UnsupportedColorFormat) for any other format
/// - [`NotEnoughData`](PngDecodeErrors::NotEnoughData) if `reconstructed` is too short
pub fn assemble(reconstructed: &[u8], info: &PngInfo) -> Result<Image, PngDecodeErrors> {
    let num_pixels = info.width.checked_mul(info.height).ok_or(
        PngDecodeErrors::GenericStatic("Image dimensions overflow the address space")
    )?;
    let components = usize::from(info.color.num_components());

    let check_len = |expected: usize| {
        if reconstructed.len() < expected {
            return Err(PngDecodeErrors::NotEnoughData {
                expected,
                found: reconstructed.len()
            });
        }
        Ok(())
    };

    let pixels: Vec<Pixel> = match (info.color, info.depth) {
        (PngColor::RGB, 8) => {
            check_len(num_pixels * components)?;

            reconstructed
                .chunks_exact(3)
                .take(num_pixels)
                .map(|rgb| Pixel::new(rgb[0], rgb[1], rgb[2]))
                .collect()
        }
        (PngColor::Luma, 8) => {
            check_len(num_pixels * components)?;

            reconstructed
                .iter()
                .take(num_pixels)
                .map(|luma| Pixel::grey(*luma))
                .collect()
        }
        (color, depth) => {
            return Err(PngDecodeErrors::UnsupportedColorFormat {
                color: color.to_int(),
                depth
            })
        }
    };

    Image::new(info.width, info.height, pixels)
}
