/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Parsers for chunk payloads the decoder understands
use alloc::format;
use alloc::string::String;

use pngread_core::bytestream::ZByteReader;
use pngread_core::log::info;
use pngread_core::options::DecoderOptions;

use crate::constants::IHDR_LENGTH;
use crate::decoder::PngInfo;
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;

/// Physical pixel dimensions from a `pHYs` chunk
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PhysicalDimensions {
    /// Pixels per unit, X axis
    pub x:    u32,
    /// Pixels per unit, Y axis
    pub y:    u32,
    /// 0: unknown unit, only the aspect ratio is meaningful,
    /// 1: the unit is the metre
    pub unit: u8
}

/// Last modification time from a `tIME` chunk, in UTC
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TimeInfo {
    pub year:   u16,
    pub month:  u8,
    pub day:    u8,
    pub hour:   u8,
    pub minute: u8,
    pub second: u8
}

/// A keyword and its text from a `tEXt` chunk
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TextChunk {
    pub keyword: String,
    pub text:    String
}

pub(crate) fn parse_ihdr(
    payload: &[u8], options: &DecoderOptions
) -> Result<PngInfo, PngDecodeErrors> {
    if payload.len() != IHDR_LENGTH {
        return Err(PngDecodeErrors::GenericStatic("BAD IHDR length"));
    }

    let mut stream = ZByteReader::new(payload);
    let mut png_info = PngInfo::default();

    png_info.width = stream.read_u32_be()? as usize;
    png_info.height = stream.read_u32_be()? as usize;

    if png_info.width == 0 || png_info.height == 0 {
        return Err(PngDecodeErrors::GenericStatic("Width or height cannot be zero"));
    }

    if png_info.width > options.get_max_width() {
        return Err(PngDecodeErrors::TooLargeDimensions {
            dimension: "width",
            limit:     options.get_max_width(),
            found:     png_info.width
        });
    }

    if png_info.height > options.get_max_height() {
        return Err(PngDecodeErrors::TooLargeDimensions {
            dimension: "height",
            limit:     options.get_max_height(),
            found:     png_info.height
        });
    }

    png_info.depth = stream.read_u8()?;
    let color = stream.read_u8()?;

    if let Some(img_color) = PngColor::from_int(color) {
        png_info.color = img_color;
    } else {
        return Err(PngDecodeErrors::Generic(format!("Unknown color value {color}")));
    }
    png_info.component = png_info.color.num_components();
    // verify colors plus bit depths
    match png_info.depth {
        1 | 2 | 4 => {
            if !matches!(png_info.color, PngColor::Luma | PngColor::Palette) {
                return Err(PngDecodeErrors::Generic(format!(
                    "Bit depth of {} only allows Greyscale or Indexed color types, but found {:?}",
                    png_info.depth, png_info.color
                )));
            }
        }
        8 => { /*silent pass through since all color types support it */ }
        16 => {
            if png_info.color == PngColor::Palette {
                return Err(PngDecodeErrors::GenericStatic(
                    "Indexed colour cannot have 16 bit depth"
                ));
            }
        }
        _ => {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown bit depth {}",
                png_info.depth
            )))
        }
    }

    png_info.compression_method = stream.read_u8()?;

    if png_info.compression_method != 0 {
        return Err(PngDecodeErrors::UnsupportedCompression(
            png_info.compression_method
        ));
    }

    png_info.filter_method = stream.read_u8()?;

    if png_info.filter_method != 0 {
        return Err(PngDecodeErrors::Generic(format!(
            "Unknown filter method {}",
            png_info.filter_method
        )));
    }

    let interlace_method = stream.read_u8()?;

    if let Some(method) = InterlaceMethod::from_int(interlace_method) {
        png_info.interlace_method = method;
    } else {
        return Err(PngDecodeErrors::Generic(format!(
            "Unknown interlace method {interlace_method}",
        )));
    }

    info!("Width: {}", png_info.width);
    info!("Height: {}", png_info.height);
    info!("Color type: {:?}", png_info.color);
    info!("Depth: {:?}", png_info.depth);
    info!("Interlace :{:?}", png_info.interlace_method);

    Ok(png_info)
}

/// Validate a `PLTE` payload, returning the number of entries
pub(crate) fn parse_plte(payload: &[u8]) -> Result<usize, PngDecodeErrors> {
    if payload.len() % 3 != 0 || payload.is_empty() || payload.len() > 256 * 3 {
        return Err(PngDecodeErrors::Generic(format!(
            "Invalid PLTE length {}, corrupt PNG",
            payload.len()
        )));
    }
    Ok(payload.len() / 3)
}

/// Gamma times 100000
pub(crate) fn parse_gama(payload: &[u8]) -> Result<u32, PngDecodeErrors> {
    if payload.len() != 4 {
        return Err(PngDecodeErrors::Generic(format!(
            "Gama chunk length is not 4 but {}",
            payload.len()
        )));
    }
    Ok(ZByteReader::new(payload).read_u32_be()?)
}

pub(crate) fn parse_phys(payload: &[u8]) -> Result<PhysicalDimensions, PngDecodeErrors> {
    if payload.len() != 9 {
        return Err(PngDecodeErrors::Generic(format!(
            "pHYs chunk length is not 9 but {}",
            payload.len()
        )));
    }
    let mut stream = ZByteReader::new(payload);

    let x = stream.read_u32_be()?;
    let y = stream.read_u32_be()?;
    let unit = stream.read_u8()?;

    if unit > 1 {
        return Err(PngDecodeErrors::Generic(format!("Unknown pHYs unit {unit}")));
    }

    Ok(PhysicalDimensions { x, y, unit })
}

pub(crate) fn parse_time(payload: &[u8]) -> Result<TimeInfo, PngDecodeErrors> {
    if payload.len() != 7 {
        return Err(PngDecodeErrors::Generic(format!(
            "tIME chunk length is not 7 but {}",
            payload.len()
        )));
    }
    let mut stream = ZByteReader::new(payload);

    let time = TimeInfo {
        year:   stream.read_u16_be()?,
        month:  stream.read_u8()?,
        day:    stream.read_u8()?,
        hour:   stream.read_u8()?,
        minute: stream.read_u8()?,
        // 60 allows for leap seconds
        second: stream.read_u8()?
    };

    if !(1..=12).contains(&time.month)
        || !(1..=31).contains(&time.day)
        || time.hour > 23
        || time.minute > 59
        || time.second > 60
    {
        return Err(PngDecodeErrors::GenericStatic("tIME chunk has an invalid date"));
    }
    Ok(time)
}

/// `tEXt` is a 1-79 byte keyword, a null separator and then text, both Latin-1
pub(crate) fn parse_text(payload: &[u8]) -> Result<TextChunk, PngDecodeErrors> {
    let separator = payload
        .iter()
        .position(|x| *x == 0)
        .ok_or(PngDecodeErrors::GenericStatic("tEXt chunk has no keyword separator"))?;

    if separator == 0 || separator > 79 {
        return Err(PngDecodeErrors::Generic(format!(
            "tEXt keyword length {separator} is outside 1..=79"
        )));
    }
    let latin1 = |bytes: &[u8]| bytes.iter().map(|x| char::from(*x)).collect::<String>();

    Ok(TextChunk {
        keyword: latin1(&payload[..separator]),
        text:    latin1(&payload[separator + 1..])
    })
}
