/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(non_camel_case_types)]

use core::fmt::{Display, Formatter};

/// Chunk type according to table 5.3 of
/// the png spec, see https://www.w3.org/TR/2003/REC-PNG-20031110/
///
/// Tags the decoder has no name for are kept verbatim in `Unknown`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    cHRM,
    gAMA,
    iCCP,
    sBIT,
    sRGB,
    bKGD,
    hIST,
    tRNS,
    pHYs,
    sPLT,
    tIME,
    iTXt,
    tEXt,
    zTXt,
    eXIf,
    Unknown([u8; 4])
}

impl PngChunkType {
    /// Map a four byte chunk tag to its chunk type
    pub fn from_tag(tag: [u8; 4]) -> PngChunkType {
        match &tag {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            b"cHRM" => Self::cHRM,
            b"gAMA" => Self::gAMA,
            b"iCCP" => Self::iCCP,
            b"sBIT" => Self::sBIT,
            b"sRGB" => Self::sRGB,
            b"bKGD" => Self::bKGD,
            b"hIST" => Self::hIST,
            b"tRNS" => Self::tRNS,
            b"pHYs" => Self::pHYs,
            b"sPLT" => Self::sPLT,
            b"tIME" => Self::tIME,
            b"iTXt" => Self::iTXt,
            b"tEXt" => Self::tEXt,
            b"zTXt" => Self::zTXt,
            b"eXIf" => Self::eXIf,
            _ => Self::Unknown(tag)
        }
    }
    /// The four byte tag of this chunk as it appears in the file
    pub const fn tag(self) -> [u8; 4] {
        match self {
            Self::IHDR => *b"IHDR",
            Self::PLTE => *b"PLTE",
            Self::IDAT => *b"IDAT",
            Self::IEND => *b"IEND",
            Self::cHRM => *b"cHRM",
            Self::gAMA => *b"gAMA",
            Self::iCCP => *b"iCCP",
            Self::sBIT => *b"sBIT",
            Self::sRGB => *b"sRGB",
            Self::bKGD => *b"bKGD",
            Self::hIST => *b"hIST",
            Self::tRNS => *b"tRNS",
            Self::pHYs => *b"pHYs",
            Self::sPLT => *b"sPLT",
            Self::tIME => *b"tIME",
            Self::iTXt => *b"iTXt",
            Self::tEXt => *b"tEXt",
            Self::zTXt => *b"zTXt",
            Self::eXIf => *b"eXIf",
            Self::Unknown(tag) => tag
        }
    }
    /// Return true if a decoder must understand this chunk
    /// to display the image.
    ///
    /// This is bit 5 of the first tag byte, i.e an uppercase first letter.
    pub const fn is_critical(self) -> bool {
        self.tag()[0] & 0x20 == 0
    }
    /// Return true if a chunk should appear
    /// before the IDAT chunk
    pub const fn should_appear_before_idat(self) -> bool {
        matches!(
            self,
            Self::PLTE
                | Self::cHRM
                | Self::gAMA
                | Self::iCCP
                | Self::sBIT
                | Self::sRGB
                | Self::bKGD
                | Self::hIST
                | Self::tRNS
                | Self::pHYs
                | Self::sPLT
        )
    }
}

impl Display for PngChunkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for byte in self.tag() {
            if byte.is_ascii_alphabetic() {
                write!(f, "{}", char::from(byte))?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// Per scanline filter types
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum InterlaceMethod {
    Standard,
    Adam7,
    #[default]
    Unknown
}

impl InterlaceMethod {
    pub fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }
}

/// Colour types a png header can declare
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PngColor {
    Luma,
    Palette,
    LumaA,
    RGB,
    RGBA,
    #[default]
    Unknown
}

impl PngColor {
    /// Samples per pixel, a palette index counts as one
    pub const fn num_components(self) -> u8 {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4,
            PngColor::Unknown => 0
        }
    }
    pub(crate) fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }
    /// The colour type value as stored in `IHDR`
    pub const fn to_int(self) -> u8 {
        match self {
            PngColor::Luma => 0,
            PngColor::RGB => 2,
            PngColor::Palette => 3,
            PngColor::LumaA => 4,
            PngColor::RGBA => 6,
            PngColor::Unknown => u8::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PngChunkType;

    #[test]
    fn unknown_tags_survive() {
        let chunk = PngChunkType::from_tag(*b"prVt");

        assert_eq!(chunk, PngChunkType::Unknown(*b"prVt"));
        assert_eq!(chunk.tag(), *b"prVt");
        assert!(!chunk.is_critical());
        assert_eq!(alloc::format!("{chunk}"), "prVt");
    }

    #[test]
    fn criticality_follows_first_letter() {
        assert!(PngChunkType::IHDR.is_critical());
        assert!(PngChunkType::from_tag(*b"ABCD").is_critical());
        assert!(!PngChunkType::gAMA.is_critical());
    }
}
