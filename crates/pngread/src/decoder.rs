/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::format;
use alloc::vec::Vec;

use pngread_core::bytestream::ZByteReader;
use pngread_core::colorspace::ColorSpace;
use pngread_core::log::{trace, warn};
use pngread_core::options::DecoderOptions;
use pngread_inflate::{DeflateDecoder, DeflateOptions};

use crate::constants::{MAX_CHUNK_LENGTH, PNG_SIGNATURE};
use crate::enums::{InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::filters::unfilter;
use crate::headers::{
    parse_gama, parse_ihdr, parse_phys, parse_plte, parse_text, parse_time, PhysicalDimensions,
    TextChunk, TimeInfo
};
use crate::image::{assemble, Image};

/// A chunk as read from the stream, payload borrowed from the input
struct PngChunk<'a> {
    chunk_type: PngChunkType,
    payload:    &'a [u8],
    crc:        u32
}

/// A chunk the decoder keeps but does not need for pixels,
/// i.e everything except `IHDR`, `IDAT` and `IEND`
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChunkRecord {
    pub chunk_type: PngChunkType,
    pub payload:    Vec<u8>,
    /// CRC as stored in the file
    pub crc:        u32
}

/// Image information from `IHDR` and the
/// ancillary chunks the decoder understands
#[derive(Default, Debug, Clone)]
pub struct PngInfo {
    pub width:               usize,
    pub height:              usize,
    pub depth:               u8,
    pub color:               PngColor,
    pub component:           u8,
    pub compression_method:  u8,
    pub filter_method:       u8,
    pub interlace_method:    InterlaceMethod,
    /// Image gamma times 100000, from `gAMA`
    pub gamma:               Option<u32>,
    pub physical_dimensions: Option<PhysicalDimensions>,
    pub time_info:           Option<TimeInfo>,
    pub text:                Vec<TextChunk>,
    /// Number of `PLTE` entries, zero if there is no palette
    pub palette_entries:     usize
}

/// The result of walking every chunk of a png
#[derive(Debug, Clone)]
pub struct ParsedPng {
    pub info:       PngInfo,
    /// Concatenated `IDAT` payloads, a single zlib stream
    pub compressed: Vec<u8>,
    pub ancillary:  Vec<ChunkRecord>
}

/// Walk every chunk in `data` returning the header,
/// the compressed image data and the remaining chunks
///
/// Nothing is decompressed.
pub fn parse_chunks(data: &[u8]) -> Result<ParsedPng, PngDecodeErrors> {
    parse_chunks_with_options(data, DecoderOptions::default())
}

/// Like [`parse_chunks`] with custom options, e.g to
/// skip CRC checks or enable strict mode
pub fn parse_chunks_with_options(
    data: &[u8], options: DecoderOptions
) -> Result<ParsedPng, PngDecodeErrors> {
    let mut decoder = PngDecoder::new_with_options(data, options);

    decoder.decode_headers()?;

    Ok(ParsedPng {
        info:       decoder.png_info,
        compressed: decoder.idat_chunks,
        ancillary:  decoder.ancillary
    })
}

/// A png decoder instance
///
/// The decoder reads every chunk up to `IEND` before decoding, then
/// inflates the concatenated `IDAT` data, undoes the scanline filters
/// and assembles RGB pixels.
pub struct PngDecoder<T: AsRef<[u8]>> {
    seen_hdr:        bool,
    headers_decoded: bool,
    stream:          ZByteReader<T>,
    options:         DecoderOptions,
    png_info:        PngInfo,
    idat_chunks:     Vec<u8>,
    ancillary:       Vec<ChunkRecord>
}

impl<T: AsRef<[u8]>> PngDecoder<T> {
    /// Create a new decoder with default options
    pub fn new(data: T) -> PngDecoder<T> {
        let default_opt = DecoderOptions::default();

        PngDecoder::new_with_options(data, default_opt)
    }
    /// Create a new decoder with the specified options
    pub fn new_with_options(data: T, options: DecoderOptions) -> PngDecoder<T> {
        PngDecoder {
            seen_hdr: false,
            headers_decoded: false,
            stream: ZByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            idat_chunks: Vec::with_capacity(37), // randomly chosen size, my favourite number,
            ancillary: Vec::new()
        }
    }

    /// Get image dimensions as `(width, height)`
    ///
    /// Returns `None` if headers haven't been decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if !self.seen_hdr {
            return None;
        }
        Some((self.png_info.width, self.png_info.height))
    }
    /// Get the colorspace the image is stored in
    ///
    /// Returns `None` if headers haven't been decoded
    pub fn colorspace(&self) -> Option<ColorSpace> {
        if !self.seen_hdr {
            return None;
        }
        match self.png_info.color {
            PngColor::Palette => Some(ColorSpace::Palette),
            PngColor::Luma => Some(ColorSpace::Luma),
            PngColor::LumaA => Some(ColorSpace::LumaA),
            PngColor::RGB => Some(ColorSpace::RGB),
            PngColor::RGBA => Some(ColorSpace::RGBA),
            PngColor::Unknown => None
        }
    }
    /// Get image information
    ///
    /// Returns `None` if headers haven't been decoded
    pub const fn info(&self) -> Option<&PngInfo> {
        if !self.seen_hdr {
            return None;
        }
        Some(&self.png_info)
    }
    /// Chunks other than `IHDR`, `IDAT` and `IEND` in file order
    ///
    /// Empty until headers have been decoded
    pub fn ancillary_chunks(&self) -> &[ChunkRecord] {
        &self.ancillary
    }

    /// Walk every chunk up to `IEND`, verifying CRCs and chunk
    /// ordering, and collect the `IDAT` payloads.
    ///
    /// Calling this more than once is a no-op.
    pub fn decode_headers(&mut self) -> Result<(), PngDecodeErrors> {
        if self.headers_decoded {
            return Ok(());
        }
        // READ PNG signature
        let signature = self
            .stream
            .read_fixed_bytes::<8>()
            .map_err(|_| PngDecodeErrors::InvalidSignature)?;

        if signature != PNG_SIGNATURE {
            return Err(PngDecodeErrors::InvalidSignature);
        }

        let confirm_crc = cfg!(feature = "crc") && self.options.png_get_confirm_crc();
        let strict = self.options.get_strict_mode();

        let mut seen_idat = false;
        let mut last_was_idat = false;

        loop {
            if self.stream.eof() {
                return Err(PngDecodeErrors::TruncatedStream);
            }
            let chunk = read_chunk(&mut self.stream, confirm_crc)?;
            let chunk_type = chunk.chunk_type;

            trace!("Chunk {}, length {}", chunk_type, chunk.payload.len());

            if !self.seen_hdr && chunk_type != PngChunkType::IHDR {
                return Err(PngDecodeErrors::MissingHeader);
            }

            match chunk_type {
                PngChunkType::IHDR => {
                    if self.seen_hdr {
                        return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
                    }
                    self.png_info = parse_ihdr(chunk.payload, &self.options)?;
                    self.seen_hdr = true;
                }
                PngChunkType::IDAT => {
                    if seen_idat && !last_was_idat {
                        if strict {
                            return Err(PngDecodeErrors::GenericStatic(
                                "IDAT chunks are not consecutive"
                            ));
                        }
                        warn!("IDAT chunks are not consecutive, appending anyway");
                    }
                    // we will later pass these to the deflate decoder as a whole, to get the whole
                    // uncompressed stream.
                    self.idat_chunks.extend_from_slice(chunk.payload);
                    seen_idat = true;
                }
                PngChunkType::IEND => {
                    if !chunk.payload.is_empty() {
                        return Err(PngDecodeErrors::GenericStatic("IEND chunk is not empty"));
                    }
                    if !self.stream.eof() {
                        warn!("{} bytes after IEND, ignoring them", self.stream.remaining());
                    }
                    break;
                }
                _ => {
                    if chunk_type == PngChunkType::PLTE {
                        if seen_idat {
                            return Err(PngDecodeErrors::GenericStatic("PLTE chunk after IDAT"));
                        }
                        self.png_info.palette_entries = parse_plte(chunk.payload)?;
                    } else if chunk_type.is_critical() {
                        if strict {
                            return Err(PngDecodeErrors::Generic(format!(
                                "Unknown critical chunk {chunk_type}"
                            )));
                        }
                        warn!("Unknown critical chunk {}, ignoring it", chunk_type);
                    } else if seen_idat && chunk_type.should_appear_before_idat() {
                        warn!("Chunk {} should appear before IDAT", chunk_type);
                    }

                    parse_ancillary(&mut self.png_info, chunk_type, chunk.payload, strict)?;

                    self.ancillary.push(ChunkRecord {
                        chunk_type,
                        payload: chunk.payload.to_vec(),
                        crc: chunk.crc
                    });
                }
            }
            last_was_idat = chunk_type == PngChunkType::IDAT;
        }

        if !seen_idat {
            return Err(PngDecodeErrors::GenericStatic("No IDAT chunks found"));
        }
        self.headers_decoded = true;

        Ok(())
    }

    /// Decode the image into RGB pixels
    ///
    /// Only non-interlaced 8 bit RGB and 8 bit greyscale images can be
    /// decoded, other images return
    /// [`UnsupportedColorFormat`](PngDecodeErrors::UnsupportedColorFormat) or
    /// [`UnsupportedInterlace`](PngDecodeErrors::UnsupportedInterlace).
    ///
    /// The compressed data is released once inflated, so this
    /// can only succeed once per decoder.
    pub fn decode(&mut self) -> Result<Image, PngDecodeErrors> {
        self.decode_headers()?;

        let info = &self.png_info;

        if !matches!((info.color, info.depth), (PngColor::RGB | PngColor::Luma, 8)) {
            return Err(PngDecodeErrors::UnsupportedColorFormat {
                color: info.color.to_int(),
                depth: info.depth
            });
        }
        if info.interlace_method != InterlaceMethod::Standard {
            return Err(PngDecodeErrors::UnsupportedInterlace);
        }

        let bytes_per_pixel = usize::from(info.component);
        // filter byte plus the row
        let raw_size = info
            .width
            .checked_mul(bytes_per_pixel)
            .and_then(|x| x.checked_add(1))
            .and_then(|x| x.checked_mul(info.height))
            .ok_or(PngDecodeErrors::GenericStatic(
                "Image dimensions overflow the address space"
            ))?;

        let deflate_options = DeflateOptions::default()
            .set_limit(raw_size.min(self.options.inflate_get_limit()))
            .set_size_hint(raw_size)
            .set_confirm_checksum(self.options.inflate_get_confirm_adler());

        // remove idat chunks from memory once inflated
        let compressed = core::mem::take(&mut self.idat_chunks);
        let raw = DeflateDecoder::new_with_options(&compressed, deflate_options).decode_zlib()?;

        drop(compressed);

        let reconstructed = unfilter(&raw, info.width, info.height, bytes_per_pixel)?;

        drop(raw);

        assemble(&reconstructed, info)
    }
}

fn read_chunk<T: AsRef<[u8]>>(
    stream: &mut ZByteReader<T>, confirm_crc: bool
) -> Result<PngChunk<'_>, PngDecodeErrors> {
    // Format is length - chunk type - [data] -  crc chunk
    let chunk_length = stream.read_u32_be()? as usize;

    if chunk_length > MAX_CHUNK_LENGTH {
        return Err(PngDecodeErrors::Generic(format!(
            "Chunk length {chunk_length} larger than the 2^31 - 1 bytes allowed"
        )));
    }
    let chunk_type = PngChunkType::from_tag(stream.read_fixed_bytes::<4>()?);

    // go back and point to chunk type, the crc covers it.
    stream.rewind(4)?;

    let bytes = stream.read_bytes(chunk_length + 4 + 4)?;
    let (covered, crc_bytes) = bytes.split_at(chunk_length + 4);

    let crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

    // Confirm the CRC here, before anything looks at the payload
    #[cfg(feature = "crc")]
    {
        if confirm_crc {
            let found = crate::crc::crc32(covered);

            if crc != found {
                return Err(PngDecodeErrors::CrcMismatch {
                    chunk: chunk_type,
                    expected: crc,
                    found
                });
            }
        }
    }
    #[cfg(not(feature = "crc"))]
    {
        let _ = confirm_crc;
    }

    Ok(PngChunk {
        chunk_type,
        payload: &covered[4..],
        crc
    })
}

/// Fill in typed metadata for chunks we understand.
///
/// Malformed metadata is an error in strict mode, otherwise
/// it is logged and the chunk is only kept as a record.
fn parse_ancillary(
    info: &mut PngInfo, chunk_type: PngChunkType, payload: &[u8], strict: bool
) -> Result<(), PngDecodeErrors> {
    let result = match chunk_type {
        PngChunkType::gAMA => parse_gama(payload).map(|gamma| info.gamma = Some(gamma)),
        PngChunkType::pHYs => {
            parse_phys(payload).map(|dims| info.physical_dimensions = Some(dims))
        }
        PngChunkType::tIME => parse_time(payload).map(|time| info.time_info = Some(time)),
        PngChunkType::tEXt => parse_text(payload).map(|text| info.text.push(text)),
        _ => Ok(())
    };

    match result {
        Err(err) if !strict => {
            warn!("Ignoring malformed {} chunk: {:?}", chunk_type, err);
            Ok(())
        }
        result => result
    }
}
