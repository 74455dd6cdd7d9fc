/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline filter reversal
use alloc::vec;
use alloc::vec::Vec;

use crate::enums::FilterMethod;
use crate::error::PngDecodeErrors;
use crate::filters::de_filter::{
    handle_avg, handle_avg_first, handle_paeth, handle_paeth_first, handle_sub, handle_up
};

mod de_filter;

/// Reverse per-scanline filtering.
///
/// `raw` holds `height` rows of one filter byte followed by
/// `width * bytes_per_pixel` filtered bytes, the result is the same rows
/// without filter bytes. Bytes after the last row are ignored.
///
/// # Errors
/// - [`NotEnoughData`](PngDecodeErrors::NotEnoughData) if `raw` is shorter than the rows
/// - [`InvalidFilterType`](PngDecodeErrors::InvalidFilterType) for a filter byte above 4
pub fn unfilter(
    raw: &[u8], width: usize, height: usize, bytes_per_pixel: usize
) -> Result<Vec<u8>, PngDecodeErrors> {
    let overflow = || PngDecodeErrors::GenericStatic("Image dimensions overflow the address space");

    // add width plus colour component, this gives us number of bytes per every scan line
    let width_stride = width.checked_mul(bytes_per_pixel).ok_or_else(overflow)?;
    // filter type
    let chunk_size = width_stride.checked_add(1).ok_or_else(overflow)?;
    let expected = chunk_size.checked_mul(height).ok_or_else(overflow)?;

    if raw.len() < expected {
        return Err(PngDecodeErrors::NotEnoughData {
            expected,
            found: raw.len()
        });
    }

    let mut out = vec![0_u8; width_stride * height];

    if width_stride == 0 {
        return Ok(out);
    }

    // each chunk is a width stride of unfiltered data
    let chunks = raw.chunks_exact(chunk_size).take(height);

    for (row, in_stride) in chunks.enumerate() {
        // Split output into current and previous
        // current points to the start of the row where we are writing de-filtered output to
        // prev is all rows we already wrote output to.
        let (prev, current) = out.split_at_mut(row * width_stride);
        let current = &mut current[..width_stride];

        // take filter
        let filter_byte = in_stride[0];
        // raw image bytes
        let raw = &in_stride[1..];

        let filter = FilterMethod::from_int(filter_byte).ok_or(
            PngDecodeErrors::InvalidFilterType {
                row,
                filter: filter_byte
            }
        )?;

        if row == 0 {
            // special filters for the first row, these
            // treat the previous scanline as zero
            match filter {
                // up for the first row becomes a memcpy
                FilterMethod::None | FilterMethod::Up => current.copy_from_slice(raw),
                FilterMethod::Sub => handle_sub(raw, current, bytes_per_pixel),
                FilterMethod::Average => handle_avg_first(raw, current, bytes_per_pixel),
                FilterMethod::Paeth => handle_paeth_first(raw, current, bytes_per_pixel)
            }
            continue;
        }
        let prev_row = &prev[(row - 1) * width_stride..];

        match filter {
            FilterMethod::None => current.copy_from_slice(raw),
            FilterMethod::Sub => handle_sub(raw, current, bytes_per_pixel),
            FilterMethod::Up => handle_up(prev_row, raw, current),
            FilterMethod::Average => handle_avg(prev_row, raw, current, bytes_per_pixel),
            FilterMethod::Paeth => handle_paeth(prev_row, raw, current, bytes_per_pixel)
        }
    }

    Ok(out)
}
