/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

/// Append `length` bytes starting `distance` bytes back from the end of `dest`.
///
/// The caller ensures `1 <= distance <= dest.len()`.
#[inline(always)]
pub(crate) fn copy_rep_matches(dest: &mut Vec<u8>, distance: usize, length: usize) {
    let start = dest.len() - distance;

    if distance >= length {
        // source and destination don't overlap
        dest.extend_from_within(start..start + length);
        return;
    }
    // REP MATCHES (LITERAL + REP MATCH).
    //
    // As in most LZ77-based compressors, the length can be larger than the offset,
    // yielding a form of run-length encoding (RLE). For instance,
    // "xababab" could be encoded as
    //
    //   <literal: "xab"> <copy: offset=2 length=4>
    //
    // so each copied byte may itself be the source of a later one.
    dest.reserve(length);

    for i in start..start + length {
        let byte = dest[i];
        dest.push(byte);
    }
}

/// Calculate the adler32 hash of `data`
#[cfg(feature = "zlib")]
pub(crate) fn calc_adler_hash(data: &[u8]) -> u32 {
    use simd_adler32::Adler32;

    let mut hasher = Adler32::new();

    hasher.write(data);

    hasher.finish()
}
