/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub const DEFLATE_BLOCKTYPE_UNCOMPRESSED: u64 = 0;
pub const DEFLATE_BLOCKTYPE_STATIC: u64 = 1;
pub const DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN: u64 = 2;

/// Number of symbols in each Huffman code.  Note: for the literal/length
/// and offset codes, these are actually the maximum values; a given block
/// might use fewer symbols.
pub const DEFLATE_NUM_PRECODE_SYMS: usize = 19;
pub const DEFLATE_NUM_LITLEN_SYMS: usize = 288;
pub const DEFLATE_NUM_OFFSET_SYMS: usize = 32;

/// Largest number of litlen and offset symbols a dynamic block may declare
pub const DEFLATE_MAX_DYNAMIC_LITLEN_SYMS: usize = 286;
pub const DEFLATE_MAX_DYNAMIC_OFFSET_SYMS: usize = 30;

/// The maximum number of symbols across all codes
pub const DEFLATE_MAX_NUM_SYMS: usize = 288;

/// Maximum codeword length across all codes.
pub const DEFLATE_MAX_CODEWORD_LENGTH: usize = 15;

/// Symbol marking the end of a huffman block
pub const DEFLATE_END_OF_BLOCK: usize = 256;

/// Order which precode lengths are stored
pub static DEFLATE_PRECODE_LENS_PERMUTATION: [u8; DEFLATE_NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15
];

/// Number of bits resolved by a single lookup in each
/// decode table, longer codewords fall back to a canonical walk.
pub const PRECODE_TABLE_BITS: usize = 7;
pub const LITLEN_TABLE_BITS: usize = 10;
pub const OFFSET_TABLEBITS: usize = 8;

/// Base lengths for length symbols 257..285
pub static LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258
];

/// Extra bits read after each length symbol
pub static LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0
];

/// Base distances for distance symbols 0..29
pub static DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577
];

/// Extra bits read after each distance symbol
pub static DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13
];
