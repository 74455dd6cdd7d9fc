/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::format;
use alloc::vec::Vec;

use crate::bitstream::BitStreamReader;
use crate::constants::{
    DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_END_OF_BLOCK, DEFLATE_MAX_DYNAMIC_LITLEN_SYMS, DEFLATE_MAX_DYNAMIC_OFFSET_SYMS,
    DEFLATE_NUM_LITLEN_SYMS, DEFLATE_NUM_OFFSET_SYMS, DEFLATE_NUM_PRECODE_SYMS,
    DEFLATE_PRECODE_LENS_PERMUTATION, DISTANCE_BASE, DISTANCE_EXTRA_BITS, LENGTH_BASE,
    LENGTH_EXTRA_BITS, LITLEN_TABLE_BITS, OFFSET_TABLEBITS, PRECODE_TABLE_BITS
};
use crate::errors::{DecodeErrorStatus, InflateDecodeErrors};
use crate::huffman::HuffmanTable;
use crate::utils::copy_rep_matches;

/// Options that can influence decompression
/// in Deflate/Zlib streams
#[derive(Debug, Copy, Clone)]
pub struct DeflateOptions {
    limit:            usize,
    confirm_checksum: bool,
    size_hint:        usize
}

impl Default for DeflateOptions {
    fn default() -> Self {
        DeflateOptions {
            limit:            1 << 30,
            confirm_checksum: true,
            size_hint:        37000
        }
    }
}

impl DeflateOptions {
    /// Get deflate/zlib limit option
    ///
    /// The decoder won't extend the output past this many bytes
    pub const fn get_limit(&self) -> usize {
        self.limit
    }
    /// Set a limit to the internal vector
    /// used to store decoded bytes.
    ///
    /// Exceeding the limit is reported as
    /// [`OutputLimitExceeded`](crate::errors::DecodeErrorStatus::OutputLimitExceeded)
    #[must_use]
    pub fn set_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
    /// Get whether the decoder will confirm the adler32
    /// checksum of a zlib stream
    pub const fn get_confirm_checksum(&self) -> bool {
        self.confirm_checksum
    }
    /// Set whether the decoder should confirm the adler32
    /// checksum of a zlib stream.
    ///
    /// Has no effect when the `zlib` feature is disabled
    #[must_use]
    pub fn set_confirm_checksum(mut self, yes: bool) -> Self {
        self.confirm_checksum = yes;
        self
    }
    /// Get the initial capacity of the output buffer
    pub const fn get_size_hint(&self) -> usize {
        self.size_hint
    }
    /// Set the initial capacity of the output buffer.
    ///
    /// A good hint saves reallocations, it is capped by the limit
    #[must_use]
    pub fn set_size_hint(mut self, hint: usize) -> Self {
        self.size_hint = hint;
        self
    }
}

struct StaticTables {
    litlen: HuffmanTable,
    offset: HuffmanTable
}

impl StaticTables {
    fn new() -> Result<StaticTables, DecodeErrorStatus> {
        let mut litlen_lens = [0_u8; DEFLATE_NUM_LITLEN_SYMS];

        litlen_lens[..144].fill(8);
        litlen_lens[144..256].fill(9);
        litlen_lens[256..280].fill(7);
        litlen_lens[280..].fill(8);

        let offset_lens = [5_u8; DEFLATE_NUM_OFFSET_SYMS];

        Ok(StaticTables {
            litlen: HuffmanTable::new(&litlen_lens, LITLEN_TABLE_BITS)?,
            offset: HuffmanTable::new(&offset_lens, OFFSET_TABLEBITS)?
        })
    }
}

/// A deflate decoder instance.
///
/// The decoder decodes the whole stream into one `Vec<u8>`,
/// there is no streaming support.
pub struct DeflateDecoder<'a> {
    data:          &'a [u8],
    position:      usize,
    stream:        BitStreamReader<'a>,
    is_last_block: bool,
    static_tables: Option<StaticTables>,
    options:       DeflateOptions
}

impl<'a> DeflateDecoder<'a> {
    /// Create a new decompressor that will read compressed
    /// data from `data` and return a new vector containing new data
    ///
    /// # Arguments
    /// - `data`: The compressed data. Data can be of any format i.e
    /// gzip, zlib or raw deflate.
    ///
    /// # Returns
    /// A decoder instance which will pull compressed data from `data` to inflate the output output
    ///
    /// # Note
    ///
    /// The default output size limit is **1 GiB.**
    /// this is to protect the end user against ddos attacks as deflate
    /// does not specify it's output size upfront
    ///
    /// The checksum will be verified depending on the called function.
    /// this only works for zlib where the adler32 trailer is
    /// checked when the `zlib` feature is enabled
    pub fn new(data: &'a [u8]) -> DeflateDecoder<'a> {
        let options = DeflateOptions::default();

        Self::new_with_options(data, options)
    }
    /// Create new decoder with specified options
    ///
    /// This can be used to fine tune the decoder to the user's
    /// needs.
    ///
    ///
    /// # Arguments
    /// - `data`: The compressed data.
    /// - `options`: A set of user defined options which tune how the decompressor
    ///
    /// # Returns
    /// A decoder instance which will pull compressed data from `data` to inflate output
    ///
    /// # Example
    /// ```no_run
    /// use pngread_inflate::{DeflateDecoder, DeflateOptions};
    /// let data  = [37];
    /// let options = DeflateOptions::default()
    ///     .set_confirm_checksum(true) // confirm the checksum for zlib streams
    ///     .set_limit(1 << 20) // how big we expect our output to be
    ///     .set_size_hint(1024);
    /// let mut decoder = DeflateDecoder::new_with_options(&data,options);
    /// let output = decoder.decode_zlib().unwrap();
    /// ```
    pub fn new_with_options(data: &'a [u8], options: DeflateOptions) -> DeflateDecoder<'a> {
        DeflateDecoder {
            data,
            position: 0,
            stream: BitStreamReader::new(data),
            is_last_block: false,
            static_tables: None,
            options
        }
    }
    /// Decode zlib-encoded data returning the uncompressed in a `Vec<u8>`
    /// or an error if something went wrong.
    ///
    /// Bytes after the adler32 trailer are ignored.
    ///
    /// # Returns
    /// - `Ok(data)`:  Uncompressed data
    /// - `Err(err)`: Error that occurred during decoding,
    ///  the error carries whatever was decoded before the failure
    pub fn decode_zlib(&mut self) -> Result<Vec<u8>, InflateDecodeErrors> {
        if self.data.len()
            < 2 /* zlib header */
            + 4
        /* Deflate */
        {
            return Err(InflateDecodeErrors::new_with_error(
                DecodeErrorStatus::InsufficientData
            ));
        }

        // Zlib flags
        // See https://www.ietf.org/rfc/rfc1950.txt for
        // the RFC
        let cmf = self.data[0];
        let flg = self.data[1];

        let cm = cmf & 0xF;
        let cinfo = cmf >> 4;

        // confirm we have the right deflate methods
        if cm != 8 {
            return Err(InflateDecodeErrors::new_with_error(
                DecodeErrorStatus::UnsupportedCompression(cm)
            ));
        }
        if cinfo > 7 {
            return Err(InflateDecodeErrors::new_with_error(
                DecodeErrorStatus::GenericStr(format!(
                    "Unknown cinfo `{cinfo}` greater than 7, not allowed"
                ))
            ));
        }
        let flag_checks = (u16::from(cmf) * 256) + u16::from(flg);

        if flag_checks % 31 != 0 {
            return Err(InflateDecodeErrors::new_with_error(
                DecodeErrorStatus::Generic("FCHECK integrity not preserved")
            ));
        }
        if (flg >> 5) & 1 == 1 {
            return Err(InflateDecodeErrors::new_with_error(
                DecodeErrorStatus::Generic("Preset dictionaries are not supported")
            ));
        }

        self.position = 2;

        let mut out = self.new_output();

        if let Err(err) = self.decode_blocks(&mut out) {
            return Err(InflateDecodeErrors::new(err, out));
        }

        #[cfg(feature = "zlib")]
        {
            if self.options.confirm_checksum {
                let trailer = match self.data.get(self.position..self.position + 4) {
                    Some(trailer) => trailer,
                    None => {
                        return Err(InflateDecodeErrors::new(
                            DecodeErrorStatus::InsufficientData,
                            out
                        ))
                    }
                };
                let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
                let found = crate::utils::calc_adler_hash(&out);

                if expected != found {
                    return Err(InflateDecodeErrors::new(
                        DecodeErrorStatus::MismatchedAdler(expected, found),
                        out
                    ));
                }
            }
        }

        Ok(out)
    }

    /// Decode a raw deflate stream, without a zlib header or trailer
    ///
    /// # Returns
    /// - `Ok(data)`:  Uncompressed data
    /// - `Err(err)`: Error that occurred during decoding
    pub fn decode_deflate(&mut self) -> Result<Vec<u8>, InflateDecodeErrors> {
        let mut out = self.new_output();

        match self.decode_blocks(&mut out) {
            Ok(()) => Ok(out),
            Err(err) => Err(InflateDecodeErrors::new(err, out))
        }
    }

    fn new_output(&self) -> Vec<u8> {
        Vec::with_capacity(self.options.size_hint.min(self.options.limit))
    }

    fn decode_blocks(&mut self, out: &mut Vec<u8>) -> Result<(), DecodeErrorStatus> {
        // re-read the stream so that we can remove code read by zlib
        self.stream = BitStreamReader::new(self.data.get(self.position..).unwrap_or(&[]));
        self.is_last_block = false;

        while !self.is_last_block {
            self.stream.refill();

            self.is_last_block = self.stream.get_bits(1) == 1;
            let block_type = self.stream.get_bits(2);

            if self.stream.is_over_read() {
                return Err(DecodeErrorStatus::InsufficientData);
            }

            match block_type {
                DEFLATE_BLOCKTYPE_UNCOMPRESSED => self.decode_stored_block(out)?,
                DEFLATE_BLOCKTYPE_STATIC => {
                    if self.static_tables.is_none() {
                        self.static_tables = Some(StaticTables::new()?);
                    }
                    if let Some(tables) = &self.static_tables {
                        decode_huffman_block(
                            &mut self.stream,
                            &tables.litlen,
                            &tables.offset,
                            out,
                            self.options.limit
                        )?;
                    }
                }
                DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN => {
                    let (litlen, offset) = self.read_dynamic_tables()?;

                    decode_huffman_block(&mut self.stream, &litlen, &offset, out, self.options.limit)?;
                }
                _ => return Err(DecodeErrorStatus::CorruptData("Reserved block type"))
            }
        }
        // hand unused whole bytes back so the zlib trailer can be found
        if !self.stream.align_to_byte_boundary() {
            return Err(DecodeErrorStatus::InsufficientData);
        }
        self.position += self.stream.get_position();

        Ok(())
    }

    fn decode_stored_block(&mut self, out: &mut Vec<u8>) -> Result<(), DecodeErrorStatus> {
        if !self.stream.align_to_byte_boundary() {
            return Err(DecodeErrorStatus::InsufficientData);
        }
        let header = self
            .stream
            .read_aligned_bytes(4)
            .ok_or(DecodeErrorStatus::InsufficientData)?;

        let len = u16::from_le_bytes([header[0], header[1]]);
        let nlen = u16::from_le_bytes([header[2], header[3]]);

        if len != !nlen {
            return Err(DecodeErrorStatus::CorruptData(
                "Stored block length does not match its one's complement"
            ));
        }
        let len = usize::from(len);
        let new_size = out.len() + len;

        if new_size > self.options.limit {
            return Err(DecodeErrorStatus::OutputLimitExceeded(self.options.limit, new_size));
        }
        let bytes = self
            .stream
            .read_aligned_bytes(len)
            .ok_or(DecodeErrorStatus::InsufficientData)?;

        out.extend_from_slice(bytes);

        Ok(())
    }

    fn read_dynamic_tables(&mut self) -> Result<(HuffmanTable, HuffmanTable), DecodeErrorStatus> {
        // Read codeword lengths
        let num_litlen_syms = 257 + (self.stream.get_bits(5)) as usize;
        let num_offset_syms = 1 + (self.stream.get_bits(5)) as usize;
        let num_explicit_precode_lens = 4 + (self.stream.get_bits(4)) as usize;

        let mut precode_lens = [0; DEFLATE_NUM_PRECODE_SYMS];

        for i in DEFLATE_PRECODE_LENS_PERMUTATION
            .iter()
            .take(num_explicit_precode_lens)
        {
            // 19 lengths of 3 bits don't fit in a single refill
            self.stream.refill();
            precode_lens[usize::from(*i)] = self.stream.get_bits(3) as u8;
        }

        if self.stream.is_over_read() {
            return Err(DecodeErrorStatus::InsufficientData);
        }
        if num_litlen_syms > DEFLATE_MAX_DYNAMIC_LITLEN_SYMS {
            return Err(DecodeErrorStatus::CorruptData("Too many literal/length codes"));
        }
        if num_offset_syms > DEFLATE_MAX_DYNAMIC_OFFSET_SYMS {
            return Err(DecodeErrorStatus::CorruptData("Too many distance codes"));
        }

        let precode = HuffmanTable::new(&precode_lens, PRECODE_TABLE_BITS)?;

        // litlen and offset lengths are one sequence, a repeat may cross
        // from one into the other.
        let total_syms = num_litlen_syms + num_offset_syms;
        let mut lens = [0_u8; DEFLATE_MAX_DYNAMIC_LITLEN_SYMS + DEFLATE_MAX_DYNAMIC_OFFSET_SYMS];
        let mut i = 0;

        while i < total_syms {
            self.stream.refill();

            let presym = decode_symbol(&precode, &mut self.stream)?;

            let (value, count) = match presym {
                0..=15 => (presym as u8, 1),
                16 => {
                    if i == 0 {
                        return Err(DecodeErrorStatus::CorruptData(
                            "Repeat code with no previous length"
                        ));
                    }
                    (lens[i - 1], 3 + self.stream.get_bits(2) as usize)
                }
                17 => (0, 3 + self.stream.get_bits(3) as usize),
                18 => (0, 11 + self.stream.get_bits(7) as usize),
                _ => return Err(DecodeErrorStatus::CorruptData("Invalid code length symbol"))
            };

            if self.stream.is_over_read() {
                return Err(DecodeErrorStatus::InsufficientData);
            }
            if i + count > total_syms {
                return Err(DecodeErrorStatus::CorruptData(
                    "Code length repeat overruns the number of codes"
                ));
            }
            lens[i..i + count].fill(value);
            i += count;
        }

        if lens[DEFLATE_END_OF_BLOCK] == 0 {
            return Err(DecodeErrorStatus::CorruptData("Missing end-of-block code"));
        }

        let litlen = HuffmanTable::new(&lens[..num_litlen_syms], LITLEN_TABLE_BITS)?;
        let offset = HuffmanTable::new(&lens[num_litlen_syms..total_syms], OFFSET_TABLEBITS)?;

        Ok((litlen, offset))
    }
}

/// Decode one symbol, reporting a read past the end of input
/// ahead of whatever the padding bits decoded to.
#[inline(always)]
fn decode_symbol(
    table: &HuffmanTable, stream: &mut BitStreamReader
) -> Result<u16, DecodeErrorStatus> {
    let symbol = table.decode(stream);

    if stream.is_over_read() {
        return Err(DecodeErrorStatus::InsufficientData);
    }
    symbol
}

/// Decode literals and matches until the end-of-block symbol
fn decode_huffman_block(
    stream: &mut BitStreamReader, litlen: &HuffmanTable, offset: &HuffmanTable,
    out: &mut Vec<u8>, limit: usize
) -> Result<(), DecodeErrorStatus> {
    loop {
        // a whole sequence, i.e litlen(15) + extra(5) + offset(15) + extra(13)
        // is 48 bits, which a single refill covers.
        stream.refill();

        let symbol = usize::from(decode_symbol(litlen, stream)?);

        if symbol < 256 {
            if out.len() >= limit {
                return Err(DecodeErrorStatus::OutputLimitExceeded(limit, out.len() + 1));
            }
            out.push(symbol as u8);
            continue;
        }
        if symbol == DEFLATE_END_OF_BLOCK {
            return Ok(());
        }

        let length_index = symbol - 257;

        if length_index >= LENGTH_BASE.len() {
            return Err(DecodeErrorStatus::CorruptData("Invalid length symbol"));
        }
        let length = usize::from(LENGTH_BASE[length_index])
            + stream.get_bits(LENGTH_EXTRA_BITS[length_index]) as usize;

        let offset_symbol = usize::from(decode_symbol(offset, stream)?);

        if offset_symbol >= DISTANCE_BASE.len() {
            return Err(DecodeErrorStatus::CorruptData("Invalid distance symbol"));
        }
        let distance = usize::from(DISTANCE_BASE[offset_symbol])
            + stream.get_bits(DISTANCE_EXTRA_BITS[offset_symbol]) as usize;

        if stream.is_over_read() {
            return Err(DecodeErrorStatus::InsufficientData);
        }
        if distance > out.len() {
            return Err(DecodeErrorStatus::InvalidBackReference {
                distance,
                available: out.len()
            });
        }
        let new_size = out.len() + length;

        if new_size > limit {
            return Err(DecodeErrorStatus::OutputLimitExceeded(limit, new_size));
        }
        copy_rep_matches(out, distance, length);
    }
}
