/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! `BitStreamReader` API
//!
//! This module provides an interface to read bits (and bytes) for
//! huffman decoding.
//!
//! Bits are packed LSB first within each byte, as deflate expects.

pub struct BitStreamReader<'src> {
    // buffer from which we are pulling in bits from
    // used in decompression.
    src:       &'src [u8],
    // position in our buffer,
    position:  usize,
    bits_left: u8,
    buffer:    u64,
    // number of zero bytes added to the bit buffer after
    // the source ran out.
    over_read: usize
}

impl<'src> BitStreamReader<'src> {
    /// Create a new `BitStreamReader` instance
    pub fn new(in_buffer: &'src [u8]) -> BitStreamReader<'src> {
        BitStreamReader {
            bits_left: 0,
            buffer:    0,
            src:       in_buffer,
            position:  0,
            over_read: 0
        }
    }
    /// Refill the bitstream ensuring the buffer has bits between
    /// 56 and 63.
    ///
    /// Once the source is exhausted the buffer is filled with zero
    /// bytes, use [`is_over_read`](Self::is_over_read) to find out
    /// whether any of those were consumed.
    #[inline(always)]
    pub fn refill(&mut self) {
        /*
         * The refill always guarantees refills between 56-63
         *
         * Bits stored will never go above 63 and if bits are in the range 56-63 no refills occur.
         */
        let mut buf = [0; 8];

        match self.src.get(self.position..self.position + 8) {
            Some(bytes) => {
                buf.copy_from_slice(bytes);
                // create a u64 from an array of u8's
                let new_buffer = u64::from_le_bytes(buf);
                // num indicates how many bytes we actually consumed.
                let num = 63 ^ self.bits_left;
                // offset position
                self.position += (num >> 3) as usize;
                // shift number of bits
                self.buffer |= new_buffer << self.bits_left;
                // update bits left
                // bits left are now between 56-63
                self.bits_left |= 56;
            }
            None => self.refill_slow()
        }
    }
    #[inline(never)]
    fn refill_slow(&mut self) {
        let bytes = self.src.get(self.position..).unwrap_or(&[]);

        for byte in bytes {
            if self.bits_left >= 56 {
                break;
            }

            self.buffer |= u64::from(*byte) << self.bits_left;
            self.bits_left += 8;
            self.position += 1;
        }
        // source exhausted, pad with zeroes
        while self.bits_left < 56 {
            self.bits_left += 8;
            self.over_read += 1;
        }
    }

    #[inline(always)]
    pub fn peek_var_bits(&self, lookahead: usize) -> usize {
        (self.buffer & ((1 << lookahead) - 1)) as usize
    }

    #[inline(always)]
    pub fn get_bits(&mut self, num_bits: u8) -> u64 {
        debug_assert!(self.bits_left >= num_bits);

        let mask = (1_u64 << num_bits) - 1;

        let value = self.buffer & mask;

        self.buffer >>= num_bits;

        self.bits_left -= num_bits;

        value
    }

    #[inline(always)]
    pub fn drop_bits(&mut self, bits: u8) {
        debug_assert!(self.bits_left >= bits);
        self.bits_left -= bits;
        self.buffer >>= bits;
    }

    /// Return true if bits past the end of the source have been
    /// consumed.
    ///
    /// Padding bytes always sit at the top of the bit buffer, so
    /// the stream is over-read once fewer bits remain than were padded.
    #[inline(always)]
    pub const fn is_over_read(&self) -> bool {
        self.over_read * 8 > self.bits_left as usize
    }

    /// Discard bits up to the next byte boundary and hand whole bytes still
    /// held in the bit buffer back to the source.
    ///
    /// After this, [`read_aligned_bytes`](Self::read_aligned_bytes) reads
    /// straight from the source.
    ///
    /// Returns false if the stream was already over-read.
    pub fn align_to_byte_boundary(&mut self) -> bool {
        let partial_bits = self.bits_left & 7;
        self.drop_bits(partial_bits);

        let buffered = usize::from(self.bits_left >> 3);

        if self.over_read > buffered {
            return false;
        }
        // only real bytes advanced position, padding never did.
        self.position -= buffered - self.over_read;

        self.buffer = 0;
        self.bits_left = 0;
        self.over_read = 0;

        true
    }

    /// Read `num` bytes directly from the source.
    ///
    /// The stream must be byte aligned with an empty bit buffer,
    /// see [`align_to_byte_boundary`](Self::align_to_byte_boundary).
    pub fn read_aligned_bytes(&mut self, num: usize) -> Option<&'src [u8]> {
        debug_assert_eq!(self.bits_left, 0);

        let end = self.position.checked_add(num)?;
        let bytes = self.src.get(self.position..end)?;

        self.position = end;

        Some(bytes)
    }

    /// Get position the stream is in this buffer
    pub const fn get_position(&self) -> usize {
        self.position
    }

    /// Return the remaining bytes in this stream.
    ///
    /// This does not consider bits in the bit-buffer hence
    /// may not be accurate
    #[cfg(test)]
    pub const fn remaining_bytes(&self) -> usize {
        self.src.len().saturating_sub(self.position)
    }
}
