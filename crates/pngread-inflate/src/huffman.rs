/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical huffman decode tables.
//!
//! Codewords of up to `table_bits` bits are resolved with one lookup in a
//! table indexed by the next `table_bits` bits of the stream.
//! Longer codewords miss the table and are decoded by walking the
//! canonical code one bit at a time.
use alloc::vec;
use alloc::vec::Vec;

use crate::bitstream::BitStreamReader;
use crate::constants::{DEFLATE_MAX_CODEWORD_LENGTH, DEFLATE_MAX_NUM_SYMS};
use crate::errors::DecodeErrorStatus;

pub(crate) struct HuffmanTable {
    /// Number of codewords with each length
    len_counts:  [u16; DEFLATE_MAX_CODEWORD_LENGTH + 1],
    /// Symbols sorted by codeword length, then by symbol value
    sorted_syms: [u16; DEFLATE_MAX_NUM_SYMS],
    /// `symbol << 8 | codeword length`, a length of zero means
    /// the codeword is longer than `table_bits` or unused
    table:       Vec<u32>,
    table_bits:  usize
}

impl HuffmanTable {
    /// Build a decode table from the codeword length of each symbol
    ///
    /// Over-subscribed codes are rejected, incomplete codes are allowed,
    /// e.g. an offset code with a single codeword or none at all.
    pub fn new(lens: &[u8], table_bits: usize) -> Result<HuffmanTable, DecodeErrorStatus> {
        if lens.len() > DEFLATE_MAX_NUM_SYMS {
            return Err(DecodeErrorStatus::CorruptData("Too many huffman symbols"));
        }
        let mut len_counts = [0_u16; DEFLATE_MAX_CODEWORD_LENGTH + 1];

        // count how many codewords have each length, including 0.
        for len in lens {
            let len = usize::from(*len);

            if len > DEFLATE_MAX_CODEWORD_LENGTH {
                return Err(DecodeErrorStatus::CorruptData("Codeword longer than 15 bits"));
            }
            len_counts[len] += 1;
        }
        len_counts[0] = 0;

        // A codeword of length 'n' uses proportion '1/(2^n)' of the codespace.
        // An overfull code is nonsensical.
        let mut codespace_left: i32 = 1;

        for count in &len_counts[1..] {
            codespace_left <<= 1;
            codespace_left -= i32::from(*count);

            if codespace_left < 0 {
                return Err(DecodeErrorStatus::CorruptData("Over-subscribed huffman code"));
            }
        }

        // Sort the symbols primarily by increasing codeword length and
        // secondarily by increasing symbol value
        let mut offsets = [0_u16; DEFLATE_MAX_CODEWORD_LENGTH + 1];

        for len in 1..DEFLATE_MAX_CODEWORD_LENGTH {
            offsets[len + 1] = offsets[len] + len_counts[len];
        }

        let mut sorted_syms = [0_u16; DEFLATE_MAX_NUM_SYMS];

        for (sym, len) in lens.iter().enumerate() {
            let len = usize::from(*len);

            if len != 0 {
                sorted_syms[usize::from(offsets[len])] = sym as u16;
                offsets[len] += 1;
            }
        }

        // Enumerate the codewords in lexicographic order, every codeword of
        // length 'len' owns every '2^len'th entry starting at its bit-reversed
        // value, since deflate sends codewords most significant bit first.
        let mut table = vec![0_u32; 1 << table_bits];
        let mut codeword = 0_u32;
        let mut i = 0;

        for len in 1..=table_bits.min(DEFLATE_MAX_CODEWORD_LENGTH) {
            for _ in 0..len_counts[len] {
                let entry = (u32::from(sorted_syms[i]) << 8) | len as u32;
                let stride = 1 << len;
                let mut j = reverse_bits(codeword, len);

                while j < table.len() {
                    table[j] = entry;
                    j += stride;
                }
                codeword += 1;
                i += 1;
            }
            codeword <<= 1;
        }

        Ok(HuffmanTable {
            len_counts,
            sorted_syms,
            table,
            table_bits
        })
    }

    /// Decode the next symbol.
    ///
    /// The caller must ensure the bit buffer holds at least 15 bits.
    #[inline(always)]
    pub fn decode(&self, stream: &mut BitStreamReader) -> Result<u16, DecodeErrorStatus> {
        let entry = self.table[stream.peek_var_bits(self.table_bits)];
        let len = (entry & 0xFF) as u8;

        if len != 0 {
            stream.drop_bits(len);
            return Ok((entry >> 8) as u16);
        }
        self.decode_slow(stream)
    }

    #[inline(never)]
    fn decode_slow(&self, stream: &mut BitStreamReader) -> Result<u16, DecodeErrorStatus> {
        // code:  codeword bits read so far
        // first: first codeword of the current length
        // index: position in sorted_syms of the first symbol of the current length
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;

        for count in &self.len_counts[1..] {
            code |= stream.get_bits(1) as i32;

            let count = i32::from(*count);

            if code - count < first {
                return Ok(self.sorted_syms[(index + (code - first)) as usize]);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }
        Err(DecodeErrorStatus::CorruptData("Invalid huffman codeword"))
    }
}

#[inline(always)]
fn reverse_bits(codeword: u32, len: usize) -> usize {
    (codeword.reverse_bits() >> (32 - len)) as usize
}

#[cfg(test)]
mod tests {
    use super::HuffmanTable;
    use crate::bitstream::BitStreamReader;

    #[test]
    fn decodes_canonical_codes() {
        // RFC 1951 section 3.2.2 example, lengths (3, 3, 3, 3, 3, 2, 4, 4)
        // give codes F=00, A=010, B=011, C=100, D=101, E=110, G=1110, H=1111
        let lens = [3, 3, 3, 3, 3, 2, 4, 4];

        // codes sent msb first: F(00) G(1110) A(010), then zeros
        // bit sequence 0,0,1,1,1,0,0,1,0 packed lsb first
        let data = [0b1001_1100, 0b0000_0000];

        for table_bits in [2, 7] {
            let table = HuffmanTable::new(&lens, table_bits).unwrap();
            let mut stream = BitStreamReader::new(&data);

            stream.refill();
            assert_eq!(table.decode(&mut stream).unwrap(), 5);
            assert_eq!(table.decode(&mut stream).unwrap(), 6);
            assert_eq!(table.decode(&mut stream).unwrap(), 0);
        }
    }

    #[test]
    fn rejects_over_subscribed_codes() {
        assert!(HuffmanTable::new(&[1, 1, 1], 7).is_err());
    }

    #[test]
    fn unused_codeword_in_incomplete_code_is_an_error() {
        // single codeword '0', codeword '1' is unused
        let table = HuffmanTable::new(&[0, 1], 7).unwrap();
        let data = [0b10];
        let mut stream = BitStreamReader::new(&data);

        stream.refill();
        assert_eq!(table.decode(&mut stream).unwrap(), 1);
        assert!(table.decode(&mut stream).is_err());
    }
}
