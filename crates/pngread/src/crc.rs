/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! CRC-32 (ISO 3309, reflected polynomial `0xEDB88320`) as used by png
//! chunks, computed eight bytes at a time.

const fn make_crc_tables() -> [[u32; 256]; 8] {
    let mut tables = [[0_u32; 256]; 8];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;

        while j < 8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
            j += 1;
        }
        tables[0][i] = crc;
        i += 1;
    }
    // tables[k][i] is the crc of byte i followed by k zero bytes
    let mut i = 0;

    while i < 256 {
        let mut k = 1;

        while k < 8 {
            let prev = tables[k - 1][i];
            tables[k][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
            k += 1;
        }
        i += 1;
    }
    tables
}

static CRC_TABLES: [[u32; 256]; 8] = make_crc_tables();

/// Update `crc` with `data`.
///
/// The caller is responsible for the initial value
/// and final inversion, see [`crc32`]
pub fn crc32_slice8(data: &[u8], mut crc: u32) -> u32 {
    let mut chunks = data.chunks_exact(8);

    for chunk in &mut chunks {
        let a = crc ^ u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let b = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        crc = CRC_TABLES[7][(a & 0xFF) as usize]
            ^ CRC_TABLES[6][((a >> 8) & 0xFF) as usize]
            ^ CRC_TABLES[5][((a >> 16) & 0xFF) as usize]
            ^ CRC_TABLES[4][(a >> 24) as usize]
            ^ CRC_TABLES[3][(b & 0xFF) as usize]
            ^ CRC_TABLES[2][((b >> 8) & 0xFF) as usize]
            ^ CRC_TABLES[1][((b >> 16) & 0xFF) as usize]
            ^ CRC_TABLES[0][(b >> 24) as usize];
    }
    for byte in chunks.remainder() {
        crc = (crc >> 8) ^ CRC_TABLES[0][((crc ^ u32::from(*byte)) & 0xFF) as usize];
    }
    crc
}

/// CRC-32 of `data`
pub fn crc32(data: &[u8]) -> u32 {
    !crc32_slice8(data, u32::MAX)
}
