/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// The first eight bytes of every png file
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Chunk lengths are limited to 2^31 - 1 bytes
pub const MAX_CHUNK_LENGTH: usize = (1 << 31) - 1;

pub const IHDR_LENGTH: usize = 13;
