/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bounds checked bytestream reader.
//!
//! Every read either returns the requested bytes and advances the
//! cursor or returns an error and leaves the cursor where it was,
//! reading past the end of the buffer is never possible.
pub use reader::{ZByteIoError, ZByteReader};

mod reader;
