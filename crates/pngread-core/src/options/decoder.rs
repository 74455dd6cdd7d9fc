/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global Decoder options

fn decoder_safe_flags() -> DecoderFlags {
    DecoderFlags {
        inflate_confirm_adler: true,
        png_confirm_crc:       true,
        strict_mode:           false
    }
}

/// Fast decoder options
///
/// Disables png adler and crc checking.
fn fast_options() -> DecoderFlags {
    DecoderFlags {
        inflate_confirm_adler: false,
        png_confirm_crc:       false,
        strict_mode:           false
    }
}

/// Decoder options that are flags
///
/// NOTE: When you extend this, add true or false to
/// all options above that return a `DecoderFlag`
#[derive(Copy, Debug, Clone, Default)]
pub struct DecoderFlags {
    /// Whether the decoder should confirm and report adler mismatch
    inflate_confirm_adler: bool,
    /// Whether the PNG decoder should confirm crc
    png_confirm_crc:       bool,
    /// Whether the decoder should error out on image non-conformance
    /// it could otherwise recover from
    strict_mode:           bool
}

/// Decoder options
///
/// Not all options are respected by all decoders
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_width:     usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_height:    usize,
    /// Maximum size for deflate.
    /// Respected by all decoders that use inflate/deflate
    ///
    /// The png decoder further lowers this to the size
    /// the header says the image data should have.
    deflate_limit: usize,
    /// Boolean flags that influence decoding
    flags:         DecoderFlags
}

/// Initializers
impl DecoderOptions {
    /// Create the decoder with options  setting most configurable
    /// options to be their safe counterparts
    ///
    /// This is the same as `default` option as default initializes
    /// options to the  safe variant.
    pub fn new_safe() -> DecoderOptions {
        DecoderOptions::default()
    }

    /// Create the decoder with options setting the configurable options
    /// to the fast  counterparts
    ///
    /// This skips checksum verification, corrupt chunks will not be
    /// detected unless they also break decoding.
    pub fn new_fast() -> DecoderOptions {
        let flag = fast_options();
        DecoderOptions::default().set_decoder_flags(flag)
    }
}

/// Global options respected by all decoders
impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    /// And reject recoverable irregularities
    pub const fn get_strict_mode(&self) -> bool {
        self.flags.strict_mode
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    ///
    /// # Arguments
    ///
    /// * `width`:  The maximum width allowed
    ///
    /// returns: DecoderOptions
    #[must_use]
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    /// # Arguments
    ///
    /// * `height`: The maximum height allowed
    ///
    /// returns: DecoderOptions
    ///
    #[must_use]
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    fn set_decoder_flags(mut self, flags: DecoderFlags) -> Self {
        self.flags = flags;
        self
    }
    /// Set whether the decoder should be in standards conforming/
    /// strict mode
    ///
    /// This reduces the error tolerance level for the decoders,
    /// e.g non-consecutive IDAT chunks or unknown critical chunks
    /// become errors instead of warnings.
    ///
    /// # Arguments
    ///
    /// * `yes`:
    ///
    /// returns: DecoderOptions
    ///
    #[must_use]
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.flags.strict_mode = yes;
        self
    }
}

/// PNG specific options
impl DecoderOptions {
    /// Whether the inflate decoder should confirm
    /// adler checksums
    pub const fn inflate_get_confirm_adler(&self) -> bool {
        self.flags.inflate_confirm_adler
    }
    /// Set whether the inflate decoder should confirm
    /// adler checksums
    #[must_use]
    pub fn inflate_set_confirm_adler(mut self, yes: bool) -> Self {
        self.flags.inflate_confirm_adler = yes;
        self
    }
    /// Get default inflate limit for which the decoder
    /// will not try to decompress further
    pub const fn inflate_get_limit(&self) -> usize {
        self.deflate_limit
    }
    /// Set the default inflate limit for which decompressors
    /// relying on inflate won't surpass this limit
    #[must_use]
    pub fn inflate_set_limit(mut self, limit: usize) -> Self {
        self.deflate_limit = limit;
        self
    }
    /// Whether the png decoder should confirm
    /// crc 32 checksums
    pub const fn png_get_confirm_crc(&self) -> bool {
        self.flags.png_confirm_crc
    }
    /// Set whether the png decoder should confirm
    /// CRC 32 checksums
    #[must_use]
    pub fn png_set_confirm_crc(mut self, yes: bool) -> Self {
        self.flags.png_confirm_crc = yes;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:     1 << 14,
            max_height:    1 << 14,
            deflate_limit: 1 << 30,
            flags:         decoder_safe_flags()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DecoderOptions;

    #[test]
    fn default_is_safe() {
        let options = DecoderOptions::default();

        assert!(options.png_get_confirm_crc());
        assert!(options.inflate_get_confirm_adler());
        assert!(!options.get_strict_mode());
        assert_eq!(options.get_max_width(), 16384);
        assert_eq!(options.get_max_height(), 16384);
    }

    #[test]
    fn fast_skips_checksums() {
        let options = DecoderOptions::new_fast().set_max_width(10);

        assert!(!options.png_get_confirm_crc());
        assert!(!options.inflate_get_confirm_adler());
        assert_eq!(options.get_max_width(), 10);
    }
}
