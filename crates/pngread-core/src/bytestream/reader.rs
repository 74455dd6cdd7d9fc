/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::Formatter;

/// Errors returned by the bytestream reader
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum ZByteIoError {
    /// A read requested more bytes than are present
    NotEnoughBytes {
        /// Position of the cursor when the read was attempted
        position:  usize,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes that were left in the stream
        remaining: usize
    },
    /// Rewinding past the start of the stream
    SeekError(&'static str),
    /// The stream ended in a layer above the reader,
    /// e.g inside a compressed stream
    Generic(&'static str)
}

impl core::fmt::Debug for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ZByteIoError::NotEnoughBytes {
                position,
                requested,
                remaining
            } => {
                write!(
                    f,
                    "Not enough bytes at offset {position}, expected {requested} but found {remaining}"
                )
            }
            ZByteIoError::SeekError(err) => {
                write!(f, "Seek error: {err}")
            }
            ZByteIoError::Generic(err) => {
                write!(f, "{err}")
            }
        }
    }
}

impl core::fmt::Display for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZByteIoError {}

/// A cursor over an immutable byte buffer.
///
/// The position is always less than or equal to the length
/// of the underlying buffer.
pub struct ZByteReader<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

impl<T: AsRef<[u8]>> ZByteReader<T> {
    /// Create a new reader positioned at the start of `buf`
    pub fn new(buf: T) -> ZByteReader<T> {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }
    /// Destroy this reader returning
    /// the underlying source of the bytes
    pub fn consume(self) -> T {
        self.stream
    }

    #[inline(always)]
    fn not_enough(&self, requested: usize) -> ZByteIoError {
        ZByteIoError::NotEnoughBytes {
            position: self.position,
            requested,
            remaining: self.remaining()
        }
    }

    /// Skip `num` bytes ahead of the stream.
    ///
    /// Skipping past the end is an error and leaves the
    /// position unchanged.
    pub fn skip(&mut self, num: usize) -> Result<(), ZByteIoError> {
        if !self.has(num) {
            return Err(self.not_enough(num));
        }
        self.position += num;
        Ok(())
    }

    /// Move the cursor `num` bytes back
    pub fn rewind(&mut self, num: usize) -> Result<(), ZByteIoError> {
        self.position = self
            .position
            .checked_sub(num)
            .ok_or(ZByteIoError::SeekError("Cannot rewind past the start of the stream"))?;
        Ok(())
    }

    /// Number of bytes left in the stream
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        // position never goes past the end, but stay saturating anyway
        self.stream.as_ref().len().saturating_sub(self.position)
    }

    /// Return true if the stream can satisfy a read of
    /// `num` bytes
    #[inline(always)]
    pub fn has(&self, num: usize) -> bool {
        self.remaining() >= num
    }

    /// Return true if no more bytes are left
    pub fn eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Current position of the cursor
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.stream.as_ref().len()
    }

    /// Return true if the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.stream.as_ref().is_empty()
    }

    /// Read a single byte
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, ZByteIoError> {
        match self.stream.as_ref().get(self.position) {
            Some(byte) => {
                let byte = *byte;
                self.position += 1;
                Ok(byte)
            }
            None => Err(self.not_enough(1))
        }
    }

    /// Return a reference to the next `num` bytes and advance past them
    pub fn read_bytes(&mut self, num: usize) -> Result<&[u8], ZByteIoError> {
        if !self.has(num) {
            return Err(self.not_enough(num));
        }
        let start = self.position;
        self.position += num;

        Ok(&self.stream.as_ref()[start..start + num])
    }

    /// Read exactly `N` bytes into an array
    #[inline(always)]
    pub fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], ZByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        byte_store.copy_from_slice(self.read_bytes(N)?);
        Ok(byte_store)
    }

    /// Look ahead `position` bytes and return a reference
    /// to `num_bytes` from that position, or an error if the
    /// peek would be out of bounds.
    ///
    /// This doesn't increment the position.
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&[u8], ZByteIoError> {
        let start = self.position.saturating_add(position);
        let end = start.saturating_add(num_bytes);

        self.stream
            .as_ref()
            .get(start..end)
            .ok_or_else(|| self.not_enough(position.saturating_add(num_bytes)))
    }

    /// Return all bytes not yet consumed, without advancing
    pub fn remaining_bytes(&self) -> &[u8] {
        &self.stream.as_ref()[self.position..]
    }
}

macro_rules! get_single_type {
    ($name:tt,$name_be:tt,$name_le:tt,$int_type:tt) => {
        impl<T: AsRef<[u8]>> ZByteReader<T> {
            #[inline(always)]
            fn $name(&mut self, mode: Mode) -> Result<$int_type, ZByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let space = self.read_fixed_bytes::<SIZE_OF_VAL>()?;

                match mode {
                    Mode::BE => Ok($int_type::from_be_bytes(space)),
                    Mode::LE => Ok($int_type::from_le_bytes(space))
                }
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name_be(&mut self) -> Result<$int_type, ZByteIoError> {
                self.$name(Mode::BE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name_le(&mut self) -> Result<$int_type, ZByteIoError> {
                self.$name(Mode::LE)
            }
        }
    };
}

get_single_type!(read_u16_inner, read_u16_be, read_u16_le, u16);
get_single_type!(read_u32_inner, read_u32_be, read_u32_le, u32);
get_single_type!(read_u64_inner, read_u64_be, read_u64_le, u64);
