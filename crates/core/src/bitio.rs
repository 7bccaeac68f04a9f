//! Bit-level stream adapters.
//!
//! `BitReader` turns a byte source into a sequence of single-bit values and
//! `BitWriter` packs bit values back into bytes. Both are MSB-first: the byte
//! `0x61` (`'a'`) corresponds to the bits `0 1 1 0 0 0 0 1`.
//!
//! A bit is stored as one `u8` holding 0 or 1, so words of any length can be
//! sliced out of a stream without caring about byte boundaries.
//!
//! # Direction
//!
//! Each type only exposes its own direction. A reader cannot write and a
//! writer cannot read; the only repositioning either supports is a rewind to
//! the start of the underlying stream.
//!
//! # Example
//! ```
//! use rm_sim_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write(&[0, 1, 1, 0, 0, 0, 0, 1]).unwrap();
//! let bytes = writer.into_inner().unwrap();
//! assert_eq!(bytes, b"a");
//!
//! let mut reader = BitReader::new(&bytes[..]);
//! let mut bits = [0u8; 8];
//! assert_eq!(reader.read(&mut bits).unwrap(), 8);
//! assert_eq!(bits, [0, 1, 1, 0, 0, 0, 0, 1]);
//! ```

use crate::error::{BitIoError, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// Default internal buffer size, in bits.
pub const DEFAULT_BIT_BUFFER_SIZE: usize = 4096 * 8;

/// Round a requested bit buffer size to a whole, non-zero number of bytes.
fn byte_capacity(bit_buffer_size: usize) -> usize {
    bit_buffer_size.div_ceil(8).max(1)
}

/// Reads bits MSB-first from a byte source.
///
/// Bytes are pulled from the source in blocks and expanded into an internal
/// bit buffer. The buffer size only affects how often the source is read.
///
/// # Invariants
/// - `position <= filled <= bits.len()`
pub struct BitReader<R> {
    inner: R,
    /// Expanded bits of the last block read from `inner`
    bits: Vec<u8>,
    /// Raw bytes of the last block
    bytes: Vec<u8>,
    /// Next bit to hand out
    position: usize,
    /// Number of valid bits in `bits`
    filled: usize,
}

impl<R: Read> BitReader<R> {
    /// Create a reader with the default buffer size.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_BIT_BUFFER_SIZE)
    }

    /// Create a reader buffering roughly `bit_buffer_size` bits at a time.
    pub fn with_capacity(inner: R, bit_buffer_size: usize) -> Self {
        let byte_len = byte_capacity(bit_buffer_size);
        Self {
            inner,
            bits: vec![0; byte_len * 8],
            bytes: vec![0; byte_len],
            position: 0,
            filled: 0,
        }
    }

    /// Read up to `buf.len()` bits into `buf`.
    ///
    /// Returns the number of bits produced. The count is below `buf.len()`
    /// only when input ends, and zero means input has already ended. The
    /// buffer size never changes the count.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut total = 0;
        while total < buf.len() {
            if self.position >= self.filled {
                self.refill()?;
                if self.filled == 0 {
                    break;
                }
            }

            let count = (buf.len() - total).min(self.filled - self.position);
            buf[total..total + count]
                .copy_from_slice(&self.bits[self.position..self.position + count]);
            self.position += count;
            total += count;
        }
        Ok(total)
    }

    /// Read until at least `minimum` bits are in `buf` or input ends.
    ///
    /// Returns the number of bits read. A value below `minimum` is a normal
    /// short read at end of stream, not an error; the caller decides what to
    /// do with the partial word. A `minimum` above `buf.len()` is treated as
    /// `buf.len()`.
    pub fn read_at_least(&mut self, buf: &mut [u8], minimum: usize) -> Result<usize> {
        let minimum = minimum.min(buf.len());
        self.read(&mut buf[..minimum])
    }

    /// Fill `buf` completely.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` if input ends first.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let read = self.read_at_least(buf, buf.len())?;
        if read < buf.len() {
            return Err(BitIoError::UnexpectedEof {
                requested: buf.len(),
                read,
            }
            .into());
        }
        Ok(())
    }

    /// Unwrap the underlying reader. Buffered bits are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read the next block of bytes and expand it into bits.
    fn refill(&mut self) -> Result<()> {
        let count = loop {
            match self.inner.read(&mut self.bytes) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        for (i, &byte) in self.bytes[..count].iter().enumerate() {
            let out = &mut self.bits[i * 8..i * 8 + 8];
            for (shift, bit) in (0..8).rev().zip(out.iter_mut()) {
                *bit = (byte >> shift) & 1;
            }
        }

        self.position = 0;
        self.filled = count * 8;
        Ok(())
    }
}

impl<R: Read + Seek> BitReader<R> {
    /// Discard buffered bits and seek the source back to its start.
    pub fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        self.filled = 0;
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Total length of the source in bits.
    pub fn bit_len(&mut self) -> Result<u64> {
        let current = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(current))?;
        Ok(end * 8)
    }
}

/// Writes bits MSB-first into a byte sink.
///
/// Bits accumulate in an internal buffer. Whole bytes are packed and written
/// to the sink whenever the buffer fills; anything left over waits for the
/// next `write` or an explicit `flush`.
///
/// Dropping a writer flushes what it can, but a partial trailing byte is
/// only logged and discarded. Call `into_inner` to finish a stream and get
/// an unaligned remainder back as `BitIoError::UnalignedFlush`.
///
/// # Invariants
/// - `pending <= bits.len()`
/// - `bits.len()` is a multiple of 8, so a full buffer is always byte-aligned
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    bits: Vec<u8>,
    bytes: Vec<u8>,
    pending: usize,
}

impl<W: Write> BitWriter<W> {
    /// Create a writer with the default buffer size.
    pub fn new(inner: W) -> Self {
        Self::with_capacity(inner, DEFAULT_BIT_BUFFER_SIZE)
    }

    /// Create a writer buffering roughly `bit_buffer_size` bits at a time.
    pub fn with_capacity(inner: W, bit_buffer_size: usize) -> Self {
        let byte_len = byte_capacity(bit_buffer_size);
        Self {
            inner: Some(inner),
            bits: vec![0; byte_len * 8],
            bytes: vec![0; byte_len],
            pending: 0,
        }
    }

    /// Append bit values (each 0 or 1) to the output.
    ///
    /// Only the lowest bit of each element is used.
    pub fn write(&mut self, mut bits: &[u8]) -> Result<()> {
        while !bits.is_empty() {
            let space = self.bits.len() - self.pending;
            let take = space.min(bits.len());

            self.bits[self.pending..self.pending + take].copy_from_slice(&bits[..take]);
            self.pending += take;
            bits = &bits[take..];

            if self.pending == self.bits.len() {
                self.write_buffered()?;
            }
        }
        Ok(())
    }

    /// Number of bits accepted but not yet written to the sink.
    pub fn pending_bits(&self) -> usize {
        self.pending
    }

    /// Write all pending bits and flush the sink.
    ///
    /// # Errors
    /// Returns `BitIoError::UnalignedFlush` if the pending bit count is not a
    /// multiple of 8. The pending bits are kept so the caller can pad and
    /// retry.
    pub fn flush(&mut self) -> Result<()> {
        self.write_buffered()?;
        self.sink().flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner.take().expect("writer present until into_inner"))
    }

    fn sink(&mut self) -> &mut W {
        self.inner.as_mut().expect("writer present until into_inner")
    }

    /// Pack the pending bits into bytes and write them out.
    fn write_buffered(&mut self) -> Result<()> {
        if self.pending % 8 != 0 {
            return Err(BitIoError::UnalignedFlush {
                pending_bits: self.pending,
            }
            .into());
        }

        let byte_count = self.pending / 8;
        for (byte, chunk) in self.bytes.iter_mut().zip(self.bits[..self.pending].chunks_exact(8)) {
            *byte = chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1));
        }

        let inner = self.inner.as_mut().expect("writer present until into_inner");
        inner.write_all(&self.bytes[..byte_count])?;
        self.pending = 0;
        Ok(())
    }
}

impl<W: Write + Seek> BitWriter<W> {
    /// Flush pending bits, then seek the sink back to its start.
    pub fn rewind(&mut self) -> Result<()> {
        self.flush()?;
        self.sink().seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_none() {
            return;
        }
        if self.pending % 8 != 0 {
            tracing::warn!(
                pending_bits = self.pending,
                "bit writer dropped with a partial byte; trailing bits discarded"
            );
            self.pending -= self.pending % 8;
        }
        let _ = self.flush();
    }
}

/// Expand bytes into MSB-first bit values.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
        .collect()
}

/// Pack MSB-first bit values into bytes.
///
/// # Errors
/// Returns `BitIoError::UnalignedFlush` if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new(Vec::with_capacity(bits.len() / 8));
    writer.write(bits)?;
    writer.into_inner()
}
