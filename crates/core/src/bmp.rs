//! Bitmap header handling.
//!
//! Only one field matters here: the pixel data offset, a little-endian `u32`
//! at bytes 10..14 of the file header. Everything before that offset is
//! treated as opaque and copied through untouched, so a noisy payload still
//! produces an image that viewers can open.

use crate::error::{Error, Result};
use std::io::{self, Read, Seek, SeekFrom};

/// Byte position of the pixel data offset field.
const PIXEL_OFFSET_FIELD: u64 = 10;

/// Read the pixel data offset and rewind the reader to the start.
///
/// # Errors
/// Returns `Error::Header` if the stream ends before byte 14.
pub fn pixel_data_offset<R: Read + Seek>(reader: &mut R) -> Result<u32> {
    reader.seek(SeekFrom::Start(PIXEL_OFFSET_FIELD))?;

    let mut field = [0u8; 4];
    let outcome = reader.read_exact(&mut field);
    reader.seek(SeekFrom::Start(0))?;

    match outcome {
        Ok(()) => Ok(u32::from_le_bytes(field)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::Header(
            "stream too short to hold a pixel data offset".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Read the first `len` bytes of `reader` so they can be passed through.
///
/// # Errors
/// Returns `Error::Header` if the reader holds fewer than `len` bytes.
pub fn read_header<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut header = vec![0u8; len];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            Error::Header(format!("header of {} bytes extends past end of input", len))
        }
        _ => e.into(),
    })?;
    Ok(header)
}
