//! Little-endian integer fields at fixed byte offsets.
//!
//! Every multi-byte BMP field is stored least-significant byte first. These
//! helpers encode that order directly and never look at host endianness.

use crate::error::BitmapError;

fn field<const N: usize>(buffer: &[u8], offset: usize) -> Result<[u8; N], BitmapError> {
    offset
        .checked_add(N)
        .and_then(|end| buffer.get(offset..end))
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(BitmapError::OutOfBounds {
            offset,
            len: N,
            buffer_len: buffer.len(),
        })
}

fn field_mut<const N: usize>(
    buffer: &mut [u8],
    offset: usize,
) -> Result<&mut [u8; N], BitmapError> {
    let buffer_len = buffer.len();
    offset
        .checked_add(N)
        .and_then(|end| buffer.get_mut(offset..end))
        .and_then(|bytes| <&mut [u8; N]>::try_from(bytes).ok())
        .ok_or(BitmapError::OutOfBounds {
            offset,
            len: N,
            buffer_len,
        })
}

/// Read a little-endian `u16` at `offset`.
pub fn read_u16(buffer: &[u8], offset: usize) -> Result<u16, BitmapError> {
    field::<2>(buffer, offset).map(u16::from_le_bytes)
}

/// Read a little-endian `u32` at `offset`.
pub fn read_u32(buffer: &[u8], offset: usize) -> Result<u32, BitmapError> {
    field::<4>(buffer, offset).map(u32::from_le_bytes)
}

/// Read a little-endian `i32` at `offset`.
pub fn read_i32(buffer: &[u8], offset: usize) -> Result<i32, BitmapError> {
    field::<4>(buffer, offset).map(i32::from_le_bytes)
}

/// Write `value` as little-endian at `offset`.
pub fn write_u16(buffer: &mut [u8], offset: usize, value: u16) -> Result<(), BitmapError> {
    *field_mut::<2>(buffer, offset)? = value.to_le_bytes();
    Ok(())
}

/// Write `value` as little-endian at `offset`.
pub fn write_u32(buffer: &mut [u8], offset: usize, value: u32) -> Result<(), BitmapError> {
    *field_mut::<4>(buffer, offset)? = value.to_le_bytes();
    Ok(())
}

/// Write `value` as little-endian at `offset`.
pub fn write_i32(buffer: &mut [u8], offset: usize, value: i32) -> Result<(), BitmapError> {
    *field_mut::<4>(buffer, offset)? = value.to_le_bytes();
    Ok(())
}
