//! BMP file header and BITMAPINFOHEADER layout and validation.
//!
//! Offsets below are absolute (from the start of the file). The 40-byte info
//! header starts at [`FILE_HEADER_SIZE`].

use core::fmt;

use crate::bytes;
use crate::error::{BitmapError, Unsupported};
use crate::rows;

/// Size of the `BM` file header.
pub const FILE_HEADER_SIZE: usize = 14;
/// Size of a BITMAPINFOHEADER.
pub const INFO_HEADER_SIZE: usize = 40;
/// Both headers; the pixel data offset this crate writes.
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
/// File signature.
pub const SIGNATURE: [u8; 2] = *b"BM";
/// The only bit depth this crate reads or writes.
pub const BIT_DEPTH: u16 = 24;
/// Resolution written by [`crate::BitmapImage::create`] (72 DPI).
pub const DEFAULT_PIXELS_PER_METER: i32 = 2835;

const FILE_SIZE: usize = 2;
const DATA_OFFSET: usize = 10;
const INFO_SIZE: usize = 14;
const WIDTH: usize = 18;
const HEIGHT: usize = 22;
const PLANES: usize = 26;
const BIT_COUNT: usize = 28;
const COMPRESSION: usize = 30;
const IMAGE_SIZE: usize = 34;
const X_PIXELS_PER_METER: usize = 38;
const Y_PIXELS_PER_METER: usize = 42;
const COLORS_USED: usize = 46;
const IMPORTANT_COLORS: usize = 50;

/// Compression mode from the info header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    /// BI_RGB, uncompressed. The only supported mode.
    Rgb,
    Rle8,
    Rle4,
    Bitfields,
    Jpeg,
    Png,
    AlphaBitfields,
    Cmyk,
    CmykRle8,
    CmykRle4,
    Unknown(u32),
}

impl Compression {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Rgb,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 => Self::Bitfields,
            4 => Self::Jpeg,
            5 => Self::Png,
            6 => Self::AlphaBitfields,
            11 => Self::Cmyk,
            12 => Self::CmykRle8,
            13 => Self::CmykRle4,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            Self::Rgb => 0,
            Self::Rle8 => 1,
            Self::Rle4 => 2,
            Self::Bitfields => 3,
            Self::Jpeg => 4,
            Self::Png => 5,
            Self::AlphaBitfields => 6,
            Self::Cmyk => 11,
            Self::CmykRle8 => 12,
            Self::CmykRle4 => 13,
            Self::Unknown(v) => v,
        }
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::Rgb => "BI_RGB",
            Self::Rle8 => "BI_RLE8",
            Self::Rle4 => "BI_RLE4",
            Self::Bitfields => "BI_BITFIELDS",
            Self::Jpeg => "BI_JPEG",
            Self::Png => "BI_PNG",
            Self::AlphaBitfields => "BI_ALPHABITFIELDS",
            Self::Cmyk => "BI_CMYK",
            Self::CmykRle8 => "BI_CMYKRLE8",
            Self::CmykRle4 => "BI_CMYKRLE4",
            Self::Unknown(_) => return None,
        })
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.to_u32()),
            None => write!(f, "{} (unknown)", self.to_u32()),
        }
    }
}

/// Vertical order of rows in the pixel data.
///
/// Row 0 of a decoded pixel array is always the top of the image; this only
/// describes how rows are laid out on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RowOrder {
    /// Positive header height: the first stored row is the bottom one.
    #[default]
    BottomUp,
    /// Negative header height: the first stored row is the top one.
    TopDown,
}

/// Raw header fields, as stored in the first 54 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_size: u32,
    pub data_offset: u32,
    /// Size of the info header: 40 for BITMAPINFOHEADER, 108/124 for V4/V5.
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_depth: u16,
    pub compression: Compression,
    /// Pixel data size; 0 means "derive from geometry".
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

/// Geometry resolved from a validated header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub row_order: RowOrder,
    /// Bytes per stored row, padding included.
    pub stride: usize,
    pub pixel_data_size: usize,
    /// Absolute offset of the pixel data, with 0 already resolved to 54.
    pub data_offset: usize,
}

impl BitmapHeader {
    /// Parse header fields without validating them beyond the signature.
    pub fn parse(data: &[u8]) -> Result<Self, BitmapError> {
        if data.get(..2) != Some(&SIGNATURE[..]) {
            return Err(BitmapError::Format(
                "not a bitmap (missing `BM` signature)".into(),
            ));
        }
        Ok(Self {
            file_size: bytes::read_u32(data, FILE_SIZE)?,
            data_offset: bytes::read_u32(data, DATA_OFFSET)?,
            info_size: bytes::read_u32(data, INFO_SIZE)?,
            width: bytes::read_i32(data, WIDTH)?,
            height: bytes::read_i32(data, HEIGHT)?,
            planes: bytes::read_u16(data, PLANES)?,
            bit_depth: bytes::read_u16(data, BIT_COUNT)?,
            compression: Compression::from_u32(bytes::read_u32(data, COMPRESSION)?),
            image_size: bytes::read_u32(data, IMAGE_SIZE)?,
            x_pixels_per_meter: bytes::read_i32(data, X_PIXELS_PER_METER)?,
            y_pixels_per_meter: bytes::read_i32(data, Y_PIXELS_PER_METER)?,
            colors_used: bytes::read_u32(data, COLORS_USED)?,
            important_colors: bytes::read_u32(data, IMPORTANT_COLORS)?,
        })
    }

    /// Header for an uncompressed 24-bit image with `pixel_data_size` bytes
    /// of pixel data directly after the headers.
    pub(crate) fn uncompressed(
        width: u32,
        height: u32,
        row_order: RowOrder,
        pixel_data_size: u32,
        x_pixels_per_meter: i32,
        y_pixels_per_meter: i32,
    ) -> Self {
        let height = height as i32;
        Self {
            file_size: HEADER_SIZE as u32 + pixel_data_size,
            data_offset: HEADER_SIZE as u32,
            info_size: INFO_HEADER_SIZE as u32,
            width: width as i32,
            height: match row_order {
                RowOrder::BottomUp => height,
                RowOrder::TopDown => -height,
            },
            planes: 1,
            bit_depth: BIT_DEPTH,
            compression: Compression::Rgb,
            image_size: pixel_data_size,
            x_pixels_per_meter,
            y_pixels_per_meter,
            colors_used: 0,
            important_colors: 0,
        }
    }

    /// Serialize both header blocks.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE], BitmapError> {
        let mut out = [0u8; HEADER_SIZE];
        out[..2].copy_from_slice(&SIGNATURE);
        bytes::write_u32(&mut out, FILE_SIZE, self.file_size)?;
        // 4 reserved bytes stay zero
        bytes::write_u32(&mut out, DATA_OFFSET, self.data_offset)?;
        bytes::write_u32(&mut out, INFO_SIZE, self.info_size)?;
        bytes::write_i32(&mut out, WIDTH, self.width)?;
        bytes::write_i32(&mut out, HEIGHT, self.height)?;
        bytes::write_u16(&mut out, PLANES, self.planes)?;
        bytes::write_u16(&mut out, BIT_COUNT, self.bit_depth)?;
        bytes::write_u32(&mut out, COMPRESSION, self.compression.to_u32())?;
        bytes::write_u32(&mut out, IMAGE_SIZE, self.image_size)?;
        bytes::write_i32(&mut out, X_PIXELS_PER_METER, self.x_pixels_per_meter)?;
        bytes::write_i32(&mut out, Y_PIXELS_PER_METER, self.y_pixels_per_meter)?;
        bytes::write_u32(&mut out, COLORS_USED, self.colors_used)?;
        bytes::write_u32(&mut out, IMPORTANT_COLORS, self.important_colors)?;
        Ok(out)
    }

    /// Check the header against what this codec supports and resolve the
    /// pixel data geometry.
    ///
    /// Checks run in a fixed order: compression, bit depth, info header size,
    /// planes, data offset, dimensions, declared data size. A declared size
    /// too small for the geometry is [`BitmapError::OutOfBounds`]. The
    /// signature was already checked by [`parse`](Self::parse).
    pub fn validate(&self) -> Result<Layout, BitmapError> {
        if self.compression != Compression::Rgb {
            return Err(Unsupported::Compression(self.compression).into());
        }
        if self.bit_depth != BIT_DEPTH {
            return Err(Unsupported::BitDepth(self.bit_depth).into());
        }
        if (self.info_size as usize) < INFO_HEADER_SIZE {
            return Err(Unsupported::InfoHeaderSize(self.info_size).into());
        }
        if self.planes != 1 {
            return Err(BitmapError::Format(format!(
                "color planes is {}, expected 1",
                self.planes
            )));
        }

        let headers_end = FILE_HEADER_SIZE + self.info_size as usize;
        let data_offset = match self.data_offset as usize {
            0 => HEADER_SIZE,
            offset if offset < headers_end => {
                return Err(BitmapError::Format(format!(
                    "pixel data offset {offset} overlaps the {headers_end} header bytes"
                )));
            }
            offset => offset,
        };

        let row_order = if self.height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        };
        if self.width <= 0 || self.height == 0 {
            return Err(BitmapError::Size {
                width: i64::from(self.width),
                height: i64::from(self.height),
            });
        }
        let width = self.width.unsigned_abs();
        let height = self.height.unsigned_abs();
        let (stride, pixel_data_size) = geometry(width, height)?;

        let declared = self.image_size as usize;
        if declared != 0 && declared < pixel_data_size {
            return Err(BitmapError::OutOfBounds {
                offset: data_offset,
                len: pixel_data_size,
                buffer_len: declared,
            });
        }
        if declared > pixel_data_size {
            log::warn!(
                "pixel data size field ({declared}) exceeds {pixel_data_size}, ignoring trailing bytes"
            );
        }

        Ok(Layout {
            width,
            height,
            row_order,
            stride,
            pixel_data_size,
            data_offset,
        })
    }
}

/// Parse the header of `data` without validating it.
pub fn probe(data: &[u8]) -> Result<BitmapHeader, BitmapError> {
    BitmapHeader::parse(data)
}

/// Stride and pixel data size of a 24-bit image, checked so that the whole
/// file size and both dimensions fit their header fields.
pub(crate) fn geometry(width: u32, height: u32) -> Result<(usize, usize), BitmapError> {
    let too_large = BitmapError::DimensionsTooLarge { width, height };
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(too_large);
    }
    let stride = rows::stride(width, BIT_DEPTH).ok_or(too_large)?;
    let size = stride
        .checked_mul(height as usize)
        .filter(|size| size.checked_add(HEADER_SIZE).is_some_and(|f| f <= u32::MAX as usize))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    Ok((stride, size))
}
