//! # zenbmp
//!
//! Reader, writer and row codec for uncompressed 24-bit BMP files.
//!
//! ## What it does
//!
//! - Parses and validates the 14-byte file header and the 40-byte
//!   BITMAPINFOHEADER (larger V4/V5 info headers are accepted; their extra
//!   fields are skipped).
//! - Converts between the on-disk representation (BGR, each row padded to a
//!   multiple of four bytes, bottom-up or top-down) and a dense array of
//!   [`Pixel`]s with row 0 at the top.
//! - Writes bottom-up BMP files from a pixel array, or writes back an image in
//!   the row order it was read with.
//!
//! ## Non-Goals
//!
//! - RLE, bitfield, JPEG and PNG compression
//! - Palettes and bit depths other than 24
//! - Any image processing
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{BitmapImage, Pixel};
//!
//! let mut image = BitmapImage::read("in.bmp")?;
//! println!("{}x{}, stride {}", image.width(), image.height(), image.stride());
//! let pixels = image.decode_pixels()?.to_vec();
//!
//! let inverted = pixels
//!     .iter()
//!     .map(|p| Pixel::new(255 - p.r, 255 - p.g, 255 - p.b))
//!     .collect();
//! BitmapImage::create(image.width(), image.height(), inverted)?.write("out.bmp")?;
//! # Ok::<(), zenbmp::BitmapError>(())
//! ```

#![forbid(unsafe_code)]

mod decode;
mod error;
mod header;
mod image;
mod limits;
mod pixel;

pub mod bytes;
pub mod rows;

// Re-exports
pub use decode::DecodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::{BitmapError, Unsupported};
pub use header::{
    BIT_DEPTH, BitmapHeader, Compression, DEFAULT_PIXELS_PER_METER, FILE_HEADER_SIZE,
    HEADER_SIZE, INFO_HEADER_SIZE, Layout, RowOrder, SIGNATURE, probe,
};
pub use image::BitmapImage;
pub use limits::Limits;
pub use pixel::{Pixel, from_rgbx_u32, pixels_from_u32, pixels_to_u32, to_rgbx_u32};
