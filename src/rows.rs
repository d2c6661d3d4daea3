//! Conversion between padded BGR rows and a dense pixel array.
//!
//! On disk each row holds `width` pixels as blue, green, red bytes followed
//! by zero padding up to the next multiple of four bytes. The pixel array is
//! row-major with row 0 at the top of the image, whatever [`RowOrder`] the
//! rows are stored in.

use enough::Stop;

use crate::error::{BitmapError, Unsupported};
use crate::header::{BIT_DEPTH, RowOrder};
use crate::pixel::Pixel;

const BYTES_PER_PIXEL: usize = 3;

/// Bytes per stored row, rounded up to a multiple of 4.
///
/// `None` if the computation overflows.
pub fn stride(width: u32, bit_depth: u16) -> Option<usize> {
    let bits = (width as usize).checked_mul(usize::from(bit_depth))?;
    Some(bits.checked_add(31)? / 32 * 4)
}

/// Filler bytes at the end of each stored row.
pub fn padding(width: u32, bit_depth: u16) -> Option<usize> {
    let bits = (width as usize).checked_mul(usize::from(bit_depth))?;
    stride(width, bit_depth)?.checked_sub(bits.div_ceil(8))
}

struct Geometry {
    width: usize,
    height: usize,
    stride: usize,
    size: usize,
}

impl Geometry {
    fn new(width: u32, height: u32, bit_depth: u16) -> Result<Self, BitmapError> {
        if bit_depth != BIT_DEPTH {
            return Err(Unsupported::BitDepth(bit_depth).into());
        }
        let too_large = || BitmapError::DimensionsTooLarge { width, height };
        let stride = stride(width, bit_depth).ok_or_else(too_large)?;
        let size = stride
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        Ok(Self {
            width: width as usize,
            height: height as usize,
            stride,
            size,
        })
    }

    /// Byte offset of logical row `y`.
    fn row_start(&self, y: usize, order: RowOrder) -> usize {
        let stored = match order {
            RowOrder::TopDown => y,
            RowOrder::BottomUp => self.height - 1 - y,
        };
        stored * self.stride
    }
}

/// Unpack `width * height` pixels from padded BGR rows.
///
/// Bytes of `buffer` past `stride * height` are ignored.
pub fn decode(
    buffer: &[u8],
    width: u32,
    height: u32,
    bit_depth: u16,
    order: RowOrder,
    stop: &dyn Stop,
) -> Result<Vec<Pixel>, BitmapError> {
    let geo = Geometry::new(width, height, bit_depth)?;
    if buffer.len() < geo.size {
        return Err(BitmapError::OutOfBounds {
            offset: 0,
            len: geo.size,
            buffer_len: buffer.len(),
        });
    }
    let count = geo
        .width
        .checked_mul(geo.height)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    let row_bytes = geo.width * BYTES_PER_PIXEL;
    let mut out = Vec::with_capacity(count);
    for y in 0..geo.height {
        if y % 16 == 0 {
            stop.check()?;
        }
        let start = geo.row_start(y, order);
        let row = &buffer[start..start + row_bytes];
        out.extend(
            row.chunks_exact(BYTES_PER_PIXEL)
                .map(|bgr| Pixel::new(bgr[2], bgr[1], bgr[0])),
        );
    }
    Ok(out)
}

/// Pack `pixels` into zero-padded BGR rows of `stride(width) * height` bytes.
pub fn encode(
    pixels: &[Pixel],
    width: u32,
    height: u32,
    bit_depth: u16,
    order: RowOrder,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    let geo = Geometry::new(width, height, bit_depth)?;
    let expected = geo
        .width
        .checked_mul(geo.height)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    if pixels.len() != expected {
        return Err(BitmapError::PixelCountMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let row_bytes = geo.width * BYTES_PER_PIXEL;
    let mut out = vec![0u8; geo.size];
    if geo.width == 0 {
        return Ok(out);
    }
    for (y, src) in pixels.chunks_exact(geo.width).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let start = geo.row_start(y, order);
        let dst = &mut out[start..start + row_bytes];
        for (bgr, p) in dst.chunks_exact_mut(BYTES_PER_PIXEL).zip(src) {
            bgr[0] = p.b;
            bgr[1] = p.g;
            bgr[2] = p.r;
        }
    }
    Ok(out)
}

/// Read the pixel at column `x` of logical row `y` straight from `buffer`.
///
/// `None` if the coordinates are outside the image or the buffer is too short.
pub fn pixel_at(
    buffer: &[u8],
    width: u32,
    height: u32,
    order: RowOrder,
    x: u32,
    y: u32,
) -> Option<Pixel> {
    if x >= width || y >= height {
        return None;
    }
    let geo = Geometry::new(width, height, BIT_DEPTH).ok()?;
    let offset = geo.row_start(y as usize, order) + x as usize * BYTES_PER_PIXEL;
    let bgr = buffer.get(offset..offset + BYTES_PER_PIXEL)?;
    Some(Pixel::new(bgr[2], bgr[1], bgr[0]))
}

#[cfg(test)]
mod tests {
    use enough::Unstoppable;

    use super::*;

    fn gradient(w: usize, h: usize) -> Vec<Pixel> {
        (0..w * h)
            .map(|i| Pixel::new(i as u8, (i * 7) as u8, 255 - i as u8))
            .collect()
    }

    #[test]
    fn stride_is_padded_to_four_bytes() {
        for width in 1..=64u32 {
            let s = stride(width, 24).unwrap();
            assert_eq!(s % 4, 0, "width {width}");
            assert!(s >= width as usize * 3, "width {width}");
            if width % 4 == 0 {
                assert_eq!(s, width as usize * 3, "width {width}");
            }
            assert_eq!(padding(width, 24).unwrap(), s - width as usize * 3);
        }
        assert_eq!(stride(5, 24), Some(16));
        assert_eq!(stride(1, 24), Some(4));
        assert_eq!(stride(0, 24), Some(0));
    }

    #[test]
    fn encode_writes_bgr_and_zero_padding() {
        let pixels = vec![Pixel::new(255, 0, 0); 15];
        let packed = encode(&pixels, 5, 3, 24, RowOrder::BottomUp, &Unstoppable).unwrap();
        assert_eq!(packed.len(), 48);
        for row in packed.chunks_exact(16) {
            for bgr in row[..15].chunks_exact(3) {
                assert_eq!(bgr, [0x00, 0x00, 0xff]);
            }
            assert_eq!(row[15], 0);
        }
    }

    #[test]
    fn roundtrip_both_orders() {
        for (w, h) in [(1, 1), (2, 3), (3, 2), (4, 4), (5, 3), (7, 17)] {
            let pixels = gradient(w, h);
            for order in [RowOrder::BottomUp, RowOrder::TopDown] {
                let packed =
                    encode(&pixels, w as u32, h as u32, 24, order, &Unstoppable).unwrap();
                let decoded =
                    decode(&packed, w as u32, h as u32, 24, order, &Unstoppable).unwrap();
                assert_eq!(decoded, pixels, "{w}x{h} {order:?}");
            }
        }
    }

    #[test]
    fn bottom_up_stores_last_row_first() {
        // 1x2: top red, bottom blue
        let pixels = [Pixel::new(255, 0, 0), Pixel::new(0, 0, 255)];
        let packed = encode(&pixels, 1, 2, 24, RowOrder::BottomUp, &Unstoppable).unwrap();
        assert_eq!(packed, [0xff, 0, 0, 0, 0, 0, 0xff, 0]);
        let packed = encode(&pixels, 1, 2, 24, RowOrder::TopDown, &Unstoppable).unwrap();
        assert_eq!(packed, [0, 0, 0xff, 0, 0xff, 0, 0, 0]);
    }

    #[test]
    fn decode_ignores_padding_contents() {
        let mut packed = vec![0xeeu8; 8];
        packed[..3].copy_from_slice(&[1, 2, 3]);
        packed[4..7].copy_from_slice(&[4, 5, 6]);
        let decoded = decode(&packed, 1, 2, 24, RowOrder::TopDown, &Unstoppable).unwrap();
        assert_eq!(decoded, [Pixel::new(3, 2, 1), Pixel::new(6, 5, 4)]);
    }

    #[test]
    fn short_buffer_is_out_of_bounds() {
        let packed = vec![0u8; 47];
        match decode(&packed, 5, 3, 24, RowOrder::BottomUp, &Unstoppable) {
            Err(BitmapError::OutOfBounds {
                len, buffer_len, ..
            }) => assert_eq!((len, buffer_len), (48, 47)),
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn wrong_pixel_count() {
        let pixels = vec![Pixel::default(); 5];
        assert!(matches!(
            encode(&pixels, 2, 2, 24, RowOrder::BottomUp, &Unstoppable),
            Err(BitmapError::PixelCountMismatch {
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn only_24_bit() {
        assert!(matches!(
            decode(&[0; 64], 2, 2, 32, RowOrder::BottomUp, &Unstoppable),
            Err(BitmapError::Unsupported(Unsupported::BitDepth(32)))
        ));
        assert!(matches!(
            encode(&[Pixel::default()], 1, 1, 8, RowOrder::BottomUp, &Unstoppable),
            Err(BitmapError::Unsupported(Unsupported::BitDepth(8)))
        ));
    }

    #[test]
    fn pixel_at_follows_row_order() {
        let pixels = gradient(3, 2);
        for order in [RowOrder::BottomUp, RowOrder::TopDown] {
            let packed = encode(&pixels, 3, 2, 24, order, &Unstoppable).unwrap();
            for y in 0..2 {
                for x in 0..3 {
                    assert_eq!(
                        pixel_at(&packed, 3, 2, order, x, y),
                        Some(pixels[(y * 3 + x) as usize])
                    );
                }
            }
            assert_eq!(pixel_at(&packed, 3, 2, order, 3, 0), None);
            assert_eq!(pixel_at(&packed, 3, 2, order, 0, 2), None);
        }
        assert_eq!(pixel_at(&[0; 4], 3, 2, RowOrder::TopDown, 2, 1), None);
    }
}
