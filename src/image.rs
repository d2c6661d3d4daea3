use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use enough::{Stop, Unstoppable};

use crate::decode::DecodeRequest;
use crate::error::BitmapError;
use crate::header::{
    self, BIT_DEPTH, BitmapHeader, Compression, DEFAULT_PIXELS_PER_METER, HEADER_SIZE, Layout,
    RowOrder,
};
use crate::pixel::Pixel;
use crate::rows;

/// An uncompressed 24-bit bitmap.
///
/// The packed pixel data (padded BGR rows, exactly as stored in the file) is
/// always present. The dense pixel array is filled in by
/// [`decode_pixels`](Self::decode_pixels), or supplied up front by
/// [`create`](Self::create).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapImage {
    width: u32,
    height: u32,
    row_order: RowOrder,
    stride: usize,
    x_pixels_per_meter: i32,
    y_pixels_per_meter: i32,
    packed: Vec<u8>,
    pixels: Option<Vec<Pixel>>,
}

impl BitmapImage {
    /// Read the BMP file at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
        DecodeRequest::new().read(path, Unstoppable)
    }

    /// [`read`](Self::read) with cooperative cancellation.
    pub fn read_with(path: impl AsRef<Path>, stop: impl Stop) -> Result<Self, BitmapError> {
        DecodeRequest::new().read(path, stop)
    }

    /// Parse a complete BMP file held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        DecodeRequest::new().decode(data, Unstoppable)
    }

    pub(crate) fn from_parts(header: &BitmapHeader, layout: &Layout, packed: Vec<u8>) -> Self {
        debug_assert_eq!(packed.len(), layout.pixel_data_size);
        Self {
            width: layout.width,
            height: layout.height,
            row_order: layout.row_order,
            stride: layout.stride,
            x_pixels_per_meter: header.x_pixels_per_meter,
            y_pixels_per_meter: header.y_pixels_per_meter,
            packed,
            pixels: None,
        }
    }

    /// Build a bottom-up image from `width * height` pixels, top row first.
    ///
    /// Resolution defaults to [`DEFAULT_PIXELS_PER_METER`] on both axes.
    pub fn create(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, BitmapError> {
        Self::create_with(width, height, pixels, Unstoppable)
    }

    /// [`create`](Self::create) with cooperative cancellation.
    pub fn create_with(
        width: u32,
        height: u32,
        pixels: Vec<Pixel>,
        stop: impl Stop,
    ) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::Size {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        let (stride, _) = header::geometry(width, height)?;
        let row_order = RowOrder::BottomUp;
        let packed = rows::encode(&pixels, width, height, BIT_DEPTH, row_order, &stop)?;
        log::debug!(
            "created {width}x{height} bitmap, stride {stride}, {} bytes of pixel data",
            packed.len()
        );
        Ok(Self {
            width,
            height,
            row_order,
            stride,
            x_pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            y_pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            packed,
            pixels: Some(pixels),
        })
    }

    /// Replace the informational resolution, in pixels per meter.
    pub fn with_resolution(mut self, x_pixels_per_meter: i32, y_pixels_per_meter: i32) -> Self {
        self.x_pixels_per_meter = x_pixels_per_meter;
        self.y_pixels_per_meter = y_pixels_per_meter;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Always 24.
    pub fn bit_depth(&self) -> u16 {
        BIT_DEPTH
    }

    /// Always [`Compression::Rgb`].
    pub fn compression(&self) -> Compression {
        Compression::Rgb
    }

    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// Bytes per stored row, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixel_data_size(&self) -> usize {
        self.packed.len()
    }

    /// Size of the file [`write`](Self::write) produces.
    pub fn file_size(&self) -> usize {
        HEADER_SIZE + self.packed.len()
    }

    pub fn x_pixels_per_meter(&self) -> i32 {
        self.x_pixels_per_meter
    }

    pub fn y_pixels_per_meter(&self) -> i32 {
        self.y_pixels_per_meter
    }

    /// Packed pixel data: padded BGR rows in [`row_order`](Self::row_order).
    pub fn packed(&self) -> &[u8] {
        &self.packed
    }

    /// Headers describing the current state of the image.
    pub fn header(&self) -> BitmapHeader {
        // create() and decode both go through header::geometry, so the size fits.
        BitmapHeader::uncompressed(
            self.width,
            self.height,
            self.row_order,
            self.packed.len() as u32,
            self.x_pixels_per_meter,
            self.y_pixels_per_meter,
        )
    }

    /// Decoded pixels, if [`decode_pixels`](Self::decode_pixels) or
    /// [`create`](Self::create) produced them.
    pub fn pixels(&self) -> Option<&[Pixel]> {
        self.pixels.as_deref()
    }

    /// Decode the packed data into pixels (top row first), caching the result.
    pub fn decode_pixels(&mut self) -> Result<&[Pixel], BitmapError> {
        self.decode_pixels_with(Unstoppable)
    }

    /// [`decode_pixels`](Self::decode_pixels) with cooperative cancellation.
    ///
    /// On error the image is left as it was.
    pub fn decode_pixels_with(&mut self, stop: impl Stop) -> Result<&[Pixel], BitmapError> {
        let pixels = match self.pixels.take() {
            Some(pixels) => pixels,
            None => self.unpack(&stop)?,
        };
        let pixels: &[Pixel] = self.pixels.insert(pixels);
        Ok(pixels)
    }

    /// Take the pixels, decoding them if needed.
    pub fn into_pixels(self) -> Result<Vec<Pixel>, BitmapError> {
        match self.pixels {
            Some(pixels) => Ok(pixels),
            None => self.unpack(&Unstoppable),
        }
    }

    /// The pixel at column `x`, row `y` (row 0 at the top), read from the
    /// packed data.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        rows::pixel_at(&self.packed, self.width, self.height, self.row_order, x, y)
    }

    /// Copy the pixels into an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> Result<imgref::ImgVec<Pixel>, BitmapError> {
        let pixels = match &self.pixels {
            Some(pixels) => pixels.clone(),
            None => self.unpack(&Unstoppable)?,
        };
        Ok(imgref::ImgVec::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    fn unpack(&self, stop: &dyn Stop) -> Result<Vec<Pixel>, BitmapError> {
        rows::decode(
            &self.packed,
            self.width,
            self.height,
            BIT_DEPTH,
            self.row_order,
            stop,
        )
    }

    /// Write headers and packed pixel data to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), BitmapError> {
        let header = self.header().to_bytes()?;
        writer.write_all(&header)?;
        writer.write_all(&self.packed)?;
        Ok(())
    }

    /// Encode to an in-memory BMP file.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BitmapError> {
        let mut out = Vec::with_capacity(self.file_size());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Create or truncate `path` and write the image to it.
    ///
    /// A partially written file is removed on failure.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), BitmapError> {
        let path = path.as_ref();
        log::debug!(
            "writing {}x{} bitmap ({} bytes) to {}",
            self.width,
            self.height,
            self.file_size(),
            path.display()
        );
        let file = File::create(path).map_err(|e| BitmapError::from(e).at_path(path))?;
        let mut writer = BufWriter::new(file);
        let result = self
            .write_to(&mut writer)
            .and_then(|()| writer.flush().map_err(BitmapError::from));
        if let Err(e) = result {
            drop(writer);
            if let Err(remove) = fs::remove_file(path) {
                log::warn!("could not remove partial {}: {remove}", path.display());
            }
            return Err(e.at_path(path));
        }
        Ok(())
    }
}
