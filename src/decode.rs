use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use enough::Stop;

use crate::error::BitmapError;
use crate::header::{BitmapHeader, HEADER_SIZE, Layout};
use crate::image::BitmapImage;
use crate::limits::Limits;

/// Options for reading a BMP from memory, a stream or a file.
///
/// ```no_run
/// use zenbmp::{DecodeRequest, Limits, Unstoppable};
///
/// let limits = Limits { max_pixels: Some(16_000_000), ..Default::default() };
/// let image = DecodeRequest::new()
///     .with_limits(&limits)
///     .read("in.bmp", Unstoppable)?;
/// # Ok::<(), zenbmp::BitmapError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeRequest<'a> {
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject images exceeding `limits` before the pixel buffer is allocated.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode a complete BMP file held in memory.
    pub fn decode(&self, data: &[u8], stop: impl Stop) -> Result<BitmapImage, BitmapError> {
        let header = BitmapHeader::parse(data)?;
        let layout = self.resolve(&header)?;
        if header.file_size != 0 && header.file_size as usize != data.len() {
            log::warn!(
                "file size field ({}) doesn't match actual size ({})",
                header.file_size,
                data.len()
            );
        }
        stop.check()?;

        let start = layout.data_offset;
        let packed = start
            .checked_add(layout.pixel_data_size)
            .and_then(|end| data.get(start..end))
            .ok_or(BitmapError::OutOfBounds {
                offset: start,
                len: layout.pixel_data_size,
                buffer_len: data.len(),
            })?;
        Ok(BitmapImage::from_parts(&header, &layout, packed.to_vec()))
    }

    /// Open and read the BMP file at `path`.
    ///
    /// I/O failures are reported as [`BitmapError::File`] carrying `path`.
    pub fn read(&self, path: impl AsRef<Path>, stop: impl Stop) -> Result<BitmapImage, BitmapError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BitmapError::from(e).at_path(path))?;
        self.read_from(BufReader::new(file), stop)
            .map_err(|e| e.at_path(path))
    }

    /// Read a BMP from a seekable stream positioned at its first byte.
    ///
    /// Only the headers and the pixel data are read; anything between them
    /// (extended info header fields, color tables) is skipped.
    pub fn read_from<R: Read + Seek>(
        &self,
        mut reader: R,
        stop: impl Stop,
    ) -> Result<BitmapImage, BitmapError> {
        let mut head = Vec::with_capacity(HEADER_SIZE);
        (&mut reader)
            .take(HEADER_SIZE as u64)
            .read_to_end(&mut head)?;
        // A bad signature wins over a short read.
        let header = match BitmapHeader::parse(&head) {
            Err(BitmapError::OutOfBounds { .. }) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("bitmap header truncated after {} bytes", head.len()),
                )
                .into());
            }
            parsed => parsed?,
        };
        let layout = self.resolve(&header)?;
        stop.check()?;

        log::trace!("seeking to pixel data at offset {}", layout.data_offset);
        reader.seek(SeekFrom::Start(layout.data_offset as u64))?;
        // Grows with what the stream actually holds, not with what the header claims.
        let mut packed = Vec::new();
        (&mut reader)
            .take(layout.pixel_data_size as u64)
            .read_to_end(&mut packed)?;
        if packed.len() != layout.pixel_data_size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "pixel data truncated: {} of {} bytes at offset {}",
                    packed.len(),
                    layout.pixel_data_size,
                    layout.data_offset
                ),
            )
            .into());
        }
        Ok(BitmapImage::from_parts(&header, &layout, packed))
    }

    fn resolve(&self, header: &BitmapHeader) -> Result<Layout, BitmapError> {
        let layout = header.validate()?;
        log::debug!(
            "bitmap {}x{} {:?}, stride {}, {} bytes of pixel data at offset {}",
            layout.width,
            layout.height,
            layout.row_order,
            layout.stride,
            layout.pixel_data_size,
            layout.data_offset
        );
        if let Some(limits) = self.limits {
            limits.check_layout(&layout)?;
        }
        Ok(layout)
    }
}
