use crate::error::BitmapError;
use crate::header::Layout;

/// Resource limits applied while decoding.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the packed pixel buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(BitmapError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(BitmapError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(BitmapError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), BitmapError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(BitmapError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn check_layout(&self, layout: &Layout) -> Result<(), BitmapError> {
        self.check(layout.width, layout.height)?;
        self.check_memory(layout.pixel_data_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        assert!(limits.check(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
    }

    #[test]
    fn each_bound_applies() {
        let limits = Limits {
            max_width: Some(10),
            max_height: Some(20),
            max_pixels: Some(150),
            max_memory_bytes: Some(1000),
        };
        assert!(limits.check(10, 15).is_ok());
        assert!(matches!(limits.check(11, 1), Err(BitmapError::LimitExceeded(_))));
        assert!(matches!(limits.check(1, 21), Err(BitmapError::LimitExceeded(_))));
        assert!(matches!(limits.check(10, 16), Err(BitmapError::LimitExceeded(_))));
        assert!(limits.check_memory(1000).is_ok());
        assert!(limits.check_memory(1001).is_err());
    }
}
