//! Frame type and pixel access — RGB8 buffers, cropping, `image` interop.

use crate::types::BoundingBox;
use image::RgbImage;
use thiserror::Error;

/// Bytes per RGB8 pixel.
const RGB_CHANNELS: usize = 3;

/// An owned RGB8 video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Interleaved RGB pixel data (width * height * 3 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid RGB length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("crop (t={top}, r={right}, b={bottom}, l={left}) out of bounds for {width}x{height} frame")]
    CropOutOfBounds {
        top: u32,
        right: u32,
        bottom: u32,
        left: u32,
        width: u32,
        height: u32,
    },
}

impl Frame {
    /// Build a frame from raw interleaved RGB8 data.
    pub fn from_rgb8(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if data.len() != expected {
            return Err(FrameError::InvalidLength { expected, actual: data.len() });
        }
        Ok(Self { data, width, height })
    }

    /// Solid-color frame. Hosts and tests use this as a stand-in frame.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * RGB_CHANNELS);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&rgb);
        }
        Self { data, width, height }
    }

    /// Read one pixel. Out-of-bounds coordinates return `None`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * RGB_CHANNELS;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * RGB_CHANNELS;
        self.data[idx..idx + RGB_CHANNELS].copy_from_slice(&rgb);
    }

    /// Extract the sub-frame covered by `region`.
    ///
    /// The region must satisfy `top < bottom <= height` and
    /// `left < right <= width`. Anything else is an error, not a clamp.
    pub fn crop(&self, region: &BoundingBox) -> Result<Frame, FrameError> {
        let in_bounds = region.top < region.bottom
            && region.left < region.right
            && region.bottom <= self.height
            && region.right <= self.width;
        if !in_bounds {
            return Err(FrameError::CropOutOfBounds {
                top: region.top,
                right: region.right,
                bottom: region.bottom,
                left: region.left,
                width: self.width,
                height: self.height,
            });
        }

        let row_bytes = region.width() as usize * RGB_CHANNELS;
        let mut data = Vec::with_capacity(row_bytes * region.height() as usize);
        for y in region.top..region.bottom {
            let start = (y as usize * self.width as usize + region.left as usize) * RGB_CHANNELS;
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(Frame { data, width: region.width(), height: region.height() })
    }

    /// Copy the frame into an [`image::RgbImage`].
    pub fn to_rgb_image(&self) -> RgbImage {
        // from_raw only fails on a length mismatch, which construction rules out.
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }
}

impl From<RgbImage> for Frame {
    fn from(img: RgbImage) -> Self {
        let width = img.width();
        let height = img.height();
        Self { data: img.into_raw(), width, height }
    }
}
