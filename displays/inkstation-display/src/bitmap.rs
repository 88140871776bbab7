//! 1-bit pixel buffers
//!
//! Provides the monochrome buffer each screen region is rendered into.
//! Rows are packed MSB-first, one bit per pixel, padded to a whole byte;
//! a set bit is a black pixel. Padding bits are always zero so that equal
//! images have equal bytes and therefore equal hashes.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Point, Size};
use embedded_graphics::Pixel;
use sha2::{Digest, Sha256};

/// Digest of a bitmap's dimensions and pixel bytes
///
/// The first 64 bits of a SHA-256 digest. Two bitmaps with the same hash
/// are treated as visually identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentHash(pub u64);

impl ContentHash {
    /// Digest a sequence of byte slices as one message
    pub fn of_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(head))
    }
}

impl core::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Monochrome pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create a white bitmap
    pub fn new(width: u32, height: u32) -> Self {
        let stride = Self::stride_for(width);
        Self {
            width,
            height,
            data: vec![0; stride * height as usize],
        }
    }

    /// Wrap packed row data
    ///
    /// Returns `None` if `data` has the wrong length. Padding bits are cleared.
    pub fn from_raw(width: u32, height: u32, mut data: Vec<u8>) -> Option<Self> {
        let stride = Self::stride_for(width);
        if data.len() != stride * height as usize {
            return None;
        }

        let spare = (stride * 8) as u32 - width;
        if spare > 0 && stride > 0 {
            let mask = 0xFFu8 << spare;
            for row in data.chunks_mut(stride) {
                row[stride - 1] &= mask;
            }
        }

        Some(Self {
            width,
            height,
            data,
        })
    }

    const fn stride_for(width: u32) -> usize {
        (width as usize + 7) / 8
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub const fn stride(&self) -> usize {
        Self::stride_for(self.width)
    }

    /// Packed pixel rows
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if the pixel at (x, y) is black
    ///
    /// Out-of-range coordinates read as white.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.stride() + x as usize / 8;
        self.data[idx] & (0x80 >> (x % 8)) != 0
    }

    /// Set the pixel at (x, y); out-of-range coordinates are ignored
    pub fn set(&mut self, x: u32, y: u32, black: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.stride() + x as usize / 8;
        let bit = 0x80 >> (x % 8);
        if black {
            self.data[idx] |= bit;
        } else {
            self.data[idx] &= !bit;
        }
    }

    /// Fill the whole bitmap
    pub fn fill(&mut self, black: bool) {
        if black {
            for y in 0..self.height {
                for x in 0..self.width {
                    self.set(x, y, true);
                }
            }
        } else {
            self.data.fill(0);
        }
    }

    /// Number of black pixels
    pub fn black_pixels(&self) -> u32 {
        self.data.iter().map(|b| b.count_ones()).sum()
    }

    /// Copy `src` into this bitmap with its top-left corner at (x, y)
    ///
    /// Both black and white source pixels overwrite the destination.
    /// Parts of `src` falling outside this bitmap are clipped.
    pub fn blit(&mut self, src: &Bitmap, x: i32, y: i32) {
        for sy in 0..src.height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                self.set(dx as u32, dy as u32, src.get(sx, sy));
            }
        }
    }

    /// Nearest-neighbour upscale by an integer factor
    pub fn scaled(&self, factor: u32) -> Bitmap {
        let factor = factor.max(1);
        if factor == 1 {
            return self.clone();
        }

        let mut out = Bitmap::new(self.width * factor, self.height * factor);
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                for oy in 0..factor {
                    for ox in 0..factor {
                        out.set(x * factor + ox, y * factor + oy, true);
                    }
                }
            }
        }
        out
    }

    /// Smallest rectangle (x, y, width, height) containing every black pixel
    pub fn ink_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Digest of the dimensions and pixel bytes
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_parts(&[
            &self.width.to_be_bytes(),
            &self.height.to_be_bytes(),
            &self.data,
        ])
    }
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("hash", &self.content_hash())
            .finish()
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set(x as u32, y as u32, color.is_on());
        }
        Ok(())
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
