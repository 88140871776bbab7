//! File-backed panel
//!
//! Stands in for an e-paper driver: the frame memory is a bitmap that
//! `write_region` loads into, and every `refresh` publishes the whole frame
//! as a binary PBM (`P4`) image. The previous image is loaded at start-up
//! so partial writes land on what the last cycle showed.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};

use inkstation_core::{Bitmap, DisplayController, DisplayError, Rect, RefreshMode};

use crate::store::write_atomic;

/// Panel whose visible state is a PBM image on disk
#[derive(Debug)]
pub struct PbmPanel {
    path: PathBuf,
    frame: Bitmap,
    pending: usize,
    full_refreshes: u32,
    partial_refreshes: u32,
}

impl PbmPanel {
    /// Open the panel image at `path`
    ///
    /// A missing image, or one with other dimensions, starts as a white
    /// frame. Other read errors are returned.
    pub fn open(path: impl Into<PathBuf>, width: u32, height: u32) -> io::Result<Self> {
        let path = path.into();
        let frame = match fs::read(&path) {
            Ok(bytes) => match decode_pbm(&bytes) {
                Some(frame) if (frame.width(), frame.height()) == (width, height) => frame,
                Some(frame) => {
                    warn!(
                        "Panel image {} is {}x{}, starting a blank {}x{} frame",
                        path.display(),
                        frame.width(),
                        frame.height(),
                        width,
                        height
                    );
                    Bitmap::new(width, height)
                }
                None => {
                    warn!("Panel image {} is not a P4 PBM, starting blank", path.display());
                    Bitmap::new(width, height)
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Bitmap::new(width, height),
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            frame,
            pending: 0,
            full_refreshes: 0,
            partial_refreshes: 0,
        })
    }

    /// Refresh counts since open as (full, partial)
    pub fn refreshes(&self) -> (u32, u32) {
        (self.full_refreshes, self.partial_refreshes)
    }
}

impl DisplayController for PbmPanel {
    fn dimensions(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn write_region(&mut self, bitmap: &Bitmap, rect: Rect) -> Result<(), DisplayError> {
        let panel = Rect::panel(self.frame.width(), self.frame.height());
        if rect.is_empty()
            || !panel.contains_rect(&rect)
            || (bitmap.width(), bitmap.height()) != (rect.width, rect.height)
        {
            return Err(DisplayError::InvalidRegion);
        }

        self.frame.blit(bitmap, rect.x as i32, rect.y as i32);
        self.pending += 1;
        Ok(())
    }

    fn refresh(&mut self, mode: RefreshMode) -> Result<(), DisplayError> {
        write_atomic(&self.path, &encode_pbm(&self.frame)).map_err(|e| {
            warn!("Cannot write panel image {}: {}", self.path.display(), e);
            DisplayError::Communication
        })?;

        match mode {
            RefreshMode::Full => self.full_refreshes += 1,
            RefreshMode::Partial => self.partial_refreshes += 1,
        }
        debug!("Panel {} refresh of {} write(s)", mode, self.pending);
        self.pending = 0;
        Ok(())
    }
}

/// Serialize a bitmap as binary PBM
///
/// PBM rows are padded to whole bytes with 1 meaning black, the same
/// packing `Bitmap` uses.
pub fn encode_pbm(bitmap: &Bitmap) -> Vec<u8> {
    let header = format!("P4\n{} {}\n", bitmap.width(), bitmap.height());
    let mut out = Vec::with_capacity(header.len() + bitmap.as_bytes().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(bitmap.as_bytes());
    out
}

/// Parse a binary PBM image
pub fn decode_pbm(bytes: &[u8]) -> Option<Bitmap> {
    let mut pos = 0;
    if next_token(bytes, &mut pos)? != b"P4" {
        return None;
    }
    let width = parse_u32(next_token(bytes, &mut pos)?)?;
    let height = parse_u32(next_token(bytes, &mut pos)?)?;

    // Exactly one whitespace byte separates the header from the raster
    let raster = bytes.get(pos + 1..)?;
    Bitmap::from_raw(width, height, raster.to_vec())
}

/// Next whitespace-delimited header token, skipping `#` comments
fn next_token<'a>(bytes: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    loop {
        match bytes.get(*pos)? {
            b if b.is_ascii_whitespace() => *pos += 1,
            b'#' => {
                while *bytes.get(*pos)? != b'\n' {
                    *pos += 1;
                }
            }
            _ => break,
        }
    }
    let start = *pos;
    while bytes.get(*pos).is_some_and(|b| !b.is_ascii_whitespace()) {
        *pos += 1;
    }
    Some(&bytes[start..*pos])
}

fn parse_u32(token: &[u8]) -> Option<u32> {
    std::str::from_utf8(token).ok()?.parse().ok()
}
