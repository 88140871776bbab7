//! Text fitting
//!
//! Text is drawn with the embedded-graphics mono fonts and scaled by whole
//! pixels, so the largest size that fits a box is always crisp and the
//! output stays bit-for-bit reproducible.

use alloc::string::String;

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use inkstation_display::{Bitmap, Rect};

/// Horizontal placement inside a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
}

/// Draw an embedded-graphics item into a bitmap
pub(crate) fn paint<D>(target: &mut Bitmap, item: &D)
where
    D: Drawable<Color = BinaryColor>,
{
    let Ok(_) = item.draw(target);
}

/// Render a single line with `font` at 1:1 scale
fn line(text: &str, font: &MonoFont<'_>) -> Bitmap {
    let chars = text.chars().count() as u32;
    let size = font.character_size;
    let width = chars * size.width + chars.saturating_sub(1) * font.character_spacing;
    let mut bmp = Bitmap::new(width, size.height);
    let style = MonoTextStyle::new(font, BinaryColor::On);
    paint(
        &mut bmp,
        &Text::with_baseline(text, Point::zero(), style, Baseline::Top),
    );
    bmp
}

/// Render `text` as large as fits in `width` x `height`
///
/// Tries the large font at every integer scale up to `max_scale`, then the
/// small font, then the small font truncated to the width. Returns `None`
/// if not even one small character fits.
pub(crate) fn fit(text: &str, width: u32, height: u32, max_scale: u32) -> Option<Bitmap> {
    if text.is_empty() {
        return None;
    }

    let large = line(text, &FONT_10X20);
    if large.width() > 0 {
        let scale = (width / large.width())
            .min(height / large.height())
            .min(max_scale);
        if scale >= 1 {
            return Some(large.scaled(scale));
        }
    }

    let small = line(text, &FONT_6X10);
    if small.width() <= width && small.height() <= height {
        return Some(small);
    }

    let glyph_w = FONT_6X10.character_size.width + FONT_6X10.character_spacing;
    let keep = (width / glyph_w) as usize;
    if keep == 0 || height < FONT_6X10.character_size.height {
        return None;
    }
    let truncated: String = text.chars().take(keep).collect();
    Some(line(&truncated, &FONT_6X10))
}

/// Blit `glyph` into `area` of `target`, vertically centered
pub(crate) fn place(target: &mut Bitmap, glyph: &Bitmap, area: Rect, align: Align) {
    let dx = match align {
        Align::Left => 0,
        Align::Center => (area.width as i32 - glyph.width() as i32) / 2,
    };
    let dy = (area.height as i32 - glyph.height() as i32) / 2;
    target.blit(glyph, area.x as i32 + dx, area.y as i32 + dy);
}

/// Fit `text` into `area` and draw it; returns false if nothing fit
pub(crate) fn draw_text(
    target: &mut Bitmap,
    area: Rect,
    text: &str,
    align: Align,
    max_scale: u32,
) -> bool {
    match fit(text, area.width, area.height, max_scale) {
        Some(glyph) => {
            place(target, &glyph, area, align);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_picks_largest_scale() {
        // "12" is 20x20 at scale 1
        let bmp = fit("12", 100, 65, u32::MAX).unwrap();
        assert_eq!(bmp.width(), 60);
        assert_eq!(bmp.height(), 60);
    }

    #[test]
    fn test_fit_respects_max_scale() {
        let bmp = fit("12", 1000, 1000, 2).unwrap();
        assert_eq!(bmp.height(), 40);
    }

    #[test]
    fn test_fit_falls_back_to_small_font() {
        let bmp = fit("12", 15, 15, 4).unwrap();
        assert_eq!(bmp.width(), 12);
        assert_eq!(bmp.height(), 10);
    }

    #[test]
    fn test_fit_truncates() {
        let bmp = fit("overcast clouds", 30, 12, 4).unwrap();
        assert_eq!(bmp.width(), 30);
        assert!(fit("x", 5, 40, 1).is_none());
        assert!(fit("", 100, 100, 1).is_none());
    }

    #[test]
    fn test_draw_text_centers() {
        let mut target = Bitmap::new(100, 40);
        assert!(draw_text(
            &mut target,
            Rect::new(0, 0, 100, 40),
            "8",
            Align::Center,
            1
        ));
        let (x, _, w, _) = target.ink_bounds().unwrap();
        // 10px cell centered at 45..55
        assert!(x >= 45 && x + w <= 55);
    }
}
