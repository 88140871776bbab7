//! Weather glyphs
//!
//! Each glyph is drawn from primitives into a square bitmap. Coordinates are
//! integer fractions of the side length so every size is deterministic.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, Polyline, PrimitiveStyle, Rectangle};
use inkstation_display::{Bitmap, Rect};

use super::text::{self, Align};
use crate::domain::WeatherIcon;

/// Ray directions around the sun, in tenths
const RAYS: [(i32, i32); 8] = [
    (10, 0),
    (7, 7),
    (0, 10),
    (-7, 7),
    (-10, 0),
    (-7, -7),
    (0, -10),
    (7, -7),
];

/// Draw `icon` as the largest square that fits, centered in `area`
pub(crate) fn draw_icon(target: &mut Bitmap, area: Rect, icon: WeatherIcon) {
    let side = area.width.min(area.height);
    if side == 0 {
        return;
    }
    let glyph = glyph(icon, side);
    text::place(target, &glyph, area, Align::Center);
}

/// Render a glyph into a `side` x `side` bitmap
pub(crate) fn glyph(icon: WeatherIcon, side: u32) -> Bitmap {
    let mut bmp = Bitmap::new(side, side);
    let s = side as i32;
    let stroke = (s / 20).max(1) as u32;

    match icon {
        WeatherIcon::Clear => sun(&mut bmp, s / 2, s / 2, s / 4, stroke),
        WeatherIcon::PartlyCloudy => {
            sun(&mut bmp, s * 35 / 100, s * 35 / 100, s / 6, stroke);
            cloud(&mut bmp, s * 15 / 100, s * 40 / 100, s * 8 / 10, s / 2, stroke);
        }
        WeatherIcon::Cloudy => cloud(&mut bmp, s / 20, s / 5, s * 9 / 10, s * 6 / 10, stroke),
        WeatherIcon::Rain => {
            upper_cloud(&mut bmp, s, stroke);
            for x in [s * 3 / 10, s / 2, s * 7 / 10] {
                line(
                    &mut bmp,
                    Point::new(x, s * 62 / 100),
                    Point::new(x - s / 10, s * 92 / 100),
                    stroke,
                );
            }
        }
        WeatherIcon::Thunderstorm => {
            upper_cloud(&mut bmp, s, stroke);
            let bolt = [
                Point::new(s * 58 / 100, s * 58 / 100),
                Point::new(s * 42 / 100, s * 77 / 100),
                Point::new(s * 56 / 100, s * 77 / 100),
                Point::new(s * 44 / 100, s * 96 / 100),
            ];
            text::paint(
                &mut bmp,
                &Polyline::new(&bolt).into_styled(PrimitiveStyle::with_stroke(
                    BinaryColor::On,
                    stroke + 1,
                )),
            );
        }
        WeatherIcon::Snow => {
            upper_cloud(&mut bmp, s, stroke);
            for (x, y) in [
                (s * 3 / 10, s * 72 / 100),
                (s / 2, s * 86 / 100),
                (s * 7 / 10, s * 72 / 100),
            ] {
                flake(&mut bmp, Point::new(x, y), (s / 14).max(1), stroke);
            }
        }
        WeatherIcon::Mist => {
            for (i, (from, to)) in [(2, 8), (1, 7), (3, 9), (2, 8)].into_iter().enumerate() {
                let y = s * (3 + 2 * i as i32) / 10;
                line(
                    &mut bmp,
                    Point::new(s * from / 10, y),
                    Point::new(s * to / 10, y),
                    stroke,
                );
            }
        }
        WeatherIcon::Unknown => {
            text::draw_text(
                &mut bmp,
                Rect::panel(side, side),
                "?",
                Align::Center,
                u32::MAX,
            );
        }
    }

    bmp
}

fn line(bmp: &mut Bitmap, from: Point, to: Point, stroke: u32) {
    text::paint(
        bmp,
        &Line::new(from, to).into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, stroke)),
    );
}

fn sun(bmp: &mut Bitmap, cx: i32, cy: i32, r: i32, stroke: u32) {
    let center = Point::new(cx, cy);
    text::paint(
        bmp,
        &Circle::with_center(center, (2 * r).max(1) as u32)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On)),
    );

    let inner = r + r / 3;
    let outer = r + r * 4 / 5;
    for (dx, dy) in RAYS {
        line(
            bmp,
            center + Point::new(dx * inner / 10, dy * inner / 10),
            center + Point::new(dx * outer / 10, dy * outer / 10),
            stroke,
        );
    }
}

/// Cloud occupying the top part of the glyph, leaving room for precipitation
fn upper_cloud(bmp: &mut Bitmap, s: i32, stroke: u32) {
    cloud(bmp, s / 20, s / 20, s * 9 / 10, s / 2, stroke);
}

/// Outlined cloud inside the box (x, y, w, h); needs `h <= 3 * w / 4`
fn cloud(bmp: &mut Bitmap, x: i32, y: i32, w: i32, h: i32, stroke: u32) {
    let inset = stroke as i32;
    // Black silhouette first, then the same shapes shrunk and white
    for (d, color) in [(0, BinaryColor::On), (inset, BinaryColor::Off)] {
        let style = PrimitiveStyle::with_fill(color);
        let left_r = h / 3 - d;
        let right_r = h / 2 - d;
        if left_r <= 0 || right_r <= 0 {
            continue;
        }
        text::paint(
            bmp,
            &Circle::with_center(Point::new(x + w / 4, y + h * 2 / 3), (2 * left_r) as u32)
                .into_styled(style),
        );
        text::paint(
            bmp,
            &Circle::with_center(Point::new(x + w * 3 / 5, y + h / 2), (2 * right_r) as u32)
                .into_styled(style),
        );
        let base_h = h / 2 - d;
        if base_h > 0 {
            text::paint(
                bmp,
                &Rectangle::new(
                    Point::new(x + w / 4, y + h / 2),
                    Size::new((w * 3 / 5 - w / 4) as u32, base_h as u32),
                )
                .into_styled(style),
            );
        }
    }
}

fn flake(bmp: &mut Bitmap, c: Point, r: i32, stroke: u32) {
    line(bmp, c - Point::new(r, 0), c + Point::new(r, 0), stroke);
    line(bmp, c - Point::new(0, r), c + Point::new(0, r), stroke);
    line(bmp, c - Point::new(r, r), c + Point::new(r, r), stroke);
    line(bmp, c + Point::new(r, -r), c + Point::new(-r, r), stroke);
}
