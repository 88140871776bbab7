//! Region renderer
//!
//! Turns a domain snapshot into one bitmap per layout region. Rendering is
//! stateless and deterministic: the same snapshot and layout always produce
//! the same bytes, which is what lets the region cache detect change by hash.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::Timelike;
use inkstation_display::{Bitmap, ContentHash, Rect};
use thiserror::Error;

use super::icons::draw_icon;
use super::text::{draw_text, place, Align};
use crate::config::Units;
use crate::domain::{CurrentWeather, DomainSnapshot, ForecastDay, UserContent, WeatherIcon};
use crate::layout::{Layout, RegionName, FORECAST_DAYS};

/// Largest text scale outside the clock
const MAX_LABEL_SCALE: u32 = 4;

/// Render errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No current conditions have ever been fetched
    #[error("no current weather available")]
    MissingCurrentWeather,
    /// The forecast has fewer days than the layout has cells
    #[error("forecast has {actual} days, layout needs {expected}")]
    ForecastTooShort { expected: usize, actual: usize },
}

/// Pixels for one region in one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub region: RegionName,
    /// Panel rectangle the bitmap is written to
    pub rect: Rect,
    /// Region-sized bitmap
    pub bitmap: Bitmap,
    pub hash: ContentHash,
}

impl RenderedContent {
    fn new(region: RegionName, rect: Rect, bitmap: Bitmap) -> Self {
        let hash = bitmap.content_hash();
        Self {
            region,
            rect,
            bitmap,
            hash,
        }
    }
}

/// Render every region of `layout`, in priority order
pub fn render(
    layout: &Layout,
    snapshot: &DomainSnapshot<'_>,
) -> Result<Vec<RenderedContent>, RenderError> {
    let current = snapshot.current.ok_or(RenderError::MissingCurrentWeather)?;
    if snapshot.forecast.len() < FORECAST_DAYS {
        return Err(RenderError::ForecastTooShort {
            expected: FORECAST_DAYS,
            actual: snapshot.forecast.len(),
        });
    }

    let mut out = Vec::with_capacity(layout.len());
    for (region, rect) in layout.iter() {
        let bitmap = match region {
            RegionName::Clock => render_clock(rect, snapshot),
            RegionName::CurrentWeather => {
                render_current(rect, layout.icon_width(), current, snapshot.units)
            }
            RegionName::ForecastDay(_) => {
                // Cells beyond the forecast were rejected above
                let day = region
                    .forecast_index()
                    .and_then(|i| snapshot.forecast.get(i))
                    .ok_or(RenderError::ForecastTooShort {
                        expected: FORECAST_DAYS,
                        actual: snapshot.forecast.len(),
                    })?;
                render_forecast(rect, day, snapshot.units)
            }
            RegionName::UserBlock => render_user(rect, snapshot.user),
        };
        out.push(RenderedContent::new(region, rect, bitmap));
    }
    Ok(out)
}

/// Hours above minutes, each at the largest scale that fits
fn render_clock(rect: Rect, snapshot: &DomainSnapshot<'_>) -> Bitmap {
    let mut bmp = Bitmap::new(rect.width, rect.height);
    let half = rect.height / 2;
    let hours = format!("{:02}", snapshot.now.hour());
    let minutes = format!("{:02}", snapshot.now.minute());

    draw_text(
        &mut bmp,
        Rect::new(0, 0, rect.width, half),
        &hours,
        Align::Center,
        u32::MAX,
    );
    draw_text(
        &mut bmp,
        Rect::new(0, half, rect.width, rect.height - half),
        &minutes,
        Align::Center,
        u32::MAX,
    );
    bmp
}

fn render_current(rect: Rect, icon_width: u32, current: &CurrentWeather, units: Units) -> Bitmap {
    let mut bmp = Bitmap::new(rect.width, rect.height);
    draw_icon(
        &mut bmp,
        Rect::new(0, 0, icon_width, rect.height),
        WeatherIcon::from_code(&current.icon),
    );

    let text_w = rect.width - icon_width;
    let half = rect.height / 2;
    draw_text(
        &mut bmp,
        Rect::new(icon_width, 0, text_w, half),
        &current.condition,
        Align::Center,
        MAX_LABEL_SCALE,
    );
    draw_text(
        &mut bmp,
        Rect::new(icon_width, half, text_w, rect.height - half),
        &temperature(current.temp, units),
        Align::Center,
        MAX_LABEL_SCALE,
    );
    bmp
}

/// Date label, icon, then high/low
fn render_forecast(rect: Rect, day: &ForecastDay, units: Units) -> Bitmap {
    let mut bmp = Bitmap::new(rect.width, rect.height);
    let label_w = rect.width * 3 / 10;
    let icon_w = rect.height.min(rect.width / 5);
    let temps_x = label_w + icon_w;

    let label = format!("{}", day.date.format("%a %d"));
    draw_text(
        &mut bmp,
        Rect::new(0, 0, label_w, rect.height),
        &label,
        Align::Left,
        MAX_LABEL_SCALE,
    );
    draw_icon(
        &mut bmp,
        Rect::new(label_w, 0, icon_w, rect.height),
        WeatherIcon::from_code(&day.icon),
    );

    let temps = format!(
        "{}/{}{}",
        whole_degrees(day.temp_high),
        whole_degrees(day.temp_low),
        units.suffix()
    );
    draw_text(
        &mut bmp,
        Rect::new(temps_x, 0, rect.width.saturating_sub(temps_x), rect.height),
        &temps,
        Align::Center,
        MAX_LABEL_SCALE,
    );
    bmp
}

fn render_user(rect: Rect, user: &UserContent) -> Bitmap {
    let mut bmp = Bitmap::new(rect.width, rect.height);
    match user {
        UserContent::Empty => {}
        UserContent::Text(text) => {
            draw_text(
                &mut bmp,
                Rect::panel(rect.width, rect.height),
                text,
                Align::Center,
                MAX_LABEL_SCALE,
            );
        }
        UserContent::Image(image) => {
            place(
                &mut bmp,
                image,
                Rect::panel(rect.width, rect.height),
                Align::Center,
            );
        }
    }
    bmp
}

fn temperature(value: f32, units: Units) -> String {
    let mut out = whole_degrees(value);
    out.push_str(units.suffix());
    out
}

/// Round to whole degrees, never showing "-0"
fn whole_degrees(value: f32) -> String {
    let out = format!("{value:.0}");
    if out == "-0" {
        String::from("0")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::domain::icon_code;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn current() -> CurrentWeather {
        CurrentWeather {
            temp: 21.4,
            condition: "scattered clouds".into(),
            icon: icon_code("03d"),
            timestamp: now(),
        }
    }

    fn forecast(days: usize) -> Vec<ForecastDay> {
        (0..days)
            .map(|i| ForecastDay {
                date: now().date() + Duration::days(i as i64),
                temp_high: 20.0 + i as f32,
                temp_low: 10.0 - i as f32,
                condition: "rain".into(),
                icon: icon_code("10d"),
            })
            .collect()
    }

    fn layout() -> Layout {
        Layout::compute(800, 600, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_renders_every_region_in_order() {
        let current = current();
        let forecast = forecast(5);
        let user = UserContent::Text("hello".into());
        let snapshot = DomainSnapshot {
            now: now(),
            current: Some(&current),
            forecast: &forecast,
            user: &user,
            units: Units::Metric,
        };
        let layout = layout();
        let out = render(&layout, &snapshot).unwrap();

        let names: Vec<RegionName> = out.iter().map(|c| c.region).collect();
        assert_eq!(names, RegionName::ALL.to_vec());
        for content in &out {
            assert_eq!(Some(content.rect), layout.get(content.region));
            assert_eq!(content.bitmap.width(), content.rect.width);
            assert_eq!(content.bitmap.height(), content.rect.height);
            assert_eq!(content.hash, content.bitmap.content_hash());
            assert!(content.bitmap.black_pixels() > 0, "{} blank", content.region);
        }
    }

    #[test]
    fn test_deterministic() {
        let current = current();
        let forecast = forecast(5);
        let user = UserContent::Empty;
        let snapshot = DomainSnapshot {
            now: now(),
            current: Some(&current),
            forecast: &forecast,
            user: &user,
            units: Units::Metric,
        };
        let layout = layout();
        assert_eq!(
            render(&layout, &snapshot).unwrap(),
            render(&layout, &snapshot).unwrap()
        );
    }

    #[test]
    fn test_minute_change_only_touches_clock() {
        let current = current();
        let forecast = forecast(5);
        let user = UserContent::Empty;
        let mut snapshot = DomainSnapshot {
            now: now(),
            current: Some(&current),
            forecast: &forecast,
            user: &user,
            units: Units::Metric,
        };
        let layout = layout();
        let before = render(&layout, &snapshot).unwrap();
        snapshot.now += Duration::minutes(1);
        let after = render(&layout, &snapshot).unwrap();

        for (a, b) in before.iter().zip(&after) {
            if a.region == RegionName::Clock {
                assert_ne!(a.hash, b.hash);
            } else {
                assert_eq!(a.hash, b.hash, "{} changed", a.region);
            }
        }
    }

    #[test]
    fn test_short_forecast_fails() {
        let current = current();
        let forecast = forecast(3);
        let user = UserContent::Empty;
        let snapshot = DomainSnapshot {
            now: now(),
            current: Some(&current),
            forecast: &forecast,
            user: &user,
            units: Units::Metric,
        };
        assert_eq!(
            render(&layout(), &snapshot),
            Err(RenderError::ForecastTooShort {
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn test_missing_current_fails() {
        let forecast = forecast(5);
        let user = UserContent::Empty;
        let snapshot = DomainSnapshot {
            now: now(),
            current: None,
            forecast: &forecast,
            user: &user,
            units: Units::Metric,
        };
        assert_eq!(
            render(&layout(), &snapshot),
            Err(RenderError::MissingCurrentWeather)
        );
    }

    #[test]
    fn test_user_image_is_centered() {
        let current = current();
        let forecast = forecast(5);
        let mut image = Bitmap::new(10, 10);
        image.fill(true);
        let user = UserContent::Image(image);
        let snapshot = DomainSnapshot {
            now: now(),
            current: Some(&current),
            forecast: &forecast,
            user: &user,
            units: Units::Metric,
        };
        let layout = layout();
        let out = render(&layout, &snapshot).unwrap();
        let block = out
            .iter()
            .find(|c| c.region == RegionName::UserBlock)
            .unwrap();
        assert_eq!(block.bitmap.black_pixels(), 100);
        let (x, y, _, _) = block.bitmap.ink_bounds().unwrap();
        assert_eq!(x, (block.rect.width - 10) / 2);
        assert_eq!(y, (block.rect.height - 10) / 2);
    }

    #[test]
    fn test_temperature_formatting() {
        assert_eq!(temperature(21.4, Units::Metric), "21\u{b0}C");
        assert_eq!(temperature(-0.3, Units::Imperial), "0\u{b0}F");
        assert_eq!(whole_degrees(-4.6), "-5");
    }
}
