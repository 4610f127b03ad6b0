use image::RgbaImage;

use crate::params::DateStampStyle;

/// Calendar date rendered by the stamp, always formatted `yyyy.MM.dd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl StampDate {
    /// Today's date in UTC.
    pub fn today() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::from_epoch_days(secs.div_euclid(86_400))
    }

    /// Gregorian date from days since 1970-01-01.
    pub fn from_epoch_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let year = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = if month <= 2 { year + 1 } else { year };
        Self {
            year: year as i32,
            month,
            day,
        }
    }

    pub fn format(&self) -> String {
        format!("{:04}.{:02}.{:02}", self.year, self.month, self.day)
    }
}

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
/// Blank columns between glyphs, in font pixels.
const TRACKING: u32 = 1;
/// Distance from the bottom-right corner, in image pixels.
const INSET: u32 = 20;

/// 5x7 monospaced bitmaps for the stamp's character set (digits and dot).
/// Each row is 5 bits, most significant bit leftmost.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        _ => return None,
    };
    Some(rows)
}

/// Pixel scale, text color, and opacity for each stamp style.
fn style_face(style: DateStampStyle) -> (u32, [u8; 3], u8) {
    match style {
        DateStampStyle::Vintage => (3, [255, 170, 60], 235),
        DateStampStyle::Compact => (2, [255, 255, 255], 220),
        DateStampStyle::Polaroid => (2, [250, 250, 245], 210),
        DateStampStyle::Modern | DateStampStyle::Custom => (2, [255, 255, 255], 200),
    }
}

/// Composites the date at a fixed inset from the bottom-right corner using
/// alpha-over blending. Glyph blocks falling outside the image are clipped.
pub fn apply(mut img: RgbaImage, style: DateStampStyle, date: &StampDate) -> RgbaImage {
    let text = date.format();
    let (scale, rgb, alpha) = style_face(style);

    let advance = (GLYPH_W + TRACKING) * scale;
    let text_w = advance * text.chars().count() as u32 - TRACKING * scale;
    let text_h = GLYPH_H * scale;

    let (w, h) = img.dimensions();
    let origin_x = w.saturating_sub(text_w + INSET);
    let origin_y = h.saturating_sub(text_h + INSET);

    let a = alpha as f32 / 255.0;
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let glyph_x = origin_x + i as u32 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let x = glyph_x + col * scale + sx;
                        let y = origin_y + row as u32 * scale + sy;
                        if x >= w || y >= h {
                            continue;
                        }
                        let px = img.get_pixel_mut(x, y);
                        for c in 0..3 {
                            let blended = px[c] as f32 * (1.0 - a) + rgb[c] as f32 * a;
                            px[c] = blended.round().clamp(0.0, 255.0) as u8;
                        }
                    }
                }
            }
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use crate::params::DateStampStyle;

    use super::{apply, StampDate};

    fn canvas(w: u32, h: u32) -> RgbaImage {
        ImageBuffer::from_pixel(w, h, Rgba([40, 40, 40, 255]))
    }

    #[test]
    fn formats_with_zero_padding() {
        let d = StampDate {
            year: 2026,
            month: 8,
            day: 3,
        };
        assert_eq!(d.format(), "2026.08.03");
    }

    #[test]
    fn epoch_day_zero_is_the_unix_epoch() {
        let d = StampDate::from_epoch_days(0);
        assert_eq!((d.year, d.month, d.day), (1970, 1, 1));
    }

    #[test]
    fn epoch_day_conversion_handles_leap_years() {
        // 2024-02-29 is 19782 days after the epoch.
        let d = StampDate::from_epoch_days(19_782);
        assert_eq!((d.year, d.month, d.day), (2024, 2, 29));
        let next = StampDate::from_epoch_days(19_783);
        assert_eq!((next.year, next.month, next.day), (2024, 3, 1));
    }

    #[test]
    fn stamp_is_confined_to_the_bottom_right_inset() {
        let date = StampDate {
            year: 2024,
            month: 6,
            day: 15,
        };
        let plain = canvas(400, 400);
        let stamped = apply(plain.clone(), DateStampStyle::Modern, &date);

        let mut changed = 0usize;
        for (x, y, px) in stamped.enumerate_pixels() {
            if *px != *plain.get_pixel(x, y) {
                changed += 1;
                assert!(x >= 200 && y >= 350, "unexpected change at ({x}, {y})");
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn vintage_stamp_is_amber_and_larger() {
        let date = StampDate {
            year: 2024,
            month: 6,
            day: 15,
        };
        let plain = canvas(400, 400);
        let vintage = apply(plain.clone(), DateStampStyle::Vintage, &date);

        let mut reds = 0usize;
        let mut vintage_changed = 0usize;
        for (x, y, px) in vintage.enumerate_pixels() {
            if *px != *plain.get_pixel(x, y) {
                vintage_changed += 1;
                if px[0] > px[2] {
                    reds += 1;
                }
            }
        }
        assert!(vintage_changed > 0);
        assert_eq!(reds, vintage_changed);

        let modern = apply(plain.clone(), DateStampStyle::Modern, &date);
        let modern_changed = modern
            .enumerate_pixels()
            .filter(|(x, y, px)| **px != *plain.get_pixel(*x, *y))
            .count();
        assert!(vintage_changed > modern_changed);
    }

    #[test]
    fn stamp_clips_on_images_too_small_to_fit() {
        let date = StampDate {
            year: 2024,
            month: 1,
            day: 1,
        };
        // Must not panic; drawing is clipped to the buffer.
        let out = apply(canvas(30, 30), DateStampStyle::Vintage, &date);
        assert_eq!(out.dimensions(), (30, 30));
    }
}
