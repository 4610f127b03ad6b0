use image::RgbaImage;

use crate::color::luma;
use crate::params::ColorCurve;

/// Per-channel linear grade: `out = in * scale + bias`.
struct ChannelGrade {
    scale: [f32; 3],
    bias: [f32; 3],
}

/// Calibrated grades for the named looks. `Neutral`, `BlackAndWhite`, and
/// `Sepia` are handled separately.
fn grade_for(curve: ColorCurve) -> Option<ChannelGrade> {
    let (scale, bias) = match curve {
        ColorCurve::WarmVintage => ([1.08, 1.01, 0.90], [0.012, 0.0, 0.024]),
        ColorCurve::CoolBlue => ([0.92, 0.99, 1.10], [0.0, 0.008, 0.02]),
        ColorCurve::FadedPink => ([1.05, 0.97, 1.00], [0.03, 0.02, 0.03]),
        ColorCurve::GreenTint => ([0.96, 1.07, 0.96], [0.0, 0.012, 0.0]),
        ColorCurve::ViralOrange => ([1.12, 1.02, 0.86], [0.016, 0.0, 0.0]),
        ColorCurve::SoftPeach => ([1.06, 1.00, 0.94], [0.02, 0.012, 0.01]),
        ColorCurve::Neutral | ColorCurve::BlackAndWhite | ColorCurve::Sepia => return None,
    };
    Some(ChannelGrade { scale, bias })
}

/// Applies the named grading preset. `Neutral` passes the image through
/// unchanged.
pub fn apply(mut img: RgbaImage, curve: ColorCurve) -> RgbaImage {
    match curve {
        ColorCurve::Neutral => img,
        ColorCurve::BlackAndWhite => {
            for px in img.pixels_mut() {
                let l = luma(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                );
                let v = (l * 255.0).round().clamp(0.0, 255.0) as u8;
                px[0] = v;
                px[1] = v;
                px[2] = v;
            }
            img
        }
        ColorCurve::Sepia => {
            for px in img.pixels_mut() {
                let r = px[0] as f32 / 255.0;
                let g = px[1] as f32 / 255.0;
                let b = px[2] as f32 / 255.0;
                let sr = (0.393 * r + 0.769 * g + 0.189 * b).clamp(0.0, 1.0);
                let sg = (0.349 * r + 0.686 * g + 0.168 * b).clamp(0.0, 1.0);
                let sb = (0.272 * r + 0.534 * g + 0.131 * b).clamp(0.0, 1.0);
                px[0] = (sr * 255.0).round() as u8;
                px[1] = (sg * 255.0).round() as u8;
                px[2] = (sb * 255.0).round() as u8;
            }
            img
        }
        _ => {
            let Some(grade) = grade_for(curve) else {
                return img;
            };
            for px in img.pixels_mut() {
                for c in 0..3 {
                    let v = px[c] as f32 / 255.0;
                    let graded = (v * grade.scale[c] + grade.bias[c]).clamp(0.0, 1.0);
                    px[c] = (graded * 255.0).round() as u8;
                }
            }
            img
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use crate::params::ColorCurve;

    use super::apply;

    fn solid(rgb: [u8; 3]) -> RgbaImage {
        ImageBuffer::from_pixel(4, 4, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn neutral_is_identity() {
        let img = solid([13, 200, 77]);
        assert_eq!(apply(img.clone(), ColorCurve::Neutral), img);
    }

    #[test]
    fn black_and_white_removes_chroma_and_keeps_gray_luminance() {
        let out = apply(solid([128, 128, 128]), ColorCurve::BlackAndWhite);
        let px = out.get_pixel(0, 0);
        assert_eq!([px[0], px[1], px[2]], [128, 128, 128]);

        let out = apply(solid([220, 40, 90]), ColorCurve::BlackAndWhite);
        let px = out.get_pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn sepia_orders_channels_warm_to_cool() {
        let out = apply(solid([128, 128, 128]), ColorCurve::Sepia);
        let px = out.get_pixel(0, 0);
        assert!(px[0] > px[1]);
        assert!(px[1] > px[2]);
    }

    #[test]
    fn warm_vintage_shifts_gray_toward_red() {
        let out = apply(solid([128, 128, 128]), ColorCurve::WarmVintage);
        let px = out.get_pixel(0, 0);
        assert!(px[0] > px[2]);
    }

    #[test]
    fn cool_blue_shifts_gray_toward_blue() {
        let out = apply(solid([128, 128, 128]), ColorCurve::CoolBlue);
        let px = out.get_pixel(0, 0);
        assert!(px[2] > px[0]);
    }

    #[test]
    fn grades_clamp_instead_of_wrapping() {
        let out = apply(solid([255, 255, 255]), ColorCurve::ViralOrange);
        let px = out.get_pixel(0, 0);
        assert_eq!(px[0], 255);
    }
}
