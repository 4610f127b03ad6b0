use image::RgbaImage;

use crate::color::luma;
use crate::params::FilterParameters;

/// Neutral tolerance for the tonal sub-steps. A sub-step at its neutral
/// value is an identity, so skipping it is always safe.
const EPS: f32 = 0.01;

/// Applies exposure, contrast/saturation, highlight/shadow remapping, and
/// white balance, in that fixed order.
pub fn apply(mut img: RgbaImage, params: &FilterParameters) -> RgbaImage {
    let exposure = params.exposure.clamp(-2.0, 2.0);
    let contrast = params.contrast.clamp(0.0, 2.0);
    let saturation = params.saturation.clamp(0.0, 2.0);
    let highlights = params.highlights.clamp(-1.0, 1.0);
    let shadows = params.shadows.clamp(-1.0, 1.0);
    // temperature spans a virtual ±2000K around a 6500K neutral; the
    // normalized value maps directly onto warm/cool channel gains.
    let temperature = params.temperature.clamp(-1.0, 1.0);
    let tint = params.tint.clamp(-1.0, 1.0);

    let do_exposure = exposure.abs() > EPS;
    let do_tone = (contrast - 1.0).abs() > EPS || (saturation - 1.0).abs() > EPS;
    let do_levels = highlights.abs() > EPS || shadows.abs() > EPS;
    let do_wb = temperature.abs() > EPS || tint.abs() > EPS;
    if !do_exposure && !do_tone && !do_levels && !do_wb {
        return img;
    }

    let gain = 2.0_f32.powf(exposure);

    for px in img.pixels_mut() {
        let mut r = px[0] as f32 / 255.0;
        let mut g = px[1] as f32 / 255.0;
        let mut b = px[2] as f32 / 255.0;

        if do_exposure {
            r = (r * gain).clamp(0.0, 1.0);
            g = (g * gain).clamp(0.0, 1.0);
            b = (b * gain).clamp(0.0, 1.0);
        }

        if do_tone {
            // Saturation and contrast as one combined tone operation:
            // desaturate around luminance, then pivot contrast at mid-gray.
            let l = luma(r, g, b);
            r = (((l + (r - l) * saturation) - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
            g = (((l + (g - l) * saturation) - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
            b = (((l + (b - l) * saturation) - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
        }

        if do_levels {
            let l = luma(r, g, b);
            let mut target = l;

            if shadows.abs() > EPS {
                let w = 1.0 - smoothstep(0.0, 0.5, target);
                if shadows >= 0.0 {
                    target += (1.0 - target) * shadows * w;
                } else {
                    target *= 1.0 + shadows * w;
                }
            }

            if highlights.abs() > EPS {
                let w = smoothstep(0.5, 1.0, target);
                if highlights >= 0.0 {
                    target += (1.0 - target) * highlights * w;
                } else {
                    target *= 1.0 + highlights * w;
                }
            }

            let scale = if l > 1e-5 { target / l } else { 1.0 };
            r = (r * scale).clamp(0.0, 1.0);
            g = (g * scale).clamp(0.0, 1.0);
            b = (b * scale).clamp(0.0, 1.0);
        }

        if do_wb {
            // Positive temperature warms (more red, less blue); negative cools.
            if temperature > 0.0 {
                r += (1.0 - r) * temperature * 0.25;
                b *= 1.0 - temperature * 0.25;
            } else if temperature < 0.0 {
                let cool = -temperature;
                b += (1.0 - b) * cool * 0.25;
                r *= 1.0 - cool * 0.25;
            }
            // Positive tint pushes magenta (suppresses green); negative pushes green.
            if tint > 0.0 {
                g *= 1.0 - tint * 0.15;
            } else if tint < 0.0 {
                g += (1.0 - g) * (-tint) * 0.15;
            }
            r = r.clamp(0.0, 1.0);
            g = g.clamp(0.0, 1.0);
            b = b.clamp(0.0, 1.0);
        }

        px[0] = (r * 255.0).round() as u8;
        px[1] = (g * 255.0).round() as u8;
        px[2] = (b * 255.0).round() as u8;
    }

    img
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use crate::params::FilterParameters;

    use super::apply;

    fn solid(rgb: [u8; 3]) -> RgbaImage {
        ImageBuffer::from_pixel(4, 4, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn neutral_parameters_are_identity() {
        let img = solid([120, 90, 60]);
        let out = apply(img.clone(), &FilterParameters::default());
        assert_eq!(img, out);
    }

    #[test]
    fn positive_exposure_brightens() {
        let mut params = FilterParameters::default();
        params.exposure = 1.0;
        let out = apply(solid([60, 60, 60]), &params);
        assert_eq!(out.get_pixel(0, 0)[0], 120);
    }

    #[test]
    fn zero_saturation_produces_gray() {
        let mut params = FilterParameters::default();
        params.saturation = 0.0;
        let out = apply(solid([200, 40, 40]), &params);
        let px = out.get_pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn warm_temperature_raises_red_over_blue() {
        let mut params = FilterParameters::default();
        params.temperature = 0.8;
        let out = apply(solid([128, 128, 128]), &params);
        let px = out.get_pixel(0, 0);
        assert!(px[0] > 128);
        assert!(px[2] < 128);
    }

    #[test]
    fn positive_shadows_lift_dark_pixels_more_than_bright_ones() {
        let mut params = FilterParameters::default();
        params.shadows = 0.5;
        let dark = apply(solid([30, 30, 30]), &params);
        let bright = apply(solid([220, 220, 220]), &params);
        assert!(dark.get_pixel(0, 0)[0] > 30);
        let bright_lift = bright.get_pixel(0, 0)[0] as i32 - 220;
        let dark_lift = dark.get_pixel(0, 0)[0] as i32 - 30;
        assert!(dark_lift > bright_lift);
    }

    #[test]
    fn out_of_range_values_behave_as_their_boundary() {
        let mut over = FilterParameters::default();
        over.exposure = 10.0;
        let mut max = FilterParameters::default();
        max.exposure = 2.0;
        assert_eq!(apply(solid([40, 40, 40]), &over), apply(solid([40, 40, 40]), &max));
    }
}
