use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::luma;

/// Intensity at or below which the texture stages are skipped entirely.
const SKIP_THRESHOLD: f32 = 0.05;

/// Base additive strength at full intensity, before the mid-tone mask.
const BLEND_STRENGTH: f32 = 0.25;

/// Fixed cell size for digital sensor noise (finer than film grain).
const NOISE_CELL: f32 = 1.6;

/// A pseudo-random field generated at reduced resolution and bilinearly
/// upsampled, so larger cell sizes produce coarser, smoother clumps.
struct NoiseTile {
    values: Vec<f32>,
    w: usize,
    h: usize,
    channels: usize,
    cell: f32,
}

impl NoiseTile {
    fn generate(img_w: u32, img_h: u32, cell: f32, channels: usize, seed: u64) -> Self {
        let w = ((img_w as f32 / cell).ceil() as usize).max(1);
        let h = ((img_h as f32 / cell).ceil() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..w * h * channels)
            .map(|_| rng.r#gen::<f32>() * 2.0 - 1.0)
            .collect();
        Self {
            values,
            w,
            h,
            channels,
            cell,
        }
    }

    /// Bilinear sample of one channel at an image coordinate, in [-1, 1].
    fn sample(&self, x: u32, y: u32, ch: usize) -> f32 {
        let gx = (x as f32 / self.cell).min((self.w - 1) as f32);
        let gy = (y as f32 / self.cell).min((self.h - 1) as f32);

        let gx0 = gx.floor() as usize;
        let gy0 = gy.floor() as usize;
        let gx1 = (gx0 + 1).min(self.w - 1);
        let gy1 = (gy0 + 1).min(self.h - 1);

        let fx = gx - gx0 as f32;
        let fy = gy - gy0 as f32;

        let at = |xx: usize, yy: usize| self.values[(yy * self.w + xx) * self.channels + ch];

        let g00 = at(gx0, gy0);
        let g10 = at(gx1, gy0);
        let g01 = at(gx0, gy1);
        let g11 = at(gx1, gy1);

        g00 * (1.0 - fx) * (1.0 - fy)
            + g10 * fx * (1.0 - fy)
            + g01 * (1.0 - fx) * fy
            + g11 * fx * fy
    }
}

/// Monochrome film grain. `size` controls cell coarseness; the field is
/// weighted toward mid-tones so pure blacks and whites stay clean. The same
/// seed always produces the same field.
pub fn grain(mut img: RgbaImage, intensity: f32, size: f32, seed: u64) -> RgbaImage {
    let intensity = intensity.clamp(0.0, 1.0);
    if intensity <= SKIP_THRESHOLD {
        return img;
    }

    let size = size.clamp(0.0, 1.0);
    let cell = 1.0 + size * 5.0;
    let (w, h) = img.dimensions();
    let tile = NoiseTile::generate(w, h, cell, 1, seed);

    for (x, y, px) in img.enumerate_pixels_mut() {
        let g = tile.sample(x, y, 0);
        let l = luma(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        );
        let mask = 4.0 * l * (1.0 - l);
        let delta = g * intensity * BLEND_STRENGTH * mask * 255.0;
        for c in 0..3 {
            px[c] = (px[c] as f32 + delta).round().clamp(0.0, 255.0) as u8;
        }
    }

    img
}

/// Chromatic sensor noise for the compact-digital look. Uses an independent
/// per-channel field with a fixed fine cell, and contributes at half the
/// strength of film grain at the same intensity.
pub fn digital_noise(mut img: RgbaImage, intensity: f32, seed: u64) -> RgbaImage {
    let intensity = intensity.clamp(0.0, 1.0);
    if intensity <= SKIP_THRESHOLD {
        return img;
    }

    let (w, h) = img.dimensions();
    let tile = NoiseTile::generate(w, h, NOISE_CELL, 3, seed);
    let strength = intensity * 0.5 * BLEND_STRENGTH;

    for (x, y, px) in img.enumerate_pixels_mut() {
        let l = luma(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        );
        let mask = 4.0 * l * (1.0 - l);
        for c in 0..3 {
            let n = tile.sample(x, y, c);
            let v = px[c] as f32 + n * strength * mask * 255.0;
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use super::{digital_noise, grain};

    fn solid(rgb: [u8; 3]) -> RgbaImage {
        ImageBuffer::from_pixel(40, 40, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn same_seed_is_byte_identical() {
        let a = grain(solid([128, 128, 128]), 0.6, 0.5, 42);
        let b = grain(solid([128, 128, 128]), 0.6, 0.5, 42);
        assert_eq!(a, b);

        let a = digital_noise(solid([128, 128, 128]), 0.6, 7);
        let b = digital_noise(solid([128, 128, 128]), 0.6, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_produce_different_fields() {
        let a = grain(solid([128, 128, 128]), 0.6, 0.5, 1);
        let b = grain(solid([128, 128, 128]), 0.6, 0.5, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn below_threshold_is_identity() {
        let img = solid([128, 128, 128]);
        assert_eq!(grain(img.clone(), 0.05, 0.5, 42), img);
        assert_eq!(digital_noise(img.clone(), 0.0, 42), img);
    }

    #[test]
    fn grain_leaves_pure_black_and_white_untouched() {
        let black = solid([0, 0, 0]);
        assert_eq!(grain(black.clone(), 1.0, 0.5, 42), black);
        let white = solid([255, 255, 255]);
        assert_eq!(grain(white.clone(), 1.0, 0.5, 42), white);
    }

    #[test]
    fn grain_is_monochrome_per_pixel() {
        let out = grain(solid([128, 128, 128]), 0.8, 0.5, 42);
        for px in out.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn digital_noise_is_chromatic() {
        let out = digital_noise(solid([128, 128, 128]), 1.0, 42);
        let chromatic = out
            .pixels()
            .any(|px| px[0] != px[1] || px[1] != px[2]);
        assert!(chromatic);
    }

    #[test]
    fn coarse_grain_forms_larger_clumps_than_fine_grain() {
        // With a coarser cell, horizontally adjacent pixels agree more often.
        let fine = grain(solid([128, 128, 128]), 1.0, 0.0, 9);
        let coarse = grain(solid([128, 128, 128]), 1.0, 1.0, 9);

        let agreement = |img: &RgbaImage| {
            let mut same = 0usize;
            let mut total = 0usize;
            for y in 0..img.height() {
                for x in 1..img.width() {
                    let a = img.get_pixel(x - 1, y)[0] as i32;
                    let b = img.get_pixel(x, y)[0] as i32;
                    if (a - b).abs() <= 8 {
                        same += 1;
                    }
                    total += 1;
                }
            }
            same as f64 / total as f64
        };

        assert!(agreement(&coarse) > agreement(&fine));
    }
}
