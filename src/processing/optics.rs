use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

use crate::color::{luma, parse_hex_or_fallback};

/// Intensity at or below which an optical sub-effect is skipped entirely.
const SKIP_THRESHOLD: f32 = 0.05;

/// Fraction of the half-diagonal where the vignette falloff starts.
const VIGNETTE_START: f32 = 0.35;
/// Maximum edge darkening at full strength.
const VIGNETTE_DEPTH: f32 = 0.75;

/// Radial luminance falloff from center to edge.
pub fn vignette(mut img: RgbaImage, strength: f32) -> RgbaImage {
    let strength = strength.clamp(0.0, 1.0);
    if strength <= SKIP_THRESHOLD {
        return img;
    }

    let (w, h) = img.dimensions();
    let cx = (w.saturating_sub(1)) as f32 * 0.5;
    let cy = (h.saturating_sub(1)) as f32 * 0.5;
    let half_diag = (cx * cx + cy * cy).sqrt().max(1.0);

    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let d = (dx * dx + dy * dy).sqrt() / half_diag;
        let falloff = smoothstep(VIGNETTE_START, 1.0, d);
        if falloff <= 0.0 {
            continue;
        }
        let factor = 1.0 - strength * VIGNETTE_DEPTH * falloff;
        for c in 0..3 {
            px[c] = (px[c] as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }

    img
}

/// Colored radial glow anchored near the bottom-right corner, screen-blended
/// so it can only brighten. A malformed color string degrades to the fixed
/// fallback instead of failing.
pub fn light_leak(mut img: RgbaImage, intensity: f32, color: &str) -> RgbaImage {
    let intensity = intensity.clamp(0.0, 1.0);
    if intensity <= SKIP_THRESHOLD {
        return img;
    }

    let rgb = parse_hex_or_fallback(color);
    let leak = [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ];

    let (w, h) = img.dimensions();
    let cx = w as f32 * 0.75;
    let cy = h as f32 * 0.75;
    let r0 = w as f32 * 0.5;
    let r1 = w as f32 * 1.2;

    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let d = (dx * dx + dy * dy).sqrt();
        // Full alpha inside r0, fading to nothing at r1.
        let t = 1.0 - ((d - r0) / (r1 - r0)).clamp(0.0, 1.0);
        let alpha = intensity * t;
        if alpha <= 0.0 {
            continue;
        }
        for c in 0..3 {
            let s = px[c] as f32 / 255.0;
            let screened = 1.0 - (1.0 - s) * (1.0 - leak[c] * alpha);
            px[c] = (screened * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }

    img
}

/// Faded-film look: lifts the black point and mildly desaturates and
/// flattens. Bounds are chosen so blacks never rise past ~0.23 and the
/// image never inverts, even at full amount.
pub fn fade(mut img: RgbaImage, amount: f32) -> RgbaImage {
    let amount = amount.clamp(0.0, 1.0);
    if amount <= SKIP_THRESHOLD {
        return img;
    }

    let lift = amount * 0.18;
    let sat = 1.0 - amount * 0.2;
    let contrast = 1.0 - amount * 0.15;

    for px in img.pixels_mut() {
        let mut r = px[0] as f32 / 255.0;
        let mut g = px[1] as f32 / 255.0;
        let mut b = px[2] as f32 / 255.0;

        r = r * (1.0 - lift) + lift;
        g = g * (1.0 - lift) + lift;
        b = b * (1.0 - lift) + lift;

        let l = luma(r, g, b);
        r = l + (r - l) * sat;
        g = l + (g - l) * sat;
        b = l + (b - l) * sat;

        r = ((r - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
        g = ((g - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
        b = ((b - 0.5) * contrast + 0.5).clamp(0.0, 1.0);

        px[0] = (r * 255.0).round() as u8;
        px[1] = (g * 255.0).round() as u8;
        px[2] = (b * 255.0).round() as u8;
    }

    img
}

/// Glow around bright highlights: bright-pass, blur proportional to the
/// intensity, then add back with a bounded weight.
pub fn halation(img: RgbaImage, intensity: f32) -> RgbaImage {
    let intensity = intensity.clamp(0.0, 1.0);
    if intensity <= SKIP_THRESHOLD {
        return img;
    }

    let (w, h) = img.dimensions();
    let mut bright = RgbaImage::new(w, h);
    for (src, dst) in img.pixels().zip(bright.pixels_mut()) {
        let r = src[0] as f32 / 255.0;
        let g = src[1] as f32 / 255.0;
        let b = src[2] as f32 / 255.0;
        let mask = smoothstep(0.6, 0.95, luma(r, g, b));
        dst[0] = (r * mask * 255.0).round() as u8;
        dst[1] = (g * mask * 255.0).round() as u8;
        dst[2] = (b * mask * 255.0).round() as u8;
        dst[3] = 255;
    }

    let sigma = 1.0 + intensity * 9.0;
    let blurred = gaussian_blur_f32(&bright, sigma);

    let mut out = img;
    let weight = intensity * 0.4;
    for (o, glow) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let v = o[c] as f32 + glow[c] as f32 * weight;
            o[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
