use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

/// Unsharp-mask style sharpening with a neutral point at 1.0.
///
/// Amounts above 1 add back the high-pass difference; amounts below 1 blend
/// toward the blurred image, softening instead.
pub fn apply(img: RgbaImage, sharpness: f32) -> RgbaImage {
    let amount = sharpness.clamp(0.0, 2.0) - 1.0;
    if amount.abs() < 0.01 {
        return img;
    }

    let sigma = 1.5_f32;
    let blurred = gaussian_blur_f32(&img, sigma);

    let mut out = img.clone();
    for (o, (s, b)) in out.pixels_mut().zip(img.pixels().zip(blurred.pixels())) {
        for c in 0..3 {
            // amount < 0 moves toward the blur, amount > 0 away from it.
            let v = s[c] as f32 + amount * (s[c] as f32 - b[c] as f32);
            o[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        // preserve alpha
    }

    out
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use super::apply;

    fn edge_image() -> RgbaImage {
        let mut buf = ImageBuffer::from_pixel(8, 1, Rgba([200u8, 200, 200, 255]));
        for x in 0..4 {
            buf.put_pixel(x, 0, Rgba([50, 50, 50, 255]));
        }
        buf
    }

    #[test]
    fn neutral_sharpness_is_identity() {
        let img = edge_image();
        assert_eq!(apply(img.clone(), 1.0), img);
    }

    #[test]
    fn sharpening_widens_the_edge_contrast() {
        let img = edge_image();
        let out = apply(img.clone(), 2.0);
        // The dark side of the edge gets darker, the bright side brighter.
        assert!(out.get_pixel(3, 0)[0] <= img.get_pixel(3, 0)[0]);
        assert!(out.get_pixel(4, 0)[0] >= img.get_pixel(4, 0)[0]);
        assert_ne!(out, img);
    }

    #[test]
    fn softening_narrows_the_edge_contrast() {
        let img = edge_image();
        let out = apply(img.clone(), 0.0);
        assert!(out.get_pixel(3, 0)[0] > img.get_pixel(3, 0)[0]);
        assert!(out.get_pixel(4, 0)[0] < img.get_pixel(4, 0)[0]);
    }

    #[test]
    fn flat_images_are_unchanged_by_sharpening() {
        let img: RgbaImage = ImageBuffer::from_pixel(6, 6, Rgba([128, 128, 128, 255]));
        assert_eq!(apply(img.clone(), 2.0), img);
    }
}
