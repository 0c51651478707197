//! Tone mapping and 8-bit encoding — explicitly out of the core's scope
//! (spec §1, "tone mapping and display... image file I/O"), so it lives here.

use image::{ImageBuffer, Rgb};
use wavefront_core::image::Image;
use wavefront_core::spectrum::Spectrum;

fn reinhard(c: f32) -> f32 {
    c / (1.0 + c)
}

fn to_srgb_byte(linear: f32) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let encoded = if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}

/// Reinhard-tonemaps and gamma-encodes `image` into an 8-bit RGB buffer
/// ready to write out as PNG.
pub fn to_png_buffer(image: &Image) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let (w, h) = (image.width(), image.height());
    let mut buffer = ImageBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let Spectrum { r, g, b } = image.get((x, y));
            let pixel = Rgb([
                to_srgb_byte(reinhard(r)),
                to_srgb_byte(reinhard(g)),
                to_srgb_byte(reinhard(b)),
            ]);
            buffer.put_pixel(x, y, pixel);
        }
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_pixel_encodes_to_zero() {
        let img = Image::new(1, 1);
        let buf = to_png_buffer(&img);
        assert_eq!(*buf.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn bright_pixel_compresses_below_saturation() {
        let img = Image::new(1, 1);
        img.set((0, 0), Spectrum::grey(1000.0));
        let buf = to_png_buffer(&img);
        let Rgb([r, g, b]) = *buf.get_pixel(0, 0);
        assert!(r < 255 || g < 255 || b < 255);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
