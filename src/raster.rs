//! Software rasterizer surface.
//!
//! Draws the engine's discs into an [`RgbaImage`] so a run can be exported as
//! PNG or GIF without a browser. Edges are antialiased over one pixel and the
//! glow halo follows a gaussian falloff roughly matching a canvas
//! `shadowBlur` of the same size.

use image::{Rgba, RgbaImage};

use crate::color::alpha_of;
use crate::surface::{Disc, DrawSurface, Viewport};

/// Raster surface backed by an RGBA image.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl ImageSurface {
    /// Create a surface of `width` x `height` pixels (at least 1x1), cleared to
    /// `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        let image = RgbaImage::from_pixel(width.max(1), height.max(1), background);
        Self { image, background }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Blend `color` at `alpha` over the pixel at `(x, y)`.
    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>, alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let dst = *self.image.get_pixel(x, y);
        self.image.put_pixel(x, y, alpha_blend(&color, &dst, alpha.min(1.0)));
    }

    /// Pixel bounds covering a circle of `reach` around `(cx, cy)`, or `None`
    /// if it lies completely off the image.
    fn bounds(&self, cx: f64, cy: f64, reach: f64) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        let x0 = (cx - reach).floor().max(0.0);
        let y0 = (cy - reach).floor().max(0.0);
        let x1 = (cx + reach).ceil().min(w - 1.0);
        let y1 = (cy + reach).ceil().min(h - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl DrawSurface for ImageSurface {
    fn clear(&mut self, _viewport: Viewport) {
        for pixel in self.image.pixels_mut() {
            *pixel = self.background;
        }
    }

    fn fill_disc(&mut self, disc: &Disc) {
        let base_alpha = alpha_of(disc.color) * disc.opacity;
        let reach = disc.radius + disc.glow.map_or(0.0, |g| g.blur) + 1.0;
        let Some((x0, y0, x1, y1)) = self.bounds(disc.x, disc.y, reach) else {
            return;
        };

        for py in y0..=y1 {
            for px in x0..=x1 {
                // Sample at the pixel center
                let dx = px as f64 + 0.5 - disc.x;
                let dy = py as f64 + 0.5 - disc.y;
                let dist = (dx * dx + dy * dy).sqrt();

                if let Some(glow) = disc.glow {
                    let halo = halo_alpha(dist, disc.radius, glow.blur);
                    self.blend_pixel(px, py, glow.tint, halo * alpha_of(glow.tint) * disc.opacity);
                }

                let coverage = (disc.radius + 0.5 - dist).clamp(0.0, 1.0);
                self.blend_pixel(px, py, disc.color, coverage * base_alpha);
            }
        }
    }
}

/// Halo intensity at `dist` from the center of a disc of `radius`.
///
/// Gaussian with sigma = blur / 2 measured from the disc edge, cut off at
/// `radius + blur`.
fn halo_alpha(dist: f64, radius: f64, blur: f64) -> f64 {
    if blur <= 0.0 || dist > radius + blur {
        return 0.0;
    }
    let outside = (dist - radius).max(0.0);
    let sigma = blur / 2.0;
    (-(outside * outside) / (2.0 * sigma * sigma)).exp()
}

/// Source-over compositing of `src` at `src_alpha` onto `dst`.
fn alpha_blend(src: &Rgba<u8>, dst: &Rgba<u8>, src_alpha: f64) -> Rgba<u8> {
    let sa = src_alpha;
    let da = dst[3] as f64 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let sf = s as f64 / 255.0;
        let df = d as f64 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Glow;

    const NIGHT: Rgba<u8> = Rgba([10, 20, 40, 255]);

    fn white_disc(x: f64, y: f64, radius: f64) -> Disc {
        Disc { x, y, radius, color: Rgba([255, 255, 255, 255]), opacity: 1.0, glow: None }
    }

    #[test]
    fn test_disc_center_is_filled() {
        let mut surface = ImageSurface::new(16, 16, NIGHT);
        surface.fill_disc(&white_disc(8.0, 8.0, 3.0));
        assert_eq!(*surface.image().get_pixel(8, 8), Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.image().get_pixel(0, 0), NIGHT);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut surface = ImageSurface::new(16, 16, Rgba([0, 0, 0, 0]));
        surface.fill_disc(&Disc { opacity: 0.5, ..white_disc(8.0, 8.0, 3.0) });
        let alpha = surface.image().get_pixel(8, 8)[3];
        assert!((126..=129).contains(&alpha), "alpha was {}", alpha);
    }

    #[test]
    fn test_glow_reaches_beyond_radius() {
        let mut plain = ImageSurface::new(32, 32, NIGHT);
        plain.fill_disc(&white_disc(16.0, 16.0, 2.0));

        let mut glowing = ImageSurface::new(32, 32, NIGHT);
        glowing.fill_disc(&Disc {
            glow: Some(Glow { blur: 10.0, tint: Rgba([255, 255, 255, 255]) }),
            ..white_disc(16.0, 16.0, 2.0)
        });

        // Five pixels out: untouched without glow, brightened with it
        assert_eq!(*plain.image().get_pixel(21, 16), NIGHT);
        assert!(glowing.image().get_pixel(21, 16)[0] > NIGHT[0]);
    }

    #[test]
    fn test_clear_restores_background() {
        let mut surface = ImageSurface::new(8, 8, NIGHT);
        surface.fill_disc(&white_disc(4.0, 4.0, 2.0));
        surface.clear(Viewport::new(8.0, 8.0));
        assert!(surface.image().pixels().all(|p| *p == NIGHT));
    }

    #[test]
    fn test_offscreen_disc_is_ignored() {
        let mut surface = ImageSurface::new(8, 8, NIGHT);
        surface.fill_disc(&white_disc(-40.0, 4.0, 2.0));
        surface.fill_disc(&white_disc(4.0, -40.0, 2.0));
        assert!(surface.image().pixels().all(|p| *p == NIGHT));
    }

    #[test]
    fn test_halo_falloff() {
        assert_eq!(halo_alpha(1.0, 2.0, 5.0), 1.0);
        assert!(halo_alpha(4.0, 2.0, 5.0) < 1.0);
        assert_eq!(halo_alpha(8.0, 2.0, 5.0), 0.0);
        assert_eq!(halo_alpha(1.0, 2.0, 0.0), 0.0);
    }

    #[test]
    fn test_alpha_blend() {
        let red = Rgba([255, 0, 0, 255]);
        assert_eq!(alpha_blend(&red, &Rgba([0, 0, 0, 0]), 1.0), red);

        let mixed = alpha_blend(&red, &Rgba([0, 0, 255, 255]), 0.5);
        assert!(mixed[0] > 100);
        assert!(mixed[2] > 100);
        assert_eq!(mixed[3], 255);
    }
}
