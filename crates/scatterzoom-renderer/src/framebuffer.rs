//! RGBA pixel target the stage is rasterized into every frame.

use scatterzoom_core::Rgb;

use crate::texture::Texture;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Largest surface the renderer will allocate, in pixels.
pub const MAX_PIXELS: usize = 1 << 26;

impl Framebuffer {
    /// Zeroed buffer, or `None` when `width * height` exceeds [`MAX_PIXELS`].
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let pixels = (width as usize).checked_mul(height as usize)?;
        if pixels > MAX_PIXELS {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: vec![0; pixels * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Colour at a pixel, ignoring alpha.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgb::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
        ))
    }

    pub fn clear(&mut self, color: Rgb) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    /// Fill a circle using one horizontal span per row.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        if !(radius > 0.0) {
            return;
        }
        let (top, bottom) = self.row_range(cy - radius, cy + radius);
        for py in top..bottom {
            let dy = py as f64 + 0.5 - cy;
            if dy.abs() > radius {
                continue;
            }
            let half = (radius * radius - dy * dy).sqrt();
            self.span(cx - half, cx + half, py, color);
        }
    }

    /// Stroke the outline of a circle with the given line width.
    pub fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, width: f64, color: Rgb) {
        if !(radius > 0.0) || !(width > 0.0) {
            return;
        }
        let outer = radius + width / 2.0;
        let inner = (radius - width / 2.0).max(0.0);
        let (top, bottom) = self.row_range(cy - outer, cy + outer);
        for py in top..bottom {
            let dy = py as f64 + 0.5 - cy;
            if dy.abs() > outer {
                continue;
            }
            let half_outer = (outer * outer - dy * dy).sqrt();
            if dy.abs() >= inner {
                self.span(cx - half_outer, cx + half_outer, py, color);
                continue;
            }
            let half_inner = (inner * inner - dy * dy).sqrt();
            self.span(cx - half_outer, cx - half_inner, py, color);
            self.span(cx + half_inner, cx + half_outer, py, color);
        }
    }

    /// Draw a straight line as a run of square dabs.
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Rgb) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as u32;
        let half = (width / 2.0).max(0.5);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            let (top, bottom) = self.row_range(y - half, y + half);
            for py in top..bottom {
                self.span(x - half, x + half, py, color);
            }
        }
    }

    /// Blit a texture scaled by `scale`, placed so that the point at
    /// `anchor` (0..1 of the texture size) lands on `(x, y)`. Transparent
    /// texels are skipped; opaque ones are multiplied by `tint`.
    pub fn draw_texture(
        &mut self,
        texture: &Texture,
        x: f64,
        y: f64,
        scale: f64,
        anchor: f64,
        tint: Rgb,
    ) {
        if !(scale > 0.0) {
            return;
        }
        let w = texture.width() as f64 * scale;
        let h = texture.height() as f64 * scale;
        let left = x - w * anchor;
        let top = y - h * anchor;

        let (row_start, row_end) = self.row_range(top, top + h);
        let (col_start, col_end) = self.col_range(left, left + w);
        for py in row_start..row_end {
            let v = ((py as f64 + 0.5 - top) / scale) as u32;
            for px in col_start..col_end {
                let u = ((px as f64 + 0.5 - left) / scale) as u32;
                match texture.texel(u, v) {
                    Some([r, g, b, a]) if a > 0 => {
                        let c = Rgb::new(r, g, b).multiply(tint);
                        self.put(px, py, c);
                    }
                    _ => {}
                }
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    fn put(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
    }

    /// Fill pixels whose centres lie in `[x0, x1]` on row `y`.
    fn span(&mut self, x0: f64, x1: f64, y: u32, color: Rgb) {
        let (start, end) = self.col_range(x0, x1);
        for x in start..end {
            self.put(x, y, color);
        }
    }

    fn row_range(&self, y0: f64, y1: f64) -> (u32, u32) {
        clip_range(y0, y1, self.height)
    }

    fn col_range(&self, x0: f64, x1: f64) -> (u32, u32) {
        clip_range(x0, x1, self.width)
    }
}

/// Half-open pixel index range whose centres fall in `[lo, hi]`, clipped to
/// `[0, limit)`.
fn clip_range(lo: f64, hi: f64, limit: u32) -> (u32, u32) {
    if !(lo <= hi) {
        return (0, 0);
    }
    let start = (lo - 0.5).ceil().max(0.0);
    let end = ((hi - 0.5).floor() + 1.0).min(limit as f64);
    if end <= start {
        return (0, 0);
    }
    (start as u32, end as u32)
}
