use scatterzoom_core::Rgb;

use crate::display::Stroke;

/// A rasterized RGBA image that sprites sample from.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<[u8; 4]>,
}

impl Texture {
    /// Rasterize a circle centred in a square tile three radii wide.
    ///
    /// Texels outside the circle (and its stroke) are fully transparent.
    pub fn circle(radius: f64, fill: Rgb, stroke: Option<Stroke>) -> Self {
        let radius = radius.max(0.5);
        let tile = (radius * 3.0).ceil().max(1.0) as u32;
        let center = tile as f64 / 2.0;

        let mut texels = Vec::with_capacity((tile * tile) as usize);
        for v in 0..tile {
            for u in 0..tile {
                let dx = u as f64 + 0.5 - center;
                let dy = v as f64 + 0.5 - center;
                let dist = (dx * dx + dy * dy).sqrt();
                let texel = match stroke {
                    Some(s) if (dist - radius).abs() <= s.width / 2.0 => opaque(s.color),
                    _ if dist <= radius => opaque(fill),
                    _ => [0, 0, 0, 0],
                };
                texels.push(texel);
            }
        }

        Self {
            width: tile,
            height: tile,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texel(&self, u: u32, v: u32) -> Option<[u8; 4]> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.texels.get((v * self.width + u) as usize).copied()
    }

    /// Memory held by the texel buffer.
    pub fn byte_len(&self) -> usize {
        self.texels.len() * 4
    }
}

fn opaque(c: Rgb) -> [u8; 4] {
    [c.r, c.g, c.b, 255]
}
