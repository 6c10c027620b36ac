use std::rc::Rc;

use scatterzoom_core::{Point, Rgb};

use super::{Primitives, RedrawContext, Strategy};
use crate::display::{Sprite, Stroke};
use crate::surface::Surface;
use crate::texture::Texture;

/// Every sprite rasterizes and owns its own texture, colour baked in.
#[derive(Debug, Default)]
pub(crate) struct UniqueTexture {
    sprites: Primitives,
    texture_bytes: usize,
}

impl Strategy for UniqueTexture {
    fn allocate(&mut self, surface: &mut Surface, point: &Point) {
        let texture = Texture::circle(point.size, point.color, Some(Stroke::hairline()));
        self.texture_bytes += texture.byte_len();
        let mut sprite = Sprite::new(Rc::new(texture));
        sprite.tint = Rgb::WHITE;
        sprite.x = point.x;
        sprite.y = point.y;
        self.sprites.push(surface.stage_mut().add_sprite(sprite));
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RedrawContext<'_>) {
        self.sprites.reposition(surface, ctx);
    }

    fn primitive_count(&self, _surface: &Surface) -> usize {
        self.sprites.len()
    }

    fn visible_indices(&self, surface: &Surface) -> Vec<usize> {
        self.sprites.visible_indices(surface)
    }

    fn texture_bytes(&self) -> usize {
        self.texture_bytes
    }
}
