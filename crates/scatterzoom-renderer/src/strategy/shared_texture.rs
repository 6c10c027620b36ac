use std::rc::Rc;

use scatterzoom_core::{Point, Rgb};

use super::{Primitives, RedrawContext, Strategy};
use crate::display::{Sprite, Stroke};
use crate::surface::Surface;
use crate::texture::Texture;

/// Largest point radius the shared texture is sized for.
const BASE_RADIUS: f64 = 5.0;
/// Oversampling factor so scaled-down sprites stay sharp.
const OVERSAMPLE: f64 = 2.0;

/// One white circle texture for every point, tinted and scaled per sprite.
#[derive(Debug, Default)]
pub(crate) struct SharedTexture {
    texture: Option<Rc<Texture>>,
    sprites: Primitives,
}

impl SharedTexture {
    fn texture(&mut self) -> Rc<Texture> {
        let texture = self.texture.get_or_insert_with(|| {
            Rc::new(Texture::circle(
                BASE_RADIUS * OVERSAMPLE,
                Rgb::WHITE,
                Some(Stroke::hairline()),
            ))
        });
        Rc::clone(texture)
    }
}

impl Strategy for SharedTexture {
    fn prepare(&mut self, _surface: &mut Surface) {
        self.texture();
    }

    fn allocate(&mut self, surface: &mut Surface, point: &Point) {
        let mut sprite = Sprite::new(self.texture());
        sprite.tint = point.color;
        sprite.scale = point.size / BASE_RADIUS / OVERSAMPLE;
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
        self.texture.as_ref().map_or(0, |t| t.byte_len())
    }
}
