use scatterzoom_core::Point;

use super::{Primitives, RedrawContext, Strategy};
use crate::display::{Graphics, Stroke};
use crate::surface::Surface;

/// A vector circle per point, drawn once at its local origin and only
/// moved afterwards.
#[derive(Debug, Default)]
pub(crate) struct TranslateGraphics {
    circles: Primitives,
}

impl Strategy for TranslateGraphics {
    fn allocate(&mut self, surface: &mut Surface, point: &Point) {
        let mut circle = Graphics::new();
        circle.draw_circle(0.0, 0.0, point.size, point.color, Some(Stroke::hairline()));
        circle.x = point.x;
        circle.y = point.y;
        self.circles.push(surface.stage_mut().add_graphics(circle));
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RedrawContext<'_>) {
        self.circles.reposition(surface, ctx);
    }

    fn primitive_count(&self, _surface: &Surface) -> usize {
        self.circles.len()
    }

    fn visible_indices(&self, surface: &Surface) -> Vec<usize> {
        self.circles.visible_indices(surface)
    }
}
