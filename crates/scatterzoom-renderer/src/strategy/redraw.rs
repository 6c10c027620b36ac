use scatterzoom_core::Point;

use super::{RedrawContext, Strategy};
use crate::display::{Graphics, Stroke};
use crate::surface::{NodeId, Surface};

/// A single vector canvas, cleared and refilled with every visible circle on
/// each transform change.
#[derive(Debug, Default)]
pub(crate) struct RedrawGraphics {
    canvas: Option<NodeId>,
    drawn: Vec<usize>,
}

impl RedrawGraphics {
    fn canvas<'s>(&mut self, surface: &'s mut Surface) -> Option<&'s mut Graphics> {
        let stage = surface.stage_mut();
        let id = *self
            .canvas
            .get_or_insert_with(|| stage.add_graphics(Graphics::new()));
        stage.graphics_mut(id)
    }
}

impl Strategy for RedrawGraphics {
    fn prepare(&mut self, surface: &mut Surface) {
        self.canvas(surface);
    }

    // Nothing is kept per point; circles are issued at redraw time.
    fn allocate(&mut self, _surface: &mut Surface, _point: &Point) {}

    fn redraw(&mut self, surface: &mut Surface, ctx: &RedrawContext<'_>) {
        let mut drawn = std::mem::take(&mut self.drawn);
        drawn.clear();
        let Some(canvas) = self.canvas(surface) else {
            return;
        };
        canvas.clear();
        for (i, point) in ctx.dataset.iter().enumerate() {
            if let Some(at) = ctx.project(point) {
                canvas.draw_circle(at.x, at.y, point.size, point.color, Some(Stroke::hairline()));
                drawn.push(i);
            }
        }
        self.drawn = drawn;
    }

    fn primitive_count(&self, surface: &Surface) -> usize {
        self.canvas
            .and_then(|id| surface.stage().graphics(id))
            .map_or(0, |g| g.commands().len())
    }

    fn visible_indices(&self, _surface: &Surface) -> Vec<usize> {
        self.drawn.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Container;
    use scatterzoom_core::{Dataset, LinearScale, Rgb, Transform, Viewport, VisibilityFilter};

    #[test]
    fn test_canvas_is_cleared_between_redraws() {
        let container = Container::new();
        let viewport = Viewport::new(100.0, 100.0).unwrap();
        let mut surface = Surface::new(viewport, &container).unwrap();
        let mut strategy = RedrawGraphics::default();
        strategy.prepare(&mut surface);
        assert_eq!(strategy.primitive_count(&surface), 0);

        let dataset: Dataset = vec![
            Point::new(10.0, 10.0, 3.0, Rgb::BLACK),
            Point::new(60.0, 60.0, 3.0, Rgb::BLACK),
        ]
        .into();
        let base = LinearScale::identity();
        let mut redraw_with = |t: Transform, surface: &mut Surface| {
            let x = base.rescale_x(&t).unwrap();
            let y = base.rescale_y(&t).unwrap();
            let ctx = RedrawContext {
                dataset: &dataset,
                x: &x,
                y: &y,
                filter: VisibilityFilter::default(),
                viewport,
            };
            strategy.redraw(surface, &ctx);
            strategy.primitive_count(surface)
        };
        assert_eq!(redraw_with(Transform::IDENTITY, &mut surface), 2);
        assert_eq!(redraw_with(Transform::IDENTITY, &mut surface), 2);
        assert_eq!(redraw_with(Transform::new(2.0, 0.0, 0.0), &mut surface), 1);
        assert_eq!(surface.stage().len(), 1);
    }
}
