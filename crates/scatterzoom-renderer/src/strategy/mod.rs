//! The four interchangeable ways of keeping a dataset drawn under zoom.
//!
//! Every strategy allocates its primitives once, then on each transform
//! change positions (or re-issues) only the points that pass the visibility
//! filter. They differ only in what a primitive is.

mod redraw;
mod shared_texture;
mod translate;
mod unique_texture;

use scatterzoom_core::{Dataset, LinearScale, Point, ScreenPoint, Viewport, VisibilityFilter};

use crate::plot::PlotKind;
use crate::surface::{NodeId, Surface};

pub(crate) use redraw::RedrawGraphics;
pub(crate) use shared_texture::SharedTexture;
pub(crate) use translate::TranslateGraphics;
pub(crate) use unique_texture::UniqueTexture;

/// Everything a redraw needs, rebuilt for each transform.
pub(crate) struct RedrawContext<'a> {
    pub dataset: &'a Dataset,
    pub x: &'a LinearScale,
    pub y: &'a LinearScale,
    pub filter: VisibilityFilter,
    pub viewport: Viewport,
}

impl RedrawContext<'_> {
    /// Screen position of a point, or `None` when it is culled.
    pub fn project(&self, point: &Point) -> Option<ScreenPoint> {
        let screen = ScreenPoint::new(self.x.apply(point.x), self.y.apply(point.y));
        self.filter
            .contains(screen, &self.viewport)
            .then_some(screen)
    }
}

pub(crate) trait Strategy {
    /// One-off setup before any point is allocated.
    fn prepare(&mut self, _surface: &mut Surface) {}

    /// Allocate the primitive for the next point of the dataset.
    fn allocate(&mut self, surface: &mut Surface, point: &Point);

    /// Bring every primitive in line with the scales in `ctx`.
    fn redraw(&mut self, surface: &mut Surface, ctx: &RedrawContext<'_>);

    fn primitive_count(&self, surface: &Surface) -> usize;

    /// Indices of the points currently drawn, ascending.
    fn visible_indices(&self, surface: &Surface) -> Vec<usize>;

    /// Texel memory held by the strategy's textures.
    fn texture_bytes(&self) -> usize {
        0
    }
}

pub(crate) fn for_kind(kind: PlotKind) -> Box<dyn Strategy> {
    match kind {
        PlotKind::SharedTexture => Box::new(SharedTexture::default()),
        PlotKind::UniqueTexture => Box::new(UniqueTexture::default()),
        PlotKind::TranslateGraphics => Box::new(TranslateGraphics::default()),
        PlotKind::RedrawGraphics => Box::new(RedrawGraphics::default()),
    }
}

/// One stage node per point, shown and moved in place on every redraw.
#[derive(Debug, Default)]
pub(crate) struct Primitives {
    nodes: Vec<NodeId>,
}

impl Primitives {
    pub fn push(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn reposition(&self, surface: &mut Surface, ctx: &RedrawContext<'_>) {
        let stage = surface.stage_mut();
        for (node, point) in self.nodes.iter().zip(ctx.dataset.iter()) {
            let Some(object) = stage.get_mut(*node) else {
                continue;
            };
            match ctx.project(point) {
                Some(at) => {
                    object.set_visible(true);
                    object.set_position(at.x, at.y);
                }
                None => object.set_visible(false),
            }
        }
    }

    pub fn visible_indices(&self, surface: &Surface) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| surface.stage().get(**node).is_some_and(|o| o.visible()))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Container;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use scatterzoom_core::{generate_with_rng, DatasetBounds, Transform};

    fn run(kind: PlotKind, dataset: &Dataset, transforms: &[Transform]) -> Vec<Vec<usize>> {
        let viewport = Viewport::new(400.0, 300.0).unwrap();
        let container = Container::new();
        let mut surface = Surface::new(viewport, &container).unwrap();
        let mut strategy = for_kind(kind);
        strategy.prepare(&mut surface);
        for point in dataset.iter() {
            strategy.allocate(&mut surface, point);
        }
        let base = LinearScale::identity();
        transforms
            .iter()
            .map(|t| {
                let x = base.rescale_x(t).unwrap();
                let y = base.rescale_y(t).unwrap();
                let ctx = RedrawContext {
                    dataset,
                    x: &x,
                    y: &y,
                    filter: VisibilityFilter::default(),
                    viewport,
                };
                strategy.redraw(&mut surface, &ctx);
                surface.render();
                strategy.visible_indices(&surface)
            })
            .collect()
    }

    #[test]
    fn test_visible_sets_match_across_strategies() {
        let mut rng = StdRng::seed_from_u64(7);
        let dataset = generate_with_rng(&DatasetBounds::default().with_count(2000), &mut rng);
        let center = ScreenPoint::new(200.0, 150.0);
        let transforms = [
            Transform::IDENTITY,
            Transform::IDENTITY.zoom_about(0.5, center),
            Transform::IDENTITY.zoom_about(0.05, center),
            Transform::new(0.05, 300.0, -40.0),
            Transform::new(3.0, -150.0, 20.0),
        ];

        let expected = run(PlotKind::SharedTexture, &dataset, &transforms);
        assert!(expected[2].len() > expected[0].len());
        for kind in &PlotKind::ALL[1..] {
            assert_eq!(run(*kind, &dataset, &transforms), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_identity_culls_by_margin() {
        let dataset = Dataset::new(vec![
            Point::new(0.0, 0.0, 3.0, Default::default()),
            Point::new(409.0, 309.0, 3.0, Default::default()),
            Point::new(-11.0, 10.0, 3.0, Default::default()),
            Point::new(100.0, 311.0, 3.0, Default::default()),
        ]);
        for kind in PlotKind::ALL {
            assert_eq!(run(kind, &dataset, &[Transform::IDENTITY]), vec![vec![0, 1]]);
        }
    }

    #[test]
    fn test_primitive_counts() {
        let viewport = Viewport::new(50.0, 50.0).unwrap();
        let container = Container::new();
        let dataset = Dataset::new(vec![
            Point::new(10.0, 10.0, 2.0, Default::default()),
            Point::new(500.0, 10.0, 2.0, Default::default()),
        ]);
        let base = LinearScale::identity();
        for kind in PlotKind::ALL {
            let mut surface = Surface::new(viewport, &container).unwrap();
            let mut strategy = for_kind(kind);
            strategy.prepare(&mut surface);
            for point in dataset.iter() {
                strategy.allocate(&mut surface, point);
            }
            let ctx = RedrawContext {
                dataset: &dataset,
                x: &base,
                y: &base,
                filter: VisibilityFilter::default(),
                viewport,
            };
            strategy.redraw(&mut surface, &ctx);
            let expected = if kind == PlotKind::RedrawGraphics { 1 } else { 2 };
            assert_eq!(strategy.primitive_count(&surface), expected, "{kind:?}");
        }
    }
}
