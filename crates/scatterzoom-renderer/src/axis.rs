use scatterzoom_core::{LinearScale, Rgb, Transform, Viewport};

use crate::display::{Graphics, Stroke};
use crate::error::PlotError;
use crate::framebuffer::Framebuffer;
use crate::surface::{Container, NodeId, Surface};
use crate::zoom::{PointerEvent, WheelEvent, ZoomBehavior, ZoomConfig};

const TICK_COUNT: usize = 10;
const TICK_RADIUS: f64 = 5.0;
const TICK_COLOR: Rgb = Rgb::new(0, 0, 255);

/// A horizontal axis whose tick marks follow the zoom.
///
/// The axis line is drawn once; ticks are recomputed from the rescaled x
/// scale on every transform change.
#[derive(Debug)]
pub struct ZoomableAxis {
    surface: Surface,
    zoom: ZoomBehavior,
    base: LinearScale,
    scale: LinearScale,
    ticks: NodeId,
}

impl ZoomableAxis {
    /// Map `domain` onto the full surface width.
    pub fn new(
        domain: [f64; 2],
        width: f64,
        height: f64,
        container: &Container,
    ) -> Result<Self, PlotError> {
        let viewport = Viewport::new(width, height)?;
        let base = LinearScale::new(domain, [0.0, width])?;
        let mut surface = Surface::new(viewport, container)?;

        let mid = height / 2.0;
        let mut line = Graphics::new();
        line.draw_line((0.0, mid), (width, mid), Stroke::new(2.0, Rgb::BLACK));
        surface.stage_mut().add_graphics(line);
        let ticks = surface.stage_mut().add_graphics(Graphics::new());

        let mut axis = Self {
            surface,
            zoom: ZoomBehavior::new(viewport, ZoomConfig::default()),
            base,
            scale: base,
            ticks,
        };
        axis.draw_ticks();
        Ok(axis)
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn transform(&self) -> Transform {
        self.zoom.transform()
    }

    pub fn wheel(&mut self, event: &WheelEvent) {
        let t = self.zoom.wheel(event);
        self.zoomed(t);
    }

    pub fn pointer(&mut self, event: &PointerEvent) {
        if let Some(t) = self.zoom.pointer(event) {
            self.zoomed(t);
        }
    }

    pub fn set_transform(&mut self, transform: Transform) {
        let t = self.zoom.set_transform(transform);
        self.zoomed(t);
    }

    pub fn tick_values(&self) -> Vec<f64> {
        self.scale.ticks(TICK_COUNT)
    }

    /// Pixel x of every tick mark currently drawn.
    pub fn tick_positions(&self) -> Vec<f64> {
        self.tick_values()
            .into_iter()
            .map(|v| self.scale.apply(v))
            .collect()
    }

    pub fn render(&mut self) -> &Framebuffer {
        self.surface.render();
        self.surface.framebuffer()
    }

    fn zoomed(&mut self, transform: Transform) {
        // Invalid transforms are clamped away by the zoom behavior.
        if let Ok(scale) = self.base.rescale_x(&transform) {
            self.scale = scale;
            self.draw_ticks();
        }
    }

    fn draw_ticks(&mut self) {
        let positions = self.tick_positions();
        let mid = self.surface.viewport().height / 2.0;
        if let Some(g) = self.surface.stage_mut().graphics_mut(self.ticks) {
            g.clear();
            for x in positions {
                g.draw_circle(x, mid, TICK_RADIUS, TICK_COLOR, None);
            }
        }
    }
}
