use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use scatterzoom_core::{Rgb, Viewport};
use uuid::Uuid;

use crate::display::{DisplayObject, DrawCommand, Graphics, Sprite};
use crate::error::PlotError;
use crate::framebuffer::Framebuffer;

/// Identifies a mounted surface.
pub type SurfaceId = Uuid;

/// A host-owned slot that at most one surface is mounted into at a time.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct Container {
    mounted: Rc<Cell<Option<SurfaceId>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// The surface currently mounted, if any.
    pub fn mounted(&self) -> Option<SurfaceId> {
        self.mounted.get()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.get().is_none()
    }

    /// Mount `id`, evicting whatever was there before.
    fn mount(&self, id: SurfaceId) {
        if let Some(previous) = self.mounted.replace(Some(id)) {
            debug!("container: replacing surface {previous} with {id}");
        }
    }

    /// Unmount `id` if it is still the mounted surface.
    fn unmount(&self, id: SurfaceId) {
        if self.mounted.get() == Some(id) {
            self.mounted.set(None);
        }
    }
}

/// Handle to a display object on a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Ordered list of display objects, drawn back to front.
#[derive(Debug, Default)]
pub struct Stage {
    children: Vec<DisplayObject>,
}

impl Stage {
    /// Append an object; later objects draw on top.
    pub fn add(&mut self, object: DisplayObject) -> NodeId {
        self.children.push(object);
        NodeId(self.children.len() - 1)
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> NodeId {
        self.add(DisplayObject::Sprite(sprite))
    }

    pub fn add_graphics(&mut self, graphics: Graphics) -> NodeId {
        self.add(DisplayObject::Graphics(graphics))
    }

    pub fn get(&self, id: NodeId) -> Option<&DisplayObject> {
        self.children.get(id.0)
    }

    /// Mutable access for repositioning or hiding a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DisplayObject> {
        self.children.get_mut(id.0)
    }

    /// The node as vector graphics, if it is one.
    pub fn graphics_mut(&mut self, id: NodeId) -> Option<&mut Graphics> {
        match self.children.get_mut(id.0) {
            Some(DisplayObject::Graphics(g)) => Some(g),
            _ => None,
        }
    }

    pub fn graphics(&self, id: NodeId) -> Option<&Graphics> {
        match self.children.get(id.0) {
            Some(DisplayObject::Graphics(g)) => Some(g),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayObject> {
        self.children.iter()
    }
}

/// A drawing surface: a stage rendered onto a white framebuffer, mounted in
/// a container for as long as it lives.
#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    viewport: Viewport,
    background: Rgb,
    framebuffer: Framebuffer,
    stage: Stage,
    container: Container,
}

impl Surface {
    /// Allocate the framebuffer and mount into `container`, evicting any
    /// surface already there.
    pub fn new(viewport: Viewport, container: &Container) -> Result<Self, PlotError> {
        let (width, height) = viewport.pixel_size();
        let framebuffer = Framebuffer::new(width, height).ok_or(PlotError::ViewportTooLarge {
            width: viewport.width,
            height: viewport.height,
        })?;
        let id = Uuid::new_v4();
        container.mount(id);
        debug!("surface {id}: mounted {width}x{height}");
        Ok(Self {
            id,
            viewport,
            background: Rgb::WHITE,
            framebuffer,
            stage: Stage::default(),
            container: container.clone(),
        })
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Size the surface was created with.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Rasterize every visible display object.
    pub fn render(&mut self) {
        let Surface {
            framebuffer,
            stage,
            background,
            ..
        } = self;
        framebuffer.clear(*background);
        for child in stage.iter().filter(|c| c.visible()) {
            match child {
                DisplayObject::Sprite(s) => {
                    framebuffer.draw_texture(&s.texture, s.x, s.y, s.scale, s.anchor, s.tint);
                }
                DisplayObject::Graphics(g) => {
                    for command in g.commands() {
                        draw_command(framebuffer, command, g.x, g.y);
                    }
                }
            }
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.container.unmount(self.id);
        debug!("surface {}: released", self.id);
    }
}

fn draw_command(fb: &mut Framebuffer, command: &DrawCommand, ox: f64, oy: f64) {
    match *command {
        DrawCommand::Circle {
            x,
            y,
            radius,
            fill,
            stroke,
        } => {
            fb.fill_circle(ox + x, oy + y, radius, fill);
            if let Some(s) = stroke {
                fb.stroke_circle(ox + x, oy + y, radius, s.width, s.color);
            }
        }
        DrawCommand::Line { from, to, stroke } => {
            fb.draw_line(
                ox + from.0,
                oy + from.1,
                ox + to.0,
                oy + to.1,
                stroke.width,
                stroke.color,
            );
        }
    }
}
