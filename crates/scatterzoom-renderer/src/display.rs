//! Display objects held by a stage: textured sprites and vector graphics.

use std::rc::Rc;

use scatterzoom_core::Rgb;
use serde::{Deserialize, Serialize};

use crate::texture::Texture;

/// Outline style for vector circles and rasterized textures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Rgb,
}

impl Stroke {
    pub fn new(width: f64, color: Rgb) -> Self {
        Self { width, color }
    }

    /// The 1px black outline every circle in this crate is drawn with.
    pub fn hairline() -> Self {
        Self::new(1.0, Rgb::BLACK)
    }
}

/// A textured quad positioned by its anchor point.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture: Rc<Texture>,
    pub x: f64,
    pub y: f64,
    /// Fraction of the texture size that sits on `(x, y)`; 0.5 centres it.
    pub anchor: f64,
    pub scale: f64,
    pub tint: Rgb,
    pub visible: bool,
}

impl Sprite {
    pub fn new(texture: Rc<Texture>) -> Self {
        Self {
            texture,
            x: 0.0,
            y: 0.0,
            anchor: 0.5,
            scale: 1.0,
            tint: Rgb::WHITE,
            visible: true,
        }
    }
}

/// A single vector drawing instruction, in the owning graphics' local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        fill: Rgb,
        stroke: Option<Stroke>,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
}

/// A list of vector commands re-rasterized every frame.
#[derive(Debug, Clone)]
pub struct Graphics {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
    commands: Vec<DrawCommand>,
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}

impl Graphics {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            visible: true,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn draw_circle(&mut self, x: f64, y: f64, radius: f64, fill: Rgb, stroke: Option<Stroke>) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            fill,
            stroke,
        });
    }

    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

/// Anything that can be placed on a stage.
#[derive(Debug, Clone)]
pub enum DisplayObject {
    Sprite(Sprite),
    Graphics(Graphics),
}

impl DisplayObject {
    pub fn visible(&self) -> bool {
        match self {
            DisplayObject::Sprite(s) => s.visible,
            DisplayObject::Graphics(g) => g.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            DisplayObject::Sprite(s) => s.visible = visible,
            DisplayObject::Graphics(g) => g.visible = visible,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match self {
            DisplayObject::Sprite(s) => (s.x, s.y),
            DisplayObject::Graphics(g) => (g.x, g.y),
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        match self {
            DisplayObject::Sprite(s) => {
                s.x = x;
                s.y = y;
            }
            DisplayObject::Graphics(g) => {
                g.x = x;
                g.y = y;
            }
        }
    }
}
