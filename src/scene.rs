//! Immutable per-tick scene description.
//!
//! A [`Scene`] is the field's entire output for one tick: an ordered list of
//! draw commands the host commits to whatever surface it owns. The field
//! rebuilds it from scratch every tick; nothing is diffed or retained.
//!
//! Command order is part of the contract: connection lines come first, then
//! shapes in particle-index order. Hosts that paint in order get the right
//! layering for free.

use glam::{Vec2, Vec3};

/// Fill and stroke styling shared by all shape commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Shape color (RGB 0.0-1.0), used for both fill and stroke.
    pub color: Vec3,
    /// Fill opacity.
    pub fill_alpha: f32,
    /// Stroke opacity.
    pub stroke_alpha: f32,
    /// Stroke width in pixels.
    pub stroke_width: f32,
}

/// One drawing instruction, in band coordinates (pixels, y down).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Connection line with a two-stop gradient from `start_color` at
    /// `start` to `end_color` at `end`.
    Line {
        /// Index of the particle at `start`. Together with `end_index`
        /// this identifies the pair, for hosts that key per-connection
        /// resources (an SVG gradient, say) off it.
        start_index: u32,
        /// Index of the particle at `end`.
        end_index: u32,
        start: Vec2,
        end: Vec2,
        start_color: Vec3,
        end_color: Vec3,
        /// Stroke opacity, already distance-faded.
        opacity: f32,
        /// Stroke width in pixels.
        width: f32,
    },

    /// Circle centered at `center`.
    Circle {
        center: Vec2,
        radius: f32,
        style: ShapeStyle,
    },

    /// Square of side `size`, rotated `rotation` degrees about its center.
    Square {
        center: Vec2,
        size: f32,
        rotation: f32,
        style: ShapeStyle,
    },

    /// Apex-up triangle spanning `size`, rotated `rotation` degrees about
    /// `center`. Points before rotation: `(x, y - s/2)`, `(x + s/2, y + s/2)`,
    /// `(x - s/2, y + s/2)`.
    Triangle {
        center: Vec2,
        size: f32,
        rotation: f32,
        style: ShapeStyle,
    },
}

impl DrawCommand {
    /// Whether this command is a connection line.
    pub fn is_line(&self) -> bool {
        matches!(self, DrawCommand::Line { .. })
    }
}

/// Everything the field wants drawn for one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Tick counter at emission, starting at 1 for the first tick.
    pub frame: u64,
    /// Band dimensions (width, height) in pixels.
    pub bounds: Vec2,
    /// Draw commands in paint order.
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Scene with no commands (inactive field, zero bounds).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Connection-line commands, in emission order.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_line())
    }

    /// Shape commands, in emission order.
    pub fn shapes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| !c.is_line())
    }
}
