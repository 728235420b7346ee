//! # driftfield - Ambient Particle Field Engine
//!
//! Drifting geometric backdrops with a small, host-agnostic API.
//!
//! A [`ParticleField`] scatters circles, squares, and triangles across the
//! top band of a viewport and lets them wander: nearby pairs get gradient
//! connection lines, the pointer gently pulls everything toward it, and
//! each shape pulses and spins as it drifts.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_display_mode(DisplayMode::Dark)
//!         .with_seed(42)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The field
//!
//! [`ParticleField`] owns the population and every bit of per-tick state.
//! It starts inactive; [`ParticleField::activate`] spawns the particles for
//! a viewport, and each [`ParticleField::tick`] advances the simulation one
//! step. There are no globals and no callbacks, so several fields can
//! coexist in one process.
//!
//! ### Scenes
//!
//! A tick returns a [`Scene`]: an immutable list of [`DrawCommand`]s in
//! paint order (connection lines first, then shapes). The field never
//! touches a drawing surface itself; the host commits the scene however it
//! likes. Two hosts ship with the crate: the windowed [`Viewer`] and the
//! [`svg`] serializer.
//!
//! ### Display modes
//!
//! [`DisplayMode::Dark`] and [`DisplayMode::Light`] each carry a four-color
//! palette and a matching background. Switching modes on a live field
//! respawns the population with the new palette.
//!
//! ## Module Overview
//!
//! | Module | What it gives you |
//! |--------|-------------------|
//! | [`field`] | the simulator: config, lifecycle, tick |
//! | [`scene`] | the per-tick draw command list |
//! | [`window`] | batteries-included winit + wgpu viewer |
//! | [`svg`] | scene-to-SVG serialization |
//! | [`visuals`] | display modes, palettes, shape kinds |
//!
//! The simulation core has no GPU or window dependency of its own: tick a
//! field in a loop and serialize the scenes, or feed them to a renderer you
//! already have.

pub mod error;
pub mod field;
pub mod gpu;
mod particle;
pub mod scene;
mod spawn;
pub mod svg;
pub mod time;
pub mod visuals;
pub mod window;

pub use error::{GpuError, ViewerError};
pub use field::{FieldConfig, ParticleField};
pub use glam::{Vec2, Vec3};
pub use particle::Particle;
pub use scene::{DrawCommand, Scene, ShapeStyle};
pub use visuals::{DisplayMode, ShapeKind};
pub use window::Viewer;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
///
/// This imports:
/// - [`ParticleField`] and [`FieldConfig`] - the simulator and its tuning
/// - [`Scene`], [`DrawCommand`], [`ShapeStyle`] - the per-tick output
/// - [`Viewer`] - the windowed host
/// - [`DisplayMode`], [`ShapeKind`] - palettes and shapes
/// - [`ViewerError`], [`GpuError`] - host error types
/// - [`Vec2`], [`Vec3`] - glam vector types
pub mod prelude {
    pub use crate::error::{GpuError, ViewerError};
    pub use crate::field::{FieldConfig, ParticleField};
    pub use crate::particle::Particle;
    pub use crate::scene::{DrawCommand, Scene, ShapeStyle};
    pub use crate::time::Time;
    pub use crate::visuals::{DisplayMode, ShapeKind};
    pub use crate::window::Viewer;
    pub use crate::{Vec2, Vec3};
}
