//! Display modes, palettes, and particle shapes.
//!
//! A [`DisplayMode`] selects the palette particles are colored from and the
//! background the host should clear to. Swapping modes on a live field is a
//! full repopulation, since every particle's color is fixed at spawn.
//!
//! # Usage
//!
//! ```ignore
//! let mut field = ParticleField::new(FieldConfig::new());
//! field.activate(DisplayMode::Dark, Vec2::new(1280.0, 720.0));
//! ```

use glam::Vec3;

/// Light/dark display mode keying the particle palette.
///
/// The host supplies this on activation and may switch it at runtime;
/// switching discards the population and spawns a fresh one from the other
/// palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Dark backdrop with saturated accent colors (default).
    #[default]
    Dark,

    /// Light backdrop with deeper, print-friendly accents.
    Light,
}

impl DisplayMode {
    /// Get the color stops for this mode (4 colors, RGB 0.0-1.0).
    pub fn palette(&self) -> [Vec3; 4] {
        match self {
            DisplayMode::Dark => [
                Vec3::new(0.243, 0.812, 0.557), // #3ECF8E green
                Vec3::new(0.310, 0.820, 1.0),   // #4FD1FF cyan
                Vec3::new(1.0, 0.286, 0.859),   // #FF49DB magenta
                Vec3::new(1.0, 0.722, 0.0),     // #FFB800 amber
            ],
            DisplayMode::Light => [
                Vec3::new(0.243, 0.812, 0.557), // #3ECF8E green
                Vec3::new(0.145, 0.388, 0.922), // #2563EB blue
                Vec3::new(0.576, 0.2, 0.918),   // #9333EA violet
                Vec3::new(0.961, 0.620, 0.043), // #F59E0B amber
            ],
        }
    }

    /// Background clear color for hosts that own the whole surface.
    pub fn background(&self) -> Vec3 {
        match self {
            DisplayMode::Dark => Vec3::new(0.02, 0.02, 0.05), // Dark blue-black
            DisplayMode::Light => Vec3::new(0.97, 0.98, 0.98),
        }
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }
}

/// Geometric shape a particle renders as.
///
/// Fixed at spawn. Squares and triangles rotate about their center by the
/// particle's accumulated rotation angle; circles ignore rotation.
///
/// Variant order matches the spawn sampling order, so seeded populations are
/// stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// Filled and stroked circle (default).
    #[default]
    Circle,

    /// Apex-up triangle rotated about its center.
    Triangle,

    /// Axis-aligned square rotated about its center.
    Square,
}
