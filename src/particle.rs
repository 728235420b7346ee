//! The particle record.

use glam::{Vec2, Vec3};

use crate::visuals::ShapeKind;

/// One mobile shape in the field.
///
/// Everything except `position`, `velocity`, `rotation`, and `pulse_phase`
/// is fixed at spawn. Angles are in degrees (matching the SVG `rotate()`
/// convention), pulse phase in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Stable identity, the spawn index. Used for gradient ids.
    pub index: u32,
    /// Position in band coordinates (pixels, y down).
    pub position: Vec2,
    /// Displacement applied each tick, in pixels.
    pub velocity: Vec2,
    /// Rendered shape, fixed at spawn.
    pub shape: ShapeKind,
    /// Base size in pixels (diameter / side length), fixed at spawn.
    pub size: f32,
    /// Palette color (RGB 0.0-1.0), fixed at spawn.
    pub color: Vec3,
    /// Accumulated rotation in degrees.
    pub rotation: f32,
    /// Rotation increment per tick, degrees.
    pub rotation_speed: f32,
    /// Pulse oscillator phase, radians.
    pub pulse_phase: f32,
    /// Phase increment per tick, radians.
    pub pulse_speed: f32,
}

impl Particle {
    /// Current speed in pixels per tick.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Size after the pulse multiplier: `size * (1 + sin(phase) * amplitude)`.
    #[inline]
    pub fn pulsed_size(&self, amplitude: f32) -> f32 {
        self.size * (1.0 + self.pulse_phase.sin() * amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> Particle {
        Particle {
            index: 0,
            position: Vec2::ZERO,
            velocity: Vec2::new(3.0, 4.0),
            shape: ShapeKind::Circle,
            size: 20.0,
            color: Vec3::ONE,
            rotation: 0.0,
            rotation_speed: 0.0,
            pulse_phase: 0.0,
            pulse_speed: 0.0,
        }
    }

    #[test]
    fn test_speed() {
        assert!((particle().speed() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_pulsed_size_at_zero_phase() {
        // sin(0) = 0, so the multiplier is exactly 1
        assert_eq!(particle().pulsed_size(0.1), 20.0);
    }

    #[test]
    fn test_pulsed_size_at_peak() {
        let mut p = particle();
        p.pulse_phase = std::f32::consts::FRAC_PI_2;
        assert!((p.pulsed_size(0.1) - 22.0).abs() < 1e-4);
    }
}
