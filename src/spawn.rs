//! Seeded spawn context for population generation.
//!
//! One [`SpawnContext`] is created per activation and drawn from
//! sequentially, so a fixed seed pins the entire population. Without an
//! explicit seed the context seeds itself from the system clock.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::field::FieldConfig;
use crate::particle::Particle;
use crate::visuals::ShapeKind;

/// Random source for spawning one population.
pub struct SpawnContext {
    /// Number of particles this context will spawn.
    pub count: u32,
    /// Band the particles spawn into (width, height), pixels.
    pub bounds: Vec2,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context, seeded explicitly or from the clock.
    pub fn new(seed: Option<u64>, count: u32, bounds: Vec2) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            count,
            bounds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`, or `min` itself when the range is empty.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        // gen_range asserts low < high.
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Random f32 centered on zero: `(random - 0.5) * scale`.
    #[inline]
    pub fn random_spread(&mut self, scale: f32) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * scale
    }

    /// Random point inside the band.
    pub fn random_in_band(&mut self) -> Vec2 {
        Vec2::new(
            self.random() * self.bounds.x,
            self.random() * self.bounds.y,
        )
    }

    /// Shape drawn uniformly, in declaration order.
    pub fn random_shape(&mut self) -> ShapeKind {
        match self.rng.gen_range(0..3u32) {
            0 => ShapeKind::Circle,
            1 => ShapeKind::Triangle,
            _ => ShapeKind::Square,
        }
    }

    /// One palette color, uniform.
    pub fn random_color(&mut self, palette: &[Vec3; 4]) -> Vec3 {
        palette[self.rng.gen_range(0..palette.len())]
    }

    /// Spawn the particle at `index`.
    ///
    /// Draw order is fixed (position x/y, velocity x/y, shape, size, color,
    /// rotation, rotation speed, pulse phase, pulse speed); reordering would
    /// silently break seeded reproducibility.
    pub(crate) fn next_particle(
        &mut self,
        index: u32,
        config: &FieldConfig,
        palette: &[Vec3; 4],
    ) -> Particle {
        let position = self.random_in_band();
        let velocity = Vec2::new(
            self.random_spread(config.drift_speed),
            self.random_spread(config.drift_speed),
        );
        let shape = self.random_shape();
        let size = self.random_range(config.size_min, config.size_max);
        let color = self.random_color(palette);
        let rotation = self.random() * 360.0;
        let rotation_speed = self.random_spread(config.spin_speed);
        let pulse_phase = self.random() * TAU;
        let pulse_speed = self.random_range(config.pulse_speed_min, config.pulse_speed_max);

        Particle {
            index,
            position,
            velocity,
            shape,
            size,
            color,
            rotation,
            rotation_speed,
            pulse_phase,
            pulse_speed,
        }
    }
}
