//! # Dense Field Example
//!
//! A heavier configuration: three times the particles, a wider connection
//! radius, and a faster drift. Shows how far the default constants can be
//! pushed before the O(N²) connection pass starts to matter.
//!
//! ## What This Demonstrates
//!
//! - `FieldConfig` builder methods: `with_particle_count`,
//!   `with_connection_radius`, `with_drift_speed`, `with_size_range`
//! - Light mode as the starting palette
//! - `with_pointer` - a stronger, wider pointer pull
//!
//! ## Try This
//!
//! - Push the count to 200 and watch the web densify
//! - Shrink `with_connection_radius(80.0)` for sparse constellations
//! - `D` still flips the palette at runtime
//!
//! Run with: `cargo run --example dense`

use driftfield::prelude::*;

fn main() -> Result<(), ViewerError> {
    env_logger::init();

    let config = FieldConfig::new()
        .with_particle_count(60)
        .with_connection_radius(220.0)
        .with_drift_speed(1.4)
        .with_size_range(8.0, 24.0)
        .with_pointer(260.0, 0.05);

    Viewer::new()
        .with_title("driftfield - dense")
        .with_config(config)
        .with_display_mode(DisplayMode::Light)
        .with_size(1600, 900)
        .run()
}
