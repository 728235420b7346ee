//! # SVG Dump Example
//!
//! Headless rendering: no window, no GPU. Activates a seeded field, runs it
//! for a few ticks, and prints the final frame as a standalone SVG document.
//!
//! ## What This Demonstrates
//!
//! - Driving `ParticleField` directly, without the `Viewer`
//! - `with_seed` - the same seed prints the same document every run
//! - `svg::render_svg` - scene-to-SVG serialization
//!
//! ## Try This
//!
//! - `cargo run --example svg_dump > frame.svg` and open it in a browser
//! - Change the seed and diff the output
//! - Feed the pointer with `field.pointer_moved(..)` between ticks and
//!   watch the population drift toward it
//!
//! Run with: `cargo run --example svg_dump`

use driftfield::prelude::*;
use driftfield::svg;

fn main() {
    env_logger::init();

    let mut field = ParticleField::new(FieldConfig::new().with_seed(42));
    field.activate(DisplayMode::Dark, Vec2::new(1280.0, 720.0));

    // Let the population drift for a moment before the snapshot.
    let mut scene = Scene::empty();
    for _ in 0..120 {
        scene = field.tick();
    }

    print!("{}", svg::render_svg(&scene));
}
