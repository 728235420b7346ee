//! # Backdrop Example
//!
//! The classic ambient backdrop: 20 particles drifting through the top 70%
//! of the window, gradient lines between close pairs, and a gentle pull
//! toward the pointer.
//!
//! ## What This Demonstrates
//!
//! - `Viewer` with the default `FieldConfig`
//! - Pointer interaction - move the mouse near the shapes
//! - `D` key flips between dark and light mode (the field respawns with
//!   the new palette)
//!
//! ## Try This
//!
//! - Resize the window: the band rescales while the population stays put
//! - `RUST_LOG=debug` to watch the FPS heartbeat in the log
//!
//! Run with: `cargo run --example backdrop`

use driftfield::prelude::*;

fn main() -> Result<(), ViewerError> {
    env_logger::init();

    Viewer::new().with_title("driftfield - backdrop").run()
}
