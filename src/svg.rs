//! Scene-to-SVG serialization.
//!
//! [`render_svg`] turns a [`Scene`] into a standalone `<svg>` document: one
//! `<linearGradient>` plus `<line>` per connection, then one `<circle>`,
//! `<rect>`, or `<polygon>` per particle. Gradient ids embed the pair
//! indices and the frame counter, so ids never collide when a host swaps
//! documents in place frame after frame.
//!
//! # Example
//!
//! ```ignore
//! let scene = field.tick();
//! std::fs::write("frame.svg", driftfield::svg::render_svg(&scene))?;
//! ```

use glam::Vec3;

use crate::scene::{DrawCommand, Scene, ShapeStyle};

/// Format a color as an `#rrggbb` hex string. Channels are clamped.
pub fn hex_color(color: Vec3) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        byte(color.x),
        byte(color.y),
        byte(color.z)
    )
}

/// Serialize a scene as a complete SVG document.
///
/// The document width and height come from the scene bounds. Commands are
/// written in scene order, which already layers lines under shapes.
pub fn render_svg(scene: &Scene) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">\n",
        scene.bounds.x, scene.bounds.y
    ));

    for command in &scene.commands {
        match command {
            DrawCommand::Line {
                start_index,
                end_index,
                start,
                end,
                start_color,
                end_color,
                opacity,
                width,
            } => {
                let id = format!("gradient-{start_index}-{end_index}-{}", scene.frame);
                out.push_str(&format!(
                    "  <linearGradient id=\"{id}\">\n    <stop offset=\"0%\" stop-color=\"{}\"/>\n    <stop offset=\"100%\" stop-color=\"{}\"/>\n  </linearGradient>\n",
                    hex_color(*start_color),
                    hex_color(*end_color),
                ));
                out.push_str(&format!(
                    "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"url(#{id})\" stroke-width=\"{width}\" stroke-opacity=\"{opacity}\"/>\n",
                    start.x, start.y, end.x, end.y,
                ));
            }
            DrawCommand::Circle {
                center,
                radius,
                style,
            } => {
                out.push_str(&format!(
                    "  <circle cx=\"{}\" cy=\"{}\" r=\"{radius}\" {}/>\n",
                    center.x,
                    center.y,
                    style_attrs(style),
                ));
            }
            DrawCommand::Square {
                center,
                size,
                rotation,
                style,
            } => {
                let half = size / 2.0;
                out.push_str(&format!(
                    "  <rect transform=\"rotate({rotation} {} {})\" x=\"{}\" y=\"{}\" width=\"{size}\" height=\"{size}\" {}/>\n",
                    center.x,
                    center.y,
                    center.x - half,
                    center.y - half,
                    style_attrs(style),
                ));
            }
            DrawCommand::Triangle {
                center,
                size,
                rotation,
                style,
            } => {
                let half = size / 2.0;
                // Apex up, then clockwise.
                let points = format!(
                    "{},{} {},{} {},{}",
                    center.x,
                    center.y - half,
                    center.x + half,
                    center.y + half,
                    center.x - half,
                    center.y + half,
                );
                out.push_str(&format!(
                    "  <polygon points=\"{points}\" transform=\"rotate({rotation} {} {})\" {}/>\n",
                    center.x,
                    center.y,
                    style_attrs(style),
                ));
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

fn style_attrs(style: &ShapeStyle) -> String {
    let color = hex_color(style.color);
    format!(
        "fill=\"{color}\" fill-opacity=\"{}\" stroke=\"{color}\" stroke-width=\"{}\" stroke-opacity=\"{}\"",
        style.fill_alpha, style.stroke_width, style.stroke_alpha,
    )
}
