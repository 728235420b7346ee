use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::scene::{DrawCommand, Scene, ShapeStyle};

const CIRCLE_SEGMENTS: u32 = 32;
const VERTEX_BUFFER_START_CAPACITY: usize = 8192;

/// Flat-shaded 2D pipeline: band-space pixels in, alpha-blended color out.
const SCENE_SHADER: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) alpha: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) alpha: f32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let ndc = vec2<f32>(
        in.position.x / uniforms.resolution.x * 2.0 - 1.0,
        1.0 - in.position.y / uniforms.resolution.y * 2.0,
    );
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = in.color;
    out.alpha = in.alpha;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, in.alpha);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 3],
    alpha: f32,
}

fn vertex(position: Vec2, color: Vec3, alpha: f32) -> Vertex {
    Vertex {
        position: position.to_array(),
        color: color.to_array(),
        alpha,
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// Scratch vertices, reused across frames.
    vertices: Vec<Vertex>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        // A backdrop has no business spinning up the discrete GPU.
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Vertex Buffer"),
            size: (VERTEX_BUFFER_START_CAPACITY * std::mem::size_of::<Vertex>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniforms = Uniforms {
            resolution: [config.width as f32, config.height as f32],
            _padding: [0.0; 2],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2, // position
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3, // color
                        },
                        wgpu::VertexAttribute {
                            offset: 20,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32, // alpha
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // No depth buffer: everything alpha-blends in paint order.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            vertices: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn update_uniforms(&mut self) {
        let uniforms = Uniforms {
            resolution: [self.config.width as f32, self.config.height as f32],
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn ensure_vertex_capacity(&mut self, vertex_count: usize) {
        let needed = (vertex_count * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress;
        if needed > self.vertex_buffer.size() {
            self.vertex_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Scene Vertex Buffer"),
                size: needed.next_power_of_two(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
    }

    pub fn render(&mut self, scene: &Scene, background: Vec3) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms();

        self.vertices.clear();
        tessellate_scene(scene, &mut self.vertices);
        self.ensure_vertex_capacity(self.vertices.len());
        if !self.vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(background.x),
                            g: f64::from(background.y),
                            b: f64::from(background.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertices.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Expand every draw command into alpha-blended triangles.
///
/// Commands are tessellated in scene order, so the triangle list preserves
/// the lines-under-shapes layering.
fn tessellate_scene(scene: &Scene, out: &mut Vec<Vertex>) {
    for command in &scene.commands {
        match command {
            DrawCommand::Line {
                start,
                end,
                start_color,
                end_color,
                opacity,
                width,
                ..
            } => {
                tessellate_line(*start, *end, *start_color, *end_color, *opacity, *width, out)
            }
            DrawCommand::Circle {
                center,
                radius,
                style,
            } => tessellate_circle(*center, *radius, style, out),
            DrawCommand::Square {
                center,
                size,
                rotation,
                style,
            } => {
                let corners = square_corners(*center, *size, *rotation);
                fill_convex(&corners, style.color, style.fill_alpha, out);
                stroke_loop(&corners, style.stroke_width, style.color, style.stroke_alpha, out);
            }
            DrawCommand::Triangle {
                center,
                size,
                rotation,
                style,
            } => {
                let corners = triangle_corners(*center, *size, *rotation);
                fill_convex(&corners, style.color, style.fill_alpha, out);
                stroke_loop(&corners, style.stroke_width, style.color, style.stroke_alpha, out);
            }
        }
    }
}

/// A line becomes a width-expanded quad. Endpoint colors sit on the
/// endpoint vertices and the hardware interpolates the gradient.
fn tessellate_line(
    start: Vec2,
    end: Vec2,
    start_color: Vec3,
    end_color: Vec3,
    opacity: f32,
    width: f32,
    out: &mut Vec<Vertex>,
) {
    let Some(dir) = (end - start).try_normalize() else {
        // Coincident endpoints have no direction to expand along.
        return;
    };
    let offset = dir.perp() * (width / 2.0);

    let s0 = vertex(start - offset, start_color, opacity);
    let s1 = vertex(start + offset, start_color, opacity);
    let e0 = vertex(end - offset, end_color, opacity);
    let e1 = vertex(end + offset, end_color, opacity);

    out.extend_from_slice(&[s0, s1, e1, s0, e1, e0]);
}

fn tessellate_circle(center: Vec2, radius: f32, style: &ShapeStyle, out: &mut Vec<Vertex>) {
    let point_at = |k: u32, r: f32| {
        let angle = k as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
        center + Vec2::from_angle(angle) * r
    };

    for k in 0..CIRCLE_SEGMENTS {
        push_triangle(
            center,
            point_at(k, radius),
            point_at(k + 1, radius),
            style.color,
            style.fill_alpha,
            out,
        );
    }

    let half = style.stroke_width / 2.0;
    let inner = (radius - half).max(0.0);
    let outer = radius + half;
    for k in 0..CIRCLE_SEGMENTS {
        let (o0, i0) = (point_at(k, outer), point_at(k, inner));
        let (o1, i1) = (point_at(k + 1, outer), point_at(k + 1, inner));
        push_triangle(o0, i0, o1, style.color, style.stroke_alpha, out);
        push_triangle(i0, i1, o1, style.color, style.stroke_alpha, out);
    }
}

/// Fan-fill a convex polygon from its first point.
fn fill_convex(points: &[Vec2], color: Vec3, alpha: f32, out: &mut Vec<Vertex>) {
    for k in 1..points.len() - 1 {
        push_triangle(points[0], points[k], points[k + 1], color, alpha, out);
    }
}

/// Stroke a closed polygon as one width-expanded quad per edge.
///
/// Corners are left unmitered; at backdrop stroke widths the gaps are
/// subpixel.
fn stroke_loop(points: &[Vec2], width: f32, color: Vec3, alpha: f32, out: &mut Vec<Vertex>) {
    let half = width / 2.0;
    for k in 0..points.len() {
        let a = points[k];
        let b = points[(k + 1) % points.len()];
        let Some(dir) = (b - a).try_normalize() else {
            continue;
        };
        let offset = dir.perp() * half;
        push_triangle(a - offset, a + offset, b + offset, color, alpha, out);
        push_triangle(a - offset, b + offset, b - offset, color, alpha, out);
    }
}

fn push_triangle(a: Vec2, b: Vec2, c: Vec2, color: Vec3, alpha: f32, out: &mut Vec<Vertex>) {
    out.push(vertex(a, color, alpha));
    out.push(vertex(b, color, alpha));
    out.push(vertex(c, color, alpha));
}

fn rotate_about(point: Vec2, center: Vec2, degrees: f32) -> Vec2 {
    center + Vec2::from_angle(degrees.to_radians()).rotate(point - center)
}

fn square_corners(center: Vec2, size: f32, rotation: f32) -> [Vec2; 4] {
    let half = size / 2.0;
    [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|corner| rotate_about(center + corner, center, rotation))
}

fn triangle_corners(center: Vec2, size: f32, rotation: f32) -> [Vec2; 3] {
    let half = size / 2.0;
    [
        Vec2::new(0.0, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|corner| rotate_about(center + corner, center, rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> ShapeStyle {
        ShapeStyle {
            color: Vec3::new(0.2, 0.4, 0.6),
            fill_alpha: 0.15,
            stroke_alpha: 0.4,
            stroke_width: 1.5,
        }
    }

    #[test]
    fn test_shader_parses_and_validates() {
        let module = naga::front::wgsl::parse_str(SCENE_SHADER).expect("WGSL should parse");
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).expect("WGSL should validate");
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_line_expands_to_one_quad() {
        let mut out = Vec::new();
        tessellate_line(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            0.25,
            1.0,
            &mut out,
        );

        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.alpha == 0.25));
        // Gradient endpoints: three vertices per color.
        let reds = out.iter().filter(|v| v.color == [1.0, 0.0, 0.0]).count();
        let blues = out.iter().filter(|v| v.color == [0.0, 0.0, 1.0]).count();
        assert_eq!(reds, 3);
        assert_eq!(blues, 3);
        // Width 1 expands half a pixel to each side.
        assert!(out.iter().all(|v| v.position[1].abs() == 0.5));
    }

    #[test]
    fn test_zero_length_line_is_skipped() {
        let mut out = Vec::new();
        tessellate_line(
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 5.0),
            Vec3::ONE,
            Vec3::ONE,
            0.3,
            1.0,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        tessellate_circle(Vec2::new(50.0, 50.0), 10.0, &style(), &mut out);
        // Fill fan plus stroke ring, two triangles per ring segment.
        assert_eq!(out.len(), (CIRCLE_SEGMENTS * 3 + CIRCLE_SEGMENTS * 6) as usize);
    }

    #[test]
    fn test_square_and_triangle_vertex_counts() {
        let mut out = Vec::new();
        tessellate_scene(
            &Scene {
                frame: 1,
                bounds: Vec2::new(100.0, 70.0),
                commands: vec![
                    DrawCommand::Square {
                        center: Vec2::new(10.0, 10.0),
                        size: 20.0,
                        rotation: 15.0,
                        style: style(),
                    },
                    DrawCommand::Triangle {
                        center: Vec2::new(40.0, 10.0),
                        size: 20.0,
                        rotation: 0.0,
                        style: style(),
                    },
                ],
            },
            &mut out,
        );
        // Square: 2 fill + 8 stroke triangles. Triangle: 1 fill + 6 stroke.
        assert_eq!(out.len(), 30 + 21);
    }

    #[test]
    fn test_square_corners_rotate_clockwise_in_screen_space() {
        let center = Vec2::new(10.0, 10.0);
        let corners = square_corners(center, 4.0, 90.0);
        // Top-left corner (-2,-2 relative) lands at (+2,-2) after a 90
        // degree turn in y-down coordinates.
        let expected = center + Vec2::new(2.0, -2.0);
        assert!((corners[0] - expected).length() < 1e-4);
    }

    #[test]
    fn test_triangle_apex_points_up_before_rotation() {
        let corners = triangle_corners(Vec2::new(0.0, 0.0), 10.0, 0.0);
        assert_eq!(corners[0], Vec2::new(0.0, -5.0));
        assert_eq!(corners[1], Vec2::new(5.0, 5.0));
        assert_eq!(corners[2], Vec2::new(-5.0, 5.0));
    }

    #[test]
    fn test_scene_tessellation_preserves_paint_order() {
        let mut out = Vec::new();
        let line_color = Vec3::new(0.9, 0.1, 0.1);
        tessellate_scene(
            &Scene {
                frame: 1,
                bounds: Vec2::new(100.0, 70.0),
                commands: vec![
                    DrawCommand::Line {
                        start_index: 0,
                        end_index: 1,
                        start: Vec2::ZERO,
                        end: Vec2::new(10.0, 0.0),
                        start_color: line_color,
                        end_color: line_color,
                        opacity: 0.3,
                        width: 1.0,
                    },
                    DrawCommand::Circle {
                        center: Vec2::new(5.0, 5.0),
                        radius: 8.0,
                        style: style(),
                    },
                ],
            },
            &mut out,
        );

        // Line vertices come first, so the circle paints over the line.
        assert_eq!(out.len(), 6 + (CIRCLE_SEGMENTS * 9) as usize);
        assert!(out[..6].iter().all(|v| v.color == line_color.to_array()));
    }
}
