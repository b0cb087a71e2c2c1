//! Label stroke rendering.
//!
//! Every stroke segment is expanded in the vertex shader into a thin quad
//! (6 vertices per instance) that faces roughly every direction.
//! Stroke width scales with the label so large text stays legible.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::camera::CAMERA_WGSL;
use super::DEPTH_FORMAT;
use crate::scene::{Label, Scene};

/// Stroke half-width per unit of label scale.
pub const STROKE_HALF_WIDTH: f32 = 0.04;

/// One stroke segment. `a.w` holds the half-width.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineSegment {
    pub a: [f32; 4],
    pub b: [f32; 4],
    pub color: [f32; 4],
}

/// Flatten every label into stroke segments.
pub fn label_segments(scene: &Scene) -> Vec<LineSegment> {
    scene.labels.iter().flat_map(segments_of).collect()
}

fn segments_of(label: &Label) -> impl Iterator<Item = LineSegment> + '_ {
    let half_width = STROKE_HALF_WIDTH * label.scale as f32;
    let [r, g, bl] = label.color.to_array();
    label.segments().into_iter().map(move |(a, b)| {
        let a = a.as_vec3();
        let b = b.as_vec3();
        LineSegment {
            a: [a.x, a.y, a.z, half_width],
            b: [b.x, b.y, b.z, 0.0],
            color: [r, g, bl, 1.0],
        }
    })
}

const LINES_WGSL: &str = r#"
struct LineSegment {
    a: vec4<f32>,
    b: vec4<f32>,
    color: vec4<f32>,
};

@group(1) @binding(0)
var<storage, read> segments: array<LineSegment>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    var out: VertexOutput;
    let seg = segments[instance_index];
    let world_a = seg.a.xyz;
    let world_b = seg.b.xyz;
    let half_width = seg.a.w;

    let line_dir = world_b - world_a;
    let line_len = length(line_dir);
    if line_len < 0.0001 {
        out.clip_position = vec4<f32>(0.0, 0.0, -1000.0, 1.0);
        out.color = vec4<f32>(0.0);
        return out;
    }
    let dir = line_dir / line_len;

    var perp = cross(dir, vec3<f32>(0.0, 1.0, 0.0));
    if length(perp) < 0.001 {
        perp = cross(dir, vec3<f32>(1.0, 0.0, 0.0));
    }
    perp = normalize(perp) * half_width;
    let perp2 = normalize(cross(dir, perp)) * half_width;

    var pos: vec3<f32>;
    switch vertex_index {
        case 0u: { pos = world_a - perp - perp2; }
        case 1u: { pos = world_a + perp + perp2; }
        case 2u: { pos = world_b - perp - perp2; }
        case 3u: { pos = world_a + perp + perp2; }
        case 4u: { pos = world_b - perp - perp2; }
        default: { pos = world_b + perp + perp2; }
    }

    out.clip_position = camera.view_proj * vec4<f32>(pos, 1.0);
    out.color = seg.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub fn shader_source() -> String {
    format!("{CAMERA_WGSL}{LINES_WGSL}")
}

/// GPU state for label strokes.
pub struct LineState {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    segment_count: u32,
}

impl LineState {
    pub fn new(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        segments: &[LineSegment],
    ) -> Self {
        let placeholder = [LineSegment::zeroed()];
        let data = if segments.is_empty() { &placeholder[..] } else { segments };
        let segment_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Label Segment Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Label Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Label Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: segment_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Label Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Label Pipeline Layout"),
            bind_group_layouts: &[camera_layout, &bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Label Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            segment_count: segments.len() as u32,
        }
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }

    /// Draw all strokes. Expects the camera bind group at group 0.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.segment_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.draw(0..6, 0..self.segment_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, Orientation};
    use glam::DVec3;

    #[test]
    fn test_shader_validates() {
        let module = naga::front::wgsl::parse_str(&shader_source()).expect("parse");
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).expect("validate");
    }

    #[test]
    fn test_segment_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<LineSegment>(), 48);
    }

    #[test]
    fn test_width_scales_with_label() {
        let small = Label {
            text: "x".into(),
            position: DVec3::ZERO,
            rotation: Orientation::default(),
            scale: 1.0,
            color: Color::BLACK,
        };
        let big = Label { scale: 20.0, ..small.clone() };
        let scene = Scene {
            labels: vec![small, big],
            ..Default::default()
        };

        let segments = label_segments(&scene);
        assert!(!segments.is_empty());
        assert_eq!(segments.len() % 2, 0);
        let half = segments.len() / 2;
        assert!((segments[0].a[3] - STROKE_HALF_WIDTH).abs() < 1e-6);
        assert!((segments[half].a[3] - 20.0 * STROKE_HALF_WIDTH).abs() < 1e-5);
        assert_eq!(segments[0].color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_scene_has_no_segments() {
        assert!(label_segments(&Scene::default()).is_empty());
    }
}
