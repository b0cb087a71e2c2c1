//! Instanced, unlit mesh rendering for arrows and grid boxes.
//!
//! Each instance carries a full model matrix and a flat colour. Arrows use
//! `T(anchor) * R * S(1, length, 1)` on the unit cone; grid boxes use
//! `T(center) * S(size)` on the unit cube.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

use super::camera::CAMERA_WGSL;
use super::mesh::{Mesh, MeshVertex};
use super::DEPTH_FORMAT;
use crate::scene::{Color, GridLine, OrientedPrimitive};

/// Per-instance data, laid out for `@location(1..=5)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(model: Mat4, color: Color) -> Self {
        let [r, g, b] = color.to_array();
        Self {
            model: model.to_cols_array_2d(),
            color: [r, g, b, 1.0],
        }
    }

    pub fn from_arrow(arrow: &OrientedPrimitive) -> Self {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, arrow.length as f32, 1.0),
            arrow.orientation.to_quat().as_quat(),
            arrow.anchor.as_vec3(),
        );
        Self::new(model, arrow.color)
    }

    pub fn from_grid_line(line: &GridLine) -> Self {
        let model = Mat4::from_scale_rotation_translation(
            line.size.as_vec3(),
            Quat::IDENTITY,
            line.center.as_vec3(),
        );
        Self::new(model, line.color)
    }
}

const INSTANCED_WGSL: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(1) model_0: vec4<f32>,
    @location(2) model_1: vec4<f32>,
    @location(3) model_2: vec4<f32>,
    @location(4) model_3: vec4<f32>,
    @location(5) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    var out: VertexOutput;
    out.clip_position = camera.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Full WGSL source for the instanced pipeline.
pub fn shader_source() -> String {
    format!("{CAMERA_WGSL}{INSTANCED_WGSL}")
}

/// One mesh uploaded together with its instances.
pub struct InstancedMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
}

impl InstancedMesh {
    pub fn new(device: &wgpu::Device, label: &str, mesh: &Mesh, instances: &[InstanceRaw]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Keep the buffer non-empty so it can always be bound
        let placeholder = [InstanceRaw::zeroed()];
        let instance_data = if instances.is_empty() { &placeholder[..] } else { instances };
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Instance Buffer")),
            contents: bytemuck::cast_slice(instance_data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
            instance_count: instances.len() as u32,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}

pub fn create_pipeline(
    device: &wgpu::Device,
    camera_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Instanced Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(shader_source().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Instanced Mesh Pipeline Layout"),
        bind_group_layouts: &[camera_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Instanced Mesh Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout(), InstanceRaw::layout()],
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
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Orientation;
    use glam::{DVec3, Vec4Swizzles};

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_shader_validates() {
        validate_wgsl(&shader_source()).unwrap();
    }

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
    }

    #[test]
    fn test_arrow_transform() {
        let arrow = OrientedPrimitive {
            anchor: DVec3::new(2.0, 4.0, 5.0),
            orientation: Orientation::new(0.0, 0.0, 0.0),
            length: 3.0,
            color: Color::BLACK,
        };
        let raw = InstanceRaw::from_arrow(&arrow);
        let model = Mat4::from_cols_array_2d(&raw.model);

        // The cone tip (local +Y half height) lands length/2 above the anchor
        let tip = (model * glam::Vec4::new(0.0, 0.5, 0.0, 1.0)).xyz();
        assert!((tip - Vec3::new(2.0, 5.5, 5.0)).length() < 1e-5);
        assert_eq!(raw.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_arrow_rotation_applied_before_translation() {
        let arrow = OrientedPrimitive {
            anchor: DVec3::ZERO,
            orientation: Orientation::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0),
            length: 1.0,
            color: Color::BLACK,
        };
        let model = Mat4::from_cols_array_2d(&InstanceRaw::from_arrow(&arrow).model);
        // Rotating +Y by 90 degrees about X gives +Z
        let tip = (model * glam::Vec4::new(0.0, 0.5, 0.0, 1.0)).xyz();
        assert!((tip - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_grid_line_transform() {
        let line = GridLine {
            center: DVec3::new(3.0, 0.0, 0.0),
            size: DVec3::new(0.1, 20.0, 0.1),
            color: Color::GRID_GREY,
        };
        let model = Mat4::from_cols_array_2d(&InstanceRaw::from_grid_line(&line).model);
        let corner = (model * glam::Vec4::new(0.5, 0.5, 0.5, 1.0)).xyz();
        assert!((corner - Vec3::new(3.05, 10.0, 0.05)).length() < 1e-5);
    }
}
