//! Camera uniform shared by every pipeline.

use bytemuck::{Pod, Zeroable};

use crate::camera::{CameraState, Projection};

/// Matches `struct Camera` in the WGSL sources.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(camera: &CameraState, projection: &Projection, aspect: f32) -> Self {
        Self {
            view_proj: camera.view_proj(projection, aspect).to_cols_array_2d(),
        }
    }
}

/// WGSL declaration bound at group 0, binding 0.
pub const CAMERA_WGSL: &str = r#"struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;
"#;

pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Camera Bind Group Layout"),
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
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_matches_wgsl() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }

    #[test]
    fn test_uniform_from_camera() {
        let cam = CameraState::default();
        let proj = Projection::default();
        let uniform = CameraUniform::new(&cam, &proj, 1.5);
        assert_eq!(uniform.view_proj, cam.view_proj(&proj, 1.5).to_cols_array_2d());
    }
}
