//! Procedural meshes for the instanced pipeline.
//!
//! Both meshes are unit-sized and centred on the origin; instances scale
//! them into place.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

/// A single mesh vertex. Materials are unlit, so position is all we need.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, x: f32, y: f32, z: f32) -> u16 {
        self.vertices.push(MeshVertex { position: [x, y, z] });
        (self.vertices.len() - 1) as u16
    }

    /// Truncated cone along +Y with unit height, centred on the origin.
    ///
    /// `radius_top` sits at `y = 0.5`, `radius_bottom` at `y = -0.5`. Both
    /// ends are capped.
    pub fn cone(radius_top: f32, radius_bottom: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Mesh::default();

        let mut top_ring = Vec::with_capacity(segments as usize);
        let mut bottom_ring = Vec::with_capacity(segments as usize);
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            top_ring.push(mesh.push(radius_top * sin, 0.5, radius_top * cos));
            bottom_ring.push(mesh.push(radius_bottom * sin, -0.5, radius_bottom * cos));
        }

        for i in 0..segments as usize {
            let j = (i + 1) % segments as usize;
            let (t0, t1, b0, b1) = (top_ring[i], top_ring[j], bottom_ring[i], bottom_ring[j]);
            mesh.indices.extend_from_slice(&[t0, b0, t1, t1, b0, b1]);
        }

        let top_center = mesh.push(0.0, 0.5, 0.0);
        let bottom_center = mesh.push(0.0, -0.5, 0.0);
        for i in 0..segments as usize {
            let j = (i + 1) % segments as usize;
            mesh.indices.extend_from_slice(&[top_center, top_ring[i], top_ring[j]]);
            mesh.indices.extend_from_slice(&[bottom_center, bottom_ring[j], bottom_ring[i]]);
        }

        mesh
    }

    /// Axis-aligned cube with unit edges, centred on the origin.
    pub fn cube() -> Self {
        let mut mesh = Mesh::default();
        for i in 0..8u8 {
            let coord = |bit: u8| if i & bit != 0 { 0.5 } else { -0.5 };
            mesh.push(coord(1), coord(2), coord(4));
        }
        // Corner index bits: 1 = +x, 2 = +y, 4 = +z
        mesh.indices = vec![
            0, 2, 1, 1, 2, 3, // -z
            4, 5, 6, 5, 7, 6, // +z
            0, 1, 4, 1, 5, 4, // -y
            2, 6, 3, 3, 6, 7, // +y
            0, 4, 2, 2, 4, 6, // -x
            1, 3, 5, 3, 7, 5, // +x
        ];
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(mesh: &Mesh) -> ([f32; 3], [f32; 3]) {
        let mut lo = [f32::MAX; 3];
        let mut hi = [f32::MIN; 3];
        for v in &mesh.vertices {
            for k in 0..3 {
                lo[k] = lo[k].min(v.position[k]);
                hi[k] = hi[k].max(v.position[k]);
            }
        }
        (lo, hi)
    }

    #[test]
    fn test_cone_shape() {
        let mesh = Mesh::cone(0.01, 0.15, 12);
        assert_eq!(mesh.vertices.len(), 12 * 2 + 2);
        // Side quads plus two caps
        assert_eq!(mesh.triangle_count(), 12 * 2 + 12 * 2);

        let (lo, hi) = bounds(&mesh);
        assert_eq!(lo[1], -0.5);
        assert_eq!(hi[1], 0.5);
        assert!((hi[2] - 0.15).abs() < 1e-6);

        for v in mesh.vertices.iter().filter(|v| v.position[1] > 0.0) {
            let r = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
            assert!(r <= 0.01 + 1e-6);
        }
    }

    #[test]
    fn test_cone_indices_in_range() {
        let mesh = Mesh::cone(0.01, 0.15, 12);
        let n = mesh.vertices.len() as u16;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_cone_minimum_segments() {
        assert_eq!(Mesh::cone(0.1, 0.1, 0).vertices.len(), 3 * 2 + 2);
    }

    #[test]
    fn test_cube() {
        let mesh = Mesh::cube();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        let (lo, hi) = bounds(&mesh);
        assert_eq!(lo, [-0.5; 3]);
        assert_eq!(hi, [0.5; 3]);
        assert!(mesh.indices.iter().all(|&i| i < 8));
    }
}
