// mesh.rs — UV 球面网格生成
// 每个四边形拆成两个三角形，直接展开为顶点列表（不使用索引缓冲）

use crate::config::SphereConfig;
use std::f64::consts::PI;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle list; every three consecutive vertices form one triangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

// 一个环：r 为环半径比例，h 为极轴高度 (-1..1)，v 为纹理坐标
#[derive(Clone, Copy)]
struct Ring {
    r: f64,
    h: f64,
    v: f64,
}

impl Ring {
    fn at(stack: usize, stack_count: usize) -> Self {
        let t = stack as f64 / stack_count as f64;
        Self {
            r: (PI * t).sin(),
            h: -(PI * t).cos(),
            v: t,
        }
    }

    fn vertex(&self, radius: f64, theta: f64, u: f64) -> Vertex {
        Vertex {
            position: [
                (radius * self.r * theta.cos()) as f32,
                (radius * self.h) as f32,
                (radius * self.r * theta.sin()) as f32,
            ],
            uv: [u as f32, self.v as f32],
        }
    }
}

// 配置过大时不预分配，避免乘法溢出
fn vertex_capacity(stack_count: usize, slice_count: usize) -> usize {
    stack_count
        .checked_mul(slice_count)
        .and_then(|n| n.checked_mul(6))
        .unwrap_or(0)
}

/// Build the sphere triangle list, south pole first.
///
/// Each quad emits `{lower-near, upper-near, upper-far}` then
/// `{lower-near, upper-far, lower-far}`; the renderer culls with clockwise
/// front faces, so this order must not change.
///
/// The last slice ends at `u = 1` while the first starts at `u = 0`; no seam
/// vertices are duplicated. Zero stacks or slices yield an empty mesh.
pub fn generate_sphere(config: &SphereConfig) -> Mesh {
    let SphereConfig {
        stack_count,
        slice_count,
        radius,
    } = *config;
    let radius = f64::from(radius);

    let mut vertices = Vec::with_capacity(vertex_capacity(stack_count, slice_count));

    for i in 0..stack_count {
        let lower = Ring::at(i, stack_count);
        let upper = Ring::at(i + 1, stack_count);

        for j in 0..slice_count {
            let theta1 = 2.0 * PI * (j as f64 / slice_count as f64);
            let theta2 = 2.0 * PI * ((j + 1) as f64 / slice_count as f64);
            let u1 = j as f64 / slice_count as f64;
            let u2 = (j + 1) as f64 / slice_count as f64;

            let lower_near = lower.vertex(radius, theta1, u1);
            let lower_far = lower.vertex(radius, theta2, u2);
            let upper_near = upper.vertex(radius, theta1, u1);
            let upper_far = upper.vertex(radius, theta2, u2);

            vertices.extend_from_slice(&[
                lower_near, upper_near, upper_far,
                lower_near, upper_far, lower_far,
            ]);
        }
    }

    log::debug!(
        "sphere mesh: {} stacks x {} slices -> {} vertices",
        stack_count,
        slice_count,
        vertices.len()
    );

    Mesh { vertices }
}
