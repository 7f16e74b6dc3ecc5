use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Vertex layout (20 bytes):
///
///  offset  0  position [f32; 2]   loc 0
///  offset  8  color    [f32; 3]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x3, // color
    ];

    /// White vertex; the object color alone decides the final tint.
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y],
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Immutable triangle-list geometry uploaded once.
#[derive(Debug)]
pub struct Model {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl Model {
    pub fn new(device: &wgpu::Device, vertices: &[Vertex]) -> Result<Self> {
        anyhow::ensure!(
            vertices.len() >= 3,
            "model needs at least 3 vertices, got {}",
            vertices.len()
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon model vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        })
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.draw(0..self.vertex_count, 0..1);
    }
}
