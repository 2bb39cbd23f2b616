use bytemuck::cast_slice;
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    Buffer, BufferUsages, Device, IndexFormat, RenderPass,
};

use crate::scene;

use super::vertex::SceneVertex;

/// Vertex and index buffers shared by every object of the scene.
#[derive(Debug)]
pub struct SceneMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    objects: usize,
}

impl SceneMesh {
    pub fn new(device: &Device, vertices: &[SceneVertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Scene Vertex Buffer"),
            contents: cast_slice(vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Scene Index Buffer"),
            contents: cast_slice(indices),
            usage: BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            objects: indices.len() / scene::INDICES_PER_OBJECT,
        }
    }

    pub fn objects(&self) -> usize {
        self.objects
    }

    pub fn bind(&self, render_pass: &mut RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint32);
    }

    /// Draws the six indices of one object. [`SceneMesh::bind`] must have
    /// been called on the same pass.
    pub fn draw_object(&self, render_pass: &mut RenderPass<'_>, index: usize) {
        render_pass.draw_indexed(scene::object_indices(index), 0, 0..1);
    }
}
