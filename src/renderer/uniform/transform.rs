use bytemuck::{cast_slice, Pod, Zeroable};
use glam::Mat4;
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, Buffer, BufferUsages, Device,
    Queue,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ObjectUniform {
    transform: [[f32; 4]; 4],
}

/// The `transform` uniform of one scene object, with its bind group.
///
/// The matrix is only uploaded when it differs from the last uploaded one.
#[derive(Debug)]
pub struct ObjectUniformBuffer {
    buffer: Buffer,
    bind_group: BindGroup,
    transform: Mat4,
}

impl ObjectUniformBuffer {
    pub fn new(device: &Device, layout: &BindGroupLayout, index: usize, transform: Mat4) -> Self {
        let uniform = ObjectUniform {
            transform: transform.to_cols_array_2d(),
        };
        let label = format!("Object #{} Uniform", index);
        let buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some(&label),
            contents: cast_slice(&[uniform]),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some(&label),
            layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            buffer,
            bind_group,
            transform,
        }
    }

    pub fn update(&mut self, queue: &Queue, transform: &Mat4) {
        if self.transform == *transform {
            return;
        }
        self.transform = *transform;
        let uniform = ObjectUniform {
            transform: transform.to_cols_array_2d(),
        };
        queue.write_buffer(&self.buffer, 0, cast_slice(&[uniform]));
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }
}
