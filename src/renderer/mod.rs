use std::iter;

use camera::Camera;
use depth_texture::DepthTexture;
use log::warn;
use mesh::SceneMesh;
use pipeline::ScenePipeline;
use texture::TextureItem;
use uniform::{camera::CameraUniformBuffer, transform::ObjectUniformBuffer};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, BufferBindingType, Color, CommandEncoder,
    CommandEncoderDescriptor, Device, LoadOp, Operations, Queue, RenderPass,
    RenderPassColorAttachment, RenderPassDepthStencilAttachment, RenderPassDescriptor,
    SamplerBindingType, ShaderStages, StoreOp, TextureFormat, TextureSampleType, TextureView,
    TextureViewDimension,
};
use winit::dpi::PhysicalSize;

use crate::{asset::texture::TextureAsset, scene, transform::TransformStore};

pub mod camera;
mod depth_texture;
pub mod mesh;
pub mod pipeline;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use depth_texture::DEPTH_TEXTURE_FORMAT;

pub const CLEAR_COLOR: Color = Color {
    r: 0.6,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

pub struct OngoingRenderState {
    pub encoder: CommandEncoder,
    pub render_pass: RenderPass<'static>,
}

impl OngoingRenderState {
    pub fn new(device: &Device, texture_view: &TextureView, renderer_state: &RendererState) -> Self {
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        let render_pass = encoder
            .begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: texture_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: renderer_state.depth_texture.texture_view(),
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            })
            .forget_lifetime();

        Self {
            encoder,
            render_pass,
        }
    }

    pub fn finish(self, queue: &Queue) {
        drop(self.render_pass);
        queue.submit(iter::once(self.encoder.finish()));
    }
}

fn uniform_layout(device: &Device, label: &str) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

pub struct RendererState {
    camera_buffer: CameraUniformBuffer,
    global_uniform_layout: BindGroupLayout,
    object_uniform_layout: BindGroupLayout,
    texture_layout: BindGroupLayout,

    view_aspect: f32,
    camera: Camera,
    camera_updated: bool,
    depth_texture: DepthTexture,

    global_bind_group: BindGroup,
}

impl RendererState {
    pub fn new(device: &Device, size: PhysicalSize<u32>) -> Self {
        let view_aspect = size.width as f32 / size.height.max(1) as f32;
        let camera = Camera::default();
        let camera_buffer = CameraUniformBuffer::new(device, &camera, view_aspect);

        let depth_texture = DepthTexture::new(device, size);

        let texture_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        multisampled: false,
                        view_dimension: TextureViewDimension::D2,
                        sample_type: TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("Texture Bind Group Layout"),
        });
        let global_uniform_layout = uniform_layout(device, "Global Uniform Bind Group Layout");
        let global_bind_group = device.create_bind_group(&BindGroupDescriptor {
            layout: &global_uniform_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_buffer.buffer().as_entire_binding(),
            }],
            label: Some("Global Uniform Bind Group"),
        });
        let object_uniform_layout = uniform_layout(device, "Object Uniform Bind Group Layout");

        RendererState {
            camera_buffer,
            depth_texture,

            view_aspect,
            camera,
            camera_updated: true,
            global_bind_group,
            global_uniform_layout,
            object_uniform_layout,
            texture_layout,
        }
    }

    pub fn texture_bind_group_layout(&self) -> &BindGroupLayout {
        &self.texture_layout
    }

    pub fn object_bind_group_layout(&self) -> &BindGroupLayout {
        &self.object_uniform_layout
    }

    pub fn update_camera(&mut self, func: impl FnOnce(&mut Camera)) {
        func(&mut self.camera);
        self.camera_updated = true;
    }

    pub fn resize(&mut self, device: &Device, size: PhysicalSize<u32>) {
        self.view_aspect = size.width as f32 / size.height.max(1) as f32;
        self.camera_updated = true;
        self.depth_texture = DepthTexture::new(device, size);
    }

    fn prepare(&mut self, queue: &Queue) {
        if self.camera_updated {
            self.camera_updated = false;
            self.camera.update_aspect(self.view_aspect);
            self.camera
                .update_uniform(&mut self.camera_buffer, self.view_aspect);
            self.camera_buffer.update(queue);
        }
    }
}

pub struct Renderer {
    pipeline: ScenePipeline,
    mesh: SceneMesh,
    objects: Vec<ObjectUniformBuffer>,
    textures: Vec<BindGroup>,
    pub state: RendererState,
}

impl Renderer {
    pub fn new(
        device: &Device,
        queue: &Queue,
        size: PhysicalSize<u32>,
        target_texture_format: TextureFormat,
        store: &TransformStore,
        textures: &[TextureAsset],
    ) -> Self {
        let state = RendererState::new(device, size);
        let pipeline = ScenePipeline::new(device, &state, target_texture_format);
        let mesh = SceneMesh::new(device, &scene::VERTICES, &scene::INDICES);
        let objects = store
            .transforms()
            .map(|(index, transform)| {
                ObjectUniformBuffer::new(device, state.object_bind_group_layout(), index, *transform)
            })
            .collect();
        let textures = textures
            .iter()
            .map(|asset| {
                TextureItem::from_asset(device, queue, asset)
                    .create_bind_group(device, state.texture_bind_group_layout())
            })
            .collect();
        Self {
            pipeline,
            mesh,
            objects,
            textures,
            state,
        }
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Uploads the camera and every object's current transform. Must run
    /// after the store has been updated for this frame.
    pub fn prepare(&mut self, queue: &Queue, store: &TransformStore) {
        self.state.prepare(queue);
        for (object, (_, transform)) in self.objects.iter_mut().zip(store.transforms()) {
            object.update(queue, transform);
        }
    }

    pub fn render(&self, ongoing_state: &mut OngoingRenderState, applied_texture: usize) {
        let Some(texture) = self.textures.get(applied_texture) else {
            warn!("No texture #{}, skip drawing the scene", applied_texture);
            return;
        };
        let render_pass = &mut ongoing_state.render_pass;
        render_pass.set_pipeline(self.pipeline.render_pipeline());
        render_pass.set_bind_group(0, &self.state.global_bind_group, &[]);
        render_pass.set_bind_group(2, texture, &[]);
        self.mesh.bind(render_pass);
        for (index, object) in self.objects.iter().enumerate().take(self.mesh.objects()) {
            render_pass.set_bind_group(1, object.bind_group(), &[]);
            self.mesh.draw_object(render_pass, index);
        }
    }
}
