use wgpu::{
    include_wgsl, BlendState, ColorTargetState, ColorWrites, CompareFunction, DepthBiasState,
    DepthStencilState, Device, FragmentState, FrontFace, MultisampleState, PipelineLayout,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, RenderPipeline,
    RenderPipelineDescriptor, ShaderModule, StencilState, TextureFormat, VertexState,
};

use super::{
    vertex::{SceneVertex, Vertex},
    RendererState,
};

#[derive(Debug)]
pub struct ScenePipeline {
    render_pipeline: RenderPipeline,
}

impl ScenePipeline {
    fn create_pipeline_layout(device: &Device, renderer_state: &RendererState) -> PipelineLayout {
        device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[
                &renderer_state.global_uniform_layout,
                &renderer_state.object_uniform_layout,
                &renderer_state.texture_layout,
            ],
            push_constant_ranges: &[],
        })
    }

    fn create_render_pipeline(
        device: &Device,
        renderer_state: &RendererState,
        pipeline_layout: &PipelineLayout,
        shader_module: &ShaderModule,
        target_texture_format: TextureFormat,
    ) -> RenderPipeline {
        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(pipeline_layout),
            vertex: VertexState {
                module: shader_module,
                entry_point: "vs_main",
                compilation_options: Default::default(),
                buffers: &[SceneVertex::desc()],
            },
            fragment: Some(FragmentState {
                module: shader_module,
                entry_point: "fs_main",
                compilation_options: Default::default(),
                targets: &[Some(ColorTargetState {
                    format: target_texture_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::all(),
                })],
            }),
            // Rotations and the mixed winding of the rectangles make culling
            // unreliable, so both faces are drawn.
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: renderer_state.depth_texture.format(),
                depth_write_enabled: true,
                depth_compare: CompareFunction::LessEqual,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    pub fn new(
        device: &Device,
        renderer_state: &RendererState,
        target_texture_format: TextureFormat,
    ) -> Self {
        let shader_module = device.create_shader_module(include_wgsl!("../shader/scene.wgsl"));
        let pipeline_layout = Self::create_pipeline_layout(device, renderer_state);
        let render_pipeline = Self::create_render_pipeline(
            device,
            renderer_state,
            &pipeline_layout,
            &shader_module,
            target_texture_format,
        );
        Self { render_pipeline }
    }

    pub fn render_pipeline(&self) -> &RenderPipeline {
        &self.render_pipeline
    }
}
