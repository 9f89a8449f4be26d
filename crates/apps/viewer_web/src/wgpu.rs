#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use gpu::mesh::{BoxMesh, BoxVertex};
    use gpu::outline::{OutlineSettings, OutlineUniform};
    use gpu::shaders::{LAND_SHADER, OUTLINE_SHADER};
    use gpu::{BoxInstance, RenderFrame, RenderSettings, SceneUniform};
    use std::borrow::Cow;
    use wasm_bindgen::prelude::*;

    const DEPTH_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Depth24Plus;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub sample_count: u32,
        pub land_pipeline: ::wgpu::RenderPipeline,
        pub outline_pipeline: ::wgpu::RenderPipeline,
        pub scene_buffer: ::wgpu::Buffer,
        pub scene_bind_group: ::wgpu::BindGroup,
        pub outline_buffer: ::wgpu::Buffer,
        pub outline_bind_group: ::wgpu::BindGroup,
        pub depth_view: ::wgpu::TextureView,
        pub msaa_view: Option<::wgpu::TextureView>,
        pub vertex_buffer: ::wgpu::Buffer,
        pub index_buffer: ::wgpu::Buffer,
        pub index_count: u32,
        pub instance_buffer: ::wgpu::Buffer,
        pub instance_capacity: usize,
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("land-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: ::wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn create_msaa_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> Option<::wgpu::TextureView> {
        if sample_count <= 1 {
            return None;
        }
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("land-msaa-color"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: ::wgpu::TextureDimension::D2,
            format: config.format,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Some(tex.create_view(&::wgpu::TextureViewDescriptor::default()))
    }

    fn create_instance_buffer(device: &::wgpu::Device, capacity: usize) -> ::wgpu::Buffer {
        device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("land-instances"),
            size: (capacity.max(1) * std::mem::size_of::<BoxInstance>()) as u64,
            usage: ::wgpu::BufferUsages::VERTEX | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn uniform_layout_entry() -> ::wgpu::BindGroupLayoutEntry {
        ::wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: ::wgpu::BindingType::Buffer {
                ty: ::wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }
    }

    const BOX_ATTRIBUTES: [::wgpu::VertexAttribute; 2] =
        ::wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    const INSTANCE_ATTRIBUTES: [::wgpu::VertexAttribute; 3] = [
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 2,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 16,
            shader_location: 3,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x4,
            offset: 32,
            shader_location: 4,
        },
    ];

    fn vertex_layouts() -> [::wgpu::VertexBufferLayout<'static>; 2] {
        [
            ::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<BoxVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &BOX_ATTRIBUTES,
            },
            ::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<BoxInstance>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRIBUTES,
            },
        ]
    }

    pub async fn init_wgpu(
        canvas: web_sys::HtmlCanvasElement,
        width: u32,
        height: u32,
        settings: RenderSettings,
    ) -> Result<WgpuContext, JsValue> {
        // `wgpu::Surface` must not outlive its `wgpu::Instance`; the instance
        // lives for the rest of the page.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("land-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .cloned()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().cloned())
            .ok_or_else(|| JsValue::from_str("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .cloned()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let sample_count = if adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(settings.sample_count())
        {
            settings.sample_count()
        } else {
            1
        };

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config, sample_count);
        let msaa_view = create_msaa_view(&device, &config, sample_count);

        let land_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("land-toon-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(LAND_SHADER)),
        });
        let outline_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("land-outline-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(OUTLINE_SHADER)),
        });

        let scene_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("land-scene-uniform"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let outline_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("land-outline-uniform"),
            contents: bytemuck::bytes_of(&OutlineSettings::default().uniform()),
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
        });

        let scene_bgl = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("land-scene-bgl"),
            entries: &[uniform_layout_entry()],
        });
        let outline_bgl = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("land-outline-bgl"),
            entries: &[uniform_layout_entry()],
        });

        let scene_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("land-scene-bg"),
            layout: &scene_bgl,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });
        let outline_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("land-outline-bg"),
            layout: &outline_bgl,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: outline_buffer.as_entire_binding(),
            }],
        });

        let land_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("land-pipeline-layout"),
            bind_group_layouts: &[&scene_bgl],
            immediate_size: 0,
        });
        let outline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("land-outline-pipeline-layout"),
            bind_group_layouts: &[&scene_bgl, &outline_bgl],
            immediate_size: 0,
        });

        let multisample = ::wgpu::MultisampleState {
            count: sample_count,
            ..Default::default()
        };
        let buffers = vertex_layouts();

        let land_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("land-toon-pipeline"),
            layout: Some(&land_layout),
            vertex: ::wgpu::VertexState {
                module: &land_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(::wgpu::FragmentState {
                module: &land_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::REPLACE),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: Some(::wgpu::Face::Back),
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample,
            multiview_mask: None,
            cache: None,
        });

        // Inverted hull: only back faces survive, pushed outward in clip space.
        let outline_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("land-outline-pipeline"),
            layout: Some(&outline_layout),
            vertex: ::wgpu::VertexState {
                module: &outline_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(::wgpu::FragmentState {
                module: &outline_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: Some(::wgpu::Face::Front),
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::LessEqual,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample,
            multiview_mask: None,
            cache: None,
        });

        let mesh = BoxMesh::unit();
        let vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("land-box-vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("land-box-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            sample_count,
            land_pipeline,
            outline_pipeline,
            scene_buffer,
            scene_bind_group,
            outline_buffer,
            outline_bind_group,
            depth_view,
            msaa_view,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
            instance_capacity,
        })
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config, ctx.sample_count);
        ctx.msaa_view = create_msaa_view(&ctx.device, &ctx.config, ctx.sample_count);
    }

    pub fn render_frame(
        ctx: &mut WgpuContext,
        frame: &RenderFrame,
        scene: &SceneUniform,
        outline: &OutlineSettings,
    ) -> Result<(), JsValue> {
        if frame.instances.len() > ctx.instance_capacity {
            ctx.instance_capacity = frame.instances.len().next_power_of_two();
            ctx.instance_buffer = create_instance_buffer(&ctx.device, ctx.instance_capacity);
        }
        if !frame.instances.is_empty() {
            ctx.queue.write_buffer(
                &ctx.instance_buffer,
                0,
                bytemuck::cast_slice(&frame.instances),
            );
        }
        ctx.queue
            .write_buffer(&ctx.scene_buffer, 0, bytemuck::bytes_of(scene));
        let outline_uniform: OutlineUniform = outline.uniform();
        ctx.queue
            .write_buffer(&ctx.outline_buffer, 0, bytemuck::bytes_of(&outline_uniform));

        let surface_texture = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let surface_view = surface_texture
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let (view, resolve_target) = match &ctx.msaa_view {
            Some(msaa) => (msaa, Some(&surface_view)),
            None => (&surface_view, None),
        };

        let [r, g, b, a] = frame.clear_color;
        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("land-frame-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("land-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            let instance_count = frame.instances.len() as u32;
            if instance_count > 0 {
                rpass.set_vertex_buffer(0, ctx.vertex_buffer.slice(..));
                rpass.set_vertex_buffer(1, ctx.instance_buffer.slice(..));
                rpass.set_index_buffer(ctx.index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);

                rpass.set_pipeline(&ctx.land_pipeline);
                rpass.set_bind_group(0, &ctx.scene_bind_group, &[]);
                rpass.draw_indexed(0..ctx.index_count, 0, 0..instance_count);

                if outline.enabled {
                    rpass.set_pipeline(&ctx.outline_pipeline);
                    rpass.set_bind_group(0, &ctx.scene_bind_group, &[]);
                    rpass.set_bind_group(1, &ctx.outline_bind_group, &[]);
                    rpass.draw_indexed(0..ctx.index_count, 0, 0..instance_count);
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use gpu::outline::OutlineSettings;
    use gpu::{RenderFrame, RenderSettings, SceneUniform};
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    pub async fn init_wgpu(
        _canvas: web_sys::HtmlCanvasElement,
        _width: u32,
        _height: u32,
        _settings: RenderSettings,
    ) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render_frame(
        _ctx: &mut WgpuContext,
        _frame: &RenderFrame,
        _scene: &SceneUniform,
        _outline: &OutlineSettings,
    ) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

pub use imp::{WgpuContext, init_wgpu, render_frame, resize_wgpu};
