//! WebGPU image pipeline
//!
//! Every recorded [`Image`](super::Image) becomes one textured quad. Quads share a
//! single vertex buffer per frame; each texture has its own bind group.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::headless::FrameRecorder;
use super::vertex::{QUAD_VERTICES, TexturedVertex, quad_vertices};
use super::{TextLabel, Texture, TextureId, TextureProvider};
use crate::consts::BACKGROUND;
use crate::error::{AssetError, RenderError};

/// Decoded RGBA8 pixels, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// Check the buffer matches the dimensions and is not empty
    pub fn validate(&self, name: &str) -> Result<(), AssetError> {
        if self.width == 0 || self.height == 0 {
            return Err(AssetError::Decode {
                name: name.to_string(),
                reason: format!("empty image ({}x{})", self.width, self.height),
            });
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(AssetError::Decode {
                name: name.to_string(),
                reason: format!("expected {expected} bytes, got {}", self.pixels.len()),
            });
        }
        Ok(())
    }
}

/// Produces pixels for bundled textures and text labels
pub trait PixelSource {
    fn image(&mut self, name: &str) -> Result<RgbaImage, AssetError>;

    fn text(&mut self, label: &TextLabel) -> Result<RgbaImage, AssetError>;
}

/// Slot storage with id reuse
#[derive(Debug)]
struct Slots<T> {
    items: Vec<Option<T>>,
    free: Vec<u32>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Slots<T> {
    fn insert(&mut self, item: T) -> u32 {
        if let Some(id) = self.free.pop() {
            self.items[id as usize] = Some(item);
            id
        } else {
            self.items.push(Some(item));
            (self.items.len() - 1) as u32
        }
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.items.get(id as usize).and_then(Option::as_ref)
    }

    fn remove(&mut self, id: u32) -> Option<T> {
        let item = self.items.get_mut(id as usize)?.take();
        if item.is_some() {
            self.free.push(id);
        }
        item
    }
}

/// GPU textures shared between the renderer and the texture providers
#[derive(Clone)]
struct TextureStore {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_groups: Rc<RefCell<Slots<wgpu::BindGroup>>>,
}

impl TextureStore {
    fn upload(&self, name: &str, image: &RgbaImage) -> Result<Texture, AssetError> {
        image.validate(name)?;

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(name),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let id = self.bind_groups.borrow_mut().insert(bind_group);
        log::debug!("Uploaded texture `{name}` ({}x{}) as #{id}", image.width, image.height);

        Ok(Texture {
            id: TextureId(id),
            width: image.width,
            height: image.height,
        })
    }

    fn release(&self, texture: TextureId) {
        self.bind_groups.borrow_mut().remove(texture.0);
    }
}

/// Texture provider backed by GPU textures
pub struct GpuTextures<S> {
    store: TextureStore,
    source: S,
    named: HashMap<String, Texture>,
}

impl<S: PixelSource> TextureProvider for GpuTextures<S> {
    fn load(&mut self, name: &str) -> Result<Texture, AssetError> {
        if let Some(texture) = self.named.get(name) {
            return Ok(*texture);
        }
        let image = self.source.image(name)?;
        let texture = self.store.upload(name, &image)?;
        self.named.insert(name.to_string(), texture);
        Ok(texture)
    }

    fn text(&mut self, label: &TextLabel) -> Result<Texture, AssetError> {
        let image = self.source.text(label)?;
        self.store.upload(&label.text, &image)
    }

    fn release(&mut self, texture: Texture) {
        if !self.named.values().any(|t| t.id == texture.id) {
            self.store.release(texture.id);
        }
    }
}

/// Surface, pipeline and texture bind groups
pub struct ImageRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    store: TextureStore,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Pixels per layout point
    pub scale: f32,
}

impl ImageRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        scale: f32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rock-n-race-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("image_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("image.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("image_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("image_pipeline_layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("image_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TexturedVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("image_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let store = TextureStore {
            device: device.clone(),
            queue: queue.clone(),
            layout,
            sampler,
            bind_groups: Rc::new(RefCell::new(Slots::default())),
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            store,
            size: (width, height),
            scale,
        })
    }

    /// A texture provider uploading into this renderer's texture store
    pub fn textures<S: PixelSource>(&self, source: S) -> GpuTextures<S> {
        GpuTextures {
            store: self.store.clone(),
            source,
            named: HashMap::new(),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw one recorded frame and present it
    pub fn render(&mut self, frame: &FrameRecorder) -> Result<(), wgpu::SurfaceError> {
        let drawable_size = Vec2::new(self.size.0 as f32, self.size.1 as f32);
        let vertices: Vec<TexturedVertex> = frame
            .images()
            .iter()
            .flat_map(|image| quad_vertices(image, drawable_size, self.scale))
            .collect();

        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("image_vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("image_encoder"),
            });

        {
            let [r, g, b, a] = BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("image_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));

                let bind_groups = self.store.bind_groups.borrow();
                for (i, image) in frame.images().iter().enumerate() {
                    let Some(bind_group) = bind_groups.get(image.texture.id.0) else {
                        log::warn!("Skipping image with unknown texture #{}", image.texture.id.0);
                        continue;
                    };
                    let first = i as u32 * QUAD_VERTICES;
                    render_pass.set_bind_group(0, bind_group, &[]);
                    render_pass.draw(first..first + QUAD_VERTICES, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
