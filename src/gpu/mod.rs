//! Scene renderer.
//!
//! Uploads the static [`Scene`] once at startup and redraws it every frame
//! from the current camera. Nothing in the scene changes after upload; the
//! per-frame inputs are the camera uniform and the clear colour.

pub mod camera;
#[cfg(feature = "egui")]
pub mod egui_integration;
pub mod instanced;
pub mod lines;
pub mod mesh;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::{CameraState, Projection};
use crate::error::GpuError;
use crate::orbit::Backdrop;
use crate::scene::{Color, Scene};

use camera::CameraUniform;
use instanced::{InstanceRaw, InstancedMesh};
use lines::LineState;
use mesh::Mesh;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Arrow cone dimensions, before scaling by arrow length.
const ARROW_RADIUS_TOP: f32 = 0.01;
const ARROW_RADIUS_BOTTOM: f32 = 0.15;
const ARROW_SEGMENTS: u32 = 12;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    arrows: InstancedMesh,
    grid: InstancedMesh,
    labels: LineState,
    projection: Projection,
    clear_color: Color,
    #[cfg(feature = "egui")]
    egui: egui_integration::EguiIntegration,
    #[cfg(feature = "egui")]
    ui_frame: Option<egui_integration::EguiFrameOutput>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, scene: &Scene, projection: Projection) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&surface_caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
        if surface_format.is_srgb() {
            log::warn!("No linear surface format available, colours will render lighter");
        }
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let camera_uniform = CameraUniform::new(&CameraState::default(), &projection, aspect(&config));
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::bytes_of(&camera_uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = camera::bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let mesh_pipeline = instanced::create_pipeline(&device, &camera_layout, surface_format);

        let arrow_instances: Vec<InstanceRaw> = scene.arrows.iter().map(InstanceRaw::from_arrow).collect();
        let arrows = InstancedMesh::new(
            &device,
            "Arrow",
            &Mesh::cone(ARROW_RADIUS_TOP, ARROW_RADIUS_BOTTOM, ARROW_SEGMENTS),
            &arrow_instances,
        );

        let grid_instances: Vec<InstanceRaw> =
            scene.grid_lines.iter().map(InstanceRaw::from_grid_line).collect();
        let grid = InstancedMesh::new(&device, "Grid", &Mesh::cube(), &grid_instances);

        let labels = LineState::new(&device, &camera_layout, surface_format, &lines::label_segments(scene));

        log::debug!(
            "Uploaded {} arrows, {} grid boxes, {} label strokes",
            arrows.instance_count(),
            grid.instance_count(),
            labels.segment_count()
        );

        #[cfg(feature = "egui")]
        let egui = egui_integration::EguiIntegration::new(&device, surface_format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            camera_buffer,
            camera_bind_group,
            mesh_pipeline,
            arrows,
            grid,
            labels,
            projection,
            clear_color: Color::BACKGROUND,
            #[cfg(feature = "egui")]
            egui,
            #[cfg(feature = "egui")]
            ui_frame: None,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(winit::dpi::PhysicalSize::new(self.config.width, self.config.height));
    }

    #[cfg(feature = "egui")]
    pub fn egui_mut(&mut self) -> &mut egui_integration::EguiIntegration {
        &mut self.egui
    }

    /// Queue a finished egui frame to be drawn by the next `render`.
    #[cfg(feature = "egui")]
    pub fn submit_ui(&mut self, frame: egui_integration::EguiFrameOutput) {
        self.ui_frame = Some(frame);
    }

    pub fn render(&mut self, camera: &CameraState) -> Result<(), wgpu::SurfaceError> {
        let uniform = CameraUniform::new(camera, &self.projection, aspect(&self.config));
        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        let [r, g, b] = self.clear_color.to_array();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            render_pass.set_pipeline(&self.mesh_pipeline);
            self.grid.draw(&mut render_pass);
            self.arrows.draw(&mut render_pass);

            self.labels.draw(&mut render_pass);
        }

        #[cfg(feature = "egui")]
        let ui_commands = self.render_ui(&mut encoder, &view);
        #[cfg(not(feature = "egui"))]
        let ui_commands: Vec<wgpu::CommandBuffer> = Vec::new();

        self.queue
            .submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }

    #[cfg(feature = "egui")]
    fn render_ui(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) -> Vec<wgpu::CommandBuffer> {
        let Some(frame) = self.ui_frame.take() else {
            return Vec::new();
        };

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: frame.pixels_per_point,
        };

        let commands = self
            .egui
            .prepare(&self.device, &self.queue, encoder, &frame, &screen_descriptor);
        self.egui.render(encoder, view, &frame, &screen_descriptor);
        self.egui.cleanup(&frame);
        commands
    }
}

impl Backdrop for GpuState {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }
}

/// Prefer a non-sRGB format: scene colours are written as given, so
/// `#f0f0f0` reaches the screen as `#f0f0f0`.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn aspect(config: &wgpu::SurfaceConfiguration) -> f32 {
    config.width as f32 / config.height.max(1) as f32
}

fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
