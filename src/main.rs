// Surface crawler demo: a crowd of walkers wandering over a mesh.
// The surface and every walker prop go through one instanced pipeline:
// one draw call for the surface, one for all walkers.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use surface_crawlers::engine::camera::OrbitCamera;
use surface_crawlers::engine::config::AppConfig;
use surface_crawlers::engine::debug_overlay::{DebugOverlay, DebugStats, WalkerDebugDraw};
use surface_crawlers::engine::input::InputState;
use surface_crawlers::engine::mesh::{GpuVertex, PolyMesh, RenderMesh, triangulate_flat};
use surface_crawlers::engine::shapes::surface_mesh;
use surface_crawlers::engine::{StdRandom, TickStats, WalkSurface, WalkerPopulation};

const CONFIG_PATH: &str = "config/app.json";
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const SURFACE_COLOR: [f32; 4] = [0.8, 0.6, 0.1, 1.0];
/// Heading arrow length for the F4 overlay, in surface units.
const HEADING_ARROW_LEN: f32 = 0.08;

// ============================================================================
// INSTANCE DATA (per-draw model matrix + color)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self { model: model.to_cols_array_2d(), color }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,  // One per instance, not per vertex
            attributes: &ATTRIBUTES,
        }
    }
}

// ============================================================================
// UNIFORM DATA
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4) -> Self {
        let light = Vec3::new(-0.4, -1.0, -0.3).normalize();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir: light.extend(0.0).to_array(),
        }
    }
}

// ============================================================================
// GPU MESH
// ============================================================================

/// A RenderMesh uploaded to the GPU, drawn indexed or as plain triples.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &RenderMesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = mesh.is_indexed().then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: mesh.index_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        let count = if mesh.is_indexed() { mesh.index_count() } else { mesh.vertices.len() };
        Self { vertex_buffer, index_buffer, count: count as u32 }
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, instances: u32) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(indices) => {
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.count, 0, 0..instances);
            }
            None => pass.draw(0..self.count, 0..instances),
        }
    }
}

/// Walker prop: a flat arrowhead pointing along -Z with its back raised on +Y.
fn prop_mesh() -> RenderMesh {
    let mut poly = PolyMesh::new();
    let tip = poly.add_vertex(Vec3::new(0.0, 0.1, -1.0));
    let left = poly.add_vertex(Vec3::new(-0.6, 0.1, 0.6));
    let right = poly.add_vertex(Vec3::new(0.6, 0.1, 0.6));
    let top = poly.add_vertex(Vec3::new(0.0, 0.6, 0.3));
    poly.add_face(vec![tip, top, left]);
    poly.add_face(vec![tip, right, top]);
    poly.add_face(vec![left, top, right]);
    poly.add_face(vec![tip, left, right]);
    triangulate_flat(&poly)
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
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

// ============================================================================
// FRAME TIMING
// ============================================================================

/// Once-per-second roll-up of frame times and walker outcomes.
struct FrameCounter {
    window_start: Instant,
    frames: u32,
    frame_ms_sum: f32,
    frame_ms_min: f32,
    frame_ms_max: f32,
    ticks: TickStats,
    /// Last completed second, shown in the overlay.
    fps: u32,
    avg_ms: f32,
    min_ms: f32,
    max_ms: f32,
    last_ticks: TickStats,
}

impl FrameCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            frame_ms_sum: 0.0,
            frame_ms_min: f32::MAX,
            frame_ms_max: 0.0,
            ticks: TickStats::default(),
            fps: 0,
            avg_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
            last_ticks: TickStats::default(),
        }
    }

    /// Record one frame. Returns true when a full second has just rolled over.
    fn record(&mut self, frame_ms: f32, tick: TickStats) -> bool {
        self.frames += 1;
        self.frame_ms_sum += frame_ms;
        self.frame_ms_min = self.frame_ms_min.min(frame_ms);
        self.frame_ms_max = self.frame_ms_max.max(frame_ms);
        self.ticks.accumulate(tick);

        if self.window_start.elapsed().as_secs_f32() < 1.0 {
            return false;
        }
        self.fps = self.frames;
        self.avg_ms = self.frame_ms_sum / self.frames as f32;
        self.min_ms = self.frame_ms_min;
        self.max_ms = self.frame_ms_max;
        self.last_ticks = self.ticks;

        self.window_start = Instant::now();
        self.frames = 0;
        self.frame_ms_sum = 0.0;
        self.frame_ms_min = f32::MAX;
        self.frame_ms_max = 0.0;
        self.ticks = TickStats::default();
        true
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    surface_mesh: GpuMesh,
    surface_instance: wgpu::Buffer,
    prop_mesh: GpuMesh,
    walker_instances: wgpu::Buffer,

    population: WalkerPopulation,
    surface_transform: Mat4,
    prop_transform: Mat4,

    camera: OrbitCamera,
    input: InputState,
    overlay: DebugOverlay,
    show_headings: bool,

    last_update: Instant,
    simulation_ms: f32,
    frames: FrameCounter,
}

impl State {
    async fn new(window: Arc<Window>, app_config: &AppConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter compatible with the window surface")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader_surface.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::new(Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::desc(), InstanceData::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Flat surfaces are visible from both sides.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let depth_view = create_depth_view(&device, config.width, config.height);

        // Simulation
        let sim = &app_config.simulation;
        let mut mesh = surface_mesh(sim.surface, sim.subdivisions);
        if sim.non_indexed {
            mesh = mesh.to_non_indexed();
        }
        let mut rng = match sim.seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };
        let walk_surface = WalkSurface::new(mesh).context("surface mesh rejected")?;
        let population = WalkerPopulation::new(walk_surface, sim.walker_count, sim.speed, &mut rng)?;

        let surface_mesh = GpuMesh::upload(&device, "Surface Mesh", population.surface().mesh());
        let prop_mesh = GpuMesh::upload(&device, "Prop Mesh", &prop_mesh());

        let surface_transform = Mat4::from_scale(Vec3::splat(app_config.render.surface_scale));
        let prop_transform = Mat4::from_scale(Vec3::splat(app_config.render.prop_scale));

        let surface_instance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Instance Buffer"),
            contents: bytemuck::cast_slice(&[InstanceData::new(surface_transform, SURFACE_COLOR)]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let walker_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Walker Instance Buffer"),
            size: (population.len().max(1) * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let overlay = DebugOverlay::new(&window, &device, config.format);
        let camera = OrbitCamera::new(Vec3::ZERO, app_config.render.surface_scale * 3.0);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            depth_view,
            uniform_buffer,
            uniform_bind_group,
            surface_mesh,
            surface_instance,
            prop_mesh,
            walker_instances,
            population,
            surface_transform,
            prop_transform,
            camera,
            input: InputState::new(),
            overlay,
            show_headings: false,
            last_update: Instant::now(),
            simulation_ms: 0.0,
            frames: FrameCounter::new(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;

        self.camera.update(&self.input, dt);
        if self.input.was_pressed(KeyCode::F3) {
            self.overlay.toggle();
        }
        if self.input.was_pressed(KeyCode::F4) {
            self.show_headings = !self.show_headings;
        }

        let sim_start = Instant::now();
        let tick = self.population.update();
        self.simulation_ms = sim_start.elapsed().as_secs_f32() * 1000.0;

        if self.frames.record(dt * 1000.0, tick) {
            log::info!(
                "FPS: {} | Walkers: {} | Crossings/s: {} | Bounces/s: {}",
                self.frames.fps,
                self.population.len(),
                self.frames.last_ticks.crossed,
                self.frames.last_ticks.bounced,
            );
        }

        self.input.end_frame();
    }

    fn aspect(&self) -> f32 {
        self.size.width.max(1) as f32 / self.size.height.max(1) as f32
    }

    /// Walker heading arrows projected into egui points.
    fn heading_draws(&mut self, view_proj: Mat4) -> Vec<WalkerDebugDraw> {
        let to_clip = view_proj * self.surface_transform;
        let (w, h) = (self.size.width as f32, self.size.height as f32);
        let ppp = self.window.scale_factor() as f32;
        let project = |p: Vec3| -> Option<egui::Pos2> {
            let clip = to_clip * p.extend(1.0);
            if clip.w <= 0.0 {
                return None;
            }
            let ndc = clip / clip.w;
            Some(egui::pos2(
                (ndc.x * 0.5 + 0.5) * w / ppp,
                (0.5 - ndc.y * 0.5) * h / ppp,
            ))
        };

        let mut draws = Vec::with_capacity(self.population.len());
        self.population.for_each(|walker, _| {
            let from = project(walker.position());
            let to = project(walker.position() + walker.velocity() * HEADING_ARROW_LEN);
            if let (Some(pos), Some(heading_tip)) = (from, to) {
                draws.push(WalkerDebugDraw { pos, heading_tip });
            }
        });
        draws
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Collect instance data BEFORE creating the render pass
        let surface_transform = self.surface_transform;
        let prop_transform = self.prop_transform;
        let mut instance_data = Vec::with_capacity(self.population.len());
        self.population.for_each(|walker, tint| {
            instance_data.push(InstanceData::new(
                surface_transform * walker.transform() * prop_transform,
                tint.to_array(),
            ));
        });
        if !instance_data.is_empty() {
            self.queue.write_buffer(&self.walker_instances, 0, bytemuck::cast_slice(&instance_data));
        }

        let view_proj = self.camera.view_projection(self.aspect());
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[Uniforms::new(view_proj)]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            render_pass.set_vertex_buffer(1, self.surface_instance.slice(..));
            self.surface_mesh.draw(&mut render_pass, 1);

            if !instance_data.is_empty() {
                render_pass.set_vertex_buffer(1, self.walker_instances.slice(..));
                self.prop_mesh.draw(&mut render_pass, instance_data.len() as u32);
            }
        }

        if self.overlay.visible || self.show_headings {
            let headings = self.show_headings.then(|| self.heading_draws(view_proj));
            let stats = self.overlay.visible.then(|| self.debug_stats());
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: self.window.scale_factor() as f32,
            };
            self.overlay.render(
                &self.device,
                &self.queue,
                &mut encoder,
                &self.window,
                &view,
                &screen_descriptor,
                stats.as_ref(),
                headings.as_deref(),
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn debug_stats(&self) -> DebugStats {
        let surface = self.population.surface();
        DebugStats {
            fps: self.frames.fps,
            frame_time_avg_ms: self.frames.avg_ms,
            frame_time_min_ms: self.frames.min_ms,
            frame_time_max_ms: self.frames.max_ms,
            walker_count: self.population.len(),
            triangle_count: surface.triangle_count(),
            indexed: surface.mesh().is_indexed(),
            crossings_per_sec: self.frames.last_ticks.crossed,
            bounces_per_sec: self.frames.last_ticks.bounced,
            simulation_ms: self.simulation_ms,
            draw_calls: 2,
            resolution: (self.size.width, self.size.height),
            camera_distance: self.camera.distance(),
            camera_yaw_deg: self.camera.yaw.to_degrees(),
            camera_pitch_deg: self.camera.pitch().to_degrees(),
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    env_logger::init();

    let app_config = AppConfig::load_or_default(CONFIG_PATH);

    let event_loop = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_title(app_config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            app_config.window.width,
            app_config.window.height,
        ));

    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut state = pollster::block_on(State::new(window.clone(), &app_config))?;

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let response = state.overlay.handle_window_event(&window, event);
                if !response.consumed {
                    state.input.process_event(event);
                }

                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => control_flow.exit(),
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update();
                        match state.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("GPU out of memory, exiting");
                                control_flow.exit();
                            }
                            Err(e) => log::warn!("surface error: {e:?}"),
                        }
                    }
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_layout_matches_shader_locations() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
        let layout = InstanceData::desc();
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn prop_points_forward() {
        let prop = prop_mesh();
        assert_eq!(prop.triangle_count(), 4);
        let tip_z = prop.vertices.iter().map(|v| v.position[2]).fold(f32::MAX, f32::min);
        assert_eq!(tip_z, -1.0);
    }
}
