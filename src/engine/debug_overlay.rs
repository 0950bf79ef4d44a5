// egui overlay drawn on top of the scene: F3 stats panel, F4 heading arrows.

use egui::epaint::Shadow;
use egui::{Color32, Pos2};

const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
const HEADING_COLOR: Color32 = Color32::from_rgba_premultiplied(70, 220, 120, 220);

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub walker_count: usize,
    pub triangle_count: usize,
    pub indexed: bool,
    /// Triangle crossings summed over the last full second.
    pub crossings_per_sec: usize,
    /// Boundary bounces summed over the last full second.
    pub bounces_per_sec: usize,
    /// Time spent stepping the population last frame (ms).
    pub simulation_ms: f32,
    pub draw_calls: u32,
    pub resolution: (u32, u32),
    pub camera_distance: f32,
    pub camera_yaw_deg: f32,
    pub camera_pitch_deg: f32,
}

/// One walker's heading arrow in egui screen points.
pub struct WalkerDebugDraw {
    pub pos: Pos2,
    pub heading_tip: Pos2,
}

pub struct DebugOverlay {
    pub visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        apply_style(&egui_ctx);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        // Overlay pass has no depth attachment and no MSAA.
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Run one egui frame and paint it over `view`. `None` hides a layer.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: Option<&DebugStats>,
        walker_draws: Option<&[WalkerDebugDraw]>,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);
        let output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(draws) = walker_draws {
                paint_headings(ctx, draws);
            }
            if let Some(stats) = stats {
                stats_panel(ctx, stats);
            }
        });
        self.egui_state.handle_platform_output(window, output.platform_output);

        let primitives = self.egui_ctx.tessellate(output.shapes, output.pixels_per_point);
        for (id, delta) in &output.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, delta);
        }
        self.egui_renderer
            .update_buffers(device, queue, encoder, &primitives, screen_descriptor);

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        self.egui_renderer
            .render(&mut pass.forget_lifetime(), &primitives, screen_descriptor);

        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn apply_style(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = PANEL_FILL;
    visuals.window_stroke = egui::Stroke::NONE;
    visuals.window_shadow = Shadow::NONE;
    visuals.override_text_color = Some(Color32::WHITE);
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.override_font_id = Some(egui::FontId::monospace(13.0));
    ctx.set_style(style);
}

fn paint_headings(ctx: &egui::Context, draws: &[WalkerDebugDraw]) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("walker_headings"),
    ));
    let stroke = egui::Stroke::new(1.5, HEADING_COLOR);
    for draw in draws {
        painter.line_segment([draw.pos, draw.heading_tip], stroke);
        painter.circle_filled(draw.heading_tip, 2.0, HEADING_COLOR);
    }
}

fn stats_panel(ctx: &egui::Context, stats: &DebugStats) {
    let layout = if stats.indexed { "indexed" } else { "non-indexed" };
    egui::Area::new(egui::Id::new("walker_stats"))
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(PANEL_FILL)
                .inner_margin(egui::Margin::same(8.0))
                .rounding(4.0)
                .show(ui, |ui| {
                    egui::Grid::new("walker_stats_grid")
                        .num_columns(2)
                        .spacing([12.0, 2.0])
                        .show(ui, |ui| {
                            let mut row = |name: &str, value: String| {
                                ui.label(name);
                                ui.label(value);
                                ui.end_row();
                            };
                            row("FPS", stats.fps.to_string());
                            row(
                                "Frame",
                                format!(
                                    "{:.2} ms ({:.1}..{:.1})",
                                    stats.frame_time_avg_ms,
                                    stats.frame_time_min_ms,
                                    stats.frame_time_max_ms
                                ),
                            );
                            row("Walkers", stats.walker_count.to_string());
                            row("Step", format!("{:.2} ms", stats.simulation_ms));
                            row("Surface", format!("{} tris, {layout}", stats.triangle_count));
                            row("Crossings/s", stats.crossings_per_sec.to_string());
                            row("Bounces/s", stats.bounces_per_sec.to_string());
                            row("Draw calls", stats.draw_calls.to_string());
                            row(
                                "Resolution",
                                format!("{} x {}", stats.resolution.0, stats.resolution.1),
                            );
                            row(
                                "Camera",
                                format!(
                                    "yaw {:.0}° pitch {:.0}° dist {:.1}",
                                    stats.camera_yaw_deg,
                                    stats.camera_pitch_deg,
                                    stats.camera_distance
                                ),
                            );
                        });
                });
        });
}
