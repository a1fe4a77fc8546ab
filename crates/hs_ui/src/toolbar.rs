//! The in-game toolbar, rendered via egui on top of the scene.
//!
//! Integration pattern: egui needs a four-phase render split because
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run the UI, collect button actions, tessellate
//!   2. `upload()`  -- upload egui textures / buffers (borrows encoder)
//!   3. `paint()`   -- render in a fresh pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui dropped
//!
//! Button actions are returned from `prepare()` rather than applied in
//! place; the main loop applies them after the frame's draw calls complete,
//! so a toggle never changes state mid-frame.

use winit::window::Window;

/// Screen-space band (physical pixels from the top) reserved for the
/// toolbar. World clicks inside this band are ignored by the editor.
pub const TOOLBAR_HEIGHT: f32 = 80.0;

#[derive(Debug, Clone, Default)]
pub struct ToolbarStats {
    pub fps: f64,
    pub platform_count: usize,
    pub editor_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ToolbarActions {
    /// User clicked the editor toggle this frame.
    pub toggle_editor: bool,
}

pub struct Toolbar {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Toolbar {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        stats: &ToolbarStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        ToolbarActions,
    ) {
        let mut actions = ToolbarActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::TopBottomPanel::top("toolbar")
                .exact_height(TOOLBAR_HEIGHT)
                .show(ctx, |ui| {
                    ui.horizontal_centered(|ui| {
                        let toggle_label = if stats.editor_active {
                            "Stop editing"
                        } else {
                            "Edit level"
                        };
                        if ui.button(toggle_label).clicked() {
                            actions.toggle_editor = true;
                        }

                        ui.separator();
                        ui.label(format!("FPS: {:.0}", stats.fps));
                        ui.label(format!("Platforms: {}", stats.platform_count));

                        if stats.editor_active {
                            ui.separator();
                            ui.label("left click: place platform / right click: remove");
                        }
                    });
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures egui no longer references. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
