//! Hopscotch -- a small platformer with an in-game level editor.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a fixed-timestep model
//! (see `FrameTimer`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed the accumulator
//!   2. `while should_step()` -- player physics + animation in fixed slices
//!   3. Editor click handling, once per rendered frame
//!   4. Camera follow + zoom from window height, sprite mesh rebuild
//!   5. Scene render pass, then the egui toolbar composited on top
//!
//! Toolbar button actions are applied after the frame is presented, and the
//! level is written back to disk exactly once, from the event loop's
//! `exiting` hook.

mod assets;
mod editor;
mod level;
mod player;

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use hs_core::animation::AnimationVariant;
use hs_core::input::{InputState, Key, MouseBtn};
use hs_core::time::FrameTimer;
use hs_platform::window::PlatformConfig;
use hs_render::{Camera2D, GpuContext, SpritePipeline, SpriteVertex, Texture};
use hs_ui::{Toolbar, ToolbarStats};

use editor::Editor;
use level::{platform_collider, Level, Rect};
use player::{Player, PlayerInput};

const LEVEL_PATH: &str = "level.json";

/// The camera always shows this many world pixels of height; zoom follows
/// the window size.
const VIRTUAL_HEIGHT: f32 = 360.0;

const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.392,
    g: 0.584,
    b: 0.929,
    a: 1.0,
};

const SPRITE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const FULL_SHEET_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// The three textures this program ever binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetKey {
    PlayerRun,
    PlayerIdle,
    Platform,
}

/// A contiguous run of indices sharing one texture binding. Consecutive
/// quads with the same sheet merge, so all platforms land in a single
/// indexed draw.
#[derive(Debug, Clone, Copy)]
struct DrawCall {
    key: SheetKey,
    index_start: u32,
    index_count: u32,
}

struct Sheets {
    run: wgpu::BindGroup,
    idle: wgpu::BindGroup,
    platform: wgpu::BindGroup,
}

impl Sheets {
    fn bind_group(&self, key: SheetKey) -> &wgpu::BindGroup {
        match key {
            SheetKey::PlayerRun => &self.run,
            SheetKey::PlayerIdle => &self.idle,
            SheetKey::Platform => &self.platform,
        }
    }
}

/// All mutable state, constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface exist.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    timer: FrameTimer,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    toolbar: Toolbar,

    level: Level,
    player: Player,
    editor: Editor,
    level_dirty: bool,
    sheets: Sheets,

    // Per-frame GPU mesh state: rebuilt on the CPU, streamed into buffers
    // that grow power-of-two and never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let timer = FrameTimer::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let toolbar = Toolbar::new(&gpu.device, gpu.surface_format, &window);

        let level = Level::load(Path::new(LEVEL_PATH));
        let player = Player::new(Vec2::ZERO, assets::player_animations());

        let sheets = Sheets {
            run: upload_sheet(&gpu, &sprite_pipeline, assets::RUN_SHEET_BYTES, "player_run"),
            idle: upload_sheet(&gpu, &sprite_pipeline, assets::IDLE_SHEET_BYTES, "player_idle"),
            platform: upload_sheet(&gpu, &sprite_pipeline, assets::PLATFORM_BYTES, "platform"),
        };

        let mut camera = Camera2D::new(gpu.size.0, gpu.size.1);
        camera.zoom = gpu.size.1 as f32 / VIRTUAL_HEIGHT;
        camera.position = player.position;

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            timer,
            input,
            camera,
            sprite_pipeline,
            toolbar,
            level,
            player,
            editor: Editor::default(),
            level_dirty: false,
            sheets,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
        };
        state.rebuild_mesh();
        state
    }

    fn rebuild_mesh(&mut self) {
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<SpriteVertex>, Vec<u32>, Vec<DrawCall>) {
        let quad_count = self.level.platforms().len() + 1;
        let mut vertices = Vec::with_capacity(quad_count * 4);
        let mut indices = Vec::with_capacity(quad_count * 6);
        let mut draw_calls = Vec::with_capacity(2);

        // Platforms first: they all share one sheet, so the whole layer
        // merges into a single draw call.
        for &platform in self.level.platforms() {
            push_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                SheetKey::Platform,
                platform_collider(platform),
                FULL_SHEET_UV,
            );
        }

        // Player on top, anchored feet-down at its position.
        let size = assets::PLAYER_SPRITE_SIZE;
        let dest = Rect::new(
            self.player.position.x - size * 0.5,
            self.player.position.y - size,
            size,
            size,
        );
        let sheet = match self.player.animations.active() {
            AnimationVariant::Run => SheetKey::PlayerRun,
            AnimationVariant::Idle => SheetKey::PlayerIdle,
        };
        let uv = self.player.animations.current_uv(self.player.flipped);
        push_quad(
            &mut vertices,
            &mut indices,
            &mut draw_calls,
            sheet,
            dest,
            uv,
        );

        (vertices, indices, draw_calls)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    /// Translate this frame's pointer edges into level edits. Runs once per
    /// rendered frame with the camera the player is currently looking at.
    fn handle_editor_input(&mut self) {
        if !self.editor.active {
            return;
        }
        let (cx, cy) = self.input.cursor_position;
        let world = self.camera.screen_to_world(Vec2::new(cx as f32, cy as f32));

        if self.input.is_mouse_just_pressed(MouseBtn::Left)
            && self.editor.place_platform(&mut self.level, world, cy as f32)
        {
            self.level_dirty = true;
        }
        if self.input.is_mouse_just_pressed(MouseBtn::Right)
            && self.editor.remove_platform(&mut self.level, world, cy as f32)
        {
            self.level_dirty = true;
        }
    }

    fn player_input(&self) -> PlayerInput {
        let mut move_x = 0.0;
        if self.input.is_held(Key::Left) || self.input.is_held(Key::A) {
            move_x -= 1.0;
        }
        if self.input.is_held(Key::Right) || self.input.is_held(Key::D) {
            move_x += 1.0;
        }
        let jump_pressed = self.input.is_just_pressed(Key::Space)
            || self.input.is_just_pressed(Key::W)
            || self.input.is_just_pressed(Key::Up);
        PlayerInput {
            move_x,
            jump_pressed,
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = hs_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // The one persistence point: whatever the editor produced goes back
        // to disk, failures swallowed inside `save`.
        if let Some(state) = &self.state {
            state.level.save(Path::new(LEVEL_PATH));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.toolbar.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.cursor_position = (position.x, position.y);
            }

            WindowEvent::MouseInput { state: btn_state, button, .. } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    match btn_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // --- Simulation: fixed steps ---------------------------------
                state.timer.begin_frame();
                while state.timer.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        event_loop.exit();
                        return;
                    }

                    let input = state.player_input();
                    let dt = state.timer.fixed_dt as f32;
                    state.player.step(input, dt, &state.level);
                    state.player.animations.advance_active(state.timer.fixed_dt_us);
                }

                // --- Editor: once per rendered frame -------------------------
                state.handle_editor_input();
                state.input.clear_pointer_edges();

                // --- Camera follows the player; zoom tracks window height ----
                state.camera.viewport = state.gpu.size;
                state.camera.zoom = state.gpu.size.1 as f32 / VIRTUAL_HEIGHT;
                state.camera.position = state.player.position;

                if state.timer.steps_this_frame > 0 || state.level_dirty {
                    state.rebuild_mesh();
                    state.level_dirty = false;
                }

                // --- Render ---------------------------------------------------
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let stats = ToolbarStats {
                    fps: state.timer.fps(),
                    platform_count: state.level.platforms().len(),
                    editor_active: state.editor.active,
                };
                let (egui_primitives, egui_textures_delta, toolbar_actions) =
                    state.toolbar.prepare(&state.window, &stats);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(SKY_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    let mut bound: Option<SheetKey> = None;
                    for draw in &state.draw_calls {
                        if bound != Some(draw.key) {
                            render_pass.set_bind_group(1, state.sheets.bind_group(draw.key), &[]);
                            bound = Some(draw.key);
                        }
                        render_pass.draw_indexed(
                            draw.index_start..(draw.index_start + draw.index_count),
                            0,
                            0..1,
                        );
                    }
                }

                state.toolbar.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("Toolbar Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .toolbar
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.toolbar.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Toolbar actions apply only after the frame's draws are done,
                // so a toggle takes effect starting next frame.
                if toolbar_actions.toggle_editor {
                    state.editor.toggle();
                }

                // Key edges survive frames with zero simulation steps; a jump
                // press is only cleared once a step had the chance to see it.
                if state.timer.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn upload_sheet(
    gpu: &GpuContext,
    pipeline: &SpritePipeline,
    bytes: &[u8],
    label: &str,
) -> wgpu::BindGroup {
    let texture = Texture::from_bytes(&gpu.device, &gpu.queue, bytes, label);
    pipeline.create_texture_bind_group(&gpu.device, &texture)
}

/// Emit one textured quad. `rect` is in y-down world space; `uv` is
/// `[u0, v0, u1, v1]` with v0 at the top of the sprite.
fn push_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    key: SheetKey,
    rect: Rect,
    uv: [f32; 4],
) {
    let [u0, v0, u1, v1] = uv;
    let base_index = vertices.len() as u32;

    vertices.push(SpriteVertex {
        position: [rect.x, rect.y],
        tex_coords: [u0, v0],
        color: SPRITE_WHITE,
    });
    vertices.push(SpriteVertex {
        position: [rect.x + rect.w, rect.y],
        tex_coords: [u1, v0],
        color: SPRITE_WHITE,
    });
    vertices.push(SpriteVertex {
        position: [rect.x + rect.w, rect.y + rect.h],
        tex_coords: [u1, v1],
        color: SPRITE_WHITE,
    });
    vertices.push(SpriteVertex {
        position: [rect.x, rect.y + rect.h],
        tex_coords: [u0, v1],
        color: SPRITE_WHITE,
    });

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, key, draw_start, 6);
}

/// Append a draw call, merging with the previous one when the sheet matches
/// and the index ranges are contiguous.
fn push_draw_call(draw_calls: &mut Vec<DrawCall>, key: SheetKey, index_start: u32, index_count: u32) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.key == key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        key,
        index_start,
        index_count,
    });
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Hopscotch starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
