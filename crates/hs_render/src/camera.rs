//! 2D camera with a y-down world.
//!
//! World coordinates grow rightward and **downward** (positive vertical
//! velocity means falling), matching the top-left anchoring used by level
//! geometry. The orthographic projection flips the vertical axis so that
//! convention lands correctly in clip space.

use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct Camera2D {
    /// World point at the center of the window.
    pub position: Vec2,
    /// World-to-screen scale; the game recomputes this every frame as
    /// window height / virtual height.
    pub zoom: f32,
    /// Window size in physical pixels.
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let half_w = (self.viewport.0 as f32) / (2.0 * self.zoom);
        let half_h = (self.viewport.1 as f32) / (2.0 * self.zoom);

        // bottom/top swapped relative to the usual y-up ortho: larger world y
        // is lower on screen.
        let proj = Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y + half_h,
            self.position.y - half_h,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }

    /// Map a window-relative cursor position (physical pixels) to world
    /// space. Screen y and world y both point down, so no axis flip.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let center = Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32) * 0.5;
        self.position + (screen - center) / self.zoom
    }
}
