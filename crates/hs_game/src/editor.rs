//! Level editor input handling.
//!
//! While the editor is active, pointer edges translate into level mutations:
//! left click places a platform at the cursor's world position, right click
//! removes the first platform under it. Clicks landing inside the toolbar
//! band are reserved for the GUI and never reach the level.

use glam::Vec2;

use hs_ui::TOOLBAR_HEIGHT;

use crate::level::Level;

#[derive(Debug, Default)]
pub struct Editor {
    pub active: bool,
}

impl Editor {
    pub fn toggle(&mut self) {
        self.active = !self.active;
        log::info!("Editor mode: {}", if self.active { "ON" } else { "OFF" });
    }

    /// Append a platform at `world`. `screen_y` is the cursor's vertical
    /// window position in physical pixels; the toolbar band rejects the
    /// click. Returns whether the level changed.
    pub fn place_platform(&self, level: &mut Level, world: Vec2, screen_y: f32) -> bool {
        if !self.active || screen_y < TOOLBAR_HEIGHT {
            return false;
        }
        level.add_platform(world);
        log::debug!("Placed platform at ({:.1}, {:.1})", world.x, world.y);
        true
    }

    /// Remove the first platform whose collider contains `world`, same band
    /// restriction. Returns whether the level changed.
    pub fn remove_platform(&self, level: &mut Level, world: Vec2, screen_y: f32) -> bool {
        if !self.active || screen_y < TOOLBAR_HEIGHT {
            return false;
        }
        let removed = level.remove_platform_at(world);
        if removed {
            log::debug!("Removed platform at ({:.1}, {:.1})", world.x, world.y);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_editor() -> Editor {
        Editor { active: true }
    }

    #[test]
    fn place_below_band_appends_at_click_point() {
        let mut level = Level::from_platforms(vec![]);
        let editor = active_editor();

        let world = Vec2::new(33.0, -7.5);
        assert!(editor.place_platform(&mut level, world, TOOLBAR_HEIGHT + 1.0));
        assert_eq!(level.platforms(), &[world]);
    }

    #[test]
    fn place_inside_band_is_ignored() {
        let mut level = Level::from_platforms(vec![]);
        let editor = active_editor();

        assert!(!editor.place_platform(&mut level, Vec2::ZERO, TOOLBAR_HEIGHT - 1.0));
        assert!(level.platforms().is_empty());
    }

    #[test]
    fn band_boundary_belongs_to_the_world() {
        let mut level = Level::from_platforms(vec![]);
        let editor = active_editor();

        assert!(editor.place_platform(&mut level, Vec2::ZERO, TOOLBAR_HEIGHT));
        assert_eq!(level.platforms().len(), 1);
    }

    #[test]
    fn inactive_editor_never_mutates() {
        let mut level = Level::from_platforms(vec![Vec2::new(0.0, 0.0)]);
        let editor = Editor::default();

        assert!(!editor.place_platform(&mut level, Vec2::new(5.0, 5.0), 400.0));
        assert!(!editor.remove_platform(&mut level, Vec2::new(5.0, 5.0), 400.0));
        assert_eq!(level.platforms().len(), 1);
    }

    #[test]
    fn remove_hits_first_matching_platform_only() {
        let mut level = Level::from_platforms(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
        ]);
        let editor = active_editor();

        // Point inside both colliders: exactly one (the first) is removed.
        assert!(editor.remove_platform(&mut level, Vec2::new(10.0, 8.0), 400.0));
        assert_eq!(level.platforms(), &[Vec2::new(4.0, 0.0)]);
    }

    #[test]
    fn remove_misses_leave_level_unchanged() {
        let mut level = Level::from_platforms(vec![Vec2::new(0.0, 0.0)]);
        let editor = active_editor();

        assert!(!editor.remove_platform(&mut level, Vec2::new(200.0, 200.0), 400.0));
        assert_eq!(level.platforms().len(), 1);
    }

    #[test]
    fn toggle_flips_active_state() {
        let mut editor = Editor::default();
        editor.toggle();
        assert!(editor.active);
        editor.toggle();
        assert!(!editor.active);
    }
}
