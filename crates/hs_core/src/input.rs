//! Keyboard and mouse state with level- and edge-triggered queries.
//!
//! - **Held** queries are true every frame a key is physically down; movement
//!   reads these.
//! - **Just-pressed** queries are true only on the transition frame. Key
//!   edges are cleared by `end_frame()`, which the main loop calls only after
//!   at least one fixed simulation step ran, so a jump press cannot be lost
//!   on a frame whose accumulator produced zero steps.
//! - Pointer edges are cleared separately by `clear_pointer_edges()` every
//!   rendered frame: editor clicks are consumed per frame, not per step, and
//!   must never apply twice.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    W,
    A,
    D,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    pointer_held: HashSet<MouseBtn>,
    pointer_just_pressed: HashSet<MouseBtn>,

    /// Cursor position in physical pixels, window-relative.
    pub cursor_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            pointer_held: HashSet::new(),
            pointer_just_pressed: HashSet::new(),
            cursor_position: (0.0, 0.0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        // OS key-repeat delivers duplicate presses; only a real transition
        // (insert returns true) counts as an edge.
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.pointer_held.insert(btn) {
            self.pointer_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.pointer_held.remove(&btn);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.pointer_just_pressed.contains(&btn)
    }

    /// Clear key edges. Call only after a fixed step consumed them.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear pointer edges. Call once per rendered frame, after editor
    /// handling.
    pub fn clear_pointer_edges(&mut self) {
        self.pointer_just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
