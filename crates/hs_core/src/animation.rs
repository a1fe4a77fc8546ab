//! Sprite animation variants and deterministic frame advancement.
//!
//! The player has a fixed, compiled-in set of animations (idle, run), each a
//! single-row sprite sheet with a uniform per-frame delay. Timing uses integer
//! microseconds (`u64`) so advancement is exact under the fixed-timestep model
//! -- no floating-point drift.
//!
//! Selection is a tagged variant (`AnimationVariant`) indexing into an
//! `AnimationSet` that owns one definition and one cursor per variant.
//! Switching the active variant flips the selector only: each variant keeps
//! its own in-flight frame index and accumulator across switches.

/// One of the fixed animation variants. The set never grows at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationVariant {
    Idle,
    Run,
}

impl AnimationVariant {
    pub const COUNT: usize = 2;

    /// All variants in definition order.
    pub const ALL: &'static [AnimationVariant] = &[AnimationVariant::Idle, AnimationVariant::Run];

    /// Index into per-variant storage.
    pub fn index(self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Run => 1,
        }
    }
}

/// Static description of one single-row sprite-sheet animation.
#[derive(Debug, Clone, Copy)]
pub struct AnimationDef {
    pub frame_count: usize,
    pub frame_delay_us: u64,
}

impl AnimationDef {
    /// Frame count and delay must both be positive. A zero frame count would
    /// make frame wrapping divide by zero; that is a configuration mistake,
    /// not a runtime condition, so it is rejected at construction.
    pub fn new(frame_count: usize, frame_delay_us: u64) -> Self {
        assert!(frame_count > 0, "animation must have at least one frame");
        assert!(frame_delay_us > 0, "animation frame delay must be positive");
        Self {
            frame_count,
            frame_delay_us,
        }
    }
}

/// Runtime cursor for one variant: current frame plus leftover time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationCursor {
    pub frame_index: usize,
    pub elapsed_us: u64,
}

impl AnimationCursor {
    /// Advance by `dt_us`. A `while`, not an `if`: when the delay is small
    /// relative to the elapsed slice, several frames are consumed in one call,
    /// so animation speed stays decoupled from the update rate.
    pub fn advance(&mut self, dt_us: u64, def: &AnimationDef) {
        self.elapsed_us += dt_us;
        while self.elapsed_us >= def.frame_delay_us {
            self.elapsed_us -= def.frame_delay_us;
            self.frame_index = (self.frame_index + 1) % def.frame_count;
        }
    }
}

/// The full animation state for one actor: fixed defs, one cursor per
/// variant, and the active-variant selector.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    defs: [AnimationDef; AnimationVariant::COUNT],
    cursors: [AnimationCursor; AnimationVariant::COUNT],
    active: AnimationVariant,
}

impl AnimationSet {
    pub fn new(idle: AnimationDef, run: AnimationDef) -> Self {
        Self {
            defs: [idle, run],
            cursors: [AnimationCursor::default(); AnimationVariant::COUNT],
            active: AnimationVariant::Idle,
        }
    }

    pub fn active(&self) -> AnimationVariant {
        self.active
    }

    /// Switch the active variant. Cursors are NOT reset: a variant resumes
    /// from wherever its own frame/accumulator state last stopped.
    pub fn set_active(&mut self, variant: AnimationVariant) {
        self.active = variant;
    }

    /// Advance the active variant's cursor. Inactive variants hold still.
    pub fn advance_active(&mut self, dt_us: u64) {
        let idx = self.active.index();
        self.cursors[idx].advance(dt_us, &self.defs[idx]);
    }

    pub fn def(&self, variant: AnimationVariant) -> &AnimationDef {
        &self.defs[variant.index()]
    }

    pub fn cursor(&self, variant: AnimationVariant) -> &AnimationCursor {
        &self.cursors[variant.index()]
    }

    pub fn current_frame(&self) -> usize {
        self.cursors[self.active.index()].frame_index
    }

    /// UV rectangle `[u0, v0, u1, v1]` of the current frame within the active
    /// sheet. Frames occupy the full sheet height and an even horizontal
    /// split. Mirroring swaps the u endpoints, which is how a negative-width
    /// source rectangle translates to a UV-sampling renderer.
    pub fn current_uv(&self, flipped: bool) -> [f32; 4] {
        let idx = self.active.index();
        let count = self.defs[idx].frame_count as f32;
        let frame = self.cursors[idx].frame_index as f32;
        let u0 = frame / count;
        let u1 = (frame + 1.0) / count;
        if flipped {
            [u1, 0.0, u0, 1.0]
        } else {
            [u0, 0.0, u1, 1.0]
        }
    }
}
