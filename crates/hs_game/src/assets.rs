//! Sprite sheets embedded in the binary. Decoding happens once at startup in
//! `Texture::from_bytes`; by the time animation and level setup run, the
//! pixel data is already on the GPU.

use hs_core::animation::{AnimationDef, AnimationSet};

pub const RUN_SHEET_BYTES: &[u8] = include_bytes!("../../../assets/sprites/player_run.png");
pub const IDLE_SHEET_BYTES: &[u8] = include_bytes!("../../../assets/sprites/player_idle.png");
pub const PLATFORM_BYTES: &[u8] = include_bytes!("../../../assets/sprites/platform.png");

pub const RUN_FRAME_COUNT: usize = 6;
pub const IDLE_FRAME_COUNT: usize = 4;

const RUN_FRAME_DELAY_US: u64 = 80_000;
const IDLE_FRAME_DELAY_US: u64 = 150_000;

/// World-space draw size of one player frame (frames are square).
pub const PLAYER_SPRITE_SIZE: f32 = 24.0;

pub fn player_animations() -> AnimationSet {
    AnimationSet::new(
        AnimationDef::new(IDLE_FRAME_COUNT, IDLE_FRAME_DELAY_US),
        AnimationDef::new(RUN_FRAME_COUNT, RUN_FRAME_DELAY_US),
    )
}
