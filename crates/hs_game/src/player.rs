//! Player movement, gravity, and ground contact.
//!
//! One `step` per fixed simulation slice. Grounding is derived from the
//! collision test, never from position heuristics: gravity is applied every
//! step (even while standing) and the floor snap afterwards corrects it.

use glam::Vec2;

use hs_core::animation::{AnimationSet, AnimationVariant};

use crate::level::{platform_collider, Level, Rect};

/// Ground-contact probe. Much smaller than the sprite: only the feet
/// matter for landing, and a narrow probe lets the player visibly hang
/// over platform edges.
const FEET_WIDTH: f32 = 12.0;
const FEET_HEIGHT: f32 = 8.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// -1, 0 or +1 from the left/right key pair; both held cancel out.
    pub move_x: f32,
    pub jump_pressed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerConfig {
    pub run_speed: f32,
    pub gravity: f32,
    pub jump_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            run_speed: 140.0,
            gravity: 900.0,
            jump_speed: 350.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Feet anchor: horizontal center, vertical bottom of the sprite.
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub flipped: bool,
    pub animations: AnimationSet,
    pub config: PlayerConfig,
}

impl Player {
    pub fn new(position: Vec2, animations: AnimationSet) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            flipped: false,
            animations,
            config: PlayerConfig::default(),
        }
    }

    pub fn feet_rect(&self) -> Rect {
        Rect::new(
            self.position.x - FEET_WIDTH * 0.5,
            self.position.y - FEET_HEIGHT * 0.5,
            FEET_WIDTH,
            FEET_HEIGHT,
        )
    }

    pub fn step(&mut self, input: PlayerInput, dt: f32, level: &Level) {
        // Horizontal speed is discrete: full run speed or nothing.
        self.velocity.x = input.move_x * self.config.run_speed;
        if input.move_x != 0.0 {
            self.flipped = input.move_x < 0.0;
        }
        let mut variant = if input.move_x != 0.0 {
            AnimationVariant::Run
        } else {
            AnimationVariant::Idle
        };

        // Gravity accumulates unconditionally; the floor snap below undoes it
        // while standing.
        self.velocity.y += self.config.gravity * dt;

        // Jump is edge-triggered and only legal from the ground.
        if input.jump_pressed && self.grounded {
            self.velocity.y = -self.config.jump_speed;
        }

        self.position += self.velocity * dt;

        // Ground contact: probe every platform with the feet rect. The
        // falling check is latched before the loop so every overlapping
        // collider snaps in turn; the last one in iteration order supplies
        // the landing surface (no nearest-surface tie-break).
        let feet = self.feet_rect();
        let falling = self.velocity.y > 0.0;
        self.grounded = false;
        for &platform in level.platforms() {
            let collider = platform_collider(platform);
            if falling && feet.overlaps(&collider) {
                self.velocity.y = 0.0;
                self.position.y = collider.y;
                self.grounded = true;
            }
        }

        // No airborne animation exists; falling and jumping show idle.
        if !self.grounded {
            variant = AnimationVariant::Idle;
        }
        self.animations.set_active(variant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{FALLBACK_PLATFORM, PLATFORM_HEIGHT, PLATFORM_WIDTH};
    use hs_core::animation::AnimationDef;

    const DT: f32 = 1.0 / 60.0;

    fn test_player(position: Vec2) -> Player {
        Player::new(
            position,
            AnimationSet::new(
                AnimationDef::new(4, 150_000),
                AnimationDef::new(6, 80_000),
            ),
        )
    }

    fn one_platform_at(x: f32, y: f32) -> Level {
        Level::from_platforms(vec![Vec2::new(x, y)])
    }

    #[test]
    fn falling_player_lands_on_platform_surface() {
        let (px, py) = (-48.0, 80.0);
        let level = one_platform_at(px, py);
        // Feet probe already overlapping, velocity downward.
        let mut player = test_player(Vec2::new(0.0, py + 2.0));
        player.velocity.y = 50.0;

        player.step(PlayerInput::default(), DT, &level);

        assert_eq!(player.velocity.y, 0.0);
        assert_eq!(player.position.y, py);
        assert!(player.grounded);
    }

    #[test]
    fn player_spawned_above_fallback_platform_eventually_grounds() {
        let level = Level::fallback();
        let mut player = test_player(Vec2::ZERO);

        for _ in 0..240 {
            player.step(PlayerInput::default(), DT, &level);
            if player.grounded {
                break;
            }
        }

        assert!(player.grounded);
        assert_eq!(player.position.y, FALLBACK_PLATFORM.y);
    }

    #[test]
    fn grounded_player_stays_put_despite_gravity() {
        let level = one_platform_at(-48.0, 80.0);
        let mut player = test_player(Vec2::new(0.0, 80.0));
        player.grounded = true;

        for _ in 0..10 {
            player.step(PlayerInput::default(), DT, &level);
        }

        // Gravity runs every step but the snap corrects it back.
        assert!(player.grounded);
        assert_eq!(player.position.y, 80.0);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn rising_player_passes_through_platform_from_below() {
        let level = one_platform_at(-48.0, 80.0);
        let mut player = test_player(Vec2::new(0.0, 82.0));
        player.velocity.y = -200.0; // moving up through the collider

        player.step(PlayerInput::default(), DT, &level);

        assert!(!player.grounded);
        assert!(player.velocity.y < 0.0);
    }

    #[test]
    fn jump_requires_ground_contact() {
        let level = one_platform_at(-48.0, 80.0);

        let mut airborne = test_player(Vec2::new(0.0, -100.0));
        airborne.step(
            PlayerInput {
                move_x: 0.0,
                jump_pressed: true,
            },
            DT,
            &level,
        );
        assert!(airborne.velocity.y > 0.0); // gravity only, no launch

        let mut standing = test_player(Vec2::new(0.0, 80.0));
        standing.grounded = true;
        standing.step(
            PlayerInput {
                move_x: 0.0,
                jump_pressed: true,
            },
            DT,
            &level,
        );
        assert!(standing.velocity.y < 0.0);
        assert!(!standing.grounded);
    }

    #[test]
    fn horizontal_input_sets_speed_facing_and_run_variant() {
        let level = one_platform_at(-48.0, 80.0);
        let mut player = test_player(Vec2::new(0.0, 80.0));
        player.grounded = true;

        player.step(
            PlayerInput {
                move_x: -1.0,
                jump_pressed: false,
            },
            DT,
            &level,
        );
        assert_eq!(player.velocity.x, -player.config.run_speed);
        assert!(player.flipped);
        assert_eq!(player.animations.active(), AnimationVariant::Run);

        player.step(
            PlayerInput {
                move_x: 1.0,
                jump_pressed: false,
            },
            DT,
            &level,
        );
        assert!(!player.flipped);

        // Stationary keeps the last facing and drops back to idle.
        player.step(PlayerInput::default(), DT, &level);
        assert_eq!(player.velocity.x, 0.0);
        assert!(!player.flipped);
        assert_eq!(player.animations.active(), AnimationVariant::Idle);
    }

    #[test]
    fn airborne_forces_idle_even_while_moving() {
        let level = one_platform_at(-48.0, 500.0);
        let mut player = test_player(Vec2::ZERO);

        player.step(
            PlayerInput {
                move_x: 1.0,
                jump_pressed: false,
            },
            DT,
            &level,
        );

        assert!(!player.grounded);
        assert_eq!(player.animations.active(), AnimationVariant::Idle);
    }

    #[test]
    fn overlapping_platforms_last_match_provides_surface() {
        // Two platforms whose colliders both overlap the feet probe at
        // slightly different heights. The loop keeps the LAST match in
        // iteration order, not the nearest surface.
        let level = Level::from_platforms(vec![Vec2::new(-48.0, 80.0), Vec2::new(-48.0, 78.0)]);
        let mut player = test_player(Vec2::new(0.0, 79.0));
        player.velocity.y = 30.0;

        player.step(PlayerInput::default(), DT, &level);

        assert!(player.grounded);
        assert_eq!(player.position.y, 78.0);

        // Reversed iteration order lands on the other platform.
        let level = Level::from_platforms(vec![Vec2::new(-48.0, 78.0), Vec2::new(-48.0, 80.0)]);
        let mut player = test_player(Vec2::new(0.0, 79.0));
        player.velocity.y = 30.0;

        player.step(PlayerInput::default(), DT, &level);

        assert!(player.grounded);
        assert_eq!(player.position.y, 80.0);
    }

    #[test]
    fn feet_probe_is_centered_and_small() {
        let player = test_player(Vec2::new(10.0, 20.0));
        let feet = player.feet_rect();
        assert!(feet.w < PLATFORM_WIDTH);
        assert!(feet.h < PLATFORM_HEIGHT);
        assert_eq!(feet.x + feet.w * 0.5, 10.0);
        assert_eq!(feet.y + feet.h * 0.5, 20.0);
    }

    #[test]
    fn step_sequence_is_deterministic() {
        let level = Level::fallback();
        let mut inputs = Vec::new();
        for _ in 0..90 {
            inputs.push(PlayerInput {
                move_x: 1.0,
                jump_pressed: false,
            });
        }
        inputs.push(PlayerInput {
            move_x: 1.0,
            jump_pressed: true,
        });
        for _ in 0..90 {
            inputs.push(PlayerInput {
                move_x: -1.0,
                jump_pressed: false,
            });
        }

        let mut run_a = test_player(Vec2::ZERO);
        let mut run_b = test_player(Vec2::ZERO);
        for input in &inputs {
            run_a.step(*input, DT, &level);
        }
        for input in &inputs {
            run_b.step(*input, DT, &level);
        }

        assert_eq!(run_a.position, run_b.position);
        assert_eq!(run_a.velocity, run_b.velocity);
        assert_eq!(run_a.grounded, run_b.grounded);
    }
}
