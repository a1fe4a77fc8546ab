//! Level model and JSON persistence.
//!
//! A level is nothing but an ordered list of platform anchor positions;
//! every platform is the same 96x16 block, anchored top-left. Order is
//! insertion order and carries no meaning beyond stable iteration.
//!
//! Persistence policy differs from the strict loaders elsewhere: a missing
//! or corrupt level file must never stop the program. `load` falls back to a
//! single default platform and `save` swallows failures, both with a logged
//! warning as the only diagnostic.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const PLATFORM_WIDTH: f32 = 96.0;
pub const PLATFORM_HEIGHT: f32 = 16.0;

/// Where the single platform of a fallback level sits: centered under the
/// player spawn at the origin, one short drop below it.
pub const FALLBACK_PLATFORM: Vec2 = Vec2::new(-48.0, 80.0);

/// Axis-aligned rectangle, top-left anchored, y-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }
}

/// Collider of a platform anchored at `position`.
pub fn platform_collider(position: Vec2) -> Rect {
    Rect::new(position.x, position.y, PLATFORM_WIDTH, PLATFORM_HEIGHT)
}

#[derive(Debug, Clone)]
pub struct Level {
    platforms: Vec<Vec2>,
}

impl Level {
    /// A level containing only the fallback platform.
    pub fn fallback() -> Self {
        Self {
            platforms: vec![FALLBACK_PLATFORM],
        }
    }

    pub fn from_platforms(platforms: Vec<Vec2>) -> Self {
        Self { platforms }
    }

    pub fn platforms(&self) -> &[Vec2] {
        &self.platforms
    }

    pub fn add_platform(&mut self, position: Vec2) {
        self.platforms.push(position);
    }

    /// Remove the first platform (iteration order) whose collider contains
    /// `point`. Swap-with-last removal: O(1), order-destroying, acceptable
    /// because platform order is never user-visible.
    pub fn remove_platform_at(&mut self, point: Vec2) -> bool {
        let found = self
            .platforms
            .iter()
            .position(|&p| platform_collider(p).contains_point(point));
        match found {
            Some(index) => {
                self.platforms.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Load a level, falling back silently on any failure. Corrupt or absent
    /// level files never abort startup.
    pub fn load(path: &Path) -> Self {
        match read_level_file(path) {
            Ok(level) => {
                log::info!(
                    "Loaded level '{}' ({} platforms)",
                    path.display(),
                    level.platforms.len()
                );
                level
            }
            Err(err) => {
                log::warn!("Using fallback level: {err}");
                Self::fallback()
            }
        }
    }

    /// Serialize and write, overwriting. Called exactly once, at shutdown.
    /// Failures are logged and swallowed; a serialization error skips the
    /// write entirely so a stale-but-valid file is never half-replaced.
    pub fn save(&self, path: &Path) {
        let file = LevelJson {
            platforms: self
                .platforms
                .iter()
                .map(|p| PlatformJson { x: p.x, y: p.y })
                .collect(),
        };
        let body = match serde_json::to_string_pretty(&file) {
            Ok(body) => body,
            Err(err) => {
                log::warn!("Skipping level save, serialization failed: {err}");
                return;
            }
        };
        match fs::write(path, body) {
            Ok(()) => log::info!(
                "Saved level '{}' ({} platforms)",
                path.display(),
                self.platforms.len()
            ),
            Err(err) => log::warn!("Skipping level save, write failed: {err}"),
        }
    }
}

// --- JSON shape (private) ---

#[derive(Debug, Serialize, Deserialize)]
struct LevelJson {
    platforms: Vec<PlatformJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlatformJson {
    x: f32,
    y: f32,
}

fn read_level_file(path: &Path) -> Result<Level, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level file {}: {e}", path.display()))?;
    let file: LevelJson = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    Ok(Level {
        platforms: file
            .platforms
            .into_iter()
            .map(|p| Vec2::new(p.x, p.y))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hs_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn position_set(level: &Level) -> Vec<(i64, i64)> {
        // Positions quantized to millipixels so set comparison is exact.
        let mut set: Vec<(i64, i64)> = level
            .platforms()
            .iter()
            .map(|p| ((p.x * 1000.0) as i64, (p.y * 1000.0) as i64))
            .collect();
        set.sort_unstable();
        set
    }

    #[test]
    fn save_then_load_round_trips_platform_set() {
        let path = temp_file_path("round_trip");
        let original = Level::from_platforms(vec![
            Vec2::new(-48.0, 80.0),
            Vec2::new(60.5, 144.0),
            Vec2::new(-200.0, 32.25),
        ]);

        original.save(&path);
        let reloaded = Level::load(&path);

        assert_eq!(position_set(&original), position_set(&reloaded));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_yields_single_fallback_platform() {
        let path = temp_file_path("missing");
        let _ = fs::remove_file(&path);

        let level = Level::load(&path);
        assert_eq!(level.platforms(), &[FALLBACK_PLATFORM]);
    }

    #[test]
    fn malformed_file_yields_single_fallback_platform() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ this is not json").expect("write temp file");

        let level = Level::load(&path);
        assert_eq!(level.platforms(), &[FALLBACK_PLATFORM]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn wrong_shape_yields_single_fallback_platform() {
        let path = temp_file_path("wrong_shape");
        fs::write(&path, r#"{"platforms": [{"x": "oops", "y": 3}]}"#).expect("write temp file");

        let level = Level::load(&path);
        assert_eq!(level.platforms(), &[FALLBACK_PLATFORM]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let path = temp_file_path("overwrite");
        Level::from_platforms(vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]).save(&path);
        Level::from_platforms(vec![Vec2::new(9.0, 9.0)]).save(&path);

        let reloaded = Level::load(&path);
        assert_eq!(reloaded.platforms(), &[Vec2::new(9.0, 9.0)]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn collider_anchors_top_left() {
        let collider = platform_collider(Vec2::new(10.0, 20.0));
        assert!(collider.contains_point(Vec2::new(10.0, 20.0)));
        assert!(collider.contains_point(Vec2::new(105.9, 35.9)));
        assert!(!collider.contains_point(Vec2::new(9.9, 20.0)));
        assert!(!collider.contains_point(Vec2::new(10.0, 36.0)));
    }

    #[test]
    fn remove_takes_first_match_in_iteration_order() {
        // Two platforms overlapping the same point: the earlier one goes.
        let mut level = Level::from_platforms(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(500.0, 500.0),
        ]);

        assert!(level.remove_platform_at(Vec2::new(20.0, 8.0)));
        assert_eq!(level.platforms().len(), 2);
        assert!(!level.platforms().contains(&Vec2::new(0.0, 0.0)));
        assert!(level.platforms().contains(&Vec2::new(8.0, 0.0)));
    }

    #[test]
    fn remove_outside_all_colliders_changes_nothing() {
        let mut level = Level::from_platforms(vec![Vec2::new(0.0, 0.0)]);
        assert!(!level.remove_platform_at(Vec2::new(-1.0, -1.0)));
        assert_eq!(level.platforms().len(), 1);
    }

    #[test]
    fn rect_overlap_is_exclusive_at_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }
}
