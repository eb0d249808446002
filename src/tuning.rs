//! Engine tuning
//!
//! Every growth and timing constant the engine uses, loadable from JSON.
//! Missing keys keep their defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Growth engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Growth ===
    /// Distance a head travels per extension
    pub step: f32,
    /// Seconds per extension for a fresh head
    pub base_grow_interval: f32,
    /// Floor for a head's interval after grow effects
    pub min_grow_interval: f32,
    /// Half-extent of the growth volume (symmetric around the origin)
    pub bounds: Vec3,
    /// Speed bonus given to a freshly forked head
    pub fork_speed_bonus: f32,
    /// Most extensions one head may make in a single tick; time owed beyond
    /// that is dropped
    pub max_extensions_per_tick: u32,
    /// Upper bound on live heads; `None` leaves forking unbounded
    pub max_heads: Option<usize>,
    /// Starting positions of the seed pipes (all grow +Y)
    pub seed_offsets: Vec<Vec3>,

    // === Direction sampling ===
    /// Extra weight for continuing straight
    pub straight_bonus: f32,
    /// Minimum weight of any direction candidate
    pub direction_weight_floor: f32,

    // === Material selection ===
    /// Extra weight for the parent's material when forking
    pub preferred_material_bonus: f32,
    /// Minimum weight of any material
    pub material_weight_floor: f32,

    // === Pulse ===
    /// Pulse lost per second
    pub pulse_decay: f32,
    /// Pulse every autonomous extension raises its pipe to
    pub extension_pulse: f32,

    // === Phases ===
    /// Showcase length in seconds
    pub showcase_duration: f32,
    /// Compression length in seconds
    pub compression_duration: f32,
    /// Camera orbit speed during showcase/compression (radians per second)
    pub camera_spin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            step: 6.0,
            base_grow_interval: 0.35,
            min_grow_interval: 0.12,
            bounds: Vec3::new(180.0, 210.0, 180.0),
            fork_speed_bonus: 0.15,
            max_extensions_per_tick: 64,
            max_heads: None,
            seed_offsets: vec![
                Vec3::new(-60.0, -180.0, 0.0),
                Vec3::new(0.0, -180.0, 0.0),
                Vec3::new(60.0, -180.0, 0.0),
            ],

            straight_bonus: 3.0,
            direction_weight_floor: 0.05,

            preferred_material_bonus: 0.3,
            material_weight_floor: 0.05,

            pulse_decay: 1.6,
            extension_pulse: 0.35,

            showcase_duration: 4.2,
            compression_duration: 2.4,
            camera_spin: 0.45,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Clamp a position into the growth volume
    pub fn clamp_to_bounds(&self, pos: Vec3) -> Vec3 {
        let half = self.bounds.abs();
        pos.clamp(-half, half)
    }

    /// Whether another head may be spawned given the current count
    pub fn allows_head(&self, live_heads: usize) -> bool {
        self.max_heads.is_none_or(|cap| live_heads < cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"step": 4.0, "max_heads": 32}"#).unwrap();
        assert_eq!(tuning.step, 4.0);
        assert_eq!(tuning.max_heads, Some(32));
        assert_eq!(tuning.showcase_duration, 4.2);
        assert_eq!(tuning.max_extensions_per_tick, 64);
        assert_eq!(tuning.seed_offsets.len(), 3);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json(r#"{"step": "far"}"#).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/nonexistent/pipe-bloom/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let tuning = Tuning::default();
        let clamped = tuning.clamp_to_bounds(Vec3::new(500.0, -500.0, 10.0));
        assert_eq!(clamped, Vec3::new(180.0, -210.0, 10.0));
    }

    #[test]
    fn test_head_cap() {
        let mut tuning = Tuning::default();
        assert!(tuning.allows_head(10_000));
        tuning.max_heads = Some(4);
        assert!(tuning.allows_head(3));
        assert!(!tuning.allows_head(4));
    }
}
