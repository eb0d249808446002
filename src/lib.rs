//! Pipe Bloom - peg-driven procedural pipe growth
//!
//! Core modules:
//! - `sim`: Deterministic growth engine (pipes, heads, effects, scoring)
//! - `run`: Per-run state and upgrade modifiers
//! - `tuning`: Data-driven engine constants

pub mod run;
pub mod sim;
pub mod tuning;

pub use run::{RunModifiers, RunState};
pub use sim::{
    Breakdown, Effect, Material, Peg, PegHit, PegTag, Phase, PipeStats, PipeSystem,
    resolve_peg_hit, score_pipes,
};
pub use tuning::Tuning;

/// Fixed design constants (effect magnitudes and defaults)
pub mod consts {
    /// Frame timestep used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Resolver magnitudes per peg tag
    pub const MULT_AMOUNT: f32 = 0.15;
    pub const GROW_AMOUNT: f32 = 0.3;
    pub const GROW_DURATION: f32 = 3.0;
    pub const BIAS_AMOUNT: f32 = 2.0;
    pub const BLANK_PULSE_AMOUNT: f32 = 1.0;

    /// Engine-side defaults for effects that omit their amount
    pub const DEFAULT_GROW_AMOUNT: f32 = 0.2;
    pub const DEFAULT_MULT_AMOUNT: f32 = 0.1;
    pub const DEFAULT_BIAS_AMOUNT: f32 = 1.0;
    pub const DEFAULT_PULSE_AMOUNT: f32 = 0.2;
    pub const DEFAULT_FORK_AMOUNT: f32 = 1.0;

    /// Pulse levels an effect bumps its pipe to
    pub const GROW_PULSE: f32 = 1.2;
    pub const FORK_PULSE: f32 = 1.1;
    pub const MULT_PULSE: f32 = 1.25;
    pub const BIAS_PULSE: f32 = 1.05;
    pub const MATERIAL_PULSE: f32 = 1.3;

    /// Scoring
    pub const LENGTH_EXPONENT: f64 = 0.85;
    pub const MIN_SCORED_LENGTH: f64 = 0.1;
    pub const POINTS_PER_BONUS_COIN: f64 = 200.0;

    /// Drops granted per round before upgrades
    pub const BASE_DROPS_PER_ROUND: u32 = 5;
}
