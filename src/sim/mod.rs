//! Deterministic growth simulation
//!
//! Peg hits resolve to effects, effects mutate live pipe heads, heads grow
//! on a fixed cadence, and the finished structure is scored.

pub mod direction;
pub mod effect;
pub mod material;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod state;
pub mod tick;

pub use direction::{Axis, Direction};
pub use effect::Effect;
pub use material::Material;
pub use resolver::{Peg, PegHit, PegTag, resolve_peg_hit};
pub use rng::RngState;
pub use scoring::{Breakdown, ScoreContext, ScoredPipe, score_pipe, score_pipes};
pub use state::{Phase, Pipe, PipeHead, PipeSnapshot, PipeStats, PipeSystem};
pub use tick::{direction_weights, material_weights};
