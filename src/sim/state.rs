//! Growth engine state and core types
//!
//! Everything that determines how the structure grows lives here. Pipes are
//! never removed within a round, so a pipe's id is also its index.

use std::fmt;

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::material::Material;
use super::rng::{PIPES_PURPOSE, RngState, stream_label};
use super::scoring::Breakdown;
use crate::tuning::Tuning;

/// Engine lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Heads extend every tick and accept effects
    Growing,
    /// Growth frozen while the final structure is shown and scored
    Showcase,
    /// Structure collapses before the next round
    Compression,
    /// Waiting for a reset
    Idle,
}

/// A branching polyline growth artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    pub material: Material,
    /// Spine points, append-only while growing (never empty)
    pub points: Vec<Vec3>,
    /// Always `step * (points.len() - 1)`
    pub length: f32,
    /// Additive score multiplier accumulated from effects
    pub multiplier: f32,
    /// Visual intensity, decays toward zero
    pub pulse: f32,
}

impl Pipe {
    pub fn new(id: u32, material: Material, origin: Vec3) -> Self {
        Self {
            id,
            material,
            points: vec![origin],
            length: 0.0,
            multiplier: 0.0,
            pulse: 0.0,
        }
    }

    /// Last spine point
    pub fn tip(&self) -> Vec3 {
        self.points.last().copied().unwrap_or_default()
    }

    /// Raise pulse to at least `level`
    #[inline]
    pub fn bump_pulse(&mut self, level: f32) {
        self.pulse = self.pulse.max(level);
    }

    /// Decay pulse linearly, never below zero
    pub fn decay_pulse(&mut self, rate: f32, dt: f32) {
        if self.pulse > 0.0 {
            self.pulse = (self.pulse - rate * dt).max(0.0);
        }
    }
}

/// Active growth cursor extending one pipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeHead {
    pub id: u32,
    /// Pipe this head extends
    pub pipe_id: u32,
    /// Equal to the owning pipe's tip
    pub pos: Vec3,
    pub dir: Direction,
    /// Per-axis pull added to direction weights
    pub bias: Vec3,
    /// Seconds accumulated since the last extension
    pub timer: f32,
    /// Seconds per extension
    pub grow_interval: f32,
    /// Multiplicative growth-rate bonus
    pub speed_bonus: f32,
}

/// Read-only population summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipeStats {
    pub pipe_count: usize,
    pub active_heads: usize,
    pub total_length: f32,
}

/// Serializable view of the growth state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSnapshot {
    pub round: u32,
    pub phase: Phase,
    pub pipes: Vec<Pipe>,
    pub heads: Vec<PipeHead>,
}

/// Fired once with the breakdown computed when the showcase ends
pub type ShowcaseCallback = Box<dyn FnOnce(&Breakdown)>;
/// Fired once when compression ends
pub type CompressionCallback = Box<dyn FnOnce()>;

/// The growth engine: live pipes, their heads and the phase machine
pub struct PipeSystem {
    pub(super) tuning: Tuning,
    pub(super) base_seed: u64,
    pub(super) round: u32,
    pub(super) rng_state: RngState,
    pub(super) rng: Pcg32,
    pub(super) phase: Phase,
    pub(super) pipes: Vec<Pipe>,
    pub(super) heads: Vec<PipeHead>,
    pub(super) showcase_timer: f32,
    pub(super) compression_timer: f32,
    /// Presentational orbit angle (radians)
    pub(super) camera_angle: f32,
    pub(super) on_showcase_done: Option<ShowcaseCallback>,
    pub(super) on_compression_done: Option<CompressionCallback>,
    pub(super) last_breakdown: Option<Breakdown>,
    next_head_id: u32,
}

impl PipeSystem {
    /// Create an idle engine for a run; call `reset_system` to start a round
    pub fn new(base_seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::from_label(stream_label(base_seed, PIPES_PURPOSE, 0));
        Self {
            tuning,
            base_seed,
            round: 0,
            rng: rng_state.to_rng(),
            rng_state,
            phase: Phase::Idle,
            pipes: Vec::new(),
            heads: Vec::new(),
            showcase_timer: 0.0,
            compression_timer: 0.0,
            camera_angle: 0.0,
            on_showcase_done: None,
            on_compression_done: None,
            last_breakdown: None,
            next_head_id: 0,
        }
    }

    /// Discard the population, reseed for `round` and plant the seed pipes.
    ///
    /// Any pending phase callback is dropped without being invoked.
    pub fn reset_system(&mut self, round: u32) {
        self.round = round;
        self.rng_state = RngState::from_label(stream_label(self.base_seed, PIPES_PURPOSE, round));
        self.rng = self.rng_state.to_rng();
        self.phase = Phase::Growing;
        self.pipes.clear();
        self.heads.clear();
        self.next_head_id = 0;
        self.showcase_timer = 0.0;
        self.compression_timer = 0.0;
        self.camera_angle = 0.0;
        self.on_showcase_done = None;
        self.on_compression_done = None;
        self.last_breakdown = None;

        let offsets = self.tuning.seed_offsets.clone();
        for origin in offsets {
            let pipe_id = self.spawn_pipe(Material::Standard, origin);
            let interval = self.tuning.base_grow_interval;
            self.spawn_head(pipe_id, origin, Direction::PosY, Vec3::ZERO, interval, 0.0);
        }

        log::info!(
            "Round {} reset ({}): {} seed pipes",
            round,
            self.rng_state.label,
            self.pipes.len()
        );
    }

    /// Append a new empty pipe, returning its id
    pub(super) fn spawn_pipe(&mut self, material: Material, origin: Vec3) -> u32 {
        let id = self.pipes.len() as u32;
        self.pipes.push(Pipe::new(id, material, origin));
        id
    }

    pub(super) fn spawn_head(
        &mut self,
        pipe_id: u32,
        pos: Vec3,
        dir: Direction,
        bias: Vec3,
        grow_interval: f32,
        speed_bonus: f32,
    ) {
        let id = self.next_head_id;
        self.next_head_id += 1;
        self.heads.push(PipeHead {
            id,
            pipe_id,
            pos,
            dir,
            bias,
            timer: 0.0,
            grow_interval,
            speed_bonus,
        });
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn heads(&self) -> &[PipeHead] {
        &self.heads
    }

    pub fn camera_angle(&self) -> f32 {
        self.camera_angle
    }

    /// Breakdown captured when the last showcase completed
    pub fn last_breakdown(&self) -> Option<&Breakdown> {
        self.last_breakdown.as_ref()
    }

    pub fn stats(&self) -> PipeStats {
        PipeStats {
            pipe_count: self.pipes.len(),
            active_heads: self.heads.len(),
            total_length: self.pipes.iter().map(|p| p.length).sum(),
        }
    }

    pub fn snapshot(&self) -> PipeSnapshot {
        PipeSnapshot {
            round: self.round,
            phase: self.phase,
            pipes: self.pipes.clone(),
            heads: self.heads.clone(),
        }
    }
}

impl fmt::Debug for PipeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeSystem")
            .field("round", &self.round)
            .field("phase", &self.phase)
            .field("seed_label", &self.rng_state.label)
            .field("pipes", &self.pipes.len())
            .field("heads", &self.heads.len())
            .field("showcase_pending", &self.on_showcase_done.is_some())
            .field("compression_pending", &self.on_compression_done.is_some())
            .finish()
    }
}
