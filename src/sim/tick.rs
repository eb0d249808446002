//! Per-frame growth tick
//!
//! Advances the phase machine, extends heads through weighted directional
//! sampling and applies peg effects. All randomness comes from the round's
//! pipe stream, so a fixed seed plus a fixed sequence of effects and `dt`
//! values reproduces the same structure.

use rand::Rng;
use rand_pcg::Pcg32;

use super::direction::Direction;
use super::effect::Effect;
use super::material::Material;
use super::rng::weighted_index;
use super::scoring::{Breakdown, ScoreContext, ScoredPipe, score_pipes};
use super::state::{Phase, Pipe, PipeHead, PipeSystem};
use crate::RunModifiers;
use crate::consts::*;
use crate::tuning::Tuning;

/// Timers within this of their duration count as elapsed (absorbs f32 drift
/// when frame deltas sum to the duration exactly)
const PHASE_EPSILON: f32 = 1e-4;

/// Smallest effective interval, for tunings with a zero grow interval
const MIN_EFFECTIVE_INTERVAL: f32 = 1e-3;

impl PipeSystem {
    /// Advance the engine by `dt` seconds
    pub fn tick(&mut self, dt: f32, mods: &RunModifiers) {
        let dt = dt.max(0.0);

        let decay = self.tuning.pulse_decay;
        for pipe in &mut self.pipes {
            pipe.decay_pulse(decay, dt);
        }

        match self.phase {
            Phase::Growing => self.grow_heads(dt, mods),
            Phase::Showcase => {
                self.camera_angle += self.tuning.camera_spin * dt;
                self.showcase_timer += dt;
                if self.showcase_timer + PHASE_EPSILON >= self.tuning.showcase_duration {
                    self.finish_showcase(mods);
                }
            }
            Phase::Compression => {
                self.camera_angle += self.tuning.camera_spin * dt;
                self.compression_timer += dt;
                if self.compression_timer + PHASE_EPSILON >= self.tuning.compression_duration {
                    self.finish_compression();
                }
            }
            Phase::Idle => {}
        }
    }

    fn grow_heads(&mut self, dt: f32, mods: &RunModifiers) {
        let global_rate = 1.0 + mods.grow_speed_bonus;
        let Self {
            heads,
            pipes,
            rng,
            tuning,
            ..
        } = self;

        for head in heads.iter_mut() {
            let Some(pipe) = pipes.get_mut(head.pipe_id as usize) else {
                continue;
            };
            let interval =
                (head.grow_interval / pipe.material.step_factor()).max(MIN_EFFECTIVE_INTERVAL);
            head.timer += dt * (1.0 + head.speed_bonus) * global_rate;
            let mut extensions = 0;
            while head.timer > interval && extensions < tuning.max_extensions_per_tick {
                head.timer -= interval;
                extend(head, pipe, rng, tuning);
                extensions += 1;
            }
            if head.timer > interval || !head.timer.is_finite() {
                log::debug!("Head {} hit the extension cap; dropping owed time", head.id);
                head.timer = 0.0;
            }
        }
    }

    /// Freeze growth and start the showcase timer.
    ///
    /// `on_done` runs once, inside the tick that ends the showcase.
    pub fn start_showcase<F>(&mut self, on_done: F)
    where
        F: FnOnce(&Breakdown) + 'static,
    {
        log::info!(
            "Round {} showcase: {} pipes, {} heads",
            self.round,
            self.pipes.len(),
            self.heads.len()
        );
        self.phase = Phase::Showcase;
        self.showcase_timer = 0.0;
        self.on_showcase_done = Some(Box::new(on_done));
    }

    /// Enter (or restart) compression and register its completion callback
    pub fn start_compression<F>(&mut self, on_done: F)
    where
        F: FnOnce() + 'static,
    {
        log::info!("Round {} compression", self.round);
        self.phase = Phase::Compression;
        self.compression_timer = 0.0;
        self.on_compression_done = Some(Box::new(on_done));
    }

    fn finish_showcase(&mut self, mods: &RunModifiers) {
        let breakdown = self.breakdown(mods);
        log::info!(
            "Round {} showcase complete: {:.1} points, {} bonus coins",
            self.round,
            breakdown.total,
            breakdown.coin_bonus
        );
        self.phase = Phase::Compression;
        self.compression_timer = 0.0;
        self.last_breakdown = Some(breakdown.clone());
        if let Some(on_done) = self.on_showcase_done.take() {
            on_done(&breakdown);
        }
    }

    fn finish_compression(&mut self) {
        log::info!("Round {} compression complete", self.round);
        self.phase = Phase::Idle;
        if let Some(on_done) = self.on_compression_done.take() {
            on_done();
        }
    }

    /// Score the live population
    pub fn breakdown(&self, mods: &RunModifiers) -> Breakdown {
        let scored: Vec<ScoredPipe> = self.pipes.iter().map(ScoredPipe::from).collect();
        score_pipes(&scored, &ScoreContext::from(mods))
    }

    /// Apply effects in order, each to a uniformly drawn live head.
    ///
    /// With no live heads the remaining effects are dropped.
    pub fn apply_effects(&mut self, effects: &[Effect], mods: &RunModifiers) {
        for effect in effects {
            if self.heads.is_empty() {
                return;
            }
            let index = self.rng.random_range(0..self.heads.len());
            self.apply_effect_to_head(index, effect, mods);
        }
    }

    /// Apply one effect to the head at `index` and its pipe
    pub fn apply_effect_to_head(&mut self, index: usize, effect: &Effect, mods: &RunModifiers) {
        let Some(head) = self.heads.get_mut(index) else {
            return;
        };
        let pipe_index = head.pipe_id as usize;
        let amount = effect.amount_or_default();
        log::debug!("{} {amount} -> head {} (pipe {})", effect.kind(), head.id, head.pipe_id);

        let pulse = match *effect {
            Effect::Grow { .. } => {
                head.speed_bonus += amount;
                head.grow_interval =
                    (head.grow_interval * (1.0 - amount)).max(self.tuning.min_grow_interval);
                GROW_PULSE
            }
            Effect::Fork { .. } => {
                let count = (amount.round() as i64).max(1);
                let mut spawned = 0;
                for _ in 0..count {
                    if !self.fork_from(index, mods) {
                        break;
                    }
                    spawned += 1;
                }
                if spawned < count {
                    log::warn!("Head cap reached: forked {spawned} of {count}");
                }
                FORK_PULSE
            }
            Effect::Mult { .. } => {
                if let Some(pipe) = self.pipes.get_mut(pipe_index) {
                    pipe.multiplier += amount;
                }
                MULT_PULSE
            }
            Effect::Bias { axis, .. } => {
                head.bias += axis.unit() * amount;
                BIAS_PULSE
            }
            Effect::Material { material } => {
                if let (Some(material), Some(pipe)) = (material, self.pipes.get_mut(pipe_index)) {
                    pipe.material = material;
                }
                MATERIAL_PULSE
            }
            Effect::Pulse { .. } => 1.0 + amount,
        };

        if let Some(pipe) = self.pipes.get_mut(pipe_index) {
            pipe.bump_pulse(pulse);
        }
    }

    /// Branch a new pipe off the head at `source`. Returns false when the
    /// head cap forbids it.
    fn fork_from(&mut self, source: usize, mods: &RunModifiers) -> bool {
        if !self.tuning.allows_head(self.heads.len()) {
            return false;
        }
        let Some(head) = self.heads.get(source) else {
            return false;
        };
        let (pos, dir, bias) = (head.pos, head.dir, head.bias);
        let parent_material = self.pipes.get(head.pipe_id as usize).map(|p| p.material);

        let material = self.pick_material(parent_material, mods);
        let new_dir = dir.fork_turn(self.rng.random::<f32>());
        let pipe_id = self.spawn_pipe(material, pos);
        let interval = self.tuning.base_grow_interval;
        let speed_bonus = self.tuning.fork_speed_bonus;
        self.spawn_head(pipe_id, pos, new_dir, bias, interval, speed_bonus);

        log::debug!("Fork: pipe {pipe_id} ({}) heading {new_dir:?}", material.as_str());
        true
    }

    /// Weighted material draw, nudged toward `preferred`
    pub fn pick_material(&mut self, preferred: Option<Material>, mods: &RunModifiers) -> Material {
        let weights = material_weights(preferred, mods, &self.tuning);
        weighted_index(&mut self.rng, &weights)
            .and_then(|i| Material::ALL.get(i).copied())
            .unwrap_or_default()
    }
}

/// One extension: pick a direction, step, clamp and append
fn extend(head: &mut PipeHead, pipe: &mut Pipe, rng: &mut Pcg32, tuning: &Tuning) {
    head.dir = sample_direction(rng, head, tuning);
    let next = tuning.clamp_to_bounds(head.pos + head.dir.as_vec3() * tuning.step);
    head.pos = next;
    pipe.points.push(next);
    pipe.length += tuning.step;
    pipe.bump_pulse(tuning.extension_pulse);
}

/// Candidate weights in `Direction::ALL` order.
///
/// Each starts at 1, the current direction gets the straight bonus, and the
/// bias vector adds its projection onto the candidate. Floored so every
/// direction stays reachable.
pub fn direction_weights(head: &PipeHead, tuning: &Tuning) -> [f32; 6] {
    Direction::ALL.map(|candidate| {
        let mut weight = 1.0 + head.bias.dot(candidate.as_vec3());
        if candidate == head.dir {
            weight += tuning.straight_bonus;
        }
        weight.max(tuning.direction_weight_floor)
    })
}

fn sample_direction(rng: &mut Pcg32, head: &PipeHead, tuning: &Tuning) -> Direction {
    let weights = direction_weights(head, tuning);
    weighted_index(rng, &weights)
        .and_then(|i| Direction::ALL.get(i).copied())
        .unwrap_or(head.dir)
}

/// Material weights in `Material::ALL` order
pub fn material_weights(
    preferred: Option<Material>,
    mods: &RunModifiers,
    tuning: &Tuning,
) -> [f32; 4] {
    Material::ALL.map(|material| {
        let mut weight = 1.0 + mods.material_bias(material);
        if preferred == Some(material) {
            weight += tuning.preferred_material_bonus;
        }
        weight.max(tuning.material_weight_floor)
    })
}
