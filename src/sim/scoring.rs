//! Pipe valuation
//!
//! Pure functions from a pipe snapshot to points. Length is scored
//! sub-linearly so a single runaway pipe cannot dominate a round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::state::Pipe;
use crate::consts::*;

/// Scoring inputs taken from run modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreContext {
    pub pipe_value_bonus: f32,
}

impl From<&crate::RunModifiers> for ScoreContext {
    fn from(mods: &crate::RunModifiers) -> Self {
        Self {
            pipe_value_bonus: mods.pipe_value_bonus,
        }
    }
}

/// The parts of a pipe that scoring looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPipe {
    pub material: Material,
    pub length: f32,
    pub multiplier: f32,
}

impl From<&Pipe> for ScoredPipe {
    fn from(pipe: &Pipe) -> Self {
        Self {
            material: pipe.material,
            length: pipe.length,
            multiplier: pipe.multiplier,
        }
    }
}

/// Score summary for a pipe population
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub total: f64,
    pub by_material: BTreeMap<Material, f64>,
    pub coin_bonus: u64,
}

/// Value of a single pipe
pub fn score_pipe(pipe: &ScoredPipe, ctx: &ScoreContext) -> f64 {
    let length = f64::from(pipe.length).max(MIN_SCORED_LENGTH);
    let multiplier = 1.0 + f64::from(ctx.pipe_value_bonus) + f64::from(pipe.multiplier);
    pipe.material.base_value() * length.powf(LENGTH_EXPONENT) * multiplier
}

/// Total, per-material and bonus-coin breakdown for a set of pipes
pub fn score_pipes<'a, I>(pipes: I, ctx: &ScoreContext) -> Breakdown
where
    I: IntoIterator<Item = &'a ScoredPipe>,
{
    let mut breakdown = Breakdown::default();
    for pipe in pipes {
        let value = score_pipe(pipe, ctx);
        breakdown.total += value;
        *breakdown.by_material.entry(pipe.material).or_insert(0.0) += value;
    }
    breakdown.coin_bonus = (breakdown.total / POINTS_PER_BONUS_COIN).floor().max(0.0) as u64;
    breakdown
}
