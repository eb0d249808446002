//! Per-run state and upgrade modifiers
//!
//! `RunModifiers` is the value object handed to every engine operation. The
//! engine, the resolver and scoring only ever read it; upgrades replace it
//! between rounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::rng::{BOARD_PURPOSE, RngState, stream_label, upgrade_label};
use crate::sim::{Breakdown, Material, PegHit};

/// Accumulated upgrade bonuses for the current run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunModifiers {
    /// Added to every pipe's value multiplier when scoring
    pub pipe_value_bonus: f32,
    /// Global growth-rate bonus applied to every head
    pub grow_speed_bonus: f32,
    /// Extra heads spawned by each FORK peg
    pub fork_bonus: u32,
    /// Extra coins per BANK peg
    pub bank_bonus: u32,
    /// Extra drops per round
    pub extra_balls: u32,
    /// Added weight for each material when a fork picks its material
    pub material_bias: BTreeMap<Material, f32>,
    /// Fractional bonus on showcase points
    pub showcase_bonus: f32,
}

impl RunModifiers {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Material bias, 0 when the upgrade never touched that material
    pub fn material_bias(&self, material: Material) -> f32 {
        self.material_bias.get(&material).copied().unwrap_or(0.0)
    }
}

/// Points and coins granted when a round's showcase completes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub points: u64,
    pub coins: u64,
}

/// Run-level ledger: seed, round counter, currency and score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Base seed every sub-stream label is derived from
    pub base_seed: u64,
    /// Current round (1-based)
    pub round: u32,
    pub coins: u64,
    pub score: u64,
    /// Upgrade-owned modifiers
    pub modifiers: RunModifiers,
}

impl RunState {
    pub fn new(base_seed: u64) -> Self {
        Self {
            base_seed,
            round: 1,
            coins: 0,
            score: 0,
            modifiers: RunModifiers::default(),
        }
    }

    /// Balls the player may drop this round
    pub fn drops_for_round(&self) -> u32 {
        BASE_DROPS_PER_ROUND + self.modifiers.extra_balls
    }

    /// Stream the board collaborator uses for this round's peg layout
    pub fn board_rng(&self) -> RngState {
        RngState::from_label(stream_label(self.base_seed, BOARD_PURPOSE, self.round))
    }

    /// Stream for the n-th upgrade offer of this round
    pub fn upgrade_rng(&self, reroll: u32) -> RngState {
        RngState::from_label(upgrade_label(self.base_seed, self.round, reroll))
    }

    /// Credit the coin side of a resolved peg hit
    pub fn apply_peg_hit(&mut self, hit: &PegHit) {
        self.coins = self.coins.saturating_add(u64::from(hit.coins_delta));
    }

    /// Award the showcase breakdown
    pub fn apply_breakdown(&mut self, breakdown: &Breakdown) -> Reward {
        let scale = 1.0 + f64::from(self.modifiers.showcase_bonus);
        let reward = Reward {
            points: (breakdown.total * scale).max(0.0).round() as u64,
            coins: breakdown.coin_bonus,
        };
        self.score += reward.points;
        self.coins += reward.coins;
        log::info!(
            "Round {} reward: {} points, {} coins (score {}, coins {})",
            self.round,
            reward.points,
            reward.coins,
            self.score,
            self.coins
        );
        reward
    }

    pub fn advance_round(&mut self) {
        self.round += 1;
    }
}
