//! Deterministic random streams
//!
//! Every subsystem draws from its own stream. A stream is identified by a
//! label string built from the run's base seed, a purpose tag and the round
//! number; the label is hashed (FNV-1a, 64 bit) into a PCG seed. The label
//! composition is the whole determinism contract.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Purpose tag for the growth engine's per-round stream
pub const PIPES_PURPOSE: &str = "pipes-round-";
/// Purpose tag for the peg board's per-round stream
pub const BOARD_PURPOSE: &str = "board-round-";
/// Purpose tag for upgrade offers (followed by round and reroll)
pub const UPGRADES_PURPOSE: &str = "upgrades-round-";

/// Compose a stream label: `"{base_seed}:{purpose}{round}"`
pub fn stream_label(base_seed: u64, purpose: &str, round: u32) -> String {
    format!("{base_seed}:{purpose}{round}")
}

/// Label for the upgrade offer stream of a round's n-th reroll
pub fn upgrade_label(base_seed: u64, round: u32, reroll: u32) -> String {
    format!("{}-reroll-{reroll}", stream_label(base_seed, UPGRADES_PURPOSE, round))
}

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

/// 64-bit FNV-1a hash of a label
pub fn hash_label(label: &str) -> u64 {
    label.bytes().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Labelled RNG seed (serializable so a stream can be rebuilt)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub label: String,
    pub seed: u64,
}

impl RngState {
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let seed = hash_label(&label);
        Self { label, seed }
    }

    /// Fresh generator positioned at the start of the stream
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Draw an index from `weights` proportionally to each weight.
///
/// Draws `r` uniformly in `[0, total)` and walks the weights in order,
/// subtracting each until the remainder drops to zero or below. Returns
/// `None` only for an empty slice.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f32]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f32 = weights.iter().sum();
    let mut r = rng.random::<f32>() * total;
    for (i, w) in weights.iter().enumerate() {
        r -= w;
        if r <= 0.0 {
            return Some(i);
        }
    }
    // Float drift can leave a sliver of remainder
    Some(weights.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_composition() {
        assert_eq!(stream_label(42, PIPES_PURPOSE, 3), "42:pipes-round-3");
        assert_eq!(stream_label(7, BOARD_PURPOSE, 1), "7:board-round-1");
        assert_eq!(upgrade_label(42, 2, 1), "42:upgrades-round-2-reroll-1");
    }

    #[test]
    fn test_fnv1a_known_values() {
        assert_eq!(hash_label(""), 0xcbf29ce484222325);
        assert_eq!(hash_label("a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_same_label_same_stream() {
        let a = RngState::from_label("9:pipes-round-1");
        let b = RngState::from_label("9:pipes-round-1");
        let c = RngState::from_label("9:pipes-round-2");
        assert_eq!(a, b);
        assert_ne!(a.seed, c.seed);

        let mut ra = a.to_rng();
        let mut rb = b.to_rng();
        for _ in 0..32 {
            assert_eq!(ra.random::<u32>(), rb.random::<u32>());
        }
    }

    #[test]
    fn test_weighted_index_edges() {
        let mut rng = RngState::from_label("weights").to_rng();
        assert_eq!(weighted_index(&mut rng, &[]), None);
        assert_eq!(weighted_index(&mut rng, &[5.0]), Some(0));
        for _ in 0..200 {
            let i = weighted_index(&mut rng, &[1.0, 0.0]).unwrap();
            assert_eq!(i, 0);
        }
    }

    #[test]
    fn test_weighted_index_proportions() {
        let mut rng = RngState::from_label("proportions").to_rng();
        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            counts[weighted_index(&mut rng, &[1.0, 3.0]).unwrap()] += 1;
        }
        let share = counts[1] as f32 / 10_000.0;
        assert!((share - 0.75).abs() < 0.03, "share was {share}");
    }
}
