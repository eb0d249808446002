//! Effect vocabulary
//!
//! An effect is one mutation to apply to a single (pipe, head) pair. Effects
//! never name their target; the engine picks a live head when applying them.
//! Optional magnitudes fall back to engine defaults.

use serde::{Deserialize, Serialize};

use super::direction::Axis;
use super::material::Material;
use crate::consts::*;

/// A typed mutation command produced by a peg hit or an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Effect {
    /// Speed the head up and shorten its interval
    Grow {
        #[serde(default)]
        amount: Option<f32>,
        #[serde(default)]
        duration: Option<f32>,
    },
    /// Spawn `amount` new branches from the head
    Fork {
        #[serde(default)]
        amount: Option<f32>,
    },
    /// Add to the pipe's score multiplier
    Mult {
        #[serde(default)]
        amount: Option<f32>,
    },
    /// Push the head's bias along an axis
    Bias {
        #[serde(default)]
        axis: Axis,
        #[serde(default)]
        amount: Option<f32>,
    },
    /// Replace the pipe's material
    Material {
        #[serde(default)]
        material: Option<Material>,
    },
    /// Flash the pipe
    Pulse {
        #[serde(default)]
        amount: Option<f32>,
    },
}

impl Effect {
    pub fn grow(amount: f32, duration: f32) -> Self {
        Effect::Grow {
            amount: Some(amount),
            duration: Some(duration),
        }
    }

    pub fn fork(amount: f32) -> Self {
        Effect::Fork {
            amount: Some(amount),
        }
    }

    pub fn mult(amount: f32) -> Self {
        Effect::Mult {
            amount: Some(amount),
        }
    }

    pub fn bias(axis: Axis, amount: f32) -> Self {
        Effect::Bias {
            axis,
            amount: Some(amount),
        }
    }

    pub fn material(material: Material) -> Self {
        Effect::Material {
            material: Some(material),
        }
    }

    pub fn pulse(amount: f32) -> Self {
        Effect::Pulse {
            amount: Some(amount),
        }
    }

    /// Type tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::Grow { .. } => "grow",
            Effect::Fork { .. } => "fork",
            Effect::Mult { .. } => "mult",
            Effect::Bias { .. } => "bias",
            Effect::Material { .. } => "material",
            Effect::Pulse { .. } => "pulse",
        }
    }

    /// Magnitude with the engine default applied (0 for material swaps)
    pub fn amount_or_default(&self) -> f32 {
        match *self {
            Effect::Grow { amount, .. } => amount.unwrap_or(DEFAULT_GROW_AMOUNT),
            Effect::Fork { amount } => amount.unwrap_or(DEFAULT_FORK_AMOUNT),
            Effect::Mult { amount } => amount.unwrap_or(DEFAULT_MULT_AMOUNT),
            Effect::Bias { amount, .. } => amount.unwrap_or(DEFAULT_BIAS_AMOUNT),
            Effect::Material { .. } => 0.0,
            Effect::Pulse { amount } => amount.unwrap_or(DEFAULT_PULSE_AMOUNT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_json() {
        let effects: Vec<Effect> = serde_json::from_str(
            r#"[
                {"type": "grow", "amount": 0.3, "duration": 3},
                {"type": "fork", "amount": 2},
                {"type": "bias", "axis": "z", "amount": 2},
                {"type": "material", "material": "glass"},
                {"type": "pulse"}
            ]"#,
        )
        .unwrap();

        assert_eq!(effects[0], Effect::grow(0.3, 3.0));
        assert_eq!(effects[1], Effect::fork(2.0));
        assert_eq!(effects[2], Effect::bias(Axis::Z, 2.0));
        assert_eq!(effects[3], Effect::material(Material::Glass));
        assert_eq!(effects[4], Effect::Pulse { amount: None });
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mult: Effect = serde_json::from_str(r#"{"type": "mult"}"#).unwrap();
        assert_eq!(mult.amount_or_default(), DEFAULT_MULT_AMOUNT);

        let bias: Effect = serde_json::from_str(r#"{"type": "bias"}"#).unwrap();
        assert_eq!(
            bias,
            Effect::Bias {
                axis: Axis::Y,
                amount: None
            }
        );
        assert_eq!(bias.amount_or_default(), DEFAULT_BIAS_AMOUNT);

        let material: Effect = serde_json::from_str(r#"{"type": "material"}"#).unwrap();
        assert_eq!(material, Effect::Material { material: None });
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_json::from_str::<Effect>(r#"{"type": "explode"}"#).is_err());
    }

    #[test]
    fn test_out_of_range_amounts_accepted() {
        let e: Effect = serde_json::from_str(r#"{"type": "grow", "amount": -40}"#).unwrap();
        assert_eq!(e.amount_or_default(), -40.0);
        assert_eq!(e.kind(), "grow");
    }
}
