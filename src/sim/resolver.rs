//! Peg-hit resolution
//!
//! Maps a peg's static tags plus the run's modifiers to effects, a coin
//! delta and display labels. Pure: nothing here touches engine state.

use serde::{Deserialize, Serialize};

use super::direction::Axis;
use super::effect::Effect;
use super::material::Material;
use crate::RunModifiers;
use crate::consts::*;

/// Static tag carried by a peg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PegTag {
    #[serde(rename = "MULT")]
    Mult,
    #[serde(rename = "GROW")]
    Grow,
    #[serde(rename = "FORK")]
    Fork,
    #[serde(rename = "BANK")]
    Bank,
    #[serde(rename = "BIAS_Y+")]
    BiasYPos,
    #[serde(rename = "MATERIAL_GLOW")]
    MaterialGlow,
    #[serde(rename = "MATERIAL_GLASS")]
    MaterialGlass,
    #[serde(rename = "MATERIAL_CHROME")]
    MaterialChrome,
}

impl PegTag {
    pub const ALL: [PegTag; 8] = [
        PegTag::Mult,
        PegTag::Grow,
        PegTag::Fork,
        PegTag::Bank,
        PegTag::BiasYPos,
        PegTag::MaterialGlow,
        PegTag::MaterialGlass,
        PegTag::MaterialChrome,
    ];
}

/// A peg as seen by the resolver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub id: u32,
    #[serde(default)]
    pub tags: Vec<PegTag>,
}

impl Peg {
    pub fn new(id: u32, tags: Vec<PegTag>) -> Self {
        Self { id, tags }
    }
}

/// Outcome of a single peg collision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PegHit {
    pub labels: Vec<String>,
    pub effects: Vec<Effect>,
    pub coins_delta: u32,
}

/// Resolve a peg collision into effects, coins and labels.
///
/// Each tag contributes independently; a blank peg still produces a pulse so
/// every collision shows something.
pub fn resolve_peg_hit(peg: &Peg, mods: &RunModifiers) -> PegHit {
    let mut hit = PegHit::default();

    if peg.tags.is_empty() {
        hit.effects.push(Effect::pulse(BLANK_PULSE_AMOUNT));
        hit.labels.push("Riff".to_string());
        return hit;
    }

    for tag in &peg.tags {
        match tag {
            PegTag::Mult => {
                hit.effects.push(Effect::mult(MULT_AMOUNT));
                hit.labels.push("MULT +15%".to_string());
            }
            PegTag::Grow => {
                hit.effects.push(Effect::grow(GROW_AMOUNT, GROW_DURATION));
                hit.labels.push("GROW +30%".to_string());
            }
            PegTag::Fork => {
                hit.effects.push(Effect::fork(1u32.saturating_add(mods.fork_bonus) as f32));
                hit.labels.push("FORK +1".to_string());
            }
            PegTag::Bank => {
                let coins = 1u32.saturating_add(mods.bank_bonus);
                hit.coins_delta = hit.coins_delta.saturating_add(coins);
                hit.labels.push(format!("BANK +{coins}c"));
            }
            PegTag::BiasYPos => {
                hit.effects.push(Effect::bias(Axis::Y, BIAS_AMOUNT));
                hit.labels.push("BIAS Y+".to_string());
            }
            PegTag::MaterialGlow => push_material(&mut hit, Material::Glow),
            PegTag::MaterialGlass => push_material(&mut hit, Material::Glass),
            PegTag::MaterialChrome => push_material(&mut hit, Material::Chrome),
        }
    }

    hit
}

fn push_material(hit: &mut PegHit, material: Material) {
    hit.effects.push(Effect::material(material));
    hit.labels
        .push(format!("{} {}", material.as_str(), material.flavor()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blank_peg_is_riff() {
        let hit = resolve_peg_hit(&Peg::new(1, vec![]), &RunModifiers::default());
        assert_eq!(hit.effects, vec![Effect::pulse(1.0)]);
        assert_eq!(hit.labels, vec!["Riff".to_string()]);
        assert_eq!(hit.coins_delta, 0);
    }

    #[test]
    fn test_tag_table() {
        let mods = RunModifiers::default();
        let cases = [
            (PegTag::Mult, Some(Effect::mult(0.15)), "MULT +15%"),
            (PegTag::Grow, Some(Effect::grow(0.3, 3.0)), "GROW +30%"),
            (PegTag::Fork, Some(Effect::fork(1.0)), "FORK +1"),
            (PegTag::Bank, None, "BANK +1c"),
            (PegTag::BiasYPos, Some(Effect::bias(Axis::Y, 2.0)), "BIAS Y+"),
            (
                PegTag::MaterialGlow,
                Some(Effect::material(Material::Glow)),
                "Glow Bloom",
            ),
            (
                PegTag::MaterialGlass,
                Some(Effect::material(Material::Glass)),
                "Glass Prism",
            ),
            (
                PegTag::MaterialChrome,
                Some(Effect::material(Material::Chrome)),
                "Chrome Sheen",
            ),
        ];

        for (tag, effect, label) in cases {
            let hit = resolve_peg_hit(&Peg::new(0, vec![tag]), &mods);
            assert_eq!(hit.effects, effect.into_iter().collect::<Vec<_>>(), "{tag:?}");
            assert_eq!(hit.labels, vec![label.to_string()]);
        }
    }

    #[test]
    fn test_bonuses_applied() {
        let mods = RunModifiers {
            fork_bonus: 2,
            bank_bonus: 4,
            ..Default::default()
        };
        let hit = resolve_peg_hit(&Peg::new(0, vec![PegTag::Fork, PegTag::Bank]), &mods);
        assert_eq!(hit.effects, vec![Effect::fork(3.0)]);
        assert_eq!(hit.coins_delta, 5);
        assert_eq!(hit.labels, vec!["FORK +1".to_string(), "BANK +5c".to_string()]);
    }

    #[test]
    fn test_huge_bonuses_saturate() {
        let mods = RunModifiers {
            fork_bonus: u32::MAX,
            bank_bonus: u32::MAX - 1,
            ..Default::default()
        };
        let peg = Peg::new(0, vec![PegTag::Fork, PegTag::Bank, PegTag::Bank]);
        let hit = resolve_peg_hit(&peg, &mods);
        assert_eq!(hit.effects, vec![Effect::fork(u32::MAX as f32)]);
        assert_eq!(hit.coins_delta, u32::MAX);
        assert_eq!(hit.labels[1], format!("BANK +{}c", u32::MAX));
    }

    #[test]
    fn test_multi_tag_union() {
        let peg = Peg::new(0, vec![PegTag::Mult, PegTag::Bank, PegTag::Bank, PegTag::Grow]);
        let hit = resolve_peg_hit(&peg, &RunModifiers::default());
        assert_eq!(hit.effects, vec![Effect::mult(0.15), Effect::grow(0.3, 3.0)]);
        assert_eq!(hit.coins_delta, 2);
        assert_eq!(hit.labels.len(), 4);
    }

    #[test]
    fn test_tags_parse_from_wire_names() {
        let peg: Peg = serde_json::from_str(r#"{"id": 4, "tags": ["BIAS_Y+", "MATERIAL_GLASS"]}"#)
            .unwrap();
        assert_eq!(peg.tags, vec![PegTag::BiasYPos, PegTag::MaterialGlass]);
    }

    proptest! {
        #[test]
        fn prop_one_label_per_tag(indices in proptest::collection::vec(0usize..8, 0..12)) {
            let tags: Vec<PegTag> = indices.iter().map(|&i| PegTag::ALL[i]).collect();
            let banks = tags.iter().filter(|t| **t == PegTag::Bank).count();
            let hit = resolve_peg_hit(&Peg::new(0, tags.clone()), &RunModifiers::default());

            if tags.is_empty() {
                prop_assert_eq!(hit.labels.len(), 1);
                prop_assert_eq!(hit.effects.len(), 1);
            } else {
                prop_assert_eq!(hit.labels.len(), tags.len());
                prop_assert_eq!(hit.effects.len(), tags.len() - banks);
                prop_assert_eq!(hit.coins_delta as usize, banks);
            }
        }
    }
}
