//! Pipe materials
//!
//! Materials scale a pipe's score and how quickly its heads extend.

use serde::{Deserialize, Serialize};

/// Material of a pipe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Standard,
    Glow,
    Glass,
    Chrome,
}

impl Material {
    /// Fixed enumeration order (material draws walk this order)
    pub const ALL: [Material; 4] = [
        Material::Standard,
        Material::Glow,
        Material::Glass,
        Material::Chrome,
    ];

    /// Base points per scored unit of length
    pub fn base_value(&self) -> f64 {
        match self {
            Material::Standard => 12.0,
            Material::Glow => 18.0,
            Material::Glass => 20.0,
            Material::Chrome => 15.0,
        }
    }

    /// Growth step factor; the head's interval is divided by this, so
    /// values below 1 grow more slowly
    pub fn step_factor(&self) -> f32 {
        match self {
            Material::Standard => 1.0,
            Material::Glow => 0.9,
            Material::Glass => 0.8,
            Material::Chrome => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Standard => "Standard",
            Material::Glow => "Glow",
            Material::Glass => "Glass",
            Material::Chrome => "Chrome",
        }
    }

    /// Word shown after the material name when a peg swaps it in
    pub fn flavor(&self) -> &'static str {
        match self {
            Material::Standard => "Steel",
            Material::Glow => "Bloom",
            Material::Glass => "Prism",
            Material::Chrome => "Sheen",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(Material::Standard),
            "glow" => Some(Material::Glow),
            "glass" => Some(Material::Glass),
            "chrome" => Some(Material::Chrome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrips_names() {
        for material in Material::ALL {
            assert_eq!(Material::from_str(material.as_str()), Some(material));
        }
        assert_eq!(Material::from_str("GLOW"), Some(Material::Glow));
        assert_eq!(Material::from_str("plastic"), None);
    }

    #[test]
    fn test_slower_materials_have_smaller_step() {
        assert!(Material::Glass.step_factor() < Material::Glow.step_factor());
        assert!(Material::Glow.step_factor() < Material::Standard.step_factor());
        assert_eq!(Material::Chrome.step_factor(), 1.0);
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&Material::Chrome).unwrap();
        assert_eq!(json, "\"chrome\"");
    }
}
