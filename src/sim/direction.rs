//! Axis-aligned growth directions
//!
//! A head always travels along one of the six axis-aligned unit vectors.
//! Keeping the direction as a closed enum makes that invariant structural.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// A world axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the positive end of the axis
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// One of the six axis-aligned unit directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    PosX,
    NegX,
    #[default]
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    /// Candidate order used by weighted sampling
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    /// Integer components of the unit vector
    pub fn as_ivec3(&self) -> IVec3 {
        match self {
            Direction::PosX => IVec3::X,
            Direction::NegX => IVec3::NEG_X,
            Direction::PosY => IVec3::Y,
            Direction::NegY => IVec3::NEG_Y,
            Direction::PosZ => IVec3::Z,
            Direction::NegZ => IVec3::NEG_Z,
        }
    }

    #[inline]
    pub fn as_vec3(&self) -> Vec3 {
        self.as_ivec3().as_vec3()
    }

    /// Map an integer unit vector back to a direction
    pub fn from_ivec3(v: IVec3) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_ivec3() == v)
    }

    /// Quarter turn about X: (x, y, z) -> (x, -z, y)
    pub fn rotate_about_x(&self) -> Self {
        let v = self.as_ivec3();
        Self::from_rotated(IVec3::new(v.x, -v.z, v.y))
    }

    /// Quarter turn about Y: (x, y, z) -> (z, y, -x)
    pub fn rotate_about_y(&self) -> Self {
        let v = self.as_ivec3();
        Self::from_rotated(IVec3::new(v.z, v.y, -v.x))
    }

    /// Quarter turn about Z: (x, y, z) -> (-y, x, z)
    pub fn rotate_about_z(&self) -> Self {
        let v = self.as_ivec3();
        Self::from_rotated(IVec3::new(-v.y, v.x, v.z))
    }

    /// Pick a fork direction from a uniform roll in [0, 1).
    ///
    /// The 0.33 / 0.66 split selects the X, Y or Z quarter turn. A turn about
    /// the axis the head already travels along leaves it unchanged, so the
    /// resulting set is intentionally non-uniform.
    pub fn fork_turn(&self, roll: f32) -> Self {
        if roll < 0.33 {
            self.rotate_about_x()
        } else if roll < 0.66 {
            self.rotate_about_y()
        } else {
            self.rotate_about_z()
        }
    }

    // Quarter turns of a unit axis vector are always unit axis vectors
    fn from_rotated(v: IVec3) -> Self {
        Self::from_ivec3(v).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ivec_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_ivec3(dir.as_ivec3()), Some(dir));
            assert_eq!(dir.as_vec3().length(), 1.0);
        }
        assert_eq!(Direction::from_ivec3(IVec3::new(1, 1, 0)), None);
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(Direction::PosY.rotate_about_x(), Direction::PosZ);
        assert_eq!(Direction::PosY.rotate_about_y(), Direction::PosY);
        assert_eq!(Direction::PosY.rotate_about_z(), Direction::NegX);
        assert_eq!(Direction::PosX.rotate_about_y(), Direction::NegZ);
        assert_eq!(Direction::PosZ.rotate_about_x(), Direction::NegY);
    }

    #[test]
    fn test_four_turns_return_home() {
        for dir in Direction::ALL {
            let mut d = dir;
            for _ in 0..4 {
                d = d.rotate_about_z();
            }
            assert_eq!(d, dir);
        }
    }

    #[test]
    fn test_fork_turn_thresholds() {
        let dir = Direction::PosY;
        assert_eq!(dir.fork_turn(0.0), Direction::PosZ);
        assert_eq!(dir.fork_turn(0.329), Direction::PosZ);
        assert_eq!(dir.fork_turn(0.33), Direction::PosY);
        assert_eq!(dir.fork_turn(0.65), Direction::PosY);
        assert_eq!(dir.fork_turn(0.66), Direction::NegX);
        assert_eq!(dir.fork_turn(0.999), Direction::NegX);
    }
}
