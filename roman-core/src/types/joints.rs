use std::ops::{Index, IndexMut, Sub};

use serde::{Deserialize, Serialize};

/// Number of joints of the supported arms.
pub const DOF: usize = 6;

/// Joint ordering shared by every [`Joints`] value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    Base,
    Shoulder,
    Elbow,
    Wrist1,
    Wrist2,
    Wrist3,
}

impl Joint {
    pub const ALL: [Joint; DOF] = [
        Joint::Base,
        Joint::Shoulder,
        Joint::Elbow,
        Joint::Wrist1,
        Joint::Wrist2,
        Joint::Wrist3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-joint angles, velocities or torques, index-aligned with [`Joint`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Joints([f64; DOF]);

impl Joints {
    pub const fn new(
        base: f64,
        shoulder: f64,
        elbow: f64,
        wrist1: f64,
        wrist2: f64,
        wrist3: f64,
    ) -> Self {
        Self([base, shoulder, elbow, wrist1, wrist2, wrist3])
    }

    pub const fn zeros() -> Self {
        Self([0.0; DOF])
    }

    pub const fn from_array(values: [f64; DOF]) -> Self {
        Self(values)
    }

    pub const fn to_array(&self) -> [f64; DOF] {
        self.0
    }

    /// Builds joints from a slice, returning `None` unless it holds exactly
    /// [`DOF`] values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        values.try_into().ok().map(Self)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    pub fn map(&self, f: impl FnMut(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }
}

impl From<[f64; DOF]> for Joints {
    fn from(values: [f64; DOF]) -> Self {
        Self(values)
    }
}

impl From<Joints> for [f64; DOF] {
    fn from(joints: Joints) -> Self {
        joints.0
    }
}

impl Index<usize> for Joints {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Joints {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl Index<Joint> for Joints {
    type Output = f64;

    fn index(&self, joint: Joint) -> &f64 {
        &self.0[joint.index()]
    }
}

impl Sub for Joints {
    type Output = Joints;

    fn sub(self, rhs: Joints) -> Joints {
        let mut out = self;
        for (o, r) in out.0.iter_mut().zip(rhs.0) {
            *o -= r;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_joint_order() {
        let joints = Joints::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_approx_eq!(joints[Joint::Base], 1.0);
        assert_approx_eq!(joints[Joint::Elbow], 3.0);
        assert_approx_eq!(joints[Joint::Wrist3], 6.0);
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn test_sub_and_max_abs() {
        let a = Joints::new(1.0, 0.0, 0.5, 0.0, 0.0, 0.0);
        let b = Joints::new(0.0, 2.0, 0.0, 0.0, 0.0, -0.25);
        let diff = a - b;
        assert_approx_eq!(diff[1], -2.0);
        assert_approx_eq!(diff[5], 0.25);
        assert_approx_eq!(diff.max_abs(), 2.0);
    }

    #[test]
    fn test_from_slice() {
        assert!(Joints::from_slice(&[0.0; 5]).is_none());
        let joints = Joints::from_slice(&[0.5; 6]).unwrap();
        assert_approx_eq!(joints[Joint::Wrist2], 0.5);
    }
}
