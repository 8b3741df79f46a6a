use std::ops::Index;

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Cartesian tool pose in the controller convention `[x, y, z, rx, ry, rz]`:
/// translation in meters followed by a rotation vector (axis times angle, in
/// radians).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose([f64; 6]);

impl Pose {
    pub const fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self([x, y, z, rx, ry, rz])
    }

    pub const fn from_array(values: [f64; 6]) -> Self {
        Self(values)
    }

    pub const fn to_array(&self) -> [f64; 6] {
        self.0
    }

    pub fn position(&self) -> [f64; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn rotation_vector(&self) -> [f64; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    pub fn from_isometry(isometry: &na::Isometry3<f64>) -> Self {
        let t = isometry.translation.vector;
        let r = isometry.rotation.scaled_axis();
        Self([t.x, t.y, t.z, r.x, r.y, r.z])
    }

    pub fn to_isometry(&self) -> na::Isometry3<f64> {
        let [x, y, z, rx, ry, rz] = self.0;
        na::Isometry3::from_parts(
            na::Translation3::new(x, y, z),
            na::UnitQuaternion::from_scaled_axis(na::Vector3::new(rx, ry, rz)),
        )
    }

    /// Builds a pose from `[x, y, z, roll, pitch, yaw]`.
    pub fn from_xyzrpy(values: [f64; 6]) -> Self {
        let [x, y, z, roll, pitch, yaw] = values;
        let r = na::UnitQuaternion::from_euler_angles(roll, pitch, yaw).scaled_axis();
        Self([x, y, z, r.x, r.y, r.z])
    }

    /// Returns `[x, y, z, roll, pitch, yaw]`.
    pub fn to_xyzrpy(&self) -> [f64; 6] {
        let (roll, pitch, yaw) = self.to_isometry().rotation.euler_angles();
        [self.0[0], self.0[1], self.0[2], roll, pitch, yaw]
    }

    /// Returns this pose translated by `(dx, dy, dz)` with `dyaw` added to
    /// its yaw. Roll and pitch are kept.
    pub fn shifted(&self, dx: f64, dy: f64, dz: f64, dyaw: f64) -> Self {
        let mut xyzrpy = self.to_xyzrpy();
        xyzrpy[0] += dx;
        xyzrpy[1] += dy;
        xyzrpy[2] += dz;
        xyzrpy[5] += dyaw;
        Self::from_xyzrpy(xyzrpy)
    }

    /// Largest translation distance and rotation angle between two poses.
    pub fn distance(&self, other: &Self) -> (f64, f64) {
        let a = self.to_isometry();
        let b = other.to_isometry();
        let translation = (a.translation.vector - b.translation.vector).norm();
        let rotation = a.rotation.angle_to(&b.rotation);
        (translation, rotation)
    }
}

impl From<[f64; 6]> for Pose {
    fn from(values: [f64; 6]) -> Self {
        Self(values)
    }
}

impl From<Pose> for [f64; 6] {
    fn from(pose: Pose) -> Self {
        pose.0
    }
}

impl From<na::Isometry3<f64>> for Pose {
    fn from(isometry: na::Isometry3<f64>) -> Self {
        Self::from_isometry(&isometry)
    }
}

impl Index<usize> for Pose {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}
