use std::f64::consts::FRAC_PI_2;

use k::nalgebra as na;
use roman_core::{ArmFirmware, Error, Joints, Pose, DOF};
use tracing::debug;

use crate::{
    config::SimConfig,
    session::{BodyId, JointState, MotorControl, PhysicsSession},
    ur5::ur5_chain,
};

/// Joint configuration restored by [`UrArm::reset`].
pub const HOME_JOINT_POSITIONS: [f64; DOF] =
    [0.0, -FRAC_PI_2, FRAC_PI_2, -FRAC_PI_2, -FRAC_PI_2, 0.0];

/// Simulated UR5 controller: the firmware surface of a real arm on top of a
/// [`PhysicsSession`].
#[derive(Debug)]
pub struct UrArm<'a> {
    session: &'a mut PhysicsSession,
    body: BodyId,
    config: &'a SimConfig,
}

impl<'a> UrArm<'a> {
    /// Loads a UR5 body into `session`.
    pub fn load(session: &mut PhysicsSession, config: &SimConfig) -> BodyId {
        session.add_kinematic_body(
            "ur5",
            ur5_chain(),
            config.ik_solver.build(),
            config.joint_inertia,
        )
    }

    pub fn new(session: &'a mut PhysicsSession, body: BodyId, config: &'a SimConfig) -> Self {
        Self {
            session,
            body,
            config,
        }
    }

    /// Moves the arm to [`HOME_JOINT_POSITIONS`] at rest.
    pub fn reset(&mut self) -> Result<(), Error> {
        for (i, position) in HOME_JOINT_POSITIONS.iter().enumerate() {
            self.session.reset_joint_state(self.body, i, *position)?;
            self.session.set_motor_control(
                self.body,
                i,
                MotorControl::Velocity {
                    target_velocity: 0.0,
                    max_force: self.config.max_joint_force,
                },
            )?;
        }
        Ok(())
    }

    fn joints(&self, value: impl Fn(&JointState) -> f64) -> Result<Joints, Error> {
        let values: Vec<f64> = self
            .session
            .joint_states(self.body)
            .iter()
            .map(value)
            .collect();
        Joints::from_slice(&values).ok_or_else(|| Error::Other(anyhow::anyhow!(
            "the arm body has {} joints",
            values.len()
        )))
    }
}

fn unavailable<T>(sensor: &'static str) -> Result<T, Error> {
    Err(Error::SensorUnavailable { sensor })
}

impl ArmFirmware for UrArm<'_> {
    fn inverse_kinematics(&self, pose: &Pose) -> Result<Joints, Error> {
        let [x, y, z, rx, ry, rz] = pose.to_array();
        let target = na::Isometry3::from_parts(
            na::Translation3::new(x, y, z),
            na::UnitQuaternion::from_scaled_axis(na::Vector3::new(rx, ry, rz)),
        );
        let solution = self.session.inverse_kinematics(self.body, &target)?;
        Joints::from_slice(&solution).ok_or_else(|| Error::Unreachable {
            message: format!("solver returned {} joints", solution.len()),
        })
    }

    fn actual_tool_pose(&self) -> Result<Pose, Error> {
        let link = self.session.link_state(self.body)?;
        let [x, y, z] = link.position;
        let [rx, ry, rz] = rotation_vector_from_quaternion(link.orientation);
        Ok(Pose::new(x, y, z, rx, ry, rz))
    }

    fn actual_tool_speed(&self) -> Result<[f64; 6], Error> {
        let link = self.session.link_state(self.body)?;
        let [vx, vy, vz] = link.linear_velocity;
        let [wx, wy, wz] = link.angular_velocity;
        Ok([vx, vy, vz, wx, wy, wz])
    }

    fn actual_joint_positions(&self) -> Result<Joints, Error> {
        self.joints(|j| j.position)
    }

    fn actual_joint_speeds(&self) -> Result<Joints, Error> {
        self.joints(|j| j.velocity)
    }

    fn actual_joint_torques(&self) -> Result<Joints, Error> {
        self.joints(|j| j.applied_torque)
    }

    fn target_tool_pose(&self) -> Result<Pose, Error> {
        unavailable("target_tool_pose")
    }

    fn target_tool_speed(&self) -> Result<[f64; 6], Error> {
        unavailable("target_tool_speed")
    }

    fn target_joint_positions(&self) -> Result<Joints, Error> {
        unavailable("target_joint_positions")
    }

    fn target_joint_speeds(&self) -> Result<Joints, Error> {
        unavailable("target_joint_speeds")
    }

    fn tool_force(&self) -> Result<[f64; 6], Error> {
        unavailable("tool_force")
    }

    fn tool_acceleration(&self) -> Result<[f64; 3], Error> {
        unavailable("tool_acceleration")
    }

    fn velocity_servo(&mut self, speeds: &Joints, max_acceleration: f64) -> Result<(), Error> {
        let step = max_acceleration * self.session.tick_duration();
        let current = self.actual_joint_speeds()?;
        for i in 0..DOF {
            let target = speeds[i];
            let command = if current[i] < target {
                (current[i] + step).min(target)
            } else if current[i] > target {
                (current[i] - step).max(target)
            } else if self.config.zero_speed_on_target {
                0.0
            } else {
                target
            };
            self.session.set_motor_control(
                self.body,
                i,
                MotorControl::Velocity {
                    target_velocity: command,
                    max_force: self.config.max_joint_force,
                },
            )?;
        }
        Ok(())
    }

    fn set_payload(&mut self, mass: f64, center_of_gravity: [f64; 3]) -> Result<(), Error> {
        debug!(mass, ?center_of_gravity, "payload is ignored in simulation");
        Ok(())
    }

    fn set_tool_offset(&mut self, offset: &Pose) -> Result<(), Error> {
        debug!(?offset, "tool offset is ignored in simulation");
        Ok(())
    }
}

/// Converts an `[x, y, z, w]` quaternion to a rotation vector.
///
/// `q` and `-q` give the same vector: the quaternion is first moved to the
/// hemisphere with non-negative `w` (ties at `w == 0` are broken on the first
/// non-zero vector component).
pub fn rotation_vector_from_quaternion(q: [f64; 4]) -> [f64; 3] {
    let [x, y, z, w] = q;
    let first_nonzero = [x, y, z].into_iter().find(|v| *v != 0.0).unwrap_or(0.0);
    let sign = if w < 0.0 || (w == 0.0 && first_nonzero < 0.0) {
        -1.0
    } else {
        1.0
    };
    let (x, y, z, w) = (x * sign, y * sign, z * sign, w * sign);
    let norm = (x * x + y * y + z * z).sqrt();
    if norm < 1e-12 {
        return [0.0; 3];
    }
    let angle = 2.0 * norm.atan2(w);
    [x / norm * angle, y / norm * angle, z / norm * angle]
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_rotation_vector_identity() {
        assert_eq!(rotation_vector_from_quaternion([0.0, 0.0, 0.0, 1.0]), [0.0; 3]);
        assert_eq!(rotation_vector_from_quaternion([0.0, 0.0, 0.0, -1.0]), [0.0; 3]);
    }

    #[test]
    fn test_rotation_vector_half_turn_tie() {
        let a = rotation_vector_from_quaternion([0.0, 1.0, 0.0, 0.0]);
        let b = rotation_vector_from_quaternion([0.0, -1.0, 0.0, 0.0]);
        assert_eq!(a, b);
        assert_approx_eq!(a[1], PI);
    }
}
