use std::fmt;

use anyhow::anyhow;
use k::{nalgebra as na, InverseKinematicsSolver};
use roman_core::Error;
use tracing::{debug, info};

/// Handle of a body loaded into a [`PhysicsSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

/// Motor mode of a single joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotorControl {
    /// No actuation. The joint keeps its speed.
    Free,
    Velocity {
        target_velocity: f64,
        max_force: f64,
    },
    Position {
        target_position: f64,
        max_velocity: f64,
        max_force: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointState {
    pub position: f64,
    pub velocity: f64,
    /// Motor torque (or force, for prismatic joints) applied during the last
    /// tick.
    pub applied_torque: f64,
    pub motor: MotorControl,
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            applied_torque: 0.0,
            motor: MotorControl::Free,
        }
    }
}

/// World-frame state of the end link of a body's kinematic chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkState {
    pub position: [f64; 3],
    /// `[x, y, z, w]`
    pub orientation: [f64; 4],
    pub linear_velocity: [f64; 3],
    pub angular_velocity: [f64; 3],
}

struct Kinematics {
    arm: k::SerialChain<f64>,
    solver: k::JacobianIkSolver<f64>,
}

impl fmt::Debug for Kinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kinematics")
            .field("dof", &self.arm.dof())
            .finish()
    }
}

#[derive(Debug)]
struct Body {
    name: String,
    inertia: f64,
    joints: Vec<JointState>,
    kinematics: Option<Kinematics>,
}

/// Fixed-step simulation of articulated bodies.
///
/// Every joint is a single degree of freedom with constant inertia, driven by
/// its motor. A session is created once, may be reset any number of times and
/// ends with [`destroy`](Self::destroy).
#[derive(Debug)]
pub struct PhysicsSession {
    tick_duration: f64,
    steps: u64,
    bodies: Vec<Body>,
}

impl PhysicsSession {
    pub fn create(tick_duration: f64) -> Result<Self, Error> {
        if !(tick_duration.is_finite() && tick_duration > 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("tick_duration must be positive, got {tick_duration}"),
            });
        }
        info!(tick_duration, "physics session created");
        Ok(Self {
            tick_duration,
            steps: 0,
            bodies: Vec::new(),
        })
    }

    /// Rewinds time and puts every joint back to rest at zero.
    pub fn reset(&mut self) {
        self.steps = 0;
        for body in &mut self.bodies {
            body.joints.fill(JointState::default());
        }
        debug!("physics session reset");
    }

    pub fn destroy(self) {
        info!(
            bodies = self.bodies.len(),
            time = self.time(),
            "physics session destroyed"
        );
    }

    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    /// Simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.tick_duration
    }

    /// Loads a body with `dof` joints and no kinematic model.
    pub fn add_body(&mut self, name: &str, dof: usize, inertia: f64) -> BodyId {
        self.push_body(name, dof, inertia, None)
    }

    /// Loads the movable joints of `arm` as a body. Its end link is reported
    /// by [`link_state`](Self::link_state).
    pub fn add_kinematic_body(
        &mut self,
        name: &str,
        arm: k::SerialChain<f64>,
        solver: k::JacobianIkSolver<f64>,
        inertia: f64,
    ) -> BodyId {
        let dof = arm.dof();
        self.push_body(name, dof, inertia, Some(Kinematics { arm, solver }))
    }

    fn push_body(
        &mut self,
        name: &str,
        dof: usize,
        inertia: f64,
        kinematics: Option<Kinematics>,
    ) -> BodyId {
        self.bodies.push(Body {
            name: name.to_owned(),
            inertia,
            joints: vec![JointState::default(); dof],
            kinematics,
        });
        debug!(name, dof, "body loaded");
        BodyId(self.bodies.len() - 1)
    }

    fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }

    fn joint_mut(&mut self, id: BodyId, joint: usize) -> Result<&mut JointState, Error> {
        let body = &mut self.bodies[id.0];
        let dof = body.joints.len();
        body.joints
            .get_mut(joint)
            .ok_or_else(|| Error::Other(anyhow!("{}: no joint {joint} (dof = {dof})", body.name)))
    }

    pub fn joint_states(&self, id: BodyId) -> &[JointState] {
        &self.body(id).joints
    }

    /// Teleports a joint to `position` at rest and releases its motor.
    pub fn reset_joint_state(
        &mut self,
        id: BodyId,
        joint: usize,
        position: f64,
    ) -> Result<(), Error> {
        *self.joint_mut(id, joint)? = JointState {
            position,
            ..Default::default()
        };
        Ok(())
    }

    pub fn set_motor_control(
        &mut self,
        id: BodyId,
        joint: usize,
        motor: MotorControl,
    ) -> Result<(), Error> {
        self.joint_mut(id, joint)?.motor = motor;
        Ok(())
    }

    /// Advances every body by one tick.
    pub fn step(&mut self) {
        let dt = self.tick_duration;
        for body in &mut self.bodies {
            let inertia = body.inertia;
            for joint in &mut body.joints {
                actuate(joint, inertia, dt);
            }
        }
        self.steps += 1;
    }

    fn positioned_kinematics(&self, id: BodyId) -> Result<&Kinematics, Error> {
        let body = self.body(id);
        let kinematics = body.kinematics.as_ref().ok_or_else(|| {
            Error::Other(anyhow!("{} has no kinematic model", body.name))
        })?;
        let positions: Vec<f64> = body.joints.iter().map(|j| j.position).collect();
        kinematics.arm.set_joint_positions_clamped(&positions);
        Ok(kinematics)
    }

    pub fn link_state(&self, id: BodyId) -> Result<LinkState, Error> {
        let arm = &self.positioned_kinematics(id)?.arm;
        arm.update_transforms();
        let end = arm.end_transform();
        let velocities: Vec<f64> = self.body(id).joints.iter().map(|j| j.velocity).collect();
        let twist = k::jacobian(arm) * na::DVector::from_vec(velocities);
        let t = end.translation.vector;
        let q = end.rotation;
        Ok(LinkState {
            position: [t.x, t.y, t.z],
            orientation: [q.i, q.j, q.k, q.w],
            linear_velocity: [twist[0], twist[1], twist[2]],
            angular_velocity: [twist[3], twist[4], twist[5]],
        })
    }

    /// Joint positions placing the end link at `target`, searched from the
    /// current configuration.
    pub fn inverse_kinematics(
        &self,
        id: BodyId,
        target: &na::Isometry3<f64>,
    ) -> Result<Vec<f64>, Error> {
        let kinematics = self.positioned_kinematics(id)?;
        kinematics
            .solver
            .solve(&kinematics.arm, target)
            .map_err(|e| Error::Unreachable {
                message: format!("{target}: {e}"),
            })?;
        Ok(kinematics.arm.joint_positions())
    }
}

fn actuate(joint: &mut JointState, inertia: f64, dt: f64) {
    let (desired, max_force) = match joint.motor {
        MotorControl::Free => {
            joint.applied_torque = 0.0;
            joint.position += joint.velocity * dt;
            return;
        }
        MotorControl::Velocity {
            target_velocity,
            max_force,
        } => (target_velocity, max_force),
        MotorControl::Position {
            target_position,
            max_velocity,
            max_force,
        } => (
            ((target_position - joint.position) / dt).clamp(-max_velocity, max_velocity),
            max_force,
        ),
    };
    let required = inertia * (desired - joint.velocity) / dt;
    if required.abs() <= max_force {
        joint.velocity = desired;
        joint.applied_torque = required;
    } else {
        let torque = max_force.copysign(required);
        joint.velocity += torque / inertia * dt;
        joint.applied_torque = torque;
    }
    joint.position += joint.velocity * dt;
}
