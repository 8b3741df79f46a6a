use roman_core::{Error, GripperFirmware, FINGERS};

use crate::{
    config::SimConfig,
    session::{BodyId, MotorControl, PhysicsSession},
};

/// Simulated three-finger gripper. Each finger is one prismatic joint whose
/// position is the fraction of its closing stroke.
#[derive(Debug)]
pub struct RqHand<'a> {
    session: &'a mut PhysicsSession,
    body: BodyId,
    config: &'a SimConfig,
}

impl<'a> RqHand<'a> {
    pub fn load(session: &mut PhysicsSession, config: &SimConfig) -> BodyId {
        session.add_body("rq3", FINGERS, config.joint_inertia)
    }

    pub fn new(session: &'a mut PhysicsSession, body: BodyId, config: &'a SimConfig) -> Self {
        Self {
            session,
            body,
            config,
        }
    }

    /// Opens every finger and holds it there.
    pub fn reset(&mut self) -> Result<(), Error> {
        for finger in 0..FINGERS {
            self.session.reset_joint_state(self.body, finger, 0.0)?;
        }
        self.command_fingers([0.0; FINGERS])
    }
}

impl GripperFirmware for RqHand<'_> {
    fn finger_positions(&self) -> Result<[f64; FINGERS], Error> {
        let joints = self.session.joint_states(self.body);
        let mut positions = [0.0; FINGERS];
        for (position, joint) in positions.iter_mut().zip(joints) {
            *position = joint.position;
        }
        Ok(positions)
    }

    fn command_fingers(&mut self, targets: [f64; FINGERS]) -> Result<(), Error> {
        for (finger, target) in targets.into_iter().enumerate() {
            self.session.set_motor_control(
                self.body,
                finger,
                MotorControl::Position {
                    target_position: target.clamp(0.0, 1.0),
                    max_velocity: self.config.finger_speed,
                    max_force: self.config.max_finger_force,
                },
            )?;
        }
        Ok(())
    }
}
