use roman_core::{
    ArmCommand, ArmProgram, ArmState, Error, GripperCommand, GripperProgram, GripperState,
};
use tracing::{debug, info};

use crate::{config::SimConfig, rq::RqHand, session::BodyId, session::PhysicsSession, ur::UrArm};

/// A simulated UR arm with a three-finger gripper, each driven by its
/// control program.
///
/// Nothing moves unless [`step`](Self::step) is called.
#[derive(Debug)]
pub struct SimWorld {
    config: SimConfig,
    session: PhysicsSession,
    arm: BodyId,
    hand: BodyId,
    arm_program: ArmProgram,
    gripper_program: GripperProgram,
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Result<Self, Error> {
        let mut session = PhysicsSession::create(config.tick_duration)?;
        let arm = UrArm::load(&mut session, &config);
        let hand = RqHand::load(&mut session, &config);
        let arm_program = ArmProgram::new(config.arm_program.clone());
        let mut world = Self {
            config,
            session,
            arm,
            hand,
            arm_program,
            gripper_program: GripperProgram::new(),
        };
        world.reset()?;
        info!("simulated world ready");
        Ok(world)
    }

    /// Puts the arm home and opens the gripper, dropping any motion.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.session.reset();
        UrArm::new(&mut self.session, self.arm, &self.config).reset()?;
        RqHand::new(&mut self.session, self.hand, &self.config).reset()?;
        self.arm_program.reset();
        self.gripper_program.reset();
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.session.time()
    }

    /// Whether either actuator has a command outstanding.
    pub fn is_active(&self) -> bool {
        self.arm_program.is_active() || self.gripper_program.is_active()
    }

    pub fn apply_arm(&mut self, command: &ArmCommand) -> Result<(), Error> {
        let mut arm = UrArm::new(&mut self.session, self.arm, &self.config);
        self.arm_program.apply(&mut arm, command)
    }

    pub fn apply_gripper(&mut self, command: &GripperCommand) -> Result<(), Error> {
        let mut hand = RqHand::new(&mut self.session, self.hand, &self.config);
        self.gripper_program.apply(&mut hand, command)
    }

    /// Runs one control period and one physics tick if anything is moving.
    /// Returns whether time advanced.
    pub fn step(&mut self) -> Result<bool, Error> {
        if !self.is_active() {
            return Ok(false);
        }
        self.advance()?;
        Ok(true)
    }

    /// Runs one control period and one physics tick.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.arm_program
            .control(&mut UrArm::new(&mut self.session, self.arm, &self.config))?;
        self.gripper_program
            .control(&mut RqHand::new(&mut self.session, self.hand, &self.config))?;
        self.session.step();
        Ok(())
    }

    pub fn arm_state(&mut self) -> Result<ArmState, Error> {
        let time = self.session.time();
        let arm = UrArm::new(&mut self.session, self.arm, &self.config);
        self.arm_program.state(&arm, time)
    }

    pub fn gripper_state(&mut self) -> Result<GripperState, Error> {
        let time = self.session.time();
        let hand = RqHand::new(&mut self.session, self.hand, &self.config);
        self.gripper_program.state(&hand, time)
    }

    /// Applies `command`, ticks once if anything is moving and returns the
    /// resulting arm state.
    pub fn execute_arm(&mut self, command: &ArmCommand) -> Result<ArmState, Error> {
        self.apply_arm(command)?;
        self.step()?;
        self.arm_state()
    }

    pub fn execute_gripper(&mut self, command: &GripperCommand) -> Result<GripperState, Error> {
        self.apply_gripper(command)?;
        self.step()?;
        self.gripper_state()
    }

    /// Aborts both actuators' motions and lets the arm come to rest.
    pub fn halt(&mut self) -> Result<(), Error> {
        self.apply_arm(&ArmCommand::Stop)?;
        self.apply_gripper(&GripperCommand::Stop)?;
        let mut ticks = 0;
        while self.step()? {
            ticks += 1;
        }
        debug!(ticks, "world halted");
        Ok(())
    }

    pub fn destroy(self) {
        self.session.destroy();
    }
}
