use roman_core::{Finger, GripperPosition, MotionState, WaitPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{arm::Arm, config::RobotConfig, connection::Connection, gripper::Gripper, Error};

/// Outcome of [`Robot::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Both the arm and the gripper completed their commands.
    Done,
    /// The control tick ran out first. The commands keep running.
    DeadlineReached,
}

/// An arm and a gripper behind one [`Connection`].
#[derive(Debug)]
pub struct Robot {
    connection: Connection,
    arm: Arm,
    gripper: Gripper,
}

/// Connects to the in-process simulation when `use_sim`, otherwise to the
/// real robot through the default controller process.
pub fn connect(use_sim: bool) -> Result<Robot, Error> {
    Robot::connect(&RobotConfig::new(use_sim))
}

impl Robot {
    pub fn connect(config: &RobotConfig) -> Result<Self, Error> {
        let wait_policy = config.wait_policy()?;
        let connection = Connection::open(config)?;
        Self::with_connection(connection, wait_policy, config.max_acceleration)
    }

    /// Binds controllers to the channels of `connection` and reads both
    /// actuators once.
    pub fn with_connection(
        mut connection: Connection,
        wait_policy: WaitPolicy,
        max_acceleration: f64,
    ) -> Result<Self, Error> {
        let arm = Arm::new(connection.arm_channel()?, wait_policy, max_acceleration);
        let gripper = Gripper::new(connection.gripper_channel()?, wait_policy);
        let mut robot = Self {
            connection,
            arm,
            gripper,
        };
        robot.read()?;
        info!(
            mode = ?robot.arm.execution_mode(),
            time = robot.arm.state().time,
            "robot connected"
        );
        Ok(robot)
    }

    pub fn arm(&self) -> &Arm {
        &self.arm
    }

    pub fn arm_mut(&mut self) -> &mut Arm {
        &mut self.arm
    }

    pub fn gripper(&self) -> &Gripper {
        &self.gripper
    }

    pub fn gripper_mut(&mut self) -> &mut Gripper {
        &mut self.gripper
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Refreshes the arm state, then the gripper state.
    pub fn read(&mut self) -> Result<(), Error> {
        self.arm.read()?;
        self.gripper.read()?;
        Ok(())
    }

    /// Moves the tool by `(dx, dy, dz)` and turns it by `dyaw` about the
    /// yaw axis, waiting for the arm, then moves every finger to
    /// `gripper_target`, waiting for the gripper.
    pub fn move_simple(
        &mut self,
        dx: f64,
        dy: f64,
        dz: f64,
        dyaw: f64,
        gripper_target: GripperPosition,
        max_speed: f64,
    ) -> Result<(), Error> {
        self.arm.read()?;
        let target = self.arm.state().tool_pose().shifted(dx, dy, dz, dyaw);
        self.arm.move_to(target, max_speed, true)?;
        self.gripper.move_to(Finger::All, gripper_target, true)?;
        Ok(())
    }

    /// One control tick of at most `dt` controller seconds.
    ///
    /// Sends the gripper command, then the arm command (same target as
    /// [`move_simple`](Self::move_simple)), both non-blocking, and keeps
    /// reading until both are done or `dt` has passed since the arm command.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        dx: f64,
        dy: f64,
        dz: f64,
        dyaw: f64,
        gripper_target: GripperPosition,
        max_speed: f64,
        dt: f64,
    ) -> Result<StepStatus, Error> {
        self.arm.read()?;
        let target = self.arm.state().tool_pose().shifted(dx, dy, dz, dyaw);
        self.gripper.move_to(Finger::All, gripper_target, false)?;
        self.arm.move_to(target, max_speed, false)?;
        let deadline = self.arm.state().time() + dt;
        let mode = self.arm.execution_mode();
        let wait_policy = *self.arm.wait_policy();
        loop {
            if self.arm.state().is_done() && self.gripper.state().is_done() {
                return Ok(StepStatus::Done);
            }
            if self.arm.state().time() >= deadline {
                debug!(deadline, "step deadline reached");
                return Ok(StepStatus::DeadlineReached);
            }
            wait_policy.pause(mode);
            self.read()?;
        }
    }

    /// Stops both actuators and closes the connection.
    pub fn disconnect(self) -> Result<(), Error> {
        let Self {
            connection,
            mut arm,
            mut gripper,
        } = self;
        arm.stop(false)?;
        gripper.stop()?;
        // channels must be released before the connection
        drop(arm);
        drop(gripper);
        connection.disconnect()?;
        info!("robot disconnected");
        Ok(())
    }
}
