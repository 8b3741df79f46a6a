//! Support code of the `roman` command line tool.

pub mod utils;

use roman::{ArmState, GripperState, Robot};
use serde::Serialize;

/// Snapshot of both actuators, as printed by the tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotReport {
    pub arm: ArmState,
    pub gripper: GripperState,
}

impl RobotReport {
    pub fn new(robot: &Robot) -> Self {
        Self {
            arm: robot.arm().state().clone(),
            gripper: robot.gripper().state().clone(),
        }
    }
}
