use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    types::{ArmCommand, ArmState, GripperCommand, GripperState},
};

/// Where the actuator's control loop runs relative to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// The controller runs on the caller's thread. Nothing advances between
    /// calls, so a non-blocking command only progresses on later calls.
    InProcess,
    /// The controller runs elsewhere and keeps moving between calls.
    OutOfProcess,
}

/// Command channel to an arm controller.
#[auto_impl(&mut, Box)]
pub trait ArmChannel: Send {
    fn execution_mode(&self) -> ExecutionMode;

    /// Sends `command` and returns the controller state observed after it
    /// was applied.
    fn execute(&mut self, command: &ArmCommand) -> Result<ArmState, Error>;
}

/// Command channel to a gripper controller.
#[auto_impl(&mut, Box)]
pub trait GripperChannel: Send {
    fn execution_mode(&self) -> ExecutionMode;

    fn execute(&mut self, command: &GripperCommand) -> Result<GripperState, Error>;
}
