use roman_core::{
    wait_until_done, ExecutionMode, Finger, GripperChannel, GripperCommand, GripperMove,
    GripperPosition, GripperState, WaitPolicy,
};
use tracing::debug;

use crate::Error;

/// Gripper controller, shaped like [`Arm`](crate::Arm).
pub struct Gripper {
    channel: Box<dyn GripperChannel>,
    state: GripperState,
    wait_policy: WaitPolicy,
}

impl std::fmt::Debug for Gripper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gripper")
            .field("execution_mode", &self.channel.execution_mode())
            .field("state", &self.state)
            .finish()
    }
}

impl Gripper {
    pub fn new(channel: Box<dyn GripperChannel>, wait_policy: WaitPolicy) -> Self {
        Self {
            channel,
            state: GripperState::default(),
            wait_policy,
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.channel.execution_mode()
    }

    pub fn state(&self) -> &GripperState {
        &self.state
    }

    pub fn read(&mut self) -> Result<&GripperState, Error> {
        self.state = self.channel.execute(&GripperCommand::Read)?;
        Ok(&self.state)
    }

    pub fn move_to(
        &mut self,
        finger: Finger,
        position: GripperPosition,
        blocking: bool,
    ) -> Result<&GripperState, Error> {
        debug!(?finger, ?position, blocking, "gripper move");
        self.state = self
            .channel
            .execute(&GripperCommand::Move(GripperMove { finger, position }))?;
        if blocking {
            self.wait()?;
        }
        Ok(&self.state)
    }

    pub fn open(&mut self, blocking: bool) -> Result<&GripperState, Error> {
        self.move_to(Finger::All, GripperPosition::OPENED, blocking)
    }

    pub fn close(&mut self, blocking: bool) -> Result<&GripperState, Error> {
        self.move_to(Finger::All, GripperPosition::CLOSED, blocking)
    }

    pub fn stop(&mut self) -> Result<&GripperState, Error> {
        self.state = self.channel.execute(&GripperCommand::Stop)?;
        Ok(&self.state)
    }

    fn wait(&mut self) -> Result<(), Error> {
        let mode = self.channel.execution_mode();
        let channel = &mut self.channel;
        self.state = wait_until_done(mode, &self.wait_policy, self.state.clone(), || {
            channel.execute(&GripperCommand::Read)
        })?;
        Ok(())
    }
}
