use roman_core::{
    wait_until_done, ArmChannel, ArmCommand, ArmMove, ArmState, ExecutionMode, MotionTarget,
    WaitPolicy,
};
use tracing::debug;

use crate::Error;

/// Arm controller: the last state read from an arm channel, and the commands
/// sent to it.
pub struct Arm {
    channel: Box<dyn ArmChannel>,
    state: ArmState,
    wait_policy: WaitPolicy,
    max_acceleration: f64,
}

impl std::fmt::Debug for Arm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arm")
            .field("execution_mode", &self.channel.execution_mode())
            .field("state", &self.state)
            .finish()
    }
}

impl Arm {
    pub fn new(channel: Box<dyn ArmChannel>, wait_policy: WaitPolicy, max_acceleration: f64) -> Self {
        Self {
            channel,
            state: ArmState::default(),
            wait_policy,
            max_acceleration,
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.channel.execution_mode()
    }

    pub fn wait_policy(&self) -> &WaitPolicy {
        &self.wait_policy
    }

    /// The state from the last call on the channel.
    pub fn state(&self) -> &ArmState {
        &self.state
    }

    pub fn read(&mut self) -> Result<&ArmState, Error> {
        self.state = self.channel.execute(&ArmCommand::Read)?;
        Ok(&self.state)
    }

    /// Moves to `target` with joint speeds up to `max_speed`.
    ///
    /// A blocking move returns once the arm reports completion. A
    /// non-blocking move returns right away; on an
    /// [`InProcess`](ExecutionMode::InProcess) channel it then only
    /// progresses on later calls.
    pub fn move_to(
        &mut self,
        target: impl Into<MotionTarget>,
        max_speed: f64,
        blocking: bool,
    ) -> Result<&ArmState, Error> {
        let command = ArmMove::new(target, max_speed, self.max_acceleration);
        self.execute_move(command, blocking)
    }

    pub fn execute_move(&mut self, command: ArmMove, blocking: bool) -> Result<&ArmState, Error> {
        debug!(?command, blocking, "arm move");
        self.state = self.channel.execute(&ArmCommand::Move(command))?;
        if blocking {
            self.wait()?;
        }
        Ok(&self.state)
    }

    pub fn stop(&mut self, blocking: bool) -> Result<&ArmState, Error> {
        self.state = self.channel.execute(&ArmCommand::Stop)?;
        if blocking {
            self.wait()?;
        }
        Ok(&self.state)
    }

    fn wait(&mut self) -> Result<(), Error> {
        let mode = self.channel.execution_mode();
        let channel = &mut self.channel;
        self.state = wait_until_done(mode, &self.wait_policy, self.state.clone(), || {
            channel.execute(&ArmCommand::Read)
        })?;
        Ok(())
    }
}
