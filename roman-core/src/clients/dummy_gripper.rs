use crate::{
    clients::{CallLog, CallRecord, ChannelCall},
    error::Error,
    traits::{ExecutionMode, GripperChannel},
    types::{GripperCommand, GripperState},
};

/// Dummy GripperChannel for Debug or Tests
#[derive(Debug)]
pub struct DummyGripper {
    pub state: GripperState,
    log: CallLog,
    mode: ExecutionMode,
    tick_duration: f64,
    ticks_per_move: usize,
    remaining_ticks: usize,
}

impl DummyGripper {
    pub fn new(log: CallLog) -> Self {
        Self {
            state: GripperState::default(),
            log,
            mode: ExecutionMode::InProcess,
            tick_duration: 0.01,
            ticks_per_move: 3,
            remaining_ticks: 0,
        }
    }

    pub fn with_ticks_per_move(mut self, ticks_per_move: usize) -> Self {
        self.ticks_per_move = ticks_per_move;
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    fn advance(&mut self) {
        if self.state.is_done {
            return;
        }
        self.state.time += self.tick_duration;
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            self.state.positions = self.state.targets;
            self.state.is_done = true;
        }
    }
}

impl GripperChannel for DummyGripper {
    fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    fn execute(&mut self, command: &GripperCommand) -> Result<GripperState, Error> {
        match command {
            GripperCommand::Read => self.advance(),
            GripperCommand::Move(gripper_move) => {
                for (i, target) in self.state.targets.iter_mut().enumerate() {
                    if gripper_move.finger.selects(i) {
                        *target = gripper_move.position.0;
                    }
                }
                self.remaining_ticks = self.ticks_per_move;
                self.state.is_done = false;
                if self.ticks_per_move == 0 {
                    self.state.positions = self.state.targets;
                    self.state.is_done = true;
                } else {
                    self.advance();
                }
            }
            GripperCommand::Stop => {
                self.state.targets = self.state.positions;
                self.remaining_ticks = 0;
                self.state.is_done = true;
            }
        }
        self.log.push(CallRecord {
            call: ChannelCall::Gripper(*command),
            time: self.state.time,
            is_done: self.state.is_done,
        });
        Ok(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Finger, GripperMove, GripperPosition};

    #[test]
    fn test_move_single_finger() {
        let mut gripper = DummyGripper::new(CallLog::new()).with_ticks_per_move(1);
        let state = gripper
            .execute(&GripperCommand::Move(GripperMove {
                finger: Finger::C,
                position: GripperPosition::CLOSED,
            }))
            .unwrap();
        assert!(state.is_done);
        assert_eq!(state.positions, [0, 0, 255]);
    }
}
