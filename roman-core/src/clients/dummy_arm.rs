use crate::{
    clients::{CallLog, CallRecord, ChannelCall},
    error::Error,
    traits::{ArmChannel, ExecutionMode},
    types::{ArmCommand, ArmMove, ArmState, MotionTarget},
};

/// Dummy ArmChannel for Debug or Tests
///
/// Every call that finds a motion outstanding advances time by one tick.
/// A move completes after `ticks_per_move` such calls and jumps to its target.
#[derive(Debug)]
pub struct DummyArm {
    pub state: ArmState,
    log: CallLog,
    mode: ExecutionMode,
    tick_duration: f64,
    ticks_per_move: usize,
    remaining_ticks: usize,
    pending: Option<ArmMove>,
    reachable: bool,
}

impl DummyArm {
    pub fn new(log: CallLog) -> Self {
        Self {
            state: ArmState::default(),
            log,
            mode: ExecutionMode::InProcess,
            tick_duration: 0.01,
            ticks_per_move: 3,
            remaining_ticks: 0,
            pending: None,
            reachable: true,
        }
    }

    pub fn with_ticks_per_move(mut self, ticks_per_move: usize) -> Self {
        self.ticks_per_move = ticks_per_move;
        self
    }

    pub fn with_tick_duration(mut self, tick_duration: f64) -> Self {
        self.tick_duration = tick_duration;
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Makes every Cartesian move fail with [`Error::Unreachable`].
    pub fn with_unreachable_poses(mut self) -> Self {
        self.reachable = false;
        self
    }

    fn advance(&mut self) {
        if self.pending.is_none() {
            return;
        }
        self.state.time += self.tick_duration;
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        if let Some(arm_move) = self.pending.take() {
            match arm_move.target {
                MotionTarget::Pose(pose) => self.state.tool_pose = pose,
                MotionTarget::Joints(joints) => self.state.joint_positions = joints,
            }
        }
        self.state.is_done = true;
    }
}

impl ArmChannel for DummyArm {
    fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    fn execute(&mut self, command: &ArmCommand) -> Result<ArmState, Error> {
        match command {
            ArmCommand::Read => self.advance(),
            ArmCommand::Move(arm_move) => {
                if let (MotionTarget::Pose(pose), false) = (&arm_move.target, self.reachable) {
                    return Err(Error::Unreachable {
                        message: format!("{pose:?}"),
                    });
                }
                if let MotionTarget::Joints(joints) = arm_move.target {
                    self.state.target_joint_positions = joints;
                }
                self.pending = Some(*arm_move);
                self.remaining_ticks = self.ticks_per_move;
                self.state.is_done = false;
                if self.ticks_per_move == 0 {
                    self.finish();
                } else {
                    self.advance();
                }
            }
            ArmCommand::Stop => {
                self.pending = None;
                self.remaining_ticks = 0;
                self.state.is_done = true;
            }
        }
        self.log.push(CallRecord {
            call: ChannelCall::Arm(*command),
            time: self.state.time,
            is_done: self.state.is_done,
        });
        Ok(self.state.clone())
    }
}
