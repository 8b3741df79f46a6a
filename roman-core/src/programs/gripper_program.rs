use tracing::debug;

use crate::{
    error::Error,
    traits::GripperFirmware,
    types::{GripperCommand, GripperPosition, GripperState, FINGERS},
};

/// Fingers within half a position step of their target are in place.
const POSITION_TOLERANCE: f64 = 0.5 / 255.0;

/// Control program of a gripper controller.
#[derive(Debug, Default)]
pub struct GripperProgram {
    targets: Option<[f64; FINGERS]>,
    moving: bool,
}

impl GripperProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.moving
    }

    pub fn reset(&mut self) {
        self.targets = None;
        self.moving = false;
    }

    pub fn apply<F>(&mut self, firmware: &mut F, command: &GripperCommand) -> Result<(), Error>
    where
        F: GripperFirmware + ?Sized,
    {
        match command {
            GripperCommand::Read => Ok(()),
            GripperCommand::Move(gripper_move) => {
                let mut targets = match self.targets {
                    Some(targets) => targets,
                    None => firmware.finger_positions()?,
                };
                for (i, target) in targets.iter_mut().enumerate() {
                    if gripper_move.finger.selects(i) {
                        *target = gripper_move.position.to_ratio();
                    }
                }
                debug!(?gripper_move, "gripper move started");
                firmware.command_fingers(targets)?;
                self.targets = Some(targets);
                self.moving = true;
                Ok(())
            }
            GripperCommand::Stop => {
                let positions = firmware.finger_positions()?;
                firmware.command_fingers(positions)?;
                self.targets = Some(positions);
                self.moving = false;
                Ok(())
            }
        }
    }

    /// Runs one control period.
    pub fn control<F>(&mut self, firmware: &mut F) -> Result<(), Error>
    where
        F: GripperFirmware + ?Sized,
    {
        let Some(targets) = self.targets.filter(|_| self.moving) else {
            return Ok(());
        };
        let positions = firmware.finger_positions()?;
        if positions
            .iter()
            .zip(targets)
            .all(|(p, t)| (p - t).abs() < POSITION_TOLERANCE)
        {
            debug!("gripper move reached its target");
            self.moving = false;
        }
        Ok(())
    }

    pub fn state<F>(&self, firmware: &F, time: f64) -> Result<GripperState, Error>
    where
        F: GripperFirmware + ?Sized,
    {
        let positions = firmware.finger_positions()?;
        let targets = self.targets.unwrap_or(positions);
        Ok(GripperState {
            time,
            is_done: !self.moving,
            positions: positions.map(|p| GripperPosition::from_ratio(p).0),
            targets: targets.map(|t| GripperPosition::from_ratio(t).0),
        })
    }
}
