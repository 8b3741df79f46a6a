use anyhow::anyhow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::Error,
    traits::ArmFirmware,
    types::{ArmCommand, ArmMove, ArmState, Joints, MotionTarget},
};

/// Joint speed below which a halting arm counts as resting.
const REST_SPEED: f64 = 1e-9;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArmProgramConfig {
    /// Largest per-joint position error (rad) of a completed move.
    #[serde(default = "default_joint_tolerance")]
    pub joint_tolerance: f64,
    /// Largest per-joint speed (rad/s) at which a move may complete.
    #[serde(default = "default_speed_tolerance")]
    pub speed_tolerance: f64,
    /// Proportional gain (1/s) from position error to joint speed near the
    /// target.
    #[serde(default = "default_position_gain")]
    pub position_gain: f64,
    /// Deceleration (rad/s^2) applied by a `Stop` command.
    #[serde(default = "default_stop_deceleration")]
    pub stop_deceleration: f64,
}

fn default_joint_tolerance() -> f64 {
    1e-3
}

fn default_speed_tolerance() -> f64 {
    0.02
}

fn default_position_gain() -> f64 {
    10.0
}

fn default_stop_deceleration() -> f64 {
    4.0
}

impl Default for ArmProgramConfig {
    fn default() -> Self {
        Self {
            joint_tolerance: default_joint_tolerance(),
            speed_tolerance: default_speed_tolerance(),
            position_gain: default_position_gain(),
            stop_deceleration: default_stop_deceleration(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveMove {
    target: Joints,
    max_speed: f64,
    max_acceleration: f64,
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Move(ActiveMove),
    Halt { deceleration: f64 },
}

/// Control program of an arm controller.
///
/// Turns move commands into acceleration-limited joint speed commands on an
/// [`ArmFirmware`]. [`control`](Self::control) runs one control period and
/// must be called once per firmware tick.
#[derive(Debug)]
pub struct ArmProgram {
    config: ArmProgramConfig,
    motion: Option<Motion>,
    target_positions: Option<Joints>,
    target_speeds: Joints,
}

impl ArmProgram {
    pub fn new(config: ArmProgramConfig) -> Self {
        Self {
            config,
            motion: None,
            target_positions: None,
            target_speeds: Joints::zeros(),
        }
    }

    /// Whether a move or a halt is still in progress.
    pub fn is_active(&self) -> bool {
        self.motion.is_some()
    }

    /// Forgets any motion without commanding the firmware.
    pub fn reset(&mut self) {
        self.motion = None;
        self.target_positions = None;
        self.target_speeds = Joints::zeros();
    }

    pub fn apply<F>(&mut self, firmware: &mut F, command: &ArmCommand) -> Result<(), Error>
    where
        F: ArmFirmware + ?Sized,
    {
        match command {
            ArmCommand::Read => Ok(()),
            ArmCommand::Move(arm_move) => self.start_move(&*firmware, arm_move),
            ArmCommand::Stop => {
                debug!("arm stop requested");
                self.motion = Some(Motion::Halt {
                    deceleration: self.config.stop_deceleration,
                });
                Ok(())
            }
        }
    }

    fn start_move<F>(&mut self, firmware: &F, arm_move: &ArmMove) -> Result<(), Error>
    where
        F: ArmFirmware + ?Sized,
    {
        if !(arm_move.max_speed > 0.0 && arm_move.max_acceleration > 0.0) {
            return Err(Error::Other(anyhow!(
                "max_speed and max_acceleration must be positive: {arm_move:?}"
            )));
        }
        let target = match &arm_move.target {
            MotionTarget::Pose(pose) => firmware.inverse_kinematics(pose)?,
            MotionTarget::Joints(joints) => *joints,
        };
        if matches!(self.motion, Some(Motion::Move(_))) {
            warn!("superseding the outstanding arm motion");
        }
        debug!(?target, max_speed = arm_move.max_speed, "arm move started");
        self.target_positions = Some(target);
        self.motion = Some(Motion::Move(ActiveMove {
            target,
            max_speed: arm_move.max_speed,
            max_acceleration: arm_move.max_acceleration,
        }));
        Ok(())
    }

    /// Runs one control period.
    pub fn control<F>(&mut self, firmware: &mut F) -> Result<(), Error>
    where
        F: ArmFirmware + ?Sized,
    {
        let Some(motion) = self.motion else {
            return Ok(());
        };
        let speeds = firmware.actual_joint_speeds()?;
        match motion {
            Motion::Move(active) => {
                let error = active.target - firmware.actual_joint_positions()?;
                if error.max_abs() < self.config.joint_tolerance
                    && speeds.max_abs() < self.config.speed_tolerance
                {
                    debug!("arm move reached its target");
                    self.halt(firmware, &speeds, active.max_acceleration)
                } else {
                    let gain = self.config.position_gain;
                    let desired = error.map(|e| {
                        let magnitude = active
                            .max_speed
                            .min((2.0 * active.max_acceleration * e.abs()).sqrt())
                            .min(gain * e.abs());
                        magnitude.copysign(e)
                    });
                    self.target_speeds = desired;
                    firmware.velocity_servo(&desired, active.max_acceleration)
                }
            }
            Motion::Halt { deceleration } => self.halt(firmware, &speeds, deceleration),
        }
    }

    fn halt<F>(&mut self, firmware: &mut F, speeds: &Joints, deceleration: f64) -> Result<(), Error>
    where
        F: ArmFirmware + ?Sized,
    {
        self.target_speeds = Joints::zeros();
        if speeds.max_abs() <= REST_SPEED {
            self.motion = None;
            Ok(())
        } else {
            self.motion = Some(Motion::Halt { deceleration });
            firmware.velocity_servo(&Joints::zeros(), deceleration)
        }
    }

    /// State of the arm at controller time `time`.
    pub fn state<F>(&self, firmware: &F, time: f64) -> Result<ArmState, Error>
    where
        F: ArmFirmware + ?Sized,
    {
        let joint_positions = firmware.actual_joint_positions()?;
        Ok(ArmState {
            time,
            is_done: !self.is_active(),
            tool_pose: firmware.actual_tool_pose()?,
            tool_speed: firmware.actual_tool_speed()?,
            joint_positions,
            joint_speeds: firmware.actual_joint_speeds()?,
            joint_torques: firmware.actual_joint_torques()?,
            target_joint_positions: self.target_positions.unwrap_or(joint_positions),
            target_joint_speeds: self.target_speeds,
            target_tool_pose: optional_sensor(firmware.target_tool_pose())?,
            tool_force: optional_sensor(firmware.tool_force())?,
            tool_acceleration: optional_sensor(firmware.tool_acceleration())?,
        })
    }
}

impl Default for ArmProgram {
    fn default() -> Self {
        Self::new(ArmProgramConfig::default())
    }
}

/// Maps [`Error::SensorUnavailable`] to `None` and keeps other errors.
pub fn optional_sensor<T>(reading: Result<T, Error>) -> Result<Option<T>, Error> {
    match reading {
        Ok(value) => Ok(Some(value)),
        Err(Error::SensorUnavailable { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
