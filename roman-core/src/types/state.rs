use serde::{Deserialize, Serialize};

use super::{Joints, Pose, FINGERS};

/// Time and completion of an actuator state, shared by arm and gripper.
pub trait MotionState {
    /// Controller time in seconds. Never decreases.
    fn time(&self) -> f64;
    /// False while a command is outstanding.
    fn is_done(&self) -> bool;
}

/// Snapshot of an arm controller.
///
/// `target_joint_positions` and `target_joint_speeds` are what the controller
/// is currently commanding. Readbacks a backend does not provide are `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    pub time: f64,
    pub is_done: bool,
    pub tool_pose: Pose,
    /// `[vx, vy, vz, wx, wy, wz]` of the tool frame.
    pub tool_speed: [f64; 6],
    pub joint_positions: Joints,
    pub joint_speeds: Joints,
    pub joint_torques: Joints,
    pub target_joint_positions: Joints,
    pub target_joint_speeds: Joints,
    #[serde(default)]
    pub target_tool_pose: Option<Pose>,
    #[serde(default)]
    pub tool_force: Option<[f64; 6]>,
    #[serde(default)]
    pub tool_acceleration: Option<[f64; 3]>,
}

impl ArmState {
    pub fn tool_pose(&self) -> Pose {
        self.tool_pose
    }

    pub fn joint_positions(&self) -> Joints {
        self.joint_positions
    }
}

impl Default for ArmState {
    fn default() -> Self {
        Self {
            time: 0.0,
            is_done: true,
            tool_pose: Pose::default(),
            tool_speed: [0.0; 6],
            joint_positions: Joints::zeros(),
            joint_speeds: Joints::zeros(),
            joint_torques: Joints::zeros(),
            target_joint_positions: Joints::zeros(),
            target_joint_speeds: Joints::zeros(),
            target_tool_pose: None,
            tool_force: None,
            tool_acceleration: None,
        }
    }
}

impl MotionState for ArmState {
    fn time(&self) -> f64 {
        self.time
    }

    fn is_done(&self) -> bool {
        self.is_done
    }
}

/// Snapshot of a gripper controller. Positions use the
/// [`GripperPosition`](super::GripperPosition) scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GripperState {
    pub time: f64,
    pub is_done: bool,
    pub positions: [u8; FINGERS],
    pub targets: [u8; FINGERS],
}

impl Default for GripperState {
    fn default() -> Self {
        Self {
            time: 0.0,
            is_done: true,
            positions: [0; FINGERS],
            targets: [0; FINGERS],
        }
    }
}

impl MotionState for GripperState {
    fn time(&self) -> f64 {
        self.time
    }

    fn is_done(&self) -> bool {
        self.is_done
    }
}
