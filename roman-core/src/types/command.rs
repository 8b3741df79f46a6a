use serde::{Deserialize, Serialize};

use super::{Finger, GripperPosition, Joints, Pose};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum MotionTarget {
    Pose(Pose),
    Joints(Joints),
}

impl From<Pose> for MotionTarget {
    fn from(pose: Pose) -> Self {
        MotionTarget::Pose(pose)
    }
}

impl From<Joints> for MotionTarget {
    fn from(joints: Joints) -> Self {
        MotionTarget::Joints(joints)
    }
}

/// Arm motion request. Speed in rad/s and acceleration in rad/s^2, applied
/// per joint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmMove {
    pub target: MotionTarget,
    pub max_speed: f64,
    pub max_acceleration: f64,
}

impl ArmMove {
    pub fn new(target: impl Into<MotionTarget>, max_speed: f64, max_acceleration: f64) -> Self {
        Self {
            target: target.into(),
            max_speed,
            max_acceleration,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args")]
pub enum ArmCommand {
    /// Returns the latest state without changing the outstanding motion.
    Read,
    /// Replaces any outstanding motion.
    Move(ArmMove),
    /// Aborts the outstanding motion and brings the joints to rest.
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GripperMove {
    pub finger: Finger,
    pub position: GripperPosition,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args")]
pub enum GripperCommand {
    Read,
    Move(GripperMove),
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_json() {
        let command = ArmCommand::Move(ArmMove::new(Joints::zeros(), 0.5, 1.0));
        let json = serde_json::to_value(command).unwrap();
        assert_eq!(json["type"], "Move");
        assert_eq!(json["args"]["target"]["type"], "Joints");
        let back: ArmCommand = serde_json::from_value(json).unwrap();
        assert_eq!(back, command);

        let read: GripperCommand = serde_json::from_str(r#"{"type":"Read"}"#).unwrap();
        assert_eq!(read, GripperCommand::Read);
    }
}
