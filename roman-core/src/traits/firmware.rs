use crate::{
    error::Error,
    types::{Joints, Pose, FINGERS},
};

/// Names of the firmware readbacks, as reported by
/// [`Error::SensorUnavailable`].
pub const SENSORS: [&str; 12] = [
    "actual_tool_pose",
    "actual_tool_speed",
    "actual_joint_positions",
    "actual_joint_speeds",
    "actual_joint_torques",
    "target_tool_pose",
    "target_tool_speed",
    "target_joint_positions",
    "target_joint_speeds",
    "tool_force",
    "tool_acceleration",
    "finger_positions",
];

/// Command surface of an arm controller's firmware.
///
/// Readbacks a backend cannot provide return [`Error::SensorUnavailable`].
pub trait ArmFirmware {
    /// Joint configuration reaching `pose`, seeded from the current one.
    fn inverse_kinematics(&self, pose: &Pose) -> Result<Joints, Error>;

    fn actual_tool_pose(&self) -> Result<Pose, Error>;
    /// `[vx, vy, vz, wx, wy, wz]` of the tool frame.
    fn actual_tool_speed(&self) -> Result<[f64; 6], Error>;
    fn actual_joint_positions(&self) -> Result<Joints, Error>;
    fn actual_joint_speeds(&self) -> Result<Joints, Error>;
    fn actual_joint_torques(&self) -> Result<Joints, Error>;

    fn target_tool_pose(&self) -> Result<Pose, Error>;
    fn target_tool_speed(&self) -> Result<[f64; 6], Error>;
    fn target_joint_positions(&self) -> Result<Joints, Error>;
    fn target_joint_speeds(&self) -> Result<Joints, Error>;
    fn tool_force(&self) -> Result<[f64; 6], Error>;
    fn tool_acceleration(&self) -> Result<[f64; 3], Error>;

    /// Moves every joint toward `speeds`, changing each joint speed by at
    /// most `max_acceleration` times one control period.
    fn velocity_servo(&mut self, speeds: &Joints, max_acceleration: f64) -> Result<(), Error>;

    fn set_payload(&mut self, mass: f64, center_of_gravity: [f64; 3]) -> Result<(), Error>;
    fn set_tool_offset(&mut self, offset: &Pose) -> Result<(), Error>;
}

/// Command surface of a gripper's firmware. Finger values are fractions of
/// the closing stroke, `0.0` opened and `1.0` closed.
pub trait GripperFirmware {
    fn finger_positions(&self) -> Result<[f64; FINGERS], Error>;

    fn command_fingers(&mut self, targets: [f64; FINGERS]) -> Result<(), Error>;
}
