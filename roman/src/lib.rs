//! Drive a UR arm with a three-finger gripper through one API, whether the
//! robot is simulated in this process, simulated in a controller process or
//! real.
//!
//! ```no_run
//! use roman::GripperPosition;
//!
//! let mut robot = roman::connect(true)?;
//! robot.move_simple(0.0, 0.0, 0.05, 0.0, GripperPosition::CLOSED, 0.5)?;
//! robot.disconnect()?;
//! # Ok::<(), roman::Error>(())
//! ```

mod arm;
mod config;
mod connection;
mod error;
mod gripper;
mod robot;

pub use arm::*;
pub use config::*;
pub use connection::*;
pub use error::*;
pub use gripper::*;
pub use robot::*;

// re-export
pub use roman_core::{
    ArmMove, ArmState, ExecutionMode, Finger, GripperPosition, GripperState, Joint, Joints,
    MotionTarget, Pose,
};
