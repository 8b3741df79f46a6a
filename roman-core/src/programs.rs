mod arm_program;
mod gripper_program;

pub use arm_program::*;
pub use gripper_program::*;
