mod call_log;
mod dummy_arm;
mod dummy_gripper;

pub use call_log::*;
pub use dummy_arm::*;
pub use dummy_gripper::*;
