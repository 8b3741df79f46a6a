mod command;
mod gripper;
mod joints;
mod pose;
mod state;

pub use command::*;
pub use gripper::*;
pub use joints::*;
pub use pose::*;
pub use state::*;
