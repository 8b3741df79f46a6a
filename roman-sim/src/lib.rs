//! Physics-backed stand-in for a UR arm controller and a three-finger
//! gripper.
//!
//! [`PhysicsSession`] owns the simulated bodies and advances them one fixed
//! tick at a time. [`UrArm`] and [`RqHand`] are plants: they expose the same
//! firmware surface a real controller has, on top of a session. [`SimWorld`]
//! runs the arm and gripper control programs against those plants, and
//! [`SimConnection`] hands out in-process channels to it.

mod config;
mod connection;
mod rq;
mod session;
mod ur;
mod ur5;
mod world;

pub use config::*;
pub use connection::*;
pub use rq::*;
pub use session::*;
pub use ur::*;
pub use ur5::*;
pub use world::*;
