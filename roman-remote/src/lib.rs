//! Out-of-process transport for roman.
//!
//! [`ControllerServer`] hosts a simulated world behind a small HTTP/JSON API
//! and ticks it in real time on a background thread. [`RemoteConnection`]
//! talks to such a server and hands out channels whose motions keep running
//! between calls.

mod client;
mod pacer;
mod protocol;
mod server;
mod utils;

pub use client::*;
pub use pacer::*;
pub use protocol::*;
pub use server::*;
