mod channel;
mod firmware;

pub use channel::*;
pub use firmware::*;
