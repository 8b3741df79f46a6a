mod clients;
mod error;
mod programs;
mod traits;
mod types;
mod waits;

pub use clients::*;
pub use error::*;
pub use programs::*;
pub use traits::*;
pub use types::*;
pub use waits::*;

// re-export
pub use nalgebra::{Isometry3, UnitQuaternion};
