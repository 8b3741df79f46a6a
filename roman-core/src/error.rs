use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("roman-core: Connection error : {}", message)]
    Connection { message: String },
    #[error("roman-core: Unreachable target : {}", message)]
    Unreachable { message: String },
    #[error("roman-core: Sensor {} is not available on this backend", sensor)]
    SensorUnavailable { sensor: &'static str },
    #[error(
        "roman-core: Timeout {:?}: motion still running after {:.3} seconds",
        timeout,
        elapsed
    )]
    Timeout {
        timeout: std::time::Duration,
        elapsed: f64,
    },
    #[error("roman-core: Invalid config : {}", message)]
    InvalidConfig { message: String },
    #[error("roman-core: Remote controller error : {}", message)]
    Remote { message: String },
    #[error("roman-core: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
