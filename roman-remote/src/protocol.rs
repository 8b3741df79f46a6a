use roman_core::{Error, SENSORS};
use serde::{Deserialize, Serialize};

/// Kind of robot a controller drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Sim,
    Real,
}

/// Reply of `GET info`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub backend: Backend,
    pub tick_duration: f64,
    pub time: f64,
}

/// Body of every command reply. Unreachable targets and unavailable sensors
/// keep their error kind across the wire; other failures arrive as
/// [`Error::Remote`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum Reply<S> {
    Ok(S),
    Unreachable(String),
    SensorUnavailable(String),
    Failed(String),
}

impl<S> Reply<S> {
    pub fn from_result(result: Result<S, Error>) -> Self {
        match result {
            Ok(state) => Reply::Ok(state),
            Err(Error::Unreachable { message }) => Reply::Unreachable(message),
            Err(Error::SensorUnavailable { sensor }) => {
                Reply::SensorUnavailable(sensor.to_owned())
            }
            Err(e) => Reply::Failed(e.to_string()),
        }
    }

    pub fn into_result(self) -> Result<S, Error> {
        match self {
            Reply::Ok(state) => Ok(state),
            Reply::Unreachable(message) => Err(Error::Unreachable { message }),
            Reply::SensorUnavailable(name) => {
                match SENSORS.iter().copied().find(|sensor| *sensor == name) {
                    Some(sensor) => Err(Error::SensorUnavailable { sensor }),
                    None => Err(Error::Remote {
                        message: format!("sensor {name} is not available"),
                    }),
                }
            }
            Reply::Failed(message) => Err(Error::Remote { message }),
        }
    }
}
