use roman_core::{ArmChannel, Error as CoreError, ExecutionMode, GripperChannel};
use roman_remote::{Backend, RemoteConnection};
use roman_sim::SimConnection;
use tracing::info;
use url::Url;

use crate::{config::RobotConfig, Error};

/// Transport to an arm and gripper, chosen once from a [`RobotConfig`].
#[derive(Debug)]
pub enum Connection {
    /// Simulation running on the caller's thread.
    Simulated(SimConnection),
    /// Controller process, driving a simulated or real robot.
    Remote(RemoteConnection),
    /// Caller-provided channels.
    Custom(CustomConnection),
}

/// Arm and gripper channels supplied by the caller. Each can be taken once.
pub struct CustomConnection {
    arm: Option<Box<dyn ArmChannel>>,
    gripper: Option<Box<dyn GripperChannel>>,
}

impl std::fmt::Debug for CustomConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomConnection")
            .field("arm", &self.arm.is_some())
            .field("gripper", &self.gripper.is_some())
            .finish()
    }
}

impl Connection {
    pub fn open(config: &RobotConfig) -> Result<Self, Error> {
        match (config.use_sim, config.in_proc) {
            (true, true) => {
                info!("connecting to the in-process simulation");
                Ok(Connection::Simulated(SimConnection::new(config.sim.clone())?))
            }
            (false, true) => Err(CoreError::InvalidConfig {
                message: "the real robot cannot run in process; set in_proc = false".to_owned(),
            }
            .into()),
            (use_sim, false) => {
                let url = Url::parse(&config.remote_url).map_err(|e| CoreError::InvalidConfig {
                    message: format!("remote_url {:?}: {e}", config.remote_url),
                })?;
                let remote = RemoteConnection::try_new(url, config.request_timeout()?)?;
                let expected = if use_sim { Backend::Sim } else { Backend::Real };
                if remote.info().backend != expected {
                    return Err(CoreError::Connection {
                        message: format!(
                            "controller at {} drives {:?}, expected {expected:?}",
                            config.remote_url,
                            remote.info().backend
                        ),
                    }
                    .into());
                }
                Ok(Connection::Remote(remote))
            }
        }
    }

    pub fn custom(arm: Box<dyn ArmChannel>, gripper: Box<dyn GripperChannel>) -> Self {
        Connection::Custom(CustomConnection {
            arm: Some(arm),
            gripper: Some(gripper),
        })
    }

    pub fn arm_channel(&mut self) -> Result<Box<dyn ArmChannel>, Error> {
        match self {
            Connection::Simulated(sim) => Ok(Box::new(sim.arm())),
            Connection::Remote(remote) => Ok(Box::new(remote.arm())),
            Connection::Custom(custom) => custom.arm.take().ok_or_else(|| taken("arm")),
        }
    }

    pub fn gripper_channel(&mut self) -> Result<Box<dyn GripperChannel>, Error> {
        match self {
            Connection::Simulated(sim) => Ok(Box::new(sim.gripper())),
            Connection::Remote(remote) => Ok(Box::new(remote.gripper())),
            Connection::Custom(custom) => custom.gripper.take().ok_or_else(|| taken("gripper")),
        }
    }

    /// Execution mode of the transport, `None` for custom channels.
    pub fn execution_mode(&self) -> Option<ExecutionMode> {
        match self {
            Connection::Simulated(_) => Some(ExecutionMode::InProcess),
            Connection::Remote(_) => Some(ExecutionMode::OutOfProcess),
            Connection::Custom(_) => None,
        }
    }

    pub fn disconnect(self) -> Result<(), Error> {
        match self {
            Connection::Simulated(sim) => sim.disconnect()?,
            Connection::Remote(remote) => remote.disconnect()?,
            Connection::Custom(_) => {}
        }
        Ok(())
    }
}

fn taken(channel: &str) -> Error {
    CoreError::Connection {
        message: format!("the {channel} channel is already in use"),
    }
    .into()
}
