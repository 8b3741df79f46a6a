use std::time::Duration;

use roman_core::{
    ArmChannel, ArmCommand, ArmState, Error, ExecutionMode, GripperChannel, GripperCommand,
    GripperState,
};
use tracing::{debug, info};
use url::Url;

use crate::{
    protocol::{Reply, ServerInfo},
    utils::{endpoint, get, post},
};

/// Connection to a running [`ControllerServer`](crate::ControllerServer).
#[derive(Debug, Clone)]
pub struct RemoteConnection {
    base_url: Url,
    agent: ureq::Agent,
    info: ServerInfo,
}

impl RemoteConnection {
    /// Connects to the controller at `base_url`. Every request fails after
    /// `timeout`.
    pub fn try_new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let info: ServerInfo = get(&agent, endpoint(&base_url, "info")?)?;
        info!(%base_url, backend = ?info.backend, "connected to controller");
        Ok(Self {
            base_url,
            agent,
            info,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// What the server reported when the connection was made.
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn arm(&self) -> RemoteArm {
        RemoteArm {
            base_url: self.base_url.clone(),
            agent: self.agent.clone(),
        }
    }

    pub fn gripper(&self) -> RemoteGripper {
        RemoteGripper {
            base_url: self.base_url.clone(),
            agent: self.agent.clone(),
        }
    }

    /// Asks the controller to stop both actuators.
    pub fn disconnect(self) -> Result<(), Error> {
        let reply: Reply<()> = post(&self.agent, endpoint(&self.base_url, "disconnect")?, &())?;
        reply.into_result()?;
        info!(base_url = %self.base_url, "disconnected from controller");
        Ok(())
    }
}

#[derive(Debug)]
pub struct RemoteArm {
    base_url: Url,
    agent: ureq::Agent,
}

impl ArmChannel for RemoteArm {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::OutOfProcess
    }

    fn execute(&mut self, command: &ArmCommand) -> Result<ArmState, Error> {
        debug!(?command, "sending arm command");
        let reply: Reply<ArmState> =
            post(&self.agent, endpoint(&self.base_url, "arm/execute")?, command)?;
        reply.into_result()
    }
}

#[derive(Debug)]
pub struct RemoteGripper {
    base_url: Url,
    agent: ureq::Agent,
}

impl GripperChannel for RemoteGripper {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::OutOfProcess
    }

    fn execute(&mut self, command: &GripperCommand) -> Result<GripperState, Error> {
        debug!(?command, "sending gripper command");
        let reply: Reply<GripperState> =
            post(&self.agent, endpoint(&self.base_url, "gripper/execute")?, command)?;
        reply.into_result()
    }
}
