use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use roman_core::{
    ArmChannel, ArmCommand, ArmState, Error, ExecutionMode, GripperChannel, GripperCommand,
    GripperState,
};
use tracing::{info, warn};

use crate::{config::SimConfig, world::SimWorld};

fn lock(world: &Mutex<SimWorld>) -> Result<MutexGuard<'_, SimWorld>, Error> {
    world
        .lock()
        .map_err(|_| Error::Other(anyhow!("simulated world lock poisoned")))
}

/// In-process connection to a [`SimWorld`]. The world advances only when a
/// channel call finds something moving.
#[derive(Debug, Clone)]
pub struct SimConnection {
    world: Arc<Mutex<SimWorld>>,
}

impl SimConnection {
    pub fn new(config: SimConfig) -> Result<Self, Error> {
        Ok(Self {
            world: Arc::new(Mutex::new(SimWorld::new(config)?)),
        })
    }

    pub fn world(&self) -> Arc<Mutex<SimWorld>> {
        self.world.clone()
    }

    pub fn arm(&self) -> SimArm {
        SimArm {
            world: self.world.clone(),
        }
    }

    pub fn gripper(&self) -> SimGripper {
        SimGripper {
            world: self.world.clone(),
        }
    }

    /// Stops both actuators and destroys the physics session once no
    /// channel refers to the world anymore.
    pub fn disconnect(self) -> Result<(), Error> {
        lock(&self.world)?.halt()?;
        match Arc::try_unwrap(self.world) {
            Ok(world) => {
                let world = world
                    .into_inner()
                    .map_err(|_| Error::Other(anyhow!("simulated world lock poisoned")))?;
                world.destroy();
                info!("disconnected from the simulated world");
            }
            Err(_) => warn!("simulated world is still shared; leaving it alive"),
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimArm {
    world: Arc<Mutex<SimWorld>>,
}

impl ArmChannel for SimArm {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::InProcess
    }

    fn execute(&mut self, command: &ArmCommand) -> Result<ArmState, Error> {
        lock(&self.world)?.execute_arm(command)
    }
}

#[derive(Debug)]
pub struct SimGripper {
    world: Arc<Mutex<SimWorld>>,
}

impl GripperChannel for SimGripper {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::InProcess
    }

    fn execute(&mut self, command: &GripperCommand) -> Result<GripperState, Error> {
        lock(&self.world)?.execute_gripper(command)
    }
}
