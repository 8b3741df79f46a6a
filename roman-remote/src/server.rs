use std::{
    io,
    net::{SocketAddr, ToSocketAddrs},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::Duration,
};

use actix_web::{get, post, web, App, HttpResponse, HttpServer};
use anyhow::anyhow;
use roman_core::{ArmCommand, Error, GripperCommand};
use roman_sim::{SimConfig, SimWorld};
use tracing::{debug, error, info, warn};

use crate::{
    pacer::TickPacer,
    protocol::{Backend, Reply, ServerInfo},
};

/// Hosts a [`SimWorld`] behind the controller HTTP/JSON API:
///
/// - `GET info`
/// - `POST arm/execute` with an [`ArmCommand`]
/// - `POST gripper/execute` with a [`GripperCommand`]
/// - `POST disconnect`
///
/// Commands are applied as they arrive; a background thread ticks the world
/// in real time.
#[derive(Debug)]
pub struct ControllerServer {
    world: Arc<Mutex<SimWorld>>,
}

#[derive(Debug, Clone)]
struct ServerData {
    world: Arc<Mutex<SimWorld>>,
    tick_duration: f64,
}

impl ServerData {
    fn with_world<T>(&self, f: impl FnOnce(&mut SimWorld) -> Result<T, Error>) -> Result<T, Error> {
        let mut world = self
            .world
            .lock()
            .map_err(|_| Error::Other(anyhow!("simulated world lock poisoned")))?;
        f(&mut world)
    }
}

impl ControllerServer {
    pub fn new(config: SimConfig) -> Result<Self, Error> {
        Ok(Self::from_world(SimWorld::new(config)?))
    }

    pub fn from_world(world: SimWorld) -> Self {
        Self {
            world: Arc::new(Mutex::new(world)),
        }
    }

    pub fn world(&self) -> Arc<Mutex<SimWorld>> {
        self.world.clone()
    }

    /// Serves on `addr` until the process is interrupted.
    pub fn run(self, addr: impl ToSocketAddrs) -> io::Result<()> {
        let addrs: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();
        let tick_duration = match self.world.lock() {
            Ok(world) => world.config().tick_duration,
            Err(_) => return Err(io::Error::new(io::ErrorKind::Other, "world lock poisoned")),
        };
        let period = Duration::try_from_secs_f64(tick_duration)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let _ticker = Ticker::spawn(self.world.clone(), period);
        let data = ServerData {
            world: self.world,
            tick_duration,
        };
        info!(?addrs, tick_duration, "controller server starting");
        actix_web::rt::System::new().block_on(async move {
            HttpServer::new(move || {
                App::new()
                    .app_data(web::Data::new(data.clone()))
                    .service(get_info)
                    .service(post_arm_execute)
                    .service(post_gripper_execute)
                    .service(post_disconnect)
            })
            .workers(1)
            .bind(&addrs[..])?
            .run()
            .await
        })
    }

    /// Runs the server on a new thread.
    pub fn spawn(self, addr: SocketAddr) -> JoinHandle<io::Result<()>> {
        std::thread::spawn(move || self.run(addr))
    }
}

/// Background thread advancing the world once per tick until dropped.
struct Ticker {
    is_dropping: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn(world: Arc<Mutex<SimWorld>>, period: Duration) -> Self {
        let is_dropping = Arc::new(AtomicBool::new(false));
        let is_dropping_clone = is_dropping.clone();
        let thread = std::thread::spawn(move || {
            let mut pacer = TickPacer::new(period);
            while !is_dropping_clone.load(Ordering::Relaxed) {
                let _tick = pacer.tick();
                let Ok(mut world) = world.lock() else {
                    error!("simulated world lock poisoned, stopping the tick thread");
                    break;
                };
                if let Err(e) = world.advance() {
                    error!("control tick failed: {e}");
                    if let Err(e) = world.apply_arm(&ArmCommand::Stop) {
                        warn!("failed to stop the arm: {e}");
                    }
                }
            }
        });
        Self {
            is_dropping,
            thread: Some(thread),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(t) = self.thread.take() {
            self.is_dropping.swap(true, Ordering::Relaxed);
            if t.join().is_err() {
                error!("tick thread panicked");
            }
        }
    }
}

#[get("/info")]
async fn get_info(data: web::Data<ServerData>) -> HttpResponse {
    match data.with_world(|world| Ok(world.time())) {
        Ok(time) => HttpResponse::Ok().json(ServerInfo {
            backend: Backend::Sim,
            tick_duration: data.tick_duration,
            time,
        }),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[post("/arm/execute")]
async fn post_arm_execute(
    command: web::Json<ArmCommand>,
    data: web::Data<ServerData>,
) -> HttpResponse {
    debug!(command = ?command.0, "arm command");
    let reply = Reply::from_result(data.with_world(|world| {
        world.apply_arm(&command)?;
        world.arm_state()
    }));
    HttpResponse::Ok().json(reply)
}

#[post("/gripper/execute")]
async fn post_gripper_execute(
    command: web::Json<GripperCommand>,
    data: web::Data<ServerData>,
) -> HttpResponse {
    debug!(command = ?command.0, "gripper command");
    let reply = Reply::from_result(data.with_world(|world| {
        world.apply_gripper(&command)?;
        world.gripper_state()
    }));
    HttpResponse::Ok().json(reply)
}

#[post("/disconnect")]
async fn post_disconnect(data: web::Data<ServerData>) -> HttpResponse {
    info!("client disconnected, stopping both actuators");
    let reply = Reply::from_result(data.with_world(|world| {
        world.apply_arm(&ArmCommand::Stop)?;
        world.apply_gripper(&GripperCommand::Stop)
    }));
    HttpResponse::Ok().json(reply)
}
