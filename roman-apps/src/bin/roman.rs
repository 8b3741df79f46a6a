use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use roman::{GripperPosition, Robot, RobotConfig};
use roman_apps::{
    utils::{get_robot_config_path, init_tracing, resolve_robot_config},
    RobotReport,
};
use roman_remote::ControllerServer;
use schemars::schema_for;
use tracing::{debug, info};

/// Drive a UR arm and its gripper, simulated or real.
#[derive(Parser, Debug)]
#[clap(name = env!("CARGO_BIN_NAME"))]
struct Args {
    /// Path to the setting file.
    #[clap(short, long, value_parser)]
    config_path: Option<PathBuf>,
    /// Prints the default setting as TOML.
    #[clap(long)]
    show_default_config: bool,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hosts a simulated robot for out-of-process clients.
    Serve {
        #[clap(long, default_value = "127.0.0.1")]
        host: String,
        #[clap(long, default_value_t = 7777)]
        port: u16,
    },
    /// Prints the arm and gripper states.
    Read,
    /// Moves the tool relative to its pose, then the fingers.
    Move(MotionArgs),
    /// Starts the same motion as `move` and returns after `dt` seconds.
    Step {
        #[clap(flatten)]
        motion: MotionArgs,
        /// Controller seconds to wait for.
        #[clap(long, default_value_t = 0.2)]
        dt: f64,
    },
    /// Prints the JSON schema of the setting file.
    Schema,
}

#[derive(clap::Args, Debug)]
struct MotionArgs {
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    dx: f64,
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    dy: f64,
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    dz: f64,
    /// Yaw change in radians.
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    dyaw: f64,
    /// Finger position, 0 (open) to 255 (closed).
    #[clap(long, default_value_t = 0)]
    gripper: u8,
    /// Joint speed limit in rad/s. Defaults to `max_speed` of the setting.
    #[clap(long)]
    speed: Option<f64>,
}

fn print_report(robot: &Robot) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&RobotReport::new(robot))?
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    debug!(?args);

    if args.show_default_config {
        print!("{}", toml::to_string(&RobotConfig::default())?);
        return Ok(());
    }
    let Some(command) = args.command else {
        bail!("no subcommand given, see --help");
    };
    let config_path = get_robot_config_path(args.config_path);
    let load_config = || resolve_robot_config(config_path.as_deref());
    match command {
        Command::Schema => {
            let schema = schema_for!(RobotConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Serve { host, port } => {
            let config = load_config()?;
            if !config.use_sim {
                bail!("only the simulated robot can be served, set use_sim = true");
            }
            info!(%host, port, "serving the simulated robot");
            ControllerServer::new(config.sim)?.run((host.as_str(), port))?;
        }
        Command::Read => {
            let config = load_config()?;
            let mut robot = Robot::connect(&config)?;
            robot.read()?;
            print_report(&robot)?;
            robot.disconnect()?;
        }
        Command::Move(motion) => {
            let config = load_config()?;
            let mut robot = Robot::connect(&config)?;
            robot.move_simple(
                motion.dx,
                motion.dy,
                motion.dz,
                motion.dyaw,
                GripperPosition(motion.gripper),
                motion.speed.unwrap_or(config.max_speed),
            )?;
            print_report(&robot)?;
            robot.disconnect()?;
        }
        Command::Step { motion, dt } => {
            let config = load_config()?;
            let mut robot = Robot::connect(&config)?;
            let status = robot.step(
                motion.dx,
                motion.dy,
                motion.dz,
                motion.dyaw,
                GripperPosition(motion.gripper),
                motion.speed.unwrap_or(config.max_speed),
                dt,
            )?;
            info!(?status, "step finished");
            print_report(&robot)?;
            robot.disconnect()?;
        }
    }
    Ok(())
}
