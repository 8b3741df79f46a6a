use std::{
    net::{Ipv4Addr, SocketAddr},
    thread::sleep,
    time::{Duration, Instant},
};

use assert_approx_eq::assert_approx_eq;
use roman_core::{
    ArmChannel, ArmCommand, ArmMove, Error, ExecutionMode, Finger, GripperChannel,
    GripperCommand, GripperMove, GripperPosition, Joints, Pose,
};
use roman_remote::{Backend, ControllerServer, RemoteConnection};
use roman_sim::{SimConfig, HOME_JOINT_POSITIONS};
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(5);

fn start_server() -> Url {
    let port = portpicker::pick_unused_port().expect("No ports free");
    let server = ControllerServer::new(SimConfig::default()).unwrap();
    server.spawn(SocketAddr::from((Ipv4Addr::LOCALHOST, port)));
    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

fn connect(url: &Url) -> RemoteConnection {
    let start = Instant::now();
    loop {
        match RemoteConnection::try_new(url.clone(), TIMEOUT) {
            Ok(connection) => return connection,
            Err(e) if start.elapsed() > Duration::from_secs(10) => panic!("{e}"),
            Err(_) => sleep(Duration::from_millis(50)),
        }
    }
}

#[test]
fn test_info() {
    let url = start_server();
    let connection = connect(&url);
    assert_eq!(connection.info().backend, Backend::Sim);
    assert_approx_eq!(connection.info().tick_duration, 1.0 / 240.0);
    assert_eq!(connection.arm().execution_mode(), ExecutionMode::OutOfProcess);
    assert_eq!(
        connection.gripper().execution_mode(),
        ExecutionMode::OutOfProcess
    );
}

#[test]
fn test_motion_continues_between_calls() {
    let url = start_server();
    let connection = connect(&url);
    let mut arm = connection.arm();
    let start = arm.execute(&ArmCommand::Read).unwrap();
    assert!(start.is_done);
    assert_approx_eq!(start.joint_positions[0], HOME_JOINT_POSITIONS[0]);

    let mut target = Joints::from_array(HOME_JOINT_POSITIONS);
    target[0] += 0.2;
    let state = arm
        .execute(&ArmCommand::Move(ArmMove::new(target, 0.5, 1.0)))
        .unwrap();
    assert!(!state.is_done);
    assert_eq!(state.target_joint_positions, target);

    sleep(Duration::from_millis(300));
    let state = arm.execute(&ArmCommand::Read).unwrap();
    assert!(state.time - start.time > 0.1, "{} {}", start.time, state.time);
    assert!(state.joint_positions[0] > HOME_JOINT_POSITIONS[0]);

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut state = state;
    while !state.is_done {
        assert!(Instant::now() < deadline);
        sleep(Duration::from_millis(20));
        state = arm.execute(&ArmCommand::Read).unwrap();
    }
    assert_approx_eq!(state.joint_positions[0], target[0], 2e-3);
}

#[test]
fn test_unreachable_is_reported() {
    let url = start_server();
    let connection = connect(&url);
    let mut arm = connection.arm();
    let result = arm.execute(&ArmCommand::Move(ArmMove::new(
        Pose::new(3.0, 0.0, 0.5, 0.0, 0.0, 0.0),
        0.5,
        1.0,
    )));
    assert!(matches!(result, Err(Error::Unreachable { .. })), "{result:?}");
    // the controller is still usable
    assert!(arm.execute(&ArmCommand::Read).unwrap().is_done);
}

#[test]
fn test_gripper_and_disconnect() {
    let url = start_server();
    let connection = connect(&url);
    let mut gripper = connection.gripper();
    let state = gripper
        .execute(&GripperCommand::Move(GripperMove {
            finger: Finger::All,
            position: GripperPosition::CLOSED,
        }))
        .unwrap();
    assert!(!state.is_done);
    assert_eq!(state.targets, [255; 3]);
    connection.disconnect().unwrap();

    let connection = connect(&url);
    let state = connection
        .gripper()
        .execute(&GripperCommand::Read)
        .unwrap();
    assert!(state.is_done);
    assert!(state.positions[0] < 255);
}

#[test]
fn test_connection_error() {
    let port = portpicker::pick_unused_port().expect("No ports free");
    let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let result = RemoteConnection::try_new(url, Duration::from_secs(1));
    assert!(matches!(result, Err(Error::Connection { .. })));
}
