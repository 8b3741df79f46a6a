use roman_core::{
    ArmChannel, ArmCommand, ArmMove, ExecutionMode, Finger, GripperChannel, GripperCommand,
    GripperMove, GripperPosition, Joints,
};
use roman_sim::{SimConfig, SimConnection, SimWorld, HOME_JOINT_POSITIONS};

#[test]
fn test_idle_read_is_idempotent() {
    let connection = SimConnection::new(SimConfig::default()).unwrap();
    let mut arm = connection.arm();
    let mut gripper = connection.gripper();
    assert_eq!(arm.execution_mode(), ExecutionMode::InProcess);
    let first = arm.execute(&ArmCommand::Read).unwrap();
    let second = arm.execute(&ArmCommand::Read).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.time, 0.0);
    let first = gripper.execute(&GripperCommand::Read).unwrap();
    let second = gripper.execute(&GripperCommand::Read).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_in_process_motion_advances_only_on_calls() {
    let connection = SimConnection::new(SimConfig::default()).unwrap();
    let mut arm = connection.arm();
    let mut target = Joints::from_array(HOME_JOINT_POSITIONS);
    target[0] = 0.1;
    let state = arm
        .execute(&ArmCommand::Move(ArmMove::new(target, 0.5, 1.0)))
        .unwrap();
    let tick = SimConfig::default().tick_duration;
    assert!((state.time - tick).abs() < 1e-12);
    std::thread::sleep(std::time::Duration::from_millis(50));
    let world = connection.world();
    assert!((world.lock().unwrap().time() - tick).abs() < 1e-12);
    let state = arm.execute(&ArmCommand::Read).unwrap();
    assert!((state.time - 2.0 * tick).abs() < 1e-12);
    assert!(!state.is_done);
}

#[test]
fn test_gripper_closes() {
    let connection = SimConnection::new(SimConfig::default()).unwrap();
    let mut gripper = connection.gripper();
    let mut state = gripper
        .execute(&GripperCommand::Move(GripperMove {
            finger: Finger::All,
            position: GripperPosition::CLOSED,
        }))
        .unwrap();
    assert_eq!(state.targets, [255; 3]);
    while !state.is_done {
        state = gripper.execute(&GripperCommand::Read).unwrap();
        assert!(state.time < 5.0);
    }
    assert_eq!(state.positions, [255; 3]);
    // finger speed is one stroke per second
    assert!(state.time >= 1.0 && state.time < 1.1, "{}", state.time);
}

#[test]
fn test_stop_aborts_motion() {
    let mut world = SimWorld::new(SimConfig::default()).unwrap();
    let mut target = Joints::from_array(HOME_JOINT_POSITIONS);
    target[0] = 1.0;
    world
        .execute_arm(&ArmCommand::Move(ArmMove::new(target, 0.5, 1.0)))
        .unwrap();
    for _ in 0..100 {
        world.execute_arm(&ArmCommand::Read).unwrap();
    }
    let mut state = world.execute_arm(&ArmCommand::Stop).unwrap();
    while !state.is_done {
        state = world.execute_arm(&ArmCommand::Read).unwrap();
    }
    assert!(state.joint_speeds.max_abs() < 1e-9);
    assert!(state.joint_positions[0] < 0.5);
    let again = world.execute_arm(&ArmCommand::Read).unwrap();
    assert_eq!(again, state);
}

#[test]
fn test_disconnect() {
    let connection = SimConnection::new(SimConfig::default()).unwrap();
    let mut gripper = connection.gripper();
    gripper
        .execute(&GripperCommand::Move(GripperMove {
            finger: Finger::A,
            position: GripperPosition::CLOSED,
        }))
        .unwrap();
    drop(gripper);
    connection.disconnect().unwrap();
}
