use assert_approx_eq::assert_approx_eq;
use roman_core::*;

const TICK: f64 = 0.01;

/// Ideal plant integrating commanded joint speeds.
#[derive(Default)]
struct IdealArm {
    positions: Joints,
    speeds: Joints,
    servo_calls: usize,
}

impl IdealArm {
    fn tick(&mut self) {
        for i in 0..DOF {
            self.positions[i] += self.speeds[i] * TICK;
        }
    }
}

impl ArmFirmware for IdealArm {
    fn inverse_kinematics(&self, pose: &Pose) -> Result<Joints, Error> {
        if pose.position()[0] > 1.0 {
            return Err(Error::Unreachable {
                message: "out of reach".to_owned(),
            });
        }
        Ok(Joints::from_array(pose.to_array()))
    }
    fn actual_tool_pose(&self) -> Result<Pose, Error> {
        Ok(Pose::from_array(self.positions.to_array()))
    }
    fn actual_tool_speed(&self) -> Result<[f64; 6], Error> {
        Ok(self.speeds.to_array())
    }
    fn actual_joint_positions(&self) -> Result<Joints, Error> {
        Ok(self.positions)
    }
    fn actual_joint_speeds(&self) -> Result<Joints, Error> {
        Ok(self.speeds)
    }
    fn actual_joint_torques(&self) -> Result<Joints, Error> {
        Ok(Joints::zeros())
    }
    fn target_tool_pose(&self) -> Result<Pose, Error> {
        Err(Error::SensorUnavailable {
            sensor: "target_tool_pose",
        })
    }
    fn target_tool_speed(&self) -> Result<[f64; 6], Error> {
        Err(Error::SensorUnavailable {
            sensor: "target_tool_speed",
        })
    }
    fn target_joint_positions(&self) -> Result<Joints, Error> {
        Err(Error::SensorUnavailable {
            sensor: "target_joint_positions",
        })
    }
    fn target_joint_speeds(&self) -> Result<Joints, Error> {
        Err(Error::SensorUnavailable {
            sensor: "target_joint_speeds",
        })
    }
    fn tool_force(&self) -> Result<[f64; 6], Error> {
        Ok([1.0; 6])
    }
    fn tool_acceleration(&self) -> Result<[f64; 3], Error> {
        Err(Error::SensorUnavailable {
            sensor: "tool_acceleration",
        })
    }
    fn velocity_servo(&mut self, speeds: &Joints, max_acceleration: f64) -> Result<(), Error> {
        let step = max_acceleration * TICK;
        for i in 0..DOF {
            let current = self.speeds[i];
            self.speeds[i] = current + (speeds[i] - current).clamp(-step, step);
        }
        self.servo_calls += 1;
        Ok(())
    }
    fn set_payload(&mut self, _mass: f64, _center_of_gravity: [f64; 3]) -> Result<(), Error> {
        Ok(())
    }
    fn set_tool_offset(&mut self, _offset: &Pose) -> Result<(), Error> {
        Ok(())
    }
}

fn run_until_done(program: &mut ArmProgram, arm: &mut IdealArm, max_ticks: usize) -> usize {
    for tick in 0..max_ticks {
        program.control(arm).unwrap();
        if !program.is_active() {
            return tick;
        }
        arm.tick();
    }
    panic!("arm program still active after {max_ticks} ticks");
}

#[test]
fn test_move_joints_converges() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let target = Joints::new(0.3, -0.2, 0.1, 0.0, 0.05, -0.4);
    program
        .apply(&mut arm, &ArmCommand::Move(ArmMove::new(target, 0.5, 2.0)))
        .unwrap();
    assert!(program.is_active());
    let state = program.state(&arm, 0.0).unwrap();
    assert!(!state.is_done);
    assert_eq!(state.target_joint_positions, target);

    run_until_done(&mut program, &mut arm, 2000);
    for i in 0..DOF {
        assert_approx_eq!(arm.positions[i], target[i], 2e-3);
        assert_approx_eq!(arm.speeds[i], 0.0);
    }
    let state = program.state(&arm, 1.0).unwrap();
    assert!(state.is_done);
    assert_eq!(state.target_joint_speeds, Joints::zeros());
}

#[test]
fn test_speed_and_acceleration_limits() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let target = Joints::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    program
        .apply(&mut arm, &ArmCommand::Move(ArmMove::new(target, 0.5, 2.0)))
        .unwrap();
    let mut previous = 0.0;
    for _ in 0..300 {
        program.control(&mut arm).unwrap();
        let speed = arm.speeds[0];
        assert!(speed <= 0.5 + 1e-12);
        assert!((speed - previous).abs() <= 2.0 * TICK + 1e-12);
        previous = speed;
        arm.tick();
    }
}

#[test]
fn test_pose_target_uses_inverse_kinematics() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let pose = Pose::new(0.2, 0.0, 0.0, 0.0, 0.0, 0.1);
    program
        .apply(&mut arm, &ArmCommand::Move(ArmMove::new(pose, 1.0, 4.0)))
        .unwrap();
    run_until_done(&mut program, &mut arm, 2000);
    assert_approx_eq!(arm.positions[0], 0.2, 2e-3);
    assert_approx_eq!(arm.positions[5], 0.1, 2e-3);
}

#[test]
fn test_unreachable_fails_fast() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let pose = Pose::new(2.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let result = program.apply(&mut arm, &ArmCommand::Move(ArmMove::new(pose, 1.0, 4.0)));
    assert!(matches!(result, Err(Error::Unreachable { .. })));
    assert!(!program.is_active());
}

#[test]
fn test_invalid_limits() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let result = program.apply(
        &mut arm,
        &ArmCommand::Move(ArmMove::new(Joints::zeros(), 0.0, 1.0)),
    );
    assert!(result.is_err());
}

#[test]
fn test_new_move_supersedes() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let first = Joints::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let second = Joints::new(-0.2, 0.0, 0.0, 0.0, 0.0, 0.0);
    program
        .apply(&mut arm, &ArmCommand::Move(ArmMove::new(first, 0.5, 2.0)))
        .unwrap();
    for _ in 0..20 {
        program.control(&mut arm).unwrap();
        arm.tick();
    }
    program
        .apply(&mut arm, &ArmCommand::Move(ArmMove::new(second, 0.5, 2.0)))
        .unwrap();
    let state = program.state(&arm, 0.2).unwrap();
    assert!(!state.is_done);
    assert_eq!(state.target_joint_positions, second);
    run_until_done(&mut program, &mut arm, 3000);
    assert_approx_eq!(arm.positions[0], -0.2, 2e-3);
}

#[test]
fn test_stop_brings_joints_to_rest() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    let target = Joints::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    program
        .apply(&mut arm, &ArmCommand::Move(ArmMove::new(target, 0.5, 2.0)))
        .unwrap();
    for _ in 0..50 {
        program.control(&mut arm).unwrap();
        arm.tick();
    }
    assert!(arm.speeds.max_abs() > 0.0);
    program.apply(&mut arm, &ArmCommand::Stop).unwrap();
    run_until_done(&mut program, &mut arm, 1000);
    assert_eq!(arm.speeds.max_abs(), 0.0);
    assert!(arm.positions[0] < 0.9);
}

#[test]
fn test_read_does_not_command() {
    let mut arm = IdealArm::default();
    let mut program = ArmProgram::default();
    program.apply(&mut arm, &ArmCommand::Read).unwrap();
    program.control(&mut arm).unwrap();
    assert_eq!(arm.servo_calls, 0);
    assert!(!program.is_active());
}

#[test]
fn test_unavailable_sensors_are_none() {
    let arm = IdealArm::default();
    let state = ArmProgram::default().state(&arm, 0.0).unwrap();
    assert!(state.target_tool_pose.is_none());
    assert!(state.tool_acceleration.is_none());
    assert_eq!(state.tool_force, Some([1.0; 6]));
    assert!(optional_sensor::<f64>(Err(Error::Remote {
        message: "x".to_owned()
    }))
    .is_err());
}

#[derive(Default)]
struct IdealHand {
    positions: [f64; FINGERS],
    targets: [f64; FINGERS],
}

impl IdealHand {
    fn tick(&mut self) {
        for i in 0..FINGERS {
            let delta = self.targets[i] - self.positions[i];
            self.positions[i] += delta.clamp(-0.1, 0.1);
        }
    }
}

impl GripperFirmware for IdealHand {
    fn finger_positions(&self) -> Result<[f64; FINGERS], Error> {
        Ok(self.positions)
    }
    fn command_fingers(&mut self, targets: [f64; FINGERS]) -> Result<(), Error> {
        self.targets = targets;
        Ok(())
    }
}

#[test]
fn test_gripper_program() {
    let mut hand = IdealHand::default();
    let mut program = GripperProgram::new();
    program
        .apply(
            &mut hand,
            &GripperCommand::Move(GripperMove {
                finger: Finger::A,
                position: GripperPosition::CLOSED,
            }),
        )
        .unwrap();
    let state = program.state(&hand, 0.0).unwrap();
    assert!(!state.is_done);
    assert_eq!(state.targets, [255, 0, 0]);
    for _ in 0..20 {
        program.control(&mut hand).unwrap();
        hand.tick();
    }
    program.control(&mut hand).unwrap();
    let state = program.state(&hand, 0.2).unwrap();
    assert!(state.is_done);
    assert_eq!(state.positions, [255, 0, 0]);

    program
        .apply(
            &mut hand,
            &GripperCommand::Move(GripperMove {
                finger: Finger::All,
                position: GripperPosition(128),
            }),
        )
        .unwrap();
    hand.tick();
    program.apply(&mut hand, &GripperCommand::Stop).unwrap();
    assert!(!program.is_active());
    let state = program.state(&hand, 0.3).unwrap();
    assert_eq!(state.targets, state.positions);
}
