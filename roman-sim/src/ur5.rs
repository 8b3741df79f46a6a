use std::f64::consts::FRAC_PI_2;

use k::nalgebra as na;

/// Joint names of the UR5 in [`roman_core::Joint`] order.
pub const UR5_JOINT_NAMES: [&str; 6] = [
    "shoulder_pan_joint",
    "shoulder_lift_joint",
    "elbow_joint",
    "wrist_1_joint",
    "wrist_2_joint",
    "wrist_3_joint",
];

fn joint_node(
    name: &str,
    xyz: [f64; 3],
    rpy: [f64; 3],
    axis: na::Unit<na::Vector3<f64>>,
) -> k::Node<f64> {
    k::NodeBuilder::new()
        .name(name)
        .translation(na::Translation3::new(xyz[0], xyz[1], xyz[2]))
        .rotation(na::UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]))
        .joint_type(k::JointType::Rotational { axis })
        .into_node()
}

/// Kinematic chain of a UR5 from its base link to the `tool0` flange frame.
pub fn ur5_chain() -> k::SerialChain<f64> {
    let y = na::Vector3::y_axis;
    let z = na::Vector3::z_axis;
    let joints = [
        joint_node(UR5_JOINT_NAMES[0], [0.0, 0.0, 0.089159], [0.0; 3], z()),
        joint_node(
            UR5_JOINT_NAMES[1],
            [0.0, 0.13585, 0.0],
            [0.0, FRAC_PI_2, 0.0],
            y(),
        ),
        joint_node(UR5_JOINT_NAMES[2], [0.0, -0.1197, 0.425], [0.0; 3], y()),
        joint_node(
            UR5_JOINT_NAMES[3],
            [0.0, 0.0, 0.39225],
            [0.0, FRAC_PI_2, 0.0],
            y(),
        ),
        joint_node(UR5_JOINT_NAMES[4], [0.0, 0.093, 0.0], [0.0; 3], z()),
        joint_node(UR5_JOINT_NAMES[5], [0.0, 0.0, 0.09465], [0.0; 3], y()),
    ];
    let tool = k::NodeBuilder::new()
        .name("tool0")
        .translation(na::Translation3::new(0.0, 0.0823, 0.0))
        .rotation(na::UnitQuaternion::from_euler_angles(-FRAC_PI_2, 0.0, 0.0))
        .joint_type(k::JointType::Fixed)
        .into_node();
    for pair in joints.windows(2) {
        pair[1].set_parent(&pair[0]);
    }
    tool.set_parent(&joints[5]);
    k::SerialChain::from_end(&tool)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_ur5_chain() {
        let arm = ur5_chain();
        assert_eq!(arm.dof(), 6);
        // fully stretched upward
        arm.set_joint_positions(&[0.0, -FRAC_PI_2, 0.0, -FRAC_PI_2, 0.0, 0.0])
            .unwrap();
        arm.update_transforms();
        let end = arm.end_transform();
        let height = 0.089159 + 0.425 + 0.39225 + 0.09465;
        assert_approx_eq!(end.translation.vector.z, height, 1e-6);
        assert_approx_eq!(end.translation.vector.x, 0.0, 1e-6);
        assert_approx_eq!(
            end.translation.vector.y,
            0.13585 - 0.1197 + 0.093 + 0.0823,
            1e-6
        );
    }
}
