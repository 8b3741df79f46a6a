use roman_core::ArmProgramConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Physics tick in seconds.
    #[serde(default = "default_tick_duration")]
    pub tick_duration: f64,
    /// Force limit of the arm joint motors (N·m).
    #[serde(default = "default_max_joint_force")]
    pub max_joint_force: f64,
    /// Command zero speed to a joint whose speed already equals its servo
    /// target. This matches the arm firmware.
    #[serde(default = "default_zero_speed_on_target")]
    pub zero_speed_on_target: bool,
    /// Rotor inertia of every simulated joint (kg·m^2).
    #[serde(default = "default_joint_inertia")]
    pub joint_inertia: f64,
    /// Finger travel speed in strokes per second.
    #[serde(default = "default_finger_speed")]
    pub finger_speed: f64,
    #[serde(default = "default_max_finger_force")]
    pub max_finger_force: f64,
    #[serde(default = "default_ik_solver")]
    pub ik_solver: IkSolverConfig,
    #[serde(default)]
    pub arm_program: ArmProgramConfig,
}

fn default_tick_duration() -> f64 {
    1.0 / 240.0
}

fn default_max_joint_force() -> f64 {
    1000.0
}

fn default_zero_speed_on_target() -> bool {
    true
}

fn default_joint_inertia() -> f64 {
    1.0
}

fn default_finger_speed() -> f64 {
    1.0
}

fn default_max_finger_force() -> f64 {
    100.0
}

fn default_ik_solver() -> IkSolverConfig {
    IkSolverConfig {
        allowable_position_error: 1e-4,
        allowable_angle_error: 1e-3,
        jacobian_multiplier: 0.5,
        num_max_try: 500,
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration: default_tick_duration(),
            max_joint_force: default_max_joint_force(),
            zero_speed_on_target: default_zero_speed_on_target(),
            joint_inertia: default_joint_inertia(),
            finger_speed: default_finger_speed(),
            max_finger_force: default_max_finger_force(),
            ik_solver: default_ik_solver(),
            arm_program: ArmProgramConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IkSolverConfig {
    pub allowable_position_error: f64, // unit: m
    pub allowable_angle_error: f64,    // unit: rad
    pub jacobian_multiplier: f64,
    pub num_max_try: usize,
}

impl IkSolverConfig {
    pub(crate) fn build(&self) -> k::JacobianIkSolver<f64> {
        k::JacobianIkSolver::new(
            self.allowable_position_error,
            self.allowable_angle_error,
            self.jacobian_multiplier,
            self.num_max_try,
        )
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config: SimConfig = toml::from_str("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_approx_eq!(config.tick_duration, 1.0 / 240.0);
        assert_approx_eq!(config.max_joint_force, 1000.0);
        assert!(config.zero_speed_on_target);
    }

    #[test]
    fn test_partial_config() {
        let config: SimConfig = toml::from_str(
            r#"
tick_duration = 0.01
zero_speed_on_target = false

[arm_program]
position_gain = 5.0
"#,
        )
        .unwrap();
        assert_approx_eq!(config.tick_duration, 0.01);
        assert!(!config.zero_speed_on_target);
        assert_approx_eq!(config.arm_program.position_gain, 5.0);
        assert_approx_eq!(config.arm_program.joint_tolerance, 1e-3);
    }

    #[test]
    fn test_unknown_field() {
        assert!(toml::from_str::<SimConfig>("tick = 0.01").is_err());
    }
}
