use std::{path::Path, time::Duration};

use roman_core::{Error as CoreError, WaitPolicy};
use roman_sim::SimConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RobotConfig {
    // TOML format has a restriction that if a table itself contains tables,
    // all keys with non-table values must be emitted first.
    // Therefore, the `sim` table must be located at the end of the struct.
    /// Drive the simulated robot instead of the real one.
    #[serde(default = "default_true")]
    pub use_sim: bool,
    /// Run the simulation on the caller's thread instead of talking to a
    /// controller process. Only valid with `use_sim`.
    #[serde(default = "default_true")]
    pub in_proc: bool,
    /// Controller process used when `in_proc` is false.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    /// Timeout of a single request to the controller process.
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: f64,
    /// Sleep between polls while a blocking command waits on a controller
    /// process.
    #[serde(default = "default_poll_interval_sec")]
    pub poll_interval_sec: f64,
    /// Budget of one blocking command, in controller seconds.
    #[serde(default = "default_blocking_timeout_sec")]
    pub blocking_timeout_sec: f64,
    /// Default joint speed limit of arm moves (rad/s).
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
    /// Joint acceleration limit of arm moves (rad/s^2).
    #[serde(default = "default_max_acceleration")]
    pub max_acceleration: f64,
    #[serde(default)]
    pub sim: SimConfig,
}

fn default_true() -> bool {
    true
}

fn default_remote_url() -> String {
    "http://127.0.0.1:7777".to_owned()
}

fn default_request_timeout_sec() -> f64 {
    5.0
}

fn default_poll_interval_sec() -> f64 {
    0.01
}

fn default_blocking_timeout_sec() -> f64 {
    30.0
}

fn default_max_speed() -> f64 {
    0.5
}

fn default_max_acceleration() -> f64 {
    1.0
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            use_sim: default_true(),
            in_proc: default_true(),
            remote_url: default_remote_url(),
            request_timeout_sec: default_request_timeout_sec(),
            poll_interval_sec: default_poll_interval_sec(),
            blocking_timeout_sec: default_blocking_timeout_sec(),
            max_speed: default_max_speed(),
            max_acceleration: default_max_acceleration(),
            sim: SimConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Config of the in-process simulation when `use_sim`, otherwise of the
    /// real robot behind the default controller process.
    pub fn new(use_sim: bool) -> Self {
        Self {
            use_sim,
            in_proc: use_sim,
            ..Default::default()
        }
    }

    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &std::fs::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))
    }

    pub fn wait_policy(&self) -> Result<WaitPolicy, Error> {
        Ok(WaitPolicy::new(
            seconds("poll_interval_sec", self.poll_interval_sec, true)?,
            seconds("blocking_timeout_sec", self.blocking_timeout_sec, false)?,
        ))
    }

    pub fn request_timeout(&self) -> Result<Duration, Error> {
        seconds("request_timeout_sec", self.request_timeout_sec, false)
    }
}

/// Converts a config value in seconds, rejecting negative, non-finite and
/// out of range values. Zero is accepted only when `allow_zero`.
fn seconds(name: &str, value: f64, allow_zero: bool) -> Result<Duration, Error> {
    let invalid = || CoreError::InvalidConfig {
        message: format!("{name} must be a positive number of seconds, got {value}"),
    };
    if !value.is_finite() || value < 0.0 || (value == 0.0 && !allow_zero) {
        return Err(invalid().into());
    }
    Duration::try_from_secs_f64(value).map_err(|_| invalid().into())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = RobotConfig::from_str("", "a.toml").unwrap();
        assert_eq!(config, RobotConfig::default());
        assert!(config.use_sim);
        assert!(config.in_proc);
        assert_approx_eq!(config.max_speed, 0.5);
        assert_eq!(config.wait_policy().unwrap(), WaitPolicy::default());
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_new() {
        let real = RobotConfig::new(false);
        assert!(!real.use_sim);
        assert!(!real.in_proc);
        assert!(RobotConfig::new(true).in_proc);
    }

    #[test]
    fn test_from_str() {
        let s = r#"
use_sim = true
in_proc = false
remote_url = "http://10.0.0.2:7777"
blocking_timeout_sec = 10.0

[sim]
tick_duration = 0.005
"#;
        let config = RobotConfig::from_str(s, "a.toml").unwrap();
        assert!(!config.in_proc);
        assert_eq!(config.remote_url, "http://10.0.0.2:7777");
        assert_approx_eq!(config.blocking_timeout_sec, 10.0);
        assert_approx_eq!(config.sim.tick_duration, 0.005);
        assert_approx_eq!(config.sim.max_joint_force, 1000.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            RobotConfig::from_str("use_simulation = true", "a.toml"),
            Err(Error::TomlParseFailure(..))
        ));
        assert!(matches!(
            RobotConfig::try_new("/path/that/does/not/exist.toml"),
            Err(Error::NoFile(..))
        ));
    }

    #[test]
    fn test_default_config_round_trip() {
        let s = toml::to_string(&RobotConfig::default()).unwrap();
        assert_eq!(RobotConfig::from_str(&s, "a.toml").unwrap(), RobotConfig::default());
    }

    #[test]
    fn test_invalid_durations() {
        let config = RobotConfig::from_str("poll_interval_sec = -1.0", "a.toml").unwrap();
        assert!(matches!(
            config.wait_policy(),
            Err(Error::Core(CoreError::InvalidConfig { .. }))
        ));
        let config = RobotConfig::from_str("blocking_timeout_sec = 0.0", "a.toml").unwrap();
        assert!(config.wait_policy().is_err());
        let config = RobotConfig::from_str("request_timeout_sec = 1e300", "a.toml").unwrap();
        assert!(config.request_timeout().is_err());
        let config = RobotConfig {
            request_timeout_sec: f64::NAN,
            ..Default::default()
        };
        assert!(config.request_timeout().is_err());

        let config = RobotConfig::from_str("poll_interval_sec = 0.0", "a.toml").unwrap();
        assert_eq!(config.wait_policy().unwrap().poll_interval, Duration::ZERO);
    }
}
