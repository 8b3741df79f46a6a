use std::time::{Duration, Instant};

use tracing::debug;

use crate::{error::Error, traits::ExecutionMode, types::MotionState};

/// How blocking commands wait for completion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaitPolicy {
    /// Sleep between polls of an out-of-process controller.
    pub poll_interval: Duration,
    /// Budget of a single blocking wait.
    pub timeout: Duration,
}

impl WaitPolicy {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Sleeps for one poll interval if the controller runs out of process.
    pub fn pause(&self, mode: ExecutionMode) {
        if mode == ExecutionMode::OutOfProcess {
            std::thread::sleep(self.poll_interval);
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(10), Duration::from_secs(30))
    }
}

/// Polls `read` until the returned state reports completion.
///
/// Fails with [`Error::Timeout`] once either the controller time or the wall
/// clock time spent waiting exceeds `policy.timeout`.
pub fn wait_until_done<S, F>(
    mode: ExecutionMode,
    policy: &WaitPolicy,
    initial: S,
    mut read: F,
) -> Result<S, Error>
where
    S: MotionState,
    F: FnMut() -> Result<S, Error>,
{
    let start_time = initial.time();
    let started = Instant::now();
    let timeout = policy.timeout.as_secs_f64();
    let mut state = initial;
    let mut polls = 0usize;
    while !state.is_done() {
        let elapsed = state.time() - start_time;
        if elapsed > timeout || started.elapsed() > policy.timeout {
            return Err(Error::Timeout {
                timeout: policy.timeout,
                elapsed,
            });
        }
        policy.pause(mode);
        state = read()?;
        polls += 1;
    }
    debug!(polls, elapsed = state.time() - start_time, "motion done");
    Ok(state)
}
