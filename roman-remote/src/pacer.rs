use std::time::{Duration, Instant};

use tracing::debug;

/// Fixed-period schedule for a loop, handing out one [`ScopedTick`] per
/// iteration.
///
/// Deadlines are absolute, so the time spent in the loop body does not
/// accumulate as drift. When the loop falls more than one period behind, the
/// missed ticks are dropped.
#[derive(Debug)]
pub struct TickPacer {
    period: Duration,
    deadline: Instant,
    overruns: u64,
}

impl TickPacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
            overruns: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of times the schedule was restarted after an overrun.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Starts a tick. Dropping the returned guard sleeps until the tick's
    /// deadline.
    ///
    /// # Example
    /// ```
    /// let mut pacer = roman_remote::TickPacer::new(std::time::Duration::from_millis(10));
    /// let now = std::time::Instant::now();
    /// for _ in 0..3 {
    ///     // Do not use `let _ = ..` here because it immediately drops the guard.
    ///     let _tick = pacer.tick();
    /// }
    /// assert!(now.elapsed() >= std::time::Duration::from_millis(20));
    /// ```
    pub fn tick(&mut self) -> ScopedTick<'_> {
        ScopedTick { pacer: self }
    }
}

/// RAII guard of one tick of a [`TickPacer`]
#[derive(Debug)]
pub struct ScopedTick<'a> {
    pacer: &'a mut TickPacer,
}

impl Drop for ScopedTick<'_> {
    fn drop(&mut self) {
        let pacer = &mut *self.pacer;
        let now = Instant::now();
        if now < pacer.deadline {
            std::thread::sleep(pacer.deadline - now);
        }
        pacer.deadline += pacer.period;
        let now = Instant::now();
        if now > pacer.deadline {
            pacer.deadline = now + pacer.period;
            pacer.overruns += 1;
            debug!(overruns = pacer.overruns, "tick overran, schedule restarted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_keeps_period() {
        let start = Instant::now();
        let mut pacer = TickPacer::new(Duration::from_millis(10));
        for _ in 0..5 {
            let _tick = pacer.tick();
        }
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_pacer_drops_missed_ticks() {
        let mut pacer = TickPacer::new(Duration::from_millis(5));
        {
            let _tick = pacer.tick();
            std::thread::sleep(Duration::from_millis(30));
        }
        assert_eq!(pacer.overruns(), 1);
        // the next tick runs a full period instead of catching up
        let start = Instant::now();
        {
            let _tick = pacer.tick();
        }
        assert!(start.elapsed() >= Duration::from_millis(1));
    }
}
