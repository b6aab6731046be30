use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// One-second countdown ticker for the question on screen.
///
/// Owned by the running game. Disarming drops the underlying interval, so no
/// tick scheduled before `disarm` can be observed afterwards.
///
/// Arming only records the first deadline. The tokio interval is created on
/// the first `tick`, so arming works outside a runtime.
#[derive(Debug)]
pub struct CountdownTimer {
    period: Duration,
    first_tick: Option<Instant>,
    interval: Option<Interval>,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            first_tick: None,
            interval: None,
        }
    }

    /// Start counting from now. The first tick fires one period later.
    /// Re-arming restarts the phase.
    pub fn arm(&mut self) {
        self.first_tick = Some(Instant::now() + self.period);
        self.interval = None;
    }

    pub fn disarm(&mut self) {
        self.first_tick = None;
        self.interval = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.first_tick.is_some()
    }

    /// Wait for the next tick. Returns `false` immediately when disarmed.
    ///
    /// Cancel-safe: dropping the future before it completes loses no tick.
    pub async fn tick(&mut self) -> bool {
        let Some(start) = self.first_tick else {
            return false;
        };
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let mut timer = CountdownTimer::new();
        timer.arm();
        let started = Instant::now();

        assert!(timer.tick().await);
        assert_eq!(started.elapsed(), Duration::from_secs(1));
        assert!(timer.tick().await);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_timer_returns_immediately() {
        let mut timer = CountdownTimer::new();
        assert!(!timer.tick().await);

        timer.arm();
        timer.disarm();
        let started = Instant::now();
        assert!(!timer.tick().await);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn arms_outside_a_runtime() {
        let mut timer = CountdownTimer::new();
        timer.arm();
        assert!(timer.is_armed());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        runtime.block_on(async {
            timer.arm();
            let armed = Instant::now();
            assert!(timer.tick().await);
            assert_eq!(armed.elapsed(), Duration::from_secs(1));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_restarts_phase() {
        let mut timer = CountdownTimer::new();
        timer.arm();
        tokio::time::advance(Duration::from_millis(700)).await;
        timer.arm();
        let rearmed = Instant::now();

        assert!(timer.tick().await);
        assert_eq!(rearmed.elapsed(), Duration::from_secs(1));
    }
}
