use crate::error::RunnerError;
use std::thread;
use std::time::{Duration, Instant};

/// Holds each frame to a target period by sleeping out the remainder.
///
/// A frame that overruns is not shortened or skipped: the next one simply
/// starts late.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    period: Duration,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self {
            period: Self::DEFAULT_PERIOD,
        }
    }
}

impl FramePacer {
    /// 25 frames per second.
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(40);

    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_fps(fps: u32) -> Result<Self, RunnerError> {
        Ok(Self::new(Self::period_for_fps(fps)?))
    }

    /// `round(1000 / fps)` milliseconds.
    pub fn period_for_fps(fps: u32) -> Result<Duration, RunnerError> {
        if fps == 0 {
            return Err(RunnerError::InvalidFps(fps));
        }
        let millis = (1000.0 / fps as f64).round() as u64;
        Ok(Duration::from_millis(millis))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Time left in the frame after `elapsed`, or `None` if there is none.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.period.checked_sub(elapsed).filter(|rest| !rest.is_zero())
    }

    /// Sleep until one period after `frame_start`. Returns the time slept,
    /// or `None` when the frame used up its whole period.
    pub fn finish_frame(&self, frame_start: Instant) -> Option<Duration> {
        let elapsed = frame_start.elapsed();
        match self.remaining(elapsed) {
            Some(rest) => {
                thread::sleep(rest);
                Some(rest)
            }
            None => {
                if elapsed > self.period {
                    tracing::debug!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        period_ms = self.period.as_millis() as u64,
                        "frame overran its period"
                    );
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_forty_milliseconds() {
        assert_eq!(FramePacer::default().period(), Duration::from_millis(40));
    }

    #[test]
    fn fps_rounds_to_nearest_millisecond() {
        let ms = |fps| FramePacer::period_for_fps(fps).unwrap().as_millis();
        assert_eq!(ms(25), 40);
        assert_eq!(ms(30), 33);
        assert_eq!(ms(60), 17);
        assert_eq!(ms(7), 143);
        assert_eq!(ms(3000), 0);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(matches!(FramePacer::from_fps(0), Err(RunnerError::InvalidFps(0))));
    }

    #[test]
    fn remaining_time() {
        let pacer = FramePacer::default();
        assert_eq!(pacer.remaining(Duration::from_millis(10)), Some(Duration::from_millis(30)));
        assert_eq!(pacer.remaining(Duration::from_millis(40)), None);
        assert_eq!(pacer.remaining(Duration::from_millis(55)), None);
    }

    #[test]
    fn short_frame_sleeps_to_period() {
        let pacer = FramePacer::new(Duration::from_millis(20));
        let start = Instant::now();
        assert!(pacer.finish_frame(start).is_some());
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn overrun_frame_does_not_sleep() {
        let pacer = FramePacer::new(Duration::from_millis(5));
        let start = Instant::now();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(pacer.finish_frame(start), None);
    }
}
