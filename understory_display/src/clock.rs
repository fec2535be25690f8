// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-rate frame pacing driven by host-supplied timestamps.

use std::time::{Duration, Instant};

/// Lowest accepted frame rate.
pub const MIN_FRAME_RATE: f64 = 0.01;
/// Highest accepted frame rate.
pub const MAX_FRAME_RATE: f64 = 1000.0;

/// Decides when the next frame is due.
///
/// The clock never reads the system time itself: the host passes `now` to
/// [`FrameClock::poll`]. The first poll after construction or after a rate
/// change arms the deadline one interval later.
#[derive(Clone, Debug)]
pub struct FrameClock {
    rate: f64,
    interval: Duration,
    next_due: Option<Instant>,
    reschedules: u64,
}

impl FrameClock {
    /// Create a clock ticking at `rate` frames per second (clamped).
    pub fn new(rate: f64) -> Self {
        let rate = clamp_rate(rate);
        Self {
            rate,
            interval: interval_for(rate),
            next_due: None,
            reschedules: 0,
        }
    }

    /// Frames per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Time between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How often the schedule has been cancelled by a rate change.
    pub fn reschedules(&self) -> u64 {
        self.reschedules
    }

    /// Whether a deadline is currently armed.
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Change the rate, cancelling the pending deadline. Returns the clamped rate.
    pub fn set_rate(&mut self, rate: f64) -> f64 {
        self.rate = clamp_rate(rate);
        self.interval = interval_for(self.rate);
        self.next_due = None;
        self.reschedules += 1;
        self.rate
    }

    /// Returns `true` if a frame is due at `now`.
    ///
    /// At most one frame is reported per poll; a host that fell behind by
    /// several intervals skips the missed frames instead of bursting.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            self.next_due = Some(now + self.interval);
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.interval;
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        MIN_FRAME_RATE
    } else {
        rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
    }
}

fn interval_for(rate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_clamped() {
        let mut clock = FrameClock::new(24.0);
        assert_eq!(clock.set_rate(0.0), MIN_FRAME_RATE);
        assert_eq!(clock.interval(), Duration::from_secs(100));
        assert_eq!(clock.set_rate(5000.0), MAX_FRAME_RATE);
        assert_eq!(clock.set_rate(f64::NAN), MIN_FRAME_RATE);
        assert_eq!(clock.reschedules(), 3);
    }

    #[test]
    fn ticks_once_per_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10.0);
        assert!(!clock.poll(start), "first poll only arms the deadline");
        assert!(!clock.poll(start + Duration::from_millis(50)));
        assert!(clock.poll(start + Duration::from_millis(100)));
        assert!(!clock.poll(start + Duration::from_millis(150)));
        assert!(clock.poll(start + Duration::from_millis(200)));
    }

    #[test]
    fn falling_behind_skips_missed_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10.0);
        clock.poll(start);
        assert!(clock.poll(start + Duration::from_secs(5)));
        assert!(!clock.poll(start + Duration::from_millis(5050)));
        assert!(clock.poll(start + Duration::from_millis(5100)));
    }

    #[test]
    fn rate_change_cancels_deadline() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10.0);
        clock.poll(start);
        assert!(clock.is_armed());
        clock.set_rate(20.0);
        assert!(!clock.is_armed());
        assert!(!clock.poll(start + Duration::from_millis(100)));
        assert!(clock.poll(start + Duration::from_millis(150)));
    }
}
