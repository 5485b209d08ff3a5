use rand::Rng;
use std::time::{Duration, Instant};

use crate::settings::HumanizerSettings;

/// Outcome of planning one press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressPlan {
    /// Skip this note entirely.
    Miss,
    /// Deliver the press this long after detection.
    After(Duration),
}

#[derive(Debug, Clone, Copy)]
enum HitWindow {
    Early,
    OnTime,
    Late,
}

/// Stochastic timing model that makes the output look played rather than
/// computed: a fixed reaction delay, a bounded random delay, occasional
/// misses, hold jitter, and an early/late hit window.
///
/// Pure decisions: every call is a function of the profile and the supplied
/// rng only, so tests can seed it and the engine owns when state changes.
#[derive(Debug, Clone)]
pub struct Humanizer {
    reaction_time: Duration,
    random_delay: Duration,
    miss_chance: f32,
    hold_variation: Duration,
    timing_error: Duration,
    early_chance: u32,
    late_chance: u32,
}

impl Humanizer {
    pub fn from_settings(settings: &HumanizerSettings) -> Self {
        Self {
            reaction_time: Duration::from_millis(settings.reaction_time_ms),
            random_delay: Duration::from_millis(settings.random_delay_ms),
            miss_chance: settings.miss_chance_pct,
            hold_variation: Duration::from_millis(settings.hold_variation_ms),
            timing_error: Duration::from_millis(settings.timing_error_ms),
            early_chance: settings.early_chance_pct,
            late_chance: settings.late_chance_pct,
        }
    }

    /// Decide what happens to a detected press: a miss, or a delay made of
    /// reaction time, uniform random delay and the hit-window error.
    pub fn plan_press<R: Rng>(&self, rng: &mut R) -> PressPlan {
        if self.miss_chance > 0.0 && rng.gen_range(0.0f32..100.0) < self.miss_chance {
            return PressPlan::Miss;
        }

        let mut delay = self.reaction_time;
        if !self.random_delay.is_zero() {
            delay += self.random_delay.mul_f64(rng.gen::<f64>());
        }
        delay += self.window_error(rng);
        PressPlan::After(delay)
    }

    /// Jitter a release around its base delivery time (detection plus the
    /// delay the paired press got) by up to the hold variation in either
    /// direction. The dispatcher never reorders a channel, so a shift into
    /// the past can only shorten the hold, never release before the press.
    pub fn shift_release<R: Rng>(&self, requested_at: Instant, rng: &mut R) -> Instant {
        if self.hold_variation.is_zero() {
            return requested_at;
        }
        let bound = self.hold_variation.as_secs_f64();
        let shift = rng.gen_range(-bound..=bound);
        if shift >= 0.0 {
            requested_at + Duration::from_secs_f64(shift)
        } else {
            requested_at
                .checked_sub(Duration::from_secs_f64(-shift))
                .unwrap_or(requested_at)
        }
    }

    /// Weighted early/on-time/late choice. Early and late hits land inside
    /// the tolerance window, at most half of it away from perfect, so the
    /// added delay is uniform over [0, timing_error / 2).
    fn window_error<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.timing_error.is_zero() || self.early_chance + self.late_chance == 0 {
            return Duration::ZERO;
        }
        let roll = rng.gen_range(0u32..100);
        let window = if roll < self.early_chance {
            HitWindow::Early
        } else if roll < self.early_chance + self.late_chance {
            HitWindow::Late
        } else {
            HitWindow::OnTime
        };
        match window {
            HitWindow::OnTime => Duration::ZERO,
            HitWindow::Early | HitWindow::Late => {
                self.timing_error.mul_f64(rng.gen_range(0.0..0.5))
            }
        }
    }
}
