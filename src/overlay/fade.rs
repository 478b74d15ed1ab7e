//! Opacity cross-fade driven by the input timer.
//!
//! Like a "To"-only animation: a new fade always starts from whatever
//! opacity is currently displayed, so reversing mid-way never jumps.

use std::time::{Duration, Instant};

/// Quadratic ease-in-out on `t` in [0, 1].
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

/// Current overlay opacity plus the fade in flight, if any.
#[derive(Debug, Clone)]
pub struct OpacityAnimator {
    value: f64,
    fade: Option<Fade>,
}

impl Default for OpacityAnimator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OpacityAnimator {
    pub fn new(value: f64) -> Self {
        Self { value, fade: None }
    }

    /// Start fading from the current value towards `to`.
    pub fn fade_to(&mut self, to: f64, duration: Duration, now: Instant) {
        let from = self.sample(now);
        if duration.is_zero() || (from - to).abs() < f64::EPSILON {
            self.stop(to);
            return;
        }
        self.fade = Some(Fade {
            from,
            to,
            start: now,
            duration,
        });
    }

    /// Cancel any fade and hold `value`.
    pub fn stop(&mut self, value: f64) {
        self.fade = None;
        self.value = value;
    }

    /// Advance to `now` and return the opacity to display.
    pub fn sample(&mut self, now: Instant) -> f64 {
        if let Some(fade) = self.fade {
            let elapsed = now.saturating_duration_since(fade.start);
            if elapsed >= fade.duration {
                self.value = fade.to;
                self.fade = None;
            } else {
                let t = elapsed.as_secs_f64() / fade.duration.as_secs_f64();
                self.value = fade.from + (fade.to - fade.from) * ease_in_out_quad(t);
            }
        }
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.fade.is_some()
    }

    /// Last sampled value, without advancing.
    pub fn value(&self) -> f64 {
        self.value
    }
}
