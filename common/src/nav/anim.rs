// cubic ease-in-out over t in [0, 1]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

// eased scroll
//
// sampled from animation frame callbacks.  the timestamp of the first sample
// becomes the start time, which matches how the browser hands out frame times
// (there is no meaningful "now" before the first frame fires)
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    duration_ms: f64,
    started: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollStep {
    pub position: f64,
    pub done: bool,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, duration_ms: u32) -> Self {
        ScrollAnimation {
            from,
            to,
            duration_ms: duration_ms as f64,
            started: None,
        }
    }

    pub fn sample(&mut self, now: f64) -> ScrollStep {
        let started = *self.started.get_or_insert(now);

        if self.duration_ms <= 0.0 {
            return ScrollStep {
                position: self.to,
                done: true,
            };
        }

        let elapsed = (now - started).max(0.0);
        let progress = (elapsed / self.duration_ms).min(1.0);

        ScrollStep {
            position: self.from + (self.to - self.from) * ease_in_out_cubic(progress),
            done: elapsed >= self.duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert!(close(ease_in_out_cubic(0.0), 0.0));
        assert!(close(ease_in_out_cubic(0.5), 0.5));
        assert!(close(ease_in_out_cubic(1.0), 1.0));

        assert!(close(ease_in_out_cubic(-3.0), 0.0));
        assert!(close(ease_in_out_cubic(7.0), 1.0));
    }

    #[test]
    fn easing_is_symmetric_and_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            let v = ease_in_out_cubic(t);

            assert!(v >= last);
            assert!(close(v, 1.0 - ease_in_out_cubic(1.0 - t)));
            last = v;
        }
    }

    #[test]
    fn animation_runs_from_first_frame() {
        let mut anim = ScrollAnimation::new(1000.0, 200.0, 800);

        let first = anim.sample(5000.0);
        assert!(close(first.position, 1000.0));
        assert!(!first.done);

        let middle = anim.sample(5400.0);
        assert!(close(middle.position, 600.0));
        assert!(!middle.done);

        let last = anim.sample(5800.0);
        assert!(close(last.position, 200.0));
        assert!(last.done);

        // late frames stay on target
        assert!(close(anim.sample(9000.0).position, 200.0));
    }

    #[test]
    fn zero_duration_jumps() {
        let mut anim = ScrollAnimation::new(400.0, 0.0, 0);
        let step = anim.sample(12.0);

        assert!(close(step.position, 0.0));
        assert!(step.done);
    }
}
