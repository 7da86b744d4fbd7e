use std::time::Duration;

/// Linear volume ramp split into equal steps.
///
/// Yields the volume to apply at each step; the caller sleeps
/// [`VolumeFade::step_duration`] after applying it.
#[derive(Debug, Clone)]
pub struct VolumeFade {
    start: f32,
    target: f32,
    steps: u32,
    step_duration: Duration,
    current_step: u32,
}

impl VolumeFade {
    pub fn new(start: f32, target: f32, duration: Duration, steps: u32) -> Self {
        let start = start.clamp(0.0, 1.0);
        let target = target.clamp(0.0, 1.0);
        let steps = steps.max(1);
        let step_duration = (duration / steps).max(Duration::from_millis(1));

        // Nothing to ramp: a single jump to the target, no sleeping.
        let instant = duration.is_zero() || start == target;

        Self {
            start,
            target,
            steps: if instant { 0 } else { steps },
            step_duration,
            current_step: 0,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// `true` when the fade resolves to setting the target directly.
    pub fn is_instant(&self) -> bool {
        self.steps == 0
    }

    pub fn step_duration(&self) -> Duration {
        self.step_duration
    }
}

impl Iterator for VolumeFade {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.current_step >= self.steps {
            return None;
        }
        self.current_step += 1;

        let progress = self.current_step as f32 / self.steps as f32;
        Some(self.start + (self.target - self.start) * progress)
    }
}
