//! Frame timing for the simulated clock.
//!
//! Turns variable frame deltas into a whole number of fixed simulation
//! steps, keeping the remainder for the next frame.

/// Upper bound on fixed steps run for a single frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Accumulator for fixed timestep
    accumulator: f32,
    /// Fixed timestep delta
    fixed_dt: f32,
    /// Maximum delta time to prevent spiral of death
    max_dt: f32,
    /// Frames seen so far
    frames: u64,
    /// Fixed steps run so far
    steps: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create a new frame timing manager.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps: target_fps.max(1),
            accumulator: 0.0,
            fixed_dt: 1.0 / 60.0,
            max_dt: 0.25,
            frames: 0,
            steps: 0,
        }
    }

    /// Set the fixed timestep.
    pub fn set_fixed_dt(&mut self, dt: f32) {
        self.fixed_dt = dt.max(0.001); // Minimum 1ms
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Frame delta implied by the target frame rate.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Accumulate time for fixed timestep updates.
    /// Returns the number of fixed updates that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.frames += 1;
        self.accumulator += dt.clamp(0.0, self.max_dt);

        // Tolerate float drift so 60 frames of 1/60 give 60 steps.
        let epsilon = self.fixed_dt * 1e-3;
        let mut count = 0;
        while self.accumulator + epsilon >= self.fixed_dt && count < MAX_STEPS_PER_FRAME {
            self.accumulator = (self.accumulator - self.fixed_dt).max(0.0);
            count += 1;
        }

        // Still behind: drop the backlog.
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        self.steps += u64::from(count);
        count
    }

    /// Frames accumulated so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fixed steps handed out so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds covered by the steps handed out.
    #[must_use]
    pub fn simulated_seconds(&self) -> f64 {
        self.steps as f64 * f64::from(self.fixed_dt)
    }
}
