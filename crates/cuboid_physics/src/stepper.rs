//! Fixed-timestep accumulator
//!
//! Real frame time goes in, whole fixed steps come out, and the remainder is
//! carried to the next frame. There is no interpolation between steps:
//! renderers read the latest post-step positions, which can stutter slightly
//! when the frame rate is not a multiple of the step rate.

/// Reference simulation step (60 Hz)
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Longest frame time accepted in one call, to avoid a spiral of death
/// after a stall (first frame, window drag, debugger pause)
pub const DEFAULT_MAX_FRAME_TIME: f32 = 0.25;

/// Accumulates wall-clock time and hands it out in fixed slices
#[derive(Clone, Debug, PartialEq)]
pub struct FixedTimestep {
    fixed_dt: f32,
    max_frame_time: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator
    ///
    /// A step or frame cap that is not a positive finite number would stall
    /// `consume` forever; those fall back to [`FIXED_DT`] and
    /// [`DEFAULT_MAX_FRAME_TIME`].
    pub fn new(fixed_dt: f32, max_frame_time: f32) -> Self {
        let fixed_dt = if fixed_dt.is_finite() && fixed_dt > 0.0 {
            fixed_dt
        } else {
            log::warn!("Invalid fixed timestep {}, using {}", fixed_dt, FIXED_DT);
            FIXED_DT
        };
        let max_frame_time = if max_frame_time.is_finite() && max_frame_time > 0.0 {
            max_frame_time
        } else {
            log::warn!(
                "Invalid max frame time {}, using {}",
                max_frame_time,
                DEFAULT_MAX_FRAME_TIME
            );
            DEFAULT_MAX_FRAME_TIME
        };
        Self {
            fixed_dt,
            max_frame_time,
            accumulator: 0.0,
        }
    }

    /// Add one frame's elapsed time
    ///
    /// Negative and NaN frame times are dropped. Anything longer than the
    /// maximum frame time is clamped.
    pub fn accumulate(&mut self, frame_time: f32) {
        if frame_time.is_nan() || frame_time <= 0.0 {
            return;
        }
        let frame_time = if frame_time > self.max_frame_time {
            log::warn!(
                "Frame time {:.3}s exceeds {:.3}s, clamping",
                frame_time,
                self.max_frame_time
            );
            self.max_frame_time
        } else {
            frame_time
        };
        self.accumulator += frame_time;
    }

    /// Take one fixed step from the accumulator if enough time is stored
    pub fn consume(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            true
        } else {
            false
        }
    }

    /// Time carried over to the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Drop any stored time (after a scene reset, for example)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FIXED_DT, DEFAULT_MAX_FRAME_TIME)
    }
}
