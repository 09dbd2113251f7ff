// SPDX-License-Identifier: MIT
//! I-VT: velocity-threshold fixation identification.
//!
//! Classifies adjacent-sample steps by instantaneous velocity and turns
//! sufficiently long low-velocity runs into fixations.

use anyhow::{Result, ensure};

use crate::gaze::{Fixation, GazeSample};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvtParams {
    /// Maximum velocity within a fixation, in pixels per millisecond.
    pub velocity_threshold: f64,
    /// Minimum fixation duration, in milliseconds.
    pub duration_threshold_ms: f64,
    /// Recording rate of the input, in Hz.
    pub sampling_frequency_hz: u32,
}

impl IvtParams {
    /// # Errors
    ///
    /// Returns an error if any threshold is non-positive or the
    /// sampling frequency is zero.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.velocity_threshold > 0.0,
            "velocity threshold must be positive, got {}",
            self.velocity_threshold
        );
        ensure!(
            self.duration_threshold_ms > 0.0,
            "duration threshold must be positive, got {}",
            self.duration_threshold_ms
        );
        ensure!(
            self.sampling_frequency_hz > 0,
            "sampling frequency must be positive"
        );
        Ok(())
    }

    /// Duration threshold expressed as a number of adjacent-sample
    /// steps. An approximation whenever the frequency does not evenly
    /// divide 1000; a run qualifies once its step count strictly
    /// exceeds this value.
    #[must_use]
    pub fn min_run_steps(&self) -> f64 {
        self.duration_threshold_ms * f64::from(self.sampling_frequency_hz) / 1000.0
    }
}

/// Instantaneous velocity between two adjacent samples, in px/ms.
fn step_velocity(prev: &GazeSample, next: &GazeSample, frequency_hz: u32) -> f64 {
    prev.distance_to(next) * f64::from(frequency_hz) / 1000.0
}

/// Runs I-VT over one trial's sample sequence.
///
/// A fixation window spans from one sample before the run's first
/// low-velocity step through the run's last sample, inclusive. A run
/// still open at the final sample is closed there.
///
/// # Errors
///
/// Returns an error if `params` fails validation. Fewer than 2 samples
/// is not an error and yields an empty list.
pub fn detect(samples: &[GazeSample], params: &IvtParams) -> Result<Vec<Fixation>> {
    params.validate()?;

    if samples.len() < 2 {
        return Ok(Vec::new());
    }

    let min_steps = params.min_run_steps();
    let mut fixations = Vec::new();

    // Scan state: index of the first low-velocity step and the number
    // of steps accumulated so far.
    let mut run_start: Option<usize> = None;
    let mut run_steps: usize = 0;

    for i in 1..samples.len() {
        let velocity = step_velocity(&samples[i - 1], &samples[i], params.sampling_frequency_hz);

        if velocity <= params.velocity_threshold {
            let start = *run_start.get_or_insert(i);
            run_steps += 1;

            #[allow(clippy::cast_precision_loss)]
            if i == samples.len() - 1 && run_steps as f64 > min_steps {
                fixations.push(Fixation::from_samples(&samples[start - 1..=i])?);
            }
        } else {
            #[allow(clippy::cast_precision_loss)]
            if let Some(start) = run_start
                && run_steps as f64 > min_steps
            {
                fixations.push(Fixation::from_samples(&samples[start - 1..i])?);
            }
            run_start = None;
            run_steps = 0;
        }
    }

    Ok(fixations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(velocity: f64, duration_ms: f64, freq: u32) -> IvtParams {
        IvtParams {
            velocity_threshold: velocity,
            duration_threshold_ms: duration_ms,
            sampling_frequency_hz: freq,
        }
    }

    fn stationary(n: usize, step_ms: i64, x: f64, y: f64) -> Vec<GazeSample> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_possible_wrap)]
                let t = i as i64 * step_ms;
                GazeSample::new(t, x, y)
            })
            .collect()
    }

    #[test]
    fn stationary_sequence_yields_one_fixation() {
        // 100 Hz, zero velocity throughout, span well past 50 ms.
        let samples = stationary(20, 10, 400.0, 300.0);
        let fixations = detect(&samples, &params(1.0, 50.0, 100)).unwrap();

        assert_eq!(fixations.len(), 1);
        let f = fixations[0];
        assert_eq!(f.start_t, 0);
        assert_eq!(f.end_t, 190);
        assert_eq!(f.duration, 190);
        assert!((f.x_mean - 400.0).abs() < f64::EPSILON);
        assert!((f.y_mean - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn constant_saccade_yields_no_fixations() {
        // Every step moves 100 px; at 100 Hz that is 10 px/ms.
        let samples: Vec<GazeSample> = (0..20)
            .map(|i| GazeSample::new(i64::from(i) * 10, f64::from(i) * 100.0, 0.0))
            .collect();

        let fixations = detect(&samples, &params(1.0, 50.0, 100)).unwrap();
        assert!(fixations.is_empty());
    }

    #[test]
    fn run_broken_by_jump_emits_pre_break_window() {
        // 10 still samples, a large jump, then 10 more still samples.
        let mut samples = stationary(10, 10, 100.0, 100.0);
        for i in 0..10 {
            samples.push(GazeSample::new(100 + i * 10, 900.0, 700.0));
        }

        let fixations = detect(&samples, &params(1.0, 50.0, 100)).unwrap();
        assert_eq!(fixations.len(), 2);

        // First fixation ends where the jump begins.
        assert_eq!(fixations[0].start_t, 0);
        assert_eq!(fixations[0].end_t, 90);
        assert!((fixations[0].x_mean - 100.0).abs() < f64::EPSILON);

        // Second fixation covers the post-jump cluster. Its window is
        // anchored one sample before its first low-velocity step, so it
        // starts at the jump target's first sample.
        assert_eq!(fixations[1].start_t, 100);
        assert_eq!(fixations[1].end_t, 190);
        assert!((fixations[1].x_mean - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_closure_includes_final_sample() {
        let samples = stationary(8, 10, 50.0, 60.0);
        let fixations = detect(&samples, &params(1.0, 30.0, 100)).unwrap();

        assert_eq!(fixations.len(), 1);
        assert_eq!(fixations[0].end_t, samples.last().unwrap().t);
    }

    #[test]
    fn short_run_is_discarded() {
        // Only 3 low-velocity steps between jumps; threshold needs > 5.
        let mut samples = vec![GazeSample::new(0, 0.0, 0.0)];
        for i in 0..4 {
            samples.push(GazeSample::new(10 + i * 10, 500.0, 500.0));
        }
        samples.push(GazeSample::new(50, 0.0, 0.0));
        samples.push(GazeSample::new(60, 500.0, 500.0));

        let fixations = detect(&samples, &params(1.0, 50.0, 100)).unwrap();
        assert!(fixations.is_empty());
    }

    #[test]
    fn empty_and_single_sample_inputs_yield_empty() {
        let p = params(1.0, 50.0, 100);
        assert!(detect(&[], &p).unwrap().is_empty());
        assert!(
            detect(&[GazeSample::new(0, 1.0, 1.0)], &p)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn non_positive_thresholds_are_rejected() {
        let samples = stationary(10, 10, 0.0, 0.0);
        assert!(detect(&samples, &params(0.0, 50.0, 100)).is_err());
        assert!(detect(&samples, &params(-1.0, 50.0, 100)).is_err());
        assert!(detect(&samples, &params(1.0, 0.0, 100)).is_err());
        assert!(detect(&samples, &params(1.0, 50.0, 0)).is_err());
    }

    #[test]
    fn min_run_steps_derivation() {
        let p = params(1.0, 200.0, 60);
        assert!((p.min_run_steps() - 12.0).abs() < f64::EPSILON);

        let p = params(1.0, 100.0, 2000);
        assert!((p.min_run_steps() - 200.0).abs() < f64::EPSILON);
    }
}
