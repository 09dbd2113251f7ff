// SPDX-License-Identifier: MIT
pub mod idt;
pub mod ivt;

use std::fmt;

use anyhow::Result;
use clap::ValueEnum;

use crate::gaze::{Fixation, GazeSample};
use idt::IdtParams;
use ivt::IvtParams;

/// Which fixation-detection algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// I-VT: classify samples by point-to-point speed.
    Velocity,
    /// I-DT: classify samples by spread within a sliding time window.
    Dispersion,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Velocity => write!(f, "velocity"),
            Self::Dispersion => write!(f, "dispersion"),
        }
    }
}

/// A fully parameterized detector invocation. Both variants consume the
/// same input shape and produce the same output shape; selection is
/// mutually exclusive per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorConfig {
    Velocity(IvtParams),
    Dispersion(IdtParams),
}

impl DetectorConfig {
    /// Runs the configured detector over one trial's samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured thresholds are invalid.
    pub fn detect(&self, samples: &[GazeSample]) -> Result<Vec<Fixation>> {
        match self {
            Self::Velocity(params) => ivt::detect(samples, params),
            Self::Dispersion(params) => idt::detect(samples, params),
        }
    }

    /// Short human-readable parameter summary, e.g. for the view header.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Velocity(p) => format!(
                "velocity, {} px/ms, {} ms",
                p.velocity_threshold, p.duration_threshold_ms
            ),
            Self::Dispersion(p) => format!(
                "dispersion, {} px, {} ms",
                p.dispersion_threshold, p.duration_threshold_ms
            ),
        }
    }

    /// The minimum duration a fixation from this configuration can have.
    #[must_use]
    #[allow(dead_code)]
    pub fn duration_threshold_ms(&self) -> f64 {
        match self {
            Self::Velocity(p) => p.duration_threshold_ms,
            Self::Dispersion(p) => p.duration_threshold_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three stable clusters separated by saccade-sized jumps, 100 Hz.
    fn three_cluster_scanpath() -> Vec<GazeSample> {
        let clusters = [(100.0, 100.0), (800.0, 200.0), (400.0, 600.0)];
        let mut samples = Vec::new();
        let mut t = 0;

        for &(cx, cy) in &clusters {
            for i in 0..30 {
                // Sub-pixel jitter keeps the cluster inside any sane
                // dispersion threshold without being perfectly still.
                let jitter = f64::from(i % 3) * 0.1;
                samples.push(GazeSample::new(t, cx + jitter, cy - jitter));
                t += 10;
            }
        }
        samples
    }

    fn configs() -> Vec<DetectorConfig> {
        vec![
            DetectorConfig::Velocity(ivt::IvtParams {
                velocity_threshold: 1.0,
                duration_threshold_ms: 100.0,
                sampling_frequency_hz: 100,
            }),
            DetectorConfig::Dispersion(idt::IdtParams {
                dispersion_threshold: 5.0,
                duration_threshold_ms: 100.0,
            }),
        ]
    }

    #[test]
    fn fixations_are_ordered_and_non_overlapping() {
        let samples = three_cluster_scanpath();

        for config in configs() {
            let fixations = config.detect(&samples).unwrap();
            assert!(
                fixations.len() >= 2,
                "{} found too few fixations",
                config.describe()
            );

            for pair in fixations.windows(2) {
                assert!(pair[0].end_t <= pair[1].start_t);
            }
        }
    }

    #[test]
    fn fixations_meet_the_minimum_duration() {
        let samples = three_cluster_scanpath();

        for config in configs() {
            for f in config.detect(&samples).unwrap() {
                #[allow(clippy::cast_precision_loss)]
                let duration = f.duration as f64;
                assert!(
                    duration >= config.duration_threshold_ms(),
                    "{} emitted a {duration} ms fixation",
                    config.describe()
                );
                assert_eq!(f.duration, f.end_t - f.start_t);
            }
        }
    }

    #[test]
    fn centroids_stay_inside_their_cluster() {
        let samples = three_cluster_scanpath();

        for config in configs() {
            for f in config.detect(&samples).unwrap() {
                let near_a_cluster = [(100.0, 100.0), (800.0, 200.0), (400.0, 600.0)]
                    .iter()
                    .any(|&(cx, cy): &(f64, f64)| {
                        (f.x_mean - cx).abs() < 5.0 && (f.y_mean - cy).abs() < 5.0
                    });
                assert!(near_a_cluster, "centroid ({}, {})", f.x_mean, f.y_mean);
            }
        }
    }

    #[test]
    fn empty_input_is_not_an_error() {
        for config in configs() {
            assert!(config.detect(&[]).unwrap().is_empty());
        }
    }
}
