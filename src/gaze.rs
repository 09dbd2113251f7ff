// SPDX-License-Identifier: MIT
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// A single gaze measurement: timestamp in milliseconds and pixel
/// coordinates of the gaze position. Immutable once constructed by the
/// loader; timestamps are non-decreasing within a trial (the loader
/// rejects recordings that violate this).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub t: i64,
    pub x: f64,
    pub y: f64,
}

impl GazeSample {
    #[must_use]
    pub fn new(t: i64, x: f64, y: f64) -> Self {
        Self { t, x, y }
    }

    /// Euclidean distance to another sample, in pixels.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An interval during which gaze position stayed within the stability
/// criterion of the detector that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixation {
    pub x_mean: f64,
    pub y_mean: f64,
    pub start_t: i64,
    pub end_t: i64,
    pub duration: i64,
}

impl Fixation {
    /// Builds a fixation from a contiguous window of samples.
    ///
    /// The centroid is the arithmetic mean of the member coordinates;
    /// `start_t`/`end_t` come from the first and last member.
    ///
    /// # Errors
    ///
    /// Returns an error if the window has fewer than 2 samples or its
    /// timestamps are not in order.
    pub fn from_samples(window: &[GazeSample]) -> Result<Self> {
        ensure!(
            window.len() >= 2,
            "fixation window needs at least 2 samples, got {}",
            window.len()
        );

        let (first, last) = (window[0], window[window.len() - 1]);
        ensure!(
            first.t <= last.t,
            "fixation window timestamps out of order ({} > {})",
            first.t,
            last.t
        );

        #[allow(clippy::cast_precision_loss)]
        let count = window.len() as f64;
        let x_mean = window.iter().map(|s| s.x).sum::<f64>() / count;
        let y_mean = window.iter().map(|s| s.y).sum::<f64>() / count;

        Ok(Self {
            x_mean,
            y_mean,
            start_t: first.t,
            end_t: last.t,
            duration: last.t - first.t,
        })
    }
}
