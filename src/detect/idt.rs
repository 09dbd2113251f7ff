// SPDX-License-Identifier: MIT
//! I-DT: dispersion-threshold fixation identification.
//!
//! Slides a duration-bounded window over the trial and grows it while
//! the spatial spread of its members stays under the dispersion
//! threshold.

use anyhow::{Result, ensure};

use crate::gaze::{Fixation, GazeSample};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdtParams {
    /// Maximum window dispersion within a fixation, in pixels.
    pub dispersion_threshold: f64,
    /// Minimum fixation duration, in milliseconds.
    pub duration_threshold_ms: f64,
}

impl IdtParams {
    /// # Errors
    ///
    /// Returns an error if either threshold is non-positive.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dispersion_threshold > 0.0,
            "dispersion threshold must be positive, got {}",
            self.dispersion_threshold
        );
        ensure!(
            self.duration_threshold_ms > 0.0,
            "duration threshold must be positive, got {}",
            self.duration_threshold_ms
        );
        Ok(())
    }
}

/// Spatial spread of a window: half the sum of its x and y ranges.
/// An approximation of bounding-box size, not a true diagonal.
#[must_use]
pub fn dispersion(window: &[GazeSample]) -> f64 {
    let Some(first) = window.first() else {
        return 0.0;
    };

    let init = (first.x, first.x, first.y, first.y);
    let (min_x, max_x, min_y, max_y) = window.iter().fold(init, |acc, s| {
        (
            acc.0.min(s.x),
            acc.1.max(s.x),
            acc.2.min(s.y),
            acc.3.max(s.y),
        )
    });

    0.5 * ((max_x - min_x) + (max_y - min_y))
}

#[allow(clippy::cast_precision_loss)]
fn span_ms(samples: &[GazeSample]) -> f64 {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (last.t - first.t) as f64,
        _ => 0.0,
    }
}

/// Runs I-DT over one trial's sample sequence.
///
/// Each round starts from the leading samples that fall within the
/// duration threshold of the first remaining sample, plus one probe
/// sample beyond them. A window under the dispersion threshold grows
/// sample by sample until the next sample would push it over the
/// threshold or the data runs out, then becomes a fixation; otherwise
/// the leading sample is dropped and the window slides by one.
///
/// # Errors
///
/// Returns an error if `params` fails validation.
pub fn detect(samples: &[GazeSample], params: &IdtParams) -> Result<Vec<Fixation>> {
    params.validate()?;

    let mut fixations = Vec::new();
    let mut rest = samples;

    while span_ms(rest) > params.duration_threshold_ms {
        let first_t = rest[0].t;
        #[allow(clippy::cast_precision_loss)]
        let within_duration = rest
            .iter()
            .take_while(|s| (s.t - first_t) as f64 <= params.duration_threshold_ms)
            .count();

        // The span check guarantees a sample beyond the duration
        // window, so the probe index is always in bounds.
        let mut len = within_duration + 1;

        if dispersion(&rest[..len]) <= params.dispersion_threshold {
            while len < rest.len() && dispersion(&rest[..=len]) <= params.dispersion_threshold {
                len += 1;
            }
            fixations.push(Fixation::from_samples(&rest[..len])?);
            rest = &rest[len..];
        } else {
            rest = &rest[1..];
        }
    }

    Ok(fixations)
}
