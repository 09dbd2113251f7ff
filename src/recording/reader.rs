// SPDX-License-Identifier: MIT
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::format::ColumnLayout;
use crate::gaze::GazeSample;

/// An in-memory raw gaze recording, grouped per trial.
#[derive(Debug)]
pub struct RecordingReader {
    trials: BTreeMap<i64, Vec<GazeSample>>,
}

impl RecordingReader {
    /// Opens a raw CSV recording, resolves its header, and reads every
    /// sample row.
    ///
    /// Rows with empty coordinate fields (blinks / tracking loss) are
    /// skipped. Timestamps within a trial must be non-decreasing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the header lacks
    /// a required column, a field fails to parse, or a trial's
    /// timestamps regress.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open recording file: {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();

        let header = match lines.next() {
            Some(line) => line.context("failed to read recording header")?,
            None => bail!("recording file is empty: {}", path.display()),
        };
        let layout = ColumnLayout::from_header(&header)?;

        let mut trials: BTreeMap<i64, Vec<GazeSample>> = BTreeMap::new();

        // Line numbers are 1-based and the header is line 1.
        for (index, line) in lines.enumerate() {
            let line_no = index + 2;
            let line = line.with_context(|| format!("failed to read line {line_no}"))?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(sample) = Self::parse_row(&line, layout, line_no)? {
                let (trial_id, sample) = sample;
                let samples = trials.entry(trial_id).or_default();

                if let Some(prev) = samples.last()
                    && sample.t < prev.t
                {
                    bail!(
                        "line {line_no}: timestamp {} regresses below {} in trial {trial_id}",
                        sample.t,
                        prev.t
                    );
                }
                samples.push(sample);
            }
        }

        Ok(Self { trials })
    }

    /// Parses one data row; `None` means the row was a blink and
    /// carries no usable coordinates.
    fn parse_row(
        line: &str,
        layout: ColumnLayout,
        line_no: usize,
    ) -> Result<Option<(i64, GazeSample)>> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |pos: usize| -> Result<&str> {
            match fields.get(pos) {
                Some(value) => Ok(*value),
                None => bail!("line {line_no}: expected at least {} fields", pos + 1),
            }
        };

        let x_raw = field(layout.x)?;
        let y_raw = field(layout.y)?;
        if x_raw.is_empty() || y_raw.is_empty() {
            return Ok(None);
        }

        let trial_id: i64 = field(layout.trial)?
            .parse()
            .with_context(|| format!("line {line_no}: invalid trial id"))?;
        let t: i64 = field(layout.time)?
            .parse()
            .with_context(|| format!("line {line_no}: invalid timestamp"))?;
        let x: f64 = x_raw
            .parse()
            .with_context(|| format!("line {line_no}: invalid x coordinate"))?;
        let y: f64 = y_raw
            .parse()
            .with_context(|| format!("line {line_no}: invalid y coordinate"))?;

        Ok(Some((trial_id, GazeSample::new(t, x, y))))
    }

    /// The samples of one trial, in recording order.
    #[must_use]
    pub fn trial(&self, id: i64) -> Option<&[GazeSample]> {
        self.trials.get(&id).map(Vec::as_slice)
    }

    /// All trial ids present in the recording, ascending.
    #[must_use]
    pub fn trial_ids(&self) -> Vec<i64> {
        self.trials.keys().copied().collect()
    }

    /// Total number of usable samples across all trials.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.trials.values().map(Vec::len).sum()
    }
}
