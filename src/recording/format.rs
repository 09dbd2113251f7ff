// SPDX-License-Identifier: MIT
use anyhow::{Result, bail};

/// Raw eye-tracker CSV column names. The full header is
/// `trialId,pointID,time,x_left,y_left,pupil_left,x_right,y_right,pupil_right`;
/// only the right-eye channel is consumed.
pub const TRIAL_COLUMN: &str = "trialId";
pub const TIME_COLUMN: &str = "time";
pub const X_COLUMN: &str = "x_right";
pub const Y_COLUMN: &str = "y_right";

/// Field positions of the columns we consume, resolved by name so the
/// recording may carry its columns in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub trial: usize,
    pub time: usize,
    pub x: usize,
    pub y: usize,
}

impl ColumnLayout {
    /// Resolves the required columns from a CSV header line.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first required column missing from
    /// the header.
    pub fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let position = |name: &str| -> Result<usize> {
            match names.iter().position(|n| *n == name) {
                Some(pos) => Ok(pos),
                None => bail!("missing column `{name}` in recording header"),
            }
        };

        Ok(Self {
            trial: position(TRIAL_COLUMN)?,
            time: position(TIME_COLUMN)?,
            x: position(X_COLUMN)?,
            y: position(Y_COLUMN)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str =
        "trialId,pointID,time,x_left,y_left,pupil_left,x_right,y_right,pupil_right";

    #[test]
    fn resolves_the_reference_header() {
        let layout = ColumnLayout::from_header(FULL_HEADER).unwrap();
        assert_eq!(
            layout,
            ColumnLayout {
                trial: 0,
                time: 2,
                x: 6,
                y: 7,
            }
        );
    }

    #[test]
    fn column_order_is_not_significant() {
        let layout = ColumnLayout::from_header("time, x_right, y_right, trialId").unwrap();
        assert_eq!(layout.trial, 3);
        assert_eq!(layout.time, 0);
    }

    #[test]
    fn missing_column_is_named_in_the_error() {
        let err = ColumnLayout::from_header("trialId,time,x_right").unwrap_err();
        assert!(err.to_string().contains("y_right"));
    }
}
