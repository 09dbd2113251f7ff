// SPDX-License-Identifier: MIT
use num_format::{Locale, ToFormattedString};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::TrialInfo;
use crate::tui::theme::Theme;

pub fn render(frame: &mut ratatui::Frame, area: Rect, info: &TrialInfo, theme: &Theme) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let version = env!("CARGO_PKG_VERSION");
    let text = format!(
        "fixate v{version} | trial {} | {} Hz | {} | {} samples | {} fixations",
        info.trial_id,
        info.sampling_frequency_hz,
        info.detector,
        info.sample_count.to_formatted_string(&Locale::en),
        info.fixation_count,
    );

    let line = Line::from(vec![Span::styled(
        format!("{text:<width$}", width = area.width as usize),
        theme.status_bar,
    )]);

    frame.render_widget(Paragraph::new(line), area);
}
