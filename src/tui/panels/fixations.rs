// SPDX-License-Identifier: MIT
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::gaze::Fixation;
use crate::tui::theme::Theme;

pub fn render(
    frame: &mut ratatui::Frame,
    area: Rect,
    fixations: &[Fixation],
    scroll: usize,
    theme: &Theme,
) {
    if area.height < 2 || area.width < 10 {
        return;
    }

    if fixations.is_empty() {
        frame.render_widget(Paragraph::new("No fixations detected."), area);
        return;
    }

    let visible = area.height as usize - 1;
    let first = scroll.min(fixations.len().saturating_sub(1));
    let shown = &fixations[first..fixations.len().min(first + visible)];

    let header = format!(
        "{:>4}  {:>10}  {:>10}  {:>9}  {:>9}  {:>9}   ({}..{} of {})",
        "#",
        "start (ms)",
        "end (ms)",
        "dur (ms)",
        "x mean",
        "y mean",
        first + 1,
        first + shown.len(),
        fixations.len()
    );

    let mut lines = vec![Line::styled(header, theme.table_header)];
    for (offset, f) in shown.iter().enumerate() {
        lines.push(Line::from(format!(
            "{:>4}  {:>10}  {:>10}  {:>9}  {:>9.2}  {:>9.2}",
            first + offset + 1,
            f.start_t,
            f.end_t,
            f.duration,
            f.x_mean,
            f.y_mean
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Number of fixation rows a panel of `height` can show.
#[must_use]
pub fn visible_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(1))
}
