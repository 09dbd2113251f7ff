// SPDX-License-Identifier: MIT
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::gaze::{Fixation, GazeSample};
use crate::tui::theme::{HORIZONTAL_MARKER, Theme, VERTICAL_MARKER};

struct TraceWidget<'a> {
    samples: &'a [GazeSample],
    fixations: &'a [Fixation],
    theme: &'a Theme,
}

/// Value range of both coordinate channels, padded a little so the
/// extremes do not sit on the frame edge.
fn value_range(samples: &[GazeSample]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for s in samples {
        min = min.min(s.x).min(s.y);
        max = max.max(s.x).max(s.y);
    }
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad, max + pad)
}

impl TraceWidget<'_> {
    fn column_of(&self, t: i64, area: Rect) -> u16 {
        let t0 = self.samples[0].t;
        let t1 = self.samples[self.samples.len() - 1].t;
        let span = (t1 - t0).max(1);

        #[allow(clippy::cast_precision_loss)]
        let fraction = (t - t0) as f64 / span as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = (fraction * f64::from(area.width - 1)).round() as u16;
        area.x + offset.min(area.width - 1)
    }

    fn row_of(value: f64, range: (f64, f64), area: Rect, height: u16) -> u16 {
        let (lo, hi) = range;
        let fraction = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
        // Screen rows grow downward; values grow upward.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = ((1.0 - fraction) * f64::from(height - 1)).round() as u16;
        area.y + offset.min(height - 1)
    }
}

impl Widget for TraceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let legend_height: u16 = 1;
        let chart_height = area.height - legend_height;
        let range = value_range(self.samples);

        // Fixation spans first, as background shading under the traces.
        for f in self.fixations {
            let start_col = self.column_of(f.start_t, area);
            let end_col = self.column_of(f.end_t, area);
            for col in start_col..=end_col {
                for row in area.y..area.y + chart_height {
                    buf[(col, row)].set_style(self.theme.fixation_span);
                }
            }
        }

        for s in self.samples {
            let col = self.column_of(s.t, area);

            let x_row = Self::row_of(s.x, range, area, chart_height);
            buf[(col, x_row)]
                .set_char(HORIZONTAL_MARKER)
                .set_style(self.theme.trace_horizontal);

            let y_row = Self::row_of(s.y, range, area, chart_height);
            buf[(col, y_row)]
                .set_char(VERTICAL_MARKER)
                .set_style(self.theme.trace_vertical);
        }

        let legend_area = Rect::new(area.x, area.y + chart_height, area.width, legend_height);
        let (t0, t1) = (
            self.samples[0].t,
            self.samples[self.samples.len() - 1].t,
        );
        let legend = Line::from(vec![
            Span::styled(
                format!("{HORIZONTAL_MARKER} horizontal"),
                self.theme.trace_horizontal,
            ),
            Span::raw("  "),
            Span::styled(
                format!("{VERTICAL_MARKER} vertical"),
                self.theme.trace_vertical,
            ),
            Span::raw("  "),
            Span::styled("\u{2588} fixation", self.theme.fixation_span),
            Span::styled(
                format!("  t {t0}..{t1} ms  pos {:.0}..{:.0} px", range.0, range.1),
                self.theme.legend,
            ),
        ]);
        Paragraph::new(legend).render(legend_area, buf);
    }
}

pub fn render(
    frame: &mut ratatui::Frame,
    area: Rect,
    samples: &[GazeSample],
    fixations: &[Fixation],
    theme: &Theme,
) {
    if area.height < 3 || area.width < 4 {
        return;
    }

    if samples.is_empty() {
        frame.render_widget(Paragraph::new("No samples in this trial."), area);
        return;
    }

    let widget = TraceWidget {
        samples,
        fixations,
        theme,
    };
    frame.render_widget(widget, area);
}
