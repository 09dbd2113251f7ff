// SPDX-License-Identifier: MIT
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use super::input::Action;
use super::panels::{fixations, header, trace};
use super::theme::{COLLAPSED_MARKER, SELECTED_MARKER, Theme};
use crate::gaze::{Fixation, GazeSample};

const COLLAPSED_HEIGHT: u16 = 3;
const TRACE_PANEL: usize = 0;
const FIXATION_PANEL: usize = 1;

/// Static facts about the trial being viewed, shown in the status bar.
pub struct TrialInfo {
    pub trial_id: i64,
    pub sampling_frequency_hz: u32,
    pub detector: String,
    pub sample_count: usize,
    pub fixation_count: usize,
}

struct PanelState {
    name: &'static str,
    collapsed: bool,
    min_height: u16,
}

pub struct App {
    info: TrialInfo,
    samples: Vec<GazeSample>,
    fixations: Vec<Fixation>,
    panels: Vec<PanelState>,
    selected_panel: usize,
    fixation_scroll: usize,
    last_fixation_view_rows: usize,
    pub should_quit: bool,
    pub theme: Theme,
}

impl App {
    #[must_use]
    pub fn new(info: TrialInfo, samples: Vec<GazeSample>, fixations: Vec<Fixation>) -> Self {
        let panels = vec![
            PanelState {
                name: "Gaze trace",
                collapsed: false,
                min_height: 12,
            },
            PanelState {
                name: "Fixations",
                collapsed: false,
                min_height: 8,
            },
        ];

        Self {
            info,
            samples,
            fixations,
            panels,
            selected_panel: TRACE_PANEL,
            fixation_scroll: 0,
            last_fixation_view_rows: 1,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub fn handle_action(&mut self, action: &Action) {
        match *action {
            Action::Quit => self.should_quit = true,
            Action::PanelUp => {
                if self.selected_panel > 0 {
                    self.selected_panel -= 1;
                }
            }
            Action::PanelDown => {
                if self.selected_panel + 1 < self.panels.len() {
                    self.selected_panel += 1;
                }
            }
            Action::ToggleCollapse => {
                if let Some(panel) = self.panels.get_mut(self.selected_panel) {
                    panel.collapsed = !panel.collapsed;
                }
            }
            Action::ScrollUp => {
                self.fixation_scroll = self.fixation_scroll.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.fixation_scroll = (self.fixation_scroll + 1).min(self.max_scroll());
            }
            Action::ScrollStart => self.fixation_scroll = 0,
            Action::ScrollEnd => self.fixation_scroll = self.max_scroll(),
            Action::None => {}
        }
    }

    fn max_scroll(&self) -> usize {
        self.fixations
            .len()
            .saturating_sub(self.last_fixation_view_rows)
    }

    fn body_layout(&self, area: Rect) -> Vec<Rect> {
        let constraints: Vec<Constraint> = self
            .panels
            .iter()
            .map(|p| {
                if p.collapsed {
                    Constraint::Length(COLLAPSED_HEIGHT)
                } else {
                    Constraint::Min(p.min_height)
                }
            })
            .collect();

        Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area)
            .to_vec()
    }

    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        let outer = frame.area();
        if outer.height < 2 || outer.width < 5 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(outer);

        header::render(frame, vertical[0], &self.info, &self.theme);

        let areas = self.body_layout(vertical[1]);

        for (i, (panel, area)) in self.panels.iter().zip(areas.iter()).enumerate() {
            let is_selected = i == self.selected_panel;

            let sel_mark = if is_selected {
                SELECTED_MARKER[1]
            } else {
                SELECTED_MARKER[0]
            };
            let col_mark = if panel.collapsed {
                COLLAPSED_MARKER[1]
            } else {
                COLLAPSED_MARKER[0]
            };

            let border_style = if is_selected {
                self.theme.border_selected
            } else {
                self.theme.border_normal
            };

            let block = Block::default()
                .title(format!("{sel_mark} {col_mark} {}", panel.name))
                .borders(Borders::ALL)
                .border_style(border_style)
                .title_style(self.theme.title);

            if panel.collapsed {
                frame.render_widget(block, *area);
                continue;
            }

            let inner = block.inner(*area);
            frame.render_widget(block, *area);
            if inner.width < 2 || inner.height < 1 {
                continue;
            }

            match i {
                TRACE_PANEL => {
                    trace::render(frame, inner, &self.samples, &self.fixations, &self.theme);
                }
                FIXATION_PANEL => {
                    self.last_fixation_view_rows = fixations::visible_rows(inner.height).max(1);
                    fixations::render(
                        frame,
                        inner,
                        &self.fixations,
                        self.fixation_scroll,
                        &self.theme,
                    );
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_app(fixation_count: usize) -> App {
        let samples = vec![
            GazeSample::new(0, 10.0, 10.0),
            GazeSample::new(10, 11.0, 11.0),
        ];
        let fixations: Vec<Fixation> = (0..fixation_count)
            .map(|i| {
                #[allow(clippy::cast_possible_wrap)]
                let start = i as i64 * 100;
                Fixation {
                    x_mean: 10.0,
                    y_mean: 10.0,
                    start_t: start,
                    end_t: start + 50,
                    duration: 50,
                }
            })
            .collect();
        let info = TrialInfo {
            trial_id: 1,
            sampling_frequency_hz: 60,
            detector: "velocity, 1 px/ms, 200 ms".to_string(),
            sample_count: samples.len(),
            fixation_count,
        };
        App::new(info, samples, fixations)
    }

    #[test]
    fn panel_selection_stays_in_bounds() {
        let mut app = make_app(0);
        app.handle_action(&Action::PanelUp);
        assert_eq!(app.selected_panel, 0);

        app.handle_action(&Action::PanelDown);
        app.handle_action(&Action::PanelDown);
        assert_eq!(app.selected_panel, 1);
    }

    #[test]
    fn scroll_is_clamped_to_fixation_count() {
        let mut app = make_app(5);
        app.last_fixation_view_rows = 2;

        for _ in 0..20 {
            app.handle_action(&Action::ScrollDown);
        }
        assert_eq!(app.fixation_scroll, 3);

        app.handle_action(&Action::ScrollStart);
        assert_eq!(app.fixation_scroll, 0);

        app.handle_action(&Action::ScrollEnd);
        assert_eq!(app.fixation_scroll, 3);
    }

    #[test]
    fn quit_action_sets_flag() {
        let mut app = make_app(0);
        app.handle_action(&Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn collapse_toggles_selected_panel() {
        let mut app = make_app(0);
        app.handle_action(&Action::ToggleCollapse);
        assert!(app.panels[0].collapsed);
        app.handle_action(&Action::ToggleCollapse);
        assert!(!app.panels[0].collapsed);
    }
}
