// SPDX-License-Identifier: MIT
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub trace_horizontal: Style,
    pub trace_vertical: Style,
    pub fixation_span: Style,
    pub border_normal: Style,
    pub border_selected: Style,
    pub title: Style,
    pub status_bar: Style,
    pub table_header: Style,
    pub legend: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            trace_horizontal: Style::default().fg(Color::Cyan),
            trace_vertical: Style::default().fg(Color::Magenta),
            fixation_span: Style::default().bg(Color::DarkGray),
            border_normal: Style::default().fg(Color::White),
            border_selected: Style::default().fg(Color::Cyan),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().fg(Color::Black).bg(Color::White),
            table_header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            legend: Style::default().fg(Color::Gray),
        }
    }
}

pub const HORIZONTAL_MARKER: char = '\u{2022}';
pub const VERTICAL_MARKER: char = '\u{00D7}';
pub const SELECTED_MARKER: [char; 2] = ['\u{2610}', '\u{2611}'];
pub const COLLAPSED_MARKER: [char; 2] = ['\u{25BC}', '\u{25BA}'];
