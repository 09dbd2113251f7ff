// SPDX-License-Identifier: MIT
use crossterm::event::KeyCode;

pub enum Action {
    Quit,
    PanelUp,
    PanelDown,
    ToggleCollapse,
    ScrollUp,
    ScrollDown,
    ScrollStart,
    ScrollEnd,
    None,
}

pub fn handle_key(key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up => Action::PanelUp,
        KeyCode::Down => Action::PanelDown,
        KeyCode::Right | KeyCode::Enter => Action::ToggleCollapse,
        KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Char('j') => Action::ScrollDown,
        KeyCode::Home => Action::ScrollStart,
        KeyCode::End => Action::ScrollEnd,
        _ => Action::None,
    }
}
