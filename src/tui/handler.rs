use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    SwitchView,
    PrevVersion,
    NextVersion,
    ScrollUp,
    ScrollDown,
    CycleTable,
    ExportCsv,
    ReloadData,
    EditDateRange,
    ClearDateRange,
    ShowHelp,
    HideHelp,
    // Date range input actions
    DateInputChar(char),
    DateInputBackspace,
    DateInputConfirm,
    DateInputCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    date_input_active: bool,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Date range input mode
    if date_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::DateInputConfirm),
            KeyCode::Esc => Some(AppAction::DateInputCancel),
            KeyCode::Backspace => Some(AppAction::DateInputBackspace),
            KeyCode::Char(c) => Some(AppAction::DateInputChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Tab, _) => Some(AppAction::SwitchView),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::NextVersion),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::PrevVersion),

        (KeyCode::Char('J'), _) | (KeyCode::PageDown, _) => Some(AppAction::ScrollDown),
        (KeyCode::Char('K'), _) | (KeyCode::PageUp, _) => Some(AppAction::ScrollUp),

        (KeyCode::Char('t'), _) => Some(AppAction::CycleTable),
        (KeyCode::Char('e'), _) => Some(AppAction::ExportCsv),
        (KeyCode::Char('r'), _) => Some(AppAction::ReloadData),
        (KeyCode::Char('d'), _) => Some(AppAction::EditDateRange),
        (KeyCode::Char('x'), _) => Some(AppAction::ClearDateRange),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
