use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dashboard_core::{
    cycle_filter, AppViewModel, CreateFormView, FormField, JobId, JobStatus, Msg, Priority,
    RunAction,
};

/// Order of the priority filter options, highest first.
const PRIORITY_FILTER_ORDER: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Dispatch(Msg),
    /// Move the table cursor by this many rows.
    MoveSelection(isize),
    Ignore,
}

/// Maps a key press to what it means in the current screen. Dialogs take
/// every key before the list does.
pub fn translate(key: KeyEvent, view: &AppViewModel, selected: Option<JobId>) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Dispatch(Msg::QuitRequested);
    }
    if let Some(form) = &view.create_form {
        return translate_form(key, form);
    }
    if view.detail.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => KeyAction::Dispatch(Msg::DetailClosed),
            KeyCode::Char('q') => KeyAction::Dispatch(Msg::QuitRequested),
            _ => KeyAction::Ignore,
        };
    }
    translate_list(key, view, selected)
}

fn translate_list(key: KeyEvent, view: &AppViewModel, selected: Option<JobId>) -> KeyAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => KeyAction::MoveSelection(-1),
        KeyCode::Down | KeyCode::Char('j') => KeyAction::MoveSelection(1),
        KeyCode::Enter => match selected {
            Some(job_id) => KeyAction::Dispatch(Msg::DetailOpened { job_id }),
            None => KeyAction::Ignore,
        },
        KeyCode::Char('r') => {
            let runnable = view.jobs.iter().find(|row| {
                Some(row.job_id) == selected && row.run_action == RunAction::Available
            });
            match runnable {
                Some(row) => KeyAction::Dispatch(Msg::RunClicked { job_id: row.job_id }),
                None => KeyAction::Ignore,
            }
        }
        KeyCode::Char('n') => KeyAction::Dispatch(Msg::CreateOpened),
        KeyCode::Char('s') => KeyAction::Dispatch(Msg::StatusFilterChanged(cycle_filter(
            view.status_filter,
            &JobStatus::ALL,
        ))),
        KeyCode::Char('p') => KeyAction::Dispatch(Msg::PriorityFilterChanged(cycle_filter(
            view.priority_filter,
            &PRIORITY_FILTER_ORDER,
        ))),
        KeyCode::Char('R') | KeyCode::F(5) => KeyAction::Dispatch(Msg::RefreshClicked),
        KeyCode::Char('q') => KeyAction::Dispatch(Msg::QuitRequested),
        KeyCode::Esc if view.banner.is_some() => KeyAction::Dispatch(Msg::BannerDismissed),
        _ => KeyAction::Ignore,
    }
}

fn translate_form(key: KeyEvent, form: &CreateFormView) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyAction::Dispatch(Msg::CreateCancelled),
        KeyCode::Tab => KeyAction::Dispatch(Msg::FormFocusNext),
        KeyCode::BackTab => KeyAction::Dispatch(Msg::FormFocusPrevious),
        KeyCode::Char('s') if ctrl => KeyAction::Dispatch(Msg::CreateSubmitted),
        _ if form.submitting => KeyAction::Ignore,
        KeyCode::Enter if form.focus != FormField::Payload => {
            KeyAction::Dispatch(Msg::CreateSubmitted)
        }
        _ => match form.focus {
            FormField::TaskName => edit_text(key, &form.task_name, false)
                .map_or(KeyAction::Ignore, |text| {
                    KeyAction::Dispatch(Msg::TaskNameChanged(text))
                }),
            FormField::Payload => edit_text(key, &form.payload, true)
                .map_or(KeyAction::Ignore, |text| {
                    KeyAction::Dispatch(Msg::PayloadChanged(text))
                }),
            FormField::Priority => match key.code {
                KeyCode::Left => {
                    KeyAction::Dispatch(Msg::PriorityChanged(form.priority.previous()))
                }
                KeyCode::Right | KeyCode::Char(' ') => {
                    KeyAction::Dispatch(Msg::PriorityChanged(form.priority.next()))
                }
                _ => KeyAction::Ignore,
            },
        },
    }
}

/// Applies a single editing key to `text`. `None` when the key does not edit.
fn edit_text(key: KeyEvent, text: &str, multiline: bool) -> Option<String> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => {
            let mut edited = text.to_string();
            edited.push(c);
            Some(edited)
        }
        KeyCode::Backspace => {
            let mut edited = text.to_string();
            edited.pop()?;
            Some(edited)
        }
        KeyCode::Enter if multiline => {
            let mut edited = text.to_string();
            edited.push('\n');
            Some(edited)
        }
        _ => None,
    }
}
