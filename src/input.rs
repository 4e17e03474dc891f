use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    EditSeed,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    Back,
    HelpToggle,
    SelectPrev,
    SelectNext,
    Select(usize),
    Generate,
    RandomizeSeed,
    Clear,
    SeedEditOpen,
    SeedChar(char),
    SeedBackspace,
    SeedCommit,
    SeedCancel,
}

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

/// Blocks for at most `timeout` waiting for the first event, then drains
/// whatever else is queued.
pub(crate) fn collect_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();
    let mut wait = timeout;
    while event::poll(wait)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
        wait = Duration::ZERO;
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(scene: Scene, ev: &InputEvent) -> Option<Action> {
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Action::Quit);
    }

    match scene {
        Scene::EditSeed => match ev.key {
            KeyCode::Enter => Some(Action::SeedCommit),
            KeyCode::Esc => Some(Action::SeedCancel),
            KeyCode::Backspace => Some(Action::SeedBackspace),
            KeyCode::Char(ch) if ch.is_ascii_graphic() => Some(Action::SeedChar(ch)),
            _ => None,
        },
        Scene::Help => match ev.key {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::Back),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            _ => None,
        },
        Scene::Main => match ev.key {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::HelpToggle),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Char(ch @ '1'..='9') => Some(Action::Select(ch as usize - '1' as usize)),
            KeyCode::Enter | KeyCode::Char('g') | KeyCode::Char('G') => Some(Action::Generate),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::RandomizeSeed),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Clear),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::SeedEditOpen),
            KeyCode::Esc => Some(Action::Back),
            _ => None,
        },
    }
}
