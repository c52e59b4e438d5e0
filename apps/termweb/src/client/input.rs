use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Key;

/// What a terminal event means to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Session(Key),
    Quit,
}

fn is_ctrl(key: &KeyEvent, letter: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&letter))
}

/// Decode a crossterm event. Key releases, unbound control chords, mouse
/// and focus events yield `None`.
pub fn translate(event: &Event) -> Option<InputAction> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Paste(text) => Some(InputAction::Session(Key::Paste(text.clone()))),
        _ => None,
    }
}

pub fn translate_key(key: &KeyEvent) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl(key, 'l') {
        return Some(InputAction::Session(Key::ClearScreen));
    }
    if is_ctrl(key, 'c') || is_ctrl(key, 'd') {
        return Some(InputAction::Quit);
    }
    // Windows reports AltGr as Ctrl+Alt; those chords still type a character.
    let alt_gr = key.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT)
        && matches!(key.code, KeyCode::Char(_));
    if !alt_gr
        && key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }

    let key = match key.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        _ => return None,
    };
    Some(InputAction::Session(key))
}
