//! Console-mode keyboard, translated to remote button names ⌨️

use crate::app::events::{shutdown_requested, Senders};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Token(String),
    Quit,
}

pub fn key_token(key: &KeyEvent) -> Option<KeyInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyInput::Quit),
            _ => None,
        };
    }

    let name = match key.code {
        KeyCode::Char('q') => return Some(KeyInput::Quit),
        KeyCode::Up => "KEY_UP",
        KeyCode::Down => "KEY_DOWN",
        KeyCode::PageUp => "KEY_PAGEUP",
        KeyCode::PageDown => "KEY_PAGEDOWN",
        KeyCode::Enter => "KEY_OK",
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => "KEY_BACK",
        KeyCode::Right => "KEY_OK",
        KeyCode::Char('m') => "KEY_MENU",
        KeyCode::Char('l') => "KEY_SCREEN",
        KeyCode::Char('p') => "KEY_PLAY",
        KeyCode::Char('s') => "KEY_STOP",
        KeyCode::Char(' ') => "KEY_PAUSE",
        KeyCode::Char('n') => "KEY_NEXT",
        KeyCode::Char('b') => "KEY_PREVIOUS",
        KeyCode::Char('+') | KeyCode::Char('=') => "KEY_VOLUMEUP",
        KeyCode::Char('-') => "KEY_VOLUMEDOWN",
        KeyCode::Char('0') => "KEY_MUTE",
        KeyCode::Char(c) => return Some(KeyInput::Token(c.to_string())),
        _ => return None,
    };
    Some(KeyInput::Token(name.to_string()))
}

pub async fn run(senders: Senders) {
    let mut shutdown = senders.shutdown_signal();
    let mut reader = EventStream::new();

    loop {
        let event = tokio::select! {
            _ = shutdown_requested(&mut shutdown) => break,
            event = reader.next() => event,
        };
        let key = match event {
            Some(Ok(Event::Key(key))) => key,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                tracing::warn!("keyboard: {e}");
                break;
            }
            None => break,
        };
        match key_token(&key) {
            Some(KeyInput::Quit) => {
                tracing::info!("keyboard: quit requested");
                senders.shutdown();
                break;
            }
            Some(KeyInput::Token(token)) => {
                if senders.keyboard.send(token).await.is_err() {
                    break;
                }
            }
            None => {}
        }
    }
    tracing::info!("keyboard: closing");
}
