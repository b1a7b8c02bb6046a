use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // UI Events
    Quit,
    Resize(u16, u16),
    ShowHelp,
    ShowHome,

    // Navigation Events
    CursorUp,
    CursorDown,
    SwapUp,
    SwapDown,

    // Playback Events
    Play,
    TogglePause,
    NextSong,
    PreviousSong,
    SeekBackward,
    SeekForward,

    // Prompt Events
    OpenSearch,
    OpenFilter,
    Input(char),
    InputBackspace,
    InputSubmit,
    InputCancel,
}

/// Turns terminal input into `AppEvent`s, one poll per loop iteration.
pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
    poll_timeout: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
            poll_timeout: Duration::from_millis(50),
        }
    }

    pub fn try_next(&mut self) -> Option<AppEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Poll the terminal once and queue whatever it produced.
    ///
    /// `prompt_active` routes printable keys to the input prompt instead of
    /// the player bindings.
    pub fn pump(&self, prompt_active: bool) -> Result<()> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let app_event = if prompt_active {
                        key_to_prompt_event(key)
                    } else {
                        key_to_app_event(key)
                    };
                    if let Some(app_event) = app_event {
                        let _ = self.event_sender.send(app_event);
                    }
                }
                Event::Resize(width, height) => {
                    let _ = self.event_sender.send(AppEvent::Resize(width, height));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(AppEvent::Quit);
    }

    match key.code {
        KeyCode::Char('q') => Some(AppEvent::Quit),
        KeyCode::Char('i') => Some(AppEvent::ShowHelp),
        KeyCode::Char('h') => Some(AppEvent::ShowHome),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::CursorDown),
        KeyCode::Char('K') => Some(AppEvent::SwapUp),
        KeyCode::Char('J') => Some(AppEvent::SwapDown),

        // Playback controls
        KeyCode::Enter => Some(AppEvent::Play),
        KeyCode::Char(' ') => Some(AppEvent::TogglePause),
        KeyCode::Char('n') => Some(AppEvent::NextSong),
        KeyCode::Char('b') => Some(AppEvent::PreviousSong),
        KeyCode::Left => Some(AppEvent::SeekBackward),
        KeyCode::Right => Some(AppEvent::SeekForward),

        // Prompts
        KeyCode::Char('/') => Some(AppEvent::OpenSearch),
        KeyCode::Char('f') => Some(AppEvent::OpenFilter),

        _ => None,
    }
}

pub fn key_to_prompt_event(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        KeyCode::Esc => Some(AppEvent::InputCancel),
        KeyCode::Enter => Some(AppEvent::InputSubmit),
        KeyCode::Backspace => Some(AppEvent::InputBackspace),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(AppEvent::InputCancel)
        }
        KeyCode::Char(c) => Some(AppEvent::Input(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn player_bindings() {
        assert_eq!(key_to_app_event(key(KeyCode::Up)), Some(AppEvent::CursorUp));
        assert_eq!(key_to_app_event(key(KeyCode::Enter)), Some(AppEvent::Play));
        assert_eq!(key_to_app_event(key(KeyCode::Left)), Some(AppEvent::SeekBackward));
        assert_eq!(key_to_app_event(key(KeyCode::Char('J'))), Some(AppEvent::SwapDown));
        assert_eq!(key_to_app_event(key(KeyCode::Char('/'))), Some(AppEvent::OpenSearch));
        assert_eq!(key_to_app_event(key(KeyCode::F(2))), None);
        assert_eq!(
            key_to_app_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppEvent::Quit)
        );
    }

    #[test]
    fn prompt_takes_printable_keys() {
        assert_eq!(key_to_prompt_event(key(KeyCode::Char('q'))), Some(AppEvent::Input('q')));
        assert_eq!(key_to_prompt_event(key(KeyCode::Esc)), Some(AppEvent::InputCancel));
        assert_eq!(key_to_prompt_event(key(KeyCode::Enter)), Some(AppEvent::InputSubmit));
        assert_eq!(key_to_prompt_event(key(KeyCode::Up)), None);
    }

    #[test]
    fn queued_events_come_out_in_order() {
        let mut handler = EventHandler::new();
        handler.event_sender.send(AppEvent::CursorDown).unwrap();
        handler.event_sender.send(AppEvent::Play).unwrap();

        assert_eq!(handler.try_next(), Some(AppEvent::CursorDown));
        assert_eq!(handler.try_next(), Some(AppEvent::Play));
        assert_eq!(handler.try_next(), None);
    }
}
