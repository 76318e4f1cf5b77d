/// Keyboard input collector.
///
/// The puzzle is turn-based, so only edge presses matter: every Press
/// event drained this frame is one command. Release and Repeat events
/// (reported by terminals with keyboard enhancement) are ignored, so
/// holding a peg key does not pick and drop in a loop.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Keys pressed during the most recent `drain_events()`, in order.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame before handling input.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
    }

    /// Feed one key event. Split from `drain_events` so tests need no terminal.
    pub fn record(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Press {
            self.presses.push(key);
        }
    }

    pub fn presses(&self) -> &[KeyEvent] {
        &self.presses
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL) && same_key(k.code, KeyCode::Char('c'))
        })
    }
}

fn same_key(a: KeyCode, b: KeyCode) -> bool {
    match (a, b) {
        (KeyCode::Char(x), KeyCode::Char(y)) => x.eq_ignore_ascii_case(&y),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn only_presses_count() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('1'), KeyEventKind::Press));
        input.record(key(KeyCode::Char('2'), KeyEventKind::Repeat));
        input.record(key(KeyCode::Char('3'), KeyEventKind::Release));
        let codes: Vec<KeyCode> = input.presses().iter().map(|k| k.code).collect();
        assert_eq!(codes, vec![KeyCode::Char('1')]);
    }

    #[test]
    fn presses_keep_their_order() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('1'), KeyEventKind::Press));
        input.record(key(KeyCode::Char('3'), KeyEventKind::Press));
        let codes: Vec<KeyCode> = input.presses().iter().map(|k| k.code).collect();
        assert_eq!(codes, vec![KeyCode::Char('1'), KeyCode::Char('3')]);
    }

    #[test]
    fn ctrl_c_needs_the_modifier() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('c'), KeyEventKind::Press));
        assert!(!input.ctrl_c_pressed());
        input.record(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c_pressed());
    }
}
