/// Input state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous movement while a key is held
///   - Edge-triggered menu keys (only fire on initial press)
///   - Moving and jumping in the same tick
///
/// Also records left mouse button presses as terminal cells; the renderer
/// maps them back to canvas pixels.
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::domain::entity::FrameInput;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub const LEFT_KEYS: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const RIGHT_KEYS: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const JUMP_KEYS: &[KeyCode] = &[
    KeyCode::Char(' '),
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Left-button presses this frame, as (column, row) terminal cells.
    pub clicks: Vec<(u16, u16)>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            clicks: Vec::with_capacity(2),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.apply(ev, Instant::now()),
                Err(_) => break,
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Feed one terminal event observed at `now`.
    pub fn apply(&mut self, ev: Event, now: Instant) {
        match ev {
            Event::Key(key) => {
                self.raw_events.push(key);

                match key.kind {
                    KeyEventKind::Release if self.honor_release => {
                        self.last_active.remove(&key.code);
                    }
                    KeyEventKind::Release => {
                        // enhancement not confirmed; rely on timeout expiry
                    }
                    _ => {
                        let was_held = self.is_held_at(key.code, now);
                        self.last_active.insert(key.code, now);
                        if !was_held {
                            self.fresh_presses.push(key.code);
                        }
                    }
                }
            }
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    self.clicks.push((mouse.column, mouse.row));
                }
            }
            _ => {}
        }
    }

    /// Is this key currently held down?
    /// Used for continuous actions (movement).
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Held-state snapshot for the simulation.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.any_held(LEFT_KEYS),
            right: self.any_held(RIGHT_KEYS),
            jump: self.any_held(JUMP_KEYS),
        }
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.saturating_duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn press_is_held_and_fresh_once() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.apply(key(KeyCode::Left, KeyEventKind::Press), t);
        assert!(input.is_held_at(KeyCode::Left, t));
        assert!(input.was_pressed(KeyCode::Left));

        // auto-repeat is not a new press
        input.fresh_presses.clear();
        input.apply(key(KeyCode::Left, KeyEventKind::Repeat), t + Duration::from_millis(30));
        assert!(!input.was_pressed(KeyCode::Left));
    }

    #[test]
    fn held_key_expires_after_timeout() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.apply(key(KeyCode::Char(' '), KeyEventKind::Press), t);
        assert!(input.is_held_at(KeyCode::Char(' '), t + Duration::from_millis(100)));
        assert!(!input.is_held_at(KeyCode::Char(' '), t + HOLD_TIMEOUT));
    }

    #[test]
    fn release_honored_only_with_enhancement() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.apply(key(KeyCode::Right, KeyEventKind::Press), t);
        input.apply(key(KeyCode::Right, KeyEventKind::Release), t);
        assert!(input.is_held_at(KeyCode::Right, t));

        input.honor_release = true;
        input.apply(key(KeyCode::Right, KeyEventKind::Release), t);
        assert!(!input.is_held_at(KeyCode::Right, t));
    }

    #[test]
    fn only_left_button_presses_are_clicks() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.apply(mouse(MouseEventKind::Down(MouseButton::Left), 25, 8), t);
        input.apply(mouse(MouseEventKind::Up(MouseButton::Left), 25, 8), t);
        input.apply(mouse(MouseEventKind::Down(MouseButton::Right), 3, 3), t);
        input.apply(mouse(MouseEventKind::Moved, 4, 4), t);
        assert_eq!(input.clicks, vec![(25, 8)]);
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.apply(
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Instant::now(),
        );
        assert!(input.ctrl_c_pressed());
    }
}
