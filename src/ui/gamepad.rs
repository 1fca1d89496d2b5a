/// Gamepad input tracker using gilrs.
///
/// Fixed mapping:
///   D-pad / Left Stick    →  Move left / right
///   A (South)             →  Jump
///   Start                 →  Confirm (start / play again)
///   Select                →  Exit from the menu

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::{info, warn};

use crate::domain::entity::FrameInput;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    jump: BtnState,
    start: BtnState,
    select: BtnState,

    dpad_left: BtnState,
    dpad_right: BtnState,

    stick_x: f32,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                if has_pad {
                    info!("gamepad detected");
                }
                (Some(g), has_pad)
            }
            Err(e) => {
                warn!(error = %e, "gamepad support unavailable");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            jump: BtnState::default(),
            start: BtnState::default(),
            select: BtnState::default(),
            dpad_left: BtnState::default(),
            dpad_right: BtnState::default(),
            stick_x: 0.0,
            connected,
        }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => {
                    self.connected = true;
                    self.stick_x = value;
                }
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, btn: Button, held: bool) {
        match btn {
            Button::South => self.jump.set(held),
            Button::Start => self.start.set(held),
            Button::Select => self.select.set(held),
            Button::DPadLeft => self.dpad_left.set(held),
            Button::DPadRight => self.dpad_right.set(held),
            _ => {}
        }
    }

    // ── Queries ──

    pub fn left_held(&self) -> bool {
        self.dpad_left.held || self.stick_x < -STICK_DEADZONE
    }
    pub fn right_held(&self) -> bool {
        self.dpad_right.held || self.stick_x > STICK_DEADZONE
    }
    pub fn jump_held(&self) -> bool {
        self.jump.held
    }
    pub fn confirm_pressed(&self) -> bool {
        self.start.just_pressed
    }
    pub fn cancel_pressed(&self) -> bool {
        self.select.just_pressed
    }

    /// Merge the pad's held state into keyboard input.
    pub fn merge_into(&self, input: FrameInput) -> FrameInput {
        FrameInput {
            left: input.left || self.left_held(),
            right: input.right || self.right_held(),
            jump: input.jump || self.jump_held(),
        }
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in [&mut self.jump, &mut self.start, &mut self.select, &mut self.dpad_left, &mut self.dpad_right] {
            b.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in [&mut self.jump, &mut self.start, &mut self.select, &mut self.dpad_left, &mut self.dpad_right] {
            *b = BtnState::default();
        }
        self.stick_x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_lasts_one_update() {
        let mut b = BtnState::default();
        b.set(true);
        assert!(b.held && b.just_pressed);
        b.just_pressed = false;
        b.set(true);
        assert!(!b.just_pressed);
        b.set(false);
        assert!(!b.held);
    }

    #[test]
    fn stick_deadzone() {
        let mut pad = GamepadState::new();
        pad.stick_x = -0.2;
        assert!(!pad.left_held());
        pad.stick_x = -0.6;
        assert!(pad.left_held());
        assert!(!pad.right_held());
    }

    #[test]
    fn merge_is_a_union() {
        let mut pad = GamepadState::new();
        pad.jump.set(true);
        let merged = pad.merge_into(FrameInput { right: true, ..Default::default() });
        assert_eq!(merged, FrameInput { left: false, right: true, jump: true });

        pad.release_all();
        pad.clear_just_pressed();
        assert_eq!(pad.merge_into(FrameInput::default()), FrameInput::default());
        assert!(!pad.confirm_pressed());
    }
}
