/// Screen layout for the menu and end screens, and what a click does.
///
/// All geometry is fixed canvas-pixel constants. The renderer draws these
/// exact rectangles and the click handler hit-tests against the same
/// values, so a click always lands on what is on screen.
///
///   Menu:        Start (300,250 200×50)   Music (300,320 200×50)
///                Exit  (300,390 200×50)
///   Victory/Defeat: panel (200,180 400×200), replay (250,280 300×60)

use crate::domain::physics::BoundingBox;
use super::event::GameEvent;
use super::world::{Phase, Session};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Start,
    ToggleMusic,
    Exit,
    Replay,
}

/// A clickable rectangle with its caption color (RGB).
#[derive(Clone, Copy, Debug)]
pub struct Button {
    pub action: Action,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub fill: (u8, u8, u8),
}

impl Button {
    pub fn rect(&self) -> BoundingBox {
        BoundingBox::from_top_left(self.left, self.top, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

pub const TITLE: &str = "Capture the Coins";
pub const TITLE_CENTER: (f32, f32) = (400.0, 150.0);

pub const MENU_BUTTONS: [Button; 3] = [
    Button { action: Action::Start, left: 300.0, top: 250.0, width: 200.0, height: 50.0, fill: (50, 50, 200) },
    Button { action: Action::ToggleMusic, left: 300.0, top: 320.0, width: 200.0, height: 50.0, fill: (50, 200, 50) },
    Button { action: Action::Exit, left: 300.0, top: 390.0, width: 200.0, height: 50.0, fill: (200, 50, 50) },
];

/// Dark panel behind the end-screen text.
pub const END_PANEL: (f32, f32, f32, f32) = (200.0, 180.0, 400.0, 200.0);
pub const END_TEXT_CENTER: (f32, f32) = (400.0, 240.0);
pub const REPLAY_TEXT_CENTER: (f32, f32) = (400.0, 310.0);

pub const REPLAY_BUTTON: Button =
    Button { action: Action::Replay, left: 250.0, top: 280.0, width: 300.0, height: 60.0, fill: (0, 0, 0) };

/// Caption for a button, given the current session.
pub fn label(action: Action, session: &Session) -> &'static str {
    match action {
        Action::Start => "START GAME",
        Action::ToggleMusic if session.music_on => "MUSIC: ON",
        Action::ToggleMusic => "MUSIC: OFF",
        Action::Exit => "EXIT",
        Action::Replay => "Play again",
    }
}

pub fn end_text(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Victory => Some("You win!"),
        Phase::Defeat => Some("Defeat"),
        _ => None,
    }
}

/// Buttons that are live in `phase`.
pub fn buttons(phase: Phase) -> &'static [Button] {
    match phase {
        Phase::Menu => &MENU_BUTTONS,
        Phase::Victory | Phase::Defeat => std::slice::from_ref(&REPLAY_BUTTON),
        Phase::Playing => &[],
    }
}

/// Which action (if any) a click at canvas point (x, y) triggers.
pub fn button_at(phase: Phase, x: f32, y: f32) -> Option<Action> {
    buttons(phase).iter().find(|b| b.rect().contains(x, y)).map(|b| b.action)
}

/// Result of activating a menu action.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MenuOutcome {
    pub events: Vec<GameEvent>,
    pub exit: bool,
}

/// Apply `action` to the session. Actions that are not live in the current
/// phase are ignored.
pub fn activate(session: &mut Session, action: Action) -> MenuOutcome {
    let live = buttons(session.phase).iter().any(|b| b.action == action);
    if !live {
        return MenuOutcome::default();
    }
    match action {
        Action::Start | Action::Replay => MenuOutcome { events: vec![session.restart()], exit: false },
        Action::ToggleMusic => MenuOutcome { events: vec![session.toggle_music()], exit: false },
        Action::Exit => MenuOutcome { events: vec![], exit: true },
    }
}

/// Click at canvas point (x, y).
pub fn on_mouse_down(session: &mut Session, x: f32, y: f32) -> MenuOutcome {
    match button_at(session.phase, x, y) {
        Some(action) => activate(session, action),
        None => MenuOutcome::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelDef;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(LevelDef::reference(), true).unwrap()
    }

    #[test]
    fn menu_hit_testing() {
        assert_eq!(button_at(Phase::Menu, 400.0, 275.0), Some(Action::Start));
        assert_eq!(button_at(Phase::Menu, 300.0, 320.0), Some(Action::ToggleMusic));
        assert_eq!(button_at(Phase::Menu, 499.0, 439.0), Some(Action::Exit));
        assert_eq!(button_at(Phase::Menu, 400.0, 310.0), None);
        assert_eq!(button_at(Phase::Menu, 100.0, 100.0), None);
    }

    #[test]
    fn no_buttons_while_playing() {
        assert_eq!(button_at(Phase::Playing, 400.0, 275.0), None);
        assert_eq!(button_at(Phase::Playing, 400.0, 300.0), None);
    }

    #[test]
    fn start_click_enters_playing() {
        let mut s = session();
        let out = on_mouse_down(&mut s, 400.0, 275.0);
        assert_eq!(out, MenuOutcome { events: vec![GameEvent::SessionStarted], exit: false });
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn music_click_toggles_and_relabels() {
        let mut s = session();
        assert_eq!(label(Action::ToggleMusic, &s), "MUSIC: ON");
        let out = on_mouse_down(&mut s, 400.0, 345.0);
        assert_eq!(out.events, vec![GameEvent::MusicToggled { on: false }]);
        assert_eq!(label(Action::ToggleMusic, &s), "MUSIC: OFF");
        assert_eq!(s.phase, Phase::Menu);
    }

    #[test]
    fn exit_click_requests_exit() {
        let mut s = session();
        assert!(on_mouse_down(&mut s, 400.0, 415.0).exit);
    }

    #[test]
    fn replay_only_on_end_screens() {
        let mut s = session();
        s.restart();
        s.phase = Phase::Defeat;
        s.hero.kill();
        // replay rectangle overlaps where Start was on the menu
        assert_eq!(button_at(Phase::Defeat, 400.0, 290.0), Some(Action::Replay));
        let out = on_mouse_down(&mut s, 400.0, 300.0);
        assert_eq!(out.events, vec![GameEvent::SessionStarted]);
        assert_eq!(s.phase, Phase::Playing);
        assert!(s.hero.alive);
    }

    #[test]
    fn actions_outside_their_screen_are_ignored() {
        let mut s = session();
        assert_eq!(activate(&mut s, Action::Replay), MenuOutcome::default());
        s.restart();
        assert_eq!(activate(&mut s, Action::Exit), MenuOutcome::default());
        assert_eq!(activate(&mut s, Action::ToggleMusic), MenuOutcome::default());
        assert!(s.music_on);
    }

    #[test]
    fn menu_never_reentered() {
        let mut s = session();
        on_mouse_down(&mut s, 400.0, 275.0);
        s.phase = Phase::Victory;
        on_mouse_down(&mut s, 400.0, 300.0);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(end_text(Phase::Victory), Some("You win!"));
        assert_eq!(end_text(Phase::Playing), None);
    }
}
