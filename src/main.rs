/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::KeyCode;
use tracing::{info, warn};

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::LevelDef;
use sim::menu::{self, Action, MenuOutcome};
use sim::step;
use sim::world::{Phase, Session};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::{self, Renderer};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

fn main() -> anyhow::Result<()> {
    let (config, config_err) = GameConfig::load();

    if let Err(e) = logging::setup_logging(&config.log) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    if let Some(e) = config_err {
        warn!(error = %e, "config.toml ignored, using default settings");
    }

    // A broken map must fail before the terminal is taken over.
    let level = LevelDef::reference();
    let level_name = level.name;
    let mut session = Session::new(level, config.audio.music)
        .with_context(|| format!("level {level_name:?} is malformed"))?;
    info!(
        level = level_name,
        cols = session.map.cols(),
        rows = session.map.rows(),
        width_px = session.map.pixel_width(),
        height_px = session.map.pixel_height(),
        tick_ms = config.timing.tick_rate_ms,
        "session ready"
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e).context("terminal init failed");
    }

    let mut sound = SoundEngine::new(config.audio.volume);

    let result = game_loop(&mut session, &mut renderer, sound.as_mut(), &config);

    if let Err(e) = renderer.cleanup() {
        warn!(error = %e, "terminal cleanup failed");
        eprintln!("Terminal cleanup failed: {e}");
    }

    result?;
    info!(coins = session.coins_collected(), "exit");

    println!();
    println!("Thanks for playing Capture the Coins!");
    Ok(())
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    mut sound: Option<&mut SoundEngine>,
    config: &GameConfig,
) -> anyhow::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    info!(gamepad = gp.connected, "input ready");

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            info!("ctrl+c");
            break;
        }

        let outcome = handle_meta(session, &kb, &gp);
        process_events(sound.as_deref_mut(), &outcome.events, session.music_on);
        if outcome.exit {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            if session.phase == Phase::Playing {
                let input = gp.merge_into(kb.frame_input());
                let events = step::step(session, input);
                process_events(sound.as_deref_mut(), &events, session.music_on);
            }
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_events(sound: Option<&mut SoundEngine>, events: &[GameEvent], music_on: bool) {
    let Some(sfx) = sound else {
        return;
    };
    for &event in events {
        sfx.on_event(event, music_on);
    }
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_MUSIC: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_REPLAY: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char('r'), KeyCode::Char('R')];

/// Keyboard and gamepad shortcuts for the on-screen buttons.
fn shortcut(phase: Phase, kb: &InputState, gp: &GamepadState) -> Option<Action> {
    match phase {
        Phase::Menu => {
            if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
                Some(Action::Start)
            } else if kb.any_pressed(KEYS_MUSIC) {
                Some(Action::ToggleMusic)
            } else if kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
                Some(Action::Exit)
            } else {
                None
            }
        }
        phase if phase.is_over() => {
            (kb.any_pressed(KEYS_REPLAY) || gp.confirm_pressed()).then_some(Action::Replay)
        }
        _ => None,
    }
}

/// Clicks first (in arrival order), then shortcuts. Stops at the first
/// action that does something, so one frame never starts two sessions.
fn handle_meta(session: &mut Session, kb: &InputState, gp: &GamepadState) -> MenuOutcome {
    for &(col, row) in &kb.clicks {
        let Some((x, y)) = renderer::cell_to_canvas(col, row) else {
            continue;
        };
        let outcome = menu::on_mouse_down(session, x, y);
        if outcome != MenuOutcome::default() {
            return outcome;
        }
    }

    match shortcut(session.phase, kb, gp) {
        Some(action) => menu::activate(session, action),
        None => MenuOutcome::default(),
    }
}
