/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::KeyCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::solver;
use sim::event::GameEvent;
use sim::session::{Phase, Session};
use sim::step::{self, Command};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Names the log file. Unset means no logging: the terminal is in raw mode.
const LOG_ENV: &str = "HANOI_LOG";

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = GameConfig::load();
    let mut session = Session::new(&config).context("cannot start a puzzle")?;
    info!(disks = config.disks, style = config.display.style.name(), "starting");

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;

    let sound = if config.sound.enabled { SoundEngine::new() } else { None };

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);
    let cleanup = renderer.cleanup();
    result?;
    cleanup.context("terminal cleanup failed")?;

    println!();
    println!("Thanks for playing Tower of Hanoi!");
    if session.game.is_solved() {
        println!(
            "Last puzzle: {} disks in {} moves (best possible {}).",
            session.game.num_disks(),
            session.game.move_count(),
            solver::min_moves(session.game.num_disks())
        );
    }
    Ok(())
}

fn init_logging() -> anyhow::Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("cannot create log file {}", path.to_string_lossy()))?;
    install_subscriber(file)
}

fn install_subscriber(file: std::fs::File) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install the log subscriber: {e}"))
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> anyhow::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.display.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let mut events = Vec::new();
        let mut quit = false;

        // Map each key against the phase it lands in: one frame may hold
        // a pick and its drop.
        for key in kb.presses() {
            if let Some(action) = key_action(session.phase, session.show_help, key.code) {
                quit |= perform(session, action, &mut events);
            }
        }
        for action in pad_actions(session.phase, session.show_help, &gp) {
            quit |= perform(session, action, &mut events);
        }
        if quit {
            break;
        }

        // Help overlay pauses the clock, demo included.
        if last_tick.elapsed() >= tick_rate {
            if !session.show_help {
                events.extend(step::tick(session));
            }
            last_tick = Instant::now();
        }

        process_sound_events(sound, &events);

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    info!(moves = session.game.move_count(), "quit");
    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let Some(sfx) = sound else { return };
    for event in events {
        sfx.play_event(event);
    }
}

// ── Input mapping ──

/// What a key or button means on the current screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum UiAction {
    Quit,
    ToggleHelp,
    /// Esc / cancel: one screen back.
    Back,
    NewGame,
    Continue,
    OpenDifficulty,
    Cursor(i8),
    ChooseCursor,
    Step(Command),
}

fn key_action(phase: Phase, help: bool, code: KeyCode) -> Option<UiAction> {
    let code = match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };

    if help {
        return match code {
            KeyCode::F(1) | KeyCode::Esc => Some(UiAction::ToggleHelp),
            _ => None,
        };
    }
    if code == KeyCode::F(1) {
        return Some(UiAction::ToggleHelp);
    }

    let action = match (phase, code) {
        (Phase::Title, KeyCode::Enter | KeyCode::Char(' ')) => UiAction::NewGame,
        (Phase::Title, KeyCode::Char('c')) => UiAction::Continue,
        (Phase::Title, KeyCode::Char('q') | KeyCode::Esc) => UiAction::Quit,

        (Phase::DifficultySelect, KeyCode::Up) => UiAction::Cursor(-1),
        (Phase::DifficultySelect, KeyCode::Down) => UiAction::Cursor(1),
        (Phase::DifficultySelect, KeyCode::Enter | KeyCode::Char(' ')) => UiAction::ChooseCursor,
        (Phase::DifficultySelect, KeyCode::Char(c @ '3'..='7')) => {
            UiAction::Step(Command::SetDifficulty(c as u8 - b'0'))
        }

        (Phase::Playing, KeyCode::Char('1' | 'j') | KeyCode::Left) => UiAction::Step(Command::Peg(0)),
        (Phase::Playing, KeyCode::Char('2' | 'k') | KeyCode::Down) => UiAction::Step(Command::Peg(1)),
        (Phase::Playing, KeyCode::Char('3' | 'l') | KeyCode::Right) => UiAction::Step(Command::Peg(2)),
        (Phase::Playing, KeyCode::Char('?')) => UiAction::Step(Command::Hint),
        (Phase::Playing, KeyCode::Char('p')) => UiAction::Step(Command::ToggleDemo),
        (Phase::Solved, KeyCode::Enter | KeyCode::Char(' ')) => UiAction::Step(Command::Restart),

        (Phase::Playing | Phase::Solved, KeyCode::Char('r') | KeyCode::F(2)) => {
            UiAction::Step(Command::Restart)
        }
        (Phase::Title | Phase::Playing | Phase::Solved, KeyCode::Char('d')) => UiAction::OpenDifficulty,
        (Phase::Title | Phase::Playing | Phase::Solved, KeyCode::Char('t')) => {
            UiAction::Step(Command::CycleStyle)
        }
        (_, KeyCode::Esc) => UiAction::Back,
        _ => return None,
    };
    Some(action)
}

fn pad_actions(phase: Phase, help: bool, gp: &GamepadState) -> Vec<UiAction> {
    let mut actions = Vec::new();
    if help {
        if gp.cancel_pressed() {
            actions.push(UiAction::ToggleHelp);
        }
        return actions;
    }
    match phase {
        Phase::Title => {
            if gp.confirm_pressed() {
                actions.push(UiAction::NewGame);
            }
            if gp.cancel_pressed() {
                actions.push(UiAction::Quit);
            }
        }
        Phase::DifficultySelect => {
            if gp.up_pressed() {
                actions.push(UiAction::Cursor(-1));
            }
            if gp.down_pressed() {
                actions.push(UiAction::Cursor(1));
            }
            if gp.confirm_pressed() {
                actions.push(UiAction::ChooseCursor);
            }
            if gp.cancel_pressed() {
                actions.push(UiAction::Back);
            }
        }
        Phase::Playing | Phase::Solved => {
            if let Some(peg) = gp.peg_pressed() {
                actions.push(UiAction::Step(Command::Peg(peg)));
            }
            if gp.confirm_pressed() {
                actions.push(UiAction::Step(Command::Restart));
            }
            if gp.cancel_pressed() {
                actions.push(UiAction::Back);
            }
        }
    }
    actions
}

/// Apply one action. Returns true when the player asked to quit.
fn perform(session: &mut Session, action: UiAction, events: &mut Vec<GameEvent>) -> bool {
    match action {
        UiAction::Quit => return true,
        UiAction::ToggleHelp => session.toggle_help(),
        UiAction::Back => match session.phase {
            Phase::DifficultySelect => session.cancel_difficulty_select(),
            Phase::Playing | Phase::Solved => session.return_to_title(),
            Phase::Title => {}
        },
        UiAction::NewGame => {
            let n = session.game.num_disks();
            events.extend(step::apply(session, Command::SetDifficulty(n)));
        }
        UiAction::Continue => {
            if session.can_resume() {
                session.phase = Phase::Playing;
            } else {
                session.set_message("No game to continue", 40);
            }
        }
        UiAction::OpenDifficulty => session.open_difficulty_select(),
        UiAction::Cursor(delta) => session.move_select_cursor(delta),
        UiAction::ChooseCursor => {
            let n = session.select_cursor;
            events.extend(step::apply(session, Command::SetDifficulty(n)));
        }
        UiAction::Step(command) => events.extend(step::apply(session, command)),
    }
    false
}
