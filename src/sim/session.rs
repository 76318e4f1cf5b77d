/// Session: everything the terminal shell tracks around one game.
///
/// The `HanoiGame` inside is the only owner of puzzle state. The session
/// adds the screen phase, status message, hint, and demo bookkeeping that
/// the renderer needs but the rules do not care about.

use crate::config::{DiskStyle, GameConfig};
use crate::domain::error::HanoiError;
use crate::domain::game::{HanoiGame, MAX_DISKS, MIN_DISKS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    DifficultySelect,
    Playing,
    Solved,
}

/// Self-playing solver state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Demo {
    /// Peg the demo is stacking onto.
    pub goal: usize,
    /// Ticks until the next press.
    pub countdown: u32,
}

pub struct Session {
    pub game: HanoiGame,
    pub phase: Phase,
    pub style: DiskStyle,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub show_help: bool,
    pub anim_tick: u32,

    // ── Difficulty select ──
    pub select_cursor: u8,
    /// Where Esc leaves the difficulty list for.
    pub select_return: Phase,

    // ── Assistance ──
    pub hint: Option<(usize, usize)>,
    pub demo: Option<Demo>,
    pub demo_interval: u32,
    /// Set once the demo has made a move; the solve is then not the player's.
    pub assisted: bool,
}

impl Session {
    pub fn new(config: &GameConfig) -> Result<Self, HanoiError> {
        let game = HanoiGame::new(config.disks)?;
        Ok(Session {
            select_cursor: game.num_disks(),
            game,
            phase: Phase::Title,
            style: config.display.style,
            message: String::new(),
            message_timer: 0,
            show_help: false,
            anim_tick: 0,
            select_return: Phase::Title,
            hint: None,
            demo: None,
            demo_interval: config.display.demo_interval_ticks,
            assisted: false,
        })
    }

    /// Show `msg` for `duration` ticks; 0 keeps it until replaced.
    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
        self.message_timer = 0;
    }

    pub fn open_difficulty_select(&mut self) {
        self.select_return = match self.phase {
            Phase::DifficultySelect => self.select_return,
            other => other,
        };
        self.select_cursor = self.game.num_disks();
        self.demo = None;
        self.phase = Phase::DifficultySelect;
    }

    pub fn move_select_cursor(&mut self, delta: i8) {
        let next = self.select_cursor as i16 + delta as i16;
        self.select_cursor = next.clamp(MIN_DISKS as i16, MAX_DISKS as i16) as u8;
    }

    pub fn cancel_difficulty_select(&mut self) {
        self.phase = self.select_return;
    }

    /// Back to the title screen. The current puzzle is kept for "continue".
    pub fn return_to_title(&mut self) {
        self.demo = None;
        self.hint = None;
        self.show_help = false;
        self.clear_message();
        self.phase = Phase::Title;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// True when there is an unfinished puzzle worth resuming from the title.
    pub fn can_resume(&self) -> bool {
        !self.game.is_solved() && (self.game.move_count() > 0 || !self.game.hand().is_empty())
    }
}
