/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board is always drawn from the game's current pegs and hand; the
/// renderer keeps no puzzle state of its own.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::DiskStyle;
use crate::domain::game::{Hand, HanoiGame, MAX_DISKS, MIN_DISKS};
use crate::domain::peg::{Disk, PEG_COUNT};
use crate::domain::solver;
use crate::sim::session::{Phase, Session};
use crate::sim::step::PEG_NAMES;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so the
    /// inter-row gap on VTE terminals matches the cell color.
    const BASE_BG: Color = Color::Rgb { r: 0, g: 43, b: 54 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    /// Normalize bg: Color::Reset → BASE_BG (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column; clipped at the edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::Black, bg));
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for row in y..y + h {
            for col in x..x + w {
                self.set(col, row, Cell::new(' ', Color::White, bg));
            }
        }
    }
}

// ── Palette ──

const TITLE_C: Color = Color::Rgb { r: 181, g: 137, b: 0 };
const HI: Color = Color::Rgb { r: 133, g: 153, b: 0 };
const DIM: Color = Color::Rgb { r: 88, g: 110, b: 117 };
const TEXT: Color = Color::Rgb { r: 238, g: 232, b: 213 };
const KEY_C: Color = Color::Rgb { r: 38, g: 139, b: 210 };
const WARN_C: Color = Color::Rgb { r: 203, g: 75, b: 22 };
const BAR_BG: Color = Color::Rgb { r: 7, g: 54, b: 66 };
const POLE_C: Color = Color::Rgb { r: 147, g: 161, b: 161 };
const OVERLAY_BG: Color = Color::Rgb { r: 0, g: 30, b: 38 };

/// One color per disk size, smallest first.
const DISK_COLORS: [Color; MAX_DISKS as usize] = [
    Color::Rgb { r: 220, g: 50, b: 47 },   // red
    Color::Rgb { r: 203, g: 75, b: 22 },   // orange
    Color::Rgb { r: 181, g: 137, b: 0 },   // yellow
    Color::Rgb { r: 133, g: 153, b: 0 },   // green
    Color::Rgb { r: 42, g: 161, b: 152 },  // cyan
    Color::Rgb { r: 38, g: 139, b: 210 },  // blue
    Color::Rgb { r: 108, g: 113, b: 196 }, // violet
];

fn disk_color(disk: Disk) -> Color {
    DISK_COLORS[(disk.clamp(1, MAX_DISKS) - 1) as usize]
}

// ── Board geometry ──

/// Columns per peg: the widest disk plus a margin on each side.
const PEG_W: usize = 2 * MAX_DISKS as usize + 3;
const PEG_GAP: usize = 2;
const BOARD_X: usize = 2;

const HUD_ROW: usize = 0;
const HAND_ROW: usize = 2;
const PEG_TOP: usize = 4;

/// Terminal columns a disk occupies.
pub fn disk_width(disk: Disk) -> usize {
    2 * disk as usize + 1
}

/// Start and end (exclusive) column of a disk inside its peg column.
pub fn disk_span(disk: Disk) -> (usize, usize) {
    let left = (PEG_W - disk_width(disk)) / 2;
    (left, left + disk_width(disk))
}

fn peg_x(peg: usize) -> usize {
    BOARD_X + peg * (PEG_W + PEG_GAP)
}

fn board_width() -> usize {
    PEG_COUNT * PEG_W + (PEG_COUNT - 1) * PEG_GAP
}

/// Row of the peg base for an `n`-disk puzzle.
fn base_row(num_disks: u8) -> usize {
    PEG_TOP + num_disks as usize + 1
}

/// What pressing a peg would do right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Affordance {
    Pick,
    Drop,
    /// Drop onto the peg the disk came from; not counted as a move.
    PutBack,
    Blocked,
}

impl Affordance {
    fn label(self) -> &'static str {
        match self {
            Affordance::Pick => "pick",
            Affordance::Drop => "drop",
            Affordance::PutBack => "put back",
            Affordance::Blocked => "·",
        }
    }
}

pub fn affordance(game: &HanoiGame, peg: usize) -> Affordance {
    match game.hand() {
        Hand::Empty if game.can_pick(peg) => Affordance::Pick,
        Hand::Holding { origin, .. } if origin == peg => Affordance::PutBack,
        Hand::Holding { .. } if game.can_drop(peg) => Affordance::Drop,
        _ => Affordance::Blocked,
    }
}

/// Characters of one disk in a given style, `disk_width(disk)` long.
pub fn disk_glyphs(disk: Disk, style: DiskStyle) -> String {
    let w = disk_width(disk);
    let label = disk.to_string();
    match style {
        DiskStyle::Blocks => "█".repeat(w),
        DiskStyle::Disks => {
            let pad = (w - label.len()) / 2;
            format!("{}{}{}", " ".repeat(pad), label, " ".repeat(w - pad - label.len()))
        }
        DiskStyle::Glyphs => {
            let inner = w - 2;
            let pad = (inner - label.len()) / 2;
            format!(
                "◖{}{}{}◗",
                "━".repeat(pad),
                label,
                "━".repeat(inner - pad - label.len())
            )
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(session.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(session.phase);
        }

        self.compose(session);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors, not ResetColor: the terminal default may differ.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, s: &Session) {
        self.front.clear();
        match s.phase {
            Phase::Title => self.compose_title(s),
            Phase::DifficultySelect => self.compose_difficulty_select(s),
            Phase::Playing => self.compose_board(s),
            Phase::Solved => {
                self.compose_board(s);
                self.compose_solved_banner(s);
            }
        }
        if s.show_help {
            self.compose_help_overlay();
        }
    }

    fn compose_title(&mut self, s: &Session) {
        let title = [
            r"  _   _    _    _   _  ___ ___ ",
            r" | | | |  / \  | \ | |/ _ \_ _|",
            r" | |_| | / _ \ |  \| | | | | | ",
            r" |  _  |/ ___ \| |\  | |_| | | ",
            r" |_| |_/_/   \_\_| \_|\___/___|",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(4, 1 + i, line, TITLE_C, Color::Reset);
        }
        self.front.put_str(6, 7, "━━━ Tower of Hanoi, terminal edition ━━━", DIM, Color::Reset);

        // A small static tower as decoration.
        for disk in 1..=4u8 {
            let (l, _) = disk_span(disk);
            let glyphs = disk_glyphs(disk, s.style);
            self.put_disk(44 + l, 1 + disk as usize, disk, &glyphs, s.style);
        }

        let menu = 10;
        self.front.put_str(8, menu, "ENTER   New game", HI, Color::Reset);
        if s.can_resume() {
            self.front.put_str(8, menu + 1, "  C     Continue", TITLE_C, Color::Reset);
        } else {
            self.front.put_str(8, menu + 1, "  C     Continue  (no game)", DIM, Color::Reset);
        }
        self.front.put_str(8, menu + 2, "  D     Choose disks", TEXT, Color::Reset);
        self.front.put_str(8, menu + 3, "  T     Disk style", TEXT, Color::Reset);
        self.front.put_str(8, menu + 4, "  Q     Quit", TEXT, Color::Reset);

        let info = format!(
            "        {} disks · style: {} · best possible: {} moves",
            s.game.num_disks(),
            s.style.name(),
            solver::min_moves(s.game.num_disks())
        );
        self.front.put_str(8, menu + 6, &info, DIM, Color::Reset);

        let rules = [
            "How to play",
            "  Move the whole stack off the left peg.",
            "  Press a peg to pick up its top disk, press again to drop it.",
            "  A disk may only rest on a larger one.",
        ];
        for (i, line) in rules.iter().enumerate() {
            let color = if i == 0 { TITLE_C } else { TEXT };
            self.front.put_str(8, menu + 8 + i, line, color, Color::Reset);
        }

        self.compose_message_bar(s, self.front.height.saturating_sub(1));
    }

    fn compose_difficulty_select(&mut self, s: &Session) {
        self.front.put_str(4, 1, "═══ CHOOSE THE NUMBER OF DISKS ═══", TITLE_C, Color::Reset);

        for (i, n) in (MIN_DISKS..=MAX_DISKS).enumerate() {
            let row = 4 + i * 2;
            let selected = n == s.select_cursor;
            let marker = if selected { "▶" } else { " " };
            let line = format!("{marker} {n} disks   best possible {:>3} moves", solver::min_moves(n));
            let fg = if selected { HI } else { TEXT };
            self.front.put_str(6, row, &line, fg, Color::Reset);
            if n == s.game.num_disks() {
                self.front.put_str(48, row, "(current)", DIM, Color::Reset);
            }
        }

        // Preview tower of the highlighted size.
        let preview_y = 4 + (MAX_DISKS - MIN_DISKS) as usize * 2 + 3;
        for disk in 1..=s.select_cursor {
            let (l, _) = disk_span(disk);
            let glyphs = disk_glyphs(disk, s.style);
            self.put_disk(8 + l, preview_y + disk as usize, disk, &glyphs, s.style);
        }

        let footer = self.front.height.saturating_sub(1);
        self.front.put_str(2, footer, "  ENTER: Start   ↑↓: Browse   ESC: Back", DIM, Color::Reset);
    }

    fn compose_board(&mut self, s: &Session) {
        let game = &s.game;
        let n = game.num_disks();

        // ── HUD row ──
        self.front.fill_row(HUD_ROW, BAR_BG);
        let hand = match game.hand().disk() {
            Some(d) => format!("disk {d}"),
            None => "empty".to_string(),
        };
        let hud = format!(
            " HANOI  Disks: {}  Moves: {}  Optimum: {}  Hand: {} ",
            n,
            game.move_count(),
            solver::min_moves(n),
            hand
        );
        self.front.put_str(0, HUD_ROW, &hud, TEXT, BAR_BG);
        if s.demo.is_some() && (s.anim_tick / 8) % 2 == 0 {
            let x = self.front.width.saturating_sub(8);
            self.front.put_str(x, HUD_ROW, " DEMO ", Color::Black, TITLE_C);
        }

        // ── Held disk hovers over its origin ──
        if let Hand::Holding { disk, origin } = game.hand() {
            let (l, _) = disk_span(disk);
            let glyphs = disk_glyphs(disk, s.style);
            self.put_disk(peg_x(origin) + l, HAND_ROW, disk, &glyphs, s.style);
        }

        // ── Pegs ──
        let base = base_row(n);
        for (p, peg) in game.pegs().iter().enumerate() {
            let x0 = peg_x(p);
            let center = x0 + PEG_W / 2;
            for row in PEG_TOP..base {
                self.front.set(center, row, Cell::new('┃', POLE_C, Color::Reset));
            }
            for (level, &disk) in peg.disks().iter().enumerate() {
                let (l, _) = disk_span(disk);
                let glyphs = disk_glyphs(disk, s.style);
                self.put_disk(x0 + l, base - 1 - level, disk, &glyphs, s.style);
            }
        }
        let base_line = "▀".repeat(board_width());
        self.front.put_str(BOARD_X, base, &base_line, POLE_C, Color::Reset);

        // ── Labels and affordances ──
        for p in 0..PEG_COUNT {
            let x0 = peg_x(p);
            let label = format!("{} {}", p + 1, PEG_NAMES[p]);
            let (fg, bg) = match s.hint {
                Some((from, _)) if from == p => (Color::Black, TITLE_C),
                Some((_, to)) if to == p => (Color::Black, HI),
                _ => (TEXT, Color::Reset),
            };
            self.put_centered(x0, PEG_W, base + 1, &label, fg, bg);

            let action = if s.phase == Phase::Playing { affordance(game, p) } else { Affordance::Blocked };
            let fg = match action {
                Affordance::Blocked => DIM,
                Affordance::PutBack => TITLE_C,
                _ => KEY_C,
            };
            self.put_centered(x0, PEG_W, base + 2, action.label(), fg, Color::Reset);
        }

        // ── Message and help bar ──
        if s.phase == Phase::Playing {
            self.compose_message_bar(s, base + 4);
        }
        let help_row = self.front.height.saturating_sub(1);
        let help = " 1 2 3 Pegs  R Restart  D Disks  ? Hint  P Demo  T Style  F1 Help  ESC Title";
        self.front.put_str(0, help_row, help, DIM, Color::Reset);
    }

    fn compose_solved_banner(&mut self, s: &Session) {
        let game = &s.game;
        let optimum = solver::min_moves(game.num_disks());
        let moves = game.move_count();
        let top = base_row(game.num_disks()) + 4;
        let width = board_width();
        let bg = BAR_BG;

        self.front.fill_rect(BOARD_X, top, width, 5, bg);
        let star = if (s.anim_tick / 6) % 2 == 0 { "★" } else { "☆" };
        let headline = format!("{star} Congratulations, puzzle solved in {moves} moves {star}");
        self.put_centered(BOARD_X, width, top + 1, &headline, TITLE_C, bg);

        let verdict = if moves as u64 == optimum && !s.assisted {
            "A perfect solve!".to_string()
        } else if s.assisted {
            format!("Solved with the demo. The optimum is {optimum} moves.")
        } else {
            format!("The optimum is {optimum} moves.")
        };
        self.put_centered(BOARD_X, width, top + 2, &verdict, TEXT, bg);
        self.put_centered(BOARD_X, width, top + 3, "R: again   D: disks   ESC: title", DIM, bg);
    }

    fn compose_help_overlay(&mut self) {
        let lines = [
            ("", "HELP"),
            ("", ""),
            ("1 2 3", "pick up or drop on a peg"),
            ("← ↓ →", "same, by arrow"),
            ("J K L", "same, home row"),
            ("R / F2", "restart"),
            ("D", "choose the number of disks"),
            ("?", "hint the next best move"),
            ("P", "start or stop the demo"),
            ("T", "cycle the disk style"),
            ("F1", "close this help"),
            ("ESC", "back to the title"),
            ("Ctrl+C", "quit"),
        ];
        let box_w = 44_usize.min(self.front.width);
        let box_h = (lines.len() + 2).min(self.front.height);
        let box_x = self.front.width.saturating_sub(box_w) / 2;
        let box_y = self.front.height.saturating_sub(box_h) / 2;

        self.front.fill_rect(box_x, box_y, box_w, box_h, OVERLAY_BG);
        for (i, (key, desc)) in lines.iter().enumerate() {
            let y = box_y + 1 + i;
            if key.is_empty() {
                self.put_centered(box_x, box_w, y, desc, TITLE_C, OVERLAY_BG);
            } else {
                self.front.put_str(box_x + 3, y, key, KEY_C, OVERLAY_BG);
                self.front.put_str(box_x + 13, y, desc, TEXT, OVERLAY_BG);
            }
        }
    }

    fn compose_message_bar(&mut self, s: &Session, row: usize) {
        if s.message.is_empty() || row >= self.front.height {
            return;
        }
        let bg = if s.message_timer > 0 && s.hint.is_none() { WARN_C } else { BAR_BG };
        self.front.fill_row(row, bg);
        let msg = format!(" ◈ {} ", s.message);
        self.front.put_str(0, row, &msg, TEXT, bg);
    }

    // ── Helpers ──

    fn put_disk(&mut self, x: usize, y: usize, disk: Disk, glyphs: &str, style: DiskStyle) {
        let color = disk_color(disk);
        let (fg, bg) = match style {
            DiskStyle::Disks => (Color::Black, color),
            DiskStyle::Blocks => (color, Color::Reset),
            DiskStyle::Glyphs => (TEXT, Color::Reset),
        };
        self.front.put_str(x, y, glyphs, fg, bg);
    }

    fn put_centered(&mut self, x0: usize, width: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = x0 + width.saturating_sub(len) / 2;
        self.front.put_str(x, y, s, fg, bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::step::{apply, Command};

    fn renderer(w: usize, h: usize) -> Renderer {
        let mut r = Renderer::new();
        r.front.resize(w, h);
        r
    }

    fn row_text(r: &Renderer, y: usize) -> String {
        (0..r.front.width).map(|x| r.front.get(x, y).ch).collect()
    }

    fn screen_text(r: &Renderer) -> String {
        (0..r.front.height).map(|y| row_text(r, y)).collect::<Vec<_>>().join("\n")
    }

    fn playing(disks: u8) -> Session {
        let mut s = Session::new(&GameConfig::default()).unwrap();
        apply(&mut s, Command::SetDifficulty(disks));
        s
    }

    #[test]
    fn disk_geometry() {
        assert_eq!(disk_width(1), 3);
        assert_eq!(disk_width(MAX_DISKS), PEG_W - 2);
        // Every disk is centered on the pole.
        for d in 1..=MAX_DISKS {
            let (l, r) = disk_span(d);
            assert_eq!(l + r, PEG_W);
        }
    }

    #[test]
    fn glyphs_fill_the_disk_width() {
        for style in [DiskStyle::Disks, DiskStyle::Blocks, DiskStyle::Glyphs] {
            for d in 1..=MAX_DISKS {
                assert_eq!(disk_glyphs(d, style).chars().count(), disk_width(d));
            }
        }
        assert_eq!(disk_glyphs(2, DiskStyle::Glyphs), "◖━2━◗");
        assert_eq!(disk_glyphs(1, DiskStyle::Disks), " 1 ");
    }

    #[test]
    fn affordances_follow_the_hand() {
        let mut game = HanoiGame::new(3).unwrap();
        assert_eq!(affordance(&game, 0), Affordance::Pick);
        assert_eq!(affordance(&game, 1), Affordance::Blocked);
        game.pick(0).unwrap();
        assert_eq!(affordance(&game, 0), Affordance::PutBack);
        assert_eq!(affordance(&game, 2), Affordance::Drop);
        game.drop(2).unwrap();
        game.pick(0).unwrap();
        assert_eq!(affordance(&game, 2), Affordance::Blocked);
    }

    #[test]
    fn board_shows_hud_and_pegs() {
        let mut r = renderer(80, 24);
        let s = playing(3);
        r.compose(&s);
        let hud = row_text(&r, HUD_ROW);
        assert!(hud.contains("Disks: 3"));
        assert!(hud.contains("Moves: 0"));
        assert!(hud.contains("Optimum: 7"));
        assert!(hud.contains("Hand: empty"));

        let base = base_row(3);
        // Largest disk sits on the left peg's bottom level.
        assert_eq!(r.front.get(peg_x(0) + PEG_W / 2, base - 1).ch, '3');
        assert_eq!(r.front.get(peg_x(0) + PEG_W / 2, PEG_TOP + 1).ch, '1');
        assert_eq!(r.front.get(peg_x(1) + PEG_W / 2, base - 1).ch, '┃');
        let labels = row_text(&r, base + 1);
        assert!(labels.contains("1 left") && labels.contains("3 right"));
        assert!(row_text(&r, base + 2).contains("pick"));
    }

    #[test]
    fn held_disk_is_drawn_above_its_peg() {
        let mut r = renderer(80, 24);
        let mut s = playing(3);
        apply(&mut s, Command::Peg(0));
        r.compose(&s);
        let (l, _) = disk_span(1);
        assert_eq!(r.front.get(peg_x(0) + l + 1, HAND_ROW).ch, '1');
        assert!(row_text(&r, HUD_ROW).contains("Hand: disk 1"));
        assert!(row_text(&r, base_row(3) + 2).contains("put back"));
    }

    #[test]
    fn solved_banner_shows_the_message() {
        let mut r = renderer(80, 24);
        let mut s = playing(3);
        for (from, to) in solver::solution(3, 0, 2) {
            apply(&mut s, Command::Peg(from));
            apply(&mut s, Command::Peg(to));
        }
        r.compose(&s);
        let text = screen_text(&r);
        assert!(text.contains("Congratulations, puzzle solved in 7 moves"));
        assert!(text.contains("A perfect solve!"));
    }

    #[test]
    fn solved_banner_survives_a_cleared_message() {
        let mut r = renderer(80, 24);
        let mut s = playing(3);
        for (from, to) in solver::solution(3, 0, 2) {
            apply(&mut s, Command::Peg(from));
            apply(&mut s, Command::Peg(to));
        }
        s.clear_message();
        r.compose(&s);
        assert!(screen_text(&r).contains("Congratulations, puzzle solved in 7 moves"));
    }

    #[test]
    fn title_and_select_screens() {
        let mut r = renderer(80, 30);
        let mut s = Session::new(&GameConfig::default()).unwrap();
        r.compose(&s);
        assert!(screen_text(&r).contains("New game"));

        s.open_difficulty_select();
        s.move_select_cursor(2);
        r.compose(&s);
        let text = screen_text(&r);
        assert!(text.contains("▶ 5 disks"));
        assert!(text.contains("127 moves"));
    }

    #[test]
    fn help_overlay_draws_on_top() {
        let mut r = renderer(80, 24);
        let mut s = playing(4);
        s.toggle_help();
        r.compose(&s);
        assert!(screen_text(&r).contains("hint the next best move"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut r = renderer(10, 3);
        let mut s = playing(7);
        s.toggle_help();
        r.compose(&s);
        s.phase = Phase::Title;
        r.compose(&s);
    }
}
