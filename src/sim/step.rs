/// The step functions: turn shell commands into rule-engine calls.
///
///   `apply`: one user (or gamepad) command, any time.
///   `tick` : fixed-rate housekeeping: message timer, demo presses.
///
/// Peg presses are gated on `check_press` before the game is touched, so a
/// refused press costs nothing but a status message. A press that passes
/// the gate and still fails is a rule-engine bug and is logged at warn.

use tracing::{debug, info, warn};

use crate::domain::error::IllegalMove;
use crate::domain::game::{Action, MAX_DISKS, MIN_DISKS};
use crate::domain::solver;
use super::event::GameEvent;
use super::session::{Demo, Phase, Session};

/// Ticks a transient status message stays up.
const MESSAGE_TICKS: u32 = 60;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Pick from or drop onto a peg (0 = left, 1 = middle, 2 = right).
    Peg(usize),
    /// Same disk count, fresh puzzle.
    Restart,
    /// New disk count, fresh puzzle.
    SetDifficulty(u8),
    Hint,
    ToggleDemo,
    CycleStyle,
}

/// Human-readable peg names, indexed by peg.
pub const PEG_NAMES: [&str; 3] = ["left", "middle", "right"];

pub fn peg_name(peg: usize) -> &'static str {
    PEG_NAMES.get(peg).copied().unwrap_or("unknown")
}

// ══════════════════════════════════════════════════════════════
// Main entry points
// ══════════════════════════════════════════════════════════════

pub fn apply(session: &mut Session, command: Command) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match command {
        Command::Peg(peg) => {
            if session.phase != Phase::Playing {
                return events;
            }
            stop_demo(session, &mut events);
            press_peg(session, peg, &mut events);
        }
        Command::Restart => {
            let n = session.game.num_disks();
            start_puzzle(session, n, &mut events);
            session.set_message("Restarted", MESSAGE_TICKS / 2);
        }
        Command::SetDifficulty(n) => {
            start_puzzle(session, n, &mut events);
        }
        Command::Hint => show_hint(session, &mut events),
        Command::ToggleDemo => {
            if session.demo.is_some() {
                stop_demo(session, &mut events);
            } else {
                start_demo(session, &mut events);
            }
        }
        Command::CycleStyle => {
            session.style = session.style.next();
            // The solved banner owns the message until the next puzzle.
            if session.phase != Phase::Solved {
                let msg = format!("Style: {}", session.style.name());
                session.set_message(&msg, MESSAGE_TICKS / 2);
            }
        }
    }
    events
}

pub fn tick(session: &mut Session) -> Vec<GameEvent> {
    let mut events = Vec::new();
    session.anim_tick = session.anim_tick.wrapping_add(1);

    if session.message_timer > 0 {
        session.message_timer -= 1;
        if session.message_timer == 0 {
            session.message.clear();
        }
    }

    advance_demo(session, &mut events);
    events
}

// ══════════════════════════════════════════════════════════════
// Puzzle lifecycle
// ══════════════════════════════════════════════════════════════

fn start_puzzle(session: &mut Session, num_disks: u8, events: &mut Vec<GameEvent>) {
    if let Err(e) = session.game.initialize(num_disks) {
        warn!(error = %e, num_disks, "puzzle not started");
        let msg = format!("Choose {MIN_DISKS} to {MAX_DISKS} disks");
        session.set_message(&msg, MESSAGE_TICKS);
        return;
    }
    session.phase = Phase::Playing;
    session.select_cursor = num_disks;
    session.hint = None;
    session.demo = None;
    session.assisted = false;
    session.show_help = false;
    session.clear_message();
    events.push(GameEvent::Restarted { num_disks });
}

// ══════════════════════════════════════════════════════════════
// Peg presses
// ══════════════════════════════════════════════════════════════

fn press_peg(session: &mut Session, peg: usize, events: &mut Vec<GameEvent>) {
    if let Err(reason) = session.game.check_press(peg) {
        debug!(peg, %reason, "press refused");
        session.set_message(&refusal_message(reason), MESSAGE_TICKS);
        events.push(GameEvent::MoveRejected { peg });
        return;
    }

    match session.game.press(peg) {
        Ok(Action::Picked { peg, disk }) => {
            events.push(GameEvent::DiskPicked { peg, disk });
        }
        Ok(Action::Dropped { peg, disk, result }) => {
            debug!(peg, disk, moved = result.moved, counted = result.counted_as_move, "drop applied");
            session.hint = None;
            if result.counted_as_move {
                events.push(GameEvent::DiskDropped { peg, disk, moves: result.total_moves });
            } else {
                events.push(GameEvent::DiskReturned { peg, disk });
            }
            if result.solved && session.phase == Phase::Playing {
                finish(session, result.total_moves, events);
            }
        }
        Err(e) => {
            warn!(error = %e, peg, "press failed after passing its check");
            events.push(GameEvent::MoveRejected { peg });
        }
    }
}

fn finish(session: &mut Session, moves: u32, events: &mut Vec<GameEvent>) {
    let optimum = solver::min_moves(session.game.num_disks());
    let optimal = moves as u64 == optimum;
    session.phase = Phase::Solved;
    session.demo = None;
    session.hint = None;
    let msg = format!("Congratulations, puzzle solved in {moves} moves");
    session.set_message(&msg, 0);
    info!(moves, optimal, assisted = session.assisted, "session finished");
    events.push(GameEvent::PuzzleSolved { moves, optimal });
}

// ══════════════════════════════════════════════════════════════
// Hint and demo
// ══════════════════════════════════════════════════════════════

fn show_hint(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.phase != Phase::Playing {
        return;
    }
    let state = session.game.snapshot();
    let goal = solver::goal_peg(&state);
    let Some((from, to)) = solver::next_move(&state, goal) else {
        return;
    };
    let disk = solver::disk_to_move(&state, goal).unwrap_or_default();

    let holding_from = session.game.last_picked_peg().filter(|_| state.hand.is_some());
    let msg = match (holding_from, state.hand) {
        (Some(origin), Some(held)) if origin != from => {
            format!("Put disk {held} back on the {} peg first", peg_name(origin))
        }
        _ => format!("Move disk {disk} from the {} peg to the {} peg", peg_name(from), peg_name(to)),
    };
    session.hint = Some((from, to));
    session.set_message(&msg, MESSAGE_TICKS * 2);
    events.push(GameEvent::HintShown { from, to });
}

fn start_demo(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.phase != Phase::Playing {
        return;
    }
    let goal = solver::goal_peg(&session.game.snapshot());
    session.demo = Some(Demo { goal, countdown: session.demo_interval });
    session.hint = None;
    session.set_message("Demo: watch the optimal solution  [P] stop", 0);
    info!(goal, "demo started");
    events.push(GameEvent::DemoStarted);
}

fn stop_demo(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.demo.take().is_some() {
        session.clear_message();
        info!("demo stopped");
        events.push(GameEvent::DemoStopped);
    }
}

fn advance_demo(session: &mut Session, events: &mut Vec<GameEvent>) {
    let Some(mut demo) = session.demo else { return };
    if session.phase != Phase::Playing {
        session.demo = None;
        return;
    }
    if demo.countdown > 1 {
        demo.countdown -= 1;
        session.demo = Some(demo);
        return;
    }

    let Some(peg) = solver::next_press(&session.game.snapshot(), demo.goal) else {
        stop_demo(session, events);
        return;
    };
    demo.countdown = session.demo_interval;
    session.demo = Some(demo);
    session.assisted = true;
    press_peg(session, peg, events);
}

/// Status-bar wording for a refused press. Pegs are named the way the
/// board labels them; the error's own `Display` keeps indices for logs.
fn refusal_message(reason: IllegalMove) -> String {
    match reason {
        IllegalMove::PegOutOfRange { peg } => format!("There is no peg {}", peg + 1),
        IllegalMove::EmptyPeg { peg } => format!("The {} peg is empty", peg_name(peg)),
        IllegalMove::HandOccupied { disk } => format!("Already holding disk {disk}"),
        IllegalMove::HandEmpty => "No disk is held".to_string(),
        IllegalMove::DiskTooLarge { disk, top } => format!("Disk {disk} cannot rest on disk {top}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiskStyle, GameConfig};
    use crate::domain::solver;

    fn playing(disks: u8) -> Session {
        let mut s = Session::new(&GameConfig::default()).unwrap();
        apply(&mut s, Command::SetDifficulty(disks));
        s
    }

    fn run_ticks(s: &mut Session, n: usize) -> Vec<GameEvent> {
        (0..n).flat_map(|_| tick(s)).collect()
    }

    #[test]
    fn set_difficulty_starts_playing() {
        let mut s = Session::new(&GameConfig::default()).unwrap();
        let events = apply(&mut s, Command::SetDifficulty(5));
        assert_eq!(events, vec![GameEvent::Restarted { num_disks: 5 }]);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.game.num_disks(), 5);
    }

    #[test]
    fn bad_difficulty_keeps_current_game() {
        let mut s = playing(4);
        apply(&mut s, Command::Peg(0));
        let events = apply(&mut s, Command::SetDifficulty(11));
        assert!(events.is_empty());
        assert_eq!(s.game.num_disks(), 4);
        assert!(!s.game.hand().is_empty());
        assert!(s.message.contains("3 to 7"));
    }

    #[test]
    fn pegs_ignored_outside_play() {
        let mut s = Session::new(&GameConfig::default()).unwrap();
        assert!(apply(&mut s, Command::Peg(0)).is_empty());
        assert!(s.game.hand().is_empty());
    }

    #[test]
    fn pick_and_drop_emit_events() {
        let mut s = playing(3);
        assert_eq!(apply(&mut s, Command::Peg(0)), vec![GameEvent::DiskPicked { peg: 0, disk: 1 }]);
        assert_eq!(
            apply(&mut s, Command::Peg(2)),
            vec![GameEvent::DiskDropped { peg: 2, disk: 1, moves: 1 }]
        );
    }

    #[test]
    fn returning_a_disk_emits_returned() {
        let mut s = playing(3);
        apply(&mut s, Command::Peg(0));
        assert_eq!(apply(&mut s, Command::Peg(0)), vec![GameEvent::DiskReturned { peg: 0, disk: 1 }]);
        assert_eq!(s.game.move_count(), 0);
    }

    #[test]
    fn refused_press_sets_message_and_leaves_game() {
        let mut s = playing(3);
        let before = s.game.snapshot();
        assert_eq!(apply(&mut s, Command::Peg(1)), vec![GameEvent::MoveRejected { peg: 1 }]);
        assert_eq!(s.game.snapshot(), before);
        assert_eq!(s.message, "The middle peg is empty");

        apply(&mut s, Command::Peg(0));
        apply(&mut s, Command::Peg(1));
        apply(&mut s, Command::Peg(0));
        assert_eq!(apply(&mut s, Command::Peg(1)), vec![GameEvent::MoveRejected { peg: 1 }]);
        assert_eq!(s.message, "Disk 2 cannot rest on disk 1");
    }

    #[test]
    fn refused_press_names_the_labelled_peg() {
        let mut s = playing(3);
        apply(&mut s, Command::Peg(2));
        assert_eq!(s.message, "The right peg is empty");
        assert_eq!(refusal_message(IllegalMove::PegOutOfRange { peg: 3 }), "There is no peg 4");
        assert_eq!(refusal_message(IllegalMove::HandEmpty), "No disk is held");
    }

    #[test]
    fn solving_moves_to_solved_phase() {
        let mut s = playing(3);
        let mut last = vec![];
        for (from, to) in solver::solution(3, 0, 2) {
            apply(&mut s, Command::Peg(from));
            last = apply(&mut s, Command::Peg(to));
        }
        assert_eq!(s.phase, Phase::Solved);
        assert!(last.contains(&GameEvent::PuzzleSolved { moves: 7, optimal: true }));
        assert_eq!(s.message, "Congratulations, puzzle solved in 7 moves");
        // No more play until restart.
        assert!(apply(&mut s, Command::Peg(2)).is_empty());
        apply(&mut s, Command::Restart);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.game.move_count(), 0);
    }

    #[test]
    fn slow_solve_is_not_optimal() {
        let mut s = playing(3);
        let detour = [(0, 1), (1, 0)];
        for (from, to) in detour.into_iter().chain(solver::solution(3, 0, 1)) {
            apply(&mut s, Command::Peg(from));
            apply(&mut s, Command::Peg(to));
        }
        assert_eq!(s.phase, Phase::Solved);
        assert_eq!(s.game.move_count(), 9);
    }

    #[test]
    fn hint_names_the_next_move() {
        let mut s = playing(3);
        let events = apply(&mut s, Command::Hint);
        assert_eq!(events, vec![GameEvent::HintShown { from: 0, to: 2 }]);
        assert_eq!(s.hint, Some((0, 2)));
        assert_eq!(s.message, "Move disk 1 from the left peg to the right peg");

        // A drop clears the hint.
        apply(&mut s, Command::Peg(0));
        apply(&mut s, Command::Peg(2));
        assert_eq!(s.hint, None);
    }

    #[test]
    fn hint_with_wrong_disk_in_hand() {
        let mut s = playing(3);
        apply(&mut s, Command::Peg(0));
        apply(&mut s, Command::Peg(2));
        apply(&mut s, Command::Peg(2));
        apply(&mut s, Command::Hint);
        assert_eq!(s.message, "Put disk 1 back on the right peg first");
    }

    #[test]
    fn demo_solves_from_the_start() {
        let mut s = playing(3);
        assert_eq!(apply(&mut s, Command::ToggleDemo), vec![GameEvent::DemoStarted]);
        let interval = s.demo_interval as usize;
        let events = run_ticks(&mut s, interval * 14 + 1);
        assert_eq!(s.phase, Phase::Solved);
        assert_eq!(s.game.move_count(), 7);
        assert!(events.contains(&GameEvent::PuzzleSolved { moves: 7, optimal: true }));
        assert!(s.demo.is_none());
        assert!(s.assisted);
    }

    #[test]
    fn demo_returns_a_held_disk_first() {
        let mut s = playing(3);
        apply(&mut s, Command::Peg(0));
        apply(&mut s, Command::Peg(1));
        apply(&mut s, Command::Peg(1)); // holding disk 1, off-plan
        apply(&mut s, Command::ToggleDemo);
        let interval = s.demo_interval as usize;
        let events = run_ticks(&mut s, interval);
        assert_eq!(events, vec![GameEvent::DiskReturned { peg: 1, disk: 1 }]);
        run_ticks(&mut s, interval * 40);
        assert_eq!(s.phase, Phase::Solved);
    }

    #[test]
    fn manual_press_stops_demo() {
        let mut s = playing(4);
        apply(&mut s, Command::ToggleDemo);
        let events = apply(&mut s, Command::Peg(0));
        assert_eq!(events[0], GameEvent::DemoStopped);
        assert!(s.demo.is_none());
    }

    #[test]
    fn toggle_demo_twice_stops_it() {
        let mut s = playing(4);
        apply(&mut s, Command::ToggleDemo);
        assert_eq!(apply(&mut s, Command::ToggleDemo), vec![GameEvent::DemoStopped]);
        assert!(run_ticks(&mut s, 50).is_empty());
        assert_eq!(s.game.move_count(), 0);
    }

    #[test]
    fn message_expires() {
        let mut s = playing(3);
        apply(&mut s, Command::Peg(2));
        assert!(!s.message.is_empty());
        run_ticks(&mut s, MESSAGE_TICKS as usize);
        assert!(s.message.is_empty());
    }

    #[test]
    fn cycle_style() {
        let mut s = playing(3);
        assert_eq!(s.style, DiskStyle::Disks);
        apply(&mut s, Command::CycleStyle);
        assert_eq!(s.style, DiskStyle::Blocks);
        assert_eq!(s.message, "Style: blocks");
    }

    #[test]
    fn cycle_style_after_solve_keeps_the_banner() {
        let mut s = playing(3);
        for (from, to) in solver::solution(3, 0, 2) {
            apply(&mut s, Command::Peg(from));
            apply(&mut s, Command::Peg(to));
        }
        apply(&mut s, Command::CycleStyle);
        assert_eq!(s.style, DiskStyle::Blocks);
        run_ticks(&mut s, MESSAGE_TICKS as usize);
        assert_eq!(s.phase, Phase::Solved);
        assert_eq!(s.message, "Congratulations, puzzle solved in 7 moves");
    }

    #[test]
    fn peg_names() {
        assert_eq!(peg_name(0), "left");
        assert_eq!(peg_name(2), "right");
        assert_eq!(peg_name(9), "unknown");
    }
}
