/// Optimal move planning.
///
/// `solution` is the textbook recursion from a fresh stack, kept as the
/// reference sequence the planner is checked against. `next_move`
/// plans from any legal position (the demo can take over mid-game), using
/// the same recursion on disk locations: to put disk k on the goal, the
/// smaller disks must first sit on the third peg.

use super::game::GameState;
use super::peg::{spare_peg, Disk, PEG_COUNT, SOURCE_PEG};

/// Fewest counted moves for a fresh puzzle: 2^n - 1.
pub fn min_moves(num_disks: u8) -> u64 {
    (1u64 << num_disks) - 1
}

/// Full optimal sequence of `(from, to)` moves for `num_disks` disks.
#[cfg(test)]
pub fn solution(num_disks: u8, from: usize, to: usize) -> Vec<(usize, usize)> {
    if from == to || from >= PEG_COUNT || to >= PEG_COUNT {
        return Vec::new();
    }
    let mut moves = Vec::with_capacity(min_moves(num_disks) as usize);
    solve_into(num_disks, from, to, spare_peg(from, to), &mut moves);
    moves
}

#[cfg(test)]
fn solve_into(n: u8, from: usize, to: usize, via: usize, out: &mut Vec<(usize, usize)>) {
    if n == 0 {
        return;
    }
    solve_into(n - 1, from, via, to, out);
    out.push((from, to));
    solve_into(n - 1, via, to, from, out);
}

/// Peg of every disk, indexed by size (index 0 unused).
/// A held disk counts as still sitting on top of the peg it came from.
fn disk_locations(state: &GameState) -> Vec<usize> {
    let mut location = vec![SOURCE_PEG; state.num_disks as usize + 1];
    for (peg, disks) in state.pegs.iter().enumerate() {
        for &disk in disks {
            location[disk as usize] = peg;
        }
    }
    if let (Some(disk), Some(origin)) = (state.hand, state.last_picked_peg) {
        location[disk as usize] = origin;
    }
    location
}

fn first_move(location: &[usize], disk: usize, goal: usize) -> Option<(usize, usize)> {
    if disk == 0 {
        return None;
    }
    let here = location[disk];
    if here == goal {
        return first_move(location, disk - 1, goal);
    }
    first_move(location, disk - 1, spare_peg(here, goal)).or(Some((here, goal)))
}

fn moves_needed(location: &[usize], disk: usize, goal: usize) -> u64 {
    if disk == 0 {
        return 0;
    }
    let here = location[disk];
    if here == goal {
        return moves_needed(location, disk - 1, goal);
    }
    // Clear the smaller disks onto the spare, move this one, restack a full tower.
    moves_needed(location, disk - 1, spare_peg(here, goal)) + 1 + min_moves((disk - 1) as u8)
}

/// First move of the shortest path to the full stack on `goal`.
/// `None` when the stack is already there.
pub fn next_move(state: &GameState, goal: usize) -> Option<(usize, usize)> {
    if goal >= PEG_COUNT {
        return None;
    }
    let location = disk_locations(state);
    first_move(&location, state.num_disks as usize, goal)
}

/// Counted moves left on the shortest path to the full stack on `goal`.
pub fn remaining_moves(state: &GameState, goal: usize) -> u64 {
    let location = disk_locations(state);
    moves_needed(&location, state.num_disks as usize, goal)
}

/// The non-source peg that is closest to finished. Ties go to the right peg.
pub fn goal_peg(state: &GameState) -> usize {
    if remaining_moves(state, 1) < remaining_moves(state, 2) {
        1
    } else {
        2
    }
}

/// Which peg to press next to follow the shortest path to `goal`.
///
/// With an empty hand this is the peg to pick from. With a disk in hand it
/// is the planned destination when that disk is the one to move, otherwise
/// the disk's origin (put it back first).
pub fn next_press(state: &GameState, goal: usize) -> Option<usize> {
    let planned = next_move(state, goal);
    match (state.hand, state.last_picked_peg) {
        (Some(_), Some(origin)) => match planned {
            Some((from, to)) if from == origin => Some(to),
            _ => Some(origin),
        },
        _ => planned.map(|(from, _)| from),
    }
}

/// The disk the next planned move carries. Used by hint text.
pub fn disk_to_move(state: &GameState, goal: usize) -> Option<Disk> {
    let (from, _) = next_move(state, goal)?;
    match (state.hand, state.last_picked_peg) {
        (Some(disk), Some(origin)) if origin == from => Some(disk),
        _ => state.pegs[from].last().copied(),
    }
}
