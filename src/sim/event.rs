/// Events emitted by a session step.
/// The presentation layer consumes these for sound and status text;
/// the board itself is always redrawn from the game snapshot.

use crate::domain::peg::Disk;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    DiskPicked { peg: usize, disk: Disk },
    /// Counted move onto a different peg.
    DiskDropped { peg: usize, disk: Disk, moves: u32 },
    /// Disk put back where it was picked; not counted.
    DiskReturned { peg: usize, disk: Disk },
    MoveRejected { peg: usize },
    PuzzleSolved { moves: u32, optimal: bool },
    Restarted { num_disks: u8 },
    HintShown { from: usize, to: usize },
    DemoStarted,
    DemoStopped,
}
