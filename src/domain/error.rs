/// Errors raised by the rule engine.
///
/// Both kinds are caller mistakes, not transient failures: the shell is
/// expected to check `can_pick` / `can_drop` before mutating. A failed call
/// never changes the game state.

use derive_more::{Display, Error};

use super::peg::Disk;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error)]
pub enum HanoiError {
    #[display("unsupported disk count {requested} (choose {min} to {max})")]
    InvalidConfiguration { requested: u8, min: u8, max: u8 },
    #[display("illegal move: {_0}")]
    IllegalMove(#[error(source)] IllegalMove),
}

/// Why a pick or drop was refused.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error)]
pub enum IllegalMove {
    #[display("there is no peg {peg}")]
    PegOutOfRange { peg: usize },
    #[display("peg {peg} is empty")]
    EmptyPeg { peg: usize },
    #[display("already holding disk {disk}")]
    HandOccupied { disk: Disk },
    #[display("no disk is held")]
    HandEmpty,
    #[display("disk {disk} cannot rest on disk {top}")]
    DiskTooLarge { disk: Disk, top: Disk },
}

impl From<IllegalMove> for HanoiError {
    fn from(err: IllegalMove) -> Self {
        HanoiError::IllegalMove(err)
    }
}
