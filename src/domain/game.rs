/// HanoiGame: the pick/drop state machine.
///
/// Two hand states, orthogonal `solved` flag:
///
/// ```text
///            pick(peg)                       drop(peg)
///   HandEmpty ────────► Holding(disk, origin) ────────► HandEmpty
///                                                    └─ solved: false → true
/// ```
///
/// `solved` stays true until the next `initialize`. The core does not refuse
/// picks after a solve; stopping play is the caller's policy.
///
/// Every mutator checks `rules::check_*` first, so a refused call leaves the
/// state exactly as it was.

use tracing::{debug, info};

use super::error::{HanoiError, IllegalMove};
use super::peg::{Disk, Peg, PEG_COUNT};
use super::rules;

/// Smallest selectable puzzle.
pub const MIN_DISKS: u8 = 3;
/// Largest selectable puzzle.
pub const MAX_DISKS: u8 = 7;

/// What the player is holding between a pick and its drop.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Hand {
    #[default]
    Empty,
    Holding { disk: Disk, origin: usize },
}

impl Hand {
    pub fn disk(self) -> Option<Disk> {
        match self {
            Hand::Empty => None,
            Hand::Holding { disk, .. } => Some(disk),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Hand::Empty
    }
}

/// Outcome of a successful drop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveResult {
    pub moved: bool,
    /// False when the disk went back to the peg it was picked from.
    pub counted_as_move: bool,
    pub solved: bool,
    pub total_moves: u32,
}

/// Outcome of `press`: which half of the pick/drop cycle ran.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Picked { peg: usize, disk: Disk },
    Dropped { peg: usize, disk: Disk, result: MoveResult },
}

/// Read-only snapshot handed to renderers after every mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub pegs: [Vec<Disk>; PEG_COUNT],
    pub hand: Option<Disk>,
    pub last_picked_peg: Option<usize>,
    pub move_count: u32,
    pub solved: bool,
    pub num_disks: u8,
}

#[derive(Clone, Debug)]
pub struct HanoiGame {
    pegs: [Peg; PEG_COUNT],
    hand: Hand,
    last_picked: Option<usize>,
    num_disks: u8,
    move_count: u32,
    solved: bool,
}

// ── Construction ──

impl HanoiGame {
    pub fn new(num_disks: u8) -> Result<Self, HanoiError> {
        let mut game = HanoiGame {
            pegs: Default::default(),
            hand: Hand::Empty,
            last_picked: None,
            num_disks: 0,
            move_count: 0,
            solved: false,
        };
        game.initialize(num_disks)?;
        Ok(game)
    }

    /// Reset to a fresh puzzle: full stack on peg 0, empty hand, zero moves.
    pub fn initialize(&mut self, num_disks: u8) -> Result<(), HanoiError> {
        if !(MIN_DISKS..=MAX_DISKS).contains(&num_disks) {
            return Err(HanoiError::InvalidConfiguration {
                requested: num_disks,
                min: MIN_DISKS,
                max: MAX_DISKS,
            });
        }
        self.pegs = [Peg::full(num_disks), Peg::new(), Peg::new()];
        self.hand = Hand::Empty;
        self.last_picked = None;
        self.num_disks = num_disks;
        self.move_count = 0;
        self.solved = false;
        info!(num_disks, "puzzle initialized");
        Ok(())
    }
}

// ── Moves ──

impl HanoiGame {
    pub fn can_pick(&self, peg: usize) -> bool {
        rules::can_pick(&self.pegs, self.hand, peg)
    }

    pub fn can_drop(&self, peg: usize) -> bool {
        rules::can_drop(&self.pegs, self.hand, peg)
    }

    /// Lift the top disk of `peg` into the hand.
    pub fn pick(&mut self, peg: usize) -> Result<Disk, HanoiError> {
        rules::check_pick(&self.pegs, self.hand, peg)?;
        let disk = self.pegs[peg].pop().ok_or(IllegalMove::EmptyPeg { peg })?;
        self.hand = Hand::Holding { disk, origin: peg };
        self.last_picked = Some(peg);
        debug!(peg, disk, "disk picked");
        Ok(disk)
    }

    /// Put the held disk on `peg`.
    pub fn drop(&mut self, peg: usize) -> Result<MoveResult, HanoiError> {
        rules::check_drop(&self.pegs, self.hand, peg)?;
        let (disk, origin) = match self.hand {
            Hand::Holding { disk, origin } => (disk, origin),
            Hand::Empty => return Err(IllegalMove::HandEmpty.into()),
        };

        self.pegs[peg].push(disk);
        self.hand = Hand::Empty;

        let counted_as_move = peg != origin;
        if counted_as_move {
            self.move_count += 1;
        }
        debug!(peg, disk, counted_as_move, moves = self.move_count, "disk dropped");

        if !self.solved && rules::completes_target(&self.pegs, self.num_disks, peg) {
            self.solved = true;
            info!(peg, moves = self.move_count, "puzzle solved");
        }

        Ok(MoveResult {
            moved: true,
            counted_as_move,
            solved: self.solved,
            total_moves: self.move_count,
        })
    }

    /// Why a press on `peg` would be refused, given the current hand.
    pub fn check_press(&self, peg: usize) -> Result<(), IllegalMove> {
        match self.hand {
            Hand::Empty => rules::check_pick(&self.pegs, self.hand, peg),
            Hand::Holding { .. } => rules::check_drop(&self.pegs, self.hand, peg),
        }
    }

    /// Single entry point for a peg control: picks when the hand is empty,
    /// drops when it is holding.
    pub fn press(&mut self, peg: usize) -> Result<Action, HanoiError> {
        match self.hand {
            Hand::Empty => {
                let disk = self.pick(peg)?;
                Ok(Action::Picked { peg, disk })
            }
            Hand::Holding { disk, .. } => {
                let result = self.drop(peg)?;
                Ok(Action::Dropped { peg, disk, result })
            }
        }
    }
}

// ── Queries ──

impl HanoiGame {
    pub fn pegs(&self) -> &[Peg; PEG_COUNT] {
        &self.pegs
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn last_picked_peg(&self) -> Option<usize> {
        self.last_picked
    }

    pub fn num_disks(&self) -> u8 {
        self.num_disks
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn snapshot(&self) -> GameState {
        GameState {
            pegs: [
                self.pegs[0].disks().to_vec(),
                self.pegs[1].disks().to_vec(),
                self.pegs[2].disks().to_vec(),
            ],
            hand: self.hand.disk(),
            last_picked_peg: self.last_picked,
            move_count: self.move_count,
            solved: self.solved,
            num_disks: self.num_disks,
        }
    }
}
