/// Pegs and disks.
/// A peg holds disk sizes bottom to top; every query about what a peg
/// will accept goes through the methods here.

/// Disk size, 1 = smallest.
pub type Disk = u8;

pub const PEG_COUNT: usize = 3;

/// The peg every puzzle starts on. A full stack here never counts as solved.
pub const SOURCE_PEG: usize = 0;

/// Sum of all peg indices (0 + 1 + 2); `PEG_INDEX_SUM - a - b` is the third peg.
pub const PEG_INDEX_SUM: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Peg {
    disks: Vec<Disk>,
}

impl Peg {
    pub fn new() -> Self {
        Peg { disks: Vec::new() }
    }

    /// A complete stack `[n, n-1, ..., 1]`.
    pub fn full(num_disks: u8) -> Self {
        Peg {
            disks: (1..=num_disks).rev().collect(),
        }
    }

    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    pub fn top(&self) -> Option<Disk> {
        self.disks.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Can `disk` rest on this peg? (empty, or top is strictly larger)
    pub fn accepts(&self, disk: Disk) -> bool {
        self.top().map_or(true, |top| top > disk)
    }

    /// Does this peg hold the full target stack for `num_disks`?
    pub fn is_complete(&self, num_disks: u8) -> bool {
        self.disks.len() == num_disks as usize
            && self.disks.iter().copied().eq((1..=num_disks).rev())
    }

    // Mutation is reserved for the game, which checks the rules first.

    pub(crate) fn push(&mut self, disk: Disk) {
        self.disks.push(disk);
    }

    pub(crate) fn pop(&mut self) -> Option<Disk> {
        self.disks.pop()
    }
}

/// The third peg, given two distinct ones.
#[inline]
pub fn spare_peg(a: usize, b: usize) -> usize {
    PEG_INDEX_SUM - a - b
}
