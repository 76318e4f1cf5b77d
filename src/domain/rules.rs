/// Pick and drop rules, truth-table driven.
///
/// Pure functions over the pegs and the hand, with no side effects.
/// These encode "what is legal" without performing the move; the game
/// applies a move only after the matching check passes.
///
/// ### Pick
/// ┌──────────────────────────┬────────┬──────────────────┐
/// │ Condition                │ Allow? │ Error            │
/// ├──────────────────────────┼────────┼──────────────────┤
/// │ peg index ≥ 3            │ DENY   │ PegOutOfRange    │
/// │ hand holds a disk        │ DENY   │ HandOccupied     │
/// │ peg is empty             │ DENY   │ EmptyPeg         │
/// │ otherwise                │ ALLOW  │                  │
/// └──────────────────────────┴────────┴──────────────────┘
///
/// ### Drop
/// ┌──────────────────────────┬────────┬──────────────────┐
/// │ Condition                │ Allow? │ Error            │
/// ├──────────────────────────┼────────┼──────────────────┤
/// │ peg index ≥ 3            │ DENY   │ PegOutOfRange    │
/// │ hand is empty            │ DENY   │ HandEmpty        │
/// │ top disk ≤ held disk     │ DENY   │ DiskTooLarge     │
/// │ peg empty                │ ALLOW  │                  │
/// │ top disk > held disk     │ ALLOW  │                  │
/// └──────────────────────────┴────────┴──────────────────┘
///
/// Dropping back onto the origin peg is always legal (the disk came off
/// its top) and is not counted as a move.
///
/// ### Win
/// ┌──────────────────────────────────────┬─────────┐
/// │ Condition                            │ Solved? │
/// ├──────────────────────────────────────┼─────────┤
/// │ peg == SOURCE_PEG                    │ NO      │
/// │ peg holds [n, n-1, ..., 1]           │ YES     │
/// │ otherwise                            │ NO      │
/// └──────────────────────────────────────┴─────────┘

use super::error::IllegalMove;
use super::game::Hand;
use super::peg::{Peg, PEG_COUNT, SOURCE_PEG};

pub fn check_pick(pegs: &[Peg; PEG_COUNT], hand: Hand, peg: usize) -> Result<(), IllegalMove> {
    let stack = pegs.get(peg).ok_or(IllegalMove::PegOutOfRange { peg })?;
    if let Hand::Holding { disk, .. } = hand {
        return Err(IllegalMove::HandOccupied { disk });
    }
    if stack.is_empty() {
        return Err(IllegalMove::EmptyPeg { peg });
    }
    Ok(())
}

pub fn check_drop(pegs: &[Peg; PEG_COUNT], hand: Hand, peg: usize) -> Result<(), IllegalMove> {
    let stack = pegs.get(peg).ok_or(IllegalMove::PegOutOfRange { peg })?;
    let disk = hand.disk().ok_or(IllegalMove::HandEmpty)?;
    match stack.top() {
        Some(top) if !stack.accepts(disk) => Err(IllegalMove::DiskTooLarge { disk, top }),
        _ => Ok(()),
    }
}

pub fn can_pick(pegs: &[Peg; PEG_COUNT], hand: Hand, peg: usize) -> bool {
    check_pick(pegs, hand, peg).is_ok()
}

pub fn can_drop(pegs: &[Peg; PEG_COUNT], hand: Hand, peg: usize) -> bool {
    check_drop(pegs, hand, peg).is_ok()
}

/// Does `peg` now hold the finished puzzle? See the win table above.
pub fn completes_target(pegs: &[Peg; PEG_COUNT], num_disks: u8, peg: usize) -> bool {
    peg != SOURCE_PEG && pegs.get(peg).map_or(false, |p| p.is_complete(num_disks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pegs_from(stacks: [&[u8]; 3]) -> [Peg; PEG_COUNT] {
        stacks.map(|s| {
            let mut peg = Peg::new();
            for &d in s {
                peg.push(d);
            }
            peg
        })
    }

    fn holding(disk: u8, origin: usize) -> Hand {
        Hand::Holding { disk, origin }
    }

    // ── Pick ──

    #[test]
    fn pick_allowed_from_non_empty_peg() {
        let pegs = pegs_from([&[3, 2, 1], &[], &[]]);
        assert!(can_pick(&pegs, Hand::Empty, 0));
    }

    #[test]
    fn pick_denied_from_empty_peg() {
        let pegs = pegs_from([&[3, 2, 1], &[], &[]]);
        assert_eq!(check_pick(&pegs, Hand::Empty, 1), Err(IllegalMove::EmptyPeg { peg: 1 }));
    }

    #[test]
    fn pick_denied_while_holding() {
        let pegs = pegs_from([&[3, 2], &[], &[]]);
        assert_eq!(
            check_pick(&pegs, holding(1, 0), 0),
            Err(IllegalMove::HandOccupied { disk: 1 })
        );
    }

    #[test]
    fn pick_denied_off_the_board() {
        let pegs = pegs_from([&[3, 2, 1], &[], &[]]);
        assert_eq!(check_pick(&pegs, Hand::Empty, 3), Err(IllegalMove::PegOutOfRange { peg: 3 }));
    }

    // ── Drop ──

    #[test]
    fn drop_allowed_on_empty_peg() {
        let pegs = pegs_from([&[3, 2], &[], &[]]);
        assert!(can_drop(&pegs, holding(1, 0), 2));
    }

    #[test]
    fn drop_allowed_on_larger_disk() {
        let pegs = pegs_from([&[3], &[2], &[]]);
        assert!(can_drop(&pegs, holding(1, 2), 1));
        assert!(can_drop(&pegs, holding(1, 2), 0));
    }

    #[test]
    fn drop_denied_on_smaller_disk() {
        let pegs = pegs_from([&[3], &[1], &[]]);
        assert_eq!(
            check_drop(&pegs, holding(2, 2), 1),
            Err(IllegalMove::DiskTooLarge { disk: 2, top: 1 })
        );
    }

    #[test]
    fn drop_denied_on_equal_disk() {
        let pegs = pegs_from([&[3, 2], &[2], &[]]);
        assert_eq!(
            check_drop(&pegs, holding(2, 1), 0),
            Err(IllegalMove::DiskTooLarge { disk: 2, top: 2 })
        );
    }

    #[test]
    fn drop_denied_with_empty_hand() {
        let pegs = pegs_from([&[3, 2, 1], &[], &[]]);
        assert_eq!(check_drop(&pegs, Hand::Empty, 1), Err(IllegalMove::HandEmpty));
    }

    #[test]
    fn drop_back_on_origin_is_legal() {
        // The held disk came off the top, so the origin top is larger.
        let pegs = pegs_from([&[3, 2], &[], &[]]);
        assert!(can_drop(&pegs, holding(1, 0), 0));
    }

    // ── Win ──

    #[test]
    fn full_stack_on_other_peg_completes() {
        let pegs = pegs_from([&[], &[3, 2, 1], &[]]);
        assert!(completes_target(&pegs, 3, 1));
        let pegs = pegs_from([&[], &[], &[3, 2, 1]]);
        assert!(completes_target(&pegs, 3, 2));
    }

    #[test]
    fn full_stack_on_source_never_completes() {
        let pegs = pegs_from([&[3, 2, 1], &[], &[]]);
        assert!(!completes_target(&pegs, 3, 0));
    }

    #[test]
    fn partial_stack_does_not_complete() {
        let pegs = pegs_from([&[1], &[], &[3, 2]]);
        assert!(!completes_target(&pegs, 3, 2));
    }
}
