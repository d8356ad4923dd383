#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Result arbitration for the two-device duel.
//!
//! Exactly one device compares kill totals directly: the one that observes
//! the peer's GAMEOVER before finishing locally. It computes its own outcome
//! with [`compare`] and transmits that outcome to the peer, which derives
//! the complementary outcome with [`mirror`]. Both devices therefore
//! converge on consistent, mutually inverse results without a shared clock.
//! The [`ResultSlot`] makes the outcome write-once: whatever arrives after
//! the first decision cannot change it.

use bug_duel_core::Outcome;

/// Computes the local outcome from the two cumulative kill totals.
#[must_use]
pub fn compare(local_kills: u16, peer_kills: u16) -> Outcome {
    if local_kills > peer_kills {
        Outcome::Winner
    } else if local_kills < peer_kills {
        Outcome::Loser
    } else {
        Outcome::Tie
    }
}

/// Derives the local outcome from the outcome the peer computed for itself.
#[must_use]
pub fn mirror(peer_outcome: Outcome) -> Outcome {
    match peer_outcome {
        Outcome::Winner => Outcome::Loser,
        Outcome::Loser => Outcome::Winner,
        Outcome::Tie => Outcome::Tie,
    }
}

/// Write-once holder for a device's outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResultSlot {
    outcome: Option<Outcome>,
}

impl ResultSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome if none is held yet, returning the winning write.
    pub fn record(&mut self, outcome: Outcome) -> Outcome {
        *self.outcome.get_or_insert(outcome)
    }

    /// Outcome held by the slot, if decided.
    #[must_use]
    pub fn get(&self) -> Option<Outcome> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::{compare, mirror, ResultSlot};
    use bug_duel_core::Outcome;

    #[test]
    fn comparison_is_strict_on_both_sides() {
        assert_eq!(compare(9, 7), Outcome::Winner);
        assert_eq!(compare(7, 9), Outcome::Loser);
        assert_eq!(compare(12, 12), Outcome::Tie);
    }

    #[test]
    fn mirrored_outcomes_pair_with_compared_outcomes() {
        for (mine, theirs) in [(9u16, 7u16), (7, 9), (12, 12)] {
            let direct = compare(mine, theirs);
            let mirrored = mirror(compare(theirs, mine));
            assert_eq!(direct, mirrored);
        }
    }

    #[test]
    fn tie_is_its_own_mirror() {
        assert_eq!(mirror(Outcome::Tie), Outcome::Tie);
    }

    #[test]
    fn result_slot_keeps_the_first_write() {
        let mut slot = ResultSlot::new();
        assert_eq!(slot.get(), None);
        assert_eq!(slot.record(Outcome::Winner), Outcome::Winner);
        assert_eq!(slot.record(Outcome::Loser), Outcome::Winner);
        assert_eq!(slot.get(), Some(Outcome::Winner));
    }
}
