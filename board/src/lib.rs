#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative per-device board state for Bug Duel.
//!
//! The board owns the bug field and the killer cursor. All mutation flows
//! through [`apply`]; read access flows through the [`query`] module. Field
//! generation draws from an explicitly seeded ChaCha8 stream so stages are
//! reproducible under test and unpredictable in production, where the
//! harness supplies an externally derived seed.

use bug_duel_core::{Command, Direction, Event, GridPoint, MatrixDimensions};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A single slot of the bug field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BugSpot {
    point: GridPoint,
    alive: bool,
}

impl BugSpot {
    const fn inert() -> Self {
        Self {
            point: GridPoint::new(0, 0),
            alive: false,
        }
    }
}

/// Fixed-capacity sequence of bug spots with a live-count prefix.
///
/// Slots within the live count belong to the current stage; slots beyond it
/// are inert placeholders awaiting a later, larger stage. Within the live
/// prefix no two spots share a point.
#[derive(Clone, Debug)]
struct BugField {
    spots: Vec<BugSpot>,
    live_count: u8,
}

impl BugField {
    fn with_capacity(capacity: u8) -> Self {
        Self {
            spots: vec![BugSpot::inert(); usize::from(capacity)],
            live_count: 0,
        }
    }

    fn reset(&mut self) {
        for spot in &mut self.spots {
            *spot = BugSpot::inert();
        }
        self.live_count = 0;
    }

    /// Linear scan of the first `scan_limit` slots for a live bug at `point`.
    ///
    /// Kill detection scans the whole live prefix; generation scans only the
    /// bugs placed so far in the current batch.
    fn find_live(&self, point: GridPoint, scan_limit: u8) -> Option<usize> {
        self.spots
            .iter()
            .take(usize::from(scan_limit))
            .position(|spot| spot.alive && spot.point == point)
    }
}

/// Authoritative board state for one device.
#[derive(Debug)]
pub struct Board {
    dimensions: MatrixDimensions,
    field: BugField,
    killer: GridPoint,
    rng: ChaCha8Rng,
}

impl Board {
    /// Creates a board with an empty field and the killer at its start cell.
    ///
    /// `capacity` must leave ample free cells on the matrix so that the
    /// rejection-sampling placement in field generation terminates quickly.
    #[must_use]
    pub fn new(dimensions: MatrixDimensions, capacity: u8, killer_start: GridPoint, seed: u64) -> Self {
        debug_assert!(
            u16::from(capacity) < dimensions.cell_count(),
            "field capacity must not exhaust the matrix"
        );
        debug_assert!(dimensions.contains(killer_start), "killer must start in bounds");
        Self {
            dimensions,
            field: BugField::with_capacity(capacity),
            killer: killer_start,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn generate_field(&mut self, requested: u8, out_events: &mut Vec<Event>) {
        let capacity = self.field.spots.len() as u8;
        debug_assert!(requested <= capacity, "requested bugs exceed field capacity");
        let requested = requested.min(capacity);

        self.field.reset();
        for placed in 0..requested {
            let point = loop {
                let column = self.rng.gen_range(0..self.dimensions.columns());
                let row = self.rng.gen_range(0..self.dimensions.rows());
                let candidate = GridPoint::new(column, row);
                if self.field.find_live(candidate, placed).is_none() {
                    break candidate;
                }
            };
            self.field.spots[usize::from(placed)] = BugSpot { point, alive: true };
            out_events.push(Event::BugSpawned { cell: point });
        }
        self.field.live_count = requested;
    }

    fn move_killer(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.killer;
        let to = step_clamped(from, direction, self.dimensions);
        let vacated_live = self.field.find_live(from, self.field.live_count).is_some();
        self.killer = to;
        out_events.push(Event::KillerMoved {
            from,
            to,
            vacated_live,
        });
    }

    fn attempt_kill(&mut self, out_events: &mut Vec<Event>) {
        let Some(index) = self.field.find_live(self.killer, self.field.live_count) else {
            return;
        };
        self.field.spots[index].alive = false;
        out_events.push(Event::BugKilled { cell: self.killer });
    }
}

/// Advances the killer one cell, clamping at the matrix edges.
fn step_clamped(from: GridPoint, direction: Direction, dimensions: MatrixDimensions) -> GridPoint {
    let (column, row) = (from.column(), from.row());
    let (column, row) = match direction {
        Direction::North => (column, row.saturating_sub(1)),
        Direction::South => (column, (row + 1).min(dimensions.rows() - 1)),
        Direction::West => (column.saturating_sub(1), row),
        Direction::East => ((column + 1).min(dimensions.columns() - 1), row),
    };
    GridPoint::new(column, row)
}

/// Applies the provided command to the board, mutating state deterministically.
pub fn apply(board: &mut Board, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateField { bugs } => board.generate_field(bugs, out_events),
        Command::MoveKiller { direction } => board.move_killer(direction, out_events),
        Command::AttemptKill => board.attempt_kill(out_events),
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use super::Board;
    use bug_duel_core::{GridPoint, MatrixDimensions};

    /// Cell currently occupied by the killer cursor.
    #[must_use]
    pub fn killer(board: &Board) -> GridPoint {
        board.killer
    }

    /// Dimensions of the matrix the board was created with.
    #[must_use]
    pub fn dimensions(board: &Board) -> MatrixDimensions {
        board.dimensions
    }

    /// Number of live bugs remaining in the current stage.
    #[must_use]
    pub fn live_remaining(board: &Board) -> u8 {
        board
            .field
            .spots
            .iter()
            .take(usize::from(board.field.live_count))
            .filter(|spot| spot.alive)
            .count() as u8
    }

    /// Reports whether a live bug occupies the provided cell.
    #[must_use]
    pub fn live_bug_at(board: &Board, point: GridPoint) -> bool {
        board
            .field
            .find_live(point, board.field.live_count)
            .is_some()
    }

    /// Captures the cells of all live bugs in slot order.
    #[must_use]
    pub fn live_cells(board: &Board) -> Vec<GridPoint> {
        board
            .field
            .spots
            .iter()
            .take(usize::from(board.field.live_count))
            .filter(|spot| spot.alive)
            .map(|spot| spot.point)
            .collect()
    }
}
