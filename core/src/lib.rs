#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bug Duel engine.
//!
//! This crate defines the message surface that connects the per-device
//! runtime, the authoritative board, and the pure systems. Systems submit
//! [`Command`] values describing desired board mutations, the board executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for presentation and bookkeeping. The wire-level [`Message`] enum
//! is the only vocabulary the two devices exchange over the channel.

use serde::{Deserialize, Serialize};

/// Canonical banner scrolled when a device boots into the title screen.
pub const TITLE_BANNER: &str = "BUG DUEL";

/// Location of a single LED-matrix cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    column: u8,
    row: u8,
}

impl GridPoint {
    /// Creates a new matrix cell coordinate.
    #[must_use]
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u8 {
        self.row
    }
}

/// Dimensions of the LED matrix measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatrixDimensions {
    columns: u8,
    rows: u8,
}

impl MatrixDimensions {
    /// The 5x7 matrix carried by the reference hardware.
    pub const STANDARD: Self = Self::new(5, 7);

    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u8, rows: u8) -> Self {
        Self { columns, rows }
    }

    /// Number of cell columns in the matrix.
    #[must_use]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    /// Number of cell rows in the matrix.
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// Total number of addressable cells.
    #[must_use]
    pub const fn cell_count(&self) -> u16 {
        self.columns as u16 * self.rows as u16
    }

    /// Reports whether the provided point lies within the matrix.
    #[must_use]
    pub const fn contains(&self, point: GridPoint) -> bool {
        point.column() < self.columns && point.row() < self.rows
    }
}

/// Cardinal movement directions available to the killer cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Input snapshot gathered by the input collaborator for one poll.
///
/// Each flag reports whether the corresponding push event fired since the
/// previous poll. A frame may carry several events at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InputFrame {
    /// Push event toward decreasing row indices.
    pub north: bool,
    /// Push event toward increasing column indices.
    pub east: bool,
    /// Push event toward increasing row indices.
    pub south: bool,
    /// Push event toward decreasing column indices.
    pub west: bool,
    /// Select push event used to trigger a kill attempt.
    pub select: bool,
}

impl InputFrame {
    /// A frame with no events fired.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            north: false,
            east: false,
            south: false,
            west: false,
            select: false,
        }
    }

    /// Enumerates the directions whose push events fired in this frame.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        [
            (self.north, Direction::North),
            (self.east, Direction::East),
            (self.south, Direction::South),
            (self.west, Direction::West),
        ]
        .into_iter()
        .filter_map(|(fired, direction)| fired.then_some(direction))
    }
}

/// Per-device game session status exchanged between the two peers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Title and ready screens, before gameplay begins.
    Start,
    /// The device is armed and will enter the first stage on the next
    /// stage-progression tick.
    Ready,
    /// A stage is in progress.
    Playing,
    /// A non-final stage was cleared; the device awaits re-sync.
    Finished,
    /// The final stage was cleared or the peer's completion was observed.
    GameOver,
}

/// Terminal outcome of a duel from one device's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// This device accumulated strictly more kills than its peer.
    Winner,
    /// This device accumulated strictly fewer kills than its peer.
    Loser,
    /// Both devices accumulated the same number of kills.
    Tie,
}

/// Wire message exchanged between the two devices over the channel.
///
/// Delivery is best-effort: there is no acknowledgement, sequencing, or
/// retransmission below this surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// The sending device's session status changed.
    Status(SessionStatus),
    /// The sending device's cumulative kill count, sent once at game over.
    Kills(u16),
    /// The outcome computed by the arbitrating device.
    Result(Outcome),
}

/// Commands that express all permissible board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rematerializes the bug field with the provided number of live bugs.
    GenerateField {
        /// Number of live bugs the new stage starts with.
        bugs: u8,
    },
    /// Requests that the killer cursor advance one cell.
    MoveKiller {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests a kill at the killer cursor's current cell.
    AttemptKill,
}

/// Events broadcast by the board, session, and runtime after processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a live bug materialized at the provided cell.
    BugSpawned {
        /// Cell now hosting a live bug.
        cell: GridPoint,
    },
    /// Confirms that the killer cursor moved between two cells.
    KillerMoved {
        /// Cell the cursor occupied before moving.
        from: GridPoint,
        /// Cell the cursor occupies after the move.
        to: GridPoint,
        /// Whether the vacated cell still hosts a live bug and must stay lit.
        vacated_live: bool,
    },
    /// Confirms that a live bug under the cursor was killed.
    BugKilled {
        /// Cell whose bug transitioned to dead.
        cell: GridPoint,
    },
    /// Announces that a new stage began.
    StageStarted {
        /// One-based index of the stage that began.
        stage: u8,
        /// Number of bugs that must be cleared to finish the stage.
        bugs_required: u8,
        /// Blink rate of the stage indicator for this stage, in hertz.
        indicator_rate: u32,
    },
    /// Announces that a non-final stage was cleared and reported to the peer.
    StageCleared {
        /// One-based index of the stage that was cleared.
        stage: u8,
    },
    /// Announces that the final stage was cleared locally.
    GameCompleted {
        /// Cumulative kill count across all stages.
        total_kills: u16,
    },
    /// Reports the status most recently received from the peer.
    PeerStatusChanged {
        /// Status the peer announced.
        status: SessionStatus,
    },
    /// The killer cursor's blink phase flipped.
    KillerBlinked {
        /// Cell occupied by the cursor.
        cell: GridPoint,
        /// Whether the cell is lit in the new phase.
        lit: bool,
    },
    /// The stage indicator's blink phase flipped.
    IndicatorBlinked {
        /// Whether the indicator is lit in the new phase.
        lit: bool,
    },
    /// The duel concluded and the device's outcome is fixed.
    OutcomeDecided {
        /// Outcome from this device's perspective.
        outcome: Outcome,
    },
}

/// Fixed configuration supplied to a device at boot.
///
/// The defaults mirror the reference hardware: a 5x7 matrix paced at 1000
/// pulses per second, three stages, and a field that grows by two bugs per
/// stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Dimensions of the LED matrix.
    pub dimensions: MatrixDimensions,
    /// Number of bugs before the first stage's ramp is applied.
    pub starting_bugs: u8,
    /// Bugs added to the requirement at every stage transition.
    pub stage_increment: u8,
    /// Total number of stages in a full game.
    pub total_stages: u8,
    /// Cell the killer cursor occupies at boot.
    pub killer_start: GridPoint,
    /// Base timebase rate in pulses per second.
    pub base_rate: u32,
    /// Killer cursor blink rate in hertz.
    pub blink_rate: u32,
    /// Input poll rate in hertz.
    pub input_rate: u32,
    /// Stage-progression evaluation rate in hertz.
    pub stage_rate: u32,
    /// Channel receive poll rate in hertz.
    pub receive_rate: u32,
    /// Stage indicator blink rate before the per-stage ramp, in hertz.
    pub indicator_base_rate: u32,
}

impl GameConfig {
    /// Maximum number of live bugs any stage can hold, reached at the final
    /// stage of the ramp.
    #[must_use]
    pub const fn field_capacity(&self) -> u8 {
        self.starting_bugs + self.stage_increment * self.total_stages
    }

    /// Number of bugs required to clear the provided one-based stage.
    #[must_use]
    pub const fn bugs_required(&self, stage: u8) -> u8 {
        self.starting_bugs + self.stage_increment * stage
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimensions: MatrixDimensions::STANDARD,
            starting_bugs: 3,
            stage_increment: 2,
            total_stages: 3,
            killer_start: GridPoint::new(2, 3),
            base_rate: 1000,
            blink_rate: 10,
            input_rate: 200,
            stage_rate: 200,
            receive_rate: 100,
            indicator_base_rate: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Direction, GameConfig, GridPoint, InputFrame, MatrixDimensions, Message, Outcome,
        SessionStatus,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn status_message_round_trips_through_bincode() {
        assert_round_trip(&Message::Status(SessionStatus::Finished));
    }

    #[test]
    fn kills_message_round_trips_through_bincode() {
        assert_round_trip(&Message::Kills(21));
    }

    #[test]
    fn result_message_round_trips_through_bincode() {
        assert_round_trip(&Message::Result(Outcome::Tie));
    }

    #[test]
    fn default_config_matches_reference_hardware() {
        let config = GameConfig::default();
        assert_eq!(config.dimensions, MatrixDimensions::new(5, 7));
        assert_eq!(config.field_capacity(), 9);
        assert_eq!(config.bugs_required(1), 5);
        assert_eq!(config.bugs_required(3), 9);
        assert!(u16::from(config.field_capacity()) < config.dimensions.cell_count());
    }

    #[test]
    fn input_frame_enumerates_fired_directions_in_fixed_order() {
        let frame = InputFrame {
            north: true,
            west: true,
            ..InputFrame::idle()
        };
        let directions: Vec<Direction> = frame.directions().collect();
        assert_eq!(directions, vec![Direction::North, Direction::West]);
    }

    #[test]
    fn standard_matrix_bounds_points() {
        let dimensions = MatrixDimensions::STANDARD;
        assert!(dimensions.contains(GridPoint::new(4, 6)));
        assert!(!dimensions.contains(GridPoint::new(5, 0)));
        assert!(!dimensions.contains(GridPoint::new(0, 7)));
    }
}
