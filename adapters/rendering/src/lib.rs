#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bug Duel adapters.
//!
//! The engine never draws; it broadcasts events. Adapters fold those events
//! into a [`FrameBuffer`], the software image of the LED matrix plus the
//! stage indicator, and hand frames to a [`Presentation`] for display.
//! Concrete presentations (terminal output, real hardware) live in their
//! own adapter crates.

use anyhow::Result as AnyResult;
use bug_duel_core::{Event, GridPoint, MatrixDimensions};

/// Software image of the LED matrix and the stage indicator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    dimensions: MatrixDimensions,
    cells: Vec<bool>,
    indicator_lit: bool,
}

impl FrameBuffer {
    /// Creates a dark frame buffer for the provided matrix.
    #[must_use]
    pub fn new(dimensions: MatrixDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![false; usize::from(dimensions.cell_count())],
            indicator_lit: false,
        }
    }

    /// Dimensions of the matrix backing this buffer.
    #[must_use]
    pub fn dimensions(&self) -> MatrixDimensions {
        self.dimensions
    }

    /// Whether the provided cell is currently lit.
    #[must_use]
    pub fn is_lit(&self, point: GridPoint) -> bool {
        self.index(point)
            .map(|index| self.cells[index])
            .unwrap_or(false)
    }

    /// Whether the stage indicator is currently lit.
    #[must_use]
    pub fn indicator_lit(&self) -> bool {
        self.indicator_lit
    }

    /// Sets one cell, ignoring out-of-bounds points.
    pub fn draw(&mut self, point: GridPoint, lit: bool) {
        if let Some(index) = self.index(point) {
            self.cells[index] = lit;
        }
    }

    /// Folds one engine event into the buffer.
    ///
    /// Stage starts darken the matrix before the new field's spawn events
    /// light it, mirroring the display re-initialization at every stage
    /// boundary. Events that carry no pixels are ignored.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::StageStarted { .. } => self.cells.fill(false),
            Event::BugSpawned { cell } => self.draw(*cell, true),
            Event::BugKilled { cell } => self.draw(*cell, false),
            Event::KillerMoved {
                from,
                to,
                vacated_live,
            } => {
                self.draw(*from, *vacated_live);
                self.draw(*to, true);
            }
            Event::KillerBlinked { cell, lit } => self.draw(*cell, *lit),
            Event::IndicatorBlinked { lit } => self.indicator_lit = *lit,
            Event::StageCleared { .. }
            | Event::GameCompleted { .. }
            | Event::PeerStatusChanged { .. }
            | Event::OutcomeDecided { .. } => {}
        }
    }

    /// Renders the buffer as one text line per matrix row.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        (0..self.dimensions.rows())
            .map(|row| {
                (0..self.dimensions.columns())
                    .map(|column| {
                        if self.is_lit(GridPoint::new(column, row)) {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn index(&self, point: GridPoint) -> Option<usize> {
        if self.dimensions.contains(point) {
            Some(
                usize::from(point.row()) * usize::from(self.dimensions.columns())
                    + usize::from(point.column()),
            )
        } else {
            None
        }
    }
}

/// Display surface an adapter drives with frames and banners.
pub trait Presentation {
    /// Shows the current frame.
    fn present(&mut self, frame: &FrameBuffer) -> AnyResult<()>;

    /// Scrolls a text banner, used for the title and the final result.
    fn banner(&mut self, text: &str) -> AnyResult<()>;
}
