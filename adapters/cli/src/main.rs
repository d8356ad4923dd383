#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line harness that runs a full Bug Duel between two simulated
//! devices connected by an in-memory link.
//!
//! Each device is driven by a simple bug-chasing player. The right device
//! plays with a speed handicap so one side reliably finishes first: two
//! devices completing on the same tick would each wait for the other's
//! verdict.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write;

use bug_duel_board::query;
use bug_duel_core::{GameConfig, InputFrame, Outcome, TITLE_BANNER};
use bug_duel_rendering::{FrameBuffer, Presentation};
use bug_duel_sync::LoopbackEndpoint;
use bug_duel_system_runtime::{Engine, Phase};

const LINK_CAPACITY: usize = 4;

/// Runs a scripted duel between two simulated devices.
#[derive(Debug, Parser)]
#[command(name = "bug-duel", version, about)]
struct Args {
    /// Field-generation seed for the left device (random when omitted).
    #[arg(long)]
    seed_left: Option<u64>,

    /// Field-generation seed for the right device (random when omitted).
    #[arg(long)]
    seed_right: Option<u64>,

    /// The right device acts on every Nth input opportunity only.
    #[arg(long, default_value_t = 2)]
    handicap: u32,

    /// Abort if the duel has not settled after this many pulses.
    #[arg(long, default_value_t = 1_000_000)]
    max_pulses: u64,

    /// Print only the outcome line, without matrices or banners.
    #[arg(long)]
    quiet: bool,
}

/// Bug-chasing player: walk toward the first live bug, press select on it.
fn chase_frame(engine: &Engine) -> InputFrame {
    let board = engine.board();
    let killer = query::killer(board);
    let Some(target) = query::live_cells(board).first().copied() else {
        return InputFrame::idle();
    };
    if killer == target {
        return InputFrame {
            select: true,
            ..InputFrame::idle()
        };
    }
    let mut frame = InputFrame::idle();
    if killer.column() < target.column() {
        frame.east = true;
    } else if killer.column() > target.column() {
        frame.west = true;
    } else if killer.row() < target.row() {
        frame.south = true;
    } else {
        frame.north = true;
    }
    frame
}

/// Terminal presentation of a device's matrix and banners.
struct StdoutPresentation {
    label: &'static str,
}

impl Presentation for StdoutPresentation {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "[{}]", self.label).context("write frame header")?;
        for row in frame.rows() {
            writeln!(handle, "  {row}").context("write frame row")?;
        }
        writeln!(
            handle,
            "  indicator: {}",
            if frame.indicator_lit() { "on" } else { "off" }
        )
        .context("write indicator state")?;
        Ok(())
    }

    fn banner(&mut self, text: &str) -> Result<()> {
        println!("[{}] {text}", self.label);
        Ok(())
    }
}

fn outcome_text(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Winner => "WINNER",
        Outcome::Loser => "LOSER",
        Outcome::Tie => "TIE",
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.handicap == 0 {
        bail!("--handicap must be at least 1");
    }

    let config = GameConfig::default();
    let seed_left = args.seed_left.unwrap_or_else(rand::random);
    let seed_right = args.seed_right.unwrap_or_else(rand::random);

    let (mut left_link, mut right_link) = LoopbackEndpoint::pair(LINK_CAPACITY);
    let mut left = Engine::new(&config, seed_left);
    let mut right = Engine::new(&config, seed_right);
    let mut left_frame = FrameBuffer::new(config.dimensions);
    let mut right_frame = FrameBuffer::new(config.dimensions);
    let mut left_screen = StdoutPresentation { label: "left" };
    let mut right_screen = StdoutPresentation { label: "right" };

    if !args.quiet {
        left_screen.banner(TITLE_BANNER)?;
        right_screen.banner(TITLE_BANNER)?;
    }

    let mut events = Vec::new();
    let mut handicap_phase = 0u32;
    let mut settled = false;
    for _ in 0..args.max_pulses {
        let frame = chase_frame(&left);
        left.pulse(&mut left_link, &frame, &mut events);
        for event in events.drain(..) {
            left_frame.apply(&event);
        }

        handicap_phase = (handicap_phase + 1) % args.handicap;
        let frame = if handicap_phase == 0 {
            chase_frame(&right)
        } else {
            InputFrame::idle()
        };
        right.pulse(&mut right_link, &frame, &mut events);
        for event in events.drain(..) {
            right_frame.apply(&event);
        }

        if left.phase() == Phase::Complete && right.phase() == Phase::Complete {
            settled = true;
            break;
        }
    }
    if !settled {
        bail!("duel did not settle within {} pulses", args.max_pulses);
    }

    let left_outcome = left
        .outcome()
        .context("left device completed without an outcome")?;
    let right_outcome = right
        .outcome()
        .context("right device completed without an outcome")?;

    if !args.quiet {
        left_screen.present(&left_frame)?;
        right_screen.present(&right_frame)?;
        left_screen.banner(outcome_text(left_outcome))?;
        right_screen.banner(outcome_text(right_outcome))?;
    }
    println!(
        "left: {} ({} kills) / right: {} ({} kills)",
        outcome_text(left_outcome),
        left.session().total_kills(),
        outcome_text(right_outcome),
        right.session().total_kills(),
    );
    Ok(())
}
