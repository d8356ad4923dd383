#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-device engine that drives one Bug Duel participant.
//!
//! The engine owns the board, the session, the dispatcher, and the sync
//! plumbing, and advances them all from a single [`Engine::pulse`] entry
//! point. One pulse is atomic: tasks fire in dispatcher priority order and
//! each completes before the next begins, so the shared state needs no
//! locking. The engine never blocks; the post-game wait for the peer's
//! result is expressed as a phase in which each pulse merely polls the
//! channel and drains the outbox.

use bug_duel_board::{self as board, query, Board};
use bug_duel_core::{Command, Event, GameConfig, InputFrame, Message, Outcome, SessionStatus};
use bug_duel_sync::{Channel, Outbox};
use bug_duel_system_arbiter::{self as arbiter, ResultSlot};
use bug_duel_system_scheduler::{Scheduler, Task};
use bug_duel_system_session::{Receipt, Session, StageStep};

/// Lifecycle phase of one device's engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Gameplay pulses are being dispatched.
    Running,
    /// The final stage was cleared first; each pulse polls for the peer's
    /// computed result while draining the terminal announcements.
    AwaitingPeerResult,
    /// The outcome is decided locally; pulses drain the remaining outbound
    /// messages before completion.
    Draining,
    /// The duel is over and the outcome is fixed.
    Complete,
}

/// Engine driving one device of the duel.
#[derive(Debug)]
pub struct Engine {
    board: Board,
    session: Session,
    scheduler: Scheduler,
    outbox: Outbox,
    result: ResultSlot,
    phase: Phase,
    killer_lit: bool,
    indicator_lit: bool,
    indicator_rate: u32,
}

impl Engine {
    /// Creates an engine armed for the first stage.
    ///
    /// The title and ready screens are the harness's concern; the session
    /// starts in READY and enters stage one on the first stage tick. The
    /// seed feeds the board's field generation; production wiring derives
    /// it from an external entropy source.
    #[must_use]
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut session = Session::new(config);
        session.begin();
        Self {
            board: Board::new(
                config.dimensions,
                config.field_capacity(),
                config.killer_start,
                seed,
            ),
            session,
            scheduler: Scheduler::new(config),
            outbox: Outbox::new(),
            result: ResultSlot::new(),
            phase: Phase::Running,
            killer_lit: false,
            indicator_lit: false,
            indicator_rate: config.indicator_base_rate,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome from this device's perspective, once decided.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.result.get()
    }

    /// Read-only access to the board for presentation and harness drivers.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Read-only access to the session bookkeeping.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Processes one base timebase pulse.
    ///
    /// `input` is the frame gathered by the input collaborator since the
    /// previous poll; it is consumed only on pulses where the input task
    /// fires and the session is in PLAYING.
    pub fn pulse(
        &mut self,
        channel: &mut dyn Channel,
        input: &InputFrame,
        out_events: &mut Vec<Event>,
    ) {
        match self.phase {
            Phase::Running => self.run_tasks(channel, input, out_events),
            Phase::AwaitingPeerResult => self.await_peer_result(channel, out_events),
            Phase::Draining => {
                let _ = self.outbox.flush(channel);
                if self.outbox.is_empty() {
                    self.phase = Phase::Complete;
                }
            }
            Phase::Complete => {}
        }
    }

    fn run_tasks(
        &mut self,
        channel: &mut dyn Channel,
        input: &InputFrame,
        out_events: &mut Vec<Event>,
    ) {
        let firing = self.scheduler.advance();
        for task in firing.iter() {
            match task {
                Task::KillerBlink => self.blink_killer(out_events),
                Task::Input => self.poll_input(input, out_events),
                Task::Stage => self.advance_stage(channel, out_events),
                Task::Receive => self.poll_receive(channel, out_events),
                Task::Indicator => self.blink_indicator(out_events),
            }
            if self.phase != Phase::Running {
                break;
            }
        }
    }

    fn blink_killer(&mut self, out_events: &mut Vec<Event>) {
        self.killer_lit = !self.killer_lit;
        out_events.push(Event::KillerBlinked {
            cell: query::killer(&self.board),
            lit: self.killer_lit,
        });
    }

    fn blink_indicator(&mut self, out_events: &mut Vec<Event>) {
        self.indicator_lit = !self.indicator_lit;
        out_events.push(Event::IndicatorBlinked {
            lit: self.indicator_lit,
        });
    }

    fn poll_input(&mut self, input: &InputFrame, out_events: &mut Vec<Event>) {
        if self.session.status() != SessionStatus::Playing {
            return;
        }
        for direction in input.directions() {
            board::apply(&mut self.board, Command::MoveKiller { direction }, out_events);
        }
        if input.select {
            let before = out_events.len();
            board::apply(&mut self.board, Command::AttemptKill, out_events);
            let kills = out_events[before..]
                .iter()
                .filter(|event| matches!(event, Event::BugKilled { .. }))
                .count();
            self.session.record_kills(kills as u8);
        }
    }

    fn advance_stage(&mut self, channel: &mut dyn Channel, out_events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        let mut outbound = Vec::new();
        let step = self.session.advance_stage(
            channel.ready_to_write(),
            &mut commands,
            &mut outbound,
            out_events,
        );
        for command in commands {
            board::apply(&mut self.board, command, out_events);
        }
        if self.session.indicator_rate() != self.indicator_rate {
            self.indicator_rate = self.session.indicator_rate();
            self.scheduler.set_rate(Task::Indicator, self.indicator_rate);
        }
        match step {
            StageStep::Continue => {
                // Mid-game announcements are at-most-once: the session only
                // emits them on a ready channel, and a failed handoff is
                // dropped for this tick.
                for message in outbound {
                    let _ = channel.send(message);
                }
            }
            StageStep::Terminal => {
                for message in outbound {
                    self.outbox.enqueue(message);
                }
                let _ = self.outbox.flush(channel);
                self.phase = Phase::AwaitingPeerResult;
            }
        }
    }

    fn poll_receive(&mut self, channel: &mut dyn Channel, out_events: &mut Vec<Event>) {
        if !channel.ready_to_read() {
            return;
        }
        let Some(message) = channel.recv() else {
            return;
        };
        match self.session.on_message(message, out_events) {
            Receipt::None => {}
            Receipt::Arbitrate { peer_kills } => {
                let total = self.session.fold_in_progress();
                let outcome = self.result.record(arbiter::compare(total, peer_kills));
                self.outbox.enqueue(Message::Result(outcome));
                let _ = self.outbox.flush(channel);
                out_events.push(Event::OutcomeDecided { outcome });
                self.phase = if self.outbox.is_empty() {
                    Phase::Complete
                } else {
                    Phase::Draining
                };
            }
            // A result can only arrive while awaiting it; a stray one during
            // gameplay is ignored.
            Receipt::PeerResult(_) => {}
        }
    }

    fn await_peer_result(&mut self, channel: &mut dyn Channel, out_events: &mut Vec<Event>) {
        let _ = self.outbox.flush(channel);
        if !channel.ready_to_read() {
            return;
        }
        let Some(message) = channel.recv() else {
            return;
        };
        if let Message::Result(peer_outcome) = message {
            let outcome = self.result.record(arbiter::mirror(peer_outcome));
            out_events.push(Event::OutcomeDecided { outcome });
            self.phase = if self.outbox.is_empty() {
                Phase::Complete
            } else {
                Phase::Draining
            };
        }
    }
}
