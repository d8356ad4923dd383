#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-device game session state machine.
//!
//! The session owns the authoritative local status, the stage bookkeeping,
//! and a read-only cache of the peer's announcements. It is a pure system:
//! the stage-progression tick feeds it channel readiness and collects the
//! board commands, outbound messages, and events it decides to emit. The
//! cumulative kill total only ever grows, and only at stage boundaries or
//! game end; the input task contributes kills through [`Session::record_kills`],
//! which touches the per-stage counter alone.

use bug_duel_core::{Command, Event, GameConfig, Message, Outcome, SessionStatus};

/// Follow-up the runtime owes after one stage-progression evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageStep {
    /// Keep dispatching pulses.
    Continue,
    /// The final stage was cleared locally; gameplay is over and the
    /// outbound announcements must reach the peer.
    Terminal,
}

/// Follow-up the runtime owes after consuming one peer message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receipt {
    /// Nothing to do beyond the session's own bookkeeping.
    None,
    /// The peer finished its game and announced its total; arbitrate now.
    Arbitrate {
        /// Cumulative kill count the peer transmitted.
        peer_kills: u16,
    },
    /// The peer transmitted its computed outcome.
    PeerResult(Outcome),
}

/// Read-only cache of the peer's announcements.
#[derive(Clone, Copy, Debug, Default)]
struct RemoteState {
    status: Option<SessionStatus>,
    kills: Option<u16>,
}

/// Authoritative session state machine for one device.
#[derive(Debug)]
pub struct Session {
    status: SessionStatus,
    stage: u8,
    stage_kills: u8,
    total_kills: u16,
    bugs_required: u8,
    indicator_rate: u32,
    finished_first: bool,
    remote: RemoteState,
    stage_increment: u8,
    total_stages: u8,
    indicator_base_rate: u32,
}

impl Session {
    /// Creates a session at the title screen, before gameplay begins.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            status: SessionStatus::Start,
            stage: 0,
            stage_kills: 0,
            total_kills: 0,
            bugs_required: config.starting_bugs,
            indicator_rate: config.indicator_base_rate,
            finished_first: false,
            remote: RemoteState::default(),
            stage_increment: config.stage_increment,
            total_stages: config.total_stages,
            indicator_base_rate: config.indicator_base_rate,
        }
    }

    /// Arms the session once the title and ready screens are done.
    pub fn begin(&mut self) {
        if self.status == SessionStatus::Start {
            self.status = SessionStatus::Ready;
        }
    }

    /// Local session status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// One-based index of the current stage; zero before the first stage.
    #[must_use]
    pub fn stage(&self) -> u8 {
        self.stage
    }

    /// Bugs killed so far in the current stage.
    #[must_use]
    pub fn stage_kills(&self) -> u8 {
        self.stage_kills
    }

    /// Cumulative kills folded in at stage boundaries and game end.
    #[must_use]
    pub fn total_kills(&self) -> u16 {
        self.total_kills
    }

    /// Bugs that must be cleared to finish the current stage.
    #[must_use]
    pub fn bugs_required(&self) -> u8 {
        self.bugs_required
    }

    /// Indicator blink rate for the current stage, in hertz.
    #[must_use]
    pub fn indicator_rate(&self) -> u32 {
        self.indicator_rate
    }

    /// Whether this device cleared its final stage before hearing from the
    /// peer, making it the one that waits for the peer's computed result.
    #[must_use]
    pub fn finished_first(&self) -> bool {
        self.finished_first
    }

    /// Status most recently announced by the peer, if any.
    #[must_use]
    pub fn peer_status(&self) -> Option<SessionStatus> {
        self.remote.status
    }

    /// Credits kills reported by the input task to the current stage.
    pub fn record_kills(&mut self, kills: u8) {
        debug_assert!(
            self.stage_kills + kills <= self.bugs_required,
            "stage kills cannot exceed the stage requirement"
        );
        self.stage_kills += kills;
    }

    /// Evaluates the stage-progression transitions for one tick.
    ///
    /// `channel_ready` gates the FINISHED announcement exactly as the
    /// transition itself is gated: while the channel is busy the stage stays
    /// in PLAYING and the condition is re-evaluated on the next tick.
    pub fn advance_stage(
        &mut self,
        channel_ready: bool,
        out_commands: &mut Vec<Command>,
        outbound: &mut Vec<Message>,
        out_events: &mut Vec<Event>,
    ) -> StageStep {
        match self.status {
            SessionStatus::Ready | SessionStatus::Finished => {
                if self.stage < self.total_stages {
                    self.enter_next_stage(out_commands, out_events);
                } else {
                    // A FINISHED heard during the final stage is stale; resume
                    // the interrupted stage instead of advancing past the end.
                    self.status = SessionStatus::Playing;
                }
                StageStep::Continue
            }
            SessionStatus::Playing if self.stage < self.total_stages => {
                if self.stage_kills == self.bugs_required && channel_ready {
                    self.status = SessionStatus::Finished;
                    outbound.push(Message::Status(SessionStatus::Finished));
                    out_events.push(Event::StageCleared { stage: self.stage });
                }
                StageStep::Continue
            }
            SessionStatus::Playing => {
                if self.stage_kills == self.bugs_required {
                    self.status = SessionStatus::GameOver;
                    self.fold_stage_kills();
                    self.finished_first = true;
                    outbound.push(Message::Status(SessionStatus::GameOver));
                    outbound.push(Message::Kills(self.total_kills));
                    out_events.push(Event::GameCompleted {
                        total_kills: self.total_kills,
                    });
                    StageStep::Terminal
                } else {
                    StageStep::Continue
                }
            }
            SessionStatus::Start | SessionStatus::GameOver => StageStep::Continue,
        }
    }

    /// Digests one message received from the peer.
    ///
    /// A non-GAMEOVER status overwrites the local status unconditionally.
    /// This mirrors a FINISHED peer into local readiness for re-sync, at the
    /// documented cost that a stale FINISHED can clobber an in-progress
    /// PLAYING stage. The stage tick bounds the recovery: advancement stops
    /// at the last stage, so a clobber there only pauses play until the next
    /// tick.
    pub fn on_message(&mut self, message: Message, out_events: &mut Vec<Event>) -> Receipt {
        match message {
            Message::Status(status) => {
                self.remote.status = Some(status);
                out_events.push(Event::PeerStatusChanged { status });
                if status == SessionStatus::GameOver {
                    self.arbitration_receipt()
                } else {
                    self.status = status;
                    Receipt::None
                }
            }
            Message::Kills(kills) => {
                self.remote.kills = Some(kills);
                if self.remote.status == Some(SessionStatus::GameOver) {
                    self.arbitration_receipt()
                } else {
                    Receipt::None
                }
            }
            Message::Result(outcome) => Receipt::PeerResult(outcome),
        }
    }

    /// Folds the in-progress stage's kills into the cumulative total.
    ///
    /// Called when the peer ends the game mid-stage so the comparison uses
    /// everything this device achieved, including the unfinished stage.
    pub fn fold_in_progress(&mut self) -> u16 {
        self.status = SessionStatus::GameOver;
        self.fold_stage_kills();
        self.total_kills
    }

    fn arbitration_receipt(&self) -> Receipt {
        match self.remote.kills {
            Some(peer_kills) => Receipt::Arbitrate { peer_kills },
            None => Receipt::None,
        }
    }

    fn fold_stage_kills(&mut self) {
        self.total_kills += u16::from(self.stage_kills);
        self.stage_kills = 0;
    }

    fn enter_next_stage(&mut self, out_commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        self.fold_stage_kills();
        self.bugs_required += self.stage_increment;
        self.stage += 1;
        self.indicator_rate = self.indicator_base_rate << (self.stage - 1);
        self.status = SessionStatus::Playing;
        // Optimistic mirror: the peer is assumed to re-enter play alongside us.
        self.remote.status = Some(SessionStatus::Playing);
        out_commands.push(Command::GenerateField {
            bugs: self.bugs_required,
        });
        out_events.push(Event::StageStarted {
            stage: self.stage,
            bugs_required: self.bugs_required,
            indicator_rate: self.indicator_rate,
        });
    }
}
