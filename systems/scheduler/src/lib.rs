#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooperative tick dispatcher for the Bug Duel runtime.
//!
//! The dispatcher divides a fixed base pulse rate into one divider per
//! logical task. Every pulse increments every divider; a task fires at most
//! once per pulse, when its divider completes a full period. Tasks fire in
//! a fixed priority order and are expected to finish within the pulse, so
//! state shared between them needs no synchronization beyond the ordering
//! itself. The dispatcher never terminates the loop on its own; that
//! decision belongs to the runtime's phase handling.

use bug_duel_core::GameConfig;

/// Logical tasks driven by the dispatcher, in fixed priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Killer cursor blink toggle.
    KillerBlink,
    /// Input poll and killer movement.
    Input,
    /// Stage and field progression.
    Stage,
    /// Channel receive poll.
    Receive,
    /// Per-stage indicator blink toggle.
    Indicator,
}

/// Number of logical tasks the dispatcher drives.
pub const TASK_COUNT: usize = 5;

/// Tasks in the order they fire within one pulse.
pub const PRIORITY: [Task; TASK_COUNT] = [
    Task::KillerBlink,
    Task::Input,
    Task::Stage,
    Task::Receive,
    Task::Indicator,
];

impl Task {
    const fn index(self) -> usize {
        match self {
            Self::KillerBlink => 0,
            Self::Input => 1,
            Self::Stage => 2,
            Self::Receive => 3,
            Self::Indicator => 4,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Divider {
    divisor: u32,
    counter: u32,
}

impl Divider {
    fn for_rate(base_rate: u32, rate: u32) -> Self {
        debug_assert!(rate > 0, "task rate must be positive");
        debug_assert!(
            base_rate % rate == 0,
            "task rate must divide the base rate evenly"
        );
        Self {
            divisor: base_rate / rate.max(1),
            counter: 0,
        }
    }

    fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.divisor {
            self.counter = 0;
            return true;
        }
        false
    }
}

/// Set of tasks that fired during one pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Firing {
    fired: [bool; TASK_COUNT],
}

impl Firing {
    /// Reports whether the provided task fired this pulse.
    #[must_use]
    pub const fn contains(&self, task: Task) -> bool {
        self.fired[task.index()]
    }

    /// Iterates the fired tasks in priority order.
    pub fn iter(&self) -> impl Iterator<Item = Task> + '_ {
        PRIORITY.into_iter().filter(|task| self.contains(*task))
    }
}

/// Pulse divider bank driving the five runtime tasks.
#[derive(Debug)]
pub struct Scheduler {
    base_rate: u32,
    slots: [Divider; TASK_COUNT],
}

impl Scheduler {
    /// Creates a scheduler programmed from the game configuration.
    ///
    /// The indicator slot starts at the pre-ramp base rate; the session's
    /// difficulty ramp reprograms it at every stage boundary.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let base = config.base_rate;
        Self {
            base_rate: base,
            slots: [
                Divider::for_rate(base, config.blink_rate),
                Divider::for_rate(base, config.input_rate),
                Divider::for_rate(base, config.stage_rate),
                Divider::for_rate(base, config.receive_rate),
                Divider::for_rate(base, config.indicator_base_rate),
            ],
        }
    }

    /// Reprograms one task's rate, restarting its period.
    pub fn set_rate(&mut self, task: Task, rate: u32) {
        self.slots[task.index()] = Divider::for_rate(self.base_rate, rate);
    }

    /// Processes one base pulse, reporting which tasks fire.
    pub fn advance(&mut self) -> Firing {
        let mut firing = Firing::default();
        for task in PRIORITY {
            firing.fired[task.index()] = self.slots[task.index()].advance();
        }
        firing
    }
}

#[cfg(test)]
mod tests {
    use super::{Divider, Firing, Task};

    #[test]
    fn divider_fires_once_per_period() {
        let mut divider = Divider::for_rate(1000, 10);
        let fired = (0..1000).filter(|_| divider.advance()).count();
        assert_eq!(fired, 10);
    }

    #[test]
    fn divider_at_base_rate_fires_every_pulse() {
        let mut divider = Divider::for_rate(1000, 1000);
        assert!(divider.advance());
        assert!(divider.advance());
    }

    #[test]
    fn firing_iterates_in_priority_order() {
        let mut firing = Firing::default();
        firing.fired[Task::Indicator.index()] = true;
        firing.fired[Task::KillerBlink.index()] = true;
        let order: Vec<Task> = firing.iter().collect();
        assert_eq!(order, vec![Task::KillerBlink, Task::Indicator]);
    }
}
