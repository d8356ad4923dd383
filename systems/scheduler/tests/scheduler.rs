use bug_duel_core::GameConfig;
use bug_duel_system_scheduler::{Scheduler, Task, PRIORITY};

#[test]
fn one_second_of_pulses_fires_each_task_at_its_rate() {
    let config = GameConfig::default();
    let mut scheduler = Scheduler::new(&config);
    let mut counts = [0u32; PRIORITY.len()];

    for _ in 0..config.base_rate {
        let firing = scheduler.advance();
        for (slot, task) in PRIORITY.into_iter().enumerate() {
            if firing.contains(task) {
                counts[slot] += 1;
            }
        }
    }

    assert_eq!(
        counts,
        [
            config.blink_rate,
            config.input_rate,
            config.stage_rate,
            config.receive_rate,
            config.indicator_base_rate,
        ]
    );
}

#[test]
fn tasks_with_equal_rates_fire_on_the_same_pulse() {
    let config = GameConfig::default();
    assert_eq!(config.input_rate, config.stage_rate);

    let mut scheduler = Scheduler::new(&config);
    for _ in 0..config.base_rate {
        let firing = scheduler.advance();
        assert_eq!(firing.contains(Task::Input), firing.contains(Task::Stage));
    }
}

#[test]
fn reprogramming_the_indicator_changes_its_cadence() {
    let config = GameConfig::default();
    let mut scheduler = Scheduler::new(&config);

    scheduler.set_rate(Task::Indicator, 8);
    let fired = (0..config.base_rate)
        .filter(|_| scheduler.advance().contains(Task::Indicator))
        .count();
    assert_eq!(fired, 8);
}

#[test]
fn reprogramming_restarts_the_running_period() {
    let config = GameConfig::default();
    let mut scheduler = Scheduler::new(&config);

    // Walk the indicator close to its boundary, then reprogram at the same
    // rate; the next firing must be a full period away.
    let period = config.base_rate / config.indicator_base_rate;
    for _ in 0..period - 1 {
        let _ = scheduler.advance();
    }
    scheduler.set_rate(Task::Indicator, config.indicator_base_rate);

    assert!(!scheduler.advance().contains(Task::Indicator));
    let mut fired_after = 0;
    for _ in 0..period {
        if scheduler.advance().contains(Task::Indicator) {
            fired_after += 1;
        }
    }
    assert_eq!(fired_after, 1);
}
