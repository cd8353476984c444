//! Two-timer scheduler
//!
//! Stands in for the UI toolkit's timers: a 35 ms tick timer and a 1000 ms
//! wave timer, both serviced on the caller's thread. The shell feeds it
//! elapsed wall time and it replays every timer that came due, in
//! chronological order.

use crate::consts::{MAX_SUBSTEPS, SECOND_INTERVAL_MS, TICK_INTERVAL_MS};
use crate::sim::{Arena, second, tick};

/// How many handlers ran during one [`Scheduler::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fired {
    pub ticks: u32,
    pub seconds: u32,
    /// Tick slots skipped because the substep cap was hit
    pub dropped_ticks: u32,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Milliseconds since the scheduler started
    now: u64,
    next_tick: u64,
    next_second: u64,
    running: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_tick: TICK_INTERVAL_MS,
            next_second: SECOND_INTERVAL_MS,
            running: true,
        }
    }

    /// Halt both timers for good
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Milliseconds of simulated wall time
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Let `elapsed_ms` pass, running due handlers against the arena.
    /// When both timers are due at the same instant the tick runs first.
    pub fn advance(&mut self, arena: &mut Arena, elapsed_ms: u64) -> Fired {
        let mut fired = Fired::default();
        if !self.running {
            return fired;
        }
        let target = self.now + elapsed_ms;

        loop {
            let tick_due = self.next_tick <= target;
            let second_due = self.next_second <= target;

            if tick_due && (!second_due || self.next_tick <= self.next_second) {
                if fired.ticks < MAX_SUBSTEPS {
                    tick(arena);
                    fired.ticks += 1;
                } else {
                    fired.dropped_ticks += 1;
                }
                self.next_tick += TICK_INTERVAL_MS;
            } else if second_due {
                second(arena);
                fired.seconds += 1;
                self.next_second += SECOND_INTERVAL_MS;
            } else {
                break;
            }
        }

        if fired.dropped_ticks > 0 {
            log::debug!("scheduler behind: dropped {} tick(s)", fired.dropped_ticks);
        }
        self.now = target;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_arena() -> Arena {
        let mut arena = Arena::new(7);
        arena.toggle_active();
        arena
    }

    #[test]
    fn test_tick_cadence() {
        let mut arena = running_arena();
        let mut clock = Scheduler::new();
        assert_eq!(clock.advance(&mut arena, 34).ticks, 0);
        assert_eq!(clock.advance(&mut arena, 1).ticks, 1);
        assert_eq!(clock.advance(&mut arena, 70).ticks, 2);
        assert_eq!(arena.ticks, 3);
    }

    #[test]
    fn test_second_cadence() {
        let mut arena = running_arena();
        let mut clock = Scheduler::new();
        let mut seconds = 0;
        for _ in 0..100 {
            seconds += clock.advance(&mut arena, 30).seconds;
        }
        // 3000 ms elapsed
        assert_eq!(seconds, 3);
        assert_eq!(clock.now(), 3000);
        assert_eq!(arena.time_left, 7);
    }

    #[test]
    fn test_substep_cap_drops_backlog() {
        let mut arena = running_arena();
        let mut clock = Scheduler::new();
        let fired = clock.advance(&mut arena, 35 * 20);
        assert_eq!(fired.ticks, MAX_SUBSTEPS);
        assert_eq!(fired.dropped_ticks, 20 - MAX_SUBSTEPS);
        // Next frame resumes at the normal cadence
        assert_eq!(clock.advance(&mut arena, 35).ticks, 1);
    }

    #[test]
    fn test_stop_halts_both_timers() {
        let mut arena = running_arena();
        let mut clock = Scheduler::new();
        clock.stop();
        let fired = clock.advance(&mut arena, 5000);
        assert_eq!(fired, Fired::default());
        assert_eq!(arena.ticks, 0);
        assert_eq!(arena.time_left, 10);
    }
}
