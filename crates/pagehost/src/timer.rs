use derive_more::{Display, From, Into};
use std::collections::BTreeMap;
use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct TimerId(pub u64);

/// Repeating timers, the `setInterval`/`clearInterval` pair.
pub trait Scheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId;
    /// Clearing an unknown or already cleared timer is a no-op.
    fn clear_interval(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    due_at: Duration,
}

/// Deterministic scheduler driven by explicit time advancement.
///
/// Timers fire in `(due_at, id)` order, so two timers due at the same
/// instant fire in creation order. Firing re-arms an interval at
/// `due_at + period`.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    next_id: u64,
    intervals: BTreeMap<TimerId, Interval>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.intervals.contains_key(&id)
    }

    pub fn due_at(&self, id: TimerId) -> Option<Duration> {
        self.intervals.get(&id).map(|i| i.due_at)
    }

    /// Moves the clock to the earliest timer due at or before `deadline`,
    /// re-arms it and returns its id. Callers run the timer's handler before
    /// asking for the next one, so handlers may add or clear timers.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerId> {
        let (id, interval) = self
            .intervals
            .iter_mut()
            .filter(|(_, i)| i.due_at <= deadline)
            .min_by_key(|(id, i)| (i.due_at, **id))?;

        self.now = self.now.max(interval.due_at);
        interval.due_at += interval.period;
        Some(*id)
    }

    /// Moves the clock forward to `deadline` without firing anything.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl Scheduler for VirtualClock {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.insert(
            id,
            Interval {
                period,
                due_at: self.now + period,
            },
        );
        log::trace!("interval {} armed every {:?}", id, period);
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        if self.intervals.remove(&id).is_some() {
            log::trace!("interval {} cleared", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(clock: &mut VirtualClock, deadline: Duration) -> Vec<(TimerId, Duration)> {
        let mut fired = Vec::new();
        while let Some(id) = clock.pop_due(deadline) {
            fired.push((id, clock.now()));
        }
        clock.settle(deadline);
        fired
    }

    #[test]
    fn test_interval_fires_every_period() {
        let mut clock = VirtualClock::new();
        let id = clock.set_interval(ms(100));

        let fired = drain(&mut clock, ms(350));
        assert_eq!(fired, vec![(id, ms(100)), (id, ms(200)), (id, ms(300))]);
        assert_eq!(clock.now(), ms(350));
        assert_eq!(clock.due_at(id), Some(ms(400)));
    }

    #[test]
    fn test_cleared_interval_never_fires() {
        let mut clock = VirtualClock::new();
        let id = clock.set_interval(ms(100));
        clock.clear_interval(id);
        clock.clear_interval(id);

        assert!(drain(&mut clock, ms(1000)).is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_same_due_time_fires_in_creation_order() {
        let mut clock = VirtualClock::new();
        let a = clock.set_interval(ms(50));
        let b = clock.set_interval(ms(50));

        let ids: Vec<_> = drain(&mut clock, ms(100)).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, a, b]);
    }

    #[test]
    fn test_rearming_mid_drain_uses_current_time() {
        let mut clock = VirtualClock::new();
        let first = clock.set_interval(ms(100));

        assert_eq!(clock.pop_due(ms(250)), Some(first));
        clock.clear_interval(first);
        let second = clock.set_interval(ms(100));
        assert_eq!(clock.due_at(second), Some(ms(200)));
        assert_eq!(clock.pop_due(ms(250)), Some(second));
        assert_eq!(clock.pop_due(ms(250)), None);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut clock = VirtualClock::new();
        let id = clock.set_interval(Duration::ZERO);
        assert_eq!(clock.due_at(id), Some(ms(1)));
        assert_eq!(drain(&mut clock, ms(3)).len(), 3);
    }
}
