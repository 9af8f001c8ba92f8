use pagehost::{Scheduler, TimerId};
use std::time::Duration;

/// The carousel's single repeating advance timer.
#[derive(Debug)]
pub struct Autoplay {
    period: Duration,
    handle: Option<TimerId>,
}

impl Autoplay {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.handle == Some(id)
    }

    /// Stops any running timer before arming a new one, so at most one is
    /// ever live.
    pub fn start<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.stop(scheduler);
        let id = scheduler.set_interval(self.period);
        log::debug!("autoplay armed as timer {} every {:?}", id, self.period);
        self.handle = Some(id);
    }

    pub fn stop<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.handle.take() {
            scheduler.clear_interval(id);
        }
    }

    pub fn restart<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.start(scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagehost::VirtualClock;

    #[test]
    fn test_start_replaces_running_timer() {
        let mut clock = VirtualClock::new();
        let mut autoplay = Autoplay::new(Duration::from_millis(2600));

        autoplay.start(&mut clock);
        autoplay.start(&mut clock);
        assert_eq!(clock.pending(), 1);
        assert!(autoplay.is_running());
    }

    #[test]
    fn test_stop_clears_timer() {
        let mut clock = VirtualClock::new();
        let mut autoplay = Autoplay::new(Duration::from_millis(2600));

        autoplay.start(&mut clock);
        autoplay.stop(&mut clock);
        autoplay.stop(&mut clock);
        assert_eq!(clock.pending(), 0);
        assert!(!autoplay.is_running());
    }

    #[test]
    fn test_restart_owns_new_handle() {
        let mut clock = VirtualClock::new();
        let mut autoplay = Autoplay::new(Duration::from_millis(2600));

        autoplay.start(&mut clock);
        let first = clock.pop_due(Duration::from_millis(2600)).unwrap();
        assert!(autoplay.owns(first));

        autoplay.restart(&mut clock);
        assert!(!autoplay.owns(first));
        assert!(!clock.is_active(first));
        assert_eq!(clock.pending(), 1);
    }
}
