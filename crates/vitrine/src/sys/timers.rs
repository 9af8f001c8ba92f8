use crate::events::{AppEvent, UiEvent};
use async_channel::Sender;
use pagehost::{Scheduler, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Wall-clock intervals. Each timer is a tokio task posting
/// [`UiEvent::Tick`] into the event channel, so ticks are handled on the
/// same loop as every other event.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioTimers {
    tx: Sender<AppEvent>,
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioTimers {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self {
            tx,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    pub fn active(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioTimers {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let period = period.max(MIN_PERIOD);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::Ui(UiEvent::Tick(id))).await.is_err() {
                    break;
                }
            }
        });

        log::trace!("timer {} every {:?}", id, period);
        self.tasks.insert(id, handle);
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_interval_posts_ticks() {
        let (tx, rx) = async_channel::unbounded();
        let mut timers = TokioTimers::new(tx);
        let id = timers.set_interval(Duration::from_millis(5));

        for _ in 0..2 {
            let event = timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(event, AppEvent::Ui(UiEvent::Tick(id)));
        }
    }

    #[tokio::test]
    async fn test_cleared_interval_goes_quiet() {
        let (tx, rx) = async_channel::unbounded();
        let mut timers = TokioTimers::new(tx);
        let id = timers.set_interval(Duration::from_millis(5));
        timers.clear_interval(id);
        timers.clear_interval(id);
        assert_eq!(timers.active(), 0);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (tx, _rx) = async_channel::unbounded();
        let mut timers = TokioTimers::new(tx);
        let a = timers.set_interval(Duration::from_secs(60));
        let b = timers.set_interval(Duration::from_secs(60));
        assert_ne!(a, b);
        assert_eq!(timers.active(), 2);
    }
}
