use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A repeating timer that owns its thread.
///
/// Dropping the timer stops it and joins the thread, so replacing a timer
/// (`self.timer = Some(ScopedTimer::start(..))`) never leaves the old one running.
pub struct ScopedTimer {
    cancel: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ScopedTimer {
    /// Call `on_tick` every `period` until dropped, or until `on_tick` returns false.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + period;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match cancel_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !on_tick() {
                            break;
                        }
                        deadline += period;
                    }
                    // explicit cancel or the timer was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::debug!("timer thread stopped");
        });

        Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn ticks_until_dropped() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let timer = ScopedTimer::start(Duration::from_millis(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        thread::sleep(Duration::from_millis(120));
        timer.cancel();
        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 2, "expected several ticks, got {after_cancel}");

        thread::sleep(Duration::from_millis(60));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn callback_can_stop_the_timer() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _timer = ScopedTimer::start(Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst) < 2
        });

        thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn replacing_a_timer_stops_the_old_one() {
        let first = Arc::new(AtomicUsize::new(0));
        let f = first.clone();
        let mut slot = Some(ScopedTimer::start(Duration::from_millis(5), move || {
            f.fetch_add(1, Ordering::SeqCst);
            true
        }));
        thread::sleep(Duration::from_millis(30));

        drop(slot.replace(ScopedTimer::start(Duration::from_secs(60), || true)));
        let frozen = first.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(first.load(Ordering::SeqCst), frozen);
        drop(slot);
    }

    #[test]
    fn drop_does_not_wait_for_a_long_period() {
        let started = Instant::now();
        let timer = ScopedTimer::start(Duration::from_secs(3600), || true);
        drop(timer);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
