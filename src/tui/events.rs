use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEvent};

use crate::api::DailyTimings;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// One-second countdown tick from the dashboard timer.
    Tick,
    /// Result of a day fetch. `request` lets the app drop answers to superseded requests.
    Timings {
        request: u64,
        result: Result<DailyTimings, String>,
    },
    Week {
        request: u64,
        days: Vec<DailyTimings>,
    },
}

pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EventHandler {
    /// Start forwarding terminal key presses. Other producers push through [`sender`](Self::sender).
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let key_tx = tx.clone();
        let key_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !key_stop.load(Ordering::Relaxed) {
                if event::poll(POLL_INTERVAL).unwrap_or(false) {
                    match event::read() {
                        Ok(CEvent::Key(key)) => {
                            if key_tx.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }
            }
        });

        Self {
            tx,
            rx,
            stop,
            handle: Some(handle),
        }
    }

    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
