use std::sync::mpsc::{self, Receiver, RecvError, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Milliseconds between heartbeat ticks
pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of events driving the app loop
pub trait EventSource {
    /// Block until the next event; Err means every producer is gone
    fn next(&self) -> Result<AppEvent, RecvError>;

    /// Throw away everything currently queued. Run after a handler that
    /// blocked the loop, so held-back heartbeats are not replayed into
    /// the state it produced.
    fn drain_backlog(&self);
}

/// Production source: a crossterm read thread and a fixed-rate ticker
/// thread feed one channel, so ticks keep arriving while keys are held down
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        let tick_tx: Sender<AppEvent> = tx.clone();
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(TICK_RATE_MS));
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl EventSource for CrosstermEventSource {
    fn next(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }

    fn drain_backlog(&self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Scriptable source for headless tests; the loop ends when the script
/// sender is dropped
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    pub fn pair() -> (Sender<AppEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl EventSource for TestEventSource {
    fn next(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }

    fn drain_backlog(&self) {
        while self.rx.try_recv().is_ok() {}
    }
}
