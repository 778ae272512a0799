use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::timer::Timer;

/// How long the runner waits for input while no tick is scheduled
pub const IDLE_POLL: Duration = Duration::from_millis(250);

/// Unified event type consumed by the app dispatcher
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The event source is gone and no tick is pending
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a helper thread
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // key release/repeat reports would double-type on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal event reader stopped");
                    break;
                }
            };

            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Event source fed from a channel, for tests and headless runs
pub struct ChannelEventSource {
    rx: Receiver<AppEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that yields the next input event or timer tick, one at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    idle_poll: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self {
            event_source,
            idle_poll: IDLE_POLL,
        }
    }

    pub fn with_idle_poll(mut self, idle_poll: Duration) -> Self {
        self.idle_poll = idle_poll;
        self
    }

    /// Blocks until input arrives or the timer's tick is due.
    ///
    /// A due tick is returned before any pending input. Returns `None` when
    /// the wait ended with nothing to deliver, and [`AppEvent::Closed`] once
    /// the source has disconnected and the timer is unarmed.
    pub fn step(&self, timer: &mut Timer) -> Option<AppEvent> {
        if timer.fire(Instant::now()) {
            return Some(AppEvent::Tick);
        }

        let timeout = timer.remaining(Instant::now()).unwrap_or(self.idle_poll);
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => timer.fire(Instant::now()).then_some(AppEvent::Tick),
            Err(RecvTimeoutError::Disconnected) if !timer.is_armed() => Some(AppEvent::Closed),
            Err(RecvTimeoutError::Disconnected) => {
                // no more input will arrive; keep the countdown going
                std::thread::sleep(timeout);
                timer.fire(Instant::now()).then_some(AppEvent::Tick)
            }
        }
    }
}
