use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Terminal input as seen by the speed test host
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
    /// the event source hung up; nothing more will arrive
    Closed,
}

/// Source of terminal events
pub trait HostEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<HostEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // key release/repeat reports would double count keystrokes
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(HostEvent::Key(key))
                }
                Ok(CtEvent::Paste(text)) => Some(HostEvent::Paste(text)),
                Ok(CtEvent::Resize(_, _)) => Some(HostEvent::Resize),
                Ok(_) => None,
                Err(e) => {
                    log::error!("terminal event read failed: {e}");
                    break;
                }
            };

            if let Some(evt) = evt {
                if tx.send(evt).is_err() {
                    break;
                }
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

impl HostEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for headless runs and tests
pub struct ChannelEventSource {
    rx: Receiver<HostEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<HostEvent>) -> Self {
        Self { rx }
    }
}

impl HostEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Yields the next host event, a tick when the interval passes quietly, or
/// [`HostEvent::Closed`] once the source is gone
pub struct Runner<E: HostEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: HostEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn step(&self) -> HostEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => HostEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("terminal event source disconnected");
                HostEvent::Closed
            }
        }
    }
}
