use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, error};

use crate::Event;

/// The only source of timer ticks.
///
/// While armed, a background thread posts `Event::Tick` into the event channel once per
/// interval. It never touches the application state itself.
///
/// Each arming starts a new generation. Ticks carry the generation they were sent in, so
/// ticks still queued from an earlier arming can be told apart.
pub struct Ticker {
    interval: Duration,
    events: Sender<Event>,
    pub(crate) generation: u64,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    #[must_use]
    pub fn new(interval: Duration, events: Sender<Event>) -> Self {
        Self {
            interval,
            events,
            generation: 0,
            stop: None,
            handle: None,
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.stop.is_some()
    }

    /// Whether a tick of the given generation belongs to the current arming.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_armed() && generation == self.generation
    }

    /// Starts ticking. Does nothing if already armed.
    pub fn arm(&mut self) {
        if self.is_armed() {
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        let (stop, stopped) = mpsc::channel::<()>();
        let events = self.events.clone();
        let interval = self.interval;
        self.handle = Some(thread::spawn(move || {
            loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(Event::Tick(generation)).is_err() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }));
        self.stop = Some(stop);
        debug!("ticker armed, generation {generation}");
    }

    /// Stops ticking and waits for the tick thread to exit.
    pub fn disarm(&mut self) {
        if self.stop.take().is_none() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("tick thread panicked");
            }
        }
        debug!("ticker disarmed");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}
