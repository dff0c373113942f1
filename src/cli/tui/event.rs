//! Terminal event polling

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Events delivered to the editor loop
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Nothing happened within one poll period
    Tick,
}

/// Reads crossterm events on a background thread
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Spawns the polling thread; it exits once the handler is dropped
    pub fn new(poll_ms: u64) -> Self {
        let poll = Duration::from_millis(poll_ms);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let next = if event::poll(poll).unwrap_or(false) {
                match event::read() {
                    // Release and repeat events would double every keystroke on some terminals
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Some(Event::Key(key))
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                    _ => None,
                }
            } else {
                Some(Event::Tick)
            };

            if let Some(evt) = next {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Blocks until the next event
    pub fn next(&self) -> Result<Event> {
        Ok(self.rx.recv()?)
    }
}
