//! Waiting for a loaded document to settle.
//!
//! The engine is asked for the document's load state at a fixed interval;
//! the document counts as quiescent once it has reported `Idle` continuously
//! for the idle window. The whole wait shares one deadline with navigation.

use crate::RenderError;
use log::debug;
use std::time::{Duration, Instant};

/// What the engine reports about a document on one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Still loading the document, an image or a font
    Pending,
    /// Everything loaded
    Idle,
    /// An image finished loading but could not be decoded
    Broken,
}

impl LoadState {
    /// Map the engine's textual report; anything unrecognised is `Pending`
    pub fn parse(state: &str) -> Self {
        match state {
            "idle" => LoadState::Idle,
            "broken" => LoadState::Broken,
            _ => LoadState::Pending,
        }
    }
}

/// Poll timing, taken from `RenderConfig`
#[derive(Debug, Clone, Copy)]
pub struct Quiescence {
    pub poll_interval: Duration,
    pub idle_window: Duration,
}

impl Quiescence {
    /// Poll `check` until the document has been idle for the idle window.
    ///
    /// `check` receives the budget left before the deadline (`started +
    /// timeout`) and should bound its own engine call by it. A failed check
    /// is a `Timeout` once the deadline has passed, a `DocumentLoad` before.
    pub fn wait<F>(&self, started: Instant, timeout: Duration, mut check: F) -> Result<(), RenderError>
    where
        F: FnMut(Duration) -> Result<LoadState, String>,
    {
        let timed_out = || RenderError::Timeout(timeout.as_millis() as u64);
        let mut idle_since: Option<Instant> = None;

        loop {
            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(timed_out());
            }

            let state = check(remaining).map_err(|e| {
                if started.elapsed() >= timeout {
                    timed_out()
                } else {
                    RenderError::DocumentLoad(format!("Load probe failed: {}", e))
                }
            })?;

            match state {
                LoadState::Idle => {
                    let since = *idle_since.get_or_insert_with(Instant::now);
                    if since.elapsed() >= self.idle_window {
                        debug!("document quiescent after {}ms", started.elapsed().as_millis());
                        return Ok(());
                    }
                }
                LoadState::Broken => {
                    return Err(RenderError::DocumentLoad("an image in the document failed to load".into()));
                }
                LoadState::Pending => idle_since = None,
            }

            std::thread::sleep(self.poll_interval.min(timeout.saturating_sub(started.elapsed())));
        }
    }
}
