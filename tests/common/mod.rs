//! In-process backend that records what the pipeline asks of it.

#![allow(dead_code)]

use artegen::{RenderBackend, RenderConfig, RenderError, RenderSession, Viewport};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Launch,
    Load,
    Quiescence,
    Capture,
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub markup: String,
}

#[derive(Clone, Default)]
pub struct Recorder {
    launches: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
    loaded: Arc<Mutex<Vec<LoadedDocument>>>,
    viewports: Arc<Mutex<Vec<Viewport>>>,
}

impl Recorder {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn loaded(&self) -> Vec<LoadedDocument> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn viewports(&self) -> Vec<Viewport> {
        self.viewports.lock().unwrap().clone()
    }
}

pub struct ScriptedBackend {
    pub recorder: Recorder,
    pub fail_at: FailAt,
    pub load_delay: Duration,
}

impl ScriptedBackend {
    pub fn new(fail_at: FailAt) -> Self {
        Self {
            recorder: Recorder::default(),
            fail_at,
            load_delay: Duration::ZERO,
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }
}

pub struct ScriptedSession {
    recorder: Recorder,
    fail_at: FailAt,
    load_delay: Duration,
    markup: String,
}

impl RenderBackend for ScriptedBackend {
    type Session = ScriptedSession;

    fn launch(&self, _config: &RenderConfig) -> Result<ScriptedSession, RenderError> {
        if self.fail_at == FailAt::Launch {
            return Err(RenderError::EngineLaunch("chrome not found".into()));
        }
        self.recorder.launches.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            recorder: self.recorder.clone(),
            fail_at: self.fail_at,
            load_delay: self.load_delay,
            markup: String::new(),
        })
    }
}

impl RenderSession for ScriptedSession {
    fn open_page(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn load_document(&mut self, url: &Url, timeout: Duration) -> Result<(), RenderError> {
        std::thread::sleep(self.load_delay);
        let path = url
            .to_file_path()
            .map_err(|_| RenderError::DocumentLoad(format!("not a file url: {}", url)))?;
        let markup = std::fs::read_to_string(&path).map_err(|e| RenderError::DocumentLoad(e.to_string()))?;
        self.recorder.loaded.lock().unwrap().push(LoadedDocument {
            path,
            markup: markup.clone(),
        });

        match self.fail_at {
            FailAt::Load => Err(RenderError::DocumentLoad("an image in the document failed to load".into())),
            FailAt::Quiescence => Err(RenderError::Timeout(timeout.as_millis() as u64)),
            _ => {
                self.markup = markup;
                Ok(())
            }
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.recorder.viewports.lock().unwrap().push(viewport);
        Ok(())
    }

    fn capture_full_page(&mut self, _timeout: Duration) -> Result<Vec<u8>, RenderError> {
        if self.fail_at == FailAt::Capture {
            return Err(RenderError::Capture("target closed".into()));
        }
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(self.markup.as_bytes());
        Ok(png)
    }

    fn shutdown(self) -> Result<(), RenderError> {
        self.recorder.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Files left in `dir`, or zero when it does not exist
pub fn file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
