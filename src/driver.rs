//! Render driver: one engine session per render, always shut down.

use crate::{RenderBackend, RenderConfig, RenderError, RenderSession, VIEWPORT};
use log::{debug, warn};
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Owns a running session and shuts it down when dropped.
///
/// `close` shuts down explicitly and reports the result; a guard dropped
/// during unwinding or an early return still terminates the engine.
pub struct SessionGuard<S: RenderSession> {
    session: Option<S>,
}

impl<S: RenderSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session: Some(session) }
    }

    pub fn session_mut(&mut self) -> &mut S {
        match self.session.as_mut() {
            Some(session) => session,
            None => unreachable!("session is only taken by close or drop"),
        }
    }

    /// Shut the session down now
    pub fn close(mut self) -> Result<(), RenderError> {
        match self.session.take() {
            Some(session) => session.shutdown(),
            None => Ok(()),
        }
    }
}

impl<S: RenderSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.shutdown() {
                warn!("engine shutdown failed: {}", e);
            }
        }
    }
}

/// Drives one backend session per `render` call
pub struct RenderDriver<B: RenderBackend> {
    backend: B,
    config: RenderConfig,
}

impl<B: RenderBackend> RenderDriver<B> {
    pub fn new(backend: B, config: RenderConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the document at `document_path` into a PNG at `output_path`.
    ///
    /// The document is loaded by reference; the driver never modifies or
    /// removes it. The engine is terminated before this returns, whether or
    /// not a stage failed.
    pub fn render(&self, document_path: &Path, output_path: &Path) -> Result<(), RenderError> {
        let started = Instant::now();
        let url = document_url(document_path)?;

        debug!("launching engine for {}", url);
        let session = self.backend.launch(&self.config)?;
        let mut guard = SessionGuard::new(session);

        let outcome = self.drive(guard.session_mut(), &url, output_path);

        if let Err(e) = guard.close() {
            warn!("engine shutdown failed: {}", e);
        }

        if outcome.is_ok() {
            debug!("render finished in {}ms", started.elapsed().as_millis());
        }
        outcome
    }

    fn drive(&self, session: &mut B::Session, url: &Url, output_path: &Path) -> Result<(), RenderError> {
        session.open_page()?;
        session.load_document(url, self.config.load_timeout())?;
        session.set_viewport(VIEWPORT)?;
        let png = session.capture_full_page(self.config.capture_timeout())?;

        if png.is_empty() {
            return Err(RenderError::Capture("engine returned an empty image".into()));
        }
        std::fs::write(output_path, &png)
            .map_err(|e| RenderError::Capture(format!("Failed to write {}: {}", output_path.display(), e)))?;
        Ok(())
    }
}

/// `file://` URL for a local document, made absolute first
pub fn document_url(path: &Path) -> Result<Url, RenderError> {
    let absolute = std::path::absolute(path)
        .map_err(|e| RenderError::DocumentLoad(format!("Failed to resolve {}: {}", path.display(), e)))?;
    Url::from_file_path(&absolute)
        .map_err(|_| RenderError::DocumentLoad(format!("Not a valid file path: {}", absolute.display())))
}
