//! Chrome DevTools Protocol backend (uses the `headless_chrome` crate)

use crate::quiescence::{LoadState, Quiescence};
use crate::{RenderBackend, RenderConfig, RenderError, RenderSession, Viewport, VIEWPORT};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

// Reports "pending" until the document, its images and its fonts have
// finished loading; "broken" when an image completed without decoding.
const QUIESCENCE_PROBE: &str = r#"
(function() {
    if (document.readyState !== 'complete') return 'pending';
    const images = Array.from(document.images);
    if (images.some(function(img) { return !img.complete; })) return 'pending';
    if (document.fonts && document.fonts.status !== 'loaded') return 'pending';
    if (images.some(function(img) { return img.naturalWidth === 0; })) return 'broken';
    return 'idle';
})()
"#;

const CONTENT_HEIGHT_PROBE: &str = r#"
(function() {
    const doc = document.documentElement;
    const body = document.body;
    return Math.max(doc ? doc.scrollHeight : 0, body ? body.scrollHeight : 0);
})()
"#;

/// Launches one headless Chrome per render
#[derive(Debug, Clone, Default)]
pub struct CdpBackend;

impl CdpBackend {
    pub fn new() -> Self {
        CdpBackend
    }
}

impl RenderBackend for CdpBackend {
    type Session = CdpSession;

    fn launch(&self, config: &RenderConfig) -> Result<CdpSession, RenderError> {
        // Chrome exits on its own if it sees no traffic for this long, so it
        // must outlast the slowest stage.
        let idle_timeout = config.load_timeout().max(config.capture_timeout()) + Duration::from_secs(10);

        let mut builder = LaunchOptions::default_builder();
        builder
            .headless(config.headless)
            .sandbox(config.sandbox)
            .window_size(Some((VIEWPORT.width, VIEWPORT.height)))
            .idle_browser_timeout(idle_timeout);
        if let Some(path) = &config.chrome_path {
            builder.path(Some(path.clone()));
        }
        let launch_options = builder
            .build()
            .map_err(|e| RenderError::EngineLaunch(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| RenderError::EngineLaunch(format!("Failed to launch browser: {}", e)))?;

        Ok(CdpSession {
            browser,
            tab: None,
            viewport: VIEWPORT,
            quiescence: Quiescence {
                poll_interval: Duration::from_millis(config.quiescence_poll_ms),
                idle_window: Duration::from_millis(config.quiescence_idle_ms),
            },
        })
    }
}

/// A running Chrome instance with at most one tab.
///
/// Dropping the session drops the `Browser`, which kills the Chrome process.
pub struct CdpSession {
    browser: Browser,
    tab: Option<Arc<Tab>>,
    viewport: Viewport,
    quiescence: Quiescence,
}

impl CdpSession {
    fn tab(&self) -> Result<&Arc<Tab>, RenderError> {
        self.tab
            .as_ref()
            .ok_or_else(|| RenderError::DocumentLoad("no page is open".into()))
    }

    fn resize(&self, width: u32, height: u32) -> Result<(), RenderError> {
        self.tab()?
            .set_bounds(Bounds::Normal {
                left: Some(0),
                top: Some(0),
                width: Some(f64::from(width)),
                height: Some(f64::from(height)),
            })
            .map_err(|e| RenderError::Capture(format!("Failed to resize viewport: {}", e)))?;
        Ok(())
    }

    fn wait_for_quiescence(&self, started: Instant, timeout: Duration) -> Result<(), RenderError> {
        let tab = self.tab()?;
        self.quiescence.wait(started, timeout, |remaining| {
            tab.set_default_timeout(remaining);
            let value = tab
                .evaluate(QUIESCENCE_PROBE, false)
                .map_err(|e| e.to_string())?
                .value;
            Ok(LoadState::parse(value.as_ref().and_then(|v| v.as_str()).unwrap_or_default()))
        })
    }

    fn content_height(&self) -> Result<u32, RenderError> {
        let value = self
            .tab()?
            .evaluate(CONTENT_HEIGHT_PROBE, false)
            .map_err(|e| RenderError::Capture(format!("Failed to measure document: {}", e)))?
            .value
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Ok(value.max(0.0).ceil() as u32)
    }
}

impl RenderSession for CdpSession {
    fn open_page(&mut self) -> Result<(), RenderError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| RenderError::EngineLaunch(format!("Failed to create tab: {}", e)))?;
        self.tab = Some(tab);
        Ok(())
    }

    fn load_document(&mut self, url: &Url, timeout: Duration) -> Result<(), RenderError> {
        let started = Instant::now();
        let tab = self.tab()?;
        tab.set_default_timeout(timeout);

        tab.navigate_to(url.as_str())
            .map_err(|e| RenderError::DocumentLoad(format!("Navigation failed: {}", e)))?;

        tab.wait_until_navigated().map_err(|e| {
            if started.elapsed() >= timeout {
                RenderError::Timeout(timeout.as_millis() as u64)
            } else {
                RenderError::DocumentLoad(format!("Wait for navigation failed: {}", e))
            }
        })?;

        self.wait_for_quiescence(started, timeout)
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.resize(viewport.width, viewport.height)?;
        self.viewport = viewport;
        Ok(())
    }

    fn capture_full_page(&mut self, timeout: Duration) -> Result<Vec<u8>, RenderError> {
        let started = Instant::now();
        self.tab()?.set_default_timeout(timeout);

        let height = self.content_height()?;
        if height > self.viewport.height {
            debug!("growing surface to {}px for full-page capture", height);
            self.resize(self.viewport.width, height)?;
        }

        let png = self
            .tab()?
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| {
                if started.elapsed() >= timeout {
                    RenderError::Timeout(timeout.as_millis() as u64)
                } else {
                    RenderError::Capture(format!("Screenshot failed: {}", e))
                }
            })?;

        Ok(png)
    }

    fn shutdown(self) -> Result<(), RenderError> {
        let closed = match self.tab {
            Some(tab) => tab
                .close(false)
                .map(|_| ())
                .map_err(|e| RenderError::Shutdown(format!("Failed to close tab: {}", e))),
            None => Ok(()),
        };
        // Dropping the browser terminates the Chrome child process.
        drop(self.browser);
        closed
    }
}
