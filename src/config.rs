//! Render configuration
//!
//! The defaults are conservative: generous timeouts, sandboxed headless
//! Chrome, temporary documents in the system temp directory.

use crate::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output surface dimensions in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// The single viewport every artifact is rendered at
pub const VIEWPORT: Viewport = Viewport {
    width: 1080,
    height: 1920,
};

impl Default for Viewport {
    fn default() -> Self {
        VIEWPORT
    }
}

/// Configuration for the render pipeline and its engine sessions
///
/// # Examples
///
/// ```
/// let cfg = artegen::RenderConfig::default();
/// assert_eq!(cfg.load_timeout_ms, 30000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound for the document to reach load quiescence
    pub load_timeout_ms: u64,
    /// Upper bound for the screenshot capture
    pub capture_timeout_ms: u64,
    /// Interval between quiescence probes
    pub quiescence_poll_ms: u64,
    /// How long the document must stay idle to count as quiescent
    pub quiescence_idle_ms: u64,
    /// Directory for temporary documents (system temp dir when unset)
    pub temp_dir: Option<PathBuf>,
    /// Explicit Chrome/Chromium executable
    pub chrome_path: Option<PathBuf>,
    /// Run Chrome with its sandbox enabled
    pub sandbox: bool,
    /// Run Chrome headless
    pub headless: bool,
    /// Logo shown under the card: local path or URL (built-in wordmark when unset)
    pub branding_logo: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 30000,
            capture_timeout_ms: 30000,
            quiescence_poll_ms: 100,
            quiescence_idle_ms: 500,
            temp_dir: None,
            chrome_path: None,
            sandbox: true,
            headless: true,
            branding_logo: None,
        }
    }
}

impl RenderConfig {
    /// Load a configuration from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: RenderConfig =
            serde_json::from_str(raw).map_err(|e| PipelineError::Config(format!("Failed to parse config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.load_timeout_ms == 0 || self.capture_timeout_ms == 0 {
            return Err(PipelineError::Config("timeouts must be greater than zero".into()));
        }
        if self.quiescence_poll_ms == 0 {
            return Err(PipelineError::Config("quiescence_poll_ms must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub(crate) fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.load_timeout_ms, 30000);
        assert!(config.sandbox);
        assert!(config.headless);
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn test_viewport_is_portrait_hd() {
        assert_eq!(VIEWPORT.width, 1080);
        assert_eq!(VIEWPORT.height, 1920);
        assert_eq!(Viewport::default(), VIEWPORT);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = RenderConfig::from_json_str(r#"{ "load_timeout_ms": 5000, "sandbox": false }"#).unwrap();
        assert_eq!(cfg.load_timeout_ms, 5000);
        assert!(!cfg.sandbox);
        assert_eq!(cfg.capture_timeout_ms, 30000);
    }

    #[test]
    fn rejects_zero_timeouts() {
        let err = RenderConfig::from_json_str(r#"{ "load_timeout_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(RenderConfig::from_json_str("{ nope"), Err(PipelineError::Config(_))));
    }
}
