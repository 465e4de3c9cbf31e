//! Artegen
//!
//! Renders product cards to PNG: title, description, price and an uploaded
//! image are composed into a fixed HTML layout, loaded in a headless browser
//! and captured as a full-page 1080x1920 screenshot.
//!
//! # Features
//!
//! - **CDP Backend** (default): drives headless Chrome through the DevTools Protocol
//! - **Scoped sessions**: the engine is shut down on every exit path
//! - **Per-call temporary documents**: concurrent renders never share a file
//!
//! # Example
//!
//! ```no_run
//! use artegen::{RenderConfig, RenderRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = artegen::new_pipeline(RenderConfig::default())?;
//! let request = RenderRequest::new("Red Shoes", "Comfortable running shoes", "uploads/shoes.png", "$49.99", "artes");
//! let artifact = pipeline.run(&request)?;
//! println!("Rendered {}", artifact.file_path.display());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod error;
pub use error::{PipelineError, RenderError, Result, Stage};

pub mod config;
pub use config::{RenderConfig, Viewport, VIEWPORT};

pub mod compose;
pub use compose::{compose, ComposedDocument, LayoutComposer};

pub mod naming;
pub use naming::name_for;

pub mod driver;
pub use driver::{RenderDriver, SessionGuard};

pub mod pipeline;
pub use pipeline::Pipeline;

pub mod quiescence;

// Async-friendly facade (worker-thread backed)
pub mod async_api;
pub use async_api::Renderer;

#[cfg(feature = "cdp")]
pub mod cdp;

/// Product data for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Shown as the card heading and used to name the artifact
    pub title: String,
    /// Body text, shown verbatim
    pub description: String,
    /// Local path or URI of the uploaded image; only read, never removed
    pub image_reference: String,
    /// Price label, shown verbatim
    pub price: String,
    /// Where the artifact is written; created when missing
    pub output_directory: PathBuf,
}

impl RenderRequest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_reference: impl Into<String>,
        price: impl Into<String>,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_reference: image_reference.into(),
            price: price.into(),
            output_directory: output_directory.into(),
        }
    }

    /// Check that every required field is present.
    ///
    /// Whitespace counts as content: a blank-looking title still names an
    /// artifact (`"   "` becomes `___.png`) and prices are opaque labels.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("image_reference", self.image_reference.as_str()),
            ("price", self.price.as_str()),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(PipelineError::InvalidRequest(format!("{} must not be empty", field)));
            }
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(PipelineError::InvalidRequest("output_directory must not be empty".into()));
        }
        Ok(())
    }
}

/// A rendered PNG on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub file_path: PathBuf,
}

impl Artifact {
    /// Bare file name, e.g. `Red_Shoes.png`
    pub fn file_name(&self) -> Option<&str> {
        self.file_path.file_name().and_then(|n| n.to_str())
    }

    /// Root-relative link under which a static file server exposes the artifact
    pub fn public_path(&self) -> Option<String> {
        self.file_name().map(|n| format!("/{}", n))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// A rendering engine that can be launched once per render
pub trait RenderBackend: Send + Sync {
    type Session: RenderSession;

    /// Start an engine instance
    fn launch(&self, config: &RenderConfig) -> std::result::Result<Self::Session, RenderError>;
}

/// One running engine instance, exclusively owned by a single render
pub trait RenderSession {
    /// Open the surface (page) documents are loaded into
    fn open_page(&mut self) -> std::result::Result<(), RenderError>;

    /// Load a document by URL and block until it is quiescent or `timeout` expires
    fn load_document(&mut self, url: &url::Url, timeout: Duration) -> std::result::Result<(), RenderError>;

    /// Resize the output surface
    fn set_viewport(&mut self, viewport: Viewport) -> std::result::Result<(), RenderError>;

    /// Capture the whole document, beyond the viewport height, as PNG bytes
    fn capture_full_page(&mut self, timeout: Duration) -> std::result::Result<Vec<u8>, RenderError>;

    /// Terminate the engine instance
    fn shutdown(self) -> std::result::Result<(), RenderError>
    where
        Self: Sized;
}

/// Create a pipeline backed by headless Chrome
#[cfg(feature = "cdp")]
pub fn new_pipeline(config: RenderConfig) -> Result<Pipeline<cdp::CdpBackend>> {
    Pipeline::new(cdp::CdpBackend::new(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let ok = RenderRequest::new("Red Shoes", "Comfortable", "shoes.png", "$49.99", "artes");
        assert!(ok.validate().is_ok());

        let missing_title = RenderRequest::new("", "Comfortable", "shoes.png", "$49.99", "artes");
        let err = missing_title.validate().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRequest(ref m) if m.contains("title")));

        let blank = RenderRequest::new("   ", " ", "shoes.png", " ", "artes");
        assert!(blank.validate().is_ok());

        let missing_dir = RenderRequest::new("t", "d", "i.png", "p", "");
        assert!(missing_dir.validate().is_err());
    }

    #[test]
    fn test_request_from_json() {
        let req: RenderRequest = serde_json::from_str(
            r#"{"title":"Red Shoes","description":"Comfortable","image_reference":"a.png","price":"$1","output_directory":"artes"}"#,
        )
        .unwrap();
        assert_eq!(req.output_directory, PathBuf::from("artes"));
    }

    #[test]
    fn test_artifact_paths() {
        let artifact = Artifact {
            file_path: PathBuf::from("artes").join("Red_Shoes.png"),
        };
        assert_eq!(artifact.file_name(), Some("Red_Shoes.png"));
        assert_eq!(artifact.public_path().as_deref(), Some("/Red_Shoes.png"));
    }
}
