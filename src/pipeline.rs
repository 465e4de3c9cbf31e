//! Pipeline orchestrator: compose, materialize, render, clean up.
//!
//! Each run writes its document to its own uniquely named temporary file,
//! so concurrent runs on one `Pipeline` never touch each other's input. The
//! temporary file is removed on every exit path: explicitly after the render,
//! or by its drop guard when an earlier step bails out.

use crate::driver::RenderDriver;
use crate::{
    name_for, Artifact, ComposedDocument, LayoutComposer, PipelineError, RenderBackend, RenderConfig, RenderError,
    RenderRequest, Result, Stage,
};
use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;
use url::Url;

/// Turns `RenderRequest`s into PNG artifacts using backend `B`
pub struct Pipeline<B: RenderBackend> {
    driver: RenderDriver<B>,
    composer: LayoutComposer,
}

impl<B: RenderBackend> Pipeline<B> {
    pub fn new(backend: B, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let composer = match &config.branding_logo {
            Some(logo) => LayoutComposer::with_brand(resolve_reference(logo)?),
            None => LayoutComposer::default(),
        };
        Ok(Self {
            driver: RenderDriver::new(backend, config),
            composer,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        self.driver.config()
    }

    pub fn backend(&self) -> &B {
        self.driver.backend()
    }

    /// Render one product card and return the artifact it produced.
    ///
    /// An existing artifact with the same sanitized name is replaced.
    pub fn run(&self, request: &RenderRequest) -> Result<Artifact> {
        request.validate()?;
        let started = Instant::now();

        debug!("stage: {}", Stage::Composing);
        let image_src = resolve_reference(&request.image_reference)?;
        let document = self
            .composer
            .compose(&request.title, &request.description, &image_src, &request.price);
        debug!("composed document sha256={}", document.digest());

        debug!("stage: {}", Stage::Materializing);
        let temp = self.materialize(&document)?;

        debug!("stage: {}", Stage::PreparingOutput);
        std::fs::create_dir_all(&request.output_directory).map_err(|e| PipelineError::io(Stage::PreparingOutput, e))?;
        let output_path = request.output_directory.join(name_for(&request.title));

        debug!("stage: {}", Stage::Rendering);
        let rendered = self.driver.render(temp.path(), &output_path);

        debug!("stage: {}", Stage::Cleaning);
        let cleaned = temp.close();

        match rendered {
            Ok(()) => {
                cleaned.map_err(|e| PipelineError::io(Stage::Cleaning, e))?;
                info!(
                    "rendered {} in {}ms",
                    output_path.display(),
                    started.elapsed().as_millis()
                );
                Ok(Artifact { file_path: output_path })
            }
            Err(e) => {
                if let Err(c) = cleaned {
                    warn!("failed to remove temporary document: {}", c);
                }
                warn!("render failed: {}", e);
                Err(e.into())
            }
        }
    }

    fn materialize(&self, document: &ComposedDocument) -> Result<NamedTempFile> {
        let dir = self.config().temp_dir();
        std::fs::create_dir_all(&dir).map_err(|e| PipelineError::io(Stage::Materializing, e))?;

        let mut file = tempfile::Builder::new()
            .prefix("artegen-")
            .suffix(".html")
            .tempfile_in(&dir)
            .map_err(|e| PipelineError::io(Stage::Materializing, e))?;
        file.write_all(document.markup.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| PipelineError::io(Stage::Materializing, e))?;
        Ok(file)
    }
}

/// Resolve an image or logo reference to a URL string usable from a `file://` document.
///
/// `http`, `https` and `data` URIs pass through. `file` URIs and bare paths
/// must point at an existing file; relative paths resolve against the
/// working directory.
pub fn resolve_reference(reference: &str) -> std::result::Result<String, RenderError> {
    if let Ok(url) = Url::parse(reference) {
        match url.scheme() {
            "http" | "https" | "data" => return Ok(url.into()),
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| RenderError::DocumentLoad(format!("Not a local file URL: {}", reference)))?;
                ensure_file(&path)?;
                return Ok(url.into());
            }
            _ => {}
        }
    }

    let absolute = std::path::absolute(reference)
        .map_err(|e| RenderError::DocumentLoad(format!("Failed to resolve {}: {}", reference, e)))?;
    ensure_file(&absolute)?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| RenderError::DocumentLoad(format!("Not a valid file path: {}", absolute.display())))
}

fn ensure_file(path: &Path) -> std::result::Result<(), RenderError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RenderError::DocumentLoad(format!("Image not found: {}", path.display())))
    }
}
