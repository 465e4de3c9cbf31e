use anyhow::Context;
use artegen::{RenderConfig, RenderRequest};
use clap::Parser;
use std::path::PathBuf;

/// Render a product card (image, title, description, price) to a 1080x1920 PNG
#[derive(Parser, Debug)]
#[command(name = "artegen", version, about)]
struct Cli {
    /// Product name, shown as the heading and used for the file name
    #[arg(long, required_unless_present = "request")]
    title: Option<String>,

    /// Product description
    #[arg(long, required_unless_present = "request")]
    description: Option<String>,

    /// Price label, shown verbatim
    #[arg(long, required_unless_present = "request")]
    price: Option<String>,

    /// Path or URL of the product image
    #[arg(long, required_unless_present = "request")]
    image: Option<String>,

    /// Directory the PNG is written to
    #[arg(long, default_value = "artes")]
    output_dir: PathBuf,

    /// Read the whole request from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["title", "description", "price", "image"])]
    request: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the Chrome/Chromium executable
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Load timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Disable the Chrome sandbox (needed when running as root in containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Print the artifact as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn render_config(&self) -> anyhow::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)?,
            None => RenderConfig::default(),
        };
        if let Some(chrome) = &self.chrome {
            config.chrome_path = Some(chrome.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config.load_timeout_ms = ms;
        }
        if self.no_sandbox {
            config.sandbox = false;
        }
        config.validate()?;
        Ok(config)
    }

    fn render_request(&self) -> anyhow::Result<RenderRequest> {
        if let Some(path) = &self.request {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let request: RenderRequest =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
            return Ok(request);
        }
        Ok(RenderRequest::new(
            self.title.clone().unwrap_or_default(),
            self.description.clone().unwrap_or_default(),
            self.image.clone().unwrap_or_default(),
            self.price.clone().unwrap_or_default(),
            self.output_dir.clone(),
        ))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.render_config()?;
    let request = cli.render_request()?;

    let pipeline = artegen::new_pipeline(config)?;
    match pipeline.run(&request) {
        Ok(artifact) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            } else {
                println!("{}", artifact.file_path.display());
            }
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.public_message());
            std::process::exit(1);
        }
    }
}
