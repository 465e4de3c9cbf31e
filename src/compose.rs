//! Layout composer: turns product fields into a self-contained HTML card.
//!
//! The template is filled in a single pass, so text that happens to look like
//! a placeholder (`{{TITLE}}`) inside a user value is never expanded again.
//! Every dynamic value is HTML-escaped before insertion.

use base64::Engine as Base64Engine;
use sha2::{Digest, Sha256};

/// A complete, renderable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    pub markup: String,
}

impl ComposedDocument {
    /// Hex sha256 of the markup, used in logs and golden tests
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.markup.as_bytes());
        hex::encode(hasher.finalize())
    }
}

const DEFAULT_LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="320" height="64" viewBox="0 0 320 64"><rect x="0" y="0" width="320" height="64" rx="16" fill="#00a890"/><text x="160" y="43" font-family="Helvetica, Arial, sans-serif" font-size="30" font-weight="600" text-anchor="middle" fill="#ffffff">artegen</text></svg>"##;

const CARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="pt-br">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Template Arte</title>
    <style>
        html, body { margin: 0; background: #ffffff; font-family: Helvetica, Arial, sans-serif; }
        .page { display: flex; flex-direction: column; justify-content: center; align-items: center; height: 100vh; padding: 20px; box-sizing: border-box; }
        .card { width: 100%; max-width: 1024px; height: 100%; padding: 0 32px; box-sizing: border-box; background: #ffffff; border: 1px solid #9ca3af; border-radius: 30px; display: flex; flex-direction: column; }
        .content { flex: 1; display: flex; flex-direction: column; align-items: center; padding: 40px 0; }
        .product-image { width: 75%; height: auto; max-height: 500px; margin-top: 40px; object-fit: cover; }
        .title { font-size: 60px; font-weight: 600; text-transform: capitalize; line-height: 1.25; color: #000000; text-align: center; margin: 128px 20px 20px; }
        .description { font-size: 45px; color: #4b5563; line-height: 1.375; text-align: center; margin: 40px 20px 0; white-space: pre-wrap; overflow-wrap: anywhere; }
        .price { margin-top: auto; width: 100%; padding: 28px 0; border: none; border-radius: 12px; background: #00a890; color: #ffffff; font-size: 48px; font-weight: 600; }
        .brand { width: 320px; margin: 40px 0; }
    </style>
</head>
<body>
    <div class="page">
        <div class="card">
            <div class="content">
                <img id="product-image" class="product-image" src="{{IMAGE}}" alt="">
                <h1 class="title">{{TITLE}}</h1>
                <p class="description">{{DESCRIPTION}}</p>
                <button class="price">{{PRICE}}</button>
            </div>
        </div>
        <img class="brand" src="{{BRAND}}" alt="">
    </div>
</body>
</html>
"#;

/// Composes product cards with a fixed layout and a configurable brand logo.
#[derive(Debug, Clone)]
pub struct LayoutComposer {
    brand_src: String,
}

impl Default for LayoutComposer {
    fn default() -> Self {
        Self {
            brand_src: default_logo_data_uri(),
        }
    }
}

impl LayoutComposer {
    /// Use `brand_src` (a URL or data URI) as the logo under the card
    pub fn with_brand(brand_src: impl Into<String>) -> Self {
        Self {
            brand_src: brand_src.into(),
        }
    }

    /// Build the card markup: image, title, description, price, brand logo.
    ///
    /// Pure and deterministic; identical inputs yield identical bytes.
    pub fn compose(&self, title: &str, description: &str, image_ref: &str, price: &str) -> ComposedDocument {
        let mut markup = String::with_capacity(CARD_TEMPLATE.len() + title.len() + description.len() + image_ref.len() + price.len());
        let mut rest = CARD_TEMPLATE;

        while let Some(start) = rest.find("{{") {
            markup.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                rest = &rest[start..];
                break;
            };
            let value = match &after[..end] {
                "IMAGE" => image_ref,
                "TITLE" => title,
                "DESCRIPTION" => description,
                "PRICE" => price,
                "BRAND" => self.brand_src.as_str(),
                _ => "",
            };
            push_escaped(&mut markup, value);
            rest = &after[end + 2..];
        }
        markup.push_str(rest);

        ComposedDocument { markup }
    }
}

/// Compose a card with the built-in brand logo
pub fn compose(title: &str, description: &str, image_ref: &str, price: &str) -> ComposedDocument {
    LayoutComposer::default().compose(title, description, image_ref, price)
}

/// Escape text for use in HTML element content or a quoted attribute value
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_escaped(&mut out, input);
    out
}

fn push_escaped(out: &mut String, input: &str) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn default_logo_data_uri() -> String {
    let b64 = Base64Engine::encode(&base64::engine::general_purpose::STANDARD, DEFAULT_LOGO_SVG);
    format!("data:image/svg+xml;base64,{}", b64)
}
