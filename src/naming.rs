//! Artifact naming: titles become filesystem-safe PNG names.
//!
//! No collision handling: distinct titles that sanitize to the same token
//! share one artifact path, and the later render replaces the earlier file.

/// Extension of every rendered artifact
pub const ARTIFACT_EXTENSION: &str = "png";

/// Map every character outside `[A-Za-z0-9]` to `_`.
///
/// Works per Unicode scalar value, not per byte: `"🙂"` becomes `_`, not `____`.
/// An empty title yields `_` so the result is never empty.
pub fn sanitize(title: &str) -> String {
    if title.is_empty() {
        return "_".to_string();
    }
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// File name of the artifact rendered for `title`
pub fn name_for(title: &str) -> String {
    format!("{}.{}", sanitize(title), ARTIFACT_EXTENSION)
}
