//! Embedded static asset serving

use rust_embed::RustEmbed;

/// Static files compiled into the binary at build time
#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Asset lookup errors, mapped to 403/404 by the router
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AssetError {
    #[error("Forbidden")]
    Forbidden,

    #[error("File not found")]
    NotFound,
}

/// A resolved asset ready to be served
#[derive(Debug)]
pub struct Asset {
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

/// Resolve a requested file name against the embedded asset store.
///
/// An empty name defaults to `index.html`. Names with parent-directory
/// segments, absolute paths, or backslashes are rejected before lookup.
pub fn lookup(name: &str) -> Result<Asset, AssetError> {
    let name = if name.is_empty() { "index.html" } else { name };

    if !is_safe_path(name) {
        return Err(AssetError::Forbidden);
    }

    let file = Assets::get(name).ok_or(AssetError::NotFound)?;

    Ok(Asset {
        data: file.data.into_owned(),
        content_type: content_type_for(name),
    })
}

/// Segment-wise traversal check. The embedded store is keyed by exact
/// relative path, so this is belt-and-braces rather than the only line of
/// defense, but probing requests still deserve a 403.
fn is_safe_path(name: &str) -> bool {
    if name.starts_with('/') || name.contains('\\') {
        return false;
    }
    name.split('/').all(|segment| segment != "..")
}

/// Content type from file extension
fn content_type_for(name: &str) -> &'static str {
    match std::path::Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        _ => "application/octet-stream",
    }
}
