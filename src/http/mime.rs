//! MIME type resolution
//!
//! Maps file extensions to Content-Type values. Overrides live in an
//! explicit immutable table built once at startup, not in a process-wide
//! registry.

use std::collections::HashMap;

/// Extension to Content-Type map with startup-time overrides.
///
/// Overrides win over the built-in table. `resolve` is a pure lookup with
/// no side effects; it is queried before every response's headers are
/// emitted.
#[derive(Debug)]
pub struct MimeMap {
    overrides: HashMap<&'static str, &'static str>,
}

impl MimeMap {
    /// Build a map from `(extension, content_type)` override pairs.
    pub fn with_overrides(overrides: &[(&'static str, &'static str)]) -> Self {
        Self {
            overrides: overrides.iter().copied().collect(),
        }
    }

    /// Resolve a file extension (without the dot) to a Content-Type.
    pub fn resolve(&self, extension: Option<&str>) -> &'static str {
        extension
            .and_then(|ext| self.overrides.get(ext).copied())
            .unwrap_or_else(|| default_content_type(extension))
    }
}

/// Built-in extension table, used when no override matches.
fn default_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Audio (character demos ship short voice clips)
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset_mime_map() -> MimeMap {
        MimeMap::with_overrides(&[("atlas", "text/plain"), ("json", "application/json")])
    }

    #[test]
    fn test_atlas_override() {
        let mime = asset_mime_map();
        assert_eq!(mime.resolve(Some("atlas")), "text/plain");
    }

    #[test]
    fn test_json_override() {
        let mime = asset_mime_map();
        assert_eq!(mime.resolve(Some("json")), "application/json");
    }

    #[test]
    fn test_default_table() {
        let mime = asset_mime_map();
        assert_eq!(mime.resolve(Some("html")), "text/html; charset=utf-8");
        assert_eq!(mime.resolve(Some("js")), "application/javascript");
        assert_eq!(mime.resolve(Some("png")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        let mime = asset_mime_map();
        assert_eq!(mime.resolve(Some("xyz")), "application/octet-stream");
        assert_eq!(mime.resolve(None), "application/octet-stream");
    }

    #[test]
    fn test_override_wins_over_default() {
        let mime = MimeMap::with_overrides(&[("png", "text/plain")]);
        assert_eq!(mime.resolve(Some("png")), "text/plain");
        // Extensions without an override still use the built-in table
        assert_eq!(mime.resolve(Some("gif")), "image/gif");
    }

    #[test]
    fn test_no_overrides() {
        let mime = MimeMap::with_overrides(&[]);
        // Without the atlas override the format would be served as a blob,
        // which the browser-side parser rejects
        assert_eq!(mime.resolve(Some("atlas")), "application/octet-stream");
    }
}
