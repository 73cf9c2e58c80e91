// Shared application state
// Read-only after startup; shared across connections via Arc

use std::path::PathBuf;

use super::Config;
use crate::http::mime::MimeMap;

/// Content-type overrides for the animation asset formats.
///
/// The atlas format is plain text without a registered MIME type; default
/// guessing would serve it as application/octet-stream and the browser-side
/// parser rejects it.
const MIME_OVERRIDES: [(&str, &str); 2] =
    [("atlas", "text/plain"), ("json", "application/json")];

/// Application state shared by all connections.
///
/// No request mutates this; there is no cache and no in-memory index.
pub struct AppState {
    pub config: Config,
    pub mime: MimeMap,
    pub asset_root: PathBuf,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let asset_root = PathBuf::from(&config.assets.root);
        Self {
            mime: MimeMap::with_overrides(&MIME_OVERRIDES),
            asset_root,
            config,
        }
    }
}
