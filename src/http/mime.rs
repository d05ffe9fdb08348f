use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Looks up the MIME type for a file extension, without the leading dot.
///
/// Unknown or empty extensions fall back to `application/octet-stream`.
pub fn mime_type_by_extension(ext: &str) -> &'static str {
    mime_guess::from_ext(ext)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
}

pub fn mime_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(mime_type_by_extension)
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Formats `t` as an RFC 1123 date in GMT, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_time(t: SystemTime) -> String {
    DateTime::<Utc>::from(t)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
