//! Caption text shown next to each imported terrain.

use chrono::NaiveDateTime;
use corelib::{AssetIdentifier, Sol};

const CREDIT: &str = "NASA / JPL-CALTECH / phaseIV";
pub const UNTEXTURED_CAPTION: &str = "Texture not found";

/// Caption for a mesh; untextured meshes get a fixed notice.
pub fn caption(id: &AssetIdentifier, sol: Sol, capture_time: Option<&str>, textured: bool) -> String {
    if !textured {
        return UNTEXTURED_CAPTION.to_string();
    }

    let when = capture_time
        .map(|raw| format_capture_time(raw).unwrap_or_else(|| raw.to_string()))
        .unwrap_or_else(|| "unknown time".to_string());

    format!(
        "{} {} {} Image at Sol {}\n{} UTC\n{}",
        id.rover,
        id.eye(),
        id.camera,
        sol,
        when,
        CREDIT
    )
}

/// `2004-01-30T12:34:56.789Z` -> `30 Jan 2004 12:34:56`.
fn format_capture_time(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_matches('"').trim_end_matches('Z');
    NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.format("%d %b %Y %H:%M:%S").to_string())
}
