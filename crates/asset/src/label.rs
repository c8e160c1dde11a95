//! PDS label parser.
//!
//! The label is a `KEY = VALUE` text block at the head of an `.IMG` file,
//! terminated by a bare `END` line. Only three sections are tracked:
//! `OBJECT = IMAGE`, `OBJECT = IMAGE_HEADER` and
//! `GROUP = ROVER_COORDINATE_SYSTEM`.

use corelib::Vec3;

use crate::error::{AssetError, AssetResult};

/// Structural and geometric metadata of an image product.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelMetadata {
    pub lines: usize,
    pub line_samples: usize,
    pub sample_bits: u32,
    pub sample_type: String,
    /// Length of the binary image header preceding the payload.
    pub header_bytes: usize,
    /// Rover origin in mesh axes (Y, X, -Z), unscaled.
    pub origin_offset: Vec3,
    /// Last `START_TIME` in the label, exactly as written.
    pub capture_time: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Block {
    None,
    Image,
    ImageHeader,
    RoverCoordinateSystem,
}

impl Block {
    fn entered_by(key: &str, value: &str) -> Option<Self> {
        match (key, value) {
            ("OBJECT", "IMAGE") => Some(Block::Image),
            ("OBJECT", "IMAGE_HEADER") => Some(Block::ImageHeader),
            ("GROUP", "ROVER_COORDINATE_SYSTEM") => Some(Block::RoverCoordinateSystem),
            _ => None,
        }
    }

    fn exited_by(self, key: &str, value: &str) -> bool {
        matches!(
            (self, key, value),
            (Block::Image, "END_OBJECT", "IMAGE")
                | (Block::ImageHeader, "END_OBJECT", "IMAGE_HEADER")
                | (Block::RoverCoordinateSystem, "END_GROUP", "ROVER_COORDINATE_SYSTEM")
        )
    }
}

/// Convenience helper to parse a label held in a string.
pub fn load_label_from_str(contents: &str) -> AssetResult<LabelMetadata> {
    parse_label(contents.as_bytes())
}

/// Parse the label at the start of `bytes`; anything after `END` is ignored.
pub fn parse_label(bytes: &[u8]) -> AssetResult<LabelMetadata> {
    let mut block = Block::None;
    let mut lines: Option<usize> = None;
    let mut line_samples: Option<usize> = None;
    let mut sample_bits: u32 = 0;
    let mut sample_type = String::new();
    let mut header_bytes: Option<usize> = None;
    let mut origin_offset = Vec3::ZERO;
    let mut capture_time: Option<String> = None;

    for raw in bytes.split(|&b| b == b'\n') {
        let line = String::from_utf8_lossy(raw);
        let trimmed = line.trim();
        if trimmed == "END" {
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with("/*") {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if let Some(entered) = Block::entered_by(key, value) {
            block = entered;
            continue;
        }
        if block.exited_by(key, value) {
            block = Block::None;
            continue;
        }
        if key == "START_TIME" {
            capture_time = Some(value.to_string());
            continue;
        }

        match (block, key) {
            (Block::Image, "LINES") => lines = Some(parse_number(key, value)?),
            (Block::Image, "LINE_SAMPLES") => line_samples = Some(parse_number(key, value)?),
            (Block::Image, "SAMPLE_BITS") => sample_bits = parse_number(key, value)?,
            (Block::Image, "SAMPLE_TYPE") => sample_type = value.trim_matches('"').to_string(),
            (Block::ImageHeader, "BYTES") => header_bytes = Some(parse_number(key, value)?),
            (Block::RoverCoordinateSystem, "ORIGIN_OFFSET_VECTOR") => {
                origin_offset = parse_origin_offset(value)?;
            }
            _ => {}
        }
    }

    let lines = require_dimension("LINES", lines)?;
    let line_samples = require_dimension("LINE_SAMPLES", line_samples)?;
    let header_bytes = header_bytes
        .ok_or_else(|| AssetError::MalformedLabel("IMAGE_HEADER has no BYTES".to_string()))?;

    if origin_offset == Vec3::ZERO {
        log::debug!("Label has no rover origin offset; using the mesh origin");
    }

    Ok(LabelMetadata {
        lines,
        line_samples,
        sample_bits,
        sample_type,
        header_bytes,
        origin_offset,
        capture_time,
    })
}

fn require_dimension(key: &str, value: Option<usize>) -> AssetResult<usize> {
    match value {
        Some(n) if n > 0 => Ok(n),
        Some(_) => Err(AssetError::MalformedLabel(format!("IMAGE {key} is zero"))),
        None => Err(AssetError::MalformedLabel(format!("IMAGE has no {key}"))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> AssetResult<T> {
    // Values may carry a trailing unit, e.g. `BYTES = 1024 <BYTES>`.
    let token = value.split_whitespace().next().unwrap_or_default();
    token
        .parse::<T>()
        .map_err(|_| AssetError::MalformedLabel(format!("{key} value '{value}' is not numeric")))
}

/// `(x,y,z)` in rover frame, returned as `(y, x, -z)`.
fn parse_origin_offset(value: &str) -> AssetResult<Vec3> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '!' | '@' | '#' | '$'))
        .collect();
    let parts = cleaned
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AssetError::MalformedLabel(format!("ORIGIN_OFFSET_VECTOR '{value}' is not numeric")))?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*y, *x, -*z)),
        _ => Err(AssetError::MalformedLabel(format!(
            "ORIGIN_OFFSET_VECTOR '{value}' does not have three components"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: &str = r#"PDS_VERSION_ID = PDS3
/* LINES = 999 in a comment must be ignored */
START_TIME = "2004-01-30T12:34:56.789Z"
GROUP = ROVER_COORDINATE_SYSTEM
  ORIGIN_OFFSET_VECTOR = (1.5,-2.0,0.25)
END_GROUP = ROVER_COORDINATE_SYSTEM
OBJECT = IMAGE_HEADER
  BYTES = 1024
END_OBJECT = IMAGE_HEADER
OBJECT = IMAGE
  LINES = 64
  LINE_SAMPLES = 48
  SAMPLE_TYPE = IEEE_REAL
  SAMPLE_BITS = 32
END_OBJECT = IMAGE
LINES = 7
END
LINES = 8
"#;

    #[test]
    fn parses_tracked_sections() {
        let label = load_label_from_str(LABEL).unwrap();
        assert_eq!(label.lines, 64);
        assert_eq!(label.line_samples, 48);
        assert_eq!(label.sample_bits, 32);
        assert_eq!(label.sample_type, "IEEE_REAL");
        assert_eq!(label.header_bytes, 1024);
        assert_eq!(label.origin_offset, Vec3::new(-2.0, 1.5, -0.25));
        assert_eq!(
            label.capture_time.as_deref(),
            Some("\"2004-01-30T12:34:56.789Z\"")
        );
    }

    #[test]
    fn missing_coordinate_group_gives_zero_origin() {
        let src = LABEL.replace("GROUP = ROVER_COORDINATE_SYSTEM", "GROUP = OTHER");
        let label = load_label_from_str(&src).unwrap();
        assert_eq!(label.origin_offset, Vec3::ZERO);
    }

    #[test]
    fn missing_dimensions_are_malformed() {
        let src = LABEL.replace("  LINE_SAMPLES = 48\n", "");
        assert!(matches!(
            load_label_from_str(&src),
            Err(AssetError::MalformedLabel(_))
        ));
    }

    #[test]
    fn non_numeric_dimensions_are_malformed() {
        let src = LABEL.replace("LINES = 64", "LINES = lots");
        assert!(matches!(
            load_label_from_str(&src),
            Err(AssetError::MalformedLabel(_))
        ));
    }

    #[test]
    fn keys_outside_image_block_are_ignored() {
        // The LINES after END_OBJECT = IMAGE and after END must not win.
        let label = load_label_from_str(LABEL).unwrap();
        assert_eq!(label.lines, 64);
    }

    #[test]
    fn unquoted_timestamp_passes_through() {
        let src = LABEL.replace("\"2004-01-30T12:34:56.789Z\"", "2004-01-30T12:34:56.789");
        let label = load_label_from_str(&src).unwrap();
        assert_eq!(label.capture_time.as_deref(), Some("2004-01-30T12:34:56.789"));
    }

    #[test]
    fn last_start_time_wins() {
        let src = LABEL.replace(
            "\nOBJECT = IMAGE_HEADER",
            "\nSTART_TIME = 2004-01-31T00:00:00.000\nOBJECT = IMAGE_HEADER",
        );
        let label = load_label_from_str(&src).unwrap();
        assert_eq!(label.capture_time.as_deref(), Some("2004-01-31T00:00:00.000"));
    }

    #[test]
    fn stops_at_binary_payload() {
        let mut bytes = LABEL.as_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n', 0x00, b'=', 0x80]);
        let label = parse_label(&bytes).unwrap();
        assert_eq!(label.line_samples, 48);
    }
}
