//! Band-sequential payload decoding.
//!
//! The payload starts `header_bytes` after the first occurrence of the
//! `LBLSIZE` token (start of the embedded binary image header). Each band
//! is a contiguous block of `lines * samples` big-endian samples.

use crate::error::{AssetError, AssetResult};
use crate::label::LabelMetadata;

/// Token opening the binary image header.
pub const PAYLOAD_MARKER: &[u8] = b"LBLSIZE";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    /// IEEE 754 single precision, big-endian (XYZ products).
    Float32Be,
    /// Unsigned 16-bit integer, big-endian (RAD products).
    UInt16Be,
}

impl SampleFormat {
    #[inline]
    pub fn width(self) -> usize {
        match self {
            SampleFormat::Float32Be => 4,
            SampleFormat::UInt16Be => 2,
        }
    }

    #[inline]
    fn decode(self, bytes: &[u8]) -> f32 {
        match self {
            SampleFormat::Float32Be => f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            SampleFormat::UInt16Be => f32::from(u16::from_be_bytes([bytes[0], bytes[1]])),
        }
    }
}

/// One `lines x samples` array per band, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    pub lines: usize,
    pub samples: usize,
    bands: Vec<Vec<f32>>,
}

impl PixelGrid {
    pub fn new(lines: usize, samples: usize, bands: Vec<Vec<f32>>) -> Self {
        for band in &bands {
            assert_eq!(band.len(), lines * samples, "Band size doesn't match grid dimensions");
        }
        Self { lines, samples, bands }
    }

    #[inline]
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    #[inline]
    pub fn band(&self, band: usize) -> &[f32] {
        &self.bands[band]
    }
}

/// Byte offset of the first payload sample.
pub fn payload_offset(bytes: &[u8], header_bytes: usize) -> AssetResult<usize> {
    let marker = bytes
        .windows(PAYLOAD_MARKER.len())
        .position(|w| w == PAYLOAD_MARKER)
        .ok_or_else(|| AssetError::MalformedLabel("no LBLSIZE image header marker".to_string()))?;
    marker
        .checked_add(header_bytes)
        .ok_or_else(|| AssetError::MalformedLabel(format!("image header of {header_bytes} bytes")))
}

fn oversized(label: &LabelMetadata) -> AssetError {
    AssetError::MalformedLabel(format!(
        "{}x{} image does not fit in memory",
        label.lines, label.line_samples
    ))
}

/// Read `band_count` bands of `format` samples sized by the label.
pub fn decode_bands(
    bytes: &[u8],
    label: &LabelMetadata,
    band_count: usize,
    format: SampleFormat,
) -> AssetResult<PixelGrid> {
    let expected_bits = format.width() as u32 * 8;
    if label.sample_bits != 0 && label.sample_bits != expected_bits {
        log::warn!(
            "Label declares {}-bit samples, decoding as {}-bit",
            label.sample_bits,
            expected_bits
        );
    }

    let start = payload_offset(bytes, label.header_bytes)?;
    let band_len = label
        .lines
        .checked_mul(label.line_samples)
        .ok_or_else(|| oversized(label))?;
    if band_len == 0 {
        return Err(AssetError::MalformedLabel("image has no pixels".to_string()));
    }
    let needed = band_len
        .checked_mul(band_count * format.width())
        .and_then(|payload| payload.checked_add(start))
        .ok_or_else(|| oversized(label))?;
    if needed > bytes.len() {
        return Err(AssetError::TruncatedData {
            needed,
            available: bytes.len(),
        });
    }

    let payload = &bytes[start..needed];
    let bands = payload
        .chunks_exact(band_len * format.width())
        .map(|band| band.chunks_exact(format.width()).map(|s| format.decode(s)).collect())
        .collect();

    log::debug!(
        "Decoded {} band(s) of {}x{} from offset {}",
        band_count,
        label.lines,
        label.line_samples,
        start
    );
    Ok(PixelGrid::new(label.lines, label.line_samples, bands))
}

/// X, Y and Z position bands of an XYZ product.
pub fn decode_xyz(bytes: &[u8], label: &LabelMetadata) -> AssetResult<PixelGrid> {
    decode_bands(bytes, label, 3, SampleFormat::Float32Be)
}

/// Single 16-bit intensity band of a RAD product.
pub fn decode_rad(bytes: &[u8], label: &LabelMetadata) -> AssetResult<PixelGrid> {
    decode_bands(bytes, label, 1, SampleFormat::UInt16Be)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::Vec3;

    fn label(lines: usize, samples: usize, bits: u32, header: usize) -> LabelMetadata {
        LabelMetadata {
            lines,
            line_samples: samples,
            sample_bits: bits,
            sample_type: String::new(),
            header_bytes: header,
            origin_offset: Vec3::ZERO,
            capture_time: None,
        }
    }

    fn product(prefix: &[u8], header: usize, payload: &[u8]) -> Vec<u8> {
        let mut bytes = prefix.to_vec();
        let mut vicar = b"LBLSIZE=16".to_vec();
        vicar.resize(header, b' ');
        bytes.extend_from_slice(&vicar);
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn decodes_three_float_bands() {
        let mut payload = Vec::new();
        for v in 0..12 {
            payload.extend_from_slice(&(v as f32 * 0.5).to_be_bytes());
        }
        let bytes = product(b"END\n", 16, &payload);
        let grid = decode_xyz(&bytes, &label(2, 2, 32, 16)).unwrap();

        assert_eq!(grid.band_count(), 3);
        assert_eq!(grid.band(0), &[0.0, 0.5, 1.0, 1.5]);
        assert_eq!(grid.band(1), &[2.0, 2.5, 3.0, 3.5]);
        assert_eq!(grid.band(2), &[4.0, 4.5, 5.0, 5.5]);
    }

    #[test]
    fn decodes_u16_band() {
        let payload: Vec<u8> = [1u16, 256, 65535]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let bytes = product(b"", 16, &payload);
        let grid = decode_rad(&bytes, &label(1, 3, 16, 16)).unwrap();
        assert_eq!(grid.band(0), &[1.0, 256.0, 65535.0]);
    }

    #[test]
    fn short_payload_is_truncated() {
        let bytes = product(b"", 16, &[0u8; 40]);
        match decode_xyz(&bytes, &label(2, 2, 32, 16)) {
            Err(AssetError::TruncatedData { needed, available }) => {
                assert_eq!(needed, 16 + 48);
                assert_eq!(available, 16 + 40);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn offset_is_relative_to_marker() {
        let bytes = product(b"label text\n", 32, &[]);
        assert_eq!(payload_offset(&bytes, 32).unwrap(), 11 + 32);
    }

    #[test]
    fn oversized_dimensions_are_malformed() {
        let bytes = product(b"", 16, &[0u8; 48]);
        for (lines, samples) in [(usize::MAX, 2), (1usize << 62, 1)] {
            assert!(matches!(
                decode_xyz(&bytes, &label(lines, samples, 32, 16)),
                Err(AssetError::MalformedLabel(_))
            ));
        }
        let after_label = product(b"END\n", 16, &[]);
        assert!(matches!(
            payload_offset(&after_label, usize::MAX),
            Err(AssetError::MalformedLabel(_))
        ));
    }

    #[test]
    fn missing_marker_is_malformed() {
        assert!(matches!(
            payload_offset(b"no header here", 0),
            Err(AssetError::MalformedLabel(_))
        ));
    }
}
