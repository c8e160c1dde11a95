//! Candidate filenames for each product kind.
//!
//! Product names are derived from the image id by overwriting fixed
//! character positions: the product-type code (`11..14` for MER, `13..16`
//! for MSL), the author (`25`, MER) and the version (`26` MER, `35` MSL).
//! Candidates are returned in order of preference.

use std::fmt;

use corelib::{AssetIdentifier, Rover, Sol};

/// Sols after which MSL browse products are published as PNG.
const MSL_PNG_BROWSE_AFTER_SOL: i64 = 450;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// 8-bit browse image (JPG/PNG).
    Texture,
    /// 16-bit radiometrically corrected RDR.
    Texture16,
    /// XYZ range data.
    Depth,
}

impl AssetKind {
    /// Texture failures leave the mesh untextured; depth failures skip it.
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, AssetKind::Depth)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Texture => "texture",
            AssetKind::Texture16 => "16-bit texture",
            AssetKind::Depth => "XYZ depth",
        })
    }
}

/// One filename to look for, tagged with its product-type code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub variant: &'static str,
    pub filename: String,
}

/// Candidate filenames for `kind`, most preferred first.
pub fn candidates(kind: AssetKind, id: &AssetIdentifier, sol: Sol) -> Vec<Candidate> {
    let stem = id.as_str();
    match (kind, id.rover) {
        (AssetKind::Texture, Rover::Curiosity) => {
            let ext = if sol.get() > MSL_PNG_BROWSE_AFTER_SOL { "PNG" } else { "JPG" };
            vec![msl_candidate(&format!("{stem}.{ext}"), "RAS")]
        }
        (AssetKind::Texture, _) => {
            let base = format!("{stem}.img.JPG");
            // Sequence letter 'F' marks downsampled products without a full frame.
            let first = if stem.as_bytes()[18] == b'F' { "edn" } else { "eff" };
            [first, "ffl", "mrl"]
                .into_iter()
                .map(|code| mer_candidate(&base, code, Some("1")))
                .collect()
        }
        (AssetKind::Texture16, Rover::Curiosity) => {
            vec![msl_candidate(&format!("{stem}.IMG"), "RAD")]
        }
        (AssetKind::Texture16, _) => {
            vec![mer_candidate(&format!("{stem}.IMG"), "mrd", None)]
        }
        (AssetKind::Depth, Rover::Curiosity) => {
            vec![msl_candidate(&format!("{stem}.IMG"), "XYZ")]
        }
        (AssetKind::Depth, _) => {
            vec![mer_candidate(&format!("{stem}.IMG"), "xyl", None)]
        }
    }
}

// `AssetIdentifier::decode` only accepts ASCII ids, so byte offsets are
// always char boundaries here.
fn msl_candidate(base: &str, code: &'static str) -> Candidate {
    let mut name = base.to_string();
    name.replace_range(13..16, code);
    name.replace_range(35..36, "1");
    Candidate {
        variant: code,
        filename: name,
    }
}

fn mer_candidate(base: &str, code: &'static str, version: Option<&str>) -> Candidate {
    let mut name = base.to_string();
    name.replace_range(11..14, code);
    name.replace_range(25..26, "m");
    if let Some(v) = version {
        name.replace_range(26..27, v);
    }
    Candidate {
        variant: code,
        filename: name,
    }
}
