//! Decoding of rover image identifiers.
//!
//! MER ids are 27 characters, e.g. `2N290962708XYLB0HMP0755L0M2`:
//!
//! ```text
//! 0      2          rover (1 = Opportunity, 2 = Spirit)
//! 1      N          camera (N/P/F/R)
//! 2..11  290962708  spacecraft clock
//! 11..14 XYL        product type
//! 23     L          eye
//! 25     M          author
//! 26     2          product version
//! ```
//!
//! MSL ids are 36 characters, start with `N` (navcam) and carry the eye in
//! position 1 and the spacecraft clock in `4..13`.

use std::{fmt, ops::Range};

use crate::error::{CoreError, CoreResult};

pub const MER_ID_LENGTH: usize = 27;
pub const MSL_ID_LENGTH: usize = 36;

/// Rover families supported by the naming convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rover {
    Spirit,
    Opportunity,
    Curiosity,
}

impl Rover {
    /// `true` for the MER family (Spirit and Opportunity).
    #[inline]
    pub fn is_mer(self) -> bool {
        !matches!(self, Rover::Curiosity)
    }

    pub fn name(self) -> &'static str {
        match self {
            Rover::Spirit => "Spirit",
            Rover::Opportunity => "Opportunity",
            Rover::Curiosity => "Curiosity",
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instrument {
    Navcam,
    Pancam,
    FrontHazcam,
    RearHazcam,
}

impl Instrument {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            b'N' => Some(Instrument::Navcam),
            b'P' => Some(Instrument::Pancam),
            b'F' => Some(Instrument::FrontHazcam),
            b'R' => Some(Instrument::RearHazcam),
            _ => None,
        }
    }

    /// Two-letter instrument code used in MER volume names (`mer2no_0xxx`).
    fn mer_volume_code(self) -> &'static str {
        match self {
            Instrument::Navcam => "no",
            Instrument::Pancam => "po",
            Instrument::FrontHazcam | Instrument::RearHazcam => "ho",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Instrument::Navcam => "Navcam",
            Instrument::Pancam => "Pancam",
            Instrument::FrontHazcam => "Front Hazcam",
            Instrument::RearHazcam => "Rear Hazcam",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Eye::Left => "Left",
            Eye::Right => "Right",
        })
    }
}

/// A validated, normalized image identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetIdentifier {
    pub rover: Rover,
    pub camera: Instrument,
    raw: String,
}

impl AssetIdentifier {
    /// Normalize and decode an id string.
    ///
    /// Surrounding whitespace is trimmed, the id is uppercased and any
    /// `.IMG` suffix is removed before validation.
    pub fn decode(input: &str) -> CoreResult<Self> {
        let raw = normalize(input);
        let len = raw.len();
        if len != MER_ID_LENGTH && len != MSL_ID_LENGTH {
            return Err(CoreError::NameLength { id: raw, len });
        }

        let (rover, camera) = detect_rover(&raw).ok_or_else(|| CoreError::UnknownRover {
            id: raw.clone(),
        })?;

        // A prefix from the other family is still a naming error.
        let expected = if rover.is_mer() { MER_ID_LENGTH } else { MSL_ID_LENGTH };
        if len != expected {
            return Err(CoreError::NameLength { id: raw, len });
        }

        // Every later accessor slices by byte offset.
        if !raw.is_ascii() {
            let clock = &raw.as_bytes()[clock_range(rover)];
            return Err(if clock.is_ascii() {
                CoreError::UnknownRover { id: raw }
            } else {
                CoreError::ClockParse {
                    field: String::from_utf8_lossy(clock).into_owned(),
                    id: raw,
                }
            });
        }

        Ok(Self { rover, camera, raw })
    }

    /// The normalized id (uppercase, no extension).
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Fixed-width spacecraft clock field, still unparsed.
    pub fn clock_field(&self) -> &str {
        &self.raw[clock_range(self.rover)]
    }

    /// Which eye of the stereo pair captured this frame.
    pub fn eye(&self) -> Eye {
        let code = match self.rover {
            Rover::Curiosity => self.raw.as_bytes()[1],
            Rover::Spirit | Rover::Opportunity => self.raw.as_bytes()[23],
        };
        if code == b'L' { Eye::Left } else { Eye::Right }
    }

    /// Cache/archive trees for science (RDR) and browse products.
    ///
    /// MER trees depend only on rover and camera; the MSL archive was
    /// re-released from sol 1870 onwards under different folder names.
    pub fn product_trees(&self, sol: crate::Sol) -> ProductTrees {
        match self.rover {
            Rover::Curiosity if sol.get() < 1870 => ProductTrees {
                science: "msl/MSLNAV_1XXX/DATA_V1/".to_string(),
                browse: "msl/MSLNAV_1XXX/EXTRAS_V1/FULL/".to_string(),
            },
            Rover::Curiosity => ProductTrees {
                science: "msl/MSLNAV_1XXX/DATA/".to_string(),
                browse: "msl/MSLNAV_1XXX/EXTRAS/FULL/".to_string(),
            },
            Rover::Spirit | Rover::Opportunity => {
                let (mission, number) = if self.rover == Rover::Spirit {
                    ("spirit", 2)
                } else {
                    ("opportunity", 1)
                };
                let volume = format!(
                    "mer/{}/mer{}{}_0xxx",
                    mission,
                    number,
                    self.camera.mer_volume_code()
                );
                ProductTrees {
                    science: format!("{volume}/data/"),
                    browse: format!("{volume}/browse/"),
                }
            }
        }
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Relative folder prefixes (with trailing `/`) under the cache root and
/// under the remote archive base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductTrees {
    pub science: String,
    pub browse: String,
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase().replace(".IMG", "")
}

fn clock_range(rover: Rover) -> Range<usize> {
    match rover {
        Rover::Curiosity => 4..13,
        Rover::Spirit | Rover::Opportunity => 2..11,
    }
}

fn detect_rover(id: &str) -> Option<(Rover, Instrument)> {
    let bytes = id.as_bytes();
    match bytes {
        [b'N', ..] => Some((Rover::Curiosity, Instrument::Navcam)),
        [b'2', code, ..] => Instrument::from_code(*code).map(|c| (Rover::Spirit, c)),
        [b'1', code, ..] => Instrument::from_code(*code).map(|c| (Rover::Opportunity, c)),
        _ => None,
    }
}
