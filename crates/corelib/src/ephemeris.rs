//! Spacecraft clock to mission sol conversion.

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::identifier::{AssetIdentifier, Rover};

/// Spacecraft clock ticks per Mars sol day used by the conversion.
const TICKS_PER_MSD: f64 = 88775.244;
/// Mars sol date at spacecraft clock zero.
const MSD_AT_CLOCK_EPOCH: f64 = 44795.9998;
/// Mars sol date of the reference landing sol.
const MSD_AT_REFERENCE_SOL: f64 = 49269.2432411704;

/// Mission sol number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sol(i64);

impl Sol {
    #[inline]
    pub const fn new(sol: i64) -> Self {
        Self(sol)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Zero-padded folder label (`sol0042`, `SOL00042`).
    pub fn folder(self, prefix: &str, width: usize) -> String {
        format!("{prefix}{:0width$}", self.0, width = width)
    }
}

impl fmt::Display for Sol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Offset that aligns the computed sol with the published sol folders.
fn calibration_offset(rover: Rover) -> i64 {
    match rover {
        Rover::Curiosity => -6,
        Rover::Opportunity => 3028,
        Rover::Spirit => 3048,
    }
}

/// Parse the spacecraft clock ticks embedded in the id.
pub fn spacecraft_clock(id: &AssetIdentifier) -> CoreResult<u64> {
    let field = id.clock_field();
    // `u64::from_str` accepts a leading '+', which is not a clock digit.
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::ClockParse {
            id: id.as_str().to_string(),
            field: field.to_string(),
        });
    }
    field.parse::<u64>().map_err(|_| CoreError::ClockParse {
        id: id.as_str().to_string(),
        field: field.to_string(),
    })
}

/// Sol number for a clock value on the given rover.
pub fn sol_from_clock(rover: Rover, ticks: u64) -> Sol {
    let msd = ticks as f64 / TICKS_PER_MSD + MSD_AT_CLOCK_EPOCH;
    let sol = (msd - MSD_AT_REFERENCE_SOL + 1.0).ceil() as i64;
    Sol(sol + calibration_offset(rover))
}

/// Sol number at which the identified image was taken.
pub fn sol_for(id: &AssetIdentifier) -> CoreResult<Sol> {
    let ticks = spacecraft_clock(id)?;
    Ok(sol_from_clock(id.rover, ticks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spirit_example_sol() {
        let id = AssetIdentifier::decode("2N295212876EFFB1DNP1950L0M1").unwrap();
        assert_eq!(spacecraft_clock(&id).unwrap(), 295_212_876);
        assert_eq!(sol_for(&id).unwrap(), Sol::new(1902));
    }

    #[test]
    fn curiosity_example_sol() {
        let id = AssetIdentifier::decode("NLB_459941093EDR_F0260000NCAM00285M1").unwrap();
        assert_eq!(sol_for(&id).unwrap(), Sol::new(703));
    }

    #[test]
    fn deterministic_and_monotonic_in_clock() {
        for rover in [Rover::Spirit, Rover::Opportunity, Rover::Curiosity] {
            let mut previous = sol_from_clock(rover, 0);
            for ticks in (0..1_000_000_000u64).step_by(7_777_777) {
                let sol = sol_from_clock(rover, ticks);
                assert_eq!(sol, sol_from_clock(rover, ticks));
                assert!(sol >= previous, "{rover} sol decreased at {ticks}");
                previous = sol;
            }
        }
    }

    #[test]
    fn rover_offsets_differ() {
        let ticks = 295_212_876;
        let spirit = sol_from_clock(Rover::Spirit, ticks).get();
        let opportunity = sol_from_clock(Rover::Opportunity, ticks).get();
        assert_eq!(spirit - opportunity, 20);
    }

    #[test]
    fn non_numeric_clock_is_rejected() {
        let id = AssetIdentifier::decode("2N29521287XEFFB1DNP1950L0M1").unwrap();
        let err = sol_for(&id).unwrap_err();
        assert_eq!(
            err,
            CoreError::ClockParse {
                id: "2N29521287XEFFB1DNP1950L0M1".to_string(),
                field: "29521287X".to_string(),
            }
        );
    }

    #[test]
    fn folder_padding() {
        assert_eq!(Sol::new(42).folder("sol", 4), "sol0042");
        assert_eq!(Sol::new(703).folder("SOL", 5), "SOL00703");
    }
}
