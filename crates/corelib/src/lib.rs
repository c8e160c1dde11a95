//! Core rover types: identifiers, sols, camera placement, math re-exports.

pub use glam::{Vec3, vec3};

pub mod camera;
pub mod ephemeris;
pub mod error;
pub mod identifier;

pub use ephemeris::{Sol, sol_for, sol_from_clock, spacecraft_clock};
pub use error::{CoreError, CoreResult};
pub use identifier::{AssetIdentifier, Eye, Instrument, ProductTrees, Rover};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lens_camera_field_of_view() {
        let cam = camera::Camera::from_lens(
            vec3(0.0, 0.0, 0.15),
            vec3(1.0, 0.0, 0.0),
            40.0,
            36.0,
            0.01,
        );
        assert!((cam.fov_y_degrees() - 48.455).abs() < 0.01);
        assert_eq!(cam.up, Vec3::Z);
    }

    #[test]
    fn camera_forward_is_unit() {
        let cam = camera::Camera::from_lens(
            vec3(0.1, 0.2, 0.15),
            vec3(0.0, 0.0, -0.04),
            40.0,
            36.0,
            0.01,
        );
        assert!((cam.forward().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_forward_points_down_negative_z() {
        let cam = camera::Camera::from_lens(Vec3::ONE, Vec3::ONE, 40.0, 36.0, 0.01);
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }
}
