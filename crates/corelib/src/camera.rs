use crate::Vec3;

/// Perspective camera placed in mesh space (right-handed, Z up).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Square-frame camera described by a physical lens, Z up.
    pub fn from_lens(eye: Vec3, target: Vec3, focal_mm: f32, sensor_mm: f32, z_near: f32) -> Self {
        let fov = 2.0 * (sensor_mm * 0.5 / focal_mm).atan();
        Self::new_perspective(eye, target, Vec3::Z, fov, z_near, 100.0, 1.0)
    }

    /// Unit viewing direction; falls back to -Z when eye and target coincide.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    #[inline]
    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_rad.to_degrees()
    }
}
