//! Scene-assembly seam.
//!
//! The pipeline hands finished geometry, UVs, textures, a camera and a
//! caption to an implementation of [`SceneAssembly`]; it never touches a
//! host scene graph directly.

use anyhow::Result;
use asset::{QuadUv, TerrainMesh, TextureData};
use corelib::{Vec3, camera::Camera, vec3};

/// Height of the camera above the rover origin, in scene units.
const CAMERA_LIFT: f32 = 0.15;
/// Extra drop of the look-at point below the mesh centre.
const LOOK_DROP: f32 = 0.04;
const NAVCAM_FOCAL_MM: f32 = 40.0;
const SENSOR_WIDTH_MM: f32 = 36.0;
const NEAR_CLIP: f32 = 0.01;

/// Opaque id of a mesh created by a [`SceneAssembly`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

pub trait SceneAssembly {
    /// Instantiate geometry named `name` inside `collection`.
    fn add_mesh(&mut self, collection: &str, name: &str, mesh: &TerrainMesh) -> Result<MeshHandle>;

    /// Per-face UVs, one entry per face in face order.
    fn assign_uvs(&mut self, mesh: MeshHandle, uvs: &[QuadUv]) -> Result<()>;

    /// Unlit material showing `texture` through the assigned UVs.
    fn add_material(&mut self, mesh: MeshHandle, texture: &TextureData) -> Result<()>;

    fn place_camera(&mut self, mesh: MeshHandle, camera: &Camera) -> Result<()>;

    fn add_caption(&mut self, mesh: MeshHandle, text: &str) -> Result<()>;

    /// Called once everything for `mesh` has been handed over.
    fn complete(&mut self, _mesh: MeshHandle) -> Result<()> {
        Ok(())
    }
}

/// Camera at the rover origin looking at the terrain.
///
/// `origin_offset` is the label's rover origin in mesh axes, unscaled.
pub fn camera_for(origin_offset: Vec3, scale: f32, mesh: &TerrainMesh) -> Camera {
    let rover = origin_offset * scale;
    let centre = mesh.vertices.centroid().unwrap_or(Vec3::ZERO);
    let distance = (rover - centre).length();

    let eye = rover + vec3(0.0, 0.0, CAMERA_LIFT);
    let target = centre + vec3(0.0, 0.0, -LOOK_DROP - distance * 0.1);
    Camera::from_lens(eye, target, NAVCAM_FOCAL_MM, SENSOR_WIDTH_MM, NEAR_CLIP)
}
