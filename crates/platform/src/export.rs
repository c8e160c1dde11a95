//! Filesystem scene writer.
//!
//! Each mesh lands in `<root>/<collection>/` as a Wavefront OBJ with
//! per-face texture coordinates, an optional MTL + PNG pair and a small
//! `.scene.txt` sidecar holding the camera and caption.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use asset::{QuadUv, TerrainMesh, TextureData};
use corelib::camera::Camera;

use crate::scene::{MeshHandle, SceneAssembly};

struct PendingObject {
    handle: MeshHandle,
    dir: PathBuf,
    name: String,
    mesh: TerrainMesh,
    uvs: Vec<QuadUv>,
    texture: Option<TextureData>,
    camera: Option<Camera>,
    caption: Option<String>,
}

/// Writes one object at a time; everything is flushed on `complete`.
pub struct ObjSceneWriter {
    root: PathBuf,
    next_handle: usize,
    pending: Option<PendingObject>,
    written: Vec<PathBuf>,
}

impl ObjSceneWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_handle: 0,
            pending: None,
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// OBJ files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn pending(&mut self, handle: MeshHandle) -> Result<&mut PendingObject> {
        match self.pending.as_mut() {
            Some(obj) if obj.handle == handle => Ok(obj),
            _ => bail!("Unknown mesh handle {:?}", handle),
        }
    }
}

impl SceneAssembly for ObjSceneWriter {
    fn add_mesh(&mut self, collection: &str, name: &str, mesh: &TerrainMesh) -> Result<MeshHandle> {
        if let Some(obj) = &self.pending {
            log::warn!("Discarding unfinished mesh {}", obj.name);
        }
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(PendingObject {
            handle,
            dir: self.root.join(collection),
            name: name.to_string(),
            mesh: mesh.clone(),
            uvs: Vec::new(),
            texture: None,
            camera: None,
            caption: None,
        });
        Ok(handle)
    }

    fn assign_uvs(&mut self, mesh: MeshHandle, uvs: &[QuadUv]) -> Result<()> {
        let obj = self.pending(mesh)?;
        if uvs.len() != obj.mesh.faces.len() {
            bail!(
                "Expected {} face UVs for {}, got {}",
                obj.mesh.faces.len(),
                obj.name,
                uvs.len()
            );
        }
        obj.uvs = uvs.to_vec();
        Ok(())
    }

    fn add_material(&mut self, mesh: MeshHandle, texture: &TextureData) -> Result<()> {
        self.pending(mesh)?.texture = Some(texture.clone());
        Ok(())
    }

    fn place_camera(&mut self, mesh: MeshHandle, camera: &Camera) -> Result<()> {
        self.pending(mesh)?.camera = Some(*camera);
        Ok(())
    }

    fn add_caption(&mut self, mesh: MeshHandle, text: &str) -> Result<()> {
        self.pending(mesh)?.caption = Some(text.to_string());
        Ok(())
    }

    fn complete(&mut self, mesh: MeshHandle) -> Result<()> {
        self.pending(mesh)?;
        let Some(obj) = self.pending.take() else {
            bail!("Unknown mesh handle {:?}", mesh);
        };

        fs::create_dir_all(&obj.dir)
            .with_context(|| format!("Failed to create {}", obj.dir.display()))?;

        let textured = obj.texture.is_some() && !obj.uvs.is_empty();
        if let Some(texture) = obj.texture.as_ref().filter(|_| textured) {
            let png = obj.dir.join(format!("{}.png", obj.name));
            texture
                .save_png(&png)
                .with_context(|| format!("Failed to write texture {}", png.display()))?;
            write_mtl(&obj.dir.join(format!("{}.mtl", obj.name)), &obj.name, texture)?;
        }

        let obj_path = obj.dir.join(format!("{}.obj", obj.name));
        write_obj(&obj_path, &obj, textured)?;
        write_sidecar(
            &obj.dir.join(format!("{}.scene.txt", obj.name)),
            obj.camera.as_ref(),
            obj.caption.as_deref(),
        )?;

        log::info!("Wrote {}", obj_path.display());
        self.written.push(obj_path);
        Ok(())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_obj(path: &Path, obj: &PendingObject, textured: bool) -> Result<()> {
    let mut out = create(path)?;
    if textured {
        writeln!(out, "mtllib {}.mtl", obj.name)?;
    }
    writeln!(out, "o {}", obj.name)?;

    for p in &obj.mesh.vertices.positions {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }

    if textured {
        for [u, v] in asset::uv::flatten(&obj.uvs) {
            writeln!(out, "vt {} {}", u, v)?;
        }
        writeln!(out, "usemtl {}", obj.name)?;
    }

    for (face, quad) in obj.mesh.faces.iter().enumerate() {
        write!(out, "f")?;
        for (k, &index) in quad.iter().enumerate() {
            if textured {
                write!(out, " {}/{}", index + 1, face * 4 + k + 1)?;
            } else {
                write!(out, " {}", index + 1)?;
            }
        }
        writeln!(out)?;
    }

    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_mtl(path: &Path, name: &str, texture: &TextureData) -> Result<()> {
    let mut out = create(path)?;
    writeln!(out, "# levels {} {}", texture.levels.min, texture.levels.max)?;
    writeln!(out, "newmtl {}", name)?;
    writeln!(out, "Kd 1 1 1")?;
    writeln!(out, "illum 0")?;
    writeln!(out, "map_Kd {}.png", name)?;
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_sidecar(path: &Path, camera: Option<&Camera>, caption: Option<&str>) -> Result<()> {
    let mut out = create(path)?;
    if let Some(cam) = camera {
        writeln!(out, "camera.eye {} {} {}", cam.eye.x, cam.eye.y, cam.eye.z)?;
        writeln!(
            out,
            "camera.target {} {} {}",
            cam.target.x, cam.target.y, cam.target.z
        )?;
        let forward = cam.forward();
        writeln!(out, "camera.forward {} {} {}", forward.x, forward.y, forward.z)?;
        writeln!(out, "camera.fov_y_deg {}", cam.fov_y_degrees())?;
        writeln!(out, "camera.near {}", cam.z_near)?;
    }
    if let Some(text) = caption {
        writeln!(out, "caption")?;
        for line in text.lines() {
            writeln!(out, "  {}", line)?;
        }
    }
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::{VertexGrid, mesh::quad_faces, uv::quad_uvs};
    use corelib::vec3;
    use tempfile::TempDir;

    fn square() -> TerrainMesh {
        TerrainMesh {
            vertices: VertexGrid {
                lines: 2,
                samples: 2,
                positions: vec![
                    vec3(0.0, 0.0, 0.0),
                    vec3(1.0, 0.0, 0.0),
                    vec3(0.0, 1.0, 0.0),
                    vec3(1.0, 1.0, 0.0),
                ],
            },
            faces: quad_faces(2, 2),
        }
    }

    #[test]
    fn writes_textured_object() {
        let dir = TempDir::new().unwrap();
        let mut writer = ObjSceneWriter::new(dir.path());
        let mesh = square();

        let h = writer.add_mesh("Sol1902", "1902-mesh", &mesh).unwrap();
        writer.assign_uvs(h, &quad_uvs(2, 2)).unwrap();
        writer
            .add_material(h, &TextureData::new_rgba8(1, 1, vec![255, 0, 0, 255]))
            .unwrap();
        writer.add_caption(h, "line one\nline two").unwrap();
        writer.complete(h).unwrap();

        let sol_dir = dir.path().join("Sol1902");
        let obj = fs::read_to_string(sol_dir.join("1902-mesh.obj")).unwrap();
        assert!(obj.starts_with("mtllib 1902-mesh.mtl\n"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(obj.lines().filter(|l| l.starts_with("vt ")).count(), 4);
        assert!(obj.contains("f 1/1 2/2 4/3 3/4"));
        assert!(sol_dir.join("1902-mesh.png").exists());

        let mtl = fs::read_to_string(sol_dir.join("1902-mesh.mtl")).unwrap();
        assert!(mtl.contains("map_Kd 1902-mesh.png"));

        let sidecar = fs::read_to_string(sol_dir.join("1902-mesh.scene.txt")).unwrap();
        assert!(sidecar.contains("  line two"));
        assert_eq!(writer.written().len(), 1);
    }

    #[test]
    fn untextured_object_has_plain_faces() {
        let dir = TempDir::new().unwrap();
        let mut writer = ObjSceneWriter::new(dir.path());
        let h = writer.add_mesh("Sol7", "7-mesh", &square()).unwrap();
        writer.complete(h).unwrap();

        let obj = fs::read_to_string(dir.path().join("Sol7/7-mesh.obj")).unwrap();
        assert!(!obj.contains("mtllib"));
        assert!(obj.contains("f 1 2 4 3"));
        assert!(!dir.path().join("Sol7/7-mesh.mtl").exists());
    }

    #[test]
    fn rejects_stale_handle_and_bad_uvs() {
        let dir = TempDir::new().unwrap();
        let mut writer = ObjSceneWriter::new(dir.path());
        let h = writer.add_mesh("Sol1", "a", &square()).unwrap();
        assert!(writer.assign_uvs(h, &[]).is_err());
        assert!(writer.add_caption(MeshHandle(h.0 + 1), "x").is_err());
        writer.complete(h).unwrap();
        assert!(writer.complete(h).is_err());
    }
}
