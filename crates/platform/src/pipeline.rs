//! Per-id pipeline and batch runner.
//!
//! Each id runs to completion before the next one starts. A failure only
//! ends the current id; texture problems merely leave the mesh untextured.

use std::{fs, path::Path, time::Instant};

use asset::{TerrainMeshBuilder, TextureData, label, uv};
use corelib::{AssetIdentifier, Sol};
use resolver::{AssetKind, AssetResolver, Fetcher};

use crate::caption::caption;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::scene::{SceneAssembly, camera_for};

/// Result of a successful mesh build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOutcome {
    pub id: String,
    pub sol: Sol,
    pub name: String,
    pub vertices: usize,
    pub faces: usize,
    pub textured: bool,
}

/// Outcome for one requested id.
#[derive(Debug)]
pub struct IdReport {
    pub input: String,
    pub result: Result<BuildOutcome, PipelineError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<IdReport>,
}

impl BatchReport {
    pub fn built(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.built()
    }
}

/// Split a comma-separated id list, dropping empty entries.
pub fn split_ids(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub struct Pipeline<'a, F: Fetcher + ?Sized, S: SceneAssembly + ?Sized> {
    config: &'a PipelineConfig,
    fetcher: &'a F,
    scene: &'a mut S,
}

impl<'a, F: Fetcher + ?Sized, S: SceneAssembly + ?Sized> Pipeline<'a, F, S> {
    pub fn new(config: &'a PipelineConfig, fetcher: &'a F, scene: &'a mut S) -> Self {
        Self {
            config,
            fetcher,
            scene,
        }
    }

    /// Process every id of a comma-separated list in order.
    pub fn run_batch(&mut self, ids: &str) -> BatchReport {
        let started = Instant::now();
        let ids = split_ids(ids);
        let mut report = BatchReport::default();

        for (i, raw) in ids.iter().enumerate() {
            log::info!("Processing image {}/{}: {}", i + 1, ids.len(), raw);
            let result = self.process(raw);
            match &result {
                Ok(outcome) => log::info!(
                    "Mesh {} complete ({} vertices, {} faces, textured={})",
                    outcome.name,
                    outcome.vertices,
                    outcome.faces,
                    outcome.textured
                ),
                Err(e) => log::error!("Skipping {}: {}", raw, e),
            }
            report.entries.push(IdReport {
                input: raw.to_string(),
                result,
            });
        }

        log::info!(
            "Batch finished in {:.1?}: {} built, {} failed",
            started.elapsed(),
            report.built(),
            report.failed()
        );
        report
    }

    /// Full pipeline for a single id.
    pub fn process(&mut self, raw: &str) -> Result<BuildOutcome, PipelineError> {
        let id = AssetIdentifier::decode(raw)?;
        let sol = corelib::sol_for(&id)?;
        let trees = id.product_trees(sol);
        log::info!(
            "{} {} {} at sol {} (texture tree {}, XYZ tree {})",
            id,
            id.rover,
            id.camera,
            sol,
            trees.browse,
            trees.science
        );

        let resolver = AssetResolver::new(&self.config.resolver, self.fetcher);

        let texture_kind = if self.config.use_rad_texture {
            AssetKind::Texture16
        } else {
            AssetKind::Texture
        };
        let texture = recover(
            texture_kind,
            &id,
            self.load_texture(&resolver, texture_kind, &id, sol),
        )?;

        let depth = resolver.resolve(AssetKind::Depth, &id, sol)?;
        let bytes = read_product(&depth.local_path)?;
        let label = label::parse_label(&bytes)?;
        let grid = asset::decode_xyz(&bytes, &label)?;
        let mesh = TerrainMeshBuilder::new(self.config.mesh).build(&grid)?;

        let stem = depth
            .local_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());
        let name = format!("{}-{}", sol, stem);
        let collection = format!("Sol{}", sol);

        let scene_err = PipelineError::Scene;
        let handle = self
            .scene
            .add_mesh(&collection, &name, &mesh)
            .map_err(scene_err)?;

        if let Some(texture) = &texture {
            let uvs = uv::quad_uvs(mesh.vertices.lines, mesh.vertices.samples);
            self.scene.assign_uvs(handle, &uvs).map_err(scene_err)?;
            self.scene.add_material(handle, texture).map_err(scene_err)?;
        }

        let camera = camera_for(label.origin_offset, self.config.mesh.scale, &mesh);
        self.scene.place_camera(handle, &camera).map_err(scene_err)?;
        let text = caption(&id, sol, label.capture_time.as_deref(), texture.is_some());
        self.scene.add_caption(handle, &text).map_err(scene_err)?;
        self.scene.complete(handle).map_err(scene_err)?;

        Ok(BuildOutcome {
            id: id.to_string(),
            sol,
            name,
            vertices: mesh.vertices.positions.len(),
            faces: mesh.faces.len(),
            textured: texture.is_some(),
        })
    }

    fn load_texture<R: Fetcher + ?Sized>(
        &self,
        resolver: &AssetResolver<'_, R>,
        kind: AssetKind,
        id: &AssetIdentifier,
        sol: Sol,
    ) -> Result<TextureData, PipelineError> {
        let found = resolver.resolve(kind, id, sol)?;
        if kind != AssetKind::Texture16 {
            return Ok(TextureData::load(&found.local_path)?);
        }

        let bytes = read_product(&found.local_path)?;
        let label = label::parse_label(&bytes)?;
        let grid = asset::decode_rad(&bytes, &label)?;
        let texture = TextureData::from_rad_band(&grid);

        let png = found.local_path.with_extension("PNG");
        texture.save_png(&png)?;
        log::info!("Converted 16-bit texture to {}", png.display());
        Ok(texture)
    }
}

/// Non-fatal product kinds degrade to `None` instead of failing the id.
fn recover<T>(
    kind: AssetKind,
    id: &AssetIdentifier,
    result: Result<T, PipelineError>,
) -> Result<Option<T>, PipelineError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if kind.is_fatal() => Err(e),
        Err(e) => {
            log::warn!("No usable {} for {}, building untextured mesh: {}", kind, id, e);
            Ok(None)
        }
    }
}

fn read_product(path: &Path) -> Result<Vec<u8>, asset::AssetError> {
    fs::read(path).map_err(|source| asset::AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_ids() {
        assert_eq!(
            split_ids(" 2N295212876EFFB1DNP1950L0M1 ,, 1N123,"),
            vec!["2N295212876EFFB1DNP1950L0M1", "1N123"]
        );
        assert!(split_ids("").is_empty());
    }

    #[test]
    fn only_depth_failures_are_fatal() {
        let id = AssetIdentifier::decode("2N295212876EFFB1DNP1950L0M1").unwrap();
        let missing = |kind| {
            Err::<(), _>(PipelineError::Resolve(resolver::ResolveError::AssetNotFound {
                kind,
                id: id.to_string(),
                tried: 1,
            }))
        };

        for kind in [AssetKind::Texture, AssetKind::Texture16] {
            assert!(matches!(recover(kind, &id, missing(kind)), Ok(None)));
        }
        assert!(recover(AssetKind::Depth, &id, missing(AssetKind::Depth)).is_err());
        assert!(matches!(recover(AssetKind::Texture, &id, Ok(7)), Ok(Some(7))));
    }

    #[test]
    fn report_counts() {
        let mut report = BatchReport::default();
        report.entries.push(IdReport {
            input: "bad".to_string(),
            result: Err(PipelineError::Identifier(corelib::CoreError::UnknownRover {
                id: "bad".to_string(),
            })),
        });
        assert_eq!(report.built(), 0);
        assert_eq!(report.failed(), 1);
    }
}
