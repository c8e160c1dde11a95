//! Terrain mesh synthesis from XYZ position bands.

use corelib::Vec3;

use crate::band::PixelGrid;
use crate::error::{AssetError, AssetResult};

/// Longest gap (after scaling) bridged by interpolation.
pub const DEFAULT_MAX_FILL_LENGTH: f32 = 0.6;
/// Rover-frame metres to scene units.
pub const DEFAULT_VERTEX_SCALE: f32 = 0.1;

/// Quad as four vertex indices: (r,c), (r,c+1), (r+1,c+1), (r+1,c).
pub type Quad = [u32; 4];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshOptions {
    pub fill_gaps: bool,
    pub max_fill_length: f32,
    pub scale: f32,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            fill_gaps: true,
            max_fill_length: DEFAULT_MAX_FILL_LENGTH,
            scale: DEFAULT_VERTEX_SCALE,
        }
    }
}

/// Row-major vertex positions, one per pixel.
///
/// An exact zero position marks a pixel without range data. It cannot be
/// told apart from a real vertex at the origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexGrid {
    pub lines: usize,
    pub samples: usize,
    pub positions: Vec<Vec3>,
}

impl VertexGrid {
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.samples + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Vec3 {
        self.positions[self.index(row, col)]
    }

    #[inline]
    pub fn is_sentinel(&self, row: usize, col: usize) -> bool {
        is_sentinel(self.get(row, col))
    }

    pub fn sentinel_count(&self) -> usize {
        self.positions.iter().filter(|p| is_sentinel(**p)).count()
    }

    /// Mean of all vertices carrying range data.
    pub fn centroid(&self) -> Option<Vec3> {
        let (sum, count) = self
            .positions
            .iter()
            .filter(|p| !is_sentinel(**p))
            .fold((Vec3::ZERO, 0usize), |(sum, n), p| (sum + *p, n + 1));
        (count > 0).then(|| sum / count as f32)
    }
}

#[inline]
fn is_sentinel(p: Vec3) -> bool {
    p == Vec3::ZERO
}

/// Vertex grid plus quads, ready for scene assembly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    pub vertices: VertexGrid,
    pub faces: Vec<Quad>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TerrainMeshBuilder {
    options: MeshOptions,
}

impl TerrainMeshBuilder {
    pub fn new(options: MeshOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, grid: &PixelGrid) -> AssetResult<TerrainMesh> {
        if grid.band_count() != 3 {
            return Err(AssetError::BandCount {
                expected: 3,
                found: grid.band_count(),
            });
        }
        if u32::try_from(grid.lines * grid.samples).is_err() {
            return Err(AssetError::GridTooLarge {
                lines: grid.lines,
                samples: grid.samples,
            });
        }

        let mut vertices = synthesize_vertices(grid, self.options.scale);
        if self.options.fill_gaps {
            let filled = fill_gaps(&mut vertices, self.options.max_fill_length);
            log::debug!("Gap fill interpolated {} vertices", filled);
        }
        let faces = quad_faces(grid.lines, grid.samples);

        log::info!(
            "Built mesh: {} vertices ({} without range data), {} faces",
            vertices.positions.len(),
            vertices.sentinel_count(),
            faces.len()
        );
        Ok(TerrainMesh { vertices, faces })
    }
}

/// vertex(row, col) = (Y, X, -Z) * scale; rover Z points down.
pub fn synthesize_vertices(grid: &PixelGrid, scale: f32) -> VertexGrid {
    let (x, y, z) = (grid.band(0), grid.band(1), grid.band(2));
    let positions = (0..grid.lines * grid.samples)
        .map(|i| Vec3::new(y[i], x[i], -z[i]) * scale)
        .collect();
    VertexGrid {
        lines: grid.lines,
        samples: grid.samples,
        positions,
    }
}

/// Bridge vertical runs of sentinel vertices.
///
/// A run is filled only when it has a valid vertex directly above and a
/// valid vertex below before the grid edge, and the two bounds are closer
/// than `max_length`. Returns the number of vertices replaced.
pub fn fill_gaps(vertices: &mut VertexGrid, max_length: f32) -> usize {
    let lines = vertices.lines;
    let mut filled = 0;

    for col in 0..vertices.samples {
        for row in 0..lines.saturating_sub(1) {
            if vertices.is_sentinel(row, col) {
                continue;
            }

            let mut m = 1;
            while row + m < lines - 1 && vertices.is_sentinel(row + m, col) {
                m += 1;
            }
            if m == 1 || vertices.is_sentinel(row + m, col) {
                continue;
            }

            let a = vertices.get(row, col);
            let b = vertices.get(row + m, col);
            let span = b - a;
            if span.length() >= max_length {
                continue;
            }

            let step = span / m as f32;
            for n in 1..m {
                let i = vertices.index(row + n, col);
                vertices.positions[i] = a + step * n as f32;
                filled += 1;
            }
        }
    }

    filled
}

/// One quad per 2x2 pixel neighbourhood, row-major.
pub fn quad_faces(lines: usize, samples: usize) -> Vec<Quad> {
    let mut faces = Vec::with_capacity(lines.saturating_sub(1) * samples.saturating_sub(1));
    let idx = |r: usize, c: usize| (r * samples + c) as u32;
    for r in 0..lines.saturating_sub(1) {
        for c in 0..samples.saturating_sub(1) {
            faces.push([idx(r, c), idx(r, c + 1), idx(r + 1, c + 1), idx(r + 1, c)]);
        }
    }
    faces
}
