//! Per-face texture coordinates for grid quads.
//!
//! The image origin is top-left while UV space has `v` pointing up, so
//! row `r` maps to `v = 1 - r / lines`.

/// UVs of the four corners of a quad, in face winding order.
pub type QuadUv = [[f32; 2]; 4];

#[inline]
pub fn corner_uv(row: usize, col: usize, lines: usize, samples: usize) -> [f32; 2] {
    let u = (1.0 / samples as f32) * col as f32;
    let v = 1.0 - (1.0 / lines as f32) * row as f32;
    [u, v]
}

/// One [`QuadUv`] per face, in the order faces are emitted.
pub fn quad_uvs(lines: usize, samples: usize) -> Vec<QuadUv> {
    let mut uvs = Vec::with_capacity(lines.saturating_sub(1) * samples.saturating_sub(1));
    for r in 0..lines.saturating_sub(1) {
        for c in 0..samples.saturating_sub(1) {
            uvs.push([
                corner_uv(r, c, lines, samples),
                corner_uv(r, c + 1, lines, samples),
                corner_uv(r + 1, c + 1, lines, samples),
                corner_uv(r + 1, c, lines, samples),
            ]);
        }
    }
    uvs
}

/// Flat per-loop UV list (four entries per face).
pub fn flatten(uvs: &[QuadUv]) -> Vec<[f32; 2]> {
    uvs.iter().flat_map(|q| q.iter().copied()).collect()
}
