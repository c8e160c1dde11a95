//! Product decoding and terrain geometry.
//! Labels and band-sequential payloads of PDS `.IMG` files, XYZ to mesh
//! conversion with gap filling, per-face UVs and texture data.

pub mod band;
pub mod error;
pub mod label;
pub mod mesh;
pub mod texture;
pub mod uv;

pub use band::{PixelGrid, SampleFormat, decode_rad, decode_xyz};
pub use error::{AssetError, AssetResult};
pub use label::LabelMetadata;
pub use mesh::{MeshOptions, Quad, TerrainMesh, TerrainMeshBuilder, VertexGrid};
pub use texture::{IntensityRange, TextureData};
pub use uv::QuadUv;
