//! Pipeline orchestration: id in, assembled terrain scene out.
//!
//! Stages run strictly in sequence per id; the batch runner keeps going
//! when an individual id fails.

pub mod caption;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod scene;

pub use caption::{UNTEXTURED_CAPTION, caption};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use export::ObjSceneWriter;
pub use pipeline::{BatchReport, BuildOutcome, IdReport, Pipeline, split_ids};
pub use scene::{MeshHandle, SceneAssembly, camera_for};
