//! Entry point for rover-terrain.
//! Turns rover image ids into textured terrain meshes on disk.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use asset::MeshOptions;
use clap::{ArgAction, Parser};
use platform::{ObjSceneWriter, Pipeline, PipelineConfig};
use resolver::{ReqwestFetcher, ResolverConfig};

#[derive(Parser, Debug)]
#[command(name = "rover-terrain")]
#[command(about = "Build terrain meshes from Mars rover Navcam/Hazcam XYZ products", long_about = None)]
struct Args {
    /// Image ids, separated by spaces or commas (e.g. 2N295212876EFFB1DNP1950L0M1)
    #[arg(required = true)]
    ids: Vec<String>,

    /// Close small holes in the depth data before meshing
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    fill_gaps: bool,

    /// Texture from the 16-bit RAD product instead of the browse image
    #[arg(long)]
    rad_texture: bool,

    /// Local product cache (default: <tmp>/MarsRoverImages)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Base URL of the remote archive
    #[arg(long)]
    remote_base: Option<String>,

    /// Where meshes, materials and scene sidecars are written
    #[arg(long, default_value = "rover-scenes")]
    output_dir: PathBuf,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let defaults = ResolverConfig::default();
        PipelineConfig {
            resolver: ResolverConfig::new(
                self.cache_dir.clone().unwrap_or(defaults.cache_root),
                self.remote_base.clone().unwrap_or(defaults.remote_base),
            ),
            mesh: MeshOptions {
                fill_gaps: self.fill_gaps,
                ..MeshOptions::default()
            },
            use_rad_texture: self.rad_texture,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.pipeline_config();
    log::info!(
        "Starting rover-terrain. Cache: {}, remote: {}, fill_gaps={}, rad_texture={}",
        config.resolver.cache_root.display(),
        config.resolver.remote_base,
        config.mesh.fill_gaps,
        config.use_rad_texture
    );

    let fetcher = ReqwestFetcher::new().context("Failed to create HTTP client")?;
    let mut writer = ObjSceneWriter::new(args.output_dir.clone());
    let report = Pipeline::new(&config, &fetcher, &mut writer).run_batch(&args.ids.join(","));

    for entry in &report.entries {
        match &entry.result {
            Ok(outcome) => println!(
                "{}  sol {}  {} vertices  {} faces{}",
                outcome.id,
                outcome.sol,
                outcome.vertices,
                outcome.faces,
                if outcome.textured { "" } else { "  (untextured)" }
            ),
            Err(e) => println!("{}  FAILED: {}", entry.input, e),
        }
    }
    println!("Output: {}", writer.root().display());

    if report.built() == 0 {
        bail!("No meshes were built");
    }
    Ok(())
}
