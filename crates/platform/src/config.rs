use asset::MeshOptions;
use resolver::ResolverConfig;

/// Everything a batch run needs; passed explicitly to every stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineConfig {
    pub resolver: ResolverConfig,
    pub mesh: MeshOptions,
    /// Texture from the 16-bit RAD product instead of the 8-bit browse image.
    pub use_rad_texture: bool,
}
