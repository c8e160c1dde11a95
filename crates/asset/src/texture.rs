//! Texture data for terrain materials.
//! Browse products are 8-bit JPG/PNG; RAD products are converted from a
//! 16-bit band into a grayscale PNG.

use std::path::Path;

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageBuffer, ImageFormat, ImageReader, Luma, RgbaImage};

use crate::band::PixelGrid;
use crate::error::{AssetError, AssetResult};

/// Normalised intensity span actually used by the image, for contrast
/// stretching in the material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityRange {
    pub min: f32,
    pub max: f32,
}

impl Default for IntensityRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TexturePixels {
    Rgba8(Vec<u8>),
    Gray16(Vec<u16>),
}

/// Texture data in CPU-friendly format, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub pixels: TexturePixels,
    pub width: u32,
    pub height: u32,
    pub levels: IntensityRange,
}

impl TextureData {
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            pixels: TexturePixels::Rgba8(data),
            width,
            height,
            levels: IntensityRange::default(),
        }
    }

    /// 16-bit grayscale; levels span the min/max of `value / 65536`.
    pub fn new_gray16(width: u32, height: u32, data: Vec<u16>) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "Data size doesn't match Gray16 format"
        );
        let levels = data
            .iter()
            .map(|&v| f32::from(v) / 65536.0)
            .fold(None, |acc: Option<IntensityRange>, v| {
                Some(match acc {
                    None => IntensityRange { min: v, max: v },
                    Some(r) => IntensityRange {
                        min: r.min.min(v),
                        max: r.max.max(v),
                    },
                })
            })
            .unwrap_or_default();
        Self {
            pixels: TexturePixels::Gray16(data),
            width,
            height,
            levels,
        }
    }

    /// Convert a decoded RAD band (values already in `0..=65535`).
    pub fn from_rad_band(grid: &PixelGrid) -> Self {
        let data = grid
            .band(0)
            .iter()
            .map(|&v| v.clamp(0.0, f32::from(u16::MAX)) as u16)
            .collect();
        Self::new_gray16(grid.samples as u32, grid.lines as u32, data)
    }

    /// Load a browse image, sniffing the format from its content.
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let io_err = |source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        };
        let img = ImageReader::open(path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?
            .decode()?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Ok(Self::new_rgba8(width, height, data))
    }

    /// Write the texture as PNG (16-bit grayscale or RGBA8).
    pub fn save_png(&self, path: impl AsRef<Path>) -> AssetResult<()> {
        let path = path.as_ref();
        match &self.pixels {
            TexturePixels::Rgba8(data) => {
                let img = RgbaImage::from_raw(self.width, self.height, data.clone())
                    .ok_or_else(|| invalid_buffer(self))?;
                img.save_with_format(path, ImageFormat::Png)?;
            }
            TexturePixels::Gray16(data) => {
                let img: ImageBuffer<Luma<u16>, Vec<u16>> =
                    ImageBuffer::from_raw(self.width, self.height, data.clone())
                        .ok_or_else(|| invalid_buffer(self))?;
                img.save_with_format(path, ImageFormat::Png)?;
            }
        }
        log::debug!("Wrote {}x{} PNG to {}", self.width, self.height, path.display());
        Ok(())
    }
}

fn invalid_buffer(texture: &TextureData) -> AssetError {
    log::error!("Pixel buffer does not match {}x{}", texture.width, texture.height);
    AssetError::Image(image::ImageError::Parameter(ParameterError::from_kind(
        ParameterErrorKind::DimensionMismatch,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rad_band_levels() {
        let grid = PixelGrid::new(1, 4, vec![vec![0.0, 16384.0, 32768.0, 49152.0]]);
        let tex = TextureData::from_rad_band(&grid);
        assert_eq!(tex.pixels, TexturePixels::Gray16(vec![0, 16384, 32768, 49152]));
        assert_eq!((tex.width, tex.height), (4, 1));
        assert_eq!(tex.levels, IntensityRange { min: 0.0, max: 0.75 });
    }

    #[test]
    fn empty_gray_defaults_to_full_range() {
        let tex = TextureData::new_gray16(0, 0, Vec::new());
        assert_eq!(tex.levels, IntensityRange::default());
    }

    #[test]
    fn png_round_trip_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.PNG");

        let tex = TextureData::new_gray16(2, 2, vec![0, 1000, 40000, 65535]);
        tex.save_png(&path).unwrap();

        let loaded = TextureData::load(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (2, 2));
        match loaded.pixels {
            TexturePixels::Rgba8(data) => assert_eq!(data.len(), 16),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
