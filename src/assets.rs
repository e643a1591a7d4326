use std::path::Path;

use crate::error::Error;

/// A decoded raster ready to be embedded as an image XObject.
#[derive(Clone)]
pub struct ImageAsset {
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// 8-bit RGB samples, row-major.
    pub rgb: Vec<u8>,
    /// 8-bit alpha samples, present only when some pixel is not fully opaque.
    pub alpha: Option<Vec<u8>>,
}

impl ImageAsset {
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba: image::RgbaImage = decoded.to_rgba8();
        let (w, h) = (rgba.width(), rgba.height());
        let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
        let rgb: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());
        Ok(Self {
            pixel_width: w,
            pixel_height: h,
            rgb,
            alpha,
        })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        Self::decode(&bytes)
    }

    /// Width/height ratio; 1.0 for degenerate images.
    pub fn aspect(&self) -> f32 {
        if self.pixel_height == 0 {
            1.0
        } else {
            self.pixel_width as f32 / self.pixel_height as f32
        }
    }
}

/// Load an optional visual element. Failures are logged and the element is omitted.
pub(crate) fn load_optional(path: Option<&Path>, what: &str) -> Option<ImageAsset> {
    let path = path?;
    match ImageAsset::load(path) {
        Ok(img) => {
            log::debug!(
                "Loaded {what} {} ({}x{})",
                path.display(),
                img.pixel_width,
                img.pixel_height
            );
            Some(img)
        }
        Err(e) => {
            log::warn!("Could not load {what} ({e}); it will be omitted");
            None
        }
    }
}

/// Faculty-specific graphic `<dir>/<BADGE>.png` (or `.jpg`/`.jpeg`), when one exists.
pub(crate) fn find_faculty_asset(dir: &Path, badge: &str) -> Option<std::path::PathBuf> {
    ["png", "jpg", "jpeg"]
        .iter()
        .map(|ext| dir.join(format!("{badge}.{ext}")))
        .find(|p| p.is_file())
}
