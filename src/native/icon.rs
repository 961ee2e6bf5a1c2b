use anyhow::{Context, Result};
use std::path::Path;

const DEFAULT_ICON_SIZE: u32 = 32;

/// Raw RGBA pixels shared by the window icon and the tray icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl IconImage {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading icon {}", path.display()))?;
        let image = image::load_from_memory(&bytes)
            .with_context(|| format!("decoding icon {}", path.display()))?
            .into_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            rgba: image.into_raw(),
            width,
            height,
        })
    }

    /// Rounded blue square used when no icon file is configured.
    pub fn fallback() -> Self {
        let size = DEFAULT_ICON_SIZE;
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let corner = (x < 2 || x >= size - 2) && (y < 2 || y >= size - 2);
                let alpha = if corner { 0 } else { 255 };
                rgba.extend_from_slice(&[40, 110, 200, alpha]);
            }
        }
        Self {
            rgba,
            width: size,
            height: size,
        }
    }

    /// `path` when it decodes, otherwise the built-in icon.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(icon)) => icon,
            Some(Err(err)) => {
                tracing::warn!(error = ?err, "using built-in icon");
                Self::fallback()
            }
            None => Self::fallback(),
        }
    }
}
