//! Settings export (JSON) and screenshot export (PNG).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::params::{CaptureConfig, Palette};
use crate::rendering::Canvas;
use crate::scene::Shape;

/// Settings document: current shape base attributes plus the palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsExport {
    pub shapes: Vec<Shape>,
    pub palette: Palette,
}

impl SettingsExport {
    pub fn new(shapes: &[Shape], palette: &Palette) -> Self {
        Self {
            shapes: shapes.to_vec(),
            palette: palette.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Write the canvas as PNG. Returns false for an empty canvas.
pub fn save_screenshot(canvas: &Canvas, path: &Path) -> Result<bool> {
    let Some(image) = canvas.to_image() else {
        return Ok(false);
    };
    ensure_parent(path)?;
    image.save(path)?;
    Ok(true)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Numbers captures within a session so nothing is overwritten
pub struct Exporter {
    config: CaptureConfig,
    screenshots: usize,
    settings: usize,
}

impl Exporter {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            screenshots: 0,
            settings: 0,
        }
    }

    pub fn screenshot(&mut self, canvas: &Canvas) -> Result<Option<PathBuf>> {
        let path = self.config.screenshot_path(self.screenshots);
        if !save_screenshot(canvas, &path)? {
            return Ok(None);
        }
        self.screenshots += 1;
        tracing::info!("Saved screenshot {}", path.display());
        Ok(Some(path))
    }

    pub fn settings(&mut self, shapes: &[Shape], palette: &Palette) -> Result<PathBuf> {
        let path = self.config.settings_path(self.settings);
        SettingsExport::new(shapes, palette).write(&path)?;
        self.settings += 1;
        tracing::info!("Exported settings {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SceneConfig;
    use crate::scene::SceneSystem;

    fn scene() -> SceneSystem {
        let config = SceneConfig {
            shape_count: 4,
            seed: Some(2),
            ..Default::default()
        };
        SceneSystem::new(config, 300, 200, 64).unwrap()
    }

    #[test]
    fn test_settings_json_shape() {
        let export = SettingsExport::new(scene().shapes(), &Palette::default());
        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();

        assert_eq!(value["shapes"].as_array().unwrap().len(), 4);
        assert_eq!(value["shapes"][1]["kind"], "triangle");
        assert_eq!(value["shapes"][0]["color"], "primary");
        assert!(value["shapes"][0]["frequencyBand"].as_u64().unwrap() < 64);
        assert_eq!(value["palette"]["ring"], "#fbbf24");

        let back = SettingsExport::from_json(&export.to_json().unwrap()).unwrap();
        assert_eq!(back.palette, export.palette);
        for (a, b) in back.shapes.iter().zip(&export.shapes) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.frequency_band, b.frequency_band);
            assert!((a.size - b.size).abs() < 1e-4);
            assert!((a.base_position - b.base_position).length() < 1e-3);
        }
    }

    #[test]
    fn test_exporter_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = Exporter::new(CaptureConfig {
            output_dir: dir.path().join("caps"),
        });

        let canvas = Canvas::new(16, 16);
        let first = exporter.screenshot(&canvas).unwrap().unwrap();
        let second = exporter.screenshot(&canvas).unwrap().unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());

        let decoded = image::open(&first).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));

        let settings = exporter.settings(scene().shapes(), &Palette::default()).unwrap();
        assert!(settings.exists());
    }

    #[test]
    fn test_empty_canvas_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = Exporter::new(CaptureConfig {
            output_dir: dir.path().to_path_buf(),
        });
        assert!(exporter.screenshot(&Canvas::new(0, 0)).unwrap().is_none());
    }
}
