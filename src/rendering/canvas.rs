//! CPU drawing surface the wallpaper is painted into.

use image::RgbaImage;
use tiny_skia::Pixmap;

/// 2D raster canvas. Zero-sized canvases hold no pixels and ignore drawing.
pub struct Canvas {
    pixmap: Option<Pixmap>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
        }
    }

    /// Reallocate for a new size (contents are discarded)
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() != (width, height) {
            self.pixmap = Pixmap::new(width, height);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |p| (p.width(), p.height()))
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn pixmap_mut(&mut self) -> Option<&mut Pixmap> {
        self.pixmap.as_mut()
    }

    /// Premultiplied RGBA8 rows, tightly packed
    pub fn data(&self) -> Option<&[u8]> {
        self.pixmap.as_ref().map(|p| p.data())
    }

    /// Straight-alpha copy of the current contents
    pub fn to_image(&self) -> Option<RgbaImage> {
        let pixmap = self.pixmap.as_ref()?;
        let bytes = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(pixmap.width(), pixmap.height(), bytes)
    }
}
