use std::sync::Arc;

use image::{RgbaImage, imageops};

use crate::packer::ShelfPacker;

/// An immutable snapshot of one atlas page.
///
/// Later placements copy the page before writing to it, so a snapshot never
/// changes and stays valid after its font is destroyed.
pub type AtlasPageRef = Arc<RgbaImage>;

pub(crate) struct AtlasPage {
    image: AtlasPageRef,
    pub(crate) packer: ShelfPacker,
}

impl AtlasPage {
    pub(crate) fn new(size: u32) -> Self {
        Self {
            image: Arc::new(RgbaImage::new(size, size)),
            packer: ShelfPacker::new(size),
        }
    }

    pub(crate) fn snapshot(&self) -> AtlasPageRef {
        Arc::clone(&self.image)
    }

    /// Copy a bitmap into the page with its top-left corner at `(x, y)`.
    pub(crate) fn blit(&mut self, x: u32, y: u32, bitmap: &RgbaImage) {
        imageops::replace(Arc::make_mut(&mut self.image), bitmap, i64::from(x), i64::from(y));
    }
}
