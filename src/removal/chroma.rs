use std::io::Cursor;

use image::Rgba;

use crate::{
    foundation::error::{PfpError, PfpResult},
    removal::{BackgroundRemover, RemovalOptions},
};

/// Chroma-key background removal.
///
/// Samples a pixel near the top-left corner as the key color and rewrites
/// every pixel within [`RemovalOptions::threshold`] of it (per channel) as
/// fully transparent. Works well for photos shot against a flat studio
/// backdrop; busy backgrounds need a segmentation-based remover behind the
/// same trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChromaKeyRemover {
    opts: RemovalOptions,
}

impl ChromaKeyRemover {
    pub fn new(opts: RemovalOptions) -> Self {
        Self { opts }
    }
}

impl BackgroundRemover for ChromaKeyRemover {
    fn remove_background(&self, image: &[u8]) -> PfpResult<Vec<u8>> {
        let mut rgba = image::load_from_memory(image)
            .map_err(|e| PfpError::decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let kx = self.opts.corner_offset.min(width.saturating_sub(1));
        let ky = self.opts.corner_offset.min(height.saturating_sub(1));
        let key = *rgba.get_pixel(kx, ky);

        for px in rgba.pixels_mut() {
            if is_near(key, *px, self.opts.threshold) {
                *px = Rgba([0, 0, 0, 0]);
            }
        }

        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| PfpError::encode(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

fn is_near(key: Rgba<u8>, px: Rgba<u8>, threshold: u8) -> bool {
    (0..3).all(|i| key[i].abs_diff(px[i]) < threshold)
}
