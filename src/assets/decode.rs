use std::sync::Arc;

use crate::{
    assets::PreparedImage,
    foundation::error::{PfpError, PfpResult},
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// This is the only place encoded payloads enter the drawing pipeline; a
/// malformed payload surfaces here as [`PfpError::Decode`] before any pixel
/// is touched.
pub fn decode_image(bytes: &[u8]) -> PfpResult<PreparedImage> {
    let dyn_img =
        image::load_from_memory(bytes).map_err(|e| PfpError::decode(e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
