use image::imageops::FilterType;

use crate::{
    assets::PreparedImage,
    foundation::{
        core::Canvas,
        error::{PfpError, PfpResult},
    },
    render::Surface,
};

pub type PremulRgba8 = [u8; 4];

/// Source-over blend of one premultiplied pixel onto another.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over blend of a whole premultiplied RGBA8 buffer onto another.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> PfpResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PfpError::encode(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Draw a prepared image so it fully covers the surface.
///
/// The image is stretched to exactly the canvas size (aspect ratio is not
/// preserved) and source-over blended onto whatever the surface already
/// holds. Both layers of a composition pass through here, so their draw
/// order alone decides what ends up on top.
pub fn draw_cover(surface: &mut Surface, image: &PreparedImage) -> PfpResult<()> {
    let canvas = surface.canvas();
    if image.width == canvas.width && image.height == canvas.height {
        return over_in_place(surface.data_mut(), &image.rgba8_premul);
    }
    let scaled = scale_to_canvas(image, canvas)?;
    over_in_place(surface.data_mut(), &scaled)
}

fn scale_to_canvas(image: &PreparedImage, canvas: Canvas) -> PfpResult<Vec<u8>> {
    let buf = image::RgbaImage::from_raw(
        image.width,
        image.height,
        image.rgba8_premul.as_ref().clone(),
    )
    .ok_or_else(|| PfpError::decode("prepared image buffer does not match its dimensions"))?;

    // Resampling premultiplied pixels keeps transparent regions from
    // bleeding color into the cutout's edges.
    let resized = image::imageops::resize(&buf, canvas.width, canvas.height, FilterType::Lanczos3);
    Ok(resized.into_raw())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
