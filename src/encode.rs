use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::{
    foundation::error::{PfpError, PfpResult},
    render::Surface,
};

/// Fixed name the composited picture is saved under.
pub const DOWNLOAD_FILE_NAME: &str = "pfp.png";

/// Encode a surface as PNG bytes.
///
/// Surfaces hold premultiplied pixels; PNG stores straight alpha, so the
/// buffer is unpremultiplied on the way out.
pub fn encode_png(surface: &Surface) -> PfpResult<Vec<u8>> {
    let mut straight = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);

    let canvas = surface.canvas();
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, straight)
        .ok_or_else(|| PfpError::encode("surface buffer does not match its canvas"))?;

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| PfpError::encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Base64 (standard alphabet, padded) of an encoded payload.
pub fn to_base64(encoded: &[u8]) -> String {
    BASE64.encode(encoded)
}

/// Decode a base64 payload produced by [`to_base64`].
pub fn from_base64(data: &str) -> PfpResult<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|e| PfpError::decode(e.to_string()))
}

/// `data:image/png;base64,...` URL for a base64 PNG payload.
pub fn png_data_url(base64: &str) -> String {
    format!("data:image/png;base64,{base64}")
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;

    #[test]
    fn encode_png_round_trips_dimensions() {
        let canvas = Canvas {
            width: 6,
            height: 4,
        };
        let surface = Surface::new(canvas);
        let png = encode_png(&surface).unwrap();

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (6, 4));
    }

    #[test]
    fn unpremultiply_inverts_premultiply() {
        // straight (100, 50, 200, 128) premultiplies to (50, 25, 100, 128)
        let mut px = vec![50u8, 25, 100, 128];
        unpremultiply_rgba8_in_place(&mut px);
        assert_eq!(px, vec![100, 50, 199, 128]);
    }

    #[test]
    fn base64_round_trip_and_data_url_prefix() {
        let payload = b"\x89PNG\r\n";
        let b64 = to_base64(payload);
        assert_eq!(from_base64(&b64).unwrap(), payload);
        assert!(png_data_url(&b64).starts_with("data:image/png;base64,"));
    }
}
