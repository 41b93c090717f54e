use std::sync::Arc;

use crate::{assets::PreparedImage, foundation::core::Canvas};

/// Render the fixed decorative backdrop: a warm light burst over a deep
/// indigo field, with angular streaks radiating from the center.
///
/// The backdrop is the constant lower layer of every composition. It is
/// deterministic (pure function of the canvas), fully opaque, and produced at
/// exactly the requested canvas size so the backdrop draw never resamples.
pub fn render_backdrop(canvas: Canvas) -> PreparedImage {
    let mut data = Vec::with_capacity(canvas.rgba8_len());
    let cx = canvas.width.saturating_sub(1) as f32 / 2.0;
    let cy = canvas.height.saturating_sub(1) as f32 / 2.0;
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);

    for y in 0..canvas.height {
        for x in 0..canvas.width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            // Normalized distance from center: 0 at the core, 1 at corners.
            let r = (dx * dx + dy * dy).sqrt() / max_r;
            let angle = dy.atan2(dx);

            let glow = (1.0 - r).clamp(0.0, 1.0).powf(1.8);
            // Streaks live on a mid-radius band so the core stays clean.
            let band = (1.0 - (r - 0.55).abs() * 2.2).clamp(0.0, 1.0);
            let streak = (angle * 12.0).sin().abs().powf(6.0) * band;
            let i = (glow + 0.45 * streak).clamp(0.0, 1.0);

            data.push(lerp(26.0, 250.0, i) as u8);
            data.push(lerp(16.0, 242.0, i) as u8);
            data.push(lerp(58.0, 228.0, i) as u8);
            data.push(255);
        }
    }

    PreparedImage {
        width: canvas.width,
        height: canvas.height,
        rgba8_premul: Arc::new(data),
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::PFP_CANVAS;

    fn pixel(img: &PreparedImage, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * img.width + x) * 4) as usize;
        let px = &img.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }

    #[test]
    fn backdrop_matches_canvas_and_is_opaque() {
        let bg = render_backdrop(PFP_CANVAS);
        assert_eq!((bg.width, bg.height), (512, 512));
        assert_eq!(bg.rgba8_premul.len(), PFP_CANVAS.rgba8_len());
        assert!(bg.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn backdrop_is_deterministic() {
        let a = render_backdrop(PFP_CANVAS);
        let b = render_backdrop(PFP_CANVAS);
        assert_eq!(a.rgba8_premul, b.rgba8_premul);
    }

    #[test]
    fn backdrop_core_is_brighter_than_corner() {
        let bg = render_backdrop(PFP_CANVAS);
        let core = pixel(&bg, 256, 256);
        let corner = pixel(&bg, 0, 0);
        assert!(core[0] > corner[0]);
        assert!(core[1] > corner[1]);
        assert!(core[2] > corner[2]);
    }
}
