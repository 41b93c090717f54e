/// Dimensions of a draw surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// The fixed profile-picture canvas. Every composition is produced at this
/// size regardless of input dimensions.
pub const PFP_CANVAS: Canvas = Canvas {
    width: 512,
    height: 512,
};
