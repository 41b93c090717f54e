use crate::foundation::error::PfpResult;

pub mod chroma;

pub use chroma::ChromaKeyRemover;

/// The background-removal capability.
///
/// A narrow seam: encoded image bytes in, encoded image bytes with background
/// pixels fully transparent out. The compositor treats implementations as a
/// black box and maps any failure to its `Processing` error path, so mocks
/// can stand in without touching the drawing logic.
pub trait BackgroundRemover {
    fn remove_background(&self, image: &[u8]) -> PfpResult<Vec<u8>>;
}

/// Tuning for the built-in chroma-key remover.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemovalOptions {
    /// Per-channel distance to the sampled key color below which a pixel is
    /// classified as background.
    pub threshold: u8,
    /// Offset from the top-left corner of the pixel sampled as the key color
    /// (clamped to the image bounds).
    pub corner_offset: u32,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            threshold: 30,
            corner_offset: 5,
        }
    }
}

/// Which removal implementation to instantiate.
#[derive(Clone, Copy, Debug)]
pub enum RemoverKind {
    ChromaKey,
}

/// Instantiate a removal capability behind the trait object the compositor
/// holds.
pub fn create_remover(kind: RemoverKind, opts: RemovalOptions) -> Box<dyn BackgroundRemover> {
    match kind {
        RemoverKind::ChromaKey => Box::new(ChromaKeyRemover::new(opts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_and_partial_json() {
        let opts = RemovalOptions::default();
        assert_eq!(opts.threshold, 30);
        assert_eq!(opts.corner_offset, 5);

        let parsed: RemovalOptions = serde_json::from_str(r#"{"threshold": 12}"#).unwrap();
        assert_eq!(parsed.threshold, 12);
        assert_eq!(parsed.corner_offset, 5);
    }
}
