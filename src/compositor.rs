use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::{PreparedImage, backdrop::render_backdrop, decode::decode_image},
    encode::{DOWNLOAD_FILE_NAME, encode_png, from_base64, png_data_url, to_base64},
    foundation::{
        core::{Canvas, PFP_CANVAS},
        error::{PfpError, PfpResult},
    },
    removal::BackgroundRemover,
    render::{Surface, composite::draw_cover},
};

/// Raw bytes of a selected file plus a best-effort sniffed MIME type.
///
/// Nothing is validated here; bytes that are not a decodable image fail later
/// at the decode step, exactly once, with a [`PfpError::Decode`].
#[derive(Clone, Debug)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime: Option<String>,
}

impl SourceImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime = image::guess_format(&bytes)
            .ok()
            .map(|f| f.to_mime_type().to_string());
        Self { bytes, mime }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

/// The published outcome of a successful generation cycle: a base64 PNG
/// payload at the fixed canvas size.
#[derive(Clone, Debug)]
pub struct CompositeResult {
    canvas: Canvas,
    png_base64: String,
}

impl CompositeResult {
    fn from_png(canvas: Canvas, png: &[u8]) -> Self {
        Self {
            canvas,
            png_base64: to_base64(png),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The payload as standard base64.
    pub fn as_base64(&self) -> &str {
        &self.png_base64
    }

    /// The payload as a `data:image/png;base64,...` URL.
    pub fn data_url(&self) -> String {
        png_data_url(&self.png_base64)
    }

    /// Decode the payload back into PNG bytes.
    pub fn to_png_bytes(&self) -> PfpResult<Vec<u8>> {
        from_base64(&self.png_base64)
    }

    /// Write the decoded PNG to an explicit path.
    pub fn write_png(&self, path: &Path) -> PfpResult<()> {
        let bytes = self.to_png_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Save the picture under the fixed download name inside `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> PfpResult<PathBuf> {
        let path = dir.join(DOWNLOAD_FILE_NAME);
        self.write_png(&path)?;
        Ok(path)
    }
}

/// Where the compositor is within a generation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RemovingBackground,
    DrawingBackdrop,
    DrawingForeground,
    Ready,
}

impl Phase {
    /// True while a cycle is in flight (between `generate` starting and the
    /// result being published or the cycle failing).
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            Phase::RemovingBackground | Phase::DrawingBackdrop | Phase::DrawingForeground
        )
    }
}

/// Turns a selected photo into the fixed 512×512 profile picture.
///
/// One strictly linear cycle per [`generate`](Compositor::generate) call:
/// remove the background, draw the fixed backdrop over the full surface, draw
/// the cutout over the backdrop, encode, publish. The phase moves back to
/// [`Phase::Idle`] on every failure path; nothing is ever published from a
/// partially drawn surface.
pub struct Compositor {
    remover: Box<dyn BackgroundRemover>,
    backdrop: PreparedImage,
    surface: Surface,
    source: Option<SourceImage>,
    result: Option<CompositeResult>,
    phase: Phase,
}

impl Compositor {
    /// A compositor drawing over the fixed decorative backdrop.
    pub fn new(remover: Box<dyn BackgroundRemover>) -> Self {
        Self::with_backdrop(remover, render_backdrop(PFP_CANVAS))
    }

    /// A compositor with a caller-supplied lower layer. The production
    /// backdrop is a constant; this seam exists so tests can observe known
    /// pixels under the cutout.
    pub fn with_backdrop(remover: Box<dyn BackgroundRemover>, backdrop: PreparedImage) -> Self {
        Self {
            remover,
            backdrop,
            surface: Surface::new(PFP_CANVAS),
            source: None,
            result: None,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The last published result, if any.
    pub fn result(&self) -> Option<&CompositeResult> {
        self.result.as_ref()
    }

    /// Replace the current source image and invalidate any previous result.
    pub fn select_source(&mut self, source: SourceImage) {
        self.source = Some(source);
        self.result = None;
        self.phase = Phase::Idle;
    }

    /// Run one full generation cycle: removal, compositing, publication.
    ///
    /// Rejects with [`PfpError::Busy`] while a cycle is in flight and with
    /// [`PfpError::MissingInput`] when no source is selected; the missing-
    /// input path leaves any previous result untouched. A removal failure is
    /// logged with its diagnostic detail and surfaced as
    /// [`PfpError::Processing`].
    #[tracing::instrument(skip(self))]
    pub fn generate(&mut self) -> PfpResult<&CompositeResult> {
        if self.phase.is_busy() {
            return Err(PfpError::Busy);
        }
        if self.source.is_none() {
            return Err(PfpError::MissingInput);
        }

        self.result = None;
        self.phase = Phase::RemovingBackground;

        let removed = match self.source.as_ref() {
            Some(source) => self.remover.remove_background(source.bytes()),
            None => {
                self.phase = Phase::Idle;
                return Err(PfpError::MissingInput);
            }
        };
        let cutout = match removed {
            Ok(bytes) => bytes,
            Err(e) => {
                self.phase = Phase::Idle;
                tracing::error!(error = %e, "background removal failed");
                return Err(PfpError::processing(e.to_string()));
            }
        };

        self.composite_and_publish(&cutout)
    }

    /// Composite an already background-removed payload over the backdrop and
    /// publish the result.
    ///
    /// This is the second half of [`generate`](Compositor::generate), exposed
    /// for callers that obtained a cutout elsewhere.
    pub fn composite(&mut self, processed: &[u8]) -> PfpResult<&CompositeResult> {
        if self.phase.is_busy() {
            return Err(PfpError::Busy);
        }
        self.result = None;
        self.composite_and_publish(processed)
    }

    // Single completion point of a cycle: exactly one match decides whether
    // the phase ends at Ready (with a published result) or back at Idle.
    fn composite_and_publish(&mut self, processed: &[u8]) -> PfpResult<&CompositeResult> {
        match self.run_draw_sequence(processed) {
            Ok(result) => {
                self.phase = Phase::Ready;
                Ok(self.result.insert(result))
            }
            Err(e) => {
                self.phase = Phase::Idle;
                tracing::error!(error = %e, "compositing failed");
                Err(e)
            }
        }
    }

    // The backdrop draw must fully complete before the foreground draw
    // starts; the foreground composites over pixels already present.
    fn run_draw_sequence(&mut self, processed: &[u8]) -> PfpResult<CompositeResult> {
        self.phase = Phase::DrawingBackdrop;
        self.surface.clear();
        draw_cover(&mut self.surface, &self.backdrop)?;

        self.phase = Phase::DrawingForeground;
        let foreground = decode_image(processed)?;
        draw_cover(&mut self.surface, &foreground)?;

        let png = encode_png(&self.surface)?;
        Ok(CompositeResult::from_png(self.surface.canvas(), &png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::removal::{RemovalOptions, RemoverKind, create_remover};

    #[test]
    fn new_compositor_starts_idle_with_nothing_published() {
        let c = Compositor::new(create_remover(
            RemoverKind::ChromaKey,
            RemovalOptions::default(),
        ));
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.is_busy());
        assert!(c.source().is_none());
        assert!(c.result().is_none());
    }

    #[test]
    fn source_image_sniffs_png_mime() {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let source = SourceImage::from_bytes(buf);
        assert_eq!(source.mime_type(), Some("image/png"));

        let unknown = SourceImage::from_bytes(b"plain text".to_vec());
        assert_eq!(unknown.mime_type(), None);
    }
}
