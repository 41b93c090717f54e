//! pfpforge turns a photo into a fixed 512×512 profile picture.
//!
//! # Pipeline overview
//!
//! 1. **Select**: [`SourceImage`] wraps the raw bytes of the chosen file
//! 2. **Remove**: a [`BackgroundRemover`] produces a cutout with transparent
//!    background pixels
//! 3. **Composite**: the fixed decorative backdrop, then the cutout, are each
//!    drawn to fully cover the 512×512 [`Surface`], in that order
//! 4. **Publish**: the surface is encoded to PNG and exposed as a base64
//!    [`CompositeResult`] for preview and download
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Strictly linear cycles**: the two draws are ordered by statement
//!   order, with a single completion point deciding Ready vs Idle.
//! - **No IO in drawing**: decoding is front-loaded; the draw sequence only
//!   ever sees [`PreparedImage`] buffers.
//! - **Premultiplied RGBA8** end-to-end: surfaces and prepared images hold
//!   premultiplied pixels; PNG output converts back to straight alpha.
#![forbid(unsafe_code)]

mod assets;
mod compositor;
mod encode;
mod foundation;
mod removal;
mod render;

pub use assets::PreparedImage;
pub use assets::backdrop::render_backdrop;
pub use assets::decode::decode_image;
pub use compositor::{CompositeResult, Compositor, Phase, SourceImage};
pub use encode::{DOWNLOAD_FILE_NAME, encode_png, from_base64, png_data_url, to_base64};
pub use foundation::core::{Canvas, PFP_CANVAS};
pub use foundation::error::{PfpError, PfpResult};
pub use removal::{
    BackgroundRemover, ChromaKeyRemover, RemovalOptions, RemoverKind, create_remover,
};
pub use render::Surface;
pub use render::composite::{PremulRgba8, draw_cover, over, over_in_place};
