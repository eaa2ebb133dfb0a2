//! Errors that abort a render

use std::{io, path::PathBuf};

use image::ImageError;
use thiserror::Error;

use crate::typeset::FontError;

/// A fatal error while rendering a card
#[derive(Debug, Error)]
pub enum RenderError {
    /// The canvas could not be allocated
    #[error("cannot allocate a {width}x{height} canvas at {dpi} dpi")]
    Canvas {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
        /// Requested resolution
        dpi: f32,
    },
    /// No usable font could be found or drawn
    #[error("font error")]
    Font(#[from] FontError),
    /// Encoding the canvas failed
    #[error("failed to encode card image")]
    Encode(#[source] ImageError),
    /// Writing the output failed
    #[error("failed to write {}", path.display())]
    Io {
        /// The output file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },
}
