//! # Fitting images into boxes
//!
//! An image is scaled to the largest rectangle with its own aspect ratio
//! that fits into the box, and centered along the axis that has slack.
//! If the image can't be loaded, the box itself is kept as the region for
//! a placeholder.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use image::{ImageError, RgbaImage};
use thiserror::Error;

use crate::geom::BoxRegion;

/// Compute the sub-rectangle of `bbox` that an image with aspect ratio
/// `source_aspect` (width / height) occupies when scaled to fit.
///
/// - A relatively wider source is constrained by the box width and
///   centered vertically.
/// - A relatively taller source is constrained by the box height and
///   centered horizontally.
/// - A source with exactly the aspect ratio of the box fills the box.
///
/// ```
/// use idcard::{fit::fit, geom::BoxRegion};
/// let bbox = BoxRegion::new(0.0, 0.0, 200.0, 100.0);
/// assert_eq!(fit(1.0, bbox), BoxRegion::new(50.0, 0.0, 100.0, 100.0));
/// assert_eq!(fit(4.0, bbox), BoxRegion::new(0.0, 25.0, 200.0, 50.0));
/// ```
pub fn fit(source_aspect: f32, bbox: BoxRegion) -> BoxRegion {
    let box_aspect = bbox.aspect();
    if source_aspect > box_aspect {
        let h = bbox.w / source_aspect;
        BoxRegion {
            y: bbox.y + (bbox.h - h) / 2.0,
            h,
            ..bbox
        }
    } else if source_aspect == box_aspect {
        bbox
    } else {
        let w = bbox.h * source_aspect;
        BoxRegion {
            x: bbox.x + (bbox.w - w) / 2.0,
            w,
            ..bbox
        }
    }
}

/// Why an image asset could not be used
#[derive(Debug, Error)]
pub enum AssetError {
    /// No path was configured
    #[error("no path configured")]
    NoPath,
    /// The path does not point to a file
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file could not be read
    #[error("failed to read {}", path.display())]
    Read {
        /// The file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },
    /// The file could not be decoded as an image
    #[error("failed to decode {}", path.display())]
    Decode {
        /// The file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: ImageError,
    },
    /// The image has no pixels
    #[error("image {} is empty", .0.display())]
    Empty(PathBuf),
}

/// The result of fitting an image slot
pub enum FittedImage {
    /// The image was loaded and scaled into `region`
    Placed {
        /// The fitted sub-rectangle of the box
        region: BoxRegion,
        /// The decoded image
        source: RgbaImage,
    },
    /// The image is unavailable, `region` is the untouched box
    Missing {
        /// The original box
        region: BoxRegion,
        /// Why the image is unavailable
        cause: AssetError,
    },
}

impl FittedImage {
    /// The region that is drawn into
    pub fn region(&self) -> BoxRegion {
        match self {
            Self::Placed { region, .. } | Self::Missing { region, .. } => *region,
        }
    }

    /// Whether a placeholder has to be drawn
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

impl fmt::Debug for FittedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placed { region, source } => f
                .debug_struct("Placed")
                .field("region", region)
                .field("source", &source.dimensions())
                .finish(),
            Self::Missing { region, cause } => f
                .debug_struct("Missing")
                .field("region", region)
                .field("cause", cause)
                .finish(),
        }
    }
}

/// Load an image from the file system
pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.to_owned()));
    }
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_owned(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_owned(),
        source,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AssetError::Empty(path.to_owned()));
    }
    Ok(image.into_rgba8())
}

/// Load the image at `path` (if any) and fit it into `bbox`
///
/// This never fails: any problem with the asset results in
/// [`FittedImage::Missing`] with `bbox` as the region.
pub fn fit_image(path: Option<&Path>, bbox: BoxRegion) -> FittedImage {
    let loaded = match path {
        Some(path) if !path.as_os_str().is_empty() => load_image(path),
        _ => Err(AssetError::NoPath),
    };
    match loaded {
        Ok(source) => {
            let aspect = source.width() as f32 / source.height() as f32;
            let region = fit(aspect, bbox);
            log::debug!(
                "Fitted {}x{} image into {:?} as {:?}",
                source.width(),
                source.height(),
                bbox,
                region
            );
            FittedImage::Placed { region, source }
        }
        Err(cause) => FittedImage::Missing {
            region: bbox,
            cause,
        },
    }
}
