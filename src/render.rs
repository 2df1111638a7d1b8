//! Rendering of a path into an RGBA image sized to its bounding box
use crate::{
    DEFAULT_FLATNESS, FillRule, Image, ImageMut, ImageOwned, LinColor, LineCap, LineJoin, Path,
    Rgba, Scalar, StrokeStyle, Transform,
};
use std::fmt;

/// Image produced by the rasterizer
pub type RasterImage = ImageOwned<Rgba>;

/// Colors and stroke parameters used to render a path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderStyle {
    /// Fill color, path interior is not painted if `None`
    pub fill: Option<Rgba>,
    /// Stroke color, path outline is not painted if `None`
    pub stroke: Option<Rgba>,
    /// Stroke width, defaults to `1.0`. Zero or negative width paints nothing,
    /// there is no hairline stroke.
    pub stroke_width: Scalar,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
        }
    }
}

impl RenderStyle {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.stroke_width,
            line_join: self.line_join,
            line_cap: self.line_cap,
        }
    }
}

/// Reason for the surface acquisition to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFailure {
    /// Path has no segments, hence no bounding box
    EmptyPath,
    /// Bounding box has zero width or height
    ZeroArea,
    /// Number of pixels is bigger than the configured limit
    TooLarge { max_area: usize },
    /// Pixel buffer could not be allocated
    OutOfMemory,
}

impl fmt::Display for SurfaceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceFailure::EmptyPath => write!(f, "path is empty"),
            SurfaceFailure::ZeroArea => write!(f, "bounding box has zero area"),
            SurfaceFailure::TooLarge { max_area } => {
                write!(f, "area exceeds the limit of {} pixels", max_area)
            }
            SurfaceFailure::OutOfMemory => write!(f, "pixel buffer allocation failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    SurfaceAcquisitionFailure {
        width: usize,
        height: usize,
        reason: SurfaceFailure,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SurfaceAcquisitionFailure {
                width,
                height,
                reason,
            } => write!(
                f,
                "Failed to acquire {}x{} drawing surface: {}",
                width, height, reason
            ),
        }
    }
}

impl std::error::Error for RenderError {}

/// Drawing surface, pixels are released when the surface is dropped
struct Surface {
    color: ImageOwned<LinColor>,
    mask: ImageOwned<Scalar>,
}

impl Surface {
    fn acquire(width: usize, height: usize, max_area: usize) -> Result<Self, RenderError> {
        let failure = |reason| RenderError::SurfaceAcquisitionFailure {
            width,
            height,
            reason,
        };
        if width == 0 || height == 0 {
            return Err(failure(SurfaceFailure::ZeroArea));
        }
        match width.checked_mul(height) {
            Some(area) if area <= max_area => {}
            _ => return Err(failure(SurfaceFailure::TooLarge { max_area })),
        }
        let color = ImageOwned::try_new_default(height, width)
            .ok_or_else(|| failure(SurfaceFailure::OutOfMemory))?;
        let mask = ImageOwned::try_new_default(height, width)
            .ok_or_else(|| failure(SurfaceFailure::OutOfMemory))?;
        tracing::trace!("[surface:acquire] {}x{}", width, height);
        Ok(Self { color, mask })
    }

    /// Composite `color` over the surface using coverage of the path
    fn paint(&mut self, path: &Path, flatness: Scalar, fill_rule: FillRule, color: Rgba) {
        self.mask.clear();
        let mask = path.mask(Transform::identity(), flatness, fill_rule, &mut self.mask);
        let color = LinColor::from(color);
        for (dst, coverage) in self.color.data_mut().iter_mut().zip(mask.data()) {
            if *coverage > 0.0 {
                *dst = dst.blend_over(color.with_alpha(*coverage));
            }
        }
    }

    fn to_image(&self) -> RasterImage {
        let color = &self.color;
        ImageOwned::new_with(color.height(), color.width(), |row, col| {
            color.get(row, col).copied().map(Rgba::from).unwrap_or_default()
        })
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        tracing::trace!(
            "[surface:release] {}x{}",
            self.color.width(),
            self.color.height()
        );
    }
}

/// Rasterizer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Rasterizer {
    /// Maximum distance between a curve and its line approximation
    pub flatness: Scalar,
    /// Fill rule used to fill the path interior
    pub fill_rule: FillRule,
    /// Maximum number of pixels of the drawing surface
    pub max_area: usize,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            flatness: DEFAULT_FLATNESS,
            fill_rule: FillRule::default(),
            max_area: 1 << 26,
        }
    }
}

impl Rasterizer {
    /// Render path into an image of the size of its bounding box.
    ///
    /// Path is translated so the top left corner of the bounding box ends up at
    /// the origin of the image. Stroke is painted over the fill, and parts of it
    /// outside of the bounding box are clipped.
    pub fn rasterize(
        &self,
        mut path: Path,
        style: &RenderStyle,
    ) -> Result<RasterImage, RenderError> {
        let Some(bbox) = path.normalize() else {
            tracing::warn!("[rasterize] path is empty");
            return Err(RenderError::SurfaceAcquisitionFailure {
                width: 0,
                height: 0,
                reason: SurfaceFailure::EmptyPath,
            });
        };
        tracing::debug!("[path:bbox] {:?}", bbox);
        tracing::debug!("[path:segments_count] {}", path.segments_count());

        let width = bbox.width().ceil() as usize;
        let height = bbox.height().ceil() as usize;
        let mut surface = Surface::acquire(width, height, self.max_area).inspect_err(|error| {
            tracing::warn!("[rasterize] {}", error);
        })?;

        if let Some(fill) = style.fill {
            tracing::debug_span!("[fill]")
                .in_scope(|| surface.paint(&path, self.flatness, self.fill_rule, fill));
        }
        if let Some(stroke) = style.stroke {
            if style.stroke_width > 0.0 {
                tracing::debug_span!("[stroke]").in_scope(|| {
                    let outline = path.stroke(&style.stroke_style(), self.flatness);
                    tracing::debug!("[stroke:segments_count] {}", outline.segments_count());
                    surface.paint(&outline, self.flatness, FillRule::NonZero, stroke)
                });
            }
        }

        Ok(surface.to_image())
    }
}

/// Render path with the default rasterizer configuration
pub fn rasterize(path: Path, style: &RenderStyle) -> Result<RasterImage, RenderError> {
    Rasterizer::default().rasterize(path, style)
}
