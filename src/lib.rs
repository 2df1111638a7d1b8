//! Spiral built out of circular arcs, and a rasterizer of vector paths into RGBA images.
//!
//! Main features:
//!  - Path builder with lines and circular arcs
//!  - Spiral generator
//!  - Anti-aliased fill and stroke rendering into an image sized to the path
//!
//! ```
//! use spiral::{Image, RenderStyle, Rgba, SpiralParams, rasterize};
//!
//! let path = SpiralParams::default().build();
//! let style = RenderStyle {
//!     stroke: Some(Rgba::WHITE),
//!     ..Default::default()
//! };
//! let image = rasterize(path, &style).unwrap();
//! assert_eq!((image.width(), image.height()), (280, 280));
//! ```
mod arc;
mod color;
mod config;
mod curve;
mod geometry;
mod image;
mod path;
mod rasterize;
mod render;
mod spiral;
mod stroke;
mod utils;

pub use arc::{Arc, ArcCubicIter, ArcFlattenIter};
pub use color::{ColorError, LinColor, Rgba, linear_to_srgb, srgb_to_linear};
pub use config::{Config, ConfigError};
pub use curve::{Cubic, Curve, CurveFlattenIter, Line};
pub use geometry::{BBox, EPSILON, PI, Point, Scalar, Transform, scalar_fmt};
pub use image::{Image, ImageIter, ImageMut, ImageMutRef, ImageOwned, Shape};
pub use path::{
    DEFAULT_FLATNESS, FillRule, Path, PathBuilder, Segment, SegmentFlattenIter, SubPath,
};
pub use render::{RasterImage, Rasterizer, RenderError, RenderStyle, SurfaceFailure, rasterize};
pub use spiral::{SpiralParams, build_spiral_path};
pub use stroke::{LineCap, LineJoin, StrokeStyle, stroke_outline};
