//! planepost turns sampled CFD planes into figures, movies and probe tables.
//!
//! A YAML or JSON document names plugins; each plugin input loads one plane from a sample
//! file and runs the configured actions against it:
//!
//! - `plot`: filled contour images of an expression of the plane variables
//! - `plot_radial`: the field resampled onto a polar lattice
//! - `animate` / `makegif`: saved images assembled into mp4 or gif
//! - `interpolate`: point probes written as CSV
//!
//! Option values that compute something (`plotfunc`, `clevels`, scale functions, file-name
//! templates) use a small sandboxed expression language instead of host code.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Plane data model and sample-file readers.
pub mod dataset;
/// Encoding of frame sequences to mp4 and gif.
pub mod encode;
/// Sandboxed expression language and templates.
pub mod expression;
/// Interpolation on structured plane grids.
pub mod interp;
/// The `instantaneousplanes` and `figure` plugins.
pub mod planes;
/// Plugin/action registries and the document engine.
pub mod plugin;
/// Figure model and CPU rendering.
pub mod render;
/// Option schemas and merged option values.
pub mod schema;

pub use crate::foundation::core::{Affine, Fps, FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{PostproError, PostproResult};
pub use crate::foundation::math::{arange, linspace};

pub use crate::dataset::{AxisLabel, LoadRequest, PlaneDataset, PlaneSource, Selection};
pub use crate::expression::{Env, Expression, MapEnv, Template, TitleTemplate};
pub use crate::plugin::{Engine, PlaneContext, RunEnv, load_document};
pub use crate::render::{Figure, FigureRenderer, FrameRGBA};
