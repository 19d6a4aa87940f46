//! Figure model and CPU rendering of contour and polar plots.

pub mod colormap;
pub mod cpu;
pub mod figure;
pub mod frame;
mod layout;
mod overlay;
mod raster;
pub mod turbine;

pub use colormap::{Colormap, LevelBands};
pub use cpu::FigureRenderer;
pub use figure::{
    AxisScale, ColorbarSpec, ContourPanel, Figure, FigureStore, Panel, PolarPanel, Polyline,
};
pub use frame::FrameRGBA;
pub use turbine::{LineStyleSpec, TurbineSpec};
