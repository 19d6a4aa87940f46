//! Plane dataset model: coordinate and field arrays for every plane of a sample group,
//! restricted to the selected iterations.

pub(crate) mod source;
pub(crate) mod transform;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{PostproError, PostproResult};

pub use source::{
    FlatSeries, JsonSampleSource, LoadRequest, PlaneSource, SampleFile, SampleGroup, Selection,
};
pub use transform::compute_axis1axis2_coords;

/// Dense row-major array of `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NdArray {
    shape: Vec<usize>,
    #[serde(with = "nan_as_null")]
    data: Vec<f64>,
}

impl NdArray {
    /// Wrap `data`, checking it matches `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> PostproResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(PostproError::validation(format!(
                "array of shape {shape:?} needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Array dimensions.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat row-major values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn is_consistent(&self) -> bool {
        self.shape.iter().product::<usize>() == self.data.len()
    }

    /// Contiguous block addressed by the leading indices `lead`.
    pub fn block(&self, lead: &[usize]) -> PostproResult<&[f64]> {
        if lead.len() > self.shape.len() {
            return Err(PostproError::validation(format!(
                "index {lead:?} has more dimensions than shape {:?}",
                self.shape
            )));
        }
        let mut offset = 0usize;
        for (d, (&i, &n)) in lead.iter().zip(&self.shape).enumerate() {
            if i >= n {
                return Err(PostproError::validation(format!(
                    "index {i} out of range for dimension {d} of size {n}"
                )));
            }
            offset = offset * n + i;
        }
        let inner: usize = self.shape[lead.len()..].iter().product();
        let start = offset * inner;
        Ok(&self.data[start..start + inner])
    }
}

/// Plane geometry as recorded by the sampler.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneAttrs {
    /// Plane origin.
    pub origin: [f64; 3],
    /// First in-plane axis.
    pub axis1: [f64; 3],
    /// Second in-plane axis.
    pub axis2: [f64; 3],
    /// Plane normal / offset axis.
    #[serde(default)]
    pub axis3: [f64; 3],
}

/// Coordinate array used as plot abscissa or ordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisLabel {
    /// Global x.
    X,
    /// Global y.
    Y,
    /// Global z.
    Z,
    /// Plane-local axis 1.
    A1,
    /// Plane-local axis 2.
    A2,
    /// Plane-local axis 3.
    A3,
}

impl AxisLabel {
    /// Every selector, in declaration order.
    pub const ALL: [Self; 6] = [Self::X, Self::Y, Self::Z, Self::A1, Self::A2, Self::A3];

    /// Parse one of `x, y, z, a1, a2, a3`.
    pub fn parse(s: &str) -> PostproResult<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                PostproError::validation(format!(
                    "unknown axis '{s}', expected one of x, y, z, a1, a2, a3"
                ))
            })
    }

    /// Name of the coordinate array.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::A1 => "a1",
            Self::A2 => "a2",
            Self::A3 => "a3",
        }
    }

    /// True for `a1`, `a2`, `a3`.
    pub fn is_plane_local(self) -> bool {
        matches!(self, Self::A1 | Self::A2 | Self::A3)
    }

    /// Vector component this axis corresponds to (`x`/`a1` → 0, ...).
    pub fn component(self) -> usize {
        match self {
            Self::X | Self::A1 => 0,
            Self::Y | Self::A2 => 1,
            Self::Z | Self::A3 => 2,
        }
    }
}

impl std::fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loaded plane data.
///
/// Coordinates are indexed `[plane, n1, n2]`; fields `[plane, k, n1, n2]` where `k` is the
/// position of the iteration in [`PlaneDataset::timesteps`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneDataset {
    /// Selected iterations, in load order.
    pub timesteps: Vec<u64>,
    /// Physical time of each selected iteration.
    pub times: Vec<f64>,
    /// Coordinate arrays by name (`x`, `y`, `z`, and `a1..a3` after transform).
    pub coords: BTreeMap<String, NdArray>,
    /// Field arrays by variable name.
    pub fields: BTreeMap<String, NdArray>,
    /// Sampler geometry, when the file provides it.
    #[serde(default)]
    pub attrs: Option<PlaneAttrs>,
}

impl PlaneDataset {
    /// Check that every array agrees on plane count, iteration count and grid shape.
    pub fn validate(&self) -> PostproResult<()> {
        if self.timesteps.len() != self.times.len() {
            return Err(PostproError::validation(format!(
                "{} timesteps but {} times",
                self.timesteps.len(),
                self.times.len()
            )));
        }
        for (name, a) in self.coords.iter().chain(&self.fields) {
            if !a.is_consistent() {
                return Err(PostproError::validation(format!(
                    "array '{name}' holds {} values for shape {:?}",
                    a.data().len(),
                    a.shape()
                )));
            }
        }
        let Some((first_name, first)) = self.coords.iter().next() else {
            return Err(PostproError::validation("dataset has no coordinate arrays"));
        };
        if first.shape().len() != 3 {
            return Err(PostproError::validation(format!(
                "coordinate '{first_name}' must be 3-D, got shape {:?}",
                first.shape()
            )));
        }
        let plane_shape = first.shape().to_vec();
        for (name, c) in &self.coords {
            if c.shape() != plane_shape.as_slice() {
                return Err(PostproError::validation(format!(
                    "coordinate '{name}' has shape {:?}, expected {plane_shape:?}",
                    c.shape()
                )));
            }
        }
        let field_shape = [
            plane_shape[0],
            self.timesteps.len(),
            plane_shape[1],
            plane_shape[2],
        ];
        for (name, f) in &self.fields {
            if f.shape() != field_shape {
                return Err(PostproError::validation(format!(
                    "field '{name}' has shape {:?}, expected {field_shape:?}",
                    f.shape()
                )));
            }
        }
        Ok(())
    }

    /// Number of planes in the group.
    pub fn nplanes(&self) -> usize {
        self.coords.values().next().map_or(0, |c| c.shape()[0])
    }

    /// In-plane grid dimensions `(n1, n2)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.coords
            .values()
            .next()
            .map_or((0, 0), |c| (c.shape()[1], c.shape()[2]))
    }

    /// Field variable names.
    pub fn varnames(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Position of `iter` in the loaded timesteps.
    pub fn position_of(&self, iter: u64) -> Option<usize> {
        self.timesteps.iter().position(|&t| t == iter)
    }

    /// Time of the loaded iteration `iter`.
    pub fn time_of(&self, iter: u64) -> PostproResult<f64> {
        let k = self.require_position(iter)?;
        Ok(self.times[k])
    }

    fn require_position(&self, iter: u64) -> PostproResult<usize> {
        self.position_of(iter).ok_or_else(|| {
            PostproError::validation(format!("iteration {iter} is not in the loaded dataset"))
        })
    }

    /// Coordinate array `name` of plane `iplane`, flattened `[n1, n2]`.
    pub fn coord_plane(&self, name: &str, iplane: usize) -> PostproResult<&[f64]> {
        let c = self.coords.get(name).ok_or_else(|| {
            PostproError::validation(format!("coordinate '{name}' is not loaded"))
        })?;
        c.block(&[iplane])
    }

    /// Field `var` of plane `iplane` at iteration `iter`, flattened `[n1, n2]`.
    pub fn field_slice(&self, var: &str, iplane: usize, iter: u64) -> PostproResult<&[f64]> {
        let k = self.require_position(iter)?;
        let f = self
            .fields
            .get(var)
            .ok_or_else(|| PostproError::validation(format!("variable '{var}' is not loaded")))?;
        f.block(&[iplane, k])
    }

    /// Serialize the whole dataset as JSON, creating parent directories.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn write_snapshot(&self, path: &Path) -> PostproResult<()> {
        crate::encode::ensure_parent_dir(path)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create snapshot '{}'", path.display()))?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)
            .map_err(|e| PostproError::serde(format!("write snapshot: {e}")))?;
        tracing::debug!("snapshot written");
        Ok(())
    }

    /// Read a snapshot written by [`PlaneDataset::write_snapshot`].
    pub fn read_snapshot(path: &Path) -> PostproResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open snapshot '{}'", path.display()))?;
        let ds: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| PostproError::serde(format!("read snapshot: {e}")))?;
        ds.validate()?;
        Ok(ds)
    }
}

/// Serde adapter writing non-finite values as `null` and reading `null` back as NaN.
pub(crate) mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(v: &[f64], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(v.iter().map(|x| x.is_finite().then_some(*x)))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let raw: Vec<Option<f64>> = Vec::deserialize(d)?;
        Ok(raw.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/dataset.rs"]
mod tests;
