use crate::dataset::{AxisLabel, PlaneDataset};
use crate::expression::{Env, Value};
use crate::foundation::error::{PostproError, PostproResult};

/// Read-only view of one loaded plane handed to every action.
#[derive(Clone, Copy, Debug)]
pub struct PlaneContext<'a> {
    name: &'a str,
    dataset: &'a PlaneDataset,
    xaxis: AxisLabel,
    yaxis: AxisLabel,
    iplane: usize,
}

impl<'a> PlaneContext<'a> {
    /// Check that `iplane` exists and both axes are loaded.
    pub fn new(
        name: &'a str,
        dataset: &'a PlaneDataset,
        xaxis: AxisLabel,
        yaxis: AxisLabel,
        iplane: usize,
    ) -> PostproResult<Self> {
        if iplane >= dataset.nplanes() {
            return Err(PostproError::validation(format!(
                "{name}: iplane {iplane} out of range, the sample group has {} plane(s)",
                dataset.nplanes()
            )));
        }
        for axis in [xaxis, yaxis] {
            if !dataset.coords.contains_key(axis.as_str()) {
                return Err(PostproError::validation(format!(
                    "{name}: coordinate '{axis}' is not available"
                )));
            }
        }
        Ok(Self {
            name,
            dataset,
            xaxis,
            yaxis,
            iplane,
        })
    }

    /// Plane configuration name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Loaded data.
    pub fn dataset(&self) -> &'a PlaneDataset {
        self.dataset
    }

    /// Abscissa selector.
    pub fn xaxis(&self) -> AxisLabel {
        self.xaxis
    }

    /// Ordinate selector.
    pub fn yaxis(&self) -> AxisLabel {
        self.yaxis
    }

    /// Plane index inside the sample group.
    pub fn iplane(&self) -> usize {
        self.iplane
    }

    /// Resolved iterations in load order.
    pub fn iters(&self) -> &'a [u64] {
        &self.dataset.timesteps
    }

    /// Time of each resolved iteration.
    pub fn times(&self) -> &'a [f64] {
        &self.dataset.times
    }

    /// Coordinate array of `axis` on this plane, flattened `[n1, n2]`.
    pub fn axis_coords(&self, axis: AxisLabel) -> PostproResult<&'a [f64]> {
        self.dataset.coord_plane(axis.as_str(), self.iplane)
    }

    /// Bindings for expressions evaluated at the `iplot`-th resolved iteration.
    pub fn slice_env(&self, iplot: usize) -> SliceEnv<'a> {
        SliceEnv {
            dataset: self.dataset,
            iplane: self.iplane,
            iplot,
        }
    }
}

/// Expression environment of one plane slice.
///
/// Binds every loaded variable and coordinate to its `[n1, n2]` slice as a flat array,
/// plus `time`, `iter` (alias `i`), `iplane` and `iplot`.
#[derive(Clone, Copy, Debug)]
pub struct SliceEnv<'a> {
    dataset: &'a PlaneDataset,
    iplane: usize,
    iplot: usize,
}

impl Env for SliceEnv<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        let ds = self.dataset;
        match name {
            "time" => ds.times.get(self.iplot).map(|t| Value::Float(*t)),
            "iter" | "i" => ds.timesteps.get(self.iplot).map(|t| Value::Int(*t as i64)),
            "iplane" => Some(Value::Int(self.iplane as i64)),
            "iplot" => Some(Value::Int(self.iplot as i64)),
            _ => {
                if let Some(f) = ds.fields.get(name) {
                    return f
                        .block(&[self.iplane, self.iplot])
                        .ok()
                        .map(|s| Value::Array(s.to_vec()));
                }
                ds.coords
                    .get(name)
                    .and_then(|c| c.block(&[self.iplane]).ok())
                    .map(|s| Value::Array(s.to_vec()))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/context.rs"]
mod tests;
