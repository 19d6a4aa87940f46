use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::dataset::{NdArray, PlaneAttrs, PlaneDataset, nan_as_null};
use crate::foundation::error::{PostproError, PostproResult};

/// Which stored iterations to load.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// Every stored iteration.
    All,
    /// Exactly these iterations; each must be stored.
    Iters(Vec<u64>),
    /// The stored iteration nearest to each requested time.
    Times(Vec<f64>),
    /// Every stored iteration with time in `[t0, t1]`.
    TimeRange(f64, f64),
}

impl Selection {
    /// Apply the loading precedence `times`, then `trange`, then `iters`.
    pub fn from_options(iters: Vec<u64>, times: Option<Vec<f64>>, trange: Option<[f64; 2]>) -> Self {
        if let Some(times) = times {
            Self::Times(times)
        } else if let Some([t0, t1]) = trange {
            Self::TimeRange(t0, t1)
        } else if iters.is_empty() {
            Self::All
        } else {
            Self::Iters(iters)
        }
    }

    /// Positions into `timesteps`/`times` selected by this request, in load order.
    pub fn resolve(&self, timesteps: &[u64], times: &[f64]) -> PostproResult<Vec<usize>> {
        let positions: Vec<usize> = match self {
            Self::All => (0..timesteps.len()).collect(),
            Self::Iters(wanted) => wanted
                .iter()
                .map(|it| {
                    timesteps.iter().position(|t| t == it).ok_or_else(|| {
                        PostproError::validation(format!(
                            "iteration {it} is not stored in the sample file"
                        ))
                    })
                })
                .collect::<PostproResult<_>>()?,
            Self::Times(wanted) => {
                let mut out: Vec<usize> = Vec::with_capacity(wanted.len());
                for &t in wanted {
                    let k = nearest(times, t).ok_or_else(|| {
                        PostproError::validation("sample file stores no times")
                    })?;
                    if !out.contains(&k) {
                        out.push(k);
                    }
                }
                out
            }
            Self::TimeRange(t0, t1) => {
                let (lo, hi) = if t0 <= t1 { (*t0, *t1) } else { (*t1, *t0) };
                (0..times.len())
                    .filter(|&k| times[k] >= lo && times[k] <= hi)
                    .collect()
            }
        };
        if positions.is_empty() {
            return Err(PostproError::validation(format!(
                "selection {self:?} matches no stored iteration"
            )));
        }
        Ok(positions)
    }
}

fn nearest(times: &[f64], t: f64) -> Option<usize> {
    times
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - t).abs().total_cmp(&(b.1 - t).abs()))
        .map(|(k, _)| k)
}

/// Arguments of one plane load.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    /// Sample file.
    pub path: PathBuf,
    /// Group inside the file; `None` requires a single group.
    pub group: Option<String>,
    /// Variables to load.
    pub varnames: Vec<String>,
    /// Iterations to load.
    pub selection: Selection,
}

/// Reader of sampled plane data.
pub trait PlaneSource {
    /// Load the requested variables and iterations of every plane in the group.
    fn load(&self, request: &LoadRequest) -> PostproResult<PlaneDataset>;
}

/// Flat array of samples; `null` entries stand for NaN.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatSeries(#[serde(with = "nan_as_null")] pub Vec<f64>);

/// One sampler group as stored in a sample file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    /// `[nplanes, n1, n2]`.
    pub shape: [usize; 3],
    /// Stored iterations.
    pub timesteps: Vec<u64>,
    /// Time of each stored iteration.
    pub times: Vec<f64>,
    /// Sampler geometry.
    #[serde(default)]
    pub attrs: Option<PlaneAttrs>,
    /// `x`, `y`, `z` arrays of `nplanes * n1 * n2` values.
    pub coordinates: BTreeMap<String, FlatSeries>,
    /// Per variable, one flat `nplanes * n1 * n2` array per stored iteration.
    pub fields: BTreeMap<String, Vec<FlatSeries>>,
}

/// JSON sample file: `{ "groups": { name: SampleGroup } }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleFile {
    /// Groups by name.
    pub groups: BTreeMap<String, SampleGroup>,
}

impl SampleFile {
    /// Parse a sample file from disk.
    pub fn read(path: &Path) -> PostproResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open sample file '{}'", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
            PostproError::serde(format!("parse sample file '{}': {e}", path.display()))
        })
    }

    /// Write as JSON.
    pub fn write(&self, path: &Path) -> PostproResult<()> {
        crate::encode::ensure_parent_dir(path)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create sample file '{}'", path.display()))?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)
            .map_err(|e| PostproError::serde(format!("write sample file: {e}")))
    }

    /// Pick `name`, or the only group when `name` is `None`.
    pub fn group(&self, name: Option<&str>) -> PostproResult<(&str, &SampleGroup)> {
        match name {
            Some(n) => self
                .groups
                .get_key_value(n)
                .map(|(k, g)| (k.as_str(), g))
                .ok_or_else(|| {
                    let known: Vec<&str> = self.groups.keys().map(String::as_str).collect();
                    PostproError::validation(format!(
                        "group '{n}' not found in sample file (available: {known:?})"
                    ))
                }),
            None => {
                let mut it = self.groups.iter();
                match (it.next(), it.next()) {
                    (Some((k, g)), None) => Ok((k.as_str(), g)),
                    (None, _) => Err(PostproError::validation("sample file has no groups")),
                    (Some(_), Some(_)) => {
                        let known: Vec<&str> = self.groups.keys().map(String::as_str).collect();
                        Err(PostproError::validation(format!(
                            "sample file has several groups {known:?}; set 'group'"
                        )))
                    }
                }
            }
        }
    }
}

impl SampleGroup {
    /// Extract the selected iterations and variables as a [`PlaneDataset`].
    pub fn extract(&self, varnames: &[String], selection: &Selection) -> PostproResult<PlaneDataset> {
        if self.timesteps.len() != self.times.len() {
            return Err(PostproError::validation(format!(
                "sample group stores {} timesteps but {} times",
                self.timesteps.len(),
                self.times.len()
            )));
        }
        let [nplanes, n1, n2] = self.shape;
        let plane_len = nplanes * n1 * n2;

        let mut coords = BTreeMap::new();
        for axis in ["x", "y", "z"] {
            let series = self.coordinates.get(axis).ok_or_else(|| {
                PostproError::validation(format!("sample group has no '{axis}' coordinate"))
            })?;
            coords.insert(
                axis.to_owned(),
                NdArray::new(vec![nplanes, n1, n2], series.0.clone())?,
            );
        }

        let positions = selection.resolve(&self.timesteps, &self.times)?;
        let nsel = positions.len();

        let mut fields = BTreeMap::new();
        for var in varnames {
            let per_step = self.fields.get(var).ok_or_else(|| {
                PostproError::validation(format!("variable '{var}' not found in sample group"))
            })?;
            if per_step.len() != self.timesteps.len() {
                return Err(PostproError::validation(format!(
                    "variable '{var}' stores {} timesteps, expected {}",
                    per_step.len(),
                    self.timesteps.len()
                )));
            }
            // Stored per timestep as [plane, n1, n2]; reorder to [plane, k, n1, n2].
            let grid = n1 * n2;
            let mut data = vec![f64::NAN; nplanes * nsel * grid];
            for (k, &pos) in positions.iter().enumerate() {
                let step = &per_step[pos].0;
                if step.len() != plane_len {
                    return Err(PostproError::validation(format!(
                        "variable '{var}' at iteration {} holds {} values, expected {plane_len}",
                        self.timesteps[pos],
                        step.len()
                    )));
                }
                for p in 0..nplanes {
                    let dst = (p * nsel + k) * grid;
                    data[dst..dst + grid].copy_from_slice(&step[p * grid..(p + 1) * grid]);
                }
            }
            fields.insert(var.clone(), NdArray::new(vec![nplanes, nsel, n1, n2], data)?);
        }

        let ds = PlaneDataset {
            timesteps: positions.iter().map(|&k| self.timesteps[k]).collect(),
            times: positions.iter().map(|&k| self.times[k]).collect(),
            coords,
            fields,
            attrs: self.attrs,
        };
        ds.validate()?;
        Ok(ds)
    }
}

/// [`PlaneSource`] reading JSON sample files.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSampleSource;

impl PlaneSource for JsonSampleSource {
    #[tracing::instrument(skip(self, request), fields(path = %request.path.display()))]
    fn load(&self, request: &LoadRequest) -> PostproResult<PlaneDataset> {
        let file = SampleFile::read(&request.path)?;
        let (name, group) = file.group(request.group.as_deref())?;
        let ds = group.extract(&request.varnames, &request.selection)?;
        tracing::debug!(
            group = name,
            iterations = ds.timesteps.len(),
            planes = ds.nplanes(),
            "sample group loaded"
        );
        Ok(ds)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/source.rs"]
mod tests;
