#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use planepost::dataset::{FlatSeries, PlaneAttrs, SampleFile, SampleGroup};

/// Timesteps stored in [`write_sample_file`].
pub const TIMESTEPS: [u64; 3] = [100, 200, 300];

/// Two hub-height planes on a 5x8 grid, x in [0, 700], y in [0, 400], z = 90 and 150.
///
/// `velocityx = 8 + x/700 + step`, `velocityy = y/400`, `velocityz = 0`.
pub fn sample_group() -> SampleGroup {
    let (nplanes, n1, n2) = (2usize, 5usize, 8usize);
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut z = Vec::new();
    for p in 0..nplanes {
        for i in 0..n1 {
            for j in 0..n2 {
                x.push(100.0 * j as f64);
                y.push(100.0 * i as f64);
                z.push(90.0 + 60.0 * p as f64);
            }
        }
    }
    let series = |f: &dyn Fn(usize, usize) -> f64| -> Vec<FlatSeries> {
        (0..TIMESTEPS.len())
            .map(|k| FlatSeries((0..x.len()).map(|n| f(k, n)).collect()))
            .collect()
    };
    let vx = series(&|k: usize, n: usize| 8.0 + x[n] / 700.0 + k as f64);
    let vy = series(&|_: usize, n: usize| y[n] / 400.0);
    let vz = series(&|_: usize, _: usize| 0.0);

    SampleGroup {
        shape: [nplanes, n1, n2],
        timesteps: TIMESTEPS.to_vec(),
        times: vec![10.0, 20.0, 30.0],
        attrs: Some(PlaneAttrs {
            origin: [0.0, 0.0, 90.0],
            axis1: [700.0, 0.0, 0.0],
            axis2: [0.0, 400.0, 0.0],
            axis3: [0.0, 0.0, 60.0],
        }),
        coordinates: BTreeMap::from([
            ("x".to_owned(), FlatSeries(x.clone())),
            ("y".to_owned(), FlatSeries(y.clone())),
            ("z".to_owned(), FlatSeries(z)),
        ]),
        fields: BTreeMap::from([
            ("velocityx".to_owned(), vx),
            ("velocityy".to_owned(), vy),
            ("velocityz".to_owned(), vz),
        ]),
    }
}

/// Write the sample group under `dir` and return its path.
pub fn write_sample_file(dir: &Path) -> PathBuf {
    let path = dir.join("samples/hubheight.json");
    SampleFile {
        groups: BTreeMap::from([("p_hub".to_owned(), sample_group())]),
    }
    .write(&path)
    .unwrap();
    path
}

/// Forward-slash path text safe to embed in YAML and templates.
pub fn path_str(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}
