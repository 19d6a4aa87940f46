use crate::dataset::{NdArray, PlaneAttrs, PlaneDataset};
use crate::foundation::error::{PostproError, PostproResult};

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn unit(v: [f64; 3], name: &str) -> PostproResult<[f64; 3]> {
    let n = dot(v, v).sqrt();
    if n == 0.0 || !n.is_finite() {
        return Err(PostproError::validation(format!(
            "plane {name} has zero length"
        )));
    }
    Ok([v[0] / n, v[1] / n, v[2] / n])
}

impl PlaneAttrs {
    /// Unit vectors of the three plane axes. A zero `axis3` is replaced by the plane normal.
    pub fn unit_axes(&self) -> PostproResult<[[f64; 3]; 3]> {
        let a1 = unit(self.axis1, "axis1")?;
        let a2 = unit(self.axis2, "axis2")?;
        let a3 = if dot(self.axis3, self.axis3) == 0.0 {
            unit(cross(a1, a2), "normal")?
        } else {
            unit(self.axis3, "axis3")?
        };
        Ok([a1, a2, a3])
    }

    /// Project a global point onto the plane axes.
    pub fn to_local(&self, p: [f64; 3]) -> PostproResult<[f64; 3]> {
        let axes = self.unit_axes()?;
        let d = [
            p[0] - self.origin[0],
            p[1] - self.origin[1],
            p[2] - self.origin[2],
        ];
        Ok([dot(d, axes[0]), dot(d, axes[1]), dot(d, axes[2])])
    }
}

/// Add `a1`, `a2`, `a3` coordinate arrays: `a_k = (p - origin) · unit(axis_k)`.
pub fn compute_axis1axis2_coords(ds: &mut PlaneDataset) -> PostproResult<()> {
    let attrs = ds.attrs.ok_or_else(|| {
        PostproError::validation(
            "plane-local axes requested but the sample group has no origin/axis attributes",
        )
    })?;
    let axes = attrs.unit_axes()?;

    let get = |name: &str| {
        ds.coords.get(name).ok_or_else(|| {
            PostproError::validation(format!("coordinate '{name}' is not loaded"))
        })
    };
    let (x, y, z) = (get("x")?, get("y")?, get("z")?);
    let shape = x.shape().to_vec();

    let mut local: [Vec<f64>; 3] = Default::default();
    for out in &mut local {
        out.reserve(x.data().len());
    }
    for ((&px, &py), &pz) in x.data().iter().zip(y.data()).zip(z.data()) {
        let d = [px - attrs.origin[0], py - attrs.origin[1], pz - attrs.origin[2]];
        for (out, axis) in local.iter_mut().zip(axes) {
            out.push(dot(d, axis));
        }
    }

    let [a1, a2, a3] = local;
    for (name, data) in [("a1", a1), ("a2", a2), ("a3", a3)] {
        let arr = NdArray::new(shape.clone(), data)?;
        ds.coords.insert(name.to_owned(), arr);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/transform.rs"]
mod tests;
