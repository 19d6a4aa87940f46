use super::*;
use std::collections::BTreeMap;

fn dataset(attrs: Option<PlaneAttrs>) -> PlaneDataset {
    let shape = vec![1, 1, 2];
    PlaneDataset {
        timesteps: vec![0],
        times: vec![0.0],
        coords: BTreeMap::from([
            ("x".to_owned(), NdArray::new(shape.clone(), vec![1.0, 2.0]).unwrap()),
            ("y".to_owned(), NdArray::new(shape.clone(), vec![1.0, 2.0]).unwrap()),
            ("z".to_owned(), NdArray::new(shape, vec![5.0, 5.0]).unwrap()),
        ]),
        fields: BTreeMap::new(),
        attrs,
    }
}

#[test]
fn projects_onto_unit_axes() {
    let attrs = PlaneAttrs {
        origin: [1.0, 1.0, 0.0],
        axis1: [2.0, 2.0, 0.0],
        axis2: [0.0, 0.0, 3.0],
        axis3: [0.0, 0.0, 0.0],
    };
    let mut ds = dataset(Some(attrs));
    compute_axis1axis2_coords(&mut ds).unwrap();

    let a1 = ds.coord_plane("a1", 0).unwrap();
    assert!((a1[0] - 0.0).abs() < 1e-12);
    assert!((a1[1] - 2f64.sqrt()).abs() < 1e-12);
    assert_eq!(ds.coord_plane("a2", 0).unwrap(), &[5.0, 5.0]);
    // axis3 falls back to axis1 x axis2.
    let a3 = ds.coord_plane("a3", 0).unwrap();
    assert!(a3.iter().all(|v| v.abs() < 1e-12));
}

#[test]
fn requires_attributes() {
    let mut ds = dataset(None);
    assert!(compute_axis1axis2_coords(&mut ds).is_err());
}

#[test]
fn local_projection_of_a_point() {
    let attrs = PlaneAttrs {
        origin: [0.0, 0.0, 0.0],
        axis1: [0.0, 1.0, 0.0],
        axis2: [0.0, 0.0, 1.0],
        axis3: [1.0, 0.0, 0.0],
    };
    assert_eq!(attrs.to_local([3.0, 4.0, 5.0]).unwrap(), [4.0, 5.0, 3.0]);
}
