use super::*;

fn tiny() -> PlaneDataset {
    PlaneDataset {
        timesteps: vec![10, 20],
        times: vec![0.5, 1.0],
        coords: BTreeMap::from([
            ("x".to_owned(), NdArray::new(vec![1, 1, 2], vec![0.0, 1.0]).unwrap()),
            ("y".to_owned(), NdArray::new(vec![1, 1, 2], vec![0.0, 0.0]).unwrap()),
            ("z".to_owned(), NdArray::new(vec![1, 1, 2], vec![0.0, 0.0]).unwrap()),
        ]),
        fields: BTreeMap::from([(
            "velocityx".to_owned(),
            NdArray::new(vec![1, 2, 1, 2], vec![1.0, f64::NAN, 3.0, 4.0]).unwrap(),
        )]),
        attrs: None,
    }
}

#[test]
fn ndarray_checks_length_and_slices_blocks() {
    assert!(NdArray::new(vec![2, 2], vec![1.0; 3]).is_err());
    let a = NdArray::new(vec![2, 3], (0..6).map(f64::from).collect()).unwrap();
    assert_eq!(a.block(&[1]).unwrap(), &[3.0, 4.0, 5.0]);
    assert!(a.block(&[2]).is_err());
    assert_eq!(a.block(&[]).unwrap().len(), 6);
}

#[test]
fn axis_labels_parse_and_map_components() {
    assert_eq!(AxisLabel::parse("a2").unwrap(), AxisLabel::A2);
    assert!(AxisLabel::parse("w").is_err());
    assert!(AxisLabel::A1.is_plane_local());
    assert_eq!(AxisLabel::Z.component(), 2);
    assert_eq!(AxisLabel::A1.component(), 0);
}

#[test]
fn validate_rejects_inconsistent_shapes() {
    let mut ds = tiny();
    ds.validate().unwrap();
    ds.times.push(2.0);
    assert!(ds.validate().is_err());

    let mut ds = tiny();
    ds.fields.insert(
        "velocityy".to_owned(),
        NdArray::new(vec![1, 1, 1, 2], vec![0.0, 0.0]).unwrap(),
    );
    assert!(ds.validate().is_err());
}

#[test]
fn snapshot_round_trip_keeps_keys_shapes_and_nan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/snap.json");
    let ds = tiny();
    ds.write_snapshot(&path).unwrap();
    let back = PlaneDataset::read_snapshot(&path).unwrap();

    assert_eq!(back.timesteps, ds.timesteps);
    assert_eq!(
        back.fields.keys().collect::<Vec<_>>(),
        ds.fields.keys().collect::<Vec<_>>()
    );
    assert_eq!(back.fields["velocityx"].shape(), &[1, 2, 1, 2]);
    let s = back.field_slice("velocityx", 0, 10).unwrap();
    assert_eq!(s[0], 1.0);
    assert!(s[1].is_nan());
    assert_eq!(back.time_of(20).unwrap(), 1.0);
    assert!(back.time_of(30).is_err());
}
