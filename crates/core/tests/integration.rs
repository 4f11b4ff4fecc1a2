//! End-to-end frame scenarios: mixed image and tabular ingestion through
//! translation to a single reconciled table.

use lithoframe_core::{
    Classifier, FieldSpec, Frame, FrameError, ImageInput, Palette, Row, Table, Value,
};

fn palette(entries: &[(&str, &str)]) -> Palette {
    let mut t = Table::with_columns(vec!["Names".into(), "Colours".into()]);
    for (name, colour) in entries {
        t.append(vec![
            ("Names".to_string(), Value::Str(name.to_string())),
            ("Colours".to_string(), Value::Str(colour.to_string())),
        ]);
    }
    Palette::from_table(&t).unwrap()
}

fn detailed_palette() -> Palette {
    palette(&[
        ("A0", "#000000"),
        ("A1", "#333333"),
        ("A2", "#777777"),
        ("B0", "#aaaaaa"),
        ("B1", "#ffffff"),
    ])
}

fn reduced_palette() -> Palette {
    palette(&[("A", "#000000"), ("B", "#ffffff")])
}

fn extractors() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Well", "Wellbore"),
        FieldSpec::with_pattern("Depth", "Depth", "([0-9.]+)").unwrap(),
        FieldSpec::new("Depth unit", "Unit"),
    ]
}

fn frame() -> Frame {
    Frame::new(vec![
        Classifier::new(detailed_palette(), extractors()),
        Classifier::new(reduced_palette(), extractors()),
    ])
}

fn translation() -> Table {
    let mut t = Table::with_columns(vec!["Reduced".into(), "Detailed".into()]);
    for (reduced, fine) in [("A", "A0"), ("A", "A1"), ("A", "A2"), ("B", "B0"), ("B", "B1")] {
        t.append(vec![
            ("Reduced".to_string(), Value::Str(reduced.into())),
            ("Detailed".to_string(), Value::Str(fine.into())),
        ]);
    }
    t
}

fn tabular_row(minerals: &[(&str, i64)], depth: f64) -> Row {
    let mut row: Row = minerals
        .iter()
        .map(|(name, v)| (name.to_string(), Value::Int(*v)))
        .collect();
    row.push(("Depth".to_string(), Value::Float(depth)));
    row.push(("Well".to_string(), Value::Str("25/2-18 C".into())));
    row.push(("Depth unit".to_string(), Value::Str("m".into())));
    row.push(("Background".to_string(), Value::Int(0)));
    row
}

#[test]
fn one_row_per_palette_reconciles_to_a_single_table() {
    // One row per detail level, every mineral at 1; after translation the
    // detailed row collapses to A=3, B=2.
    let mut f = frame();
    f.append_row(tabular_row(&[("A", 1), ("B", 1)], 100.0)).unwrap();
    f.append_row(
        tabular_row(&[("A0", 1), ("A1", 1), ("A2", 1), ("B0", 1), ("B1", 1)], 101.0),
    )
    .unwrap();
    assert!(f.requires_translation());

    f.apply_translation(&translation()).unwrap();
    assert!(!f.requires_translation());

    let result = f.result().unwrap();
    assert_eq!(result.row_count(), 2);
    let a = result.find_column("A").unwrap();
    let b = result.find_column("B").unwrap();
    assert_eq!(*result.value(1, a), Value::Int(3));
    assert_eq!(*result.value(1, b), Value::Int(2));
    assert_eq!(f.minerals().unwrap(), &["A", "B"]);
}

#[test]
fn black_and_white_image_classifies_exactly() {
    // 2x2 image, two black and two white pixels, against {A=white, B=black}.
    let c = Classifier::new(palette(&[("A", "#ffffff"), ("B", "#000000")]), vec![]);
    let comp = c.classify(&[[0, 0, 0], [255, 255, 255], [0, 0, 0], [255, 255, 255]]);
    assert_eq!(comp.rms_error, 0.0);
    assert_eq!(comp.counts, vec![("A".to_string(), 2), ("B".to_string(), 2)]);
}

#[test]
fn images_and_rows_mix_in_one_frame() {
    let mut f = frame();
    let image = ImageInput {
        pixels: vec![[0x00; 3], [0x33; 3], [0x77; 3], [0xaa; 3], [0xff; 3]],
        description: Some("Wellbore:25/2-18 C;Depth:1590m;Unit:m".to_string()),
    };
    f.append_classified(&image).unwrap();
    f.append_row(tabular_row(&[("A", 1), ("B", 1)], 1591.0)).unwrap();
    assert!(f.requires_translation());

    f.apply_translation(&translation()).unwrap();
    let result = f.result().unwrap();
    assert_eq!(result.row_count(), 2);

    // The image row arrives via translation, after the native reduced row,
    // and its depth came through the extractor's capture group.
    let depth = result.find_column("Depth").unwrap();
    assert_eq!(*result.value(0, depth), Value::Float(1591.0));
    assert_eq!(*result.value(1, depth), Value::Str("1590".into()));

    let a = result.find_column("A").unwrap();
    assert_eq!(*result.value(1, a), Value::Int(3));
}

#[test]
fn strict_subset_of_every_palette_is_rejected() {
    let mut f = frame();
    let err = f
        .append_row(vec![("A".to_string(), Value::Int(1))])
        .unwrap_err();
    match err {
        FrameError::SchemaMismatch { supplied, candidates } => {
            assert_eq!(supplied.len(), 1);
            assert!(!candidates.is_empty());
        }
        other => panic!("expected SchemaMismatch, got {other}"),
    }
}

#[test]
fn mass_conservation_across_translation() {
    let mut f = frame();
    let fine = [("A0", 12), ("A1", 34), ("A2", 56), ("B0", 78), ("B1", 90)];
    f.append_row(tabular_row(&fine, 200.0)).unwrap();

    let before: i64 = fine.iter().map(|(_, v)| v).sum();
    f.apply_translation(&translation()).unwrap();

    let result = f.result().unwrap();
    let a = result.find_column("A").unwrap();
    let b = result.find_column("B").unwrap();
    let after = result.value(0, a).as_f64().unwrap() + result.value(0, b).as_f64().unwrap();
    assert_eq!(after, before as f64);
}

#[test]
fn conflicting_wells_fail_after_partial_ingestion() {
    let mut f = frame();
    f.append_row(tabular_row(&[("A", 1), ("B", 1)], 100.0)).unwrap();
    let mut row = tabular_row(&[("A", 2), ("B", 2)], 101.0);
    for (name, value) in &mut row {
        if name == "Well" {
            *value = Value::Str("30/6-A-1".into());
        }
    }
    let err = f.append_row(row).unwrap_err();
    assert!(matches!(err, FrameError::ConsistencyViolation { field: "Well", .. }));
    assert_eq!(f.result().unwrap().row_count(), 1);
}
