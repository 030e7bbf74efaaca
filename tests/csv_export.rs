//! Integration tests for the flat CSV export.

use std::fs;

use vocaug::ir::io_csv::{append_csv_rows, csv_rows_to_string, export_dir_csv};
use vocaug::ir::LabeledBox;

mod common;

#[test]
fn zero_boxes_append_exactly_one_placeholder_line() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let csv_path = temp.path().join("out.csv");

    append_csv_rows(&csv_path, "a.jpg", &[]).expect("append");
    assert_eq!(fs::read_to_string(&csv_path).expect("read csv"), "a.jpg,,,,,\n");
}

#[test]
fn appended_rows_match_rendered_rows() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let csv_path = temp.path().join("out.csv");
    let boxes = vec![
        LabeledBox::from_xyxy(1.5, 2.5, 30.9, 40.1, "person"),
        LabeledBox::from_xyxy(0.0, 0.0, 5.0, 5.0, "dog"),
    ];

    append_csv_rows(&csv_path, "imgs/x.jpg", &boxes).expect("append");
    let rendered = csv_rows_to_string("imgs/x.jpg", &boxes).expect("render");
    assert_eq!(fs::read_to_string(&csv_path).expect("read csv"), rendered);
    assert_eq!(rendered, "imgs/x.jpg,1,2,30,40,person\nimgs/x.jpg,0,0,5,5,dog\n");
}

#[test]
fn export_dir_substitutes_image_extension() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_voc(&temp.path().join("one.xml"), &[("cat", 1, 2, 3, 4)]);
    common::write_voc(&temp.path().join("two.xml"), &[]);

    let csv_path = temp.path().join("training.csv");
    let exported = export_dir_csv(temp.path(), &csv_path, "png").expect("export");
    assert_eq!(exported, 2);

    let contents = fs::read_to_string(&csv_path).expect("read csv");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("one.png,1,2,3,4,cat"));
    assert!(lines[1].ends_with("two.png,,,,,"));
}
