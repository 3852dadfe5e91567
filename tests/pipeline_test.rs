//! End-to-end runs of both pipelines on small tables.

use std::f64::consts::TAU;
use std::fs;
use std::path::Path;

use spectral_plots::pipeline::{self, GroupPlotPipeline, SpectralScatterPipeline};
use spectral_plots::{PipelineError, RenderConfig};
use tempfile::tempdir;

fn small_config() -> RenderConfig {
    let mut config = RenderConfig::default();
    config.spectral.dpi = 40;
    config.spectral.width_in = 2.0;
    config
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

#[test]
fn group_row_converts_to_hz_and_db() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("groups.txt");
    let w = TAU * 500.0;
    write(&input, &format!("{w} {w} 1.0 0 0\n"));

    let out = pipeline::run(&GroupPlotPipeline::in_dir(dir.path()), &input, &small_config()).unwrap();

    assert_eq!(out.output, dir.path().join("groups.pdf"));
    let g = out.prepared[0];
    assert!((g.natural_freq - 500.0).abs() < 1e-9);
    assert!((g.measured_freq - 500.0).abs() < 1e-9);
    assert!(g.magnitude.abs() < 1e-12);
    assert!(!g.has_vertical_marker);
    assert!(!g.has_scatter_marker);

    let pdf = fs::read(&out.output).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert_eq!(pdf, out.bytes);
}

#[test]
fn groups_with_markers_and_comments_render() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("groups.txt");
    let mut text = String::from("# freq reassigned magnitude left center\n\n");
    for (i, hz) in [440.0, 442.0, 444.0, 446.0].iter().enumerate() {
        let left = u8::from(i == 0);
        let center = u8::from(i == 2);
        text.push_str(&format!("{} {} {} {left} {center}\n", hz * TAU, 443.0 * TAU, 0.1 * (i + 1) as f64));
    }
    write(&input, &text);

    let out = pipeline::run(&GroupPlotPipeline::in_dir(dir.path()), &input, &small_config()).unwrap();
    assert_eq!(out.prepared.len(), 4);
    assert!(out.prepared[0].has_vertical_marker);
    assert!(out.prepared[2].has_scatter_marker);
    assert!(dir.path().join("groups.pdf").exists());
}

#[test]
fn spectral_filter_keeps_points_above_threshold() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("voice.wav.txt");
    write(
        &input,
        &format!(
            "0.0 {} 1.0\n0.5 {} 0.01\n1.0 {} 0.5\n",
            TAU * 300.0,
            TAU * 900.0,
            TAU * 600.0
        ),
    );

    let out = pipeline::run(&SpectralScatterPipeline, &input, &small_config()).unwrap();

    assert_eq!(out.output, dir.path().join("voice.wav.txt.png"));
    assert_eq!(out.prepared.points.len(), 2);
    assert_eq!(out.prepared.x_range, (0.0, 1.0));
    assert!((out.prepared.y_range.0 - 300.0).abs() < 1e-9);
    assert!((out.prepared.y_range.1 - 600.0).abs() < 1e-9);

    let png = fs::read(&out.output).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), small_config().spectral.pixel_size());
}

#[test]
fn csv_and_json_inputs_are_accepted() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("points.csv");
    write(&csv, "0, 100, 1\n1, 200, 0.5\n");
    let json = dir.path().join("points.json");
    write(&json, "[[0, 100, 1], [1, 200, 0.5]]");

    for input in [csv, json] {
        let out = pipeline::run(&SpectralScatterPipeline, &input, &small_config()).unwrap();
        assert_eq!(out.prepared.points.len(), 2);
    }
}

#[test]
fn missing_input_is_an_input_error_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("absent.txt");

    let err = pipeline::run(&GroupPlotPipeline::in_dir(dir.path()), &input, &small_config()).unwrap_err();
    assert!(err.is_input_error());
    assert!(!dir.path().join("groups.pdf").exists());

    let err = pipeline::run(&SpectralScatterPipeline, &input, &small_config()).unwrap_err();
    assert!(err.is_input_error());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn malformed_rows_are_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.txt");
    write(&input, "1 2 3\n4 5\n");

    let err = pipeline::run(&SpectralScatterPipeline, &input, &small_config()).unwrap_err();
    match err {
        PipelineError::Input { reason, .. } => assert!(reason.contains("Line 2"), "{reason}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("bad.txt.png").exists());
}

#[test]
fn all_zero_magnitudes_fail_after_filtering() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("silent.txt");
    write(&input, "0 1 0\n1 2 0\n");

    let err = pipeline::run(&SpectralScatterPipeline, &input, &small_config()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyAfterFilter { .. }));
    assert!(!dir.path().join("silent.txt.png").exists());
}

#[test]
fn parquet_groups_with_boolean_flags_load() {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, BooleanArray, Float64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    let dir = tempdir().unwrap();
    let input = dir.path().join("groups.parquet");
    let w = TAU * 500.0;

    let schema = Arc::new(Schema::new(vec![
        Field::new("freq", DataType::Float64, false),
        Field::new("freq_reassigned", DataType::Float64, false),
        Field::new("magnitude", DataType::Float64, false),
        Field::new("left_bin", DataType::Boolean, false),
        Field::new("center_bin", DataType::Boolean, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(vec![w, w + 1.0])),
        Arc::new(Float64Array::from(vec![w, w])),
        Arc::new(Float64Array::from(vec![1.0, 0.1])),
        Arc::new(BooleanArray::from(vec![true, false])),
        Arc::new(BooleanArray::from(vec![false, true])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = fs::File::create(&input).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let out = pipeline::run(&GroupPlotPipeline::in_dir(dir.path()), &input, &small_config()).unwrap();
    assert_eq!(out.prepared.len(), 2);
    assert!(out.prepared[0].has_vertical_marker);
    assert!(!out.prepared[0].has_scatter_marker);
    assert!(out.prepared[1].has_scatter_marker);
    assert!((out.prepared[1].magnitude + 20.0).abs() < 1e-9);
}
