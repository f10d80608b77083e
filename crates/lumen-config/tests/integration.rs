//! Integration tests for lumen-config.
//!
//! Pipeline files on disk through validation, graph construction and frame
//! processing.

use lumen_config::{
    ConfigError, NodeConfig, Pipeline, ValidationError, get_factory_pipeline, validate_pipeline,
};
use lumen_core::{Frame, FrameBuffer, FrameDescriptor, GraphError, PixelFormat};
use lumen_registry::FilterRegistry;
use tempfile::TempDir;

fn flat(value: f32) -> Frame {
    let mut buffer = FrameBuffer::new(FrameDescriptor::rgba(16, 16));
    buffer.fill(value);
    Frame::new(buffer)
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn pipeline_file_loads_builds_and_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edges.toml");
    std::fs::write(
        &path,
        r#"
name = "Edges"
description = "Canny edge map, inverted"
source = "edges"

[[nodes]]
id = "edges"
type = "canny_edge_detection"
targets = ["invert"]
[nodes.params]
upper_threshold = "0.45"
texel_spacing = "2px"

[[nodes]]
id = "invert"
type = "invert"
"#,
    )
    .unwrap();

    let pipeline = Pipeline::load(&path).unwrap();
    let mut built = pipeline.build(&FilterRegistry::new()).unwrap();
    assert_eq!(built.name(), "Edges");

    let report = built.push(flat(0.5)).unwrap();
    let outputs = built.sink_outputs(&report);
    assert_eq!(outputs.len(), 1);
    let (sink, frame) = outputs[0];
    assert_eq!(sink, "invert");
    assert_eq!(frame.format(), PixelFormat::Luma);
    assert!(frame.samples().iter().all(|&v| v == 1.0));
}

#[test]
fn saved_pipeline_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipelines").join("soft.toml");
    let original = get_factory_pipeline("soft_edges").unwrap();

    original.save(&path).unwrap();
    let reloaded = Pipeline::load(&path).unwrap();
    assert_eq!(reloaded, original);
}

// ============================================================================
// Validation and construction errors
// ============================================================================

#[test]
fn validation_reports_all_problems_in_one_pass() {
    let pipeline = Pipeline::new("broken")
        .with_node(
            NodeConfig::new("blur", "gaussian_blur")
                .with_param("radius", "100px")
                .with_target("ghost"),
        )
        .with_node(NodeConfig::new("mystery", "posterize"));

    let problems = validate_pipeline(&pipeline).unwrap_err().into_problems();
    assert_eq!(problems.len(), 3, "{problems:?}");
    assert!(problems
        .iter()
        .any(|p| matches!(p, ValidationError::OutOfRange { .. })));
    assert!(problems
        .iter()
        .any(|p| matches!(p, ValidationError::UnknownTarget { .. })));
    assert!(problems
        .iter()
        .any(|p| matches!(p, ValidationError::UnknownFilter { .. })));
}

#[test]
fn cycle_through_a_group_is_rejected_when_built() {
    let pipeline = Pipeline::new("loop")
        .with_node(NodeConfig::new("edges", "canny_edge_detection").with_target("gate"))
        .with_node(NodeConfig::new("gate", "luminance_gate").with_target("edges"));

    assert_eq!(validate_pipeline(&pipeline), Ok(()));
    let err = pipeline.build(&FilterRegistry::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Graph(GraphError::CycleDetected { .. })));
}

// ============================================================================
// Frame flow
// ============================================================================

#[test]
fn gate_in_front_drops_dark_frames() {
    let pipeline = get_factory_pipeline("soft_edges").unwrap();
    let mut built = pipeline.build(&FilterRegistry::new()).unwrap();

    let dark = built.push(flat(0.01)).unwrap();
    assert_eq!(dark.dropped, 1);
    assert!(built.sink_outputs(&dark).is_empty());

    let bright = built.push(flat(0.8)).unwrap();
    assert_eq!(built.sink_outputs(&bright).len(), 1);
}

#[test]
fn fan_out_pipeline_produces_one_output_per_sink() {
    let pipeline = Pipeline::new("both")
        .with_node(
            NodeConfig::new("gray", "grayscale")
                .with_target("edges")
                .with_target("negative"),
        )
        .with_node(NodeConfig::new("edges", "canny_edge_detection"))
        .with_node(NodeConfig::new("negative", "invert"));
    let mut built = pipeline.build(&FilterRegistry::new()).unwrap();

    let report = built.push(flat(0.25)).unwrap();
    let sinks: Vec<_> = built.sink_outputs(&report).iter().map(|(n, _)| *n).collect();
    assert_eq!(sinks, ["edges", "negative"]);
}
