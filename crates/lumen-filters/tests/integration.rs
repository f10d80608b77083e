//! Integration tests for lumen-filters.
//!
//! Runs the filters inside a `FilterGraph`: the Canny group on a synthetic
//! image, parameter forwarding through the group, frame dropping by the
//! luminance gate, and fan-out of one stage into several consumers.

use lumen_core::{FilterGraph, Frame, FrameBuffer, FrameDescriptor, NodeId, PixelFormat};
use lumen_filters::{Grayscale, Invert, LuminanceGate, canny_edge_detection};

// ============================================================================
// Helpers
// ============================================================================

const SIZE: u32 = 32;

/// Black RGBA frame with a white square covering `8..24` on both axes.
fn white_square() -> Frame {
    let mut buffer = FrameBuffer::new(FrameDescriptor::rgba(SIZE, SIZE));
    for y in 0..SIZE as usize {
        for x in 0..SIZE as usize {
            let inside = (8..24).contains(&x) && (8..24).contains(&y);
            let v = if inside { 1.0 } else { 0.0 };
            buffer.set(x, y, 0, v);
            buffer.set(x, y, 1, v);
            buffer.set(x, y, 2, v);
            buffer.set(x, y, 3, 1.0);
        }
    }
    Frame::new(buffer)
}

fn solid(value: f32) -> Frame {
    let mut buffer = FrameBuffer::new(FrameDescriptor::luma(SIZE, SIZE));
    buffer.fill(value);
    Frame::new(buffer)
}

fn canny(graph: &mut FilterGraph) -> NodeId {
    graph.build_group(canny_edge_detection()).unwrap()
}

// ============================================================================
// Canny group
// ============================================================================

#[test]
fn canny_finds_square_outline_and_nothing_else() {
    let mut graph = FilterGraph::new();
    let edges = canny(&mut graph);
    let terminal = graph.resolve_terminal(edges).unwrap();

    let report = graph.push_frame(edges, white_square()).unwrap();
    assert_eq!(report.processed.len(), 5);
    let output = report.output_of(terminal).unwrap();

    assert_eq!(output.format(), PixelFormat::Luma);
    assert!(output.samples().iter().all(|&v| v == 0.0 || v == 1.0));
    assert_eq!(output.get(16, 16, 0), 0.0, "flat interior");
    assert_eq!(output.get(0, 0, 0), 0.0, "flat background");
    assert!(
        (5..=10).any(|x| output.get(x, 16, 0) == 1.0),
        "left edge of the square"
    );
    assert!(
        (5..=10).any(|y| output.get(16, y, 0) == 1.0),
        "top edge of the square"
    );
}

#[test]
fn canny_on_flat_frame_is_empty() {
    let mut graph = FilterGraph::new();
    let edges = canny(&mut graph);
    let terminal = graph.resolve_terminal(edges).unwrap();

    let report = graph.push_frame(edges, solid(0.7)).unwrap();
    let output = report.output_of(terminal).unwrap();
    assert!(output.samples().iter().all(|&v| v == 0.0));
}

#[test]
fn group_parameters_reach_members() {
    let mut graph = FilterGraph::new();
    let edges = canny(&mut graph);
    let members = graph.members(edges).unwrap().to_vec();

    let radius = graph.find_param(edges, "blur_radius").unwrap().unwrap();
    assert_eq!(graph.set_param(edges, radius, 2.4).unwrap(), 2.0);
    assert_eq!(graph.get_param(members[1], 0).unwrap(), 2.0);

    let spacing = graph.find_param(edges, "Texel Spacing").unwrap().unwrap();
    assert_eq!(graph.set_param(edges, spacing, 20.0).unwrap(), 8.0);
    assert_eq!(graph.get_param(members[2], 0).unwrap(), 8.0);

    let upper = graph.find_param(edges, "upper_threshold").unwrap().unwrap();
    graph.set_param(edges, upper, 0.6).unwrap();
    assert_eq!(graph.get_param(members[3], 0).unwrap(), 0.6);
}

#[test]
fn group_wired_onward_feeds_its_terminal_output() {
    let mut graph = FilterGraph::new();
    let edges = canny(&mut graph);
    let invert = graph.create_filter(Box::new(Invert::new())).unwrap();
    graph.add_target(edges, invert).unwrap();

    let terminal = graph.resolve_terminal(edges).unwrap();
    assert_eq!(graph.targets(terminal).unwrap(), &[invert]);

    let report = graph.push_frame(edges, solid(0.3)).unwrap();
    assert!(report.output_of(terminal).is_none());
    let inverted = report.output_of(invert).unwrap();
    assert!(inverted.samples().iter().all(|&v| v == 1.0));
}

#[test]
fn releasing_the_group_frees_all_members() {
    let mut graph = FilterGraph::new();
    let edges = canny(&mut graph);
    assert_eq!(graph.node_count(), 6);
    assert!(graph.release(edges).unwrap());
    assert_eq!(graph.node_count(), 0);
}

// ============================================================================
// Gate and fan-out
// ============================================================================

#[test]
fn gate_drops_dark_frames_before_the_detector() {
    let mut graph = FilterGraph::new();
    let gate = graph.create_filter(Box::new(LuminanceGate::new())).unwrap();
    let edges = canny(&mut graph);
    graph.add_target(gate, edges).unwrap();

    let dark = graph.push_frame(gate, solid(0.02)).unwrap();
    assert_eq!(dark.processed, [gate]);
    assert_eq!(dark.dropped, 1);
    assert!(dark.outputs.is_empty());

    let bright = graph.push_frame(gate, solid(0.5)).unwrap();
    assert_eq!(bright.processed.len(), 6);
    assert_eq!(bright.outputs.len(), 1);
}

#[test]
fn grayscale_fans_out_to_detector_and_inverter() {
    let mut graph = FilterGraph::new();
    let gray = graph.create_filter(Box::new(Grayscale::new())).unwrap();
    let edges = canny(&mut graph);
    let invert = graph.create_filter(Box::new(Invert::new())).unwrap();
    graph.fan_out(gray, &[edges, invert]).unwrap();

    let report = graph.push_frame(gray, white_square()).unwrap();
    assert_eq!(report.invocations(gray), 1);
    assert_eq!(report.outputs.len(), 2);

    let inverted = report.output_of(invert).unwrap();
    assert_eq!(inverted.format(), PixelFormat::Luma);
    assert!((inverted.get(16, 16, 0) - 0.0).abs() < 1e-3);
    assert!((inverted.get(0, 0, 0) - 1.0).abs() < 1e-6);
}
