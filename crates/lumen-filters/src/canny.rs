//! Canny edge detection as a composite group.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use lumen_core::GroupBuilder;

use crate::{
    DirectionalNonMaximumSuppression, DirectionalSobel, GaussianBlur, Grayscale, WeakPixelInclusion,
};

/// Group name used in logs and by [`FilterGraph::name()`](lumen_core::FilterGraph::name).
pub const CANNY_GROUP_NAME: &str = "canny_edge_detection";

/// Describes the five-stage Canny detector:
///
/// ```text
/// grayscale -> gaussian blur -> directional sobel -> non-max suppression -> weak pixel inclusion
/// ```
///
/// The first stage is the entry and the last is the terminal, so the built
/// group can be injected into and wired onward like a single filter. Output is
/// a binary luma edge map.
///
/// ## Parameter Indices (group)
///
/// | Index | Name | Member | Range | Default |
/// |-------|------|--------|-------|---------|
/// | 0 | Blur Radius | blur | 0–32 px | 4 |
/// | 1 | Blur Sigma | blur | 0.1–16 | 2.0 |
/// | 2 | Texel Spacing | sobel | 1–8 px | 1 |
/// | 3 | Upper Threshold | nms | 0.0–1.0 | 0.4 |
/// | 4 | Lower Threshold | nms | 0.0–1.0 | 0.1 |
///
/// # Example
///
/// ```rust
/// use lumen_core::{FilterGraph, Frame, FrameBuffer, FrameDescriptor};
/// use lumen_filters::canny_edge_detection;
///
/// let mut graph = FilterGraph::new();
/// let canny = graph.build_group(canny_edge_detection()).unwrap();
///
/// let threshold = graph.find_param(canny, "upper_threshold").unwrap().unwrap();
/// graph.set_param(canny, threshold, 0.5).unwrap();
///
/// let frame = Frame::new(FrameBuffer::new(FrameDescriptor::rgba(8, 8)));
/// let report = graph.push_frame(canny, frame).unwrap();
/// assert_eq!(report.processed.len(), 5);
/// ```
pub fn canny_edge_detection() -> GroupBuilder {
    let mut builder = GroupBuilder::new(CANNY_GROUP_NAME);
    let grayscale = builder.filter(Box::new(Grayscale::new()));
    let blur = builder.filter(Box::new(GaussianBlur::new()));
    let sobel = builder.filter(Box::new(DirectionalSobel::new()));
    let nms = builder.filter(Box::new(DirectionalNonMaximumSuppression::new()));
    let weak = builder.filter(Box::new(WeakPixelInclusion::new()));

    builder
        .chain(&[grayscale, blur, sobel, nms, weak])
        .entry(grayscale)
        .terminal(weak)
        .expose_param(blur, 0, "Blur Radius", "blur_radius")
        .expose_param(blur, 1, "Blur Sigma", "blur_sigma")
        .expose_param(sobel, 0, "Texel Spacing", "texel_spacing")
        .expose_param(nms, 0, "Upper Threshold", "upper_threshold")
        .expose_param(nms, 1, "Lower Threshold", "lower_threshold");
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::FilterGraph;

    #[test]
    fn builds_five_members_with_weak_pixel_terminal() {
        let mut graph = FilterGraph::new();
        let canny = graph.build_group(canny_edge_detection()).unwrap();
        let members = graph.members(canny).unwrap().to_vec();
        assert_eq!(members.len(), 5);
        assert_eq!(graph.resolve_entry(canny).unwrap(), members[0]);
        assert_eq!(graph.resolve_terminal(canny).unwrap(), members[4]);
        assert_eq!(graph.name(members[4]).unwrap(), "weak_pixel_inclusion");
        assert_eq!(graph.name(canny).unwrap(), CANNY_GROUP_NAME);
    }

    #[test]
    fn exposes_member_parameters() {
        let mut graph = FilterGraph::new();
        let canny = graph.build_group(canny_edge_detection()).unwrap();
        let ids: Vec<_> = graph
            .params(canny)
            .unwrap()
            .iter()
            .map(|d| d.string_id)
            .collect();
        assert_eq!(
            ids,
            [
                "blur_radius",
                "blur_sigma",
                "texel_spacing",
                "upper_threshold",
                "lower_threshold"
            ]
        );
        assert_eq!(graph.get_param(canny, 3).unwrap(), 0.4);
        assert_eq!(graph.get_param(canny, 4).unwrap(), 0.1);
    }
}
