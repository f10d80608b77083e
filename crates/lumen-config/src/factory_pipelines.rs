//! Factory pipelines bundled with the lumen library.
//!
//! These are always available without external files and serve as starting
//! points for user pipelines.

use crate::Pipeline;

/// Array of factory pipeline names for external access.
pub static FACTORY_PIPELINE_NAMES: &[&str] =
    &["grayscale", "canny", "soft_edges", "negative_edges"];

/// TOML content for factory pipelines, embedded at compile time.
static FACTORY_PIPELINES_TOML: &[(&str, &str)] = &[
    ("grayscale", GRAYSCALE_PIPELINE),
    ("canny", CANNY_PIPELINE),
    ("soft_edges", SOFT_EDGES_PIPELINE),
    ("negative_edges", NEGATIVE_EDGES_PIPELINE),
];

/// Plain luminance conversion.
const GRAYSCALE_PIPELINE: &str = r#"
name = "Grayscale"
description = "Luminance only"

[[nodes]]
id = "gray"
type = "grayscale"
"#;

/// Canny edge detection with default thresholds.
const CANNY_PIPELINE: &str = r#"
name = "Canny"
description = "Binary edge map with the default Canny settings"

[[nodes]]
id = "edges"
type = "canny_edge_detection"
"#;

/// Wide blur and a low lower threshold: fewer, smoother contours.
const SOFT_EDGES_PIPELINE: &str = r#"
name = "Soft Edges"
description = "Heavily smoothed edge map that skips near-black frames"
source = "gate"

[[nodes]]
id = "gate"
type = "luminance_gate"
targets = ["edges"]
[nodes.params]
threshold = "5%"

[[nodes]]
id = "edges"
type = "canny_edge_detection"
[nodes.params]
blur_radius = "8px"
blur_sigma = "4"
upper_threshold = "0.3"
lower_threshold = "0.05"
"#;

/// Dark edges on white, for print.
const NEGATIVE_EDGES_PIPELINE: &str = r#"
name = "Negative Edges"
description = "Canny edge map inverted to dark lines on white"

[[nodes]]
id = "edges"
type = "canny_edge_detection"
targets = ["invert"]
[nodes.params]
upper_threshold = "0.45"

[[nodes]]
id = "invert"
type = "invert"
"#;

/// Get all factory pipelines.
pub fn factory_pipelines() -> Vec<Pipeline> {
    FACTORY_PIPELINES_TOML
        .iter()
        .filter_map(|(_, toml)| Pipeline::from_toml(toml).ok())
        .collect()
}

/// Get a factory pipeline by name.
///
/// Matches the internal identifier or the display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use lumen_config::get_factory_pipeline;
///
/// let canny = get_factory_pipeline("canny").unwrap();
/// assert_eq!(canny.name, "Canny");
/// assert!(get_factory_pipeline("Negative Edges").is_some());
/// ```
pub fn get_factory_pipeline(name: &str) -> Option<Pipeline> {
    if let Some((_, toml)) = FACTORY_PIPELINES_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return Pipeline::from_toml(toml).ok();
    }

    factory_pipelines()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Get the identifiers of all factory pipelines.
pub fn factory_pipeline_names() -> Vec<&'static str> {
    FACTORY_PIPELINES_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory pipeline (case-insensitive).
pub fn is_factory_pipeline(name: &str) -> bool {
    get_factory_pipeline(name).is_some()
}
