//! Node configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a single node in a pipeline.
///
/// A node names a registry filter type, optional parameter overrides and the
/// IDs of the nodes its output feeds.
///
/// # Example
///
/// ```rust
/// use lumen_config::NodeConfig;
///
/// let config = NodeConfig::new("blur", "gaussian_blur")
///     .with_param("radius", "6px")
///     .with_target("sobel");
///
/// assert_eq!(config.filter_type, "gaussian_blur");
/// assert_eq!(config.targets, ["sobel"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    /// Unique node ID within the pipeline.
    pub id: String,

    /// Registry filter ID (e.g., "canny_edge_detection", "invert").
    #[serde(rename = "type")]
    pub filter_type: String,

    /// IDs of the nodes this node's output is delivered to, in fan-out order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,

    /// Parameters as key-value pairs.
    /// Values are strings to support unit suffixes ("50%", "4px").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl NodeConfig {
    /// Create a node configuration with no targets or parameters.
    pub fn new(id: impl Into<String>, filter_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filter_type: filter_type.into(),
            targets: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter to the configuration.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Append a target node ID.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Get a parameter value.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Set a parameter value.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Parse a parameter value as f32. See [`parse_param_value`].
    pub fn parse_param(&self, key: &str) -> Option<f32> {
        parse_param_value(self.params.get(key)?)
    }
}

/// Parse a parameter value string into an f32.
///
/// Supports:
/// - Plain numbers: "0.5", "4", "-0.3"
/// - Percentages: "45%" (divided by 100)
/// - Pixels: "4px" (kept as pixels)
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();

    // Percentages
    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| v / 100.0);
    }

    // Pixels
    if let Some(px) = value
        .strip_suffix("px")
        .or_else(|| value.strip_suffix("PX"))
    {
        return px.trim().parse::<f32>().ok();
    }

    // Plain number
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_config_new() {
        let config = NodeConfig::new("gray", "grayscale");
        assert_eq!(config.id, "gray");
        assert_eq!(config.filter_type, "grayscale");
        assert!(config.targets.is_empty());
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_node_config_with_params() {
        let config = NodeConfig::new("blur", "gaussian_blur")
            .with_param("radius", "6")
            .with_param("sigma", "3");

        assert_eq!(config.get_param("radius"), Some("6"));
        assert_eq!(config.parse_param("sigma"), Some(3.0));
        assert_eq!(config.get_param("missing"), None);
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_param_value("0.5"), Some(0.5));
        assert_eq!(parse_param_value("4"), Some(4.0));
        assert_eq!(parse_param_value("-0.3"), Some(-0.3));
        assert_eq!(parse_param_value("  0.5  "), Some(0.5));
    }

    #[test]
    fn test_parse_percentages() {
        assert_eq!(parse_param_value("50%"), Some(0.5));
        assert_eq!(parse_param_value("100%"), Some(1.0));
        assert_eq!(parse_param_value("0 %"), Some(0.0));
    }

    #[test]
    fn test_parse_pixels() {
        assert_eq!(parse_param_value("4px"), Some(4.0));
        assert_eq!(parse_param_value("2 px"), Some(2.0));
        assert_eq!(parse_param_value("8PX"), Some(8.0));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_param_value("invalid"), None);
        assert_eq!(parse_param_value("abc%"), None);
        assert_eq!(parse_param_value("NaN"), None);
        assert_eq!(parse_param_value(""), None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = NodeConfig::new("edges", "canny_edge_detection")
            .with_param("upper_threshold", "0.45")
            .with_target("invert");

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("type = \"canny_edge_detection\""));
        let parsed: NodeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
