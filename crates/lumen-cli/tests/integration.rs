//! Integration tests for lumen-cli.
//!
//! Tests run the `lumen` binary against images and pipeline files written to
//! temporary directories.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to get the path to the `lumen` binary built by cargo.
///
/// The user config directory is redirected so user pipelines on the host
/// never leak into a test.
fn lumen_bin(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lumen"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    lumen_bin(dir.path())
        .args(args)
        .output()
        .expect("failed to run lumen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// 32x32 opaque black image with a white square covering 8..24.
fn write_square(path: &Path) {
    let img = image::RgbaImage::from_fn(32, 32, |x, y| {
        if (8..24).contains(&x) && (8..24).contains(&y) {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    });
    img.save(path).unwrap();
}

fn write_black(path: &Path) {
    image::RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 0, 255]))
        .save(path)
        .unwrap();
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ---------------------------------------------------------------------------
// `lumen --help` / `--version`
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["--help"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Lumen image filter graph CLI"));
    for command in ["process", "filters", "pipelines", "validate"] {
        assert!(out.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn cli_version_works() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("lumen"));
}

// ---------------------------------------------------------------------------
// `lumen filters`
// ---------------------------------------------------------------------------

#[test]
fn cli_filters_lists_all_filters() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["filters"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Available Filters"));
    for id in [
        "grayscale",
        "invert",
        "gaussian_blur",
        "directional_sobel",
        "directional_nms",
        "weak_pixel_inclusion",
        "luminance_gate",
        "canny_edge_detection",
    ] {
        assert!(out.contains(id), "filter listing should contain '{id}'");
    }
}

#[test]
fn cli_filters_json_is_parseable() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["filters", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let filters = value.as_array().unwrap();
    assert_eq!(filters.len(), 8);

    let canny = filters
        .iter()
        .find(|f| f["id"] == "canny_edge_detection")
        .unwrap();
    assert_eq!(canny["composite"], true);
    let params: Vec<&str> = canny["params"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(params.contains(&"upper_threshold"));
    assert!(params.contains(&"blur_radius"));
}

#[test]
fn cli_filters_detail_shows_parameters() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["filters", "gaussian_blur"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Parameters"));
    assert!(out.contains("radius"));
    assert!(out.contains("sigma"));
}

#[test]
fn cli_filters_unknown_filter_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["filters", "nonexistent_filter_xyz"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nonexistent_filter_xyz"));
}

// ---------------------------------------------------------------------------
// `lumen pipelines`
// ---------------------------------------------------------------------------

#[test]
fn cli_pipelines_lists_factory_and_user() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["pipelines"]);
    assert!(output.status.success());

    let out = stdout(&output);
    for name in ["grayscale", "canny", "soft_edges", "negative_edges"] {
        assert!(out.contains(name), "pipeline listing should contain '{name}'");
    }
    assert!(out.contains("User Pipelines"));
}

#[test]
fn cli_pipelines_prints_one_as_toml() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["pipelines", "soft_edges"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("luminance_gate"));
    assert!(out.contains("source = \"gate\""));
}

// ---------------------------------------------------------------------------
// `lumen validate`
// ---------------------------------------------------------------------------

#[test]
fn cli_validate_accepts_good_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edges.toml");
    std::fs::write(
        &path,
        r#"
name = "Edges"

[[nodes]]
id = "edges"
type = "canny_edge_detection"
targets = ["invert"]
[nodes.params]
upper_threshold = "45%"

[[nodes]]
id = "invert"
type = "invert"
"#,
    )
    .unwrap();

    let output = run(&dir, &["validate", path_str(&path), "--build"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("is valid"));
}

#[test]
fn cli_validate_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
name = "Broken"

[[nodes]]
id = "blur"
type = "gaussian_blur"
targets = ["missing"]
[nodes.params]
radius = "500px"

[[nodes]]
id = "mystery"
type = "no_such_filter"
"#,
    )
    .unwrap();

    let output = run(&dir, &["validate", path_str(&path)]);
    assert!(!output.status.success());

    let err = stderr(&output);
    assert!(err.contains("3 problem(s)"), "stderr: {err}");
    assert!(err.contains("missing"));
    assert!(err.contains("no_such_filter"));
    assert!(err.contains("radius"));
}

#[test]
fn cli_validate_build_catches_input_conflict() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conflict.toml");
    std::fs::write(
        &path,
        r#"
name = "Conflict"

[[nodes]]
id = "a"
type = "grayscale"
targets = ["c"]

[[nodes]]
id = "b"
type = "grayscale"
targets = ["c"]

[[nodes]]
id = "c"
type = "invert"
"#,
    )
    .unwrap();

    // The description itself is fine.
    let output = run(&dir, &["validate", path_str(&path)]);
    assert!(output.status.success());

    let output = run(&dir, &["validate", path_str(&path), "--build"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Graph rejected"));
}

// ---------------------------------------------------------------------------
// `lumen process` (end-to-end image processing)
// ---------------------------------------------------------------------------

#[test]
fn cli_process_single_filter() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("square.png");
    let out = dir.path().join("gray.png");
    write_square(&input);

    let output = run(
        &dir,
        &["process", path_str(&input), "--output", path_str(&out), "--filter", "grayscale"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (32, 32));
    let gray = img.to_luma8();
    assert_eq!(gray.get_pixel(16, 16).0, [255]);
    assert_eq!(gray.get_pixel(0, 0).0, [0]);
}

#[test]
fn cli_process_canny_pipeline_finds_outline() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("square.png");
    let out = dir.path().join("edges.png");
    write_square(&input);

    let output = run(
        &dir,
        &["process", path_str(&input), "--output", path_str(&out), "--pipeline", "canny"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let edges = image::open(&out).unwrap().to_luma8();
    assert!(edges.pixels().any(|p| p.0[0] == 255), "outline should be present");
    assert_eq!(edges.get_pixel(0, 0).0, [0]);
    assert_eq!(edges.get_pixel(16, 16).0, [0]);
}

#[test]
fn cli_process_param_override_is_validated() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("square.png");
    let out = dir.path().join("blur.png");
    write_square(&input);

    let output = run(
        &dir,
        &[
            "process",
            path_str(&input),
            "--output",
            path_str(&out),
            "--filter",
            "gaussian_blur",
            "--param",
            "radius=999px",
        ],
    );
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn cli_process_several_inputs_into_directory() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    write_square(&a);
    write_square(&b);
    let out_dir = dir.path().join("out");

    let output = run(
        &dir,
        &[
            "process",
            path_str(&a),
            path_str(&b),
            "--output",
            path_str(&out_dir),
            "--filter",
            "invert",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out_dir.join("a.png").is_file());
    assert!(out_dir.join("b.png").is_file());
}

#[test]
fn cli_process_fan_out_writes_each_sink() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("square.png");
    write_square(&input);
    let pipeline = dir.path().join("fan.toml");
    std::fs::write(
        &pipeline,
        r#"
name = "Fan"

[[nodes]]
id = "gray"
type = "grayscale"
targets = ["edges", "negative"]

[[nodes]]
id = "edges"
type = "canny_edge_detection"

[[nodes]]
id = "negative"
type = "invert"
"#,
    )
    .unwrap();
    let out = dir.path().join("result.png");

    let output = run(
        &dir,
        &[
            "process",
            path_str(&input),
            "--output",
            path_str(&out),
            "--pipeline",
            path_str(&pipeline),
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written: Vec<PathBuf> = ["result_edges.png", "result_negative.png"]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
    for path in &written {
        assert!(path.is_file(), "{} should exist", path.display());
    }
    assert!(!out.exists());

    let negative = image::open(&written[1]).unwrap().to_luma8();
    assert_eq!(negative.get_pixel(0, 0).0, [255]);
}

#[test]
fn cli_process_gated_frame_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("black.png");
    let out = dir.path().join("edges.png");
    write_black(&input);

    let output = run(
        &dir,
        &["process", path_str(&input), "--output", path_str(&out), "--pipeline", "soft_edges"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("produced no output"));
    assert!(!out.exists());
}

#[test]
fn cli_process_requires_pipeline_or_filter() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("square.png");
    write_square(&input);

    let output = run(
        &dir,
        &["process", path_str(&input), "--output", path_str(&dir.path().join("o.png"))],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No pipeline specified"));
}
