//! File-based image processing command.

use crate::commands::common::{load_frame, output_path, parse_key_val, save_frame, sink_suffixes};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lumen_config::{FilterRegistry, Pipeline, PipelineValidator, load_pipeline};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input images
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output image, or a directory when several inputs are given
    #[arg(short, long, value_name = "PATH|DIR")]
    output: PathBuf,

    /// Pipeline file, or the name of a user or factory pipeline
    #[arg(short, long, value_name = "FILE|NAME", conflicts_with = "filter")]
    pipeline: Option<String>,

    /// Filter to apply; repeat to chain several
    #[arg(short, long, value_name = "ID")]
    filter: Vec<String>,

    /// Parameter override, `param=value` or `node.param=value`
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let registry = FilterRegistry::new();

    let mut pipeline = if let Some(name) = &args.pipeline {
        load_pipeline(name)?
    } else if !args.filter.is_empty() {
        let ids: Vec<&str> = args.filter.iter().map(String::as_str).collect();
        Pipeline::from_filter_types(args.filter.join("+"), &ids)
    } else {
        anyhow::bail!("No pipeline specified. Use --pipeline or --filter");
    };

    apply_overrides(&mut pipeline, &registry, &args.param)?;

    let mut built = pipeline
        .build(&registry)
        .with_context(|| format!("failed to build pipeline '{}'", pipeline.name))?;

    println!(
        "Pipeline: {} ({} node(s), {} sink(s))",
        built.name(),
        built.nodes().count(),
        built.sinks().len()
    );

    let to_directory = args.inputs.len() > 1 || args.output.is_dir();
    if to_directory {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("failed to create {}", args.output.display()))?;
    }

    let pb = ProgressBar::new(args.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut written = 0usize;
    let mut skipped = 0usize;
    for input in &args.inputs {
        pb.set_message(input.display().to_string());
        let frame = load_frame(input)?;
        let report = built
            .push(frame)
            .with_context(|| format!("failed to process {}", input.display()))?;

        let outputs = built.sink_outputs(&report);
        if outputs.is_empty() {
            tracing::info!(input = %input.display(), dropped = report.dropped, "no_output");
            skipped += 1;
            pb.inc(1);
            continue;
        }

        let names: Vec<&str> = outputs.iter().map(|&(name, _)| name).collect();
        for ((_, frame), suffix) in outputs.iter().zip(sink_suffixes(&names)) {
            let path = output_path(input, &args.output, to_directory, suffix.as_deref());
            save_frame(frame, &path)?;
            tracing::debug!(path = %path.display(), "frame_written");
            written += 1;
        }
        pb.inc(1);
    }

    pb.finish_with_message("done");

    println!("\nWrote {written} image(s)");
    if skipped > 0 {
        println!("{skipped} input(s) produced no output");
    }
    Ok(())
}

/// Applies `--param` overrides to the pipeline description.
///
/// A bare `param` applies to every node whose filter publishes it; a
/// `node.param` key applies to that node only. Values are validated when the
/// pipeline is built.
fn apply_overrides(
    pipeline: &mut Pipeline,
    registry: &FilterRegistry,
    overrides: &[(String, String)],
) -> anyhow::Result<()> {
    let mut validator = PipelineValidator::new(registry);

    for (key, value) in overrides {
        if let Some((node_id, param)) = key.split_once('.') {
            let node = pipeline
                .get_mut(node_id)
                .ok_or_else(|| anyhow::anyhow!("Unknown node: {}", node_id))?;
            node.set_param(param, value.clone());
            continue;
        }

        let mut applied = false;
        for node in &mut pipeline.nodes {
            if validator.find_param(&node.filter_type, key).is_some() {
                node.set_param(key.clone(), value.clone());
                applied = true;
            }
        }
        if !applied {
            anyhow::bail!("No node in pipeline '{}' has parameter '{}'", pipeline.name, key);
        }
    }
    Ok(())
}
