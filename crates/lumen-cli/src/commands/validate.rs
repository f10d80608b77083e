//! Pipeline validation command.

use clap::Args;
use lumen_config::{ConfigError, FilterRegistry, Pipeline, PipelineValidator};
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Pipeline file to check
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Also build the graph, catching cycles and input conflicts
    #[arg(long)]
    build: bool,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::load(&args.file)?;
    let registry = FilterRegistry::new();

    if let Err(e) = PipelineValidator::new(&registry).validate_pipeline(&pipeline) {
        let problems = e.into_problems();
        eprintln!(
            "{}: {} problem(s)",
            args.file.display(),
            problems.len()
        );
        for problem in &problems {
            eprintln!("  - {problem}");
        }
        anyhow::bail!("Validation failed");
    }

    if args.build {
        match pipeline.build(&registry) {
            Ok(built) => println!(
                "Built {} node(s) with {} sink(s)",
                built.nodes().count(),
                built.sinks().len()
            ),
            Err(ConfigError::Graph(e)) => anyhow::bail!("Graph rejected the pipeline: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    println!(
        "{}: pipeline '{}' is valid ({} node(s))",
        args.file.display(),
        pipeline.name,
        pipeline.len()
    );
    Ok(())
}
