//! Pipeline listing command.

use clap::Args;
use lumen_config::{
    Pipeline, factory_pipeline_names, get_factory_pipeline, list_user_pipelines, load_pipeline,
    pipeline_name_from_path, user_pipelines_dir,
};

#[derive(Args)]
pub struct PipelinesArgs {
    /// Print one pipeline as TOML instead of listing
    #[arg(value_name = "NAME")]
    name: Option<String>,

    /// Show only factory pipelines
    #[arg(long, conflicts_with = "user")]
    factory: bool,

    /// Show only user pipelines
    #[arg(long)]
    user: bool,
}

pub fn run(args: PipelinesArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        let pipeline = load_pipeline(name)?;
        print!("{}", pipeline.to_toml()?);
        return Ok(());
    }

    if !args.user {
        println!("Factory Pipelines:");
        println!("==================");
        for id in factory_pipeline_names() {
            if let Some(pipeline) = get_factory_pipeline(id) {
                println!("  {:16} - {}", id, summary(&pipeline));
            }
        }
        println!();
    }

    if !args.factory {
        println!("User Pipelines:");
        println!("===============");
        let paths = list_user_pipelines();
        if paths.is_empty() {
            println!("  (none)");
        }
        for path in paths {
            let name = pipeline_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
            match Pipeline::load(&path) {
                Ok(pipeline) => println!("  {:16} - {}", name, summary(&pipeline)),
                Err(e) => println!("  {:16} - (unreadable: {e})", name),
            }
        }
        println!();
        println!("User pipeline directory: {}", user_pipelines_dir().display());
    }

    Ok(())
}

fn summary(pipeline: &Pipeline) -> String {
    let chain = pipeline.filter_types().join(", ");
    match &pipeline.description {
        Some(desc) => format!("{desc} [{chain}]"),
        None => format!("[{chain}]"),
    }
}
