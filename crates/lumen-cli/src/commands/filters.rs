//! Filter listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use lumen_config::{FilterDescriptor, FilterKind, FilterRegistry};
use lumen_core::ParamDescriptor;
use serde::Serialize;

#[derive(Args)]
pub struct FiltersArgs {
    /// Show details for a specific filter
    #[arg(value_name = "FILTER")]
    filter: Option<String>,

    /// Print machine-readable JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FilterListing {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    composite: bool,
    params: Vec<ParamListing>,
}

#[derive(Serialize)]
struct ParamListing {
    id: &'static str,
    name: &'static str,
    min: f32,
    max: f32,
    default: f32,
}

impl ParamListing {
    fn new(desc: &ParamDescriptor) -> Self {
        Self {
            id: desc.string_id,
            name: desc.name,
            min: desc.min,
            max: desc.max,
            default: desc.default,
        }
    }
}

fn listing(
    registry: &FilterRegistry,
    desc: &FilterDescriptor,
) -> anyhow::Result<FilterListing> {
    let params = registry.params(desc.id)?;
    Ok(FilterListing {
        id: desc.id,
        name: desc.name,
        description: desc.description,
        category: desc.category.name(),
        composite: desc.kind == FilterKind::Composite,
        params: params.iter().map(ParamListing::new).collect(),
    })
}

pub fn run(args: FiltersArgs) -> anyhow::Result<()> {
    let registry = FilterRegistry::new();

    if let Some(id) = &args.filter {
        let desc = registry
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown filter: {}", id))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&listing(&registry, desc)?)?);
            return Ok(());
        }

        println!("{}", desc.id);
        println!("{}", "=".repeat(desc.id.len()));
        println!();
        println!("{}", desc.description);
        println!();
        println!("Category: {}", desc.category.name());
        if desc.kind == FilterKind::Composite {
            println!("Composite: frames enter the first stage and leave the last");
        }
        println!();

        let params = registry.params(desc.id)?;
        if params.is_empty() {
            println!("No parameters.");
        } else {
            println!("Parameters:");
            println!();
            println!("  {:18}  {:18}  {:10}  {}", "Id", "Name", "Default", "Range");
            println!("  {:18}  {:18}  {:10}  {}", "--", "----", "-------", "-----");
            for p in &params {
                println!(
                    "  {:18}  {:18}  {:10}  {} .. {}",
                    p.string_id,
                    p.name,
                    p.format_value(p.default),
                    p.format_value(p.min),
                    p.format_value(p.max)
                );
            }
        }

        println!();
        println!("Example usage:");
        println!();
        match params.first() {
            Some(p) => println!(
                "  lumen process input.png --output out.png --filter {} --param {}={}",
                desc.id, p.string_id, p.default
            ),
            None => println!(
                "  lumen process input.png --output out.png --filter {}",
                desc.id
            ),
        }
        return Ok(());
    }

    if args.json {
        let all = registry
            .all_filters()
            .into_iter()
            .map(|desc| listing(&registry, desc))
            .collect::<anyhow::Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!("Available Filters");
    println!("=================");
    println!();
    for desc in registry.all_filters() {
        println!("  {:22} - {}", desc.id, desc.description);
    }
    println!();
    println!("Use 'lumen filters <id>' for detailed parameter info.");

    Ok(())
}
