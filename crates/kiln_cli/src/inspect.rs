//! `kiln analysis` and `kiln lookup`: read-only views of analysis stores.

use std::path::Path;

use kiln_analysis::{
    AnalysisLayout, AnalysisStore, ClassKind, CompileAnalysis, CrossModuleAnalysisLookup, Setup,
};

use crate::project;
use crate::{AnalysisArgs, GlobalArgs, LookupArgs};

/// Prints a summary of the store at `args.store`.
///
/// Exits with 1 if there is no store; an unreadable store is an error.
pub fn run_analysis(args: &AnalysisArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let previous = AnalysisStore::new(&args.store).load()?;
    let Some(contents) = previous.contents() else {
        eprintln!("no analysis at {}", args.store.display());
        return Ok(1);
    };
    print!("{}", summarise(&contents.analysis, &contents.setup, args.sources));
    Ok(0)
}

fn summarise(analysis: &CompileAnalysis, setup: &Setup, list_sources: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("output:    {}\n", setup.output_dir.display()));
    out.push_str(&format!("compiler:  {}\n", setup.compiler_version));
    out.push_str(&format!("order:     {}\n", setup.order));
    if !setup.scalac_options.is_empty() {
        out.push_str(&format!("scalac:    {}\n", setup.scalac_options.join(" ")));
    }
    if !setup.javac_options.is_empty() {
        out.push_str(&format!("javac:     {}\n", setup.javac_options.join(" ")));
    }
    out.push_str(&format!("sources:   {}\n", analysis.sources().len()));
    out.push_str(&format!("classes:   {}\n", analysis.classes().len()));
    if list_sources {
        for (path, info) in analysis.sources() {
            out.push_str(&format!("{}  {}\n", info.hash, path.display()));
            for class in &info.classes {
                out.push_str(&format!("    {class}\n"));
            }
        }
    }
    out
}

/// Prints, per entry, its kind and whether an upstream analysis describes it.
pub fn run_lookup(
    args: &LookupArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let lookup = CrossModuleAnalysisLookup::new(layout(global));
    for entry in &args.entries {
        println!("{}", describe(&lookup, entry, args.class.as_deref()));
    }
    Ok(0)
}

/// The configured layout, or the default one when no configuration is found.
fn layout(global: &GlobalArgs) -> AnalysisLayout {
    match project::load(global) {
        Ok(config) => AnalysisLayout::new(config.analysis.layout),
        Err(e) => {
            tracing::debug!(%e, "using the default analysis layout");
            AnalysisLayout::default()
        }
    }
}

fn describe(lookup: &CrossModuleAnalysisLookup, entry: &Path, class: Option<&str>) -> String {
    let kind = match lookup.class_kind_of(entry) {
        ClassKind::Directory => "directory",
        ClassKind::Archive => "archive",
        ClassKind::Missing => "missing",
    };
    let analysis = match lookup.analysis_for(entry) {
        Some(analysis) => format!("analysis with {} sources", analysis.sources().len()),
        None => "no analysis".to_string(),
    };
    let mut line = format!("{}: {kind}, {analysis}", entry.display());
    if let Some(class) = class {
        let defined = lookup.defines_class(entry).defines(class);
        line.push_str(&format!(
            ", {} {class}",
            if defined { "defines" } else { "does not define" }
        ));
    }
    line
}
