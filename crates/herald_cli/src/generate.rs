//! The `herald generate` command
//!
//! Parses the command line into `GeneratorOptions`, runs the pipeline
//! and prints the collected diagnostics plus a one-line summary.
//! Warnings never change the exit status; only fatal generator errors
//! do.

use anyhow::{bail, Context, Result};
use herald_docgen::{Generator, GeneratorOptions};
use std::path::PathBuf;
use std::time::Duration;

/// Run the generate command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let options = parse(args)?;
    let output_dir = options.output_dir.clone();

    let report = Generator::new(options)
        .run()
        .context("documentation generation failed")?;

    report.diagnostics.print();
    report.diagnostics.print_summary();

    println!(
        "Generated {} event document(s) and {} schema document(s) in {}",
        report.event_count,
        report.schema_count,
        output_dir.display()
    );

    Ok(())
}

fn parse(args: &[String]) -> Result<GeneratorOptions> {
    let mut options = GeneratorOptions::default();
    let mut boundary_tokens: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                options.output_dir = PathBuf::from(value(args, i, "--out")?);
                i += 2;
            }
            "--templates" | "-t" => {
                options.template_dir = Some(PathBuf::from(value(args, i, "--templates")?));
                i += 2;
            }
            "--docs" => {
                options.docs_paths.push(PathBuf::from(value(args, i, "--docs")?));
                i += 2;
            }
            "--sidebar" => {
                options.sidebar_file = value(args, i, "--sidebar")?.to_string();
                i += 2;
            }
            "--source-base" => {
                options.source_link_base = Some(value(args, i, "--source-base")?.to_string());
                i += 2;
            }
            "--boundary-token" => {
                boundary_tokens.push(value(args, i, "--boundary-token")?.to_string());
                i += 2;
            }
            "--timeout-secs" => {
                let raw = value(args, i, "--timeout-secs")?;
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("invalid --timeout-secs value: {}", raw))?;
                options.load_timeout = Duration::from_secs(secs);
                i += 2;
            }
            arg if !arg.starts_with('-') => {
                options.module_paths.push(PathBuf::from(arg));
                i += 1;
            }
            _ => {
                bail!("unknown flag: {}", args[i]);
            }
        }
    }

    if !boundary_tokens.is_empty() {
        options.boundary_tokens = boundary_tokens;
    }
    if options.module_paths.is_empty() {
        bail!("no module manifests given; pass one or more *.module.json paths");
    }

    Ok(options)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    match args.get(i + 1) {
        Some(v) => Ok(v.as_str()),
        None => bail!("{} requires a value", flag),
    }
}

fn print_usage() {
    println!("Usage: herald generate [OPTIONS] <MODULE>...");
    println!();
    println!("Options:");
    println!("  -o, --out <DIR>            Output directory (default: docs)");
    println!("  -t, --templates <DIR>      Custom template directory");
    println!("      --docs <FILE>          Extra documentation file (repeatable)");
    println!("      --sidebar <FILE>       Navigation manifest file name (default: sidebar.json)");
    println!("      --source-base <URL>    Base URL for contract source links");
    println!("      --boundary-token <T>   Namespace boundary token (repeatable; default: contracts, events)");
    println!("      --timeout-secs <N>     Per-module load deadline in seconds (default: 30)");
}
