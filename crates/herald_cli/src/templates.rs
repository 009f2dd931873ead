//! The `herald copy-templates` command
//!
//! Writes the built-in default templates into a directory so they can
//! be forked and passed back through `generate --templates`.

use anyhow::{bail, Context, Result};
use herald_docgen::copy_default_templates;
use std::path::PathBuf;

/// Run the copy-templates command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let (dir, force) = parse(args)?;
    let written = copy_default_templates(&dir, force)
        .with_context(|| format!("could not write templates into {}", dir.display()))?;

    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn parse(args: &[String]) -> Result<(PathBuf, bool)> {
    let mut dir = PathBuf::from("templates");
    let mut force = false;

    for arg in args {
        match arg.as_str() {
            "--force" | "-f" => force = true,
            a if !a.starts_with('-') => dir = PathBuf::from(a),
            _ => bail!("unknown flag: {}", arg),
        }
    }

    Ok((dir, force))
}

fn print_usage() {
    println!("Usage: herald copy-templates [OPTIONS] [DIR]");
    println!();
    println!("Options:");
    println!("  -f, --force   Overwrite existing template files");
    println!();
    println!("DIR defaults to ./templates");
}
