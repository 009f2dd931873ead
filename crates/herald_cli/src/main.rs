//! herald: command-line front end for the event documentation generator

use anyhow::{bail, Result};
use std::env;
use std::process::ExitCode;

mod generate;
mod templates;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        bail!("no command given");
    };

    match command.as_str() {
        "generate" => generate::run(rest),
        "copy-templates" => templates::run(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" => {
            println!("herald {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other)
        }
    }
}

fn print_usage() {
    println!("herald - integration-event documentation generator");
    println!();
    println!("Usage:");
    println!("  herald generate [OPTIONS] <MODULE>...   Generate docs from module manifests");
    println!("  herald copy-templates [OPTIONS] [DIR]   Write the default templates for customization");
    println!();
    println!("Run a command with --help for its options.");
}
