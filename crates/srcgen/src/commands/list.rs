//! The `list-generators` subcommand: show resolved bindings for a file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use srcgen_config::{ConfigCache, resolve_bindings};

#[derive(Args)]
pub struct ListArgs {
    /// Input file to resolve
    pub file: PathBuf,
}

pub fn execute(args: ListArgs) -> Result<()> {
    let bindings = resolve_bindings(&args.file, &mut ConfigCache::new())?;

    if bindings.is_empty() {
        println!("No generators configured for {}", args.file.display());
        return Ok(());
    }

    println!("{} {}:", "Generators for".bold(), args.file.display());
    for (index, binding) in bindings.iter().enumerate() {
        let generator = &binding.generator;
        println!("  {}. {}", index + 1, generator.command.cyan());
        if !generator.args.is_empty() {
            println!("     args:       {}", generator.args.join(" "));
        }
        let extensions: Vec<&str> = generator.output_extensions().collect();
        if !extensions.is_empty() {
            println!("     outputs:    {}", extensions.join(" "));
        }
        let mut flags = Vec::new();
        if generator.debug {
            flags.push("debug");
        }
        if generator.std_input {
            flags.push("stdin");
        }
        if generator.std_output.is_some() {
            flags.push("stdout");
        }
        if !flags.is_empty() {
            println!("     flags:      {}", flags.join(" "));
        }
        println!("     configured: {}", binding.config_dir.display());
    }

    Ok(())
}
