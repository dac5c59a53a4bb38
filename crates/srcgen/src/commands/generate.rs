//! The `generate` subcommand: config-driven generator execution.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use srcgen_config::{ConfigCache, GeneratorBinding, resolve_bindings};
use srcgen_core::{GeneratorRunner, ProcessRunner, input_source, project_source};
use srcgen_vars::{VarResolver, VarSource, expand, expand_env};

use crate::glob_expand::expand_globs;

#[derive(Args)]
pub struct GenerateArgs {
    /// Input files (can be multiple files or glob patterns like "src/**/*.idl")
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Variable define, as name=value (repeatable)
    #[arg(short = 'D', long = "define")]
    pub define: Vec<String>,

    /// Print the expanded command lines without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let files = expand_globs(&args.files)?;
    let mut cache = ConfigCache::new();
    let runner = ProcessRunner;

    let mut failures = 0;
    for file in &files {
        match generate_for_file(file, &args, &mut cache, &runner) {
            Ok(0) => {
                if args.verbose {
                    println!("  {} {} (no generators configured)", "-".dimmed(), file.display());
                }
            }
            Ok(count) => {
                println!("  {} {} ({count} generator(s))", "✓".green(), file.display());
            }
            Err(e) => {
                // A per-file failure aborts that file only; the batch goes on.
                eprintln!("  {} {}: {e:#}", "✗".red(), file.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} file(s) failed");
    }
    Ok(())
}

fn generate_for_file(
    input: &Path,
    args: &GenerateArgs,
    cache: &mut ConfigCache,
    runner: &dyn GeneratorRunner,
) -> Result<usize> {
    let bindings = resolve_bindings(input, cache)?;
    if bindings.is_empty() {
        return Ok(0);
    }

    // The per-file resolver stack: command-line defines, built-in
    // input variables, per-binding config variables, project
    // properties, then the environment.
    let mut sources = vec![
        VarSource::from_defines("command line", &args.define),
        input_source(input),
    ];
    if let Some(project) = project_source(input)? {
        sources.push(project);
    }
    sources.push(VarSource::from_environment());

    let working_dir = input.parent().unwrap_or(Path::new("."));

    for binding in &bindings {
        let resolver = binding_resolver(&sources, binding);
        let command = expand_template(&binding.generator.command, &resolver);
        let expanded_args: Vec<String> = binding
            .generator
            .args
            .iter()
            .map(|arg| expand_template(arg, &resolver))
            .collect();

        if binding.generator.debug || args.verbose {
            println!("  > {} {}", command, expanded_args.join(" "));
        }
        if args.dry_run {
            if !binding.generator.debug && !args.verbose {
                println!("  > {} {}", command, expanded_args.join(" "));
            }
            continue;
        }

        let stdin_content = if binding.generator.std_input {
            Some(std::fs::read_to_string(input).with_context(|| {
                format!("Failed to read generator input: {}", input.display())
            })?)
        } else {
            None
        };

        let output = runner.run(working_dir, &command, &expanded_args, stdin_content.as_deref())?;

        if let Some(extension) = &binding.generator.std_output {
            let target = stdout_target(input, extension);
            std::fs::write(&target, &output.stdout)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        } else if args.verbose && !output.stdout.is_empty() {
            print!("{}", output.stdout);
        }

        if !output.success() {
            bail!(
                "generator '{}' exited with code {}: {}",
                command,
                output.exit_code,
                output.stderr.trim()
            );
        }
    }

    Ok(bindings.len())
}

/// Resolver for one binding: the shared stack plus the binding's
/// configuration directory, exposed as `$(ConfigDir)`.
fn binding_resolver(sources: &[VarSource], binding: &GeneratorBinding) -> VarResolver {
    let mut sources = sources.to_vec();
    sources.insert(
        2,
        VarSource::from_pairs(
            "config",
            [("ConfigDir", binding.config_dir.to_string_lossy().into_owned())],
        ),
    );
    VarResolver::new(sources)
}

/// Expand a command or argument template. Unresolved variables stay in
/// the text verbatim; each is reported once as a warning.
fn expand_template(template: &str, resolver: &VarResolver) -> String {
    let expansion = expand(&expand_env(template), resolver);
    for diagnostic in &expansion.diagnostics {
        tracing::warn!("{diagnostic} in '{template}'");
    }
    expansion.text
}

/// Target path for redirected stdout: the input file's stem plus the
/// configured extension, e.g. `Service.idl` + `.log` -> `Service.log`.
fn stdout_target(input: &Path, extension: &str) -> std::path::PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    input.with_file_name(format!("{stem}{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_target_replaces_extension() {
        assert_eq!(
            stdout_target(Path::new("/a/Service.idl"), ".log"),
            Path::new("/a/Service.log")
        );
        assert_eq!(
            stdout_target(Path::new("/a/Service.idl"), ".g.rs"),
            Path::new("/a/Service.g.rs")
        );
    }
}
