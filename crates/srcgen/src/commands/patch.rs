//! The `patch` subcommand: attribute rewriting over a batch of files.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use srcgen_core::resolver_for;
use srcgen_rewrite::{AttributeRewriter, RequestedAttribute};

use crate::glob_expand::expand_globs;

#[derive(Args)]
pub struct PatchArgs {
    /// Input files (can be multiple files or glob patterns like "src/**/AssemblyInfo.cs")
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Attribute to set, as Name=Value (repeatable)
    #[arg(short = 'a', long = "attribute", required = true)]
    pub attribute: Vec<String>,

    /// Variable define, as name=value (repeatable)
    #[arg(short = 'D', long = "define")]
    pub define: Vec<String>,

    /// Append statements for requested attributes with no existing call site
    #[arg(long)]
    pub add_missing: bool,

    /// Check mode: show what would be changed without modifying files
    #[arg(long)]
    pub check: bool,

    /// Output results as JSONL
    #[arg(long)]
    pub json: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Per-file result record, also used for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub file_path: String,
    pub applied: usize,
    pub appended: Vec<String>,
    pub changed: bool,
    pub diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn execute(args: PatchArgs) -> Result<()> {
    let requested = parse_attributes(&args.attribute)?;
    let files = expand_globs(&args.files)?;

    let mut reports = Vec::new();
    for file in &files {
        if args.verbose && !args.json {
            println!("Processing: {}", file.display());
        }

        let report = match patch_file(file, &requested, &args) {
            Ok(report) => report,
            // A per-file failure aborts that file only; the batch goes on.
            Err(e) => PatchReport {
                file_path: file.to_string_lossy().into_owned(),
                applied: 0,
                appended: Vec::new(),
                changed: false,
                diagnostics: Vec::new(),
                error: Some(format!("{e:#}")),
            },
        };

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report, args.check);
        }
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if !args.json {
        let changed = reports.iter().filter(|r| r.changed).count();
        println!(
            "\n{} file(s), {} changed, {} failed",
            reports.len(),
            changed,
            failed
        );
    }

    if failed > 0 {
        bail!("{failed} file(s) failed");
    }
    Ok(())
}

fn patch_file(
    file: &std::path::Path,
    requested: &[RequestedAttribute],
    args: &PatchArgs,
) -> Result<PatchReport> {
    let resolver = resolver_for(Some(file), &args.define)?;
    let rewriter = AttributeRewriter::new(&resolver).with_add_missing(args.add_missing);
    let result = rewriter.rewrite_file(file, requested, args.check)?;

    Ok(PatchReport {
        file_path: file.to_string_lossy().into_owned(),
        applied: result.applied,
        appended: result.appended,
        changed: result.changed,
        diagnostics: result.diagnostics.iter().map(|d| d.to_string()).collect(),
        error: None,
    })
}

fn print_report(report: &PatchReport, check: bool) {
    if let Some(error) = &report.error {
        eprintln!("  {} {}: {}", "✗".red(), report.file_path, error);
        return;
    }
    for diagnostic in &report.diagnostics {
        eprintln!("  {} {}: {}", "!".yellow(), report.file_path, diagnostic);
    }
    if report.changed {
        let verb = if check { "would change" } else { "changed" };
        println!(
            "  {} {} ({verb}, {} applied, {} appended)",
            "✓".green(),
            report.file_path,
            report.applied,
            report.appended.len()
        );
    } else {
        println!("  {} {} (up to date)", "✓".green(), report.file_path);
    }
}

fn parse_attributes(specs: &[String]) -> Result<Vec<RequestedAttribute>> {
    specs
        .iter()
        .map(|spec| {
            RequestedAttribute::parse(spec)
                .ok_or_else(|| anyhow::anyhow!("invalid attribute '{spec}', expected Name=Value"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(&["A=1".to_string(), "B=x=y".to_string()]).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].value, "x=y");

        assert!(parse_attributes(&["no-equals".to_string()]).is_err());
    }
}
