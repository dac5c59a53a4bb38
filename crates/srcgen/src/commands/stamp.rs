//! The `stamp` subcommand: copyright-year and version stamping.

use anyhow::{Result, bail};
use chrono::Datelike;
use clap::Args;
use colored::Colorize;

use srcgen_core::{stamp_copyright, stamp_version};
use srcgen_rewrite::{read_source, write_if_changed};

use crate::glob_expand::expand_globs;

#[derive(Args)]
pub struct StampArgs {
    /// Input files (can be multiple files or glob patterns)
    #[arg(required = true)]
    pub files: Vec<String>,

    /// New version for version-bearing attribute call sites
    #[arg(long)]
    pub version: Option<String>,

    /// Update copyright years, only touching lines mentioning this owner
    #[arg(long)]
    pub copyright: Option<String>,

    /// End year for copyright ranges (defaults to the current year)
    #[arg(long)]
    pub year: Option<u32>,

    /// Check mode: show what would be changed without modifying files
    #[arg(long)]
    pub check: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn execute(args: StampArgs) -> Result<()> {
    let stamp_years = args.copyright.is_some() || args.year.is_some();
    if args.version.is_none() && !stamp_years {
        bail!("nothing to stamp: pass --version, --copyright or --year");
    }
    let year = args
        .year
        .unwrap_or_else(|| chrono::Local::now().year() as u32);

    let files = expand_globs(&args.files)?;
    let mut failures = 0;

    for file in &files {
        match stamp_file(file, &args, year, stamp_years) {
            Ok(true) => {
                let verb = if args.check { "would change" } else { "changed" };
                println!("  {} {} ({verb})", "✓".green(), file.display());
            }
            Ok(false) => {
                if args.verbose {
                    println!("  {} {} (up to date)", "✓".green(), file.display());
                }
            }
            Err(e) => {
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

fn stamp_file(
    file: &std::path::Path,
    args: &StampArgs,
    year: u32,
    stamp_years: bool,
) -> Result<bool> {
    let source = read_source(file)?;
    let mut text = source.text.clone();

    if stamp_years {
        text = stamp_copyright(&text, args.copyright.as_deref(), year).text;
    }
    if let Some(version) = &args.version {
        text = stamp_version(&text, version).text;
    }

    if args.check {
        return Ok(text != source.text);
    }
    Ok(write_if_changed(file, &source, &text)?)
}
