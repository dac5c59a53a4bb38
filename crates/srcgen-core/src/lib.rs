/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Process execution, project context and stamping utilities.
//!
//! This crate hosts the collaborators around the srcgen core logic:
//!
//! - [`GeneratorRunner`]: the capability interface generator bindings
//!   are handed to, with a [`ProcessRunner`] that shells out and a
//!   [`RecordingRunner`] for tests and dry runs.
//! - Project context: discovery of a `_project.xml` properties file
//!   next to (or one directory above) a target file, feeding the
//!   middle layer of the variable resolver stack.
//! - Stamping: regex-based copyright-year and version-number rewrites.

mod error;
mod project;
mod runner;
mod stamp;

pub use error::{CoreError, Result};
pub use project::{
    PROJECT_FILENAME, find_project_file, input_source, load_properties, project_source,
    resolver_for,
};
pub use runner::{GeneratorRunner, ProcessRunner, RecordedCall, RecordingRunner, RunOutput};
pub use stamp::{StampResult, stamp_copyright, stamp_version};
