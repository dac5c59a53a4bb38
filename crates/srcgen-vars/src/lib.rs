//! Layered variable resolution and macro expansion for srcgen.
//!
//! This crate implements the two building blocks shared by the attribute
//! patcher and the generator dispatch pipeline:
//!
//! - [`VarResolver`]: an ordered stack of named [`VarSource`]s consulted
//!   case-insensitively, first source wins (command line overrides the
//!   project file, which overrides the environment).
//! - [`expand`]: textual substitution of `$(name)` and
//!   `$(name:from=to:...)` macros against a resolver. Replacement pairs
//!   apply sequentially to the running value, unknown variables are
//!   reported as [`Diagnostic`]s and left verbatim in the output, and
//!   malformed macro syntax passes through untouched.
//!
//! # Example
//!
//! ```rust
//! use srcgen_vars::{VarResolver, VarSource, expand};
//!
//! let mut source = VarSource::new("args");
//! source.set("Configuration", "Release");
//!
//! let resolver = VarResolver::new(vec![source]);
//! let result = expand("bin/$(Configuration:Release=Rel)", &resolver);
//! assert_eq!(result.text, "bin/Rel");
//! assert!(result.diagnostics.is_empty());
//! ```

mod expander;
mod resolver;

pub use expander::{Diagnostic, Expansion, expand, expand_env};
pub use resolver::{HELP_VARIABLE, VarResolver, VarSource};
