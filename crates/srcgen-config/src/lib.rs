//! Per-directory generator configuration for srcgen.
//!
//! Each directory may contain at most one `_srcgen.xml` file declaring
//! match rules: a file-spec glob, optional scope folders, a stop flag,
//! and an ordered list of generator definitions. Resolving an input
//! file walks from its directory up toward the filesystem root,
//! accumulating the generators of every matching rule along the way:
//!
//! - rules are evaluated in file order, closest directory first;
//! - a rule with `stop="true"` halts the ascent once its directory's
//!   remaining rules have been evaluated;
//! - a generator whose output extension is already claimed by an
//!   earlier generator is silently skipped (first claimed wins).
//!
//! Parsed documents are held in a caller-owned [`ConfigCache`] keyed by
//! path and last-modified time, so repeated resolutions in one batch
//! reparse nothing that has not changed on disk.
//!
//! ```xml
//! <srcgen>
//!   <match filespec="*.idl" stop="true">
//!     <folder path="%PROJECTS%/svc" />
//!     <generator debug="false">
//!       <execute command="tools/gen-idl" />
//!       <arg value="$(InputPath)" />
//!       <std-input redirect="true" />
//!       <std-output extension=".log" />
//!       <output extension=".g.rs" />
//!     </generator>
//!   </match>
//! </srcgen>
//! ```

mod cache;
mod error;
mod parser;
mod resolve;
mod types;

pub use cache::ConfigCache;
pub use error::{ConfigError, Result};
pub use parser::parse_config;
pub use resolve::resolve_bindings;
pub use types::{CONFIG_FILENAME, ConfigFile, GeneratorBinding, GeneratorDef, MatchRule};
