//! Configuration data model.

use std::path::PathBuf;

/// The per-directory configuration file name.
pub const CONFIG_FILENAME: &str = "_srcgen.xml";

/// A parsed configuration document.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Path of the document on disk.
    pub path: PathBuf,

    /// Match rules in document order.
    pub rules: Vec<MatchRule>,
}

/// One `<match>` rule.
#[derive(Debug, Clone)]
pub struct MatchRule {
    /// Glob matched against the input file's name, case-insensitively.
    pub filespec: String,

    /// Scope folders. When non-empty, the input file's directory must
    /// fall under at least one of these for the rule to match. Paths
    /// may contain `%NAME%` environment tokens; relative paths are
    /// anchored at the configuration file's directory.
    pub folders: Vec<String>,

    /// Halt the upward directory search after this rule's directory.
    pub stop: bool,

    /// Generator definitions in declaration order.
    pub generators: Vec<GeneratorDef>,
}

/// One `<generator>` definition.
///
/// Command and argument values are templates: they are macro-expanded
/// against the per-file resolver stack before execution.
#[derive(Debug, Clone)]
pub struct GeneratorDef {
    /// Command template from `<execute command="..."/>`.
    pub command: String,

    /// Argument templates from `<arg value="..."/>`, in order.
    pub args: Vec<String>,

    /// Log the expanded command line before running.
    pub debug: bool,

    /// Pipe the input file's content to the child's stdin.
    pub std_input: bool,

    /// When set, capture the child's stdout into a sibling file with
    /// this extension. Counts as an output extension for collision
    /// purposes.
    pub std_output: Option<String>,

    /// Declared output extensions from `<output extension="..."/>`.
    pub outputs: Vec<String>,
}

impl GeneratorDef {
    /// All output extensions claimed by this generator, including the
    /// stdout redirection target.
    pub fn output_extensions(&self) -> impl Iterator<Item = &str> {
        self.outputs
            .iter()
            .map(String::as_str)
            .chain(self.std_output.as_deref())
    }
}

/// A generator bound to one input file by configuration resolution.
#[derive(Debug, Clone)]
pub struct GeneratorBinding {
    /// Directory of the configuration file that declared the generator.
    /// Relative command paths and scope folders are anchored here.
    pub config_dir: PathBuf,

    /// The generator definition.
    pub generator: GeneratorDef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_extensions_include_std_output() {
        let generator = GeneratorDef {
            command: "gen".to_string(),
            args: Vec::new(),
            debug: false,
            std_input: false,
            std_output: Some(".log".to_string()),
            outputs: vec![".g.rs".to_string()],
        };
        let extensions: Vec<&str> = generator.output_extensions().collect();
        assert_eq!(extensions, vec![".g.rs", ".log"]);
    }
}
