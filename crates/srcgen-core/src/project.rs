/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Project context for variable resolution.
//!
//! A target file may have a `_project.xml` properties file next to it
//! or one directory above. When present, its properties form the
//! middle layer of the resolver stack, between command-line defines
//! and the process environment. When absent, resolution degrades to
//! the two-layer stack; only a present-but-malformed project file is
//! an error.
//!
//! ```xml
//! <project>
//!   <property name="Version" value="1.2.3.4" />
//!   <property name="Company" value="Acme" />
//! </project>
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::Event;

use srcgen_vars::{VarResolver, VarSource};

use crate::error::{CoreError, Result};

/// The project properties file name.
pub const PROJECT_FILENAME: &str = "_project.xml";

/// Locate the project file for a target: its own directory first,
/// then one directory above.
pub fn find_project_file(target: &Path) -> Option<PathBuf> {
    let dir = target.parent()?;
    let candidate = dir.join(PROJECT_FILENAME);
    if candidate.is_file() {
        return Some(candidate);
    }
    let candidate = dir.parent()?.join(PROJECT_FILENAME);
    candidate.is_file().then_some(candidate)
}

/// Load the properties of a project file, in document order.
pub fn load_properties(path: &Path) -> Result<IndexMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&content);
    let mut properties = IndexMap::new();

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(CoreError::Project {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() != b"property" {
                    continue;
                }
                let mut name = None;
                let mut value = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| CoreError::Project {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    })?;
                    let text = attr.unescape_value().map_err(|err| CoreError::Project {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    })?;
                    match attr.key.local_name().as_ref() {
                        b"name" => name = Some(text.into_owned()),
                        b"value" => value = Some(text.into_owned()),
                        _ => {}
                    }
                }
                let Some(name) = name else {
                    return Err(CoreError::Project {
                        path: path.to_path_buf(),
                        message: "<property> missing 'name' attribute".to_string(),
                    });
                };
                properties.insert(name, value.unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
        }
    }

    Ok(properties)
}

/// Build the project-properties variable source for a target file,
/// when a project file is discoverable.
pub fn project_source(target: &Path) -> Result<Option<VarSource>> {
    let Some(path) = find_project_file(target) else {
        tracing::debug!(target = %target.display(), "no project file found");
        return Ok(None);
    };
    let properties = load_properties(&path)?;
    Ok(Some(VarSource::from_pairs("project", properties)))
}

/// Built-in variables describing an input file.
pub fn input_source(input: &Path) -> VarSource {
    let mut source = VarSource::new("input");
    source.set("InputPath", input.to_string_lossy());
    source.set(
        "InputDir",
        input.parent().map(|d| d.to_string_lossy()).unwrap_or_default(),
    );
    source.set(
        "InputName",
        input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default(),
    );
    source.set(
        "InputFileName",
        input.file_name().map(|s| s.to_string_lossy()).unwrap_or_default(),
    );
    source.set(
        "InputExt",
        input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    );
    source
}

/// Build the standard resolver stack for a target file:
/// command-line defines, then project properties (when a project file
/// is discoverable next to or above `target`), then the environment.
pub fn resolver_for(target: Option<&Path>, defines: &[String]) -> Result<VarResolver> {
    let mut sources = vec![VarSource::from_defines("command line", defines)];
    if let Some(target) = target {
        if let Some(project) = project_source(target)? {
            sources.push(project);
        }
    }
    sources.push(VarSource::from_environment());
    Ok(VarResolver::new(sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT: &str = r#"<project>
  <property name="Version" value="1.2.3.4" />
  <property name="Company" value="Acme" />
</project>"#;

    #[test]
    fn test_find_project_file_adjacent_and_above() {
        let root = TempDir::new().unwrap();
        let sub = root.path().join("src");
        std::fs::create_dir_all(&sub).unwrap();
        let target = sub.join("AssemblyInfo.cs");
        std::fs::write(&target, "").unwrap();

        assert!(find_project_file(&target).is_none());

        // One directory above.
        std::fs::write(root.path().join(PROJECT_FILENAME), PROJECT).unwrap();
        assert_eq!(
            find_project_file(&target).unwrap(),
            root.path().join(PROJECT_FILENAME)
        );

        // Adjacent wins over the parent.
        std::fs::write(sub.join(PROJECT_FILENAME), PROJECT).unwrap();
        assert_eq!(find_project_file(&target).unwrap(), sub.join(PROJECT_FILENAME));
    }

    #[test]
    fn test_load_properties_in_order() {
        let root = TempDir::new().unwrap();
        let path = root.path().join(PROJECT_FILENAME);
        std::fs::write(&path, PROJECT).unwrap();

        let properties = load_properties(&path).unwrap();
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Version", "Company"]);
        assert_eq!(properties["Version"], "1.2.3.4");
    }

    #[test]
    fn test_malformed_project_file_is_error() {
        let root = TempDir::new().unwrap();
        let path = root.path().join(PROJECT_FILENAME);
        std::fs::write(&path, "<project><property value=\"x\"/></project>").unwrap();
        assert!(matches!(
            load_properties(&path).unwrap_err(),
            CoreError::Project { .. }
        ));

        std::fs::write(&path, "<project><property name=\"x\"></project>").unwrap();
        assert!(load_properties(&path).is_err());
    }

    #[test]
    fn test_resolver_stack_priority() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join(PROJECT_FILENAME), PROJECT).unwrap();
        let target = root.path().join("AssemblyInfo.cs");
        std::fs::write(&target, "").unwrap();

        // SAFETY: test-local variable name, no concurrent reader cares.
        unsafe { std::env::set_var("SRCGEN_PROJECT_TEST", "from-env") };

        let resolver = resolver_for(
            Some(&target),
            &["Version=9.9.9.9".to_string()],
        )
        .unwrap();

        // Command line beats project; project supplies what the
        // command line does not; environment backs the rest.
        assert_eq!(resolver.resolve("Version").unwrap(), "9.9.9.9");
        assert_eq!(resolver.resolve("Company").unwrap(), "Acme");
        assert_eq!(resolver.resolve("SRCGEN_PROJECT_TEST").unwrap(), "from-env");
        assert!(resolver.resolve("Nothing").is_none());
    }

    #[test]
    fn test_missing_project_degrades_gracefully() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("deep/dir/AssemblyInfo.cs");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "").unwrap();

        let resolver = resolver_for(Some(&target), &[]).unwrap();
        assert!(resolver.resolve("Company").is_none());
    }

    #[test]
    fn test_input_source_variables() {
        let source = input_source(Path::new("/work/src/Service.idl"));
        assert_eq!(source.get("inputpath"), Some("/work/src/Service.idl"));
        assert_eq!(source.get("InputDir"), Some("/work/src"));
        assert_eq!(source.get("InputName"), Some("Service"));
        assert_eq!(source.get("InputFileName"), Some("Service.idl"));
        assert_eq!(source.get("InputExt"), Some(".idl"));
    }
}
