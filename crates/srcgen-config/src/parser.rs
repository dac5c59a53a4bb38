//! XML parser for `_srcgen.xml` documents.
//!
//! Built on quick-xml's pull parser. Any structural problem (unknown
//! element, missing attribute, bad boolean, XML syntax error) is a
//! [`ConfigError::Parse`] carrying the document path and the
//! line/column derived from the reader's byte position.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ConfigError, Result};
use crate::types::{ConfigFile, GeneratorDef, MatchRule};

/// Parse a configuration document.
///
/// `path` is used for error reporting only; the caller reads the file.
pub fn parse_config(content: &str, path: &Path) -> Result<ConfigFile> {
    Parser {
        content,
        path,
        reader: Reader::from_str(content),
    }
    .parse()
}

struct Parser<'a> {
    content: &'a str,
    path: &'a Path,
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn parse(&mut self) -> Result<ConfigFile> {
        let mut rules = Vec::new();
        let mut saw_root = false;

        loop {
            match self.reader.read_event() {
                Err(e) => return Err(self.error(e.to_string())),
                Ok(Event::Start(e)) => {
                    let name = element_name(&e);
                    if !saw_root {
                        if name != "srcgen" {
                            return Err(self.error(format!("unexpected root element <{name}>")));
                        }
                        saw_root = true;
                    } else if name == "match" {
                        rules.push(self.parse_match(&e)?);
                    } else {
                        return Err(self.error(format!("unexpected element <{name}>")));
                    }
                }
                Ok(Event::Empty(e)) => {
                    let name = element_name(&e);
                    if !saw_root {
                        if name != "srcgen" {
                            return Err(self.error(format!("unexpected root element <{name}>")));
                        }
                        saw_root = true;
                    } else if name == "match" {
                        // A childless rule: matches files but binds nothing.
                        rules.push(self.rule_from_attrs(&e)?);
                    } else {
                        return Err(self.error(format!("unexpected element <{name}>")));
                    }
                }
                Ok(Event::End(_)) => {}
                Ok(Event::Eof) => break,
                Ok(_) => {}
            }
        }

        if !saw_root {
            return Err(self.error("missing <srcgen> root element"));
        }

        Ok(ConfigFile {
            path: self.path.to_path_buf(),
            rules,
        })
    }

    fn rule_from_attrs(&self, e: &BytesStart<'a>) -> Result<MatchRule> {
        Ok(MatchRule {
            filespec: self.require_attr(e, "filespec")?,
            folders: Vec::new(),
            stop: self.bool_attr(e, "stop", false)?,
            generators: Vec::new(),
        })
    }

    fn parse_match(&mut self, start: &BytesStart<'a>) -> Result<MatchRule> {
        let mut rule = self.rule_from_attrs(start)?;

        loop {
            match self.reader.read_event() {
                Err(e) => return Err(self.error(e.to_string())),
                Ok(Event::Empty(e)) => match element_name(&e).as_str() {
                    "folder" => rule.folders.push(self.require_attr(&e, "path")?),
                    "generator" => {
                        return Err(self.error("generator missing <execute> element"));
                    }
                    name => {
                        return Err(self.error(format!("unexpected element <{name}> in <match>")));
                    }
                },
                Ok(Event::Start(e)) => match element_name(&e).as_str() {
                    "generator" => rule.generators.push(self.parse_generator(&e)?),
                    name => {
                        return Err(self.error(format!("unexpected element <{name}> in <match>")));
                    }
                },
                Ok(Event::End(e)) if element_name_end(e.name().as_ref()) == "match" => break,
                Ok(Event::End(_)) => {}
                Ok(Event::Eof) => return Err(self.error("unexpected end of document in <match>")),
                Ok(_) => {}
            }
        }

        Ok(rule)
    }

    fn parse_generator(&mut self, start: &BytesStart<'a>) -> Result<GeneratorDef> {
        let debug = self.bool_attr(start, "debug", false)?;
        let mut command: Option<String> = None;
        let mut args = Vec::new();
        let mut std_input = false;
        let mut std_output = None;
        let mut outputs = Vec::new();

        loop {
            match self.reader.read_event() {
                Err(e) => return Err(self.error(e.to_string())),
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match element_name(&e).as_str() {
                    "execute" => {
                        if command.is_some() {
                            return Err(self.error("duplicate <execute> in <generator>"));
                        }
                        command = Some(self.require_attr(&e, "command")?);
                    }
                    "arg" => args.push(self.require_attr(&e, "value")?),
                    "std-input" => std_input = self.bool_attr(&e, "redirect", true)?,
                    "std-output" => std_output = Some(self.require_attr(&e, "extension")?),
                    "output" => outputs.push(self.require_attr(&e, "extension")?),
                    name => {
                        return Err(
                            self.error(format!("unexpected element <{name}> in <generator>"))
                        );
                    }
                },
                Ok(Event::End(e)) if element_name_end(e.name().as_ref()) == "generator" => break,
                Ok(Event::End(_)) => {}
                Ok(Event::Eof) => {
                    return Err(self.error("unexpected end of document in <generator>"));
                }
                Ok(_) => {}
            }
        }

        let Some(command) = command else {
            return Err(self.error("generator missing <execute> element"));
        };

        Ok(GeneratorDef {
            command,
            args,
            debug,
            std_input,
            std_output,
            outputs,
        })
    }

    fn require_attr(&self, e: &BytesStart<'a>, name: &str) -> Result<String> {
        self.optional_attr(e, name)?.ok_or_else(|| {
            self.error(format!(
                "<{}> missing required attribute '{name}'",
                element_name(e)
            ))
        })
    }

    fn optional_attr(&self, e: &BytesStart<'a>, name: &str) -> Result<Option<String>> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error(err.to_string()))?;
            if attr.key.local_name().as_ref() == name.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|err| self.error(err.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn bool_attr(&self, e: &BytesStart<'a>, name: &str, default: bool) -> Result<bool> {
        match self.optional_attr(e, name)? {
            None => Ok(default),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
            Some(value) => Err(self.error(format!(
                "attribute '{name}' must be 'true' or 'false', got '{value}'"
            ))),
        }
    }

    fn error(&self, message: impl Into<String>) -> ConfigError {
        let offset = (self.reader.buffer_position() as usize).min(self.content.len());
        let (line, column) = offset_to_line_col(self.content, offset);
        ConfigError::Parse {
            path: self.path.to_path_buf(),
            message: message.into(),
            line,
            column,
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn element_name_end(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Convert a byte offset to a 1-based line and column.
fn offset_to_line_col(content: &str, offset: usize) -> (usize, usize) {
    let line = content[..offset].matches('\n').count() + 1;
    let line_start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<ConfigFile> {
        parse_config(content, &PathBuf::from("_srcgen.xml"))
    }

    const FULL: &str = r#"<srcgen>
  <match filespec="*.idl" stop="true">
    <folder path="/projects/svc" />
    <generator debug="true">
      <execute command="tools/gen-idl" />
      <arg value="$(InputPath)" />
      <arg value="-v" />
      <std-input redirect="true" />
      <std-output extension=".log" />
      <output extension=".g.rs" />
    </generator>
  </match>
  <match filespec="*.xml" />
</srcgen>"#;

    #[test]
    fn test_parse_full_document() {
        let config = parse(FULL).unwrap();
        assert_eq!(config.rules.len(), 2);

        let rule = &config.rules[0];
        assert_eq!(rule.filespec, "*.idl");
        assert!(rule.stop);
        assert_eq!(rule.folders, vec!["/projects/svc"]);
        assert_eq!(rule.generators.len(), 1);

        let generator = &rule.generators[0];
        assert_eq!(generator.command, "tools/gen-idl");
        assert_eq!(generator.args, vec!["$(InputPath)", "-v"]);
        assert!(generator.debug);
        assert!(generator.std_input);
        assert_eq!(generator.std_output.as_deref(), Some(".log"));
        assert_eq!(generator.outputs, vec![".g.rs"]);

        let empty = &config.rules[1];
        assert!(!empty.stop);
        assert!(empty.generators.is_empty());
    }

    #[test]
    fn test_missing_filespec_is_error() {
        let err = parse("<srcgen><match stop=\"true\"/></srcgen>").unwrap_err();
        assert!(err.to_string().contains("filespec"));
    }

    #[test]
    fn test_bad_boolean_is_error() {
        let err = parse("<srcgen><match filespec=\"*\" stop=\"yes\"/></srcgen>").unwrap_err();
        assert!(err.to_string().contains("'true' or 'false'"));
    }

    #[test]
    fn test_generator_requires_execute() {
        let err =
            parse("<srcgen><match filespec=\"*\"><generator/></match></srcgen>").unwrap_err();
        assert!(err.to_string().contains("<execute>"));
    }

    #[test]
    fn test_unexpected_element_is_error() {
        let err = parse("<srcgen><rule filespec=\"*\"/></srcgen>").unwrap_err();
        assert!(err.to_string().contains("unexpected element"));
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = parse("<srcgen>\n  <match filespec=\"*\">\n</srcgen>").unwrap_err();
        match err {
            ConfigError::Parse { line, .. } => assert!(line >= 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_root_is_error() {
        let err = parse("<config/>").unwrap_err();
        assert!(err.to_string().contains("root"));
    }
}
