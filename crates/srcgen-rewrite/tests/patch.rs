//! Filesystem tests for the attribute rewriter.

use srcgen_rewrite::{AttributeRewriter, RequestedAttribute, RewriteError, read_source};
use srcgen_vars::VarResolver;
use tempfile::TempDir;

fn requested(name: &str, value: &str) -> Vec<RequestedAttribute> {
    vec![RequestedAttribute::new(name, value)]
}

#[test]
fn test_rewrite_file_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AssemblyInfo.cs");
    std::fs::write(&path, "[assembly: AssemblyVersion(\"1.0.0.0\")]\n").unwrap();

    let resolver = VarResolver::default();
    let rewriter = AttributeRewriter::new(&resolver);
    let result = rewriter
        .rewrite_file(&path, &requested("AssemblyVersion", "2.0.0.0"), false)
        .unwrap();

    assert!(result.changed);
    assert_eq!(result.applied, 1);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[assembly: AssemblyVersion(\"2.0.0.0\")]\n"
    );
}

#[test]
fn test_noop_rewrite_does_not_touch_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AssemblyInfo.cs");
    let content = "[assembly: AssemblyVersion(\"1.0.0.0\")]\n";
    std::fs::write(&path, content).unwrap();

    let before = std::fs::metadata(&path).unwrap().modified().unwrap();

    let resolver = VarResolver::default();
    let rewriter = AttributeRewriter::new(&resolver);
    let result = rewriter
        .rewrite_file(&path, &requested("AssemblyVersion", "1.0.0.0"), false)
        .unwrap();

    assert!(!result.changed);
    assert_eq!(result.applied, 1);
    assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_bom_is_preserved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AssemblyInfo.cs");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"[assembly: AssemblyTitle(\"old\")]\n");
    std::fs::write(&path, bytes).unwrap();

    let resolver = VarResolver::default();
    let rewriter = AttributeRewriter::new(&resolver);
    let result = rewriter
        .rewrite_file(&path, &requested("AssemblyTitle", "new"), false)
        .unwrap();
    assert!(result.changed);

    let written = std::fs::read(&path).unwrap();
    assert!(written.starts_with(&[0xEF, 0xBB, 0xBF]));
    assert!(written.ends_with(b"[assembly: AssemblyTitle(\"new\")]\n"));

    let source = read_source(&path).unwrap();
    assert!(source.bom);
    assert_eq!(source.text, "[assembly: AssemblyTitle(\"new\")]\n");
}

#[test]
fn test_dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AssemblyInfo.cs");
    let content = "[assembly: AssemblyTitle(\"old\")]\n";
    std::fs::write(&path, content).unwrap();

    let resolver = VarResolver::default();
    let rewriter = AttributeRewriter::new(&resolver);
    let result = rewriter
        .rewrite_file(&path, &requested("AssemblyTitle", "new"), true)
        .unwrap();

    assert!(result.changed);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_utf16_bom_is_encoding_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AssemblyInfo.cs");
    std::fs::write(&path, [0xFF, 0xFE, 0x41, 0x00]).unwrap();

    let err = read_source(&path).unwrap_err();
    assert!(matches!(err, RewriteError::Encoding { .. }));
}

#[test]
fn test_invalid_utf8_is_encoding_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AssemblyInfo.cs");
    std::fs::write(&path, [0x41, 0xC3, 0x28]).unwrap();

    let err = read_source(&path).unwrap_err();
    assert!(matches!(err, RewriteError::Encoding { .. }));
}
