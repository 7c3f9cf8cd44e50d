//! Helpers for renderers turning resolved references into links.

use crate::ir::{ImportNode, ReferenceNode, RootNode};

/// Path from `file` to the file declaring `reference`, with the source
/// extension replaced by `extension`. `None` for local or unresolved references.
///
/// The result always starts with `.` (`./b.schema.json`, `../x/y.md`).
pub fn relative_external_path(
    reference: &ReferenceNode,
    file: &RootNode,
    extension: &str,
) -> Option<String> {
    let target = reference.resolved_file_name.as_deref()?;
    if target == file.file_name {
        return None;
    }

    let relative = relative_path(parent(&file.file_name), target);
    let path = format!("{}{}", strip_extension(&relative), extension);
    if path.starts_with('.') {
        Some(path)
    } else {
        Some(format!("./{path}"))
    }
}

/// The referenced name as a slash separated path, without the leading
/// namespace import segment if there is one.
pub fn qualified_name_as_path(reference: &ReferenceNode, file: &RootNode) -> String {
    let through_namespace = file.imports.iter().any(|import| {
        matches!(import, ImportNode::NamespaceImport(ns) if ns.name == reference.name.segment)
    });
    let segments: Vec<&str> = reference.name.segments().collect();
    let start = usize::from(through_namespace && segments.len() > 1);
    segments[start..].join("/")
}

/// The original name of a named import that `reference` uses under an alias.
pub fn aliased_import_name<'r>(reference: &ReferenceNode, file: &'r RootNode) -> Option<&'r str> {
    if reference.name.is_qualified() {
        return None;
    }
    file.imports.iter().find_map(|import| match import {
        ImportNode::NamedImport(named)
            if named.alias.as_deref() == Some(reference.name.segment.as_str()) =>
        {
            Some(named.name.as_str())
        }
        _ => None,
    })
}

fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".").collect()
}

fn relative_path(from_dir: &str, to: &str) -> String {
    let from = components(from_dir);
    let to = components(to);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    parts.join("/")
}

fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{NamedImport, NamespaceImport};
    use rstest::rstest;

    fn reference(name: &str, resolved: Option<&str>) -> ReferenceNode {
        let node = ReferenceNode::new("src/types/b.ts", name.into());
        match resolved {
            Some(file) => node.with_resolved_file_name(file),
            None => node,
        }
    }

    #[rstest]
    #[case("src/types/a.ts", Some("./a.schema.json"))]
    #[case("src/common/x.d.ts", Some("../common/x.d.schema.json"))]
    #[case("src/types/nested/y.ts", Some("./nested/y.schema.json"))]
    #[case("src/types/b.ts", None)]
    fn test_relative_external_path(#[case] target: &str, #[case] expected: Option<&str>) {
        let file = RootNode::new("src/types/b.ts");
        let node = reference("X", Some(target));
        assert_eq!(
            relative_external_path(&node, &file, ".schema.json").as_deref(),
            expected
        );
    }

    #[test]
    fn test_unresolved_reference_has_no_external_path() {
        let file = RootNode::new("src/types/b.ts");
        assert_eq!(relative_external_path(&reference("X", None), &file, ".md"), None);
    }

    #[test]
    fn test_qualified_name_as_path_drops_namespace_import() {
        let mut file = RootNode::new("src/types/b.ts");
        file.imports = vec![ImportNode::NamespaceImport(NamespaceImport {
            name: "NS".into(),
            file_name: "src/types/ns.ts".into(),
        })];
        assert_eq!(qualified_name_as_path(&reference("NS.Inner.Foo", None), &file), "Inner/Foo");
        assert_eq!(qualified_name_as_path(&reference("Local.Foo", None), &file), "Local/Foo");
    }

    #[test]
    fn test_aliased_import_name() {
        let mut file = RootNode::new("src/types/b.ts");
        file.imports = vec![ImportNode::NamedImport(NamedImport {
            name: "A".into(),
            alias: Some("TypeA".into()),
            file_name: "src/types/a.ts".into(),
        })];
        assert_eq!(aliased_import_name(&reference("TypeA", None), &file), Some("A"));
        assert_eq!(aliased_import_name(&reference("A", None), &file), None);
        assert_eq!(aliased_import_name(&reference("TypeA.X", None), &file), None);
    }
}
