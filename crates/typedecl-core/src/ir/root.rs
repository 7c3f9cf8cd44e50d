use crate::doc::Doc;
use crate::ir::statement::StatementNode;
use serde::{Deserialize, Serialize};

/// The IR of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    #[serde(default)]
    pub imports: Vec<ImportNode>,
    pub children: Vec<StatementNode>,
}

/// A name brought in from another file. `file_name` is the declaring file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ImportNode {
    DefaultImport(DefaultImport),
    NamedImport(NamedImport),
    NamespaceImport(NamespaceImport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultImport {
    pub name: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedImport {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceImport {
    pub name: String,
    pub file_name: String,
}

impl RootNode {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            doc: None,
            imports: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Top-level statement with the given name.
    pub fn statement(&self, name: &str) -> Option<&StatementNode> {
        self.children.iter().find(|s| s.name() == name)
    }

    /// The file's default export, if any.
    pub fn export_assignment(&self) -> Option<&StatementNode> {
        self.children
            .iter()
            .find(|s| matches!(s, StatementNode::ExportAssignment(_)))
    }

    /// Whether a declaration named `name` exists anywhere in the statement tree.
    pub fn declares(&self, name: &str) -> bool {
        self.children.iter().any(|s| s.declares(name))
    }

    /// The name carried by the file's `main` tag.
    pub fn main_tag(&self) -> Option<&str> {
        self.doc.as_ref()?.tags.main.as_deref()
    }
}

impl ImportNode {
    /// The name the import binds in the importing file.
    pub fn bound_name(&self) -> &str {
        match self {
            ImportNode::DefaultImport(i) => &i.name,
            ImportNode::NamedImport(i) => i.alias.as_deref().unwrap_or(&i.name),
            ImportNode::NamespaceImport(i) => &i.name,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            ImportNode::DefaultImport(i) => &i.file_name,
            ImportNode::NamedImport(i) => &i.file_name,
            ImportNode::NamespaceImport(i) => &i.file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_name_prefers_alias() {
        let import = ImportNode::NamedImport(NamedImport {
            name: "A".into(),
            alias: Some("TypeA".into()),
            file_name: "a.ts".into(),
        });
        assert_eq!(import.bound_name(), "TypeA");
        assert_eq!(import.file_name(), "a.ts");
    }

    #[test]
    fn test_import_json_shape() {
        let import = ImportNode::DefaultImport(DefaultImport {
            name: "D".into(),
            file_name: "a.ts".into(),
        });
        assert_eq!(
            serde_json::to_value(&import).unwrap(),
            serde_json::json!({"kind": "DefaultImport", "name": "D", "fileName": "a.ts"})
        );
    }
}
