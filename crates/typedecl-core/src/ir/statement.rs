//! Declaration nodes.

use crate::doc::Doc;
use crate::ir::child::Child;
use serde::{Deserialize, Serialize};

/// A declaration at file or namespace level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StatementNode {
    Group(GroupNode),
    Enumeration(EnumerationNode),
    TypeDefinition(TypeDefinitionNode),
    ExportAssignment(ExportAssignmentNode),
}

/// A namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Vec<StatementNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationNode {
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Vec<EnumerationCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationCase {
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub value: CaseValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseValue {
    String(String),
    Number(f64),
}

/// A named type, possibly generic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinitionNode {
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<Vec<TypeParameterNode>>,
    pub definition: Child,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameterNode {
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Child>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Child>,
}

/// The file's default export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAssignmentNode {
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub expression: Child,
}

impl StatementNode {
    pub fn name(&self) -> &str {
        match self {
            StatementNode::Group(n) => &n.name,
            StatementNode::Enumeration(n) => &n.name,
            StatementNode::TypeDefinition(n) => &n.name,
            StatementNode::ExportAssignment(n) => &n.name,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            StatementNode::Group(n) => &n.file_name,
            StatementNode::Enumeration(n) => &n.file_name,
            StatementNode::TypeDefinition(n) => &n.file_name,
            StatementNode::ExportAssignment(n) => &n.file_name,
        }
    }

    pub fn doc(&self) -> Option<&Doc> {
        match self {
            StatementNode::Group(n) => n.doc.as_ref(),
            StatementNode::Enumeration(n) => n.doc.as_ref(),
            StatementNode::TypeDefinition(n) => n.doc.as_ref(),
            StatementNode::ExportAssignment(n) => n.doc.as_ref(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            StatementNode::Group(_) => "Group",
            StatementNode::Enumeration(_) => "Enumeration",
            StatementNode::TypeDefinition(_) => "TypeDefinition",
            StatementNode::ExportAssignment(_) => "ExportAssignment",
        }
    }

    /// Whether this statement or any statement nested in it is named `name`.
    pub fn declares(&self, name: &str) -> bool {
        match self {
            StatementNode::Group(group) => {
                group.name == name || group.children.iter().any(|c| c.declares(name))
            }
            StatementNode::ExportAssignment(_) => false,
            _ => self.name() == name,
        }
    }
}

impl TypeDefinitionNode {
    pub fn new(file_name: impl Into<String>, name: impl Into<String>, definition: Child) -> Self {
        Self {
            file_name: file_name.into(),
            name: name.into(),
            doc: None,
            type_parameters: None,
            definition,
        }
    }

    pub fn with_type_parameters(mut self, parameters: Vec<TypeParameterNode>) -> Self {
        self.type_parameters = Some(parameters);
        self
    }

    pub fn parameters(&self) -> &[TypeParameterNode] {
        self.type_parameters.as_deref().unwrap_or_default()
    }

    /// Parameters that must be supplied explicitly at every instantiation.
    pub fn required_parameters(&self) -> impl Iterator<Item = &TypeParameterNode> {
        self.parameters().iter().filter(|p| p.default.is_none())
    }
}

impl TypeParameterNode {
    pub fn new(file_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            name: name.into(),
            constraint: None,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Child) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_constraint(mut self, constraint: Child) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

impl ExportAssignmentNode {
    pub const NAME: &'static str = "default";

    pub fn new(file_name: impl Into<String>, expression: Child) -> Self {
        Self {
            file_name: file_name.into(),
            name: Self::NAME.to_string(),
            doc: None,
            expression,
        }
    }
}

impl From<TypeDefinitionNode> for StatementNode {
    fn from(node: TypeDefinitionNode) -> Self {
        StatementNode::TypeDefinition(node)
    }
}

impl From<GroupNode> for StatementNode {
    fn from(node: GroupNode) -> Self {
        StatementNode::Group(node)
    }
}

impl From<EnumerationNode> for StatementNode {
    fn from(node: EnumerationNode) -> Self {
        StatementNode::Enumeration(node)
    }
}

impl From<ExportAssignmentNode> for StatementNode {
    fn from(node: ExportAssignmentNode) -> Self {
        StatementNode::ExportAssignment(node)
    }
}
