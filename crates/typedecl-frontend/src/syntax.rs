//! Syntax trees handed over by a front end.
//!
//! The shapes follow the declaration dialect closely: what a parser sees, with
//! doc comments still raw and names not yet bound. A front end may build them
//! in memory or deserialize them from JSON.

use serde::{Deserialize, Serialize};

// ============================================================================
// Files and statements
// ============================================================================

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: String,
    /// Raw module level doc block.
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Import(ImportDeclaration),
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Enum(EnumDeclaration),
    Module(ModuleDeclaration),
    /// `export default Name`
    ExportDefault(ExportDefault),
    /// A statement without a declaration form in the IR, e.g. a function.
    Other { description: String },
}

/// `import D, { A as B } from "./a"` or `import * as NS from "./a"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDeclaration {
    pub specifier: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub named: Vec<ImportSpecifier>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration {
    #[serde(default)]
    pub doc: Option<String>,
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(default)]
    pub members: Vec<TypeMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasDeclaration {
    #[serde(default)]
    pub doc: Option<String>,
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    #[serde(default)]
    pub doc: Option<String>,
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    #[serde(default)]
    pub doc: Option<String>,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Initializer>,
}

/// Right hand side of an enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Initializer {
    String(String),
    Number(f64),
    /// Any expression that is not a plain literal, as written.
    Computed(String),
}

/// `namespace Name { ... }`. A declaration without braces has no body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    #[serde(default)]
    pub doc: Option<String>,
    pub name: String,
    #[serde(default)]
    pub body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDefault {
    #[serde(default)]
    pub doc: Option<String>,
    pub expression: EntityName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<TypeNode>,
    #[serde(default)]
    pub default: Option<TypeNode>,
}

// ============================================================================
// Types
// ============================================================================

/// A dotted identifier such as `NS.Inner.Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EntityName {
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeNode {
    Keyword { keyword: Keyword },
    Literal { literal: LiteralType },
    /// `{ ... }`
    TypeLiteral { members: Vec<TypeMember> },
    Reference {
        name: EntityName,
        #[serde(default, rename = "typeArguments")]
        type_arguments: Option<Vec<TypeNode>>,
    },
    /// `T[]`
    Array { element: Box<TypeNode> },
    Tuple { elements: Vec<TypeNode> },
    Union { types: Vec<TypeNode> },
    Intersection { types: Vec<TypeNode> },
    Parenthesized { inner: Box<TypeNode> },
    /// Type syntax without an IR form, e.g. a function type.
    Other { description: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Keyword {
    String,
    Number,
    Boolean,
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Void,
    Object,
    Bigint,
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum LiteralType {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Any other literal form (bigint, template, ...), as written.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeMember {
    Property(PropertySignature),
    Index(IndexSignature),
    /// A member form without an IR counterpart, e.g. a method signature.
    Other { description: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySignature {
    #[serde(default)]
    pub doc: Option<String>,
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeNode>,
}

/// `[key: string]: Value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignature {
    #[serde(default)]
    pub doc: Option<String>,
    pub key_name: String,
    pub key_type: TypeNode,
    pub value: TypeNode,
}

// ============================================================================
// Builders
// ============================================================================

impl EntityName {
    pub fn head(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for EntityName {
    fn from(s: &str) -> Self {
        Self {
            segments: s.split('.').map(str::to_string).collect(),
        }
    }
}

impl From<String> for EntityName {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> String {
        name.to_string()
    }
}

impl SourceFile {
    pub fn new(path: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            path: path.into(),
            doc: None,
            statements,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

impl TypeNode {
    pub fn keyword(keyword: Keyword) -> Self {
        TypeNode::Keyword { keyword }
    }

    pub fn string() -> Self {
        Self::keyword(Keyword::String)
    }

    pub fn number() -> Self {
        Self::keyword(Keyword::Number)
    }

    pub fn boolean() -> Self {
        Self::keyword(Keyword::Boolean)
    }

    pub fn reference(name: &str) -> Self {
        TypeNode::Reference {
            name: name.into(),
            type_arguments: None,
        }
    }

    pub fn generic(name: &str, arguments: Vec<TypeNode>) -> Self {
        TypeNode::Reference {
            name: name.into(),
            type_arguments: Some(arguments),
        }
    }

    pub fn object(members: Vec<TypeMember>) -> Self {
        TypeNode::TypeLiteral { members }
    }

    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array {
            element: Box::new(element),
        }
    }

    pub fn union(types: Vec<TypeNode>) -> Self {
        TypeNode::Union { types }
    }

    pub fn intersection(types: Vec<TypeNode>) -> Self {
        TypeNode::Intersection { types }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TypeNode::Keyword { keyword } => format!("{keyword:?} keyword").to_lowercase(),
            TypeNode::Literal { literal } => match literal {
                LiteralType::Other(text) => format!("literal `{text}`"),
                _ => "literal type".to_string(),
            },
            TypeNode::TypeLiteral { .. } => "type literal".to_string(),
            TypeNode::Reference { name, .. } => format!("reference to `{name}`"),
            TypeNode::Array { .. } => "array type".to_string(),
            TypeNode::Tuple { .. } => "tuple type".to_string(),
            TypeNode::Union { .. } => "union type".to_string(),
            TypeNode::Intersection { .. } => "intersection type".to_string(),
            TypeNode::Parenthesized { inner } => inner.describe(),
            TypeNode::Other { description } => description.clone(),
        }
    }
}

impl TypeMember {
    pub fn property(name: &str, ty: TypeNode) -> Self {
        TypeMember::Property(PropertySignature {
            doc: None,
            name: name.to_string(),
            optional: false,
            readonly: false,
            ty: Some(ty),
        })
    }

    pub fn optional(name: &str, ty: TypeNode) -> Self {
        TypeMember::Property(PropertySignature {
            doc: None,
            name: name.to_string(),
            optional: true,
            readonly: false,
            ty: Some(ty),
        })
    }

    pub fn index(value: TypeNode) -> Self {
        TypeMember::Index(IndexSignature {
            doc: None,
            key_name: "key".to_string(),
            key_type: TypeNode::string(),
            value,
        })
    }
}

impl TypeParameterDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constraint: None,
            default: None,
        }
    }

    pub fn with_default(mut self, default: TypeNode) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_constraint(mut self, constraint: TypeNode) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

impl Statement {
    pub fn interface(name: &str, members: Vec<TypeMember>) -> Self {
        Statement::Interface(InterfaceDeclaration {
            doc: None,
            name: name.to_string(),
            type_parameters: Vec::new(),
            members,
        })
    }

    pub fn alias(name: &str, ty: TypeNode) -> Self {
        Self::generic_alias(name, Vec::new(), ty)
    }

    pub fn generic_alias(name: &str, type_parameters: Vec<TypeParameterDecl>, ty: TypeNode) -> Self {
        Statement::TypeAlias(TypeAliasDeclaration {
            doc: None,
            name: name.to_string(),
            type_parameters,
            ty,
        })
    }

    pub fn namespace(name: &str, body: Vec<Statement>) -> Self {
        Statement::Module(ModuleDeclaration {
            doc: None,
            name: name.to_string(),
            body: Some(body),
        })
    }

    pub fn export_default(name: &str) -> Self {
        Statement::ExportDefault(ExportDefault {
            doc: None,
            expression: name.into(),
        })
    }

    pub fn import(specifier: &str) -> ImportDeclaration {
        ImportDeclaration {
            specifier: specifier.to_string(),
            ..Default::default()
        }
    }

    /// Attach a raw doc block to a declaration. Imports and unknown statements
    /// carry no doc and are returned unchanged.
    pub fn with_doc(mut self, raw: &str) -> Self {
        let doc = Some(raw.to_string());
        match &mut self {
            Statement::Interface(d) => d.doc = doc,
            Statement::TypeAlias(d) => d.doc = doc,
            Statement::Enum(d) => d.doc = doc,
            Statement::Module(d) => d.doc = doc,
            Statement::ExportDefault(d) => d.doc = doc,
            Statement::Import(_) | Statement::Other { .. } => {}
        }
        self
    }
}

impl ImportDeclaration {
    pub fn default_as(mut self, name: &str) -> Self {
        self.default = Some(name.to_string());
        self
    }

    pub fn named(mut self, name: &str, alias: Option<&str>) -> Self {
        self.named.push(ImportSpecifier {
            name: name.to_string(),
            alias: alias.map(str::to_string),
        });
        self
    }

    pub fn namespace_as(mut self, name: &str) -> Self {
        self.namespace = Some(name.to_string());
        self
    }

    pub fn into_statement(self) -> Statement {
        Statement::Import(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_from_json() {
        let json = r#"{
            "path": "b.ts",
            "statements": [
                {"kind": "import", "specifier": "./a", "default": "D",
                 "named": [{"name": "A", "alias": "TypeA"}]},
                {"kind": "typeAlias", "name": "B",
                 "type": {"kind": "reference", "name": "TypeA",
                          "typeArguments": [{"kind": "reference", "name": "D"}]}}
            ]
        }"#;
        let file: SourceFile = serde_json::from_str(json).unwrap();

        let expected = SourceFile::new(
            "b.ts",
            vec![
                Statement::import("./a")
                    .default_as("D")
                    .named("A", Some("TypeA"))
                    .into_statement(),
                Statement::alias("B", TypeNode::generic("TypeA", vec![TypeNode::reference("D")])),
            ],
        );
        assert_eq!(file, expected);
    }

    #[test]
    fn test_entity_name_segments() {
        let name = EntityName::from("NS.Inner.Foo");
        assert_eq!(name.head(), "NS");
        assert!(name.is_qualified());
        assert_eq!(name.to_string(), "NS.Inner.Foo");
    }

    #[test]
    fn test_describe() {
        assert_eq!(TypeNode::keyword(Keyword::Any).describe(), "any keyword");
        assert_eq!(TypeNode::reference("A.B").describe(), "reference to `A.B`");
    }
}
