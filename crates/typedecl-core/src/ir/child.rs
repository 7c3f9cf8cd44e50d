//! Type expression nodes.

use crate::doc::Doc;
use crate::naming::QualifiedName;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared link to a type expression.
pub type Child = Arc<ChildNode>;

/// A type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChildNode {
    Record(RecordNode),
    Dictionary(DictionaryNode),
    Token(TokenNode),
    Reference(ReferenceNode),
    Array(ArrayNode),
    Tuple(TupleNode),
    Union(UnionNode),
    Intersection(IntersectionNode),
    Literal(LiteralNode),
}

/// Primitive type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    String,
    Number,
    Boolean,
}

/// Value of a literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// An object type with fixed members, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub file_name: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub is_required: bool,
    pub is_read_only: bool,
    pub value: Child,
}

/// An object type whose keys all share one value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Child,
    /// Key pattern constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub token: TokenKind,
}

/// A use of a named declaration.
///
/// `resolved_file_name` stays empty until the name has been tied to the file
/// declaring it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub name: QualifiedName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_arguments: Option<Vec<Child>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Child,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralNode {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Doc>,
    pub value: LiteralValue,
}

impl ChildNode {
    pub fn file_name(&self) -> &str {
        match self {
            ChildNode::Record(n) => &n.file_name,
            ChildNode::Dictionary(n) => &n.file_name,
            ChildNode::Token(n) => &n.file_name,
            ChildNode::Reference(n) => &n.file_name,
            ChildNode::Array(n) => &n.file_name,
            ChildNode::Tuple(n) => &n.file_name,
            ChildNode::Union(n) => &n.file_name,
            ChildNode::Intersection(n) => &n.file_name,
            ChildNode::Literal(n) => &n.file_name,
        }
    }

    pub fn doc(&self) -> Option<&Doc> {
        match self {
            ChildNode::Record(n) => n.doc.as_ref(),
            ChildNode::Dictionary(n) => n.doc.as_ref(),
            ChildNode::Token(n) => n.doc.as_ref(),
            ChildNode::Reference(n) => n.doc.as_ref(),
            ChildNode::Array(n) => n.doc.as_ref(),
            ChildNode::Tuple(n) => n.doc.as_ref(),
            ChildNode::Union(n) => n.doc.as_ref(),
            ChildNode::Intersection(n) => n.doc.as_ref(),
            ChildNode::Literal(n) => n.doc.as_ref(),
        }
    }

    /// The discriminant as it appears in serialized IR.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ChildNode::Record(_) => "Record",
            ChildNode::Dictionary(_) => "Dictionary",
            ChildNode::Token(_) => "Token",
            ChildNode::Reference(_) => "Reference",
            ChildNode::Array(_) => "Array",
            ChildNode::Tuple(_) => "Tuple",
            ChildNode::Union(_) => "Union",
            ChildNode::Intersection(_) => "Intersection",
            ChildNode::Literal(_) => "Literal",
        }
    }

    // ===== Constructors =====

    pub fn token(file_name: impl Into<String>, token: TokenKind) -> Child {
        Arc::new(ChildNode::Token(TokenNode {
            file_name: file_name.into(),
            doc: None,
            token,
        }))
    }

    pub fn literal(file_name: impl Into<String>, value: LiteralValue) -> Child {
        Arc::new(ChildNode::Literal(LiteralNode {
            file_name: file_name.into(),
            doc: None,
            value,
        }))
    }

    /// A reference without type arguments or resolved file.
    pub fn reference(file_name: impl Into<String>, name: impl Into<QualifiedName>) -> Child {
        Arc::new(ChildNode::Reference(ReferenceNode {
            file_name: file_name.into(),
            doc: None,
            name: name.into(),
            type_arguments: None,
            resolved_file_name: None,
        }))
    }

    pub fn record(file_name: impl Into<String>, members: Vec<Member>) -> Child {
        Arc::new(ChildNode::Record(RecordNode {
            file_name: file_name.into(),
            doc: None,
            members,
        }))
    }

    pub fn array(file_name: impl Into<String>, element: Child) -> Child {
        Arc::new(ChildNode::Array(ArrayNode {
            file_name: file_name.into(),
            doc: None,
            children: element,
        }))
    }

    pub fn union(file_name: impl Into<String>, children: Vec<Child>) -> Child {
        Arc::new(ChildNode::Union(UnionNode {
            file_name: file_name.into(),
            doc: None,
            children,
        }))
    }

    pub fn intersection(file_name: impl Into<String>, children: Vec<Child>) -> Child {
        Arc::new(ChildNode::Intersection(IntersectionNode {
            file_name: file_name.into(),
            doc: None,
            children,
        }))
    }
}

impl ReferenceNode {
    pub fn new(file_name: impl Into<String>, name: QualifiedName) -> Self {
        Self {
            file_name: file_name.into(),
            doc: None,
            name,
            type_arguments: None,
            resolved_file_name: None,
        }
    }

    pub fn with_type_arguments(mut self, arguments: Vec<Child>) -> Self {
        self.type_arguments = Some(arguments);
        self
    }

    pub fn with_resolved_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.resolved_file_name = Some(file_name.into());
        self
    }

    pub fn into_child(self) -> Child {
        Arc::new(ChildNode::Reference(self))
    }
}

impl Member {
    /// A required, writable member.
    pub fn new(file_name: impl Into<String>, identifier: impl Into<String>, value: Child) -> Self {
        Self {
            file_name: file_name.into(),
            identifier: identifier.into(),
            doc: None,
            is_required: true,
            is_read_only: false,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_in_json() {
        let node = ChildNode::token("a.ts", TokenKind::Number);
        let json = serde_json::to_value(&*node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "Token", "fileName": "a.ts", "token": "Number"})
        );
    }

    #[test]
    fn test_reference_json_omits_unresolved_fields() {
        let node = ChildNode::reference("b.ts", "NS.Foo");
        let json = serde_json::to_value(&*node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "Reference",
                "fileName": "b.ts",
                "name": {"segment": "NS", "right": {"segment": "Foo"}}
            })
        );
    }

    #[test]
    fn test_record_deserializes() {
        let json = serde_json::json!({
            "kind": "Record",
            "fileName": "a.ts",
            "members": [{
                "fileName": "a.ts",
                "identifier": "id",
                "isRequired": true,
                "isReadOnly": false,
                "value": {"kind": "Literal", "fileName": "a.ts", "value": 1.0}
            }]
        });
        let node: ChildNode = serde_json::from_value(json).unwrap();
        let ChildNode::Record(record) = node else {
            panic!("expected a record");
        };
        assert_eq!(record.members[0].identifier, "id");
        assert!(matches!(
            &*record.members[0].value,
            ChildNode::Literal(LiteralNode { value: LiteralValue::Number(n), .. }) if *n == 1.0
        ));
    }
}
