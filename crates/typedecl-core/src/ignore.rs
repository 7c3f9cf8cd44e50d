//! The `@ignore` tag.
//!
//! `@ignore` without text excludes a node from every target environment;
//! `@ignore swift kotlin` only from the listed ones.

use crate::doc::Doc;
use crate::ir::{
    ArrayNode, Child, ChildNode, DictionaryNode, EnumerationCase, EnumerationNode, GroupNode,
    IntersectionNode, Member, RecordNode, ReferenceNode, RootNode, StatementNode, TupleNode,
    TypeDefinitionNode, UnionNode,
};
use std::sync::Arc;

/// Whether a doc excludes its node from `environment`.
pub fn is_ignored(doc: Option<&Doc>, environment: &str) -> bool {
    match doc.and_then(|d| d.tags.ignore.as_deref()) {
        None => false,
        Some("") => true,
        Some(list) => list.split_whitespace().any(|env| env == environment),
    }
}

/// Nodes that can be excluded with `@ignore`.
pub trait Ignorable {
    fn doc(&self) -> Option<&Doc>;

    fn is_ignored_in(&self, environment: &str) -> bool {
        is_ignored(self.doc(), environment)
    }
}

impl Ignorable for StatementNode {
    fn doc(&self) -> Option<&Doc> {
        StatementNode::doc(self)
    }
}

impl Ignorable for ChildNode {
    fn doc(&self) -> Option<&Doc> {
        ChildNode::doc(self)
    }
}

impl Ignorable for Member {
    fn doc(&self) -> Option<&Doc> {
        self.doc.as_ref()
    }
}

impl Ignorable for EnumerationCase {
    fn doc(&self) -> Option<&Doc> {
        self.doc.as_ref()
    }
}

/// A copy of `root` without the declarations, enumeration cases and record
/// members ignored in `environment`.
pub fn strip_ignored(root: &RootNode, environment: &str) -> RootNode {
    RootNode {
        file_name: root.file_name.clone(),
        doc: root.doc.clone(),
        imports: root.imports.clone(),
        children: strip_statements(&root.children, environment),
    }
}

fn strip_statements(statements: &[StatementNode], environment: &str) -> Vec<StatementNode> {
    statements
        .iter()
        .filter(|s| !s.is_ignored_in(environment))
        .map(|statement| match statement {
            StatementNode::Group(group) => StatementNode::Group(GroupNode {
                children: strip_statements(&group.children, environment),
                ..group.clone()
            }),
            StatementNode::Enumeration(enumeration) => {
                StatementNode::Enumeration(EnumerationNode {
                    children: enumeration
                        .children
                        .iter()
                        .filter(|c| !c.is_ignored_in(environment))
                        .cloned()
                        .collect(),
                    ..enumeration.clone()
                })
            }
            StatementNode::TypeDefinition(definition) => {
                StatementNode::TypeDefinition(TypeDefinitionNode {
                    definition: strip_child(&definition.definition, environment),
                    ..definition.clone()
                })
            }
            StatementNode::ExportAssignment(_) => statement.clone(),
        })
        .collect()
}

/// Drops ignored members from records wherever they sit in the expression.
fn strip_child(node: &Child, environment: &str) -> Child {
    let stripped = match node.as_ref() {
        ChildNode::Record(record) => ChildNode::Record(RecordNode {
            members: record
                .members
                .iter()
                .filter(|m| !m.is_ignored_in(environment))
                .map(|m| Member {
                    value: strip_child(&m.value, environment),
                    ..m.clone()
                })
                .collect(),
            ..record.clone()
        }),
        ChildNode::Dictionary(dictionary) => ChildNode::Dictionary(DictionaryNode {
            children: strip_child(&dictionary.children, environment),
            ..dictionary.clone()
        }),
        ChildNode::Array(array) => ChildNode::Array(ArrayNode {
            children: strip_child(&array.children, environment),
            ..array.clone()
        }),
        ChildNode::Tuple(tuple) => ChildNode::Tuple(TupleNode {
            children: strip_children(&tuple.children, environment),
            ..tuple.clone()
        }),
        ChildNode::Union(union) => ChildNode::Union(UnionNode {
            children: strip_children(&union.children, environment),
            ..union.clone()
        }),
        ChildNode::Intersection(intersection) => ChildNode::Intersection(IntersectionNode {
            children: strip_children(&intersection.children, environment),
            ..intersection.clone()
        }),
        ChildNode::Reference(reference) => ChildNode::Reference(ReferenceNode {
            type_arguments: reference
                .type_arguments
                .as_deref()
                .map(|arguments| strip_children(arguments, environment)),
            ..reference.clone()
        }),
        ChildNode::Token(_) | ChildNode::Literal(_) => return Arc::clone(node),
    };
    Arc::new(stripped)
}

fn strip_children(nodes: &[Child], environment: &str) -> Vec<Child> {
    nodes.iter().map(|n| strip_child(n, environment)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::DocTags;
    use crate::ir::TokenKind;
    use rstest::rstest;

    fn ignore_doc(text: &str) -> Doc {
        let mut tags = DocTags::default();
        tags.set("ignore", Some(text).filter(|t| !t.is_empty()));
        Doc::default().with_tags(tags)
    }

    #[rstest]
    #[case("", "swift", true)]
    #[case("swift", "swift", true)]
    #[case("swift kotlin", "kotlin", true)]
    #[case("swift kotlin", "typescript", false)]
    fn test_is_ignored(#[case] tag: &str, #[case] env: &str, #[case] expected: bool) {
        assert_eq!(is_ignored(Some(&ignore_doc(tag)), env), expected);
    }

    #[test]
    fn test_no_tag_never_ignores() {
        assert!(!is_ignored(None, "swift"));
        assert!(!is_ignored(Some(&Doc::comment("text")), "swift"));
    }

    #[test]
    fn test_strip_ignored_members_and_statements() {
        let mut hidden = Member::new("a.ts", "hidden", ChildNode::token("a.ts", TokenKind::String));
        hidden.doc = Some(ignore_doc("swift"));
        let shown = Member::new("a.ts", "shown", ChildNode::token("a.ts", TokenKind::Number));
        let mut dropped =
            TypeDefinitionNode::new("a.ts", "Dropped", ChildNode::token("a.ts", TokenKind::Number));
        dropped.doc = Some(ignore_doc(""));

        let mut root = RootNode::new("a.ts");
        root.children = vec![
            TypeDefinitionNode::new("a.ts", "Kept", ChildNode::record("a.ts", vec![hidden, shown]))
                .into(),
            dropped.into(),
        ];

        let stripped = strip_ignored(&root, "swift");
        assert_eq!(stripped.children.len(), 1);
        let Some(StatementNode::TypeDefinition(kept)) = stripped.statement("Kept") else {
            panic!("Kept should remain");
        };
        let ChildNode::Record(record) = kept.definition.as_ref() else {
            panic!("expected a record");
        };
        let names: Vec<&str> = record.members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, vec!["shown"]);

        let elsewhere = strip_ignored(&root, "kotlin");
        assert_eq!(elsewhere.children.len(), 1);
        assert!(elsewhere.statement("Dropped").is_none());
    }

    fn secret_record() -> Child {
        let mut secret = Member::new("a.ts", "secret", ChildNode::token("a.ts", TokenKind::String));
        secret.doc = Some(ignore_doc("swift"));
        let id = Member::new("a.ts", "id", ChildNode::token("a.ts", TokenKind::Number));
        ChildNode::record("a.ts", vec![id, secret])
    }

    fn identifiers(record: &Child) -> Vec<String> {
        match record.as_ref() {
            ChildNode::Record(r) => r.members.iter().map(|m| m.identifier.clone()).collect(),
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[rstest]
    #[case::array(ChildNode::array("a.ts", secret_record()))]
    #[case::union(ChildNode::union("a.ts", vec![ChildNode::token("a.ts", TokenKind::String), secret_record()]))]
    #[case::intersection(ChildNode::intersection("a.ts", vec![secret_record()]))]
    #[case::type_argument(
        ReferenceNode::new("a.ts", "Box".into())
            .with_type_arguments(vec![secret_record()])
            .into_child()
    )]
    fn test_strip_ignored_reaches_nested_records(#[case] definition: Child) {
        let mut root = RootNode::new("a.ts");
        root.children = vec![TypeDefinitionNode::new("a.ts", "Nested", definition).into()];

        let stripped = strip_ignored(&root, "swift");
        let Some(StatementNode::TypeDefinition(nested)) = stripped.statement("Nested") else {
            panic!("Nested should remain");
        };
        let record = match nested.definition.as_ref() {
            ChildNode::Array(a) => a.children.clone(),
            ChildNode::Union(u) => u.children[1].clone(),
            ChildNode::Intersection(i) => i.children[0].clone(),
            ChildNode::Reference(r) => r.type_arguments.as_ref().unwrap()[0].clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(identifiers(&record), ["id"]);

        assert_eq!(strip_ignored(&root, "kotlin"), root);
    }
}
