//! Names visible from a file.
//!
//! A file's root scope holds its imports and top-level declarations. During
//! generic instantiation the resolver extends a scope with `TypeArgument`
//! bindings; those travel with the instantiation but never become part of any
//! file's root scope.

use crate::ir::{Child, FileMap, ImportNode, RootNode, StatementNode};
use crate::naming::QualifiedName;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// How a name entered a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Declared locally or brought in by a default or named import.
    Default,
    /// Bound to another file's root by `import * as Name`.
    NamespaceImport,
    /// Bound to a type argument of the instantiation being resolved.
    TypeArgument,
}

/// What a scope name points at.
#[derive(Debug, Clone)]
pub enum ScopeEntry<'a> {
    Declaration(&'a StatementNode),
    Namespace(&'a RootNode),
    TypeArgument(Child),
}

impl ScopeEntry<'_> {
    pub fn kind(&self) -> ScopeKind {
        match self {
            ScopeEntry::Declaration(_) => ScopeKind::Default,
            ScopeEntry::Namespace(_) => ScopeKind::NamespaceImport,
            ScopeEntry::TypeArgument(_) => ScopeKind::TypeArgument,
        }
    }
}

/// Result of looking a qualified name up in a scope.
#[derive(Debug, Clone)]
pub enum Lookup<'a> {
    /// A declaration, together with the kind of the entry the lookup started from.
    Declaration {
        node: &'a StatementNode,
        kind: ScopeKind,
    },
    /// The node a type parameter is currently bound to.
    TypeArgument(Child),
}

/// An immutable name table. Extending a scope returns a new one.
///
/// Type argument bindings are layered over the file's declarations and shadow
/// them; layering shares the declaration table instead of copying it.
#[derive(Debug, Clone, Default)]
pub struct Scope<'a> {
    entries: Arc<IndexMap<String, ScopeEntry<'a>>>,
    type_arguments: Arc<IndexMap<String, Child>>,
}

impl<'a> Scope<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The root scope of `root`: imports first, then local declarations, which
    /// shadow imports of the same name.
    ///
    /// Imports whose target file or declaration cannot be found are left unbound.
    pub fn of_file(root: &'a RootNode, files: &'a FileMap) -> Self {
        let mut entries = IndexMap::new();

        for import in &root.imports {
            let Some(target) = files.get(import.file_name()) else {
                debug!(
                    file = %root.file_name,
                    import = import.bound_name(),
                    target = import.file_name(),
                    "import target is not part of the file map"
                );
                continue;
            };
            let entry = match import {
                ImportNode::DefaultImport(_) => {
                    target.export_assignment().map(ScopeEntry::Declaration)
                }
                ImportNode::NamedImport(named) => {
                    target.statement(&named.name).map(ScopeEntry::Declaration)
                }
                ImportNode::NamespaceImport(_) => Some(ScopeEntry::Namespace(target)),
            };
            match entry {
                Some(entry) => {
                    entries.insert(import.bound_name().to_string(), entry);
                }
                None => debug!(
                    file = %root.file_name,
                    import = import.bound_name(),
                    target = import.file_name(),
                    "imported declaration does not exist"
                ),
            }
        }

        for statement in &root.children {
            match statement {
                StatementNode::ExportAssignment(_) => {}
                _ => {
                    entries.insert(
                        statement.name().to_string(),
                        ScopeEntry::Declaration(statement),
                    );
                }
            }
        }

        Self {
            entries: Arc::new(entries),
            type_arguments: Arc::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<ScopeEntry<'a>> {
        match self.type_arguments.get(name) {
            Some(node) => Some(ScopeEntry::TypeArgument(Arc::clone(node))),
            None => self.entries.get(name).cloned(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.type_arguments.is_empty()
    }

    /// Type arguments first, then the declarations they do not shadow.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ScopeEntry<'a>)> {
        let bound = self
            .type_arguments
            .iter()
            .map(|(name, node)| (name.as_str(), ScopeEntry::TypeArgument(Arc::clone(node))));
        let declared = self
            .entries
            .iter()
            .filter(|(name, _)| !self.type_arguments.contains_key(*name))
            .map(|(name, entry)| (name.as_str(), entry.clone()));
        bound.chain(declared)
    }

    /// Only the transient type argument bindings of this scope.
    pub fn type_arguments(&self) -> impl Iterator<Item = (&str, &Child)> {
        self.type_arguments.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// A copy of this scope with `name` bound to `node`, replacing any binding
    /// of the same name.
    pub fn with_type_argument(&self, name: impl Into<String>, node: Child) -> Self {
        let mut type_arguments = (*self.type_arguments).clone();
        type_arguments.insert(name.into(), node);
        Self {
            entries: Arc::clone(&self.entries),
            type_arguments: Arc::new(type_arguments),
        }
    }

    /// This scope with the type argument bindings of `other` layered on top.
    pub fn with_type_arguments_of(&self, other: &Scope<'a>) -> Self {
        if other.type_arguments.is_empty() {
            return self.clone();
        }
        let type_arguments = if self.type_arguments.is_empty() {
            Arc::clone(&other.type_arguments)
        } else {
            let mut merged = (*self.type_arguments).clone();
            merged.extend(
                other
                    .type_arguments
                    .iter()
                    .map(|(name, node)| (name.clone(), Arc::clone(node))),
            );
            Arc::new(merged)
        };
        Self {
            entries: Arc::clone(&self.entries),
            type_arguments,
        }
    }

    /// Whether `name` is currently bound as a type argument.
    pub fn binds_type_argument(&self, name: &str) -> bool {
        self.type_arguments.contains_key(name)
    }

    /// Look up a possibly qualified name.
    ///
    /// A single segment matches declarations and type arguments but neither
    /// namespaces nor namespace imports. A qualified name starts at a `Group` or
    /// namespace import and walks its children left to right.
    pub fn lookup(&self, name: &QualifiedName) -> Option<Lookup<'a>> {
        if let Some(node) = self.type_arguments.get(&name.segment) {
            return match name.right {
                None => Some(Lookup::TypeArgument(Arc::clone(node))),
                Some(_) => None,
            };
        }
        let entry = self.entries.get(&name.segment)?;
        match (entry, name.right.as_deref()) {
            (ScopeEntry::TypeArgument(node), None) => Some(Lookup::TypeArgument(Arc::clone(node))),
            (ScopeEntry::TypeArgument(_), Some(_)) => None,
            (ScopeEntry::Namespace(_), None) => None,
            (ScopeEntry::Namespace(root), Some(right)) => {
                find_statement(&root.children, right).map(|node| Lookup::Declaration {
                    node,
                    kind: ScopeKind::NamespaceImport,
                })
            }
            (ScopeEntry::Declaration(StatementNode::Group(_)), None) => None,
            (ScopeEntry::Declaration(StatementNode::Group(group)), Some(right)) => {
                find_statement(&group.children, right).map(|node| Lookup::Declaration {
                    node,
                    kind: ScopeKind::Default,
                })
            }
            (ScopeEntry::Declaration(node), None) => Some(Lookup::Declaration {
                node: *node,
                kind: ScopeKind::Default,
            }),
            (ScopeEntry::Declaration(_), Some(_)) => None,
        }
    }
}

/// Walk `children` along `name`. Groups need a further segment, every other
/// declaration must be the last one.
fn find_statement<'a>(
    children: &'a [StatementNode],
    name: &QualifiedName,
) -> Option<&'a StatementNode> {
    let found = children.iter().find(|c| c.name() == name.segment)?;
    match (found, name.right.as_deref()) {
        (StatementNode::Group(group), Some(right)) => find_statement(&group.children, right),
        (StatementNode::Group(_), None) => None,
        (_, None) => Some(found),
        (_, Some(_)) => None,
    }
}
