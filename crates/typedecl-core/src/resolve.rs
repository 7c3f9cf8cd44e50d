//! Generic and cross-file reference resolution.
//!
//! Resolution rewrites one file's IR against the full [`FileMap`]:
//!
//! - references to generic definitions with an explicit argument list are
//!   replaced by the definition body, specialized under `TypeArgument` bindings;
//! - every other reference keeps its shape and learns the file declaring its
//!   target (`resolved_file_name`);
//! - intersections of records are merged into a single record.
//!
//! Names always resolve against the root scope of the file the reference was
//! written in. Only type argument bindings travel along with an instantiation.
//!
//! Declarations that fail to resolve are dropped from their enclosing group or
//! root unless the error is not recoverable.

use crate::error::{ResolveError, Result};
use crate::ir::{
    ArrayNode, Child, ChildNode, DictionaryNode, ExportAssignmentNode, FileMap, GroupNode,
    IntersectionNode, Member, RecordNode, ReferenceNode, RootNode, StatementNode, TupleNode,
    TypeDefinitionNode, UnionNode,
};
use crate::scope::{Lookup, Scope};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Tuning knobs for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum nesting of instantiations (and intersection operand chases)
    /// before resolution of the file is abandoned.
    pub max_instantiation_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_instantiation_depth: 64,
        }
    }
}

/// Resolve `file_name` against `files` with default options.
pub fn resolve(files: &FileMap, file_name: &str) -> Result<Option<RootNode>> {
    Resolver::new(files).resolve_file(file_name)
}

/// Resolve every file of `files` in parallel. Results keep the map's order.
pub fn resolve_all(
    files: &FileMap,
    options: ResolveOptions,
) -> Vec<(String, Result<Option<RootNode>>)> {
    let resolver = Resolver::with_options(files, options);
    let names: Vec<&str> = files.file_names().collect();
    names
        .par_iter()
        .map(|name| (name.to_string(), resolver.resolve_file(name)))
        .collect()
}

/// Resolves files of one [`FileMap`].
///
/// Root scopes of all files are computed once up front; the resolver holds no
/// other state and can be shared across threads.
pub struct Resolver<'a> {
    files: &'a FileMap,
    root_scopes: IndexMap<&'a str, Scope<'a>>,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(files: &'a FileMap) -> Self {
        Self::with_options(files, ResolveOptions::default())
    }

    pub fn with_options(files: &'a FileMap, options: ResolveOptions) -> Self {
        let root_scopes = files
            .roots()
            .map(|root| (root.file_name.as_str(), Scope::of_file(root, files)))
            .collect();
        Self {
            files,
            root_scopes,
            options,
        }
    }

    /// The root scope of a lowered file.
    pub fn root_scope(&self, file_name: &str) -> Result<&Scope<'a>> {
        self.root_scopes
            .get(file_name)
            .ok_or_else(|| ResolveError::UnknownFile(file_name.to_string()))
    }

    /// Resolve a whole file. `None` when no declaration survives.
    pub fn resolve_file(&self, file_name: &str) -> Result<Option<RootNode>> {
        let root = self
            .files
            .get(file_name)
            .ok_or_else(|| ResolveError::UnknownFile(file_name.to_string()))?;

        let children = self.statements(&root.children, &Scope::empty(), 0)?;
        if children.is_empty() {
            debug!(file = file_name, "no declaration survived resolution");
            return Ok(None);
        }
        Ok(Some(RootNode {
            file_name: root.file_name.clone(),
            doc: root.doc.clone(),
            imports: root.imports.clone(),
            children,
        }))
    }

    /// Resolve a single type expression under `scope`.
    pub fn resolve_child(&self, node: &Child, scope: &Scope<'a>) -> Result<Child> {
        self.child(node, scope, 0)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statements(
        &self,
        children: &[StatementNode],
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<Vec<StatementNode>> {
        let mut resolved = Vec::with_capacity(children.len());
        for child in children {
            match self.statement(child, scope, depth) {
                Ok(Some(statement)) => resolved.push(statement),
                Ok(None) => debug!(
                    file = child.file_name(),
                    name = child.name(),
                    "dropping group without resolvable declarations"
                ),
                Err(error) if error.is_recoverable() => debug!(
                    file = child.file_name(),
                    name = child.name(),
                    %error,
                    "dropping unresolvable declaration"
                ),
                Err(error) => return Err(error),
            }
        }
        Ok(resolved)
    }

    fn statement(
        &self,
        node: &StatementNode,
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<Option<StatementNode>> {
        match node {
            StatementNode::Group(group) => {
                let children = self.statements(&group.children, scope, depth)?;
                if children.is_empty() {
                    return Ok(None);
                }
                Ok(Some(StatementNode::Group(GroupNode {
                    file_name: group.file_name.clone(),
                    name: group.name.clone(),
                    doc: group.doc.clone(),
                    children,
                })))
            }
            StatementNode::Enumeration(_) => Ok(Some(node.clone())),
            StatementNode::TypeDefinition(definition) => self
                .standalone_definition(definition, scope, depth)
                .map(|d| Some(StatementNode::TypeDefinition(d))),
            StatementNode::ExportAssignment(export) => {
                let expression = self.child(&export.expression, scope, depth)?;
                Ok(Some(StatementNode::ExportAssignment(ExportAssignmentNode {
                    expression,
                    ..export.clone()
                })))
            }
        }
    }

    /// Resolve a definition outside of any instantiation: its own defaults bind
    /// its parameters, unless an enclosing instantiation already bound them.
    fn standalone_definition(
        &self,
        definition: &TypeDefinitionNode,
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<TypeDefinitionNode> {
        if definition.required_parameters().next().is_some() {
            return Err(ResolveError::RequiresTypeArguments {
                name: definition.name.clone(),
            });
        }

        let mut bindings = scope.clone();
        for parameter in definition.parameters() {
            if bindings.binds_type_argument(&parameter.name) {
                continue;
            }
            if let Some(default) = &parameter.default {
                let value = self.child(default, &bindings, depth + 1)?;
                bindings = bindings.with_type_argument(parameter.name.clone(), value);
            }
        }

        Ok(TypeDefinitionNode {
            definition: self.child(&definition.definition, &bindings, depth)?,
            ..definition.clone()
        })
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    fn child(&self, node: &Child, scope: &Scope<'a>, depth: usize) -> Result<Child> {
        match node.as_ref() {
            ChildNode::Token(_) | ChildNode::Literal(_) => Ok(Arc::clone(node)),
            ChildNode::Record(record) => {
                let members = record
                    .members
                    .iter()
                    .map(|m| {
                        Ok(Member {
                            value: self.child(&m.value, scope, depth)?,
                            ..m.clone()
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                if members
                    .iter()
                    .zip(&record.members)
                    .all(|(new, old)| Arc::ptr_eq(&new.value, &old.value))
                {
                    return Ok(Arc::clone(node));
                }
                Ok(Arc::new(ChildNode::Record(RecordNode {
                    members,
                    ..record.clone()
                })))
            }
            ChildNode::Dictionary(dictionary) => {
                let children = self.child(&dictionary.children, scope, depth)?;
                if Arc::ptr_eq(&children, &dictionary.children) {
                    return Ok(Arc::clone(node));
                }
                Ok(Arc::new(ChildNode::Dictionary(DictionaryNode {
                    children,
                    ..dictionary.clone()
                })))
            }
            ChildNode::Array(array) => {
                let children = self.child(&array.children, scope, depth)?;
                if Arc::ptr_eq(&children, &array.children) {
                    return Ok(Arc::clone(node));
                }
                Ok(Arc::new(ChildNode::Array(ArrayNode {
                    children,
                    ..array.clone()
                })))
            }
            ChildNode::Tuple(tuple) => {
                let children = self.children(&tuple.children, scope, depth)?;
                if same_nodes(&children, &tuple.children) {
                    return Ok(Arc::clone(node));
                }
                Ok(Arc::new(ChildNode::Tuple(TupleNode {
                    children,
                    ..tuple.clone()
                })))
            }
            ChildNode::Union(union) => {
                let children = self.children(&union.children, scope, depth)?;
                if same_nodes(&children, &union.children) {
                    return Ok(Arc::clone(node));
                }
                Ok(Arc::new(ChildNode::Union(UnionNode {
                    children,
                    ..union.clone()
                })))
            }
            ChildNode::Intersection(intersection) => self.intersection(intersection, scope, depth),
            ChildNode::Reference(reference) => self.reference(reference, scope, depth),
        }
    }

    fn children(&self, nodes: &[Child], scope: &Scope<'a>, depth: usize) -> Result<Vec<Child>> {
        nodes.iter().map(|n| self.child(n, scope, depth)).collect()
    }

    fn reference(
        &self,
        reference: &ReferenceNode,
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<Child> {
        let lookup_scope = self
            .root_scope(&reference.file_name)?
            .with_type_arguments_of(scope);

        let found = lookup_scope
            .lookup(&reference.name)
            .ok_or_else(|| ResolveError::UnresolvedName {
                name: reference.name.to_string(),
                file: reference.file_name.clone(),
            })?;

        match found {
            Lookup::TypeArgument(bound) => match reference.type_arguments.as_deref() {
                Some(arguments) if !arguments.is_empty() => Err(ResolveError::ArityMismatch {
                    name: reference.name.to_string(),
                    expected: 0,
                    found: arguments.len(),
                }),
                _ => Ok(bound),
            },
            Lookup::Declaration {
                node: StatementNode::TypeDefinition(definition),
                ..
            } => match reference.type_arguments.as_deref() {
                Some(arguments) => self.instantiate(reference, definition, arguments, scope, depth),
                None => {
                    let required: Vec<&str> = definition
                        .required_parameters()
                        .map(|p| p.name.as_str())
                        .collect();
                    if !required.is_empty() {
                        return Err(ResolveError::MissingTypeArguments {
                            name: reference.name.to_string(),
                            parameters: required.join(", "),
                        });
                    }
                    Ok(annotate(reference, &definition.file_name, None))
                }
            },
            Lookup::Declaration { node, .. } => {
                let arguments = reference
                    .type_arguments
                    .as_deref()
                    .map(|arguments| self.children(arguments, scope, depth))
                    .transpose()?;
                Ok(annotate(reference, node.file_name(), arguments))
            }
        }
    }

    /// Specialize `definition` for the arguments of `reference`.
    ///
    /// Explicit arguments are resolved in the caller's scope. An omitted
    /// argument falls back to the parameter's default, which may refer to the
    /// parameters bound before it. Defaults count as one level deeper.
    fn instantiate(
        &self,
        reference: &ReferenceNode,
        definition: &TypeDefinitionNode,
        arguments: &[Child],
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<Child> {
        if depth >= self.options.max_instantiation_depth {
            return Err(ResolveError::InstantiationDepthExceeded {
                name: reference.name.to_string(),
                limit: self.options.max_instantiation_depth,
            });
        }

        let parameters = definition.parameters();
        if arguments.len() > parameters.len() {
            return Err(ResolveError::ArityMismatch {
                name: reference.name.to_string(),
                expected: parameters.len(),
                found: arguments.len(),
            });
        }

        let mut bindings = scope.clone();
        for (index, parameter) in parameters.iter().enumerate() {
            let value = match (arguments.get(index), &parameter.default) {
                (Some(argument), _) => self.child(argument, scope, depth)?,
                (None, Some(default)) => self.child(default, &bindings, depth + 1)?,
                (None, None) => {
                    return Err(ResolveError::MissingTypeArgument {
                        name: reference.name.to_string(),
                        parameter: parameter.name.clone(),
                        index,
                    });
                }
            };
            bindings = bindings.with_type_argument(parameter.name.clone(), value);
        }

        self.child(&definition.definition, &bindings, depth + 1)
    }

    // =========================================================================
    // Intersections
    // =========================================================================

    fn intersection(
        &self,
        intersection: &IntersectionNode,
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<Child> {
        let operands = self.children(&intersection.children, scope, depth)?;

        let mut members: Vec<Member> = Vec::new();
        for operand in &operands {
            let record = self.operand_record(operand, depth)?;
            let ChildNode::Record(record) = record.as_ref() else {
                return Err(unsupported_operand(&record));
            };
            for member in &record.members {
                if members.iter().any(|m| m.identifier == member.identifier) {
                    return Err(ResolveError::DuplicateMember {
                        identifier: member.identifier.clone(),
                    });
                }
                members.push(member.clone());
            }
        }

        Ok(Arc::new(ChildNode::Record(RecordNode {
            file_name: intersection.file_name.clone(),
            doc: intersection.doc.clone(),
            members,
        })))
    }

    /// Reduce an already resolved intersection operand to a record, following
    /// opaque references to the definitions they name.
    fn operand_record(&self, operand: &Child, depth: usize) -> Result<Child> {
        let ChildNode::Reference(reference) = operand.as_ref() else {
            return match operand.as_ref() {
                ChildNode::Record(_) => Ok(Arc::clone(operand)),
                _ => Err(unsupported_operand(operand)),
            };
        };

        if depth >= self.options.max_instantiation_depth {
            return Err(ResolveError::InstantiationDepthExceeded {
                name: reference.name.to_string(),
                limit: self.options.max_instantiation_depth,
            });
        }

        let found = self.root_scope(&reference.file_name)?.lookup(&reference.name);
        match found {
            Some(Lookup::Declaration {
                node: StatementNode::TypeDefinition(definition),
                ..
            }) => {
                let resolved = self.standalone_definition(definition, &Scope::empty(), depth + 1)?;
                self.operand_record(&resolved.definition, depth + 1)
            }
            Some(Lookup::Declaration {
                node: StatementNode::ExportAssignment(export),
                ..
            }) => self.operand_record(&export.expression, depth + 1),
            Some(Lookup::Declaration { node, .. }) => {
                Err(ResolveError::UnsupportedIntersectionOperand {
                    kind: node.kind_name().to_string(),
                })
            }
            Some(Lookup::TypeArgument(_)) | None => Err(ResolveError::UnresolvedName {
                name: reference.name.to_string(),
                file: reference.file_name.clone(),
            }),
        }
    }
}

/// The reference with its declaring file filled in, keeping it opaque.
fn annotate(reference: &ReferenceNode, declaring_file: &str, arguments: Option<Vec<Child>>) -> Child {
    Arc::new(ChildNode::Reference(ReferenceNode {
        type_arguments: arguments.or_else(|| reference.type_arguments.clone()),
        resolved_file_name: Some(declaring_file.to_string()),
        ..reference.clone()
    }))
}

fn unsupported_operand(node: &Child) -> ResolveError {
    ResolveError::UnsupportedIntersectionOperand {
        kind: node.kind_name().to_string(),
    }
}

fn same_nodes(new: &[Child], old: &[Child]) -> bool {
    new.iter().zip(old).all(|(a, b)| Arc::ptr_eq(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        DefaultImport, EnumerationCase, EnumerationNode, CaseValue, ImportNode, LiteralValue,
        NamedImport, NamespaceImport, TokenKind, TypeParameterNode,
    };

    fn number(file: &str) -> Child {
        ChildNode::token(file, TokenKind::Number)
    }

    fn string(file: &str) -> Child {
        ChildNode::token(file, TokenKind::String)
    }

    fn record(file: &str, members: Vec<(&str, Child)>) -> Child {
        ChildNode::record(
            file,
            members
                .into_iter()
                .map(|(id, value)| Member::new(file, id, value))
                .collect(),
        )
    }

    fn definition(file: &str, name: &str, body: Child) -> TypeDefinitionNode {
        TypeDefinitionNode::new(file, name, body)
    }

    fn root(file: &str, children: Vec<StatementNode>) -> RootNode {
        RootNode {
            children,
            ..RootNode::new(file)
        }
    }

    /// `a.ts`: `A<T extends number = number> = { id: T }`, `Def = number`, `export default Def`
    fn file_a() -> RootNode {
        root(
            "a.ts",
            vec![
                definition("a.ts", "A", record("a.ts", vec![("id", ChildNode::reference("a.ts", "T"))]))
                    .with_type_parameters(vec![
                        TypeParameterNode::new("a.ts", "T")
                            .with_constraint(number("a.ts"))
                            .with_default(number("a.ts")),
                    ])
                    .into(),
                definition("a.ts", "Def", number("a.ts")).into(),
                ExportAssignmentNode::new("a.ts", ChildNode::reference("a.ts", "Def")).into(),
            ],
        )
    }

    /// `b.ts`: `import D, { A as TypeA } from "./a"`, `B = TypeA<D>`, `C = string`
    fn file_b() -> RootNode {
        let mut b = root(
            "b.ts",
            vec![
                definition(
                    "b.ts",
                    "B",
                    ReferenceNode::new("b.ts", "TypeA".into())
                        .with_type_arguments(vec![ChildNode::reference("b.ts", "D")])
                        .with_resolved_file_name("a.ts")
                        .into_child(),
                )
                .into(),
                definition("b.ts", "C", string("b.ts")).into(),
            ],
        );
        b.imports = vec![
            ImportNode::DefaultImport(DefaultImport {
                name: "D".into(),
                file_name: "a.ts".into(),
            }),
            ImportNode::NamedImport(NamedImport {
                name: "A".into(),
                alias: Some("TypeA".into()),
                file_name: "a.ts".into(),
            }),
        ];
        b
    }

    fn definition_of<'r>(root: &'r RootNode, name: &str) -> &'r Child {
        match root.statement(name) {
            Some(StatementNode::TypeDefinition(def)) => &def.definition,
            other => panic!("expected a type definition named {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_instantiation_inlines_generic_body() {
        let files: FileMap = [file_a(), file_b()].into_iter().collect();
        let resolved = resolve(&files, "b.ts").unwrap().unwrap();

        let expected = ChildNode::record(
            "a.ts",
            vec![Member::new(
                "a.ts",
                "id",
                ReferenceNode::new("b.ts", "D".into())
                    .with_resolved_file_name("a.ts")
                    .into_child(),
            )],
        );
        assert_eq!(definition_of(&resolved, "B"), &expected);
        assert_eq!(definition_of(&resolved, "C"), &string("b.ts"));
        assert_eq!(resolved.imports, file_b().imports);
    }

    #[test]
    fn test_standalone_definition_uses_defaults() {
        let files: FileMap = [file_a(), file_b()].into_iter().collect();
        let resolved = resolve(&files, "a.ts").unwrap().unwrap();

        assert_eq!(
            definition_of(&resolved, "A"),
            &record("a.ts", vec![("id", number("a.ts"))])
        );
        let Some(StatementNode::TypeDefinition(a)) = resolved.statement("A") else {
            panic!("A should survive resolution");
        };
        assert_eq!(a.parameters().len(), 1);

        let Some(StatementNode::ExportAssignment(export)) = resolved.export_assignment() else {
            panic!("export assignment should survive resolution");
        };
        assert_eq!(
            export.expression,
            ReferenceNode::new("a.ts", "Def".into())
                .with_resolved_file_name("a.ts")
                .into_child()
        );
    }

    #[test]
    fn test_empty_argument_list_takes_defaults() {
        let files: FileMap = [file_a()].into_iter().collect();
        let resolver = Resolver::new(&files);
        let reference = ReferenceNode::new("a.ts", "A".into())
            .with_type_arguments(vec![])
            .into_child();

        let resolved = resolver.resolve_child(&reference, &Scope::empty()).unwrap();
        assert_eq!(resolved, record("a.ts", vec![("id", number("a.ts"))]));
    }

    #[test]
    fn test_too_many_arguments_is_an_arity_error() {
        let files: FileMap = [file_a()].into_iter().collect();
        let resolver = Resolver::new(&files);
        let reference = ReferenceNode::new("a.ts", "A".into())
            .with_type_arguments(vec![number("a.ts"), string("a.ts")])
            .into_child();

        let error = resolver.resolve_child(&reference, &Scope::empty()).unwrap_err();
        assert_eq!(
            error,
            ResolveError::ArityMismatch {
                name: "A".into(),
                expected: 1,
                found: 2,
            }
        );
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_required_parameters_must_be_supplied() {
        let generic = definition("g.ts", "G", record("g.ts", vec![("value", ChildNode::reference("g.ts", "T"))]))
            .with_type_parameters(vec![TypeParameterNode::new("g.ts", "T")]);
        let files: FileMap = [root(
            "g.ts",
            vec![generic.into(), definition("g.ts", "Plain", number("g.ts")).into()],
        )]
        .into_iter()
        .collect();
        let resolver = Resolver::new(&files);

        let empty = ReferenceNode::new("g.ts", "G".into())
            .with_type_arguments(vec![])
            .into_child();
        assert!(matches!(
            resolver.resolve_child(&empty, &Scope::empty()),
            Err(ResolveError::MissingTypeArgument { index: 0, .. })
        ));

        let bare = ChildNode::reference("g.ts", "G");
        assert!(matches!(
            resolver.resolve_child(&bare, &Scope::empty()),
            Err(ResolveError::MissingTypeArguments { .. })
        ));

        let supplied = ReferenceNode::new("g.ts", "G".into())
            .with_type_arguments(vec![string("g.ts")])
            .into_child();
        assert_eq!(
            resolver.resolve_child(&supplied, &Scope::empty()).unwrap(),
            record("g.ts", vec![("value", string("g.ts"))])
        );

        // the generic itself cannot stand alone and is dropped
        let resolved = resolver.resolve_file("g.ts").unwrap().unwrap();
        assert!(resolved.statement("G").is_none());
        assert!(resolved.statement("Plain").is_some());
    }

    #[test]
    fn test_references_keep_declaring_file() {
        let mut c = root(
            "c.ts",
            vec![
                definition("c.ts", "Local", number("c.ts")).into(),
                definition("c.ts", "UsesLocal", ChildNode::reference("c.ts", "Local")).into(),
                definition("c.ts", "UsesImport", ChildNode::reference("c.ts", "C")).into(),
            ],
        );
        c.imports = vec![ImportNode::NamedImport(NamedImport {
            name: "C".into(),
            alias: None,
            file_name: "b.ts".into(),
        })];
        let files: FileMap = [file_a(), file_b(), c].into_iter().collect();
        let resolved = resolve(&files, "c.ts").unwrap().unwrap();

        let ChildNode::Reference(local) = definition_of(&resolved, "UsesLocal").as_ref() else {
            panic!("expected a reference");
        };
        assert_eq!(local.resolved_file_name.as_deref(), Some("c.ts"));

        let ChildNode::Reference(imported) = definition_of(&resolved, "UsesImport").as_ref() else {
            panic!("expected a reference");
        };
        assert_eq!(imported.resolved_file_name.as_deref(), Some("b.ts"));
        assert_eq!(imported.file_name, "c.ts");
    }

    #[test]
    fn test_non_generic_content_resolves_to_itself() {
        let body = record(
            "p.ts",
            vec![
                ("name", string("p.ts")),
                ("tags", ChildNode::array("p.ts", string("p.ts"))),
                (
                    "kind",
                    ChildNode::union(
                        "p.ts",
                        vec![
                            ChildNode::literal("p.ts", LiteralValue::String("a".into())),
                            ChildNode::literal("p.ts", LiteralValue::String("b".into())),
                        ],
                    ),
                ),
            ],
        );
        let colors = EnumerationNode {
            file_name: "p.ts".into(),
            name: "Color".into(),
            doc: None,
            children: vec![EnumerationCase {
                file_name: "p.ts".into(),
                name: "Red".into(),
                doc: None,
                value: CaseValue::String("red".into()),
            }],
        };
        let input = root(
            "p.ts",
            vec![definition("p.ts", "Person", body.clone()).into(), colors.into()],
        );
        let files: FileMap = [input.clone()].into_iter().collect();
        let resolved = resolve(&files, "p.ts").unwrap().unwrap();

        assert_eq!(resolved, input);
        assert!(Arc::ptr_eq(definition_of(&resolved, "Person"), &body));
    }

    #[test]
    fn test_intersection_merges_records_in_order() {
        let merged = ChildNode::intersection(
            "i.ts",
            vec![
                record("i.ts", vec![("a", string("i.ts"))]),
                record("i.ts", vec![("b", number("i.ts"))]),
            ],
        );
        let through_reference = ChildNode::intersection(
            "i.ts",
            vec![
                ChildNode::reference("i.ts", "Base"),
                record("i.ts", vec![("b", number("i.ts"))]),
            ],
        );
        let files: FileMap = [root(
            "i.ts",
            vec![definition("i.ts", "Base", record("i.ts", vec![("a", string("i.ts"))])).into()],
        )]
        .into_iter()
        .collect();
        let resolver = Resolver::new(&files);
        let expected = record("i.ts", vec![("a", string("i.ts")), ("b", number("i.ts"))]);

        assert_eq!(resolver.resolve_child(&merged, &Scope::empty()).unwrap(), expected);
        assert_eq!(
            resolver.resolve_child(&through_reference, &Scope::empty()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_intersection_operand_through_default_import() {
        let a = root(
            "a.ts",
            vec![
                definition("a.ts", "Base", record("a.ts", vec![("a", string("a.ts"))])).into(),
                ExportAssignmentNode::new("a.ts", ChildNode::reference("a.ts", "Base")).into(),
            ],
        );
        let mut b = root(
            "b.ts",
            vec![
                definition(
                    "b.ts",
                    "X",
                    ChildNode::intersection(
                        "b.ts",
                        vec![
                            ChildNode::reference("b.ts", "D"),
                            record("b.ts", vec![("b", number("b.ts"))]),
                        ],
                    ),
                )
                .into(),
            ],
        );
        b.imports = vec![ImportNode::DefaultImport(DefaultImport {
            name: "D".into(),
            file_name: "a.ts".into(),
        })];
        let files: FileMap = [a, b].into_iter().collect();

        let resolved = resolve(&files, "b.ts").unwrap().unwrap();
        let ChildNode::Record(merged) = definition_of(&resolved, "X").as_ref() else {
            panic!("expected the intersection to merge into a record");
        };
        let identifiers: Vec<&str> = merged.members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(identifiers, ["a", "b"]);
    }

    #[test]
    fn test_intersection_rejects_duplicates_and_non_records() {
        let files: FileMap = [root("i.ts", vec![definition("i.ts", "N", number("i.ts")).into()])]
            .into_iter()
            .collect();
        let resolver = Resolver::new(&files);

        let duplicate = ChildNode::intersection(
            "i.ts",
            vec![
                record("i.ts", vec![("a", string("i.ts"))]),
                record("i.ts", vec![("a", string("i.ts"))]),
            ],
        );
        assert_eq!(
            resolver.resolve_child(&duplicate, &Scope::empty()),
            Err(ResolveError::DuplicateMember {
                identifier: "a".into()
            })
        );

        let primitive = ChildNode::intersection(
            "i.ts",
            vec![record("i.ts", vec![("a", string("i.ts"))]), ChildNode::reference("i.ts", "N")],
        );
        assert_eq!(
            resolver.resolve_child(&primitive, &Scope::empty()),
            Err(ResolveError::UnsupportedIntersectionOperand {
                kind: "Token".into()
            })
        );
    }

    #[test]
    fn test_namespace_import_needs_qualified_reference() {
        let ns = root("ns.ts", vec![definition("ns.ts", "Foo", string("ns.ts")).into()]);
        let mut user = root(
            "user.ts",
            vec![
                definition("user.ts", "Qualified", ChildNode::reference("user.ts", "NS.Foo")).into(),
                definition("user.ts", "Bare", ChildNode::reference("user.ts", "Foo")).into(),
            ],
        );
        user.imports = vec![ImportNode::NamespaceImport(NamespaceImport {
            name: "NS".into(),
            file_name: "ns.ts".into(),
        })];
        let files: FileMap = [ns, user].into_iter().collect();

        let resolved = resolve(&files, "user.ts").unwrap().unwrap();
        let ChildNode::Reference(qualified) = definition_of(&resolved, "Qualified").as_ref() else {
            panic!("expected a reference");
        };
        assert_eq!(qualified.resolved_file_name.as_deref(), Some("ns.ts"));
        assert!(resolved.statement("Bare").is_none());
    }

    #[test]
    fn test_nested_instantiations_compose() {
        let pair = definition(
            "g.ts",
            "Pair",
            record(
                "g.ts",
                vec![
                    ("first", ChildNode::reference("g.ts", "L")),
                    ("second", ChildNode::reference("g.ts", "R")),
                ],
            ),
        )
        .with_type_parameters(vec![
            TypeParameterNode::new("g.ts", "L"),
            TypeParameterNode::new("g.ts", "R").with_default(string("g.ts")),
        ]);
        let wrap = definition(
            "g.ts",
            "Wrap",
            record(
                "g.ts",
                vec![(
                    "inner",
                    ReferenceNode::new("g.ts", "Pair".into())
                        .with_type_arguments(vec![ChildNode::reference("g.ts", "T")])
                        .into_child(),
                )],
            ),
        )
        .with_type_parameters(vec![TypeParameterNode::new("g.ts", "T")]);
        let used = definition(
            "g.ts",
            "Used",
            ReferenceNode::new("g.ts", "Wrap".into())
                .with_type_arguments(vec![number("g.ts")])
                .into_child(),
        );
        let files: FileMap = [root("g.ts", vec![pair.into(), wrap.into(), used.into()])]
            .into_iter()
            .collect();

        let resolved = resolve(&files, "g.ts").unwrap().unwrap();
        assert_eq!(
            definition_of(&resolved, "Used"),
            &record(
                "g.ts",
                vec![(
                    "inner",
                    record(
                        "g.ts",
                        vec![("first", number("g.ts")), ("second", string("g.ts"))]
                    )
                )]
            )
        );
    }

    #[test]
    fn test_self_instantiation_hits_depth_limit() {
        let list = definition(
            "l.ts",
            "List",
            record(
                "l.ts",
                vec![(
                    "next",
                    ReferenceNode::new("l.ts", "List".into())
                        .with_type_arguments(vec![ChildNode::reference("l.ts", "T")])
                        .into_child(),
                )],
            ),
        )
        .with_type_parameters(vec![
            TypeParameterNode::new("l.ts", "T").with_default(number("l.ts")),
        ]);
        let files: FileMap = [root("l.ts", vec![list.into()])].into_iter().collect();
        let resolver = Resolver::with_options(
            &files,
            ResolveOptions {
                max_instantiation_depth: 8,
            },
        );

        let error = resolver.resolve_file("l.ts").unwrap_err();
        assert_eq!(
            error,
            ResolveError::InstantiationDepthExceeded {
                name: "List".into(),
                limit: 8,
            }
        );
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_self_referencing_default_hits_depth_limit() {
        // X<T = X<>> = { a: T }
        let x = definition("x.ts", "X", record("x.ts", vec![("a", ChildNode::reference("x.ts", "T"))]))
            .with_type_parameters(vec![TypeParameterNode::new("x.ts", "T").with_default(
                ReferenceNode::new("x.ts", "X".into())
                    .with_type_arguments(vec![])
                    .into_child(),
            )]);
        let files: FileMap = [root(
            "x.ts",
            vec![x.into(), definition("x.ts", "Ok", number("x.ts")).into()],
        )]
        .into_iter()
        .collect();
        let resolver = Resolver::with_options(
            &files,
            ResolveOptions {
                max_instantiation_depth: 8,
            },
        );

        assert_eq!(
            resolver.resolve_file("x.ts").unwrap_err(),
            ResolveError::InstantiationDepthExceeded {
                name: "X".into(),
                limit: 8,
            }
        );

        let bare = ReferenceNode::new("x.ts", "X".into())
            .with_type_arguments(vec![])
            .into_child();
        assert!(matches!(
            resolver.resolve_child(&bare, &Scope::empty()),
            Err(ResolveError::InstantiationDepthExceeded { .. })
        ));
    }

    #[test]
    fn test_failed_declarations_collapse_containers() {
        let group = GroupNode {
            file_name: "x.ts".into(),
            name: "NS".into(),
            doc: None,
            children: vec![definition("x.ts", "Broken", ChildNode::reference("x.ts", "Nowhere")).into()],
        };
        let files: FileMap = [root("x.ts", vec![group.into()])].into_iter().collect();

        assert_eq!(resolve(&files, "x.ts"), Ok(None));
        assert_eq!(
            resolve(&files, "missing.ts"),
            Err(ResolveError::UnknownFile("missing.ts".into()))
        );
    }

    #[test]
    fn test_resolve_all_keeps_file_order() {
        let files: FileMap = [file_a(), file_b()].into_iter().collect();
        let results = resolve_all(&files, ResolveOptions::default());

        let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["a.ts", "b.ts"]);
        assert!(results.iter().all(|(_, result)| matches!(result, Ok(Some(_)))));
    }
}
