//! Lowering - converts front-end syntax trees into the IR
//!
//! One [`RootNode`] is produced per source file. Names are bound through the
//! [`FrontEnd`]; nothing here looks at another file's syntax directly.

use crate::errors::{LowerError, LowerFileError, Result};
use crate::service::{FrontEnd, TypeShape};
use crate::syntax::{
    EntityName, EnumDeclaration, ImportDeclaration, Initializer, InterfaceDeclaration, Keyword,
    LiteralType, ModuleDeclaration, SourceFile, Statement, TypeAliasDeclaration, TypeMember,
    TypeNode, TypeParameterDecl,
};
use indexmap::IndexSet;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};
use typedecl_core::doc::Doc;
use typedecl_core::ir::{
    CaseValue, Child, ChildNode, DefaultImport, DictionaryNode, EnumerationCase, EnumerationNode,
    ExportAssignmentNode, FileMap, GroupNode, ImportNode, LiteralValue, Member, NamedImport,
    NamespaceImport, RecordNode, ReferenceNode, RootNode, StatementNode, TokenKind, TupleNode,
    TypeDefinitionNode, TypeParameterNode,
};
use typedecl_core::naming::QualifiedName;

// ============================================================================
// Entry points
// ============================================================================

/// Parse `path` through the front end and lower it.
pub fn lower(path: &str, front_end: &dyn FrontEnd) -> Result<RootNode> {
    let file = front_end.parse_file(path)?;
    lower_file(&file, front_end)
}

/// Lower an already parsed file.
pub fn lower_file(file: &SourceFile, front_end: &dyn FrontEnd) -> Result<RootNode> {
    let lowerer = Lowerer {
        front_end,
        file: &file.path,
    };
    let mut root = RootNode::new(file.path.as_str());
    root.doc = parse_doc(file.doc.as_deref());

    for statement in &file.statements {
        match statement {
            Statement::Import(import) => root.imports.extend(lowerer.lower_import(import)?),
            other => root.children.extend(lowerer.lower_statement(other)?),
        }
    }

    if let Some(main) = root.main_tag()
        && !root.declares(main)
    {
        return Err(LowerError::MissingMainDeclaration {
            name: main.to_string(),
        });
    }
    Ok(root)
}

/// Lower every file in parallel into a [`FileMap`], keeping the order of
/// `paths`. The first failure in that order is returned with its file.
pub fn lower_all<P>(paths: &[P], front_end: &dyn FrontEnd) -> std::result::Result<FileMap, LowerFileError>
where
    P: AsRef<str> + Sync,
{
    let lowered: Vec<_> = paths
        .par_iter()
        .map(|path| {
            lower(path.as_ref(), front_end).map_err(|source| LowerFileError {
                file: path.as_ref().to_string(),
                source,
            })
        })
        .collect();

    lowered.into_iter().collect()
}

fn parse_doc(raw: Option<&str>) -> Option<Doc> {
    raw.and_then(Doc::parse)
}

// ============================================================================
// Lowerer
// ============================================================================

struct Lowerer<'a> {
    front_end: &'a dyn FrontEnd,
    file: &'a str,
}

impl Lowerer<'_> {
    fn lower_import(&self, import: &ImportDeclaration) -> Result<Vec<ImportNode>> {
        let target = self
            .front_end
            .resolve_module(self.file, &import.specifier)
            .ok_or_else(|| LowerError::UnresolvedModule {
                specifier: import.specifier.clone(),
            })?;

        let mut nodes = Vec::new();
        if let Some(name) = &import.default {
            nodes.push(ImportNode::DefaultImport(DefaultImport {
                name: name.clone(),
                file_name: target.clone(),
            }));
        }
        for specifier in &import.named {
            nodes.push(ImportNode::NamedImport(NamedImport {
                name: specifier.name.clone(),
                alias: specifier.alias.clone(),
                file_name: target.clone(),
            }));
        }
        if let Some(name) = &import.namespace {
            nodes.push(ImportNode::NamespaceImport(NamespaceImport {
                name: name.clone(),
                file_name: target,
            }));
        }
        Ok(nodes)
    }

    /// `None` for statements without an IR form.
    fn lower_statement(&self, statement: &Statement) -> Result<Option<StatementNode>> {
        let node: StatementNode = match statement {
            Statement::Interface(d) => self.lower_interface(d)?.into(),
            Statement::TypeAlias(d) => self.lower_alias(d)?.into(),
            Statement::Enum(d) => self.lower_enum(d)?.into(),
            Statement::Module(d) => self.lower_namespace(d)?.into(),
            Statement::ExportDefault(export) => {
                let expression = self.lower_reference(&export.expression, None, &[])?;
                let mut node = ExportAssignmentNode::new(self.file, expression);
                node.doc = parse_doc(export.doc.as_deref());
                node.into()
            }
            Statement::Import(import) => {
                warn!(
                    "Skipping import of \"{}\" nested in a namespace in {}",
                    import.specifier, self.file
                );
                return Ok(None);
            }
            Statement::Other { description } => {
                warn!("Skipping unsupported statement `{}` in {}", description, self.file);
                return Ok(None);
            }
        };
        Ok(Some(node))
    }

    fn lower_interface(&self, declaration: &InterfaceDeclaration) -> Result<TypeDefinitionNode> {
        let scope = parameter_names(&declaration.name, &declaration.type_parameters)?;
        let definition = self.lower_members(&declaration.name, &declaration.members, &scope)?;
        self.type_definition(
            &declaration.name,
            declaration.doc.as_deref(),
            &declaration.type_parameters,
            &scope,
            definition,
        )
    }

    fn lower_alias(&self, declaration: &TypeAliasDeclaration) -> Result<TypeDefinitionNode> {
        let scope = parameter_names(&declaration.name, &declaration.type_parameters)?;
        let definition = self.lower_type(&declaration.name, &declaration.ty, &scope)?;
        self.type_definition(
            &declaration.name,
            declaration.doc.as_deref(),
            &declaration.type_parameters,
            &scope,
            definition,
        )
    }

    fn type_definition(
        &self,
        name: &str,
        doc: Option<&str>,
        parameters: &[TypeParameterDecl],
        scope: &[&str],
        definition: Child,
    ) -> Result<TypeDefinitionNode> {
        let mut node = TypeDefinitionNode::new(self.file, name, definition);
        node.doc = parse_doc(doc);
        if !parameters.is_empty() {
            let parameters = parameters
                .iter()
                .map(|p| self.lower_type_parameter(name, p, scope))
                .collect::<Result<Vec<_>>>()?;
            node = node.with_type_parameters(parameters);
        }
        Ok(node)
    }

    fn lower_type_parameter(
        &self,
        declaration: &str,
        parameter: &TypeParameterDecl,
        scope: &[&str],
    ) -> Result<TypeParameterNode> {
        let mut node = TypeParameterNode::new(self.file, parameter.name.as_str());
        if let Some(constraint) = &parameter.constraint {
            node = node.with_constraint(self.lower_type(declaration, constraint, scope)?);
        }
        if let Some(default) = &parameter.default {
            node = node.with_default(self.lower_type(declaration, default, scope)?);
        }
        Ok(node)
    }

    fn lower_enum(&self, declaration: &EnumDeclaration) -> Result<EnumerationNode> {
        let children = declaration
            .members
            .iter()
            .map(|member| {
                let value = match &member.initializer {
                    Some(Initializer::String(s)) => CaseValue::String(s.clone()),
                    Some(Initializer::Number(n)) => CaseValue::Number(*n),
                    Some(Initializer::Computed(expression)) => {
                        return Err(LowerError::ComputedEnumerationInitializer {
                            enumeration: declaration.name.clone(),
                            case: member.name.clone(),
                            expression: expression.clone(),
                        });
                    }
                    None => {
                        return Err(LowerError::EnumerationWithoutInitializer {
                            enumeration: declaration.name.clone(),
                            case: member.name.clone(),
                        });
                    }
                };
                Ok(EnumerationCase {
                    file_name: self.file.to_string(),
                    name: member.name.clone(),
                    doc: parse_doc(member.doc.as_deref()),
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EnumerationNode {
            file_name: self.file.to_string(),
            name: declaration.name.clone(),
            doc: parse_doc(declaration.doc.as_deref()),
            children,
        })
    }

    fn lower_namespace(&self, declaration: &ModuleDeclaration) -> Result<GroupNode> {
        let body = declaration
            .body
            .as_ref()
            .ok_or_else(|| LowerError::EmptyNamespace {
                name: declaration.name.clone(),
            })?;

        let mut children = Vec::new();
        for statement in body {
            children.extend(self.lower_statement(statement)?);
        }
        Ok(GroupNode {
            file_name: self.file.to_string(),
            name: declaration.name.clone(),
            doc: parse_doc(declaration.doc.as_deref()),
            children,
        })
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `declaration` names the enclosing declaration for error messages;
    /// `scope` holds its type parameter names.
    fn lower_type(&self, declaration: &str, ty: &TypeNode, scope: &[&str]) -> Result<Child> {
        let node = match ty {
            TypeNode::Keyword { keyword } => {
                let token = match keyword {
                    Keyword::String => TokenKind::String,
                    Keyword::Number => TokenKind::Number,
                    Keyword::Boolean => TokenKind::Boolean,
                    _ => return Err(unsupported(ty)),
                };
                ChildNode::token(self.file, token)
            }
            TypeNode::Literal { literal } => {
                let value = match literal {
                    LiteralType::String(s) => LiteralValue::String(s.clone()),
                    LiteralType::Number(n) => LiteralValue::Number(*n),
                    LiteralType::Boolean(b) => LiteralValue::Boolean(*b),
                    LiteralType::Other(_) => return Err(unsupported(ty)),
                };
                ChildNode::literal(self.file, value)
            }
            TypeNode::TypeLiteral { members } => self.lower_members(declaration, members, scope)?,
            TypeNode::Reference {
                name,
                type_arguments,
            } => {
                let arguments = type_arguments
                    .as_ref()
                    .map(|args| self.lower_types(declaration, args, scope))
                    .transpose()?;
                self.lower_reference(name, arguments, scope)?
            }
            TypeNode::Array { element } => {
                ChildNode::array(self.file, self.lower_type(declaration, element, scope)?)
            }
            TypeNode::Tuple { elements } => Arc::new(ChildNode::Tuple(TupleNode {
                file_name: self.file.to_string(),
                doc: None,
                children: self.lower_types(declaration, elements, scope)?,
            })),
            TypeNode::Union { types } => {
                ChildNode::union(self.file, self.lower_types(declaration, types, scope)?)
            }
            TypeNode::Intersection { types } => {
                for operand in types {
                    self.check_intersection_operand(operand, scope)?;
                }
                ChildNode::intersection(self.file, self.lower_types(declaration, types, scope)?)
            }
            TypeNode::Parenthesized { inner } => self.lower_type(declaration, inner, scope)?,
            TypeNode::Other { .. } => return Err(unsupported(ty)),
        };
        Ok(node)
    }

    fn lower_types(&self, declaration: &str, types: &[TypeNode], scope: &[&str]) -> Result<Vec<Child>> {
        types
            .iter()
            .map(|ty| self.lower_type(declaration, ty, scope))
            .collect()
    }

    /// A structural type: a dictionary when it holds a single index
    /// signature, a record otherwise.
    fn lower_members(&self, declaration: &str, members: &[TypeMember], scope: &[&str]) -> Result<Child> {
        let mut indexes = Vec::new();
        let mut properties = Vec::new();
        for member in members {
            match member {
                TypeMember::Index(index) => indexes.push(index),
                TypeMember::Property(property) => properties.push(property),
                TypeMember::Other { description } => {
                    warn!(
                        "Skipping unsupported member `{}` of {} in {}",
                        description, declaration, self.file
                    );
                }
            }
        }

        match (indexes.as_slice(), properties.is_empty()) {
            ([], _) => {}
            ([index], true) => {
                let doc = parse_doc(index.doc.as_deref());
                let pattern = doc.as_ref().and_then(|d| d.tags.pattern_properties.clone());
                return Ok(Arc::new(ChildNode::Dictionary(DictionaryNode {
                    file_name: self.file.to_string(),
                    doc,
                    children: self.lower_type(declaration, &index.value, scope)?,
                    pattern,
                })));
            }
            _ => {
                return Err(LowerError::MixedIndexMembers {
                    declaration: declaration.to_string(),
                });
            }
        }

        let mut seen = IndexSet::new();
        let mut lowered = Vec::with_capacity(properties.len());
        for property in properties {
            let Some(ty) = &property.ty else {
                warn!(
                    "Skipping member {}.{} without a type annotation in {}",
                    declaration, property.name, self.file
                );
                continue;
            };
            if !seen.insert(property.name.as_str()) {
                return Err(LowerError::DuplicateMember {
                    declaration: declaration.to_string(),
                    identifier: property.name.clone(),
                });
            }
            let mut member = Member::new(
                self.file,
                property.name.as_str(),
                self.lower_type(declaration, ty, scope)?,
            );
            member.doc = parse_doc(property.doc.as_deref());
            member.is_required = !property.optional;
            member.is_read_only = property.readonly;
            lowered.push(member);
        }

        Ok(Arc::new(ChildNode::Record(RecordNode {
            file_name: self.file.to_string(),
            doc: None,
            members: lowered,
        })))
    }

    fn lower_reference(
        &self,
        name: &EntityName,
        type_arguments: Option<Vec<Child>>,
        scope: &[&str],
    ) -> Result<Child> {
        let qualified = QualifiedName::from_segments(name.segments.iter().cloned()).ok_or_else(|| {
            LowerError::UnsupportedType {
                description: "empty type name".to_string(),
            }
        })?;
        let mut reference = ReferenceNode::new(self.file, qualified);
        if let Some(arguments) = type_arguments {
            reference = reference.with_type_arguments(arguments);
        }

        if !name.is_qualified() && scope.contains(&name.head()) {
            return Ok(reference.into_child());
        }
        match self.front_end.resolve_symbol_at(self.file, name) {
            Some(symbol) if symbol.via_import => {
                reference = reference.with_resolved_file_name(symbol.declaring_file);
            }
            Some(_) => {}
            None => debug!("Name `{}` is not bound in {}", name, self.file),
        }
        Ok(reference.into_child())
    }

    fn check_intersection_operand(&self, operand: &TypeNode, scope: &[&str]) -> Result<()> {
        match operand {
            TypeNode::TypeLiteral { .. } | TypeNode::Intersection { .. } => Ok(()),
            TypeNode::Parenthesized { inner } => self.check_intersection_operand(inner, scope),
            TypeNode::Reference { name, .. } if !name.is_qualified() && scope.contains(&name.head()) => {
                Ok(())
            }
            TypeNode::Reference {
                name,
                type_arguments,
            } => {
                let shape = self.front_end.type_at_node(self.file, name);
                if matches!(shape, Some(TypeShape::Enumeration | TypeShape::Primitive)) {
                    return Err(unsupported_operand(operand));
                }
                if type_arguments.is_none()
                    && let Some(symbol) = self.front_end.resolve_symbol_at(self.file, name)
                    && self
                        .front_end
                        .type_parameters_of(&symbol)
                        .iter()
                        .any(|p| p.default.is_none())
                {
                    return Err(unsupported_operand(operand));
                }
                Ok(())
            }
            _ => Err(unsupported_operand(operand)),
        }
    }
}

/// Names of a declaration's type parameters, rejecting duplicates.
fn parameter_names<'p>(declaration: &str, parameters: &'p [TypeParameterDecl]) -> Result<Vec<&'p str>> {
    let mut names = IndexSet::new();
    for parameter in parameters {
        if !names.insert(parameter.name.as_str()) {
            return Err(LowerError::DuplicateTypeParameter {
                declaration: declaration.to_string(),
                parameter: parameter.name.clone(),
            });
        }
    }
    Ok(names.into_iter().collect())
}

fn unsupported(ty: &TypeNode) -> LowerError {
    LowerError::UnsupportedType {
        description: ty.describe(),
    }
}

fn unsupported_operand(ty: &TypeNode) -> LowerError {
    LowerError::UnsupportedIntersectionOperand {
        operand: ty.describe(),
    }
}
