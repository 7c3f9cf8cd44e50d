//! An in-memory [`FrontEnd`] over already parsed syntax trees.
//!
//! Binding follows the declaration dialect's rules: local declarations win
//! over imports, qualified names walk namespaces, and a namespace import only
//! exposes the target file through its qualified form. Re-exports are not
//! followed.

use crate::service::{DeclarationKind, FrontEnd, FrontEndError, Symbol, TypeShape};
use crate::syntax::{
    EntityName, ImportDeclaration, SourceFile, Statement, TypeNode, TypeParameterDecl,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Longest alias/import chain followed by [`FrontEnd::type_at_node`].
const MAX_CHASE: usize = 32;

/// Source extensions tried for extensionless module specifiers.
const CANDIDATE_SUFFIXES: [&str; 4] = ["", ".ts", ".d.ts", "/index.ts"];

#[derive(Debug, Clone, Default)]
pub struct MemoryFrontEnd {
    files: IndexMap<String, Arc<SourceFile>>,
}

impl MemoryFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file under its normalized path.
    pub fn add_file(&mut self, mut file: SourceFile) -> &mut Self {
        file.path = normalize_path(&file.path);
        self.files.insert(file.path.clone(), Arc::new(file));
        self
    }

    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.add_file(file);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(&normalize_path(path)).map(Arc::as_ref)
    }

    /// Bind `segments` against the declarations of `file` only.
    fn resolve_local(&self, file: &SourceFile, segments: &[String]) -> Option<Symbol> {
        let kind = find_declaration(&file.statements, segments)?.0;
        Some(Symbol {
            declaring_file: file.path.clone(),
            path: segments.to_vec(),
            kind,
            via_import: false,
        })
    }

    fn resolve_through_import(
        &self,
        file: &SourceFile,
        import: &ImportDeclaration,
        segments: &[String],
    ) -> Option<Symbol> {
        let (head, rest) = segments.split_first()?;
        let target_path = self.resolve_module(&file.path, &import.specifier)?;
        let target = self.file(&target_path)?;

        let symbol = if import.default.as_deref() == Some(head.as_str()) {
            if !rest.is_empty() {
                return None;
            }
            target
                .statements
                .iter()
                .any(|s| matches!(s, Statement::ExportDefault(_)))
                .then(|| Symbol {
                    declaring_file: target.path.clone(),
                    path: vec!["default".to_string()],
                    kind: DeclarationKind::ExportDefault,
                    via_import: true,
                })
        } else if let Some(spec) = import
            .named
            .iter()
            .find(|s| s.alias.as_deref().unwrap_or(&s.name) == head)
        {
            let mut path = vec![spec.name.clone()];
            path.extend_from_slice(rest);
            self.resolve_local(target, &path)
        } else if import.namespace.as_deref() == Some(head.as_str()) {
            self.resolve_local(target, rest)
        } else {
            None
        }?;

        Some(Symbol {
            via_import: true,
            ..symbol
        })
    }

    fn declaration_of(&self, symbol: &Symbol) -> Option<&Statement> {
        let file = self.file(&symbol.declaring_file)?;
        if symbol.kind == DeclarationKind::ExportDefault {
            return file
                .statements
                .iter()
                .find(|s| matches!(s, Statement::ExportDefault(_)));
        }
        find_declaration(&file.statements, &symbol.path).map(|(_, statement)| statement)
    }

    fn shape_of_name(&self, file: &str, name: &EntityName, depth: usize) -> Option<TypeShape> {
        if depth > MAX_CHASE {
            return Some(TypeShape::Unknown);
        }
        let symbol = self.resolve_symbol_at(file, name)?;
        let shape = match self.declaration_of(&symbol)? {
            Statement::Interface(_) => TypeShape::Object,
            Statement::Enum(_) => TypeShape::Enumeration,
            Statement::TypeAlias(alias) => {
                let parameters: Vec<&str> =
                    alias.type_parameters.iter().map(|p| p.name.as_str()).collect();
                self.shape_of_type(&symbol.declaring_file, &alias.ty, &parameters, depth + 1)
            }
            Statement::ExportDefault(export) => self
                .shape_of_name(&symbol.declaring_file, &export.expression, depth + 1)
                .unwrap_or(TypeShape::Unknown),
            Statement::Module(_) | Statement::Import(_) | Statement::Other { .. } => {
                TypeShape::Unknown
            }
        };
        Some(shape)
    }

    fn shape_of_type(
        &self,
        file: &str,
        ty: &TypeNode,
        parameters: &[&str],
        depth: usize,
    ) -> TypeShape {
        match ty {
            TypeNode::Keyword { .. } => TypeShape::Primitive,
            TypeNode::Literal { .. } => TypeShape::Literal,
            TypeNode::TypeLiteral { .. } | TypeNode::Intersection { .. } => TypeShape::Object,
            TypeNode::Array { .. } => TypeShape::Array,
            TypeNode::Tuple { .. } => TypeShape::Tuple,
            TypeNode::Union { .. } => TypeShape::Union,
            TypeNode::Parenthesized { inner } => self.shape_of_type(file, inner, parameters, depth),
            TypeNode::Reference { name, .. } if parameters.contains(&name.head()) => {
                TypeShape::Unknown
            }
            TypeNode::Reference { name, .. } => self
                .shape_of_name(file, name, depth)
                .unwrap_or(TypeShape::Unknown),
            TypeNode::Other { .. } => TypeShape::Unknown,
        }
    }
}

impl FrontEnd for MemoryFrontEnd {
    fn parse_file(&self, path: &str) -> Result<Arc<SourceFile>, FrontEndError> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| FrontEndError::FileNotFound(path.to_string()))
    }

    fn resolve_module(&self, from: &str, specifier: &str) -> Option<String> {
        let base = if specifier.starts_with("./") || specifier.starts_with("../") {
            match from.rfind('/') {
                Some(i) => normalize_path(&format!("{}/{specifier}", &from[..i])),
                None => normalize_path(specifier),
            }
        } else {
            normalize_path(specifier)
        };

        // ESM style specifiers name the emitted `.js` file
        let stripped = base.strip_suffix(".js");
        CANDIDATE_SUFFIXES
            .iter()
            .flat_map(|suffix| {
                [Some(format!("{base}{suffix}")), stripped.map(|s| format!("{s}{suffix}"))]
            })
            .flatten()
            .find(|candidate| self.files.contains_key(candidate))
    }

    fn resolve_symbol_at(&self, file: &str, name: &EntityName) -> Option<Symbol> {
        let source = self.file(file)?;
        if let Some(symbol) = self.resolve_local(source, &name.segments) {
            return Some(symbol);
        }
        source.statements.iter().find_map(|statement| match statement {
            Statement::Import(import) => self.resolve_through_import(source, import, &name.segments),
            _ => None,
        })
    }

    fn type_parameters_of(&self, symbol: &Symbol) -> Vec<TypeParameterDecl> {
        match self.declaration_of(symbol) {
            Some(Statement::Interface(d)) => d.type_parameters.clone(),
            Some(Statement::TypeAlias(d)) => d.type_parameters.clone(),
            _ => Vec::new(),
        }
    }

    fn type_at_node(&self, file: &str, name: &EntityName) -> Option<TypeShape> {
        self.shape_of_name(file, name, 0)
    }
}

/// Find the declaration named by `segments` among `statements`, walking
/// namespaces for all but the last segment.
fn find_declaration<'s>(
    statements: &'s [Statement],
    segments: &[String],
) -> Option<(DeclarationKind, &'s Statement)> {
    let (head, rest) = segments.split_first()?;
    let statement = statements.iter().find(|s| declared_name(s) == Some(head.as_str()))?;
    match (statement, rest.is_empty()) {
        (Statement::Module(module), false) => find_declaration(module.body.as_deref()?, rest),
        (_, false) => None,
        (Statement::Interface(_), true) => Some((DeclarationKind::Interface, statement)),
        (Statement::TypeAlias(_), true) => Some((DeclarationKind::TypeAlias, statement)),
        (Statement::Enum(_), true) => Some((DeclarationKind::Enum, statement)),
        (Statement::Module(_), true) => Some((DeclarationKind::Namespace, statement)),
        (Statement::ExportDefault(_) | Statement::Import(_) | Statement::Other { .. }, true) => {
            None
        }
    }
}

fn declared_name(statement: &Statement) -> Option<&str> {
    match statement {
        Statement::Interface(d) => Some(&d.name),
        Statement::TypeAlias(d) => Some(&d.name),
        Statement::Enum(d) => Some(&d.name),
        Statement::Module(d) => Some(&d.name),
        Statement::ExportDefault(_) | Statement::Import(_) | Statement::Other { .. } => None,
    }
}

/// Collapse `.` and `..` components of a slash separated path.
fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), None | Some(&"..")) {
                    parts.push("..");
                } else {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if path.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}
