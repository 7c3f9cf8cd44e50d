//! The front-end service contract.
//!
//! Lowering never parses or binds names itself. It asks a [`FrontEnd`] for
//! syntax trees and for what a name written in a file refers to.

use crate::syntax::{EntityName, SourceFile, TypeParameterDecl};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontEndError {
    #[error("source file \"{0}\" is not known to the front end")]
    FileNotFound(String),

    #[error("failed to parse \"{path}\": {message}")]
    Syntax { path: String, message: String },
}

/// Declaration form a symbol points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Enum,
    Namespace,
    ExportDefault,
}

/// A bound name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// File containing the declaration.
    pub declaring_file: String,
    /// Path of the declaration inside `declaring_file`, outermost namespace first.
    pub path: Vec<String>,
    pub kind: DeclarationKind,
    /// Whether the name was reached through an import of the referencing file.
    pub via_import: bool,
}

/// What a name finally denotes once aliases and imports are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Object,
    Enumeration,
    Primitive,
    Literal,
    Array,
    Tuple,
    Union,
    /// Depends on type arguments or on constructs the front end does not classify.
    Unknown,
}

/// Parser and binder consumed by lowering. Implementations are read-only.
pub trait FrontEnd: Send + Sync {
    /// The syntax tree of `path`.
    fn parse_file(&self, path: &str) -> Result<Arc<SourceFile>, FrontEndError>;

    /// The file an import specifier written in `from` points at.
    fn resolve_module(&self, from: &str, specifier: &str) -> Option<String>;

    /// The declaration `name`, written in `file`, refers to.
    fn resolve_symbol_at(&self, file: &str, name: &EntityName) -> Option<Symbol>;

    /// Type parameters declared by the symbol's declaration.
    fn type_parameters_of(&self, symbol: &Symbol) -> Vec<TypeParameterDecl>;

    /// The shape of the type `name`, written in `file`, denotes.
    fn type_at_node(&self, file: &str, name: &EntityName) -> Option<TypeShape>;
}
