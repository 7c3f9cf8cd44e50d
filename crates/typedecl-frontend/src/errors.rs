//! Errors raised while lowering syntax trees into the IR.

use crate::service::FrontEndError;
use thiserror::Error;

/// Structural errors. Any of these aborts lowering of the file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LowerError {
    #[error("type literal in `{declaration}` mixes an index signature with other members")]
    MixedIndexMembers { declaration: String },

    #[error("enum case `{enumeration}.{case}` has no initializer")]
    EnumerationWithoutInitializer { enumeration: String, case: String },

    #[error("enum case `{enumeration}.{case}` has a computed initializer `{expression}`")]
    ComputedEnumerationInitializer {
        enumeration: String,
        case: String,
        expression: String,
    },

    #[error("namespace `{name}` has no body")]
    EmptyNamespace { name: String },

    #[error("`{operand}` cannot be an intersection operand")]
    UnsupportedIntersectionOperand { operand: String },

    #[error("unsupported type `{description}`")]
    UnsupportedType { description: String },

    #[error("duplicate member `{identifier}` in `{declaration}`")]
    DuplicateMember {
        declaration: String,
        identifier: String,
    },

    #[error("duplicate type parameter `{parameter}` on `{declaration}`")]
    DuplicateTypeParameter {
        declaration: String,
        parameter: String,
    },

    #[error("cannot resolve module \"{specifier}\"")]
    UnresolvedModule { specifier: String },

    #[error("main declaration `{name}` does not exist")]
    MissingMainDeclaration { name: String },

    #[error(transparent)]
    FrontEnd(#[from] FrontEndError),
}

pub type Result<T> = std::result::Result<T, LowerError>;

/// A [`LowerError`] attached to the file it was raised for.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source} in file {file}")]
pub struct LowerFileError {
    pub file: String,
    pub source: LowerError,
}
