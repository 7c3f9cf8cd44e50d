//! Errors raised while resolving the IR.

use thiserror::Error;

/// Result type alias for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failure to resolve a node.
///
/// Most variants only invalidate the declaration they occur in; a `Group` or
/// root drops such declarations and carries on. See [`ResolveError::is_recoverable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("file \"{0}\" is not part of the file map")]
    UnknownFile(String),

    #[error("\"{name}\" could not be resolved from file \"{file}\"")]
    UnresolvedName { name: String, file: String },

    #[error("\"{name}\" expects at most {expected} type argument(s) but {found} were provided")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "type argument {index} is missing for type parameter \"{parameter}\" of \"{name}\" and no default value is provided"
    )]
    MissingTypeArgument {
        name: String,
        parameter: String,
        index: usize,
    },

    #[error("\"{name}\" is generic and requires type arguments for: {parameters}")]
    MissingTypeArguments { name: String, parameters: String },

    #[error("\"{name}\" declares type parameters without defaults and cannot be resolved on its own")]
    RequiresTypeArguments { name: String },

    #[error("property \"{identifier}\" has been provided in multiple types of the intersection")]
    DuplicateMember { identifier: String },

    #[error("an intersection operand of kind {kind} cannot be merged into a record")]
    UnsupportedIntersectionOperand { kind: String },

    #[error("instantiation depth limit of {limit} exceeded while resolving \"{name}\"")]
    InstantiationDepthExceeded { name: String, limit: usize },
}

impl ResolveError {
    /// Whether an enclosing `Group` or root may drop the failing declaration
    /// instead of failing as a whole.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ResolveError::UnknownFile(_) | ResolveError::InstantiationDepthExceeded { .. }
        )
    }
}
