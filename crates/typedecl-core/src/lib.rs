//! Core of typedecl: the IR produced by lowering, the per-file scope builder
//! and the resolution engine that specializes generics and ties references to
//! their declaring files.

pub mod doc;
pub mod error;
pub mod ignore;
pub mod ir;
pub mod naming;
pub mod references;
pub mod resolve;
pub mod scope;

pub use error::{ResolveError, Result};
pub use resolve::{ResolveOptions, Resolver, resolve, resolve_all};
pub use scope::{Lookup, Scope, ScopeEntry, ScopeKind};
