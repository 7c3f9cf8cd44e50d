//! Front-end side of typedecl.
//!
//! A [`FrontEnd`] hands out syntax trees and answers name-binding questions;
//! [`lower()`] turns those trees into the IR defined in `typedecl_core`.
//! [`MemoryFrontEnd`] serves trees built in memory or loaded from JSON.

pub mod errors;
pub mod lower;
pub mod memory;
pub mod service;
pub mod syntax;

pub use errors::{LowerError, LowerFileError, Result};
pub use lower::{lower, lower_all, lower_file};
pub use memory::MemoryFrontEnd;
pub use service::{DeclarationKind, FrontEnd, FrontEndError, Symbol, TypeShape};
pub use syntax::SourceFile;
