//! Naming primitives shared by the IR and the scope builder.

pub mod qualified_name;

pub use qualified_name::QualifiedName;
