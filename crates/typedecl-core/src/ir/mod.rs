//! The typedecl intermediate representation.
//!
//! One [`RootNode`] is built per source file. Declarations are
//! [`StatementNode`]s and type expressions are [`ChildNode`]s; type links are
//! shared [`Child`] pointers so a rewritten tree can reuse untouched subtrees.
//! Every node records the file that declared it.

pub mod child;
pub mod file_map;
pub mod root;
pub mod statement;

pub use child::{
    ArrayNode, Child, ChildNode, DictionaryNode, IntersectionNode, LiteralNode, LiteralValue,
    Member, RecordNode, ReferenceNode, TokenKind, TokenNode, TupleNode, UnionNode,
};
pub use file_map::FileMap;
pub use root::{DefaultImport, ImportNode, NamedImport, NamespaceImport, RootNode};
pub use statement::{
    CaseValue, EnumerationCase, EnumerationNode, ExportAssignmentNode, GroupNode, StatementNode,
    TypeDefinitionNode, TypeParameterNode,
};
