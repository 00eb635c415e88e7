//! Shared data model for pathcheck: declared types, the symbol catalog, access-path trees, their
//! infix rendering, and the error taxonomy every stage reports with.

pub mod catalog;
pub mod data_type;
pub mod error;
pub mod render;
pub mod tree;

pub use catalog::{CustomType, FunctionInfo, MemberKind, SymbolCatalog, VariableInfo};
pub use data_type::{CustomKind, DataType, TypeParseError};
pub use error::{Error, ErrorList};
pub use tree::{Arity, Operator, TreeNode};
