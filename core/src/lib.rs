//! Infrastructure shared by the pathcheck tools: configuration, logging, the [tools::Tool]
//! interface, and test helpers.

pub mod config;
pub mod diagnostics;
pub mod test_util;
pub mod tools;

pub use pathcheck_ir as ir;
