//! Place to put utilities that are only used by tests.

use crate::config::Config;
use crate::tools::RunContext;
use pathcheck_ir::{CustomKind, CustomType, DataType, FunctionInfo, SymbolCatalog, VariableInfo};
use std::sync::Arc;

/// Returns a new temporary directory. Unlike the defaults in the `tempdir` and `tempfile` crates,
/// this directory is not world-accessible by default.
#[cfg(not(miri))]
pub fn tempdir() -> std::io::Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o700));
    }
    builder.tempdir()
}

/// The catalog the test scenarios are written against:
///
/// ```text
/// arr: int[5]        m: int[3][4]        i: int        f: float
/// p: struct Point    pp: struct Point*   ptr: int*     w: class Window
/// len(): int
/// struct Point { x: int; y: float; norm(): float }
/// class Window { origin: struct Point; area(): int }
/// ```
pub fn sample_catalog() -> SymbolCatalog {
    let point = DataType::Struct("Point".into());
    let variables = vec![
        VariableInfo::new("arr", DataType::array_of(DataType::Int, vec![5])),
        VariableInfo::new("m", DataType::array_of(DataType::Int, vec![3, 4])),
        VariableInfo::new("i", DataType::Int),
        VariableInfo::new("f", DataType::Float),
        VariableInfo::new("p", point.clone()),
        VariableInfo::new("pp", DataType::pointer_to(point.clone())),
        VariableInfo::new("ptr", DataType::pointer_to(DataType::Int)),
        VariableInfo::new("w", DataType::Class("Window".into())),
    ];
    let functions = vec![FunctionInfo::new("len", DataType::Int)];
    let custom_types = vec![
        CustomType::new("Point", CustomKind::Struct)
            .with_field("x", DataType::Int)
            .with_field("y", DataType::Float)
            .with_method("norm", DataType::Float),
        CustomType::new("Window", CustomKind::Class)
            .with_field("origin", point)
            .with_method("area", DataType::Int),
    ];
    SymbolCatalog::from_declarations(variables, functions, custom_types)
        .expect("sample catalog is valid")
}

impl RunContext {
    /// A context over [sample_catalog] and [Config::mock].
    pub fn mock() -> RunContext {
        RunContext::new(Arc::new(sample_catalog()), Arc::new(Config::mock()))
    }
}
