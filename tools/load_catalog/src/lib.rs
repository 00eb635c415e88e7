//! Loads the symbol catalog from its declaration document.
//!
//! The document is JSON with five optional top-level lists:
//!
//! ```json
//! {
//!     "variables": [{ "name": "arr", "type": "int[5]" }],
//!     "functions": [{ "name": "len", "type": "int" }],
//!     "structs": [{
//!         "name": "Point",
//!         "fields": [{ "name": "x", "type": "int" }],
//!         "methods": [{ "name": "norm", "type": "float" }]
//!     }],
//!     "classes": [],
//!     "unions": []
//! }
//! ```
//!
//! Declarations were historically kept in an XML file; that format is not read here, and
//! existing declaration files need converting to the JSON shape above.
//!
//! Every declared name is checked lexically and every type signature is parsed before the catalog
//! is built; all problems found are returned together.

mod keywords;

use pathcheck_ir::{
    CustomKind, CustomType, DataType, Error, ErrorList, FunctionInfo, SymbolCatalog, VariableInfo,
};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid declarations:\n{0}")]
    Invalid(ErrorList),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Document {
    variables: Vec<Declaration>,
    functions: Vec<Declaration>,
    structs: Vec<CustomDeclaration>,
    classes: Vec<CustomDeclaration>,
    unions: Vec<CustomDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Declaration {
    name: String,
    #[serde(rename = "type")]
    signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CustomDeclaration {
    name: String,
    #[serde(default)]
    fields: Vec<Declaration>,
    #[serde(default)]
    methods: Vec<Declaration>,
}

/// Reads and validates the declaration document at `path`.
pub fn load_catalog(path: &Path) -> Result<SymbolCatalog, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&text)?;
    info!("Loaded symbol catalog from {}", path.display());
    Ok(catalog)
}

/// Validates an in-memory declaration document.
pub fn parse_catalog(text: &str) -> Result<SymbolCatalog, LoadError> {
    let document: Document = serde_json::from_str(text)?;
    let mut errors = ErrorList::new();

    let variables = convert_all(&document.variables, &mut errors, VariableInfo::new);
    let functions = convert_all(&document.functions, &mut errors, FunctionInfo::new);
    let custom_types = [
        (CustomKind::Struct, &document.structs),
        (CustomKind::Class, &document.classes),
        (CustomKind::Union, &document.unions),
    ]
    .into_iter()
    .flat_map(|(kind, declarations)| declarations.iter().map(move |decl| (kind, decl)))
    .map(|(kind, decl)| {
        check_name(&decl.name, &mut errors);
        let mut custom = CustomType::new(decl.name.clone(), kind);
        custom.fields = convert_all(&decl.fields, &mut errors, VariableInfo::new);
        custom.methods = convert_all(&decl.methods, &mut errors, FunctionInfo::new);
        custom
    })
    .collect::<Vec<_>>();

    // Uniqueness is only meaningful once every entry is well formed.
    if !errors.is_empty() {
        debug!("Rejecting catalog with {} lexical errors", errors.len());
        return Err(LoadError::Invalid(errors));
    }
    SymbolCatalog::from_declarations(variables, functions, custom_types).map_err(LoadError::Invalid)
}

/// Checks and converts every well-formed declaration, recording errors for the rest.
fn convert_all<T>(
    declarations: &[Declaration],
    errors: &mut ErrorList,
    make: impl Fn(String, DataType) -> T,
) -> Vec<T> {
    declarations
        .iter()
        .filter_map(|decl| {
            let name_ok = check_name(&decl.name, errors);
            let typ = match decl.signature.parse::<DataType>() {
                Ok(typ) => Some(typ),
                Err(reason) => {
                    errors.push(Error::InvalidType {
                        id: decl.name.clone(),
                        signature: decl.signature.clone(),
                        reason: reason.to_string(),
                    });
                    None
                }
            };
            match (name_ok, typ) {
                (true, Some(typ)) => Some(make(decl.name.clone(), typ)),
                _ => None,
            }
        })
        .collect()
}

fn check_name(name: &str, errors: &mut ErrorList) -> bool {
    if !IDENTIFIER.is_match(name) {
        errors.push(Error::InvalidName { id: name.into() });
        false
    } else if keywords::is_keyword(name) {
        errors.push(Error::ReservedName { id: name.into() });
        false
    } else {
        true
    }
}
