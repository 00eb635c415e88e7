/*
 *  This file contains the symbol catalog: the declared variables,
 *  functions and custom (class/struct/union) types an expression may
 *  refer to.
 *
 *  - Declarations come from an external loader as plain lists; the
 *    catalog validates them while indexing them by id.
 *  - Validation never stops at the first problem. Every duplicate or
 *    collision is reported, nothing is silently merged.
 *  - Lookup helpers and type resolution live in `support.rs`.
 */

pub mod support;

use crate::data_type::{CustomKind, DataType};
use crate::error::{Error, ErrorList};
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub id: String,
    pub typ: DataType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    pub id: String,
    pub return_type: DataType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomType {
    pub id: String,
    pub kind: CustomKind,
    pub fields: Vec<VariableInfo>,
    pub methods: Vec<FunctionInfo>,
}

/// Whether a member name refers to a field, a method, or (in a type that reuses the name) both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Both,
}

#[derive(Debug, Default)]
pub struct SymbolCatalog {
    variables: HashMap<String, VariableInfo>,
    functions: HashMap<String, FunctionInfo>,
    custom_types: HashMap<String, CustomType>,
}

/*
 *
 *  Constructors
 *
 */

impl VariableInfo {
    pub fn new(id: impl Into<String>, typ: DataType) -> Self {
        Self { id: id.into(), typ }
    }
}

impl FunctionInfo {
    pub fn new(id: impl Into<String>, return_type: DataType) -> Self {
        Self {
            id: id.into(),
            return_type,
        }
    }
}

impl CustomType {
    pub fn new(id: impl Into<String>, kind: CustomKind) -> Self {
        Self {
            id: id.into(),
            kind,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_field(mut self, id: impl Into<String>, typ: DataType) -> Self {
        self.fields.push(VariableInfo::new(id, typ));
        self
    }

    pub fn with_method(mut self, id: impl Into<String>, return_type: DataType) -> Self {
        self.methods.push(FunctionInfo::new(id, return_type));
        self
    }
}

impl SymbolCatalog {
    /// Indexes the declarations by id, reporting every duplicate declaration and every
    /// variable/function name collision.
    pub fn from_declarations(
        variables: Vec<VariableInfo>,
        functions: Vec<FunctionInfo>,
        custom_types: Vec<CustomType>,
    ) -> Result<SymbolCatalog, ErrorList> {
        let mut errors = ErrorList::new();
        let mut catalog = SymbolCatalog::default();

        for var in variables {
            if catalog.variables.contains_key(&var.id) {
                errors.push(Error::DuplicateVariable { id: var.id });
                continue;
            }
            catalog.variables.insert(var.id.clone(), var);
        }
        for func in functions {
            if catalog.functions.contains_key(&func.id) {
                errors.push(Error::DuplicateFunction { id: func.id });
                continue;
            }
            if catalog.variables.contains_key(&func.id) {
                errors.push(Error::VariableFunctionCollision {
                    id: func.id.clone(),
                });
            }
            catalog.functions.insert(func.id.clone(), func);
        }
        for custom in custom_types {
            if catalog.custom_types.contains_key(&custom.id) {
                errors.push(Error::DuplicateCustomType { id: custom.id });
                continue;
            }
            validate_members_disjoint(&custom, &mut errors);
            catalog.custom_types.insert(custom.id.clone(), custom);
        }

        debug!(
            "Catalog has {} variables, {} functions, {} custom types",
            catalog.variables.len(),
            catalog.functions.len(),
            catalog.custom_types.len()
        );
        errors.into_result(catalog)
    }
}

/*
 *
 *  Data Structure Validation / Invariants
 *
 */

fn validate_members_disjoint(custom: &CustomType, errors: &mut ErrorList) {
    let mut field_names = HashSet::new();
    for field in &custom.fields {
        if !field_names.insert(field.id.as_str()) {
            errors.push(Error::DuplicateField {
                owner: custom.id.clone(),
                id: field.id.clone(),
            });
        }
    }
    let mut method_names = HashSet::new();
    for method in &custom.methods {
        if !method_names.insert(method.id.as_str()) {
            errors.push(Error::DuplicateMethod {
                owner: custom.id.clone(),
                id: method.id.clone(),
            });
        }
    }
}
