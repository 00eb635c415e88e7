/*
 *  Declared types of catalog entries, and the parser for the type
 *  signature strings found in declaration documents.
 *
 *  Grammar:   base '*'* ('[' extent ']')*
 *             base := void | int | float | (class|struct|union) NAME
 *
 *  Pointers bind to the base; brackets wrap the (possibly pointer) base
 *  in a single array type carrying every extent, outermost first.
 */

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomKind {
    Class,
    Struct,
    Union,
}

impl CustomKind {
    pub fn keyword(self) -> &'static str {
        match self {
            CustomKind::Class => "class",
            CustomKind::Struct => "struct",
            CustomKind::Union => "union",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Void,
    Int,
    Float,
    Pointer(Box<DataType>),
    // extents are outermost first; never empty
    Array(Box<DataType>, Vec<usize>),
    Class(String),
    Struct(String),
    Union(String),
}

impl DataType {
    pub fn pointer_to(pointee: DataType) -> DataType {
        DataType::Pointer(Box::new(pointee))
    }

    pub fn array_of(element: DataType, extents: Vec<usize>) -> DataType {
        debug_assert!(!extents.is_empty());
        DataType::Array(Box::new(element), extents)
    }

    pub fn custom(kind: CustomKind, name: impl Into<String>) -> DataType {
        let name = name.into();
        match kind {
            CustomKind::Class => DataType::Class(name),
            CustomKind::Struct => DataType::Struct(name),
            CustomKind::Union => DataType::Union(name),
        }
    }

    /// Name of the class/struct/union this type refers to, if it is one.
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            DataType::Class(name) | DataType::Struct(name) | DataType::Union(name) => Some(name),
            _ => None,
        }
    }

    /// Name of the custom type this pointer points at, if it is a pointer to a custom type.
    pub fn pointee_custom_name(&self) -> Option<&str> {
        match self {
            DataType::Pointer(pointee) => pointee.custom_name(),
            _ => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, DataType::Int)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float)
    }

    /// True for arrays and pointers, i.e. anything that can stand on the left of `[]`.
    pub fn is_indexable(&self) -> bool {
        matches!(self, DataType::Array(..) | DataType::Pointer(_))
    }

    /// Extent of the outermost array dimension. `None` for pointers and scalars.
    pub fn first_extent(&self) -> Option<usize> {
        match self {
            DataType::Array(_, extents) => extents.first().copied(),
            _ => None,
        }
    }

    /// Type produced by indexing (or dereferencing) a value of this type once.
    pub fn indexed(&self) -> Option<DataType> {
        match self {
            DataType::Pointer(pointee) => Some((**pointee).clone()),
            DataType::Array(element, extents) if extents.len() > 1 => {
                Some(DataType::Array(element.clone(), extents[1..].to_vec()))
            }
            DataType::Array(element, _) => Some((**element).clone()),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Void => write!(f, "void"),
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Pointer(pointee) => write!(f, "{pointee}*"),
            DataType::Array(element, extents) => {
                write!(f, "{element}")?;
                extents.iter().try_for_each(|n| write!(f, "[{n}]"))
            }
            DataType::Class(name) => write!(f, "class {name}"),
            DataType::Struct(name) => write!(f, "struct {name}"),
            DataType::Union(name) => write!(f, "union {name}"),
        }
    }
}

/// An error returned from parsing a type signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("empty type signature")]
    Empty,
    #[error("unknown base type `{0}`")]
    UnknownBase(String),
    #[error("`{0}` needs a type name")]
    MissingTypeName(&'static str),
    #[error("invalid array extent `{0}`")]
    InvalidExtent(String),
    #[error("unexpected `{0}`")]
    Trailing(String),
}

impl FromStr for DataType {
    type Err = TypeParseError;

    fn from_str(signature: &str) -> Result<DataType, TypeParseError> {
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(TypeParseError::Empty);
        }
        // Split off the base (everything before the first '*' or '[').
        let split = signature.find(['*', '[']).unwrap_or(signature.len());
        let (base, mut rest) = signature.split_at(split);
        let mut words = base.split_whitespace();
        let mut typ = match (words.next(), words.next()) {
            (Some("void"), None) => DataType::Void,
            (Some("int"), None) => DataType::Int,
            (Some("float"), None) => DataType::Float,
            (Some(keyword @ ("class" | "struct" | "union")), name) => {
                let kind = match keyword {
                    "class" => CustomKind::Class,
                    "struct" => CustomKind::Struct,
                    _ => CustomKind::Union,
                };
                let name = name.ok_or(TypeParseError::MissingTypeName(kind.keyword()))?;
                DataType::custom(kind, name)
            }
            (Some("void" | "int" | "float"), Some(extra)) => {
                return Err(TypeParseError::Trailing(extra.to_string()));
            }
            (Some(other), _) => return Err(TypeParseError::UnknownBase(other.to_string())),
            (None, _) => return Err(TypeParseError::Empty),
        };
        if let Some(extra) = words.next() {
            return Err(TypeParseError::Trailing(extra.to_string()));
        }

        rest = rest.trim_start();
        while let Some(after) = rest.strip_prefix('*') {
            typ = DataType::pointer_to(typ);
            rest = after.trim_start();
        }

        let mut extents = Vec::new();
        while let Some(after) = rest.strip_prefix('[') {
            let Some((extent, after)) = after.split_once(']') else {
                return Err(TypeParseError::InvalidExtent(after.to_string()));
            };
            let extent = extent.trim();
            extents.push(
                extent
                    .parse::<usize>()
                    .map_err(|_| TypeParseError::InvalidExtent(extent.to_string()))?,
            );
            rest = after.trim_start();
        }
        if !rest.is_empty() {
            return Err(TypeParseError::Trailing(rest.to_string()));
        }
        if !extents.is_empty() {
            typ = DataType::array_of(typ, extents);
        }
        Ok(typ)
    }
}
