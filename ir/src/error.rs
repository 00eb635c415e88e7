//! Every problem the checker can report about its inputs. These are values, not control flow:
//! stages collect them into an [ErrorList] and hand the whole list back.

use crate::tree::Operator;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Error {
    // Parse errors
    #[error("unrecognized token `{token}` at position {position}")]
    UnrecognizedToken { token: String, position: usize },
    #[error("operator `{op}` at position {position} needs {required} operand(s)")]
    MissingOperand {
        op: Operator,
        required: usize,
        position: usize,
    },
    #[error("expression leaves {count} operands without an operator")]
    ExcessOperands { count: usize },
    #[error("no expression given")]
    EmptyExpression,
    #[error("no text description given")]
    EmptyText,
    #[error("description fragment `{fragment}` matches no known phrase")]
    UnknownTemplate { fragment: String },
    #[error("unbalanced braces in `{fragment}`")]
    UnbalancedBraces { fragment: String },
    #[error("nesting is deeper than the limit of {limit}")]
    NestingTooDeep { limit: usize },
    #[error("expression has {count} tokens, more than the limit of {limit}")]
    TooManyTokens { count: usize, limit: usize },

    // Catalog errors
    #[error("variable `{id}` is not declared")]
    UnknownVariable { id: String },
    #[error("function `{id}` is not declared")]
    UnknownFunction { id: String },
    #[error("variable `{id}` is declared more than once")]
    DuplicateVariable { id: String },
    #[error("function `{id}` is declared more than once")]
    DuplicateFunction { id: String },
    #[error("type `{id}` is declared more than once")]
    DuplicateCustomType { id: String },
    #[error("field `{id}` is declared more than once in `{owner}`")]
    DuplicateField { owner: String, id: String },
    #[error("method `{id}` is declared more than once in `{owner}`")]
    DuplicateMethod { owner: String, id: String },
    #[error("`{id}` is declared both as a variable and as a function")]
    VariableFunctionCollision { id: String },
    #[error("`{id}` is not a valid identifier")]
    InvalidName { id: String },
    #[error("`{id}` is a reserved word")]
    ReservedName { id: String },
    #[error("`{id}` has invalid type `{signature}`: {reason}")]
    InvalidType {
        id: String,
        signature: String,
        reason: String,
    },
    #[error("`{operand}` is not a class, struct or union")]
    NotACustomType { operand: String },
    #[error("`{operand}` is not a pointer to a class, struct or union")]
    NotAPointerToCustomType { operand: String },
    #[error("`{owner}` has no member `{member}`")]
    MissingMember { owner: String, member: String },

    // Semantic errors
    #[error("array access `{operand}` has no integer index")]
    MissingIntegerOperand { operand: String },
    #[error("array access `{operand}` has no array operand")]
    MissingArrayOperand { operand: String },
    #[error("index {index} is out of range for `{array}` of size {extent}")]
    ArrayIndexOutOfRange {
        array: String,
        index: i64,
        extent: usize,
    },
    #[error("operand `{operand}` cannot be resolved")]
    UnknownOperand { operand: String },
    #[error("`{operand}` is not a pointer")]
    NotAPointer { operand: String },
}

/// The errors a stage accumulated in one pass. Never empty when returned as an `Err`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<Error>);

impl ErrorList {
    pub fn new() -> ErrorList {
        ErrorList::default()
    }

    pub fn push(&mut self, error: Error) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    pub fn contains(&self, error: &Error) -> bool {
        self.0.contains(error)
    }

    /// `Ok(value)` if nothing was collected, the errors otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ErrorList> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<Error> for ErrorList {
    fn from(error: Error) -> ErrorList {
        ErrorList(vec![error])
    }
}

impl FromIterator<Error> for ErrorList {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> ErrorList {
        ErrorList(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, error) in self.0.iter().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}
