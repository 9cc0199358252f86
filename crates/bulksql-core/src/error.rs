//! Error types for bulk statement generation.

use crate::dialect::{ConflictPolicy, DatabaseEngine};
use std::fmt;

/// The primary error type for all bulksql operations.
#[derive(Debug)]
pub enum Error {
    /// A caller argument was rejected before any SQL text was built
    InvalidArgument(ArgumentError),
    /// A column could be resolved neither from the row nor from a calculated value
    UnknownColumn(ColumnError),
    /// A caller-supplied calculated value function failed
    Calculated(CalculatedError),
    /// The same parameter name was bound twice in one statement
    DuplicateParameter(String),
    /// The requested conflict policy has no clause for this engine (strict mode)
    UnsupportedConflictPolicy {
        engine: DatabaseEngine,
        policy: ConflictPolicy,
    },
    /// Errors reported by an executor while running a generated batch
    Execution(ExecutionError),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    /// Name of the offending argument (`table`, `columns`, ...)
    pub argument: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnError {
    pub column: String,
    /// Index of the row being resolved, when known
    pub row: Option<usize>,
}

#[derive(Debug)]
pub struct CalculatedError {
    pub column: String,
    /// Index of the row being resolved, when known
    pub row: Option<usize>,
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug)]
pub struct ExecutionError {
    pub message: String,
    pub sql: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Shorthand for an [`Error::InvalidArgument`].
    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument(ArgumentError {
            argument,
            message: message.into(),
        })
    }

    /// Shorthand for an [`Error::UnknownColumn`] without row information.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Error::UnknownColumn(ColumnError {
            column: column.into(),
            row: None,
        })
    }

    /// Was the call rejected during argument validation?
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_) | Error::UnsupportedConflictPolicy { .. }
        )
    }

    /// The column this error is about, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Error::UnknownColumn(e) => Some(&e.column),
            Error::Calculated(e) => Some(&e.column),
            _ => None,
        }
    }

    /// Attach the row index to a column or calculated-value error raised by
    /// a lower layer. An index already present is kept.
    #[must_use]
    pub fn at_row(self, row: usize) -> Self {
        match self {
            Error::UnknownColumn(mut e) => {
                e.row.get_or_insert(row);
                Error::UnknownColumn(e)
            }
            Error::Calculated(mut e) => {
                e.row.get_or_insert(row);
                Error::Calculated(e)
            }
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            Error::UnknownColumn(e) => write!(f, "Unknown column: {}", e),
            Error::Calculated(e) => write!(f, "Calculated value error: {}", e),
            Error::DuplicateParameter(name) => {
                write!(f, "Parameter '{}' is already bound in this statement", name)
            }
            Error::UnsupportedConflictPolicy { engine, policy } => write!(
                f,
                "Conflict policy {:?} is not supported for {}",
                policy, engine
            ),
            Error::Execution(e) => write!(f, "Execution error: {}", e),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Calculated(e) => Some(e.source.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Execution(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.argument, self.message)
    }
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(
                f,
                "no field or calculated value for '{}' (row {})",
                self.column, row
            ),
            None => write!(f, "no field or calculated value for '{}'", self.column),
        }
    }
}

impl fmt::Display for CalculatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "column '{}' (row {}): {}", self.column, row, self.source),
            None => write!(f, "column '{}': {}", self.column, self.source),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ArgumentError> for Error {
    fn from(err: ArgumentError) -> Self {
        Error::InvalidArgument(err)
    }
}

impl From<ColumnError> for Error {
    fn from(err: ColumnError) -> Self {
        Error::UnknownColumn(err)
    }
}

impl From<CalculatedError> for Error {
    fn from(err: CalculatedError) -> Self {
        Error::Calculated(err)
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        Error::Execution(err)
    }
}

/// Result type alias for bulksql operations.
pub type Result<T> = std::result::Result<T, Error>;
