//! Error types for Canopy.
//!
//! Uses `thiserror` for error definitions. Node store invariant violations
//! are surfaced as hard errors; user-facing inputs (names, search text)
//! degrade instead of failing, except for query diagnostics which are
//! reported through [`ErrorKind::InvalidQuery`].

use std::fmt;

use thiserror::Error;

use crate::handle::NodeHandle;

/// Result alias used across Canopy.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Canopy operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Tags this error with the operation that raised it.
    #[must_use]
    pub fn in_operation(self, operation: &'static str) -> Self {
        let context = self.context.clone().unwrap_or_default();
        self.with_context(context.with_operation(operation))
    }

    /// Creates an invalid handle error (operation on the reserved root).
    #[must_use]
    pub fn invalid_handle(handle: NodeHandle) -> Self {
        Self::new(ErrorKind::InvalidHandle(handle))
    }

    /// Creates a node not found error.
    #[must_use]
    pub fn not_found(handle: NodeHandle) -> Self {
        Self::new(ErrorKind::NotFound(handle))
    }

    /// Creates a parent not found error.
    #[must_use]
    pub fn parent_not_found(handle: NodeHandle) -> Self {
        Self::new(ErrorKind::ParentNotFound(handle))
    }

    /// Creates a duplicate node error.
    #[must_use]
    pub fn already_exists(handle: NodeHandle) -> Self {
        Self::new(ErrorKind::AlreadyExists(handle))
    }

    /// Creates a self parenting error.
    #[must_use]
    pub fn self_parenting(handle: NodeHandle) -> Self {
        Self::new(ErrorKind::SelfParenting(handle))
    }

    /// Creates a cycle error: `parent` lies inside the subtree of `node`.
    #[must_use]
    pub fn cycle_detected(node: NodeHandle, parent: NodeHandle) -> Self {
        Self::new(ErrorKind::CycleDetected { node, parent })
    }

    /// Creates an invalid query error.
    #[must_use]
    pub fn invalid_query(token: impl Into<String>, reason: QueryErrorReason) -> Self {
        Self::new(ErrorKind::InvalidQuery {
            token: token.into(),
            reason,
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Operation attempted on the reserved root where it is not allowed.
    #[error("invalid handle: {0:?}")]
    InvalidHandle(NodeHandle),

    /// Referenced node does not exist.
    #[error("node not found: {0:?}")]
    NotFound(NodeHandle),

    /// Requested parent does not exist.
    #[error("parent not found: {0:?}")]
    ParentNotFound(NodeHandle),

    /// Node is already present.
    #[error("node already exists: {0:?}")]
    AlreadyExists(NodeHandle),

    /// Node was set as its own parent.
    #[error("node cannot be its own parent: {0:?}")]
    SelfParenting(NodeHandle),

    /// New parent lies inside the moved node's subtree.
    #[error("reparenting {node:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// The node being moved.
        node: NodeHandle,
        /// The rejected parent.
        parent: NodeHandle,
    },

    /// Component filter could not be turned into a query.
    #[error("invalid query at '{token}': {reason}")]
    InvalidQuery {
        /// The offending token as typed.
        token: String,
        /// Why it was rejected.
        reason: QueryErrorReason,
    },
}

/// Why a component filter token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorReason {
    /// The type name does not resolve to a known component.
    UnknownComponent,
    /// Negated filters (`c=!Type`) are not supported.
    NegationUnsupported,
    /// The filter has no type name (`c=`).
    MissingTypeName,
}

impl fmt::Display for QueryErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent => f.write_str("unknown component type"),
            Self::NegationUnsupported => f.write_str("negated component filters are not supported"),
            Self::MissingTypeName => f.write_str("missing component type name"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The store or builder operation that failed.
    pub operation: Option<&'static str>,
    /// Extra detail such as the integration step.
    pub detail: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets a free-form detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(detail) = &self.detail {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "({detail})")?;
        }
        Ok(())
    }
}
