//! Error types for the patchbay data model.
//!
//! This module provides the standardized error type used across all port
//! primitives. Every failure surfaces to the immediate caller; nothing is
//! retried or swallowed internally.

use thiserror::Error;

/// Main error type for the patchbay port primitives.
///
/// This enum covers the failure modes of the data model:
/// - Link resolution failures (dangling or missing input links)
/// - Output lifecycle violations (double resolution within a cycle)
/// - Property type coercion failures
/// - Registry misuse (duplicate node ids)
/// - IO errors (log sink filesystem operations)
#[derive(Error, Debug)]
pub enum PortError {
    /// An input link could not be resolved at read time.
    ///
    /// Raised when `get_input` is called on an unlinked input, when the
    /// linked node id is not known to the lookup, or when the named output
    /// does not exist on the resolved node. This is a configuration error,
    /// not a transient condition.
    ///
    /// # Example
    /// ```
    /// use patchbay::PortError;
    /// let error = PortError::LinkNotFound("input 'rate' has no link".to_string());
    /// assert_eq!(error.to_string(), "link not found: input 'rate' has no link");
    /// ```
    #[error("link not found: {0}")]
    LinkNotFound(String),

    /// An output was set twice without an intervening `clean_output`.
    ///
    /// Indicates a scheduling or ordering bug in the caller; the value from
    /// the first `set_output` is kept.
    #[error("output '{0}' already set in this cycle")]
    AlreadySet(String),

    /// A value could not be coerced to a property's declared type.
    ///
    /// The property keeps its last valid value.
    #[error("cannot coerce {value} to {expected}")]
    Coercion {
        /// Name of the declared target type
        expected: &'static str,
        /// JSON rendering of the rejected value
        value: String,
    },

    /// A deferred handle outlived its production cycle.
    ///
    /// Raised from `Deferred::wait` when the owning output was reset via
    /// `clean_output` (the handle belongs to the previous cycle) or dropped
    /// before resolving.
    #[error("deferred value disconnected: output was reset or dropped before resolving")]
    Disconnected,

    /// A node id was registered twice in a [`NodeRegistry`](crate::NodeRegistry).
    #[error("node '{0}' already registered")]
    DuplicateNode(String),

    /// IO error wrapper
    ///
    /// Wraps filesystem errors from the directory-creating log sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
