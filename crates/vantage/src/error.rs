//! Error types for view population.
//!
//! Every error is local and fatal to the operation that raised it: a failed
//! call commits no partial state, and the view remains exactly as it was
//! before the call.

use thiserror::Error;

use vantage_core::model::{ElementType, ModelError};

/// The main error type for view population operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The candidate element violates the view kind's scoping rule.
    ///
    /// The message names the rejected element and the constraint it violated.
    #[error("{0}")]
    InvalidScope(String),

    /// No relationship exists in the model between the two elements, in that
    /// direction. Views visualize model relationships; they never invent one.
    #[error("a relationship between {src} and {destination} does not exist in the model")]
    MissingRelationship { src: String, destination: String },

    /// The given id does not resolve to any element in the model.
    #[error("no element with id {id} exists in the model")]
    UnknownElement { id: String },

    /// The id resolved to an element of the wrong kind for the operation.
    #[error("{name} is a {found}, expected a {expected}")]
    ElementKind {
        name: String,
        found: ElementType,
        expected: ElementType,
    },

    /// A view with the same key already exists in the view set.
    #[error("a view with key \"{key}\" already exists")]
    DuplicateViewKey { key: String },

    /// The operation does not apply to this kind of view.
    #[error("{operation} is not supported by a {kind} view")]
    Unsupported {
        operation: &'static str,
        kind: &'static str,
    },

    /// An underlying model query failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}
