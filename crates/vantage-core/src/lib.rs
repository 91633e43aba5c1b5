//! Vantage core - the architecture model underlying Vantage views.
//!
//! This crate holds the building blocks shared by every view kind: interned
//! identifiers and the architecture model itself (people, software systems,
//! containers, components, deployment nodes, container instances, and the
//! directed relationships between them).
//!
//! The model is a plain in-memory graph. It exposes the query surface that
//! the view engine in the `vantage` crate builds on: existence and direction
//! of relationships, parent/child containment, and iteration over elements
//! in insertion order.

pub mod identifier;
pub mod model;

pub use identifier::Id;
pub use model::{
    Element, ElementKind, ElementType, Model, ModelError, Relationship, RelationshipId,
};
