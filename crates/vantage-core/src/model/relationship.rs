//! Relationship types for the architecture model.

use std::fmt;

use crate::identifier::Id;

/// Stable handle to a relationship within its model.
///
/// Handles are plain indices into the owning model's relationship list and
/// are only meaningful for the model that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationshipId(pub(crate) usize);

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed relationship between two elements of the model.
///
/// Relationships carry an optional description and technology string.
/// Several relationships may exist between the same pair of elements,
/// distinguished by description.
#[derive(Debug, Clone)]
pub struct Relationship {
    id: RelationshipId,
    source: Id,
    destination: Id,
    description: Option<String>,
    technology: Option<String>,
}

impl Relationship {
    /// Creates a new relationship. Only the model constructs relationships.
    pub(crate) fn new(
        id: RelationshipId,
        source: Id,
        destination: Id,
        description: Option<String>,
        technology: Option<String>,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            description,
            technology,
        }
    }

    /// Get the handle of this relationship within its model.
    pub fn id(&self) -> RelationshipId {
        self.id
    }

    /// Get the source element id of this relationship.
    pub fn source(&self) -> Id {
        self.source
    }

    /// Get the destination element id of this relationship.
    pub fn destination(&self) -> Id {
        self.destination
    }

    /// Get the relationship's description, if one was given.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the relationship's technology string, if any.
    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => {
                write!(f, "{} -> {} ({description})", self.source, self.destination)
            }
            None => write!(f, "{} -> {}", self.source, self.destination),
        }
    }
}
