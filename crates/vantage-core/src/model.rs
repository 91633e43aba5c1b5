//! Architecture model storage and queries.
//!
//! This module provides the in-memory model that views are built over. It
//! stores elements and the directed relationships between them, and offers
//! the query surface the view engine needs:
//!
//! - [`Element`]: People, software systems, containers, components,
//!   deployment nodes and container instances
//! - [`Relationship`]: Directed edges between elements, with per-node
//!   incoming/outgoing tracking
//! - [`Model`]: Storage plus containment and adjacency queries
//!
//! # Architecture
//!
//! The model is a directed multigraph: several relationships may exist
//! between the same pair of elements. Elements are kept in insertion order;
//! relationships live in a flat list with per-element incoming and outgoing
//! index vectors for efficient adjacency lookups. Containment (software
//! system to container, container to component, deployment node to child)
//! is expressed through id links on the element kinds and resolved by
//! lookup, never through owned back-references.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

use crate::identifier::Id;

mod element;
mod relationship;

pub use element::{Element, ElementKind, ElementType};
pub use relationship::{Relationship, RelationshipId};

/// Errors raised while constructing or querying a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An element with the same name (and therefore id) already exists.
    #[error("an element named {name} already exists in the model")]
    DuplicateElement { name: String },

    /// The given id does not resolve to any element in the model.
    #[error("no element with id {id} exists in the model")]
    UnknownElement { id: String },

    /// The id resolved to an element of the wrong kind.
    #[error("{name} is a {found}, expected a {expected}")]
    ElementKind {
        name: String,
        found: ElementType,
        expected: ElementType,
    },

    /// The element cannot take part in a model relationship.
    #[error("relationships cannot originate from or terminate at {name}")]
    InvalidEndpoint { name: String },
}

/// An in-memory architecture model: elements plus directed relationships.
///
/// Elements are addressed by [`Id`] and iterated in insertion order.
/// The model is append-only; views decide what subset to show.
#[derive(Debug, Default)]
pub struct Model {
    elements: IndexMap<Id, Element>,
    relationships: Vec<Relationship>,
    outgoing: HashMap<Id, Vec<RelationshipId>>,
    incoming: HashMap<Id, Vec<RelationshipId>>,
}

impl Model {
    /// Creates a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Adds a person to the model.
    pub fn add_person(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Id, ModelError> {
        self.insert_element(Id::new(name), name, description, None, ElementKind::Person)
    }

    /// Adds a top-level software system to the model.
    pub fn add_software_system(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Id, ModelError> {
        self.insert_element(
            Id::new(name),
            name,
            description,
            None,
            ElementKind::SoftwareSystem,
        )
    }

    /// Adds a container to the given software system.
    pub fn add_container(
        &mut self,
        software_system: Id,
        name: &str,
        description: Option<&str>,
        technology: Option<&str>,
    ) -> Result<Id, ModelError> {
        self.expect_type(software_system, ElementType::SoftwareSystem)?;
        let id = software_system.create_nested(Id::new(name));
        self.insert_element(
            id,
            name,
            description,
            technology,
            ElementKind::Container { software_system },
        )
    }

    /// Adds a component to the given container.
    pub fn add_component(
        &mut self,
        container: Id,
        name: &str,
        description: Option<&str>,
        technology: Option<&str>,
    ) -> Result<Id, ModelError> {
        self.expect_type(container, ElementType::Container)?;
        let id = container.create_nested(Id::new(name));
        self.insert_element(
            id,
            name,
            description,
            technology,
            ElementKind::Component { container },
        )
    }

    /// Adds a deployment node, either top-level (`parent` is `None`) or
    /// nested under another deployment node.
    pub fn add_deployment_node(
        &mut self,
        parent: Option<Id>,
        name: &str,
        description: Option<&str>,
    ) -> Result<Id, ModelError> {
        let id = match parent {
            Some(parent_id) => {
                self.expect_type(parent_id, ElementType::DeploymentNode)?;
                parent_id.create_nested(Id::new(name))
            }
            None => Id::new(name),
        };
        self.insert_element(
            id,
            name,
            description,
            None,
            ElementKind::DeploymentNode { parent },
        )
    }

    /// Adds an instance of `container` to the given deployment node.
    ///
    /// The instance takes the container's name; its id is generated from the
    /// deployment node, the container name, and a 1-based instance number
    /// per (node, container) pair.
    pub fn add_container_instance(
        &mut self,
        deployment_node: Id,
        container: Id,
    ) -> Result<Id, ModelError> {
        self.expect_type(deployment_node, ElementType::DeploymentNode)?;
        let container_element = self.expect_type(container, ElementType::Container)?;
        let name = container_element.name().to_string();

        let instance = 1 + self
            .elements
            .values()
            .filter(|element| {
                matches!(
                    element.kind(),
                    ElementKind::ContainerInstance {
                        deployment_node: node,
                        container: c,
                        ..
                    } if *node == deployment_node && *c == container
                )
            })
            .count();

        let id = deployment_node.create_nested(Id::new(&format!("{name}-{instance}")));
        self.insert_element(
            id,
            &name,
            None,
            None,
            ElementKind::ContainerInstance {
                deployment_node,
                container,
                instance,
            },
        )
    }

    /// Adds a directed relationship between two elements.
    ///
    /// Both endpoints must exist and be able to take part in relationships
    /// (deployment nodes cannot). Parallel relationships between the same
    /// pair are allowed and distinguished by description.
    pub fn add_relationship(
        &mut self,
        source: Id,
        destination: Id,
        description: Option<&str>,
        technology: Option<&str>,
    ) -> Result<RelationshipId, ModelError> {
        for endpoint in [source, destination] {
            let element = self.expect_element(endpoint)?;
            if element.element_type() == ElementType::DeploymentNode {
                return Err(ModelError::InvalidEndpoint {
                    name: element.name().to_string(),
                });
            }
        }

        let id = RelationshipId(self.relationships.len());
        self.relationships.push(Relationship::new(
            id,
            source,
            destination,
            description.map(str::to_string),
            technology.map(str::to_string),
        ));
        self.outgoing.entry(source).or_default().push(id);
        self.incoming.entry(destination).or_default().push(id);

        debug!("Added relationship {source} -> {destination}");
        Ok(id)
    }

    fn insert_element(
        &mut self,
        id: Id,
        name: &str,
        description: Option<&str>,
        technology: Option<&str>,
        kind: ElementKind,
    ) -> Result<Id, ModelError> {
        if self.elements.contains_key(&id) {
            return Err(ModelError::DuplicateElement {
                name: name.to_string(),
            });
        }

        trace!(element:% = id, kind:? = kind.element_type(); "Adding element to model");
        self.elements.insert(
            id,
            Element::new(
                id,
                name.to_string(),
                description.map(str::to_string),
                technology.map(str::to_string),
                kind,
            ),
        );
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the element with the given id, if it exists.
    pub fn element(&self, id: Id) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Checks whether an element with the given id exists.
    pub fn contains(&self, id: Id) -> bool {
        self.elements.contains_key(&id)
    }

    /// Returns the element with the given id, or an error naming the id.
    pub fn expect_element(&self, id: Id) -> Result<&Element, ModelError> {
        self.elements
            .get(&id)
            .ok_or_else(|| ModelError::UnknownElement { id: id.to_string() })
    }

    /// Returns the element with the given id if it has the expected type.
    pub fn expect_type(
        &self,
        id: Id,
        expected: ElementType,
    ) -> Result<&Element, ModelError> {
        let element = self.expect_element(id)?;
        if element.element_type() != expected {
            return Err(ModelError::ElementKind {
                name: element.name().to_string(),
                found: element.element_type(),
                expected,
            });
        }
        Ok(element)
    }

    /// Returns the id of the element that owns the given one, if any.
    ///
    /// Containers belong to their software system, components to their
    /// container, nested deployment nodes to their parent node, and
    /// container instances to the deployment node they run on.
    pub fn parent_of(&self, id: Id) -> Option<Id> {
        self.elements.get(&id).and_then(|element| element.kind().parent())
    }

    /// Returns the software system that owns the given container.
    pub fn software_system_of(&self, container: Id) -> Result<Id, ModelError> {
        match self.expect_type(container, ElementType::Container)?.kind() {
            ElementKind::Container { software_system } => Ok(*software_system),
            _ => unreachable!("expect_type checked the kind"),
        }
    }

    /// Returns an iterator over the child deployment nodes of the given node.
    pub fn children_of(&self, deployment_node: Id) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |element| {
            matches!(
                element.kind(),
                ElementKind::DeploymentNode { parent: Some(parent) } if *parent == deployment_node
            )
        })
    }

    /// Returns an iterator over the container instances directly on the given node.
    pub fn container_instances_of(
        &self,
        deployment_node: Id,
    ) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |element| {
            matches!(
                element.kind(),
                ElementKind::ContainerInstance { deployment_node: node, .. }
                    if *node == deployment_node
            )
        })
    }

    /// Returns the relationship behind the given handle, if it exists.
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(id.0)
    }

    /// Returns the first relationship from `source` to `destination`, if any.
    ///
    /// Direction matters: this only finds relationships where `source` is
    /// the origin.
    pub fn relationship_between(&self, source: Id, destination: Id) -> Option<RelationshipId> {
        self.relationships_between(source, destination).next()
    }

    /// Returns all relationships from `source` to `destination`, in insertion order.
    pub fn relationships_between(
        &self,
        source: Id,
        destination: Id,
    ) -> impl Iterator<Item = RelationshipId> {
        self.outgoing
            .get(&source)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |id| self.relationships[id.0].destination() == destination)
    }

    /// Returns all relationships the given element takes part in, either
    /// direction, outgoing first.
    pub fn relationships_of(&self, id: Id) -> impl Iterator<Item = &Relationship> {
        let outgoing = self
            .outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .map(|relationship_id| &self.relationships[relationship_id.0]);
        // A self-loop is indexed in both lists; the incoming side skips it
        // so it is yielded exactly once.
        let incoming = self
            .incoming
            .get(&id)
            .into_iter()
            .flatten()
            .map(|relationship_id| &self.relationships[relationship_id.0])
            .filter(|relationship| relationship.source() != relationship.destination());
        outgoing.chain(incoming)
    }

    /// Returns an iterator over all elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Returns an iterator over all relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Returns an iterator over all people in the model.
    pub fn people(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_type(ElementType::Person)
    }

    /// Returns an iterator over all software systems in the model.
    pub fn software_systems(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_type(ElementType::SoftwareSystem)
    }

    /// Returns an iterator over the containers of the given software system.
    pub fn containers_of(&self, software_system: Id) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |element| {
            matches!(
                element.kind(),
                ElementKind::Container { software_system: owner } if *owner == software_system
            )
        })
    }

    /// Returns an iterator over the components of the given container.
    pub fn components_of(&self, container: Id) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |element| {
            matches!(
                element.kind(),
                ElementKind::Component { container: owner } if *owner == container
            )
        })
    }

    /// Returns an iterator over top-level deployment nodes (nodes with no parent).
    pub fn root_deployment_nodes(&self) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(|element| {
            matches!(element.kind(), ElementKind::DeploymentNode { parent: None })
        })
    }

    fn elements_of_type(&self, element_type: ElementType) -> impl Iterator<Item = &Element> {
        self.elements
            .values()
            .filter(move |element| element.element_type() == element_type)
    }
}
