//! Element types for the architecture model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// The kinds of element an architecture model can hold.
///
/// This is the flat discriminant used wherever only the category of an
/// element matters, such as nearest-neighbour filtering or terminology
/// configuration. The names match external configuration strings
/// (snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// A person who uses the software systems in the model.
    Person,
    /// A top-level software system.
    SoftwareSystem,
    /// A deployable/runnable unit inside a software system.
    Container,
    /// A grouping of related functionality inside a container.
    Component,
    /// A hierarchical infrastructure node (host, region, cluster).
    DeploymentNode,
    /// A deployed occurrence of a container on a deployment node.
    ContainerInstance,
}

impl FromStr for ElementType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "software_system" => Ok(Self::SoftwareSystem),
            "container" => Ok(Self::Container),
            "component" => Ok(Self::Component),
            "deployment_node" => Ok(Self::DeploymentNode),
            "container_instance" => Ok(Self::ContainerInstance),
            _ => Err("Unsupported element type"),
        }
    }
}

impl From<ElementType> for &'static str {
    fn from(val: ElementType) -> Self {
        match val {
            ElementType::Person => "person",
            ElementType::SoftwareSystem => "software_system",
            ElementType::Container => "container",
            ElementType::Component => "component",
            ElementType::DeploymentNode => "deployment_node",
            ElementType::ContainerInstance => "container_instance",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Kind-specific data for an element, with ownership links held as ids.
///
/// Links are always resolved through [`Model`](crate::model::Model) lookups;
/// elements never hold references to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A person; people own nothing and belong to nothing.
    Person,
    /// A top-level software system.
    SoftwareSystem,
    /// A container owned by a software system.
    Container {
        /// The owning software system.
        software_system: Id,
    },
    /// A component owned by a container.
    Component {
        /// The owning container.
        container: Id,
    },
    /// A deployment node, optionally nested under a parent node.
    DeploymentNode {
        /// The parent deployment node, `None` for top-level nodes.
        parent: Option<Id>,
    },
    /// An instance of a container deployed on a deployment node.
    ContainerInstance {
        /// The deployment node this instance runs on.
        deployment_node: Id,
        /// The container this is an instance of.
        container: Id,
        /// 1-based instance number per (node, container) pair.
        instance: usize,
    },
}

impl ElementKind {
    /// Returns the flat discriminant for this kind.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Person => ElementType::Person,
            ElementKind::SoftwareSystem => ElementType::SoftwareSystem,
            ElementKind::Container { .. } => ElementType::Container,
            ElementKind::Component { .. } => ElementType::Component,
            ElementKind::DeploymentNode { .. } => ElementType::DeploymentNode,
            ElementKind::ContainerInstance { .. } => ElementType::ContainerInstance,
        }
    }

    /// Returns the id of the element that owns this one, if any.
    ///
    /// Containers are owned by their software system, components by their
    /// container, nested deployment nodes by their parent node, and container
    /// instances by the deployment node they run on.
    pub(crate) fn parent(&self) -> Option<Id> {
        match self {
            ElementKind::Person | ElementKind::SoftwareSystem => None,
            ElementKind::Container { software_system } => Some(*software_system),
            ElementKind::Component { container } => Some(*container),
            ElementKind::DeploymentNode { parent } => *parent,
            ElementKind::ContainerInstance {
                deployment_node, ..
            } => Some(*deployment_node),
        }
    }
}

/// An element of the architecture model.
///
/// Elements are created through the typed `add_*` methods on
/// [`Model`](crate::model::Model) and addressed by [`Id`] afterwards.
#[derive(Debug, Clone)]
pub struct Element {
    id: Id,
    name: String,
    description: Option<String>,
    technology: Option<String>,
    kind: ElementKind,
}

impl Element {
    /// Creates a new element. Only the model constructs elements.
    pub(crate) fn new(
        id: Id,
        name: String,
        description: Option<String>,
        technology: Option<String>,
        kind: ElementKind,
    ) -> Self {
        Self {
            id,
            name,
            description,
            technology,
            kind,
        }
    }

    /// Get the element identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the element's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the element's description, if one was given.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the element's technology string (containers and components), if any.
    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }

    /// Borrow the element's kind-specific data.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the flat discriminant for this element.
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_round_trip() {
        for element_type in [
            ElementType::Person,
            ElementType::SoftwareSystem,
            ElementType::Container,
            ElementType::Component,
            ElementType::DeploymentNode,
            ElementType::ContainerInstance,
        ] {
            let s: &'static str = element_type.into();
            assert_eq!(s.parse::<ElementType>(), Ok(element_type));
        }
    }

    #[test]
    fn test_element_type_rejects_unknown() {
        assert!("enterprise".parse::<ElementType>().is_err());
    }

    #[test]
    fn test_kind_parent() {
        let system = Id::new("system");
        let container = Id::new("system::container");

        assert_eq!(ElementKind::Person.parent(), None);
        assert_eq!(ElementKind::SoftwareSystem.parent(), None);
        assert_eq!(
            ElementKind::Container {
                software_system: system
            }
            .parent(),
            Some(system)
        );
        assert_eq!(
            ElementKind::Component { container }.parent(),
            Some(container)
        );
        assert_eq!(ElementKind::DeploymentNode { parent: None }.parent(), None);
    }
}
