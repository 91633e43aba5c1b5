//! Configuration types for Vantage view sets.
//!
//! This module provides configuration structures that control how views
//! present themselves. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`Configuration`] - Top-level view set configuration.
//! - [`Terminology`] - Display-word overrides per element type, used when
//!   computing view display names.
//!
//! # Example
//!
//! ```
//! # use vantage::config::{Configuration, Terminology};
//! # use vantage::model::ElementType;
//! let terminology = Terminology::default().with_term(ElementType::Container, "Service");
//! let config = Configuration::new(terminology);
//! assert_eq!(config.terminology().term_for(ElementType::Container), "Service");
//! assert_eq!(config.terminology().term_for(ElementType::Person), "Person");
//! ```

use serde::Deserialize;

use vantage_core::model::ElementType;

/// Top-level configuration for a view set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Configuration {
    /// Terminology section.
    #[serde(default)]
    terminology: Terminology,
}

impl Configuration {
    /// Creates a new [`Configuration`] with the specified terminology.
    pub fn new(terminology: Terminology) -> Self {
        Self { terminology }
    }

    /// Returns the terminology configuration.
    pub fn terminology(&self) -> &Terminology {
        &self.terminology
    }
}

/// Display-word overrides for the element types of the model.
///
/// Unset fields fall back to the standard words ("Person", "Software
/// System", "Container", "Component", "Deployment Node", "Container
/// Instance").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Terminology {
    #[serde(default)]
    person: Option<String>,
    #[serde(default)]
    software_system: Option<String>,
    #[serde(default)]
    container: Option<String>,
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    deployment_node: Option<String>,
    #[serde(default)]
    container_instance: Option<String>,
}

impl Terminology {
    /// Sets the display word for one element type, consuming and returning
    /// the terminology for chaining.
    pub fn with_term(mut self, element_type: ElementType, term: impl Into<String>) -> Self {
        let slot = match element_type {
            ElementType::Person => &mut self.person,
            ElementType::SoftwareSystem => &mut self.software_system,
            ElementType::Container => &mut self.container,
            ElementType::Component => &mut self.component,
            ElementType::DeploymentNode => &mut self.deployment_node,
            ElementType::ContainerInstance => &mut self.container_instance,
        };
        *slot = Some(term.into());
        self
    }

    /// Returns the display word for the given element type.
    pub fn term_for(&self, element_type: ElementType) -> &str {
        let (configured, default) = match element_type {
            ElementType::Person => (&self.person, "Person"),
            ElementType::SoftwareSystem => (&self.software_system, "Software System"),
            ElementType::Container => (&self.container, "Container"),
            ElementType::Component => (&self.component, "Component"),
            ElementType::DeploymentNode => (&self.deployment_node, "Deployment Node"),
            ElementType::ContainerInstance => (&self.container_instance, "Container Instance"),
        };
        configured.as_deref().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let terminology = Terminology::default();
        assert_eq!(terminology.term_for(ElementType::Person), "Person");
        assert_eq!(
            terminology.term_for(ElementType::SoftwareSystem),
            "Software System"
        );
    }

    #[test]
    fn test_override() {
        let terminology = Terminology::default()
            .with_term(ElementType::Person, "Actor")
            .with_term(ElementType::Container, "Service");
        assert_eq!(terminology.term_for(ElementType::Person), "Actor");
        assert_eq!(terminology.term_for(ElementType::Container), "Service");
        assert_eq!(terminology.term_for(ElementType::Component), "Component");
    }
}
