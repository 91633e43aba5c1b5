//! Per-kind scoping rules deciding which elements may enter a view.
//!
//! Every add operation funnels its candidates through [`check_candidate`]
//! before touching any view state, so a rejection never leaves partial
//! state behind. Error messages name the rejected element and the
//! constraint it violated.

use vantage_core::{
    identifier::Id,
    model::{Element, ElementType, Model},
};

use super::{DynamicScope, ViewKind};
use crate::error::ViewError;

/// Checks whether `candidate` may be added to a view of the given kind.
pub(super) fn check_candidate(
    model: &Model,
    kind: &ViewKind,
    candidate: &Element,
) -> Result<(), ViewError> {
    match kind {
        ViewKind::SystemContext { .. } => check_system_context(candidate),
        ViewKind::Container { software_system } => {
            check_container_view(model, *software_system, candidate)
        }
        ViewKind::Component { container } => check_component_view(model, *container, candidate),
        ViewKind::Dynamic { scope } => check_dynamic(model, *scope, candidate),
        ViewKind::Deployment { .. } => check_deployment(candidate),
    }
}

/// Returns true when the candidate is part of the view's scope chain and is
/// therefore included as a dependency rather than an explicit selection.
pub(super) fn is_scope_dependency(model: &Model, kind: &ViewKind, id: Id) -> bool {
    match kind {
        ViewKind::Container { software_system } => id == *software_system,
        ViewKind::Component { container } => {
            id == *container || model.parent_of(*container) == Some(id)
        }
        _ => false,
    }
}

fn check_system_context(candidate: &Element) -> Result<(), ViewError> {
    match candidate.element_type() {
        ElementType::Person | ElementType::SoftwareSystem => Ok(()),
        _ => Err(ViewError::InvalidScope(format!(
            "Only people and software systems can be added to a system context view, not {}.",
            candidate.name()
        ))),
    }
}

fn check_container_view(
    model: &Model,
    software_system: Id,
    candidate: &Element,
) -> Result<(), ViewError> {
    match candidate.element_type() {
        ElementType::Person | ElementType::SoftwareSystem => Ok(()),
        ElementType::Container => {
            if model.parent_of(candidate.id()) == Some(software_system) {
                Ok(())
            } else {
                Err(ViewError::InvalidScope(format!(
                    "Only containers belonging to {} can be added to this view.",
                    name_of(model, software_system)
                )))
            }
        }
        ElementType::Component => Err(ViewError::InvalidScope(format!(
            "Components like {} can't be added to a container view.",
            candidate.name()
        ))),
        ElementType::DeploymentNode | ElementType::ContainerInstance => {
            Err(deployment_only(candidate))
        }
    }
}

fn check_component_view(
    model: &Model,
    container: Id,
    candidate: &Element,
) -> Result<(), ViewError> {
    let software_system = model.software_system_of(container)?;
    match candidate.element_type() {
        ElementType::Person | ElementType::SoftwareSystem => Ok(()),
        ElementType::Container => {
            if model.parent_of(candidate.id()) == Some(software_system) {
                Ok(())
            } else {
                Err(ViewError::InvalidScope(format!(
                    "Only containers that reside inside {} can be added to this view.",
                    name_of(model, software_system)
                )))
            }
        }
        ElementType::Component => {
            if model.parent_of(candidate.id()) == Some(container) {
                Ok(())
            } else {
                Err(ViewError::InvalidScope(format!(
                    "Only components that reside inside {} can be added to this view.",
                    name_of(model, container)
                )))
            }
        }
        ElementType::DeploymentNode | ElementType::ContainerInstance => {
            Err(deployment_only(candidate))
        }
    }
}

fn check_dynamic(
    model: &Model,
    scope: Option<DynamicScope>,
    candidate: &Element,
) -> Result<(), ViewError> {
    // People can always be added.
    if candidate.element_type() == ElementType::Person {
        return Ok(());
    }

    match scope {
        None => match candidate.element_type() {
            ElementType::SoftwareSystem | ElementType::Container | ElementType::Component => {
                Ok(())
            }
            _ => Err(deployment_only(candidate)),
        },
        Some(DynamicScope::SoftwareSystem(software_system)) => {
            if candidate.id() == software_system {
                return Err(already_scope(candidate));
            }
            match candidate.element_type() {
                ElementType::SoftwareSystem => Ok(()),
                ElementType::Container => {
                    if model.parent_of(candidate.id()) == Some(software_system) {
                        Ok(())
                    } else {
                        Err(ViewError::InvalidScope(format!(
                            "Only containers that reside inside {} can be added to this view.",
                            name_of(model, software_system)
                        )))
                    }
                }
                ElementType::Component => Err(ViewError::InvalidScope(
                    "Components can't be added to a dynamic view when the scope is a software system."
                        .to_string(),
                )),
                _ => Err(deployment_only(candidate)),
            }
        }
        Some(DynamicScope::Container(container)) => {
            let software_system = model.software_system_of(container)?;
            if candidate.id() == container || candidate.id() == software_system {
                return Err(already_scope(candidate));
            }
            match candidate.element_type() {
                ElementType::Container => {
                    if model.parent_of(candidate.id()) == Some(software_system) {
                        Ok(())
                    } else {
                        Err(ViewError::InvalidScope(format!(
                            "Only containers that reside inside {} can be added to this view.",
                            name_of(model, software_system)
                        )))
                    }
                }
                ElementType::Component => {
                    if model.parent_of(candidate.id()) == Some(container) {
                        Ok(())
                    } else {
                        Err(ViewError::InvalidScope(format!(
                            "Only components that reside inside {} can be added to this view.",
                            name_of(model, container)
                        )))
                    }
                }
                _ => Err(ViewError::InvalidScope(format!(
                    "Only containers that reside inside {} and components that reside inside {} can be added to this view.",
                    name_of(model, software_system),
                    name_of(model, container)
                ))),
            }
        }
    }
}

fn check_deployment(candidate: &Element) -> Result<(), ViewError> {
    match candidate.element_type() {
        ElementType::DeploymentNode | ElementType::ContainerInstance => Ok(()),
        _ => Err(ViewError::InvalidScope(format!(
            "Only deployment nodes and container instances can be added to a deployment view, not {}.",
            candidate.name()
        ))),
    }
}

fn already_scope(candidate: &Element) -> ViewError {
    ViewError::InvalidScope(format!(
        "{} is already the scope of this view and cannot be added to it.",
        candidate.name()
    ))
}

fn deployment_only(candidate: &Element) -> ViewError {
    ViewError::InvalidScope(format!(
        "{} is a deployment element and can only be added to a deployment view.",
        candidate.name()
    ))
}

fn name_of(model: &Model, id: Id) -> String {
    model
        .element(id)
        .map(|element| element.name().to_string())
        .unwrap_or_else(|| id.to_string())
}
