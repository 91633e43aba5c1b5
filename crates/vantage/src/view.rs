//! Views over an architecture model.
//!
//! This module provides the view engine: named, scoped subsets of a model's
//! elements and relationships, populated incrementally and kept consistent
//! as they grow. The key abstractions are:
//!
//! - [`View`]: One named view with its element and relationship inclusions
//! - [`ViewKind`]: Tagged variant selecting the per-kind scoping and
//!   population behavior (system context, container, component, dynamic,
//!   deployment)
//! - [`ViewSet`]: Factory and registry for the views of one model, enforcing
//!   key uniqueness
//!
//! # Architecture
//!
//! Every mutating operation validates its candidates against the view
//! kind's scoping rules before touching any state, so a rejected call
//! leaves the view exactly as it was. Relationships can only be shown with
//! both endpoints present; endpoints are pulled in implicitly when a
//! relationship is added. Deployment views prune node subtrees down to the
//! branches that actually contain qualifying container instances, and
//! dynamic views stamp every relationship with a sequence token so that
//! token order reproduces call order.
//!
//! Views are single-threaded builders: a [`View`] is not intended for
//! concurrent mutation from multiple threads. Wrap it in external
//! synchronization if one must be shared.

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace};

use vantage_core::{
    identifier::Id,
    model::{Element, ElementKind, ElementType, Model, Relationship, RelationshipId},
};

use crate::{
    config::{Configuration, Terminology},
    error::ViewError,
};

mod scope;
mod sequence;

pub use sequence::Order;

use sequence::SequenceNumber;

/// The scope of a dynamic view: a software system, a container, or (when
/// absent) the whole model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicScope {
    /// Interactions between the containers of this system and its neighbours.
    SoftwareSystem(Id),
    /// Interactions between the components of this container and its siblings.
    Container(Id),
}

impl DynamicScope {
    /// Returns the id of the scope element.
    pub fn id(&self) -> Id {
        match self {
            DynamicScope::SoftwareSystem(id) | DynamicScope::Container(id) => *id,
        }
    }
}

/// The kind of a view, together with its scope element(s).
///
/// The kind selects the scoping rules and population behavior; there is no
/// view-kind hierarchy, just this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// People and software systems around one software system.
    SystemContext { software_system: Id },
    /// The containers inside one software system.
    Container { software_system: Id },
    /// The components inside one container.
    Component { container: Id },
    /// Runtime interactions, optionally scoped to a system or container.
    Dynamic { scope: Option<DynamicScope> },
    /// Container instances mapped onto deployment nodes, optionally scoped
    /// to one software system.
    Deployment { software_system: Option<Id> },
}

impl ViewKind {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ViewKind::SystemContext { .. } => "system context",
            ViewKind::Container { .. } => "container",
            ViewKind::Component { .. } => "component",
            ViewKind::Dynamic { .. } => "dynamic",
            ViewKind::Deployment { .. } => "deployment",
        }
    }

    fn is_static(&self) -> bool {
        matches!(
            self,
            ViewKind::SystemContext { .. } | ViewKind::Container { .. } | ViewKind::Component { .. }
        )
    }
}

/// An element's inclusion in a view.
///
/// Tracks whether the element was explicitly selected by the caller or
/// pulled in implicitly as a dependency (a relationship endpoint, a
/// deployment ancestor, or the view's own scope element). Implicit
/// inclusions never auto-wire relationships and are what deployment
/// pruning works against.
#[derive(Debug, Clone)]
pub struct ElementView {
    element: Id,
    explicit: bool,
}

impl ElementView {
    fn new(element: Id, explicit: bool) -> Self {
        Self { element, explicit }
    }

    /// Get the id of the included element.
    pub fn element(&self) -> Id {
        self.element
    }

    /// Returns true when the element was explicitly added by the caller.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

/// A relationship's inclusion in a view.
///
/// Carries an optional display description overriding the model
/// relationship's own and, in dynamic views, the sequence token that
/// fixes its position in the interaction. The same model relationship can
/// appear several times in a dynamic view with different descriptions and
/// tokens; the (relationship, description, order) triple is what identifies
/// an inclusion.
#[derive(Debug, Clone)]
pub struct RelationshipView {
    relationship: RelationshipId,
    description: Option<String>,
    order: Option<Order>,
}

impl RelationshipView {
    fn new(relationship: RelationshipId, description: Option<String>, order: Option<Order>) -> Self {
        Self {
            relationship,
            description,
            order,
        }
    }

    /// Get the handle of the underlying model relationship.
    pub fn relationship(&self) -> RelationshipId {
        self.relationship
    }

    /// Get the display description override, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the sequence token, present on dynamic views only.
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }
}

/// A named, scoped subset of the model for display.
///
/// Views are created through a [`ViewSet`] and populated by the `add_*`
/// family of operations. Every operation either succeeds completely or
/// returns an error having changed nothing; after any call, each included
/// relationship has both of its endpoints included as well.
#[derive(Debug)]
pub struct View<'m> {
    model: &'m Model,
    key: String,
    description: String,
    kind: ViewKind,
    elements: IndexMap<Id, ElementView>,
    relationships: Vec<RelationshipView>,
    sequence: SequenceNumber,
}

impl<'m> View<'m> {
    fn new(model: &'m Model, key: &str, description: &str, kind: ViewKind) -> Self {
        Self {
            model,
            key: key.to_string(),
            description: description.to_string(),
            kind,
            elements: IndexMap::new(),
            relationships: Vec::new(),
            sequence: SequenceNumber::new(),
        }
    }

    /// Get the view's unique key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the view's description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Borrow the view's kind and scope.
    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    /// Returns an iterator over the element inclusions in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &ElementView> {
        self.elements.values()
    }

    /// Returns the inclusion entry for the given element, if it is in the view.
    pub fn element_view(&self, element: Id) -> Option<&ElementView> {
        self.elements.get(&element)
    }

    /// Checks whether the given element is included in the view.
    pub fn contains(&self, element: Id) -> bool {
        self.elements.contains_key(&element)
    }

    /// Returns the relationship inclusions in insertion order.
    pub fn relationships(&self) -> &[RelationshipView] {
        &self.relationships
    }

    /// Returns the relationship inclusions sorted by sequence token.
    ///
    /// For dynamic views this reproduces the order interactions were added
    /// in; entries without a token keep their insertion order.
    pub fn relationships_in_order(&self) -> Vec<&RelationshipView> {
        let mut ordered: Vec<&RelationshipView> = self.relationships.iter().collect();
        ordered.sort_by(|a, b| a.order().cmp(&b.order()));
        ordered
    }

    /// Returns the display name of the view, with default terminology.
    pub fn name(&self) -> String {
        self.name_with(&Terminology::default())
    }

    /// Returns the display name of the view using the given terminology.
    pub fn name_with(&self, terminology: &Terminology) -> String {
        match &self.kind {
            ViewKind::SystemContext { software_system } => {
                format!("{} - System Context", self.scope_name(*software_system))
            }
            ViewKind::Container { software_system } => format!(
                "{} - {}s",
                self.scope_name(*software_system),
                terminology.term_for(ElementType::Container)
            ),
            ViewKind::Component { container } => format!(
                "{} - {}s",
                self.scope_name(*container),
                terminology.term_for(ElementType::Component)
            ),
            ViewKind::Dynamic { scope: None } => "Dynamic".to_string(),
            ViewKind::Dynamic { scope: Some(scope) } => {
                format!("{} - Dynamic", self.scope_name(scope.id()))
            }
            ViewKind::Deployment {
                software_system: None,
            } => "Deployment".to_string(),
            ViewKind::Deployment {
                software_system: Some(software_system),
            } => format!("{} - Deployment", self.scope_name(*software_system)),
        }
    }

    fn scope_name(&self, id: Id) -> String {
        self.model
            .element(id)
            .map(|element| element.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    // -------------------------------------------------------------------------
    // Element population
    // -------------------------------------------------------------------------

    /// Adds a person to the view.
    pub fn add_person(&mut self, person: Id) -> Result<(), ViewError> {
        expect_type(self.model, person, ElementType::Person)?;
        self.add_element(person)
    }

    /// Adds a software system to the view.
    pub fn add_software_system(&mut self, software_system: Id) -> Result<(), ViewError> {
        expect_type(self.model, software_system, ElementType::SoftwareSystem)?;
        self.add_element(software_system)
    }

    /// Adds a container to the view.
    pub fn add_container(&mut self, container: Id) -> Result<(), ViewError> {
        expect_type(self.model, container, ElementType::Container)?;
        self.add_element(container)
    }

    /// Adds a component to the view.
    pub fn add_component(&mut self, component: Id) -> Result<(), ViewError> {
        expect_type(self.model, component, ElementType::Component)?;
        self.add_element(component)
    }

    /// Adds any admissible element to the view.
    ///
    /// The element is checked against the view kind's scoping rules first;
    /// a rejection aborts before anything is changed. Adding an element
    /// that is already included is a no-op. On deployment views, deployment
    /// nodes go through the subtree-pruning add.
    pub fn add_element(&mut self, element: Id) -> Result<(), ViewError> {
        let candidate = lookup(self.model, element)?;
        scope::check_candidate(self.model, &self.kind, candidate)?;

        if matches!(self.kind, ViewKind::Deployment { .. }) {
            return match candidate.element_type() {
                ElementType::DeploymentNode => self.add_deployment_node(element),
                _ => Err(ViewError::InvalidScope(format!(
                    "{} is a container instance; it is added through its deployment node.",
                    candidate.name()
                ))),
            };
        }

        let explicit = !scope::is_scope_dependency(self.model, &self.kind, element);
        self.include_element(element, explicit);
        Ok(())
    }

    /// Removes an element from the view, along with every relationship
    /// inclusion that touches it. Removing an element that is not in the
    /// view is a no-op.
    pub fn remove_element(&mut self, element: Id) {
        if self.elements.shift_remove(&element).is_none() {
            return;
        }
        let model = self.model;
        self.relationships.retain(|view| {
            model
                .relationship(view.relationship)
                .is_some_and(|relationship| {
                    relationship.source() != element && relationship.destination() != element
                })
        });
    }

    // -------------------------------------------------------------------------
    // Relationship population
    // -------------------------------------------------------------------------

    /// Adds the model relationship from `source` to `destination` to the view.
    ///
    /// Both endpoints are validated against the view's scoping rules and
    /// pulled in implicitly if missing. The relationship must exist in the
    /// model, in that direction; a view never invents one. On dynamic views
    /// the inclusion is stamped with the next sequence token.
    pub fn add_relationship(
        &mut self,
        source: Id,
        destination: Id,
    ) -> Result<&RelationshipView, ViewError> {
        self.add_relationship_inner(source, None, destination)
    }

    /// Adds the model relationship from `source` to `destination`, showing
    /// the given description instead of the relationship's own.
    ///
    /// In a dynamic view the same model relationship can be added many
    /// times with different descriptions, one per interaction step.
    pub fn add_relationship_with_description(
        &mut self,
        source: Id,
        description: &str,
        destination: Id,
    ) -> Result<&RelationshipView, ViewError> {
        self.add_relationship_inner(source, Some(description.to_string()), destination)
    }

    fn add_relationship_inner(
        &mut self,
        source: Id,
        description: Option<String>,
        destination: Id,
    ) -> Result<&RelationshipView, ViewError> {
        let source_element = lookup(self.model, source)?;
        let destination_element = lookup(self.model, destination)?;

        match &self.kind {
            ViewKind::Deployment { .. } => {
                for element in [source_element, destination_element] {
                    if element.element_type() != ElementType::ContainerInstance {
                        return Err(ViewError::InvalidScope(format!(
                            "Only relationships between container instances can be added to a deployment view, not {}.",
                            element.name()
                        )));
                    }
                    if !self.elements.contains_key(&element.id()) {
                        return Err(ViewError::InvalidScope(format!(
                            "{} has not been added to this view.",
                            element.name()
                        )));
                    }
                }
            }
            _ => {
                scope::check_candidate(self.model, &self.kind, source_element)?;
                scope::check_candidate(self.model, &self.kind, destination_element)?;
            }
        }

        let relationship = self
            .model
            .relationship_between(source, destination)
            .ok_or_else(|| ViewError::MissingRelationship {
                src: source_element.name().to_string(),
                destination: destination_element.name().to_string(),
            })?;

        self.include_element(source, false);
        self.include_element(destination, false);

        let order = match self.kind {
            ViewKind::Dynamic { .. } => Some(self.sequence.next()),
            _ => None,
        };
        let index = self.record_relationship(relationship, description, order);
        Ok(&self.relationships[index])
    }

    // -------------------------------------------------------------------------
    // Bulk population
    // -------------------------------------------------------------------------

    /// Adds every element this view kind shows by default.
    ///
    /// System context views add all software systems and people; container
    /// views additionally add the scope system's containers; component
    /// views additionally add the scope container's components. Deployment
    /// views add all top-level deployment nodes. Dynamic views have no
    /// default population.
    pub fn add_all_elements(&mut self) -> Result<(), ViewError> {
        match &self.kind {
            ViewKind::SystemContext { .. } => {
                self.add_all_software_systems()?;
                self.add_all_people()
            }
            ViewKind::Container { .. } => {
                self.add_all_software_systems()?;
                self.add_all_people()?;
                self.add_all_containers()
            }
            ViewKind::Component { .. } => {
                self.add_all_software_systems()?;
                self.add_all_people()?;
                self.add_all_containers()?;
                self.add_all_components()
            }
            ViewKind::Dynamic { .. } => Err(ViewError::Unsupported {
                operation: "add_all_elements",
                kind: self.kind.label(),
            }),
            ViewKind::Deployment { .. } => self.add_all_deployment_nodes(),
        }
    }

    /// Adds all people in the model to the view (static views only).
    pub fn add_all_people(&mut self) -> Result<(), ViewError> {
        self.require_static("add_all_people")?;
        for person in collect_ids(self.model.people()) {
            self.add_element(person)?;
        }
        Ok(())
    }

    /// Adds all software systems in the model to the view (static views only).
    pub fn add_all_software_systems(&mut self) -> Result<(), ViewError> {
        self.require_static("add_all_software_systems")?;
        for software_system in collect_ids(self.model.software_systems()) {
            self.add_element(software_system)?;
        }
        Ok(())
    }

    /// Adds all containers of the scope software system to the view.
    pub fn add_all_containers(&mut self) -> Result<(), ViewError> {
        let software_system = match &self.kind {
            ViewKind::Container { software_system } => *software_system,
            ViewKind::Component { container } => self.model.software_system_of(*container)?,
            _ => {
                return Err(ViewError::Unsupported {
                    operation: "add_all_containers",
                    kind: self.kind.label(),
                });
            }
        };
        for container in collect_ids(self.model.containers_of(software_system)) {
            self.add_element(container)?;
        }
        Ok(())
    }

    /// Adds all components of the scope container to the view.
    pub fn add_all_components(&mut self) -> Result<(), ViewError> {
        let container = match &self.kind {
            ViewKind::Component { container } => *container,
            _ => {
                return Err(ViewError::Unsupported {
                    operation: "add_all_components",
                    kind: self.kind.label(),
                });
            }
        };
        for component in collect_ids(self.model.components_of(container)) {
            self.add_element(component)?;
        }
        Ok(())
    }

    fn require_static(&self, operation: &'static str) -> Result<(), ViewError> {
        if self.kind.is_static() {
            Ok(())
        } else {
            Err(ViewError::Unsupported {
                operation,
                kind: self.kind.label(),
            })
        }
    }

    // -------------------------------------------------------------------------
    // Nearest-neighbour expansion
    // -------------------------------------------------------------------------

    /// Adds the focal element plus every directly connected element of the
    /// given type, one hop in either direction, together with the
    /// connecting relationships.
    ///
    /// The expansion is filtered to one element type per call; call it once
    /// per type of interest. Neighbours that the view's scoping rules do
    /// not admit are skipped. Static views only.
    pub fn add_nearest_neighbours(
        &mut self,
        element: Id,
        neighbour_type: ElementType,
    ) -> Result<(), ViewError> {
        self.require_static("add_nearest_neighbours")?;
        let focal = lookup(self.model, element)?;
        scope::check_candidate(self.model, &self.kind, focal)?;

        let mut additions: Vec<(RelationshipId, Id)> = Vec::new();
        for relationship in self.model.relationships_of(element) {
            let other = if relationship.source() == element {
                relationship.destination()
            } else {
                relationship.source()
            };
            let neighbour = lookup(self.model, other)?;
            if neighbour.element_type() != neighbour_type {
                continue;
            }
            if scope::check_candidate(self.model, &self.kind, neighbour).is_err() {
                trace!(neighbour:% = other; "Skipping out-of-scope neighbour");
                continue;
            }
            additions.push((relationship.id(), other));
        }

        let explicit = !scope::is_scope_dependency(self.model, &self.kind, element);
        self.include_element(element, explicit);
        for (relationship, neighbour) in additions {
            let explicit = !scope::is_scope_dependency(self.model, &self.kind, neighbour);
            self.include_element(neighbour, explicit);
            self.record_relationship(relationship, None, None);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Deployment population
    // -------------------------------------------------------------------------

    /// Adds a deployment node subtree to the view, pruned to the branches
    /// that contain qualifying container instances.
    ///
    /// An instance qualifies when the view has no software system scope or
    /// its container belongs to the scope system. If anything under the
    /// node qualified, the node's ancestor chain is pulled in as well, so
    /// the result is always a connected, rooted subtree. A node with no
    /// qualifying content anywhere below it adds nothing; a later call for
    /// a different, qualifying leaf can still bring its ancestors in.
    pub fn add_deployment_node(&mut self, deployment_node: Id) -> Result<(), ViewError> {
        let software_system = match &self.kind {
            ViewKind::Deployment { software_system } => *software_system,
            _ => {
                return Err(ViewError::Unsupported {
                    operation: "add_deployment_node",
                    kind: self.kind.label(),
                });
            }
        };
        expect_type(self.model, deployment_node, ElementType::DeploymentNode)?;

        if self.push_deployment_subtree(deployment_node, software_system)? {
            let mut parent = self.model.parent_of(deployment_node);
            while let Some(ancestor) = parent {
                self.include_element(ancestor, false);
                parent = self.model.parent_of(ancestor);
            }
        }
        Ok(())
    }

    /// Adds every top-level deployment node in the model, pruned as in
    /// [`View::add_deployment_node`].
    pub fn add_all_deployment_nodes(&mut self) -> Result<(), ViewError> {
        if !matches!(self.kind, ViewKind::Deployment { .. }) {
            return Err(ViewError::Unsupported {
                operation: "add_all_deployment_nodes",
                kind: self.kind.label(),
            });
        }
        for deployment_node in collect_ids(self.model.root_deployment_nodes()) {
            self.add_deployment_node(deployment_node)?;
        }
        Ok(())
    }

    fn push_deployment_subtree(
        &mut self,
        deployment_node: Id,
        software_system: Option<Id>,
    ) -> Result<bool, ViewError> {
        let instances: Vec<(Id, Id)> = self
            .model
            .container_instances_of(deployment_node)
            .filter_map(|element| match element.kind() {
                ElementKind::ContainerInstance { container, .. } => {
                    Some((element.id(), *container))
                }
                _ => None,
            })
            .collect();

        let mut has_content = false;
        for (instance, container) in instances {
            let qualifies = match software_system {
                None => true,
                Some(system) => self.model.software_system_of(container)? == system,
            };
            if qualifies {
                self.include_element(instance, true);
                has_content = true;
            }
        }

        // Visit every child; sibling content must be captured even after
        // one branch has already qualified.
        for child in collect_ids(self.model.children_of(deployment_node)) {
            has_content |= self.push_deployment_subtree(child, software_system)?;
        }

        if has_content {
            self.include_element(deployment_node, false);
        } else {
            trace!(node:% = deployment_node; "Pruning deployment node without qualifying content");
        }
        Ok(has_content)
    }

    // -------------------------------------------------------------------------
    // Parallel sequences (dynamic views)
    // -------------------------------------------------------------------------

    /// Opens a parallel block: subsequent relationships are numbered as
    /// branches of the current sequence position.
    pub fn start_parallel_sequence(&mut self) -> Result<(), ViewError> {
        self.require_dynamic("start_parallel_sequence")?;
        self.sequence.start_parallel();
        Ok(())
    }

    /// Closes the innermost parallel block; numbering resumes in the outer
    /// sequence exactly where it stood.
    pub fn end_parallel_sequence(&mut self) -> Result<(), ViewError> {
        self.require_dynamic("end_parallel_sequence")?;
        if !self.sequence.end_parallel() {
            debug!("No parallel sequence to end in view \"{}\"", self.key);
        }
        Ok(())
    }

    fn require_dynamic(&self, operation: &'static str) -> Result<(), ViewError> {
        match self.kind {
            ViewKind::Dynamic { .. } => Ok(()),
            _ => Err(ViewError::Unsupported {
                operation,
                kind: self.kind.label(),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Internal inclusion machinery
    // -------------------------------------------------------------------------

    /// Includes an element, a no-op if it is already present (the
    /// explicit/implicit flag of an existing inclusion never changes).
    ///
    /// Explicit inclusions auto-wire: every model relationship between the
    /// new element and an already-included one is recorded too. Dynamic
    /// views never auto-wire; their relationships carry sequence tokens and
    /// only enter through explicit adds.
    fn include_element(&mut self, element: Id, explicit: bool) {
        if self.elements.contains_key(&element) {
            return;
        }
        trace!(element:% = element, explicit; "Including element in view");
        self.elements.insert(element, ElementView::new(element, explicit));

        if explicit && !matches!(self.kind, ViewKind::Dynamic { .. }) {
            self.wire_relationships(element);
        }
    }

    fn wire_relationships(&mut self, element: Id) {
        let additions: Vec<RelationshipId> = self
            .model
            .relationships_of(element)
            .filter(|relationship| {
                self.elements.contains_key(&relationship.source())
                    && self.elements.contains_key(&relationship.destination())
            })
            .map(Relationship::id)
            .collect();
        for relationship in additions {
            self.record_relationship(relationship, None, None);
        }
    }

    /// Records a relationship inclusion, returning the index of an existing
    /// entry when the (relationship, description, order) triple is already
    /// present.
    fn record_relationship(
        &mut self,
        relationship: RelationshipId,
        description: Option<String>,
        order: Option<Order>,
    ) -> usize {
        if let Some(existing) = self.relationships.iter().position(|view| {
            view.relationship == relationship
                && view.description == description
                && view.order == order
        }) {
            return existing;
        }
        self.relationships
            .push(RelationshipView::new(relationship, description, order));
        self.relationships.len() - 1
    }
}

/// The views of one model, keyed by their unique view keys.
///
/// All views are created through this type so that key uniqueness and
/// scope-element validity can be enforced up front.
#[derive(Debug)]
pub struct ViewSet<'m> {
    model: &'m Model,
    configuration: Configuration,
    views: IndexMap<String, View<'m>>,
}

impl<'m> ViewSet<'m> {
    /// Creates a view set over the given model with default configuration.
    pub fn new(model: &'m Model) -> Self {
        Self::with_configuration(model, Configuration::default())
    }

    /// Creates a view set over the given model with the given configuration.
    pub fn with_configuration(model: &'m Model, configuration: Configuration) -> Self {
        Self {
            model,
            configuration,
            views: IndexMap::new(),
        }
    }

    /// Returns the view set's configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Creates a system context view for the given software system.
    ///
    /// The scope system itself is part of the view from the start.
    pub fn create_system_context_view(
        &mut self,
        software_system: Id,
        key: &str,
        description: &str,
    ) -> Result<&mut View<'m>, ViewError> {
        expect_type(self.model, software_system, ElementType::SoftwareSystem)?;
        let view = self.insert_view(key, description, ViewKind::SystemContext { software_system })?;
        view.include_element(software_system, true);
        Ok(view)
    }

    /// Creates a container view scoped to the given software system.
    pub fn create_container_view(
        &mut self,
        software_system: Id,
        key: &str,
        description: &str,
    ) -> Result<&mut View<'m>, ViewError> {
        expect_type(self.model, software_system, ElementType::SoftwareSystem)?;
        self.insert_view(key, description, ViewKind::Container { software_system })
    }

    /// Creates a component view scoped to the given container.
    pub fn create_component_view(
        &mut self,
        container: Id,
        key: &str,
        description: &str,
    ) -> Result<&mut View<'m>, ViewError> {
        expect_type(self.model, container, ElementType::Container)?;
        self.insert_view(key, description, ViewKind::Component { container })
    }

    /// Creates a dynamic view, scoped to a software system, a container, or
    /// the whole model when `scope` is `None`.
    pub fn create_dynamic_view(
        &mut self,
        scope: Option<DynamicScope>,
        key: &str,
        description: &str,
    ) -> Result<&mut View<'m>, ViewError> {
        match scope {
            Some(DynamicScope::SoftwareSystem(id)) => {
                expect_type(self.model, id, ElementType::SoftwareSystem)?;
            }
            Some(DynamicScope::Container(id)) => {
                expect_type(self.model, id, ElementType::Container)?;
            }
            None => {}
        }
        self.insert_view(key, description, ViewKind::Dynamic { scope })
    }

    /// Creates a deployment view, optionally scoped to one software system.
    pub fn create_deployment_view(
        &mut self,
        software_system: Option<Id>,
        key: &str,
        description: &str,
    ) -> Result<&mut View<'m>, ViewError> {
        if let Some(id) = software_system {
            expect_type(self.model, id, ElementType::SoftwareSystem)?;
        }
        self.insert_view(key, description, ViewKind::Deployment { software_system })
    }

    /// Returns the view with the given key, if it exists.
    pub fn view(&self, key: &str) -> Option<&View<'m>> {
        self.views.get(key)
    }

    /// Returns a mutable reference to the view with the given key.
    pub fn view_mut(&mut self, key: &str) -> Option<&mut View<'m>> {
        self.views.get_mut(key)
    }

    /// Returns an iterator over all views in creation order.
    pub fn views(&self) -> impl Iterator<Item = &View<'m>> {
        self.views.values()
    }

    /// Returns the display name of the view with the given key, built with
    /// this view set's terminology.
    pub fn display_name(&self, key: &str) -> Option<String> {
        self.views
            .get(key)
            .map(|view| view.name_with(self.configuration.terminology()))
    }

    fn insert_view(
        &mut self,
        key: &str,
        description: &str,
        kind: ViewKind,
    ) -> Result<&mut View<'m>, ViewError> {
        match self.views.entry(key.to_string()) {
            Entry::Occupied(_) => Err(ViewError::DuplicateViewKey {
                key: key.to_string(),
            }),
            Entry::Vacant(entry) => {
                debug!("Created {} view \"{key}\"", kind.label());
                Ok(entry.insert(View::new(self.model, key, description, kind)))
            }
        }
    }
}

fn lookup(model: &Model, id: Id) -> Result<&Element, ViewError> {
    model
        .element(id)
        .ok_or_else(|| ViewError::UnknownElement { id: id.to_string() })
}

fn expect_type(model: &Model, id: Id, expected: ElementType) -> Result<&Element, ViewError> {
    let element = lookup(model, id)?;
    if element.element_type() != expected {
        return Err(ViewError::ElementKind {
            name: element.name().to_string(),
            found: element.element_type(),
            expected,
        });
    }
    Ok(element)
}

fn collect_ids<'a>(elements: impl Iterator<Item = &'a Element>) -> Vec<Id> {
    elements.map(Element::id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every included relationship must have both endpoints included.
    fn closure_holds(view: &View<'_>) -> bool {
        view.relationships().iter().all(|relationship_view| {
            let Some(relationship) = view.model.relationship(relationship_view.relationship())
            else {
                return false;
            };
            view.contains(relationship.source()) && view.contains(relationship.destination())
        })
    }

    fn bank_model() -> (Model, Id, Id, Id, Id) {
        let mut model = Model::new();
        let customer = model.add_person("Customer", None).unwrap();
        let bank = model.add_software_system("Internet Banking", None).unwrap();
        let web = model
            .add_container(bank, "Web Application", None, Some("Rust"))
            .unwrap();
        let db = model
            .add_container(bank, "Database", None, Some("PostgreSQL"))
            .unwrap();
        model
            .add_relationship(customer, web, Some("Uses"), None)
            .unwrap();
        model
            .add_relationship(web, db, Some("Reads from and writes to"), None)
            .unwrap();
        (model, customer, bank, web, db)
    }

    #[test]
    fn test_adding_an_element_twice_is_idempotent() {
        let (model, customer, bank, _, _) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views
            .create_system_context_view(bank, "context", "")
            .unwrap();

        view.add_person(customer).unwrap();
        view.add_person(customer).unwrap();

        assert_eq!(view.elements().count(), 2); // scope system + customer
        assert!(closure_holds(view));
    }

    #[test]
    fn test_explicit_inclusion_auto_wires_relationships() {
        let (model, customer, bank, web, db) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();

        view.add_person(customer).unwrap();
        view.add_container(web).unwrap();
        view.add_container(db).unwrap();

        assert_eq!(view.relationships().len(), 2);
        assert!(closure_holds(view));
    }

    #[test]
    fn test_auto_wiring_does_not_duplicate() {
        let (model, customer, bank, web, _) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();

        view.add_person(customer).unwrap();
        view.add_container(web).unwrap();
        view.add_relationship(customer, web).unwrap();

        assert_eq!(view.relationships().len(), 1);
    }

    #[test]
    fn test_scope_system_is_an_implicit_dependency() {
        let (model, _, bank, _, _) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();

        view.add_all_elements().unwrap();

        let scope_entry = view.element_view(bank).unwrap();
        assert!(!scope_entry.is_explicit());
    }

    #[test]
    fn test_missing_relationship_leaves_view_unmodified() {
        let (model, customer, bank, _, db) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();

        // No customer -> db relationship exists in the model.
        let result = view.add_relationship(customer, db);
        assert!(matches!(result, Err(ViewError::MissingRelationship { .. })));
        assert_eq!(view.elements().count(), 0);
        assert!(view.relationships().is_empty());
    }

    #[test]
    fn test_relationship_pulls_endpoints_in_implicitly() {
        let (model, customer, bank, web, _) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();

        view.add_relationship(customer, web).unwrap();

        assert!(view.contains(customer));
        assert!(view.contains(web));
        assert!(!view.element_view(customer).unwrap().is_explicit());
        assert!(closure_holds(view));
    }

    #[test]
    fn test_remove_element_drops_its_relationships() {
        let (model, customer, bank, web, db) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();
        view.add_person(customer).unwrap();
        view.add_container(web).unwrap();
        view.add_container(db).unwrap();

        view.remove_element(web);

        assert!(!view.contains(web));
        assert!(view.relationships().is_empty());
        assert!(closure_holds(view));
    }

    #[test]
    fn test_relationship_dedup_is_on_the_full_triple() {
        let (model, customer, bank, web, _) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();
        let relationship = model.relationship_between(customer, web).unwrap();

        let first = view.record_relationship(relationship, None, None);
        let again = view.record_relationship(relationship, None, None);
        let described = view.record_relationship(relationship, Some("Signs in".into()), None);

        assert_eq!(first, again);
        assert_ne!(first, described);
        assert_eq!(view.relationships().len(), 2);
    }

    #[test]
    fn test_deployment_pruning_keeps_only_qualifying_branches() {
        let (mut model, _, bank, web, _) = bank_model();
        let other = model.add_software_system("Mainframe", None).unwrap();
        let batch = model.add_container(other, "Batch", None, None).unwrap();

        let root = model.add_deployment_node(None, "AWS", None).unwrap();
        let mid = model.add_deployment_node(Some(root), "us-east-1", None).unwrap();
        let leaf = model.add_deployment_node(Some(mid), "EC2", None).unwrap();
        let empty = model.add_deployment_node(Some(root), "eu-west-1", None).unwrap();
        let foreign = model.add_deployment_node(Some(empty), "Mainframe Host", None).unwrap();
        let instance = model.add_container_instance(leaf, web).unwrap();
        let foreign_instance = model.add_container_instance(foreign, batch).unwrap();

        let mut views = ViewSet::new(&model);
        let view = views
            .create_deployment_view(Some(bank), "deployment", "")
            .unwrap();
        view.add_all_deployment_nodes().unwrap();

        for id in [root, mid, leaf, instance] {
            assert!(view.contains(id), "{id} should be included");
        }
        for id in [empty, foreign, foreign_instance] {
            assert!(!view.contains(id), "{id} should be pruned");
        }
        assert!(view.element_view(instance).unwrap().is_explicit());
        assert!(!view.element_view(leaf).unwrap().is_explicit());
    }

    #[test]
    fn test_deployment_add_of_barren_leaf_adds_nothing() {
        let (mut model, _, bank, _, _) = bank_model();
        let root = model.add_deployment_node(None, "AWS", None).unwrap();
        let mid = model.add_deployment_node(Some(root), "us-east-1", None).unwrap();
        let leaf = model.add_deployment_node(Some(mid), "EC2", None).unwrap();

        let mut views = ViewSet::new(&model);
        let view = views
            .create_deployment_view(Some(bank), "deployment", "")
            .unwrap();
        view.add_deployment_node(leaf).unwrap();

        assert_eq!(view.elements().count(), 0);
    }

    #[test]
    fn test_pruned_ancestors_requalify_on_later_adds() {
        let (mut model, _, bank, web, _) = bank_model();
        let root = model.add_deployment_node(None, "AWS", None).unwrap();
        let empty = model.add_deployment_node(Some(root), "empty", None).unwrap();
        let full = model.add_deployment_node(Some(root), "full", None).unwrap();
        model.add_container_instance(full, web).unwrap();

        let mut views = ViewSet::new(&model);
        let view = views
            .create_deployment_view(Some(bank), "deployment", "")
            .unwrap();

        view.add_deployment_node(empty).unwrap();
        assert_eq!(view.elements().count(), 0);

        view.add_deployment_node(full).unwrap();
        assert!(view.contains(root));
        assert!(view.contains(full));
        assert!(!view.contains(empty));
    }

    #[test]
    fn test_dynamic_view_stamps_and_orders_relationships() {
        let (model, customer, bank, web, db) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views
            .create_dynamic_view(Some(DynamicScope::SoftwareSystem(bank)), "signin", "")
            .unwrap();

        view.add_relationship_with_description(customer, "Requests sign in", web)
            .unwrap();
        view.start_parallel_sequence().unwrap();
        view.add_relationship_with_description(web, "Checks credentials", db)
            .unwrap();
        view.add_relationship_with_description(web, "Writes audit record", db)
            .unwrap();
        view.end_parallel_sequence().unwrap();
        view.add_relationship_with_description(customer, "Retries", web)
            .unwrap();

        let orders: Vec<&str> = view
            .relationships_in_order()
            .iter()
            .filter_map(|relationship_view| relationship_view.order().map(Order::as_str))
            .collect();
        assert_eq!(orders, vec!["1", "1.1", "1.2", "2"]);
        assert!(closure_holds(view));
    }

    #[test]
    fn test_dynamic_views_do_not_auto_wire() {
        let (model, customer, _, web, _) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_dynamic_view(None, "all", "").unwrap();

        view.add_person(customer).unwrap();
        view.add_container(web).unwrap();

        assert!(view.relationships().is_empty());
    }

    #[test]
    fn test_nearest_neighbours_is_type_filtered() {
        let (model, customer, bank, web, db) = bank_model();
        let mut views = ViewSet::new(&model);
        let view = views.create_container_view(bank, "containers", "").unwrap();

        view.add_nearest_neighbours(web, ElementType::Container)
            .unwrap();
        assert!(view.contains(web));
        assert!(view.contains(db));
        assert!(!view.contains(customer));
        assert_eq!(view.relationships().len(), 1);

        view.add_nearest_neighbours(web, ElementType::Person).unwrap();
        assert!(view.contains(customer));
        assert_eq!(view.relationships().len(), 2);
        assert!(closure_holds(view));
    }

    #[test]
    fn test_view_names_use_terminology() {
        let (model, _, bank, _, _) = bank_model();
        let configuration = Configuration::new(
            Terminology::default().with_term(ElementType::Container, "Service"),
        );
        let mut views = ViewSet::with_configuration(&model, configuration);
        views.create_container_view(bank, "containers", "").unwrap();

        assert_eq!(
            views.display_name("containers").as_deref(),
            Some("Internet Banking - Services")
        );
        assert_eq!(
            views.view("containers").unwrap().name(),
            "Internet Banking - Containers"
        );
    }

    #[test]
    fn test_duplicate_view_keys_are_rejected() {
        let (model, _, bank, _, _) = bank_model();
        let mut views = ViewSet::new(&model);
        views.create_container_view(bank, "v1", "").unwrap();

        assert!(matches!(
            views.create_system_context_view(bank, "v1", ""),
            Err(ViewError::DuplicateViewKey { key }) if key == "v1"
        ));
    }

    #[test]
    fn test_view_creation_validates_scope_kind() {
        let (model, customer, _, web, _) = bank_model();
        let mut views = ViewSet::new(&model);

        assert!(matches!(
            views.create_container_view(customer, "bad", ""),
            Err(ViewError::ElementKind { .. })
        ));
        assert!(matches!(
            views.create_dynamic_view(Some(DynamicScope::SoftwareSystem(web)), "bad", ""),
            Err(ViewError::ElementKind { .. })
        ));
    }
}
