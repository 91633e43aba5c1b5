//! Vantage - a library for building views over software architecture models.
//!
//! An architecture model is a graph of elements (people, software systems,
//! containers, components, deployment nodes and container instances)
//! connected by directed relationships. Vantage lets you populate named
//! views over that graph - system context, container, component, dynamic
//! and deployment views - while it enforces which elements are legal in
//! which view, pulls in implied elements and relationships, prunes
//! irrelevant deployment branches, and stamps dynamic interactions with
//! sortable sequence tokens.
//!
//! # Examples
//!
//! ```
//! use vantage::{ViewSet, model::Model};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut model = Model::new();
//! let customer = model.add_person("Customer", Some("A personal banking customer."))?;
//! let bank = model.add_software_system("Internet Banking", None)?;
//! let web = model.add_container(bank, "Web Application", None, Some("Rust"))?;
//! let db = model.add_container(bank, "Database", None, Some("PostgreSQL"))?;
//! model.add_relationship(customer, web, Some("Uses"), None)?;
//! model.add_relationship(web, db, Some("Reads from and writes to"), None)?;
//!
//! let mut views = ViewSet::new(&model);
//! let view = views.create_container_view(bank, "containers", "Containers of the bank")?;
//! view.add_all_elements()?;
//!
//! assert!(view.contains(customer));
//! assert_eq!(view.relationships().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;

mod error;
mod view;

pub use vantage_core::{identifier, model};

pub use error::ViewError;
pub use view::{DynamicScope, ElementView, Order, RelationshipView, View, ViewKind, ViewSet};
