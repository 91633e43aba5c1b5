//! Example: Building views over an internet banking model
//!
//! This example demonstrates how to programmatically build an architecture
//! model and populate container, dynamic and deployment views over it.

use vantage::{DynamicScope, ViewSet, model::Model};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building the internet banking model...\n");

    let mut model = Model::new();

    let customer = model.add_person("Personal Customer", Some("A customer of the bank."))?;
    let bank = model.add_software_system(
        "Internet Banking System",
        Some("Allows customers to view accounts and make payments."),
    )?;
    let web = model.add_container(bank, "Web Application", None, Some("Rust, axum"))?;
    let api = model.add_container(bank, "API Application", None, Some("Rust"))?;
    let db = model.add_container(bank, "Database", None, Some("PostgreSQL"))?;
    let mainframe = model.add_software_system(
        "Mainframe Banking System",
        Some("Stores the core banking ledger."),
    )?;

    model.add_relationship(customer, web, Some("Uses"), Some("HTTPS"))?;
    model.add_relationship(web, api, Some("Makes API calls to"), Some("JSON/HTTPS"))?;
    model.add_relationship(api, db, Some("Reads from and writes to"), Some("SQL"))?;
    model.add_relationship(api, mainframe, Some("Uses"), None)?;

    let aws = model.add_deployment_node(None, "AWS", None)?;
    let region = model.add_deployment_node(Some(aws), "us-east-1", None)?;
    let host = model.add_deployment_node(Some(region), "EC2 Host", None)?;
    model.add_container_instance(host, web)?;
    model.add_container_instance(host, api)?;

    let mut views = ViewSet::new(&model);

    // A container view of the banking system.
    let containers = views.create_container_view(bank, "containers", "The bank's containers")?;
    containers.add_all_elements()?;
    println!("{}", containers.name());
    for element_view in containers.elements() {
        let element = model.expect_element(element_view.element())?;
        println!("  - {} ({})", element.name(), element.element_type());
    }

    // A dynamic view of a sign-in, with parallel credential checks.
    let dynamic = views.create_dynamic_view(
        Some(DynamicScope::SoftwareSystem(bank)),
        "signin",
        "Customer signs in",
    )?;
    dynamic.add_relationship_with_description(customer, "Submits credentials to", web)?;
    dynamic.start_parallel_sequence()?;
    dynamic.add_relationship_with_description(web, "Validates credentials with", api)?;
    dynamic.add_relationship_with_description(web, "Records the sign-in attempt with", api)?;
    dynamic.end_parallel_sequence()?;
    dynamic.add_relationship_with_description(customer, "Sees the dashboard from", web)?;

    println!("\n{}", dynamic.name());
    for relationship_view in dynamic.relationships_in_order() {
        let relationship = model
            .relationship(relationship_view.relationship())
            .expect("relationship views always point into the model");
        let source = model.expect_element(relationship.source())?;
        let destination = model.expect_element(relationship.destination())?;
        println!(
            "  {}. {} -> {}: {}",
            relationship_view.order().map(ToString::to_string).unwrap_or_default(),
            source.name(),
            destination.name(),
            relationship_view.description().unwrap_or("")
        );
    }

    // A deployment view, pruned to nodes that host the bank's containers.
    let deployment = views.create_deployment_view(Some(bank), "deployment", "Live deployment")?;
    deployment.add_all_deployment_nodes()?;
    println!("\n{}", deployment.name());
    for element_view in deployment.elements() {
        let element = model.expect_element(element_view.element())?;
        println!("  - {}", element.name());
    }

    Ok(())
}
