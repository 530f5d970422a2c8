use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::shekel;
use crate::settings::open_configured_store;

pub fn add(name: &str, vat_rate: Option<f64>) -> Result<()> {
    let (settings, mut store) = open_configured_store()?;
    let rate = vat_rate.unwrap_or(settings.default_vat_rate);
    let project = store.create_project(name, rate)?;
    println!(
        "Added project: {} (VAT {:.0}%)",
        project.name,
        project.vat_rate * 100.0
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let projects = store.list_projects()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "VAT", "Items", "Estimated", "Actual"]);
    for project in &projects {
        let items = store.list_cost_items(&project.id)?;
        let estimated: f64 = items.iter().map(|i| i.estimated_amount).sum();
        let actual: f64 = items.iter().filter_map(|i| i.actual_amount).sum();
        table.add_row(vec![
            Cell::new(&project.name),
            Cell::new(format!("{:.0}%", project.vat_rate * 100.0)),
            Cell::new(items.len()),
            Cell::new(shekel(estimated)),
            Cell::new(shekel(actual)),
        ]);
    }
    println!("Projects\n{table}");
    Ok(())
}

pub fn set_vat(name: &str, rate: f64) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.set_project_vat(name, rate)?;
    println!(
        "Updated project: {} (VAT {:.0}%)",
        project.name,
        project.vat_rate * 100.0
    );
    Ok(())
}
