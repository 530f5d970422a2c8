use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::budget::{classify_variance, line_totals, VarianceClass};
use crate::error::{KablanError, Result};
use crate::fmt::{shekel, signed_pct};
use crate::models::{CostCategory, CostItem, CostStatus, NewCostItem};
use crate::settings::open_configured_store;

fn parse_category(token: Option<&str>) -> Result<CostCategory> {
    match token {
        None => Ok(CostCategory::Contractor),
        Some(t) => {
            CostCategory::from_key(t).ok_or_else(|| KablanError::UnknownCategory(t.to_string()))
        }
    }
}

pub fn add(
    project: &str,
    name: &str,
    estimated: Option<f64>,
    quantity: Option<f64>,
    unit_price: Option<f64>,
    category: Option<&str>,
    no_vat: bool,
    description: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let category = parse_category(category)?;

    let (estimated_amount, breakdown) = match (estimated, quantity, unit_price) {
        (Some(amount), None, None) => (amount, None),
        (None, Some(q), Some(u)) => {
            let totals = line_totals(q, u, project.vat_rate);
            (totals.total_price, Some(totals))
        }
        _ => {
            return Err(KablanError::Other(
                "give --estimated, or --quantity together with --unit-price".to_string(),
            ))
        }
    };
    if estimated_amount <= 0.0 {
        return Err(KablanError::Other(
            "estimated amount must be greater than zero".to_string(),
        ));
    }

    let item = store.create_cost_item(&NewCostItem {
        project_id: project.id.clone(),
        name: name.to_string(),
        description: description.map(str::to_string),
        category,
        estimated_amount,
        actual_amount: None,
        vat_included: !no_vat,
        vat_rate: project.vat_rate,
        status: CostStatus::Draft,
        notes: notes.map(str::to_string),
    })?;

    println!("Added cost item: {} ({})", item.name, item.category.key());
    if let Some(totals) = breakdown {
        println!("  Net:    {}", shekel(totals.total_price));
        println!(
            "  VAT:    {} ({:.0}%)",
            shekel(totals.vat_amount),
            project.vat_rate * 100.0
        );
        println!("  Gross:  {}", shekel(totals.total_with_vat));
    }
    Ok(())
}

fn variance_cell(item: &CostItem) -> String {
    let actual = match item.actual_amount {
        Some(a) => a,
        None => return String::new(),
    };
    let variance = actual - item.estimated_amount;
    match classify_variance(Some(item.estimated_amount), variance) {
        VarianceClass::Saving => {
            let pct = variance / item.estimated_amount * 100.0;
            format!("{} ({})", shekel(variance), signed_pct(pct))
                .green()
                .to_string()
        }
        VarianceClass::Overrun => {
            let pct = variance / item.estimated_amount * 100.0;
            format!("+{} ({})", shekel(variance), signed_pct(pct))
                .red()
                .to_string()
        }
        VarianceClass::Exact => shekel(0.0),
        VarianceClass::NoEstimate => "no estimate".dimmed().to_string(),
    }
}

pub fn list(project: &str) -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let items = store.list_cost_items(&project.id)?;

    let mut table = Table::new();
    table.set_header(vec![
        "Name", "Category", "Status", "Estimated", "Actual", "Variance", "VAT",
    ]);
    for item in &items {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(item.category.key()),
            Cell::new(item.status.key()),
            Cell::new(shekel(item.estimated_amount)),
            Cell::new(item.actual_amount.map(shekel).unwrap_or_default()),
            Cell::new(variance_cell(item)),
            Cell::new(if item.vat_included { "incl" } else { "excl" }),
        ]);
    }
    println!("{} ({} items)\n{table}", project.name, items.len());
    Ok(())
}

pub fn summary(project: &str) -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let items = store.list_cost_items(&project.id)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Items", "Estimated", "Actual"]);
    for category in CostCategory::ALL {
        let in_category: Vec<&CostItem> =
            items.iter().filter(|i| i.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        let estimated: f64 = in_category.iter().map(|i| i.estimated_amount).sum();
        let actual: f64 = in_category.iter().filter_map(|i| i.actual_amount).sum();
        table.add_row(vec![
            Cell::new(category.key()),
            Cell::new(in_category.len()),
            Cell::new(shekel(estimated)),
            Cell::new(shekel(actual)),
        ]);
    }

    let total_estimated: f64 = items.iter().map(|i| i.estimated_amount).sum();
    let total_actual: f64 = items.iter().filter_map(|i| i.actual_amount).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(items.len()),
        Cell::new(shekel(total_estimated).bold()),
        Cell::new(shekel(total_actual).bold()),
    ]);

    // VAT is owed only on items whose amounts do not already include it.
    let vat_base: f64 = items
        .iter()
        .filter(|i| !i.vat_included)
        .map(|i| i.estimated_amount)
        .sum();
    let totals = line_totals(1.0, vat_base, project.vat_rate);

    println!("{} summary\n{table}", project.name);
    println!(
        "VAT due ({:.0}% on {} excl-VAT): {}",
        project.vat_rate * 100.0,
        shekel(vat_base),
        shekel(totals.vat_amount)
    );
    println!("Estimated incl VAT: {}", shekel(total_estimated + totals.vat_amount));
    Ok(())
}

pub fn set_actual(project: &str, name: &str, amount: f64) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let item = store.set_actual_amount(&project.id, name, Some(amount))?;

    let variance = amount - item.estimated_amount;
    let note = match classify_variance(Some(item.estimated_amount), variance) {
        VarianceClass::Saving => format!("saving of {}", shekel(-variance)).green().to_string(),
        VarianceClass::Overrun => format!("overrun of {}", shekel(variance)).red().to_string(),
        VarianceClass::Exact => "on estimate".to_string(),
        VarianceClass::NoEstimate => "no estimate to compare".dimmed().to_string(),
    };
    println!("Set actual for {}: {} ({note})", item.name, shekel(amount));
    Ok(())
}

pub fn set_status(project: &str, name: &str, status: &str) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let status = CostStatus::from_key(status)
        .ok_or_else(|| KablanError::Other(format!("Unknown status: {status}")))?;
    let item = store.set_status(&project.id, name, status)?;
    println!("Set status for {}: {}", item.name, item.status.key());
    Ok(())
}

pub fn delete(project: &str, name: &str) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let item = store.get_cost_item(&project.id, name)?;
    store.delete_cost_item(&project.id, name)?;
    println!(
        "Deleted cost item: {} ({})",
        item.name,
        shekel(item.estimated_amount)
    );
    Ok(())
}

pub fn export(project: &str, output: Option<&str>) -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let items = store.list_cost_items(&project.id)?;

    let path = output
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-costs.csv", project.name.replace(' ', "-")));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "name",
        "description",
        "category",
        "estimated_amount",
        "actual_amount",
        "vat_included",
        "vat_rate",
        "status",
        "notes",
        "created_at",
    ])?;
    for item in &items {
        writer.write_record([
            item.name.as_str(),
            item.description.as_deref().unwrap_or(""),
            item.category.key(),
            &item.estimated_amount.to_string(),
            &item
                .actual_amount
                .map(|a| a.to_string())
                .unwrap_or_default(),
            if item.vat_included { "true" } else { "false" },
            &item.vat_rate.to_string(),
            item.status.key(),
            item.notes.as_deref().unwrap_or(""),
            item.created_at.as_str(),
        ])?;
    }
    writer.flush()?;

    println!("Exported {} items to {path}", items.len());
    Ok(())
}
