use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::{KablanError, Result};
use crate::fmt::shekel;
use crate::importer::{log_import, parse_file, submit_candidates};
use crate::models::CostItemCandidate;
use crate::settings::{open_configured_store, shellexpand_path};
use crate::template::{write_template, TEMPLATE_FILE_NAME};

fn preview_table(candidates: &[CostItemCandidate]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "#", "Name", "Category", "Estimated", "Actual", "VAT", "Status",
    ]);
    for c in candidates {
        let status = if c.is_valid() {
            "ok".green().to_string()
        } else {
            c.errors.join("; ").red().to_string()
        };
        table.add_row(vec![
            Cell::new(c.row_index),
            Cell::new(&c.name),
            Cell::new(c.category.label()),
            Cell::new(shekel(c.estimated_amount)),
            Cell::new(c.actual_amount.map(shekel).unwrap_or_default()),
            Cell::new(if c.vat_included { "incl" } else { "excl" }),
            Cell::new(status),
        ]);
    }
    table
}

pub fn run(
    file: &str,
    project: &str,
    professional: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.get_project(project)?;
    let professional = match professional {
        Some(name) => Some(store.get_professional(name)?),
        None => None,
    };

    let path = PathBuf::from(shellexpand_path(file));
    let candidates = parse_file(&path)?;
    let valid = candidates.iter().filter(|c| c.is_valid()).count();

    println!("{}", preview_table(&candidates));
    println!(
        "{} rows parsed: {} valid, {} with errors",
        candidates.len(),
        valid,
        candidates.len() - valid
    );

    if dry_run {
        println!("Dry run: nothing imported.");
        return Ok(());
    }
    if valid == 0 {
        return Err(KablanError::NoImportableRows);
    }

    let report = submit_candidates(store.as_mut(), &project, &candidates);
    log_import(
        store.as_mut(),
        &path,
        &project,
        professional.as_ref().map(|p| p.id.as_str()),
        candidates.len(),
        report.success,
    )?;

    println!("Created {} of {} items", report.success, valid);
    for e in &report.errors {
        println!("{}", format!("  row {} ({}): {}", e.index + 1, e.name, e.error).red());
    }
    Ok(())
}

pub fn template(output: Option<&str>) -> Result<()> {
    let path = PathBuf::from(output.unwrap_or(TEMPLATE_FILE_NAME));
    write_template(&path)?;
    println!("Wrote template to {}", path.display());
    Ok(())
}
