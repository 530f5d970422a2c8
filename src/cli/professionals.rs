use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::open_configured_store;

pub fn add(
    name: &str,
    field: &str,
    company: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let professional = store.create_professional(name, field, company, phone, email)?;
    println!("Added professional: {} ({})", professional.name, professional.field);
    Ok(())
}

pub fn list() -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let professionals = store.list_professionals()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Field", "Company", "Phone", "Email", "Active"]);
    for p in professionals {
        table.add_row(vec![
            Cell::new(&p.name),
            Cell::new(&p.field),
            Cell::new(p.company.as_deref().unwrap_or("")),
            Cell::new(p.phone.as_deref().unwrap_or("")),
            Cell::new(p.email.as_deref().unwrap_or("")),
            Cell::new(if p.is_active { "yes" } else { "no" }),
        ]);
    }
    println!("Professionals\n{table}");
    Ok(())
}
