use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db;
use crate::error::{KablanError, Result};
use crate::models::{
    new_id, timestamp_now, CostCategory, CostItem, CostStatus, ImportRecord, NewCostItem,
    Professional, Project,
};

use super::{CostItemStore, ImportLogStore, ProfessionalStore, ProjectStore};

pub const DB_FILE_NAME: &str = "kablan.db";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(data_dir: &Path) -> Result<SqliteStore> {
        std::fs::create_dir_all(data_dir)?;
        let conn = db::get_connection(&data_dir.join(DB_FILE_NAME))?;
        db::init_db(&conn)?;
        Ok(SqliteStore { conn })
    }
}

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        vat_rate: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn professional_from_row(row: &Row) -> rusqlite::Result<Professional> {
    Ok(Professional {
        id: row.get(0)?,
        name: row.get(1)?,
        company: row.get(2)?,
        field: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// Unknown category/status keys in the database fall back to the defaults
// rather than failing the whole query.
fn cost_item_from_row(row: &Row) -> rusqlite::Result<CostItem> {
    let category: String = row.get(4)?;
    let status: String = row.get(9)?;
    Ok(CostItem {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: CostCategory::from_key(&category).unwrap_or(CostCategory::Contractor),
        estimated_amount: row.get(5)?,
        actual_amount: row.get(6)?,
        vat_included: row.get(7)?,
        vat_rate: row.get(8)?,
        status: CostStatus::from_key(&status).unwrap_or(CostStatus::Draft),
        notes: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

const COST_ITEM_COLUMNS: &str = "id, project_id, name, description, category, estimated_amount, \
     actual_amount, vat_included, vat_rate, status, notes, created_at, updated_at";

fn import_from_row(row: &Row) -> rusqlite::Result<ImportRecord> {
    Ok(ImportRecord {
        id: row.get(0)?,
        filename: row.get(1)?,
        project_id: row.get(2)?,
        professional_id: row.get(3)?,
        row_count: row.get::<_, i64>(4)? as usize,
        created_count: row.get::<_, i64>(5)? as usize,
        checksum: row.get(6)?,
        imported_at: row.get(7)?,
    })
}

impl ProjectStore for SqliteStore {
    fn create_project(&mut self, name: &str, vat_rate: f64) -> Result<Project> {
        let now = timestamp_now();
        let project = Project {
            id: new_id(),
            name: name.to_string(),
            vat_rate,
            created_at: now.clone(),
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO projects (id, name, vat_rate, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![project.id, project.name, project.vat_rate, project.created_at, project.updated_at],
        )?;
        Ok(project)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, vat_rate, created_at, updated_at FROM projects ORDER BY created_at",
        )?;
        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    fn get_project(&self, name: &str) -> Result<Project> {
        self.conn
            .query_row(
                "SELECT id, name, vat_rate, created_at, updated_at FROM projects WHERE name = ?1",
                params![name],
                project_from_row,
            )
            .optional()?
            .ok_or_else(|| KablanError::UnknownProject(name.to_string()))
    }

    fn set_project_vat(&mut self, name: &str, vat_rate: f64) -> Result<Project> {
        let changed = self.conn.execute(
            "UPDATE projects SET vat_rate = ?1, updated_at = ?2 WHERE name = ?3",
            params![vat_rate, timestamp_now(), name],
        )?;
        if changed == 0 {
            return Err(KablanError::UnknownProject(name.to_string()));
        }
        self.get_project(name)
    }
}

impl ProfessionalStore for SqliteStore {
    fn create_professional(
        &mut self,
        name: &str,
        field: &str,
        company: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Professional> {
        let professional = Professional {
            id: new_id(),
            name: name.to_string(),
            company: company.map(str::to_string),
            field: field.to_string(),
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
            is_active: true,
            created_at: timestamp_now(),
        };
        self.conn.execute(
            "INSERT INTO professionals (id, name, company, field, phone, email, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                professional.id,
                professional.name,
                professional.company,
                professional.field,
                professional.phone,
                professional.email,
                professional.is_active,
                professional.created_at
            ],
        )?;
        Ok(professional)
    }

    fn list_professionals(&self) -> Result<Vec<Professional>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, company, field, phone, email, is_active, created_at
             FROM professionals ORDER BY name",
        )?;
        let professionals = stmt
            .query_map([], professional_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(professionals)
    }

    fn get_professional(&self, name: &str) -> Result<Professional> {
        self.conn
            .query_row(
                "SELECT id, name, company, field, phone, email, is_active, created_at
                 FROM professionals WHERE name = ?1 ORDER BY created_at LIMIT 1",
                params![name],
                professional_from_row,
            )
            .optional()?
            .ok_or_else(|| KablanError::UnknownProfessional(name.to_string()))
    }
}

impl CostItemStore for SqliteStore {
    fn create_cost_item(&mut self, item: &NewCostItem) -> Result<CostItem> {
        let now = timestamp_now();
        let created = CostItem {
            id: new_id(),
            project_id: item.project_id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category,
            estimated_amount: item.estimated_amount,
            actual_amount: item.actual_amount,
            vat_included: item.vat_included,
            vat_rate: item.vat_rate,
            status: item.status,
            notes: item.notes.clone(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO cost_items (id, project_id, name, description, category, estimated_amount,
                 actual_amount, vat_included, vat_rate, status, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                created.id,
                created.project_id,
                created.name,
                created.description,
                created.category.key(),
                created.estimated_amount,
                created.actual_amount,
                created.vat_included,
                created.vat_rate,
                created.status.key(),
                created.notes,
                created.created_at,
                created.updated_at
            ],
        )?;
        Ok(created)
    }

    fn list_cost_items(&self, project_id: &str) -> Result<Vec<CostItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COST_ITEM_COLUMNS} FROM cost_items WHERE project_id = ?1 ORDER BY created_at DESC"
        ))?;
        let items = stmt
            .query_map(params![project_id], cost_item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn get_cost_item(&self, project_id: &str, name: &str) -> Result<CostItem> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {COST_ITEM_COLUMNS} FROM cost_items
                     WHERE project_id = ?1 AND name = ?2 ORDER BY created_at DESC LIMIT 1"
                ),
                params![project_id, name],
                cost_item_from_row,
            )
            .optional()?
            .ok_or_else(|| KablanError::UnknownCostItem(name.to_string()))
    }

    fn set_actual_amount(
        &mut self,
        project_id: &str,
        name: &str,
        actual: Option<f64>,
    ) -> Result<CostItem> {
        let mut item = self.get_cost_item(project_id, name)?;
        let now = timestamp_now();
        self.conn.execute(
            "UPDATE cost_items SET actual_amount = ?1, updated_at = ?2 WHERE id = ?3",
            params![actual, now, item.id],
        )?;
        item.actual_amount = actual;
        item.updated_at = now;
        Ok(item)
    }

    fn set_status(&mut self, project_id: &str, name: &str, status: CostStatus) -> Result<CostItem> {
        let mut item = self.get_cost_item(project_id, name)?;
        let now = timestamp_now();
        self.conn.execute(
            "UPDATE cost_items SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.key(), now, item.id],
        )?;
        item.status = status;
        item.updated_at = now;
        Ok(item)
    }

    fn delete_cost_item(&mut self, project_id: &str, name: &str) -> Result<()> {
        let item = self.get_cost_item(project_id, name)?;
        self.conn
            .execute("DELETE FROM cost_items WHERE id = ?1", params![item.id])?;
        Ok(())
    }
}

impl ImportLogStore for SqliteStore {
    fn record_import(&mut self, record: &ImportRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO imports (id, filename, project_id, professional_id, row_count,
                 created_count, checksum, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.filename,
                record.project_id,
                record.professional_id,
                record.row_count as i64,
                record.created_count as i64,
                record.checksum,
                record.imported_at
            ],
        )?;
        Ok(())
    }

    fn list_imports(&self, project_id: &str) -> Result<Vec<ImportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, project_id, professional_id, row_count, created_count,
                 checksum, imported_at
             FROM imports WHERE project_id = ?1 ORDER BY imported_at DESC",
        )?;
        let imports = stmt
            .query_map(params![project_id], import_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(imports)
    }
}
