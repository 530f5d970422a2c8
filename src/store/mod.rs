//! Persistence layer. Commands talk to the repository traits below and never
//! learn which backend is active; `open_store` picks the implementation from
//! the mode recorded in settings, once, at startup.

mod json;
mod sqlite;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    BulkCreateError, BulkCreateReport, CostItem, CostStatus, ImportRecord, NewCostItem,
    Professional, Project,
};

pub use json::{JsonStore, DEMO_FILE_NAME};
pub use sqlite::{SqliteStore, DB_FILE_NAME};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceMode {
    Demo,
    #[default]
    Database,
}

impl PersistenceMode {
    pub fn key(&self) -> &'static str {
        match self {
            PersistenceMode::Demo => "demo",
            PersistenceMode::Database => "database",
        }
    }
}

pub trait ProjectStore {
    fn create_project(&mut self, name: &str, vat_rate: f64) -> Result<Project>;
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn get_project(&self, name: &str) -> Result<Project>;
    fn set_project_vat(&mut self, name: &str, vat_rate: f64) -> Result<Project>;
}

pub trait ProfessionalStore {
    fn create_professional(
        &mut self,
        name: &str,
        field: &str,
        company: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Professional>;
    /// Ordered by name.
    fn list_professionals(&self) -> Result<Vec<Professional>>;
    fn get_professional(&self, name: &str) -> Result<Professional>;
}

pub trait CostItemStore {
    fn create_cost_item(&mut self, item: &NewCostItem) -> Result<CostItem>;
    /// Newest first.
    fn list_cost_items(&self, project_id: &str) -> Result<Vec<CostItem>>;
    /// Resolves by name within a project; with duplicate names the most
    /// recently created item wins.
    fn get_cost_item(&self, project_id: &str, name: &str) -> Result<CostItem>;
    fn set_actual_amount(
        &mut self,
        project_id: &str,
        name: &str,
        actual: Option<f64>,
    ) -> Result<CostItem>;
    fn set_status(&mut self, project_id: &str, name: &str, status: CostStatus) -> Result<CostItem>;
    fn delete_cost_item(&mut self, project_id: &str, name: &str) -> Result<()>;

    /// Creates items one by one, collecting per-index failures instead of
    /// aborting the batch. Partial success is a normal outcome.
    fn bulk_create_cost_items(&mut self, items: &[NewCostItem]) -> Result<BulkCreateReport> {
        let mut report = BulkCreateReport {
            success: 0,
            errors: Vec::new(),
        };
        for (i, item) in items.iter().enumerate() {
            match self.create_cost_item(item) {
                Ok(_) => report.success += 1,
                Err(e) => report.errors.push(BulkCreateError {
                    index: i,
                    name: item.name.clone(),
                    error: e.to_string(),
                }),
            }
        }
        Ok(report)
    }
}

pub trait ImportLogStore {
    fn record_import(&mut self, record: &ImportRecord) -> Result<()>;
    /// Newest first.
    fn list_imports(&self, project_id: &str) -> Result<Vec<ImportRecord>>;
}

pub trait Store: ProjectStore + ProfessionalStore + CostItemStore + ImportLogStore {}

impl<T: ProjectStore + ProfessionalStore + CostItemStore + ImportLogStore> Store for T {}

pub fn open_store(mode: PersistenceMode, data_dir: &Path) -> Result<Box<dyn Store>> {
    match mode {
        PersistenceMode::Demo => Ok(Box::new(JsonStore::open(data_dir)?)),
        PersistenceMode::Database => Ok(Box::new(SqliteStore::open(data_dir)?)),
    }
}
