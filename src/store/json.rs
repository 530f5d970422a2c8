use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KablanError, Result};
use crate::models::{
    new_id, timestamp_now, CostItem, CostStatus, ImportRecord, NewCostItem, Professional, Project,
};

use super::{CostItemStore, ImportLogStore, ProfessionalStore, ProjectStore};

pub const DEMO_FILE_NAME: &str = "demo.json";

/// Everything demo mode knows, in one document. Every write is a full
/// read-modify-write of the file; last write wins.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DemoDocument {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    professionals: Vec<Professional>,
    #[serde(default)]
    cost_items: Vec<CostItem>,
    #[serde(default)]
    imports: Vec<ImportRecord>,
}

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn open(data_dir: &Path) -> Result<JsonStore> {
        std::fs::create_dir_all(data_dir)?;
        Ok(JsonStore {
            path: data_dir.join(DEMO_FILE_NAME),
        })
    }

    fn load(&self) -> Result<DemoDocument> {
        if !self.path.exists() {
            return Ok(DemoDocument::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| KablanError::Store(e.to_string()))
    }

    fn save(&self, doc: &DemoDocument) -> Result<()> {
        let json =
            serde_json::to_string_pretty(doc).map_err(|e| KablanError::Store(e.to_string()))?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }
}

fn resolve_item(doc: &DemoDocument, project_id: &str, name: &str) -> Result<usize> {
    doc.cost_items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.project_id == project_id && item.name == name)
        .max_by(|(_, a), (_, b)| a.created_at.cmp(&b.created_at))
        .map(|(i, _)| i)
        .ok_or_else(|| KablanError::UnknownCostItem(name.to_string()))
}

impl ProjectStore for JsonStore {
    fn create_project(&mut self, name: &str, vat_rate: f64) -> Result<Project> {
        let mut doc = self.load()?;
        if doc.projects.iter().any(|p| p.name == name) {
            return Err(KablanError::Store(format!(
                "a project named '{name}' already exists"
            )));
        }
        let now = timestamp_now();
        let project = Project {
            id: new_id(),
            name: name.to_string(),
            vat_rate,
            created_at: now.clone(),
            updated_at: now,
        };
        doc.projects.push(project.clone());
        self.save(&doc)?;
        Ok(project)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.load()?.projects)
    }

    fn get_project(&self, name: &str) -> Result<Project> {
        self.load()?
            .projects
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| KablanError::UnknownProject(name.to_string()))
    }

    fn set_project_vat(&mut self, name: &str, vat_rate: f64) -> Result<Project> {
        let mut doc = self.load()?;
        let project = doc
            .projects
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| KablanError::UnknownProject(name.to_string()))?;
        project.vat_rate = vat_rate;
        project.updated_at = timestamp_now();
        let updated = project.clone();
        self.save(&doc)?;
        Ok(updated)
    }
}

impl ProfessionalStore for JsonStore {
    fn create_professional(
        &mut self,
        name: &str,
        field: &str,
        company: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Professional> {
        let mut doc = self.load()?;
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
        doc.professionals.push(professional.clone());
        self.save(&doc)?;
        Ok(professional)
    }

    fn list_professionals(&self) -> Result<Vec<Professional>> {
        let mut professionals = self.load()?.professionals;
        professionals.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(professionals)
    }

    fn get_professional(&self, name: &str) -> Result<Professional> {
        self.load()?
            .professionals
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| KablanError::UnknownProfessional(name.to_string()))
    }
}

impl CostItemStore for JsonStore {
    fn create_cost_item(&mut self, item: &NewCostItem) -> Result<CostItem> {
        let mut doc = self.load()?;
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
        doc.cost_items.push(created.clone());
        self.save(&doc)?;
        Ok(created)
    }

    fn list_cost_items(&self, project_id: &str) -> Result<Vec<CostItem>> {
        let mut items: Vec<CostItem> = self
            .load()?
            .cost_items
            .into_iter()
            .filter(|item| item.project_id == project_id)
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    fn get_cost_item(&self, project_id: &str, name: &str) -> Result<CostItem> {
        let doc = self.load()?;
        let idx = resolve_item(&doc, project_id, name)?;
        Ok(doc.cost_items[idx].clone())
    }

    fn set_actual_amount(
        &mut self,
        project_id: &str,
        name: &str,
        actual: Option<f64>,
    ) -> Result<CostItem> {
        let mut doc = self.load()?;
        let idx = resolve_item(&doc, project_id, name)?;
        let item = &mut doc.cost_items[idx];
        item.actual_amount = actual;
        item.updated_at = timestamp_now();
        let updated = item.clone();
        self.save(&doc)?;
        Ok(updated)
    }

    fn set_status(&mut self, project_id: &str, name: &str, status: CostStatus) -> Result<CostItem> {
        let mut doc = self.load()?;
        let idx = resolve_item(&doc, project_id, name)?;
        let item = &mut doc.cost_items[idx];
        item.status = status;
        item.updated_at = timestamp_now();
        let updated = item.clone();
        self.save(&doc)?;
        Ok(updated)
    }

    fn delete_cost_item(&mut self, project_id: &str, name: &str) -> Result<()> {
        let mut doc = self.load()?;
        let idx = resolve_item(&doc, project_id, name)?;
        doc.cost_items.remove(idx);
        self.save(&doc)
    }
}

impl ImportLogStore for JsonStore {
    fn record_import(&mut self, record: &ImportRecord) -> Result<()> {
        let mut doc = self.load()?;
        doc.imports.push(record.clone());
        self.save(&doc)
    }

    fn list_imports(&self, project_id: &str) -> Result<Vec<ImportRecord>> {
        let mut imports: Vec<ImportRecord> = self
            .load()?
            .imports
            .into_iter()
            .filter(|r| r.project_id == project_id)
            .collect();
        imports.sort_by(|a, b| b.imported_at.cmp(&a.imported_at));
        Ok(imports)
    }
}
