use crate::error::Result;
use crate::models::{CostCategory, CostStatus, NewCostItem};
use crate::settings::open_configured_store;

const PROJECT_NAME: &str = "Herzl 12 Renovation";
const PROJECT_VAT: f64 = 0.17;

struct DemoProfessional {
    name: &'static str,
    field: &'static str,
    company: Option<&'static str>,
}

const PROFESSIONALS: &[DemoProfessional] = &[
    DemoProfessional { name: "Avi Cohen", field: "electrical", company: Some("Cohen Electric Ltd") },
    DemoProfessional { name: "Rina Levi", field: "architecture", company: None },
    DemoProfessional { name: "Moshe Peretz", field: "plumbing", company: Some("Peretz & Sons") },
];

struct DemoCost {
    name: &'static str,
    description: &'static str,
    category: CostCategory,
    estimated: f64,
    actual: Option<f64>,
    vat_included: bool,
    status: CostStatus,
}

const COSTS: &[DemoCost] = &[
    DemoCost { name: "Electrical rough-in", description: "Wiring, panels, sockets", category: CostCategory::Contractor, estimated: 48000.0, actual: Some(51200.0), vat_included: true, status: CostStatus::TenderWinner },
    DemoCost { name: "Plumbing first fix", description: "Supply and drainage lines", category: CostCategory::Contractor, estimated: 36000.0, actual: Some(33500.0), vat_included: true, status: CostStatus::TenderWinner },
    DemoCost { name: "Architect fee", description: "Plans and supervision", category: CostCategory::Consultant, estimated: 25000.0, actual: Some(25000.0), vat_included: false, status: CostStatus::Draft },
    DemoCost { name: "Structural engineer", description: "", category: CostCategory::Consultant, estimated: 8500.0, actual: None, vat_included: false, status: CostStatus::Draft },
    DemoCost { name: "Kitchen cabinets", description: "Carpentry, supply only", category: CostCategory::Supplier, estimated: 42000.0, actual: None, vat_included: true, status: CostStatus::TenderOpen },
    DemoCost { name: "Floor tiles", description: "Porcelain 80x80", category: CostCategory::Supplier, estimated: 19000.0, actual: Some(17300.0), vat_included: true, status: CostStatus::Draft },
    DemoCost { name: "Building permit fee", description: "Municipality", category: CostCategory::Agra, estimated: 6200.0, actual: Some(6200.0), vat_included: true, status: CostStatus::Draft },
    DemoCost { name: "Demolition works", description: "Interior walls", category: CostCategory::Contractor, estimated: 14000.0, actual: None, vat_included: true, status: CostStatus::TenderDraft },
];

pub fn run() -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;

    let project = store.create_project(PROJECT_NAME, PROJECT_VAT)?;
    for p in PROFESSIONALS {
        store.create_professional(p.name, p.field, p.company, None, None)?;
    }
    for c in COSTS {
        store.create_cost_item(&NewCostItem {
            project_id: project.id.clone(),
            name: c.name.to_string(),
            description: if c.description.is_empty() {
                None
            } else {
                Some(c.description.to_string())
            },
            category: c.category,
            estimated_amount: c.estimated,
            actual_amount: c.actual,
            vat_included: c.vat_included,
            vat_rate: project.vat_rate,
            status: c.status,
            notes: None,
        })?;
    }

    println!(
        "Loaded demo data: project '{}', {} professionals, {} cost items.",
        PROJECT_NAME,
        PROFESSIONALS.len(),
        COSTS.len()
    );
    println!("Try: kablan costs list --project '{PROJECT_NAME}'");
    Ok(())
}
