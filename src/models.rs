use serde::{Deserialize, Serialize};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub vat_rate: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub field: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Consultant,
    Supplier,
    Contractor,
    Agra,
}

impl CostCategory {
    pub const ALL: [CostCategory; 4] = [
        CostCategory::Consultant,
        CostCategory::Supplier,
        CostCategory::Contractor,
        CostCategory::Agra,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CostCategory::Consultant => "consultant",
            CostCategory::Supplier => "supplier",
            CostCategory::Contractor => "contractor",
            CostCategory::Agra => "agra",
        }
    }

    /// Label used in spreadsheet templates and previews.
    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Consultant => "יועץ",
            CostCategory::Supplier => "ספק",
            CostCategory::Contractor => "קבלן",
            CostCategory::Agra => "אגרה",
        }
    }

    pub fn from_key(key: &str) -> Option<CostCategory> {
        CostCategory::ALL.iter().copied().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostStatus {
    Draft,
    TenderDraft,
    TenderOpen,
    TenderWinner,
}

impl CostStatus {
    pub const ALL: [CostStatus; 4] = [
        CostStatus::Draft,
        CostStatus::TenderDraft,
        CostStatus::TenderOpen,
        CostStatus::TenderWinner,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CostStatus::Draft => "draft",
            CostStatus::TenderDraft => "tender_draft",
            CostStatus::TenderOpen => "tender_open",
            CostStatus::TenderWinner => "tender_winner",
        }
    }

    pub fn from_key(key: &str) -> Option<CostStatus> {
        CostStatus::ALL.iter().copied().find(|s| s.key() == key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: CostCategory,
    pub estimated_amount: f64,
    #[serde(default)]
    pub actual_amount: Option<f64>,
    pub vat_included: bool,
    pub vat_rate: f64,
    pub status: CostStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for a cost item that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewCostItem {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: CostCategory,
    pub estimated_amount: f64,
    pub actual_amount: Option<f64>,
    pub vat_included: bool,
    pub vat_rate: f64,
    pub status: CostStatus,
    pub notes: Option<String>,
}

/// One spreadsheet row after header binding and validation.
///
/// `row_index` is the 1-based position among candidate rows, which is what
/// previews show. Rows that fail validation keep their parsed fields so the
/// preview can display them alongside the errors.
#[derive(Debug, Clone, PartialEq)]
pub struct CostItemCandidate {
    pub row_index: usize,
    pub name: String,
    pub description: Option<String>,
    pub category: CostCategory,
    pub estimated_amount: f64,
    pub actual_amount: Option<f64>,
    pub vat_included: bool,
    pub notes: Option<String>,
    pub errors: Vec<String>,
}

impl CostItemCandidate {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of a bulk create: per-item failures do not abort the batch.
#[derive(Debug, Clone)]
pub struct BulkCreateReport {
    pub success: usize,
    pub errors: Vec<BulkCreateError>,
}

/// `index` is zero-based within the submitted batch; display adds one.
#[derive(Debug, Clone)]
pub struct BulkCreateError {
    pub index: usize,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: String,
    pub filename: String,
    pub project_id: String,
    #[serde(default)]
    pub professional_id: Option<String>,
    pub row_count: usize,
    pub created_count: usize,
    pub checksum: String,
    pub imported_at: String,
}
