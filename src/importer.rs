use std::path::Path;

use calamine::{Data, Reader};
use sha2::{Digest, Sha256};

use crate::error::{KablanError, Result};
use crate::models::{
    new_id, timestamp_now, BulkCreateError, BulkCreateReport, CostCategory, CostItemCandidate,
    CostStatus, ImportRecord, NewCostItem, Project,
};
use crate::store::{CostItemStore, ImportLogStore};

// ---------------------------------------------------------------------------
// Column contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Name,
    Description,
    Category,
    EstimatedAmount,
    ActualAmount,
    VatIncluded,
    Notes,
}

pub struct TemplateColumn {
    pub field: Field,
    /// Hebrew header as written by the template.
    pub header: &'static str,
    /// Internal field name, accepted as an alternate header.
    pub fallback: &'static str,
    pub width: f64,
}

/// The seven columns shared by the template writer and the parser. Each
/// column is matched independently by header text, so column order in the
/// file does not matter.
pub const COLUMNS: &[TemplateColumn] = &[
    TemplateColumn { field: Field::Name, header: "שם פריט", fallback: "name", width: 25.0 },
    TemplateColumn { field: Field::Description, header: "תיאור", fallback: "description", width: 30.0 },
    TemplateColumn { field: Field::Category, header: "קטגוריה", fallback: "category", width: 15.0 },
    TemplateColumn { field: Field::EstimatedAmount, header: "סכום מוערך", fallback: "estimated_amount", width: 15.0 },
    TemplateColumn { field: Field::ActualAmount, header: "עלות בפועל", fallback: "actual_amount", width: 15.0 },
    TemplateColumn { field: Field::VatIncluded, header: "כולל מעמ", fallback: "vat_included", width: 12.0 },
    TemplateColumn { field: Field::Notes, header: "הערות", fallback: "notes", width: 30.0 },
];

/// Rows whose name starts with this prefix are sample rows, never imported.
pub const EXAMPLE_ROW_MARKER: &str = "לדוגמה:";

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    }
}

/// Token map is case-sensitive; anything unrecognized falls back to
/// contractor. The template dropdown makes other values hard to produce.
fn parse_category(raw: &str) -> CostCategory {
    match raw.trim() {
        "יועץ" | "Consultant" => CostCategory::Consultant,
        "ספק" | "Supplier" => CostCategory::Supplier,
        "קבלן" | "Contractor" => CostCategory::Contractor,
        "אגרה" | "Agra" => CostCategory::Agra,
        _ => CostCategory::Contractor,
    }
}

/// Only an explicit "no" token turns VAT off; an empty cell means included.
fn parse_vat(raw: &str) -> bool {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        return true;
    }
    !matches!(token.as_str(), "לא" | "false" | "0" | "no")
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| cell_text(cell).trim().is_empty())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// For each entry of `COLUMNS`, the sheet column it was found at.
fn bind_columns(header: &[Data]) -> Vec<Option<usize>> {
    COLUMNS
        .iter()
        .map(|col| {
            header.iter().position(|cell| {
                let text = cell_text(cell);
                let text = text.trim();
                text == col.header || text == col.fallback
            })
        })
        .collect()
}

fn field_cell<'a>(row: &'a [Data], bindings: &[Option<usize>], field: Field) -> Option<&'a Data> {
    let slot = COLUMNS.iter().position(|c| c.field == field)?;
    bindings[slot].and_then(|idx| row.get(idx))
}

fn field_text(row: &[Data], bindings: &[Option<usize>], field: Field) -> String {
    field_cell(row, bindings, field)
        .map(cell_text)
        .unwrap_or_default()
}

fn field_number(row: &[Data], bindings: &[Option<usize>], field: Field) -> Option<f64> {
    field_cell(row, bindings, field).and_then(cell_number)
}

fn build_candidate(
    row_index: usize,
    row: &[Data],
    bindings: &[Option<usize>],
) -> CostItemCandidate {
    let name = field_text(row, bindings, Field::Name).trim().to_string();
    let description = field_text(row, bindings, Field::Description).trim().to_string();
    let notes = field_text(row, bindings, Field::Notes).trim().to_string();
    let category = parse_category(&field_text(row, bindings, Field::Category));
    let estimated = field_number(row, bindings, Field::EstimatedAmount);
    let actual = field_number(row, bindings, Field::ActualAmount);
    let vat_included = parse_vat(&field_text(row, bindings, Field::VatIncluded));

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("item name missing".to_string());
    }
    if !estimated.map_or(false, |v| v > 0.0) {
        errors.push("estimated amount missing or invalid".to_string());
    }

    CostItemCandidate {
        row_index,
        name,
        description: if description.is_empty() { None } else { Some(description) },
        category,
        // kept as parsed even when invalid, so the preview shows the value
        estimated_amount: estimated.unwrap_or(0.0),
        // a zero actual means "not entered yet"
        actual_amount: actual.filter(|v| *v != 0.0),
        vat_included,
        notes: if notes.is_empty() { None } else { Some(notes) },
        errors,
    }
}

/// Reads the first sheet of a workbook into candidates. Rows with a blank
/// name and rows starting with the example marker are dropped before
/// validation; every surviving row becomes a candidate, valid or not.
pub fn parse_file(path: &Path) -> Result<Vec<CostItemCandidate>> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| KablanError::Spreadsheet(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| KablanError::Spreadsheet(e.to_string()))?,
        None => return Err(KablanError::EmptyWorkbook),
    };

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => return Err(KablanError::EmptyWorkbook),
    };
    let bindings = bind_columns(header);

    let mut data_rows = 0usize;
    let mut candidates = Vec::new();
    for row in rows {
        if is_blank_row(row) {
            continue;
        }
        data_rows += 1;
        let name = field_text(row, &bindings, Field::Name);
        let name = name.trim();
        if name.is_empty() || name.starts_with(EXAMPLE_ROW_MARKER) {
            continue;
        }
        candidates.push(build_candidate(candidates.len() + 1, row, &bindings));
    }

    if data_rows == 0 {
        return Err(KablanError::EmptyWorkbook);
    }
    if candidates.is_empty() {
        return Err(KablanError::NoImportableRows);
    }
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Submits the valid candidates as draft items carrying the project's VAT
/// rate. Per-item failures come back in the report; a store that fails the
/// whole batch outright is reported as a single general error. No retries,
/// no rollback; partial success is a normal outcome.
pub fn submit_candidates<S: CostItemStore + ?Sized>(
    store: &mut S,
    project: &Project,
    candidates: &[CostItemCandidate],
) -> BulkCreateReport {
    let items: Vec<NewCostItem> = candidates
        .iter()
        .filter(|c| c.is_valid())
        .map(|c| NewCostItem {
            project_id: project.id.clone(),
            name: c.name.clone(),
            description: c.description.clone(),
            category: c.category,
            estimated_amount: c.estimated_amount,
            actual_amount: c.actual_amount,
            vat_included: c.vat_included,
            vat_rate: project.vat_rate,
            status: CostStatus::Draft,
            notes: c.notes.clone(),
        })
        .collect();

    match store.bulk_create_cost_items(&items) {
        Ok(report) => report,
        Err(e) => BulkCreateReport {
            success: 0,
            errors: vec![BulkCreateError {
                index: 0,
                name: "general".to_string(),
                error: e.to_string(),
            }],
        },
    }
}

// ---------------------------------------------------------------------------
// Import log
// ---------------------------------------------------------------------------

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

/// Records one import attempt. The log is an audit trail only; it never
/// blocks or deduplicates imports.
pub fn log_import<S: ImportLogStore + ?Sized>(
    store: &mut S,
    file_path: &Path,
    project: &Project,
    professional_id: Option<&str>,
    row_count: usize,
    created_count: usize,
) -> Result<()> {
    let record = ImportRecord {
        id: new_id(),
        filename: file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string(),
        project_id: project.id.clone(),
        professional_id: professional_id.map(str::to_string),
        row_count,
        created_count,
        checksum: compute_checksum(file_path)?,
        imported_at: timestamp_now(),
    };
    store.record_import(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostItem;

    // (name, description, category, estimated, actual, vat, notes)
    type Row<'a> = (&'a str, &'a str, &'a str, Option<f64>, Option<f64>, &'a str, &'a str);

    fn write_costs_xlsx(dir: &Path, name: &str, rows: &[Row]) -> std::path::PathBuf {
        let headers: Vec<&str> = COLUMNS.iter().map(|c| c.header).collect();
        write_costs_xlsx_with_headers(dir, name, &headers, rows)
    }

    fn write_costs_xlsx_with_headers(
        dir: &Path,
        name: &str,
        headers: &[&str],
        rows: &[Row],
    ) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            let (name, desc, category, estimated, actual, vat, notes) = *row;
            if !name.is_empty() {
                sheet.write_string(r, 0, name).unwrap();
            }
            if !desc.is_empty() {
                sheet.write_string(r, 1, desc).unwrap();
            }
            if !category.is_empty() {
                sheet.write_string(r, 2, category).unwrap();
            }
            if let Some(v) = estimated {
                sheet.write_number(r, 3, v).unwrap();
            }
            if let Some(v) = actual {
                sheet.write_number(r, 4, v).unwrap();
            }
            if !vat.is_empty() {
                sheet.write_string(r, 5, vat).unwrap();
            }
            if !notes.is_empty() {
                sheet.write_string(r, 6, notes).unwrap();
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    fn test_project() -> Project {
        Project {
            id: "p1".to_string(),
            name: "Herzl 1".to_string(),
            vat_rate: 0.17,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn item_from(new: &NewCostItem) -> CostItem {
        CostItem {
            id: new_id(),
            project_id: new.project_id.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            category: new.category,
            estimated_amount: new.estimated_amount,
            actual_amount: new.actual_amount,
            vat_included: new.vat_included,
            vat_rate: new.vat_rate,
            status: new.status,
            notes: new.notes.clone(),
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
        }
    }

    /// In-memory item sink; fails creates for one designated name.
    #[derive(Default)]
    struct MemItems {
        created: Vec<NewCostItem>,
        fail_for: Option<String>,
    }

    impl CostItemStore for MemItems {
        fn create_cost_item(&mut self, item: &NewCostItem) -> Result<CostItem> {
            if self.fail_for.as_deref() == Some(item.name.as_str()) {
                return Err(KablanError::Store("backend rejected the row".to_string()));
            }
            self.created.push(item.clone());
            Ok(item_from(item))
        }

        fn list_cost_items(&self, _project_id: &str) -> Result<Vec<CostItem>> {
            Ok(Vec::new())
        }

        fn get_cost_item(&self, _project_id: &str, name: &str) -> Result<CostItem> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn set_actual_amount(
            &mut self,
            _project_id: &str,
            name: &str,
            _actual: Option<f64>,
        ) -> Result<CostItem> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn set_status(
            &mut self,
            _project_id: &str,
            name: &str,
            _status: CostStatus,
        ) -> Result<CostItem> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn delete_cost_item(&mut self, _project_id: &str, name: &str) -> Result<()> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }
    }

    /// Store whose bulk call fails as a whole, like a lost connection.
    struct BrokenItems;

    impl CostItemStore for BrokenItems {
        fn create_cost_item(&mut self, _item: &NewCostItem) -> Result<CostItem> {
            Err(KablanError::Store("connection lost".to_string()))
        }

        fn list_cost_items(&self, _project_id: &str) -> Result<Vec<CostItem>> {
            Ok(Vec::new())
        }

        fn get_cost_item(&self, _project_id: &str, name: &str) -> Result<CostItem> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn set_actual_amount(
            &mut self,
            _project_id: &str,
            name: &str,
            _actual: Option<f64>,
        ) -> Result<CostItem> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn set_status(
            &mut self,
            _project_id: &str,
            name: &str,
            _status: CostStatus,
        ) -> Result<CostItem> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn delete_cost_item(&mut self, _project_id: &str, name: &str) -> Result<()> {
            Err(KablanError::UnknownCostItem(name.to_string()))
        }

        fn bulk_create_cost_items(&mut self, _items: &[NewCostItem]) -> Result<BulkCreateReport> {
            Err(KablanError::Store("connection lost".to_string()))
        }
    }

    #[derive(Default)]
    struct CapturingLog {
        records: Vec<ImportRecord>,
    }

    impl ImportLogStore for CapturingLog {
        fn record_import(&mut self, record: &ImportRecord) -> Result<()> {
            self.records.push(record.clone());
            Ok(())
        }

        fn list_imports(&self, _project_id: &str) -> Result<Vec<ImportRecord>> {
            Ok(self.records.clone())
        }
    }

    #[test]
    fn test_valid_row_parses_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[("Electrical", "", "קבלן", Some(50000.0), None, "כן", "")],
        );
        let candidates = parse_file(&path).unwrap();
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert!(c.is_valid(), "unexpected errors: {:?}", c.errors);
        assert_eq!(c.row_index, 1);
        assert_eq!(c.name, "Electrical");
        assert_eq!(c.category, CostCategory::Contractor);
        assert_eq!(c.estimated_amount, 50000.0);
        assert!(c.vat_included);
        assert_eq!(c.actual_amount, None);
    }

    #[test]
    fn test_missing_estimated_is_flagged_not_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("Plumbing", "", "", None, None, "", ""),
                ("Electrical", "", "קבלן", Some(50000.0), None, "", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[0].errors,
            vec!["estimated amount missing or invalid".to_string()]
        );
        assert!(!candidates[0].is_valid());
        assert!(candidates[1].is_valid());
    }

    #[test]
    fn test_example_row_only_yields_no_importable_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[("לדוגמה: חשמל", "עבודות חשמל כלליות", "קבלן", Some(50000.0), None, "כן", "")],
        );
        match parse_file(&path) {
            Err(KablanError::NoImportableRows) => {}
            other => panic!("expected NoImportableRows, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_file_is_empty_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(dir.path(), "costs.xlsx", &[]);
        match parse_file(&path) {
            Err(KablanError::EmptyWorkbook) => {}
            other => panic!("expected EmptyWorkbook, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_file_is_spreadsheet_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costs.xlsx");
        std::fs::write(&path, b"this is not a workbook").unwrap();
        match parse_file(&path) {
            Err(KablanError::Spreadsheet(_)) => {}
            other => panic!("expected Spreadsheet error, got {other:?}"),
        }
    }

    #[test]
    fn test_estimated_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("Zero", "", "", Some(0.0), None, "", ""),
                ("Penny", "", "", Some(0.01), None, "", ""),
                ("Negative", "", "", Some(-5.0), None, "", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        assert!(!candidates[0].is_valid());
        assert!(candidates[1].is_valid());
        assert!(!candidates[2].is_valid());
        // parsed value is kept even when it fails validation
        assert_eq!(candidates[2].estimated_amount, -5.0);
    }

    #[test]
    fn test_zero_actual_means_not_entered() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("A", "", "", Some(100.0), Some(0.0), "", ""),
                ("B", "", "", Some(100.0), Some(250.0), "", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        assert_eq!(candidates[0].actual_amount, None);
        assert_eq!(candidates[1].actual_amount, Some(250.0));
    }

    #[test]
    fn test_vat_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("A", "", "", Some(1.0), None, "לא", ""),
                ("B", "", "", Some(1.0), None, "FALSE", ""),
                ("C", "", "", Some(1.0), None, "0", ""),
                ("D", "", "", Some(1.0), None, "No", ""),
                ("E", "", "", Some(1.0), None, "", ""),
                ("F", "", "", Some(1.0), None, "כן", ""),
                ("G", "", "", Some(1.0), None, "maybe", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        let vat: Vec<bool> = candidates.iter().map(|c| c.vat_included).collect();
        assert_eq!(vat, vec![false, false, false, false, true, true, true]);
    }

    #[test]
    fn test_category_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("A", "", "יועץ", Some(1.0), None, "", ""),
                ("B", "", "ספק", Some(1.0), None, "", ""),
                ("C", "", "אגרה", Some(1.0), None, "", ""),
                ("D", "", "Supplier", Some(1.0), None, "", ""),
                ("E", "", "גבס", Some(1.0), None, "", ""),
                ("F", "", "", Some(1.0), None, "", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        let categories: Vec<CostCategory> = candidates.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![
                CostCategory::Consultant,
                CostCategory::Supplier,
                CostCategory::Agra,
                CostCategory::Supplier,
                CostCategory::Contractor,
                CostCategory::Contractor,
            ]
        );
    }

    #[test]
    fn test_english_fallback_headers() {
        let dir = tempfile::tempdir().unwrap();
        let headers: Vec<&str> = COLUMNS.iter().map(|c| c.fallback).collect();
        let path = write_costs_xlsx_with_headers(
            dir.path(),
            "costs.xlsx",
            &headers,
            &[("Electrical", "mains", "Contractor", Some(50000.0), None, "no", "rough-in")],
        );
        let candidates = parse_file(&path).unwrap();
        let c = &candidates[0];
        assert!(c.is_valid());
        assert_eq!(c.description.as_deref(), Some("mains"));
        assert!(!c.vat_included);
        assert_eq!(c.notes.as_deref(), Some("rough-in"));
    }

    #[test]
    fn test_missing_header_column_fails_validation() {
        // no estimated-amount header anywhere, so the field reads empty
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx_with_headers(
            dir.path(),
            "costs.xlsx",
            &["שם פריט", "תיאור", "קטגוריה"],
            &[("Electrical", "", "קבלן", Some(50000.0), None, "", "")],
        );
        let candidates = parse_file(&path).unwrap();
        assert_eq!(
            candidates[0].errors,
            vec!["estimated amount missing or invalid".to_string()]
        );
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("Electrical", "", "קבלן", Some(50000.0), None, "כן", ""),
                ("Plumbing", "", "ספק", None, Some(1200.0), "לא", "second fix"),
            ],
        );
        let first = parse_file(&path).unwrap();
        let second = parse_file(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("First", "", "", Some(1.0), None, "", ""),
                ("", "", "", None, None, "", ""),
                ("Second", "", "", Some(2.0), None, "", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].row_index, 1);
        assert_eq!(candidates[1].row_index, 2);
    }

    #[test]
    fn test_submit_skips_invalid_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("Electrical", "", "קבלן", Some(50000.0), None, "כן", ""),
                ("Broken", "", "", None, None, "", ""),
                ("Plumbing", "", "ספק", Some(12000.0), None, "לא", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        let project = test_project();
        let mut store = MemItems::default();
        let report = submit_candidates(&mut store, &project, &candidates);

        assert_eq!(report.success, 2);
        assert!(report.errors.is_empty());
        assert_eq!(store.created.len(), 2);
        assert_eq!(store.created[0].name, "Electrical");
        assert_eq!(store.created[0].project_id, "p1");
        assert_eq!(store.created[0].vat_rate, 0.17);
        assert_eq!(store.created[0].status, CostStatus::Draft);
        assert_eq!(store.created[1].name, "Plumbing");
    }

    #[test]
    fn test_submit_reports_failed_row_by_batch_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[
                ("One", "", "", Some(1.0), None, "", ""),
                ("Two", "", "", Some(2.0), None, "", ""),
                ("Three", "", "", Some(3.0), None, "", ""),
            ],
        );
        let candidates = parse_file(&path).unwrap();
        let project = test_project();
        let mut store = MemItems {
            fail_for: Some("Two".to_string()),
            ..Default::default()
        };
        let report = submit_candidates(&mut store, &project, &candidates);

        assert_eq!(report.success, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].index, 1);
        assert_eq!(report.errors[0].name, "Two");
        assert!(report.errors[0].error.contains("backend rejected"));
    }

    #[test]
    fn test_submit_whole_batch_failure_is_general_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[("One", "", "", Some(1.0), None, "", "")],
        );
        let candidates = parse_file(&path).unwrap();
        let project = test_project();
        let mut store = BrokenItems;
        let report = submit_candidates(&mut store, &project, &candidates);

        assert_eq!(report.success, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].index, 0);
        assert_eq!(report.errors[0].name, "general");
        assert!(report.errors[0].error.contains("connection lost"));
    }

    #[test]
    fn test_log_import_records_the_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_costs_xlsx(
            dir.path(),
            "costs.xlsx",
            &[("One", "", "", Some(1.0), None, "", "")],
        );
        let project = test_project();
        let mut log = CapturingLog::default();
        log_import(&mut log, &path, &project, Some("prof-9"), 3, 2).unwrap();

        assert_eq!(log.records.len(), 1);
        let record = &log.records[0];
        assert_eq!(record.filename, "costs.xlsx");
        assert_eq!(record.project_id, "p1");
        assert_eq!(record.professional_id.as_deref(), Some("prof-9"));
        assert_eq!(record.row_count, 3);
        assert_eq!(record.created_count, 2);
        assert_eq!(record.checksum.len(), 64);
        assert!(record.checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
