use thiserror::Error;

#[derive(Error, Debug)]
pub enum KablanError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Could not read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("The file is empty or has no data rows")]
    EmptyWorkbook,

    #[error("No valid rows found in the file")]
    NoImportableRows,

    #[error("Unknown project: {0}")]
    UnknownProject(String),

    #[error("Unknown professional: {0}")]
    UnknownProfessional(String),

    #[error("Unknown cost item: {0}")]
    UnknownCostItem(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KablanError>;
