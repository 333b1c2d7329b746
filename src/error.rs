use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, DistributeError>;

/// Error type covering the different failure cases that can occur while the
/// tool ingests raw tables, routes records, or writes workbooks.
#[derive(Debug, Error)]
pub enum DistributeError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing of a registry override fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a contact field does not follow the three-token
    /// `<title> | <email>` layout the upstream scraper guarantees. This is a
    /// per-record failure; the orchestrator skips the record and reports it.
    #[error("malformed contact field '{contact}' for '{name}': no email at token 3")]
    MalformedContact { name: String, contact: String },

    /// Raised when an account name carries a program code the registry does
    /// not know. Fatal: the registry is stale and no record can be trusted
    /// to route correctly.
    #[error("unknown program code '{0}': registry entry missing")]
    UnknownProgram(String),

    /// Raised when a product name is too short to carry a session suffix.
    #[error("cannot derive session from product name '{0}'")]
    MalformedProduct(String),

    /// Raised when the routed workbook has no sheet for the session.
    #[error("workbook '{file}' has no sheet named '{sheet}'")]
    MissingSheet { file: PathBuf, sheet: String },

    /// Raised when a raw input table lacks a required column.
    #[error("table '{file}' is missing required column '{column}'")]
    MissingColumn { file: PathBuf, column: String },

    /// Raised when an input workbook contains no worksheets at all.
    #[error("workbook '{0}' contains no worksheets")]
    EmptyWorkbook(PathBuf),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
