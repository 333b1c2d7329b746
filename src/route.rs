//! Destination routing: account name carries the program code, product
//! name carries the session that doubles as the sheet name.

use std::path::PathBuf;

use crate::error::{DistributeError, Result};
use crate::model::EnrollmentRecord;
use crate::registry::ProgramRegistry;

/// A resolved destination: the registration workbook on disk and the sheet
/// within it named after the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub workbook_path: PathBuf,
    pub sheet_name: String,
}

/// First whitespace token of an account name, e.g. `"CVA 101"` → `"CVA"`.
pub fn program_code(account_name: &str) -> Option<&str> {
    account_name.split_whitespace().next()
}

/// Trailing two whitespace tokens of a product name joined by one space,
/// e.g. `"CVA Program 2023 FALL"` → `"2023 FALL"`.
pub fn session(product_name: &str) -> Option<String> {
    let tokens: Vec<&str> = product_name.split_whitespace().collect();
    match tokens.as_slice() {
        [.., year, term] => Some(format!("{year} {term}")),
        _ => None,
    }
}

/// Maps an enrollment record to its destination workbook and sheet. A code
/// the registry does not know is fatal to the run: it means the registry is
/// stale, and no per-record fallback is safe.
pub fn route(record: &EnrollmentRecord, registry: &ProgramRegistry) -> Result<Destination> {
    let code = program_code(&record.account_name)
        .ok_or_else(|| DistributeError::UnknownProgram(record.account_name.clone()))?;
    let workbook_path = registry.workbook_path(code)?;
    let sheet_name = session(&record.product_name)
        .ok_or_else(|| DistributeError::MalformedProduct(record.product_name.clone()))?;

    Ok(Destination {
        workbook_path,
        sheet_name,
    })
}
