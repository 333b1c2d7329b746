//! Loaders for the raw tables the scraper produces. Unlike registration
//! workbooks, raw tables carry their header on the first row and data from
//! the second.

use std::collections::HashMap;
use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook};

use crate::error::{DistributeError, Result};
use crate::model::{EnrollmentRecord, GrantRecord, ProfileRecord};
use crate::store::cell_to_string;

/// Reads the enrollment table. Required columns: `student_name_0`,
/// `student_name_1`, `account_name`, `product_name_0`.
pub fn load_enrollments(path: &Path) -> Result<Vec<EnrollmentRecord>> {
    let table = RawTable::read(path)?;
    let name = table.require("student_name_0")?;
    let contact = table.require("student_name_1")?;
    let account = table.require("account_name")?;
    let product = table.require("product_name_0")?;

    Ok(table
        .data_rows()
        .map(|row| EnrollmentRecord {
            student_name: table.cell(row, name),
            contact: table.cell(row, contact),
            account_name: table.cell(row, account),
            product_name: table.cell(row, product),
        })
        .collect())
}

/// Reads the user-profile table keyed by the scraped contact field.
pub fn load_profiles(path: &Path) -> Result<Vec<ProfileRecord>> {
    let table = RawTable::read(path)?;
    let contact = table.require("student_name_1")?;
    let organization = table.require("custom_fields_organization")?;
    let title = table.require("custom_fields_title")?;
    let phone = table.require("custom_fields_phone-number")?;
    let mailing = table.require("custom_fields_mailing-address")?;
    let indigenous = table.require("custom_fields_indigenous-self-declaration")?;

    Ok(table
        .data_rows()
        .map(|row| ProfileRecord {
            contact: table.cell(row, contact),
            organization: table.cell(row, organization),
            title: table.cell(row, title),
            phone: table.cell(row, phone),
            mailing_address: table.cell(row, mailing),
            indigenous_declaration: table.cell(row, indigenous),
        })
        .collect())
}

/// Reads the grant table keyed by bare email address.
pub fn load_grants(path: &Path) -> Result<Vec<GrantRecord>> {
    let table = RawTable::read(path)?;
    let email = table.require("Email")?;
    let amount = table.require("Grant amount to give")?;

    Ok(table
        .data_rows()
        .map(|row| GrantRecord {
            email: table.cell(row, email),
            amount: table.cell(row, amount),
        })
        .collect())
}

/// First sheet of a raw workbook, header indexed from its first row.
struct RawTable {
    path: std::path::PathBuf,
    header: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    fn read(path: &Path) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DistributeError::EmptyWorkbook(path.to_path_buf()))??;

        let mut rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
            .collect();

        let mut header = HashMap::new();
        if !rows.is_empty() {
            for (col, name) in rows.remove(0).into_iter().enumerate() {
                if !name.is_empty() {
                    header.entry(name).or_insert(col);
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            header,
            rows,
        })
    }

    fn require(&self, column: &str) -> Result<usize> {
        self.header
            .get(column)
            .copied()
            .ok_or_else(|| DistributeError::MissingColumn {
                file: self.path.clone(),
                column: column.to_string(),
            })
    }

    /// Indices of rows that hold at least one value. Fully blank trailing
    /// rows are common in scraped exports and carry nothing.
    fn data_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows.len()).filter(|&row| self.rows[row].iter().any(|cell| !cell.is_empty()))
    }

    fn cell(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .cloned()
            .unwrap_or_default()
    }
}
