//! Audit persistence: a timestamped snapshot of everything distributed in
//! a run, plus an optional cumulative history workbook.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calamine::{Reader, Xlsx, open_workbook};
use chrono::Local;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use tracing::warn;

use crate::error::Result;
use crate::model::{
    AuditEntry, AuditTrail, COL_DESTINATION, COL_EMAIL, COL_FULL_NAME, COL_GRANT_AMOUNT,
    COL_INDIGENOUS, COL_MAILING_ADDRESS, COL_ORGANIZATION, COL_PHONE, COL_RECEIVED_GRANT,
    COL_TITLE,
};
use crate::store::cell_to_string;

/// Column order of audit workbooks. Unlike registration sheets, audit
/// output is a plain table: header on the first row, data from the second.
const AUDIT_COLUMNS: [&str; 10] = [
    COL_FULL_NAME,
    COL_EMAIL,
    COL_ORGANIZATION,
    COL_TITLE,
    COL_PHONE,
    COL_MAILING_ADDRESS,
    COL_INDIGENOUS,
    COL_RECEIVED_GRANT,
    COL_GRANT_AMOUNT,
    COL_DESTINATION,
];

/// Writes the run's audit trail to `<dir>/<base>_<YYYYMMDD_HHMMSS>.xlsx`
/// and returns the path. One snapshot per run; never touched afterwards.
pub fn write_snapshot(dir: &Path, base: &str, trail: &AuditTrail) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{base}_{stamp}.xlsx"));

    let rows: Vec<Vec<String>> = trail.entries.iter().map(entry_row).collect();
    write_table(&path, &rows)?;
    Ok(path)
}

/// Folds the run's entries into a cumulative history workbook: prior rows
/// are kept first, exact duplicate rows are dropped, and the merged table
/// is rewritten in place. An unreadable prior file degrades to starting
/// fresh — historical audit data is best-effort, never a reason to lose
/// the current run's record.
pub fn append_history(path: &Path, trail: &AuditTrail) -> Result<()> {
    let mut rows = match read_history(path) {
        Ok(rows) => rows,
        Err(error) => {
            warn!(path = %path.display(), %error, "prior audit history unreadable, starting fresh");
            Vec::new()
        }
    };

    let mut seen: HashSet<Vec<String>> = rows.iter().cloned().collect();
    for entry in &trail.entries {
        let row = entry_row(entry);
        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }

    write_table(path, &rows)
}

fn entry_row(entry: &AuditEntry) -> Vec<String> {
    let identity = &entry.identity;
    vec![
        identity.full_name.clone(),
        identity.email.clone(),
        identity.organization.clone().unwrap_or_default(),
        identity.title.clone().unwrap_or_default(),
        identity.phone.clone().unwrap_or_default(),
        identity.mailing_address.clone().unwrap_or_default(),
        identity.indigenous.clone().unwrap_or_default(),
        identity.received_grant.clone().unwrap_or_default(),
        identity.grant_amount.clone().unwrap_or_default(),
        entry.destination.clone(),
    ]
}

fn read_history(path: &Path) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };

    let rows = range?
        .rows()
        .skip(1)
        .map(|row| {
            let mut cells: Vec<String> =
                row.iter().map(|cell| cell_to_string(Some(cell))).collect();
            cells.resize(AUDIT_COLUMNS.len(), String::new());
            cells
        })
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();
    Ok(rows)
}

fn write_table(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = XlsxWorkbook::new();
    let worksheet = writer.add_worksheet();

    for (col_idx, header) in AUDIT_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, *header)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
            }
        }
    }

    writer.save(path)?;
    Ok(())
}
