use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::error::Result;

/// Zero-based index of the authoritative header row. Row 1 of every
/// registration sheet is decorative; row 2 names the columns.
pub const HEADER_ROW: usize = 1;
/// Zero-based index of the first data row (spreadsheet row 3).
pub const DATA_START_ROW: usize = 2;

/// A single sheet held in memory as a dense string grid, with a column
/// index built once from the header row. Cells hold display strings; an
/// empty string means the cell is unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    cells: Vec<Vec<String>>,
    header: HashMap<String, usize>,
}

impl Worksheet {
    /// Builds a worksheet from raw rows, indexing the header row once.
    pub fn from_rows(name: impl Into<String>, cells: Vec<Vec<String>>) -> Self {
        let header = index_header(&cells);
        Self {
            name: name.into(),
            cells,
            header,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows the grid currently holds.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell content at (row, col); out-of-range positions read as unset.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Position of the named column in the header row, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.get(name).copied()
    }

    /// Scans every row once and returns the first whose value in `column`
    /// satisfies the predicate. `None` when the column itself is unknown or
    /// no row matches.
    pub fn find_row_by_column(
        &self,
        column: &str,
        predicate: impl Fn(&str) -> bool,
    ) -> Option<usize> {
        let col = self.column(column)?;
        (0..self.cells.len()).find(|&row| predicate(self.cell(row, col)))
    }

    /// First row at or after `start` whose first column is unset. When every
    /// existing row is occupied this returns one past the last row, which is
    /// the append position.
    pub fn first_empty_row_from(&self, start: usize) -> usize {
        (start..self.cells.len())
            .find(|&row| self.cell(row, 0).is_empty())
            .unwrap_or_else(|| self.cells.len().max(start))
    }

    /// Writes `value` into the named column of `row` only when the target
    /// cell is currently unset. Unknown columns and empty values are dropped
    /// silently; destination sheets may lack optional columns.
    pub fn set_cell_if_unset(&mut self, row: usize, column: &str, value: &str) {
        let Some(col) = self.column(column) else {
            return;
        };
        if value.is_empty() || !self.cell(row, col).is_empty() {
            return;
        }
        if self.cells.len() <= row {
            self.cells.resize(row + 1, Vec::new());
        }
        let cells = &mut self.cells[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
    }
}

fn index_header(cells: &[Vec<String>]) -> HashMap<String, usize> {
    let mut header = HashMap::new();
    if let Some(row) = cells.get(HEADER_ROW) {
        for (col, name) in row.iter().enumerate() {
            if !name.is_empty() {
                header.entry(name.clone()).or_insert(col);
            }
        }
    }
    header
}

/// An open workbook: every sheet loaded into memory, mutated in place, and
/// written back as a whole-file overwrite on [`Workbook::save`].
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
    sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Reads every sheet of the `.xlsx` file at `path` into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let cells = match workbook.worksheet_range(&name) {
                Some(range) => range_to_rows(&range?),
                None => Vec::new(),
            };
            sheets.push(Worksheet::from_rows(name, cells));
        }

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(Worksheet::name)
    }

    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }

    pub fn worksheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|sheet| sheet.name() == name)
    }

    /// Persists every sheet back to the source path, overwriting the file.
    /// Saving happens only after all in-memory mutations for a record are
    /// complete, so a crash never leaves a partially-written row behind.
    pub fn save(&self) -> Result<()> {
        let mut writer = XlsxWorkbook::new();

        for sheet in &self.sheets {
            let worksheet = writer.add_worksheet();
            worksheet.set_name(sheet.name())?;

            for (row_idx, row) in sheet.cells.iter().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    if !cell.is_empty() {
                        worksheet.write_string(row_idx as u32, col_idx as u16, cell)?;
                    }
                }
            }
        }

        writer.save(&self.path)?;
        Ok(())
    }
}

fn range_to_rows(range: &calamine::Range<DataType>) -> Vec<Vec<String>> {
    let (row_offset, col_offset) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(),
    };

    let mut rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(|cell| cell_to_string(Some(cell))));
        rows.push(cells);
    }
    rows
}

pub(crate) fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                (*value as i64).to_string()
            } else {
                value.to_string()
            }
        }
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
