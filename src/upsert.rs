//! Non-destructive row merge. The one write policy of the whole pipeline:
//! fill empty cells, never overwrite populated ones.

use crate::model::Identity;
use crate::store::{DATA_START_ROW, Worksheet};

/// Writes an identity into `sheet`, either into `existing_row` or into the
/// first empty row at or after row 3. Every field goes through
/// [`Worksheet::set_cell_if_unset`], so a populated cell — including one an
/// operator edited by hand — is never regressed, and running the same
/// identity twice changes nothing on the second pass. Returns the target
/// row index.
pub fn upsert_identity(
    sheet: &mut Worksheet,
    identity: &Identity,
    existing_row: Option<usize>,
) -> usize {
    let row = existing_row.unwrap_or_else(|| sheet.first_empty_row_from(DATA_START_ROW));

    for (column, value) in identity.fields() {
        sheet.set_cell_if_unset(row, column, &value);
    }

    row
}
