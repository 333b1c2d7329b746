use serde::{Deserialize, Serialize};

/// Destination column receiving the student's full name.
pub const COL_FULL_NAME: &str = "Full Name";
/// Destination column holding the canonical email; unique key per sheet.
pub const COL_EMAIL: &str = "Email Address";
pub const COL_ORGANIZATION: &str = "Organization";
pub const COL_TITLE: &str = "Title";
pub const COL_PHONE: &str = "Phone Number";
pub const COL_MAILING_ADDRESS: &str = "Mailing Address";
pub const COL_INDIGENOUS: &str = "Self-Identify as Indigenous?";
pub const COL_RECEIVED_GRANT: &str = "Received FSG?";
pub const COL_GRANT_AMOUNT: &str = "Grant Amount Received";
/// Extra column emitted only into audit snapshots.
pub const COL_DESTINATION: &str = "Destination File";

/// One registration event scraped from the analytics portal. Immutable,
/// externally sourced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Free text containing the student's full name (`student_name_0`).
    pub student_name: String,
    /// Free text in the `<title> | <email>` three-token layout
    /// (`student_name_1`). The email is the third whitespace token.
    pub contact: String,
    /// Account name whose first whitespace token is the program code.
    pub account_name: String,
    /// Product name whose trailing two whitespace tokens are the session.
    pub product_name: String,
}

/// A user's self-reported profile, keyed loosely by the same contact field
/// text as the enrollment record it belongs to. Duplicate contact fields are
/// expected (profile edits over time); the last one in input order wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub contact: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub mailing_address: String,
    /// Raw self-declaration value; `"1"` (trimmed) means yes.
    pub indigenous_declaration: String,
}

/// A financial-support-grant row keyed by a bare email address. Last match
/// in input order wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub email: String,
    pub amount: String,
}

/// The resolved output of joining an enrollment record against the profile
/// and grant tables. The email is always present and is the join key for
/// every downstream operation; enrichment fields exist only when a matching
/// auxiliary record did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub full_name: String,
    /// Lowercased, trimmed email extracted from the contact field.
    pub email: String,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub mailing_address: Option<String>,
    /// `"Yes"` or `"No"`; only set when a profile record matched.
    pub indigenous: Option<String>,
    /// `"Yes"`; only set when a grant record matched.
    pub received_grant: Option<String>,
    pub grant_amount: Option<String>,
}

impl Identity {
    /// Returns the identity as destination (column name, value) pairs.
    /// Absent enrichment fields are omitted entirely so they can never
    /// overwrite populated destination cells.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (COL_FULL_NAME, self.full_name.clone()),
            (COL_EMAIL, self.email.clone()),
        ];
        let optional = [
            (COL_ORGANIZATION, &self.organization),
            (COL_TITLE, &self.title),
            (COL_PHONE, &self.phone),
            (COL_MAILING_ADDRESS, &self.mailing_address),
            (COL_INDIGENOUS, &self.indigenous),
            (COL_RECEIVED_GRANT, &self.received_grant),
            (COL_GRANT_AMOUNT, &self.grant_amount),
        ];
        for (column, value) in optional {
            if let Some(value) = value {
                fields.push((column, value.clone()));
            }
        }
        fields
    }
}

/// One identity actually distributed during a run, tagged with the workbook
/// file it was written into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub identity: Identity,
    /// File name of the destination workbook the identity went to.
    pub destination: String,
}

/// Ordered record of everything distributed in one run. Created fresh per
/// run and never mutated after persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub entries: Vec<AuditEntry>,
}

impl AuditTrail {
    pub fn push(&mut self, identity: Identity, destination: String) {
        self.entries.push(AuditEntry {
            identity,
            destination,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
