//! Identity resolution: joins one enrollment record against the full
//! profile and grant tables. Pure functions; same inputs always produce the
//! same identity.

use crate::error::{DistributeError, Result};
use crate::model::{EnrollmentRecord, GrantRecord, Identity, ProfileRecord};

/// Canonical form used for every join comparison in the pipeline.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Extracts the email from a contact field in the upstream scraper's
/// `<title> | <email>` layout: the email is the third whitespace token.
/// That position is a format contract; anything shorter is malformed.
pub fn extract_email(contact: &str) -> Option<String> {
    contact.split_whitespace().nth(2).map(normalize)
}

/// Resolves an enrollment record into an [`Identity`], enriching it from
/// the last matching profile (same contact field) and the last matching
/// grant (same email). Duplicate auxiliary rows are expected when a user
/// edited their data; last in input order wins.
pub fn resolve_identity(
    record: &EnrollmentRecord,
    profiles: &[ProfileRecord],
    grants: &[GrantRecord],
) -> Result<Identity> {
    let email =
        extract_email(&record.contact).ok_or_else(|| DistributeError::MalformedContact {
            name: record.student_name.clone(),
            contact: record.contact.clone(),
        })?;

    let contact_key = normalize(&record.contact);
    let profile = profiles
        .iter()
        .rev()
        .find(|profile| normalize(&profile.contact) == contact_key);

    let grant = grants
        .iter()
        .rev()
        .find(|grant| normalize(&grant.email) == email);

    let mut identity = Identity {
        full_name: record.student_name.clone(),
        email,
        organization: None,
        title: None,
        phone: None,
        mailing_address: None,
        indigenous: None,
        received_grant: None,
        grant_amount: None,
    };

    if let Some(profile) = profile {
        identity.organization = Some(profile.organization.clone());
        identity.title = Some(profile.title.clone());
        identity.phone = Some(profile.phone.clone());
        identity.mailing_address = Some(profile.mailing_address.clone());
        identity.indigenous = Some(indigenous_flag(&profile.indigenous_declaration));
    }

    if let Some(grant) = grant {
        identity.received_grant = Some("Yes".to_string());
        identity.grant_amount = Some(grant.amount.clone());
    }

    Ok(identity)
}

/// `"1"` (trimmed, case-insensitive) is the portal's marker for an
/// affirmative self-declaration; every other value maps to `"No"`.
fn indigenous_flag(raw: &str) -> String {
    if normalize(raw) == "1" {
        "Yes".to_string()
    } else {
        "No".to_string()
    }
}
