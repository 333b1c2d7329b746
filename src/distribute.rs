//! Per-run orchestration: resolve each enrollment record, route it, merge
//! it into its registration sheet, and persist the audit trail.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::audit;
use crate::error::{DistributeError, Result};
use crate::input;
use crate::model::{AuditTrail, COL_EMAIL, EnrollmentRecord, GrantRecord, ProfileRecord};
use crate::registry::ProgramRegistry;
use crate::resolve::{normalize, resolve_identity};
use crate::route::route;
use crate::store::Workbook;
use crate::upsert::upsert_identity;

/// Where the run's audit output goes.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Directory receiving the timestamped snapshot.
    pub dir: PathBuf,
    /// Snapshot base name; the run timestamp is appended to it.
    pub base: String,
    /// Optional cumulative history workbook to fold this run into.
    pub history: Option<PathBuf>,
}

/// Loads the three raw tables from disk and distributes them.
#[instrument(
    level = "info",
    skip_all,
    fields(
        enrollment = %enrollment_path.display(),
        profiles = %profiles_path.display(),
        grants = %grants_path.display(),
    )
)]
pub fn distribute_files(
    enrollment_path: &Path,
    profiles_path: &Path,
    grants_path: &Path,
    registry: &ProgramRegistry,
    options: &AuditOptions,
) -> Result<AuditTrail> {
    let enrollments = input::load_enrollments(enrollment_path)?;
    let profiles = input::load_profiles(profiles_path)?;
    let grants = input::load_grants(grants_path)?;
    info!(
        enrollments = enrollments.len(),
        profiles = profiles.len(),
        grants = grants.len(),
        "raw tables loaded"
    );

    distribute(&enrollments, &profiles, &grants, registry, options)
}

/// Distributes enrollment records into their registration workbooks, one
/// record at a time in input order.
///
/// Each record is resolved, routed, merged into its sheet, and the
/// workbook saved before the next record starts, so a failure mid-run
/// never loses a completed write. A record whose contact field cannot
/// yield an email is skipped and reported; routing and save failures stop
/// the run, since continuing would distribute into an inconsistent
/// registry.
#[instrument(level = "info", skip_all, fields(records = enrollments.len()))]
pub fn distribute(
    enrollments: &[EnrollmentRecord],
    profiles: &[ProfileRecord],
    grants: &[GrantRecord],
    registry: &ProgramRegistry,
    options: &AuditOptions,
) -> Result<AuditTrail> {
    let mut trail = AuditTrail::default();
    let mut skipped = 0usize;

    for record in enrollments {
        let identity = match resolve_identity(record, profiles, grants) {
            Ok(identity) => identity,
            Err(error @ DistributeError::MalformedContact { .. }) => {
                warn!(%error, "skipping record with unusable contact field");
                skipped += 1;
                continue;
            }
            Err(error) => return Err(error),
        };

        let destination = route(record, registry)?;
        let destination_file = destination
            .workbook_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| destination.workbook_path.display().to_string());

        let mut workbook = Workbook::open(&destination.workbook_path)?;
        let sheet = workbook
            .worksheet_mut(&destination.sheet_name)
            .ok_or_else(|| DistributeError::MissingSheet {
                file: destination.workbook_path.clone(),
                sheet: destination.sheet_name.clone(),
            })?;

        let email = identity.email.clone();
        let existing = sheet.find_row_by_column(COL_EMAIL, |cell| normalize(cell) == email);
        let row = upsert_identity(sheet, &identity, existing);
        workbook.save()?;

        debug!(
            email = %identity.email,
            file = %destination_file,
            sheet = %destination.sheet_name,
            row,
            updated = existing.is_some(),
            "record distributed"
        );
        trail.push(identity, destination_file);
    }

    let snapshot = audit::write_snapshot(&options.dir, &options.base, &trail)?;
    if let Some(history) = &options.history {
        audit::append_history(history, &trail)?;
    }

    info!(
        distributed = trail.len(),
        skipped,
        snapshot = %snapshot.display(),
        "distribution complete"
    );
    Ok(trail)
}
