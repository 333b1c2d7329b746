use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DistributeError, Result};

/// Static mapping from program code to the registration workbook that
/// tracks it, rooted at a registrations folder. Every code that can appear
/// in an enrollment's account name must have an entry; a miss is a
/// configuration error, not a per-record one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRegistry {
    folder: PathBuf,
    programs: BTreeMap<String, String>,
}

impl ProgramRegistry {
    /// Registry preloaded with the built-in micro-certificate programs.
    pub fn builtin(folder: impl Into<PathBuf>) -> Self {
        let programs = [
            ("CBBD", "Circular Bioeconomy Business Development - Registrations.xlsx"),
            ("CACE", "Climate Action and Community Engagement - Registrations.xlsx"),
            ("CVA", "Climate Vulnerability and Adaptation - Registrations.xlsx"),
            ("CNR", "Co-Management of Natural Resources - Registrations.xlsx"),
            ("CSRP", "Communication Strategies for Resource Practitioners - Registrations.xlsx"),
            ("EFO", "Environmental Footprints of Organizations - Registrations.xlsx"),
            ("FSTB", "Fire Safety for Timber Buildings - Registrations.xlsx"),
            ("FCM", "Forest Carbon Management - Registrations.xlsx"),
            ("FHM", "Forest Health Management - Registrations.xlsx"),
            ("HTC", "Hybrid Timber Construction - Registrations.xlsx"),
            ("SMS", "Strategic Management for Sustainability - Registrations.xlsx"),
            ("TWS", "Tall Wood Structures - Registrations.xlsx"),
            ("ZCBS", "Zero Carbon Building Solutions - Registrations.xlsx"),
        ]
        .into_iter()
        .map(|(code, file)| (code.to_string(), file.to_string()))
        .collect();

        Self {
            folder: folder.into(),
            programs,
        }
    }

    /// Registry with an explicit code → filename mapping.
    pub fn new(folder: impl Into<PathBuf>, programs: BTreeMap<String, String>) -> Self {
        Self {
            folder: folder.into(),
            programs,
        }
    }

    /// Loads a code → filename override from a JSON object file, e.g.
    /// `{"CVA": "Climate Vulnerability and Adaptation - Registrations.xlsx"}`.
    pub fn from_json_file(path: &Path, folder: impl Into<PathBuf>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let programs: BTreeMap<String, String> = serde_json::from_str(&source)?;
        Ok(Self::new(folder, programs))
    }

    /// Full path of the workbook registered for `code`.
    pub fn workbook_path(&self, code: &str) -> Result<PathBuf> {
        let file = self
            .programs
            .get(code)
            .ok_or_else(|| DistributeError::UnknownProgram(code.to_string()))?;
        Ok(self.folder.join(file))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.programs.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }
}
