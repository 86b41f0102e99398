//! Template lookup.
//!
//! The three setup templates ship inside the binary. A template directory can
//! override any of them: a file whose name matches a template id replaces
//! the built-in one.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};

/// Templates compiled into the crate.
pub mod builtin {
    pub const AUTOUNATTEND: &str = include_str!("../templates/autounattend.xml");
    pub const START_PS1: &str = include_str!("../templates/start.ps1");
    pub const MAIN_CS: &str = include_str!("../templates/main.cs");

    pub const IDS: [&str; 3] = ["autounattend.xml", "start.ps1", "main.cs"];

    pub fn get(id: &str) -> Option<&'static str> {
        match id {
            "autounattend.xml" => Some(AUTOUNATTEND),
            "start.ps1" => Some(START_PS1),
            "main.cs" => Some(MAIN_CS),
            _ => None,
        }
    }
}

/// Resolves template ids to template text.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    overrides: BTreeMap<String, PathBuf>,
}

impl TemplateStore {
    /// Store with only the built-in templates.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Store whose templates are overridden by the files in `dir`.
    pub fn with_overrides(dir: impl AsRef<Path>) -> TemplateResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::MissingDirectory(dir.to_path_buf()));
        }

        let mut overrides = BTreeMap::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                info!("Using template override: {} ({:?})", name, path);
                overrides.insert(name.to_string(), path.to_path_buf());
            }
        }

        Ok(Self { overrides })
    }

    /// Template text for `id`.
    pub fn get(&self, id: &str) -> TemplateResult<Cow<'static, str>> {
        if let Some(path) = self.overrides.get(id) {
            debug!("Loading template {} from {:?}", id, path);
            return Ok(Cow::Owned(fs::read_to_string(path)?));
        }
        builtin::get(id)
            .map(Cow::Borrowed)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.overrides.contains_key(id)
    }

    /// Every template id the store can resolve, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = builtin::IDS.iter().map(|id| id.to_string()).collect();
        for id in self.overrides.keys() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids.sort();
        ids
    }
}
