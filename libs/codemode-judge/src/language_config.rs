// Language mapping table: canonical language name -> executor language code
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ExecutorError;

/// Identifier the remote executor uses for a language.
/// Judge0 deployments use numbers; other runners use names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutorLanguageCode {
    Numeric(u32),
    Named(String),
}

impl fmt::Display for ExecutorLanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorLanguageCode::Numeric(id) => write!(f, "{}", id),
            ExecutorLanguageCode::Named(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub executor_code: ExecutorLanguageCode,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguagesJson {
    version: String,
    languages: Vec<LanguageEntry>,
}

/// Versioned language mapping table
///
/// Executor deployments reassign codes over time, so the table is data
/// loaded from config/languages.json; the built-in table matches Judge0 CE.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    version: String,
    codes: HashMap<String, ExecutorLanguageCode>,
    canonical: Vec<String>,
}

impl LanguageTable {
    /// Load the mapping table from a JSON file
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Language config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .context("Failed to read languages.json")?;

        Self::from_json(&content)
            .with_context(|| format!("Invalid language table in {}", config_path.display()))
    }

    /// Load from `path` when it exists, otherwise fall back to the built-in table
    pub fn load_or_builtin(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::builtin())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let languages_json: LanguagesJson = serde_json::from_str(content)
            .context("Failed to parse languages.json")?;
        Self::from_entries(languages_json.version, languages_json.languages)
    }

    pub fn from_entries(version: impl Into<String>, entries: Vec<LanguageEntry>) -> Result<Self> {
        if entries.is_empty() {
            bail!("No languages configured");
        }

        let mut codes = HashMap::new();
        let mut canonical = Vec::with_capacity(entries.len());

        for entry in entries {
            let name = entry.name.trim().to_lowercase();
            if name.is_empty() {
                bail!("Language entry with empty name");
            }
            canonical.push(name.clone());

            for key in std::iter::once(name).chain(entry.aliases.iter().map(|a| a.trim().to_lowercase())) {
                if codes.insert(key.clone(), entry.executor_code.clone()).is_some() {
                    bail!("Duplicate language name or alias: {}", key);
                }
            }
        }

        canonical.sort();

        Ok(Self {
            version: version.into(),
            codes,
            canonical,
        })
    }

    /// Judge0 CE language ids
    pub fn builtin() -> Self {
        let entry = |name: &str, id: u32, aliases: &[&str]| LanguageEntry {
            name: name.to_string(),
            executor_code: ExecutorLanguageCode::Numeric(id),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        };

        let entries = vec![
            entry("python", 71, &["py", "python3"]),
            entry("javascript", 63, &["js", "node"]),
            entry("typescript", 74, &["ts"]),
            entry("java", 62, &[]),
            entry("csharp", 51, &["c#", "cs"]),
            entry("cpp", 54, &["c++"]),
            entry("c", 50, &[]),
            entry("go", 60, &["golang"]),
            entry("rust", 73, &["rs"]),
        ];

        let mut codes = HashMap::new();
        let mut canonical = Vec::new();
        for e in entries {
            canonical.push(e.name.clone());
            for alias in &e.aliases {
                codes.insert(alias.clone(), e.executor_code.clone());
            }
            codes.insert(e.name, e.executor_code);
        }
        canonical.sort();

        Self {
            version: "judge0-ce-1.13".to_string(),
            codes,
            canonical,
        }
    }

    /// Resolve a language identifier (case-insensitive)
    pub fn resolve(&self, language: &str) -> Result<&ExecutorLanguageCode, ExecutorError> {
        self.codes
            .get(&language.trim().to_lowercase())
            .ok_or_else(|| ExecutorError::UnsupportedLanguage(language.to_string()))
    }

    pub fn supports(&self, language: &str) -> bool {
        self.resolve(language).is_ok()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Canonical language names, sorted
    pub fn languages(&self) -> &[String] {
        &self.canonical
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}
