//! Literal find/replace fixes for known OCR misreads
//!
//! Built-in rules target military-unit abbreviations that Tesseract routinely
//! gets wrong on Cyrillic scans.

use crate::error::OcrError;
use serde::Deserialize;
use std::path::Path;

/// One literal substring replacement
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Correction {
    pub from: String,
    pub to: String,
}

impl Correction {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered list of corrections, applied one after another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corrections {
    rules: Vec<Correction>,
}

impl Default for Corrections {
    fn default() -> Self {
        Self::new(vec![
            Correction::new("меп", "мсп"),
            Correction::new("вісл", "в/сл"),
            // Latin "c" in the replacement
            Correction::new("омебр", "омcбр"),
            Correction::new("мед", "мсд"),
        ])
    }
}

impl Corrections {
    /// Rules with an empty pattern are dropped
    pub fn new(rules: Vec<Correction>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| !rule.from.is_empty())
            .collect();
        Self { rules }
    }

    /// Load rules from a JSON array of `{"from": ..., "to": ...}` objects
    pub fn from_json_file(path: &Path) -> Result<Self, OcrError> {
        let data = std::fs::read_to_string(path).map_err(|e| OcrError::io(path, e))?;
        Self::from_json_str(&data).map_err(|source| OcrError::InvalidCorrections {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(data: &str) -> Result<Self, serde_json::Error> {
        let rules: Vec<Correction> = serde_json::from_str(data)?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[Correction] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order; later rules see the output of earlier ones
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| acc.replace(&rule.from, &rule.to))
    }
}
