use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day auxiliary documents shown next to a flow value. Document paths are relative to `base`,
/// which points at wherever the assets are deployed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuxDocuments {
    #[serde(default)]
    pub base: String,
    pub documents: BTreeMap<NaiveDate, String>,
}

impl AuxDocuments {
    pub fn from_json(raw: &str) -> Result<Self> {
        let docs: Self = serde_json::from_str(raw)?;
        if docs.documents.values().any(|doc| doc.trim().is_empty()) {
            bail!("Auxiliary document config has an empty path");
        }
        Ok(docs)
    }

    pub fn with_base(mut self, base: String) -> Self {
        self.base = base;
        self
    }

    /// The resolved location of the document for this day, if there is one
    pub fn resolve(&self, date: NaiveDate) -> Option<String> {
        let doc = self.documents.get(&date)?;
        if self.base.is_empty() || doc.starts_with('/') || doc.contains("://") {
            return Some(doc.clone());
        }
        Some(format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            doc.trim_start_matches("./")
        ))
    }
}

impl Default for AuxDocuments {
    fn default() -> Self {
        let mut documents = BTreeMap::new();
        for day in [7, 8, 9] {
            if let Some(date) = NaiveDate::from_ymd_opt(2018, 7, day) {
                documents.insert(date, format!("data7_{day}.html"));
            }
        }
        Self {
            base: "data".to_string(),
            documents,
        }
    }
}
