//! In-memory record store
//!
//! The dataset is loaded once and never mutated; callers share it through an
//! `Arc`. The industry vocabulary is derived at load time and handed to the
//! criteria extractor. Each record is also kept exactly as it was read so the
//! full-information answer can show it without normalisation.

use crate::error::{PortfolioError, Result};
use crate::model::Company;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Every distinct industry label in the portfolio, lower-cased and sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndustryVocabulary(BTreeSet<String>);

impl IndustryVocabulary {
    pub fn from_companies(companies: &[Company]) -> Self {
        Self(
            companies
                .iter()
                .flat_map(|c| c.industry_domains.iter())
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IndustryVocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| s.into().to_lowercase()).collect())
    }
}

/// Immutable collection of portfolio companies
#[derive(Debug, Clone, Default)]
pub struct PortfolioStore {
    companies: Vec<Company>,
    /// Source records, index-aligned with `companies`
    records: Vec<Value>,
    vocabulary: IndustryVocabulary,
}

impl PortfolioStore {
    /// Load the dataset from a JSON array file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PortfolioError::data_unavailable("portfolio", e))?;
        let records: Vec<Value> = serde_json::from_str(&raw)
            .map_err(|e| PortfolioError::data_unavailable("portfolio", e))?;
        let companies = records
            .iter()
            .map(Company::deserialize)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PortfolioError::data_unavailable("portfolio", e))?;

        let store = Self::with_records(companies, records);
        tracing::info!(
            path = %path.display(),
            companies = store.len(),
            industries = store.vocabulary.len(),
            "loaded portfolio"
        );
        Ok(store)
    }

    /// Store built from typed records; the source form is their serialization
    pub fn from_companies(companies: Vec<Company>) -> Self {
        let records = companies
            .iter()
            .map(|c| serde_json::to_value(c).unwrap_or_default())
            .collect();
        Self::with_records(companies, records)
    }

    fn with_records(companies: Vec<Company>, records: Vec<Value>) -> Self {
        let vocabulary = IndustryVocabulary::from_companies(&companies);
        Self {
            companies,
            records,
            vocabulary,
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn vocabulary(&self) -> &IndustryVocabulary {
        &self.vocabulary
    }

    /// First company whose name contains `name`, case-insensitively
    pub fn find(&self, name: &str) -> Option<&Company> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.companies.iter().find(|c| c.name_contains(&needle))
    }

    /// Like [`find`](Self::find), paired with the record as it was loaded
    pub fn find_record(&self, name: &str) -> Option<(&Company, &Value)> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.companies
            .iter()
            .zip(&self.records)
            .find(|(c, _)| c.name_contains(&needle))
    }

    /// First company whose whole name appears inside a free-text query
    pub fn find_in_query(&self, query: &str) -> Option<&Company> {
        let query = query.to_lowercase();
        self.companies.iter().find(|c| {
            let name = c.name.trim().to_lowercase();
            !name.is_empty() && query.contains(&name)
        })
    }

    /// Sorted unique industry labels, original casing
    pub fn domains(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .companies
            .iter()
            .flat_map(|c| c.industry_domains.iter().map(String::as_str))
            .collect();
        set.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
