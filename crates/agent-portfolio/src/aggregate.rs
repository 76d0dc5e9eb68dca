//! Aggregate statistics over filtered companies
//!
//! Absent values are dropped before computing, never counted as zero. An
//! empty input or an input where every value is absent yields
//! [`Aggregate::NoData`], which callers speak differently from a real `0`.

use crate::fields::NumericField;
use crate::model::{Company, Status};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Statistic to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Average,
    Sum,
    /// Number of companies with a value
    Count,
}

impl Statistic {
    /// Parse a statistic name (`average`/`mean`, `total`/`sum`, `count`)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "average" | "avg" | "mean" => Some(Self::Average),
            "total" | "sum" => Some(Self::Sum),
            "count" => Some(Self::Count),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Sum => "total",
            Self::Count => "count",
        }
    }
}

/// Grouping for company counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountBy {
    #[serde(alias = "deeptech", alias = "deep-tech")]
    DeepTech,
    Status,
    #[serde(alias = "industries", alias = "domain")]
    Industry,
}

/// Result of an aggregation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    Value(f64),
    NoData,
}

impl Aggregate {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NoData => None,
        }
    }
}

/// Compute a statistic of `field` over `companies`
pub fn aggregate<'a>(
    companies: impl IntoIterator<Item = &'a Company>,
    field: NumericField,
    statistic: Statistic,
) -> Aggregate {
    let mut seen = 0usize;
    let values: Vec<f64> = companies
        .into_iter()
        .inspect(|_| seen += 1)
        .filter_map(|c| field.value(c))
        .collect();

    match statistic {
        Statistic::Count if seen == 0 => Aggregate::NoData,
        Statistic::Count => Aggregate::Value(values.len() as f64),
        _ if values.is_empty() => Aggregate::NoData,
        Statistic::Sum => Aggregate::Value(values.iter().sum()),
        Statistic::Average => Aggregate::Value(values.iter().sum::<f64>() / values.len() as f64),
    }
}

/// Companies flagged deep tech
pub fn count_deep_tech<'a>(companies: impl IntoIterator<Item = &'a Company>) -> usize {
    companies
        .into_iter()
        .filter(|c| c.deep_tech == Some(true))
        .count()
}

/// Companies per status bucket; unknown statuses are not counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: usize,
    pub ipo: usize,
    pub exit: usize,
}

pub fn count_by_status<'a>(companies: impl IntoIterator<Item = &'a Company>) -> StatusCounts {
    companies
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, c| {
            match c.status() {
                Status::Active => counts.active += 1,
                Status::Ipo => counts.ipo += 1,
                Status::Exit => counts.exit += 1,
                Status::Unknown => {}
            }
            counts
        })
}

/// Companies per lower-cased industry label, sorted by label
pub fn count_by_industry<'a>(
    companies: impl IntoIterator<Item = &'a Company>,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for company in companies {
        for domain in &company.industry_domains {
            *counts.entry(domain.trim().to_lowercase()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(values: &[Option<f64>]) -> Vec<Company> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Company {
                name: format!("Company {i}"),
                excitement: *v,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_average_skips_missing() {
        let companies = scored(&[None, Some(4.0), Some(8.0)]);
        assert_eq!(
            aggregate(&companies, NumericField::Excitement, Statistic::Average),
            Aggregate::Value(6.0)
        );
        assert_eq!(
            aggregate(&companies, NumericField::Excitement, Statistic::Sum),
            Aggregate::Value(12.0)
        );
        assert_eq!(
            aggregate(&companies, NumericField::Excitement, Statistic::Count),
            Aggregate::Value(2.0)
        );
    }

    #[test]
    fn test_no_data_is_not_zero() {
        let companies = scored(&[None, None]);
        assert_eq!(
            aggregate(&companies, NumericField::Excitement, Statistic::Average),
            Aggregate::NoData
        );
        assert_eq!(
            aggregate(&companies, NumericField::Excitement, Statistic::Count),
            Aggregate::Value(0.0)
        );

        let empty: Vec<Company> = Vec::new();
        assert_eq!(
            aggregate(&empty, NumericField::Excitement, Statistic::Count),
            Aggregate::NoData
        );
    }

    #[test]
    fn test_zero_is_a_value() {
        let companies = scored(&[Some(0.0)]);
        assert_eq!(
            aggregate(&companies, NumericField::Excitement, Statistic::Average),
            Aggregate::Value(0.0)
        );
    }

    #[test]
    fn test_statistic_parse() {
        assert_eq!(Statistic::parse("Average"), Some(Statistic::Average));
        assert_eq!(Statistic::parse("total"), Some(Statistic::Sum));
        assert_eq!(Statistic::parse("median"), None);
    }

    #[test]
    fn test_counts() {
        let mut companies = scored(&[None, None, None, None]);
        companies[0].deep_tech = Some(true);
        companies[1].deep_tech = Some(false);
        companies[0].status = Some("active".to_string());
        companies[1].status = Some("IPO".to_string());
        companies[2].status = Some("inactive".to_string());
        companies[0].industry_domains = vec!["Fintech".to_string(), "AI".to_string()];
        companies[3].industry_domains = vec!["fintech".to_string()];

        assert_eq!(count_deep_tech(&companies), 1);
        assert_eq!(
            count_by_status(&companies),
            StatusCounts {
                active: 1,
                ipo: 1,
                exit: 0
            }
        );

        let by_industry = count_by_industry(&companies);
        assert_eq!(by_industry.get("fintech"), Some(&2));
        assert_eq!(by_industry.get("ai"), Some(&1));
    }
}
