//! Ranking by a named numeric field
//!
//! The pipeline is: resolve the field, narrow by the filter query, narrow by
//! the announcement-date window (only when ranking by `recent_raise`), narrow
//! to the fixed list, then sort and truncate. Companies without a value are
//! always ranked last, whatever the direction, and ties keep dataset order.

use crate::criteria::extract;
use crate::dates::parse_loose_date;
use crate::error::{PortfolioError, Result};
use crate::fields::NumericField;
use crate::filter::evaluate;
use crate::model::Company;
use crate::store::IndustryVocabulary;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Inclusive bounds on the fundraising announcement date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateWindow {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start: start.filter(|s| !s.trim().is_empty()),
            end: end.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Parameters for one ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankRequest {
    pub field: String,
    pub limit: usize,
    /// Lower values first when set
    pub ascending: bool,
    /// Free-text query narrowing the candidates
    pub filter_query: Option<String>,
    /// Exact names, case-insensitive; empty means no restriction
    pub fixed_list: Vec<String>,
    pub window: DateWindow,
}

impl RankRequest {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            limit: 5,
            ascending: false,
            filter_query: None,
            fixed_list: Vec::new(),
            window: DateWindow::default(),
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn filter_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.filter_query = (!query.trim().is_empty()).then_some(query);
        self
    }

    pub fn fixed_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixed_list = names
            .into_iter()
            .map(Into::into)
            .map(|n: String| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        self
    }

    pub fn window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }
}

/// One ranked company with the value it was ranked by
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub company: &'a Company,
    pub value: Option<f64>,
}

/// Compare present values in the requested direction, missing values last
pub fn compare_missing_last(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.total_cmp(&b),
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of companies by a field
pub fn order_by<'a>(
    companies: impl IntoIterator<Item = &'a Company>,
    field: NumericField,
    ascending: bool,
) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = companies
        .into_iter()
        .map(|company| Ranked {
            company,
            value: field.value(company),
        })
        .collect();
    ranked.sort_by(|a, b| compare_missing_last(a.value, b.value, ascending));
    ranked
}

fn parse_bound(label: &str, raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?;
    let parsed = parse_loose_date(raw);
    if parsed.is_none() {
        tracing::warn!(bound = label, value = raw, "ignoring unparseable date bound");
    }
    parsed
}

fn raised_within(
    company: &Company,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> bool {
    if company.recent_raise.is_none() {
        return false;
    }
    let Some(announced) = company
        .fundraising_announcement_date
        .as_deref()
        .and_then(parse_loose_date)
    else {
        tracing::debug!(company = %company.name, "no parseable announcement date");
        return false;
    };
    start.is_none_or(|s| announced >= s) && end.is_none_or(|e| announced <= e)
}

/// Rank companies by the requested field
pub fn rank<'a>(
    records: &'a [Company],
    request: &RankRequest,
    vocabulary: &IndustryVocabulary,
) -> Result<Vec<Ranked<'a>>> {
    let field = NumericField::resolve(&request.field)?;

    let mut candidates: Vec<&'a Company> = match request.filter_query.as_deref() {
        Some(query) => evaluate(&extract(query, vocabulary), records),
        None => records.iter().collect(),
    };

    if field == NumericField::RecentRaise && !request.window.is_empty() {
        let start = parse_bound("start", request.window.start.as_deref());
        let end = parse_bound("end", request.window.end.as_deref());
        candidates.retain(|c| raised_within(c, start, end));
    }

    if !request.fixed_list.is_empty() {
        let wanted: Vec<String> = request.fixed_list.iter().map(|n| n.to_lowercase()).collect();
        candidates.retain(|c| wanted.contains(&c.name.trim().to_lowercase()));
    }

    if candidates.is_empty() {
        return Err(PortfolioError::not_found(
            "I couldn't find any companies matching the provided criteria.",
        ));
    }

    let mut ranked = order_by(candidates, field, request.ascending);
    ranked.truncate(request.limit);

    if ranked.is_empty() {
        return Err(PortfolioError::not_found(
            "No companies found after applying the ranking.",
        ));
    }

    tracing::debug!(field = field.name(), ranked = ranked.len(), "ranked companies");
    Ok(ranked)
}
