//! Company news from the news file
//!
//! The news file is a JSON object keyed by company name, each entry holding
//! `{articles: [...], updated_at}`. Articles carry either an ISO `datetime`
//! or a display `time` such as `Mar 5, 2024` or just `Mar 5`.

use crate::dates::{parse_iso, parse_loose_date, parse_month_day};
use crate::error::{PortfolioError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One news article as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl NewsArticle {
    /// Resolve the article's date
    ///
    /// The ISO `datetime` wins. Otherwise `time` is read as `Mon DD, YYYY`,
    /// then as `Mon DD` in the current year, or the previous year when that
    /// would be in the future.
    pub fn resolve_date(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(dt) = self.datetime.as_deref().and_then(parse_iso) {
            return Some(dt);
        }

        let time = self.time.as_deref()?.trim();
        if time.is_empty() {
            return None;
        }
        parse_loose_date(time).or_else(|| parse_month_day(time, now))
    }

    /// Date as written in the file
    pub fn date_label(&self) -> &str {
        self.datetime
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.time.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown date")
    }
}

/// News entry for one company
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyNews {
    #[serde(default)]
    pub articles: Option<Vec<NewsArticle>>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Parameters for a news lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub company: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<usize>,
    /// One line per article instead of a block
    pub brief: bool,
}

impl NewsQuery {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            start: None,
            end: None,
            limit: None,
            brief: true,
        }
    }
}

/// An article with its resolved date
#[derive(Debug, Clone, PartialEq)]
pub struct DatedArticle {
    pub article: NewsArticle,
    pub date: NaiveDateTime,
}

/// File-backed news source
///
/// The file is read again on every call so that a refreshed news file is
/// picked up without restarting the process.
#[derive(Debug, Clone)]
pub struct NewsStore {
    path: PathBuf,
}

impl NewsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| PortfolioError::data_unavailable("news", e))?;
        let entries: Map<String, Value> =
            serde_json::from_str(&raw).map_err(|e| PortfolioError::data_unavailable("news", e))?;
        tracing::info!(path = %self.path.display(), companies = entries.len(), "loaded news");
        Ok(entries)
    }

    /// Articles for a company, newest first, filtered by the query's window
    pub fn articles_for(&self, query: &NewsQuery, now: NaiveDateTime) -> Result<Vec<DatedArticle>> {
        let entries = self.read()?;
        let name = query.company.trim();
        let needle = name.to_lowercase();

        let entry = entries
            .iter()
            .find(|(key, _)| !needle.is_empty() && key.to_lowercase().contains(&needle))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| PortfolioError::not_found(format!("No news found for {name}.")))?;

        let news: CompanyNews = serde_json::from_value(entry)
            .map_err(|e| PortfolioError::data_unavailable("news", e))?;
        let articles = news.articles.unwrap_or_default();
        if articles.is_empty() {
            return Err(PortfolioError::not_found(format!(
                "No news articles available for {name}."
            )));
        }

        let start = bound("start", query.start.as_deref());
        let end = bound("end", query.end.as_deref());

        let mut dated: Vec<DatedArticle> = articles
            .into_iter()
            .filter_map(|article| {
                let Some(date) = article.resolve_date(now) else {
                    tracing::debug!(title = ?article.title, "dropping article with no usable date");
                    return None;
                };
                Some(DatedArticle { article, date })
            })
            .filter(|a| start.is_none_or(|s| a.date >= s) && end.is_none_or(|e| a.date <= e))
            .collect();

        dated.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = query.limit {
            dated.truncate(limit);
        }

        if dated.is_empty() {
            return Err(PortfolioError::not_found(format!(
                "No news articles found for {name} in the specified date range."
            )));
        }
        Ok(dated)
    }
}

fn bound(label: &str, raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_loose_date(raw);
    if parsed.is_none() {
        tracing::warn!(bound = label, value = raw, "ignoring unparseable news date bound");
    }
    parsed
}

/// Render articles for speech
pub fn render(company: &str, articles: &[DatedArticle], brief: bool) -> String {
    let mut lines = vec![format!("News articles for {}:", company.trim())];
    for DatedArticle { article, .. } in articles {
        let title = article.title.as_deref().unwrap_or("No title");
        let source = article.source.as_deref().unwrap_or("Unknown source");
        let link = article.link.as_deref().unwrap_or_default();
        let date = article.date_label();
        if brief {
            lines.push(format!("- {title} ({source}, {date}): {link}"));
        } else {
            lines.push(format!("Title: {title}"));
            lines.push(format!("Source: {source}"));
            lines.push(format!("Date: {date}"));
            lines.push(format!("Link: {link}"));
            lines.push(String::new());
        }
    }
    lines.join("\n")
}
