//! Company records as produced by the offline analysis pipeline
//!
//! Records are partially populated: a failed or skipped analysis leaves
//! numbers null and nested objects missing. Every field except `name` is
//! therefore optional, numbers are read leniently (numeric strings are
//! accepted, anything non-finite is dropped) and unknown keys are kept so a
//! full dump shows the record as stored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Portfolio status of a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Ipo,
    Exit,
    /// Missing or any other value (e.g. `inactive`)
    Unknown,
}

impl Status {
    /// Parse a stored status string, case-insensitively
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "ipo" => Self::Ipo,
            "exit" => Self::Exit,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ipo => "ipo",
            Self::Exit => "exit",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One portfolio company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_thesis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Notes>,
    #[serde(default, deserialize_with = "null_default")]
    pub industry_domains: Vec<String>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub unicorn_potential: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub decacorn_potential: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub venture_scale_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collabfund_thesis_alignment: Option<ThesisAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zizo_thesis_alignment: Option<ThesisAlignment>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub excitement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_barriers: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub barrier_difficulty: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub behavior_change_requirement: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub technological_complexity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub operational_complexity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub capital_intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_tech: Option<bool>,

    /// Most recent round, millions USD
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub recent_raise: Option<f64>,
    /// Latest valuation, millions USD
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub valuation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraising_announcement_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraising_source_article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraising_source_publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraising_source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraising_data_updated: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Company {
    pub fn status(&self) -> Status {
        self.status.as_deref().map_or(Status::Unknown, Status::parse)
    }

    pub fn market_size(&self) -> Option<&MarketSize> {
        self.notes.as_ref().and_then(|n| n.market_size.as_ref())
    }

    pub fn defensibility(&self) -> Option<&Defensibility> {
        self.notes.as_ref().and_then(|n| n.defensibility.as_ref())
    }

    pub fn venture_scale_returns(&self) -> Option<&VentureScaleReturns> {
        self.notes.as_ref().and_then(|n| n.venture_scale_returns.as_ref())
    }

    pub fn competitors(&self) -> &[String] {
        self.defensibility().map_or(&[], |d| d.competitors.as_slice())
    }

    /// Case-insensitive substring match on the name
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}

/// Analyst notes nested under `notes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_size: Option<MarketSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defensibility: Option<Defensibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venture_scale_returns: Option<VentureScaleReturns>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Market size estimates, billions USD
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSize {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity: Option<String>,
    #[serde(rename = "2022_estimate", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub estimate_2022: Option<f64>,
    #[serde(rename = "2024_estimate", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub estimate_2024: Option<f64>,
    #[serde(rename = "2030_estimate", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub estimate_2030: Option<f64>,
    /// Percent per year
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub annual_growth_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defensibility {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub defensibility_score: Option<f64>,
    /// 0 = fragmented, 100 = saturated
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub market_saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_saturation_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub considerations: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub competitors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VentureScaleReturns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<String>,
}

/// Score (1-10) and rationale for one investment thesis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThesisAlignment {
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite()))
}
