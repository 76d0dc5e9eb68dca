//! Field registry
//!
//! Maps the names callers use for ranking and aggregation to typed accessors
//! on [`Company`]. An unknown name is a checked error, never a silent zero.

use crate::error::{PortfolioError, Result};
use crate::model::Company;

/// Numeric field that can be ranked or aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Valuation,
    RecentRaise,
    Excitement,
    PersonalThesis,
    CollabfundThesis,
    Defensibility,
    MarketSaturation,
    MarketSize2022,
    MarketSize2024,
    MarketSize2030,
    MarketGrowthRate,
    UnicornPotential,
    DecacornPotential,
    VentureScaleProbability,
    BarrierDifficulty,
    BehaviorChangeRequirement,
    TechnologicalComplexity,
    OperationalComplexity,
    CapitalIntensity,
}

/// How a field's value is spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Stored in millions, spoken in billions
    BillionsFromMillions,
    /// Stored and spoken in millions
    Millions,
    /// Stored and spoken in billions
    Billions,
    /// 1-10 score
    Score,
    Percent,
    Plain,
}

impl Unit {
    /// Render a computed statistic, two decimals
    pub fn render(self, value: f64) -> String {
        match self {
            Self::BillionsFromMillions => format!("${:.2} billion", value / 1000.0),
            Self::Millions => format!("${value:.2} million"),
            Self::Billions => format!("${value:.2} billion"),
            Self::Score => format!("{value:.2}/10"),
            Self::Percent => format!("{value:.2}%"),
            Self::Plain => format!("{value:.2}"),
        }
    }

    /// Money is prefixed with "approximately" when spoken
    pub fn is_money(self) -> bool {
        matches!(
            self,
            Self::BillionsFromMillions | Self::Millions | Self::Billions
        )
    }
}

impl NumericField {
    pub const ALL: [NumericField; 19] = [
        Self::Valuation,
        Self::RecentRaise,
        Self::Excitement,
        Self::PersonalThesis,
        Self::CollabfundThesis,
        Self::Defensibility,
        Self::MarketSaturation,
        Self::MarketSize2022,
        Self::MarketSize2024,
        Self::MarketSize2030,
        Self::MarketGrowthRate,
        Self::UnicornPotential,
        Self::DecacornPotential,
        Self::VentureScaleProbability,
        Self::BarrierDifficulty,
        Self::BehaviorChangeRequirement,
        Self::TechnologicalComplexity,
        Self::OperationalComplexity,
        Self::CapitalIntensity,
    ];

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            Self::Valuation => "valuation",
            Self::RecentRaise => "recent_raise",
            Self::Excitement => "excitement",
            Self::PersonalThesis => "personal_thesis",
            Self::CollabfundThesis => "collabfund_thesis",
            Self::Defensibility => "defensibility",
            Self::MarketSaturation => "market_saturation",
            Self::MarketSize2022 => "market_size_2022",
            Self::MarketSize2024 => "market_size_2024",
            Self::MarketSize2030 => "market_size_2030",
            Self::MarketGrowthRate => "market_growth_rate",
            Self::UnicornPotential => "unicorn_potential",
            Self::DecacornPotential => "decacorn_potential",
            Self::VentureScaleProbability => "venture_scale_probability",
            Self::BarrierDifficulty => "barrier_difficulty",
            Self::BehaviorChangeRequirement => "behavior_change_requirement",
            Self::TechnologicalComplexity => "technological_complexity",
            Self::OperationalComplexity => "operational_complexity",
            Self::CapitalIntensity => "capital_intensity",
        }
    }

    /// Spoken name of the statistic, as in "the average {label}"
    pub fn label(self) -> &'static str {
        match self {
            Self::Valuation => "valuation",
            Self::RecentRaise => "recent raise",
            Self::Excitement => "excitement score",
            Self::PersonalThesis => "personal thesis alignment score",
            Self::CollabfundThesis => "Collaborative Fund thesis alignment score",
            Self::Defensibility => "defensibility score",
            Self::MarketSaturation => "market saturation",
            Self::MarketSize2022 => "2022 market size estimate",
            Self::MarketSize2024 => "2024 market size estimate",
            Self::MarketSize2030 => "2030 market size estimate",
            Self::MarketGrowthRate => "annual market growth rate",
            Self::UnicornPotential => "unicorn potential",
            Self::DecacornPotential => "decacorn potential",
            Self::VentureScaleProbability => "venture scale probability",
            Self::BarrierDifficulty => "barrier difficulty",
            Self::BehaviorChangeRequirement => "behavior change requirement",
            Self::TechnologicalComplexity => "technological complexity",
            Self::OperationalComplexity => "operational complexity",
            Self::CapitalIntensity => "capital intensity",
        }
    }

    /// Name of the data set, as in "No {topic} data available."
    pub fn topic(self) -> &'static str {
        match self {
            Self::Excitement => "excitement",
            Self::PersonalThesis => "personal thesis",
            Self::CollabfundThesis => "Collaborative Fund thesis",
            Self::Defensibility => "defensibility",
            Self::MarketSize2022 | Self::MarketSize2024 | Self::MarketSize2030 => "market size",
            Self::MarketGrowthRate => "market growth",
            other => other.label(),
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Self::Valuation => Unit::BillionsFromMillions,
            Self::RecentRaise => Unit::Millions,
            Self::MarketSize2022 | Self::MarketSize2024 | Self::MarketSize2030 => Unit::Billions,
            Self::MarketGrowthRate => Unit::Percent,
            Self::Excitement
            | Self::PersonalThesis
            | Self::CollabfundThesis
            | Self::Defensibility
            | Self::BarrierDifficulty
            | Self::BehaviorChangeRequirement
            | Self::TechnologicalComplexity
            | Self::OperationalComplexity
            | Self::CapitalIntensity => Unit::Score,
            Self::MarketSaturation
            | Self::UnicornPotential
            | Self::DecacornPotential
            | Self::VentureScaleProbability => Unit::Plain,
        }
    }

    /// Read the field from a record
    pub fn value(self, company: &Company) -> Option<f64> {
        match self {
            Self::Valuation => company.valuation,
            Self::RecentRaise => company.recent_raise,
            Self::Excitement => company.excitement,
            Self::PersonalThesis => company.zizo_thesis_alignment.as_ref().and_then(|t| t.score),
            Self::CollabfundThesis => company
                .collabfund_thesis_alignment
                .as_ref()
                .and_then(|t| t.score),
            Self::Defensibility => company.defensibility().and_then(|d| d.defensibility_score),
            Self::MarketSaturation => company.defensibility().and_then(|d| d.market_saturation),
            Self::MarketSize2022 => company.market_size().and_then(|m| m.estimate_2022),
            Self::MarketSize2024 => company.market_size().and_then(|m| m.estimate_2024),
            Self::MarketSize2030 => company.market_size().and_then(|m| m.estimate_2030),
            Self::MarketGrowthRate => company.market_size().and_then(|m| m.annual_growth_rate),
            Self::UnicornPotential => company.unicorn_potential,
            Self::DecacornPotential => company.decacorn_potential,
            Self::VentureScaleProbability => company.venture_scale_probability,
            Self::BarrierDifficulty => company.barrier_difficulty,
            Self::BehaviorChangeRequirement => company.behavior_change_requirement,
            Self::TechnologicalComplexity => company.technological_complexity,
            Self::OperationalComplexity => company.operational_complexity,
            Self::CapitalIntensity => company.capital_intensity,
        }
    }

    /// Look a field up by name
    ///
    /// Case, spaces and hyphens are ignored, and a few spoken aliases are
    /// accepted (`zizo_thesis`, `defensibility_score`, `tech_complexity`).
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        let canonical = match normalized.as_str() {
            "zizo_thesis" | "zizo_thesis_alignment" | "personal_thesis_alignment" => {
                "personal_thesis"
            }
            "collabfund_thesis_alignment" | "collaborative_fund_thesis" => "collabfund_thesis",
            "defensibility_score" => "defensibility",
            "tech_complexity" => "technological_complexity",
            "op_complexity" => "operational_complexity",
            "annual_growth_rate" | "growth_rate" => "market_growth_rate",
            "raise" | "funds_raised" => "recent_raise",
            other => other,
        };
        Self::ALL.into_iter().find(|f| f.name() == canonical)
    }

    /// Resolve a name or fail with the list of supported names
    pub fn resolve(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| PortfolioError::UnsupportedField {
            field: name.to_string(),
            supported: Self::supported_names(),
        })
    }

    /// Comma separated registry names
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Text field that supports containment checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Url,
    Description,
    InvestmentThesis,
    DefensibilityDescription,
    DefensibilityConsiderations,
    VentureReturnsDescription,
    VentureReturnsRisks,
    CollabfundThesisDescription,
    PersonalThesisDescription,
    EntryBarriers,
    FundraisingAnnouncementDate,
    FundraisingSourceArticle,
    FundraisingSourcePublisher,
    FundraisingSourceUrl,
    FundraisingDataUpdated,
}

impl TextField {
    pub fn value(self, company: &Company) -> Option<&str> {
        match self {
            Self::Name => Some(company.name.as_str()),
            Self::Url => company.url.as_deref(),
            Self::Description => company.description.as_deref(),
            Self::InvestmentThesis => company.investment_thesis.as_deref(),
            Self::DefensibilityDescription => {
                company.defensibility().and_then(|d| d.description.as_deref())
            }
            Self::DefensibilityConsiderations => {
                company.defensibility().and_then(|d| d.considerations.as_deref())
            }
            Self::VentureReturnsDescription => company
                .venture_scale_returns()
                .and_then(|v| v.description.as_deref()),
            Self::VentureReturnsRisks => {
                company.venture_scale_returns().and_then(|v| v.risks.as_deref())
            }
            Self::CollabfundThesisDescription => company
                .collabfund_thesis_alignment
                .as_ref()
                .and_then(|t| t.description.as_deref()),
            Self::PersonalThesisDescription => company
                .zizo_thesis_alignment
                .as_ref()
                .and_then(|t| t.description.as_deref()),
            Self::EntryBarriers => company.entry_barriers.as_deref(),
            Self::FundraisingAnnouncementDate => company.fundraising_announcement_date.as_deref(),
            Self::FundraisingSourceArticle => company.fundraising_source_article.as_deref(),
            Self::FundraisingSourcePublisher => company.fundraising_source_publisher.as_deref(),
            Self::FundraisingSourceUrl => company.fundraising_source_url.as_deref(),
            Self::FundraisingDataUpdated => company.fundraising_data_updated.as_deref(),
        }
    }
}
