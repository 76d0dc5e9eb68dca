//! Predicate evaluation
//!
//! Each criterion key maps to one [`Check`] in a static registry. A check
//! carries its accessor and its missing-value policy, so evaluating a
//! [`CriteriaMap`] is a lookup per key rather than a cascade of special cases.
//!
//! Missing values follow the dataset's own defaults: a missing number counts
//! as 0 for every bound except `max_market_saturation`, where it counts as
//! 100, and missing text counts as empty. A company with no excitement score
//! is therefore excluded by any positive `min_excitement`.

use crate::criteria::{CriteriaMap, CriterionValue};
use crate::fields::{NumericField, TextField};
use crate::model::Company;

/// Test applied for one criterion key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Case-insensitive containment in a text field
    Contains(TextField),
    /// Value must be at least the bound
    AtLeast { field: NumericField, missing: f64 },
    /// Value must be at most the bound
    AtMost { field: NumericField, missing: f64 },
    /// `deep_tech` equals the flag, missing is `false`
    DeepTechIs,
    StatusIs,
    /// Some competitor name contains the needle
    AnyCompetitor,
    /// Every keyword appears in domains, description or thesis
    AllKeywords,
}

const fn at_least(field: NumericField) -> Check {
    Check::AtLeast {
        field,
        missing: 0.0,
    }
}

const fn at_most(field: NumericField) -> Check {
    Check::AtMost {
        field,
        missing: 0.0,
    }
}

/// Criterion key to check
pub static PREDICATES: &[(&str, Check)] = &[
    ("name", Check::Contains(TextField::Name)),
    ("url_contains", Check::Contains(TextField::Url)),
    ("description_contains", Check::Contains(TextField::Description)),
    ("status", Check::StatusIs),
    ("investment_thesis_contains", Check::Contains(TextField::InvestmentThesis)),
    ("min_market_size_2022", at_least(NumericField::MarketSize2022)),
    ("max_market_size_2022", at_most(NumericField::MarketSize2022)),
    ("min_market_size_2024", at_least(NumericField::MarketSize2024)),
    ("max_market_size_2024", at_most(NumericField::MarketSize2024)),
    ("min_market_size_2030", at_least(NumericField::MarketSize2030)),
    ("max_market_size_2030", at_most(NumericField::MarketSize2030)),
    ("min_defensibility_score", at_least(NumericField::Defensibility)),
    (
        "max_market_saturation",
        Check::AtMost {
            field: NumericField::MarketSaturation,
            missing: 100.0,
        },
    ),
    (
        "defensibility_description_contains",
        Check::Contains(TextField::DefensibilityDescription),
    ),
    (
        "defensibility_considerations_contains",
        Check::Contains(TextField::DefensibilityConsiderations),
    ),
    ("competitor", Check::AnyCompetitor),
    (
        "venture_scale_returns_description_contains",
        Check::Contains(TextField::VentureReturnsDescription),
    ),
    (
        "venture_scale_returns_risks_contains",
        Check::Contains(TextField::VentureReturnsRisks),
    ),
    ("industry_keywords", Check::AllKeywords),
    ("min_unicorn_potential", at_least(NumericField::UnicornPotential)),
    ("max_unicorn_potential", at_most(NumericField::UnicornPotential)),
    ("min_decacorn_potential", at_least(NumericField::DecacornPotential)),
    ("max_decacorn_potential", at_most(NumericField::DecacornPotential)),
    ("min_venture_scale_probability", at_least(NumericField::VentureScaleProbability)),
    ("max_venture_scale_probability", at_most(NumericField::VentureScaleProbability)),
    ("min_collabfund_thesis", at_least(NumericField::CollabfundThesis)),
    (
        "collabfund_thesis_description_contains",
        Check::Contains(TextField::CollabfundThesisDescription),
    ),
    ("min_personal_thesis", at_least(NumericField::PersonalThesis)),
    (
        "zizo_thesis_description_contains",
        Check::Contains(TextField::PersonalThesisDescription),
    ),
    ("min_excitement", at_least(NumericField::Excitement)),
    ("entry_barriers_contains", Check::Contains(TextField::EntryBarriers)),
    ("min_barrier_difficulty", at_least(NumericField::BarrierDifficulty)),
    ("max_barrier_difficulty", at_most(NumericField::BarrierDifficulty)),
    ("min_behavior_change_requirement", at_least(NumericField::BehaviorChangeRequirement)),
    ("max_behavior_change_requirement", at_most(NumericField::BehaviorChangeRequirement)),
    ("min_tech_complexity", at_least(NumericField::TechnologicalComplexity)),
    ("max_tech_complexity", at_most(NumericField::TechnologicalComplexity)),
    ("min_op_complexity", at_least(NumericField::OperationalComplexity)),
    ("max_op_complexity", at_most(NumericField::OperationalComplexity)),
    ("min_capital_intensity", at_least(NumericField::CapitalIntensity)),
    ("max_capital_intensity", at_most(NumericField::CapitalIntensity)),
    ("deep_tech", Check::DeepTechIs),
    ("min_recent_raise", at_least(NumericField::RecentRaise)),
    ("max_recent_raise", at_most(NumericField::RecentRaise)),
    // Announcement and update dates are free-form text, matched as substrings
    (
        "min_fundraising_announcement_date",
        Check::Contains(TextField::FundraisingAnnouncementDate),
    ),
    (
        "max_fundraising_announcement_date",
        Check::Contains(TextField::FundraisingAnnouncementDate),
    ),
    (
        "fundraising_source_article_contains",
        Check::Contains(TextField::FundraisingSourceArticle),
    ),
    (
        "fundraising_source_publisher_contains",
        Check::Contains(TextField::FundraisingSourcePublisher),
    ),
    (
        "fundraising_source_url_contains",
        Check::Contains(TextField::FundraisingSourceUrl),
    ),
    (
        "min_fundraising_data_updated",
        Check::Contains(TextField::FundraisingDataUpdated),
    ),
    (
        "max_fundraising_data_updated",
        Check::Contains(TextField::FundraisingDataUpdated),
    ),
];

/// Look up the check registered for a criterion key
pub fn check_for(key: &str) -> Option<Check> {
    PREDICATES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, check)| *check)
}

impl Check {
    /// Apply the check to one company
    ///
    /// A criterion value of the wrong kind fails the company.
    pub fn holds(self, company: &Company, value: &CriterionValue) -> bool {
        match (self, value) {
            (Self::Contains(field), CriterionValue::Text(needle)) => field
                .value(company)
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            (Self::AtLeast { field, missing }, CriterionValue::Number(bound)) => {
                field.value(company).unwrap_or(missing) >= *bound
            }
            (Self::AtMost { field, missing }, CriterionValue::Number(bound)) => {
                field.value(company).unwrap_or(missing) <= *bound
            }
            (Self::DeepTechIs, CriterionValue::Flag(flag)) => {
                company.deep_tech.unwrap_or(false) == *flag
            }
            (Self::StatusIs, CriterionValue::Status(status)) => company.status() == *status,
            (Self::AnyCompetitor, CriterionValue::Text(needle)) => {
                let needle = needle.to_lowercase();
                company
                    .competitors()
                    .iter()
                    .any(|c| c.to_lowercase().contains(&needle))
            }
            (Self::AllKeywords, CriterionValue::Keywords(keywords)) => {
                let haystack = format!(
                    "{} {} {}",
                    company.industry_domains.join(" "),
                    company.description.as_deref().unwrap_or_default(),
                    company.investment_thesis.as_deref().unwrap_or_default(),
                )
                .to_lowercase();
                keywords
                    .iter()
                    .all(|k| haystack.contains(&k.to_lowercase()))
            }
            (check, value) => {
                tracing::debug!(?check, ?value, "criterion value has the wrong kind");
                false
            }
        }
    }
}

/// Whether a company satisfies every criterion in the map
pub fn matches(criteria: &CriteriaMap, company: &Company) -> bool {
    criteria.iter().all(|(key, value)| match check_for(key) {
        Some(check) => check.holds(company, value),
        None => true,
    })
}

/// Keep the records that satisfy every criterion, in input order
pub fn evaluate<'a, I>(criteria: &CriteriaMap, records: I) -> Vec<&'a Company>
where
    I: IntoIterator<Item = &'a Company>,
{
    for (key, _) in criteria.iter() {
        if check_for(key).is_none() {
            tracing::warn!(key, "ignoring criterion with no registered check");
        }
    }

    let matched: Vec<&Company> = records
        .into_iter()
        .filter(|company| matches(criteria, company))
        .collect();

    tracing::debug!(criteria = criteria.len(), matched = matched.len(), "evaluated criteria");
    matched
}
