//! Public portfolio operations
//!
//! [`PortfolioAssistant`] composes the store, extractor, evaluator, ranking,
//! aggregation and news components into the operations the voice runtime
//! calls. Every operation returns the sentence to speak; failures are turned
//! into their spoken message here and logged, never propagated.

use crate::aggregate::{self, Aggregate, Statistic};
use crate::config::PortfolioConfig;
use crate::criteria::extract;
use crate::dates::{Clock, SystemClock};
use crate::error::{PortfolioError, Result};
use crate::fields::NumericField;
use crate::filter::evaluate;
use crate::format::{format_billions, format_money_adaptive, format_number, number_or_na, text_or_na};
use crate::model::{Company, ThesisAlignment};
use crate::news::{self, NewsQuery, NewsStore};
use crate::ranking::{self, RankRequest};
use crate::store::PortfolioStore;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

const COLLABFUND_STYLE: &str = "Collaborative Fund Investment Style:
1. Dual Impact Mandate: Invest in companies that deliver robust financial returns while generating meaningful social or environmental benefits.
2. Market Disruption & Momentum: Back ventures that not only ride existing trends but actively create new market dynamics through innovative business models.
3. Resilient Business Fundamentals (Villain Test): Choose opportunities compelling enough that even a self-interested investor would back them, ensuring strong market potential.
4. Systemic & Holistic Alignment: Prioritize investments that align with broad societal shifts, integrating business success with civic and systemic impact.";

const PERSONAL_STYLE: &str = "Personal Investment Style:
1. Billion-Person Impact: Look for companies that can meaningfully impact a billion or more people
2. Economic Paradigm Shifts: Seek businesses that create entirely new markets or fundamentally transform existing ones
3. Deep Technical Innovation: Prioritize companies with significant technical differentiation that is difficult to replicate
4. Novel Experiences: Value startups that enable fundamentally new types of interactions or experiences";

/// Phrases asking for the whole record
const FULL_DETAIL_PHRASES: &[&str] = &["full info", "all details", "complete", "everything"];

static COMPARE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"compare\s+(.+?)\s+(?:and|vs\.?)\s+(.+)").ok());

/// Which investment thesis to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThesisKind {
    Collabfund,
    Personal,
    #[default]
    Both,
}

impl ThesisKind {
    /// Anything other than `collabfund` or `personal` means both
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "collabfund" | "collaborative fund" | "collaborative" => Self::Collabfund,
            "personal" | "zizo" => Self::Personal,
            _ => Self::Both,
        }
    }
}

/// Record section a specific-info question asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoSection {
    Defensibility,
    InvestmentThesis,
    CollabfundThesis,
    PersonalThesis,
    Excitement,
    TechnologicalComplexity,
    OperationalComplexity,
    CapitalIntensity,
    BehaviorChangeRequirement,
    Competitors,
    EntryBarriers,
}

impl InfoSection {
    /// First section whose keyword appears in the question, in priority order
    pub fn detect(query: &str) -> Option<Self> {
        const KEYWORDS: &[(&str, InfoSection)] = &[
            ("defensibility", InfoSection::Defensibility),
            ("investment thesis", InfoSection::InvestmentThesis),
            ("collaborative fund", InfoSection::CollabfundThesis),
            ("personal", InfoSection::PersonalThesis),
            ("zizo", InfoSection::PersonalThesis),
            ("excitement", InfoSection::Excitement),
            ("technological complexity", InfoSection::TechnologicalComplexity),
            ("operational complexity", InfoSection::OperationalComplexity),
            ("capital intensity", InfoSection::CapitalIntensity),
            ("behavior change requirement", InfoSection::BehaviorChangeRequirement),
            ("competitor", InfoSection::Competitors),
            ("entry barrier", InfoSection::EntryBarriers),
        ];

        let query = query.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| query.contains(keyword))
            .map(|(_, section)| *section)
    }
}

fn score_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{}/10", format_number(v)))
}

fn capitalize(key: &str) -> String {
    let lower = key.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Indented `Key: value` lines for a nested JSON object
fn format_tree(value: &Value, indent: usize, lines: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };
    let pad = " ".repeat(indent);
    for (key, value) in map {
        if value.is_object() {
            lines.push(format!("{pad}{}:", capitalize(key)));
            format_tree(value, indent + 2, lines);
        } else {
            lines.push(format!("{pad}{}: {}", capitalize(key), scalar_text(value)));
        }
    }
}

fn wants_full_detail(query: &str) -> bool {
    let query = query.to_lowercase();
    FULL_DETAIL_PHRASES.iter().any(|p| query.contains(p))
}

fn raw_status(company: &Company) -> &str {
    company.status.as_deref().unwrap_or("unknown")
}

/// The portfolio operations, answering in speakable text
#[derive(Clone)]
pub struct PortfolioAssistant {
    store: Arc<PortfolioStore>,
    news: NewsStore,
    clock: Arc<dyn Clock>,
    config: Arc<PortfolioConfig>,
}

impl PortfolioAssistant {
    pub fn new(store: Arc<PortfolioStore>, config: Arc<PortfolioConfig>) -> Self {
        Self {
            store,
            news: NewsStore::new(config.news_path.clone()),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Load the dataset named by the configuration
    pub fn from_config(config: PortfolioConfig) -> Result<Self> {
        config.validate()?;
        let store = PortfolioStore::load(&config.data_path)?;
        Ok(Self::new(Arc::new(store), Arc::new(config)))
    }

    /// Replace the clock used for year-less news dates
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &PortfolioStore {
        &self.store
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    fn speak(operation: &str, result: Result<String>) -> String {
        match result {
            Ok(answer) => answer,
            Err(err) => {
                match &err {
                    PortfolioError::NotFound(_) | PortfolioError::MalformedCompareQuery => {
                        tracing::debug!(operation, error = %err, "no answer");
                    }
                    _ => tracing::warn!(operation, error = %err, "operation failed"),
                }
                err.to_string()
            }
        }
    }

    fn filtered(&self, filter_query: Option<&str>) -> Vec<&Company> {
        match filter_query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => evaluate(&extract(query, self.store.vocabulary()), self.store.companies()),
            None => self.store.companies().iter().collect(),
        }
    }

    fn find(&self, name: &str) -> Result<&Company> {
        self.store
            .find(name)
            .ok_or_else(|| PortfolioError::not_found(format!("Could not find {} in our portfolio.", name.trim())))
    }

    /// Describe one or both investment styles
    pub fn investment_style(&self, style: &str) -> String {
        match ThesisKind::parse(style) {
            ThesisKind::Collabfund => COLLABFUND_STYLE.to_string(),
            ThesisKind::Personal => PERSONAL_STYLE.to_string(),
            ThesisKind::Both => format!("{COLLABFUND_STYLE}\n\n{PERSONAL_STYLE}"),
        }
    }

    /// Whether a company is in the portfolio
    pub fn check_company(&self, name: &str) -> String {
        match self.store.find(name) {
            Some(company) => format!(
                "Yes, {} is in our portfolio. Would you like to know more about them?",
                company.name
            ),
            None => format!(
                "No, {} is not currently in our portfolio. Would you like to see some similar companies we do invest in?",
                name.trim()
            ),
        }
    }

    /// Thesis alignment score and analysis
    pub fn thesis_alignment(&self, name: &str, kind: ThesisKind) -> String {
        Self::speak("thesis_alignment", self.try_thesis_alignment(name, kind))
    }

    fn try_thesis_alignment(&self, name: &str, kind: ThesisKind) -> Result<String> {
        let company = self.find(name)?;
        let parts = |alignment: Option<&ThesisAlignment>| {
            let score = score_or_na(alignment.and_then(|a| a.score));
            let analysis = text_or_na(alignment.and_then(|a| a.description.as_deref())).to_string();
            (score, analysis)
        };
        let (cf_score, cf_analysis) = parts(company.collabfund_thesis_alignment.as_ref());
        let (p_score, p_analysis) = parts(company.zizo_thesis_alignment.as_ref());

        Ok(match kind {
            ThesisKind::Collabfund => format!(
                "Collaborative Thesis Alignment for {}:\nScore: {cf_score}\nAnalysis: {cf_analysis}",
                company.name
            ),
            ThesisKind::Personal => format!(
                "Personal Thesis Alignment for {}:\nScore: {p_score}\nAnalysis: {p_analysis}",
                company.name
            ),
            ThesisKind::Both => format!(
                "Thesis Alignment for {}:\n\nCollaborative Fund Thesis:\nScore: {cf_score}\n{cf_analysis}\n\nPersonal Thesis:\nScore: {p_score}\n{p_analysis}",
                company.name
            ),
        })
    }

    /// Valuation and latest fundraising in one spoken paragraph
    pub fn valuation_summary(&self, name: &str) -> String {
        let Some(company) = self.store.find(name) else {
            return format!("Sorry, I couldn't find valuation details for {}.", name.trim());
        };

        let mut response = vec![format!("Here's what I know about {}:", company.name)];
        if let Some(valuation) = company.valuation {
            response.push(format!(
                "Current valuation: about {}.",
                format_money_adaptive(valuation)
            ));
        }
        match (company.recent_raise, company.fundraising_announcement_date.as_deref()) {
            (Some(raise), Some(date)) => response.push(format!(
                "They recently raised around ${} million on {date}.",
                format_number(raise)
            )),
            (Some(raise), None) => response.push(format!(
                "They recently raised around ${} million.",
                format_number(raise)
            )),
            (None, Some(date)) => response.push(format!("The last fundraising date was {date}.")),
            (None, None) => {}
        }
        if let Some(article) = &company.fundraising_source_article {
            response.push(format!("You can read more about it here: {article}"));
        }
        if let Some(updated) = &company.fundraising_data_updated {
            let day: String = updated.chars().take(10).collect();
            response.push(format!("Data updated as of {day}."));
        }
        response.join(" ")
    }

    /// Highest valuations first, spoken in billions
    pub fn top_by_valuation(&self, limit: Option<usize>) -> String {
        let limit = limit.unwrap_or(self.config.default_limit);
        let valued = self
            .store
            .companies()
            .iter()
            .filter(|c| c.valuation.is_some_and(|v| v > 0.0));
        let mut ranked = ranking::order_by(valued, NumericField::Valuation, false);
        if ranked.is_empty() {
            return "I couldn't find any companies with known valuations.".to_string();
        }
        ranked.truncate(limit);

        let mut lines = vec![format!("Here are the top {} companies by valuation:", ranked.len())];
        for entry in &ranked {
            let as_of = entry
                .company
                .fundraising_data_updated
                .as_deref()
                .map_or_else(|| "an unknown date".to_string(), |d| d.chars().take(10).collect());
            lines.push(format!(
                "- {}: approximately {} (as of {as_of}).",
                entry.company.name,
                format_billions(entry.value.unwrap_or_default())
            ));
        }
        lines.join("\n")
    }

    /// Every industry label in the portfolio
    pub fn domains(&self) -> String {
        let mut lines = vec!["The portfolio covers these domains:".to_string()];
        lines.extend(self.store.domains().into_iter().map(|d| format!("- {d}")));
        lines.join("\n")
    }

    /// Rank companies by a named field
    pub fn rank(&self, request: &RankRequest) -> String {
        Self::speak("rank", self.try_rank(request))
    }

    fn try_rank(&self, request: &RankRequest) -> Result<String> {
        let ranked = ranking::rank(self.store.companies(), request, self.store.vocabulary())?;
        let field = NumericField::resolve(&request.field)?;

        let mut lines = vec![format!("Top {} companies by {}:", ranked.len(), field.name())];
        lines.extend(
            ranked
                .iter()
                .map(|r| format!("- {}: {}", r.company.name, number_or_na(r.value))),
        );
        Ok(lines.join("\n"))
    }

    /// Companies matching a free-text description
    pub fn search(&self, query: &str) -> String {
        let mut matching = self.filtered(Some(query));

        let lower = query.to_lowercase();
        if lower.contains("recent_fundraising") || lower.contains("recent fundraising") {
            matching.retain(|c| c.fundraising_announcement_date.is_some() && c.recent_raise.is_some());
        }

        if matching.is_empty() {
            return "I couldn't find any companies matching that description.".to_string();
        }

        let mut lines = vec!["Here are the matching companies:".to_string()];
        for company in matching {
            let mut parts = vec![format!("- {}", company.name)];
            if let Some(raise) = company.recent_raise {
                parts.push(format!("raised ${}M", format_number(raise)));
                if let Some(date) = &company.fundraising_announcement_date {
                    parts.push(format!("on {date}"));
                }
            }
            if let Some(valuation) = company.valuation {
                parts.push(format!("at a ${:.1}B valuation", valuation / 1000.0));
            }
            if !company.industry_domains.is_empty() {
                parts.push(format!("operating in {}", company.industry_domains.join(", ")));
            }
            lines.push(parts.join(" "));
        }
        lines.join("\n")
    }

    /// Average, total or count of a field over filtered companies
    pub fn statistic(&self, statistic: Statistic, field: &str, filter_query: Option<&str>) -> String {
        Self::speak("statistic", self.try_statistic(statistic, field, filter_query))
    }

    fn try_statistic(
        &self,
        statistic: Statistic,
        field: &str,
        filter_query: Option<&str>,
    ) -> Result<String> {
        let field = NumericField::resolve(field)?;
        let companies = self.filtered(filter_query);
        if companies.is_empty() {
            return Err(PortfolioError::not_found("No companies found matching the criteria."));
        }

        let Aggregate::Value(value) = aggregate::aggregate(companies, field, statistic) else {
            return Err(PortfolioError::not_found(format!(
                "No {} data available.",
                field.topic()
            )));
        };

        let unit = field.unit();
        let approx = if unit.is_money() { "approximately " } else { "" };
        Ok(match statistic {
            Statistic::Average => format!(
                "The average {} is {approx}{}.",
                field.label(),
                unit.render(value)
            ),
            Statistic::Sum => format!(
                "The total {} of the selected companies is {approx}{}.",
                field.label(),
                unit.render(value)
            ),
            Statistic::Count => format!(
                "{} of the selected companies have {} data.",
                format_number(value),
                field.topic()
            ),
        })
    }

    pub fn count_deep_tech(&self, filter_query: Option<&str>) -> String {
        let count = aggregate::count_deep_tech(self.filtered(filter_query));
        format!("There are {count} deep tech companies.")
    }

    pub fn count_by_status(&self, filter_query: Option<&str>) -> String {
        let counts = aggregate::count_by_status(self.filtered(filter_query));
        format!(
            "Status breakdown: Active: {}, IPO: {}, Exit: {}.",
            counts.active, counts.ipo, counts.exit
        )
    }

    pub fn count_by_industry(&self, filter_query: Option<&str>) -> String {
        let counts = aggregate::count_by_industry(self.filtered(filter_query));
        let mut lines = vec!["Companies by industry:".to_string()];
        lines.extend(
            counts
                .iter()
                .map(|(domain, count)| format!("- {}: {count}", capitalize(domain))),
        );
        lines.join("\n")
    }

    /// The whole stored record as JSON
    pub fn full_info(&self, name: &str) -> String {
        Self::speak("full_info", self.try_full_info(name))
    }

    fn try_full_info(&self, name: &str) -> Result<String> {
        let (company, record) = self.store.find_record(name).ok_or_else(|| {
            PortfolioError::not_found(format!(
                "I'm sorry, I couldn't find a company matching '{}'.",
                name.trim()
            ))
        })?;
        let dump = serde_json::to_string_pretty(record)?;
        Ok(format!("Full information for {}:\n{dump}", company.name))
    }

    /// Short summary, or the full record when the question asks for everything
    pub fn summary_info(&self, query: &str) -> String {
        let Some(company) = self.store.find_in_query(query) else {
            return "I'm sorry, I couldn't identify the company you're referring to.".to_string();
        };
        if wants_full_detail(query) {
            return self.full_info(&company.name);
        }

        let valuation = company
            .valuation
            .map_or_else(|| "N/A".to_string(), |v| format!("approximately {}", format_billions(v)));
        format!(
            "Summary for {}:\nDescription: {}\nStatus: {}\nIndustries: {}\nValuation: {valuation}\nDefensibility Score: {}\nExcitement: {}\n",
            company.name,
            text_or_na(company.description.as_deref()),
            text_or_na(company.status.as_deref()),
            company.industry_domains.join(", "),
            number_or_na(NumericField::Defensibility.value(company)),
            score_or_na(company.excitement),
        )
    }

    /// One section of a record, or a summary of every field
    pub fn specific_info(&self, query: &str) -> String {
        let Some(company) = self.store.find_in_query(query) else {
            return "I'm sorry, I couldn't identify which company you're referring to.".to_string();
        };
        if wants_full_detail(query) {
            return self.full_info(&company.name);
        }

        let name = &company.name;
        match InfoSection::detect(query) {
            Some(InfoSection::Defensibility) => {
                let Some(d) = company.defensibility() else {
                    return format!("I'm sorry, I don't have defensibility information for {name}.");
                };
                let mut out = format!(
                    "Defensibility for {name}:\nScore: {}\nDescription: {}\nConsiderations: {}\n",
                    number_or_na(d.defensibility_score),
                    text_or_na(d.description.as_deref()),
                    text_or_na(d.considerations.as_deref()),
                );
                if !d.competitors.is_empty() {
                    out.push_str(&format!("Competitors: {}", d.competitors.join(", ")));
                }
                out
            }
            Some(InfoSection::InvestmentThesis) => format!(
                "Investment Thesis for {name}:\n{}",
                text_or_na(company.investment_thesis.as_deref())
            ),
            Some(InfoSection::CollabfundThesis) => match &company.collabfund_thesis_alignment {
                Some(t) => format!(
                    "Collaborative Fund Thesis Alignment for {name}:\nScore: {}\nDescription: {}",
                    score_or_na(t.score),
                    text_or_na(t.description.as_deref())
                ),
                None => format!(
                    "I'm sorry, I don't have Collaborative Fund thesis alignment info for {name}."
                ),
            },
            Some(InfoSection::PersonalThesis) => match &company.zizo_thesis_alignment {
                Some(t) => format!(
                    "Personal Thesis Alignment for {name}:\nScore: {}\nDescription: {}",
                    score_or_na(t.score),
                    text_or_na(t.description.as_deref())
                ),
                None => format!("I'm sorry, I don't have personal thesis alignment info for {name}."),
            },
            Some(InfoSection::Excitement) => {
                format!("Excitement for {name}: {}", score_or_na(company.excitement))
            }
            Some(InfoSection::TechnologicalComplexity) => format!(
                "Technological Complexity for {name}: {}",
                score_or_na(company.technological_complexity)
            ),
            Some(InfoSection::OperationalComplexity) => format!(
                "Operational Complexity for {name}: {}",
                score_or_na(company.operational_complexity)
            ),
            Some(InfoSection::CapitalIntensity) => format!(
                "Capital Intensity for {name}: {}",
                score_or_na(company.capital_intensity)
            ),
            Some(InfoSection::BehaviorChangeRequirement) => format!(
                "Behavior Change Requirement for {name}: {}",
                score_or_na(company.behavior_change_requirement)
            ),
            Some(InfoSection::Competitors) => {
                let competitors = company.competitors();
                if competitors.is_empty() {
                    format!("I'm sorry, there is no competitor information for {name}.")
                } else {
                    format!("Competitors for {name}: {}", competitors.join(", "))
                }
            }
            Some(InfoSection::EntryBarriers) => format!(
                "Entry Barriers for {name}: {}",
                text_or_na(company.entry_barriers.as_deref())
            ),
            None => Self::complete_summary(company),
        }
    }

    fn complete_summary(company: &Company) -> String {
        let thesis = |t: Option<&ThesisAlignment>| {
            format!(
                "Score {} - {}",
                number_or_na(t.and_then(|t| t.score)),
                text_or_na(t.and_then(|t| t.description.as_deref()))
            )
        };

        let mut lines = vec![
            format!("Summary for {}:", company.name),
            format!("Name: {}", company.name),
            format!("URL: {}", text_or_na(company.url.as_deref())),
            format!("Description: {}", text_or_na(company.description.as_deref())),
            format!("Status: {}", text_or_na(company.status.as_deref())),
            format!(
                "Investment Thesis: {}",
                text_or_na(company.investment_thesis.as_deref())
            ),
            "Notes:".to_string(),
        ];
        if let Some(notes) = &company.notes {
            if let Ok(tree) = serde_json::to_value(notes) {
                format_tree(&tree, 2, &mut lines);
            }
        }
        lines.extend([
            format!("Industry Domains: {}", company.industry_domains.join(", ")),
            format!("Unicorn Potential: {}", number_or_na(company.unicorn_potential)),
            format!("Decacorn Potential: {}", number_or_na(company.decacorn_potential)),
            format!(
                "Venture Scale Probability: {}",
                number_or_na(company.venture_scale_probability)
            ),
            format!(
                "Collaborative Fund Thesis Alignment: {}",
                thesis(company.collabfund_thesis_alignment.as_ref())
            ),
            format!(
                "Personal Thesis Alignment: {}",
                thesis(company.zizo_thesis_alignment.as_ref())
            ),
            format!("Excitement: {}", score_or_na(company.excitement)),
            format!("Entry Barriers: {}", text_or_na(company.entry_barriers.as_deref())),
            format!("Barrier Difficulty: {}", score_or_na(company.barrier_difficulty)),
            format!(
                "Behavior Change Requirement: {}",
                score_or_na(company.behavior_change_requirement)
            ),
            format!(
                "Technological Complexity: {}",
                score_or_na(company.technological_complexity)
            ),
            format!(
                "Operational Complexity: {}",
                score_or_na(company.operational_complexity)
            ),
            format!("Capital Intensity: {}", score_or_na(company.capital_intensity)),
            format!(
                "Deep Tech: {}",
                company.deep_tech.map_or("N/A", |d| if d { "Yes" } else { "No" })
            ),
            format!(
                "Recent Raise: {}",
                company
                    .recent_raise
                    .map_or_else(|| "N/A".to_string(), |r| format!("{} million", format_number(r)))
            ),
            format!(
                "Valuation: {}",
                company.valuation.map_or_else(|| "N/A".to_string(), format_money_adaptive)
            ),
            format!(
                "Fundraising Announcement Date: {}",
                text_or_na(company.fundraising_announcement_date.as_deref())
            ),
            format!(
                "Fundraising Source Article: {}",
                text_or_na(company.fundraising_source_article.as_deref())
            ),
            format!(
                "Fundraising Source Publisher: {}",
                text_or_na(company.fundraising_source_publisher.as_deref())
            ),
            format!(
                "Fundraising Source URL: {}",
                text_or_na(company.fundraising_source_url.as_deref())
            ),
            format!(
                "Fundraising Data Updated: {}",
                text_or_na(company.fundraising_data_updated.as_deref())
            ),
        ]);
        lines.join("\n")
    }

    /// Answer a general question about a company named in the query
    pub fn company_info(&self, query: &str) -> String {
        let Some(company) = self.store.find_in_query(query) else {
            return "I'm sorry, I couldn't identify which company you're asking about.".to_string();
        };
        let name = &company.name;
        let lower = query.to_lowercase();

        if lower.contains("note") {
            let mut lines = vec![format!("Here are the notes for {name}:")];
            if let Some(tree) = company.notes.as_ref().and_then(|n| serde_json::to_value(n).ok()) {
                format_tree(&tree, 0, &mut lines);
            }
            return lines.join("\n");
        }
        if lower.contains("valuation") {
            return self.valuation_summary(name);
        }
        if lower.contains("thesis") {
            return format!(
                "The investment thesis for {name} is as follows: {}",
                company
                    .investment_thesis
                    .as_deref()
                    .unwrap_or("No thesis available")
            );
        }
        if lower.contains("compare") {
            return format!(
                "Would you like me to compare {name} with another company? Please specify the other company."
            );
        }

        let mut response = vec![format!("Here's some information about {name}:")];
        if let Some(description) = company.description.as_deref().filter(|d| !d.is_empty()) {
            response.push(description.to_string());
        }
        response.push(format!("Status: {}.", raw_status(company)));
        response.push(format!("Industries: {}.", company.industry_domains.join(", ")));
        if let Some(valuation) = company.valuation {
            response.push(format!(
                "It is currently valued at approximately {}.",
                format_billions(valuation)
            ));
        }
        response.join(" ")
    }

    /// Side-by-side comparison from "compare A and B" or "compare A vs B"
    pub fn compare(&self, query: &str) -> String {
        Self::speak("compare", self.try_compare(query))
    }

    fn try_compare(&self, query: &str) -> Result<String> {
        let lower = query.to_lowercase();
        let captures = COMPARE_PATTERN
            .as_ref()
            .and_then(|re| re.captures(&lower))
            .ok_or(PortfolioError::MalformedCompareQuery)?;
        let clean = |i: usize| {
            captures
                .get(i)
                .map(|m| m.as_str().trim().trim_end_matches(['?', '.', '!']).trim().to_string())
                .unwrap_or_default()
        };
        let (first, second) = (clean(1), clean(2));

        let a = self.store.find(&first);
        let b = self.store.find(&second);
        let (Some(a), Some(b)) = (a, b) else {
            let missing: Vec<&str> = [(a, &first), (b, &second)]
                .into_iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| name.as_str())
                .collect();
            return Err(PortfolioError::not_found(format!(
                "I couldn't find the following company(ies): {}.",
                missing.join(", ")
            )));
        };

        let block = |c: &Company| {
            let valuation = c
                .valuation
                .map_or_else(|| "unknown".to_string(), |v| format!("about {}", format_billions(v)));
            format!(
                "{}:\n  Valuation: {valuation}\n  Status: {}\n  Domains: {}\n  Deep Tech: {}",
                c.name,
                raw_status(c),
                c.industry_domains.join(", "),
                if c.deep_tech == Some(true) { "Yes" } else { "No" }
            )
        };

        Ok(format!(
            "Here's how the two companies compare:\n{}\n\n{}",
            block(a),
            block(b)
        ))
    }

    /// Recent news for a company
    pub fn news(&self, query: &NewsQuery) -> String {
        Self::speak("news", self.try_news(query))
    }

    fn try_news(&self, query: &NewsQuery) -> Result<String> {
        let articles = self.news.articles_for(query, self.clock.now())?;
        Ok(news::render(&query.company, &articles, query.brief))
    }
}

impl std::fmt::Debug for PortfolioAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioAssistant")
            .field("companies", &self.store.len())
            .field("news", &self.news.path())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::FixedClock;
    use crate::model::{Defensibility, Notes};
    use crate::ranking::DateWindow;
    use std::io::Write;

    fn company(name: &str) -> Company {
        Company {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn portfolio() -> Vec<Company> {
        let mut orbit = company("Orbit Labs");
        orbit.status = Some("active".to_string());
        orbit.description = Some("Satellite data for farmers".to_string());
        orbit.industry_domains = vec!["Space".to_string(), "Agtech".to_string()];
        orbit.valuation = Some(1500.0);
        orbit.recent_raise = Some(40.0);
        orbit.fundraising_announcement_date = Some("March 5, 2024".to_string());
        orbit.fundraising_data_updated = Some("2024-06-01T12:00:00".to_string());
        orbit.excitement = Some(9.0);
        orbit.deep_tech = Some(true);
        orbit.collabfund_thesis_alignment = Some(ThesisAlignment {
            score: Some(8.0),
            description: Some("Climate resilience at scale".to_string()),
        });
        orbit.notes = Some(Notes {
            defensibility: Some(Defensibility {
                defensibility_score: Some(7.0),
                competitors: vec!["Planet".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut ledger = company("Ledgerly");
        ledger.status = Some("ipo".to_string());
        ledger.industry_domains = vec!["Fintech".to_string()];
        ledger.valuation = Some(120.0);
        ledger.excitement = Some(4.0);

        let mut quiet = company("Quiet Co");
        quiet.status = Some("exit".to_string());

        vec![orbit, ledger, quiet]
    }

    fn assistant() -> PortfolioAssistant {
        PortfolioAssistant::new(
            Arc::new(PortfolioStore::from_companies(portfolio())),
            Arc::new(PortfolioConfig::default()),
        )
    }

    #[test]
    fn test_check_company() {
        let a = assistant();
        assert_eq!(
            a.check_company("orbit"),
            "Yes, Orbit Labs is in our portfolio. Would you like to know more about them?"
        );
        assert!(a.check_company("Acme").starts_with("No, Acme is not currently in our portfolio."));
    }

    #[test]
    fn test_investment_style() {
        let a = assistant();
        assert!(a.investment_style("collabfund").starts_with("Collaborative Fund Investment Style:"));
        assert!(a.investment_style("PERSONAL").starts_with("Personal Investment Style:"));
        let both = a.investment_style("both");
        assert!(both.contains("Dual Impact Mandate"));
        assert!(both.contains("Billion-Person Impact"));
    }

    #[test]
    fn test_thesis_alignment_handles_missing_object() {
        let a = assistant();
        let answer = a.thesis_alignment("orbit", ThesisKind::Both);
        assert!(answer.contains("Collaborative Fund Thesis:\nScore: 8/10\nClimate resilience at scale"));
        assert!(answer.contains("Personal Thesis:\nScore: N/A\nN/A"));

        assert_eq!(
            a.thesis_alignment("Acme", ThesisKind::Collabfund),
            "Could not find Acme in our portfolio."
        );
    }

    #[test]
    fn test_valuation_summary() {
        let a = assistant();
        assert_eq!(
            a.valuation_summary("orbit"),
            "Here's what I know about Orbit Labs: Current valuation: about $1.5 billion. \
             They recently raised around $40 million on March 5, 2024. Data updated as of 2024-06-01."
        );
        assert_eq!(
            a.valuation_summary("ledger"),
            "Here's what I know about Ledgerly: Current valuation: about $0.1 billion."
        );
        assert_eq!(
            a.valuation_summary("Acme"),
            "Sorry, I couldn't find valuation details for Acme."
        );
    }

    #[test]
    fn test_top_by_valuation() {
        let a = assistant();
        assert_eq!(
            a.top_by_valuation(Some(1)),
            "Here are the top 1 companies by valuation:\n- Orbit Labs: approximately $1.5 billion (as of 2024-06-01)."
        );
        let all = a.top_by_valuation(None);
        assert!(all.contains("- Ledgerly: approximately $0.1 billion (as of an unknown date)."));
        assert!(!all.contains("Quiet Co"));
    }

    #[test]
    fn test_top_by_valuation_skips_zero_valuations() {
        let mut companies = portfolio();
        let mut stealth = company("Stealth Co");
        stealth.valuation = Some(0.0);
        companies.push(stealth);
        let a = PortfolioAssistant::new(
            Arc::new(PortfolioStore::from_companies(companies)),
            Arc::new(PortfolioConfig::default()),
        );

        let all = a.top_by_valuation(None);
        assert!(all.starts_with("Here are the top 2 companies by valuation:"));
        assert!(!all.contains("Stealth Co"));
    }

    #[test]
    fn test_domains() {
        assert_eq!(
            assistant().domains(),
            "The portfolio covers these domains:\n- Agtech\n- Fintech\n- Space"
        );
    }

    #[test]
    fn test_rank_and_unknown_field() {
        let a = assistant();
        assert_eq!(
            a.rank(&RankRequest::new("excitement").limit(3)),
            "Top 3 companies by excitement:\n- Orbit Labs: 9\n- Ledgerly: 4\n- Quiet Co: N/A"
        );
        assert!(a
            .rank(&RankRequest::new("nonexistent_field"))
            .starts_with("The field 'nonexistent_field' is not supported. Please choose one of:"));

        let window = DateWindow::new(Some("2024-01-01".to_string()), None);
        assert_eq!(
            a.rank(&RankRequest::new("recent_raise").window(window)),
            "Top 1 companies by recent_raise:\n- Orbit Labs: 40"
        );
    }

    #[test]
    fn test_search() {
        let a = assistant();
        assert_eq!(
            a.search("deep tech space companies"),
            "Here are the matching companies:\n- Orbit Labs raised $40M on March 5, 2024 at a $1.5B valuation operating in Space, Agtech"
        );
        assert_eq!(
            a.search("excitement above 9.5"),
            "I couldn't find any companies matching that description."
        );
        let recent = a.search("recent_fundraising");
        assert!(recent.contains("Orbit Labs"));
        assert!(!recent.contains("Ledgerly"));
    }

    #[test]
    fn test_statistics() {
        let a = assistant();
        assert_eq!(
            a.statistic(Statistic::Average, "excitement", None),
            "The average excitement score is 6.50/10."
        );
        assert_eq!(
            a.statistic(Statistic::Sum, "valuation", None),
            "The total valuation of the selected companies is approximately $1.62 billion."
        );
        assert_eq!(
            a.statistic(Statistic::Average, "recent_raise", Some("fintech")),
            "No recent raise data available."
        );
        assert_eq!(
            a.statistic(Statistic::Average, "valuation", Some("excitement above 9.5")),
            "No companies found matching the criteria."
        );
        assert_eq!(
            a.statistic(Statistic::Count, "valuation", None),
            "2 of the selected companies have valuation data."
        );
        assert!(a
            .statistic(Statistic::Average, "popularity", None)
            .starts_with("The field 'popularity' is not supported."));
    }

    #[test]
    fn test_counts() {
        let a = assistant();
        assert_eq!(a.count_deep_tech(None), "There are 1 deep tech companies.");
        assert_eq!(
            a.count_by_status(None),
            "Status breakdown: Active: 1, IPO: 1, Exit: 1."
        );
        assert_eq!(
            a.count_by_industry(None),
            "Companies by industry:\n- Agtech: 1\n- Fintech: 1\n- Space: 1"
        );
    }

    #[test]
    fn test_info_modes() {
        let a = assistant();

        let full = a.full_info("orbit");
        assert!(full.starts_with("Full information for Orbit Labs:\n{"));
        assert!(full.contains("\"valuation\": 1500.0"));
        assert_eq!(
            a.full_info("Acme"),
            "I'm sorry, I couldn't find a company matching 'Acme'."
        );

        let summary = a.summary_info("Give me a summary of Orbit Labs");
        assert!(summary.contains("Valuation: approximately $1.5 billion"));
        assert!(summary.contains("Defensibility Score: 7"));
        assert!(a.summary_info("Tell me everything about Orbit Labs").starts_with("Full information"));

        assert_eq!(
            a.specific_info("What are the competitors of Orbit Labs?"),
            "Competitors for Orbit Labs: Planet"
        );
        assert_eq!(
            a.specific_info("How exciting is ledgerly? excitement please"),
            "Excitement for Ledgerly: 4/10"
        );
        assert_eq!(
            a.specific_info("personal thesis for Quiet Co"),
            "I'm sorry, I don't have personal thesis alignment info for Quiet Co."
        );
        let complete = a.specific_info("Tell me about Orbit Labs");
        assert!(complete.contains("Notes:\n  Defensibility:\n    Defensibility_score: 7"));
        assert!(complete.contains("Deep Tech: Yes"));

        assert_eq!(
            a.company_info("what is Ledgerly"),
            "Here's some information about Ledgerly: Status: ipo. Industries: Fintech. It is currently valued at approximately $0.1 billion."
        );
        assert!(a.company_info("Orbit Labs valuation").starts_with("Here's what I know about Orbit Labs:"));
        assert_eq!(
            a.company_info("who?"),
            "I'm sorry, I couldn't identify which company you're asking about."
        );
    }

    #[test]
    fn test_compare() {
        let a = assistant();
        assert_eq!(
            a.compare("Compare Orbit vs. Ledgerly?"),
            "Here's how the two companies compare:\n\
             Orbit Labs:\n  Valuation: about $1.5 billion\n  Status: active\n  Domains: Space, Agtech\n  Deep Tech: Yes\n\n\
             Ledgerly:\n  Valuation: about $0.1 billion\n  Status: ipo\n  Domains: Fintech\n  Deep Tech: No"
        );
        assert_eq!(
            a.compare("orbit and ledgerly"),
            "I'm sorry, I couldn't extract two companies to compare from your query."
        );
        assert_eq!(
            a.compare("compare Acme and Zeta"),
            "I couldn't find the following company(ies): acme, zeta."
        );
    }

    #[test]
    fn test_news_uses_clock() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Orbit Labs": {{"articles": [{{"title": "Year end", "source": "Wired", "link": "https://w.example", "time": "Dec 31"}}]}}}}"#
        )
        .unwrap();

        let config = PortfolioConfig::builder().news_path(file.path()).build().unwrap();
        let clock = FixedClock::end_of_day("2025-01-05").unwrap();
        let a = PortfolioAssistant::new(
            Arc::new(PortfolioStore::from_companies(portfolio())),
            Arc::new(config),
        )
        .with_clock(Arc::new(clock));

        let query = NewsQuery {
            start: Some("2024-12-01".to_string()),
            end: Some("2024-12-31".to_string()),
            ..NewsQuery::new("Orbit")
        };
        assert_eq!(
            a.news(&query),
            "News articles for Orbit:\n- Year end (Wired, Dec 31): https://w.example"
        );
    }
}
