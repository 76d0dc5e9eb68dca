//! Smart router for spoken portfolio questions
//!
//! Classifies an utterance into one portfolio operation by keyword matching
//! and pulls out the few parameters the operations need (field, limit,
//! direction, statistic, count grouping, filter clause).

use crate::aggregate::{CountBy, Statistic};
use crate::assistant::ThesisKind;
use crate::fields::NumericField;
use regex::Regex;
use std::sync::LazyLock;

/// Intent types that can be detected from an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryIntent {
    /// "compare A and B"
    Compare,
    /// Recent articles about a company
    News,
    /// How the fund invests
    InvestmentStyle,
    /// Whether a company is in the portfolio
    Membership,
    /// Deep tech, status or industry counts
    Count,
    /// Average or total of a field
    Statistic,
    /// Top or bottom companies by a field
    Ranking,
    /// Industries covered
    Domains,
    /// Thesis alignment of one company
    Thesis,
    /// Valuation and fundraising of one company
    Valuation,
    /// Short summary or full record of one company
    Summary,
    /// Anything else: company info when a company is named, search otherwise
    General,
}

impl QueryIntent {
    /// Tool that serves this intent
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Compare => "compare_companies",
            Self::News => "get_company_news",
            Self::InvestmentStyle => "get_investment_style",
            Self::Membership => "check_portfolio_company",
            Self::Count => "count_companies",
            Self::Statistic => "calculate_statistic",
            Self::Ranking => "rank_companies",
            Self::Domains => "get_domains",
            Self::Thesis => "check_thesis_alignment",
            Self::Valuation => "get_company_valuation",
            Self::Summary | Self::General => "get_company_info",
        }
    }
}

/// Keywords for intent classification
mod keywords {
    use super::NumericField as F;

    pub const COMPARE: &[&str] = &["compare", "comparison"];

    pub const NEWS: &[&str] = &["news", "headline", "in the press", "articles"];

    pub const STYLE: &[&str] = &[
        "investment style",
        "investing style",
        "how do you invest",
        "how does the fund invest",
        "investment philosophy",
    ];

    pub const MEMBERSHIP: &[&str] = &[
        "in your portfolio",
        "in the portfolio",
        "in our portfolio",
        "do you invest in",
        "did you invest in",
        "portfolio company",
    ];

    pub const COUNT: &[&str] = &["how many", "count", "number of", "breakdown"];

    pub const STATISTIC: &[&str] = &["average", "mean", "total", "sum of", "combined"];

    pub const RANKING: &[&str] = &[
        "top ",
        "rank",
        "highest",
        "lowest",
        "largest",
        "smallest",
        "biggest",
        "most ",
        "least ",
        "best",
        "bottom ",
    ];

    pub const DOMAINS: &[&str] = &[
        "domains",
        "industries",
        "sectors",
        "what areas",
        "which areas",
    ];

    pub const THESIS: &[&str] = &["alignment", "aligned", "align with", "fit the thesis"];

    pub const VALUATION: &[&str] = &["valuation", "valued", "worth", "how much did", "raise"];

    pub const SUMMARY: &[&str] = &[
        "summary",
        "summarize",
        "overview",
        "full info",
        "all details",
        "everything",
    ];

    pub const ASCENDING: &[&str] = &["lowest", "smallest", "least ", "bottom ", "worst"];

    pub const DEEP_TECH: &[&str] = &["deep tech", "deeptech", "deep-tech"];

    pub const STATUS: &[&str] = &["status", "ipo", "exit", "active", "acquired"];

    pub const SUM: &[&str] = &["total", "sum of", "combined"];

    /// Field phrases, more specific phrases first
    pub const FIELDS: &[(&str, F)] = &[
        ("recent raise", F::RecentRaise),
        ("raised", F::RecentRaise),
        ("fundrais", F::RecentRaise),
        ("collaborative fund", F::CollabfundThesis),
        ("collabfund", F::CollabfundThesis),
        ("personal thesis", F::PersonalThesis),
        ("zizo", F::PersonalThesis),
        ("defensib", F::Defensibility),
        ("moat", F::Defensibility),
        ("saturat", F::MarketSaturation),
        ("2022 market", F::MarketSize2022),
        ("market size in 2022", F::MarketSize2022),
        ("2024 market", F::MarketSize2024),
        ("market size in 2024", F::MarketSize2024),
        ("2030 market", F::MarketSize2030),
        ("market size", F::MarketSize2030),
        ("market growth", F::MarketGrowthRate),
        ("growth rate", F::MarketGrowthRate),
        ("decacorn", F::DecacornPotential),
        ("unicorn", F::UnicornPotential),
        ("venture scale", F::VentureScaleProbability),
        ("barrier", F::BarrierDifficulty),
        ("behavior change", F::BehaviorChangeRequirement),
        ("technological complexity", F::TechnologicalComplexity),
        ("technical complexity", F::TechnologicalComplexity),
        ("operational complexity", F::OperationalComplexity),
        ("capital intensi", F::CapitalIntensity),
        ("capital intensive", F::CapitalIntensity),
        ("excit", F::Excitement),
        ("valuation", F::Valuation),
        ("valuable", F::Valuation),
        ("valued", F::Valuation),
        ("worth", F::Valuation),
    ];
}

const NUMBER_WORDS: &[(&str, usize)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

static LIMIT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(?:top|bottom|first|best|worst)\s+(\d+|[a-z]+)\b|\b(\d+)\s+(?:companies|startups|articles|stories)\b").ok()
});

static FILTER_CLAUSE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(?:of|for|among|across|in)\s+(?:the\s+|our\s+|all\s+)?(.+?)[?.!]*$").ok()
});

static MEMBERSHIP_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:is|are|does|do you (?:own|have|invest in)|did you invest in)\s+(.+?)\s*(?:in|part of|a)?\s*(?:your|the|our)\s+portfolio|\binvest(?:ed)?\s+in\s+(.+?)[?.!]*$",
    )
    .ok()
});

/// Filter clauses that only restate the whole portfolio
const WHOLE_PORTFOLIO: &[&str] = &[
    "companies",
    "portfolio",
    "portfolio companies",
    "the companies",
    "all companies",
    "our companies",
];

/// Smart router for query intent classification
#[derive(Debug, Clone, Default)]
pub struct SmartRouter;

impl SmartRouter {
    pub fn new() -> Self {
        Self
    }

    /// Classify the intent of an utterance
    ///
    /// Intents are tried in a fixed priority order; the first whose keywords
    /// appear wins.
    pub fn classify(&self, query: &str) -> QueryIntent {
        let query = query.to_lowercase();

        let ordered: [(&[&str], QueryIntent); 11] = [
            (keywords::COMPARE, QueryIntent::Compare),
            (keywords::NEWS, QueryIntent::News),
            (keywords::STYLE, QueryIntent::InvestmentStyle),
            (keywords::COUNT, QueryIntent::Count),
            (keywords::STATISTIC, QueryIntent::Statistic),
            (keywords::RANKING, QueryIntent::Ranking),
            (keywords::DOMAINS, QueryIntent::Domains),
            (keywords::MEMBERSHIP, QueryIntent::Membership),
            (keywords::THESIS, QueryIntent::Thesis),
            (keywords::VALUATION, QueryIntent::Valuation),
            (keywords::SUMMARY, QueryIntent::Summary),
        ];

        let intent = ordered
            .iter()
            .find(|(words, _)| Self::matches_any(&query, words))
            .map_or(QueryIntent::General, |(_, intent)| *intent);

        tracing::debug!(?intent, "classified utterance");
        intent
    }

    /// Check if query contains any of the keywords
    fn matches_any(query: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| query.contains(kw))
    }

    /// Numeric field named in the utterance
    pub fn detect_field(&self, query: &str) -> Option<NumericField> {
        let query = query.to_lowercase();
        keywords::FIELDS
            .iter()
            .find(|(phrase, _)| query.contains(phrase))
            .map(|(_, field)| *field)
    }

    /// "top 3", "five companies"
    pub fn extract_limit(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        let captures = LIMIT.as_ref()?.captures(&query)?;
        let raw = captures.get(1).or_else(|| captures.get(2))?.as_str();
        raw.parse().ok().or_else(|| {
            NUMBER_WORDS
                .iter()
                .find(|(word, _)| *word == raw)
                .map(|(_, n)| *n)
        })
    }

    /// Whether the utterance asks for the lowest values
    pub fn is_ascending(&self, query: &str) -> bool {
        Self::matches_any(&query.to_lowercase(), keywords::ASCENDING)
    }

    pub fn detect_statistic(&self, query: &str) -> Statistic {
        if Self::matches_any(&query.to_lowercase(), keywords::SUM) {
            Statistic::Sum
        } else {
            Statistic::Average
        }
    }

    pub fn detect_count(&self, query: &str) -> CountBy {
        let query = query.to_lowercase();
        if Self::matches_any(&query, keywords::DEEP_TECH) {
            CountBy::DeepTech
        } else if Self::matches_any(&query, keywords::STATUS) {
            CountBy::Status
        } else {
            CountBy::Industry
        }
    }

    pub fn detect_thesis(&self, query: &str) -> ThesisKind {
        let query = query.to_lowercase();
        if query.contains("collaborative") || query.contains("collabfund") {
            ThesisKind::Collabfund
        } else if query.contains("personal") || query.contains("zizo") {
            ThesisKind::Personal
        } else {
            ThesisKind::Both
        }
    }

    /// The trailing "of/for/among/in ..." clause, used as a filter query
    ///
    /// Clauses that only name the whole portfolio yield `None`.
    pub fn filter_clause(&self, query: &str) -> Option<String> {
        let query = query.to_lowercase();
        let clause = FILTER_CLAUSE
            .as_ref()?
            .captures(&query)?
            .get(1)?
            .as_str()
            .trim()
            .to_string();
        (!clause.is_empty() && !WHOLE_PORTFOLIO.contains(&clause.as_str())).then_some(clause)
    }

    /// Company name in "is X in your portfolio" or "do you invest in X"
    pub fn membership_name(&self, query: &str) -> Option<String> {
        let captures = MEMBERSHIP_NAME.as_ref()?.captures(query.trim())?;
        let name = captures.get(1).or_else(|| captures.get(2))?.as_str();
        let name = name.trim().trim_end_matches(['?', '.', '!']).trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Route an utterance and return everything the agent needs
    pub fn route(&self, query: &str) -> RoutingResult {
        RoutingResult {
            intent: self.classify(query),
            field: self.detect_field(query),
            limit: self.extract_limit(query),
            ascending: self.is_ascending(query),
            filter: self.filter_clause(query),
        }
    }
}

/// Result of routing an utterance
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingResult {
    pub intent: QueryIntent,
    pub field: Option<NumericField>,
    pub limit: Option<usize>,
    pub ascending: bool,
    /// Free-text filter for ranking, statistics and counts
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_detection() {
        let router = SmartRouter::new();

        let cases = [
            ("Compare Orbit Labs and Ledgerly", QueryIntent::Compare),
            ("Any news about Orbit Labs?", QueryIntent::News),
            ("What's your investment style?", QueryIntent::InvestmentStyle),
            ("Is Orbit Labs in your portfolio?", QueryIntent::Membership),
            ("How many deep tech companies are there?", QueryIntent::Count),
            ("What's the average valuation of fintech companies?", QueryIntent::Statistic),
            ("Top 3 companies by excitement", QueryIntent::Ranking),
            ("Which industries do you cover?", QueryIntent::Domains),
            ("How well is Orbit Labs aligned with the thesis?", QueryIntent::Thesis),
            ("What is Ledgerly valued at?", QueryIntent::Valuation),
            ("Give me a summary of Orbit Labs", QueryIntent::Summary),
            ("Tell me about Orbit Labs", QueryIntent::General),
        ];
        for (query, expected) in cases {
            assert_eq!(router.classify(query), expected, "query: {query}");
        }
    }

    #[test]
    fn test_priority_order() {
        let router = SmartRouter::new();
        assert_eq!(
            router.classify("How many companies have a total raise above 10?"),
            QueryIntent::Count
        );
        assert_eq!(
            router.classify("How many companies in the portfolio are deep tech?"),
            QueryIntent::Count
        );
    }

    #[test]
    fn test_field_detection() {
        let router = SmartRouter::new();
        assert_eq!(
            router.detect_field("top companies by recent raise"),
            Some(NumericField::RecentRaise)
        );
        assert_eq!(
            router.detect_field("most exciting startups"),
            Some(NumericField::Excitement)
        );
        assert_eq!(
            router.detect_field("largest 2030 market size"),
            Some(NumericField::MarketSize2030)
        );
        assert_eq!(
            router.detect_field("average collaborative fund thesis score"),
            Some(NumericField::CollabfundThesis)
        );
        assert_eq!(router.detect_field("list them"), None);
    }

    #[test]
    fn test_limit_extraction() {
        let router = SmartRouter::new();
        assert_eq!(router.extract_limit("top 3 companies by valuation"), Some(3));
        assert_eq!(router.extract_limit("Top three by excitement"), Some(3));
        assert_eq!(router.extract_limit("show me 7 companies"), Some(7));
        assert_eq!(router.extract_limit("highest valuation"), None);
    }

    #[test]
    fn test_direction_and_statistic() {
        let router = SmartRouter::new();
        assert!(router.is_ascending("lowest capital intensity"));
        assert!(!router.is_ascending("highest capital intensity"));
        assert_eq!(router.detect_statistic("total valuation"), Statistic::Sum);
        assert_eq!(router.detect_statistic("average excitement"), Statistic::Average);
        assert_eq!(router.detect_count("how many deep tech companies"), CountBy::DeepTech);
        assert_eq!(router.detect_count("how many companies have exited"), CountBy::Status);
        assert_eq!(router.detect_count("how many companies per industry"), CountBy::Industry);
    }

    #[test]
    fn test_filter_clause() {
        let router = SmartRouter::new();
        assert_eq!(
            router.filter_clause("average valuation of deep tech companies?"),
            Some("deep tech companies".to_string())
        );
        assert_eq!(router.filter_clause("average valuation of our portfolio companies"), None);
        assert_eq!(router.filter_clause("average valuation"), None);
    }

    #[test]
    fn test_membership_name() {
        let router = SmartRouter::new();
        assert_eq!(
            router.membership_name("Is Acme Robotics in your portfolio?"),
            Some("Acme Robotics".to_string())
        );
        assert_eq!(
            router.membership_name("do you invest in Ledgerly?"),
            Some("Ledgerly".to_string())
        );
    }

    #[test]
    fn test_route_and_tool_mapping() {
        let router = SmartRouter::new();
        let routed = router.route("Top 2 companies by excitement among climate companies");
        assert_eq!(routed.intent, QueryIntent::Ranking);
        assert_eq!(routed.field, Some(NumericField::Excitement));
        assert_eq!(routed.limit, Some(2));
        assert!(!routed.ascending);
        assert_eq!(routed.filter.as_deref(), Some("climate companies"));
        assert_eq!(routed.intent.tool_name(), "rank_companies");
    }
}
