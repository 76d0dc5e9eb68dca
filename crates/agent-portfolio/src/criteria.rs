//! Criteria extraction from spoken queries
//!
//! [`extract`] turns a short phrase such as `deep tech fintech companies with
//! defensibility score above 7` into a [`CriteriaMap`]. It is a pure function
//! of the query and the industry vocabulary and never fails: text that
//! matches no rule simply contributes nothing, and an empty map matches every
//! company.
//!
//! Extraction runs in two stages:
//!
//! 1. A declarative rule table. Each rule is a field phrase followed by a
//!    comparator (`above`, `below`, `contains "..."`, `after "..."`) and
//!    writes one key.
//! 2. Post-processing that needs the whole query: status priority, thesis
//!    alignment fan-out, industry keywords, the excitement default and the
//!    deep tech flag, applied in that order.

use crate::model::Status;
use crate::store::IndustryVocabulary;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Excitement floor implied by "excited" without an explicit number
pub const DEFAULT_EXCITEMENT_FLOOR: f64 = 7.0;

/// Value of one extracted criterion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Status(Status),
    Keywords(Vec<String>),
}

/// Predicate set extracted from one query, keyed by criterion name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CriteriaMap(BTreeMap<&'static str, CriterionValue>);

impl CriteriaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: CriterionValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&CriterionValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(CriterionValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(CriterionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CriterionValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Capture {
    Number,
    Text,
}

#[derive(Debug)]
struct Rule {
    key: &'static str,
    pattern: Regex,
    capture: Capture,
}

impl Rule {
    /// First capture of the rule's value, trimmed
    fn find<'q>(&self, query: &'q str) -> Option<&'q str> {
        self.pattern
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }
}

/// Accepts spoken forms such as `.5`
const NUMBER: &str = r"(\d*\.?\d+)";
const QUOTED: &str = r#""([^"]+)""#;

fn above(phrase: &str) -> String {
    format!(r"{phrase}\s+(?:above|over|greater than)\s*{NUMBER}")
}

fn below(phrase: &str) -> String {
    format!(r"{phrase}\s+(?:below|under)\s*{NUMBER}")
}

fn contains(phrase: &str) -> String {
    format!(r"{phrase}\s+(?:contains|includes)\s+{QUOTED}")
}

fn after(phrase: &str) -> String {
    format!(r"{phrase}\s+(?:after|since)\s+{QUOTED}")
}

fn before(phrase: &str) -> String {
    format!(r"{phrase}\s+(?:before|until)\s+{QUOTED}")
}

fn rule_specs() -> Vec<(&'static str, String, Capture)> {
    use Capture::{Number, Text};

    vec![
        ("name", format!(r"name\s+(?:is|equals)\s+{QUOTED}"), Text),
        ("url_contains", contains("url"), Text),
        ("description_contains", contains("description"), Text),
        ("investment_thesis_contains", contains("investment thesis"), Text),
        ("min_market_size_2022", above("market size 2022 estimate"), Number),
        ("max_market_size_2022", below("market size 2022 estimate"), Number),
        ("min_market_size_2024", above("market size 2024 estimate"), Number),
        ("max_market_size_2024", below("market size 2024 estimate"), Number),
        ("min_market_size_2030", above("market size 2030 estimate"), Number),
        ("max_market_size_2030", below("market size 2030 estimate"), Number),
        ("min_defensibility_score", above("defensibility score"), Number),
        ("max_market_saturation", below("market saturation"), Number),
        ("defensibility_description_contains", contains("defensibility description"), Text),
        ("defensibility_considerations_contains", contains("defensibility considerations"), Text),
        ("competitor", contains("competitor"), Text),
        (
            "venture_scale_returns_description_contains",
            contains("venture scale returns description"),
            Text,
        ),
        ("venture_scale_returns_risks_contains", contains("venture scale returns risks"), Text),
        ("min_unicorn_potential", above("unicorn potential"), Number),
        ("max_unicorn_potential", below("unicorn potential"), Number),
        ("min_decacorn_potential", above("decacorn potential"), Number),
        ("max_decacorn_potential", below("decacorn potential"), Number),
        ("min_venture_scale_probability", above("venture scale probability"), Number),
        ("max_venture_scale_probability", below("venture scale probability"), Number),
        (
            "min_collabfund_thesis",
            above(r"(?:collaborative fund|collabfund)(?:\s+thesis)?(?:\s+alignment)?"),
            Number,
        ),
        (
            "min_personal_thesis",
            above(r"(?:personal|zizo)(?:\s+thesis)?(?:\s+alignment)?"),
            Number,
        ),
        (
            "collabfund_thesis_description_contains",
            contains("collaborative fund thesis description"),
            Text,
        ),
        ("zizo_thesis_description_contains", contains("personal thesis description"), Text),
        ("min_excitement", above("excitement"), Number),
        ("entry_barriers_contains", contains("entry barriers"), Text),
        ("min_barrier_difficulty", above("barrier difficulty"), Number),
        ("max_barrier_difficulty", below("barrier difficulty"), Number),
        ("min_behavior_change_requirement", above("behavior change requirement"), Number),
        ("max_behavior_change_requirement", below("behavior change requirement"), Number),
        ("min_tech_complexity", above("technological complexity"), Number),
        ("max_tech_complexity", below("technological complexity"), Number),
        ("min_op_complexity", above("operational complexity"), Number),
        ("max_op_complexity", below("operational complexity"), Number),
        ("min_capital_intensity", above("capital intensity"), Number),
        ("max_capital_intensity", below("capital intensity"), Number),
        ("min_recent_raise", above("recent raise"), Number),
        ("max_recent_raise", below("recent raise"), Number),
        ("min_fundraising_announcement_date", after("fundraising announcement date"), Text),
        ("max_fundraising_announcement_date", before("fundraising announcement date"), Text),
        ("fundraising_source_article_contains", contains("fundraising source article"), Text),
        ("fundraising_source_publisher_contains", contains("fundraising source publisher"), Text),
        ("fundraising_source_url_contains", contains("fundraising source url"), Text),
        ("min_fundraising_data_updated", after("fundraising data updated"), Text),
        ("max_fundraising_data_updated", before("fundraising data updated"), Text),
    ]
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rule_specs()
        .into_iter()
        .filter_map(|(key, pattern, capture)| match Regex::new(&pattern) {
            Ok(pattern) => Some(Rule {
                key,
                pattern,
                capture,
            }),
            Err(e) => {
                tracing::error!(key, error = %e, "criteria rule failed to compile");
                None
            }
        })
        .collect()
});

static GENERIC_THESIS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&above("thesis alignment")).ok());

/// Extract a predicate set from a free-text query
pub fn extract(query: &str, vocabulary: &IndustryVocabulary) -> CriteriaMap {
    let query = query.to_lowercase();
    let mut criteria = CriteriaMap::new();

    for rule in RULES.iter() {
        let Some(raw) = rule.find(&query) else {
            continue;
        };
        let value = match rule.capture {
            Capture::Number => match raw.parse::<f64>() {
                Ok(n) => CriterionValue::Number(n),
                Err(_) => continue,
            },
            Capture::Text => CriterionValue::Text(raw.to_string()),
        };
        tracing::debug!(key = rule.key, value = raw, "criteria rule matched");
        criteria.insert(rule.key, value);
    }

    apply_status(&query, &mut criteria);
    apply_thesis_alignment(&query, &mut criteria);
    apply_industry_keywords(&query, vocabulary, &mut criteria);
    apply_excitement_default(&query, &mut criteria);
    apply_deep_tech(&query, &mut criteria);

    criteria
}

fn apply_status(query: &str, criteria: &mut CriteriaMap) {
    let ipo = query.contains("ipo");
    let active = query.contains("active");
    let exit = query.contains("exit");

    let status = if ipo && !active && !exit {
        Some(Status::Ipo)
    } else if exit {
        Some(Status::Exit)
    } else if active {
        Some(Status::Active)
    } else {
        None
    };

    if let Some(status) = status {
        criteria.insert("status", CriterionValue::Status(status));
    }
}

fn apply_thesis_alignment(query: &str, criteria: &mut CriteriaMap) {
    if criteria.contains_key("min_collabfund_thesis") || criteria.contains_key("min_personal_thesis")
    {
        return;
    }

    let floor = GENERIC_THESIS
        .as_ref()
        .and_then(|re| re.captures(query))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    if let Some(floor) = floor {
        criteria.insert("min_collabfund_thesis", CriterionValue::Number(floor));
        criteria.insert("min_personal_thesis", CriterionValue::Number(floor));
    }
}

fn apply_industry_keywords(query: &str, vocabulary: &IndustryVocabulary, criteria: &mut CriteriaMap) {
    let mut keywords: BTreeSet<String> = vocabulary
        .iter()
        .filter(|term| query.contains(term))
        .map(ToString::to_string)
        .collect();

    if query.contains("biotech") {
        keywords.insert("biotech".to_string());
    }

    if !keywords.is_empty() {
        criteria.insert(
            "industry_keywords",
            CriterionValue::Keywords(keywords.into_iter().collect()),
        );
    }
}

fn apply_excitement_default(query: &str, criteria: &mut CriteriaMap) {
    if criteria.contains_key("min_excitement") {
        return;
    }
    if query.contains("excited") || query.contains("excitement") {
        criteria.insert(
            "min_excitement",
            CriterionValue::Number(DEFAULT_EXCITEMENT_FLOOR),
        );
    }
}

fn apply_deep_tech(query: &str, criteria: &mut CriteriaMap) {
    if ["not deep tech", "non deep tech", "non-deep tech"]
        .iter()
        .any(|p| query.contains(p))
    {
        criteria.insert("deep_tech", CriterionValue::Flag(false));
    } else if query.contains("deep tech") {
        criteria.insert("deep_tech", CriterionValue::Flag(true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vocabulary() -> IndustryVocabulary {
        IndustryVocabulary::default()
    }

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(RULES.len(), rule_specs().len());
        assert!(GENERIC_THESIS.is_some());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(extract("", &no_vocabulary()).is_empty());
        assert!(extract("show me something nice", &no_vocabulary()).is_empty());
    }

    #[test]
    fn test_defensibility_threshold() {
        let criteria = extract("defensibility score above 7", &no_vocabulary());
        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria.number("min_defensibility_score"), Some(7.0));
    }

    #[test]
    fn test_generic_thesis_sets_both() {
        let criteria = extract("thesis alignment above 6", &no_vocabulary());
        assert_eq!(criteria.number("min_collabfund_thesis"), Some(6.0));
        assert_eq!(criteria.number("min_personal_thesis"), Some(6.0));
    }

    #[test]
    fn test_specific_thesis_sets_one() {
        let criteria = extract("collabfund thesis alignment above 6", &no_vocabulary());
        assert_eq!(criteria.number("min_collabfund_thesis"), Some(6.0));
        assert!(!criteria.contains_key("min_personal_thesis"));

        let criteria = extract("Zizo thesis over 8", &no_vocabulary());
        assert_eq!(criteria.number("min_personal_thesis"), Some(8.0));
        assert!(!criteria.contains_key("min_collabfund_thesis"));

        let criteria = extract("collaborative fund thesis alignment above 5", &no_vocabulary());
        assert_eq!(criteria.number("min_collabfund_thesis"), Some(5.0));
        assert!(!criteria.contains_key("min_personal_thesis"));
    }

    #[test]
    fn test_status_priority() {
        let criteria = extract("ipo and active companies", &no_vocabulary());
        assert_eq!(
            criteria.get("status"),
            Some(&CriterionValue::Status(Status::Active))
        );

        let criteria = extract("companies that had an IPO", &no_vocabulary());
        assert_eq!(criteria.get("status"), Some(&CriterionValue::Status(Status::Ipo)));

        let criteria = extract("ipo or exit", &no_vocabulary());
        assert_eq!(criteria.get("status"), Some(&CriterionValue::Status(Status::Exit)));
    }

    #[test]
    fn test_quoted_values_keep_inner_text() {
        let criteria = extract(
            r#"Competitor contains "Stripe" and url includes ".io""#,
            &no_vocabulary(),
        );
        assert_eq!(criteria.text("competitor"), Some("stripe"));
        assert_eq!(criteria.text("url_contains"), Some(".io"));
    }

    #[test]
    fn test_rules_fire_independently() {
        let criteria = extract(
            r#"defensibility description contains "moat""#,
            &no_vocabulary(),
        );
        assert_eq!(criteria.text("defensibility_description_contains"), Some("moat"));
        assert_eq!(criteria.text("description_contains"), Some("moat"));

        let criteria = extract(
            r#"fundraising source url contains "techcrunch""#,
            &no_vocabulary(),
        );
        assert_eq!(criteria.text("fundraising_source_url_contains"), Some("techcrunch"));
        assert_eq!(criteria.text("url_contains"), Some("techcrunch"));
    }

    #[test]
    fn test_leading_decimal_point() {
        let criteria = extract("unicorn potential above .5", &no_vocabulary());
        assert_eq!(criteria.number("min_unicorn_potential"), Some(0.5));

        let criteria = extract("capital intensity under 3.25", &no_vocabulary());
        assert_eq!(criteria.number("max_capital_intensity"), Some(3.25));
    }

    #[test]
    fn test_ranges_and_dates() {
        let criteria = extract(
            r#"recent raise above 10 and capital intensity below 4 with fundraising announcement date after "2024""#,
            &no_vocabulary(),
        );
        assert_eq!(criteria.number("min_recent_raise"), Some(10.0));
        assert_eq!(criteria.number("max_capital_intensity"), Some(4.0));
        assert_eq!(criteria.text("min_fundraising_announcement_date"), Some("2024"));
    }

    #[test]
    fn test_industry_keywords_from_vocabulary() {
        let vocabulary: IndustryVocabulary = ["Fintech", "Space", "Climate"].into_iter().collect();
        let criteria = extract("Fintech or climate biotech startups", &vocabulary);
        assert_eq!(
            criteria.get("industry_keywords"),
            Some(&CriterionValue::Keywords(vec![
                "biotech".to_string(),
                "climate".to_string(),
                "fintech".to_string(),
            ]))
        );
    }

    #[test]
    fn test_excitement_default_and_explicit() {
        let criteria = extract("which companies are you excited about", &no_vocabulary());
        assert_eq!(criteria.number("min_excitement"), Some(DEFAULT_EXCITEMENT_FLOOR));

        let criteria = extract("excitement above 8.5", &no_vocabulary());
        assert_eq!(criteria.number("min_excitement"), Some(8.5));
    }

    #[test]
    fn test_deep_tech_flag() {
        let criteria = extract("deep tech companies", &no_vocabulary());
        assert_eq!(criteria.get("deep_tech"), Some(&CriterionValue::Flag(true)));

        let criteria = extract("non-deep tech companies", &no_vocabulary());
        assert_eq!(criteria.get("deep_tech"), Some(&CriterionValue::Flag(false)));

        let criteria = extract("companies that are not deep tech", &no_vocabulary());
        assert_eq!(criteria.get("deep_tech"), Some(&CriterionValue::Flag(false)));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let criteria = extract("deep tech with defensibility score above 7", &no_vocabulary());
        let value = serde_json::to_value(&criteria).unwrap();
        assert_eq!(value["deep_tech"], serde_json::json!(true));
        assert_eq!(value["min_defensibility_score"], serde_json::json!(7.0));
    }
}
