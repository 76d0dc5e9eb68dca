//! Portfolio tools for the voice runtime
//!
//! Each tool wraps one [`PortfolioAssistant`] operation. Tools only fail on
//! parameters that do not deserialize; every other outcome, including "not
//! found", is a sentence returned as a JSON string.

pub mod lookup;
pub mod news;
pub mod ranking;
pub mod stats;

pub use lookup::{
    CheckCompanyTool, CompanyInfoTool, CompareCompaniesTool, DomainsTool, InvestmentStyleTool,
    ThesisAlignmentTool, ValuationTool,
};
pub use news::CompanyNewsTool;
pub use ranking::{RankCompaniesTool, SearchCompaniesTool, TopByValuationTool};
pub use stats::{CalculateStatisticTool, CountCompaniesTool};

use crate::PortfolioAssistant;
use crate::error::PortfolioError;
use agent_tools::{Tool, ToolRegistry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;

/// Register every portfolio tool
pub fn register_all(registry: &ToolRegistry, assistant: &Arc<PortfolioAssistant>) {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(CheckCompanyTool::new(assistant.clone())),
        Arc::new(ThesisAlignmentTool::new(assistant.clone())),
        Arc::new(ValuationTool::new(assistant.clone())),
        Arc::new(TopByValuationTool::new(assistant.clone())),
        Arc::new(DomainsTool::new(assistant.clone())),
        Arc::new(RankCompaniesTool::new(assistant.clone())),
        Arc::new(SearchCompaniesTool::new(assistant.clone())),
        Arc::new(CalculateStatisticTool::new(assistant.clone())),
        Arc::new(CountCompaniesTool::new(assistant.clone())),
        Arc::new(CompanyInfoTool::new(assistant.clone())),
        Arc::new(CompareCompaniesTool::new(assistant.clone())),
        Arc::new(CompanyNewsTool::new(assistant.clone())),
        Arc::new(InvestmentStyleTool::new(assistant.clone())),
    ];

    for tool in tools {
        registry.register(tool);
    }
    tracing::info!(tools = registry.len(), "registered portfolio tools");
}

/// Deserialize tool parameters, treating `null` as an empty object
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> agent_core::Result<T> {
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| PortfolioError::InvalidParameters(e.to_string()).into())
}

/// Accept `"a, b"` as well as `["a", "b"]`
pub(crate) fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Option::<Names>::deserialize(deserializer)? {
        Some(Names::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Names::List(names)) => names,
        None => Vec::new(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::PortfolioConfig;
    use crate::model::Company;
    use crate::store::PortfolioStore;
    use crate::PortfolioAssistant;
    use serde_json::json;
    use std::sync::Arc;

    pub fn assistant() -> Arc<PortfolioAssistant> {
        let companies: Vec<Company> = serde_json::from_value(json!([
            {
                "name": "Orbit Labs",
                "status": "active",
                "industry_domains": ["Space", "Climate"],
                "valuation": 2400,
                "recent_raise": 60,
                "fundraising_announcement_date": "2024-04-02",
                "excitement": 9,
                "deep_tech": true,
                "collabfund_thesis_alignment": {"score": 8, "description": "Planetary data"}
            },
            {
                "name": "Ledgerly",
                "status": "ipo",
                "industry_domains": ["Fintech"],
                "valuation": 800,
                "excitement": 6,
                "deep_tech": false
            }
        ]))
        .expect("fixture companies deserialize");

        Arc::new(PortfolioAssistant::new(
            Arc::new(PortfolioStore::from_companies(companies)),
            Arc::new(PortfolioConfig::default()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Names {
        #[serde(default, deserialize_with = "comma_list")]
        names: Vec<String>,
    }

    #[test]
    fn test_register_all() {
        let registry = ToolRegistry::new();
        register_all(&registry, &fixtures::assistant());

        assert_eq!(registry.len(), 13);
        assert!(registry.get("get_company_news").is_some());
        assert!(registry.get("check_portfolio_company").is_some());
        assert_eq!(registry.definitions().len(), 13);
    }

    #[test]
    fn test_comma_list_forms() {
        let joined: Names = parse_params(json!({"names": "Orbit Labs, Ledgerly ,"})).unwrap();
        assert_eq!(joined.names, vec!["Orbit Labs", "Ledgerly"]);

        let list: Names = parse_params(json!({"names": ["Orbit Labs"]})).unwrap();
        assert_eq!(list.names, vec!["Orbit Labs"]);

        let empty: Names = parse_params(Value::Null).unwrap();
        assert!(empty.names.is_empty());
    }

    #[test]
    fn test_bad_params_are_invalid_parameters() {
        let err = parse_params::<Names>(json!({"names": 42})).unwrap_err();
        assert!(matches!(err, agent_core::Error::InvalidParameters(_)));
    }
}
