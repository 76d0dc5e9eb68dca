//! Tools that list several companies: rankings and free-text search

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{comma_list, parse_params};
use crate::assistant::PortfolioAssistant;
use crate::ranking::{DateWindow, RankRequest};

#[derive(Debug, Deserialize)]
struct TopParams {
    #[serde(default)]
    limit: Option<usize>,
}

/// Highest valuations
pub struct TopByValuationTool {
    assistant: Arc<PortfolioAssistant>,
}

impl TopByValuationTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for TopByValuationTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: TopParams = parse_params(params)?;
        Ok(json!(self.assistant.top_by_valuation(params.limit)))
    }

    fn name(&self) -> &str {
        "get_companies_by_valuation"
    }

    fn description(&self) -> &str {
        "List the portfolio companies with the highest valuations."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "How many companies to return",
                    "default": 5
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct RankParams {
    #[serde(alias = "field")]
    ranking_field: String,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    filter_query: String,
    #[serde(default)]
    ascending: bool,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "comma_list")]
    fixed_list: Vec<String>,
}

/// Rank companies by any numeric field
pub struct RankCompaniesTool {
    assistant: Arc<PortfolioAssistant>,
}

impl RankCompaniesTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for RankCompaniesTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: RankParams = parse_params(params)?;
        let limit = params
            .limit
            .unwrap_or(self.assistant.config().default_limit);

        let request = RankRequest::new(params.ranking_field)
            .limit(limit)
            .ascending(params.ascending)
            .filter_query(params.filter_query)
            .fixed_list(params.fixed_list)
            .window(DateWindow::new(params.start_date, params.end_date));

        Ok(json!(self.assistant.rank(&request)))
    }

    fn name(&self) -> &str {
        "rank_companies"
    }

    fn description(&self) -> &str {
        "Rank portfolio companies by a numeric field such as valuation, recent_raise, excitement, \
         defensibility or market_size_2030. Companies without a value are listed last. \
         When ranking by recent_raise, start_date and end_date restrict the announcement date."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ranking_field": {
                    "type": "string",
                    "description": "The field to rank by"
                },
                "limit": {
                    "type": "integer",
                    "default": 5
                },
                "filter_query": {
                    "type": "string",
                    "description": "Free-text description narrowing the companies first"
                },
                "ascending": {
                    "type": "boolean",
                    "default": false
                },
                "start_date": {
                    "type": "string",
                    "description": "Earliest announcement date, e.g. 2024-01-01 or January 1, 2024"
                },
                "end_date": {
                    "type": "string",
                    "description": "Latest announcement date"
                },
                "fixed_list": {
                    "type": "string",
                    "description": "Comma-separated company names to rank among"
                }
            },
            "required": ["ranking_field"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

/// Companies matching a spoken description
pub struct SearchCompaniesTool {
    assistant: Arc<PortfolioAssistant>,
}

impl SearchCompaniesTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for SearchCompaniesTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = parse_params(params)?;
        Ok(json!(self.assistant.search(&params.query)))
    }

    fn name(&self) -> &str {
        "search_companies"
    }

    fn description(&self) -> &str {
        "Find portfolio companies matching a description, e.g. 'deep tech climate companies \
         with excitement above 8' or 'status ipo'. Add 'recent_fundraising' to keep only \
         companies with a dated recent raise."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The description, as spoken"
                }
            },
            "required": ["query"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures;

    #[tokio::test]
    async fn test_rank_with_alias_and_fixed_list() {
        let tool = RankCompaniesTool::new(fixtures::assistant());

        let answer = tool
            .execute(json!({"field": "excitement", "ascending": true}))
            .await
            .unwrap();
        assert_eq!(
            answer,
            json!("Top 2 companies by excitement:\n- Ledgerly: 6\n- Orbit Labs: 9")
        );

        let answer = tool
            .execute(json!({"ranking_field": "valuation", "fixed_list": "ledgerly"}))
            .await
            .unwrap();
        assert_eq!(answer, json!("Top 1 companies by valuation:\n- Ledgerly: 800"));
    }

    #[tokio::test]
    async fn test_rank_recent_raise_window() {
        let tool = RankCompaniesTool::new(fixtures::assistant());
        let answer = tool
            .execute(json!({
                "ranking_field": "recent_raise",
                "start_date": "2025-01-01"
            }))
            .await
            .unwrap();
        assert_eq!(
            answer,
            json!("I couldn't find any companies matching the provided criteria.")
        );
    }

    #[tokio::test]
    async fn test_top_by_valuation_default_limit() {
        let tool = TopByValuationTool::new(fixtures::assistant());
        let answer = tool.execute(json!({})).await.unwrap();
        let text = answer.as_str().unwrap();
        assert!(text.starts_with("Here are the top 2 companies by valuation:"));
        assert!(text.contains("- Orbit Labs: approximately $2.4 billion (as of an unknown date)."));
    }

    #[tokio::test]
    async fn test_search() {
        let tool = SearchCompaniesTool::new(fixtures::assistant());
        let answer = tool
            .execute(json!({"query": "status ipo"}))
            .await
            .unwrap();
        assert_eq!(
            answer,
            json!("Here are the matching companies:\n- Ledgerly at a $0.8B valuation operating in Fintech")
        );
    }

    #[test]
    fn test_tool_metadata() {
        let tool = RankCompaniesTool::new(fixtures::assistant());
        assert_eq!(tool.name(), "rank_companies");
        assert_eq!(tool.input_schema()["required"], json!(["ranking_field"]));
    }
}
